//! 随机生成候选解的分布
//!
//! 每种编码都有对应的分布：连续向量取区间内的均匀分布，路线取随机排列，离散向量取各分量独立的均匀分布；依赖树分布还可以根据一组样本拟合。
//!

use crate::instance::Instance;
use crate::Error;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
pub mod dependency_tree;

pub use dependency_tree::DiscreteDependencyTree;

pub trait Distribution {
    fn sample(&self, rng: &mut dyn RngCore) -> Instance;
}

/// 可以根据观测到的样本重新估计的分布
pub trait FittableDistribution: Distribution {
    fn estimate(&mut self, population: &[Instance]) -> Result<(), Error>;
}

/// `0..n` 的均匀随机排列
#[derive(Debug, Clone)]
pub struct DiscretePermutationDistribution {
    size: usize,
}

impl DiscretePermutationDistribution {
    pub fn new(size: usize) -> Self {
        Self { size }
    }
}

impl Distribution for DiscretePermutationDistribution {
    fn sample(&self, rng: &mut dyn RngCore) -> Instance {
        let mut order: Vec<usize> = (0..self.size).collect();
        order.shuffle(rng);
        Instance::from_discrete(order)
    }
}

/// 第 i 个分量在 `0..ranges[i]` 中均匀取值
#[derive(Debug, Clone)]
pub struct DiscreteUniformDistribution {
    ranges: Vec<usize>,
}

impl DiscreteUniformDistribution {
    pub fn new(ranges: Vec<usize>) -> Self {
        Self { ranges }
    }

    pub fn ranges(&self) -> &[usize] {
        &self.ranges
    }
}

impl Distribution for DiscreteUniformDistribution {
    fn sample(&self, rng: &mut dyn RngCore) -> Instance {
        Instance::from_discrete(self.ranges.iter().map(|&r| rng.random_range(0..r.max(1))))
    }
}

/// 每个分量在 `[low, high)` 中均匀取值，用于网络权重
#[derive(Debug, Clone)]
pub struct UniformContinuousDistribution {
    size: usize,
    low: f64,
    high: f64,
}

impl UniformContinuousDistribution {
    pub fn new(size: usize, low: f64, high: f64) -> Self {
        Self { size, low, high }
    }
}

impl Distribution for UniformContinuousDistribution {
    fn sample(&self, rng: &mut dyn RngCore) -> Instance {
        let span = self.high - self.low;
        Instance::new(
            (0..self.size)
                .map(|_| self.low + span * rng.random::<f64>())
                .collect(),
        )
    }
}
