//! 离散依赖树分布
//!
//! 按 Chow–Liu 的方法，用样本中两两分量之间的互信息构造最大生成树，再沿树从根到叶依次采样。所有边缘分布和条件分布都按 `mix` 的比例与均匀分布混合，避免未出现的取值概率为零。
//!

use super::{Distribution, FittableDistribution};
use crate::instance::Instance;
use crate::Error;
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution as _;
use rand::{Rng, RngCore};
use tracing::debug;

#[derive(Debug, Clone)]
struct Node {
    feature: usize,
    parent: Option<usize>,
    /// 根节点只有一个分布；其他节点对父节点的每个取值各有一个条件分布
    tables: Vec<WeightedIndex<f64>>,
}

#[derive(Debug, Clone)]
pub struct DiscreteDependencyTree {
    mix: f64,
    ranges: Vec<usize>,
    nodes: Vec<Node>,
}

impl DiscreteDependencyTree {
    pub fn new(mix: f64, ranges: Vec<usize>) -> Self {
        Self {
            mix: mix.clamp(0.0, 1.0),
            ranges,
            nodes: vec![],
        }
    }

    /// 拟合后的树，按采样顺序给出每个分量及其父分量
    pub fn edges(&self) -> Vec<(usize, Option<usize>)> {
        self.nodes.iter().map(|x| (x.feature, x.parent)).collect()
    }

    fn mixed(&self, counts: &[f64], range: usize) -> Result<WeightedIndex<f64>, Error> {
        let total: f64 = counts.iter().sum();
        let uniform = 1.0 / range as f64;
        let probabilities = counts.iter().map(|&c| {
            let empirical = if total > 0.0 { c / total } else { uniform };
            (1.0 - self.mix) * empirical + self.mix * uniform
        });
        WeightedIndex::new(probabilities).map_err(|e| Error::Message(format!("无法构造分布：{e}")))
    }
}

/// 一组样本的离散取值和归一化权重
struct Sample {
    values: Vec<Vec<usize>>,
    weights: Vec<f64>,
}

impl Sample {
    fn new(population: &[Instance], ranges: &[usize]) -> Result<Self, Error> {
        if population.is_empty() {
            return Err(Error::Message("无法用空的样本集拟合依赖树".to_string()));
        }
        let mut values = Vec::with_capacity(population.len());
        for instance in population {
            if instance.size() != ranges.len() {
                return Err(Error::DimensionMismatch {
                    expected: ranges.len(),
                    actual: instance.size(),
                });
            }
            values.push(
                ranges
                    .iter()
                    .enumerate()
                    .map(|(i, &r)| instance.discrete(i).clamp(0, r.max(1) as i64 - 1) as usize)
                    .collect(),
            );
        }
        let total: f64 = population.iter().map(|x| x.weight.max(0.0)).sum();
        let weights = if total > 0.0 {
            population.iter().map(|x| x.weight.max(0.0) / total).collect()
        } else {
            vec![1.0 / population.len() as f64; population.len()]
        };
        Ok(Self { values, weights })
    }

    fn marginal(&self, feature: usize, range: usize) -> Vec<f64> {
        let mut counts = vec![0.0; range];
        for (values, weight) in self.values.iter().zip(&self.weights) {
            counts[values[feature]] += weight;
        }
        counts
    }

    /// `joint[a * r_j + b]` 为分量 i 取 a 且分量 j 取 b 的概率
    fn joint(&self, i: usize, j: usize, range_j: usize, size: usize) -> Vec<f64> {
        let mut joint = vec![0.0; size];
        for (values, weight) in self.values.iter().zip(&self.weights) {
            joint[values[i] * range_j + values[j]] += weight;
        }
        joint
    }

    fn mutual_information(&self, i: usize, j: usize, ranges: &[usize], marginals: &[Vec<f64>]) -> f64 {
        let (ri, rj) = (ranges[i].max(1), ranges[j].max(1));
        let joint = self.joint(i, j, rj, ri * rj);
        let mut information = 0.0;
        for a in 0..ri {
            for b in 0..rj {
                let p = joint[a * rj + b];
                if p > 0.0 {
                    information += p * (p / (marginals[i][a] * marginals[j][b])).ln();
                }
            }
        }
        information
    }
}

impl Distribution for DiscreteDependencyTree {
    fn sample(&self, rng: &mut dyn RngCore) -> Instance {
        if self.nodes.is_empty() {
            return Instance::from_discrete(self.ranges.iter().map(|&r| rng.random_range(0..r.max(1))));
        }
        let mut values = vec![0; self.ranges.len()];
        for node in &self.nodes {
            let table = match node.parent {
                Some(parent) => &node.tables[values[parent]],
                None => &node.tables[0],
            };
            values[node.feature] = table.sample(rng);
        }
        Instance::from_discrete(values)
    }
}

impl FittableDistribution for DiscreteDependencyTree {
    fn estimate(&mut self, population: &[Instance]) -> Result<(), Error> {
        let features = self.ranges.len();
        if features == 0 {
            return Ok(());
        }
        let ranges: Vec<usize> = self.ranges.iter().map(|&r| r.max(1)).collect();
        let sample = Sample::new(population, &ranges)?;
        let marginals: Vec<Vec<f64>> = (0..features)
            .map(|i| sample.marginal(i, ranges[i]))
            .collect();

        // Prim 算法求互信息的最大生成树，以分量 0 为根
        let mut in_tree = vec![false; features];
        let mut best = vec![f64::NEG_INFINITY; features];
        let mut parent: Vec<Option<usize>> = vec![None; features];
        let mut order = Vec::with_capacity(features);
        let mut current = 0;
        in_tree[0] = true;
        order.push(0);
        for _ in 1..features {
            for other in 0..features {
                if in_tree[other] {
                    continue;
                }
                let information = sample.mutual_information(current, other, &ranges, &marginals);
                if information > best[other] {
                    best[other] = information;
                    parent[other] = Some(current);
                }
            }
            let next = (0..features)
                .filter(|&x| !in_tree[x])
                .max_by(|&a, &b| best[a].total_cmp(&best[b]))
                .ok_or("依赖树构造失败")?;
            in_tree[next] = true;
            order.push(next);
            current = next;
        }

        let mut nodes = Vec::with_capacity(features);
        for &feature in &order {
            let tables = match parent[feature] {
                None => vec![self.mixed(&marginals[feature], ranges[feature])?],
                Some(p) => {
                    let joint = sample.joint(p, feature, ranges[feature], ranges[p] * ranges[feature]);
                    joint
                        .chunks(ranges[feature])
                        .map(|row| self.mixed(row, ranges[feature]))
                        .collect::<Result<Vec<_>, Error>>()?
                }
            };
            nodes.push(Node {
                feature,
                parent: parent[feature],
                tables,
            });
        }
        debug!("依赖树拟合完成，共 {} 个分量，{} 个样本", features, population.len());
        self.nodes = nodes;
        Ok(())
    }
}
