//! 优化问题的能力接口
//!
//! 每种算法只要求问题具备它用得到的能力：爬山和退火需要生成邻居，遗传算法需要变异与杂交，MIMIC 需要拟合分布并从中采样。通用的问题由一个评价函数加上若干分布和算子拼装而成。
//!

use crate::distributions::{Distribution, FittableDistribution};
use crate::instance::Instance;
use crate::operators::{CrossoverFunction, MutationFunction, NeighborFunction};
use crate::Error;
use rand::RngCore;

pub use crate::objectives::EvaluationFunction;

pub mod neural_network;

pub use neural_network::NeuralNetworkOptimizationProblem;

pub trait RandomGenerating {
    /// 给出一个随机的初始解
    fn random(&mut self, rng: &mut dyn RngCore) -> Instance;
}

pub trait NeighborGenerating {
    fn neighbor(&mut self, instance: &Instance, rng: &mut dyn RngCore) -> Instance;
}

pub trait Mutable {
    fn mutate(&mut self, instance: &mut Instance, rng: &mut dyn RngCore);
}

pub trait Crossable {
    fn mate(&mut self, a: &Instance, b: &Instance, rng: &mut dyn RngCore) -> Instance;
}

pub trait DistributionFitting {
    /// 用一组较好的解重新估计分布
    fn estimate(&mut self, population: &[Instance]) -> Result<(), Error>;

    /// 从当前估计的分布中采样
    fn sample(&mut self, rng: &mut dyn RngCore) -> Instance;
}

pub trait HillClimbingProblem: EvaluationFunction + RandomGenerating + NeighborGenerating {}

impl<T: EvaluationFunction + RandomGenerating + NeighborGenerating> HillClimbingProblem for T {}

pub trait GeneticAlgorithmProblem:
    EvaluationFunction + RandomGenerating + Mutable + Crossable
{
}

impl<T: EvaluationFunction + RandomGenerating + Mutable + Crossable> GeneticAlgorithmProblem for T {}

pub trait ProbabilisticOptimizationProblem:
    EvaluationFunction + RandomGenerating + DistributionFitting
{
}

impl<T: EvaluationFunction + RandomGenerating + DistributionFitting>
    ProbabilisticOptimizationProblem for T
{
}

/// 评价函数、初始分布和邻域算子
pub struct GenericHillClimbingProblem<E, D, N> {
    evaluation: E,
    distribution: D,
    neighbor: N,
}

impl<E: EvaluationFunction, D: Distribution, N: NeighborFunction> GenericHillClimbingProblem<E, D, N> {
    pub fn new(evaluation: E, distribution: D, neighbor: N) -> Self {
        Self {
            evaluation,
            distribution,
            neighbor,
        }
    }

    pub fn evaluation(&self) -> &E {
        &self.evaluation
    }
}

impl<E: EvaluationFunction, D, N> EvaluationFunction for GenericHillClimbingProblem<E, D, N> {
    fn value(&mut self, instance: &Instance) -> Result<f64, Error> {
        self.evaluation.value(instance)
    }
}

impl<E, D: Distribution, N> RandomGenerating for GenericHillClimbingProblem<E, D, N> {
    fn random(&mut self, rng: &mut dyn RngCore) -> Instance {
        self.distribution.sample(rng)
    }
}

impl<E, D, N: NeighborFunction> NeighborGenerating for GenericHillClimbingProblem<E, D, N> {
    fn neighbor(&mut self, instance: &Instance, rng: &mut dyn RngCore) -> Instance {
        self.neighbor.neighbor(instance, rng)
    }
}

/// 评价函数、初始分布、变异算子和杂交算子
pub struct GenericGeneticAlgorithmProblem<E, D, M, C> {
    evaluation: E,
    distribution: D,
    mutation: M,
    crossover: C,
}

impl<E: EvaluationFunction, D: Distribution, M: MutationFunction, C: CrossoverFunction>
    GenericGeneticAlgorithmProblem<E, D, M, C>
{
    pub fn new(evaluation: E, distribution: D, mutation: M, crossover: C) -> Self {
        Self {
            evaluation,
            distribution,
            mutation,
            crossover,
        }
    }

    pub fn evaluation(&self) -> &E {
        &self.evaluation
    }
}

impl<E: EvaluationFunction, D, M, C> EvaluationFunction for GenericGeneticAlgorithmProblem<E, D, M, C> {
    fn value(&mut self, instance: &Instance) -> Result<f64, Error> {
        self.evaluation.value(instance)
    }
}

impl<E, D: Distribution, M, C> RandomGenerating for GenericGeneticAlgorithmProblem<E, D, M, C> {
    fn random(&mut self, rng: &mut dyn RngCore) -> Instance {
        self.distribution.sample(rng)
    }
}

impl<E, D, M: MutationFunction, C> Mutable for GenericGeneticAlgorithmProblem<E, D, M, C> {
    fn mutate(&mut self, instance: &mut Instance, rng: &mut dyn RngCore) {
        self.mutation.mutate(instance, rng)
    }
}

impl<E, D, M, C: CrossoverFunction> Crossable for GenericGeneticAlgorithmProblem<E, D, M, C> {
    fn mate(&mut self, a: &Instance, b: &Instance, rng: &mut dyn RngCore) -> Instance {
        self.crossover.mate(a, b, rng)
    }
}

/// 评价函数、初始分布和一个可拟合的分布
pub struct GenericProbabilisticOptimizationProblem<E, D, F> {
    evaluation: E,
    distribution: D,
    model: F,
}

impl<E: EvaluationFunction, D: Distribution, F: FittableDistribution>
    GenericProbabilisticOptimizationProblem<E, D, F>
{
    pub fn new(evaluation: E, distribution: D, model: F) -> Self {
        Self {
            evaluation,
            distribution,
            model,
        }
    }

    pub fn evaluation(&self) -> &E {
        &self.evaluation
    }

    pub fn model(&self) -> &F {
        &self.model
    }
}

impl<E: EvaluationFunction, D, F> EvaluationFunction
    for GenericProbabilisticOptimizationProblem<E, D, F>
{
    fn value(&mut self, instance: &Instance) -> Result<f64, Error> {
        self.evaluation.value(instance)
    }
}

impl<E, D: Distribution, F> RandomGenerating for GenericProbabilisticOptimizationProblem<E, D, F> {
    fn random(&mut self, rng: &mut dyn RngCore) -> Instance {
        self.distribution.sample(rng)
    }
}

impl<E, D, F: FittableDistribution> DistributionFitting
    for GenericProbabilisticOptimizationProblem<E, D, F>
{
    fn estimate(&mut self, population: &[Instance]) -> Result<(), Error> {
        self.model.estimate(population)
    }

    fn sample(&mut self, rng: &mut dyn RngCore) -> Instance {
        self.model.sample(rng)
    }
}
