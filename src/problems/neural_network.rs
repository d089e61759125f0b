//! 以网络权重为编码的优化问题
//!

use super::{Crossable, Mutable, NeighborGenerating, RandomGenerating};
use crate::distributions::{Distribution, UniformContinuousDistribution};
use crate::instance::{DataSet, Instance};
use crate::network::NeuralNetwork;
use crate::objectives::measures::ErrorMeasure;
use crate::objectives::neural_network::NeuralNetworkEvaluationFunction;
use crate::objectives::EvaluationFunction;
use crate::operators::{
    ContinuousAddOneMutation, ContinuousAddOneNeighbor, CrossoverFunction, MutationFunction,
    NeighborFunction, UniformCrossover,
};
use crate::Error;
use rand::RngCore;

/// 初始权重的取值范围
pub const INITIAL_WEIGHT_RANGE: (f64, f64) = (-1.0, 1.0);

/// 同时具备爬山和遗传算法所需的能力；权重向量无法拟合分布，因此不能用于 MIMIC
pub struct NeuralNetworkOptimizationProblem<'a, N: NeuralNetwork, M: ErrorMeasure> {
    evaluation: NeuralNetworkEvaluationFunction<'a, N, M>,
    distribution: UniformContinuousDistribution,
    neighbor: ContinuousAddOneNeighbor,
    mutation: ContinuousAddOneMutation,
    crossover: UniformCrossover,
}

impl<'a, N: NeuralNetwork, M: ErrorMeasure> NeuralNetworkOptimizationProblem<'a, N, M> {
    pub fn new(network: &'a mut N, examples: &'a DataSet, measure: M) -> Self {
        let evaluation = NeuralNetworkEvaluationFunction::new(network, examples, measure);
        let (low, high) = INITIAL_WEIGHT_RANGE;
        let distribution = UniformContinuousDistribution::new(evaluation.weight_count(), low, high);
        Self {
            evaluation,
            distribution,
            neighbor: ContinuousAddOneNeighbor::default(),
            mutation: ContinuousAddOneMutation::default(),
            crossover: UniformCrossover,
        }
    }

    pub fn weight_count(&self) -> usize {
        self.evaluation.weight_count()
    }
}

impl<N: NeuralNetwork, M: ErrorMeasure> EvaluationFunction
    for NeuralNetworkOptimizationProblem<'_, N, M>
{
    fn value(&mut self, instance: &Instance) -> Result<f64, Error> {
        self.evaluation.value(instance)
    }
}

impl<N: NeuralNetwork, M: ErrorMeasure> RandomGenerating
    for NeuralNetworkOptimizationProblem<'_, N, M>
{
    fn random(&mut self, rng: &mut dyn RngCore) -> Instance {
        self.distribution.sample(rng)
    }
}

impl<N: NeuralNetwork, M: ErrorMeasure> NeighborGenerating
    for NeuralNetworkOptimizationProblem<'_, N, M>
{
    fn neighbor(&mut self, instance: &Instance, rng: &mut dyn RngCore) -> Instance {
        self.neighbor.neighbor(instance, rng)
    }
}

impl<N: NeuralNetwork, M: ErrorMeasure> Mutable for NeuralNetworkOptimizationProblem<'_, N, M> {
    fn mutate(&mut self, instance: &mut Instance, rng: &mut dyn RngCore) {
        self.mutation.mutate(instance, rng)
    }
}

impl<N: NeuralNetwork, M: ErrorMeasure> Crossable for NeuralNetworkOptimizationProblem<'_, N, M> {
    fn mate(&mut self, a: &Instance, b: &Instance, rng: &mut dyn RngCore) -> Instance {
        self.crossover.mate(a, b, rng)
    }
}
