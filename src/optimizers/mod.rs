//! 优化方法接口，以及若干优化方法的实现
//!
//! 每个方法都持有自己的问题、随机数发生器和目前为止的最优解。调用一次 [`OptimizationAlgorithm::train`] 就前进一步。
//!

use crate::instance::Instance;
use crate::problems::EvaluationFunction;
use crate::Error;
use rand::rngs::StdRng;
use rand::SeedableRng;

pub mod genetic;
pub mod hill_climbing;
pub mod mimic;
pub mod simulated_annealing;

pub use genetic::StandardGeneticAlgorithm;
pub use hill_climbing::RandomizedHillClimbing;
pub use mimic::Mimic;
pub use simulated_annealing::SimulatedAnnealing;

pub trait OptimizationAlgorithm {
    /// 执行一步搜索，返回这一步的代表值（当前解或种群的适应度）
    fn train(&mut self) -> Result<f64, Error>;

    /// 目前为止找到的最优解
    fn optimal(&self) -> &Instance;
}

impl<A: OptimizationAlgorithm + ?Sized> OptimizationAlgorithm for Box<A> {
    fn train(&mut self) -> Result<f64, Error> {
        (**self).train()
    }

    fn optimal(&self) -> &Instance {
        (**self).optimal()
    }
}

/// 给定种子时结果可以复现，否则从操作系统取种子
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// 最优解及其适应度
#[derive(Debug, Clone)]
pub(crate) struct Best {
    pub instance: Instance,
    pub value: f64,
}

impl Best {
    pub fn evaluate<E: EvaluationFunction + ?Sized>(
        problem: &mut E,
        instance: Instance,
    ) -> Result<Self, Error> {
        let value = problem.value(&instance)?;
        Ok(Self { instance, value })
    }

    /// 严格更优时替换
    pub fn offer(&mut self, instance: &Instance, value: f64) -> bool {
        if value > self.value {
            self.instance.clone_from(instance);
            self.value = value;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use crate::distributions::{DiscretePermutationDistribution, DiscreteUniformDistribution};
    use crate::objectives::traveling_salesman::{
        random_points, Point, TravelingSalesmanRouteEvaluationFunction,
        TravelingSalesmanSortEvaluationFunction,
    };
    use crate::operators::{SwapMutation, SwapNeighbor, TravelingSalesmanCrossover};
    use crate::problems::{
        GenericGeneticAlgorithmProblem, GenericHillClimbingProblem,
    };
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    pub(crate) const CITIES: usize = 12;

    pub(crate) fn points() -> Vec<Point> {
        let mut rng = StdRng::seed_from_u64(2024);
        random_points(CITIES, &mut rng)
    }

    pub(crate) type RouteHillClimbing = GenericHillClimbingProblem<
        TravelingSalesmanRouteEvaluationFunction,
        DiscretePermutationDistribution,
        SwapNeighbor,
    >;

    pub(crate) fn hill_climbing_problem() -> RouteHillClimbing {
        GenericHillClimbingProblem::new(
            TravelingSalesmanRouteEvaluationFunction::new(points()),
            DiscretePermutationDistribution::new(CITIES),
            SwapNeighbor,
        )
    }

    pub(crate) type RouteGenetic = GenericGeneticAlgorithmProblem<
        TravelingSalesmanRouteEvaluationFunction,
        DiscretePermutationDistribution,
        SwapMutation,
        TravelingSalesmanCrossover,
    >;

    pub(crate) fn genetic_problem() -> RouteGenetic {
        GenericGeneticAlgorithmProblem::new(
            TravelingSalesmanRouteEvaluationFunction::new(points()),
            DiscretePermutationDistribution::new(CITIES),
            SwapMutation,
            TravelingSalesmanCrossover,
        )
    }

    pub(crate) fn sort_evaluation() -> (TravelingSalesmanSortEvaluationFunction, DiscreteUniformDistribution) {
        (
            TravelingSalesmanSortEvaluationFunction::new(points()),
            DiscreteUniformDistribution::new(vec![CITIES; CITIES]),
        )
    }
}
