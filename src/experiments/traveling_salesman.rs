//! 在同一组城市上比较各种优化方法
//!
//! 爬山、退火和遗传算法使用路线编码；MIMIC 使用排序编码，因为依赖树采样得到的离散向量一般不是排列。
//!

use super::{Experiment, Run};
use crate::config::{SolverConfig, TravelingSalesmanConfig};
use crate::distributions::{
    DiscreteDependencyTree, DiscretePermutationDistribution, DiscreteUniformDistribution,
};
use crate::metrics::{Metric, TourMetric};
use crate::objectives::traveling_salesman::{
    random_points, read_points, route_order, sort_order, Point,
    TravelingSalesmanEvaluationFunction, TravelingSalesmanRouteEvaluationFunction,
    TravelingSalesmanSortEvaluationFunction,
};
use crate::operators::{SwapMutation, SwapNeighbor, TravelingSalesmanCrossover};
use crate::optimizers::{
    make_rng, Mimic, RandomizedHillClimbing, SimulatedAnnealing, StandardGeneticAlgorithm,
};
use crate::problems::{
    GenericGeneticAlgorithmProblem, GenericHillClimbingProblem,
    GenericProbabilisticOptimizationProblem,
};
use crate::Error;
use tracing::{debug, info};

pub struct TravelingSalesmanExperiment {
    tsp: TravelingSalesmanEvaluationFunction,
}

impl TravelingSalesmanExperiment {
    /// 随机生成的城市由 `seed` 决定
    pub fn new(config: &TravelingSalesmanConfig, seed: Option<u64>) -> Result<Self, Error> {
        let points = match (config.cities, &config.points) {
            (Some(cities), None) => random_points(cities, &mut make_rng(seed)),
            (None, Some(path)) => read_points(path)?,
            _ => return Err(Error::Config("cities 和 points 必须恰好提供一个".into())),
        };
        Self::from_points(points)
    }

    pub fn from_points(points: Vec<Point>) -> Result<Self, Error> {
        if points.len() < 2 {
            return Err(Error::Config(format!("城市数 {} 不足两个", points.len())));
        }
        Ok(Self {
            tsp: TravelingSalesmanEvaluationFunction::new(points),
        })
    }

    pub fn cities(&self) -> usize {
        self.tsp.cities()
    }

    fn hill_climbing_problem(
        &self,
    ) -> GenericHillClimbingProblem<
        TravelingSalesmanRouteEvaluationFunction,
        DiscretePermutationDistribution,
        SwapNeighbor,
    > {
        GenericHillClimbingProblem::new(
            TravelingSalesmanRouteEvaluationFunction::new(self.tsp.points().to_vec()),
            DiscretePermutationDistribution::new(self.cities()),
            SwapNeighbor,
        )
    }

    pub fn inspect(&self) -> Result<(), Error> {
        let identity: Vec<usize> = (0..self.cities()).collect();
        let length = match self.tsp.tour_length(&identity) {
            Ok(length) => length,
            Err(Error::DegenerateTour) => {
                debug!("所有城市重合，路线长度记为 0");
                0.0
            }
            Err(error) => return Err(error),
        };
        info!(
            "共 {} 个城市，按编号顺序访问的路线长度为 {:.4}",
            self.cities(),
            length
        );
        Ok(())
    }
}

impl Experiment for TravelingSalesmanExperiment {
    fn run(&self, run: &Run) -> Result<Metric, Error> {
        let cities = self.cities();
        let (order, report) = match run.algorithm.solver {
            SolverConfig::RandomizedHillClimbing => {
                let algorithm = RandomizedHillClimbing::new(self.hill_climbing_problem(), run.seed)?;
                let (optimal, report) = run.train(algorithm)?;
                (route_order(&optimal, cities)?, report)
            }
            SolverConfig::SimulatedAnnealing {
                temperature,
                cooling,
            } => {
                let algorithm = SimulatedAnnealing::new(
                    self.hill_climbing_problem(),
                    temperature,
                    cooling,
                    run.seed,
                )?;
                let (optimal, report) = run.train(algorithm)?;
                (route_order(&optimal, cities)?, report)
            }
            SolverConfig::Genetic {
                population_size,
                to_mate,
                to_mutate,
            } => {
                let problem = GenericGeneticAlgorithmProblem::new(
                    TravelingSalesmanRouteEvaluationFunction::new(self.tsp.points().to_vec()),
                    DiscretePermutationDistribution::new(cities),
                    SwapMutation,
                    TravelingSalesmanCrossover,
                );
                let algorithm = StandardGeneticAlgorithm::new(
                    problem,
                    population_size,
                    to_mate,
                    to_mutate,
                    run.seed,
                )?;
                let (optimal, report) = run.train(algorithm)?;
                (route_order(&optimal, cities)?, report)
            }
            SolverConfig::Mimic {
                samples,
                to_keep,
                mix,
            } => {
                let ranges = vec![cities; cities];
                let problem = GenericProbabilisticOptimizationProblem::new(
                    TravelingSalesmanSortEvaluationFunction::new(self.tsp.points().to_vec()),
                    DiscreteUniformDistribution::new(ranges.clone()),
                    DiscreteDependencyTree::new(mix.unwrap_or(SolverConfig::DEFAULT_MIX), ranges),
                );
                let algorithm = Mimic::new(problem, samples, to_keep, run.seed)?;
                let (optimal, report) = run.train(algorithm)?;
                (sort_order(&optimal.data), report)
            }
        };
        let length = match self.tsp.tour_length(&order) {
            Ok(length) => length,
            Err(Error::DegenerateTour) => 0.0,
            Err(error) => return Err(error),
        };
        Ok(TourMetric {
            fitness: self.tsp.fitness(&order)?,
            length,
            training_seconds: report.seconds,
            tour: order,
        }
        .into())
    }
}
