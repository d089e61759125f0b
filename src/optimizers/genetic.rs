//! 遗传算法

use super::{make_rng, Best, OptimizationAlgorithm};
use crate::instance::Instance;
use crate::problems::GeneticAlgorithmProblem;
use crate::Error;
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution as _;
use rand::rngs::StdRng;
use rand::Rng;
use tracing::debug;

/// 按适应度比例选择父代，每一代产生 `to_mate` 个子代，其余个体从上一代中按同样的比例复制，最后随机变异 `to_mutate` 个个体
pub struct StandardGeneticAlgorithm<P: GeneticAlgorithmProblem> {
    problem: P,
    rng: StdRng,
    to_mate: usize,
    to_mutate: usize,
    population: Vec<Instance>,
    values: Vec<f64>,
    best: Best,
}

impl<P: GeneticAlgorithmProblem> StandardGeneticAlgorithm<P> {
    pub fn new(
        mut problem: P,
        population_size: usize,
        to_mate: usize,
        to_mutate: usize,
        seed: Option<u64>,
    ) -> Result<Self, Error> {
        if population_size == 0 {
            return Err(Error::Config("种群大小必须为正数".into()));
        }
        if to_mate > population_size {
            return Err(Error::Config(format!(
                "每代杂交数 {to_mate} 超过了种群大小 {population_size}"
            )));
        }
        let mut rng = make_rng(seed);
        let population: Vec<_> = (0..population_size)
            .map(|_| problem.random(&mut rng))
            .collect();
        let values = population
            .iter()
            .map(|x| problem.value(x))
            .collect::<Result<Vec<_>, _>>()?;
        let best = fittest(&population, &values);
        Ok(Self {
            problem,
            rng,
            to_mate,
            to_mutate,
            population,
            values,
            best,
        })
    }

    pub fn population(&self) -> &[Instance] {
        &self.population
    }

    pub fn problem(&self) -> &P {
        &self.problem
    }
}

fn fittest(population: &[Instance], values: &[f64]) -> Best {
    let mut index = 0;
    for (i, value) in values.iter().enumerate() {
        if *value > values[index] {
            index = i;
        }
    }
    Best {
        instance: population[index].clone(),
        value: values[index],
    }
}

/// 适应度减去最小值后作为选择权重；权重全为零或无法表示时退化为均匀选择
fn selection(values: &[f64]) -> Result<WeightedIndex<f64>, Error> {
    let minimum = values.iter().copied().fold(f64::INFINITY, f64::min);
    let weights: Vec<f64> = values.iter().map(|v| v - minimum).collect();
    let total: f64 = weights.iter().sum();
    let result = if total.is_finite() && total > 0.0 {
        WeightedIndex::new(&weights)
    } else {
        debug!("种群适应度无差别，改为均匀选择");
        WeightedIndex::new(vec![1.0; values.len()])
    };
    result.map_err(|e| Error::Message(format!("无法构造选择分布：{e}")))
}

impl<P: GeneticAlgorithmProblem> OptimizationAlgorithm for StandardGeneticAlgorithm<P> {
    fn train(&mut self) -> Result<f64, Error> {
        let size = self.population.len();
        let selection = selection(&self.values)?;
        let mut next: Vec<Instance> = Vec::with_capacity(size);
        let mut values: Vec<Option<f64>> = Vec::with_capacity(size);
        for _ in 0..self.to_mate {
            let a = &self.population[selection.sample(&mut self.rng)];
            let b = &self.population[selection.sample(&mut self.rng)];
            next.push(self.problem.mate(a, b, &mut self.rng));
            values.push(None);
        }
        for _ in self.to_mate..size {
            let index = selection.sample(&mut self.rng);
            next.push(self.population[index].clone());
            values.push(Some(self.values[index]));
        }
        for _ in 0..self.to_mutate {
            let index = self.rng.random_range(0..size);
            self.problem.mutate(&mut next[index], &mut self.rng);
            values[index] = None;
        }
        let mut evaluated = Vec::with_capacity(size);
        for (instance, value) in next.iter().zip(values) {
            evaluated.push(match value {
                Some(value) => value,
                None => self.problem.value(instance)?,
            });
        }
        self.population = next;
        self.values = evaluated;
        let fittest = fittest(&self.population, &self.values);
        self.best.offer(&fittest.instance, fittest.value);
        Ok(self.values.iter().sum::<f64>() / size as f64)
    }

    fn optimal(&self) -> &Instance {
        &self.best.instance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distributions::tests::is_permutation;
    use crate::optimizers::tests::{genetic_problem, CITIES};
    use crate::problems::EvaluationFunction;

    #[test]
    fn population_stays_valid_and_best_improves() {
        let mut algorithm =
            StandardGeneticAlgorithm::new(genetic_problem(), 40, 20, 5, Some(11)).unwrap();
        let mut evaluation = genetic_problem();
        let mut best = evaluation.value(&algorithm.optimal().clone()).unwrap();
        for _ in 0..50 {
            let mean = algorithm.train().unwrap();
            assert!(mean > 0.0);
            let value = evaluation.value(&algorithm.optimal().clone()).unwrap();
            assert!(value >= best);
            best = value;
        }
        assert_eq!(algorithm.population().len(), 40);
        assert!(algorithm
            .population()
            .iter()
            .all(|x| is_permutation(x, CITIES)));
    }

    #[test]
    fn rejects_invalid_sizes() {
        assert!(matches!(
            StandardGeneticAlgorithm::new(genetic_problem(), 10, 11, 0, Some(0)),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            StandardGeneticAlgorithm::new(genetic_problem(), 0, 0, 0, Some(0)),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn uniform_selection_when_values_are_equal() {
        let mut rng = make_rng(Some(2));
        let selection = selection(&[3.0, 3.0, 3.0]).unwrap();
        let mut seen = [false; 3];
        for _ in 0..100 {
            seen[selection.sample(&mut rng)] = true;
        }
        assert!(seen.iter().all(|&x| x));
    }
}
