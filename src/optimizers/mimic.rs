//! MIMIC：反复从估计的分布中采样，保留最好的一部分样本，再用它们重新估计分布
//!

use super::{make_rng, Best, OptimizationAlgorithm};
use crate::instance::Instance;
use crate::problems::ProbabilisticOptimizationProblem;
use crate::Error;
use rand::rngs::StdRng;

pub struct Mimic<P: ProbabilisticOptimizationProblem> {
    problem: P,
    rng: StdRng,
    samples: usize,
    to_keep: usize,
    best: Best,
}

impl<P: ProbabilisticOptimizationProblem> Mimic<P> {
    /// 初始分布由 `samples` 个随机解中最好的 `to_keep` 个估计得到
    pub fn new(
        mut problem: P,
        samples: usize,
        to_keep: usize,
        seed: Option<u64>,
    ) -> Result<Self, Error> {
        if to_keep == 0 || to_keep > samples {
            return Err(Error::Config(format!(
                "保留数 {to_keep} 必须为正数且不超过采样数 {samples}"
            )));
        }
        let mut rng = make_rng(seed);
        let population: Vec<_> = (0..samples).map(|_| problem.random(&mut rng)).collect();
        let (kept, values) = keep_best(&mut problem, population, to_keep)?;
        problem.estimate(&kept)?;
        let best = Best {
            instance: kept[0].clone(),
            value: values[0],
        };
        Ok(Self {
            problem,
            rng,
            samples,
            to_keep,
            best,
        })
    }

    pub fn problem(&self) -> &P {
        &self.problem
    }
}

/// 按适应度从高到低排序后保留前 `to_keep` 个
fn keep_best<P: ProbabilisticOptimizationProblem>(
    problem: &mut P,
    population: Vec<Instance>,
    to_keep: usize,
) -> Result<(Vec<Instance>, Vec<f64>), Error> {
    let mut scored = Vec::with_capacity(population.len());
    for instance in population {
        let value = problem.value(&instance)?;
        scored.push((instance, value));
    }
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(to_keep);
    Ok(scored.into_iter().unzip())
}

impl<P: ProbabilisticOptimizationProblem> OptimizationAlgorithm for Mimic<P> {
    fn train(&mut self) -> Result<f64, Error> {
        let population: Vec<_> = (0..self.samples)
            .map(|_| self.problem.sample(&mut self.rng))
            .collect();
        let (kept, values) = keep_best(&mut self.problem, population, self.to_keep)?;
        self.problem.estimate(&kept)?;
        self.best.offer(&kept[0], values[0]);
        Ok(values.iter().sum::<f64>() / values.len() as f64)
    }

    fn optimal(&self) -> &Instance {
        &self.best.instance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distributions::DiscreteDependencyTree;
    use crate::objectives::traveling_salesman::sort_order;
    use crate::optimizers::tests::{sort_evaluation, CITIES};
    use crate::problems::{EvaluationFunction, GenericProbabilisticOptimizationProblem};

    fn problem() -> impl ProbabilisticOptimizationProblem {
        let (evaluation, distribution) = sort_evaluation();
        let model = DiscreteDependencyTree::new(0.1, distribution.ranges().to_vec());
        GenericProbabilisticOptimizationProblem::new(evaluation, distribution, model)
    }

    #[test]
    fn best_so_far_never_decreases() {
        let mut algorithm = Mimic::new(problem(), 60, 20, Some(6)).unwrap();
        let mut evaluation = problem();
        let mut best = evaluation.value(&algorithm.optimal().clone()).unwrap();
        for _ in 0..15 {
            let mean = algorithm.train().unwrap();
            assert!(mean > 0.0);
            let value = evaluation.value(&algorithm.optimal().clone()).unwrap();
            assert!(value >= best);
            best = value;
        }
        let order = sort_order(&algorithm.optimal().data);
        assert_eq!(order.len(), CITIES);
    }

    #[test]
    fn rejects_keeping_more_than_sampled() {
        assert!(matches!(
            Mimic::new(problem(), 10, 11, Some(0)),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Mimic::new(problem(), 10, 0, Some(0)),
            Err(Error::Config(_))
        ));
    }
}
