//! 退火算法

use super::{make_rng, Best, OptimizationAlgorithm};
use crate::instance::Instance;
use crate::problems::HillClimbingProblem;
use crate::Error;
use rand::rngs::StdRng;
use rand::Rng;

/// 从给定的温度开始，每一步乘以冷却系数
pub struct SimulatedAnnealing<P: HillClimbingProblem> {
    problem: P,
    rng: StdRng,
    temperature: f64,
    cooling: f64,
    current: Best,
    best: Best,
}

impl<P: HillClimbingProblem> SimulatedAnnealing<P> {
    pub fn new(
        mut problem: P,
        temperature: f64,
        cooling: f64,
        seed: Option<u64>,
    ) -> Result<Self, Error> {
        let mut rng = make_rng(seed);
        let start = problem.random(&mut rng);
        let current = Best::evaluate(&mut problem, start)?;
        Ok(Self {
            problem,
            rng,
            temperature,
            cooling,
            best: current.clone(),
            current,
        })
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn problem(&self) -> &P {
        &self.problem
    }
}

impl<P: HillClimbingProblem> OptimizationAlgorithm for SimulatedAnnealing<P> {
    fn train(&mut self) -> Result<f64, Error> {
        let neighbor = self.problem.neighbor(&self.current.instance, &mut self.rng);
        let value = self.problem.value(&neighbor)?;
        // 更好的解总是接受，更差的解以 exp(Δ/t) 的概率接受
        let improvement = value - self.current.value;
        if improvement >= 0.0 || self.rng.random::<f64>() < (improvement / self.temperature).exp() {
            self.current = Best {
                instance: neighbor,
                value,
            };
        }
        self.temperature *= self.cooling;
        self.best.offer(&self.current.instance, self.current.value);
        Ok(self.current.value)
    }

    fn optimal(&self) -> &Instance {
        &self.best.instance
    }
}
