//! 随机爬山
//!
//! 每一步生成当前解的一个邻居，只有严格更优时才移动过去，因此可能停在局部最优。
//!

use super::{make_rng, Best, OptimizationAlgorithm};
use crate::instance::Instance;
use crate::problems::HillClimbingProblem;
use crate::Error;
use rand::rngs::StdRng;

pub struct RandomizedHillClimbing<P: HillClimbingProblem> {
    problem: P,
    rng: StdRng,
    current: Best,
}

impl<P: HillClimbingProblem> RandomizedHillClimbing<P> {
    pub fn new(mut problem: P, seed: Option<u64>) -> Result<Self, Error> {
        let mut rng = make_rng(seed);
        let start = problem.random(&mut rng);
        let current = Best::evaluate(&mut problem, start)?;
        Ok(Self {
            problem,
            rng,
            current,
        })
    }

    pub fn problem(&self) -> &P {
        &self.problem
    }
}

impl<P: HillClimbingProblem> OptimizationAlgorithm for RandomizedHillClimbing<P> {
    fn train(&mut self) -> Result<f64, Error> {
        let neighbor = self.problem.neighbor(&self.current.instance, &mut self.rng);
        let value = self.problem.value(&neighbor)?;
        self.current.offer(&neighbor, value);
        Ok(self.current.value)
    }

    fn optimal(&self) -> &Instance {
        &self.current.instance
    }
}
