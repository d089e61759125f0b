//! 算子接口，以及各种编码下的邻域、变异、杂交算子
//!
//! 算子只保证编码的合法性（例如排列仍然是排列），不关心候选解的含义。
//!

use crate::instance::Instance;
use rand::RngCore;

pub mod continuous;
pub mod crossover;
pub mod discrete;
pub mod swap;

pub use continuous::{ContinuousAddOneMutation, ContinuousAddOneNeighbor};
pub use crossover::{SingleCrossover, TravelingSalesmanCrossover, UniformCrossover};
pub use discrete::{DiscreteChangeOneMutation, DiscreteChangeOneNeighbor};
pub use swap::{SwapMutation, SwapNeighbor};

pub trait NeighborFunction {
    /// 基于现有的一个解通过随机扰动创建一个新的解
    fn neighbor(&self, instance: &Instance, rng: &mut dyn RngCore) -> Instance;
}

pub trait MutationFunction {
    /// 原地扰动一个解
    fn mutate(&self, instance: &mut Instance, rng: &mut dyn RngCore);
}

pub trait CrossoverFunction {
    /// 由两个解生成一个新解
    fn mate(&self, a: &Instance, b: &Instance, rng: &mut dyn RngCore) -> Instance;
}
