use super::{MutationFunction, NeighborFunction};
use crate::instance::Instance;
use rand::{Rng, RngCore};

/// 随机选一个分量，加上 `[-amount/2, amount/2)` 中的均匀随机数
fn add_one(data: &mut [f64], amount: f64, rng: &mut dyn RngCore) {
    if data.is_empty() {
        return;
    }
    let index = rng.random_range(0..data.len());
    data[index] += amount * (rng.random::<f64>() - 0.5);
}

#[derive(Debug, Clone, Copy)]
pub struct ContinuousAddOneNeighbor {
    pub amount: f64,
}

impl Default for ContinuousAddOneNeighbor {
    fn default() -> Self {
        Self { amount: 1.0 }
    }
}

impl NeighborFunction for ContinuousAddOneNeighbor {
    fn neighbor(&self, instance: &Instance, rng: &mut dyn RngCore) -> Instance {
        let mut neighbor = instance.clone();
        add_one(&mut neighbor.data, self.amount, rng);
        neighbor
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ContinuousAddOneMutation {
    pub amount: f64,
}

impl Default for ContinuousAddOneMutation {
    fn default() -> Self {
        Self { amount: 1.0 }
    }
}

impl MutationFunction for ContinuousAddOneMutation {
    fn mutate(&self, instance: &mut Instance, rng: &mut dyn RngCore) {
        add_one(&mut instance.data, self.amount, rng);
    }
}
