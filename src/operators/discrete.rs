use super::{MutationFunction, NeighborFunction};
use crate::instance::Instance;
use rand::{Rng, RngCore};

/// 随机选一个分量，在其取值范围内换成另一个值
fn change_one(data: &mut [f64], ranges: &[usize], rng: &mut dyn RngCore) {
    if data.is_empty() {
        return;
    }
    let index = rng.random_range(0..data.len());
    let range = ranges[index];
    if range < 2 {
        return;
    }
    let current = data[index].round() as usize;
    let mut next = rng.random_range(0..range - 1);
    if next >= current {
        next += 1;
    }
    data[index] = next as f64;
}

#[derive(Debug, Clone)]
pub struct DiscreteChangeOneNeighbor {
    ranges: Vec<usize>,
}

impl DiscreteChangeOneNeighbor {
    pub fn new(ranges: Vec<usize>) -> Self {
        Self { ranges }
    }
}

impl NeighborFunction for DiscreteChangeOneNeighbor {
    fn neighbor(&self, instance: &Instance, rng: &mut dyn RngCore) -> Instance {
        let mut neighbor = instance.clone();
        change_one(&mut neighbor.data, &self.ranges, rng);
        neighbor
    }
}

#[derive(Debug, Clone)]
pub struct DiscreteChangeOneMutation {
    ranges: Vec<usize>,
}

impl DiscreteChangeOneMutation {
    pub fn new(ranges: Vec<usize>) -> Self {
        Self { ranges }
    }
}

impl MutationFunction for DiscreteChangeOneMutation {
    fn mutate(&self, instance: &mut Instance, rng: &mut dyn RngCore) {
        change_one(&mut instance.data, &self.ranges, rng);
    }
}
