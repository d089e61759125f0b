use super::{MutationFunction, NeighborFunction};
use crate::instance::Instance;
use rand::{Rng, RngCore};

/// 随机选两个不同的位置并交换，排列仍然是排列
fn swap_two(data: &mut [f64], rng: &mut dyn RngCore) {
    let length = data.len();
    if length < 2 {
        return;
    }
    let i = rng.random_range(0..length);
    // 从其余 length - 1 个位置中选，保证 j != i
    let mut j = rng.random_range(0..length - 1);
    if j >= i {
        j += 1;
    }
    data.swap(i, j);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SwapNeighbor;

impl NeighborFunction for SwapNeighbor {
    fn neighbor(&self, instance: &Instance, rng: &mut dyn RngCore) -> Instance {
        let mut neighbor = instance.clone();
        swap_two(&mut neighbor.data, rng);
        neighbor
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SwapMutation;

impl MutationFunction for SwapMutation {
    fn mutate(&self, instance: &mut Instance, rng: &mut dyn RngCore) {
        swap_two(&mut instance.data, rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distributions::tests::is_permutation;
    use crate::distributions::{DiscretePermutationDistribution, Distribution};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn swaps_keep_permutations() {
        let mut rng = StdRng::seed_from_u64(21);
        for size in [2, 3, 10, 57] {
            let distribution = DiscretePermutationDistribution::new(size);
            for _ in 0..50 {
                let mut instance = distribution.sample(&mut rng);
                let neighbor = SwapNeighbor.neighbor(&instance, &mut rng);
                assert!(is_permutation(&neighbor, size));
                SwapMutation.mutate(&mut instance, &mut rng);
                assert!(is_permutation(&instance, size));
            }
        }
    }

    #[test]
    fn neighbor_differs_in_exactly_two_places() {
        let mut rng = StdRng::seed_from_u64(2);
        let instance = Instance::from_discrete(0..8);
        for _ in 0..50 {
            let neighbor = SwapNeighbor.neighbor(&instance, &mut rng);
            let changed = (0..8).filter(|&i| neighbor.data[i] != instance.data[i]).count();
            assert_eq!(changed, 2);
        }
    }

    #[test]
    fn short_vectors_are_untouched() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut single = Instance::from_discrete([0]);
        SwapMutation.mutate(&mut single, &mut rng);
        assert_eq!(single.data, vec![0.0]);
    }
}
