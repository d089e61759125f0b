use super::CrossoverFunction;
use crate::instance::Instance;
use rand::{Rng, RngCore};
use rustc_hash::FxHashSet;

/// 每个分量等概率地取自两个父代之一
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformCrossover;

impl CrossoverFunction for UniformCrossover {
    fn mate(&self, a: &Instance, b: &Instance, rng: &mut dyn RngCore) -> Instance {
        let data = a
            .data
            .iter()
            .zip(&b.data)
            .map(|(&x, &y)| if rng.random_bool(0.5) { x } else { y })
            .collect();
        Instance::new(data)
    }
}

/// 在一个随机位置切开，前半取自 `a`，后半取自 `b`
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleCrossover;

impl CrossoverFunction for SingleCrossover {
    fn mate(&self, a: &Instance, b: &Instance, rng: &mut dyn RngCore) -> Instance {
        let length = a.size().min(b.size());
        let point = rng.random_range(0..=length);
        let mut data = a.data[..point].to_vec();
        data.extend_from_slice(&b.data[point..length]);
        Instance::new(data)
    }
}

/// 路线的顺序杂交
///
/// 子代在一段随机区间内照抄 `a`，其余位置从区间末尾开始，按 `b` 中城市出现的先后顺序填入尚未访问的城市。两个父代是同一组城市的排列时，子代也是。
#[derive(Debug, Clone, Copy, Default)]
pub struct TravelingSalesmanCrossover;

impl CrossoverFunction for TravelingSalesmanCrossover {
    fn mate(&self, a: &Instance, b: &Instance, rng: &mut dyn RngCore) -> Instance {
        let length = a.size();
        if length < 2 || b.size() != length {
            return Instance::new(a.data.clone());
        }
        let start = rng.random_range(0..length);
        let end = rng.random_range(start..length);
        let mut data = a.data.clone();
        let mut placed = FxHashSet::default();
        for i in start..=end {
            placed.insert(a.discrete(i));
        }
        let mut positions = (end + 1..length).chain(0..start);
        for offset in 0..length {
            let index = (end + 1 + offset) % length;
            if !placed.insert(b.discrete(index)) {
                continue;
            }
            match positions.next() {
                Some(position) => data[position] = b.data[index],
                None => break,
            }
        }
        Instance::new(data)
    }
}
