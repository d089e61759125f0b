//! 误差度量及其解析梯度
//!

use crate::instance::Instance;
use crate::Error;
use serde::{Deserialize, Serialize};

pub trait ErrorMeasure {
    /// 网络输出 `output` 与样本 `example` 的标签之间的误差
    fn value(&self, output: &Instance, example: &Instance) -> Result<f64, Error>;
}

pub trait GradientErrorMeasure: ErrorMeasure {
    /// `value` 对输出每一个分量的偏导数
    fn gradient(&self, output: &Instance, example: &Instance) -> Result<Vec<f64>, Error>;
}

fn label_of<'a>(output: &Instance, example: &'a Instance) -> Result<&'a Instance, Error> {
    let label = example.label().ok_or(Error::DimensionMismatch {
        expected: output.size(),
        actual: 0,
    })?;
    if label.size() != output.size() {
        return Err(Error::DimensionMismatch {
            expected: output.size(),
            actual: label.size(),
        });
    }
    Ok(label)
}

/// 每个分量 `(输出 - 标签) · 权重 · 倍数` 的序列，倍数由 `multiplier` 给出
fn weighted_differences<'a>(
    output: &'a Instance,
    label: &'a Instance,
    weight: f64,
    multiplier: impl Fn(usize) -> f64 + 'a,
) -> impl Iterator<Item = (f64, f64)> + 'a {
    (0..output.size()).map(move |i| {
        let difference = output.continuous(i) - label.continuous(i);
        (difference, weight * multiplier(i))
    })
}

/// 平方误差和：`0.5 · Σ (o - t)² · w`
#[derive(Debug, Clone, Copy, Default)]
pub struct SumOfSquaresError;

impl ErrorMeasure for SumOfSquaresError {
    fn value(&self, output: &Instance, example: &Instance) -> Result<f64, Error> {
        let label = label_of(output, example)?;
        let sum: f64 = weighted_differences(output, label, example.weight, |_| 1.0)
            .map(|(d, w)| d * d * w)
            .sum();
        Ok(0.5 * sum)
    }
}

impl GradientErrorMeasure for SumOfSquaresError {
    fn gradient(&self, output: &Instance, example: &Instance) -> Result<Vec<f64>, Error> {
        let label = label_of(output, example)?;
        Ok(weighted_differences(output, label, example.weight, |_| 1.0)
            .map(|(d, w)| d * w)
            .collect())
    }
}

/// 类别加权的平方误差和
///
/// 独热标签只有一个正类和 N-1 个负类，因此正类分量上的误差乘以 N-1，使两类对误差的贡献相当。
#[derive(Debug, Clone, Copy, Default)]
pub struct SumOfWeightedSquaresError;

impl SumOfWeightedSquaresError {
    fn class_multiplier(label: &Instance) -> impl Fn(usize) -> f64 + '_ {
        // 只有一个分量时倍数为 1，否则误差恒为零
        let positive = (label.size().saturating_sub(1)).max(1) as f64;
        move |i| {
            if label.discrete(i) == 1 {
                positive
            } else {
                1.0
            }
        }
    }
}

impl ErrorMeasure for SumOfWeightedSquaresError {
    fn value(&self, output: &Instance, example: &Instance) -> Result<f64, Error> {
        let label = label_of(output, example)?;
        let multiplier = Self::class_multiplier(label);
        let sum: f64 = weighted_differences(output, label, example.weight, multiplier)
            .map(|(d, w)| d * d * w)
            .sum();
        Ok(0.5 * sum)
    }
}

impl GradientErrorMeasure for SumOfWeightedSquaresError {
    fn gradient(&self, output: &Instance, example: &Instance) -> Result<Vec<f64>, Error> {
        let label = label_of(output, example)?;
        let multiplier = Self::class_multiplier(label);
        Ok(weighted_differences(output, label, example.weight, multiplier)
            .map(|(d, w)| d * w)
            .collect())
    }
}

/// 配置文件中可选的误差度量
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasureConfig {
    #[default]
    SumOfSquares,
    SumOfWeightedSquares,
}

/// 按配置选择误差度量，评价函数对具体类型无感
#[derive(Debug, Clone, Copy)]
pub enum Measure {
    SumOfSquares(SumOfSquaresError),
    SumOfWeightedSquares(SumOfWeightedSquaresError),
}

impl From<MeasureConfig> for Measure {
    fn from(config: MeasureConfig) -> Self {
        match config {
            MeasureConfig::SumOfSquares => Measure::SumOfSquares(SumOfSquaresError),
            MeasureConfig::SumOfWeightedSquares => {
                Measure::SumOfWeightedSquares(SumOfWeightedSquaresError)
            }
        }
    }
}

impl ErrorMeasure for Measure {
    fn value(&self, output: &Instance, example: &Instance) -> Result<f64, Error> {
        match self {
            Measure::SumOfSquares(measure) => measure.value(output, example),
            Measure::SumOfWeightedSquares(measure) => measure.value(output, example),
        }
    }
}

impl GradientErrorMeasure for Measure {
    fn gradient(&self, output: &Instance, example: &Instance) -> Result<Vec<f64>, Error> {
        match self {
            Measure::SumOfSquares(measure) => measure.gradient(output, example),
            Measure::SumOfWeightedSquares(measure) => measure.gradient(output, example),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn example(label: Vec<f64>, weight: f64) -> Instance {
        let mut example = Instance::with_label(vec![], Instance::new(label));
        example.weight = weight;
        example
    }

    fn check_gradient<M: GradientErrorMeasure>(measure: &M, output: &Instance, example: &Instance) {
        let gradient = measure.gradient(output, example).unwrap();
        let step = 1e-6;
        for i in 0..output.size() {
            let mut plus = output.clone();
            plus.data[i] += step;
            let mut minus = output.clone();
            minus.data[i] -= step;
            let numeric = (measure.value(&plus, example).unwrap()
                - measure.value(&minus, example).unwrap())
                / (2.0 * step);
            assert!(
                (numeric - gradient[i]).abs() < 1e-6 * (1.0 + numeric.abs()),
                "分量 {i}：数值导数 {numeric}，解析导数 {}",
                gradient[i]
            );
        }
    }

    #[test]
    fn gradients_match_central_differences() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let size = rng.random_range(2..12);
            let class = rng.random_range(0..size);
            let output = Instance::new((0..size).map(|_| rng.random_range(-1.0..2.0)).collect());
            let mut label = vec![0.0; size];
            label[class] = 1.0;
            let example = example(label, rng.random_range(0.1..3.0));
            check_gradient(&SumOfSquaresError, &output, &example);
            check_gradient(&SumOfWeightedSquaresError, &output, &example);
            let value = SumOfSquaresError.value(&output, &example).unwrap();
            assert!(value >= 0.0);
            let value = SumOfWeightedSquaresError.value(&output, &example).unwrap();
            assert!(value >= 0.0);
        }
    }

    #[test]
    fn weighted_error_scales_true_class() {
        let output = Instance::new(vec![0.5, 0.5, 0.0, 0.0]);
        let example = example(vec![1.0, 0.0, 0.0, 0.0], 1.0);
        // 0.5 · (0.25 · 3 + 0.25)
        let value = SumOfWeightedSquaresError.value(&output, &example).unwrap();
        assert!((value - 0.5).abs() < 1e-12);
        let plain = SumOfSquaresError.value(&output, &example).unwrap();
        assert!((plain - 0.25).abs() < 1e-12);
        let gradient = SumOfWeightedSquaresError.gradient(&output, &example).unwrap();
        assert_eq!(gradient, vec![-1.5, 0.5, 0.0, 0.0]);
    }

    #[test]
    fn value_is_zero_only_on_exact_match() {
        let label = vec![0.0, 1.0, 0.0];
        let example = example(label.clone(), 2.0);
        let exact = Instance::new(label);
        assert_eq!(SumOfSquaresError.value(&exact, &example).unwrap(), 0.0);
        assert_eq!(SumOfWeightedSquaresError.value(&exact, &example).unwrap(), 0.0);
        let near = Instance::new(vec![0.0, 1.0, 1e-3]);
        assert!(SumOfSquaresError.value(&near, &example).unwrap() > 0.0);
        assert!(SumOfWeightedSquaresError.value(&near, &example).unwrap() > 0.0);
    }

    #[test]
    fn single_feature_label_still_counts() {
        let example = example(vec![1.0], 1.0);
        let output = Instance::new(vec![0.0]);
        assert_eq!(SumOfWeightedSquaresError.value(&output, &example).unwrap(), 0.5);
    }

    #[test]
    fn mismatched_label_is_rejected() {
        let output = Instance::new(vec![0.0, 1.0]);
        let three = example(vec![0.0, 1.0, 0.0], 1.0);
        assert!(matches!(
            SumOfSquaresError.value(&output, &three),
            Err(Error::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        ));
        let unlabeled = Instance::new(vec![0.0, 1.0]);
        assert!(SumOfWeightedSquaresError.gradient(&output, &unlabeled).is_err());
    }

    #[test]
    fn configured_measure_dispatches() {
        let output = Instance::new(vec![0.5, 0.5, 0.0, 0.0]);
        let example = example(vec![1.0, 0.0, 0.0, 0.0], 1.0);
        let weighted = Measure::from(MeasureConfig::SumOfWeightedSquares);
        let plain = Measure::from(MeasureConfig::default());
        assert!((weighted.value(&output, &example).unwrap() - 0.5).abs() < 1e-12);
        assert!((plain.value(&output, &example).unwrap() - 0.25).abs() < 1e-12);
    }
}
