//! 网络权重的评价函数
//!

use super::measures::ErrorMeasure;
use super::EvaluationFunction;
use crate::instance::{DataSet, Instance};
use crate::network::NeuralNetwork;
use crate::Error;

/// 把候选权重装入网络，在全部训练样本上累加误差，返回误差的相反数
///
/// 网络和数据集都是借用的；网络只在 `value` 调用内部被修改。
pub struct NeuralNetworkEvaluationFunction<'a, N: NeuralNetwork, M: ErrorMeasure> {
    network: &'a mut N,
    examples: &'a DataSet,
    measure: M,
}

impl<'a, N: NeuralNetwork, M: ErrorMeasure> NeuralNetworkEvaluationFunction<'a, N, M> {
    pub fn new(network: &'a mut N, examples: &'a DataSet, measure: M) -> Self {
        Self {
            network,
            examples,
            measure,
        }
    }

    pub fn weight_count(&self) -> usize {
        self.network.weight_count()
    }

    /// 当前网络权重下，全部样本的误差之和
    pub fn total_error(&mut self) -> Result<f64, Error> {
        let mut error = 0.0;
        for example in self.examples {
            self.network.set_input_values(&example.data)?;
            self.network.run();
            let output = Instance::new(self.network.output_values().to_vec());
            error += self.measure.value(&output, example)?;
        }
        Ok(error)
    }
}

impl<N: NeuralNetwork, M: ErrorMeasure> EvaluationFunction
    for NeuralNetworkEvaluationFunction<'_, N, M>
{
    fn value(&mut self, instance: &Instance) -> Result<f64, Error> {
        self.network.set_weights(&instance.data)?;
        Ok(-self.total_error()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::FeedForwardNetwork;
    use crate::objectives::measures::{SumOfSquaresError, SumOfWeightedSquaresError};

    fn examples() -> DataSet {
        DataSet::new(vec![
            Instance::with_label(vec![1.0, 0.0], Instance::one_hot(2, 0)),
            Instance::with_label(vec![0.0, 1.0], Instance::one_hot(2, 1)),
        ])
    }

    #[test]
    fn fitness_is_negated_total_error() {
        let examples = examples();
        let mut network = FeedForwardNetwork::classification(&[2, 2]).unwrap();
        let weights = Instance::new(vec![0.0; network.weight_count()]);
        let mut function =
            NeuralNetworkEvaluationFunction::new(&mut network, &examples, SumOfSquaresError);
        // 权重全为零时 softmax 输出恒为 (0.5, 0.5)，每个样本误差 0.5 · (0.25 + 0.25)
        let fitness = function.value(&weights).unwrap();
        assert!((fitness + 0.5).abs() < 1e-12);
    }

    #[test]
    fn better_weights_score_higher() {
        let examples = examples();
        let mut network = FeedForwardNetwork::classification(&[2, 2]).unwrap();
        let mut function = NeuralNetworkEvaluationFunction::new(
            &mut network,
            &examples,
            SumOfWeightedSquaresError,
        );
        let zero = Instance::new(vec![0.0; 6]);
        // 第 i 个输出节点只响应第 i 个输入
        let diagonal = Instance::new(vec![4.0, 0.0, 0.0, 0.0, 4.0, 0.0]);
        let wrong = Instance::new(vec![0.0, 4.0, 0.0, 4.0, 0.0, 0.0]);
        let zero = function.value(&zero).unwrap();
        let diagonal = function.value(&diagonal).unwrap();
        let wrong = function.value(&wrong).unwrap();
        assert!(diagonal > zero);
        assert!(zero > wrong);
        assert!(diagonal <= 0.0);
    }

    #[test]
    fn wrong_weight_count_is_rejected() {
        let examples = examples();
        let mut network = FeedForwardNetwork::classification(&[2, 2]).unwrap();
        let mut function =
            NeuralNetworkEvaluationFunction::new(&mut network, &examples, SumOfSquaresError);
        assert!(matches!(
            function.value(&Instance::new(vec![0.0; 5])),
            Err(Error::DimensionMismatch { .. })
        ));
    }
}
