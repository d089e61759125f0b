//! 网络求值器接口，以及一个只做前向传播的全连接分类网络。
//!
//! 网络的权重从不通过梯度下降更新；权重向量只是另一种候选解，由搜索算法黑盒地优化。
//!

use crate::Error;

/// 评价函数所依赖的网络求值器
pub trait NeuralNetwork {
    /// 网络中全部权重（含偏置）的数量
    fn weight_count(&self) -> usize;

    fn set_weights(&mut self, weights: &[f64]) -> Result<(), Error>;

    fn set_input_values(&mut self, values: &[f64]) -> Result<(), Error>;

    /// 用当前的权重和输入做一次前向传播
    fn run(&mut self);

    fn output_values(&self) -> &[f64];

    /// 输出层中激活值最大的节点
    fn greatest_activation_index(&self) -> usize {
        let outputs = self.output_values();
        (0..outputs.len())
            .max_by(|&a, &b| outputs[a].total_cmp(&outputs[b]))
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Logistic,
    SoftMax,
}

impl Activation {
    fn apply(&self, values: &mut [f64]) {
        match self {
            Activation::Logistic => {
                for x in values.iter_mut() {
                    *x = 1.0 / (1.0 + (-*x).exp());
                }
            }
            Activation::SoftMax => {
                let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                let mut sum = 0.0;
                for x in values.iter_mut() {
                    *x = (*x - max).exp();
                    sum += *x;
                }
                for x in values.iter_mut() {
                    *x /= sum;
                }
            }
        }
    }
}

/// 全连接层，权重按「输出节点 × (输入节点 + 偏置)」排列
#[derive(Debug, Clone)]
struct Layer {
    inputs: usize,
    outputs: usize,
    activation: Activation,
}

impl Layer {
    fn weight_count(&self) -> usize {
        (self.inputs + 1) * self.outputs
    }
}

/// 前馈分类网络：隐藏层用逻辑函数，输出层多于一个节点时用 softmax
#[derive(Debug, Clone)]
pub struct FeedForwardNetwork {
    layers: Vec<Layer>,
    weights: Vec<f64>,
    input: Vec<f64>,
    output: Vec<f64>,
}

impl FeedForwardNetwork {
    /// 按各层节点数构造，例如 `[784, 28, 10]`
    pub fn classification(sizes: &[usize]) -> Result<Self, Error> {
        if sizes.len() < 2 || sizes.contains(&0) {
            return Err(Error::Config(format!("网络结构 {sizes:?} 不合法")));
        }
        let last = sizes.len() - 2;
        let layers: Vec<Layer> = sizes
            .windows(2)
            .enumerate()
            .map(|(index, pair)| {
                let activation = if index < last {
                    Activation::Logistic
                } else if pair[1] > 1 {
                    Activation::SoftMax
                } else {
                    Activation::Logistic
                };
                Layer {
                    inputs: pair[0],
                    outputs: pair[1],
                    activation,
                }
            })
            .collect();
        let weight_count = layers.iter().map(Layer::weight_count).sum();
        Ok(Self {
            layers,
            weights: vec![0.0; weight_count],
            input: vec![0.0; sizes[0]],
            output: vec![0.0; sizes[sizes.len() - 1]],
        })
    }
}

impl NeuralNetwork for FeedForwardNetwork {
    fn weight_count(&self) -> usize {
        self.weights.len()
    }

    fn set_weights(&mut self, weights: &[f64]) -> Result<(), Error> {
        if weights.len() != self.weights.len() {
            return Err(Error::DimensionMismatch {
                expected: self.weights.len(),
                actual: weights.len(),
            });
        }
        self.weights.copy_from_slice(weights);
        Ok(())
    }

    fn set_input_values(&mut self, values: &[f64]) -> Result<(), Error> {
        if values.len() != self.input.len() {
            return Err(Error::DimensionMismatch {
                expected: self.input.len(),
                actual: values.len(),
            });
        }
        self.input.copy_from_slice(values);
        Ok(())
    }

    fn run(&mut self) {
        let mut current = self.input.clone();
        let mut offset = 0;
        for layer in &self.layers {
            let stride = layer.inputs + 1;
            let mut next = vec![0.0; layer.outputs];
            for (node, value) in next.iter_mut().enumerate() {
                let row = &self.weights[offset + node * stride..offset + (node + 1) * stride];
                let bias = row[layer.inputs];
                *value = bias
                    + row[..layer.inputs]
                        .iter()
                        .zip(&current)
                        .map(|(w, x)| w * x)
                        .sum::<f64>();
            }
            layer.activation.apply(&mut next);
            offset += layer.weight_count();
            current = next;
        }
        self.output = current;
    }

    fn output_values(&self) -> &[f64] {
        &self.output
    }
}
