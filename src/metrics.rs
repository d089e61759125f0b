// 各个实验的评测指标，以及它们输出到命令行的方式

use crate::instance::{DataSet, Instance};
use crate::network::NeuralNetwork;
use crate::objectives::measures::ErrorMeasure;
use crate::Error;
use serde::Serialize;
use std::fmt::Display;
use web_time::Instant;

/// 网络在留出集上的表现
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ClassificationMetric {
    pub instances: usize,
    /// 与标签相差不超过 0.5 的输出分量占比
    pub output_accuracy: f64,
    /// 最大激活的输出恰为标签类别的样本占比
    pub instance_accuracy: f64,
    pub error: f64,
    pub training_seconds: f64,
    pub testing_seconds: f64,
}

impl ClassificationMetric {
    /// 用网络当前的权重在 `examples` 上测试
    pub fn evaluate<N: NeuralNetwork, M: ErrorMeasure>(
        network: &mut N,
        examples: &DataSet,
        measure: &M,
        training_seconds: f64,
    ) -> Result<Self, Error> {
        let start = Instant::now();
        let mut correct_outputs = 0;
        let mut total_outputs = 0;
        let mut correct_instances = 0;
        let mut error = 0.0;
        for example in examples {
            let label = example.label().ok_or(Error::DimensionMismatch {
                expected: network.output_values().len(),
                actual: 0,
            })?;
            network.set_input_values(&example.data)?;
            network.run();
            let output = Instance::new(network.output_values().to_vec());
            error += measure.value(&output, example)?;
            total_outputs += output.size();
            correct_outputs += output
                .data
                .iter()
                .zip(&label.data)
                .filter(|(o, l)| (*o - *l).abs() <= 0.5)
                .count();
            if label.class_index() == Some(network.greatest_activation_index()) {
                correct_instances += 1;
            }
        }
        let ratio = |a: usize, b: usize| if b == 0 { 0.0 } else { a as f64 / b as f64 };
        Ok(Self {
            instances: examples.len(),
            output_accuracy: ratio(correct_outputs, total_outputs),
            instance_accuracy: ratio(correct_instances, examples.len()),
            error,
            training_seconds,
            testing_seconds: start.elapsed().as_secs_f64(),
        })
    }
}

impl Display for ClassificationMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "测试样本：{}；输出分量正确率：{:.2}%；样本正确率：{:.2}%；误差：{:.4}；训练用时：{:.3} 秒；测试用时：{:.3} 秒",
            self.instances,
            self.output_accuracy * 100.0,
            self.instance_accuracy * 100.0,
            self.error,
            self.training_seconds,
            self.testing_seconds
        )
    }
}

/// 旅行商路线的表现
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TourMetric {
    pub fitness: f64,
    pub length: f64,
    pub training_seconds: f64,
    /// 依次访问的城市
    pub tour: Vec<usize>,
}

impl Display for TourMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "适应度：{:.6}；路线长度：{:.4}；训练用时：{:.3} 秒",
            self.fitness, self.length, self.training_seconds
        )
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Metric {
    Classification(ClassificationMetric),
    Tour(TourMetric),
}

impl Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Metric::Classification(metric) => metric.fmt(f),
            Metric::Tour(metric) => metric.fmt(f),
        }
    }
}

impl From<ClassificationMetric> for Metric {
    fn from(metric: ClassificationMetric) -> Self {
        Metric::Classification(metric)
    }
}

impl From<TourMetric> for Metric {
    fn from(metric: TourMetric) -> Self {
        Metric::Tour(metric)
    }
}
