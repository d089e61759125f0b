//! 用随机化优化方法训练手写数字分类网络
//!

use super::{Experiment, Run};
use crate::config::{MnistConfig, SolverConfig};
use crate::data::{label_histogram, load_files, read_headers, LABEL_CLASSES};
use crate::instance::DataSet;
use crate::metrics::{ClassificationMetric, Metric};
use crate::network::{FeedForwardNetwork, NeuralNetwork};
use crate::objectives::measures::Measure;
use crate::optimizers::{RandomizedHillClimbing, SimulatedAnnealing, StandardGeneticAlgorithm};
use crate::problems::NeuralNetworkOptimizationProblem;
use crate::Error;
use tracing::info;

pub struct MnistExperiment {
    train: DataSet,
    test: DataSet,
    hidden_layer: usize,
    measure: Measure,
}

impl MnistExperiment {
    pub fn load(config: &MnistConfig) -> Result<Self, Error> {
        let train = load_files(&config.train_images, &config.train_labels, config.train_limit)?;
        let test = load_files(&config.test_images, &config.test_labels, config.test_limit)?;
        Ok(Self::new(
            train,
            test,
            config.hidden_layer(),
            config.error_measure.unwrap_or_default().into(),
        ))
    }

    pub fn new(train: DataSet, test: DataSet, hidden_layer: usize, measure: Measure) -> Self {
        Self {
            train,
            test,
            hidden_layer,
            measure,
        }
    }

    /// 输入层、隐藏层、输出层的节点数
    pub fn topology(&self) -> Result<[usize; 3], Error> {
        let features = self
            .train
            .iter()
            .next()
            .map(|x| x.size())
            .ok_or_else(|| Error::Config("训练集为空".into()))?;
        Ok([features, self.hidden_layer, LABEL_CLASSES])
    }
}

impl Experiment for MnistExperiment {
    fn run(&self, run: &Run) -> Result<Metric, Error> {
        // 每个优化方法使用自己的网络
        let mut network = FeedForwardNetwork::classification(&self.topology()?)?;
        let (optimal, report) = {
            let problem =
                NeuralNetworkOptimizationProblem::new(&mut network, &self.train, self.measure);
            match run.algorithm.solver {
                SolverConfig::RandomizedHillClimbing => {
                    run.train(RandomizedHillClimbing::new(problem, run.seed)?)?
                }
                SolverConfig::SimulatedAnnealing {
                    temperature,
                    cooling,
                } => run.train(SimulatedAnnealing::new(
                    problem,
                    temperature,
                    cooling,
                    run.seed,
                )?)?,
                SolverConfig::Genetic {
                    population_size,
                    to_mate,
                    to_mutate,
                } => run.train(StandardGeneticAlgorithm::new(
                    problem,
                    population_size,
                    to_mate,
                    to_mutate,
                    run.seed,
                )?)?,
                SolverConfig::Mimic { .. } => {
                    return Err(Error::Config("网络权重是连续编码，不能用 MIMIC 优化".into()))
                }
            }
        };
        network.set_weights(&optimal.data)?;
        let metric =
            ClassificationMetric::evaluate(&mut network, &self.test, &self.measure, report.seconds)?;
        Ok(metric.into())
    }
}

/// 报告训练集和测试集的样本数、尺寸与类别分布
pub fn inspect(config: &MnistConfig) -> Result<(), Error> {
    for (kind, images, labels, limit) in [
        ("训练集", &config.train_images, &config.train_labels, config.train_limit),
        ("测试集", &config.test_images, &config.test_labels, config.test_limit),
    ] {
        let (image_header, label_header) = read_headers(images, labels)?;
        info!(
            "{kind}：{} 张 {}×{} 的图像，{} 个标签",
            image_header.count, image_header.rows, image_header.columns, label_header.count
        );
        let dataset = load_files(images, labels, limit)?;
        info!("{kind}类别分布：{:?}", label_histogram(&dataset));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AlgorithmConfig;
    use crate::instance::Instance;
    use crate::interfaces::Recorder;
    use crate::objectives::measures::MeasureConfig;

    fn dataset() -> DataSet {
        DataSet::new(
            (0..LABEL_CLASSES)
                .map(|class| {
                    let mut data = vec![0.0; 4];
                    data[class % 4] = 1.0;
                    Instance::with_label(data, Instance::one_hot(LABEL_CLASSES, class))
                })
                .collect(),
        )
    }

    fn experiment() -> MnistExperiment {
        let measure = Measure::from(MeasureConfig::SumOfSquares);
        MnistExperiment::new(dataset(), dataset(), 3, measure)
    }

    fn run_with(experiment: &MnistExperiment, solver: SolverConfig) -> Result<Metric, Error> {
        let algorithm = AlgorithmConfig {
            name: None,
            iterations: 20,
            solver,
        };
        let recorder = Recorder::default();
        experiment.run(&Run {
            index: 0,
            name: "test",
            algorithm: &algorithm,
            seed: Some(1),
            report_interval: 0,
            interface: &recorder,
        })
    }

    #[test]
    fn trains_and_tests_network() {
        let experiment = experiment();
        assert_eq!(experiment.topology().unwrap(), [4, 3, 10]);
        let metric = run_with(&experiment, SolverConfig::RandomizedHillClimbing).unwrap();
        let Metric::Classification(metric) = metric else {
            panic!("应为分类指标");
        };
        assert_eq!(metric.instances, LABEL_CLASSES);
        assert!((0.0..=1.0).contains(&metric.instance_accuracy));
        assert!(metric.error > 0.0);
    }

    #[test]
    fn mimic_is_rejected() {
        let experiment = experiment();
        let mimic = SolverConfig::Mimic {
            samples: 10,
            to_keep: 5,
            mix: None,
        };
        assert!(matches!(run_with(&experiment, mimic), Err(Error::Config(_))));
    }
}
