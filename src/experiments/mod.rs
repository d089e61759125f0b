//! 实验：载入数据、按配置构造优化方法并逐个训练和测试
//!
//! 每个优化方法的失败只影响它自己，其余方法照常运行。
//!

use crate::config::{AlgorithmConfig, Config, ExperimentConfig};
use crate::instance::Instance;
use crate::interfaces::{Interface, Message};
use crate::metrics::Metric;
use crate::optimizers::OptimizationAlgorithm;
use crate::trainer::{run_trainer, TrainingReport};
use crate::Error;
use serde::Serialize;
use serde_with::skip_serializing_none;
use std::thread;
use tracing::{error, info};

pub mod mnist;
pub mod traveling_salesman;

pub use mnist::MnistExperiment;
pub use traveling_salesman::TravelingSalesmanExperiment;

/// 一个优化方法的最终结果
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    pub name: String,
    pub metric: Option<Metric>,
    pub error: Option<String>,
}

/// 运行一个优化方法所需的上下文
#[derive(Clone, Copy)]
pub struct Run<'a> {
    pub index: usize,
    pub name: &'a str,
    pub algorithm: &'a AlgorithmConfig,
    pub seed: Option<u64>,
    pub report_interval: usize,
    pub interface: &'a dyn Interface,
}

impl Run<'_> {
    /// 训练完毕后取出最优解
    pub fn train<A: OptimizationAlgorithm>(
        &self,
        mut algorithm: A,
    ) -> Result<(Instance, TrainingReport), Error> {
        let report = run_trainer(
            self.name,
            &mut algorithm,
            self.algorithm.iterations,
            self.report_interval,
            self.interface,
        )?;
        Ok((algorithm.optimal().clone(), report))
    }
}

pub trait Experiment: Sync {
    fn run(&self, run: &Run) -> Result<Metric, Error>;
}

/// 载入配置中的实验并运行全部优化方法
pub fn optimize(config: &Config, interface: &dyn Interface) -> Result<Vec<Outcome>, Error> {
    match &config.experiment {
        ExperimentConfig::Mnist(mnist) => {
            let experiment = MnistExperiment::load(mnist)?;
            Ok(run_all(config, &experiment, interface))
        }
        ExperimentConfig::TravelingSalesman(tsp) => {
            let experiment = TravelingSalesmanExperiment::new(tsp, config.seed)?;
            Ok(run_all(config, &experiment, interface))
        }
    }
}

/// 依次或在多个线程中运行每个优化方法
///
/// 第 `i` 个方法使用种子 `seed + i`，所以并行与否不影响结果。
pub fn run_all<E: Experiment>(config: &Config, experiment: &E, interface: &dyn Interface) -> Vec<Outcome> {
    let names: Vec<String> = config
        .algorithms
        .iter()
        .enumerate()
        .map(|(index, algorithm)| algorithm.name(index))
        .collect();
    let run_one = |index: usize| {
        let run = Run {
            index,
            name: &names[index],
            algorithm: &config.algorithms[index],
            seed: config.seed.map(|seed| seed.wrapping_add(index as u64)),
            report_interval: config.report_interval(),
            interface,
        };
        info!("开始运行 {}", run.name);
        experiment.run(&run)
    };
    let run_one = &run_one;
    let results: Vec<Result<Metric, Error>> = if config.parallel() {
        thread::scope(|scope| {
            let handles: Vec<_> = (0..names.len())
                .map(|index| scope.spawn(move || run_one(index)))
                .collect();
            handles
                .into_iter()
                .map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|_| Err(Error::Message("线程异常退出".into())))
                })
                .collect()
        })
    } else {
        (0..names.len()).map(run_one).collect()
    };
    names
        .into_iter()
        .zip(results)
        .map(|(name, result)| match result {
            Ok(metric) => {
                interface.post(Message::Tested {
                    name: name.clone(),
                    metric: metric.clone(),
                });
                Outcome {
                    name,
                    metric: Some(metric),
                    error: None,
                }
            }
            Err(reason) => {
                error!("{name} 运行失败：{reason}");
                interface.post(Message::Failed {
                    name: name.clone(),
                    reason: reason.to_string(),
                });
                Outcome {
                    name,
                    metric: None,
                    error: Some(reason.to_string()),
                }
            }
        })
        .collect()
}

/// 载入配置中的数据并报告其概况
pub fn inspect(config: &Config) -> Result<(), Error> {
    match &config.experiment {
        ExperimentConfig::Mnist(mnist) => mnist::inspect(mnist),
        ExperimentConfig::TravelingSalesman(tsp) => {
            let experiment = TravelingSalesmanExperiment::new(tsp, config.seed)?;
            experiment.inspect()
        }
    }
}
