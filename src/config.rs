use crate::objectives::measures::MeasureConfig;
use crate::Error;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MnistConfig {
    pub train_images: PathBuf,
    pub train_labels: PathBuf,
    pub test_images: PathBuf,
    pub test_labels: PathBuf,
    pub train_limit: Option<usize>,
    pub test_limit: Option<usize>,
    pub hidden_layer: Option<usize>,
    pub error_measure: Option<MeasureConfig>,
}

impl MnistConfig {
    pub const DEFAULT_HIDDEN_LAYER: usize = 28;

    pub fn hidden_layer(&self) -> usize {
        self.hidden_layer.unwrap_or(Self::DEFAULT_HIDDEN_LAYER)
    }
}

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelingSalesmanConfig {
    /// 在单位正方形内随机生成的城市数
    pub cities: Option<usize>,
    /// 每行一个 `x<TAB>y` 坐标的城市文件
    pub points: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExperimentConfig {
    Mnist(MnistConfig),
    TravelingSalesman(TravelingSalesmanConfig),
}

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "algorithm")]
pub enum SolverConfig {
    RandomizedHillClimbing,
    SimulatedAnnealing {
        temperature: f64,
        cooling: f64,
    },
    Genetic {
        population_size: usize,
        to_mate: usize,
        to_mutate: usize,
    },
    Mimic {
        samples: usize,
        to_keep: usize,
        mix: Option<f64>,
    },
}

impl SolverConfig {
    pub const DEFAULT_MIX: f64 = 0.1;

    pub fn tag(&self) -> &'static str {
        match self {
            SolverConfig::RandomizedHillClimbing => "RandomizedHillClimbing",
            SolverConfig::SimulatedAnnealing { .. } => "SimulatedAnnealing",
            SolverConfig::Genetic { .. } => "Genetic",
            SolverConfig::Mimic { .. } => "Mimic",
        }
    }
}

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmConfig {
    pub name: Option<String>,
    pub iterations: usize,
    #[serde(flatten)]
    pub solver: SolverConfig,
}

impl AlgorithmConfig {
    /// 未命名时用算法名和序号
    pub fn name(&self, index: usize) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("{}#{index}", self.solver.tag()))
    }
}

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub seed: Option<u64>,
    pub report_interval: Option<usize>,
    pub parallel: Option<bool>,
    pub experiment: ExperimentConfig,
    pub algorithms: Vec<AlgorithmConfig>,
}

impl Config {
    pub const DEFAULT_REPORT_INTERVAL: usize = 100;

    /// 按扩展名读取 JSON 或 YAML 配置，并检查参数
    pub fn load(path: &Path) -> Result<Self, Error> {
        let content = read_to_string(path).map_err(|source| Error::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .is_some_and(|x| x.eq_ignore_ascii_case("json"));
        let config: Config = if is_json {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn report_interval(&self) -> usize {
        self.report_interval.unwrap_or(Self::DEFAULT_REPORT_INTERVAL)
    }

    pub fn parallel(&self) -> bool {
        self.parallel.unwrap_or(false)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.algorithms.is_empty() {
            return Err(Error::Config("至少需要配置一个优化方法".into()));
        }
        match &self.experiment {
            ExperimentConfig::Mnist(mnist) => {
                if mnist.hidden_layer() == 0 {
                    return Err(Error::Config("隐藏层节点数必须为正数".into()));
                }
            }
            ExperimentConfig::TravelingSalesman(tsp) => match (tsp.cities, &tsp.points) {
                (Some(_), Some(_)) | (None, None) => {
                    return Err(Error::Config("cities 和 points 必须恰好提供一个".into()));
                }
                (Some(cities), None) if cities < 2 => {
                    return Err(Error::Config(format!("城市数 {cities} 不足两个")));
                }
                _ => {}
            },
        }
        for (index, algorithm) in self.algorithms.iter().enumerate() {
            let name = algorithm.name(index);
            if algorithm.iterations == 0 {
                return Err(Error::Config(format!("{name} 的步数必须为正数")));
            }
            match algorithm.solver {
                SolverConfig::RandomizedHillClimbing => {}
                SolverConfig::SimulatedAnnealing {
                    temperature,
                    cooling,
                } => {
                    if temperature < 0.0 || !(0.0..=1.0).contains(&cooling) {
                        return Err(Error::Config(format!(
                            "{name} 的温度必须非负，冷却系数必须在 [0, 1] 中"
                        )));
                    }
                }
                SolverConfig::Genetic {
                    population_size,
                    to_mate,
                    ..
                } => {
                    if population_size == 0 || to_mate > population_size {
                        return Err(Error::Config(format!(
                            "{name} 的种群大小必须为正数且不小于每代杂交数"
                        )));
                    }
                }
                SolverConfig::Mimic { samples, to_keep, .. } => {
                    if let ExperimentConfig::Mnist(_) = self.experiment {
                        return Err(Error::Config(format!(
                            "{name}：网络权重是连续编码，不能用 MIMIC 优化"
                        )));
                    }
                    if to_keep == 0 || to_keep > samples {
                        return Err(Error::Config(format!(
                            "{name} 的保留数必须为正数且不超过采样数"
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}
