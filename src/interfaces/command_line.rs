use crate::config::Config;
use crate::experiments::Outcome;
use crate::interfaces::{Interface, Message};
use crate::Error;
use chrono::Local;
use clap::{Parser, Subcommand};
use std::fs::{create_dir_all, write};
use std::path::PathBuf;
use tracing::{info, warn};

/// 命令行参数的定义
#[derive(Parser, Clone, Debug)]
#[command(name = "randopt")]
#[command(author, version, about, long_about)]
#[command(propagate_version = true)]
pub struct CommandLineArgs {
    #[command(subcommand)]
    pub command: Command,
    /// 配置文件，默认为 config.yaml
    pub config: Option<PathBuf>,
    /// 随机数种子，覆盖配置文件中的设置
    #[arg(short, long)]
    pub seed: Option<u64>,
    /// 在多个线程中同时运行各个优化方法
    #[arg(short, long)]
    pub parallel: bool,
    /// 输出目录，默认为带时间戳的 output-* 目录
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,
}

/// 命令行中所有可用的子命令
#[derive(Subcommand, Clone, Debug)]
pub enum Command {
    /// 按配置运行全部优化方法并测试结果
    Optimize,
    /// 载入配置中的数据并报告概况
    Inspect,
}

impl CommandLineArgs {
    /// 读取配置文件，再用命令行参数覆盖
    pub fn load_config(&self) -> Result<Config, Error> {
        let path = self
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from("config.yaml"));
        let mut config = Config::load(&path)?;
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.parallel {
            config.parallel = Some(true);
        }
        Ok(config)
    }
}

/// 通过命令行来使用 randopt 的入口，实现了界面特征
pub struct CommandLine {
    output_dir: PathBuf,
}

impl CommandLine {
    pub fn new(maybe_output_dir: Option<PathBuf>) -> Result<Self, Error> {
        let output_dir = maybe_output_dir.unwrap_or_else(|| {
            let time = Local::now().format("%m-%d+%H_%M_%S").to_string();
            PathBuf::from(format!("output-{time}"))
        });
        create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    /// 把全部结果写入输出目录下的 report.yaml
    pub fn write_report(&self, outcomes: &[Outcome]) -> Result<PathBuf, Error> {
        let path = self.output_dir.join("report.yaml");
        write(&path, serde_yaml::to_string(outcomes)?)?;
        info!("结果保存在 {} 中", path.display());
        Ok(path)
    }
}

impl Interface for CommandLine {
    fn post(&self, message: Message) {
        match message {
            Message::TrainingStarted { name, iterations } => {
                info!("{name} 开始训练，共 {iterations} 步")
            }
            Message::Progress {
                name,
                iteration,
                value,
            } => info!("{name} 已执行 {iteration} 步，当前值为 {value:.6}"),
            Message::Trained {
                name,
                seconds,
                mean,
            } => info!("{name} 训练用时 {seconds:.3} 秒，平均值为 {mean:.6}"),
            Message::Tested { name, metric } => info!("{name} 的评测指标如下：{metric}"),
            Message::Failed { name, reason } => warn!("{name} 未能完成：{reason}"),
        }
    }
}
