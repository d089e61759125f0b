//! randopt 是使用 Rust 实现的随机化优化算法框架。同一套搜索算法（随机爬山、退火、遗传算法、MIMIC）通过能力接口作用于不同的编码：神经网络的权重向量、旅行商问题的路线排列和排序键。
//!
//! randopt 同时是一个命令行程序，用户提供 YAML 配置文件，本程序载入 IDX 格式的手写数字语料或一组城市坐标，运行配置中的各个优化方法并报告评测指标。

pub mod config;
pub mod data;
pub mod distributions;
pub mod error;
pub mod experiments;
pub mod instance;
pub mod interfaces;
pub mod metrics;
pub mod network;
pub mod objectives;
pub mod operators;
pub mod optimizers;
pub mod problems;
pub mod trainer;

pub use error::Error;
pub use instance::{DataSet, Instance};
pub use interfaces::command_line::{Command, CommandLine, CommandLineArgs};
pub use interfaces::{Interface, Message};
