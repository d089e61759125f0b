use std::path::PathBuf;
use thiserror::Error as ThisError;

/// 错误类型
///
/// 语料读取、维度不一致等错误都是致命的，直接向上传播；退化路线是唯一可以恢复的情况，由路线评价函数自行处理。
#[derive(Debug, ThisError)]
pub enum Error {
    #[error("无法读取文件 {}：{source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("读取语料失败：{0}")]
    Io(#[from] std::io::Error),
    #[error("语料在读取{section}时提前结束")]
    CorpusTruncated { section: &'static str },
    #[error("语料头部的{field}不合法：{value}")]
    InvalidHeader { field: &'static str, value: i64 },
    #[error("第 {index} 个标签的取值 {value} 超出范围")]
    InvalidLabel { index: usize, value: u8 },
    #[error("维度不一致：期望 {expected}，实际 {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("编码不合法：{0}")]
    InvalidEncoding(String),
    #[error("路线总长度为零")]
    DegenerateTour,
    #[error("配置错误：{0}")]
    Config(String),
    #[error("{0}")]
    Message(String),
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Self::Message(value.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(value: serde_yaml::Error) -> Self {
        Self::Config(value.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Self::Config(value.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        Self::Message(format!("读取表格失败：{value}"))
    }
}
