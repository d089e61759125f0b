use crate::metrics::Metric;
use serde::Serialize;
use serde_with::skip_serializing_none;

pub mod command_line;

/// 向用户反馈的消息类型
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    TrainingStarted {
        name: String,
        iterations: usize,
    },
    Progress {
        name: String,
        iteration: usize,
        value: f64,
    },
    Trained {
        name: String,
        seconds: f64,
        mean: f64,
    },
    Tested {
        name: String,
        metric: Metric,
    },
    Failed {
        name: String,
        reason: String,
    },
}

/// 定义了向用户报告消息的接口
///
/// 多个优化方法可能在不同线程中同时报告，所以要求实现者可以跨线程共享。
pub trait Interface: Sync {
    fn post(&self, message: Message);
}

/// 把消息收集起来，便于检查
#[derive(Debug, Default)]
pub struct Recorder {
    messages: std::sync::Mutex<Vec<Message>>,
}

impl Recorder {
    pub fn messages(&self) -> Vec<Message> {
        match self.messages.lock() {
            Ok(messages) => messages.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Interface for Recorder {
    fn post(&self, message: Message) {
        match self.messages.lock() {
            Ok(mut messages) => messages.push(message),
            Err(poisoned) => poisoned.into_inner().push(message),
        }
    }
}
