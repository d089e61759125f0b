//! 按固定步数驱动优化方法
//!

use crate::interfaces::{Interface, Message};
use crate::optimizers::OptimizationAlgorithm;
use crate::Error;
use tracing::info;
use web_time::Instant;

pub struct FixedIterationTrainer<'a, A: OptimizationAlgorithm + ?Sized> {
    algorithm: &'a mut A,
    iterations: usize,
}

impl<'a, A: OptimizationAlgorithm + ?Sized> FixedIterationTrainer<'a, A> {
    pub fn new(algorithm: &'a mut A, iterations: usize) -> Self {
        Self {
            algorithm,
            iterations,
        }
    }

    /// 执行全部步数，返回每一步返回值的平均
    pub fn train(&mut self) -> Result<f64, Error> {
        self.train_with(|_, _| {})
    }

    /// 同 [`Self::train`]，每一步之后用步数（从 1 开始）和返回值调用 `step`
    pub fn train_with(&mut self, mut step: impl FnMut(usize, f64)) -> Result<f64, Error> {
        if self.iterations == 0 {
            return Ok(0.0);
        }
        let mut sum = 0.0;
        for iteration in 1..=self.iterations {
            let value = self.algorithm.train()?;
            sum += value;
            step(iteration, value);
        }
        Ok(sum / self.iterations as f64)
    }
}

/// 一次训练的结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingReport {
    pub mean: f64,
    pub seconds: f64,
}

/// 训练并向界面报告进度；`report_interval` 为零时不报告中间进度
pub fn run_trainer<A: OptimizationAlgorithm + ?Sized>(
    name: &str,
    algorithm: &mut A,
    iterations: usize,
    report_interval: usize,
    interface: &dyn Interface,
) -> Result<TrainingReport, Error> {
    interface.post(Message::TrainingStarted {
        name: name.to_string(),
        iterations,
    });
    let start = Instant::now();
    let mut trainer = FixedIterationTrainer::new(algorithm, iterations);
    let mean = trainer.train_with(|iteration, value| {
        if report_interval > 0 && iteration % report_interval == 0 {
            interface.post(Message::Progress {
                name: name.to_string(),
                iteration,
                value,
            });
        }
    })?;
    let seconds = start.elapsed().as_secs_f64();
    info!("{name} 训练完成，用时 {seconds:.3} 秒");
    interface.post(Message::Trained {
        name: name.to_string(),
        seconds,
        mean,
    });
    Ok(TrainingReport { mean, seconds })
}
