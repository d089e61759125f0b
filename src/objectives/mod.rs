//! 评价函数接口，以及网络权重和旅行商路线两类评价函数的实现
//!
//! 所有评价函数的值都是越大越好。
//!

use crate::instance::Instance;
use crate::Error;
pub mod measures;
pub mod neural_network;
pub mod traveling_salesman;

pub trait EvaluationFunction {
    /// 计算一个候选解的适应度
    fn value(&mut self, instance: &Instance) -> Result<f64, Error>;
}

impl<E: EvaluationFunction + ?Sized> EvaluationFunction for &mut E {
    fn value(&mut self, instance: &Instance) -> Result<f64, Error> {
        (**self).value(instance)
    }
}

impl<E: EvaluationFunction + ?Sized> EvaluationFunction for Box<E> {
    fn value(&mut self, instance: &Instance) -> Result<f64, Error> {
        (**self).value(instance)
    }
}
