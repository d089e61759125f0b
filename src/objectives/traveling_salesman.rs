//! 旅行商问题的两种编码下的评价函数
//!
//! 路线编码直接把访问顺序存为一个排列；排序编码为每个城市存一个排序键，按键值稳定排序后得到访问顺序。两者的适应度都是路线总长度的倒数。
//!

use super::EvaluationFunction;
use crate::instance::Instance;
use crate::Error;
use csv::ReaderBuilder;
use itertools::Itertools;
use rand::{Rng, RngCore};
use std::path::Path;
use tracing::debug;

/// 城市坐标
pub type Point = [f64; 2];

/// 退化路线（总长度为零）的适应度
pub const DEGENERATE_FITNESS: f64 = f64::MAX;

/// 两种编码共用的距离计算
#[derive(Debug, Clone)]
pub struct TravelingSalesmanEvaluationFunction {
    points: Vec<Point>,
}

impl TravelingSalesmanEvaluationFunction {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn cities(&self) -> usize {
        self.points.len()
    }

    pub fn distance(&self, a: usize, b: usize) -> f64 {
        let [x1, y1] = self.points[a];
        let [x2, y2] = self.points[b];
        (x1 - x2).hypot(y1 - y2)
    }

    /// 按顺序经过全部城市并回到起点的总长度
    pub fn tour_length(&self, order: &[usize]) -> Result<f64, Error> {
        if order.len() != self.points.len() {
            return Err(Error::DimensionMismatch {
                expected: self.points.len(),
                actual: order.len(),
            });
        }
        let length: f64 = order
            .iter()
            .copied()
            .circular_tuple_windows::<(usize, usize)>()
            .map(|(a, b)| self.distance(a, b))
            .sum();
        if length > 0.0 {
            Ok(length)
        } else {
            Err(Error::DegenerateTour)
        }
    }

    /// 路线长度的倒数；退化路线取 [`DEGENERATE_FITNESS`]
    pub fn fitness(&self, order: &[usize]) -> Result<f64, Error> {
        match self.tour_length(order) {
            Ok(length) => Ok(1.0 / length),
            Err(Error::DegenerateTour) => {
                debug!("路线 {order:?} 的总长度为零");
                Ok(DEGENERATE_FITNESS)
            }
            Err(error) => Err(error),
        }
    }
}

/// 在单位正方形内均匀生成城市
pub fn random_points(cities: usize, rng: &mut dyn RngCore) -> Vec<Point> {
    (0..cities)
        .map(|_| [rng.random::<f64>(), rng.random::<f64>()])
        .collect()
}

/// 从制表符分隔的 `x\ty` 文件读取城市坐标
pub fn read_points(path: &Path) -> Result<Vec<Point>, Error> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_path(path)?;
    let mut points = vec![];
    for record in reader.deserialize() {
        let (x, y): (f64, f64) = record?;
        points.push([x, y]);
    }
    Ok(points)
}

/// 把实例解读为城市排列，检查长度、范围和重复
pub fn route_order(instance: &Instance, cities: usize) -> Result<Vec<usize>, Error> {
    if instance.size() != cities {
        return Err(Error::DimensionMismatch {
            expected: cities,
            actual: instance.size(),
        });
    }
    let mut visited = vec![false; cities];
    let mut order = Vec::with_capacity(cities);
    for i in 0..cities {
        let city = instance.discrete(i);
        if city < 0 || city as usize >= cities {
            return Err(Error::InvalidEncoding(format!("城市编号 {city} 超出范围")));
        }
        let city = city as usize;
        if visited[city] {
            return Err(Error::InvalidEncoding(format!("城市 {city} 重复出现")));
        }
        visited[city] = true;
        order.push(city);
    }
    Ok(order)
}

/// 按排序键对城市下标稳定排序，键相等时保持原下标顺序
pub fn sort_order(keys: &[f64]) -> Vec<usize> {
    (0..keys.len())
        .sorted_by(|&a, &b| keys[a].total_cmp(&keys[b]))
        .collect()
}

/// 路线编码
#[derive(Debug, Clone)]
pub struct TravelingSalesmanRouteEvaluationFunction {
    tsp: TravelingSalesmanEvaluationFunction,
}

impl TravelingSalesmanRouteEvaluationFunction {
    pub fn new(points: Vec<Point>) -> Self {
        Self {
            tsp: TravelingSalesmanEvaluationFunction::new(points),
        }
    }

    pub fn tsp(&self) -> &TravelingSalesmanEvaluationFunction {
        &self.tsp
    }
}

impl EvaluationFunction for TravelingSalesmanRouteEvaluationFunction {
    fn value(&mut self, instance: &Instance) -> Result<f64, Error> {
        let order = route_order(instance, self.tsp.cities())?;
        self.tsp.fitness(&order)
    }
}

/// 排序编码
#[derive(Debug, Clone)]
pub struct TravelingSalesmanSortEvaluationFunction {
    tsp: TravelingSalesmanEvaluationFunction,
}

impl TravelingSalesmanSortEvaluationFunction {
    pub fn new(points: Vec<Point>) -> Self {
        Self {
            tsp: TravelingSalesmanEvaluationFunction::new(points),
        }
    }

    pub fn tsp(&self) -> &TravelingSalesmanEvaluationFunction {
        &self.tsp
    }
}

impl EvaluationFunction for TravelingSalesmanSortEvaluationFunction {
    fn value(&mut self, instance: &Instance) -> Result<f64, Error> {
        if instance.size() != self.tsp.cities() {
            return Err(Error::DimensionMismatch {
                expected: self.tsp.cities(),
                actual: instance.size(),
            });
        }
        self.tsp.fitness(&sort_order(&instance.data))
    }
}
