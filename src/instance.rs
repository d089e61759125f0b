//! 候选解与数据集的表示
//!
//! 所有编码（网络权重、路线排列、排序键）都用同一个 [`Instance`] 表示：一组实数特征，外加可选的标签和权重。
//!

use crate::Error;
use std::ops::Index;
use std::slice::Iter;

/// 一个候选解或一个样本
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    pub data: Vec<f64>,
    pub label: Option<Box<Instance>>,
    pub weight: f64,
}

impl Instance {
    const fn default_weight() -> f64 {
        1.0
    }

    pub fn new(data: Vec<f64>) -> Self {
        Self {
            data,
            label: None,
            weight: Self::default_weight(),
        }
    }

    pub fn with_label(data: Vec<f64>, label: Instance) -> Self {
        Self {
            data,
            label: Some(Box::new(label)),
            weight: Self::default_weight(),
        }
    }

    /// 从一组整数构造，用于排列和离散向量
    pub fn from_discrete<I: IntoIterator<Item = usize>>(values: I) -> Self {
        Self::new(values.into_iter().map(|x| x as f64).collect())
    }

    /// 长度为 `classes` 的独热向量，`index` 处为 1
    pub fn one_hot(classes: usize, index: usize) -> Self {
        let mut data = vec![0.0; classes];
        data[index] = 1.0;
        Self::new(data)
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn continuous(&self, index: usize) -> f64 {
        self.data[index]
    }

    /// 把第 `index` 个特征四舍五入到整数
    pub fn discrete(&self, index: usize) -> i64 {
        self.data[index].round() as i64
    }

    pub fn label(&self) -> Option<&Instance> {
        self.label.as_deref()
    }

    /// 用搜索得到的新向量替换数据，长度必须不变
    pub fn assign(&mut self, data: Vec<f64>) -> Result<(), Error> {
        if data.len() != self.data.len() {
            return Err(Error::DimensionMismatch {
                expected: self.data.len(),
                actual: data.len(),
            });
        }
        self.data = data;
        Ok(())
    }

    /// 独热标签中取值为 1 的下标
    pub fn class_index(&self) -> Option<usize> {
        (0..self.size()).find(|&i| self.discrete(i) == 1)
    }
}

/// 一组按顺序排列的样本，载入后不再改变
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSet {
    instances: Vec<Instance>,
}

impl DataSet {
    pub fn new(instances: Vec<Instance>) -> Self {
        Self { instances }
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, Instance> {
        self.instances.iter()
    }
}

impl From<Vec<Instance>> for DataSet {
    fn from(instances: Vec<Instance>) -> Self {
        Self::new(instances)
    }
}

impl Index<usize> for DataSet {
    type Output = Instance;

    fn index(&self, index: usize) -> &Self::Output {
        &self.instances[index]
    }
}

impl<'a> IntoIterator for &'a DataSet {
    type Item = &'a Instance;
    type IntoIter = Iter<'a, Instance>;

    fn into_iter(self) -> Self::IntoIter {
        self.instances.iter()
    }
}
