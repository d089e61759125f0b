//! 读取 IDX 格式的图像和标签语料，转换为带标签的样本。
//!
//! 图像文件的头部是四个大端 32 位整数：幻数、样本数、行数、列数，随后是每个像素一个字节；标签文件的头部是幻数和样本数，随后每个样本一个字节。
//!

use crate::instance::{DataSet, Instance};
use crate::Error;
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;
use tracing::{info, warn};

pub const IMAGE_MAGIC: i32 = 2051;
pub const LABEL_MAGIC: i32 = 2049;
/// 标签类别数，标签字节取值为 0 到 9
pub const LABEL_CLASSES: usize = 10;

fn read_bytes<R: Read>(reader: &mut R, buffer: &mut [u8], section: &'static str) -> Result<(), Error> {
    reader.read_exact(buffer).map_err(|error| match error.kind() {
        ErrorKind::UnexpectedEof => Error::CorpusTruncated { section },
        _ => Error::Io(error),
    })
}

/// 读取恰好 `length` 个字节，不足时为 `CorpusTruncated`
fn read_bounded<R: Read>(
    reader: &mut R,
    length: usize,
    section: &'static str,
) -> Result<Vec<u8>, Error> {
    let mut buffer = vec![];
    reader.take(length as u64).read_to_end(&mut buffer)?;
    if buffer.len() < length {
        return Err(Error::CorpusTruncated { section });
    }
    Ok(buffer)
}

/// 按高位在前的顺序读取 4 个字节并拼成一个 32 位有符号整数
pub fn read_int<R: Read>(reader: &mut R, section: &'static str) -> Result<i32, Error> {
    let mut bytes = [0u8; 4];
    read_bytes(reader, &mut bytes, section)?;
    Ok(i32::from_be_bytes(bytes))
}

fn read_count<R: Read>(reader: &mut R, field: &'static str) -> Result<usize, Error> {
    let value = read_int(reader, field)?;
    if value <= 0 {
        return Err(Error::InvalidHeader {
            field,
            value: value as i64,
        });
    }
    Ok(value as usize)
}

fn check_magic(actual: i32, expected: i32, stream: &str) {
    if actual != expected {
        warn!("{stream}文件的幻数为 {actual}，通常应为 {expected}");
    }
}

/// IDX 图像文件头部
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHeader {
    pub magic: i32,
    pub count: usize,
    pub rows: usize,
    pub columns: usize,
}

impl ImageHeader {
    pub fn read<R: Read>(reader: &mut R) -> Result<Self, Error> {
        let magic = read_int(reader, "图像幻数")?;
        check_magic(magic, IMAGE_MAGIC, "图像");
        let count = read_count(reader, "图像数量")?;
        let rows = read_count(reader, "行数")?;
        let columns = read_count(reader, "列数")?;
        Ok(Self {
            magic,
            count,
            rows,
            columns,
        })
    }

    /// 每张图像的像素数；乘积溢出时头部不合法
    pub fn features(&self) -> Result<usize, Error> {
        self.rows
            .checked_mul(self.columns)
            .ok_or(Error::InvalidHeader {
                field: "像素数",
                value: i64::MAX,
            })
    }
}

/// IDX 标签文件头部
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelHeader {
    pub magic: i32,
    pub count: usize,
}

impl LabelHeader {
    pub fn read<R: Read>(reader: &mut R) -> Result<Self, Error> {
        let magic = read_int(reader, "标签幻数")?;
        check_magic(magic, LABEL_MAGIC, "标签");
        let count = read_count(reader, "标签数量")?;
        Ok(Self { magic, count })
    }
}

/// 读取全部样本
pub fn load<I: Read, L: Read>(images: I, labels: L) -> Result<DataSet, Error> {
    load_with_limit(images, labels, None)
}

/// 读取前 `limit` 个样本；头部仍然完整校验
pub fn load_with_limit<I: Read, L: Read>(
    mut images: I,
    mut labels: L,
    limit: Option<usize>,
) -> Result<DataSet, Error> {
    let image_header = ImageHeader::read(&mut images)?;
    let label_header = LabelHeader::read(&mut labels)?;
    if label_header.count != image_header.count {
        return Err(Error::InvalidHeader {
            field: "标签数量",
            value: label_header.count as i64,
        });
    }
    let count = limit.map_or(image_header.count, |x| x.min(image_header.count));
    let features = image_header.features()?;
    // 头部的数量不可信，缓冲区随实际读到的字节增长
    let label_bytes = read_bounded(&mut labels, count, "标签")?;
    let mut instances = vec![];
    for (index, &label) in label_bytes.iter().enumerate() {
        let pixels = read_bounded(&mut images, features, "像素")?;
        if label as usize >= LABEL_CLASSES {
            return Err(Error::InvalidLabel {
                index,
                value: label,
            });
        }
        let data = pixels.iter().map(|&x| x as f64 / 255.0).collect();
        instances.push(Instance::with_label(
            data,
            Instance::one_hot(LABEL_CLASSES, label as usize),
        ));
    }
    Ok(DataSet::new(instances))
}

fn open(path: &Path) -> Result<BufReader<File>, Error> {
    let file = File::open(path).map_err(|source| Error::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

/// 从图像文件和标签文件读取样本
pub fn load_files(
    images_path: &Path,
    labels_path: &Path,
    limit: Option<usize>,
) -> Result<DataSet, Error> {
    let dataset = load_with_limit(open(images_path)?, open(labels_path)?, limit)?;
    info!(
        "从 {} 中载入了 {} 个样本",
        images_path.display(),
        dataset.len()
    );
    Ok(dataset)
}

/// 只读取两个头部，用于检查语料
pub fn read_headers(images_path: &Path, labels_path: &Path) -> Result<(ImageHeader, LabelHeader), Error> {
    let image_header = ImageHeader::read(&mut open(images_path)?)?;
    let label_header = LabelHeader::read(&mut open(labels_path)?)?;
    Ok((image_header, label_header))
}

/// 统计每个类别的样本数
pub fn label_histogram(dataset: &DataSet) -> [usize; LABEL_CLASSES] {
    let mut histogram = [0; LABEL_CLASSES];
    for index in dataset.iter().filter_map(|x| x.label()?.class_index()) {
        histogram[index] += 1;
    }
    histogram
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Cursor;

    pub(crate) fn image_bytes(count: i32, rows: i32, columns: i32, pixels: &[u8]) -> Vec<u8> {
        let mut bytes = vec![];
        for word in [IMAGE_MAGIC, count, rows, columns] {
            bytes.extend(word.to_be_bytes());
        }
        bytes.extend(pixels);
        bytes
    }

    pub(crate) fn label_bytes(count: i32, labels: &[u8]) -> Vec<u8> {
        let mut bytes = vec![];
        for word in [LABEL_MAGIC, count] {
            bytes.extend(word.to_be_bytes());
        }
        bytes.extend(labels);
        bytes
    }

    #[test]
    fn header_word_is_big_endian() {
        let mut reader = Cursor::new(vec![0, 0, 8, 1]);
        assert_eq!(read_int(&mut reader, "测试").unwrap(), 2049);
    }

    #[test]
    fn header_word_keeps_sign_bit() {
        let mut reader = Cursor::new(vec![0xff, 0xff, 0xff, 0xfe]);
        assert_eq!(read_int(&mut reader, "测试").unwrap(), -2);
    }

    #[test]
    fn loads_synthetic_corpus() {
        let (count, rows, columns) = (3, 2, 2);
        let pixels: Vec<u8> = vec![0, 255, 51, 102, 1, 2, 3, 4, 255, 255, 0, 0];
        let images = image_bytes(count, rows, columns, &pixels);
        let labels = label_bytes(count, &[0, 9, 4]);
        let dataset = load(Cursor::new(images), Cursor::new(labels)).unwrap();
        assert_eq!(dataset.len(), 3);
        for instance in &dataset {
            assert_eq!(instance.size(), 4);
            assert!(instance.data.iter().all(|x| (0.0..=1.0).contains(x)));
        }
        assert_eq!(dataset[0].data, vec![0.0, 1.0, 0.2, 0.4]);
        let classes: Vec<_> = dataset
            .iter()
            .map(|x| x.label().unwrap().class_index().unwrap())
            .collect();
        assert_eq!(classes, vec![0, 9, 4]);
        assert_eq!(dataset[1].label().unwrap().data.iter().sum::<f64>(), 1.0);
    }

    #[test]
    fn limit_reads_prefix() {
        let images = image_bytes(3, 1, 2, &[0, 0, 255, 255, 0, 255]);
        let labels = label_bytes(3, &[1, 2, 3]);
        let dataset = load_with_limit(Cursor::new(images), Cursor::new(labels), Some(2)).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset[1].data, vec![1.0, 1.0]);
    }

    #[test]
    fn truncated_pixels_are_rejected() {
        let images = image_bytes(2, 2, 2, &[0, 0, 0, 0, 0]);
        let labels = label_bytes(2, &[1, 2]);
        let result = load(Cursor::new(images), Cursor::new(labels));
        assert!(matches!(result, Err(Error::CorpusTruncated { section: "像素" })));
    }

    #[test]
    fn truncated_header_is_rejected() {
        let result = load(Cursor::new(vec![0, 0, 8]), Cursor::new(label_bytes(1, &[0])));
        assert!(matches!(result, Err(Error::CorpusTruncated { .. })));
    }

    #[test]
    fn non_positive_counts_are_rejected() {
        let images = image_bytes(0, 2, 2, &[]);
        let labels = label_bytes(0, &[]);
        let result = load(Cursor::new(images), Cursor::new(labels));
        assert!(matches!(
            result,
            Err(Error::InvalidHeader { value: 0, .. })
        ));
        let images = image_bytes(1, -28, 28, &[]);
        let result = load(Cursor::new(images), Cursor::new(label_bytes(1, &[0])));
        assert!(matches!(
            result,
            Err(Error::InvalidHeader { value: -28, .. })
        ));
    }

    #[test]
    fn oversized_header_without_body_is_truncated() {
        let images = image_bytes(1, i32::MAX, i32::MAX, &[]);
        let labels = label_bytes(1, &[3]);
        let result = load(Cursor::new(images), Cursor::new(labels));
        assert!(matches!(result, Err(Error::CorpusTruncated { section: "像素" })));
        let images = image_bytes(i32::MAX, 1, 1, &[]);
        let labels = label_bytes(i32::MAX, &[0, 1]);
        let result = load(Cursor::new(images), Cursor::new(labels));
        assert!(matches!(result, Err(Error::CorpusTruncated { section: "标签" })));
    }

    #[test]
    fn overflowing_pixel_count_is_invalid() {
        let header = ImageHeader {
            magic: IMAGE_MAGIC,
            count: 1,
            rows: usize::MAX,
            columns: 2,
        };
        assert!(matches!(header.features(), Err(Error::InvalidHeader { .. })));
    }

    #[test]
    fn out_of_range_label_is_rejected() {
        let images = image_bytes(1, 1, 1, &[7]);
        let labels = label_bytes(1, &[10]);
        let result = load(Cursor::new(images), Cursor::new(labels));
        assert!(matches!(
            result,
            Err(Error::InvalidLabel { index: 0, value: 10 })
        ));
    }

    #[test]
    fn mismatched_counts_are_rejected() {
        let images = image_bytes(2, 1, 1, &[0, 0]);
        let labels = label_bytes(1, &[0]);
        let result = load(Cursor::new(images), Cursor::new(labels));
        assert!(matches!(result, Err(Error::InvalidHeader { .. })));
    }

    #[test]
    fn histogram_counts_classes() {
        let images = image_bytes(4, 1, 1, &[0, 0, 0, 0]);
        let labels = label_bytes(4, &[3, 3, 0, 9]);
        let dataset = load(Cursor::new(images), Cursor::new(labels)).unwrap();
        let histogram = label_histogram(&dataset);
        assert_eq!(histogram[3], 2);
        assert_eq!(histogram[0], 1);
        assert_eq!(histogram[9], 1);
        assert_eq!(histogram.iter().sum::<usize>(), 4);
    }
}
