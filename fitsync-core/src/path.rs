//! Đường trích giá trị trong bản ghi thô.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Một bước điều hướng: khóa của object hoặc chỉ số của mảng.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Chuỗi bước điều hướng, viết dạng `"hrvSummary.lastNightAvg"` hoặc
/// `"dateWeightList.0.weight"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ExtractionPath(Vec<PathSegment>);

impl ExtractionPath {
    pub fn parse(text: &str) -> Self {
        let segments = text
            .split('.')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| match part.parse::<usize>() {
                Ok(index) => PathSegment::Index(index),
                Err(_) => PathSegment::Key(part.to_string()),
            })
            .collect();
        Self(segments)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Điều hướng vào bản ghi. Thiếu khóa hoặc gặp kiểu không phải container
    /// giữa đường đều trả về `None`, không bao giờ panic.
    ///
    /// Chỉ số số học trên object được thử như khóa chuỗi, vì một số endpoint
    /// dùng ID thiết bị làm khóa.
    pub fn navigate<'a>(&self, record: &'a Value) -> Option<&'a Value> {
        self.0
            .iter()
            .try_fold(record, |current, segment| match (segment, current) {
                (PathSegment::Key(key), Value::Object(map)) => map.get(key),
                (PathSegment::Index(index), Value::Array(items)) => items.get(*index),
                (PathSegment::Index(index), Value::Object(map)) => map.get(&index.to_string()),
                _ => None,
            })
    }
}

impl From<&str> for ExtractionPath {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

impl From<String> for ExtractionPath {
    fn from(text: String) -> Self {
        Self::parse(&text)
    }
}

impl From<ExtractionPath> for String {
    fn from(path: ExtractionPath) -> Self {
        path.to_string()
    }
}

impl fmt::Display for ExtractionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, segment) in self.0.iter().enumerate() {
            if position > 0 {
                f.write_str(".")?;
            }
            match segment {
                PathSegment::Key(key) => f.write_str(key)?,
                PathSegment::Index(index) => write!(f, "{index}")?,
            }
        }
        Ok(())
    }
}
