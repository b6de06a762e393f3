//! Mô hình dữ liệu: catalog trường, giá trị đã phân giải và nguồn gốc.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::derive::Derivation;
use crate::path::ExtractionPath;
use crate::validity::Validity;

/// Một ứng viên (nguồn, đường trích) cho một trường logic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceRef {
    pub source: String,
    pub path: ExtractionPath,
    /// `false` cho nguồn không đánh chỉ mục theo ngày (ví dụ hồ sơ người dùng).
    #[serde(default = "default_temporal")]
    pub temporal: bool,
    #[serde(default)]
    pub max_lookback_days: u32,
    #[serde(default)]
    pub validity: Validity,
    /// Hệ số nhân áp lên giá trị số khi trích (ví dụ gam sang kg).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
}

fn default_temporal() -> bool {
    true
}

impl SourceRef {
    /// Nguồn theo ngày, mặc định chỉ xét hôm nay.
    pub fn dated(source: impl Into<String>, path: impl Into<ExtractionPath>) -> Self {
        Self {
            source: source.into(),
            path: path.into(),
            temporal: true,
            max_lookback_days: 0,
            validity: Validity::default(),
            scale: None,
        }
    }

    /// Nguồn tĩnh, không phụ thuộc ngày.
    pub fn fixed(source: impl Into<String>, path: impl Into<ExtractionPath>) -> Self {
        Self {
            temporal: false,
            ..Self::dated(source, path)
        }
    }

    pub fn lookback(mut self, days: u32) -> Self {
        self.max_lookback_days = days;
        self
    }

    pub fn validity(mut self, validity: Validity) -> Self {
        self.validity = validity;
        self
    }

    pub fn scale(mut self, factor: f64) -> Self {
        self.scale = Some(factor);
        self
    }
}

/// Khai báo một trường logic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    /// Theo thứ tự ưu tiên; ứng viên đầu tiên có dữ liệu sẽ thắng.
    #[serde(default)]
    pub candidates: Vec<SourceRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derivation: Option<Derivation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Số chữ số thập phân khi hiển thị.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u8>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            candidates: Vec::new(),
            derivation: None,
            unit: None,
            precision: None,
        }
    }

    pub fn candidate(mut self, source: SourceRef) -> Self {
        self.candidates.push(source);
        self
    }

    pub fn derived(mut self, derivation: Derivation) -> Self {
        self.derivation = Some(derivation);
        self
    }

    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn precision(mut self, digits: u8) -> Self {
        self.precision = Some(digits);
        self
    }
}

/// Tập trường cấu hình tĩnh, dựng một lần lúc khởi động.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Catalog {
    pub fields: Vec<FieldSpec>,
}

impl Catalog {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Giá trị của một trường: số, chuỗi hoặc chưa phân giải (`null` khi serialize).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    #[default]
    Unresolved,
}

impl FieldValue {
    /// Chuyển giá trị JSON vô hướng. Object và mảng không phải giá trị trường.
    pub fn from_raw(raw: &Value, scale: Option<f64>) -> Option<Self> {
        match raw {
            Value::Number(number) => {
                let value = number.as_f64()?;
                let scaled = scale.map_or(value, |factor| value * factor);
                scaled.is_finite().then_some(Self::Number(scaled))
            }
            Value::String(text) => Some(Self::Text(text.clone())),
            Value::Bool(flag) => Some(Self::Text(flag.to_string())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, Self::Unresolved)
    }
}

/// Giá trị đến từ đâu.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Provenance {
    Source { source: String, date: NaiveDate },
    Derived,
    None,
}

/// Kết quả cho một trường. Nếu `provenance` là `None` thì `value` là
/// `FieldValue::Unresolved`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolvedValue {
    pub field: String,
    pub value: FieldValue,
    pub provenance: Provenance,
}

impl ResolvedValue {
    pub fn observed(
        field: impl Into<String>,
        value: FieldValue,
        source: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            field: field.into(),
            value,
            provenance: Provenance::Source {
                source: source.into(),
                date,
            },
        }
    }

    pub fn derived(field: impl Into<String>, value: f64) -> Self {
        Self {
            field: field.into(),
            value: FieldValue::Number(value),
            provenance: Provenance::Derived,
        }
    }

    pub fn unresolved(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: FieldValue::Unresolved,
            provenance: Provenance::None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        !self.value.is_unresolved()
    }
}

/// Bản ghi kết quả của một phiên, sắp theo tên trường.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ResolutionRecord {
    fields: BTreeMap<String, ResolvedValue>,
}

impl ResolutionRecord {
    /// Bản ghi phủ đủ catalog, mọi trường đều chưa phân giải.
    pub fn all_unresolved(catalog: &Catalog) -> Self {
        let fields = catalog
            .iter()
            .map(|field| (field.name.clone(), ResolvedValue::unresolved(&field.name)))
            .collect();
        Self { fields }
    }

    pub fn insert(&mut self, resolved: ResolvedValue) {
        self.fields.insert(resolved.field.clone(), resolved);
    }

    pub fn get(&self, field: &str) -> Option<&ResolvedValue> {
        self.fields.get(field)
    }

    pub fn value(&self, field: &str) -> &FieldValue {
        static UNRESOLVED: FieldValue = FieldValue::Unresolved;
        self.fields
            .get(field)
            .map_or(&UNRESOLVED, |resolved| &resolved.value)
    }

    pub fn number(&self, field: &str) -> Option<f64> {
        self.value(field).as_number()
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        self.value(field).as_text()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedValue> {
        self.fields.values()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn resolved_count(&self) -> usize {
        self.iter().filter(|resolved| resolved.is_resolved()).count()
    }

    pub fn unresolved_fields(&self) -> Vec<&str> {
        self.iter()
            .filter(|resolved| !resolved.is_resolved())
            .map(|resolved| resolved.field.as_str())
            .collect()
    }
}
