//! Chỉ số suy ra từ các trường đã phân giải.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{FieldSpec, ResolutionRecord, ResolvedValue};

/// Công thức suy diễn trên các trường khác, tham chiếu theo tên.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Derivation {
    /// `numerator / denominator`; mẫu bằng 0 cho kết quả chưa phân giải.
    Ratio {
        numerator: String,
        denominator: String,
    },
    Difference {
        minuend: String,
        subtrahend: String,
    },
    Scale {
        input: String,
        factor: f64,
    },
}

impl Derivation {
    pub fn ratio(numerator: impl Into<String>, denominator: impl Into<String>) -> Self {
        Self::Ratio {
            numerator: numerator.into(),
            denominator: denominator.into(),
        }
    }

    pub fn difference(minuend: impl Into<String>, subtrahend: impl Into<String>) -> Self {
        Self::Difference {
            minuend: minuend.into(),
            subtrahend: subtrahend.into(),
        }
    }

    pub fn scale(input: impl Into<String>, factor: f64) -> Self {
        Self::Scale {
            input: input.into(),
            factor,
        }
    }

    /// Tên các trường phải được phân giải trước.
    pub fn inputs(&self) -> Vec<&str> {
        match self {
            Self::Ratio {
                numerator,
                denominator,
            } => vec![numerator.as_str(), denominator.as_str()],
            Self::Difference {
                minuend,
                subtrahend,
            } => vec![minuend.as_str(), subtrahend.as_str()],
            Self::Scale { input, .. } => vec![input.as_str()],
        }
    }

    /// `None` khi thiếu đầu vào, đầu vào không phải số hoặc kết quả không hữu hạn.
    pub fn evaluate(&self, resolved: &ResolutionRecord) -> Option<f64> {
        let value = match self {
            Self::Ratio {
                numerator,
                denominator,
            } => {
                let denominator = resolved.number(denominator)?;
                if denominator == 0.0 {
                    return None;
                }
                resolved.number(numerator)? / denominator
            }
            Self::Difference {
                minuend,
                subtrahend,
            } => resolved.number(minuend)? - resolved.number(subtrahend)?,
            Self::Scale { input, factor } => resolved.number(input)? * factor,
        };
        value.is_finite().then_some(value)
    }
}

/// Suy ra giá trị cho `field`. Trường không có công thức, hoặc công thức
/// không tính được, cho kết quả chưa phân giải.
pub fn derive(field: &FieldSpec, resolved: &ResolutionRecord) -> ResolvedValue {
    let Some(derivation) = &field.derivation else {
        return ResolvedValue::unresolved(&field.name);
    };

    match derivation.evaluate(resolved) {
        Some(value) => ResolvedValue::derived(&field.name, value),
        None => {
            debug!(field = %field.name, inputs = ?derivation.inputs(), "derivation inputs unusable");
            ResolvedValue::unresolved(&field.name)
        }
    }
}
