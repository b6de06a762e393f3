use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Điều kiện để một giá trị thô được coi là "có dữ liệu".
///
/// Một số endpoint dùng số 0 làm giá trị giữ chỗ cho "không có dữ liệu", nên
/// trường có thể chọn điều kiện chặt hơn mặc định.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Validity {
    /// Khóa tồn tại và giá trị khác `null`.
    #[default]
    Present,
    Numeric,
    /// Số và khác 0.
    NonZero,
    Positive,
    NonEmptyText,
}

impl Validity {
    /// `None` nghĩa là đường trích không tới được giá trị nào.
    pub fn accepts(self, raw: Option<&Value>) -> bool {
        let Some(value) = raw else {
            return false;
        };

        match self {
            Validity::Present => !value.is_null(),
            Validity::Numeric => value.as_f64().is_some(),
            Validity::NonZero => value.as_f64().is_some_and(|number| number != 0.0),
            Validity::Positive => value.as_f64().is_some_and(|number| number > 0.0),
            Validity::NonEmptyText => value
                .as_str()
                .is_some_and(|text| !text.trim().is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn present_rejects_missing_and_null_only() {
        assert!(!Validity::Present.accepts(None));
        assert!(!Validity::Present.accepts(Some(&Value::Null)));
        assert!(Validity::Present.accepts(Some(&json!(0))));
        assert!(Validity::Present.accepts(Some(&json!(""))));
    }

    #[test]
    fn non_zero_rejects_placeholder_zero() {
        assert!(!Validity::NonZero.accepts(Some(&json!(0))));
        assert!(!Validity::NonZero.accepts(Some(&json!(0.0))));
        assert!(!Validity::NonZero.accepts(Some(&json!("81200"))));
        assert!(Validity::NonZero.accepts(Some(&json!(-3))));
    }

    #[test]
    fn positive_and_numeric() {
        assert!(Validity::Numeric.accepts(Some(&json!(-1))));
        assert!(!Validity::Numeric.accepts(Some(&json!({"a": 1}))));
        assert!(!Validity::Positive.accepts(Some(&json!(-1))));
        assert!(Validity::Positive.accepts(Some(&json!(52.5))));
    }

    #[test]
    fn non_empty_text() {
        assert!(!Validity::NonEmptyText.accepts(Some(&json!("  "))));
        assert!(!Validity::NonEmptyText.accepts(Some(&json!(3))));
        assert!(Validity::NonEmptyText.accepts(Some(&json!("BALANCED"))));
    }
}
