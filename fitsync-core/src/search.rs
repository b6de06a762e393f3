//! Tìm lùi theo ngày trên một nguồn.

use chrono::{Days, NaiveDate};
use tracing::debug;

use crate::cache::{RecordKey, SourceCache};
use crate::model::{FieldValue, SourceRef};

/// Giá trị hợp lệ đầu tiên và ngày tìm thấy.
#[derive(Debug, Clone, PartialEq)]
pub struct Found {
    pub value: FieldValue,
    pub date: NaiveDate,
}

/// Thử `today`, rồi `today - 1`, ... tới `max_lookback_days`. Trả về ngày gần
/// nhất có giá trị hợp lệ.
///
/// Nguồn tĩnh chỉ được tra một lần; ngày gắn kèm là `today`.
pub fn search(cache: &SourceCache<'_>, source: &SourceRef, today: NaiveDate) -> Option<Found> {
    if !source.temporal {
        return extract(cache, source, &RecordKey::fixed(&source.source)).map(|value| Found {
            value,
            date: today,
        });
    }

    for offset in 0..=source.max_lookback_days {
        if cache.cancel_flag().is_cancelled() {
            return None;
        }
        let Some(date) = today.checked_sub_days(Days::new(u64::from(offset))) else {
            break;
        };
        if let Some(value) = extract(cache, source, &RecordKey::dated(&source.source, date)) {
            return Some(Found { value, date });
        }
    }

    debug!(
        source = %source.source,
        path = %source.path,
        lookback = source.max_lookback_days,
        "no valid value in window"
    );
    None
}

fn extract(cache: &SourceCache<'_>, source: &SourceRef, key: &RecordKey) -> Option<FieldValue> {
    let cached = cache.get(key);
    let raw = source.path.navigate(cached.record()?);
    if !source.validity.accepts(raw) {
        return None;
    }
    FieldValue::from_raw(raw?, source.scale)
}
