use chrono::NaiveDate;
use fitsync_core::DataProvider;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::catalog::sources;

/// One logged session from the activities endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivitySummary {
    pub name: String,
    pub duration_seconds: Option<f64>,
    pub average_hr: Option<f64>,
    pub training_load: Option<f64>,
}

impl ActivitySummary {
    fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let number = |key: &str| object.get(key).and_then(Value::as_f64);
        Some(Self {
            name: object
                .get("activityName")
                .and_then(Value::as_str)
                .filter(|name| !name.trim().is_empty())
                .unwrap_or("Unknown")
                .to_string(),
            duration_seconds: number("duration"),
            average_hr: number("averageHR"),
            training_load: number("trainingLoad"),
        })
    }
}

/// Today's sessions only; a failed fetch reads as "no training today".
pub fn todays_activities(provider: &dyn DataProvider, today: NaiveDate) -> Vec<ActivitySummary> {
    let payload = match provider.fetch(sources::ACTIVITIES, today) {
        Ok(payload) => payload,
        Err(err) => {
            debug!(%today, error = %err, "no activities");
            return Vec::new();
        }
    };

    let items: &[Value] = match &payload {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => map
            .get("activities")
            .and_then(Value::as_array)
            .map_or(&[][..], Vec::as_slice),
        _ => &[],
    };

    items.iter().filter_map(ActivitySummary::from_value).collect()
}

/// `3125.0` seconds becomes `"52m"`, `4000.0` becomes `"1h 6m"`.
pub fn format_duration(seconds: Option<f64>) -> String {
    let total = match seconds {
        Some(value) if value.is_finite() && value > 0.0 => value as u64,
        _ => return "0m".to_string(),
    };
    let minutes = total / 60;
    let (hours, minutes) = (minutes / 60, minutes % 60);
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}
