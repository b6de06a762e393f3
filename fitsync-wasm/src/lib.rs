//! Bridge WASM <-> JavaScript: phân giải trên các bản ghi đã tải sẵn ở phía trình duyệt.

use std::collections::HashMap;

use chrono::NaiveDate;
use fitsync_core::{run, MemoryProvider, ResolutionRecord};
use fitsync_garmin::{garmin_catalog, GarminConfig};
use serde::Deserialize;
use serde_json::Value;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

#[derive(Deserialize)]
struct JsGarminConfig {
    #[serde(default)]
    body_lookback_days: Option<u32>,
    #[serde(default)]
    training_lookback_days: Option<u32>,
    #[serde(default)]
    daily_lookback_days: Option<u32>,
}

impl From<JsGarminConfig> for GarminConfig {
    fn from(cfg: JsGarminConfig) -> Self {
        let mut base = GarminConfig::default();
        if let Some(days) = cfg.body_lookback_days {
            base.body_lookback_days = days;
        }
        if let Some(days) = cfg.training_lookback_days {
            base.training_lookback_days = days;
        }
        if let Some(days) = cfg.daily_lookback_days {
            base.daily_lookback_days = days;
        }
        base
    }
}

/// Bản ghi thô do JavaScript cung cấp: `dated[source][YYYY-MM-DD]` và `fixed[source]`.
#[derive(Deserialize, Default)]
struct JsRecords {
    #[serde(default)]
    dated: HashMap<String, HashMap<String, Value>>,
    #[serde(default)]
    fixed: HashMap<String, Value>,
}

impl JsRecords {
    fn into_provider(self) -> Result<MemoryProvider, String> {
        let mut provider = MemoryProvider::new();
        for (source, days) in self.dated {
            for (day, record) in days {
                let date = parse_day(&day)
                    .map_err(|err| format!("Ngày không hợp lệ `{day}` của nguồn {source}: {err}"))?;
                provider = provider.with_record(&source, date, record);
            }
        }
        for (source, record) in self.fixed {
            provider = provider.with_static(&source, record);
        }
        Ok(provider)
    }
}

#[wasm_bindgen]
pub fn resolve_records(
    records: JsValue,
    today: String,
    config: Option<JsValue>,
) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let records = from_value::<JsRecords>(records)
        .map_err(|err| JsValue::from_str(&format!("Không đọc được bản ghi: {err}")))?;

    let cfg = match config {
        Some(js_cfg) => {
            let cfg: JsGarminConfig = from_value(js_cfg)
                .map_err(|err| JsValue::from_str(&format!("Không đọc được config: {err}")))?;
            GarminConfig::from(cfg)
        }
        None => GarminConfig::default(),
    };

    let record = resolve(records, &today, &cfg).map_err(|err| JsValue::from_str(&err))?;

    to_value(&record).map_err(|err| JsValue::from_str(&format!("Không serialize record: {err}")))
}

fn resolve(records: JsRecords, today: &str, cfg: &GarminConfig) -> Result<ResolutionRecord, String> {
    let today = parse_day(today).map_err(|err| format!("Ngày `{today}` không hợp lệ: {err}"))?;
    let provider = records.into_provider()?;
    run(&garmin_catalog(cfg), &provider, today).map_err(|err| format!("Catalog error: {err}"))
}

fn parse_day(text: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(value: Value) -> JsRecords {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn resolves_dated_and_fixed_records() {
        let input = records(json!({
            "dated": {
                "training_status": {
                    "2026-10-18": {"acuteLoad": 120, "chronicLoad": 100}
                }
            },
            "fixed": {"user_profile": {"ftp": 265}}
        }));

        let record = resolve(input, "2026-10-19", &GarminConfig::default()).unwrap();
        assert_eq!(record.number("load_ratio"), Some(1.2));
        assert_eq!(record.number("cycling_ftp"), Some(265.0));
        assert!(record.value("weight_kg").is_unresolved());
    }

    #[test]
    fn partial_js_config_overrides_defaults() {
        let cfg: JsGarminConfig =
            serde_json::from_value(json!({"training_lookback_days": 0})).unwrap();
        let cfg = GarminConfig::from(cfg);
        assert_eq!(cfg.training_lookback_days, 0);
        assert_eq!(cfg.body_lookback_days, 29);

        let input = records(json!({
            "dated": {"training_status": {"2026-10-18": {"acuteLoad": 120}}}
        }));
        let record = resolve(input, "2026-10-19", &cfg).unwrap();
        assert!(record.value("acute_load").is_unresolved());
    }

    #[test]
    fn bad_dates_are_reported() {
        let err =
            resolve(JsRecords::default(), "19/10/2026", &GarminConfig::default()).unwrap_err();
        assert!(err.contains("19/10/2026"));

        let input = records(json!({"dated": {"stats": {"yesterday": {}}}}));
        let err = resolve(input, "2026-10-19", &GarminConfig::default()).unwrap_err();
        assert!(err.contains("yesterday"));
    }
}
