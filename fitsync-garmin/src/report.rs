//! Plain-text daily report over a resolution record.

use chrono::NaiveDate;
use fitsync_core::{Catalog, FieldSpec, FieldValue, Provenance, ResolutionRecord, ResolvedValue};

use crate::activities::{format_duration, ActivitySummary};

pub struct ReportInput<'a> {
    pub today: NaiveDate,
    pub catalog: &'a Catalog,
    pub record: &'a ResolutionRecord,
    pub activities: &'a [ActivitySummary],
}

type Section = (&'static str, &'static [(&'static str, &'static str)]);

const SECTIONS: [Section; 3] = [
    (
        "Body & health",
        &[
            ("Weight", "weight_kg"),
            ("Body fat", "body_fat_pct"),
            ("Resting heart rate", "resting_heart_rate"),
            ("Stress level", "avg_stress"),
            ("HRV last night", "hrv_last_night"),
            ("HRV weekly average", "hrv_weekly_avg"),
            ("HRV status", "hrv_status"),
        ],
    ),
    (
        "Performance & capacity",
        &[
            ("VO2 max (running)", "vo2max_running"),
            ("VO2 max (cycling)", "vo2max_cycling"),
            ("Cycling FTP", "cycling_ftp"),
            ("Endurance score", "endurance_score"),
        ],
    ),
    (
        "Training load",
        &[
            ("Acute load", "acute_load"),
            ("Chronic load", "chronic_load"),
            ("Load ratio", "load_ratio"),
        ],
    ),
];

const NOT_AVAILABLE: &str = "N/A";

/// Render the report. Catalog fields without a place in the fixed layout are
/// listed under "Other" by field name.
pub fn render_report(input: &ReportInput<'_>) -> String {
    let mut lines = vec![
        format!("Garmin status report ({})", input.today),
        "Values may come from the latest earlier measurement; source and date follow each value."
            .to_string(),
    ];

    for (title, rows) in SECTIONS {
        lines.push(String::new());
        lines.push(format!("{title}:"));
        for (label, field) in rows {
            lines.push(format!("- {label}: {}", describe_field(input, field)));
        }
    }

    let others: Vec<&FieldSpec> = input
        .catalog
        .iter()
        .filter(|spec| {
            !SECTIONS
                .iter()
                .any(|(_, rows)| rows.iter().any(|(_, field)| *field == spec.name))
        })
        .collect();
    if !others.is_empty() {
        lines.push(String::new());
        lines.push("Other:".to_string());
        for spec in others {
            lines.push(format!("- {}: {}", spec.name, describe_field(input, &spec.name)));
        }
    }

    lines.push(String::new());
    lines.push("Today's sessions:".to_string());
    if input.activities.is_empty() {
        lines.push("No training recorded today.".to_string());
    } else {
        lines.extend(input.activities.iter().map(describe_activity));
    }

    lines.push(String::new());
    lines.join("\n")
}

fn describe_field(input: &ReportInput<'_>, field: &str) -> String {
    let Some(resolved) = input.record.get(field) else {
        return NOT_AVAILABLE.to_string();
    };
    let spec = input.catalog.get(field);
    format!("{}{}", format_value(spec, &resolved.value), provenance_suffix(resolved))
}

fn format_value(spec: Option<&FieldSpec>, value: &FieldValue) -> String {
    match value {
        FieldValue::Number(number) => {
            let text = match spec.and_then(|spec| spec.precision) {
                Some(digits) => format!("{number:.*}", usize::from(digits)),
                None => format_numeric(*number),
            };
            match spec.and_then(|spec| spec.unit.as_deref()) {
                Some("%") => format!("{text}%"),
                Some(unit) => format!("{text} {unit}"),
                None => text,
            }
        }
        FieldValue::Text(text) => text.clone(),
        FieldValue::Unresolved => NOT_AVAILABLE.to_string(),
    }
}

fn provenance_suffix(resolved: &ResolvedValue) -> String {
    match &resolved.provenance {
        Provenance::Source { source, date } => format!(" [{source} {date}]"),
        Provenance::Derived => " [derived]".to_string(),
        Provenance::None => String::new(),
    }
}

fn describe_activity(activity: &ActivitySummary) -> String {
    let optional =
        |value: Option<f64>| value.map_or_else(|| NOT_AVAILABLE.to_string(), format_numeric);
    format!(
        "- {}: {} | HR: {} | Load: {}",
        activity.name,
        format_duration(activity.duration_seconds),
        optional(activity.average_hr),
        optional(activity.training_load)
    )
}

fn format_numeric(value: f64) -> String {
    if value.fract().abs() < f64::EPSILON {
        format!("{value:.0}")
    } else if (value * 10.0).fract().abs() < f64::EPSILON {
        format!("{value:.1}")
    } else {
        format!("{value:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{garmin_catalog, GarminConfig};
    use fitsync_core::{Derivation, ResolvedValue};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    #[test]
    fn numbers_use_precision_unit_and_provenance() {
        let catalog = garmin_catalog(&GarminConfig::default());
        let mut record = ResolutionRecord::all_unresolved(&catalog);
        record.insert(ResolvedValue::observed(
            "weight_kg",
            FieldValue::Number(81.24),
            "body_composition",
            day(14),
        ));
        record.insert(ResolvedValue::observed(
            "body_fat_pct",
            FieldValue::Number(18.4),
            "body_composition",
            day(14),
        ));
        record.insert(ResolvedValue::derived("load_ratio", 512.0 / 430.0));

        let report = render_report(&ReportInput {
            today: day(19),
            catalog: &catalog,
            record: &record,
            activities: &[],
        });

        assert!(report.starts_with("Garmin status report (2026-10-19)\n"));
        assert!(report.contains("- Weight: 81.2 kg [body_composition 2026-10-14]\n"));
        assert!(report.contains("- Body fat: 18.4% [body_composition 2026-10-14]\n"));
        assert!(report.contains("- Load ratio: 1.19 [derived]\n"));
        assert!(report.contains("- Cycling FTP: N/A\n"));
        assert!(report.contains("Today's sessions:\nNo training recorded today.\n"));
        assert!(!report.contains("Other:"));
    }

    #[test]
    fn extra_catalog_fields_are_listed_under_other() {
        let mut catalog = garmin_catalog(&GarminConfig::default());
        catalog.fields.push(
            FieldSpec::new("hrv_delta")
                .derived(Derivation::difference("hrv_last_night", "hrv_weekly_avg")),
        );
        let mut record = ResolutionRecord::all_unresolved(&catalog);
        record.insert(ResolvedValue::derived("hrv_delta", -3.0));

        let report = render_report(&ReportInput {
            today: day(19),
            catalog: &catalog,
            record: &record,
            activities: &[],
        });
        assert!(report.contains("Other:\n- hrv_delta: -3 [derived]\n"));
    }

    #[test]
    fn activity_lines() {
        let catalog = Catalog::default();
        let record = ResolutionRecord::default();
        let activities = vec![
            ActivitySummary {
                name: "Morning Run".into(),
                duration_seconds: Some(3125.4),
                average_hr: Some(148.0),
                training_load: Some(112.6),
            },
            ActivitySummary {
                name: "Unknown".into(),
                duration_seconds: Some(4000.0),
                average_hr: None,
                training_load: None,
            },
        ];

        let report = render_report(&ReportInput {
            today: day(19),
            catalog: &catalog,
            record: &record,
            activities: &activities,
        });
        assert!(report.contains("- Morning Run: 52m | HR: 148 | Load: 112.6\n"));
        assert!(report.contains("- Unknown: 1h 6m | HR: N/A | Load: N/A\n"));
        assert!(report.contains("- Weight: N/A\n"));
    }
}
