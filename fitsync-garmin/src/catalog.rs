//! Field catalog for the Garmin Connect endpoints.
//!
//! Several endpoints carry the same metric under different names depending on
//! the service version, so most fields list more than one candidate. The
//! ordering below is a deployment choice; load a JSON catalog to override it.

use fitsync_core::{Catalog, Derivation, FieldSpec, SourceRef, Validity};
use serde::{Deserialize, Serialize};

/// Upstream endpoint names.
pub mod sources {
    pub const BODY_COMPOSITION: &str = "body_composition";
    pub const TRAINING_STATUS: &str = "training_status";
    pub const STATS: &str = "stats";
    pub const HRV: &str = "hrv";
    pub const USER_PROFILE: &str = "user_profile";
    pub const ACTIVITIES: &str = "activities";
}

/// Upstream weights are reported in grams.
const GRAMS_TO_KG: f64 = 0.001;

/// Lookback windows for the dated endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GarminConfig {
    /// Most people do not weigh in every day.
    pub body_lookback_days: u32,
    /// Training load is computed overnight and is often missing for today.
    pub training_lookback_days: u32,
    pub daily_lookback_days: u32,
}

impl Default for GarminConfig {
    fn default() -> Self {
        Self {
            body_lookback_days: 29,
            training_lookback_days: 2,
            daily_lookback_days: 0,
        }
    }
}

/// Build the catalog resolved for the daily report.
pub fn garmin_catalog(config: &GarminConfig) -> Catalog {
    use self::sources::*;

    let body = |path: &str, validity: Validity| {
        SourceRef::dated(BODY_COMPOSITION, path)
            .lookback(config.body_lookback_days)
            .validity(validity)
    };
    let training = |path: &str, validity: Validity| {
        SourceRef::dated(TRAINING_STATUS, path)
            .lookback(config.training_lookback_days)
            .validity(validity)
    };
    let daily = |source: &str, path: &str, validity: Validity| {
        SourceRef::dated(source, path)
            .lookback(config.daily_lookback_days)
            .validity(validity)
    };
    let profile = |path: &str, validity: Validity| {
        SourceRef::fixed(USER_PROFILE, path).validity(validity)
    };

    Catalog::new(vec![
        FieldSpec::new("weight_kg")
            .candidate(body("totalBodyWeight", Validity::NonZero).scale(GRAMS_TO_KG))
            .candidate(body("totalAverage.weight", Validity::NonZero).scale(GRAMS_TO_KG))
            .candidate(profile("weight", Validity::NonZero).scale(GRAMS_TO_KG))
            .candidate(profile("userData.weight", Validity::NonZero).scale(GRAMS_TO_KG))
            .unit("kg")
            .precision(1),
        FieldSpec::new("body_fat_pct")
            .candidate(body("totalBodyFat", Validity::NonZero))
            .candidate(body("totalAverage.bodyFat", Validity::NonZero))
            .unit("%")
            .precision(1),
        FieldSpec::new("resting_heart_rate")
            .candidate(daily(STATS, "restingHeartRate", Validity::Positive))
            .unit("bpm")
            .precision(0),
        FieldSpec::new("avg_stress")
            .candidate(daily(STATS, "averageStressLevel", Validity::Numeric))
            .precision(0),
        FieldSpec::new("hrv_last_night")
            .candidate(daily(HRV, "hrvSummary.lastNightAvg", Validity::Positive))
            .unit("ms")
            .precision(0),
        FieldSpec::new("hrv_weekly_avg")
            .candidate(daily(HRV, "hrvSummary.weeklyAvg", Validity::Positive))
            .unit("ms")
            .precision(0),
        FieldSpec::new("hrv_status")
            .candidate(daily(HRV, "hrvSummary.status", Validity::NonEmptyText))
            .candidate(profile("hrvStatus", Validity::NonEmptyText)),
        FieldSpec::new("vo2max_running")
            .candidate(profile("vo2MaxRunning", Validity::Positive))
            .candidate(profile("userData.vo2MaxRunning", Validity::Positive))
            .candidate(daily(STATS, "vo2MaxRunning", Validity::Positive))
            .precision(0),
        FieldSpec::new("vo2max_cycling")
            .candidate(profile("vo2MaxCycling", Validity::Positive))
            .candidate(profile("userData.vo2MaxCycling", Validity::Positive))
            .candidate(daily(STATS, "vo2MaxCycling", Validity::Positive))
            .precision(0),
        FieldSpec::new("cycling_ftp")
            .candidate(profile("userFTP", Validity::Positive))
            .candidate(profile("ftp", Validity::Positive))
            .unit("W")
            .precision(0),
        FieldSpec::new("endurance_score")
            .candidate(training("enduranceScore", Validity::Positive))
            .precision(0),
        FieldSpec::new("acute_load")
            .candidate(training("acuteLoad", Validity::Numeric))
            .precision(0),
        FieldSpec::new("chronic_load")
            .candidate(training("chronicLoad", Validity::Numeric))
            .precision(0),
        FieldSpec::new("load_ratio")
            .candidate(training("loadRatio", Validity::Positive))
            .derived(Derivation::ratio("acute_load", "chronic_load"))
            .precision(2),
    ])
}
