use chrono::NaiveDate;
use tracing::debug;

use crate::cache::SourceCache;
use crate::model::{FieldSpec, ResolvedValue};
use crate::search::search;

/// Thử các ứng viên theo thứ tự khai báo; ứng viên đầu tiên có giá trị hợp lệ
/// thắng và các ứng viên sau không được tra nữa.
pub fn resolve(cache: &SourceCache<'_>, field: &FieldSpec, today: NaiveDate) -> ResolvedValue {
    for (rank, candidate) in field.candidates.iter().enumerate() {
        if let Some(found) = search(cache, candidate, today) {
            return ResolvedValue::observed(&field.name, found.value, &candidate.source, found.date);
        }
        debug!(field = %field.name, rank, source = %candidate.source, "candidate exhausted");
    }
    ResolvedValue::unresolved(&field.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldValue, Provenance, SourceRef};
    use crate::provider::MemoryProvider;
    use crate::validity::Validity;
    use serde_json::json;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn weight_field() -> FieldSpec {
        FieldSpec::new("weight_kg")
            .candidate(
                SourceRef::dated("body_composition", "totalBodyWeight")
                    .lookback(30)
                    .validity(Validity::NonZero)
                    .scale(0.5),
            )
            .candidate(SourceRef::fixed("user_profile", "weight").scale(0.5))
    }

    #[test]
    fn first_matching_candidate_wins_and_later_ones_are_not_fetched() {
        let provider = MemoryProvider::new()
            .with_record("body_composition", day(12), json!({"totalBodyWeight": 162000}))
            .with_static("user_profile", json!({"weight": 150000}));
        let cache = SourceCache::new(&provider);

        let resolved = resolve(&cache, &weight_field(), day(19));
        assert_eq!(resolved.value, FieldValue::Number(81000.0));
        assert_eq!(
            resolved.provenance,
            Provenance::Source {
                source: "body_composition".into(),
                date: day(12)
            }
        );
        assert_eq!(provider.calls_to("user_profile"), 0);
    }

    #[test]
    fn falls_through_to_next_candidate() {
        let provider = MemoryProvider::new()
            .with_record("body_composition", day(19), json!({"totalBodyWeight": 0}))
            .with_static("user_profile", json!({"weight": 150000}));
        let cache = SourceCache::new(&provider);

        let resolved = resolve(&cache, &weight_field(), day(19));
        assert_eq!(resolved.value, FieldValue::Number(75000.0));
        assert_eq!(
            resolved.provenance,
            Provenance::Source {
                source: "user_profile".into(),
                date: day(19)
            }
        );
        assert_eq!(provider.calls_to("body_composition"), 31);
    }

    #[test]
    fn exhausted_candidates_are_unresolved() {
        let provider = MemoryProvider::new();
        let cache = SourceCache::new(&provider);

        let resolved = resolve(&cache, &weight_field(), day(19));
        assert_eq!(resolved, ResolvedValue::unresolved("weight_kg"));
    }
}
