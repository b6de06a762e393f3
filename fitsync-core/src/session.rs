//! Phiên phân giải: điểm vào duy nhất của lõi.

use chrono::NaiveDate;
use rayon::prelude::*;
use tracing::{info, warn};

use crate::cache::SourceCache;
use crate::cancel::CancelFlag;
use crate::derive::derive;
use crate::error::CatalogError;
use crate::model::{Catalog, FieldSpec, Provenance, ResolutionRecord, ResolvedValue};
use crate::plan::ResolutionPlan;
use crate::provider::DataProvider;
use crate::resolver::resolve;

/// Phân giải toàn bộ `catalog` cho ngày `today`.
///
/// Chỉ lỗi cấu hình catalog mới được trả về; mọi vấn đề về dữ liệu đều thành
/// trường chưa phân giải.
pub fn run(
    catalog: &Catalog,
    provider: &dyn DataProvider,
    today: NaiveDate,
) -> Result<ResolutionRecord, CatalogError> {
    let plan = ResolutionPlan::new(catalog.clone())?;
    Ok(Session::new(&plan, provider, today).run())
}

/// Một lần phân giải. Bộ nhớ đệm sống cùng phiên và bị bỏ khi phiên kết thúc.
pub struct Session<'a> {
    plan: &'a ResolutionPlan,
    cache: SourceCache<'a>,
    today: NaiveDate,
}

impl<'a> Session<'a> {
    pub fn new(plan: &'a ResolutionPlan, provider: &'a dyn DataProvider, today: NaiveDate) -> Self {
        Self {
            plan,
            cache: SourceCache::new(provider),
            today,
        }
    }

    /// Handle để hủy phiên từ bên ngoài. Phiên bị hủy trả về bản ghi mà mọi
    /// trường đều chưa phân giải.
    pub fn cancel_handle(&self) -> CancelFlag {
        self.cache.cancel_flag().clone()
    }

    /// Phân giải tuần tự theo thứ tự phụ thuộc.
    pub fn run(self) -> ResolutionRecord {
        let mut record = ResolutionRecord::default();
        for field in self.plan.ordered_fields() {
            if self.cache.cancel_flag().is_cancelled() {
                break;
            }
            let resolved = self.resolve_field(field, &record);
            record.insert(resolved);
        }
        self.finish(record)
    }

    /// Phân giải song song từng tầng phụ thuộc. Kết quả giống hệt `run`.
    pub fn run_parallel(self) -> ResolutionRecord {
        let mut record = ResolutionRecord::default();
        for level in self.plan.levels() {
            if self.cache.cancel_flag().is_cancelled() {
                break;
            }
            let resolved: Vec<ResolvedValue> = level
                .par_iter()
                .map(|field| self.resolve_field(field, &record))
                .collect();
            for value in resolved {
                record.insert(value);
            }
        }
        self.finish(record)
    }

    fn resolve_field(&self, field: &FieldSpec, resolved: &ResolutionRecord) -> ResolvedValue {
        let direct = resolve(&self.cache, field, self.today);
        let result = if !direct.is_resolved() && field.derivation.is_some() {
            derive(field, resolved)
        } else {
            direct
        };

        match &result.provenance {
            Provenance::Source { source, date } => {
                info!(field = %field.name, %source, %date, "resolved from source");
            }
            Provenance::Derived => info!(field = %field.name, "resolved by derivation"),
            Provenance::None => info!(field = %field.name, "unresolved"),
        }
        result
    }

    fn finish(self, record: ResolutionRecord) -> ResolutionRecord {
        let stats = self.cache.stats();
        if self.cache.cancel_flag().is_cancelled() {
            warn!(
                fetches = stats.misses,
                "resolution session cancelled, every field reported as unresolved"
            );
            return ResolutionRecord::all_unresolved(self.plan.catalog());
        }

        let derived = record
            .iter()
            .filter(|value| value.provenance == Provenance::Derived)
            .count();
        info!(
            today = %self.today,
            fields = record.len(),
            resolved = record.resolved_count(),
            derived,
            fetches = stats.misses,
            cache_hits = stats.hits,
            fetch_failures = stats.failures,
            "resolution finished"
        );
        record
    }
}
