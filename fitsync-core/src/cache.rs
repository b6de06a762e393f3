//! Bộ nhớ đệm bản ghi thô trong phạm vi một phiên.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::cancel::CancelFlag;
use crate::error::ProviderError;
use crate::provider::DataProvider;

/// Khóa bản ghi: nguồn + ngày, hoặc chỉ nguồn với nguồn tĩnh.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordKey {
    pub source: String,
    pub date: Option<NaiveDate>,
}

impl RecordKey {
    pub fn dated(source: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            source: source.into(),
            date: Some(date),
        }
    }

    pub fn fixed(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            date: None,
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.date {
            Some(date) => write!(f, "{}@{date}", self.source),
            None => write!(f, "{}@static", self.source),
        }
    }
}

/// Kết quả tra cứu. `FetchFailed` khác với bản ghi rỗng nhưng hợp lệ.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedRecord {
    Available(Arc<Value>),
    FetchFailed,
}

impl CachedRecord {
    pub fn record(&self) -> Option<&Value> {
        match self {
            Self::Available(record) => Some(record),
            Self::FetchFailed => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: usize,
    /// Số lần thực sự gọi provider.
    pub misses: usize,
    pub failures: usize,
}

type Slot = Arc<OnceLock<CachedRecord>>;

/// Mỗi khóa chỉ gọi provider đúng một lần, kể cả khi nhiều luồng hỏi cùng lúc.
pub struct SourceCache<'p> {
    provider: &'p dyn DataProvider,
    slots: Mutex<HashMap<RecordKey, Slot>>,
    cancel: CancelFlag,
    hits: AtomicUsize,
    misses: AtomicUsize,
    failures: AtomicUsize,
}

impl<'p> SourceCache<'p> {
    pub fn new(provider: &'p dyn DataProvider) -> Self {
        Self::with_cancel(provider, CancelFlag::new())
    }

    pub fn with_cancel(provider: &'p dyn DataProvider, cancel: CancelFlag) -> Self {
        Self {
            provider,
            slots: Mutex::new(HashMap::new()),
            cancel,
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
            failures: AtomicUsize::new(0),
        }
    }

    pub fn cancel_flag(&self) -> &CancelFlag {
        &self.cancel
    }

    pub fn get(&self, key: &RecordKey) -> CachedRecord {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(key.clone()).or_default())
        };

        let mut fetched = false;
        let entry = slot.get_or_init(|| {
            fetched = true;
            self.fetch(key)
        });
        if !fetched {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        entry.clone()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }

    fn fetch(&self, key: &RecordKey) -> CachedRecord {
        if self.cancel.is_cancelled() {
            return CachedRecord::FetchFailed;
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let outcome = match key.date {
            Some(date) => self.provider.fetch(&key.source, date),
            None => self.provider.fetch_static(&key.source),
        };

        match outcome {
            Ok(Value::Null) => self.fail(key, &ProviderError::NoData),
            Ok(record) => CachedRecord::Available(Arc::new(record)),
            Err(err) => self.fail(key, &err),
        }
    }

    fn fail(&self, key: &RecordKey, err: &ProviderError) -> CachedRecord {
        self.failures.fetch_add(1, Ordering::Relaxed);
        if *err == ProviderError::Unauthorized {
            warn!(%key, "authentication lost, cancelling session");
            self.cancel.cancel();
        } else {
            debug!(%key, error = %err, "fetch failed");
        }
        CachedRecord::FetchFailed
    }
}
