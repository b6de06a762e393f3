//! Giao diện nhà cung cấp dữ liệu và một bản cài đặt trong bộ nhớ.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use chrono::NaiveDate;
use serde_json::Value;

use crate::cache::RecordKey;
use crate::error::ProviderError;

/// Nguồn bản ghi thô. Nhận vào một handle đã xác thực; việc thử lại hay
/// timeout là trách nhiệm của bên cài đặt.
pub trait DataProvider: Send + Sync {
    /// Bản ghi của `source` cho một ngày.
    fn fetch(&self, source: &str, date: NaiveDate) -> Result<Value, ProviderError>;

    /// Bản ghi của nguồn không đánh chỉ mục theo ngày.
    fn fetch_static(&self, source: &str) -> Result<Value, ProviderError>;
}

/// Provider trong bộ nhớ, ghi lại mọi lần gọi. Dùng cho bridge WASM và kiểm thử.
#[derive(Debug, Default)]
pub struct MemoryProvider {
    records: HashMap<RecordKey, Result<Value, ProviderError>>,
    calls: Mutex<Vec<RecordKey>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(mut self, source: &str, date: NaiveDate, record: Value) -> Self {
        self.insert(RecordKey::dated(source, date), Ok(record));
        self
    }

    pub fn with_static(mut self, source: &str, record: Value) -> Self {
        self.insert(RecordKey::fixed(source), Ok(record));
        self
    }

    pub fn with_failure(mut self, source: &str, date: NaiveDate, error: ProviderError) -> Self {
        self.insert(RecordKey::dated(source, date), Err(error));
        self
    }

    pub fn with_static_failure(mut self, source: &str, error: ProviderError) -> Self {
        self.insert(RecordKey::fixed(source), Err(error));
        self
    }

    pub fn insert(&mut self, key: RecordKey, outcome: Result<Value, ProviderError>) {
        self.records.insert(key, outcome);
    }

    /// Các lần gọi theo thứ tự thực hiện.
    pub fn calls(&self) -> Vec<RecordKey> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn calls_to(&self, source: &str) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|key| key.source == source)
            .count()
    }

    fn lookup(&self, key: RecordKey) -> Result<Value, ProviderError> {
        let outcome = self
            .records
            .get(&key)
            .cloned()
            .unwrap_or(Err(ProviderError::NoData));
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(key);
        outcome
    }
}

impl DataProvider for MemoryProvider {
    fn fetch(&self, source: &str, date: NaiveDate) -> Result<Value, ProviderError> {
        self.lookup(RecordKey::dated(source, date))
    }

    fn fetch_static(&self, source: &str) -> Result<Value, ProviderError> {
        self.lookup(RecordKey::fixed(source))
    }
}
