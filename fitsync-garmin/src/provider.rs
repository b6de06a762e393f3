//! Record provider backed by exported JSON files.
//!
//! Layout: dated records at `<root>/<source>/<YYYY-MM-DD>.json`, static
//! records at `<root>/<source>.json`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use fitsync_core::{DataProvider, ProviderError};
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct JsonDirProvider {
    root: PathBuf,
}

impl JsonDirProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn read(&self, path: &Path) -> Result<Value, ProviderError> {
        let text = std::fs::read_to_string(path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => ProviderError::NoData,
            _ => ProviderError::Unavailable(format!("{}: {err}", path.display())),
        })?;

        match serde_json::from_str(&text) {
            Ok(Value::Null) => Err(ProviderError::NoData),
            Ok(value) => Ok(value),
            Err(err) => Err(ProviderError::Parse(format!("{}: {err}", path.display()))),
        }
    }
}

impl DataProvider for JsonDirProvider {
    fn fetch(&self, source: &str, date: NaiveDate) -> Result<Value, ProviderError> {
        self.read(&self.root.join(source).join(format!("{date}.json")))
    }

    fn fetch_static(&self, source: &str) -> Result<Value, ProviderError> {
        self.read(&self.root.join(format!("{source}.json")))
    }
}
