//! Lõi phân giải chỉ số sức khỏe theo thời gian.
//!
//! Mỗi trường logic có danh sách nguồn ứng viên theo thứ tự ưu tiên. Với nguồn
//! theo ngày, bộ máy lùi dần từ "hôm nay" trong một cửa sổ giới hạn cho tới khi
//! gặp giá trị hợp lệ. Khi không nguồn nào có dữ liệu, trường có thể được suy ra
//! từ các trường khác. Kết quả luôn kèm nguồn gốc (nguồn + ngày, "derived" hoặc
//! "none").

pub mod cache;
pub mod cancel;
pub mod derive;
pub mod error;
pub mod model;
pub mod path;
pub mod plan;
pub mod provider;
pub mod resolver;
pub mod search;
pub mod session;
pub mod validity;

pub use cache::{CacheStats, CachedRecord, RecordKey, SourceCache};
pub use cancel::CancelFlag;
pub use derive::Derivation;
pub use error::{CatalogError, ProviderError};
pub use model::{
    Catalog, FieldSpec, FieldValue, Provenance, ResolutionRecord, ResolvedValue, SourceRef,
};
pub use path::{ExtractionPath, PathSegment};
pub use plan::ResolutionPlan;
pub use provider::{DataProvider, MemoryProvider};
pub use search::Found;
pub use session::{run, Session};
pub use validity::Validity;
