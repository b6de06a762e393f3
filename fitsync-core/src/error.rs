//! Lỗi cấu hình catalog và lỗi từ nhà cung cấp dữ liệu.

/// Lỗi cấu hình catalog, phát hiện khi dựng phiên chứ không phải lúc chạy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("Trường `{0}` được khai báo nhiều lần")]
    DuplicateField(String),
    #[error("Trường `{0}` không có nguồn ứng viên và cũng không có công thức suy diễn")]
    EmptyField(String),
    #[error("Trường `{field}` có đường trích rỗng cho nguồn `{source_name}`")]
    EmptyPath { field: String, source_name: String },
    #[error("Trường `{field}` phụ thuộc vào trường không tồn tại `{dependency}`")]
    UnknownDependency { field: String, dependency: String },
    #[error("Trường `{0}` tự phụ thuộc vào chính nó")]
    SelfDependency(String),
    #[error("Phụ thuộc vòng giữa các trường: {}", .0.join(" -> "))]
    CircularDependency(Vec<String>),
}

/// Lỗi khi lấy bản ghi thô từ nguồn.
///
/// Bộ nhớ đệm coi mọi biến thể là "không lấy được"; riêng `Unauthorized`
/// còn hủy cả phiên.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("Không có dữ liệu")]
    NoData,
    #[error("Mất xác thực với dịch vụ")]
    Unauthorized,
    #[error("Hết thời gian chờ")]
    Timeout,
    #[error("Bị giới hạn tần suất gọi")]
    RateLimited,
    #[error("Nguồn không khả dụng: {0}")]
    Unavailable(String),
    #[error("Không đọc được dữ liệu: {0}")]
    Parse(String),
}
