// HTTPプレゼンテーション層モジュール
pub mod error;
pub mod router;

// 再エクスポート
pub use error::{ApiError, ApiErrorBody};
pub use router::{create_router, ApiDoc, AppState};
