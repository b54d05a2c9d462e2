// アプリケーション層モジュール
pub mod bootstrap;
pub mod create_product_handler;

// 再エクスポート
pub use bootstrap::{bootstrap, Application, StartupError};
pub use create_product_handler::{CreateProductError, CreateProductHandler, CreatedProduct};
