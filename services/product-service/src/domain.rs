// ドメイン層モジュール
pub mod credentials;
pub mod product;
pub mod product_event;

// 再エクスポート
pub use credentials::CredentialBundle;
pub use product::{generate_product_id, NewProduct, Product, PRODUCT_ID_PREFIX};
pub use product_event::{ProductEvent, ProductEventType};
