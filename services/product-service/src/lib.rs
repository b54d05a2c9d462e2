// ドメイン層モジュール
pub mod domain;

// アプリケーション層モジュール
pub mod application;

// インフラストラクチャ層モジュール
pub mod infrastructure;

// HTTPプレゼンテーション層モジュール
pub mod http;
