// インフラストラクチャ層モジュール
pub mod category_repository;
pub mod config;
pub mod dynamodb_client;
pub mod event_publisher;
pub mod logging;
pub mod product_repository;
pub mod secrets_provider;

// 再エクスポート
pub use category_repository::{CategoryRepository, CategoryRepositoryError, DynamoCategoryRepository};
pub use config::{ConfigError, ServiceConfig};
pub use dynamodb_client::build_dynamodb_client;
pub use event_publisher::{AmqpEventPublisher, EventPublisher, EventPublisherError, PublishOutcome};
pub use logging::init_logging;
pub use product_repository::{DynamoProductRepository, ProductRepository, ProductRepositoryError};
pub use secrets_provider::{LambdaSecretsProvider, SecretsProvider, SecretsProviderError};
