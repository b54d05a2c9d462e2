/// 起動処理
///
/// シークレット取得 → DynamoDBクライアント構築 → RabbitMQ接続 → ルーター構築
/// の順に実行する。シークレット取得に失敗した場合は以降を実行しない。
use axum::Router;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

use crate::application::CreateProductHandler;
use crate::http::{create_router, AppState};
use crate::infrastructure::{
    build_dynamodb_client, AmqpEventPublisher, DynamoCategoryRepository, DynamoProductRepository,
    SecretsProvider, SecretsProviderError, ServiceConfig,
};

/// 起動処理のエラー型
#[derive(Debug, Error)]
pub enum StartupError {
    /// 認証情報を取得できない（起動中止）
    #[error("Secrets unavailable: {0}")]
    SecretsUnavailable(#[from] SecretsProviderError),
}

/// 起動済みアプリケーション
pub struct Application {
    /// HTTPルーター
    pub router: Router,
    /// イベント発行器（シャットダウン時に接続を閉じる）
    pub publisher: Arc<AmqpEventPublisher>,
}

/// 依存コンポーネントを構築してアプリケーションを組み立てる
///
/// RabbitMQへの接続失敗は致命的ではなく、発行なしで起動を続ける。
pub async fn bootstrap<S>(config: &ServiceConfig, secrets: &S) -> Result<Application, StartupError>
where
    S: SecretsProvider + ?Sized,
{
    let credentials = secrets.fetch().await.inspect_err(|err| {
        error!(error = %err, "シークレット取得に失敗したため起動を中止します");
    })?;

    let dynamodb = build_dynamodb_client(config, &credentials).await;
    info!(
        region = %config.region(),
        categories_table = %config.categories_table(),
        products_table = %config.products_table(),
        "DynamoDBクライアントを構築しました"
    );

    let categories = Arc::new(DynamoCategoryRepository::new(
        dynamodb.clone(),
        config.categories_table(),
    ));
    let products = Arc::new(DynamoProductRepository::new(
        dynamodb,
        config.products_table(),
    ));

    let publisher = Arc::new(
        AmqpEventPublisher::connect_or_disconnected(config.amqp_url(), config.queue_name()).await,
    );

    let handler = CreateProductHandler::new(categories, products, publisher.clone());
    let router = create_router(AppState::new(handler));

    Ok(Application { router, publisher })
}
