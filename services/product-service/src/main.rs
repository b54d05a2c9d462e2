//! 商品登録サービスのHTTP APIサーバー
//!
//! 起動時にシークレットを取得してDynamoDBクライアントを構築し、
//! RabbitMQへ接続してからHTTPポートをバインドする。
//!
//! # 環境変数
//! - `AWS_REGION`, `SECRETS_FUNCTION_NAME`, `PORT`, `AMQP_URL`, `QUEUE_NAME`, `TABLE_SUFFIX`
//! - `RUST_LOG`: ログレベル（デフォルト: info）

use product_service::application::bootstrap;
use product_service::infrastructure::{init_logging, LambdaSecretsProvider, ServiceConfig};
use std::net::SocketAddr;
use tokio::signal;

/// シャットダウンシグナルを待機する
///
/// SIGTERMまたはCtrl+C (SIGINT) を待機し、いずれかを受信したらリターンする。
/// シグナルハンドラーを登録できなかった場合はそのシグナルを待たない。
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "Ctrl+C シグナルハンドラーの登録に失敗しました");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "SIGTERM シグナルハンドラーの登録に失敗しました");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Ctrl+C (SIGINT) を受信しました。graceful shutdownを開始します");
        }
        _ = terminate => {
            tracing::info!("SIGTERM を受信しました。graceful shutdownを開始します");
        }
    }
}

/// メイン関数
///
/// リクエストは単一スレッドのランタイム上で協調的に処理する。
/// シークレット取得に失敗した場合はポートをバインドせずに異常終了する。
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    tracing::info!("商品サービスを起動します");

    let config = ServiceConfig::from_env()?;
    let secrets = LambdaSecretsProvider::from_config(&config).await;
    let app = bootstrap(&config, &secrets).await?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port()));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Product service listening at http://localhost:{}", config.port());

    axum::serve(listener, app.router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // 処理中リクエストの完了後にRabbitMQ接続を閉じる
    app.publisher.close().await;

    tracing::info!("サーバーが正常に停止しました");
    Ok(())
}
