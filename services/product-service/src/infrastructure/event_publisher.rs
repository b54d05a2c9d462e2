//! イベント発行モジュール
//!
//! RabbitMQの永続キューへ商品イベントを発行する。
//! - 接続とチャネルは起動時に一度だけ確立し、全リクエストで再利用する
//! - 接続が無い、または切断されている場合は失敗結果を返すだけでパニックしない
//! - 再試行・再接続は行わない

use async_trait::async_trait;
use lapin::options::{BasicPublishOptions, QueueDeclareOptions};
use lapin::types::{FieldTable, ShortString};
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::domain::ProductEvent;

/// 永続メッセージを表すdelivery_mode
pub const PERSISTENT_DELIVERY_MODE: u8 = 2;

/// メッセージのContent-Type
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// イベント発行のエラー型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EventPublisherError {
    /// RabbitMQへの接続に失敗
    #[error("AMQP接続エラー: {0}")]
    ConnectError(String),
    /// チャネルが初期化されていない、または切断されている
    #[error("Channel is not initialized")]
    NotConnected,
    /// メッセージのシリアライズに失敗
    #[error("JSONシリアライズエラー: {0}")]
    SerializeError(String),
    /// basic.publishに失敗
    #[error("AMQP発行エラー: {0}")]
    PublishError(String),
}

/// イベント発行結果
#[derive(Debug, Clone, PartialEq)]
pub struct PublishOutcome {
    /// 発行先キュー名
    pub queue: String,
    /// 成功したかどうか
    pub success: bool,
    /// 結果メッセージ
    pub message: String,
}

impl PublishOutcome {
    /// 成功結果を作成
    pub fn success(queue: impl Into<String>) -> Self {
        let queue = queue.into();
        Self {
            message: format!("{} へイベントを発行しました", queue),
            queue,
            success: true,
        }
    }

    /// 失敗結果を作成
    pub fn failure(queue: impl Into<String>, error: impl std::fmt::Display) -> Self {
        Self {
            queue: queue.into(),
            success: false,
            message: format!("イベント発行に失敗しました: {}", error),
        }
    }
}

/// イベント発行トレイト（テスト用の抽象化）
///
/// 失敗は`Err`ではなく`PublishOutcome`で返す。呼び出し側はログにのみ使う。
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// イベントを発行する
    async fn publish(&self, event: &ProductEvent) -> PublishOutcome;
}

/// RabbitMQを使用したイベント発行実装
pub struct AmqpEventPublisher {
    /// AMQP接続（未接続の場合はNone）
    connection: Option<Connection>,
    /// 発行用チャネル（未接続の場合はNone）
    channel: Option<Channel>,
    /// 発行先キュー名
    queue_name: String,
}

impl AmqpEventPublisher {
    /// RabbitMQへ接続し、永続キューを宣言する
    ///
    /// # 引数
    /// * `amqp_url` - 接続URL（例: "amqp://localhost:5672/"）
    /// * `queue_name` - 発行先キュー名
    pub async fn connect(amqp_url: &str, queue_name: &str) -> Result<Self, EventPublisherError> {
        let connection = Connection::connect(amqp_url, ConnectionProperties::default())
            .await
            .map_err(|e| EventPublisherError::ConnectError(e.to_string()))?;

        let channel = connection
            .create_channel()
            .await
            .map_err(|e| EventPublisherError::ConnectError(e.to_string()))?;

        channel
            .queue_declare(
                queue_name,
                QueueDeclareOptions {
                    durable: true,
                    ..QueueDeclareOptions::default()
                },
                FieldTable::default(),
            )
            .await
            .map_err(|e| EventPublisherError::ConnectError(e.to_string()))?;

        info!(queue = %queue_name, "RabbitMQに接続しました");

        Ok(Self {
            connection: Some(connection),
            channel: Some(channel),
            queue_name: queue_name.to_string(),
        })
    }

    /// 未接続状態の発行器を作成
    ///
    /// すべての発行は失敗結果を返す。
    pub fn disconnected(queue_name: impl Into<String>) -> Self {
        Self {
            connection: None,
            channel: None,
            queue_name: queue_name.into(),
        }
    }

    /// 接続を試み、失敗した場合はログを出して未接続状態で続行する
    pub async fn connect_or_disconnected(amqp_url: &str, queue_name: &str) -> Self {
        match Self::connect(amqp_url, queue_name).await {
            Ok(publisher) => publisher,
            Err(err) => {
                error!(
                    queue = %queue_name,
                    error = %err,
                    "RabbitMQへの接続に失敗しました。イベント発行なしで起動します"
                );
                Self::disconnected(queue_name)
            }
        }
    }

    /// 発行先キュー名を取得
    pub fn queue_name(&self) -> &str {
        &self.queue_name
    }

    /// チャネルが利用可能かどうか
    pub fn is_connected(&self) -> bool {
        self.channel
            .as_ref()
            .is_some_and(|channel| channel.status().connected())
    }

    /// メッセージプロパティ（永続配信、JSON）
    pub fn message_properties() -> BasicProperties {
        BasicProperties::default()
            .with_delivery_mode(PERSISTENT_DELIVERY_MODE)
            .with_content_type(ShortString::from(JSON_CONTENT_TYPE))
    }

    /// 接続を閉じる
    pub async fn close(&self) {
        if let Some(connection) = &self.connection {
            if !connection.status().connected() {
                return;
            }
            match connection.close(200, "shutdown").await {
                Ok(()) => info!(queue = %self.queue_name, "RabbitMQ接続を閉じました"),
                Err(err) => warn!(queue = %self.queue_name, error = %err, "RabbitMQ接続のクローズに失敗"),
            }
        }
    }

    async fn send(&self, channel: &Channel, payload: &[u8]) -> Result<(), EventPublisherError> {
        channel
            .basic_publish(
                "",
                &self.queue_name,
                BasicPublishOptions::default(),
                payload,
                Self::message_properties(),
            )
            .await
            .map_err(|e| EventPublisherError::PublishError(e.to_string()))?
            .await
            .map_err(|e| EventPublisherError::PublishError(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl EventPublisher for AmqpEventPublisher {
    async fn publish(&self, event: &ProductEvent) -> PublishOutcome {
        let Some(channel) = self
            .channel
            .as_ref()
            .filter(|channel| channel.status().connected())
        else {
            error!(
                queue = %self.queue_name,
                event_type = %event.event_type,
                product_id = %event.data.product_id,
                "チャネルが初期化されていません"
            );
            return PublishOutcome::failure(&self.queue_name, EventPublisherError::NotConnected);
        };

        let payload = match event.to_json_bytes() {
            Ok(payload) => payload,
            Err(err) => {
                let err = EventPublisherError::SerializeError(err.to_string());
                error!(queue = %self.queue_name, error = %err, "イベントのシリアライズに失敗");
                return PublishOutcome::failure(&self.queue_name, err);
            }
        };

        match self.send(channel, &payload).await {
            Ok(()) => {
                info!(
                    queue = %self.queue_name,
                    event_type = %event.event_type,
                    product_id = %event.data.product_id,
                    "イベントを発行しました"
                );
                PublishOutcome::success(&self.queue_name)
            }
            Err(err) => {
                error!(
                    queue = %self.queue_name,
                    event_type = %event.event_type,
                    product_id = %event.data.product_id,
                    error = %err,
                    "イベント発行エラー"
                );
                PublishOutcome::failure(&self.queue_name, err)
            }
        }
    }
}
