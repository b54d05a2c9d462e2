//! シークレット取得モジュール
//!
//! 起動時にシークレット取得用Lambda関数を同期呼び出しし、
//! DynamoDB接続用の認証情報を取得する。
//!
//! Lambdaのレスポンスペイロードは3層のJSONになっている:
//! - 外側: `{"body": "<JSON文字列>"}` または `{"errorMessage": "..."}`
//! - body: `{"secret": "<JSON文字列>"}`
//! - secret: `{"AWS_ACCESS_KEY_ID": "...", "AWS_SECRET_ACCESS_KEY": "..."}`

use async_trait::async_trait;
use aws_sdk_lambda::Client as LambdaClient;
use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info};

use crate::domain::CredentialBundle;
use crate::infrastructure::ServiceConfig;

/// シークレット取得のエラー型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SecretsProviderError {
    /// Lambda呼び出しに失敗
    #[error("AWS Lambda APIエラー: {0}")]
    InvokeError(String),
    /// Lambda関数がエラーを返した
    #[error("シークレット取得関数がエラーを返しました: {0}")]
    FunctionError(String),
    /// ペイロードの形式が不正
    #[error("シークレットのペイロードが不正です: {0}")]
    InvalidPayload(String),
}

/// シークレット取得トレイト（テスト用の抽象化）
#[async_trait]
pub trait SecretsProvider: Send + Sync {
    /// 認証情報を取得する
    async fn fetch(&self) -> Result<CredentialBundle, SecretsProviderError>;
}

/// Lambda呼び出しの外側ペイロード
#[derive(Debug, Deserialize)]
struct InvokePayload {
    #[serde(rename = "errorMessage")]
    error_message: Option<String>,
    body: Option<String>,
}

/// bodyフィールドの中身
#[derive(Debug, Deserialize)]
struct SecretEnvelope {
    secret: String,
}

/// secretフィールドの中身
#[derive(Debug, Deserialize)]
struct SecretDocument {
    #[serde(rename = "AWS_ACCESS_KEY_ID")]
    access_key_id: String,
    #[serde(rename = "AWS_SECRET_ACCESS_KEY")]
    secret_access_key: String,
}

/// Lambdaのレスポンスペイロードから認証情報を取り出す
///
/// # 戻り値
/// * `Ok(CredentialBundle)` - 認証情報
/// * `Err(SecretsProviderError::FunctionError)` - `errorMessage`が含まれていた
/// * `Err(SecretsProviderError::InvalidPayload)` - いずれかの層が欠落またはJSONとして不正
pub fn parse_secret_payload(payload: &[u8]) -> Result<CredentialBundle, SecretsProviderError> {
    let outer: InvokePayload = serde_json::from_slice(payload)
        .map_err(|e| SecretsProviderError::InvalidPayload(format!("payload: {}", e)))?;

    if let Some(message) = outer.error_message {
        return Err(SecretsProviderError::FunctionError(message));
    }

    let body = outer
        .body
        .ok_or_else(|| SecretsProviderError::InvalidPayload("bodyがありません".to_string()))?;

    let envelope: SecretEnvelope = serde_json::from_str(&body)
        .map_err(|e| SecretsProviderError::InvalidPayload(format!("body: {}", e)))?;

    let document: SecretDocument = serde_json::from_str(&envelope.secret)
        .map_err(|e| SecretsProviderError::InvalidPayload(format!("secret: {}", e)))?;

    Ok(CredentialBundle::new(
        document.access_key_id,
        document.secret_access_key,
    ))
}

/// Lambda関数を呼び出してシークレットを取得する実装
pub struct LambdaSecretsProvider {
    client: LambdaClient,
    function_name: String,
}

impl LambdaSecretsProvider {
    /// 新しいLambdaSecretsProviderを作成
    pub fn new(client: LambdaClient, function_name: impl Into<String>) -> Self {
        Self {
            client,
            function_name: function_name.into(),
        }
    }

    /// サービス設定のリージョンと関数名からクライアントを作成
    ///
    /// Lambda呼び出し自体の認証はAWS標準の認証チェーンを使う。
    pub async fn from_config(config: &ServiceConfig) -> Self {
        let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region().to_string()))
            .load()
            .await;
        let client = LambdaClient::new(&aws_config);
        Self::new(client, config.secrets_function_name())
    }

    /// 呼び出し対象の関数名を取得
    pub fn function_name(&self) -> &str {
        &self.function_name
    }
}

#[async_trait]
impl SecretsProvider for LambdaSecretsProvider {
    async fn fetch(&self) -> Result<CredentialBundle, SecretsProviderError> {
        info!(function_name = %self.function_name, "シークレット取得Lambdaを呼び出し");

        let output = self
            .client
            .invoke()
            .function_name(&self.function_name)
            .send()
            .await
            .map_err(|err| {
                let message = aws_sdk_lambda::error::DisplayErrorContext(&err).to_string();
                error!(function_name = %self.function_name, error = %message, "Lambda呼び出しエラー");
                SecretsProviderError::InvokeError(message)
            })?;

        let payload = output
            .payload()
            .map(|blob| blob.as_ref())
            .ok_or_else(|| SecretsProviderError::InvalidPayload("ペイロードが空です".to_string()))?;

        let result = parse_secret_payload(payload);

        // ペイロードにerrorMessageが無くても関数エラーは失敗として扱う
        if let (Ok(_), Some(function_error)) = (&result, output.function_error()) {
            error!(function_name = %self.function_name, function_error = %function_error, "Lambda関数エラー");
            return Err(SecretsProviderError::FunctionError(function_error.to_string()));
        }

        match &result {
            Ok(_) => info!(function_name = %self.function_name, "シークレットを取得しました"),
            Err(err) => error!(function_name = %self.function_name, error = %err, "シークレット取得エラー"),
        }

        result
    }
}
