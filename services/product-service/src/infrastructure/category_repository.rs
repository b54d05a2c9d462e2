/// DynamoDBのカテゴリレジストリを参照するリポジトリ
///
/// カテゴリは存在確認のみに使う。このサービスからは読み取り専用。
use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

/// カテゴリテーブルのパーティションキー名
pub const CATEGORY_KEY: &str = "name";

/// カテゴリ参照のエラー型
///
/// 「存在しない」はエラーではなく`Ok(false)`で表す。
/// このエラーは接続失敗などインフラ障害のみを表す。
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CategoryRepositoryError {
    /// カテゴリレジストリに到達できない
    #[error("Category lookup unavailable: {0}")]
    Unavailable(String),
}

/// カテゴリ参照トレイト
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// カテゴリが存在するか確認する
    ///
    /// # 引数
    /// * `category` - カテゴリ名（リクエストの値をそのまま渡す）
    ///
    /// # 戻り値
    /// * `Ok(true)` - 存在する
    /// * `Ok(false)` - 存在しない
    /// * `Err(CategoryRepositoryError)` - 参照に失敗
    async fn exists(&self, category: &Value) -> Result<bool, CategoryRepositoryError>;
}

/// CategoryRepositoryのDynamoDB実装
#[derive(Debug, Clone)]
pub struct DynamoCategoryRepository {
    /// DynamoDBクライアント
    client: DynamoDbClient,
    /// カテゴリテーブル名
    table_name: String,
}

impl DynamoCategoryRepository {
    /// 新しいDynamoCategoryRepositoryを作成
    pub fn new(client: DynamoDbClient, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// テーブル名を取得
    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

#[async_trait]
impl CategoryRepository for DynamoCategoryRepository {
    async fn exists(&self, category: &Value) -> Result<bool, CategoryRepositoryError> {
        // 文字列以外のキーもそのまま渡し、DynamoDB側の検証に任せる
        let key: AttributeValue = serde_dynamo::to_attribute_value(category)
            .map_err(|e| CategoryRepositoryError::Unavailable(e.to_string()))?;

        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(CATEGORY_KEY, key)
            .send()
            .await;

        match result {
            Ok(output) => {
                let found = output.item().is_some();
                debug!(
                    table = %self.table_name,
                    category = %category,
                    found,
                    "カテゴリ参照完了"
                );
                Ok(found)
            }
            Err(err) => {
                let message = aws_sdk_dynamodb::error::DisplayErrorContext(&err).to_string();
                error!(
                    table = %self.table_name,
                    category = %category,
                    error = %message,
                    "カテゴリ参照エラー"
                );
                Err(CategoryRepositoryError::Unavailable(message))
            }
        }
    }
}
