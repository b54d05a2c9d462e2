/// DynamoDBの商品テーブルへ書き込むリポジトリ
///
/// 商品は登録時に一度だけ書き込まれ、このサービスから更新・削除はしない。
use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{error, info};

use crate::domain::Product;

/// 商品リポジトリ操作のエラー型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProductRepositoryError {
    /// DynamoDBへの書き込みに失敗
    #[error("Write error: {0}")]
    WriteError(String),
}

/// 商品永続化トレイト
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// 商品を保存する
    ///
    /// # 戻り値
    /// * 成功時は`Ok(())`
    /// * 失敗時は`Err(ProductRepositoryError)`
    async fn create(&self, product: &Product) -> Result<(), ProductRepositoryError>;
}

/// ProductRepositoryのDynamoDB実装
#[derive(Debug, Clone)]
pub struct DynamoProductRepository {
    /// DynamoDBクライアント
    client: DynamoDbClient,
    /// 商品テーブル名
    table_name: String,
}

impl DynamoProductRepository {
    /// 新しいDynamoProductRepositoryを作成
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

    /// 商品保存用の属性マップを構築
    ///
    /// 項目: productId(S), name, category, quantity
    ///
    /// productId以外はリクエストの値を型変換せずに書き込む。
    /// 文字列はS、数値はN、nullはNULLになる。
    fn build_product_item(
        product: &Product,
    ) -> Result<HashMap<String, AttributeValue>, ProductRepositoryError> {
        let mut item = HashMap::new();
        item.insert(
            "productId".to_string(),
            AttributeValue::S(product.product_id.clone()),
        );
        for (key, value) in [
            ("name", &product.name),
            ("category", &product.category),
            ("quantity", &product.quantity),
        ] {
            let attribute: AttributeValue = serde_dynamo::to_attribute_value(value)
                .map_err(|e| ProductRepositoryError::WriteError(e.to_string()))?;
            item.insert(key.to_string(), attribute);
        }
        Ok(item)
    }
}

#[async_trait]
impl ProductRepository for DynamoProductRepository {
    async fn create(&self, product: &Product) -> Result<(), ProductRepositoryError> {
        let result = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(Self::build_product_item(product)?))
            .send()
            .await;

        match result {
            Ok(_) => {
                info!(
                    table = %self.table_name,
                    product_id = %product.product_id,
                    "商品を保存しました"
                );
                Ok(())
            }
            Err(err) => {
                let message = aws_sdk_dynamodb::error::DisplayErrorContext(&err).to_string();
                error!(
                    table = %self.table_name,
                    product_id = %product.product_id,
                    error = %message,
                    "商品保存エラー"
                );
                Err(ProductRepositoryError::WriteError(message))
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::infrastructure::dynamodb_client::tests::static_dynamodb_client;
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    fn sample_product() -> Product {
        Product {
            product_id: "prod-1628073549123".to_string(),
            name: json!("Smartphone"),
            category: json!("Electronics"),
            quantity: json!(100),
        }
    }

    #[test]
    fn test_product_repository_error_display() {
        let error = ProductRepositoryError::WriteError("throughput exceeded".to_string());
        assert_eq!(error.to_string(), "Write error: throughput exceeded");
    }

    #[test]
    fn test_build_product_item() {
        let item = DynamoProductRepository::build_product_item(&sample_product()).unwrap();

        assert_eq!(item.len(), 4);
        assert_eq!(
            item.get("productId"),
            Some(&AttributeValue::S("prod-1628073549123".to_string()))
        );
        assert_eq!(
            item.get("name"),
            Some(&AttributeValue::S("Smartphone".to_string()))
        );
        assert_eq!(
            item.get("category"),
            Some(&AttributeValue::S("Electronics".to_string()))
        );
        assert_eq!(
            item.get("quantity"),
            Some(&AttributeValue::N("100".to_string()))
        );
    }

    #[test]
    fn test_build_product_item_passes_values_through() {
        let product = Product {
            product_id: "prod-1".to_string(),
            name: json!(42),
            category: json!("Electronics"),
            quantity: json!("many"),
        };

        let item = DynamoProductRepository::build_product_item(&product).unwrap();

        assert_eq!(item.get("name"), Some(&AttributeValue::N("42".to_string())));
        assert_eq!(
            item.get("quantity"),
            Some(&AttributeValue::S("many".to_string()))
        );
    }

    #[test]
    fn test_build_product_item_keeps_fraction_and_null() {
        let product = Product {
            product_id: "prod-1".to_string(),
            name: json!("Smartphone"),
            category: Value::Null,
            quantity: json!(1.5),
        };

        let item = DynamoProductRepository::build_product_item(&product).unwrap();

        assert_eq!(item.get("category"), Some(&AttributeValue::Null(true)));
        assert_eq!(
            item.get("quantity"),
            Some(&AttributeValue::N("1.5".to_string()))
        );
    }

    #[test]
    fn test_dynamo_product_repository_table_name() {
        let repo = DynamoProductRepository::new(static_dynamodb_client(), "Products_test");

        assert_eq!(repo.table_name(), "Products_test");
    }

    // ==================== モック商品リポジトリ ====================

    /// ユニットテスト用のモックProductRepository
    ///
    /// 書き込みを順に記録する。IDが衝突しても上書きせず両方残す。
    #[derive(Debug, Clone, Default)]
    pub struct MockProductRepository {
        /// 保存された商品（書き込み順）
        products: Arc<Mutex<Vec<Product>>>,
        /// 次の操作で返すエラー（エラーパスのテスト用）
        next_error: Arc<Mutex<Option<ProductRepositoryError>>>,
    }

    impl MockProductRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_next_error(&self, error: ProductRepositoryError) {
            *self.next_error.lock().unwrap() = Some(error);
        }

        pub fn product_count(&self) -> usize {
            self.products.lock().unwrap().len()
        }

        pub fn products(&self) -> Vec<Product> {
            self.products.lock().unwrap().clone()
        }

        fn take_error(&self) -> Option<ProductRepositoryError> {
            self.next_error.lock().unwrap().take()
        }
    }

    #[async_trait]
    impl ProductRepository for MockProductRepository {
        async fn create(&self, product: &Product) -> Result<(), ProductRepositoryError> {
            if let Some(error) = self.take_error() {
                return Err(error);
            }

            self.products.lock().unwrap().push(product.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_mock_records_products() {
        let repo = MockProductRepository::new();

        repo.create(&sample_product()).await.unwrap();

        assert_eq!(repo.product_count(), 1);
        assert_eq!(repo.products()[0], sample_product());
    }

    #[tokio::test]
    async fn test_mock_next_error_is_consumed_once() {
        let repo = MockProductRepository::new();
        repo.set_next_error(ProductRepositoryError::WriteError("boom".to_string()));

        assert!(repo.create(&sample_product()).await.is_err());
        assert!(repo.create(&sample_product()).await.is_ok());
        assert_eq!(repo.product_count(), 1);
    }
}
