/// 商品登録ハンドラー
///
/// 1リクエスト分の商品登録を処理する。
///
/// # 処理フロー
/// 1. カテゴリの存在確認（存在しなければ終了、保存も発行もしない）
/// 2. 商品IDを生成して商品テーブルへ保存
/// 3. ProductCreatedイベントを別タスクで発行（結果はログのみ）
/// 4. 登録済み商品を返却
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{info, warn, Instrument};

use crate::domain::{generate_product_id, NewProduct, Product, ProductEvent};
use crate::infrastructure::{
    CategoryRepository, CategoryRepositoryError, EventPublisher, ProductRepository,
    ProductRepositoryError, PublishOutcome,
};

/// 商品登録のエラー型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CreateProductError {
    /// 参照先カテゴリが存在しない
    #[error("Category does not exist: {0}")]
    CategoryNotFound(Value),
    /// カテゴリ参照のインフラ障害
    #[error(transparent)]
    LookupUnavailable(#[from] CategoryRepositoryError),
    /// 商品保存の失敗
    #[error(transparent)]
    StoreWriteFailed(#[from] ProductRepositoryError),
}

/// 商品登録の結果
#[derive(Debug)]
pub struct CreatedProduct {
    /// 保存された商品
    pub product: Product,
    /// イベント発行タスク
    ///
    /// レスポンスはこのタスクを待たない。テストでは完了を待って発行内容を確認できる。
    pub publish_task: JoinHandle<PublishOutcome>,
}

/// 商品登録ハンドラー
///
/// ストアクライアントと発行器はアプリケーションルートが所有し、ここへ注入する。
#[derive(Clone)]
pub struct CreateProductHandler {
    /// カテゴリ参照
    categories: Arc<dyn CategoryRepository>,
    /// 商品保存
    products: Arc<dyn ProductRepository>,
    /// イベント発行
    publisher: Arc<dyn EventPublisher>,
}

impl CreateProductHandler {
    /// 新しいCreateProductHandlerを作成
    pub fn new(
        categories: Arc<dyn CategoryRepository>,
        products: Arc<dyn ProductRepository>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            categories,
            products,
            publisher,
        }
    }

    /// 商品登録を処理
    ///
    /// # 戻り値
    /// * `Ok(CreatedProduct)` - 保存済み商品と発行タスク
    /// * `Err(CreateProductError::CategoryNotFound)` - カテゴリが存在しない
    /// * `Err(CreateProductError::LookupUnavailable)` - カテゴリ参照に失敗
    /// * `Err(CreateProductError::StoreWriteFailed)` - 商品保存に失敗
    ///
    /// 下流呼び出しにタイムアウトは設けない。応答しない下流があると完了しない。
    pub async fn handle(&self, request: NewProduct) -> Result<CreatedProduct, CreateProductError> {
        info!(
            name = %request.name,
            category = %request.category,
            quantity = %request.quantity,
            "商品登録リクエストを受信"
        );

        if !self.categories.exists(&request.category).await? {
            warn!(category = %request.category, "カテゴリが存在しません");
            return Err(CreateProductError::CategoryNotFound(request.category));
        }

        let product = Product::new(generate_product_id(Utc::now()), request);
        self.products.create(&product).await?;

        let publish_task = self.dispatch_event(ProductEvent::product_created(product.clone()));

        Ok(CreatedProduct {
            product,
            publish_task,
        })
    }

    /// イベント発行を別タスクとして起動する
    ///
    /// 発行の成否はレスポンスに影響しない。
    fn dispatch_event(&self, event: ProductEvent) -> JoinHandle<PublishOutcome> {
        let publisher = Arc::clone(&self.publisher);
        let span = tracing::info_span!(
            "publish_event",
            event_type = %event.event_type,
            product_id = %event.data.product_id
        );

        tokio::spawn(
            async move {
                let outcome = publisher.publish(&event).await;
                if outcome.success {
                    info!(queue = %outcome.queue, "イベント発行完了");
                } else {
                    warn!(queue = %outcome.queue, error = %outcome.message, "イベント発行失敗（無視）");
                }
                outcome
            }
            .instrument(span),
        )
    }
}
