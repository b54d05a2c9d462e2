//! 商品ドメインモデル

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// 商品IDの接頭辞
pub const PRODUCT_ID_PREFIX: &str = "prod-";

/// 商品登録リクエスト
///
/// POST /products のリクエストボディ。
/// 型の変換や検証は行わず、受け取ったJSON値をそのままストアへ渡す。
/// 欠けている項目は`null`になる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NewProduct {
    /// 商品名
    #[serde(default)]
    #[schema(value_type = String, example = "Smartphone")]
    pub name: Value,
    /// カテゴリ名（Categoriesテーブルに存在する必要がある）
    #[serde(default)]
    #[schema(value_type = String, example = "Electronics")]
    pub category: Value,
    /// 在庫数
    #[serde(default)]
    #[schema(value_type = i64, example = 100)]
    pub quantity: Value,
}

/// 登録済み商品
///
/// Productsテーブルのアイテムであり、201レスポンスのボディでもある。
/// 商品ID以外はリクエストの値をそのまま保持する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// 商品ID（`prod-<UNIXミリ秒>`）
    #[schema(example = "prod-1628073549123")]
    pub product_id: String,
    /// 商品名
    #[schema(value_type = String, example = "Smartphone")]
    pub name: Value,
    /// カテゴリ名
    #[schema(value_type = String, example = "Electronics")]
    pub category: Value,
    /// 在庫数
    #[schema(value_type = i64, example = 100)]
    pub quantity: Value,
}

impl Product {
    /// 登録リクエストに商品IDを割り当てて商品を作成
    pub fn new(product_id: impl Into<String>, request: NewProduct) -> Self {
        Self {
            product_id: product_id.into(),
            name: request.name,
            category: request.category,
            quantity: request.quantity,
        }
    }
}

/// 指定時刻から商品IDを生成する
///
/// フォーマット: `prod-{UNIXミリ秒}`
///
/// 同一ミリ秒内に複数回呼び出すと同じIDになる。
/// 単一プロセスの逐次発行でのみ一意性が期待できる。
pub fn generate_product_id(now: DateTime<Utc>) -> String {
    format!("{}{}", PRODUCT_ID_PREFIX, now.timestamp_millis())
}
