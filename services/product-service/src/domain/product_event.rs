/// 商品イベント
///
/// キューへ発行される一時的なメッセージ。
/// ワイヤーフォーマット: `{"eventType": "...", "data": {...}}`
use serde::{Deserialize, Serialize};

use super::Product;

/// イベント種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductEventType {
    /// 商品が登録された
    ProductCreated,
}

impl ProductEventType {
    /// イベント種別の文字列表現を取得
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductEventType::ProductCreated => "ProductCreated",
        }
    }
}

impl std::fmt::Display for ProductEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// キューへ発行する商品イベント
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductEvent {
    /// イベント種別
    pub event_type: ProductEventType,
    /// 商品レコードのコピー
    pub data: Product,
}

impl ProductEvent {
    /// ProductCreatedイベントを作成
    pub fn product_created(product: Product) -> Self {
        Self {
            event_type: ProductEventType::ProductCreated,
            data: product,
        }
    }

    /// メッセージ本文（JSONバイト列）にシリアライズ
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product() -> Product {
        Product {
            product_id: "prod-1628073549123".to_string(),
            name: serde_json::json!("Smartphone"),
            category: serde_json::json!("Electronics"),
            quantity: serde_json::json!(100),
        }
    }

    #[test]
    fn test_event_type_as_str() {
        assert_eq!(ProductEventType::ProductCreated.as_str(), "ProductCreated");
        assert_eq!(ProductEventType::ProductCreated.to_string(), "ProductCreated");
    }

    #[test]
    fn test_product_created_wire_format() {
        let event = ProductEvent::product_created(sample_product());
        let bytes = event.to_json_bytes().unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "eventType": "ProductCreated",
                "data": {
                    "productId": "prod-1628073549123",
                    "name": "Smartphone",
                    "category": "Electronics",
                    "quantity": 100
                }
            })
        );
    }

    #[test]
    fn test_product_created_keeps_payload() {
        let product = sample_product();
        let event = ProductEvent::product_created(product.clone());

        assert_eq!(event.event_type, ProductEventType::ProductCreated);
        assert_eq!(event.data, product);
    }
}
