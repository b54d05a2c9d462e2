//! APIエラーハンドリング
//!
//! エラーレスポンスはJSON形式で`message`を含み、
//! 500エラーの場合は`error`に詳細を含める。

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::CreateProductError;

/// カテゴリ不在時のメッセージ
pub const CATEGORY_NOT_FOUND_MESSAGE: &str = "Category does not exist";

/// 商品登録失敗時のメッセージ
pub const CREATION_FAILED_MESSAGE: &str = "Error creating product";

/// APIエラーレスポンスのボディ
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct ApiErrorBody {
    /// エラーメッセージ
    #[schema(example = "Error creating product")]
    pub message: String,
    /// 失敗の詳細（500エラーのみ）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// APIエラー
///
/// ステータスコードとJSON形式のエラーボディを含む。
#[derive(Debug, Clone)]
pub struct ApiError {
    /// HTTPステータスコード
    status: StatusCode,
    /// エラーレスポンスボディ
    body: ApiErrorBody,
}

impl ApiError {
    /// 新しいApiErrorを作成
    pub fn new(status: StatusCode, message: impl Into<String>, error: Option<String>) -> Self {
        Self {
            status,
            body: ApiErrorBody {
                message: message.into(),
                error,
            },
        }
    }

    /// 400 Bad Request（カテゴリ不在）を作成
    pub fn category_not_found() -> Self {
        Self::new(StatusCode::BAD_REQUEST, CATEGORY_NOT_FOUND_MESSAGE, None)
    }

    /// 500 Internal Server Error（商品登録失敗）を作成
    ///
    /// 失敗の詳細はそのままクライアントへ返す。
    pub fn creation_failed(detail: impl std::fmt::Display) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            CREATION_FAILED_MESSAGE,
            Some(detail.to_string()),
        )
    }

    /// ステータスコードを取得
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// レスポンスボディを取得
    pub fn body(&self) -> &ApiErrorBody {
        &self.body
    }
}

impl From<CreateProductError> for ApiError {
    fn from(err: CreateProductError) -> Self {
        match err {
            CreateProductError::CategoryNotFound(_) => Self::category_not_found(),
            // カテゴリ参照失敗と保存失敗は呼び出し側から区別しない
            CreateProductError::LookupUnavailable(e) => Self::creation_failed(e),
            CreateProductError::StoreWriteFailed(e) => Self::creation_failed(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
