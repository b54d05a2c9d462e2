//! HTTPルーティング
//!
//! - 死活確認 (GET /)
//! - 商品登録 (POST /products)
//! - APIドキュメント (GET /api-docs)

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::application::CreateProductHandler;
use crate::domain::{NewProduct, Product};
use crate::http::{ApiError, ApiErrorBody};

/// 死活確認レスポンス
pub const LIVENESS_MESSAGE: &str = "Product Service Running";

/// OpenAPIドキュメント
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Product Service API",
        version = "1.0.0",
        description = "API for managing products"
    ),
    paths(liveness, create_product),
    components(schemas(NewProduct, Product, ApiErrorBody))
)]
pub struct ApiDoc;

/// アプリケーション状態
///
/// ルーター全体で共有される状態を保持する。
#[derive(Clone)]
pub struct AppState {
    /// 商品登録ハンドラー
    pub create_product: Arc<CreateProductHandler>,
}

impl AppState {
    /// 新しいAppStateを作成
    pub fn new(create_product: CreateProductHandler) -> Self {
        Self {
            create_product: Arc::new(create_product),
        }
    }
}

/// 死活確認エンドポイント
///
/// 下流サービスの状態に関係なく常に200を返す。
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service is running", body = String))
)]
async fn liveness() -> &'static str {
    LIVENESS_MESSAGE
}

/// 商品登録エンドポイント (POST /products)
///
/// 各項目の型は検証せず、受け取った値のままカテゴリ参照と保存を行う。
///
/// # Returns
/// - 201 Created: 商品が登録された
/// - 400 Bad Request: カテゴリが存在しない
/// - 500 Internal Server Error: カテゴリ参照または保存に失敗
#[utoipa::path(
    post,
    path = "/products",
    request_body = NewProduct,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Category does not exist", body = ApiErrorBody),
        (status = 500, description = "Error creating product", body = ApiErrorBody)
    )
)]
async fn create_product(State(state): State<AppState>, Json(request): Json<NewProduct>) -> Response {
    match state.create_product.handle(request).await {
        Ok(created) => {
            // 発行タスクは待たずに応答する
            tracing::info!(product_id = %created.product.product_id, "商品を登録しました");
            (StatusCode::CREATED, Json(created.product)).into_response()
        }
        Err(err) => {
            tracing::error!(error = %err, "商品登録エラー");
            ApiError::from(err).into_response()
        }
    }
}

/// OpenAPIドキュメントエンドポイント (GET /api-docs)
async fn api_docs() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// ルーターを構築する
///
/// TraceLayerによりリクエスト/レスポンスの構造化ログを自動記録する。
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(liveness))
        .route("/products", post(create_product))
        .route("/api-docs", get(api_docs))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
