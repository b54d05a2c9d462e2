/// DynamoDBクライアントの構築
///
/// シークレットから取得した認証情報と設定のリージョンでクライアントを作成する。
/// クライアントは起動時に一度だけ作成し、全リクエストで共有する。
use aws_sdk_dynamodb::config::Credentials;
use aws_sdk_dynamodb::Client as DynamoDbClient;

use crate::domain::CredentialBundle;
use crate::infrastructure::ServiceConfig;

/// 認証情報プロバイダー名（SDKのログに出る識別子）
const CREDENTIALS_PROVIDER_NAME: &str = "lambda-secrets";

/// 認証情報バンドルをAWS SDKの静的認証情報に変換
pub fn to_sdk_credentials(credentials: &CredentialBundle) -> Credentials {
    Credentials::new(
        credentials.access_key_id(),
        credentials.secret_access_key(),
        None,
        None,
        CREDENTIALS_PROVIDER_NAME,
    )
}

/// DynamoDBクライアントを構築する
pub async fn build_dynamodb_client(
    config: &ServiceConfig,
    credentials: &CredentialBundle,
) -> DynamoDbClient {
    let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.region().to_string()))
        .credentials_provider(to_sdk_credentials(credentials))
        .load()
        .await;

    DynamoDbClient::new(&aws_config)
}
