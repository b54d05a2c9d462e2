/// サービス設定
///
/// 起動時に一度だけ構築し、必要なコンポーネントへ参照で渡す。
/// 各値は環境変数で上書きでき、未設定の場合は既定値を使う。
use thiserror::Error;

/// 既定のAWSリージョン
pub const DEFAULT_REGION: &str = "us-east-2";

/// 既定のシークレット取得Lambda関数名
pub const DEFAULT_SECRETS_FUNCTION_NAME: &str = "fetchSecretsFunction_gr8";

/// 既定のリッスンポート
pub const DEFAULT_PORT: u16 = 8090;

/// 既定のRabbitMQ接続先
pub const DEFAULT_AMQP_URL: &str = "amqp://3.136.72.14:5672/";

/// 既定のキュー名
pub const DEFAULT_QUEUE_NAME: &str = "product-events";

/// 既定のテーブル名サフィックス
pub const DEFAULT_TABLE_SUFFIX: &str = "gr8";

/// 設定読み込みのエラー型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// 環境変数の値が解釈できない
    #[error("Invalid value for environment variable {name}: {value}")]
    InvalidValue { name: String, value: String },
}

/// サービス全体の設定
///
/// 環境変数:
/// - AWS_REGION: AWSリージョン
/// - SECRETS_FUNCTION_NAME: シークレット取得Lambda関数名
/// - PORT: HTTPリッスンポート
/// - AMQP_URL: RabbitMQ接続URL
/// - QUEUE_NAME: イベント発行先キュー名
/// - TABLE_SUFFIX: DynamoDBテーブル名のサフィックス
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    region: String,
    secrets_function_name: String,
    port: u16,
    amqp_url: String,
    queue_name: String,
    table_suffix: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            secrets_function_name: DEFAULT_SECRETS_FUNCTION_NAME.to_string(),
            port: DEFAULT_PORT,
            amqp_url: DEFAULT_AMQP_URL.to_string(),
            queue_name: DEFAULT_QUEUE_NAME.to_string(),
            table_suffix: DEFAULT_TABLE_SUFFIX.to_string(),
        }
    }
}

impl ServiceConfig {
    /// 環境変数から設定を読み込み
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 任意の参照関数から設定を読み込み
    ///
    /// `lookup`が`None`を返した項目は既定値になる。
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let or_default = |name: &str, default: String| lookup(name).unwrap_or(default);

        let port = match lookup("PORT") {
            Some(value) => value.parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                name: "PORT".to_string(),
                value,
            })?,
            None => defaults.port,
        };

        Ok(Self {
            region: or_default("AWS_REGION", defaults.region),
            secrets_function_name: or_default(
                "SECRETS_FUNCTION_NAME",
                defaults.secrets_function_name,
            ),
            port,
            amqp_url: or_default("AMQP_URL", defaults.amqp_url),
            queue_name: or_default("QUEUE_NAME", defaults.queue_name),
            table_suffix: or_default("TABLE_SUFFIX", defaults.table_suffix),
        })
    }

    /// AWSリージョンを取得
    pub fn region(&self) -> &str {
        &self.region
    }

    /// シークレット取得Lambda関数名を取得
    pub fn secrets_function_name(&self) -> &str {
        &self.secrets_function_name
    }

    /// HTTPリッスンポートを取得
    pub fn port(&self) -> u16 {
        self.port
    }

    /// RabbitMQ接続URLを取得
    pub fn amqp_url(&self) -> &str {
        &self.amqp_url
    }

    /// キュー名を取得
    pub fn queue_name(&self) -> &str {
        &self.queue_name
    }

    /// カテゴリテーブル名（`Categories_<suffix>`）
    pub fn categories_table(&self) -> String {
        format!("Categories_{}", self.table_suffix)
    }

    /// 商品テーブル名（`Products_<suffix>`）
    pub fn products_table(&self) -> String {
        format!("Products_{}", self.table_suffix)
    }
}
