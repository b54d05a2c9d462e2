/// ストレージバックエンド用の認証情報
///
/// 起動時に一度だけ取得し、プロセス終了まで保持する。ローテーションはしない。
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialBundle {
    access_key_id: String,
    secret_access_key: String,
}

impl CredentialBundle {
    /// 新しい認証情報を作成
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
        }
    }

    /// アクセスキーIDを取得
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    /// シークレットアクセスキーを取得
    pub fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }
}

// シークレットキーはログに出さない
impl std::fmt::Debug for CredentialBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialBundle")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_getters() {
        let bundle = CredentialBundle::new("AKIAEXAMPLE", "secret-value");

        assert_eq!(bundle.access_key_id(), "AKIAEXAMPLE");
        assert_eq!(bundle.secret_access_key(), "secret-value");
    }

    #[test]
    fn test_debug_redacts_secret_key() {
        let bundle = CredentialBundle::new("AKIAEXAMPLE", "secret-value");
        let debug = format!("{:?}", bundle);

        assert!(debug.contains("AKIAEXAMPLE"));
        assert!(!debug.contains("secret-value"));
    }
}
