/// ログ基盤モジュール
///
/// 構造化ログ（JSON形式、1行1イベント）の設定を提供する。
/// ログレベルは環境変数`RUST_LOG`で制御し、既定はinfo。
use std::sync::Once;

use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// ログサブスクライバー初期化用の同期プリミティブ
static INIT: Once = Once::new();

/// `RUST_LOG`からフィルターを作成し、未設定や不正な値なら既定レベルを使う
fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// JSON出力レイヤーを構築する
///
/// イベントのフィールド（`product_id`, `queue`など）はトップレベルに展開する。
fn json_layer<S, W>(writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + 'static,
{
    tracing_subscriber::fmt::layer()
        .json()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .flatten_event(true)
        .with_current_span(false)
        .with_writer(writer)
}

/// ログサブスクライバーを初期化する
///
/// 複数回呼び出しても最初の呼び出しのみ初期化を実行する。
pub fn init_logging() {
    INIT.call_once(|| {
        // 既に別のサブスクライバーが登録されていても失敗させない
        let _ = tracing_subscriber::registry()
            .with(env_filter("info"))
            .with(json_layer(std::io::stdout))
            .try_init();
    });
}

/// テスト用のログサブスクライバーを初期化する（人間が読みやすい形式）
#[cfg(test)]
pub fn init_test_logging() {
    static TEST_INIT: Once = Once::new();

    TEST_INIT.call_once(|| {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_test_writer()
            .with_target(true)
            .compact();

        let _ = tracing_subscriber::registry()
            .with(env_filter("debug"))
            .with(fmt_layer)
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    /// 出力を溜めておくライター
    #[derive(Clone, Default)]
    struct CapturedOutput(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedOutput {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl CapturedOutput {
        fn lines(&self) -> Vec<serde_json::Value> {
            let output = String::from_utf8(self.0.lock().unwrap().clone()).unwrap();
            output
                .lines()
                .map(|line| serde_json::from_str(line).unwrap())
                .collect()
        }
    }

    #[test]
    fn test_init_test_logging_idempotent() {
        init_test_logging();
        init_test_logging();
    }

    #[test]
    fn test_json_layer_flattens_event_fields() {
        let output = CapturedOutput::default();
        let writer = output.clone();
        let subscriber = tracing_subscriber::registry()
            .with(EnvFilter::new("info"))
            .with(json_layer(move || writer.clone()));

        tracing::subscriber::with_default(subscriber, || {
            let span = tracing::info_span!("publish_event", product_id = "prod-1");
            let _guard = span.enter();
            tracing::warn!(queue = "product-events", "イベント発行失敗（無視）");
        });

        let lines = output.lines();
        assert_eq!(lines.len(), 1);
        let entry = &lines[0];
        assert_eq!(entry["level"], "WARN");
        assert_eq!(entry["message"], "イベント発行失敗（無視）");
        assert_eq!(entry["queue"], "product-events");
        assert!(entry["target"].as_str().unwrap().starts_with("product_service"));
        assert!(entry["line_number"].is_number());
        // 現在のスパンは出力しない
        assert!(entry.get("span").is_none());
    }

    #[test]
    fn test_json_layer_respects_filter_level() {
        let output = CapturedOutput::default();
        let writer = output.clone();
        let subscriber = tracing_subscriber::registry()
            .with(EnvFilter::new("info"))
            .with(json_layer(move || writer.clone()));

        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!("カテゴリ参照完了");
            tracing::info!(product_id = "prod-1", "商品を保存しました");
        });

        let lines = output.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["product_id"], "prod-1");
    }
}
