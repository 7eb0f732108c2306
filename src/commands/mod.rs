pub mod help;
pub mod price;
pub mod signup;

use tracing::warn;

use crate::app::{App, AppEvent};
use crate::utils::extract_clean_error;

/// What the input loop should do after a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    /// Print this text and keep reading
    Continue(String),
    Quit,
}

pub async fn handle_line(app: &mut App, line: &str) -> Flow {
    // Parse command and arguments
    let parts: Vec<&str> = line.split_whitespace().collect();
    let Some((&command, args)) = parts.split_first() else {
        return Flow::Continue(String::new());
    };

    let result = match command {
        "$help" | "$h" => help::execute(app),
        "$email" => signup::execute_email(app, args).await,
        "$tnc" | "$terms" => signup::execute_terms(app, args).await,
        "$signup" | "$done" => signup::execute_submit(app).await,
        "$refresh" => price::execute_fetch(app, AppEvent::RefreshTapped).await,
        "$pull" => price::execute_fetch(app, AppEvent::PullToRefresh).await,
        "$foreground" | "$fg" => price::execute_fetch(app, AppEvent::ForegroundResumed).await,
        "$list" | "$ls" => price::execute_list(app, args),
        "$signout" => price::execute_sign_out(app).await,
        "$quit" | "$exit" => return Flow::Quit,
        _ => Err(format!("Unknown command: {}. Type `$help` for a list", command)),
    };

    match result {
        Ok(text) => Flow::Continue(text),
        Err(e) => {
            warn!("Error executing command {}: {}", command, e);
            Flow::Continue(format!("❌ {}", extract_clean_error(&e)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::hellogold::{ApiError, HelloGoldApi, RegisterBody, SpotPriceEnvelope};
    use crate::app::FetchCompletion;
    use crate::config::AppConfig;
    use crate::services::price_service::tests::ok_envelope;
    use async_trait::async_trait;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    struct FixedApi;

    #[async_trait]
    impl HelloGoldApi for FixedApi {
        async fn register(&self, _body: &RegisterBody) -> Result<(), ApiError> {
            Ok(())
        }

        async fn spot_price(&self) -> Result<SpotPriceEnvelope, ApiError> {
            Ok(ok_envelope("2019-02-19T10:15:30.123+08:00", 8123.456))
        }
    }

    fn app() -> (App, mpsc::Receiver<FetchCompletion>) {
        let (tx, rx) = mpsc::channel(8);
        (App::new(AppConfig::default(), Arc::new(FixedApi), tx), rx)
    }

    async fn next_completion(app: &mut App, rx: &mut mpsc::Receiver<FetchCompletion>) -> Option<String> {
        let completion = rx.recv().await.unwrap();
        price::handle_fetch_completion(app, completion)
    }

    #[tokio::test]
    async fn test_full_session() {
        let (mut app, mut rx) = app();

        assert_eq!(
            handle_line(&mut app, "$email jane@example.com").await,
            Flow::Continue("Done: enabled".to_string())
        );
        assert_eq!(
            handle_line(&mut app, "$tnc on").await,
            Flow::Continue("Terms and conditions: accepted".to_string())
        );

        let Flow::Continue(text) = handle_line(&mut app, "$signup").await else {
            panic!("expected output");
        };
        assert!(text.starts_with("Signed up as jane@example.com"));
        assert!(text.ends_with("Fetching latest price..."));

        let redraw = next_completion(&mut app, &mut rx).await.unwrap();
        assert!(redraw.contains("RM 8123.46"));
        assert!(!redraw.contains("Fetching"));

        let Flow::Continue(text) = handle_line(&mut app, "$pull").await else {
            panic!("expected output");
        };
        assert!(text.ends_with("Refreshing..."));
        next_completion(&mut app, &mut rx).await.unwrap();
        assert_eq!(app.feed().unwrap().history().len(), 2);

        let Flow::Continue(text) = handle_line(&mut app, "$signout").await else {
            panic!("expected output");
        };
        assert!(text.starts_with("Signed out"));
        assert!(app.feed().is_none());
    }

    #[tokio::test]
    async fn test_result_after_sign_out_is_not_drawn() {
        let (mut app, mut rx) = app();
        handle_line(&mut app, "$email jane@example.com").await;
        handle_line(&mut app, "$signup").await;
        handle_line(&mut app, "$signout").await;

        assert_eq!(next_completion(&mut app, &mut rx).await, None);
        assert!(app.feed().is_none());
    }

    #[tokio::test]
    async fn test_errors_are_reported() {
        let (mut app, _rx) = app();
        assert_eq!(
            handle_line(&mut app, "$refresh").await,
            Flow::Continue("❌ price list is not visible".to_string())
        );
        assert_eq!(
            handle_line(&mut app, "$signup").await,
            Flow::Continue("❌ submit is disabled".to_string())
        );
        assert!(matches!(
            handle_line(&mut app, "$bogus").await,
            Flow::Continue(text) if text.starts_with("❌ Unknown command: $bogus")
        ));
    }

    #[tokio::test]
    async fn test_quit_and_blank_lines() {
        let (mut app, _rx) = app();
        assert_eq!(handle_line(&mut app, "   ").await, Flow::Continue(String::new()));
        assert_eq!(handle_line(&mut app, "$quit").await, Flow::Quit);
    }
}
