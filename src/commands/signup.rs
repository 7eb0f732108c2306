use tracing::debug;

use crate::app::{App, AppEvent, AppResponse};
use crate::models::Alert;
use crate::services::registration_service::LOADING_MESSAGE;

use super::price;

fn render_alert(alert: &Alert) -> String {
    format!("[{}] {}\n  [{}]", alert.title, alert.message, alert.action)
}

fn render_submit_state(submit_enabled: bool) -> String {
    if submit_enabled {
        "Done: enabled".to_string()
    } else {
        "Done: disabled".to_string()
    }
}

/// `$email <address>`
pub async fn execute_email(app: &mut App, args: &[&str]) -> Result<String, String> {
    match app.handle(AppEvent::EmailChanged(args.join(" "))).await {
        AppResponse::FormUpdated { submit_enabled } => Ok(render_submit_state(submit_enabled)),
        AppResponse::Ignored(reason) => Err(reason.to_string()),
        other => Err(format!("Unexpected response: {:?}", other)),
    }
}

/// `$tnc on|off`
pub async fn execute_terms(app: &mut App, args: &[&str]) -> Result<String, String> {
    let accepted = match args.first().map(|a| a.to_lowercase()).as_deref() {
        Some("on") | Some("yes") | Some("true") => true,
        Some("off") | Some("no") | Some("false") => false,
        _ => return Err("Usage: `$tnc on|off`".to_string()),
    };

    match app.handle(AppEvent::TermsToggled(accepted)).await {
        AppResponse::FormUpdated { .. } => Ok(format!(
            "Terms and conditions: {}",
            if accepted { "accepted" } else { "not accepted" }
        )),
        AppResponse::Ignored(reason) => Err(reason.to_string()),
        other => Err(format!("Unexpected response: {:?}", other)),
    }
}

/// Loader text for a submit tap, if the tap will actually send a request
fn loading_notice(app: &App) -> Option<&'static str> {
    app.can_submit().then_some(LOADING_MESSAGE)
}

/// `$signup`
pub async fn execute_submit(app: &mut App) -> Result<String, String> {
    // Shown while the request is in flight
    if let Some(notice) = loading_notice(app) {
        println!("{}", notice);
    }

    match app.handle(AppEvent::SubmitTapped).await {
        AppResponse::SignedUp { email, initial_fetch } => {
            debug!("Initial fetch #{} running in the background", initial_fetch.generation);
            let list = price::render_current(app, 1)?;
            Ok(format!("Signed up as {}\n\n{}", email, list))
        }
        AppResponse::Alert(alert) => Ok(render_alert(&alert)),
        AppResponse::SubmitSkipped => Err("Enter a valid email address first".to_string()),
        AppResponse::Ignored(reason) => Err(reason.to_string()),
        other => Err(format!("Unexpected response: {:?}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::hellogold::{ApiError, HelloGoldApi, RegisterBody, SpotPriceEnvelope};
    use crate::config::AppConfig;
    use async_trait::async_trait;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    struct OfflineApi;

    #[async_trait]
    impl HelloGoldApi for OfflineApi {
        async fn register(&self, _body: &RegisterBody) -> Result<(), ApiError> {
            Err(ApiError::Transport("offline".to_string()))
        }

        async fn spot_price(&self) -> Result<SpotPriceEnvelope, ApiError> {
            Err(ApiError::Transport("offline".to_string()))
        }
    }

    #[tokio::test]
    async fn test_loader_only_for_accepted_submit() {
        let (tx, _rx) = mpsc::channel(1);
        let mut app = App::new(AppConfig::default(), Arc::new(OfflineApi), tx);
        assert_eq!(loading_notice(&app), None);

        execute_email(&mut app, &["jane@"]).await.unwrap();
        assert_eq!(loading_notice(&app), None);
        assert_eq!(execute_submit(&mut app).await, Err("submit is disabled".to_string()));

        execute_email(&mut app, &["jane@example.com"]).await.unwrap();
        assert_eq!(loading_notice(&app), Some("Signing up..."));

        let alert = execute_submit(&mut app).await.unwrap();
        assert!(alert.starts_with("[Sign Up Error]"));
    }

    #[test]
    fn test_render_alert() {
        assert_eq!(
            render_alert(&Alert::sign_up_failed()),
            "[Sign Up Error] Unable to submit form. Please try again.\n  [OK]"
        );
    }
}
