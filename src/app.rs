//! Screen state machine: sign-up form and price list
//!
//! Lifecycle notifications (screen shown, app foregrounded) arrive as explicit
//! [`AppEvent`]s forwarded by the front-end. Nothing here listens for ambient
//! broadcasts.
//!
//! Price fetches never block event handling. Each one is spawned onto the
//! runtime and its result comes back as a [`FetchCompletion`] on the channel
//! handed to [`App::new`]; the owner of the receiver feeds it back through
//! [`App::apply_fetch`]. Several fetches can therefore be in flight at once.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::api::hellogold::{ApiError, HelloGoldApi};
use crate::config::AppConfig;
use crate::models::{Alert, PricePoint};
use crate::services::price_service::{self, FetchTicket, FetchTrigger, PriceFeed};
use crate::services::registration_service::{self, SignUpForm};

/// Input forwarded from the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    EmailChanged(String),
    TermsToggled(bool),
    SubmitTapped,
    ForegroundResumed,
    PullToRefresh,
    RefreshTapped,
    SignOutTapped,
}

/// Which screen is on top
#[derive(Debug)]
pub enum Screen {
    SignUp,
    PriceList(PriceFeed),
}

/// A settled price fetch on its way back to the app
#[derive(Debug, Clone, PartialEq)]
pub struct FetchCompletion {
    /// Price list session the fetch was started in
    pub session: u64,
    pub ticket: FetchTicket,
    pub result: Result<PricePoint, ApiError>,
}

/// Result of handling one event
#[derive(Debug, Clone, PartialEq)]
pub enum AppResponse {
    /// Form changed; carries the new submit button state
    FormUpdated { submit_enabled: bool },
    /// Registration went through; the price list is open and its first fetch is running
    SignedUp { email: String, initial_fetch: FetchTicket },
    /// Registration failed; show this modal
    Alert(Alert),
    /// Submit was attempted with an invalid address; nothing was sent
    SubmitSkipped,
    /// A price fetch was started
    FetchStarted(FetchTicket),
    /// A price fetch settled
    Fetched(price_service::FetchOutcome),
    /// Back on the sign-up screen with a fresh form
    SignedOut,
    /// Event does not apply to the visible screen
    Ignored(&'static str),
}

pub struct App {
    config: AppConfig,
    api: Arc<dyn HelloGoldApi>,
    completions: mpsc::Sender<FetchCompletion>,
    form: SignUpForm,
    screen: Screen,
    session: u64,
}

impl App {
    pub fn new(
        config: AppConfig,
        api: Arc<dyn HelloGoldApi>,
        completions: mpsc::Sender<FetchCompletion>,
    ) -> Self {
        Self {
            config,
            api,
            completions,
            form: SignUpForm::new(),
            screen: Screen::SignUp,
            session: 0,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn form(&self) -> &SignUpForm {
        &self.form
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// The price feed, if the price list is showing
    pub fn feed(&self) -> Option<&PriceFeed> {
        match &self.screen {
            Screen::PriceList(feed) => Some(feed),
            Screen::SignUp => None,
        }
    }

    /// Whether a submit tap would reach the network
    pub fn can_submit(&self) -> bool {
        matches!(self.screen, Screen::SignUp) && self.form.submit_enabled()
    }

    pub async fn handle(&mut self, event: AppEvent) -> AppResponse {
        debug!("Handling {:?}", event);

        match event {
            AppEvent::EmailChanged(text) => self.on_form_change(|form| form.set_email(&text)),
            AppEvent::TermsToggled(on) => self.on_form_change(|form| form.set_accepted_terms(on)),
            AppEvent::SubmitTapped => self.on_submit().await,
            AppEvent::ForegroundResumed => self.on_fetch(FetchTrigger::ForegroundResumed),
            AppEvent::PullToRefresh => self.on_fetch(FetchTrigger::PullToRefresh),
            AppEvent::RefreshTapped => self.on_fetch(FetchTrigger::Manual),
            AppEvent::SignOutTapped => self.on_sign_out(),
        }
    }

    /// Apply a fetch result received from the completion channel
    pub fn apply_fetch(&mut self, completion: FetchCompletion) -> AppResponse {
        if completion.session != self.session {
            debug!(
                "Discarding fetch #{} from closed session {}",
                completion.ticket.generation, completion.session
            );
            return AppResponse::Ignored("price list session has ended");
        }
        let Screen::PriceList(feed) = &mut self.screen else {
            return AppResponse::Ignored("price list is not visible");
        };

        AppResponse::Fetched(feed.complete_fetch(completion.ticket, completion.result))
    }

    fn on_form_change<F>(&mut self, change: F) -> AppResponse
    where
        F: FnOnce(&mut SignUpForm),
    {
        if !matches!(self.screen, Screen::SignUp) {
            return AppResponse::Ignored("sign-up form is not visible");
        }

        change(&mut self.form);
        AppResponse::FormUpdated {
            submit_enabled: self.form.submit_enabled(),
        }
    }

    async fn on_submit(&mut self) -> AppResponse {
        if !matches!(self.screen, Screen::SignUp) {
            return AppResponse::Ignored("sign-up form is not visible");
        }
        if !self.form.submit_enabled() {
            return AppResponse::Ignored("submit is disabled");
        }

        let outcome = registration_service::submit(
            self.api.as_ref(),
            self.form.email(),
            self.form.accepted_terms(),
        )
        .await;

        match outcome {
            None => AppResponse::SubmitSkipped,
            Some(Err(_)) => AppResponse::Alert(Alert::sign_up_failed()),
            Some(Ok(email)) => {
                info!("Opening price list for {}", email);
                self.session += 1;
                let mut feed = PriceFeed::new(email.clone(), self.config.overlap_policy);
                let initial_fetch = feed.begin_fetch(FetchTrigger::Appeared);
                self.screen = Screen::PriceList(feed);
                self.spawn_fetch(initial_fetch);
                AppResponse::SignedUp { email, initial_fetch }
            }
        }
    }

    fn on_fetch(&mut self, trigger: FetchTrigger) -> AppResponse {
        let Screen::PriceList(feed) = &mut self.screen else {
            return AppResponse::Ignored("price list is not visible");
        };

        let ticket = feed.begin_fetch(trigger);
        self.spawn_fetch(ticket);
        AppResponse::FetchStarted(ticket)
    }

    fn spawn_fetch(&self, ticket: FetchTicket) {
        let api = Arc::clone(&self.api);
        let completions = self.completions.clone();
        let session = self.session;

        tokio::spawn(async move {
            let result = price_service::fetch_latest_price(api.as_ref()).await;
            let completion = FetchCompletion { session, ticket, result };
            if completions.send(completion).await.is_err() {
                debug!("Fetch #{} settled after the app shut down", ticket.generation);
            }
        });
    }

    fn on_sign_out(&mut self) -> AppResponse {
        if !matches!(self.screen, Screen::PriceList(_)) {
            return AppResponse::Ignored("not signed in");
        }

        info!("Signing out, history discarded");
        self.screen = Screen::SignUp;
        self.form.reset();
        AppResponse::SignedOut
    }
}
