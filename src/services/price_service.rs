use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::*;
use tracing::{debug, info, warn};

use crate::api::hellogold::{ApiError, HelloGoldApi, SpotPriceEnvelope};
use crate::models::PricePoint;
use crate::utils::timestamp::parse_iso8601_millis;

const OK_RESULT: &str = "ok";

/// What caused a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchTrigger {
    /// The price list became visible
    Appeared,
    /// The app came back to the foreground while the price list was visible
    ForegroundResumed,
    /// Pull-to-refresh gesture; shows the refresh indicator until settled
    PullToRefresh,
    /// Refresh button
    Manual,
}

/// How completions of overlapping fetches are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlapPolicy {
    /// Every successful completion is prepended, in completion order
    AllowDuplicates,
    /// A completion older than one already applied is discarded
    DropStale,
}

impl FromStr for OverlapPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "allow-duplicates" | "allow_duplicates" => Ok(Self::AllowDuplicates),
            "drop-stale" | "drop_stale" => Ok(Self::DropStale),
            other => Err(format!(
                "unknown overlap policy '{}'. Use: allow-duplicates, drop-stale",
                other
            )),
        }
    }
}

impl fmt::Display for OverlapPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllowDuplicates => write!(f, "allow-duplicates"),
            Self::DropStale => write!(f, "drop-stale"),
        }
    }
}

/// Handle for one in-flight fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub trigger: FetchTrigger,
}

/// What happened when a fetch settled
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    /// The point was inserted at the head of the history
    pub applied: Option<PricePoint>,
    /// The fetch failed; history untouched
    pub error: Option<ApiError>,
    /// A newer fetch had already been applied and the policy dropped this one
    pub dropped_stale: bool,
    /// This settlement turned the refresh indicator off
    pub indicator_cleared: bool,
}

/// Round to two decimals, half away from zero, and render with exactly two digits
pub fn format_price(price: f64) -> Option<String> {
    let value = Decimal::from_f64(price)?;
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    Some(format!("{:.2}", rounded))
}

/// Validate a spot price envelope and turn it into a typed point
pub fn parse_spot_price(envelope: &SpotPriceEnvelope) -> Result<PricePoint, ApiError> {
    match envelope.result.as_deref() {
        Some(OK_RESULT) => {}
        Some(other) => {
            return Err(ApiError::MalformedResponse(format!("result was '{}'", other)));
        }
        None => return Err(ApiError::MalformedResponse("missing result".to_string())),
    }

    let data = envelope
        .data
        .as_ref()
        .ok_or_else(|| ApiError::MalformedResponse("missing data".to_string()))?;

    let raw_timestamp = data
        .timestamp
        .as_deref()
        .ok_or_else(|| ApiError::MalformedResponse("missing data.timestamp".to_string()))?;

    let spot_price = data
        .spot_price
        .ok_or_else(|| ApiError::MalformedResponse("missing data.spot_price".to_string()))?;

    let timestamp_millis = parse_iso8601_millis(raw_timestamp).ok_or_else(|| {
        ApiError::MalformedResponse(format!("unparseable timestamp '{}'", raw_timestamp))
    })?;

    let price = format_price(spot_price).ok_or_else(|| {
        ApiError::MalformedResponse(format!("spot_price {} out of range", spot_price))
    })?;

    Ok(PricePoint {
        timestamp_millis,
        price,
    })
}

/// Fetch and validate the current spot price
pub async fn fetch_latest_price(api: &dyn HelloGoldApi) -> Result<PricePoint, ApiError> {
    let envelope = api.spot_price().await?;
    parse_spot_price(&envelope)
}

/// In-memory price history for one price list session
///
/// Newest fetch first. Insertion order follows completion order, not the
/// timestamp inside each point. The history is never trimmed.
#[derive(Debug, Clone)]
pub struct PriceFeed {
    email: String,
    history: Vec<PricePoint>,
    policy: OverlapPolicy,
    refreshing: bool,
    next_generation: u64,
    latest_applied: Option<u64>,
    in_flight: usize,
}

impl PriceFeed {
    pub fn new(email: String, policy: OverlapPolicy) -> Self {
        Self {
            email,
            history: Vec::new(),
            policy,
            refreshing: false,
            next_generation: 0,
            latest_applied: None,
            in_flight: 0,
        }
    }

    /// The address handed over from sign-up; shown as the screen title
    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn history(&self) -> &[PricePoint] {
        &self.history
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    /// At least one fetch has started and not settled yet
    pub fn is_fetching(&self) -> bool {
        self.in_flight > 0
    }

    /// Register the start of a fetch
    pub fn begin_fetch(&mut self, trigger: FetchTrigger) -> FetchTicket {
        let generation = self.next_generation;
        self.next_generation += 1;
        self.in_flight += 1;

        if trigger == FetchTrigger::PullToRefresh {
            self.refreshing = true;
        }

        debug!("Fetch #{} started ({:?}), {} in flight", generation, trigger, self.in_flight);
        FetchTicket { generation, trigger }
    }

    /// Apply the result of a fetch started with `begin_fetch`
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<PricePoint, ApiError>,
    ) -> FetchOutcome {
        self.in_flight = self.in_flight.saturating_sub(1);

        let indicator_cleared = self.refreshing;
        self.refreshing = false;

        let mut outcome = FetchOutcome {
            applied: None,
            error: None,
            dropped_stale: false,
            indicator_cleared,
        };

        match result {
            Ok(point) => {
                let stale = self.policy == OverlapPolicy::DropStale
                    && self.latest_applied.is_some_and(|latest| latest > ticket.generation);

                if stale {
                    info!("Dropping stale fetch #{}", ticket.generation);
                    outcome.dropped_stale = true;
                } else {
                    self.latest_applied = Some(
                        self.latest_applied
                            .map_or(ticket.generation, |latest| latest.max(ticket.generation)),
                    );
                    self.history.insert(0, point.clone());
                    info!(
                        "Fetch #{} added RM {} ({} points)",
                        ticket.generation,
                        point.price,
                        self.history.len()
                    );
                    outcome.applied = Some(point);
                }
            }
            Err(e) => {
                warn!("Fetch #{} ({:?}) failed: {}", ticket.generation, ticket.trigger, e);
                outcome.error = Some(e);
            }
        }

        outcome
    }
}
