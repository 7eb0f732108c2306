use chrono::{DateTime, Local, TimeZone};
use tracing::{debug, warn};

use crate::app::{App, AppEvent, AppResponse, FetchCompletion};
use crate::services::price_service::{FetchOutcome, PriceFeed};
use crate::utils::timestamp::format_display_timestamp;
use crate::utils::{Page, Table};

const CURRENCY_PREFIX: &str = "RM ";

/// Render one page of the price history as a table, newest first
pub fn render_price_list<Tz: TimeZone>(
    feed: &PriceFeed,
    now: &DateTime<Tz>,
    yesterday_label: &str,
    page_num: usize,
    per_page: usize,
) -> Result<String, String>
where
    Tz::Offset: std::fmt::Display,
{
    let page = Page::of(feed.history(), page_num, per_page)?;

    let mut table = Table::new(&["Time", "Price"]);
    for point in &page.items {
        table.add_row(vec![
            format_display_timestamp(point.timestamp_millis, now, yesterday_label),
            format!("{}{}", CURRENCY_PREFIX, point.price),
        ]);
    }

    let mut output = format!("{}\n{}", feed.email(), table.render());
    if table.is_empty() && !feed.is_fetching() {
        output.push_str("\n(no prices yet)");
    }
    if page.total_pages > 1 {
        output.push_str(&format!("\nPage {} of {}", page.current_page, page.total_pages));
        if !page.is_last() {
            output.push_str(&format!(" - `$list {}` for older prices", page.current_page + 1));
        }
    }
    if feed.is_refreshing() {
        output.push_str("\nRefreshing...");
    } else if feed.is_fetching() {
        output.push_str("\nFetching latest price...");
    }

    Ok(output)
}

/// Render the visible price list against the local clock
pub fn render_current(app: &App, page_num: usize) -> Result<String, String> {
    let feed = app.feed().ok_or("Sign up first to see prices")?;
    let config = app.config();
    render_price_list(feed, &Local::now(), &config.yesterday_label, page_num, config.page_size)
}

pub fn log_outcome(outcome: &FetchOutcome) {
    if let Some(point) = &outcome.applied {
        debug!("New price RM {} at {}", point.price, point.timestamp_millis);
    }
    if let Some(e) = &outcome.error {
        debug!("Price list unchanged: {}", e);
    }
    if outcome.dropped_stale {
        debug!("Price list unchanged: a newer price was already shown");
    }
    if outcome.indicator_cleared {
        debug!("Refresh indicator cleared");
    }
}

/// `$refresh`, `$pull`, `$foreground`
pub async fn execute_fetch(app: &mut App, event: AppEvent) -> Result<String, String> {
    match app.handle(event).await {
        AppResponse::FetchStarted(ticket) => {
            debug!("Fetch #{} running in the background", ticket.generation);
            render_current(app, 1)
        }
        AppResponse::Ignored(reason) => Err(reason.to_string()),
        other => Err(format!("Unexpected response: {:?}", other)),
    }
}

/// Apply a settled fetch and redraw the list when something visible changed
///
/// Failures are silent; the list simply does not grow.
pub fn handle_fetch_completion(app: &mut App, completion: FetchCompletion) -> Option<String> {
    match app.apply_fetch(completion) {
        AppResponse::Fetched(outcome) => {
            log_outcome(&outcome);
            if outcome.applied.is_none() && !outcome.indicator_cleared {
                return None;
            }
            match render_current(app, 1) {
                Ok(text) => Some(text),
                Err(e) => {
                    warn!("Failed to redraw price list: {}", e);
                    None
                }
            }
        }
        AppResponse::Ignored(reason) => {
            debug!("Fetch result ignored: {}", reason);
            None
        }
        other => {
            warn!("Unexpected response to fetch result: {:?}", other);
            None
        }
    }
}

/// `$list [page]`
pub fn execute_list(app: &App, args: &[&str]) -> Result<String, String> {
    let page_num = match args.first() {
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| "Usage: `$list [page]`".to_string())?,
        None => 1,
    };
    render_current(app, page_num)
}

/// `$signout`
pub async fn execute_sign_out(app: &mut App) -> Result<String, String> {
    match app.handle(AppEvent::SignOutTapped).await {
        AppResponse::SignedOut => Ok("Signed out. Enter an email address with `$email`.".to_string()),
        AppResponse::Ignored(reason) => Err(reason.to_string()),
        other => Err(format!("Unexpected response: {:?}", other)),
    }
}
