use std::sync::Arc;

use anyhow::Result;
use chrono::Local;
use owo_colors::OwoColorize;
use shiftcal_core::ViewMode;
use shiftcal_core::date_range::parse_date;
use shiftcal_core::event::CalendarEvent;
use shiftcal_core::feeds::{self, FeedRefresh, HttpFetcher};
use shiftcal_core::grid::advance_by;
use shiftcal_core::view::CalendarView;

use super::Session;
use crate::render::Render;
use crate::utils::tui;

pub struct ShowOptions {
    pub view: Option<ViewMode>,
    pub date: Option<String>,
    pub offset: i32,
    pub feeds: bool,
    pub weather: bool,
}

pub async fn run(session: &Session, options: ShowOptions) -> Result<()> {
    let today = Local::now().date_naive();
    let mode = options.view.unwrap_or(session.config.default_view);
    let anchor = match &options.date {
        Some(s) => parse_date(s)?,
        None => today,
    };
    let reference = advance_by(anchor, mode, options.offset);

    let refresh = if options.feeds {
        load_feeds(session).await?
    } else {
        FeedRefresh::default()
    };

    let mut events: Vec<CalendarEvent> = session.events.all().to_vec();
    events.extend(refresh.events.iter().cloned());
    events.sort_by_key(|e| e.start);

    let view = CalendarView::build(reference, mode, today, session.shifts.all(), &events, &Local);
    println!("{}", view.render());

    for outcome in refresh.failed() {
        println!();
        println!("{}", format!("Feed unavailable: {}", outcome.url).dimmed());
    }

    if options.weather {
        println!();
        super::weather::run(session).await?;
    }

    Ok(())
}

/// Refresh all subscribed feeds behind a spinner.
pub(super) async fn load_feeds(session: &Session) -> Result<FeedRefresh> {
    let urls = session.feeds.urls();
    if urls.is_empty() {
        return Ok(FeedRefresh::default());
    }

    let fetcher = Arc::new(HttpFetcher::new(session.config.fetch_timeout()?)?);
    let message = format!("Fetching {} feeds", urls.len());
    Ok(tui::with_spinner(message, feeds::refresh(urls, fetcher, Local)).await)
}
