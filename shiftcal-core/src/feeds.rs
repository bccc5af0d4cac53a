//! Fetching iCal feeds.
//!
//! Every feed is fetched and parsed in its own task. A feed that fails to
//! fetch or parse is logged and contributes no events; the others are not
//! affected. There is no retry, de-duplication or cancellation.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::TimeZone;
use tokio::task::JoinSet;

use crate::error::{ShiftCalError, ShiftCalResult};
use crate::event::{CalendarEvent, EventSource};
use crate::ics::parse_feed;

/// Source of raw calendar text for a feed URL.
pub trait FeedFetcher: Send + Sync + 'static {
    fn fetch(&self, url: &str) -> impl Future<Output = ShiftCalResult<String>> + Send;
}

/// Fetches feeds over HTTP.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> ShiftCalResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("shiftcal/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ShiftCalError::Config(format!("Could not build HTTP client: {e}")))?;
        Ok(HttpFetcher { client })
    }
}

impl FeedFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> ShiftCalResult<String> {
        let location = normalize_feed_url(url);
        let fetch_error = |reason: String| ShiftCalError::Fetch {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(&location)
            .header(reqwest::header::ACCEPT, "text/calendar, text/plain, */*;q=0.8")
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(format!("HTTP {}", status)));
        }

        response.text().await.map_err(|e| fetch_error(e.to_string()))
    }
}

/// Rewrites webcal:// and webcals:// to https://.
pub fn normalize_feed_url(url: &str) -> String {
    let trimmed = url.trim();
    let lower = trimmed.to_ascii_lowercase();

    if lower.starts_with("webcals://") {
        format!("https://{}", &trimmed["webcals://".len()..])
    } else if lower.starts_with("webcal://") {
        format!("https://{}", &trimmed["webcal://".len()..])
    } else {
        trimmed.to_string()
    }
}

/// What happened to one feed during a refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedStatus {
    Loaded(usize),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct FeedOutcome {
    pub url: String,
    pub status: FeedStatus,
}

/// Merged result of a refresh.
#[derive(Debug, Clone, Default)]
pub struct FeedRefresh {
    /// Events of all feeds that loaded, ordered by start
    pub events: Vec<CalendarEvent>,
    /// One entry per requested feed, in request order
    pub outcomes: Vec<FeedOutcome>,
}

impl FeedRefresh {
    pub fn failed(&self) -> impl Iterator<Item = &FeedOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, FeedStatus::Failed(_)))
    }
}

/// Fetch and parse every feed concurrently, then merge.
pub async fn refresh<F, Tz>(urls: &[String], fetcher: Arc<F>, tz: Tz) -> FeedRefresh
where
    F: FeedFetcher,
    Tz: TimeZone + Send + Sync + 'static,
{
    let mut tasks = JoinSet::new();

    for (index, url) in urls.iter().enumerate() {
        let fetcher = Arc::clone(&fetcher);
        let url = url.clone();
        let tz = tz.clone();
        tasks.spawn(async move {
            let result = load_feed(fetcher.as_ref(), &url, &tz).await;
            (index, url, result)
        });
    }

    let mut slots: Vec<Option<(FeedOutcome, Vec<CalendarEvent>)>> = vec![None; urls.len()];

    while let Some(joined) = tasks.join_next().await {
        let (index, url, result) = match joined {
            Ok(done) => done,
            Err(error) => {
                tracing::warn!(%error, "feed task did not complete");
                continue;
            }
        };

        let entry = match result {
            Ok(events) => {
                tracing::info!(%url, count = events.len(), "loaded feed");
                let status = FeedStatus::Loaded(events.len());
                (FeedOutcome { url, status }, events)
            }
            Err(error) => {
                tracing::warn!(%url, %error, "skipping feed");
                let status = FeedStatus::Failed(error.to_string());
                (FeedOutcome { url, status }, Vec::new())
            }
        };
        slots[index] = Some(entry);
    }

    let mut merged = FeedRefresh::default();
    for (index, slot) in slots.into_iter().enumerate() {
        let (outcome, events) = slot.unwrap_or_else(|| {
            let outcome = FeedOutcome {
                url: urls[index].clone(),
                status: FeedStatus::Failed("task aborted".to_string()),
            };
            (outcome, Vec::new())
        });
        merged.outcomes.push(outcome);
        merged.events.extend(events);
    }

    merged.events.sort_by_key(|e| e.start);
    merged
}

async fn load_feed<F: FeedFetcher, Tz: TimeZone>(
    fetcher: &F,
    url: &str,
    tz: &Tz,
) -> ShiftCalResult<Vec<CalendarEvent>> {
    let content = fetcher.fetch(url).await?;
    parse_feed(&content, &EventSource::Feed(url.to_string()), tz)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;

    /// Serves canned responses; unknown URLs fail like a network error.
    struct FakeFetcher {
        responses: HashMap<String, String>,
    }

    impl FakeFetcher {
        fn new(responses: &[(&str, &str)]) -> Arc<Self> {
            Arc::new(FakeFetcher {
                responses: responses
                    .iter()
                    .map(|(url, body)| (url.to_string(), body.to_string()))
                    .collect(),
            })
        }
    }

    impl FeedFetcher for FakeFetcher {
        async fn fetch(&self, url: &str) -> ShiftCalResult<String> {
            tokio::time::sleep(Duration::from_millis(1)).await;
            self.responses.get(url).cloned().ok_or_else(|| ShiftCalError::Fetch {
                url: url.to_string(),
                reason: "connection refused".to_string(),
            })
        }
    }

    fn calendar(uid: &str, start: &str) -> String {
        format!(
            "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:TEST\r\n\
BEGIN:VEVENT\r\nUID:{uid}\r\nSUMMARY:{uid}\r\nDTSTART:{start}\r\nEND:VEVENT\r\n\
END:VCALENDAR"
        )
    }

    #[tokio::test]
    async fn test_failing_feed_does_not_affect_others() {
        let a = calendar("a", "20240210T120000Z");
        let b = calendar("b", "20240210T080000Z");
        let fetcher = FakeFetcher::new(&[
            ("https://a.test/cal.ics", a.as_str()),
            ("https://b.test/cal.ics", b.as_str()),
        ]);
        let urls = vec![
            "https://a.test/cal.ics".to_string(),
            "https://down.test/cal.ics".to_string(),
            "https://b.test/cal.ics".to_string(),
        ];

        let result = refresh(&urls, fetcher, Utc).await;

        let ids: Vec<_> = result.events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"], "merged and sorted by start");

        assert_eq!(result.outcomes.len(), 3);
        assert_eq!(result.outcomes[0].status, FeedStatus::Loaded(1));
        assert!(matches!(result.outcomes[1].status, FeedStatus::Failed(_)));
        assert_eq!(result.outcomes[2].url, "https://b.test/cal.ics");
        assert_eq!(result.failed().count(), 1);
    }

    #[tokio::test]
    async fn test_unparsable_feed_is_skipped() {
        let good = calendar("good", "20240210T120000Z");
        let fetcher = FakeFetcher::new(&[
            ("https://good.test", good.as_str()),
            ("https://html.test", "<html><body>Not found</body></html>"),
        ]);
        let urls = vec!["https://html.test".to_string(), "https://good.test".to_string()];

        let result = refresh(&urls, fetcher, Utc).await;
        assert_eq!(result.events.len(), 1);
        assert_eq!(result.events[0].source, EventSource::Feed("https://good.test".to_string()));
    }

    #[tokio::test]
    async fn test_empty_feed_yields_no_events_and_no_error() {
        let empty = "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:TEST\r\nEND:VCALENDAR";
        let fetcher = FakeFetcher::new(&[("https://empty.test", empty)]);
        let urls = vec!["https://empty.test".to_string()];

        let result = refresh(&urls, fetcher, Utc).await;
        assert!(result.events.is_empty());
        assert_eq!(result.outcomes[0].status, FeedStatus::Loaded(0));
    }

    #[tokio::test]
    async fn test_no_feeds() {
        let fetcher = FakeFetcher::new(&[]);
        let result = refresh(&[], fetcher, Utc).await;
        assert!(result.events.is_empty());
        assert!(result.outcomes.is_empty());
    }

    #[test]
    fn test_normalize_feed_url() {
        assert_eq!(normalize_feed_url("webcal://example.com/a.ics"), "https://example.com/a.ics");
        assert_eq!(normalize_feed_url("WEBCALS://example.com/a.ics"), "https://example.com/a.ics");
        assert_eq!(normalize_feed_url(" https://example.com/a.ics "), "https://example.com/a.ics");
    }
}
