//! Current conditions and a daily forecast from an OpenWeatherMap-compatible API.
//!
//! The forecast endpoint returns a 3-hourly series; one entry per day is
//! kept, the one closest to midday.

use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Timelike, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{ShiftCalError, ShiftCalResult};

pub const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Conditions at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct Conditions {
    pub time: DateTime<Utc>,
    pub temperature: f64,
    pub feels_like: Option<f64>,
    pub humidity: Option<u8>,
    pub wind_speed: Option<f64>,
    pub summary: String,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub conditions: Conditions,
}

#[derive(Debug, Clone)]
pub struct WeatherReport {
    pub location: Option<String>,
    pub current: Conditions,
    pub daily: Vec<DailyForecast>,
}

// API response shapes

#[derive(Debug, Deserialize)]
struct ApiSummary {
    #[serde(default)]
    main: String,
    #[serde(default)]
    description: String,
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiMain {
    temp: f64,
    feels_like: Option<f64>,
    humidity: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct ApiWind {
    speed: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ApiConditions {
    dt: i64,
    main: ApiMain,
    #[serde(default)]
    weather: Vec<ApiSummary>,
    wind: Option<ApiWind>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiCity {
    /// Offset from UTC in seconds
    #[serde(default)]
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct ApiForecast {
    #[serde(default)]
    list: Vec<ApiConditions>,
    city: Option<ApiCity>,
}

impl ApiConditions {
    fn into_conditions(self) -> Option<Conditions> {
        let time = DateTime::from_timestamp(self.dt, 0)?;
        let summary = self.weather.first();
        Some(Conditions {
            time,
            temperature: self.main.temp,
            feels_like: self.main.feels_like,
            humidity: self.main.humidity,
            wind_speed: self.wind.and_then(|w| w.speed),
            summary: summary
                .map(|s| if s.description.is_empty() { s.main.clone() } else { s.description.clone() })
                .unwrap_or_default(),
            icon: summary.and_then(|s| s.icon.clone()),
        })
    }
}

/// Keeps one entry per calendar date (in `offset`), the one nearest 12:00,
/// for at most `days` dates in chronological order.
pub fn sample_daily(series: &[Conditions], offset: FixedOffset, days: usize) -> Vec<DailyForecast> {
    let mut daily: Vec<DailyForecast> = Vec::new();

    for entry in series {
        let local = entry.time.with_timezone(&offset);
        let date = local.date_naive();
        let distance = distance_from_noon(local.hour(), local.minute());

        match daily.iter_mut().find(|d| d.date == date) {
            Some(existing) => {
                let current = existing.conditions.time.with_timezone(&offset);
                if distance < distance_from_noon(current.hour(), current.minute()) {
                    existing.conditions = entry.clone();
                }
            }
            None => daily.push(DailyForecast {
                date,
                conditions: entry.clone(),
            }),
        }
    }

    daily.sort_by_key(|d| d.date);
    daily.truncate(days);
    daily
}

fn distance_from_noon(hour: u32, minute: u32) -> u32 {
    (hour * 60 + minute).abs_diff(12 * 60)
}

#[derive(Clone)]
pub struct WeatherClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    units: String,
}

impl WeatherClient {
    pub fn new(base_url: &str, api_key: &str, units: &str, timeout: Duration) -> ShiftCalResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ShiftCalError::Config(format!("Could not build HTTP client: {e}")))?;

        Ok(WeatherClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            units: units.to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str, lat: f64, lon: f64) -> ShiftCalResult<T> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("units", self.units.clone()),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .await
            .map_err(|e| ShiftCalError::Weather(format!("{endpoint} request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ShiftCalError::Weather(format!("{endpoint} returned HTTP {status}")));
        }

        response
            .json()
            .await
            .map_err(|e| ShiftCalError::Weather(format!("Could not read {endpoint} response: {e}")))
    }

    pub async fn current(&self, lat: f64, lon: f64) -> ShiftCalResult<(Conditions, Option<String>)> {
        let raw: ApiConditions = self.get_json("weather", lat, lon).await?;
        let location = raw.name.clone();
        let conditions = raw
            .into_conditions()
            .ok_or_else(|| ShiftCalError::Weather("Current conditions have an invalid timestamp".into()))?;
        Ok((conditions, location))
    }

    pub async fn forecast(&self, lat: f64, lon: f64, days: usize) -> ShiftCalResult<Vec<DailyForecast>> {
        let raw: ApiForecast = self.get_json("forecast", lat, lon).await?;
        Ok(daily_from_forecast(raw, days))
    }

    /// Current conditions and forecast, requested concurrently.
    pub async fn report(&self, lat: f64, lon: f64, days: usize) -> ShiftCalResult<WeatherReport> {
        let ((current, location), daily) =
            tokio::try_join!(self.current(lat, lon), self.forecast(lat, lon, days))?;
        Ok(WeatherReport {
            location,
            current,
            daily,
        })
    }
}

fn daily_from_forecast(raw: ApiForecast, days: usize) -> Vec<DailyForecast> {
    let offset_secs = raw.city.as_ref().map(|c| c.timezone).unwrap_or(0);
    let offset = FixedOffset::east_opt(offset_secs).unwrap_or_else(|| Utc.fix());
    let series: Vec<Conditions> = raw.list.into_iter().filter_map(ApiConditions::into_conditions).collect();
    sample_daily(&series, offset, days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32, temp: f64) -> Conditions {
        Conditions {
            time: Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap(),
            temperature: temp,
            feels_like: None,
            humidity: None,
            wind_speed: None,
            summary: String::new(),
            icon: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_sample_daily_picks_entry_nearest_noon() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let series: Vec<Conditions> = [0, 3, 6, 9, 12, 15, 18, 21]
            .iter()
            .map(|h| at(2024, 2, 10, *h, f64::from(*h)))
            .chain([0, 9, 15].iter().map(|h| at(2024, 2, 11, *h, 100.0 + f64::from(*h))))
            .collect();

        let daily = sample_daily(&series, utc, 5);
        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0].date, date(2024, 2, 10));
        assert_eq!(daily[0].conditions.temperature, 12.0);
        // 09:00 and 15:00 tie; the earlier entry is kept
        assert_eq!(daily[1].conditions.temperature, 109.0);
    }

    #[test]
    fn test_sample_daily_uses_location_offset() {
        // 23:00 UTC is 01:00 the next day at UTC+2
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let series = vec![at(2024, 2, 10, 23, 1.0)];
        let daily = sample_daily(&series, plus_two, 5);
        assert_eq!(daily[0].date, date(2024, 2, 11));
    }

    #[test]
    fn test_sample_daily_limits_days() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let series: Vec<Conditions> = (1..=6).map(|d| at(2024, 2, d, 12, 0.0)).collect();
        assert_eq!(sample_daily(&series, utc, 3).len(), 3);
    }

    #[test]
    fn test_forecast_response_is_sampled() {
        let json = r#"{
            "list": [
                {"dt": 1707552000, "main": {"temp": 3.5}, "weather": [{"main": "Clouds", "description": "broken clouds", "icon": "04d"}]},
                {"dt": 1707566400, "main": {"temp": 7.25, "humidity": 60}, "weather": [{"main": "Rain", "description": "", "icon": "10d"}], "wind": {"speed": 4.1}}
            ],
            "city": {"name": "Testville", "timezone": 0}
        }"#;

        let raw: ApiForecast = serde_json::from_str(json).unwrap();
        let daily = daily_from_forecast(raw, 5);

        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].date, date(2024, 2, 10));
        // 12:00 UTC entry wins over 08:00
        assert_eq!(daily[0].conditions.temperature, 7.25);
        assert_eq!(daily[0].conditions.summary, "Rain");
        assert_eq!(daily[0].conditions.wind_speed, Some(4.1));
    }

    #[test]
    fn test_current_response_parses() {
        let json = r#"{"dt": 1707566400, "name": "Testville",
            "main": {"temp": 7.0, "feels_like": 4.0, "humidity": 81},
            "weather": [{"main": "Clear", "description": "clear sky", "icon": "01d"}]}"#;

        let raw: ApiConditions = serde_json::from_str(json).unwrap();
        assert_eq!(raw.name.as_deref(), Some("Testville"));
        let conditions = raw.into_conditions().unwrap();
        assert_eq!(conditions.summary, "clear sky");
        assert_eq!(conditions.humidity, Some(81));
        assert_eq!(conditions.icon.as_deref(), Some("01d"));
    }
}
