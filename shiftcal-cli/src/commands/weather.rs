use anyhow::Result;
use owo_colors::OwoColorize;
use shiftcal_core::weather::WeatherClient;

use super::Session;
use crate::render::Render;
use crate::utils::tui;

/// Print the weather report. Failures are logged and shown as unavailable
/// rather than failing the command.
pub async fn run(session: &Session) -> Result<()> {
    let weather = &session.config.weather;
    let Some((api_key, latitude, longitude)) = weather.credentials() else {
        println!(
            "{}",
            "Weather not configured. Set api_key, latitude and longitude under [weather] in the config.".dimmed()
        );
        return Ok(());
    };

    let client = WeatherClient::new(&weather.base_url, api_key, &weather.units, session.config.fetch_timeout()?)?;

    let report = client.report(latitude, longitude, weather.forecast_days);
    match tui::with_spinner("Fetching weather", report).await {
        Ok(report) => println!("{}", report.render()),
        Err(e) => {
            tracing::warn!(error = %e, "weather request failed");
            println!("{}", "Weather unavailable".dimmed());
        }
    }
    Ok(())
}
