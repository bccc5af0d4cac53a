use anyhow::Result;
use owo_colors::OwoColorize;
use shiftcal_core::config::ShiftcalConfig;

use super::Session;

pub fn run(session: &Session) -> Result<()> {
    let config = &session.config;
    let config_path = ShiftcalConfig::config_path()?;

    println!("{}", "Paths".bold());
    println!("  Config:  {}", config_path.display());
    println!("  Data:    {}", config.data_path().display());

    println!();
    println!("{}", "Calendar".bold());
    println!("  Default view:   {}", config.default_view);
    println!("  Fetch timeout:  {}", config.fetch_timeout);
    println!("  Feeds:          {}", session.feeds.urls().len());

    println!();
    println!("{}", "Weather".bold());
    match config.weather.credentials() {
        Some((_, latitude, longitude)) => {
            println!("  Location:  {latitude}, {longitude}");
            println!("  Units:     {}", config.weather.units);
            println!("  Days:      {}", config.weather.forecast_days);
        }
        None => println!("  {}", "Not configured".dimmed()),
    }

    Ok(())
}
