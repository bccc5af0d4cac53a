use anyhow::Result;
use owo_colors::OwoColorize;

use super::Session;
use crate::render::Render;

pub fn add(session: &mut Session, url: &str) -> Result<()> {
    if session.feeds.add(url)? {
        println!("Subscribed to {}", url.trim());
    } else {
        println!("{}", format!("Already subscribed to {}", url.trim()).dimmed());
    }
    Ok(())
}

pub fn remove(session: &mut Session, url: &str) -> Result<()> {
    if session.feeds.remove(url)? {
        println!("Unsubscribed from {}", url.trim());
    } else {
        println!("{}", format!("Not subscribed to {}", url.trim()).dimmed());
    }
    Ok(())
}

pub fn list(session: &Session) -> Result<()> {
    let urls = session.feeds.urls();
    if urls.is_empty() {
        println!("{}", "No feeds subscribed".dimmed());
        return Ok(());
    }
    for url in urls {
        println!("{url}");
    }
    Ok(())
}

pub async fn check(session: &Session) -> Result<()> {
    if session.feeds.urls().is_empty() {
        println!("{}", "No feeds subscribed".dimmed());
        return Ok(());
    }

    let refresh = super::show::load_feeds(session).await?;
    for outcome in &refresh.outcomes {
        println!("{}", outcome.render());
    }
    Ok(())
}
