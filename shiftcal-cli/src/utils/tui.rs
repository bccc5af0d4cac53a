use std::future::Future;
use std::io::IsTerminal;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const TICK_INTERVAL: Duration = Duration::from_millis(80);

/// Spinner on stderr. Hidden when stderr is not a terminal so piped output stays clean.
pub fn create_spinner(message: impl Into<String>) -> ProgressBar {
    if !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(&["◐", "◓", "◑", "◒", "●"])
        .template("{spinner} {msg}")
    {
        spinner.set_style(style);
    }
    spinner.set_message(message.into());
    spinner.enable_steady_tick(TICK_INTERVAL);
    spinner
}

/// Await `task` while a spinner shows `message`, clearing it afterwards.
pub async fn with_spinner<T>(message: impl Into<String>, task: impl Future<Output = T>) -> T {
    let spinner = create_spinner(message);
    let output = task.await;
    spinner.finish_and_clear();
    output
}
