use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// 照合中のスピナー（完了・失敗どちらでも finish_and_clear すること）
pub fn processing_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.cyan} {msg} ({elapsed})")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
