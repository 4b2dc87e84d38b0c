//! Terminal progress bar for streamed downloads

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const BAR_TEMPLATE: &str =
    "{msg} [{bar:40.cyan/blue}] {bytes:>8}/{total_bytes:>8} ({percent:>3}%) ETA: {eta}";
const SPINNER_TEMPLATE: &str = "{spinner} {msg} {bytes:>8}";

pub struct ProgressTracker {
    progress_bar: ProgressBar,
}

impl ProgressTracker {
    /// Bar for a known size, spinner when the server sent no length
    pub fn new(total_size: u64) -> Self {
        let pb = if total_size > 0 {
            let pb = ProgressBar::new(total_size);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template(BAR_TEMPLATE)
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );
            pb
        } else {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template(SPINNER_TEMPLATE)
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb
        };

        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Downloading:");

        Self { progress_bar: pb }
    }

    pub fn update(&self, progress: u64) {
        self.progress_bar.set_position(progress);
    }

    pub fn finish(&self) {
        self.progress_bar.finish_with_message("Download complete");
    }

    pub fn abandon(&self) {
        self.progress_bar.abandon_with_message("Download failed");
    }
}
