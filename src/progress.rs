// src/progress.rs
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Lightweight progress reporting used by the collector.
/// Frontends implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the total number of items.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called after each item completes; `done` runs 1..=total.
    fn item_done(&mut self, _done: usize) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}

/// Terminal progress bar.
#[derive(Default)]
pub struct BarProgress {
    bar: Option<ProgressBar>,
}

impl BarProgress {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Progress for BarProgress {
    fn begin(&mut self, total: usize) {
        let pb = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.green/dim}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("█▓░"));
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        self.bar = Some(pb);
    }

    fn log(&mut self, msg: &str) {
        match &self.bar {
            Some(pb) => pb.println(msg),
            None => eprintln!("{msg}"),
        }
    }

    fn item_done(&mut self, done: usize) {
        if let Some(pb) = &self.bar {
            pb.set_position(done as u64);
        }
    }

    fn finish(&mut self) {
        if let Some(pb) = self.bar.take() {
            pb.finish_and_clear();
        }
    }
}
