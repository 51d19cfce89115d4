use crate::ports::outbound::ProgressReporter;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::cell::RefCell;

const BAR_TEMPLATE: &str = "   {spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) - {msg}";

/// StderrProgressReporter adapter for reporting progress to stderr
///
/// Everything goes to stderr so stdout carries only the report. The bar is
/// created lazily on the first counted step and cleared before the next
/// plain message.
pub struct StderrProgressReporter {
    progress_bar: RefCell<Option<ProgressBar>>,
}

impl StderrProgressReporter {
    pub fn new() -> Self {
        Self {
            progress_bar: RefCell::new(None),
        }
    }

    fn get_or_create_progress_bar(&self, total: usize) -> ProgressBar {
        let mut slot = self.progress_bar.borrow_mut();
        if let Some(pb) = slot.as_ref() {
            return pb.clone();
        }
        let style = ProgressStyle::default_bar()
            .template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-");
        let pb = ProgressBar::new(total as u64);
        pb.set_style(style);
        *slot = Some(pb.clone());
        pb
    }

    fn finish_progress_bar(&self) {
        if let Some(pb) = self.progress_bar.borrow_mut().take() {
            pb.finish_and_clear();
        }
    }
}

impl Default for StderrProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for StderrProgressReporter {
    fn report(&self, message: &str) {
        self.finish_progress_bar();
        eprintln!("{}", message);
    }

    fn report_progress(&self, current: usize, total: usize, message: Option<&str>) {
        let pb = self.get_or_create_progress_bar(total);
        pb.set_position(current as u64);
        if let Some(msg) = message {
            pb.set_message(msg.to_string());
        }
        if current >= total {
            self.finish_progress_bar();
        }
    }

    fn report_error(&self, message: &str) {
        self.finish_progress_bar();
        eprintln!("{}", message.yellow());
    }

    fn report_completion(&self, message: &str) {
        self.finish_progress_bar();
        eprintln!();
        eprintln!("{}", message.green());
    }
}
