//! Progress reporting infrastructure
//!
//! To avoid corrupted terminal output, nothing should be written to stdout or
//! stderr while a report is being displayed. Please use logs for debug
//! messages; the interactive command loop only starts once all bars are gone.

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::borrow::Cow;

/// CLI progress report of ongoing operations
#[derive(Clone, Debug, Default)]
pub struct ProgressReport(MultiProgress);
//
impl ProgressReport {
    /// Prepare to report progress on the cli
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepare to report on a new operation
    pub fn add(&self, what: impl Into<Cow<'static, str>>, work: Work) -> ProgressTracker {
        let style_header = "{prefix} ";
        let style_trailer = match work {
            Work::Bytes(_) => {
                "{wide_bar} {decimal_bytes}/{decimal_total_bytes} ({decimal_bytes_per_sec})"
            }
            Work::Records => "{spinner} {human_pos} records ({per_sec})",
        };
        let style = ProgressStyle::with_template(&format!("{style_header}{style_trailer}"))
            .expect("all styles above should be valid indicatif styles");
        let bar = match work {
            Work::Bytes(total) => ProgressBar::new(total as u64),
            Work::Records => ProgressBar::new_spinner(),
        }
        .with_prefix(what.into())
        .with_style(style);
        self.0.add(bar.clone());
        ProgressTracker {
            bar,
            report: self.0.clone(),
            bounded: matches!(work, Work::Bytes(_)),
        }
    }
}

/// Work whose progression can be tracked
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum Work {
    /// Bytes to be processed, with the total known in advance
    Bytes(usize),

    /// Records to be processed, without a predetermined total
    Records,
}

/// Mechanism to track progress
#[derive(Clone, Debug)]
pub struct ProgressTracker {
    /// Progress bar for this specific operation
    bar: ProgressBar,

    /// Underlying progress report
    report: MultiProgress,

    /// Truth that the tracked work has a known total
    bounded: bool,
}
//
impl ProgressTracker {
    /// Show that a certain amount of progress has been made
    ///
    /// Returns truth that the tracked work has reached its known total
    pub fn make_progress(&self, progress: u64) -> bool {
        self.bar.inc(progress);
        if !self.bounded {
            return false;
        }
        let current = self.bar.position();
        let max = self.bar.length().unwrap_or(0);
        assert!(current <= max, "recorded more progress than expected");

        // Hide progress bar once done
        let finished = current == max;
        if finished {
            self.finish();
        }
        finished
    }

    /// Declare the tracked work complete and hide its bar
    ///
    /// Bounded work finishes on its own once its known total is reached; this
    /// must be called for [`Work::Records`] style open-ended work, and is
    /// harmless on work that already finished.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
        self.report.remove(&self.bar);
    }
}
