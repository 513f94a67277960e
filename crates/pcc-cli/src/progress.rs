//! Drives an `indicatif` progress bar from the `pcc_import::ProgressSink`
//! trait, mirroring the original's `progressbar.Default(...)` gated
//! behind `--quiet` — generalized here into an injectable collaborator
//! instead of a global.

use indicatif::{ProgressBar, ProgressStyle};
use pcc_import::ProgressSink;

pub struct IndicatifProgress {
    bar: ProgressBar,
}

impl IndicatifProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )
            .expect("static progress template is valid")
            .progress_chars("#>-"),
        );
        IndicatifProgress { bar }
    }
}

impl ProgressSink for IndicatifProgress {
    fn set_len(&self, len: u64) {
        self.bar.set_length(len);
    }

    fn inc(&self) {
        self.bar.inc(1);
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
