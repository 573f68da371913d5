use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use verifier::verifier::{Submission, VerificationRequest, Verifier, VerifierError};

pub struct ApiProgress {
    bar: ProgressBar,
}

impl ApiProgress {
    pub fn new_submission(name: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("🚀 {msg} {spinner:.green}") {
            bar.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
        }
        bar.set_message(format!("Submitting {name} to BscScan..."));
        bar.enable_steady_tick(Duration::from_millis(80));

        Self { bar }
    }

    pub fn finish_and_clear(&self) {
        self.bar.finish_and_clear();
    }
}

/// Shows a spinner while the wrapped verifier works.
pub struct WithProgress<V> {
    inner: V,
}

impl<V> WithProgress<V> {
    pub const fn new(inner: V) -> Self {
        Self { inner }
    }
}

impl<V: Verifier> Verifier for WithProgress<V> {
    fn verify(&self, request: &VerificationRequest<'_>) -> Result<Submission, VerifierError> {
        let progress = ApiProgress::new_submission(request.name);
        let result = self.inner.verify(request);
        progress.finish_and_clear();
        result
    }
}
