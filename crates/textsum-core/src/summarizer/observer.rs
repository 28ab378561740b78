use std::io::Write;
use std::time::Duration;

use tracing::info;

/// Receives the text flowing through `predict`
pub trait PredictionObserver: Send {
    fn on_input(&mut self, text: &str);

    fn on_summary(&mut self, summary: &str);

    fn on_complete(&mut self, _elapsed: Duration) {}
}

/// Emits structured tracing events
#[derive(Debug, Default)]
pub struct TracingObserver;

impl PredictionObserver for TracingObserver {
    fn on_input(&mut self, text: &str) {
        info!(chars = text.chars().count(), "Summarizing dialogue");
    }

    fn on_summary(&mut self, summary: &str) {
        info!(chars = summary.chars().count(), summary, "Summary generated");
    }

    fn on_complete(&mut self, elapsed: Duration) {
        info!(elapsed_ms = elapsed.as_millis() as u64, "Prediction finished");
    }
}

/// Echoes the dialogue and its summary to a writer (stdout by default)
pub struct ConsoleObserver<W: Write + Send = std::io::Stdout> {
    out: W,
}

impl ConsoleObserver {
    pub fn stdout() -> Self {
        Self {
            out: std::io::stdout(),
        }
    }
}

impl<W: Write + Send> ConsoleObserver<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> PredictionObserver for ConsoleObserver<W> {
    // Diagnostics only; write failures are ignored
    fn on_input(&mut self, text: &str) {
        let _ = writeln!(self.out, "Dialogue:\n{}", text);
    }

    fn on_summary(&mut self, summary: &str) {
        let _ = writeln!(self.out, "\nModel Summary:\n{}", summary);
    }
}

#[derive(Debug, Default)]
pub struct NoopObserver;

impl PredictionObserver for NoopObserver {
    fn on_input(&mut self, _text: &str) {}

    fn on_summary(&mut self, _summary: &str) {}
}
