//! Rendering of report lines. The reporter is the harness's only output
//! channel; everything it emits goes through a single sink so report text
//! can be captured and asserted on.

use std::io::Write;
use std::time::Duration;

use colored::*;

use crate::errors::Failure;

/// Outcome classification for one executed test.
pub enum Verdict {
    /// The body ran to completion with every assertion holding.
    Passed,
    /// An expected-failure test raised, as it should.
    FailedAsExpected,
    /// The test raised unexpectedly, or an expected-failure test passed.
    Failed(Failure),
}

impl Verdict {
    /// True unless the test unexpectedly failed.
    pub fn passed(&self) -> bool {
        !matches!(self, Verdict::Failed(_))
    }
}

/// Writes the human-readable run report.
pub struct Reporter {
    sink: Box<dyn Write>,
}

impl Reporter {
    pub(crate) fn new(sink: Box<dyn Write>) -> Self {
        Reporter { sink }
    }

    // Report output is best-effort; sink errors are dropped.
    fn put(&mut self, text: &str) {
        let _ = self.sink.write_all(text.as_bytes());
        let _ = self.sink.flush();
    }

    pub(crate) fn line(&mut self, text: &str) {
        self.put(text);
        self.put("\n");
    }

    /// Continuation line printed after a nested group closes.
    pub(crate) fn blank(&mut self) {
        self.put("\n");
    }

    pub(crate) fn group_header(&mut self, depth: usize, name: &str) {
        self.put(&format!("{}{}\n", indent(depth), name.bold()));
    }

    /// Start-of-line marker for a test; the verdict symbol lands on the same
    /// line once the test finishes.
    pub(crate) fn test_start(&mut self, depth: usize, name: &str) {
        self.put(&format!("{}=> {}: ", indent(depth), name));
    }

    /// Finish a test's report line: verdict symbol and elapsed time, then
    /// the test's captured diagnostics and, on unexpected failure, the
    /// failure text annotated with the group/test path it was raised in.
    pub(crate) fn test_result(
        &mut self,
        depth: usize,
        verdict: &Verdict,
        elapsed: Duration,
        captured: &str,
        path: &str,
    ) {
        let took = format!("({})", fmt_elapsed(elapsed)).dimmed();
        match verdict {
            Verdict::Passed => self.put(&format!("{} {}\n", "✓".green(), took)),
            Verdict::FailedAsExpected => {
                self.put(&format!("{} {}\n", "✗✓".yellow(), took))
            }
            Verdict::Failed(_) => self.put(&format!("{} {}\n", "✗".red(), took)),
        }
        let inner = indent(depth + 1);
        for line in captured.lines() {
            self.put(&format!("{}{}\n", inner, line.dimmed()));
        }
        if let Verdict::Failed(failure) = verdict {
            for line in failure.0.lines() {
                self.put(&format!("{}{}\n", inner, line.red()));
            }
            self.put(&format!(
                "{}{}\n",
                inner,
                format!("in: {}", path).dimmed()
            ));
        }
    }

    /// Summary for a top-level standalone test.
    pub(crate) fn test_summary(&mut self, name: &str, passed: bool) {
        let line = format!(
            "Test \"{}\" {}.",
            name,
            if passed { "Passed" } else { "Failed" }
        );
        if passed {
            self.put(&format!("{}\n", line.green().bold()));
        } else {
            self.put(&format!("{}\n", line.red().bold()));
        }
    }

    /// Summary for a top-level group, printed once its whole subtree ran.
    pub(crate) fn group_summary(&mut self, name: &str, total: u32, failed: u32) {
        let passed = total - failed;
        let noun = if total == 1 { "Test" } else { "Tests" };
        let line = format!(
            "Ran {} {} in Group \"{}.\" Passed: {}, Failed: {}.",
            total, noun, name, passed, failed
        );
        if failed == 0 {
            self.put(&format!("{}\n", line.green().bold()));
        } else {
            self.put(&format!("{}\n", line.red().bold()));
        }
    }
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

/// Millisecond precision below a second, tenths of a second above.
fn fmt_elapsed(elapsed: Duration) -> String {
    if elapsed >= Duration::from_secs(1) {
        format!("{:.1}s", elapsed.as_secs_f64())
    } else {
        format!("{}ms", elapsed.as_millis())
    }
}
