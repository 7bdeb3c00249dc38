use std::fmt;
use std::io::Write;
use std::rc::Rc;

use crate::errors::Outcome;
use crate::report::Reporter;

/// A callback registered with `before_each`/`after_each`. Hooks receive the
/// shared context so they can read and mutate the same state tests see.
pub type Hook = Rc<dyn Fn(&mut Context) -> Outcome>;

/// Shared execution state for one top-level `test`/`group` invocation.
///
/// A single context exists at a time; the entry points in [`crate::runner`]
/// thread a process-wide instance through every group body, test body, and
/// hook. Each field here is restored on every exit path, normal return and
/// failure alike, so an interior failure cannot corrupt the nesting depth.
pub struct Context {
    /// Names of the groups/tests currently on the call stack, innermost
    /// last. Its length equals the current nesting depth.
    pub(crate) levels: Vec<String>,
    /// `before_each` hook frames, one frame per active group. The resting
    /// state holds a single empty frame for hooks registered at top level.
    pub(crate) before_frames: Vec<Vec<Hook>>,
    /// `after_each` hook frames, symmetric with `before_frames`.
    pub(crate) after_frames: Vec<Vec<Hook>>,
    /// True strictly while a single test's hooks and body execute.
    pub(crate) in_test: bool,
    /// True once the outermost group/test has begun. The invocation that set
    /// it prints the final summary and resets the context on its way out.
    pub(crate) initialized: bool,
    /// Tests started within the current top-level invocation's subtree.
    pub(crate) total: u32,
    /// Tests that unexpectedly failed within the current subtree.
    pub(crate) failed: u32,
    /// Buffer for the running test's own diagnostics; `Some` exactly while
    /// a test executes.
    pub(crate) capture: Option<String>,
    pub(crate) reporter: Reporter,
}

impl Context {
    /// A context reporting to stdout.
    pub fn new() -> Self {
        Self::with_sink(Box::new(std::io::stdout()))
    }

    /// A context reporting into an arbitrary sink. The crate's own tests use
    /// this with a byte buffer to assert on report text.
    pub fn with_sink(sink: Box<dyn Write>) -> Self {
        Context {
            levels: Vec::new(),
            before_frames: vec![Vec::new()],
            after_frames: vec![Vec::new()],
            in_test: false,
            initialized: false,
            total: 0,
            failed: 0,
            capture: None,
            reporter: Reporter::new(sink),
        }
    }

    /// Restore the empty state after the outermost invocation returns.
    pub(crate) fn reset(&mut self) {
        self.levels.clear();
        self.before_frames = vec![Vec::new()];
        self.after_frames = vec![Vec::new()];
        self.in_test = false;
        self.initialized = false;
        self.total = 0;
        self.failed = 0;
        self.capture = None;
    }

    /// Record a diagnostic line. While a test runs the line is buffered and
    /// later embedded, indented, under the test's report line; outside a
    /// test it goes straight to the report sink.
    pub fn log(&mut self, msg: impl fmt::Display) {
        match &mut self.capture {
            Some(buf) => {
                buf.push_str(&msg.to_string());
                buf.push('\n');
            }
            None => self.reporter.line(&msg.to_string()),
        }
    }

    /// Names of the active groups/tests, outermost first.
    pub fn path(&self) -> String {
        self.levels.join(" > ")
    }

    /// Tests started so far within the current top-level invocation.
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Tests failed so far within the current top-level invocation.
    pub fn failed(&self) -> u32 {
        self.failed
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
