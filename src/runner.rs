//! The test/group execution state machine and the free-function entry
//! points over the process-wide context.
//!
//! Execution is strictly synchronous and depth-first: hooks and tests run in
//! registration order, groups run in registration order, and a failure in
//! one test never stops its siblings. The only cross-run state is the
//! process-wide "any test failed" flag consulted by [`exit_code`].

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use crate::context::{Context, Hook};
use crate::errors::{logic_error, Failure, Outcome};
use crate::report::Verdict;

/// Set once any test anywhere unexpectedly fails during the process
/// lifetime; decides the process exit code.
static ANY_FAILED: AtomicBool = AtomicBool::new(false);

thread_local! {
    /// The context threaded through the free entry points. Lazily created on
    /// the first `test`/`group` call and reset to its empty state after each
    /// outermost invocation returns.
    static CONTEXT: RefCell<Context> = RefCell::new(Context::new());
}

impl Context {
    /// Run a named test. Returns true iff the test did not unexpectedly
    /// fail.
    pub fn test<F>(&mut self, name: &str, body: F) -> bool
    where
        F: FnOnce(&mut Context) -> Outcome,
    {
        self.run_test(name, body, false)
    }

    /// Run a test that is expected to raise. The test passes iff its body
    /// fails an assertion; completing cleanly is reported as a failure.
    pub fn failing_test<F>(&mut self, name: &str, body: F) -> bool
    where
        F: FnOnce(&mut Context) -> Outcome,
    {
        self.run_test(name, body, true)
    }

    /// Run a named group. The body registers nested groups, tests, and
    /// hooks against the same shared context. Returns true iff no test in
    /// the subtree has failed so far.
    pub fn group<F>(&mut self, name: &str, body: F) -> bool
    where
        F: FnOnce(&mut Context),
    {
        let init = !self.initialized;
        self.initialized = true;

        // Fresh hook frames: hooks registered inside this group must not
        // leak to sibling groups.
        self.before_frames.push(Vec::new());
        self.after_frames.push(Vec::new());
        self.in_test = false;
        self.levels.push(name.to_string());
        let depth = self.levels.len() - 1;
        self.reporter.group_header(depth, name);

        body(self);

        self.levels.pop();
        self.before_frames.pop();
        self.after_frames.pop();

        let clean = self.failed == 0;
        if init {
            self.reporter.group_summary(name, self.total, self.failed);
            self.reset();
        } else {
            self.reporter.blank();
        }
        clean
    }

    /// Register a hook to run before every test in the current group and in
    /// every group nested within it.
    pub fn before_each<F>(&mut self, hook: F)
    where
        F: Fn(&mut Context) -> Outcome + 'static,
    {
        if self.in_test {
            logic_error("before_each() called inside a running test");
        }
        self.before_frames
            .last_mut()
            .expect("hook frame stack is never empty")
            .push(Rc::new(hook));
    }

    /// Register a hook to run after every test in the current group and in
    /// every group nested within it.
    pub fn after_each<F>(&mut self, hook: F)
    where
        F: Fn(&mut Context) -> Outcome + 'static,
    {
        if self.in_test {
            logic_error("after_each() called inside a running test");
        }
        self.after_frames
            .last_mut()
            .expect("hook frame stack is never empty")
            .push(Rc::new(hook));
    }

    fn run_test<F>(&mut self, name: &str, body: F, expected_to_fail: bool) -> bool
    where
        F: FnOnce(&mut Context) -> Outcome,
    {
        if self.in_test {
            logic_error("test() called inside a running test");
        }
        let init = !self.initialized;
        self.initialized = true;

        self.levels.push(name.to_string());
        let depth = self.levels.len() - 1;
        self.in_test = true;
        self.total += 1;
        self.reporter.test_start(depth, name);
        self.capture = Some(String::new());

        let mut start = Instant::now();
        let outcome = self.exec_window(body, &mut start);
        let elapsed = start.elapsed();

        // Capture teardown happens before the report line is finalized, on
        // the success and failure path alike.
        let captured = self.capture.take().unwrap_or_default();

        let verdict = match (outcome, expected_to_fail) {
            (Ok(()), false) => Verdict::Passed,
            (Err(_), true) => Verdict::FailedAsExpected,
            (Ok(()), true) => Verdict::Failed(Failure(
                "Expected test to fail, but it passed.".to_string(),
            )),
            (Err(failure), false) => Verdict::Failed(failure),
        };
        let passed = verdict.passed();
        let path = self.path();
        self.reporter
            .test_result(depth, &verdict, elapsed, &captured, &path);

        self.levels.pop();
        self.in_test = false;
        if !passed {
            self.failed += 1;
            ANY_FAILED.store(true, Ordering::Relaxed);
        }
        if init {
            self.reporter.test_summary(name, passed);
            self.reset();
        }
        passed
    }

    /// The single catch boundary: every `before_each` hook across all active
    /// frames (outermost frame first, registration order within a frame),
    /// then the body, then every `after_each` hook the same way. The timer
    /// restarts once setup hooks are done.
    fn exec_window<F>(&mut self, body: F, start: &mut Instant) -> Outcome
    where
        F: FnOnce(&mut Context) -> Outcome,
    {
        for hook in self.active_hooks(&self.before_frames) {
            hook(self)?;
        }
        *start = Instant::now();
        body(self)?;
        for hook in self.active_hooks(&self.after_frames) {
            hook(self)?;
        }
        Ok(())
    }

    // Cloned out of the frames so hooks can take `&mut self`.
    fn active_hooks(&self, frames: &[Vec<Hook>]) -> Vec<Hook> {
        frames.iter().flatten().cloned().collect()
    }
}

fn with_context<T, F>(f: F) -> T
where
    F: FnOnce(&mut Context) -> T,
{
    CONTEXT.with(|cell| match cell.try_borrow_mut() {
        Ok(mut ctx) => f(&mut ctx),
        Err(_) => logic_error(
            "harness entry point re-entered while a run is active; \
             use the context passed to your callback instead",
        ),
    })
}

/// Run a named test against the process-wide context. Returns true iff the
/// test did not unexpectedly fail.
pub fn test<F>(name: &str, body: F) -> bool
where
    F: FnOnce(&mut Context) -> Outcome,
{
    with_context(move |ctx: &mut Context| ctx.test(name, body))
}

/// Run a test expected to fail against the process-wide context.
pub fn failing_test<F>(name: &str, body: F) -> bool
where
    F: FnOnce(&mut Context) -> Outcome,
{
    with_context(move |ctx: &mut Context| ctx.failing_test(name, body))
}

/// Run a named group against the process-wide context. Returns true iff no
/// test in its subtree failed.
pub fn group<F>(name: &str, body: F) -> bool
where
    F: FnOnce(&mut Context),
{
    with_context(move |ctx: &mut Context| ctx.group(name, body))
}

/// Register a `before_each` hook on the process-wide context.
pub fn before_each<F>(hook: F)
where
    F: Fn(&mut Context) -> Outcome + 'static,
{
    with_context(move |ctx: &mut Context| ctx.before_each(hook));
}

/// Register an `after_each` hook on the process-wide context.
pub fn after_each<F>(hook: F)
where
    F: Fn(&mut Context) -> Outcome + 'static,
{
    with_context(move |ctx: &mut Context| ctx.after_each(hook));
}

/// Exit status for the whole process: 1 if any test unexpectedly failed
/// during the process lifetime, else 0.
pub fn exit_code() -> i32 {
    if ANY_FAILED.load(Ordering::Relaxed) {
        1
    } else {
        0
    }
}

/// Terminate the process with [`exit_code`].
pub fn exit() -> ! {
    std::process::exit(exit_code())
}
