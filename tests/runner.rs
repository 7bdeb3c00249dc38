//! End-to-end runner behavior: nesting, hook frames, failure accounting,
//! and report text, driven through explicit contexts with captured sinks.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use attest::{expect, Context};
use pretty_assertions::assert_eq;

/// A clonable in-memory sink so report text can be asserted on after the
/// context is done with it.
#[derive(Clone, Default)]
struct SharedBuf(Rc<RefCell<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl SharedBuf {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

fn harness() -> (Context, SharedBuf) {
    colored::control::set_override(false);
    let buf = SharedBuf::default();
    (Context::with_sink(Box::new(buf.clone())), buf)
}

type Trace = Rc<RefCell<Vec<&'static str>>>;

#[test]
fn group_summary_counts_one_passing_test() {
    let (mut ctx, buf) = harness();
    let x = Rc::new(RefCell::new(0));
    let setter = Rc::clone(&x);
    let reader = Rc::clone(&x);

    let clean = ctx.group("G", move |t| {
        t.before_each(move |_| {
            *setter.borrow_mut() = 1;
            Ok(())
        });
        let reader = Rc::clone(&reader);
        t.test("t1", move |_| expect(*reader.borrow()).to_equal(1));
    });

    assert!(clean);
    let out = buf.contents();
    assert!(
        out.contains("Ran 1 Test in Group \"G.\" Passed: 1, Failed: 0."),
        "report: {}",
        out
    );
}

#[test]
fn failed_tests_do_not_stop_siblings() {
    let (mut ctx, buf) = harness();
    let results = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&results);

    let clean = ctx.group("G", move |t| {
        sink.borrow_mut()
            .push(t.test("bad", |_| expect(1).to_equal(2)));
        sink.borrow_mut()
            .push(t.test("good", |_| expect(1).to_equal(1)));
    });

    assert!(!clean);
    assert_eq!(*results.borrow(), vec![false, true]);
    let out = buf.contents();
    assert!(
        out.contains("Ran 2 Tests in Group \"G.\" Passed: 1, Failed: 1."),
        "report: {}",
        out
    );
    assert!(out.contains("Expected 2 but got 1"), "report: {}", out);
    assert!(out.contains("in: G > bad"), "report: {}", out);
}

#[test]
fn hooks_run_outermost_frame_first_in_registration_order() {
    let (mut ctx, _buf) = harness();
    let trace: Trace = Rc::default();
    let t0 = Rc::clone(&trace);

    ctx.group("outer", move |t| {
        let (a, z, b, body) =
            (Rc::clone(&t0), Rc::clone(&t0), Rc::clone(&t0), Rc::clone(&t0));
        t.before_each(move |_| {
            a.borrow_mut().push("A");
            Ok(())
        });
        t.after_each(move |_| {
            z.borrow_mut().push("Z");
            Ok(())
        });
        t.group("inner", move |t| {
            t.before_each(move |_| {
                b.borrow_mut().push("B");
                Ok(())
            });
            t.test("t", move |_| {
                body.borrow_mut().push("body");
                Ok(())
            });
        });
    });

    assert_eq!(*trace.borrow(), vec!["A", "B", "body", "Z"]);
}

#[test]
fn sibling_groups_do_not_share_hooks() {
    let (mut ctx, _buf) = harness();
    let trace: Trace = Rc::default();
    let t0 = Rc::clone(&trace);

    ctx.group("G", move |t| {
        let (hook, t1, t2) = (Rc::clone(&t0), Rc::clone(&t0), Rc::clone(&t0));
        t.group("s1", move |t| {
            t.before_each(move |_| {
                hook.borrow_mut().push("s1-hook");
                Ok(())
            });
            t.test("t1", move |_| {
                t1.borrow_mut().push("t1");
                Ok(())
            });
        });
        t.group("s2", move |t| {
            t.test("t2", move |_| {
                t2.borrow_mut().push("t2");
                Ok(())
            });
        });
    });

    assert_eq!(*trace.borrow(), vec!["s1-hook", "t1", "t2"]);
}

#[test]
fn failing_test_passes_when_it_raises() {
    let (mut ctx, buf) = harness();
    let ok = ctx.failing_test("doomed", |_| expect(1).to_equal(2));
    assert!(ok);
    let out = buf.contents();
    assert!(out.contains("✗✓"), "report: {}", out);
    assert!(out.contains("Test \"doomed\" Passed."), "report: {}", out);
}

#[test]
fn failing_test_fails_when_it_completes() {
    let (mut ctx, buf) = harness();
    let ok = ctx.failing_test("too healthy", |_| Ok(()));
    assert!(!ok);
    let out = buf.contents();
    assert!(
        out.contains("Expected test to fail, but it passed."),
        "report: {}",
        out
    );
    assert!(
        out.contains("Test \"too healthy\" Failed."),
        "report: {}",
        out
    );
}

#[test]
fn a_failed_before_each_fails_the_test() {
    let (mut ctx, buf) = harness();
    let clean = ctx.group("G", |t| {
        t.before_each(|_| Err(attest::Failure("setup broke".to_string())));
        t.test("t", |_| Ok(()));
    });
    assert!(!clean);
    assert!(buf.contents().contains("setup broke"));
}

#[test]
fn logged_output_is_embedded_under_the_report_line() {
    let (mut ctx, buf) = harness();
    ctx.group("G", |t| {
        t.test("t", |t| {
            t.log("hello diag");
            Ok(())
        });
    });
    // Group at depth 0, test at depth 1, diagnostics one level deeper.
    assert!(buf.contents().contains("    hello diag"), "report: {}", buf.contents());
}

#[test]
fn context_resets_after_the_outermost_invocation() {
    let (mut ctx, buf) = harness();
    ctx.group("first", |t| {
        t.test("bad", |_| expect(1).to_equal(2));
    });
    assert_eq!(ctx.total(), 0);
    assert_eq!(ctx.failed(), 0);
    assert_eq!(ctx.path(), "");

    // A later run starts from a clean slate.
    let clean = ctx.group("second", |t| {
        t.test("good", |_| Ok(()));
    });
    assert!(clean);
    assert!(buf
        .contents()
        .contains("Ran 1 Test in Group \"second.\" Passed: 1, Failed: 0."));
}

#[test]
fn standalone_test_prints_its_own_summary() {
    let (mut ctx, buf) = harness();
    let ok = ctx.test("alone", |_| expect("ok").to_match("/^o/"));
    assert!(ok);
    assert!(buf.contents().contains("Test \"alone\" Passed."));
}

#[test]
#[should_panic(expected = "logic error")]
fn nesting_a_test_inside_a_test_is_a_usage_error() {
    let (mut ctx, _buf) = harness();
    ctx.test("outer", |t| {
        t.test("inner", |_| Ok(()));
        Ok(())
    });
}

#[test]
#[should_panic(expected = "logic error")]
fn registering_a_hook_inside_a_test_is_a_usage_error() {
    let (mut ctx, _buf) = harness();
    ctx.test("outer", |t| {
        t.before_each(|_| Ok(()));
        Ok(())
    });
}
