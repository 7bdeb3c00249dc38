//! The free-function surface over the process-wide context. Each test here
//! runs on its own thread and therefore against its own context instance.

use std::cell::RefCell;
use std::rc::Rc;

use attest::{after_each, before_each, expect, group};

#[test]
fn top_level_hooks_wrap_every_test_and_clear_on_reset() {
    let trace: Rc<RefCell<Vec<&'static str>>> = Rc::default();
    let (setup, teardown, body) =
        (Rc::clone(&trace), Rc::clone(&trace), Rc::clone(&trace));

    before_each(move |_| {
        setup.borrow_mut().push("setup");
        Ok(())
    });
    after_each(move |_| {
        teardown.borrow_mut().push("teardown");
        Ok(())
    });

    let clean = group("wrapped", move |t| {
        t.test("t", move |_| {
            body.borrow_mut().push("body");
            Ok(())
        });
    });
    assert!(clean);
    assert_eq!(*trace.borrow(), vec!["setup", "body", "teardown"]);

    // The outermost completion reset the context, clearing top-level hooks.
    trace.borrow_mut().clear();
    group("bare", |t| {
        t.test("t", |_| Ok(()));
    });
    assert!(trace.borrow().is_empty());
}

#[test]
fn a_whole_run_reads_like_a_script() {
    let clean = group("api shapes", |t| {
        t.test("objects", |_| {
            expect(serde_json::json!({"id": 1, "tags": ["new"]}))
                .to_contain(serde_json::json!({"tags": ["/^n/"]}))
        });
        t.failing_test("mismatch is caught", |_| {
            expect("5").to_equal(5)
        });
    });
    assert!(clean);
}
