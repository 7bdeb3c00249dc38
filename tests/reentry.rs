//! Re-entering the free entry points mid-run is a usage error that aborts
//! the whole run. Kept alone in this binary: the panic unwinds out of the
//! process-wide context mid-test, so nothing else may share it afterwards.

use attest::test;

#[test]
#[should_panic(expected = "re-entered")]
fn free_entry_points_cannot_be_reentered_mid_run() {
    test("outer", |_| {
        test("inner", |_| Ok(()));
        Ok(())
    });
}
