//! Attest is a small, strictly sequential test harness for scripting
//! HTTP-API test suites, with a fluent matcher DSL for asserting on
//! structured responses.
//!
//! ## Testing Model
//! A suite is ordinary Rust code: groups nest groups and tests, and hooks
//! registered with `before_each`/`after_each` run around every test in
//! their group and in every group nested within it. Everything runs
//! depth-first in registration order against one shared [`Context`]; there
//! is no parallelism, no discovery, and no configuration file.
//!
//! Test bodies return [`Outcome`], so a failed assertion propagates with
//! `?` and is caught exactly once, by the test that raised it. A failure
//! never stops sibling tests or groups; it is recorded, reported, and the
//! run moves on.
//!
//! ```
//! use attest::{expect, group};
//!
//! let clean = group("smoke", |t| {
//!     t.before_each(|t| {
//!         t.log("starting fresh");
//!         Ok(())
//!     });
//!     t.test("arithmetic", |_| expect(2 + 2).to_equal(4));
//!     t.test("containment", |_| {
//!         expect(serde_json::json!({"a": 1, "b": 2}))
//!             .to_contain(serde_json::json!({"a": 1}))
//!     });
//! });
//! assert!(clean);
//! ```
//!
//! ## Matchers
//! [`expect`] wraps any serializable value and exposes the assertion verbs
//! `to_contain`, `to_equal`, `to_not_equal`, `to_match`, `to_satisfy`,
//! `all`, and `any`. Containment is deep and structural: every key of the
//! expected value must be present in the subject, recursively, and
//! containment also holds against structured values nested anywhere within
//! the subject, which makes asserting on deeply nested response bodies
//! painless.
//!
//! Strings wrapped in `/` delimiters that compile as a regex (an `imsx`
//! flag suffix is honored) are always treated as patterns, never as
//! literals, wherever a matcher compares strings:
//!
//! ```
//! use attest::expect;
//! assert!(expect("abc").to_match("/^abc$/").is_ok());
//! ```
//!
//! ## Expected failures
//! `failing_test` inverts the verdict: the test passes iff its body raises
//! an assertion failure, and is reported as failed when it completes
//! cleanly.
//!
//! ## HTTP suites
//! [`http::Api`] issues blocking requests and decodes each response into a
//! [`request::ApiResult`], whose `expect_status`, `expect_key`,
//! `expect_body`, and `expect_on` accessors run through the matcher engine
//! and chain back to the result itself.
//!
//! ## Exit status
//! A process that ran at least one unexpectedly failing test exits
//! non-zero; end the suite binary with `attest::exit()` (or pass
//! [`exit_code`] to `std::process::exit`) to report that to CI.

pub mod context;
pub mod diff;
pub mod errors;
pub mod http;
pub mod matcher;
pub mod report;
pub mod request;
pub mod runner;

pub use context::Context;
pub use errors::{Failure, Outcome};
pub use matcher::{expect, expect_with, Expect};
pub use runner::{
    after_each, before_each, exit, exit_code, failing_test, group, test,
};
