//! The boundary to the HTTP collaborator: the decoded result of one API
//! call and its typed expectation wrapper.
//!
//! Each accessor wraps a piece of the response through the matcher engine
//! with the result itself as the passthrough, so status, body, and field
//! assertions chain fluently on one call.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::{logic_error, Failure, Outcome};
use crate::matcher::{expect_with, Expect};

/// Decoded result of a single API request.
#[derive(Debug)]
pub struct ApiResult {
    /// Collected transport/decoding error text, if any. Prepended to
    /// assertion failures raised through this result for diagnostic
    /// context.
    pub error: Option<String>,
    /// Transfer metadata; `http_code` is always present.
    pub info: Map<String, Value>,
    /// Decoded JSON response body.
    pub response: Value,
}

impl ApiResult {
    /// The HTTP status code, 0 when the transport never produced one.
    pub fn status(&self) -> i64 {
        self.info
            .get("http_code")
            .and_then(Value::as_i64)
            .unwrap_or(0)
    }

    /// Matcher over the whole response body, chaining back to this result.
    pub fn expect(&self) -> Expect<&Self> {
        expect_with(&self.response, self)
    }

    /// Matcher over one top-level response field. A missing field wraps as
    /// null, so the assertion fails with the actual value in the message.
    pub fn expect_on(&self, key: &str) -> Expect<&Self> {
        let field = self.response.get(key).cloned().unwrap_or(Value::Null);
        expect_with(field, self)
    }

    /// Assert the HTTP status code.
    pub fn expect_status(&self, code: i64) -> Outcome<&Self> {
        if self.status() == code {
            Ok(self)
        } else {
            Err(self.annotate(Failure(format!(
                "Expected HTTP status {} but got {}",
                code,
                self.status()
            ))))
        }
    }

    /// Assert status and body together: a 2xx code asserts containment of
    /// `body` against the response, a 4xx code against the response's
    /// `errors` field.
    pub fn expect_status_with(
        &self,
        code: i64,
        body: impl Serialize,
    ) -> Outcome<&Self> {
        self.expect_status(code)?;
        let target = if (200..300).contains(&code) {
            self.response.clone()
        } else if (400..500).contains(&code) {
            self.response.get("errors").cloned().unwrap_or(Value::Null)
        } else {
            logic_error("expect_status_with() only understands 2xx and 4xx codes");
        };
        expect_with(target, self)
            .to_contain(body)
            .map_err(|failure| self.annotate(failure))
    }

    /// Assert equality of one top-level response field, or a regex match
    /// when the expected value is a pattern-shaped string.
    pub fn expect_key(&self, key: &str, value: impl Serialize) -> Outcome<&Self> {
        self.expect_on(key)
            .to_match(value)
            .map_err(|failure| self.annotate(failure))
    }

    /// Assert containment of a map of expected fields against the whole
    /// response. Anything but a map is harness misuse.
    pub fn expect_body(&self, body: impl Serialize) -> Outcome<&Self> {
        let body = serde_json::to_value(body)
            .expect("expected bodies must serialize to JSON");
        if !body.is_object() {
            logic_error("expect_body() takes a map of expected fields");
        }
        self.expect()
            .to_contain(body)
            .map_err(|failure| self.annotate(failure))
    }

    fn annotate(&self, failure: Failure) -> Failure {
        match &self.error {
            Some(error) => Failure(format!("{}\n{}", error, failure.0)),
            None => failure,
        }
    }
}
