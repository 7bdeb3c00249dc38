use std::{error, fmt};

/// A failed assertion.
///
/// Raised by a matcher verb (or the request layer) and caught only by the
/// test whose body is currently executing; a failure never aborts sibling
/// tests or groups.
pub struct Failure(pub String);

impl fmt::Debug for Failure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl error::Error for Failure {}

/// Result of an assertion or a test body. On success, carries the matcher's
/// passthrough so fluent chains can continue.
pub type Outcome<T = ()> = Result<T, Failure>;

/// Abort the run on programmer misuse of the harness API (nested tests,
/// hooks registered inside a test, re-entered entry points). These are not
/// test failures and are never caught by the test machinery.
pub(crate) fn logic_error(msg: &str) -> ! {
    panic!("logic error: {}", msg)
}
