//! The matcher engine: wraps a subject value and exposes chainable
//! assertion verbs.
//!
//! Subjects are normalized to [`serde_json::Value`] so that deep containment
//! and equality work uniformly over anything serializable. Every verb
//! returns [`Outcome`] carrying the matcher's passthrough, so a failed
//! assertion propagates with `?` to the enclosing test while a successful
//! one hands control back to the object the chain started from.

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::diff;
use crate::errors::{Failure, Outcome};

/// Wrap a value for assertion.
pub fn expect(value: impl Serialize) -> Expect<()> {
    Expect {
        subject: to_subject(value),
        along: (),
    }
}

/// Wrap a value and carry a passthrough that every verb yields on success,
/// so a fluent chain can continue on the originating object.
pub fn expect_with<P: Clone>(value: impl Serialize, along: P) -> Expect<P> {
    Expect {
        subject: to_subject(value),
        along,
    }
}

// Failing to serialize a subject is misuse, not an assertion failure.
fn to_subject(value: impl Serialize) -> Value {
    serde_json::to_value(value).expect("matcher subjects must serialize to JSON")
}

fn render(value: &Value) -> String {
    value.to_string()
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn is_structured(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}

/// A wrapped subject value plus the passthrough handed back by each verb.
/// The subject is read-only; verbs take `&self` so several assertions can
/// run against the same wrapper.
pub struct Expect<P = ()> {
    subject: Value,
    along: P,
}

impl<P: Clone> Expect<P> {
    /// The wrapped subject.
    pub fn subject(&self) -> &Value {
        &self.subject
    }

    fn pass(&self) -> Outcome<P> {
        Ok(self.along.clone())
    }

    fn fail(&self, msg: String) -> Outcome<P> {
        Err(Failure(msg))
    }

    /// Assert structural containment: every key of `other` must be present
    /// in the subject with a matching entry (recursing on structured
    /// entries, regex-matching pattern-shaped strings, strict equality
    /// otherwise). Containment also holds against any structured value
    /// nested anywhere within the subject, so deeply nested response bodies
    /// can be asserted against directly. A plain-string `other` asserts that
    /// some element of the subject sequence matches it as a regex (or
    /// literal); any other scalar must be an exact element of the subject.
    pub fn to_contain(&self, other: impl Serialize) -> Outcome<P> {
        let other = to_subject(other);
        if contains(&self.subject, &other) {
            self.pass()
        } else {
            self.fail(format!(
                "Expected {} to contain {}",
                render(&self.subject),
                render(&other)
            ))
        }
    }

    /// Assert strict, deep equality. No type coercion: `5` and `"5"` are
    /// not equal.
    pub fn to_equal(&self, other: impl Serialize) -> Outcome<P> {
        let other = to_subject(other);
        if other == self.subject {
            return self.pass();
        }
        let mut msg = format!(
            "Expected {} but got {}",
            render(&other),
            render(&self.subject)
        );
        if is_structured(&other) && is_structured(&self.subject) {
            msg.push('\n');
            msg.push_str(&diff::gen_diff(&pretty(&other), &pretty(&self.subject)));
        }
        self.fail(msg)
    }

    /// Assert strict inequality, the symmetric negation of [`Self::to_equal`].
    pub fn to_not_equal(&self, other: impl Serialize) -> Outcome<P> {
        let other = to_subject(other);
        if other != self.subject {
            self.pass()
        } else {
            self.fail(format!(
                "Expected {} to differ from {}",
                render(&self.subject),
                render(&other)
            ))
        }
    }

    /// Assert a regex match when `other` is a pattern-shaped string,
    /// strict equality otherwise.
    pub fn to_match(&self, other: impl Serialize) -> Outcome<P> {
        let other = to_subject(other);
        let pattern = other.as_str().and_then(as_pattern);
        match pattern {
            Some(re) => {
                let text = match self.subject.as_str() {
                    Some(s) => s.to_string(),
                    None => render(&self.subject),
                };
                if re.is_match(&text) {
                    self.pass()
                } else {
                    self.fail(format!(
                        "Expected {} to match {}",
                        render(&self.subject),
                        render(&other)
                    ))
                }
            }
            None => {
                if other == self.subject {
                    self.pass()
                } else {
                    self.fail(format!(
                        "Expected {} but got {}",
                        render(&other),
                        render(&self.subject)
                    ))
                }
            }
        }
    }

    /// Assert that the predicate holds for the subject.
    pub fn to_satisfy<F>(&self, predicate: F) -> Outcome<P>
    where
        F: Fn(&Value) -> bool,
    {
        if predicate(&self.subject) {
            self.pass()
        } else {
            self.fail(format!(
                "Expected {} to satisfy the predicate",
                render(&self.subject)
            ))
        }
    }

    /// Assert that the predicate holds for every element of the subject
    /// sequence.
    pub fn all<F>(&self, predicate: F) -> Outcome<P>
    where
        F: Fn(&Value) -> bool,
    {
        for (idx, item) in self.elements()?.iter().enumerate() {
            if !predicate(item) {
                return self.fail(format!(
                    "Expected every element to satisfy the predicate, \
                     but element {} ({}) does not",
                    idx,
                    render(item)
                ));
            }
        }
        self.pass()
    }

    /// Assert that the predicate holds for at least one element of the
    /// subject sequence.
    pub fn any<F>(&self, predicate: F) -> Outcome<P>
    where
        F: Fn(&Value) -> bool,
    {
        if self.elements()?.iter().any(|item| predicate(item)) {
            self.pass()
        } else {
            self.fail(format!(
                "Expected at least one element of {} to satisfy the predicate",
                render(&self.subject)
            ))
        }
    }

    fn elements(&self) -> Outcome<Vec<&Value>> {
        match &self.subject {
            Value::Array(items) => Ok(items.iter().collect()),
            Value::Object(map) => Ok(map.values().collect()),
            other => Err(Failure(format!(
                "Expected {} to be a sequence",
                render(other)
            ))),
        }
    }
}

/// Decide whether a string is pattern-shaped. A string is a pattern iff it
/// is wrapped in `/` delimiters (with an optional `imsx` flag suffix) and
/// the delimited body compiles under the host regex engine. Any such string
/// is always treated as a pattern, never as a literal, even when it reads
/// like an ordinary word.
pub(crate) fn as_pattern(s: &str) -> Option<Regex> {
    let rest = s.strip_prefix('/')?;
    let close = rest.rfind('/')?;
    let (body, delimited_flags) = rest.split_at(close);
    let flags = &delimited_flags[1..];
    if !flags.chars().all(|c| "imsx".contains(c)) {
        return None;
    }
    let source = if flags.is_empty() {
        body.to_string()
    } else {
        format!("(?{}){}", flags, body)
    };
    Regex::new(&source).ok()
}

/// Deep containment: `other` is a structural subset of the subject at the
/// top level, or of any structured value nested anywhere within it.
fn contains(subject: &Value, other: &Value) -> bool {
    if directly_contains(subject, other) {
        return true;
    }
    match subject {
        Value::Object(map) => map
            .values()
            .any(|v| is_structured(v) && contains(v, other)),
        Value::Array(items) => items
            .iter()
            .any(|v| is_structured(v) && contains(v, other)),
        _ => false,
    }
}

fn directly_contains(subject: &Value, other: &Value) -> bool {
    match other {
        Value::Object(want) => match subject {
            Value::Object(have) => want.iter().all(|(key, wanted)| {
                have.get(key)
                    .map(|actual| entry_matches(actual, wanted))
                    .unwrap_or(false)
            }),
            _ => false,
        },
        // Sequences are index-keyed: element i of `other` must match
        // element i of the subject.
        Value::Array(want) => match subject {
            Value::Array(have) => {
                want.len() <= have.len()
                    && want
                        .iter()
                        .zip(have.iter())
                        .all(|(wanted, actual)| entry_matches(actual, wanted))
            }
            _ => false,
        },
        Value::String(s) => {
            let elements: Vec<&Value> = match subject {
                Value::Array(items) => items.iter().collect(),
                Value::Object(map) => map.values().collect(),
                _ => return false,
            };
            match as_pattern(s) {
                Some(re) => elements
                    .iter()
                    .any(|e| e.as_str().map(|t| re.is_match(t)).unwrap_or(false)),
                None => elements.iter().any(|e| e.as_str() == Some(s.as_str())),
            }
        }
        scalar => match subject {
            Value::Array(items) => items.iter().any(|e| e == scalar),
            Value::Object(map) => map.values().any(|e| e == scalar),
            _ => false,
        },
    }
}

/// One containment entry: structured values recurse into containment,
/// pattern-shaped strings regex-match, everything else compares strictly.
fn entry_matches(actual: &Value, wanted: &Value) -> bool {
    match wanted {
        Value::Object(_) | Value::Array(_) => contains(actual, wanted),
        Value::String(s) => match as_pattern(s) {
            Some(re) => actual.as_str().map(|t| re.is_match(t)).unwrap_or(false),
            None => actual == wanted,
        },
        _ => actual == wanted,
    }
}
