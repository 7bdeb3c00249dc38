//! Thin blocking HTTP helper: builds the query, issues the request, and
//! decodes the JSON body into an [`ApiResult`]. Transport problems fold
//! into the result's `error` field rather than a separate error channel, so
//! they surface through the normal assertion path.

use reqwest::blocking::{Client, Response};
use serde_json::{json, Map, Value};

use crate::request::ApiResult;

/// A base URL plus a reusable blocking client.
pub struct Api {
    base: String,
    client: Client,
}

impl Api {
    pub fn new(base: impl Into<String>) -> Self {
        Api {
            base: base.into(),
            client: Client::new(),
        }
    }

    /// Issue a GET with the given query parameters.
    pub fn get(&self, path: &str, query: &[(&str, &str)]) -> ApiResult {
        let outcome = self.client.get(self.url(path)).query(query).send();
        decode(outcome)
    }

    /// Issue a POST with a JSON payload.
    pub fn post(&self, path: &str, payload: &Value) -> ApiResult {
        let outcome = self.client.post(self.url(path)).json(payload).send();
        decode(outcome)
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

fn decode(outcome: reqwest::Result<Response>) -> ApiResult {
    let response = match outcome {
        Err(err) => {
            return ApiResult {
                error: Some(err.to_string()),
                info: info_with_code(0),
                response: Value::Null,
            }
        }
        Ok(response) => response,
    };

    let code = i64::from(response.status().as_u16());
    let mut info = info_with_code(code);
    info.insert("url".to_string(), json!(response.url().to_string()));

    let (error, body) = match response.text() {
        Err(err) => (Some(err.to_string()), Value::Null),
        Ok(text) if text.is_empty() => (None, Value::Null),
        Ok(text) => match serde_json::from_str(&text) {
            Ok(decoded) => (None, decoded),
            // Keep the raw body around so assertions can still name it.
            Err(err) => (
                Some(format!("Failed to decode response body: {}", err)),
                Value::String(text),
            ),
        },
    };

    ApiResult {
        error,
        info,
        response: body,
    }
}

fn info_with_code(code: i64) -> Map<String, Value> {
    let mut info = Map::new();
    info.insert("http_code".to_string(), json!(code));
    info
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_join_without_doubled_slashes() {
        let api = Api::new("http://localhost:8080/");
        assert_eq!(api.url("/users"), "http://localhost:8080/users");
        assert_eq!(api.url("users"), "http://localhost:8080/users");
    }
}
