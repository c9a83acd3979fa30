// Status classification.
//
// Pure functions mapping an HTTP status code and decoded body onto exactly
// one outcome: the payload for 2xx, one typed error variant for everything
// else. No retries and no state -- retry policy lives in the client.

use serde_json::Value;

use crate::error::{Error, JsonMap};

/// Decode a response body into a JSON object.
///
/// Empty bodies decode to an empty object. Bodies that are not valid JSON
/// (or not a JSON object) are wrapped as `{"message": <raw text>}` rather
/// than failing the call -- decode errors are not request failures.
pub fn decode_body(text: &str) -> JsonMap {
    if text.is_empty() {
        return JsonMap::new();
    }

    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => map,
        _ => {
            let mut map = JsonMap::new();
            map.insert("message".into(), Value::String(text.to_owned()));
            map
        }
    }
}

/// Classify a received HTTP response into an outcome.
///
/// First match wins:
///
/// | status    | outcome                  |
/// |-----------|--------------------------|
/// | 200, 201  | success, payload = body  |
/// | 400       | [`Error::Validation`]    |
/// | 401       | [`Error::Authentication`]|
/// | 403       | [`Error::Permission`]    |
/// | 404       | [`Error::NotFound`]      |
/// | 429       | [`Error::RateLimit`]     |
/// | any other | [`Error::Api`]           |
///
/// 429 is surfaced, not absorbed: rate limiting is the caller's problem.
pub fn classify(status: u16, body: JsonMap) -> Result<JsonMap, Error> {
    match status {
        200 | 201 => Ok(body),
        400 => Err(Error::Validation {
            message: body_message(&body, "validation error"),
            status,
            body,
        }),
        401 => Err(Error::Authentication {
            message: body_message(&body, "authentication failed - invalid token"),
            status: Some(status),
            body: Some(body),
        }),
        403 => Err(Error::Permission {
            message: body_message(&body, "permission denied"),
            status,
            body,
        }),
        404 => Err(Error::NotFound {
            message: body_message(&body, "resource not found"),
            status,
            body,
        }),
        429 => Err(Error::RateLimit {
            message: body_message(&body, "rate limit exceeded"),
            status,
            body,
        }),
        other => Err(Error::Api {
            message: body_message(&body, &format!("API error: {other}")),
            status: other,
            body,
        }),
    }
}

/// Pull the controller's `message` field out of a body, or fall back.
fn body_message(body: &JsonMap, fallback: &str) -> String {
    body.get("message")
        .and_then(Value::as_str)
        .map_or_else(|| fallback.to_owned(), ToOwned::to_owned)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn object(value: Value) -> JsonMap {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn success_statuses_return_payload() {
        let body = object(json!({"data": [{"id": "u1"}]}));
        let out = classify(200, body.clone()).expect("200 should be success");
        assert_eq!(out, body);

        let out = classify(201, body.clone()).expect("201 should be success");
        assert_eq!(out, body);
    }

    #[test]
    fn each_status_maps_to_exactly_one_kind() {
        let cases = [
            (400, "validation"),
            (401, "authentication"),
            (403, "permission"),
            (404, "not_found"),
            (429, "rate_limit"),
            (500, "api_error"),
            (502, "api_error"),
            (503, "api_error"),
        ];

        for (status, kind) in cases {
            let err = classify(status, JsonMap::new()).expect_err("non-2xx must be an error");
            assert_eq!(err.kind(), kind, "status {status}");
            assert_eq!(err.status(), Some(status), "status {status}");
        }
    }

    #[test]
    fn error_carries_controller_message_and_body() {
        let body = object(json!({"message": "door not found", "code": "NOT_FOUND"}));
        let err = classify(404, body.clone()).expect_err("404 is an error");

        assert!(err.to_string().contains("door not found"));
        assert_eq!(err.body(), Some(&body));
    }

    #[test]
    fn decode_wraps_non_json_bodies() {
        let body = decode_body("<html>502 Bad Gateway</html>");
        assert_eq!(
            body.get("message").and_then(Value::as_str),
            Some("<html>502 Bad Gateway</html>")
        );
    }

    #[test]
    fn decode_wraps_non_object_json() {
        let body = decode_body("[1, 2, 3]");
        assert_eq!(body.get("message").and_then(Value::as_str), Some("[1, 2, 3]"));
    }

    #[test]
    fn decode_empty_body_is_empty_object() {
        assert!(decode_body("").is_empty());
    }

    #[test]
    fn decode_passes_objects_through() {
        let body = decode_body(r#"{"data": {"id": "d1"}}"#);
        assert_eq!(body.get("data"), Some(&json!({"id": "d1"})));
    }
}
