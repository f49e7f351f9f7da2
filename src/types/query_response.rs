use serde::{Deserialize, Serialize};

/// The response body of the `/response` endpoint.
///
/// The wire contract is fixed: a JSON object carrying a string `result`
/// field. Anything else is a malformed response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryResponse {
    /// The reply text for the submitted query.
    pub result: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_result_field() {
        let body: QueryResponse = serde_json::from_str(r#"{"result":"Hi there!"}"#).unwrap();
        assert_eq!(body.result, "Hi there!");
    }

    #[test]
    fn missing_result_is_an_error() {
        let parsed = serde_json::from_str::<QueryResponse>(r#"{"answer":"Hi"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn non_string_result_is_an_error() {
        let parsed = serde_json::from_str::<QueryResponse>(r#"{"result":42}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn extra_fields_are_tolerated() {
        let body: QueryResponse =
            serde_json::from_str(r#"{"result":"ok","confidence":0.9}"#).unwrap();
        assert_eq!(body.result, "ok");
    }
}
