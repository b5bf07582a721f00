//! Transport options for one request.
//!
//! [`RequestBuilder::build_request_options`] turns a URL, a verb and the
//! caller's [`RequestInit`] into [`RequestOptions`]: the complete description
//! of what the transport should send. The rules, in order:
//!
//! 1. `url`, `verb` and `data_type = "json"` are always set.
//! 2. A present payload on a non-`GET` request is serialised to JSON text and
//!    gets `content_type = "application/json; charset=utf-8"`. `GET` payloads
//!    are passed through untouched.
//! 3. `PUT` becomes `POST`, and `X-HTTP-Method: MERGE` plus `If-Match: *` are
//!    added after the configured headers.
//! 4. If the resulting header set is non-empty, a [`PreSend`] hook carrying it
//!    is attached.

use dialect::{wire, HeaderSet, HttpVerb};
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::RequestBuilder;

/// `dataType` of every request: responses are always JSON.
pub const DATA_TYPE_JSON: &str = "json";

/// Content type of serialised request bodies.
pub const CONTENT_TYPE_JSON: &str = "application/json; charset=utf-8";

/// Header carrying the real verb of a tunnelled update.
pub const HEADER_X_HTTP_METHOD: &str = "X-HTTP-Method";

/// Concurrency header; `*` applies the update regardless of the stored ETag.
pub const HEADER_IF_MATCH: &str = "If-Match";

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Options supplied by the caller for a single request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestInit {
    /// Request payload, as a JSON value.
    pub data: Option<Value>,
}

impl RequestInit {
    /// Options carrying `data` as the payload.
    pub fn with_data(data: Value) -> Self {
        Self { data: Some(data) }
    }
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// The request payload as handed to the transport.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    /// Left as a JSON value; the transport encodes it (e.g. as query params).
    Raw(Value),
    /// Already serialised to JSON text.
    Serialized(String),
}

/// Receives headers from a [`PreSend`] hook just before dispatch.
///
/// Implemented by the host's transport handle.
pub trait HeaderSink {
    fn set_request_header(&mut self, name: &str, value: &str);
}

/// Sets the request's headers on the transport handle.
#[derive(Debug, Clone, PartialEq)]
pub struct PreSend {
    headers: HeaderSet,
}

impl PreSend {
    /// The headers this hook sets, in the order it sets them.
    pub fn headers(&self) -> &HeaderSet {
        &self.headers
    }

    /// Sets every header, in order, on `handle`.
    pub fn apply(&self, handle: &mut dyn HeaderSink) {
        for (name, value) in self.headers.iter() {
            handle.set_request_header(name, value);
        }
    }
}

impl Serialize for PreSend {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.headers.serialize(serializer)
    }
}

/// Everything a transport needs to perform one request.
///
/// Built once by [`RequestBuilder::build_request_options`] and consumed once
/// by [`Transport::ajax`](crate::Transport::ajax).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOptions {
    pub url: String,

    /// Verb to send with. Never [`HttpVerb::Put`].
    #[serde(rename = "type")]
    pub verb: HttpVerb,

    pub data_type: &'static str,

    #[serde(rename = "data", skip_serializing_if = "Option::is_none")]
    pub payload: Option<Payload>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<&'static str>,

    #[serde(rename = "headers", skip_serializing_if = "Option::is_none")]
    pub pre_send: Option<PreSend>,
}

impl RequestOptions {
    /// Runs the pre-send hook against `handle`, if one is attached.
    pub fn before_send(&self, handle: &mut dyn HeaderSink) {
        if let Some(hook) = &self.pre_send {
            hook.apply(handle);
        }
    }
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl RequestBuilder {
    /// Shapes the transport options for a request to `url`.
    ///
    /// Never fails; see the [module documentation](self) for the rules.
    pub fn build_request_options(
        &self,
        url: impl Into<String>,
        verb: HttpVerb,
        init: RequestInit,
    ) -> RequestOptions {
        let mut verb = verb;
        let mut payload = None;
        let mut content_type = None;

        if let Some(data) = init.data {
            if verb != HttpVerb::Get && wire::is_present(&data) {
                content_type = Some(CONTENT_TYPE_JSON);
                payload = Some(Payload::Serialized(data.to_string()));
            } else {
                payload = Some(Payload::Raw(data));
            }
        }

        let mut headers = self.config().headers.clone();
        if verb == HttpVerb::Put {
            verb = HttpVerb::Post;
            headers.insert(HEADER_X_HTTP_METHOD, "MERGE");
            headers.insert(HEADER_IF_MATCH, "*");
        }

        let pre_send = (!headers.is_empty()).then_some(PreSend { headers });

        RequestOptions {
            url: url.into(),
            verb,
            data_type: DATA_TYPE_JSON,
            payload,
            content_type,
            pre_send,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AdapterConfig;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[derive(Default)]
    struct RecordingHandle(Vec<(String, String)>);

    impl HeaderSink for RecordingHandle {
        fn set_request_header(&mut self, name: &str, value: &str) {
            self.0.push((name.to_string(), value.to_string()));
        }
    }

    fn builder_with_headers(headers: &[(&str, &str)]) -> RequestBuilder {
        RequestBuilder::new(AdapterConfig {
            headers: headers.iter().copied().collect(),
            ..AdapterConfig::default()
        })
    }

    fn sent_headers(options: &RequestOptions) -> Vec<(String, String)> {
        let mut handle = RecordingHandle::default();
        options.before_send(&mut handle);
        handle.0
    }

    fn pairs(expected: &[(&str, &str)]) -> Vec<(String, String)> {
        expected
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn put_is_sent_as_post() {
        let builder = builder_with_headers(&[]);
        let put = builder.build_request_options("example.com", HttpVerb::Put, RequestInit::default());
        assert_eq!(put.verb, HttpVerb::Post);

        let get = builder.build_request_options("example.com", HttpVerb::Get, RequestInit::default());
        assert_eq!(get.verb, HttpVerb::Get);
    }

    #[test]
    fn configured_headers_are_set_in_order() {
        let builder = builder_with_headers(&[
            ("Content-Type", "application/json"),
            ("Other-key", "Other Value"),
        ]);
        let options = builder.build_request_options("example.com", HttpVerb::Get, RequestInit::default());
        assert_eq!(
            sent_headers(&options),
            pairs(&[("Content-Type", "application/json"), ("Other-key", "Other Value")])
        );
    }

    #[test]
    fn put_injects_merge_headers() {
        let builder = builder_with_headers(&[]);
        let options = builder.build_request_options("example.com", HttpVerb::Put, RequestInit::default());
        assert_eq!(
            sent_headers(&options),
            pairs(&[("X-HTTP-Method", "MERGE"), ("If-Match", "*")])
        );
    }

    #[test]
    fn put_headers_follow_configured_headers() {
        let builder = builder_with_headers(&[("Content-Type", "application/json")]);
        let options = builder.build_request_options("example.com", HttpVerb::Put, RequestInit::default());
        assert_eq!(
            sent_headers(&options),
            pairs(&[
                ("Content-Type", "application/json"),
                ("X-HTTP-Method", "MERGE"),
                ("If-Match", "*"),
            ])
        );
    }

    #[test]
    fn put_does_not_leak_headers_into_configuration() {
        let builder = builder_with_headers(&[("Accept", "application/json")]);
        builder.build_request_options("example.com", HttpVerb::Put, RequestInit::default());
        let later = builder.build_request_options("example.com", HttpVerb::Get, RequestInit::default());
        assert_eq!(sent_headers(&later), pairs(&[("Accept", "application/json")]));
    }

    #[test]
    fn get_payload_is_not_serialised() {
        let builder = builder_with_headers(&[]);
        let options = builder.build_request_options(
            "example.com",
            HttpVerb::Get,
            RequestInit::with_data(json!({ "key": "value" })),
        );
        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            json!({
                "url": "example.com",
                "type": "GET",
                "dataType": "json",
                "data": { "key": "value" }
            })
        );
    }

    #[test]
    fn non_get_payload_is_serialised() {
        let builder = builder_with_headers(&[]);
        let options = builder.build_request_options(
            "example.com",
            HttpVerb::Post,
            RequestInit::with_data(json!({ "key": "value" })),
        );
        assert_eq!(
            options.payload,
            Some(Payload::Serialized(r#"{"key":"value"}"#.to_string()))
        );
        assert_eq!(options.content_type, Some(CONTENT_TYPE_JSON));
        assert!(options.pre_send.is_none());
    }

    #[test]
    fn missing_payload_sets_no_content_type() {
        let builder = builder_with_headers(&[]);
        let options = builder.build_request_options("example.com", HttpVerb::Post, RequestInit::default());
        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            json!({ "url": "example.com", "type": "POST", "dataType": "json" })
        );
    }

    #[test]
    fn null_payload_is_left_raw() {
        let builder = builder_with_headers(&[]);
        let options = builder.build_request_options(
            "example.com",
            HttpVerb::Post,
            RequestInit::with_data(Value::Null),
        );
        assert_eq!(options.payload, Some(Payload::Raw(Value::Null)));
        assert_eq!(options.content_type, None);
    }
}
