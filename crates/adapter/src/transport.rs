//! The transport port.
//!
//! This crate never performs HTTP. The host implements [`Transport`] over
//! whatever client it uses; [`OdataAdapter`](crate::OdataAdapter) hands it
//! finished [`RequestOptions`] and receives the decoded JSON body back.
//! Timeouts, cancellation and retries are the implementation's business.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::RequestOptions;

/// Failures reported by a [`Transport`] implementation.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The service answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as text.
        body: String,
    },

    /// The request could not be delivered or the response not received.
    #[error("Network error: {message}")]
    Network { message: String },

    /// The response body was not valid JSON.
    #[error("Response body could not be decoded: {message}")]
    Decode { message: String },
}

/// Executes requests built by the [`RequestBuilder`](crate::RequestBuilder).
///
/// Implementations must call [`RequestOptions::before_send`] with their
/// request handle so the configured and injected headers reach the wire.
/// An empty response body (e.g. `204 No Content`) is returned as
/// [`Value::Null`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn ajax(&self, options: RequestOptions) -> Result<Value, TransportError>;
}
