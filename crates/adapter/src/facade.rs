//! One method per store operation.

use dialect::{HttpVerb, ModelName, RecordId, RequestType};
use serde_json::{Map, Value};
use tracing::instrument;

use crate::options::RequestInit;
use crate::{RequestBuilder, Transport, TransportError};

/// Pairs a [`RequestBuilder`] with a [`Transport`].
///
/// Each method builds the URL and options for its operation, hands them to
/// the transport and returns the raw response payload, still wrapped in the
/// dialect's envelope. Normalising that payload is the serializer's job.
#[derive(Debug)]
pub struct OdataAdapter<T> {
    builder: RequestBuilder,
    transport: T,
}

impl<T: Transport> OdataAdapter<T> {
    pub fn new(builder: RequestBuilder, transport: T) -> Self {
        Self { builder, transport }
    }

    pub fn builder(&self) -> &RequestBuilder {
        &self.builder
    }

    pub fn builder_mut(&mut self) -> &mut RequestBuilder {
        &mut self.builder
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// `GET` one record.
    #[instrument(skip_all, fields(model = %model, id = %id))]
    pub async fn find_record(&self, model: &ModelName, id: &RecordId) -> Result<Value, TransportError> {
        let url = self.builder.url_for(RequestType::FindRecord, model, Some(id));
        self.send(url, HttpVerb::Get, RequestInit::default()).await
    }

    /// `GET` every record of `model`.
    #[instrument(skip_all, fields(model = %model))]
    pub async fn find_all(&self, model: &ModelName) -> Result<Value, TransportError> {
        let url = self.builder.url_for(RequestType::FindAll, model, None);
        self.send(url, HttpVerb::Get, RequestInit::default()).await
    }

    /// `GET` the records matching `params`; see [`RequestBuilder::query`].
    #[instrument(skip_all, fields(model = %model))]
    pub async fn query(
        &self,
        model: &ModelName,
        params: &Map<String, Value>,
    ) -> Result<Value, TransportError> {
        let options = self.builder.query(model, params);
        tracing::debug!(url = %options.url, "dispatching query");
        self.transport.ajax(options).await
    }

    /// `POST` a new record; `data` is the already-serialised record.
    #[instrument(skip_all, fields(model = %model))]
    pub async fn create_record(&self, model: &ModelName, data: Value) -> Result<Value, TransportError> {
        let url = self.builder.url_for(RequestType::CreateRecord, model, None);
        self.send(url, HttpVerb::Post, RequestInit::with_data(data)).await
    }

    /// Update a record. Sent as `POST` with `X-HTTP-Method: MERGE`.
    #[instrument(skip_all, fields(model = %model, id = %id))]
    pub async fn update_record(
        &self,
        model: &ModelName,
        id: &RecordId,
        data: Value,
    ) -> Result<Value, TransportError> {
        let url = self.builder.url_for(RequestType::UpdateRecord, model, Some(id));
        self.send(url, HttpVerb::Put, RequestInit::with_data(data)).await
    }

    /// `DELETE` a record.
    #[instrument(skip_all, fields(model = %model, id = %id))]
    pub async fn delete_record(&self, model: &ModelName, id: &RecordId) -> Result<Value, TransportError> {
        let url = self.builder.url_for(RequestType::DeleteRecord, model, Some(id));
        self.send(url, HttpVerb::Delete, RequestInit::default()).await
    }

    async fn send(
        &self,
        url: String,
        verb: HttpVerb,
        init: RequestInit,
    ) -> Result<Value, TransportError> {
        let options = self.builder.build_request_options(url, verb, init);
        tracing::debug!(url = %options.url, verb = %options.verb, "dispatching request");
        self.transport.ajax(options).await
    }
}
