//! Resource URL construction.

use std::sync::Arc;

use dialect::{HttpVerb, ModelName, RecordId, RequestType};
use serde_json::{Map, Value};

use crate::encoding::{encode_component, encode_uri, query_text};
use crate::hooks::{PathForType, PluralizingPaths, QueryParamOrder};
use crate::options::{RequestInit, RequestOptions};
use crate::AdapterConfig;

/// Computes URLs and transport options from an [`AdapterConfig`].
///
/// Cheap to clone; hooks are shared.
#[derive(Clone)]
pub struct RequestBuilder {
    config: AdapterConfig,
    paths: Arc<dyn PathForType>,
    param_order: Option<Arc<dyn QueryParamOrder>>,
}

impl std::fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("config", &self.config)
            .field("param_order", &self.param_order.is_some())
            .finish_non_exhaustive()
    }
}

impl RequestBuilder {
    /// Creates a builder with pluralised paths and caller-ordered query params.
    pub fn new(config: AdapterConfig) -> Self {
        Self {
            config,
            paths: Arc::new(PluralizingPaths),
            param_order: None,
        }
    }

    /// Replaces the type → path mapping.
    pub fn with_path_for_type(mut self, paths: impl PathForType + 'static) -> Self {
        self.paths = Arc::new(paths);
        self
    }

    /// Installs a hook that reorders [`query`](Self::query) parameters.
    pub fn with_query_param_order(mut self, order: impl QueryParamOrder + 'static) -> Self {
        self.param_order = Some(Arc::new(order));
        self
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// Mutable access for changing configuration between requests.
    pub fn config_mut(&mut self) -> &mut AdapterConfig {
        &mut self.config
    }

    /// Builds the URL of a collection (`id` absent) or of one record.
    ///
    /// - Numeric identifiers, `0` included, are appended in parentheses with
    ///   no separating slash: `/people(1)`.
    /// - Any other identifier is percent-encoded into its own segment, so
    ///   `../place/1` yields `/people/..%2Fplace%2F1`.
    /// - An empty identifier counts as absent.
    /// - Without a configured host the URL always starts with `/`.
    /// - Configured query fragments follow, joined with `&`, introduced with
    ///   `?` unless the URL already has one.
    pub fn build_url(&self, model: Option<&ModelName>, id: Option<&RecordId>) -> String {
        let id = id.filter(|id| !id.is_empty());
        let mut segments = Vec::new();

        if let Some(model) = model {
            let path = self.paths.path_for_type(model);
            if !path.is_empty() {
                segments.push(path);
            }
        }

        if let Some(id) = id.filter(|id| !id.is_numeric()) {
            segments.push(encode_component(&id.as_text()));
        }

        let prefix = self.config.url_prefix();
        if !prefix.is_empty() {
            segments.insert(0, prefix);
        }

        let mut url = segments.join("/");
        if self.config.host().is_none() && !url.is_empty() && !url.starts_with('/') {
            url.insert(0, '/');
        }

        if let Some(id) = id.filter(|id| id.is_numeric()) {
            url.push_str(&format!("({})", id.as_text()));
        }

        let fragments = &self.config.query_string_params;
        if !fragments.is_empty() {
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(&fragments.join("&"));
        }

        tracing::debug!(%url, model = ?model.map(ModelName::as_str), "built resource URL");
        url
    }

    /// Builds the URL used for a given store operation.
    ///
    /// Operations on one existing record (`findRecord`, `findBelongsTo`,
    /// `updateRecord`, `deleteRecord`) address it by `id`; every other
    /// operation addresses the collection and ignores `id`.
    pub fn url_for(
        &self,
        request_type: RequestType,
        model: &ModelName,
        id: Option<&RecordId>,
    ) -> String {
        let id = match request_type {
            RequestType::FindRecord
            | RequestType::FindBelongsTo
            | RequestType::UpdateRecord
            | RequestType::DeleteRecord => id,
            _ => None,
        };
        self.build_url(Some(model), id)
    }

    /// Builds the `GET` request for a query against `model`'s collection.
    ///
    /// Each parameter becomes `key=value` with the value URI-encoded. The
    /// tokens are concatenated with no separator between them and appended
    /// as one fragment after `?` (or `&` if the URL already has a query
    /// string). The request carries no body.
    pub fn query(&self, model: &ModelName, params: &Map<String, Value>) -> RequestOptions {
        let mut url = self.url_for(RequestType::Query, model, None);

        let ordered;
        let params = match &self.param_order {
            Some(order) => {
                ordered = order.order(params);
                &ordered
            }
            None => params,
        };

        if !params.is_empty() {
            let joined: String = params
                .iter()
                .map(|(key, value)| format!("{key}={}", encode_uri(&query_text(value))))
                .collect();
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(&joined);
        }

        self.build_request_options(url, HttpVerb::Get, RequestInit::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SortedQueryParams;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn model(name: &str) -> ModelName {
        ModelName::new(name).unwrap()
    }

    fn builder() -> RequestBuilder {
        RequestBuilder::new(AdapterConfig::default())
    }

    #[test]
    fn numeric_ids_are_parenthesised() {
        let b = builder();
        assert_eq!(b.build_url(Some(&model("person")), Some(&RecordId::Number(1))), "/people(1)");
        assert_eq!(b.build_url(Some(&model("place")), Some(&RecordId::Number(1))), "/places(1)");
        assert_eq!(b.build_url(Some(&model("place")), Some(&"17".into())), "/places(17)");
    }

    #[test]
    fn zero_is_a_numeric_id() {
        let b = builder();
        assert_eq!(b.build_url(Some(&model("person")), Some(&RecordId::Number(0))), "/people(0)");
        assert_eq!(b.build_url(Some(&model("person")), Some(&"0".into())), "/people(0)");
    }

    #[test]
    fn text_ids_are_encoded_as_one_segment() {
        let b = builder();
        assert_eq!(
            b.build_url(Some(&model("person")), Some(&"../place/1".into())),
            "/people/..%2Fplace%2F1"
        );
        assert_eq!(
            b.build_url(Some(&model("person")), Some(&"john doe".into())),
            "/people/john%20doe"
        );
    }

    #[test]
    fn absent_and_empty_ids_address_the_collection() {
        let b = builder();
        assert_eq!(b.build_url(Some(&model("person")), None), "/people");
        assert_eq!(b.build_url(Some(&model("person")), Some(&"".into())), "/people");
        assert_eq!(b.build_url(None, None), "");
    }

    #[test]
    fn query_fragments_are_appended_in_order() {
        let b = RequestBuilder::new(AdapterConfig {
            query_string_params: vec![
                "$select=Id,Modified,Title,StatusValue,ProblemDescription,AssignedTo/Id,Requester/Id"
                    .into(),
                "$expand=AssignedTo,Requester".into(),
            ],
            ..AdapterConfig::default()
        });
        assert_eq!(
            b.build_url(Some(&model("person")), Some(&RecordId::Number(1))),
            "/people(1)?$select=Id,Modified,Title,StatusValue,ProblemDescription,AssignedTo/Id,Requester/Id&$expand=AssignedTo,Requester"
        );
    }

    #[test]
    fn fragments_join_an_existing_query_string_with_ampersand() {
        let b = RequestBuilder::new(AdapterConfig {
            query_string_params: vec!["$top=5".into()],
            ..AdapterConfig::default()
        })
        .with_path_for_type(|m: &ModelName| format!("items?list={m}"));
        assert_eq!(b.build_url(Some(&model("task")), None), "/items?list=task&$top=5");
    }

    #[test]
    fn host_and_namespace_prefix_the_path() {
        let b = RequestBuilder::new(AdapterConfig {
            host: Some("https://example.com".into()),
            namespace: Some("_api".into()),
            ..AdapterConfig::default()
        });
        assert_eq!(
            b.build_url(Some(&model("person")), Some(&RecordId::Number(3))),
            "https://example.com/_api/people(3)"
        );

        let relative = RequestBuilder::new(AdapterConfig {
            namespace: Some("_api".into()),
            ..AdapterConfig::default()
        });
        assert_eq!(relative.build_url(Some(&model("person")), None), "/_api/people");
    }

    #[test]
    fn url_for_ignores_ids_on_collection_operations() {
        let b = builder();
        let person = model("person");
        let id = RecordId::Number(4);
        assert_eq!(b.url_for(RequestType::FindRecord, &person, Some(&id)), "/people(4)");
        assert_eq!(b.url_for(RequestType::UpdateRecord, &person, Some(&id)), "/people(4)");
        assert_eq!(b.url_for(RequestType::DeleteRecord, &person, Some(&id)), "/people(4)");
        assert_eq!(b.url_for(RequestType::CreateRecord, &person, Some(&id)), "/people");
        assert_eq!(b.url_for(RequestType::FindAll, &person, Some(&id)), "/people");
    }

    #[test]
    fn query_concatenates_params_without_separator() {
        let b = builder();
        let params = json!({ "$filter": "Title eq 'a b'", "$top": 10 });
        let request = b.query(&model("post"), params.as_object().unwrap());
        assert_eq!(request.url, "/posts?$filter=Title%20eq%20'a%20b'$top=10");
        assert_eq!(request.verb, HttpVerb::Get);
        assert_eq!(request.payload, None);
    }

    #[test]
    fn query_params_follow_configured_fragments() {
        let b = RequestBuilder::new(AdapterConfig {
            query_string_params: vec!["$select=Id".into()],
            ..AdapterConfig::default()
        });
        let params = json!({ "$top": 1 });
        let request = b.query(&model("post"), params.as_object().unwrap());
        assert_eq!(request.url, "/posts?$select=Id&$top=1");
    }

    #[test]
    fn empty_query_leaves_url_alone() {
        let request = builder().query(&model("post"), &Map::new());
        assert_eq!(request.url, "/posts");
    }

    #[test]
    fn ordering_hook_reorders_params() {
        let b = builder().with_query_param_order(SortedQueryParams);
        let params = json!({ "b": "2", "a": "1" });
        let request = b.query(&model("post"), params.as_object().unwrap());
        assert_eq!(request.url, "/posts?a=1b=2");
    }
}
