//! Overridable behaviour plugged into the [`RequestBuilder`](crate::RequestBuilder).

use dialect::{pluralize, ModelName};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Type → path mapping
// ---------------------------------------------------------------------------

/// Maps a model name to the URL path segment of its collection.
///
/// The default, [`PluralizingPaths`], pluralises the name (`person` →
/// `people`). Override it when the service's entity sets are named
/// differently, e.g. for SharePoint-style `Lists/...` endpoints:
///
/// ```
/// use adapter::{AdapterConfig, RequestBuilder};
/// use dialect::ModelName;
///
/// let builder = RequestBuilder::new(AdapterConfig::default())
///     .with_path_for_type(|model: &ModelName| format!("{}Set", model));
/// let person = ModelName::new("person").unwrap();
/// assert_eq!(builder.build_url(Some(&person), None), "/personSet");
/// ```
pub trait PathForType: Send + Sync {
    /// Returns the path segment for `model`. An empty segment is omitted.
    fn path_for_type(&self, model: &ModelName) -> String;
}

/// English pluralisation of the model name.
#[derive(Debug, Clone, Copy, Default)]
pub struct PluralizingPaths;

impl PathForType for PluralizingPaths {
    fn path_for_type(&self, model: &ModelName) -> String {
        pluralize(model.as_str())
    }
}

impl<F> PathForType for F
where
    F: Fn(&ModelName) -> String + Send + Sync,
{
    fn path_for_type(&self, model: &ModelName) -> String {
        self(model)
    }
}

// ---------------------------------------------------------------------------
// Query parameter ordering
// ---------------------------------------------------------------------------

/// Reorders query parameters before they are serialised onto a URL.
///
/// Without a hook, parameters are serialised in the order the caller inserted
/// them.
pub trait QueryParamOrder: Send + Sync {
    fn order(&self, params: &Map<String, Value>) -> Map<String, Value>;
}

/// Sorts parameters alphabetically by key.
#[derive(Debug, Clone, Copy, Default)]
pub struct SortedQueryParams;

impl QueryParamOrder for SortedQueryParams {
    fn order(&self, params: &Map<String, Value>) -> Map<String, Value> {
        let mut entries: Vec<_> = params.iter().collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        entries
            .into_iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}
