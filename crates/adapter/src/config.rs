//! Adapter configuration.
//!
//! [`AdapterConfig`] is an explicit value handed to the
//! [`RequestBuilder`](crate::RequestBuilder) at construction. Callers may
//! change it between requests through
//! [`RequestBuilder::config_mut`](crate::RequestBuilder::config_mut); nothing
//! in this crate reads configuration from ambient state.
//!
//! ## File format
//!
//! ```toml
//! host = "https://intranet.example.com"
//! namespace = "_api/web"
//! query_string_params = ["$select=Id,Title", "$expand=Author"]
//!
//! [headers]
//! Accept = "application/json;odata=verbose"
//! ```

use std::path::{Path, PathBuf};

use dialect::HeaderSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised while loading or validating an [`AdapterConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read configuration from '{}'", .path.display())]
    Read {
        /// Path that was attempted.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration text is not valid TOML or does not match the schema.
    #[error("Malformed configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A configured header name is not a valid HTTP token.
    #[error("Invalid header name: '{name}'")]
    InvalidHeader {
        /// The rejected header name.
        name: String,
    },
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Process-wide settings shared by every request an adapter builds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdapterConfig {
    /// Network host, e.g. `https://intranet.example.com`.
    ///
    /// When absent (or `/`), URLs are host-relative and always start with `/`.
    pub host: Option<String>,

    /// Path segment placed between the host and the entity path, e.g. `api/v2`.
    pub namespace: Option<String>,

    /// Headers sent with every request, in order.
    pub headers: HeaderSet,

    /// Literal query-string fragments appended to every URL, in order.
    ///
    /// Fragments are used verbatim: no encoding, no de-duplication.
    pub query_string_params: Vec<String>,
}

impl AdapterConfig {
    /// Parses and validates a TOML configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown fields and
    /// [`ConfigError::InvalidHeader`] for a header name that is not a token.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: AdapterConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read, otherwise as
    /// [`AdapterConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded adapter configuration");
        Ok(config)
    }

    /// Checks that every header name is a valid HTTP token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidHeader`] naming the first offending header.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.headers.iter().find(|(name, _)| !is_token(name)) {
            Some((name, _)) => Err(ConfigError::InvalidHeader {
                name: name.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// The configured network host, treating an empty host or `/` as none.
    pub fn host(&self) -> Option<&str> {
        self.host
            .as_deref()
            .filter(|host| !host.is_empty() && *host != "/")
    }

    /// The leading URL segment: host and namespace joined with `/`.
    ///
    /// Empty when neither is configured.
    pub fn url_prefix(&self) -> String {
        let namespace = self.namespace.as_deref().filter(|ns| !ns.is_empty());
        [self.host(), namespace]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// HTTP token characters (RFC 9110 §5.6.2).
fn is_token(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b))
}
