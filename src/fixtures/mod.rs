//! Fixtures
//!
//! Catalogs and message templates are kept as YAML under a base directory:
//!
//! ```text
//! fixtures/
//!   catalog/<name>.yml
//!   messages/<name>.yml
//! ```

use std::{fs, io, path::PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::{
    cars::UnknownCarSize,
    catalog::{CatalogError, ServiceCatalog},
    errors::ErrorKind,
    messaging::MessageTemplates,
};

pub mod catalog;

const DEFAULT_CATALOG: &str = include_str!("../../fixtures/catalog/default.yml");
const DEFAULT_MESSAGES: &str = include_str!("../../fixtures/messages/default.yml");

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Price table keyed by something other than `default` or a car size
    #[error(transparent)]
    UnknownCarSize(#[from] UnknownCarSize),

    /// The catalog rejected a service type
    #[error("Invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
}

impl FixtureError {
    /// Flat error kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            FixtureError::Io(_) => ErrorKind::Io,
            FixtureError::Catalog(err) => err.kind(),
            FixtureError::Yaml(_)
            | FixtureError::InvalidPrice(_)
            | FixtureError::UnknownCurrency(_)
            | FixtureError::UnknownCarSize(_) => ErrorKind::Configuration,
        }
    }
}

/// Fixture
#[derive(Debug, Clone)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,
}

impl Fixture {
    /// Create a fixture loader with the default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a fixture loader with a custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Load a service catalog from `catalog/<name>.yml`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// catalog rejects one of its service types.
    pub fn catalog(&self, name: &str) -> Result<ServiceCatalog, FixtureError> {
        let contents = self.read("catalog", name)?;

        catalog::parse(&contents)
    }

    /// Load message templates from `messages/<name>.yml`
    ///
    /// Missing templates fall back to [`MessageTemplates::default`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn messages(&self, name: &str) -> Result<MessageTemplates, FixtureError> {
        let contents = self.read("messages", name)?;

        Ok(serde_norway::from_str(&contents)?)
    }

    /// The built-in catalog of the nine standard car wash services, priced in SAR
    ///
    /// # Errors
    ///
    /// Returns an error only if the bundled catalog is malformed.
    pub fn default_catalog() -> Result<ServiceCatalog, FixtureError> {
        catalog::parse(DEFAULT_CATALOG)
    }

    /// The built-in message templates
    ///
    /// # Errors
    ///
    /// Returns an error only if the bundled templates are malformed.
    pub fn default_messages() -> Result<MessageTemplates, FixtureError> {
        Ok(serde_norway::from_str(DEFAULT_MESSAGES)?)
    }

    fn read(&self, category: &str, name: &str) -> Result<String, FixtureError> {
        let file_path = self.base_path.join(category).join(format!("{name}.yml"));

        debug!(path = %file_path.display(), "loading fixture");

        Ok(fs::read_to_string(&file_path)?)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
