use std::collections::HashSet;
use std::path::Path;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// RFC 3986 unreserved marks stay as-is; everything else in the query is
/// percent-encoded before substitution into the URL template.
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Static descriptor of one source site: where to search and which CSS
/// selectors carve product title, price, and image out of the results page.
///
/// Title, price, and image elements are paired positionally (index *i* of
/// each selector's match list belongs to product *i*), so a site's markup
/// must emit those nodes in matching per-product order. That makes each
/// profile brittle against site redesigns; selectors live in
/// `config/sites.yaml` so they can be fixed without a rebuild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteProfile {
    /// Display name; unique within the registry.
    pub name: String,
    /// Search URL with a trailing query-append point, e.g.
    /// `https://example.com/search?q=`.
    pub url_template: String,
    pub title_selector: String,
    pub price_selector: String,
    pub image_selector: String,
    pub logo_url: String,
}

impl SiteProfile {
    /// Builds the search URL for `query` by percent-encoding it and
    /// appending it to the URL template.
    #[must_use]
    pub fn search_url(&self, query: &str) -> String {
        let encoded = utf8_percent_encode(query, QUERY_ENCODE_SET);
        format!("{}{encoded}", self.url_template)
    }
}

#[derive(Debug, Deserialize)]
struct SitesFile {
    sites: Vec<SiteProfile>,
}

/// Immutable, ordered collection of [`SiteProfile`] entries.
///
/// Iteration order is the YAML file order and never changes after load; the
/// aggregator's price-sort breaks ties by this order, so it must be stable.
#[derive(Debug, Clone)]
pub struct ProfileRegistry {
    profiles: Vec<SiteProfile>,
}

impl ProfileRegistry {
    /// Builds a registry from an in-memory profile list, preserving order.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the list is empty, a name or
    /// selector field is blank, or two profiles share a name.
    pub fn new(profiles: Vec<SiteProfile>) -> Result<Self, ConfigError> {
        validate_profiles(&profiles)?;
        Ok(Self { profiles })
    }

    /// Loads and validates the site registry from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read, parsed, or fails
    /// validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SitesFileIo {
            path: path.display().to_string(),
            source: e,
        })?;
        let file: SitesFile = serde_yaml::from_str(&content)?;
        Self::new(file.sites)
    }

    #[must_use]
    pub fn profiles(&self) -> &[SiteProfile] {
        &self.profiles
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

fn validate_profiles(profiles: &[SiteProfile]) -> Result<(), ConfigError> {
    if profiles.is_empty() {
        return Err(ConfigError::Validation(
            "site registry must contain at least one profile".to_string(),
        ));
    }

    let mut seen_names = HashSet::new();
    for profile in profiles {
        if profile.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "site name must be non-empty".to_string(),
            ));
        }

        if !seen_names.insert(profile.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate site name: '{}'",
                profile.name
            )));
        }

        if profile.url_template.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "site '{}' has an empty url_template",
                profile.name
            )));
        }

        for (field, value) in [
            ("title_selector", &profile.title_selector),
            ("price_selector", &profile.price_selector),
            ("image_selector", &profile.image_selector),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "site '{}' has an empty {field}",
                    profile.name
                )));
            }
        }
    }

    Ok(())
}
