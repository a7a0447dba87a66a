//! The seam between the extraction core and the browser-automation engine.

use async_trait::async_trait;
use pricescope_core::AppConfig;

use crate::error::ScraperError;

/// Which network resource classes the rendering engine refuses to download
/// while loading a results page.
///
/// Fonts are blocked by default. Image downloads stay enabled: the `src`
/// attribute read during extraction is present either way, but some sites
/// only populate it after their image scripts run. Each class is an
/// independent env-configurable flag.
#[derive(Debug, Clone)]
pub struct ResourceBlockPolicy {
    pub block_fonts: bool,
    pub block_images: bool,
    pub block_stylesheets: bool,
}

impl Default for ResourceBlockPolicy {
    fn default() -> Self {
        Self {
            block_fonts: true,
            block_images: false,
            block_stylesheets: false,
        }
    }
}

impl ResourceBlockPolicy {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            block_fonts: config.block_fonts,
            block_images: config.block_images,
            block_stylesheets: config.block_stylesheets,
        }
    }

    #[must_use]
    pub(crate) fn blocks_anything(&self) -> bool {
        self.block_fonts || self.block_images || self.block_stylesheets
    }
}

/// A fully rendered results page, detached from the rendering context that
/// produced it.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// Rendered document markup.
    pub html: String,
    /// Final page URL after redirects; base for resolving relative links.
    pub url: String,
}

/// Narrow interface over the browser-automation engine.
///
/// `fetch` must open an isolated rendering context per call, apply `policy`,
/// wait for navigation to settle under its timeout, and release the context
/// on every exit path. Keeping the seam this small lets the rest of the
/// pipeline run against canned documents in tests.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Navigates to `url` and returns the rendered document.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Fetch`] on launch, navigation, or timeout
    /// failure.
    async fn fetch(
        &self,
        url: &str,
        policy: &ResourceBlockPolicy,
    ) -> Result<RenderedPage, ScraperError>;
}
