use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("render worker failed: {reason}")]
    Render { reason: String },

    #[error("invalid selector \"{selector}\" for {site}: {reason}")]
    Selector {
        site: String,
        selector: String,
        reason: String,
    },
}
