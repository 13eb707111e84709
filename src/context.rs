use anyhow::{Context as _, Result};
use url::Url;

use crate::resolve::{default_document_name, resolve_reference};

/// The page a component runs on: its URL and the query it was loaded with.
///
/// Stands in for the ambient `window.location` so callers pass it explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
    url: Url,
}

impl PageContext {
    pub fn new(url: Url) -> Self {
        Self { url }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let url = Url::parse(raw).with_context(|| format!("invalid page URL: {raw}"))?;
        Ok(Self::new(url))
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// First value of query parameter `name`. Empty values count as absent.
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
            .filter(|v| !v.is_empty())
    }

    /// Where the configuration document lives.
    ///
    /// `conf_param` in the query wins as given; otherwise the document is
    /// named after the page (see [`default_document_name`]). `Ok(None)` when
    /// neither yields anything to fetch.
    pub fn document_reference(&self, conf_param: &str) -> Result<Option<String>> {
        if let Some(conf) = self.query_param(conf_param) {
            return Ok(Some(conf));
        }
        default_document_name(self.path())
    }

    pub fn resolve(&self, reference: &str) -> Result<Url> {
        resolve_reference(&self.url, reference)
    }
}
