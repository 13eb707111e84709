//! Config Applier: pull a page's JSON configuration and write it onto the
//! page's elements, then follow an optional `auto` redirect.
//!
//! Failures while locating or fetching the document are logged and end the
//! run; they never surface as an error to the caller.

use anyhow::{anyhow, Result};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::{
    config::ApplierSettings,
    context::PageContext,
    dom::Document,
    fetch::Fetcher,
    merge::{apply_properties, value_kind},
    navigate::{DispatchedRedirect, Navigator, Redirect},
};

#[derive(Debug)]
pub enum ApplyOutcome {
    Applied(ApplyReport),
    /// The document could not be located, fetched, or parsed.
    Failed { reason: String },
}

impl ApplyOutcome {
    pub fn report(&self) -> Option<&ApplyReport> {
        match self {
            ApplyOutcome::Applied(report) => Some(report),
            ApplyOutcome::Failed { .. } => None,
        }
    }

    pub fn into_report(self) -> Option<ApplyReport> {
        match self {
            ApplyOutcome::Applied(report) => Some(report),
            ApplyOutcome::Failed { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ApplyOutcome::Failed { .. })
    }
}

#[derive(Debug)]
pub struct ApplyReport {
    pub document_url: Url,
    pub style_override: Option<String>,
    /// Element ids that received their property tree, in document order.
    pub applied: Vec<String>,
    /// Document keys with no matching element.
    pub skipped: Vec<String>,
    pub redirect: Option<DispatchedRedirect>,
}

/// Apply the page's configuration document to `dom`.
///
/// # Panics
///
/// A delayed `auto` redirect is scheduled with `tokio::spawn`, so the
/// returned future must be polled inside a tokio runtime.
pub async fn apply_page_config<D, F>(
    page: &PageContext,
    settings: &ApplierSettings,
    dom: &mut D,
    fetcher: &F,
    navigator: Arc<dyn Navigator>,
) -> ApplyOutcome
where
    D: Document + ?Sized,
    F: Fetcher + ?Sized,
{
    let style_override = apply_style_override(page, settings, dom);

    let document_url = match locate_document(page, settings) {
        Ok(url) => url,
        Err(err) => return fail(err),
    };

    let config = match fetcher.fetch_json(&document_url).await {
        Ok(config) => config,
        Err(err) => {
            return fail(anyhow!(err).context(format!("failed to load config {document_url}")))
        }
    };

    let config = match config {
        Value::Object(map) => map,
        other => {
            return fail(anyhow!(
                "config {document_url} is a JSON {}, expected an object",
                value_kind(&other)
            ))
        }
    };

    let (applied, skipped) = apply_document(dom, &config);
    info!(
        document = %document_url,
        applied = applied.len(),
        skipped = skipped.len(),
        "page config applied"
    );

    let redirect = config
        .get(&settings.auto_key)
        .and_then(Redirect::from_auto)
        .map(|redirect| redirect.dispatch(navigator));

    ApplyOutcome::Applied(ApplyReport {
        document_url,
        style_override,
        applied,
        skipped,
        redirect,
    })
}

/// Merge every element-keyed entry onto its element, in document order.
///
/// Returns the ids that were applied and the ones with no element.
pub fn apply_document<D>(dom: &mut D, config: &Map<String, Value>) -> (Vec<String>, Vec<String>)
where
    D: Document + ?Sized,
{
    let mut applied = Vec::new();
    let mut skipped = Vec::new();

    for (element_id, properties) in config {
        match dom.element_mut(element_id) {
            Some(element) => {
                apply_properties(element, properties);
                applied.push(element_id.clone());
            }
            None => {
                debug!(element_id = %element_id, "no element for config entry");
                skipped.push(element_id.clone());
            }
        }
    }

    (applied, skipped)
}

fn apply_style_override<D>(
    page: &PageContext,
    settings: &ApplierSettings,
    dom: &mut D,
) -> Option<String>
where
    D: Document + ?Sized,
{
    let href = page.query_param(&settings.style_param)?;

    match dom.element_mut(&settings.style_element_id) {
        Some(link) => {
            debug!(href = %href, "stylesheet overridden");
            link.set_property("href", Value::String(href.clone()));
            Some(href)
        }
        None => {
            warn!(
                element_id = %settings.style_element_id,
                "style override requested but stylesheet element is missing"
            );
            None
        }
    }
}

fn locate_document(page: &PageContext, settings: &ApplierSettings) -> Result<Url> {
    let reference = page
        .document_reference(&settings.conf_param)?
        .ok_or_else(|| anyhow!("page {} names no config document", page.url()))?;
    page.resolve(&reference)
}

fn fail(err: anyhow::Error) -> ApplyOutcome {
    let reason = format!("{err:#}");
    error!(error = %reason, "Failed to load config");
    ApplyOutcome::Failed { reason }
}
