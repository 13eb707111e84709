use anyhow::{Context as _, Result};
use regex::Regex;
use url::Url;

/// Trailing file extension as a browser script would match it (`/\.\w+$/`).
const EXTENSION_PATTERN: &str = r"\.[A-Za-z0-9_]+$";

/// Name of the configuration document that belongs to a page.
///
/// Takes the last path segment and swaps its extension for `.json`
/// (`/lp/promo.html` -> `promo.json`). A segment without an extension is
/// left as is (`/lp/promo` -> `promo`). A path ending in `/` has no page
/// name, so `None`.
pub fn default_document_name(page_path: &str) -> Result<Option<String>> {
    let last = page_path.rsplit('/').next().unwrap_or_default();
    if last.is_empty() {
        return Ok(None);
    }

    let re = Regex::new(EXTENSION_PATTERN)
        .with_context(|| format!("invalid extension pattern: {EXTENSION_PATTERN}"))?;

    Ok(Some(re.replace(last, ".json").into_owned()))
}

/// Resolve `reference` the way a page-relative `fetch()` would.
///
/// Absolute URLs pass through; anything else is joined onto the page URL.
pub fn resolve_reference(page: &Url, reference: &str) -> Result<Url> {
    page.join(reference)
        .with_context(|| format!("cannot resolve {reference:?} against {page}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swaps_extension_of_last_segment() {
        assert_eq!(
            default_document_name("/lp/promo.html").unwrap().as_deref(),
            Some("promo.json")
        );
        assert_eq!(
            default_document_name("/a.b/index.v2.htm").unwrap().as_deref(),
            Some("index.v2.json")
        );
    }

    #[test]
    fn extensionless_name_is_kept_unchanged() {
        assert_eq!(
            default_document_name("/lp/promo").unwrap().as_deref(),
            Some("promo")
        );
        assert_eq!(
            default_document_name("/lp/v1.2-final").unwrap().as_deref(),
            Some("v1.2-final")
        );
    }

    #[test]
    fn directory_paths_have_no_document() {
        assert_eq!(default_document_name("/lp/").unwrap(), None);
        assert_eq!(default_document_name("/").unwrap(), None);
        assert_eq!(default_document_name("").unwrap(), None);
    }

    #[test]
    fn relative_references_resolve_next_to_the_page() {
        let page = Url::parse("https://lnk.example/lp/promo.html?x=1").unwrap();

        assert_eq!(
            resolve_reference(&page, "promo.json").unwrap().as_str(),
            "https://lnk.example/lp/promo.json"
        );
        assert_eq!(
            resolve_reference(&page, "/configs/a.json").unwrap().as_str(),
            "https://lnk.example/configs/a.json"
        );
        assert_eq!(
            resolve_reference(&page, "https://cdn.example/b.json")
                .unwrap()
                .as_str(),
            "https://cdn.example/b.json"
        );
    }
}
