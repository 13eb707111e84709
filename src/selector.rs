//! Environment Selector Builder: fill the API selector dropdown from
//! `env-config.json`.
//!
//! Nothing here is caught locally; every failure is returned to the caller.

use anyhow::{anyhow, bail, Context as _, Result};
use minijinja::Environment;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};
use url::Url;

use crate::{
    coerce::display_string,
    config::SelectorSettings,
    dom::{Document, SelectOption},
    fetch::Fetcher,
    merge::value_kind,
    resolve::resolve_reference,
};

/// One entry of the environment config, kept as fetched.
///
/// Fields are read loosely: a number renders as its digits and a missing
/// field as `undefined`, so one odd entry never hides the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiEnvironment {
    raw: Value,
}

impl ApiEnvironment {
    pub fn new(raw: Value) -> Self {
        Self { raw }
    }

    pub fn api_id(&self) -> String {
        display_string(self.raw.get("apiId"))
    }

    pub fn region(&self) -> String {
        display_string(self.raw.get("region"))
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

/// Environment name -> API metadata, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentMap {
    entries: Vec<(String, ApiEnvironment)>,
}

impl EnvironmentMap {
    pub fn from_json(value: Value) -> Result<Self> {
        let map = match value {
            Value::Object(map) => map,
            other => {
                return Err(anyhow!(
                    "environment config is a JSON {}, expected an object",
                    value_kind(&other)
                ))
            }
        };

        let entries = map
            .into_iter()
            .map(|(name, raw)| (name, ApiEnvironment::new(raw)))
            .collect();
        Ok(Self { entries })
    }

    pub fn get(&self, name: &str) -> Option<&ApiEnvironment> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, env)| env)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ApiEnvironment)> {
        self.entries.iter().map(|(n, env)| (n.as_str(), env))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Renders endpoint URLs from the configured template.
pub struct EndpointRenderer<'s> {
    env: Environment<'s>,
}

impl<'s> EndpointRenderer<'s> {
    pub fn new(template: &'s str) -> Result<Self> {
        let mut env = Environment::new();
        env.add_template("endpoint", template)
            .with_context(|| format!("invalid endpoint template: {template}"))?;
        Ok(Self { env })
    }

    /// A `null` entry has no fields to read and is an error.
    pub fn render(&self, name: &str, api: &ApiEnvironment) -> Result<String> {
        if api.raw.is_null() {
            bail!("environment entry {name:?} is null");
        }
        let tpl = self.env.get_template("endpoint")?;
        let ctx = json!({
            "name": name,
            "api_id": api.api_id(),
            "region": api.region(),
        });
        let url = tpl
            .render(minijinja::value::Value::from_serialize(&ctx))
            .with_context(|| format!("failed to render endpoint for {name:?}"))?;
        Ok(url)
    }
}

/// Populate the selector with the local option plus one option per environment.
///
/// Returns the fetched environments for further use.
pub async fn init_configuration<D, F>(
    page_url: &Url,
    settings: &SelectorSettings,
    dom: &mut D,
    fetcher: &F,
) -> Result<EnvironmentMap>
where
    D: Document + ?Sized,
    F: Fetcher + ?Sized,
{
    let config_url = resolve_reference(page_url, &settings.env_config_path)?;
    let raw = fetcher
        .fetch_json(&config_url)
        .await
        .with_context(|| format!("failed to load environment config {config_url}"))?;
    let environments = EnvironmentMap::from_json(raw)?;
    let renderer = EndpointRenderer::new(&settings.endpoint_template)?;

    let selector = dom
        .option_list_mut(&settings.element_id)
        .ok_or_else(|| anyhow!("selector element #{} not found", settings.element_id))?;

    selector.append_option(SelectOption::new(
        settings.local_label.clone(),
        settings.local_url.clone(),
    ));

    for (name, api) in environments.iter() {
        let url = renderer.render(name, api)?;
        debug!(env = name, url = %url, "environment option");
        selector.append_option(SelectOption::new(name, url));
    }

    info!(
        source = %config_url,
        environments = environments.len(),
        "api selector populated"
    );
    Ok(environments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dom::MemoryDocument, fetch::FetchError};
    use async_trait::async_trait;

    struct OneDoc(Option<Value>);

    #[async_trait]
    impl Fetcher for OneDoc {
        async fn fetch_json(&self, url: &Url) -> Result<Value, FetchError> {
            assert_eq!(url.as_str(), "https://admin.example/ui/env-config.json");
            self.0.clone().ok_or_else(|| FetchError::UnsupportedUrl {
                url: url.to_string(),
                reason: "network down".to_string(),
            })
        }
    }

    fn page() -> Url {
        Url::parse("https://admin.example/ui/index.html").unwrap()
    }

    fn dom_with_selector() -> MemoryDocument {
        let mut dom = MemoryDocument::new();
        dom.insert("apiSelector", json!({}));
        dom
    }

    fn options(dom: &MemoryDocument) -> Vec<(String, String)> {
        dom.element("apiSelector")
            .unwrap()
            .options
            .iter()
            .map(|o| (o.label.clone(), o.value.clone()))
            .collect()
    }

    #[tokio::test]
    async fn builds_localhost_then_one_option_per_environment() {
        let fetcher = OneDoc(Some(json!({
            "prod": { "apiId": "abc123", "region": "us-east-1" },
            "dev": { "apiId": "zz9", "region": "eu-west-1" }
        })));
        let mut dom = dom_with_selector();

        let envs = init_configuration(&page(), &SelectorSettings::default(), &mut dom, &fetcher)
            .await
            .unwrap();

        assert_eq!(
            options(&dom),
            vec![
                ("localhost".to_string(), "http://localhost:8080".to_string()),
                (
                    "prod".to_string(),
                    "https://abc123.execute-api.us-east-1.amazonaws.com".to_string()
                ),
                (
                    "dev".to_string(),
                    "https://zz9.execute-api.eu-west-1.amazonaws.com".to_string()
                ),
            ]
        );
        assert_eq!(envs.len(), 2);
        assert_eq!(envs.get("prod").unwrap().api_id(), "abc123");
    }

    #[tokio::test]
    async fn empty_map_still_offers_localhost() {
        let mut dom = dom_with_selector();

        let envs = init_configuration(
            &page(),
            &SelectorSettings::default(),
            &mut dom,
            &OneDoc(Some(json!({}))),
        )
        .await
        .unwrap();

        assert!(envs.is_empty());
        assert_eq!(
            options(&dom),
            vec![("localhost".to_string(), "http://localhost:8080".to_string())]
        );
    }

    #[tokio::test]
    async fn fetch_failure_propagates_and_leaves_selector_alone() {
        let mut dom = dom_with_selector();

        let err = init_configuration(&page(), &SelectorSettings::default(), &mut dom, &OneDoc(None))
            .await
            .unwrap_err();

        assert!(err.downcast_ref::<FetchError>().is_some(), "{err:#}");
        assert!(options(&dom).is_empty());
    }

    #[tokio::test]
    async fn missing_selector_is_an_error() {
        let mut dom = MemoryDocument::new();

        let result = init_configuration(
            &page(),
            &SelectorSettings::default(),
            &mut dom,
            &OneDoc(Some(json!({}))),
        )
        .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn loose_entries_render_in_their_string_form() {
        let fetcher = OneDoc(Some(json!({
            "num": { "apiId": 123, "region": "us-east-1" },
            "partial": { "apiId": "abc" }
        })));
        let mut dom = dom_with_selector();

        let envs = init_configuration(&page(), &SelectorSettings::default(), &mut dom, &fetcher)
            .await
            .unwrap();

        assert_eq!(
            &options(&dom)[1..],
            &[
                (
                    "num".to_string(),
                    "https://123.execute-api.us-east-1.amazonaws.com".to_string()
                ),
                (
                    "partial".to_string(),
                    "https://abc.execute-api.undefined.amazonaws.com".to_string()
                ),
            ]
        );
        assert_eq!(envs.get("num").unwrap().api_id(), "123");
        assert_eq!(envs.get("partial").unwrap().region(), "undefined");
    }

    #[tokio::test]
    async fn null_entry_fails_after_earlier_options() {
        let fetcher = OneDoc(Some(json!({
            "prod": { "apiId": "abc123", "region": "us-east-1" },
            "broken": null,
            "dev": { "apiId": "zz9", "region": "eu-west-1" }
        })));
        let mut dom = dom_with_selector();

        let err = init_configuration(&page(), &SelectorSettings::default(), &mut dom, &fetcher)
            .await
            .unwrap_err();

        assert!(format!("{err:#}").contains("broken"));
        let labels: Vec<_> = options(&dom).into_iter().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!["localhost", "prod"]);
    }

    #[test]
    fn custom_template_sees_name() {
        let r =
            EndpointRenderer::new("https://{{ name }}.{{ region }}.example/{{ api_id }}").unwrap();
        let api = ApiEnvironment::new(json!({ "apiId": "a1", "region": "ap-south-1" }));

        let url = r.render("stage", &api).unwrap();

        assert_eq!(url, "https://stage.ap-south-1.example/a1");
    }
}
