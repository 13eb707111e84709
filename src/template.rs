use anyhow::{bail, Context as _, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::{fs, path::Path};

/// A landing page template as stored next to its page: the JSON
/// configuration plus the stylesheets a page may switch to via `?style=`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LandingTemplate {
    pub name: String,
    pub style: Vec<String>,
    pub configuration: Map<String, Value>,
}

/// Load `<root>/<name>.json` and list the `*.css` files beside it.
pub fn load_template(root: &Path, name: &str) -> Result<LandingTemplate> {
    if name.is_empty() || name.contains(['/', '\\']) || name == ".." {
        bail!("invalid template name: {name:?}");
    }

    let path = root.join(format!("{name}.json"));
    let configuration = match read_configuration(&path)? {
        Value::Object(map) => map,
        _ => bail!("template configuration is not an object: {}", path.display()),
    };

    Ok(LandingTemplate {
        name: name.to_string(),
        style: list_styles(root)?,
        configuration,
    })
}

/// File names of the stylesheets directly under `root`, sorted.
pub fn list_styles(root: &Path) -> Result<Vec<String>> {
    let pattern = root.join("*.css");
    let pattern = pattern.to_string_lossy();

    let mut styles = Vec::new();
    for entry in glob::glob(&pattern).with_context(|| format!("invalid glob: {pattern}"))? {
        let path = entry.with_context(|| format!("failed to read entry for {pattern}"))?;
        if let Some(name) = path.file_name() {
            styles.push(name.to_string_lossy().to_string());
        }
    }
    styles.sort();
    Ok(styles)
}

pub fn read_configuration(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration: {}", path.display()))?;
    let value = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse configuration: {}", path.display()))?;
    Ok(value)
}

/// Write `value` as JSON indented with four spaces.
pub fn write_configuration(path: &Path, value: &Value) -> Result<()> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut ser)
        .context("failed to serialize configuration")?;

    fs::write(path, buf)
        .with_context(|| format!("failed to write configuration: {}", path.display()))?;
    Ok(())
}
