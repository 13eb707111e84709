// src/dom/memory.rs

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{collections::BTreeMap, fs, path::Path};

use super::{as_target, Document, OptionList, PropertyTarget, SelectOption};

/// A page document held entirely in memory, keyed by element id.
///
/// Serializes as `{ "elements": { "<id>": { ...properties, "options": [...] } } }`
/// so a snapshot can be loaded from disk, mutated, and dumped again.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryDocument {
	#[serde(default)]
	pub elements: BTreeMap<String, MemoryElement>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryElement {
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub options: Vec<SelectOption>,

	#[serde(flatten)]
	pub properties: Map<String, Value>,
}

impl MemoryDocument {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
		let path = path.as_ref();
		let text = fs::read_to_string(path)
			.with_context(|| format!("failed to read document snapshot: {}", path.display()))?;
		let doc: Self = serde_json::from_str(&text)
			.with_context(|| format!("failed to parse document snapshot: {}", path.display()))?;
		Ok(doc)
	}

	/// Adds (or replaces) an element with the given initial properties.
	pub fn insert(&mut self, id: impl Into<String>, properties: Value) -> &mut MemoryElement {
		let properties = match properties {
			Value::Object(map) => map,
			_ => Map::new(),
		};
		let slot = self.elements.entry(id.into()).or_default();
		*slot = MemoryElement {
			options: Vec::new(),
			properties,
		};
		slot
	}

	pub fn element(&self, id: &str) -> Option<&MemoryElement> {
		self.elements.get(id)
	}

	pub fn property(&self, id: &str, key: &str) -> Option<&Value> {
		self.elements.get(id)?.properties.get(key)
	}
}

impl PropertyTarget for MemoryElement {
	fn nested_mut(&mut self, key: &str) -> Option<&mut dyn PropertyTarget> {
		self.properties.get_mut(key).and_then(as_target)
	}

	fn set_property(&mut self, key: &str, value: Value) {
		self.properties.insert(key.to_string(), value);
	}
}

impl OptionList for MemoryElement {
	fn append_option(&mut self, option: SelectOption) {
		self.options.push(option);
	}

	fn options(&self) -> &[SelectOption] {
		&self.options
	}
}

impl Document for MemoryDocument {
	fn element_mut(&mut self, id: &str) -> Option<&mut dyn PropertyTarget> {
		self.elements
			.get_mut(id)
			.map(|el| el as &mut dyn PropertyTarget)
	}

	fn option_list_mut(&mut self, id: &str) -> Option<&mut dyn OptionList> {
		self.elements.get_mut(id).map(|el| el as &mut dyn OptionList)
	}
}
