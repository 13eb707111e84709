// src/dom/mod.rs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

pub mod memory;

pub use memory::{MemoryDocument, MemoryElement};

/// Something properties can be written into by name.
///
/// `nested_mut` only yields a target when the property already exists and
/// holds an object-like value; that is what drives merge recursion.
pub trait PropertyTarget {
	fn nested_mut(&mut self, key: &str) -> Option<&mut dyn PropertyTarget>;

	fn set_property(&mut self, key: &str, value: Value);
}

/// A dropdown-like element that accepts appended options.
pub trait OptionList {
	fn append_option(&mut self, option: SelectOption);

	fn options(&self) -> &[SelectOption];
}

/// Page document access by element id.
pub trait Document {
	fn element_mut(&mut self, id: &str) -> Option<&mut dyn PropertyTarget>;

	fn option_list_mut(&mut self, id: &str) -> Option<&mut dyn OptionList>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
	pub label: String,
	pub value: String,
}

impl SelectOption {
	pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
		Self {
			label: label.into(),
			value: value.into(),
		}
	}
}

/// View an existing property value as a nested target, if it is object-like.
pub fn as_target(value: &mut Value) -> Option<&mut dyn PropertyTarget> {
	match value {
		Value::Object(map) => Some(map),
		Value::Array(items) => Some(items),
		_ => None,
	}
}

impl PropertyTarget for Map<String, Value> {
	fn nested_mut(&mut self, key: &str) -> Option<&mut dyn PropertyTarget> {
		self.get_mut(key).and_then(as_target)
	}

	fn set_property(&mut self, key: &str, value: Value) {
		self.insert(key.to_string(), value);
	}
}

impl PropertyTarget for Vec<Value> {
	fn nested_mut(&mut self, key: &str) -> Option<&mut dyn PropertyTarget> {
		let idx = key.parse::<usize>().ok()?;
		self.get_mut(idx).and_then(as_target)
	}

	fn set_property(&mut self, key: &str, value: Value) {
		match key.parse::<usize>() {
			Ok(idx) if idx < self.len() => self[idx] = value,
			Ok(idx) if idx == self.len() => self.push(value),
			_ => debug!(key, len = self.len(), "ignoring non-contiguous array property"),
		}
	}
}
