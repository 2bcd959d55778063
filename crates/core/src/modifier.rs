// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Declarative string settings attached to an expression, kept in the order
/// they were written so re-emission reproduces them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Modifiers(IndexMap<String, String>);

impl Modifiers {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.set(key, value);
		self
	}

	pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.0.insert(key.into(), value.into());
	}

	pub fn get(&self, key: &str) -> Option<&str> {
		self.0.get(key).map(String::as_str)
	}

	pub fn contains(&self, key: &str) -> bool {
		self.0.contains_key(key)
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Modifiers {
	fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
		Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
	}
}

impl Display for Modifiers {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str("with { ")?;
		for (idx, (key, value)) in self.iter().enumerate() {
			if idx > 0 {
				f.write_str(", ")?;
			}
			write!(f, "{} = \"{}\"", key, value)?;
		}
		f.write_str(" }")
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_keeps_insertion_order() {
		let modifiers = Modifiers::new().with("PropagateInsertLeft", "Ignore").with("IsLookup", "true");
		let keys: Vec<&str> = modifiers.iter().map(|(k, _)| k).collect();
		assert_eq!(keys, vec!["PropagateInsertLeft", "IsLookup"]);
		assert_eq!(modifiers.to_string(), "with { PropagateInsertLeft = \"Ignore\", IsLookup = \"true\" }");
	}

	#[test]
	fn test_overwrite_keeps_position() {
		let mut modifiers = Modifiers::new().with("a", "1").with("b", "2");
		modifiers.set("a", "3");
		assert_eq!(modifiers.get("a"), Some("3"));
		assert_eq!(modifiers.iter().next(), Some(("a", "3")));
	}

	#[test]
	fn test_json_is_a_plain_object() {
		let modifiers = Modifiers::new().with("AnyOf", "a,b");
		assert_eq!(serde_json::to_string(&modifiers).unwrap(), r#"{"AnyOf":"a,b"}"#);
	}
}
