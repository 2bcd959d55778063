// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// A candidate key: a column set guaranteed unique within its relation.
///
/// A sparse key only guarantees uniqueness among rows that have a value for
/// every one of its columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key {
	pub columns: Vec<String>,
	pub is_sparse: bool,
}

impl Key {
	pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
		Self {
			columns: columns.into_iter().map(Into::into).collect(),
			is_sparse: false,
		}
	}

	pub fn sparse<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
		Self {
			columns: columns.into_iter().map(Into::into).collect(),
			is_sparse: true,
		}
	}

	pub fn len(&self) -> usize {
		self.columns.len()
	}

	pub fn is_empty(&self) -> bool {
		self.columns.is_empty()
	}

	pub fn contains(&self, column: &str) -> bool {
		self.columns.iter().any(|c| c == column)
	}

	/// Every column of this key appears in `columns`.
	pub fn is_subset_of<S: AsRef<str>>(&self, columns: &[S]) -> bool {
		self.columns.iter().all(|c| columns.iter().any(|o| o.as_ref() == c))
	}

	/// Both keys name the same columns, in any order.
	pub fn same_columns(&self, other: &Key) -> bool {
		self.columns.len() == other.columns.len() && self.is_subset_of(&other.columns)
	}
}

impl Display for Key {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{{ {} }}", self.columns.join(", "))?;
		if self.is_sparse {
			f.write_str(" sparse")?;
		}
		Ok(())
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keys(Vec<Key>);

impl Keys {
	pub fn new() -> Self {
		Self(Vec::new())
	}

	pub fn push(&mut self, key: Key) {
		self.0.push(key);
	}

	pub fn iter(&self) -> std::slice::Iter<'_, Key> {
		self.0.iter()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn first(&self) -> Option<&Key> {
		self.0.first()
	}

	/// A column list is unique when it covers at least one candidate key.
	pub fn is_unique<S: AsRef<str>>(&self, columns: &[S]) -> bool {
		self.0.iter().any(|key| key.is_subset_of(columns))
	}

	/// Candidate keys that are a proper superset of `columns`.
	pub fn proper_supersets_of<'a, S: AsRef<str>>(&'a self, columns: &'a [S]) -> impl Iterator<Item = &'a Key> {
		self.0.iter().filter(move |key| {
			key.columns.len() > columns.len()
				&& columns.iter().all(|c| key.contains(c.as_ref()))
		})
	}

	/// Keys with the same column sets, regardless of order and sparseness.
	pub fn same_key_columns(&self, other: &Keys) -> bool {
		self.len() == other.len() && self.0.iter().all(|key| other.iter().any(|o| o.same_columns(key)))
	}
}

impl From<Vec<Key>> for Keys {
	fn from(keys: Vec<Key>) -> Self {
		Self(keys)
	}
}

impl IntoIterator for Keys {
	type Item = Key;
	type IntoIter = std::vec::IntoIter<Key>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}

impl<'a> IntoIterator for &'a Keys {
	type Item = &'a Key;
	type IntoIter = std::slice::Iter<'a, Key>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_is_unique_requires_superset() {
		let keys = Keys::from(vec![Key::new(["id"]), Key::new(["a", "b"])]);
		assert!(keys.is_unique(&["id"]));
		assert!(keys.is_unique(&["x", "id"]));
		assert!(keys.is_unique(&["b", "a"]));
		assert!(!keys.is_unique(&["a"]));
		assert!(!keys.is_unique::<&str>(&[]));
	}

	#[test]
	fn test_empty_key_makes_everything_unique() {
		let keys = Keys::from(vec![Key::new(Vec::<String>::new())]);
		assert!(keys.is_unique::<&str>(&[]));
		assert!(keys.is_unique(&["anything"]));
	}

	#[test]
	fn test_proper_supersets() {
		let keys = Keys::from(vec![Key::new(["order_id", "line"]), Key::new(["order_id"])]);
		let found: Vec<_> = keys.proper_supersets_of(&["order_id"]).collect();
		assert_eq!(found.len(), 1);
		assert_eq!(found[0].columns, vec!["order_id", "line"]);
	}

	#[test]
	fn test_display() {
		assert_eq!(Key::new(["a", "b"]).to_string(), "{ a, b }");
		assert_eq!(Key::sparse(["c"]).to_string(), "{ c } sparse");
	}
}
