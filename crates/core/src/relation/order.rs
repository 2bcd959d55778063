// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	cmp::Ordering,
	fmt::{Display, Formatter},
};

use serde::{Deserialize, Serialize};

use crate::Row;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderColumn {
	pub column: String,
	pub ascending: bool,
}

impl OrderColumn {
	pub fn asc(column: impl Into<String>) -> Self {
		Self {
			column: column.into(),
			ascending: true,
		}
	}

	pub fn desc(column: impl Into<String>) -> Self {
		Self {
			column: column.into(),
			ascending: false,
		}
	}
}

/// A physical ordering a relation's rows are delivered in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
	pub columns: Vec<OrderColumn>,
}

impl Order {
	pub fn new(columns: Vec<OrderColumn>) -> Self {
		Self {
			columns,
		}
	}

	pub fn ascending<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
		Self {
			columns: columns.into_iter().map(OrderColumn::asc).collect(),
		}
	}

	pub fn len(&self) -> usize {
		self.columns.len()
	}

	pub fn is_empty(&self) -> bool {
		self.columns.is_empty()
	}

	pub fn position(&self, column: &str) -> Option<usize> {
		self.columns.iter().position(|c| c.column == column)
	}

	/// The leading `key.len()` columns of this order are exactly the key
	/// columns, in any permutation. Rows with equal key values are then
	/// adjacent and can be located by an ordered probe.
	pub fn covers<S: AsRef<str>>(&self, key: &[S]) -> bool {
		if key.is_empty() || self.columns.len() < key.len() {
			return false;
		}
		let prefix = &self.columns[..key.len()];
		key.iter().all(|k| prefix.iter().any(|c| c.column == k.as_ref()))
	}

	pub fn column_names(&self) -> Vec<String> {
		self.columns.iter().map(|c| c.column.clone()).collect()
	}

	/// The leading `len` columns.
	pub fn prefix(&self, len: usize) -> Order {
		Order::new(self.columns.iter().take(len).cloned().collect())
	}

	/// Compares two rows the way this order sorts them.
	pub fn compare(&self, a: &Row, b: &Row) -> Ordering {
		for column in &self.columns {
			let ordering = a.value(&column.column).cmp(&b.value(&column.column));
			let ordering = if column.ascending {
				ordering
			} else {
				ordering.reverse()
			};
			if ordering != Ordering::Equal {
				return ordering;
			}
		}
		Ordering::Equal
	}
}

impl Display for Order {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		let columns: Vec<String> = self
			.columns
			.iter()
			.map(|c| {
				format!(
					"{} {}",
					c.column,
					if c.ascending {
						"asc"
					} else {
						"desc"
					}
				)
			})
			.collect();
		write!(f, "{{ {} }}", columns.join(", "))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_covers_permutation_prefix() {
		let order = Order::new(vec![OrderColumn::asc("b"), OrderColumn::desc("a"), OrderColumn::asc("c")]);
		assert!(order.covers(&["a", "b"]));
		assert!(order.covers(&["b"]));
		assert!(!order.covers(&["a"]));
		assert!(!order.covers(&["a", "c"]));
		assert!(!order.covers::<&str>(&[]));
	}

	#[test]
	fn test_display() {
		let order = Order::new(vec![OrderColumn::asc("id"), OrderColumn::desc("at")]);
		assert_eq!(order.to_string(), "{ id asc, at desc }");
	}
}
