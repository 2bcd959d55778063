// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use indexmap::IndexSet;

/// Ordered, unique column names shared by every row of a relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowHeader {
	columns: IndexSet<String>,
}

impl RowHeader {
	pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
		Self {
			columns: columns.into_iter().map(Into::into).collect(),
		}
	}

	pub fn len(&self) -> usize {
		self.columns.len()
	}

	pub fn is_empty(&self) -> bool {
		self.columns.is_empty()
	}

	pub fn index_of(&self, column: &str) -> Option<usize> {
		self.columns.get_index_of(column)
	}

	pub fn contains(&self, column: &str) -> bool {
		self.columns.contains(column)
	}

	pub fn name(&self, index: usize) -> Option<&str> {
		self.columns.get_index(index).map(String::as_str)
	}

	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.columns.iter().map(String::as_str)
	}
}
