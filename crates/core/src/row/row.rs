// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Display, Formatter},
	sync::Arc,
};

use relate_type::Value;

use super::RowHeader;

/// A tuple shaped by a `RowHeader`. Columns without a value hold
/// `Value::Undefined`.
#[derive(Debug, Clone)]
pub struct Row {
	header: Arc<RowHeader>,
	values: Vec<Value>,
}

impl Row {
	/// A row with every column absent.
	pub fn new(header: Arc<RowHeader>) -> Self {
		let values = vec![Value::Undefined; header.len()];
		Self {
			header,
			values,
		}
	}

	pub fn from_values(header: Arc<RowHeader>, mut values: Vec<Value>) -> Self {
		debug_assert!(values.len() <= header.len(), "more values than columns");
		values.resize(header.len(), Value::Undefined);
		Self {
			header,
			values,
		}
	}

	pub fn header(&self) -> &Arc<RowHeader> {
		&self.header
	}

	pub fn values(&self) -> &[Value] {
		&self.values
	}

	pub fn into_values(self) -> Vec<Value> {
		self.values
	}

	/// `None` when the header has no such column.
	pub fn get(&self, column: &str) -> Option<&Value> {
		self.header.index_of(column).map(|idx| &self.values[idx])
	}

	/// The column's value, `Undefined` when absent or unknown.
	pub fn value(&self, column: &str) -> Value {
		self.get(column).cloned().unwrap_or(Value::Undefined)
	}

	pub fn has_value(&self, column: &str) -> bool {
		self.get(column).is_some_and(Value::is_defined)
	}

	/// Returns whether the stored value changed; false as well when the
	/// header has no such column.
	pub fn set(&mut self, column: &str, value: Value) -> bool {
		match self.header.index_of(column) {
			Some(idx) if self.values[idx] != value => {
				self.values[idx] = value;
				true
			}
			_ => false,
		}
	}

	pub fn clear(&mut self, column: &str) -> bool {
		self.set(column, Value::Undefined)
	}

	pub fn values_of<S: AsRef<str>>(&self, columns: &[S]) -> Vec<Value> {
		columns.iter().map(|c| self.value(c.as_ref())).collect()
	}

	/// Every column of `columns` has a value.
	pub fn has_values<S: AsRef<str>>(&self, columns: &[S]) -> bool {
		columns.iter().all(|c| self.has_value(c.as_ref()))
	}

	/// A new row shaped by `header`, taking values for the columns both
	/// headers share.
	pub fn project(&self, header: &Arc<RowHeader>) -> Row {
		let mut row = Row::new(header.clone());
		self.copy_to(&mut row);
		row
	}

	/// Copies every column `target` shares with this row. Returns whether any
	/// value of `target` changed.
	pub fn copy_to(&self, target: &mut Row) -> bool {
		let mut changed = false;
		for idx in 0..target.header.len() {
			let Some(name) = target.header.name(idx) else {
				continue;
			};
			if let Some(value) = self.get(name) {
				if target.values[idx] != *value {
					target.values[idx] = value.clone();
					changed = true;
				}
			}
		}
		changed
	}

	/// Compares the values of `columns` in this row against `other_columns`
	/// in `other`, position by position, with join semantics.
	pub fn matches<S: AsRef<str>, T: AsRef<str>>(&self, columns: &[S], other: &Row, other_columns: &[T]) -> bool {
		columns.len() == other_columns.len()
			&& columns
				.iter()
				.zip(other_columns.iter())
				.all(|(c, o)| self.value(c.as_ref()).matches(&other.value(o.as_ref())))
	}
}

impl PartialEq for Row {
	fn eq(&self, other: &Self) -> bool {
		self.header.len() == other.header.len()
			&& self.header.names().zip(other.header.names()).all(|(l, r)| l == r)
			&& self.values == other.values
	}
}

impl Display for Row {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str("{ ")?;
		for (idx, (name, value)) in self.header.names().zip(self.values.iter()).enumerate() {
			if idx > 0 {
				f.write_str(", ")?;
			}
			write!(f, "{}: {}", name, value)?;
		}
		f.write_str(" }")
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn header(columns: &[&str]) -> Arc<RowHeader> {
		Arc::new(RowHeader::new(columns.iter().copied()))
	}

	#[test]
	fn test_new_row_is_absent() {
		let row = Row::new(header(&["a", "b"]));
		assert!(!row.has_value("a"));
		assert_eq!(row.get("b"), Some(&Value::Undefined));
		assert_eq!(row.get("c"), None);
	}

	#[test]
	fn test_set_and_clear() {
		let mut row = Row::new(header(&["a"]));
		assert!(row.set("a", Value::int4(1)));
		assert!(!row.set("a", Value::int4(1)));
		assert!(!row.set("missing", Value::int4(1)));
		assert!(row.has_value("a"));
		row.clear("a");
		assert!(!row.has_value("a"));
	}

	#[test]
	fn test_project_and_copy() {
		let full = Row::from_values(header(&["id", "name", "note"]), vec![Value::int8(1), Value::utf8("x")]);
		let mut part = full.project(&header(&["note", "id"]));
		assert_eq!(part.values(), &[Value::Undefined, Value::int8(1)]);

		assert!(!full.copy_to(&mut part));
		part.set("id", Value::int8(2));
		assert!(full.copy_to(&mut part));
		assert_eq!(part.value("id"), Value::int8(1));
	}

	#[test]
	fn test_matches_with_join_semantics() {
		let left = Row::from_values(header(&["a", "b"]), vec![Value::int4(1), Value::Undefined]);
		let right = Row::from_values(header(&["x", "y"]), vec![Value::int8(1), Value::Undefined]);
		assert!(left.matches(&["a"], &right, &["x"]));
		assert!(!left.matches(&["a", "b"], &right, &["x", "y"]));
	}

	#[test]
	fn test_display() {
		let row = Row::from_values(header(&["id", "name"]), vec![Value::int4(1), Value::utf8("a")]);
		assert_eq!(row.to_string(), "{ id: 1, name: \"a\" }");
	}
}
