// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{cmp::Ordering, collections::HashMap, sync::Arc};

use parking_lot::RwLock;
use relate_core::{Cursor, Order, RelationDef, Row, RowHeader, RowsCursor, TableNode, Value};
use relate_type::{Result, error::diagnostic::table, return_error};
use tracing::trace;

/// A mutation or notification a [`MemoryTable`] received.
#[derive(Debug, Clone, PartialEq)]
pub enum TableEvent {
	Insert(Row),
	Update {
		old: Row,
		new: Row,
	},
	Delete(Row),
	Change(String),
}

/// A base relation held in memory. Rows stay sorted by the relation's
/// first order; candidate keys and nilability are enforced on write.
pub struct MemoryTable {
	definition: RelationDef,
	header: Arc<RowHeader>,
	rows: RwLock<Vec<Row>>,
	defaults: HashMap<String, Value>,
	events: RwLock<Vec<TableEvent>>,
}

impl MemoryTable {
	pub fn new(definition: RelationDef) -> Self {
		let header = definition.header();
		Self {
			definition,
			header,
			rows: RwLock::new(vec![]),
			defaults: HashMap::new(),
			events: RwLock::new(vec![]),
		}
	}

	/// Loads rows without recording events. Values are given in column
	/// order.
	pub fn with_rows(self, rows: impl IntoIterator<Item = Vec<Value>>) -> Result<Self> {
		for values in rows {
			let row = Row::from_values(self.header.clone(), values);
			self.write(None, row)?;
		}
		Ok(self)
	}

	/// A value `default` fills into an absent column.
	pub fn with_default(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
		self.defaults.insert(column.into(), value.into());
		self
	}

	pub fn row(&self, values: Vec<Value>) -> Row {
		Row::from_values(self.header.clone(), values)
	}

	pub fn rows(&self) -> Vec<Row> {
		self.rows.read().clone()
	}

	pub fn len(&self) -> usize {
		self.rows.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn events(&self) -> Vec<TableEvent> {
		self.events.read().clone()
	}

	pub fn clear_events(&self) {
		self.events.write().clear();
	}

	fn record(&self, event: TableEvent) {
		self.events.write().push(event);
	}

	/// Position of the stored row `row` stands for: found by its first
	/// fully valued candidate key, or by all values when it has none.
	fn position(&self, rows: &[Row], row: &Row) -> Option<usize> {
		let key = self.definition.keys.iter().find(|key| row.has_values(&key.columns));
		match key {
			Some(key) => rows.iter().position(|r| same_values(r, row, &key.columns)),
			None => rows.iter().position(|r| r == row),
		}
	}

	fn check(&self, rows: &[Row], row: &Row, skip: Option<usize>) -> Result<()> {
		for column in &self.definition.columns {
			if !column.nilable && !row.has_value(&column.name) {
				return_error!(table::column_not_nilable(&self.definition.name, &column.name));
			}
			let actual = row.value(&column.name).get_type();
			if !actual.is_undefined() && actual != column.ty && !(actual.is_number() && column.ty.is_number()) {
				return_error!(table::column_type_mismatch(
					&self.definition.name,
					&column.name,
					&column.ty.to_string(),
					&actual.to_string()
				));
			}
		}
		for key in self.definition.keys.iter() {
			// sparse keys only hold among rows that have all their values
			if key.is_sparse && !row.has_values(&key.columns) {
				continue;
			}
			let duplicate = rows
				.iter()
				.enumerate()
				.any(|(i, other)| Some(i) != skip && same_values(other, row, &key.columns));
			if duplicate {
				return_error!(table::duplicate_key(&self.definition.name, &key.columns));
			}
		}
		Ok(())
	}

	/// Replaces the row at `at`, or adds `row` when `at` is `None`.
	fn write(&self, at: Option<usize>, row: Row) -> Result<()> {
		let mut rows = self.rows.write();
		self.check(&rows, &row, at)?;
		match at {
			Some(index) => rows[index] = row,
			None => rows.push(row),
		}
		if let Some(order) = self.definition.orders.first() {
			rows.sort_by(|a, b| order.compare(a, b));
		}
		Ok(())
	}

	/// Whether the stored rows are sorted by `order`.
	fn sorted_by(&self, order: &Order) -> bool {
		self.definition
			.orders
			.first()
			.is_some_and(|first| first.columns.len() >= order.len() && first.columns[..order.len()] == order.columns[..])
	}
}

fn same_values(a: &Row, b: &Row, columns: &[String]) -> bool {
	columns.iter().all(|c| a.value(c) == b.value(c) || a.value(c).compare(&b.value(c)) == Some(Ordering::Equal))
}

/// Compares the leading `order` columns of `row` with `values`.
fn compare_prefix(order: &Order, row: &Row, values: &[Value]) -> Ordering {
	for (column, value) in order.columns.iter().zip(values) {
		let ordering = row.value(&column.column).cmp(value);
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

impl TableNode for MemoryTable {
	fn definition(&self) -> &RelationDef {
		&self.definition
	}

	fn header(&self) -> Arc<RowHeader> {
		self.header.clone()
	}

	fn open(&self) -> Result<Box<dyn Cursor>> {
		Ok(Box::new(RowsCursor::new(self.rows())))
	}

	fn search(&self, order: &Order, values: &[Value]) -> Result<Box<dyn Cursor>> {
		if values.iter().any(Value::is_undefined) {
			return Ok(Box::new(RowsCursor::new(vec![])));
		}
		let rows = self.rows.read();
		if self.sorted_by(order) {
			let lower = rows.partition_point(|r| compare_prefix(order, r, values) == Ordering::Less);
			let upper = rows.partition_point(|r| compare_prefix(order, r, values) != Ordering::Greater);
			trace!(relation = %self.definition.name, rows = upper - lower, "ordered search");
			let found: Vec<Row> = rows[lower..upper]
				.iter()
				.filter(|r| order.columns.iter().zip(values).all(|(c, v)| r.value(&c.column).matches(v)))
				.cloned()
				.collect();
			return Ok(Box::new(RowsCursor::new(found)));
		}

		let mut found: Vec<Row> = rows
			.iter()
			.filter(|r| order.columns.iter().zip(values).all(|(c, v)| r.value(&c.column).matches(v)))
			.cloned()
			.collect();
		found.sort_by(|a, b| order.compare(a, b));
		Ok(Box::new(RowsCursor::new(found)))
	}

	fn insert(&self, row: &Row) -> Result<()> {
		let row = row.project(&self.header);
		self.write(None, row.clone())?;
		self.record(TableEvent::Insert(row));
		Ok(())
	}

	fn update(&self, old: &Row, new: &Row) -> Result<()> {
		let old = old.project(&self.header);
		let new = new.project(&self.header);
		let Some(at) = self.position(&self.rows.read(), &old) else {
			return_error!(table::row_not_found(&self.definition.name));
		};
		self.write(Some(at), new.clone())?;
		self.record(TableEvent::Update {
			old,
			new,
		});
		Ok(())
	}

	fn delete(&self, row: &Row) -> Result<()> {
		let row = row.project(&self.header);
		{
			let mut rows = self.rows.write();
			let Some(at) = self.position(&rows, &row) else {
				return_error!(table::row_not_found(&self.definition.name));
			};
			rows.remove(at);
		}
		self.record(TableEvent::Delete(row));
		Ok(())
	}

	fn default(&self, row: &mut Row, column: Option<&str>) -> Result<bool> {
		let mut changed = false;
		for (name, value) in &self.defaults {
			if column.is_some_and(|c| c != name.as_str()) || row.has_value(name) {
				continue;
			}
			changed |= row.set(name, value.clone());
		}
		Ok(changed)
	}

	fn change(&self, _old: &Row, _new: &mut Row, column: &str) -> Result<bool> {
		self.record(TableEvent::Change(column.to_string()));
		Ok(false)
	}
}

#[cfg(test)]
mod tests {
	use relate_core::{ColumnDef, Type};

	use super::*;

	fn people() -> MemoryTable {
		MemoryTable::new(
			RelationDef::new(
				"people",
				vec![
					ColumnDef::new("id", Type::Int8),
					ColumnDef::new("name", Type::Utf8),
					ColumnDef::nilable("email", Type::Utf8),
				],
			)
			.with_key(["id"])
			.with_sparse_key(["email"])
			.with_order(Order::ascending(["id"])),
		)
		.with_rows([
			vec![Value::int8(3), Value::utf8("c"), Value::Undefined],
			vec![Value::int8(1), Value::utf8("a"), Value::utf8("a@x")],
			vec![Value::int8(2), Value::utf8("b"), Value::Undefined],
		])
		.unwrap()
	}

	fn ids(table: &MemoryTable) -> Vec<Value> {
		table.rows().iter().map(|r| r.value("id")).collect()
	}

	#[test]
	fn test_rows_follow_first_order() {
		assert_eq!(ids(&people()), vec![Value::int8(1), Value::int8(2), Value::int8(3)]);
	}

	#[test]
	fn test_duplicate_key_rejected() {
		let table = people();
		let err = table.insert(&table.row(vec![Value::int8(2), Value::utf8("z")])).unwrap_err();
		assert_eq!(err.code(), "TABLE_001");
	}

	#[test]
	fn test_sparse_key_ignores_absent_values() {
		let table = people();
		table.insert(&table.row(vec![Value::int8(4), Value::utf8("d")])).unwrap();
		let err = table.insert(&table.row(vec![Value::int8(5), Value::utf8("e"), Value::utf8("a@x")])).unwrap_err();
		assert_eq!(err.code(), "TABLE_001");
	}

	#[test]
	fn test_not_nilable() {
		let table = people();
		let err = table.insert(&table.row(vec![Value::int8(9)])).unwrap_err();
		assert_eq!(err.code(), "TABLE_003");
	}

	#[test]
	fn test_type_mismatch() {
		let table = people();
		let err = table.insert(&table.row(vec![Value::utf8("9"), Value::utf8("i")])).unwrap_err();
		assert_eq!(err.code(), "TABLE_004");
		table.insert(&table.row(vec![Value::int4(9), Value::utf8("i")])).unwrap();
	}

	#[test]
	fn test_update_and_delete_by_key() {
		let table = people();
		let old = table.row(vec![Value::int8(2), Value::utf8("b")]);
		let new = table.row(vec![Value::int8(2), Value::utf8("bee")]);
		table.update(&old, &new).unwrap();
		assert_eq!(table.rows()[1].value("name"), Value::utf8("bee"));

		table.delete(&new).unwrap();
		assert_eq!(ids(&table), vec![Value::int8(1), Value::int8(3)]);
		let err = table.delete(&new).unwrap_err();
		assert_eq!(err.code(), "TABLE_002");
		assert_eq!(table.events().len(), 2);
	}

	#[test]
	fn test_ordered_search() {
		let table = people();
		let mut cursor = table.search(&Order::ascending(["id"]), &[Value::int4(2)]).unwrap();
		assert_eq!(cursor.next().unwrap().unwrap().value("name"), Value::utf8("b"));
		assert!(cursor.next().unwrap().is_none());

		let mut cursor = table.search(&Order::ascending(["name"]), &[]).unwrap();
		assert_eq!(cursor.next().unwrap().unwrap().value("name"), Value::utf8("a"));
	}

	#[test]
	fn test_default_fills_absent() {
		let table = people().with_default("email", "none");
		let mut row = table.row(vec![Value::int8(7), Value::utf8("g")]);
		assert!(table.default(&mut row, None).unwrap());
		assert_eq!(row.value("email"), Value::utf8("none"));
		assert!(!table.default(&mut row, Some("email")).unwrap());
	}
}
