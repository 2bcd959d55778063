// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![allow(dead_code)]

use std::sync::Arc;

use relate_core::{Row, TableNode, Value, load_all};
use relate_testing::MemoryTable;

pub fn node(table: &Arc<MemoryTable>) -> Arc<dyn TableNode> {
	table.clone()
}

pub fn scan(node: &dyn TableNode) -> Vec<Row> {
	let mut cursor = node.open().unwrap();
	load_all(cursor.as_mut()).unwrap()
}

/// The values of `column` over all rows of `node`, in cursor order.
pub fn column(node: &dyn TableNode, column: &str) -> Vec<Value> {
	scan(node).iter().map(|row| row.value(column)).collect()
}

/// A result row of `node` built from name/value pairs. Unnamed columns are
/// absent.
pub fn row(node: &dyn TableNode, values: &[(&str, Value)]) -> Row {
	let mut row = Row::new(node.header());
	for (column, value) in values {
		assert!(row.set(column, value.clone()) || value.is_undefined(), "unknown column {}", column);
	}
	row
}

/// The row of `node` whose `column` equals `value`.
pub fn find(node: &dyn TableNode, column: &str, value: Value) -> Row {
	scan(node)
		.into_iter()
		.find(|row| row.value(column) == value)
		.unwrap_or_else(|| panic!("no row with {} = {}", column, value))
}
