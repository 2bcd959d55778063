// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use relate_core::{Cursor, Order, Row, TableNode, Value, load_all};
use relate_type::Result;
use tracing::trace;

/// Finds the rows of one side that match a join key value. Nodes build one
/// per side on first use and keep it for their lifetime.
pub struct KeyProbe {
	node: Arc<dyn TableNode>,
	key: Vec<String>,
	order: Option<Order>,
}

impl KeyProbe {
	pub fn new(node: Arc<dyn TableNode>, key: Vec<String>) -> Self {
		let order = node.definition().order_covering(&key).cloned();
		trace!(
			relation = %node.definition().name,
			key = ?key,
			ordered = order.is_some(),
			"built key probe"
		);
		Self {
			node,
			key,
			order,
		}
	}

	pub fn key(&self) -> &[String] {
		&self.key
	}

	fn cursor(&self, values: &[Value]) -> Result<Option<Box<dyn Cursor>>> {
		if values.len() != self.key.len() || values.iter().any(Value::is_undefined) {
			return Ok(None);
		}
		let cursor = match &self.order {
			Some(order) => self.node.search(order, &in_order(order, &self.key, values))?,
			None => self.node.select(&self.key, values)?,
		};
		Ok(Some(cursor))
	}

	/// The first matching row. An absent key value matches nothing.
	pub fn find(&self, values: &[Value]) -> Result<Option<Row>> {
		match self.cursor(values)? {
			Some(mut cursor) => cursor.next(),
			None => Ok(None),
		}
	}

	pub fn find_all(&self, values: &[Value]) -> Result<Vec<Row>> {
		match self.cursor(values)? {
			Some(mut cursor) => load_all(cursor.as_mut()),
			None => Ok(vec![]),
		}
	}

	pub fn exists(&self, values: &[Value]) -> Result<bool> {
		Ok(self.find(values)?.is_some())
	}
}

/// Rearranges `values`, given in `key` order, into the order's leading
/// column sequence.
pub(crate) fn in_order(order: &Order, key: &[String], values: &[Value]) -> Vec<Value> {
	order.columns
		.iter()
		.take(key.len())
		.filter_map(|c| key.iter().position(|k| k == &c.column))
		.map(|position| values[position].clone())
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_in_order() {
		let order = Order::ascending(["b", "a", "c"]);
		let key = vec!["a".to_string(), "b".to_string()];
		let values = in_order(&order, &key, &[Value::int4(1), Value::int4(2)]);
		assert_eq!(values, vec![Value::int4(2), Value::int4(1)]);
	}
}
