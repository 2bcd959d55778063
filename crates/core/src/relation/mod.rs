// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use serde::{Deserialize, Serialize};

mod column;
mod key;
mod order;

pub use column::ColumnDef;
pub use key::{Key, Keys};
pub use order::{Order, OrderColumn};

use crate::row::RowHeader;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
	pub navigable: bool,
	pub backwards_navigable: bool,
	pub searchable: bool,
	pub updatable: bool,
}

impl Default for Capabilities {
	fn default() -> Self {
		Self {
			navigable: true,
			backwards_navigable: false,
			searchable: false,
			updatable: true,
		}
	}
}

/// Describes a relation: its columns, candidate keys, the physical orders
/// its rows are available in, and which row-level notifications it wants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationDef {
	pub name: String,
	pub columns: Vec<ColumnDef>,
	pub keys: Keys,
	pub orders: Vec<Order>,
	pub capabilities: Capabilities,
	pub should_default: bool,
	pub should_change: bool,
	pub should_validate: bool,
}

impl RelationDef {
	pub fn new(name: impl Into<String>, columns: Vec<ColumnDef>) -> Self {
		Self {
			name: name.into(),
			columns,
			keys: Keys::new(),
			orders: vec![],
			capabilities: Capabilities::default(),
			should_default: true,
			should_change: true,
			should_validate: true,
		}
	}

	pub fn with_key<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
		self.keys.push(Key::new(columns));
		self
	}

	pub fn with_sparse_key<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
		self.keys.push(Key::sparse(columns));
		self
	}

	pub fn with_order(mut self, order: Order) -> Self {
		self.orders.push(order);
		self
	}

	pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
		self.capabilities = capabilities;
		self
	}

	pub fn column(&self, name: &str) -> Option<&ColumnDef> {
		self.columns.iter().find(|c| c.name == name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.column(name).is_some()
	}

	pub fn column_names(&self) -> Vec<String> {
		self.columns.iter().map(|c| c.name.clone()).collect()
	}

	pub fn header(&self) -> Arc<RowHeader> {
		Arc::new(RowHeader::new(self.columns.iter().map(|c| c.name.clone())))
	}

	/// The first physical order whose leading columns cover `key`.
	pub fn order_covering<S: AsRef<str>>(&self, key: &[S]) -> Option<&Order> {
		self.orders.iter().find(|order| order.covers(key))
	}
}

#[cfg(test)]
mod tests {
	use relate_type::Type;

	use super::*;

	fn orders() -> RelationDef {
		RelationDef::new(
			"orders",
			vec![
				ColumnDef::new("id", Type::Int8),
				ColumnDef::new("customer_id", Type::Int8),
				ColumnDef::nilable("note", Type::Utf8),
			],
		)
		.with_key(["id"])
		.with_order(Order::ascending(["customer_id", "id"]))
	}

	#[test]
	fn test_lookup_columns() {
		let def = orders();
		assert!(def.contains("note"));
		assert!(!def.contains("missing"));
		assert!(def.column("note").unwrap().nilable);
		assert_eq!(def.column_names(), vec!["id", "customer_id", "note"]);
	}

	#[test]
	fn test_order_covering() {
		let def = orders();
		assert!(def.order_covering(&["customer_id"]).is_some());
		assert!(def.order_covering(&["id", "customer_id"]).is_some());
		assert!(def.order_covering(&["id"]).is_none());
	}

	#[test]
	fn test_header_follows_columns() {
		let header = orders().header();
		assert_eq!(header.len(), 3);
		assert_eq!(header.index_of("customer_id"), Some(1));
	}
}
