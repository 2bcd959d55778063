// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Small relations shared by the join tests.

use std::sync::Arc;

use relate_core::{ColumnDef, Order, RelationDef, Type, Value};

use crate::MemoryTable;

fn table(definition: RelationDef, rows: Vec<Vec<Value>>) -> Arc<MemoryTable> {
	Arc::new(MemoryTable::new(definition).with_rows(rows).expect("fixture rows satisfy their relation"))
}

pub fn customers_def() -> RelationDef {
	RelationDef::new("customers", vec![ColumnDef::new("id", Type::Int8), ColumnDef::new("name", Type::Utf8)])
		.with_key(["id"])
}

/// Customers 1, 2 and 3.
pub fn customers() -> Arc<MemoryTable> {
	table(
		customers_def(),
		vec![
			vec![Value::int8(1), Value::utf8("ada")],
			vec![Value::int8(2), Value::utf8("bob")],
			vec![Value::int8(3), Value::utf8("cyd")],
		],
	)
}

pub fn accounts_def() -> RelationDef {
	RelationDef::new(
		"accounts",
		vec![ColumnDef::new("id", Type::Int8), ColumnDef::nilable("balance", Type::Int8)],
	)
	.with_key(["id"])
}

/// Accounts 2, 3 and 4.
pub fn accounts() -> Arc<MemoryTable> {
	table(
		accounts_def(),
		vec![
			vec![Value::int8(2), Value::int8(200)],
			vec![Value::int8(3), Value::int8(300)],
			vec![Value::int8(4), Value::int8(400)],
		],
	)
}

/// Customers and accounts both kept in ascending `id` order.
pub fn ordered_customers_and_accounts() -> (Arc<MemoryTable>, Arc<MemoryTable>) {
	let customers = MemoryTable::new(customers_def().with_order(Order::ascending(["id"])))
		.with_rows(customers().rows().into_iter().map(|r| r.into_values()));
	let accounts = MemoryTable::new(accounts_def().with_order(Order::ascending(["id"])))
		.with_rows(accounts().rows().into_iter().map(|r| r.into_values()));
	(
		Arc::new(customers.expect("fixture rows satisfy their relation")),
		Arc::new(accounts.expect("fixture rows satisfy their relation")),
	)
}

pub fn orders_def() -> RelationDef {
	RelationDef::new(
		"orders",
		vec![
			ColumnDef::new("order_id", Type::Int8),
			ColumnDef::new("customer_id", Type::Int8),
			ColumnDef::new("amount", Type::Int8),
		],
	)
	.with_key(["order_id"])
}

/// Two orders of customer 1, one of customer 2 and one of a customer that
/// does not exist.
pub fn orders() -> Arc<MemoryTable> {
	table(
		orders_def(),
		vec![
			vec![Value::int8(10), Value::int8(1), Value::int8(100)],
			vec![Value::int8(11), Value::int8(1), Value::int8(150)],
			vec![Value::int8(12), Value::int8(2), Value::int8(75)],
			vec![Value::int8(13), Value::int8(5), Value::int8(20)],
		],
	)
}

pub fn lines_def() -> RelationDef {
	RelationDef::new(
		"lines",
		vec![
			ColumnDef::new("line_order", Type::Int8),
			ColumnDef::new("line_no", Type::Int4),
			ColumnDef::new("sku", Type::Utf8),
		],
	)
	.with_key(["line_order", "line_no"])
}

/// Order lines, keyed by order and line number.
pub fn lines() -> Arc<MemoryTable> {
	table(
		lines_def(),
		vec![
			vec![Value::int8(10), Value::int4(1), Value::utf8("apple")],
			vec![Value::int8(10), Value::int4(2), Value::utf8("pear")],
			vec![Value::int8(12), Value::int4(1), Value::utf8("fig")],
		],
	)
}
