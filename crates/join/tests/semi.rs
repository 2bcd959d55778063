// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

mod common;

use common::{column, find, node, row};
use relate_core::{
	TableNode, Value,
	expression::{column as col, eq},
};
use relate_join::{BoundJoin, JoinBuilder};
use relate_testing::{
	TableEvent,
	fixture::{customers, lines, orders},
};

fn customers_having_orders(enforce: bool) -> (BoundJoin, std::sync::Arc<relate_testing::MemoryTable>) {
	let customers = customers();
	let mut builder = JoinBuilder::having(node(&customers), node(&orders()))
		.on(eq(col("customers", "id"), col("orders", "customer_id")));
	if enforce {
		builder = builder.modifier("EnforcePredicate", "true");
	}
	(builder.build().unwrap(), customers)
}

#[test]
fn test_having_keeps_left_definition() {
	let (join, _) = customers_having_orders(false);
	let definition = &join.plan().definition;
	assert_eq!(definition.name, "customers");
	assert_eq!(definition.column_names(), vec!["id", "name"]);
	assert_eq!(definition.keys.len(), 1);
	assert_eq!(column(join.node().as_ref(), "id"), vec![Value::int8(1), Value::int8(2)]);
}

#[test]
fn test_without_orders() {
	let join = JoinBuilder::without(node(&customers()), node(&orders()))
		.on(eq(col("customers", "id"), col("orders", "customer_id")))
		.build()
		.unwrap();
	assert_eq!(column(join.node().as_ref(), "id"), vec![Value::int8(3)]);
}

#[test]
fn test_natural_semi_join_without_common_columns() {
	let join = JoinBuilder::having(node(&customers()), node(&lines())).build().unwrap();
	assert_eq!(join.warnings().len(), 1);
	assert_eq!(join.warnings()[0].code, "JOIN_W001");
	assert_eq!(column(join.node().as_ref(), "id").len(), 3);

	let join = JoinBuilder::without(node(&customers()), node(&lines())).build().unwrap();
	assert!(column(join.node().as_ref(), "id").is_empty());
}

#[test]
fn test_exists() {
	let (join, _) = customers_having_orders(false);
	let BoundJoin::Semi(semi) = &join else {
		panic!("expected a semi join");
	};
	let node = join.node();
	assert!(semi.exists(&row(node.as_ref(), &[("id", Value::int8(1))])).unwrap());
	assert!(!semi.exists(&row(node.as_ref(), &[("id", Value::int8(3))])).unwrap());
	assert!(!semi.exists(&row(node.as_ref(), &[])).unwrap());
}

#[test]
fn test_unenforced_insert_reaches_left() {
	let (join, customers) = customers_having_orders(false);
	let node = join.node();
	node.insert(&row(node.as_ref(), &[("id", Value::int8(9)), ("name", Value::utf8("ike"))])).unwrap();
	assert_eq!(customers.len(), 4);
	// no order, so the new customer does not show up
	assert_eq!(column(node.as_ref(), "id").len(), 2);
}

#[test]
fn test_enforced_having_rejects_unmatched_row() {
	let (join, customers) = customers_having_orders(true);
	let node = join.node();

	let err = node.insert(&row(node.as_ref(), &[("id", Value::int8(9)), ("name", Value::utf8("ike"))])).unwrap_err();
	assert_eq!(err.code(), "JOIN_010");
	assert_eq!(customers.len(), 3);

	node.insert(&row(node.as_ref(), &[("id", Value::int8(5)), ("name", Value::utf8("eve"))])).unwrap();
	assert_eq!(customers.len(), 4);
	assert_eq!(column(node.as_ref(), "id"), vec![Value::int8(1), Value::int8(2), Value::int8(5)]);
}

#[test]
fn test_enforced_key_change() {
	let (join, customers) = customers_having_orders(true);
	let node = join.node();
	let old = find(node.as_ref(), "id", Value::int8(2));
	let mut new = old.clone();
	new.set("id", Value::int8(7));
	let err = node.change(&old, &mut new, "id").unwrap_err();
	assert_eq!(err.code(), "JOIN_010");
	assert_eq!(customers.events(), vec![TableEvent::Change("id".to_string())]);

	// a non-key column is not checked
	let mut new = old.clone();
	new.set("name", Value::utf8("rob"));
	assert!(!node.change(&old, &mut new, "name").unwrap());
}

#[test]
fn test_mutations_only_reach_left() {
	let customers = customers();
	let orders = orders();
	let join = JoinBuilder::having(node(&customers), node(&orders))
		.on(eq(col("customers", "id"), col("orders", "customer_id")))
		.build()
		.unwrap();
	let node = join.node();

	let old = find(node.as_ref(), "id", Value::int8(2));
	let mut new = old.clone();
	new.set("name", Value::utf8("rob"));
	node.update(&old, &new).unwrap();
	node.delete(&find(node.as_ref(), "id", Value::int8(1))).unwrap();

	assert_eq!(customers.len(), 2);
	assert!(orders.events().is_empty());
	assert_eq!(find(node.as_ref(), "id", Value::int8(2)).value("name"), Value::utf8("rob"));
}
