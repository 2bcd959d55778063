// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

mod common;

use common::{column, node, row, scan};
use relate_core::{
	Cardinality, Key, TableNode, Value,
	expression::{column as col, eq},
};
use relate_join::{BoundJoin, JoinAlgorithm, JoinBuilder};
use relate_testing::fixture::{accounts, customers, orders, ordered_customers_and_accounts};

#[test]
fn test_inner_join_on_unique_keys() {
	let join = JoinBuilder::inner(node(&customers()), node(&accounts()))
		.on(eq(col("customers", "id"), col("accounts", "id")))
		.build()
		.unwrap();
	let plan = join.plan();

	assert_eq!(plan.cardinality, Cardinality::OneToOne);
	assert_eq!(plan.definition.keys.len(), 1);
	let key = plan.definition.keys.first().unwrap();
	assert!(key.same_columns(&Key::new(["id"])));
	assert!(!key.is_sparse);

	assert_eq!(plan.definition.column_names(), vec!["id", "name", "balance"]);
	assert_eq!(column(join.node().as_ref(), "id"), vec![Value::int8(2), Value::int8(3)]);
}

#[test]
fn test_left_outer_join_keeps_unmatched_rows() {
	let join = JoinBuilder::left_outer(node(&customers()), node(&accounts()))
		.on(eq(col("customers", "id"), col("accounts", "id")))
		.build()
		.unwrap();
	let plan = join.plan();

	let key = plan.definition.keys.first().unwrap();
	assert_eq!(plan.definition.keys.len(), 1);
	assert!(key.same_columns(&Key::new(["id"])));
	assert!(!key.is_sparse);
	assert!(plan.definition.column("balance").unwrap().nilable);
	assert!(!plan.definition.column("id").unwrap().nilable);

	let rows = scan(join.node().as_ref());
	assert_eq!(rows.len(), 3);
	assert_eq!(rows[0].value("id"), Value::int8(1));
	assert_eq!(rows[0].value("balance"), Value::Undefined);

	let BoundJoin::Outer(outer) = &join else {
		panic!("left join binds an outer node");
	};
	assert!(!outer.has_row(&rows[0]));
	assert!(outer.has_row(&rows[1]));
}

#[test]
fn test_ignored_insert_leaves_side_alone() {
	let customers = customers();
	let orders = orders();
	let join = JoinBuilder::inner(node(&customers), node(&orders))
		.on(eq(col("customers", "id"), col("orders", "customer_id")))
		.modifier("PropagateInsertLeft", "Ignore")
		.build()
		.unwrap();
	assert_eq!(join.plan().cardinality, Cardinality::OneToMany);

	let node = join.node();
	node.insert(&row(
		node.as_ref(),
		&[
			("id", Value::int8(7)),
			("name", Value::utf8("gus")),
			("order_id", Value::int8(20)),
			("customer_id", Value::int8(7)),
			("amount", Value::int8(5)),
		],
	))
	.unwrap();

	assert_eq!(customers.len(), 3);
	assert_eq!(orders.len(), 5);
}

#[test]
fn test_merge_on_ordered_unique_inputs() {
	let (customers, accounts) = ordered_customers_and_accounts();
	let join = JoinBuilder::inner(node(&customers), node(&accounts))
		.on(eq(col("customers", "id"), col("accounts", "id")))
		.build()
		.unwrap();

	assert!(matches!(join.plan().algorithm, JoinAlgorithm::Merge { .. }));
	assert!(join.plan().injected.is_none());
	assert_eq!(column(join.node().as_ref(), "balance"), vec![Value::int8(200), Value::int8(300)]);
}

#[test]
fn test_without_join_rejects_matching_insert() {
	let customers = customers();
	let join = JoinBuilder::without(node(&customers), node(&orders()))
		.on(eq(col("customers", "id"), col("orders", "customer_id")))
		.modifier("EnforcePredicate", "true")
		.build()
		.unwrap();
	let node = join.node();

	assert_eq!(column(node.as_ref(), "id"), vec![Value::int8(3)]);

	// customer 5 has an order already
	let err = node.insert(&row(node.as_ref(), &[("id", Value::int8(5)), ("name", Value::utf8("eve"))])).unwrap_err();
	assert_eq!(err.code(), "JOIN_011");
	assert_eq!(customers.len(), 3);

	node.insert(&row(node.as_ref(), &[("id", Value::int8(4)), ("name", Value::utf8("dan"))])).unwrap();
	assert_eq!(customers.len(), 4);
	assert_eq!(column(node.as_ref(), "id"), vec![Value::int8(3), Value::int8(4)]);
}
