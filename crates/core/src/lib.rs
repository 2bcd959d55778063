// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

pub mod expression;
pub mod interface;
pub mod modifier;
pub mod relation;
pub mod row;

pub use expression::Expression;
pub use interface::{
	Cardinality, Catalog, Cursor, JoinExpression, JoinKind, RowsCursor, SourceExpression, TableNode, load_all,
};
pub use modifier::Modifiers;
pub use relation::{Capabilities, ColumnDef, Key, Keys, Order, OrderColumn, RelationDef};
pub use relate_type::{Error, Result, Type, Value};
pub use row::{Row, RowHeader};
