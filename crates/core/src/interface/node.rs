// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{collections::VecDeque, sync::Arc};

use super::{SourceExpression, load_all};
use crate::{Order, RelationDef, Result, Row, RowHeader, Value};

/// A forward-only stream of rows.
pub trait Cursor: Send {
	fn next(&mut self) -> Result<Option<Row>>;
}

/// Cursor over rows already in memory.
pub struct RowsCursor {
	rows: VecDeque<Row>,
}

impl RowsCursor {
	pub fn new(rows: impl IntoIterator<Item = Row>) -> Self {
		Self {
			rows: rows.into_iter().collect(),
		}
	}
}

impl Cursor for RowsCursor {
	fn next(&mut self) -> Result<Option<Row>> {
		Ok(self.rows.pop_front())
	}
}

struct FilterCursor {
	inner: Box<dyn Cursor>,
	columns: Vec<String>,
	values: Vec<Value>,
}

impl Cursor for FilterCursor {
	fn next(&mut self) -> Result<Option<Row>> {
		while let Some(row) = self.inner.next()? {
			let matched = self
				.columns
				.iter()
				.zip(self.values.iter())
				.all(|(column, value)| row.value(column).matches(value));
			if matched {
				return Ok(Some(row));
			}
		}
		Ok(None)
	}
}

/// The executor-facing surface of a relation-valued expression. Base tables
/// and join operators implement it alike, so joins nest.
///
/// Rows passed in and out are shaped by `header()`. Mutations take `&self`;
/// implementations guard their own state.
pub trait TableNode: Send + Sync {
	fn definition(&self) -> &RelationDef;

	fn header(&self) -> Arc<RowHeader> {
		self.definition().header()
	}

	/// Scans every row, in the node's first physical order when it has one.
	fn open(&self) -> Result<Box<dyn Cursor>>;

	/// Rows whose `columns` match `values` positionally. An absent value
	/// matches nothing.
	fn select(&self, columns: &[String], values: &[Value]) -> Result<Box<dyn Cursor>> {
		let inner = self.open()?;
		Ok(Box::new(FilterCursor {
			inner,
			columns: columns.to_vec(),
			values: values.to_vec(),
		}))
	}

	/// Ordered probe: rows whose leading `order` columns match `values`,
	/// delivered in `order`. With no values this is an ordered scan.
	fn search(&self, order: &Order, values: &[Value]) -> Result<Box<dyn Cursor>> {
		let columns: Vec<String> = order.column_names().into_iter().take(values.len()).collect();
		let mut cursor = self.select(&columns, values)?;
		let mut rows = load_all(cursor.as_mut())?;
		rows.sort_by(|a, b| order.compare(a, b));
		Ok(Box::new(RowsCursor::new(rows)))
	}

	fn insert(&self, row: &Row) -> Result<()>;

	fn update(&self, old: &Row, new: &Row) -> Result<()>;

	fn delete(&self, row: &Row) -> Result<()>;

	/// Fills default values into `row`, for one column or all of them.
	/// Returns whether the row changed.
	fn default(&self, _row: &mut Row, _column: Option<&str>) -> Result<bool> {
		Ok(false)
	}

	/// Notifies the node that `column` of `new` was edited. The node may
	/// adjust other columns of `new`; returns whether it did.
	fn change(&self, _old: &Row, _new: &mut Row, _column: &str) -> Result<bool> {
		Ok(false)
	}

	/// Validates a proposed row, optionally for a single edited column.
	fn validate(&self, _old: Option<&Row>, _new: &mut Row, _column: Option<&str>) -> Result<bool> {
		Ok(false)
	}

	/// Re-emits the node as a source expression.
	fn emit(&self) -> SourceExpression {
		SourceExpression::Table(self.definition().name.clone())
	}
}
