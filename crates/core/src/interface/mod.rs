// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

mod catalog;
mod join;
mod node;

pub use catalog::Catalog;
pub use join::{Cardinality, JoinExpression, JoinKind, SourceExpression};
pub use node::{Cursor, RowsCursor, TableNode};

use crate::{Result, Row};

/// Drains `cursor` into memory.
pub fn load_all(cursor: &mut dyn Cursor) -> Result<Vec<Row>> {
	let mut result = Vec::new();
	while let Some(row) = cursor.next()? {
		result.push(row);
	}
	Ok(result)
}
