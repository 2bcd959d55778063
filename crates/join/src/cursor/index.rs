// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{collections::BTreeMap, sync::Arc};

use relate_core::{Order, Row, TableNode, Value, load_all};
use relate_type::Result;
use tracing::trace;

use super::{KeyValues, key_values};
use crate::probe::in_order;

/// Probe access to one side of a join, by join key.
pub(crate) enum SideIndex {
	/// The side carries the order itself and answers ordered searches.
	Ordered {
		node: Arc<dyn TableNode>,
		order: Order,
		key: Vec<String>,
	},
	/// An index the cursor built when it was opened. It belongs to the
	/// cursor and is dropped with it.
	Built {
		rows: BTreeMap<KeyValues, Vec<Row>>,
	},
}

impl SideIndex {
	pub(crate) fn open(node: &Arc<dyn TableNode>, key: &[String], order: &Order, build: bool) -> Result<Self> {
		if !build {
			return Ok(SideIndex::Ordered {
				node: node.clone(),
				order: order.clone(),
				key: key.to_vec(),
			});
		}

		let mut cursor = node.open()?;
		let mut rows: BTreeMap<KeyValues, Vec<Row>> = BTreeMap::new();
		for row in load_all(cursor.as_mut())? {
			let values = key_values(&row, key);
			// absent key values never match
			if values.iter().any(Value::is_undefined) {
				continue;
			}
			rows.entry(values).or_default().push(row);
		}
		trace!(relation = %node.definition().name, keys = rows.len(), "built join index");
		Ok(SideIndex::Built {
			rows,
		})
	}

	/// Rows matching `values`, given in the indexed side's key order.
	pub(crate) fn lookup(&self, values: &[Value]) -> Result<Vec<Row>> {
		if values.iter().any(Value::is_undefined) {
			return Ok(vec![]);
		}
		match self {
			SideIndex::Ordered {
				node,
				order,
				key,
			} => {
				let mut cursor = node.search(order, &in_order(order, key, values))?;
				load_all(cursor.as_mut())
			}
			SideIndex::Built {
				rows,
			} => Ok(rows.get(values).cloned().unwrap_or_default()),
		}
	}
}
