// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{collections::VecDeque, sync::Arc};

use relate_core::{Cursor, Row, TableNode, load_all};
use relate_type::Result;

use super::{Pair, PairStream, orient};
use crate::{JoinPlan, JoinSide};

/// Compares every row of the outer side with the rows of the inner side,
/// which are read once when the stream opens. Products have no key, so
/// every pair matches.
pub(crate) struct NestedLoopStream {
	outer: Box<dyn Cursor>,
	side: JoinSide,
	outer_key: Vec<String>,
	inner_key: Vec<String>,
	inner: Vec<Row>,
	unique_inner: bool,
	preserve: bool,
	pending: VecDeque<Pair>,
}

impl NestedLoopStream {
	pub(crate) fn open(
		plan: &Arc<JoinPlan>,
		left: &Arc<dyn TableNode>,
		right: &Arc<dyn TableNode>,
		unique: Option<JoinSide>,
	) -> Result<Self> {
		let side = plan.preserved().unwrap_or(JoinSide::Left);
		let (outer, inner) = match side {
			JoinSide::Left => (left, right),
			JoinSide::Right => (right, left),
		};
		let mut inner_cursor = inner.open()?;
		Ok(Self {
			outer: outer.open()?,
			side,
			outer_key: plan.key(side).to_vec(),
			inner_key: plan.key(side.other()).to_vec(),
			inner: load_all(inner_cursor.as_mut())?,
			unique_inner: unique == Some(side.other()),
			preserve: plan.preserved() == Some(side),
			pending: VecDeque::new(),
		})
	}
}

impl PairStream for NestedLoopStream {
	fn next_pair(&mut self) -> Result<Option<Pair>> {
		loop {
			if let Some(pair) = self.pending.pop_front() {
				return Ok(Some(pair));
			}
			let Some(row) = self.outer.next()? else {
				return Ok(None);
			};

			let mut matched = false;
			for inner in &self.inner {
				if row.matches(&self.outer_key, inner, &self.inner_key) {
					matched = true;
					self.pending.push_back(orient(self.side, Some(row.clone()), Some(inner.clone())));
					if self.unique_inner {
						break;
					}
				}
			}
			if !matched && self.preserve {
				return Ok(Some(orient(self.side, Some(row), None)));
			}
		}
	}
}
