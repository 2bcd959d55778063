// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{cmp::Ordering, collections::VecDeque, sync::Arc};

use relate_core::{Cursor, Order, Row, TableNode};
use relate_type::Result;

use super::{Pair, PairStream};
use crate::{JoinPlan, JoinSide};

/// A cursor with one row of lookahead.
struct Head {
	cursor: Box<dyn Cursor>,
	row: Option<Row>,
}

impl Head {
	fn open(node: &Arc<dyn TableNode>, order: &Order) -> Result<Self> {
		let mut cursor = node.search(order, &[])?;
		let row = cursor.next()?;
		Ok(Self {
			cursor,
			row,
		})
	}

	fn take(&mut self) -> Result<Option<Row>> {
		let row = self.row.take();
		self.row = self.cursor.next()?;
		Ok(row)
	}
}

/// Walks both sides in their aligned key orders at once. Only chosen when
/// at least one side is unique on the join key, though equal groups on both
/// sides are still paired in full.
pub(crate) struct MergeStream {
	left: Head,
	right: Head,
	left_order: Order,
	right_order: Order,
	preserved: Option<JoinSide>,
	pending: VecDeque<Pair>,
}

impl MergeStream {
	pub(crate) fn open(
		plan: &Arc<JoinPlan>,
		left: &Arc<dyn TableNode>,
		right: &Arc<dyn TableNode>,
		left_order: &Order,
		right_order: &Order,
	) -> Result<Self> {
		Ok(Self {
			left: Head::open(left, left_order)?,
			right: Head::open(right, right_order)?,
			left_order: left_order.clone(),
			right_order: right_order.clone(),
			preserved: plan.preserved(),
			pending: VecDeque::new(),
		})
	}

	fn incomplete(order: &Order, row: &Row) -> bool {
		order.columns.iter().any(|c| !row.has_value(&c.column))
	}

	/// Compares a left row with a right row position by position along the
	/// aligned orders.
	fn compare(&self, left: &Row, right: &Row) -> Ordering {
		for (l, r) in self.left_order.columns.iter().zip(&self.right_order.columns) {
			let ordering = left.value(&l.column).cmp(&right.value(&r.column));
			let ordering = if l.ascending {
				ordering
			} else {
				ordering.reverse()
			};
			if ordering != Ordering::Equal {
				return ordering;
			}
		}
		Ordering::Equal
	}

	fn unmatched(&mut self, side: JoinSide) -> Result<()> {
		let row = match side {
			JoinSide::Left => self.left.take()?,
			JoinSide::Right => self.right.take()?,
		};
		if self.preserved == Some(side) {
			self.pending.push_back(match side {
				JoinSide::Left => (row, None),
				JoinSide::Right => (None, row),
			});
		}
		Ok(())
	}

	/// Moves the next chunk of output into `pending`. Returns false once both
	/// sides are exhausted.
	fn advance(&mut self) -> Result<bool> {
		let (left, right) = match (&self.left.row, &self.right.row) {
			(None, None) => return Ok(false),
			(Some(_), None) => {
				self.unmatched(JoinSide::Left)?;
				return Ok(true);
			}
			(None, Some(_)) => {
				self.unmatched(JoinSide::Right)?;
				return Ok(true);
			}
			(Some(left), Some(right)) => (left, right),
		};

		// absent key values sort to one end and never match
		if Self::incomplete(&self.left_order, left) {
			self.unmatched(JoinSide::Left)?;
			return Ok(true);
		}
		if Self::incomplete(&self.right_order, right) {
			self.unmatched(JoinSide::Right)?;
			return Ok(true);
		}

		match self.compare(left, right) {
			Ordering::Less => self.unmatched(JoinSide::Left)?,
			Ordering::Greater => self.unmatched(JoinSide::Right)?,
			Ordering::Equal => {
				let first = right.clone();
				let mut lefts = vec![];
				while let Some(row) = &self.left.row {
					if self.compare(row, &first) != Ordering::Equal {
						break;
					}
					lefts.extend(self.left.take()?);
				}
				let mut rights = vec![];
				while let Some(row) = &self.right.row {
					if lefts.first().is_none_or(|l| self.compare(l, row) != Ordering::Equal) {
						break;
					}
					rights.extend(self.right.take()?);
				}
				for left in &lefts {
					for right in &rights {
						self.pending.push_back((Some(left.clone()), Some(right.clone())));
					}
				}
			}
		}
		Ok(true)
	}
}

impl PairStream for MergeStream {
	fn next_pair(&mut self) -> Result<Option<Pair>> {
		loop {
			if let Some(pair) = self.pending.pop_front() {
				return Ok(Some(pair));
			}
			if !self.advance()? {
				return Ok(None);
			}
		}
	}
}
