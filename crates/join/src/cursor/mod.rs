// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Row production. The plan's algorithm picks a pair stream, which yields
//! one `(left, right)` pair per result row. Outer joins yield an absent
//! row for the side without a match.

use std::sync::Arc;

use relate_core::{Cursor, Row, TableNode};
use relate_type::Result;
use smallvec::SmallVec;
use tracing::{debug, instrument};

use crate::{JoinPlan, JoinSide, select::JoinAlgorithm};

mod index;
mod merge;
mod nested;
mod search;

pub(crate) use index::SideIndex;
use merge::MergeStream;
use nested::NestedLoopStream;
use search::SearchStream;

pub(crate) type Pair = (Option<Row>, Option<Row>);

/// Join key values of one row, in key order.
pub(crate) type KeyValues = SmallVec<[relate_core::Value; 4]>;

pub(crate) trait PairStream: Send {
	fn next_pair(&mut self) -> Result<Option<Pair>>;
}

pub(crate) fn key_values(row: &Row, key: &[String]) -> KeyValues {
	key.iter().map(|column| row.value(column)).collect()
}

/// A pair with each row on its side.
pub(crate) fn orient(side: JoinSide, row: Option<Row>, other: Option<Row>) -> Pair {
	match side {
		JoinSide::Left => (row, other),
		JoinSide::Right => (other, row),
	}
}

fn open_pairs<'a>(
	plan: &Arc<JoinPlan>,
	left: &'a Arc<dyn TableNode>,
	right: &'a Arc<dyn TableNode>,
) -> Result<Box<dyn PairStream>> {
	let node = |side: JoinSide| -> &'a Arc<dyn TableNode> {
		match side {
			JoinSide::Left => left,
			JoinSide::Right => right,
		}
	};
	let injected = |side: JoinSide| plan.injected.as_ref().is_some_and(|(s, _)| *s == side);

	Ok(match &plan.algorithm {
		JoinAlgorithm::Product => Box::new(NestedLoopStream::open(plan, left, right, None)?),
		JoinAlgorithm::NestedLoop {
			unique,
		} => Box::new(NestedLoopStream::open(plan, left, right, *unique)?),
		JoinAlgorithm::Search {
			side,
			order,
		} => {
			let index = SideIndex::open(node(*side), plan.key(*side), order, injected(*side))?;
			Box::new(SearchStream::open(plan, node(side.other()), side.other(), index)?)
		}
		JoinAlgorithm::Merge {
			left_order,
			right_order,
		} => Box::new(MergeStream::open(plan, left, right, left_order, right_order)?),
	})
}

/// The cursor inner and outer join nodes hand out.
pub struct JoinCursor {
	plan: Arc<JoinPlan>,
	pairs: Box<dyn PairStream>,
}

impl JoinCursor {
	#[instrument(name = "join::cursor::open", level = "trace", skip_all)]
	pub(crate) fn open(plan: Arc<JoinPlan>, left: &Arc<dyn TableNode>, right: &Arc<dyn TableNode>) -> Result<Self> {
		debug!(algorithm = %plan.algorithm, relation = %plan.definition.name, "opening join cursor");
		let pairs = open_pairs(&plan, left, right)?;
		Ok(Self {
			plan,
			pairs,
		})
	}
}

impl Cursor for JoinCursor {
	#[instrument(name = "join::cursor::next", level = "trace", skip_all)]
	fn next(&mut self) -> Result<Option<Row>> {
		Ok(self.pairs.next_pair()?.map(|(left, right)| self.plan.combine(left.as_ref(), right.as_ref())))
	}
}
