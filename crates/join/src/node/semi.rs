// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use relate_core::{Cursor, JoinKind, RelationDef, Row, RowHeader, SourceExpression, TableNode, load_all};
use relate_type::{Result, return_error};
use tracing::{debug, instrument};

use super::common::JoinCore;
use crate::{
	JoinPlan, JoinSide,
	cursor::{SideIndex, key_values},
	error::JoinError,
	select::JoinAlgorithm,
};

/// `having` and `without` joins: the left rows with, or without, a match on
/// the right. The right side is only ever read.
pub struct SemiJoinNode {
	core: JoinCore,
}

impl SemiJoinNode {
	pub(crate) fn new(plan: Arc<JoinPlan>, left: Arc<dyn TableNode>, right: Arc<dyn TableNode>) -> Self {
		Self {
			core: JoinCore::new(plan, left, right),
		}
	}

	pub fn plan(&self) -> &Arc<JoinPlan> {
		&self.core.plan
	}

	fn wants_match(&self) -> bool {
		self.core.plan.kind == JoinKind::Having
	}

	/// Whether a right row matches the join key of `row`. Without a key any
	/// right row does.
	pub fn exists(&self, row: &Row) -> Result<bool> {
		let values = row.values_of(&self.core.plan.left_key);
		self.core.probe(JoinSide::Right).exists(&values)
	}

	fn check(&self, row: &Row) -> Result<()> {
		if !self.core.plan.policy.enforce_predicate || self.exists(row)? == self.wants_match() {
			return Ok(());
		}
		let predicate = match &self.core.plan.condition {
			Some(condition) => condition.to_string(),
			None => format!("exists {}", self.core.node(JoinSide::Right).definition().name),
		};
		let row = row.to_string();
		if self.wants_match() {
			return_error!(JoinError::RowViolatesHavingPredicate {
				predicate,
				row,
			});
		}
		return_error!(JoinError::RowViolatesWithoutPredicate {
			predicate,
			row,
		})
	}
}

enum Matcher {
	Index(SideIndex),
	Rows(Vec<Row>),
	/// No join key: every left row matches as long as the right side has a
	/// row.
	NonEmpty(bool),
}

struct SemiCursor {
	left: Box<dyn Cursor>,
	left_key: Vec<String>,
	right_key: Vec<String>,
	matcher: Matcher,
	wants_match: bool,
}

impl SemiCursor {
	fn matches(&self, row: &Row) -> Result<bool> {
		match &self.matcher {
			Matcher::Index(index) => Ok(!index.lookup(&key_values(row, &self.left_key))?.is_empty()),
			Matcher::Rows(rows) => Ok(rows.iter().any(|right| row.matches(&self.left_key, right, &self.right_key))),
			Matcher::NonEmpty(non_empty) => Ok(*non_empty),
		}
	}
}

impl Cursor for SemiCursor {
	#[instrument(name = "join::semi::next", level = "trace", skip_all)]
	fn next(&mut self) -> Result<Option<Row>> {
		while let Some(row) = self.left.next()? {
			if self.matches(&row)? == self.wants_match {
				return Ok(Some(row));
			}
		}
		Ok(None)
	}
}

impl TableNode for SemiJoinNode {
	fn definition(&self) -> &RelationDef {
		&self.core.plan.definition
	}

	fn header(&self) -> Arc<RowHeader> {
		self.core.plan.header.clone()
	}

	#[instrument(name = "join::semi::open", level = "trace", skip_all)]
	fn open(&self) -> Result<Box<dyn Cursor>> {
		let plan = &self.core.plan;
		let right = self.core.node(JoinSide::Right);
		debug!(algorithm = %plan.algorithm, relation = %plan.definition.name, "opening semi join cursor");

		let matcher = match &plan.algorithm {
			JoinAlgorithm::Search {
				side: JoinSide::Right,
				order,
			} => {
				let build = plan.injected.as_ref().is_some_and(|(side, _)| *side == JoinSide::Right);
				Matcher::Index(SideIndex::open(right, &plan.right_key, order, build)?)
			}
			_ if plan.is_product() => {
				let mut cursor = right.open()?;
				Matcher::NonEmpty(cursor.next()?.is_some())
			}
			_ => {
				let mut cursor = right.open()?;
				Matcher::Rows(load_all(cursor.as_mut())?)
			}
		};

		Ok(Box::new(SemiCursor {
			left: self.core.node(JoinSide::Left).open()?,
			left_key: plan.left_key.clone(),
			right_key: plan.right_key.clone(),
			matcher,
			wants_match: self.wants_match(),
		}))
	}

	#[instrument(name = "join::semi::insert", level = "trace", skip_all)]
	fn insert(&self, row: &Row) -> Result<()> {
		self.check(row)?;
		self.core.insert_side(JoinSide::Left, row)
	}

	#[instrument(name = "join::semi::update", level = "trace", skip_all)]
	fn update(&self, old: &Row, new: &Row) -> Result<()> {
		self.check(new)?;
		self.core.update_side(JoinSide::Left, old, new)
	}

	#[instrument(name = "join::semi::delete", level = "trace", skip_all)]
	fn delete(&self, row: &Row) -> Result<()> {
		self.core.delete_side(JoinSide::Left, row)
	}

	fn default(&self, row: &mut Row, column: Option<&str>) -> Result<bool> {
		self.core.default_side(JoinSide::Left, row, column)
	}

	#[instrument(name = "join::semi::change", level = "trace", skip_all, fields(column = %column))]
	fn change(&self, old: &Row, new: &mut Row, column: &str) -> Result<bool> {
		let changed = self.core.change_side(JoinSide::Left, old, new, column)?;
		if self.core.plan.left_key.iter().any(|c| c == column) {
			self.check(new)?;
		}
		Ok(changed)
	}

	#[instrument(name = "join::semi::validate", level = "trace", skip_all)]
	fn validate(&self, old: Option<&Row>, new: &mut Row, column: Option<&str>) -> Result<bool> {
		let changed = self.core.validate_side(JoinSide::Left, old, new, column)?;
		self.check(new)?;
		Ok(changed)
	}

	fn emit(&self) -> SourceExpression {
		self.core.emit()
	}
}
