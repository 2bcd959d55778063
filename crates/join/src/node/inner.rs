// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use relate_core::{Cursor, RelationDef, Row, RowHeader, SourceExpression, TableNode};
use relate_type::Result;
use tracing::instrument;

use super::common::JoinCore;
use crate::JoinPlan;

/// Inner joins and products. Every mutation is applied to both sides, in
/// the order the policy fixes.
pub struct InnerJoinNode {
	core: JoinCore,
}

impl InnerJoinNode {
	pub(crate) fn new(plan: Arc<JoinPlan>, left: Arc<dyn TableNode>, right: Arc<dyn TableNode>) -> Self {
		Self {
			core: JoinCore::new(plan, left, right),
		}
	}

	pub fn plan(&self) -> &Arc<JoinPlan> {
		&self.core.plan
	}
}

impl TableNode for InnerJoinNode {
	fn definition(&self) -> &RelationDef {
		&self.core.plan.definition
	}

	fn header(&self) -> Arc<RowHeader> {
		self.core.plan.header.clone()
	}

	fn open(&self) -> Result<Box<dyn Cursor>> {
		self.core.open()
	}

	#[instrument(name = "join::inner::insert", level = "trace", skip_all)]
	fn insert(&self, row: &Row) -> Result<()> {
		if self.core.should_check_predicate(None) {
			self.core.check_predicate(row)?;
		}
		for side in self.core.plan.policy.sides() {
			self.core.insert_side(side, row)?;
		}
		Ok(())
	}

	#[instrument(name = "join::inner::update", level = "trace", skip_all)]
	fn update(&self, old: &Row, new: &Row) -> Result<()> {
		if self.core.should_check_predicate(None) {
			self.core.check_predicate(new)?;
		}
		let sides = self.core.plan.policy.sides();
		for side in sides {
			if self.core.updates_in_place(side, old, new) {
				self.core.require(side, old)?;
			}
		}
		for side in sides {
			self.core.update_side(side, old, new)?;
		}
		Ok(())
	}

	#[instrument(name = "join::inner::delete", level = "trace", skip_all)]
	fn delete(&self, row: &Row) -> Result<()> {
		let sides = self.core.plan.policy.sides();
		for side in sides {
			if self.core.plan.policy.side(side).delete {
				self.core.require(side, row)?;
			}
		}
		for side in sides {
			self.core.delete_side(side, row)?;
		}
		Ok(())
	}

	#[instrument(name = "join::inner::default", level = "trace", skip_all)]
	fn default(&self, row: &mut Row, column: Option<&str>) -> Result<bool> {
		let mut changed = false;
		for side in self.core.plan.policy.sides() {
			changed |= self.core.default_side(side, row, column)?;
		}
		Ok(changed)
	}

	#[instrument(name = "join::inner::change", level = "trace", skip_all, fields(column = %column))]
	fn change(&self, old: &Row, new: &mut Row, column: &str) -> Result<bool> {
		let mut changed = false;
		for side in self.core.plan.policy.sides() {
			changed |= self.core.change_side(side, old, new, column)?;
		}
		if let Some(edited) = self.core.edited_side(column) {
			changed |= self.core.key_change(edited, old, new, column)?;
		}
		if self.core.should_check_predicate(Some(column)) {
			self.core.check_predicate(new)?;
		}
		Ok(changed)
	}

	#[instrument(name = "join::inner::validate", level = "trace", skip_all)]
	fn validate(&self, old: Option<&Row>, new: &mut Row, column: Option<&str>) -> Result<bool> {
		let mut changed = false;
		for side in self.core.plan.policy.sides() {
			changed |= self.core.validate_side(side, old, new, column)?;
		}
		if self.core.should_check_predicate(column) {
			self.core.check_predicate(new)?;
		}
		Ok(changed)
	}

	fn emit(&self) -> SourceExpression {
		self.core.emit()
	}
}
