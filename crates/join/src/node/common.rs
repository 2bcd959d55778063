// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Propagation shared by inner and outer join nodes.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use relate_core::{Cursor, Row, SourceExpression, TableNode, Value, expression::is_satisfied};
use relate_type::{Result, error::diagnostic::table, return_error};
use tracing::trace;

use crate::{
	JoinPlan, JoinSide, cursor::JoinCursor, error::JoinError, policy::PropagateAction, probe::KeyProbe,
};

pub(crate) struct JoinCore {
	pub(crate) plan: Arc<JoinPlan>,
	left: Arc<dyn TableNode>,
	right: Arc<dyn TableNode>,
	left_probe: OnceCell<KeyProbe>,
	right_probe: OnceCell<KeyProbe>,
}

impl JoinCore {
	pub(crate) fn new(plan: Arc<JoinPlan>, left: Arc<dyn TableNode>, right: Arc<dyn TableNode>) -> Self {
		Self {
			plan,
			left,
			right,
			left_probe: OnceCell::new(),
			right_probe: OnceCell::new(),
		}
	}

	pub(crate) fn node(&self, side: JoinSide) -> &Arc<dyn TableNode> {
		match side {
			JoinSide::Left => &self.left,
			JoinSide::Right => &self.right,
		}
	}

	/// The key probe of `side`, built on first use.
	pub(crate) fn probe(&self, side: JoinSide) -> &KeyProbe {
		let slot = match side {
			JoinSide::Left => &self.left_probe,
			JoinSide::Right => &self.right_probe,
		};
		slot.get_or_init(|| KeyProbe::new(self.node(side).clone(), self.plan.key(side).to_vec()))
	}

	pub(crate) fn open(&self) -> Result<Box<dyn Cursor>> {
		Ok(Box::new(JoinCursor::open(self.plan.clone(), &self.left, &self.right)?))
	}

	pub(crate) fn emit(&self) -> SourceExpression {
		SourceExpression::Join(Box::new(self.plan.emit(self.left.emit(), self.right.emit())))
	}

	pub(crate) fn is_key_column(&self, column: &str) -> bool {
		self.plan.left_key.iter().chain(&self.plan.right_key).any(|c| c == column)
	}

	/// Join key values of `side`, read from a result row.
	pub(crate) fn key_values(&self, side: JoinSide, row: &Row) -> Vec<Value> {
		row.values_of(self.plan.key(side))
	}

	pub(crate) fn insert_side(&self, side: JoinSide, row: &Row) -> Result<()> {
		let action = self.plan.policy.side(side).insert;
		let part = self.plan.project(side, row);
		match action {
			PropagateAction::Suppress => {
				trace!(%side, "insert suppressed");
				Ok(())
			}
			PropagateAction::Propagate => self.node(side).insert(&part),
			PropagateAction::EnsureExists | PropagateAction::IgnoreIfExists => {
				match self.probe(side).find(&self.key_values(side, row))? {
					Some(existing) if action == PropagateAction::EnsureExists => {
						trace!(%side, "row exists, updating it");
						self.node(side).update(&existing, &part)
					}
					Some(_) => {
						trace!(%side, "row exists, leaving it");
						Ok(())
					}
					None => self.node(side).insert(&part),
				}
			}
		}
	}

	/// Whether `side` is the one a key edit re-looks up: unique on its join
	/// key while the other side is not.
	pub(crate) fn retargets(&self, side: JoinSide) -> bool {
		self.plan.is_unique(side) && !self.plan.is_unique(side.other())
	}

	/// Whether the join key of `side` points at a different row in `new`
	/// than in `old`. A key left without values points nowhere.
	pub(crate) fn key_moved(&self, side: JoinSide, old: &Row, new: &Row) -> bool {
		let values = self.key_values(side, new);
		values.iter().all(Value::is_defined) && values != self.key_values(side, old)
	}

	/// Whether updating `side` rewrites the row `old` stands for, as opposed
	/// to pointing the result at another row of that side.
	pub(crate) fn updates_in_place(&self, side: JoinSide, old: &Row, new: &Row) -> bool {
		self.plan.policy.side(side).update
			&& self.plan.project(side, old) != self.plan.project(side, new)
			&& !(self.retargets(side) && self.key_moved(side, old, new))
	}

	/// Fails unless the row of `side` that `row` stands for is stored. Joins
	/// without a key, and rows without key values, cannot tell and pass.
	pub(crate) fn require(&self, side: JoinSide, row: &Row) -> Result<()> {
		if self.plan.is_product() {
			return Ok(());
		}
		let values = self.key_values(side, row);
		if values.iter().any(Value::is_undefined) || self.probe(side).exists(&values)? {
			return Ok(());
		}
		return_error!(table::row_not_found(&self.node(side).definition().name))
	}

	pub(crate) fn update_side(&self, side: JoinSide, old: &Row, new: &Row) -> Result<()> {
		if !self.plan.policy.side(side).update {
			return Ok(());
		}
		if self.retargets(side) && self.key_moved(side, old, new) {
			trace!(%side, "join key moved to another row");
			return self.attach(side, new);
		}
		let old = self.plan.project(side, old);
		let new = self.plan.project(side, new);
		if old == new {
			trace!(%side, "side unchanged");
			return Ok(());
		}
		self.node(side).update(&old, &new)
	}

	/// Makes the row of `side` that `row` carries present: a unique side's
	/// stored row under the same key is updated if `row` edits it, anything
	/// else goes through the insert policy.
	pub(crate) fn attach(&self, side: JoinSide, row: &Row) -> Result<()> {
		if self.plan.is_product() || !self.plan.is_unique(side) {
			return self.insert_side(side, row);
		}
		let Some(existing) = self.probe(side).find(&self.key_values(side, row))? else {
			return self.insert_side(side, row);
		};
		let part = self.plan.project(side, row);
		if part == existing || !self.plan.policy.side(side).update {
			trace!(%side, "attached to stored row");
			return Ok(());
		}
		self.node(side).update(&existing, &part)
	}

	pub(crate) fn delete_side(&self, side: JoinSide, row: &Row) -> Result<()> {
		if !self.plan.policy.side(side).delete {
			return Ok(());
		}
		self.node(side).delete(&self.plan.project(side, row))
	}

	pub(crate) fn default_side(&self, side: JoinSide, row: &mut Row, column: Option<&str>) -> Result<bool> {
		let node = self.node(side);
		if !self.plan.policy.side(side).default || !node.definition().should_default {
			return Ok(false);
		}
		if column.is_some_and(|c| !self.plan.owns(side, c)) {
			return Ok(false);
		}
		let mut part = self.plan.project(side, row);
		if !node.default(&mut part, column)? {
			return Ok(false);
		}
		Ok(part.copy_to(row))
	}

	pub(crate) fn validate_side(
		&self,
		side: JoinSide,
		old: Option<&Row>,
		new: &mut Row,
		column: Option<&str>,
	) -> Result<bool> {
		let node = self.node(side);
		if !self.plan.policy.side(side).validate || !node.definition().should_validate {
			return Ok(false);
		}
		if column.is_some_and(|c| !self.plan.owns(side, c)) {
			return Ok(false);
		}
		let old = old.map(|row| self.plan.project(side, row));
		let mut part = self.plan.project(side, new);
		if !node.validate(old.as_ref(), &mut part, column)? {
			return Ok(false);
		}
		Ok(part.copy_to(new))
	}

	pub(crate) fn change_side(&self, side: JoinSide, old: &Row, new: &mut Row, column: &str) -> Result<bool> {
		let node = self.node(side);
		if !self.plan.policy.side(side).change || !node.definition().should_change || !self.plan.owns(side, column) {
			return Ok(false);
		}
		let old = self.plan.project(side, old);
		let mut part = self.plan.project(side, new);
		if !node.change(&old, &mut part, column)? {
			return Ok(false);
		}
		Ok(part.copy_to(new))
	}

	/// The side an edit of join key column `column` is attributed to. A
	/// merged column belongs to both; it counts as an edit of the side that
	/// is not unique, so the unique side gets looked up again.
	pub(crate) fn edited_side(&self, column: &str) -> Option<JoinSide> {
		if self.plan.is_merged(column) {
			return Some(if self.plan.left_unique && !self.plan.right_unique {
				JoinSide::Right
			} else {
				JoinSide::Left
			});
		}
		if self.plan.left_key.iter().any(|c| c == column) {
			Some(JoinSide::Left)
		} else if self.plan.right_key.iter().any(|c| c == column) {
			Some(JoinSide::Right)
		} else {
			None
		}
	}

	/// Reacts to an edit of join key column `column` of `edited`: the other
	/// side is looked up again by the new key when it is unique and `edited`
	/// is not, otherwise the value is copied across to the correlated
	/// column.
	pub(crate) fn key_change(&self, edited: JoinSide, old: &Row, new: &mut Row, column: &str) -> Result<bool> {
		let target = edited.other();
		let policy = self.plan.policy.side(target);

		if self.plan.is_unique(target) && !self.plan.is_unique(edited) && policy.retrieve {
			return self.retrieve(target, old, new);
		}
		if !policy.coordinate {
			return Ok(false);
		}
		let Some(correlated) = self.plan.correlated(edited, column) else {
			return Ok(false);
		};
		trace!(%column, %correlated, "coordinating join key");
		let value = new.value(column);
		Ok(new.set(correlated, value))
	}

	/// Copies the join key of the side opposite `target` into `target`'s
	/// key columns.
	pub(crate) fn coordinate(&self, target: JoinSide, row: &mut Row) -> bool {
		let source = target.other();
		let mut changed = false;
		for (from, to) in self.plan.key(source).iter().zip(self.plan.key(target)) {
			if from != to {
				let value = row.value(from);
				changed |= row.set(to, value);
			}
		}
		changed
	}

	/// Columns of `side` that only that side supplies and that are not part
	/// of its join key.
	pub(crate) fn payload_columns(&self, side: JoinSide) -> Vec<String> {
		self.plan
			.side_header(side)
			.names()
			.filter(|c| !self.plan.is_merged(c) && !self.plan.key(side).iter().any(|k| k == *c))
			.map(|c| c.to_string())
			.collect()
	}

	/// Re-reads `target` by the join key the other side now carries.
	pub(crate) fn retrieve(&self, target: JoinSide, old: &Row, new: &mut Row) -> Result<bool> {
		let values = self.key_values(target.other(), new);
		let found = self.probe(target).find(&values)?;
		let policy = self.plan.policy.side(target);

		let Some(found) = found else {
			trace!(%target, "lookup missed");
			let mut changed = policy.coordinate && self.coordinate(target, new);
			if policy.clear {
				for column in self.payload_columns(target) {
					changed |= new.clear(&column);
				}
			}
			return Ok(changed);
		};

		trace!(%target, "lookup found row");
		let mut changed = false;
		for column in self.plan.side_header(target).names() {
			if self.plan.is_merged(column) {
				continue;
			}
			let value = found.value(column);
			if new.set(column, value) {
				changed = true;
				self.change_side(target, old, new, column)?;
			}
		}
		Ok(changed)
	}

	pub(crate) fn should_check_predicate(&self, column: Option<&str>) -> bool {
		self.plan.policy.enforce_predicate || (!self.plan.natural && column.is_some_and(|c| self.is_key_column(c)))
	}

	/// Evaluates the join condition over a result row.
	pub(crate) fn check_predicate(&self, row: &Row) -> Result<()> {
		let Some(condition) = &self.plan.bound_condition else {
			return Ok(());
		};
		if !is_satisfied(condition, row)? {
			return_error!(JoinError::RowViolatesJoinPredicate {
				predicate: condition.to_string(),
				row: row.to_string(),
			});
		}
		Ok(())
	}
}
