// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use relate_core::{Cursor, RelationDef, Row, RowHeader, SourceExpression, TableNode, Value};
use relate_type::Result;
use tracing::{instrument, trace};

use super::common::JoinCore;
use crate::{JoinPlan, JoinSide};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
	Update,
	Attach,
	Remove,
	Keep,
}

/// Left and right outer joins. The side the join does not preserve only
/// takes part in a mutation while the result row says it exists.
pub struct OuterJoinNode {
	core: JoinCore,
	preserved: JoinSide,
	all_of: Vec<String>,
	any_of: Vec<String>,
}

impl OuterJoinNode {
	pub(crate) fn new(plan: Arc<JoinPlan>, left: Arc<dyn TableNode>, right: Arc<dyn TableNode>) -> Self {
		let preserved = plan.preserved().unwrap_or(JoinSide::Left);
		let optional = preserved.other();
		let core = JoinCore::new(plan, left, right);

		let all_of = core.plan.policy.all_of.clone().unwrap_or_else(|| {
			core.plan.key(optional).iter().filter(|c| !core.plan.is_merged(c)).cloned().collect()
		});
		let any_of = core.plan.policy.any_of.clone().unwrap_or_else(|| {
			core.payload_columns(optional).into_iter().filter(|c| !all_of.contains(c)).collect()
		});
		trace!(?all_of, ?any_of, "existence columns");

		Self {
			core,
			preserved,
			all_of,
			any_of,
		}
	}

	pub fn plan(&self) -> &Arc<JoinPlan> {
		&self.core.plan
	}

	pub fn preserved(&self) -> JoinSide {
		self.preserved
	}

	fn optional(&self) -> JoinSide {
		self.preserved.other()
	}

	/// Whether `row` carries a row of the side the join does not preserve.
	/// The row-exists column decides when there is one; otherwise all of the
	/// all-of columns and one of the any-of columns must have values.
	pub fn has_row(&self, row: &Row) -> bool {
		if let Some(column) = &self.core.plan.row_exists_column {
			return row.value(column) == Value::Boolean(true);
		}
		row.has_values(&self.all_of) && (self.any_of.is_empty() || self.any_of.iter().any(|c| row.has_value(c)))
	}

	/// Whether nothing but the join key stands for the optional side, so a
	/// result row alone cannot tell whether that side has a row.
	fn vacuous(&self) -> bool {
		self.core.plan.row_exists_column.is_none() && self.all_of.is_empty() && self.any_of.is_empty()
	}

	/// Whether `row` carries a row of the optional side that is stored.
	fn present(&self, row: &Row) -> Result<bool> {
		if !self.has_row(row) {
			return Ok(false);
		}
		if self.core.plan.is_product() {
			return Ok(true);
		}
		let optional = self.optional();
		self.core.probe(optional).exists(&self.core.key_values(optional, row))
	}

	fn decides_existence(&self, column: &str) -> bool {
		self.core.plan.row_exists_column.as_deref() == Some(column)
			|| self.all_of.iter().chain(&self.any_of).any(|c| c == column)
	}

	/// Whether a mutation reaches `side` for `row`.
	fn reaches(&self, side: JoinSide, row: &Row) -> bool {
		side == self.preserved || self.has_row(row)
	}

	fn set_exists(&self, row: &mut Row, exists: bool) -> bool {
		match &self.core.plan.row_exists_column {
			Some(column) => row.set(column, exists.into()),
			None => false,
		}
	}

	/// The optional side starts to exist: its key follows the preserved
	/// side, and its other columns come from the row found under that key
	/// or from its defaults.
	fn materialize(&self, new: &mut Row) -> Result<bool> {
		let optional = self.optional();
		let policy = self.core.plan.policy.side(optional);
		let mut changed = false;
		if policy.coordinate {
			changed |= self.core.coordinate(optional, new);
		}

		let found = if policy.retrieve {
			let values = new.values_of(self.core.plan.key(self.preserved));
			self.core.probe(optional).find(&values)?
		} else {
			None
		};
		match found {
			Some(found) => {
				trace!(side = %optional, "retrieved existing row");
				for column in self.core.plan.side_header(optional).names() {
					if !self.core.plan.is_merged(column) && !new.has_value(column) {
						changed |= new.set(column, found.value(column));
					}
				}
			}
			None => changed |= self.core.default_side(optional, new, None)?,
		}
		changed |= self.set_exists(new, true);
		Ok(changed)
	}

	/// The optional side stops existing.
	fn dematerialize(&self, new: &mut Row) -> bool {
		let optional = self.optional();
		let mut changed = false;
		if self.core.plan.policy.side(optional).clear {
			for column in self.core.plan.side_header(optional).names() {
				if !self.core.plan.is_merged(column) {
					changed |= new.clear(column);
				}
			}
		}
		changed | self.set_exists(new, false)
	}

	/// What an update does to the optional side, decided before either side
	/// is written.
	fn optional_step(&self, old: &Row, new: &Row) -> Result<Step> {
		let optional = self.optional();
		let before = self.present(old)?;
		let after = if self.vacuous() {
			self.present(new)?
		} else {
			self.has_row(new)
		};
		Ok(match (before, after) {
			(true, true) => Step::Update,
			(false, true) => Step::Attach,
			// the preserved row now points elsewhere; the old row stays for others
			(true, false) if self.core.key_moved(optional, old, new) => Step::Keep,
			(true, false) => Step::Remove,
			(false, false) => Step::Keep,
		})
	}

	fn check_predicate(&self, row: &Row, column: Option<&str>) -> Result<()> {
		if self.has_row(row) && self.core.should_check_predicate(column) {
			self.core.check_predicate(row)?;
		}
		Ok(())
	}
}

impl TableNode for OuterJoinNode {
	fn definition(&self) -> &RelationDef {
		&self.core.plan.definition
	}

	fn header(&self) -> Arc<RowHeader> {
		self.core.plan.header.clone()
	}

	fn open(&self) -> Result<Box<dyn Cursor>> {
		self.core.open()
	}

	#[instrument(name = "join::outer::insert", level = "trace", skip_all)]
	fn insert(&self, row: &Row) -> Result<()> {
		self.check_predicate(row, None)?;
		for side in self.core.plan.policy.sides() {
			if self.reaches(side, row) {
				self.core.insert_side(side, row)?;
			}
		}
		Ok(())
	}

	#[instrument(name = "join::outer::update", level = "trace", skip_all)]
	fn update(&self, old: &Row, new: &Row) -> Result<()> {
		self.check_predicate(new, None)?;
		let step = self.optional_step(old, new)?;
		if self.core.updates_in_place(self.preserved, old, new) {
			self.core.require(self.preserved, old)?;
		}
		trace!(?step, "optional side");

		for side in self.core.plan.policy.sides() {
			if side == self.preserved {
				self.core.update_side(side, old, new)?;
				continue;
			}
			match step {
				Step::Update => self.core.update_side(side, old, new)?,
				Step::Attach => self.core.attach(side, new)?,
				Step::Remove => self.core.delete_side(side, old)?,
				Step::Keep => {}
			}
		}
		Ok(())
	}

	#[instrument(name = "join::outer::delete", level = "trace", skip_all)]
	fn delete(&self, row: &Row) -> Result<()> {
		let present = self.present(row)?;
		if self.core.plan.policy.side(self.preserved).delete {
			self.core.require(self.preserved, row)?;
		}
		for side in self.core.plan.policy.sides() {
			if side == self.preserved || present {
				self.core.delete_side(side, row)?;
			} else {
				trace!(%side, "no stored row to delete");
			}
		}
		Ok(())
	}

	#[instrument(name = "join::outer::default", level = "trace", skip_all)]
	fn default(&self, row: &mut Row, column: Option<&str>) -> Result<bool> {
		let mut changed = false;
		for side in self.core.plan.policy.sides() {
			if self.reaches(side, row) {
				changed |= self.core.default_side(side, row, column)?;
			}
		}
		Ok(changed)
	}

	#[instrument(name = "join::outer::change", level = "trace", skip_all, fields(column = %column))]
	fn change(&self, old: &Row, new: &mut Row, column: &str) -> Result<bool> {
		let before = self.has_row(old);
		let mut changed = false;
		for side in self.core.plan.policy.sides() {
			if self.reaches(side, new) {
				changed |= self.core.change_side(side, old, new, column)?;
			}
		}

		if self.decides_existence(column) {
			let after = self.has_row(new);
			if after != before {
				trace!(exists = after, "existence toggled");
				changed |= if after {
					self.materialize(new)?
				} else {
					self.dematerialize(new)
				};
			}
		}

		// only the preserved side's key drives the optional side
		if self.has_row(new) && self.core.plan.key(self.preserved).iter().any(|c| c == column) {
			changed |= self.core.key_change(self.preserved, old, new, column)?;
		}

		self.check_predicate(new, Some(column))?;
		Ok(changed)
	}

	#[instrument(name = "join::outer::validate", level = "trace", skip_all)]
	fn validate(&self, old: Option<&Row>, new: &mut Row, column: Option<&str>) -> Result<bool> {
		let mut changed = false;
		for side in self.core.plan.policy.sides() {
			if self.reaches(side, new) {
				changed |= self.core.validate_side(side, old, new, column)?;
			}
		}
		self.check_predicate(new, column)?;
		Ok(changed)
	}

	fn emit(&self) -> SourceExpression {
		self.core.emit()
	}
}
