// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use relate_core::{
	Cardinality, Expression, JoinExpression, JoinKind, Modifiers, Order, RelationDef, Row, RowHeader,
	SourceExpression,
};
use relate_type::Diagnostic;

use crate::{JoinSide, policy::JoinPolicy, select::JoinAlgorithm};

/// Everything binding decided about a join. Built once and shared read-only
/// by the node and every cursor it opens.
#[derive(Debug, Clone)]
pub struct JoinPlan {
	pub kind: JoinKind,
	pub natural: bool,
	/// Side-qualified condition, as written or synthesized.
	pub condition: Option<Expression>,
	/// The condition over result column names.
	pub bound_condition: Option<Expression>,
	pub left_key: Vec<String>,
	pub right_key: Vec<String>,
	pub merged: Vec<String>,
	pub left_unique: bool,
	pub right_unique: bool,
	pub cardinality: Cardinality,
	pub algorithm: JoinAlgorithm,
	pub injected: Option<(JoinSide, Order)>,
	pub policy: JoinPolicy,
	pub definition: RelationDef,
	pub header: Arc<RowHeader>,
	pub left_header: Arc<RowHeader>,
	pub right_header: Arc<RowHeader>,
	pub row_exists_column: Option<String>,
	pub modifiers: Modifiers,
	pub warnings: Vec<Diagnostic>,
}

impl JoinPlan {
	pub fn key(&self, side: JoinSide) -> &[String] {
		match side {
			JoinSide::Left => &self.left_key,
			JoinSide::Right => &self.right_key,
		}
	}

	pub fn is_unique(&self, side: JoinSide) -> bool {
		match side {
			JoinSide::Left => self.left_unique,
			JoinSide::Right => self.right_unique,
		}
	}

	pub fn side_header(&self, side: JoinSide) -> &Arc<RowHeader> {
		match side {
			JoinSide::Left => &self.left_header,
			JoinSide::Right => &self.right_header,
		}
	}

	pub fn is_product(&self) -> bool {
		self.left_key.is_empty()
	}

	pub fn preserved(&self) -> Option<JoinSide> {
		match self.kind {
			JoinKind::LeftOuter => Some(JoinSide::Left),
			JoinKind::RightOuter => Some(JoinSide::Right),
			_ => None,
		}
	}

	pub fn is_merged(&self, column: &str) -> bool {
		self.merged.iter().any(|c| c == column)
	}

	/// Whether `column` of the result is supplied by `side`.
	pub fn owns(&self, side: JoinSide, column: &str) -> bool {
		self.side_header(side).contains(column)
	}

	/// The column of the other side correlated with `column`, a join key
	/// column of `side`.
	pub fn correlated(&self, side: JoinSide, column: &str) -> Option<&str> {
		let position = self.key(side).iter().position(|c| c == column)?;
		self.key(side.other()).get(position).map(String::as_str)
	}

	/// The part of a result row belonging to `side`.
	pub fn project(&self, side: JoinSide, row: &Row) -> Row {
		row.project(self.side_header(side))
	}

	/// A result row built from one row of each side. On a right outer join
	/// the right side supplies the merged columns.
	pub fn combine(&self, left: Option<&Row>, right: Option<&Row>) -> Row {
		let mut row = Row::new(self.header.clone());
		let (first, second) = match self.kind {
			JoinKind::RightOuter => (left, right),
			_ => (right, left),
		};
		if let Some(first) = first {
			first.copy_to(&mut row);
		}
		if let Some(second) = second {
			second.copy_to(&mut row);
		}
		if let (Some(column), Some(preserved)) = (&self.row_exists_column, self.preserved()) {
			let exists = match preserved {
				JoinSide::Left => right.is_some(),
				JoinSide::Right => left.is_some(),
			};
			row.set(column, exists.into());
		}
		row
	}

	/// Re-emits the join over the given operand expressions.
	pub fn emit(&self, left: SourceExpression, right: SourceExpression) -> JoinExpression {
		let mut expression = JoinExpression::new(self.kind, left, right);
		if !self.natural {
			expression.condition = self.condition.clone();
		}
		if self.kind != JoinKind::Times {
			expression.cardinality = Some(self.cardinality);
		}
		expression.row_exists_column = self.row_exists_column.clone();
		expression.modifiers = self.modifiers.clone();
		expression
	}
}
