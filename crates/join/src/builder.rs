// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use relate_core::{Expression, JoinKind, Modifiers, TableNode};
use relate_type::Result;

use crate::{BoundJoin, JoinConfig, bind::bind};

/// Binds a join over two nodes already in hand.
///
/// ```ignore
/// let join = JoinBuilder::left_outer(orders, customers)
/// 	.on(eq(column("orders", "customer_id"), column("customers", "id")))
/// 	.modifier("IsLookup", "true")
/// 	.build()?;
/// ```
pub struct JoinBuilder {
	pub(crate) kind: JoinKind,
	pub(crate) left: Arc<dyn TableNode>,
	pub(crate) right: Arc<dyn TableNode>,
	pub(crate) condition: Option<Expression>,
	pub(crate) row_exists_column: Option<String>,
	pub(crate) modifiers: Modifiers,
	pub(crate) config: JoinConfig,
}

impl JoinBuilder {
	pub fn new(kind: JoinKind, left: Arc<dyn TableNode>, right: Arc<dyn TableNode>) -> Self {
		Self {
			kind,
			left,
			right,
			condition: None,
			row_exists_column: None,
			modifiers: Modifiers::new(),
			config: JoinConfig::default(),
		}
	}

	pub fn inner(left: Arc<dyn TableNode>, right: Arc<dyn TableNode>) -> Self {
		Self::new(JoinKind::Inner, left, right)
	}

	pub fn left_outer(left: Arc<dyn TableNode>, right: Arc<dyn TableNode>) -> Self {
		Self::new(JoinKind::LeftOuter, left, right)
	}

	pub fn right_outer(left: Arc<dyn TableNode>, right: Arc<dyn TableNode>) -> Self {
		Self::new(JoinKind::RightOuter, left, right)
	}

	pub fn having(left: Arc<dyn TableNode>, right: Arc<dyn TableNode>) -> Self {
		Self::new(JoinKind::Having, left, right)
	}

	pub fn without(left: Arc<dyn TableNode>, right: Arc<dyn TableNode>) -> Self {
		Self::new(JoinKind::Without, left, right)
	}

	pub fn times(left: Arc<dyn TableNode>, right: Arc<dyn TableNode>) -> Self {
		Self::new(JoinKind::Times, left, right)
	}

	/// Joins on an explicit condition. Without one the join is natural.
	pub fn on(mut self, condition: Expression) -> Self {
		self.condition = Some(condition);
		self
	}

	pub fn modifier(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.modifiers.set(key, value);
		self
	}

	pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
		self.modifiers = modifiers;
		self
	}

	/// Adds a boolean result column telling whether the side an outer join
	/// does not preserve has a row.
	pub fn row_exists(mut self, column: impl Into<String>) -> Self {
		self.row_exists_column = Some(column.into());
		self
	}

	pub fn config(mut self, config: JoinConfig) -> Self {
		self.config = config;
		self
	}

	pub fn build(self) -> Result<BoundJoin> {
		bind(self)
	}
}
