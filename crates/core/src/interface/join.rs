// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use relate_type::{error::diagnostic::serialization, return_error};
use serde::{Deserialize, Serialize};

use crate::{Expression, Modifiers, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JoinKind {
	Inner,
	LeftOuter,
	RightOuter,
	/// Left rows with at least one matching right row.
	Having,
	/// Left rows without any matching right row.
	Without,
	/// Unconditioned product.
	Times,
}

impl JoinKind {
	pub fn is_outer(&self) -> bool {
		matches!(self, JoinKind::LeftOuter | JoinKind::RightOuter)
	}

	pub fn is_semi(&self) -> bool {
		matches!(self, JoinKind::Having | JoinKind::Without)
	}

	pub fn keyword(&self) -> &'static str {
		match self {
			JoinKind::Inner => "join",
			JoinKind::LeftOuter => "left join",
			JoinKind::RightOuter => "right join",
			JoinKind::Having => "having",
			JoinKind::Without => "without",
			JoinKind::Times => "times",
		}
	}
}

impl Display for JoinKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.keyword())
	}
}

/// How many rows of each side a row of the other side can match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cardinality {
	OneToOne,
	OneToMany,
	ManyToOne,
	ManyToMany,
}

impl Cardinality {
	pub fn classify(left_unique: bool, right_unique: bool) -> Self {
		match (left_unique, right_unique) {
			(true, true) => Cardinality::OneToOne,
			(true, false) => Cardinality::OneToMany,
			(false, true) => Cardinality::ManyToOne,
			(false, false) => Cardinality::ManyToMany,
		}
	}
}

impl Display for Cardinality {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Cardinality::OneToOne => f.write_str("one to one"),
			Cardinality::OneToMany => f.write_str("one to many"),
			Cardinality::ManyToOne => f.write_str("many to one"),
			Cardinality::ManyToMany => f.write_str("many to many"),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SourceExpression {
	Table(String),
	Join(Box<JoinExpression>),
}

impl Display for SourceExpression {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			SourceExpression::Table(name) => f.write_str(name),
			SourceExpression::Join(join) => write!(f, "({})", join),
		}
	}
}

/// A join written back as source. A missing condition on anything but a
/// product means a natural join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinExpression {
	pub kind: JoinKind,
	pub left: SourceExpression,
	pub right: SourceExpression,
	#[serde(default)]
	pub condition: Option<Expression>,
	#[serde(default)]
	pub cardinality: Option<Cardinality>,
	#[serde(default)]
	pub row_exists_column: Option<String>,
	#[serde(default)]
	pub modifiers: Modifiers,
}

impl JoinExpression {
	pub fn new(kind: JoinKind, left: SourceExpression, right: SourceExpression) -> Self {
		Self {
			kind,
			left,
			right,
			condition: None,
			cardinality: None,
			row_exists_column: None,
			modifiers: Modifiers::default(),
		}
	}

	pub fn is_natural(&self) -> bool {
		self.condition.is_none() && self.kind != JoinKind::Times
	}

	pub fn to_bytes(&self) -> Result<Vec<u8>> {
		match postcard::to_stdvec(self) {
			Ok(bytes) => Ok(bytes),
			Err(err) => return_error!(serialization::encode_failed("join expression", err.to_string())),
		}
	}

	pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
		match postcard::from_bytes(bytes) {
			Ok(expression) => Ok(expression),
			Err(err) => return_error!(serialization::decode_failed("join expression", err.to_string())),
		}
	}
}

impl Display for JoinExpression {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{} {} {}", self.left, self.kind, self.right)?;
		if let Some(condition) = &self.condition {
			write!(f, " by {}", condition)?;
		}
		if let Some(cardinality) = &self.cardinality {
			write!(f, " {}", cardinality)?;
		}
		if let Some(column) = &self.row_exists_column {
			write!(f, " include rowexists {}", column)?;
		}
		if !self.modifiers.is_empty() {
			write!(f, " {}", self.modifiers)?;
		}
		Ok(())
	}
}
