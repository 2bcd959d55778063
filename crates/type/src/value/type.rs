// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// All data types a column of a relation can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
	/// A boolean: true or false.
	Boolean,
	/// A 4-byte signed integer
	Int4,
	/// An 8-byte signed integer
	Int8,
	/// An 8-byte floating point
	Float8,
	/// A UTF-8 encoded text
	Utf8,
	/// A UUID version 4
	Uuid4,
	/// The type of an absent value
	Undefined,
}

impl Type {
	pub fn is_number(&self) -> bool {
		matches!(self, Type::Int4 | Type::Int8 | Type::Float8)
	}

	pub fn is_undefined(&self) -> bool {
		matches!(self, Type::Undefined)
	}
}

impl Display for Type {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Type::Boolean => f.write_str("BOOL"),
			Type::Int4 => f.write_str("INT4"),
			Type::Int8 => f.write_str("INT8"),
			Type::Float8 => f.write_str("FLOAT8"),
			Type::Utf8 => f.write_str("UTF8"),
			Type::Uuid4 => f.write_str("UUID4"),
			Type::Undefined => f.write_str("UNDEFINED"),
		}
	}
}
