// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	cmp::Ordering,
	fmt::{Display, Formatter},
	hash::{Hash, Hasher},
};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

mod ordered_f64;
mod r#type;

pub use ordered_f64::{OrderedF64, OrderedFloatError};
pub use r#type::Type;

/// A column value, represented as a native Rust type.
///
/// `Undefined` is the absent state: a row may simply not have a value for a
/// column, which is how outer joins represent the missing side.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Value {
	/// Value is not present
	Undefined,
	/// A boolean: true or false.
	Boolean(bool),
	/// A 4-byte signed integer
	Int4(i32),
	/// An 8-byte signed integer
	Int8(i64),
	/// An 8-byte floating point
	Float8(OrderedF64),
	/// A UTF-8 encoded text
	Utf8(String),
	/// A UUID version 4 (random)
	Uuid4(Uuid),
}

impl Value {
	pub fn undefined() -> Self {
		Value::Undefined
	}

	pub fn bool(v: impl Into<bool>) -> Self {
		Value::Boolean(v.into())
	}

	pub fn int4(v: impl Into<i32>) -> Self {
		Value::Int4(v.into())
	}

	pub fn int8(v: impl Into<i64>) -> Self {
		Value::Int8(v.into())
	}

	/// NaN has no place in a total order and becomes `Undefined`.
	pub fn float8(v: impl Into<f64>) -> Self {
		OrderedF64::try_from(v.into()).map(Value::Float8).unwrap_or(Value::Undefined)
	}

	pub fn utf8(v: impl Into<String>) -> Self {
		Value::Utf8(v.into())
	}

	pub fn uuid4(v: Uuid) -> Self {
		Value::Uuid4(v)
	}

	pub fn is_undefined(&self) -> bool {
		matches!(self, Value::Undefined)
	}

	pub fn is_defined(&self) -> bool {
		!self.is_undefined()
	}

	pub fn get_type(&self) -> Type {
		match self {
			Value::Undefined => Type::Undefined,
			Value::Boolean(_) => Type::Boolean,
			Value::Int4(_) => Type::Int4,
			Value::Int8(_) => Type::Int8,
			Value::Float8(_) => Type::Float8,
			Value::Utf8(_) => Type::Utf8,
			Value::Uuid4(_) => Type::Uuid4,
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Value::Boolean(v) => Some(*v),
			_ => None,
		}
	}

	/// Equality as a join predicate sees it: absent never matches, not even
	/// another absent value.
	pub fn matches(&self, other: &Value) -> bool {
		if self.is_undefined() || other.is_undefined() {
			return false;
		}
		self.compare(other) == Some(Ordering::Equal)
	}

	/// Compares two defined values, promoting integers and floats so that
	/// `Int4(1)` and `Int8(1)` are equal. Returns `None` when either side is
	/// absent or the types are not comparable.
	pub fn compare(&self, other: &Value) -> Option<Ordering> {
		match (self, other) {
			(Value::Undefined, _) | (_, Value::Undefined) => None,
			(Value::Boolean(l), Value::Boolean(r)) => Some(l.cmp(r)),
			(Value::Int4(l), Value::Int4(r)) => Some(l.cmp(r)),
			(Value::Int8(l), Value::Int8(r)) => Some(l.cmp(r)),
			(Value::Int4(l), Value::Int8(r)) => Some((*l as i64).cmp(r)),
			(Value::Int8(l), Value::Int4(r)) => Some(l.cmp(&(*r as i64))),
			(Value::Float8(l), Value::Float8(r)) => Some(l.cmp(r)),
			(Value::Float8(l), Value::Int4(r)) => Some(compare_int_float(*r as i64, l.value()).reverse()),
			(Value::Float8(l), Value::Int8(r)) => Some(compare_int_float(*r, l.value()).reverse()),
			(Value::Int4(l), Value::Float8(r)) => Some(compare_int_float(*l as i64, r.value())),
			(Value::Int8(l), Value::Float8(r)) => Some(compare_int_float(*l, r.value())),
			(Value::Utf8(l), Value::Utf8(r)) => Some(l.cmp(r)),
			(Value::Uuid4(l), Value::Uuid4(r)) => Some(l.cmp(r)),
			_ => None,
		}
	}

	fn rank(&self) -> u8 {
		match self {
			Value::Undefined => 0,
			Value::Boolean(_) => 1,
			Value::Int4(_) | Value::Int8(_) | Value::Float8(_) => 2,
			Value::Utf8(_) => 3,
			Value::Uuid4(_) => 4,
		}
	}
}

/// 2^63, the first float above every `i64`.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Exact comparison of an integer with a float. Going through `f64` would
/// round large integers and make equality intransitive.
fn compare_int_float(int: i64, float: f64) -> Ordering {
	if float >= I64_BOUND {
		return Ordering::Less;
	}
	if float < -I64_BOUND {
		return Ordering::Greater;
	}
	let whole = float.trunc();
	match int.cmp(&(whole as i64)) {
		Ordering::Equal if float > whole => Ordering::Less,
		Ordering::Equal if float < whole => Ordering::Greater,
		ordering => ordering,
	}
}

/// The integer a float equals, if any.
fn integral(float: f64) -> Option<i64> {
	(float.fract() == 0.0 && float >= -I64_BOUND && float < I64_BOUND).then(|| float as i64)
}

/// Equality agrees with [`Ord`]: numbers are equal across widths.
impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == Ordering::Equal
	}
}

impl Eq for Value {}

impl Hash for Value {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.rank().hash(state);
		match self {
			Value::Undefined => {}
			Value::Boolean(v) => v.hash(state),
			Value::Int4(v) => (*v as i64).hash(state),
			Value::Int8(v) => v.hash(state),
			Value::Float8(v) => match integral(v.value()) {
				Some(int) => int.hash(state),
				None => v.hash(state),
			},
			Value::Utf8(v) => v.hash(state),
			Value::Uuid4(v) => v.hash(state),
		}
	}
}

impl PartialOrd for Value {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

/// Total order used by ordered probes and merge scans: absent sorts first,
/// then values grouped by kind, numbers compared across widths.
impl Ord for Value {
	fn cmp(&self, other: &Self) -> Ordering {
		match (self, other) {
			(Value::Undefined, Value::Undefined) => Ordering::Equal,
			_ => match self.compare(other) {
				Some(ordering) => ordering,
				None => self.rank().cmp(&other.rank()),
			},
		}
	}
}

impl Display for Value {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Value::Undefined => f.write_str("undefined"),
			Value::Boolean(v) => Display::fmt(v, f),
			Value::Int4(v) => Display::fmt(v, f),
			Value::Int8(v) => Display::fmt(v, f),
			Value::Float8(v) => Display::fmt(v, f),
			Value::Utf8(v) => write!(f, "\"{}\"", v),
			Value::Uuid4(v) => Display::fmt(v, f),
		}
	}
}

impl From<bool> for Value {
	fn from(v: bool) -> Self {
		Value::Boolean(v)
	}
}

impl From<i32> for Value {
	fn from(v: i32) -> Self {
		Value::Int4(v)
	}
}

impl From<i64> for Value {
	fn from(v: i64) -> Self {
		Value::Int8(v)
	}
}

impl From<f64> for Value {
	fn from(v: f64) -> Self {
		Value::float8(v)
	}
}

impl From<&str> for Value {
	fn from(v: &str) -> Self {
		Value::Utf8(v.to_string())
	}
}

impl From<String> for Value {
	fn from(v: String) -> Self {
		Value::Utf8(v)
	}
}

impl From<Uuid> for Value {
	fn from(v: Uuid) -> Self {
		Value::Uuid4(v)
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(v: Option<T>) -> Self {
		v.map(Into::into).unwrap_or(Value::Undefined)
	}
}

#[cfg(test)]
mod tests {
	use std::{cmp::Ordering, collections::HashSet};

	use super::*;

	#[test]
	fn test_undefined_never_matches() {
		assert!(!Value::Undefined.matches(&Value::Undefined));
		assert!(!Value::Undefined.matches(&Value::int4(1)));
		assert!(!Value::int4(1).matches(&Value::Undefined));
	}

	#[test]
	fn test_integer_widths_match() {
		assert!(Value::int4(7).matches(&Value::int8(7)));
		assert!(Value::int8(7).matches(&Value::float8(7.0)));
		assert!(!Value::int4(7).matches(&Value::int4(8)));
	}

	#[test]
	fn test_incomparable_types() {
		assert_eq!(Value::int4(1).compare(&Value::utf8("1")), None);
		assert!(!Value::bool(true).matches(&Value::int4(1)));
	}

	#[test]
	fn test_total_order_puts_undefined_first() {
		let mut values = vec![Value::utf8("b"), Value::int8(3), Value::Undefined, Value::int4(-1), Value::bool(false)];
		values.sort();
		assert_eq!(
			values,
			vec![Value::Undefined, Value::bool(false), Value::int4(-1), Value::int8(3), Value::utf8("b")]
		);
		assert_eq!(Value::int4(2).cmp(&Value::int8(2)), Ordering::Equal);
	}

	#[test]
	fn test_equality_follows_order() {
		assert_eq!(Value::int4(2), Value::int8(2));
		assert_eq!(Value::int8(2), Value::float8(2.0));
		assert_ne!(Value::int8(2), Value::float8(2.5));
		assert_ne!(Value::int4(1), Value::bool(true));

		let set: HashSet<Value> = [Value::int4(2), Value::int8(2), Value::float8(2.0), Value::float8(-0.0)]
			.into_iter()
			.collect();
		assert_eq!(set.len(), 2);
		assert!(set.contains(&Value::int8(0)));
	}

	#[test]
	fn test_large_integers_compare_exactly_with_floats() {
		// 2^53 + 1 has no f64 representation and rounds to 2^53
		let big = Value::int8((1i64 << 53) + 1);
		let float = Value::float8((1i64 << 53) as f64);
		assert_eq!(big.cmp(&float), Ordering::Greater);
		assert_ne!(big, float);
		assert_eq!(Value::int8(1i64 << 53), float);

		assert_eq!(Value::int8(i64::MAX).cmp(&Value::float8(9_223_372_036_854_775_808.0)), Ordering::Less);
		assert_eq!(Value::int8(i64::MIN), Value::float8(-9_223_372_036_854_775_808.0));
		assert_eq!(Value::int4(-3).cmp(&Value::float8(-2.5)), Ordering::Less);
		assert_eq!(Value::float8(f64::INFINITY).cmp(&Value::int8(i64::MAX)), Ordering::Greater);
	}

	#[test]
	fn test_float_nan_is_undefined() {
		assert_eq!(Value::float8(f64::NAN), Value::Undefined);
		assert_eq!(Value::float8(1.5).get_type(), Type::Float8);
	}

	#[test]
	fn test_option_into_value() {
		assert_eq!(Value::from(None::<i32>), Value::Undefined);
		assert_eq!(Value::from(Some("x")), Value::utf8("x"));
	}
}
