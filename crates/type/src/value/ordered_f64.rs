// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	cmp::Ordering,
	fmt,
	fmt::{Display, Formatter},
	hash::{Hash, Hasher},
	ops::Deref,
};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("NaN is not a valid ordered float")]
pub struct OrderedFloatError;

#[repr(transparent)]
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize)]
pub struct OrderedF64(f64);

impl OrderedF64 {
	pub fn value(&self) -> f64 {
		self.0
	}

	pub fn zero() -> OrderedF64 {
		OrderedF64(0.0f64)
	}
}

impl Deref for OrderedF64 {
	type Target = f64;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl Display for OrderedF64 {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		Display::fmt(&self.0, f)
	}
}

impl PartialEq for OrderedF64 {
	fn eq(&self, other: &Self) -> bool {
		self.0.to_bits() == other.0.to_bits()
	}
}

impl Eq for OrderedF64 {}

impl PartialOrd for OrderedF64 {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for OrderedF64 {
	fn cmp(&self, other: &Self) -> Ordering {
		self.0.total_cmp(&other.0)
	}
}

impl Hash for OrderedF64 {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.0.to_bits().hash(state);
	}
}

impl From<OrderedF64> for f64 {
	fn from(v: OrderedF64) -> Self {
		v.0
	}
}

impl TryFrom<f64> for OrderedF64 {
	type Error = OrderedFloatError;

	fn try_from(f: f64) -> Result<Self, Self::Error> {
		// -0.0 and 0.0 must hash and compare alike
		let normalized = if f == 0.0 {
			0.0
		} else {
			f
		};
		if f.is_nan() {
			Err(OrderedFloatError)
		} else {
			Ok(OrderedF64(normalized))
		}
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use super::*;

	#[test]
	fn test_sorting_with_negatives() {
		let mut values = vec![
			OrderedF64::try_from(10.0).unwrap(),
			OrderedF64::try_from(-2.5).unwrap(),
			OrderedF64::try_from(5.0).unwrap(),
			OrderedF64::try_from(-7.0).unwrap(),
		];
		values.sort();
		let sorted: Vec<f64> = values.into_iter().map(|v| v.value()).collect();
		assert_eq!(sorted, vec![-7.0, -2.5, 5.0, 10.0]);
	}

	#[test]
	fn test_zero_normalization() {
		let a = OrderedF64::try_from(0.0).unwrap();
		let b = OrderedF64::try_from(-0.0).unwrap();
		assert_eq!(a, b);

		let mut set = HashSet::new();
		set.insert(a);
		assert!(set.contains(&b));
	}

	#[test]
	fn test_nan_rejected() {
		assert_eq!(OrderedF64::try_from(f64::NAN), Err(OrderedFloatError));
	}
}
