// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Typed propagation policy, read once from a join's modifiers.

use relate_core::{JoinKind, Modifiers};
use relate_type::{Result, return_error};
use tracing::trace;

use crate::{JoinSide, error::JoinError};

pub const IS_LOOKUP: &str = "IsLookup";
pub const ENFORCE_PREDICATE: &str = "EnforcePredicate";
pub const UPDATE_LEFT_TO_RIGHT: &str = "UpdateLeftToRight";
pub const ANY_OF: &str = "AnyOf";
pub const ALL_OF: &str = "AllOf";

/// What inserting a result row does to one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropagateAction {
	/// Insert unconditionally.
	Propagate,
	/// Insert, or update the row already present under the join key.
	EnsureExists,
	/// Insert unless a row is already present under the join key.
	IgnoreIfExists,
	/// Leave the side alone.
	Suppress,
}

impl PropagateAction {
	fn parse(key: &str, value: &str) -> Result<Self> {
		match value.to_ascii_lowercase().as_str() {
			"propagate" | "true" => Ok(PropagateAction::Propagate),
			"ensure" | "ensureexists" => Ok(PropagateAction::EnsureExists),
			"ignoreifexists" => Ok(PropagateAction::IgnoreIfExists),
			"ignore" | "suppress" | "false" => Ok(PropagateAction::Suppress),
			_ => return_error!(JoinError::InvalidModifierValue {
				key: key.to_string(),
				value: value.to_string(),
				expected: "one of Propagate, Ensure, IgnoreIfExists, Ignore".to_string(),
			}),
		}
	}

	pub fn probes(&self) -> bool {
		matches!(self, PropagateAction::EnsureExists | PropagateAction::IgnoreIfExists)
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidePolicy {
	pub insert: PropagateAction,
	pub update: bool,
	pub delete: bool,
	pub default: bool,
	pub change: bool,
	pub validate: bool,
	/// Re-fetch this side by join key when the other side's key is edited.
	pub retrieve: bool,
	/// Clear this side's columns when a re-fetch misses or the row stops
	/// existing.
	pub clear: bool,
	/// Copy edited join key values across to this side.
	pub coordinate: bool,
}

impl Default for SidePolicy {
	fn default() -> Self {
		Self {
			insert: PropagateAction::Propagate,
			update: true,
			delete: true,
			default: true,
			change: true,
			validate: true,
			retrieve: true,
			clear: true,
			coordinate: true,
		}
	}
}

impl SidePolicy {
	fn suppressed() -> Self {
		Self {
			insert: PropagateAction::Suppress,
			update: false,
			delete: false,
			default: false,
			change: false,
			validate: false,
			retrieve: false,
			clear: false,
			coordinate: false,
		}
	}

	fn lookup() -> Self {
		Self {
			insert: PropagateAction::Suppress,
			update: false,
			delete: false,
			..Self::default()
		}
	}

	fn read(mut self, modifiers: &Modifiers, side: JoinSide) -> Result<Self> {
		let suffix = side.suffix();
		let key = format!("PropagateInsert{}", suffix);
		if let Some(value) = modifiers.get(&key) {
			self.insert = PropagateAction::parse(&key, value)?;
		}
		for (name, slot) in [
			("PropagateUpdate", &mut self.update),
			("PropagateDelete", &mut self.delete),
			("PropagateDefault", &mut self.default),
			("PropagateChange", &mut self.change),
			("PropagateValidate", &mut self.validate),
			("Retrieve", &mut self.retrieve),
			("Clear", &mut self.clear),
			("Coordinate", &mut self.coordinate),
		] {
			let key = format!("{}{}", name, suffix);
			if let Some(value) = parse_bool(modifiers, &key)? {
				*slot = value;
			}
		}
		Ok(self)
	}
}

/// What the binder knows about a join when its policy is resolved.
#[derive(Debug, Clone)]
pub struct PolicyContext<'a> {
	pub kind: JoinKind,
	pub has_key: bool,
	pub left_unique: bool,
	pub right_unique: bool,
	pub is_detail_lookup: bool,
	/// Columns of the side an outer join does not preserve.
	pub non_preserved_columns: &'a [String],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinPolicy {
	pub left: SidePolicy,
	pub right: SidePolicy,
	pub update_left_to_right: bool,
	pub is_lookup: bool,
	pub is_detail_lookup: bool,
	pub enforce_predicate: bool,
	pub any_of: Option<Vec<String>>,
	pub all_of: Option<Vec<String>>,
}

impl JoinPolicy {
	pub fn side(&self, side: JoinSide) -> &SidePolicy {
		match side {
			JoinSide::Left => &self.left,
			JoinSide::Right => &self.right,
		}
	}

	/// Sides in the order mutations are applied.
	pub fn sides(&self) -> [JoinSide; 2] {
		if self.update_left_to_right {
			[JoinSide::Left, JoinSide::Right]
		} else {
			[JoinSide::Right, JoinSide::Left]
		}
	}

	/// Whether `modifiers` declare a lookup join, before anything else is
	/// parsed.
	pub fn is_lookup(modifiers: &Modifiers) -> Result<bool> {
		Ok(parse_bool(modifiers, IS_LOOKUP)?.unwrap_or(false))
	}

	pub fn from_modifiers(modifiers: &Modifiers, context: &PolicyContext) -> Result<Self> {
		let is_lookup = Self::is_lookup(modifiers)?;
		let lookup_side = match context.kind {
			JoinKind::RightOuter => JoinSide::Left,
			_ => JoinSide::Right,
		};

		let defaults = |side: JoinSide| {
			if context.kind.is_semi() && side == JoinSide::Right {
				SidePolicy::suppressed()
			} else if is_lookup && side == lookup_side && !context.is_detail_lookup {
				SidePolicy::lookup()
			} else {
				SidePolicy::default()
			}
		};

		let left = defaults(JoinSide::Left).read(modifiers, JoinSide::Left)?;
		let right = if context.kind.is_semi() {
			SidePolicy::suppressed()
		} else {
			defaults(JoinSide::Right).read(modifiers, JoinSide::Right)?
		};

		let update_left_to_right = parse_bool(modifiers, UPDATE_LEFT_TO_RIGHT)?
			.unwrap_or(!(context.right_unique && !context.left_unique));

		let policy = Self {
			left,
			right,
			update_left_to_right,
			is_lookup,
			is_detail_lookup: is_lookup && context.is_detail_lookup,
			enforce_predicate: parse_bool(modifiers, ENFORCE_PREDICATE)?.unwrap_or(false),
			any_of: parse_columns(modifiers, ANY_OF),
			all_of: parse_columns(modifiers, ALL_OF),
		};
		policy.check(context)?;

		trace!(?policy, "resolved join policy");
		Ok(policy)
	}

	fn check(&self, context: &PolicyContext) -> Result<()> {
		for side in [JoinSide::Left, JoinSide::Right] {
			if self.side(side).insert.probes() && !context.has_key {
				return_error!(JoinError::InvalidPropagationPolicy {
					reason: format!(
						"PropagateInsert{} probes by join key, but the join has no key",
						side.suffix()
					),
				});
			}
		}

		for (name, columns) in [(ANY_OF, &self.any_of), (ALL_OF, &self.all_of)] {
			let Some(columns) = columns else {
				continue;
			};
			if !context.kind.is_outer() {
				return_error!(JoinError::InvalidPropagationPolicy {
					reason: format!("{} only applies to outer joins", name),
				});
			}
			if let Some(column) = columns.iter().find(|c| !context.non_preserved_columns.contains(c)) {
				return_error!(JoinError::InvalidPropagationPolicy {
					reason: format!("{} names '{}', which is not a column of the optional side", name, column),
				});
			}
		}
		Ok(())
	}
}

fn parse_bool(modifiers: &Modifiers, key: &str) -> Result<Option<bool>> {
	let Some(value) = modifiers.get(key) else {
		return Ok(None);
	};
	match value.to_ascii_lowercase().as_str() {
		"true" => Ok(Some(true)),
		"false" => Ok(Some(false)),
		_ => return_error!(JoinError::InvalidModifierValue {
			key: key.to_string(),
			value: value.to_string(),
			expected: "true or false".to_string(),
		}),
	}
}

fn parse_columns(modifiers: &Modifiers, key: &str) -> Option<Vec<String>> {
	modifiers.get(key).map(|value| {
		value.split(',').map(str::trim).filter(|c| !c.is_empty()).map(str::to_string).collect()
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	fn context<'a>(kind: JoinKind) -> PolicyContext<'a> {
		PolicyContext {
			kind,
			has_key: true,
			left_unique: true,
			right_unique: false,
			is_detail_lookup: false,
			non_preserved_columns: &[],
		}
	}

	#[test]
	fn test_defaults_propagate_everything() {
		let policy = JoinPolicy::from_modifiers(&Modifiers::new(), &context(JoinKind::Inner)).unwrap();
		assert_eq!(policy.left, SidePolicy::default());
		assert_eq!(policy.right, SidePolicy::default());
		assert!(policy.update_left_to_right);
		assert!(!policy.enforce_predicate);
	}

	#[test]
	fn test_update_order_follows_uniqueness() {
		let mut ctx = context(JoinKind::Inner);
		ctx.left_unique = false;
		ctx.right_unique = true;
		let policy = JoinPolicy::from_modifiers(&Modifiers::new(), &ctx).unwrap();
		assert_eq!(policy.sides(), [JoinSide::Right, JoinSide::Left]);

		let policy =
			JoinPolicy::from_modifiers(&Modifiers::new().with(UPDATE_LEFT_TO_RIGHT, "true"), &ctx).unwrap();
		assert_eq!(policy.sides(), [JoinSide::Left, JoinSide::Right]);
	}

	#[test]
	fn test_insert_actions() {
		let modifiers = Modifiers::new().with("PropagateInsertLeft", "Ignore").with("PropagateInsertRight", "Ensure");
		let policy = JoinPolicy::from_modifiers(&modifiers, &context(JoinKind::Inner)).unwrap();
		assert_eq!(policy.left.insert, PropagateAction::Suppress);
		assert_eq!(policy.right.insert, PropagateAction::EnsureExists);
	}

	#[test]
	fn test_invalid_values() {
		let err = JoinPolicy::from_modifiers(
			&Modifiers::new().with("PropagateUpdateRight", "sometimes"),
			&context(JoinKind::Inner),
		)
		.unwrap_err();
		assert_eq!(err.code(), "JOIN_007");

		let err = JoinPolicy::from_modifiers(
			&Modifiers::new().with("PropagateInsertRight", "Maybe"),
			&context(JoinKind::Inner),
		)
		.unwrap_err();
		assert_eq!(err.code(), "JOIN_007");
	}

	#[test]
	fn test_ensure_requires_key() {
		let mut ctx = context(JoinKind::Inner);
		ctx.has_key = false;
		let err = JoinPolicy::from_modifiers(&Modifiers::new().with("PropagateInsertLeft", "EnsureExists"), &ctx)
			.unwrap_err();
		assert_eq!(err.code(), "JOIN_008");
	}

	#[test]
	fn test_lookup_suppresses_lookup_side() {
		let modifiers = Modifiers::new().with(IS_LOOKUP, "true");
		let policy = JoinPolicy::from_modifiers(&modifiers, &context(JoinKind::LeftOuter)).unwrap();
		assert_eq!(policy.left, SidePolicy::default());
		assert_eq!(policy.right.insert, PropagateAction::Suppress);
		assert!(!policy.right.update);
		assert!(!policy.right.delete);

		let policy = JoinPolicy::from_modifiers(&modifiers, &context(JoinKind::RightOuter)).unwrap();
		assert_eq!(policy.left.insert, PropagateAction::Suppress);
		assert_eq!(policy.right, SidePolicy::default());
	}

	#[test]
	fn test_detail_lookup_keeps_propagation() {
		let mut ctx = context(JoinKind::Inner);
		ctx.is_detail_lookup = true;
		let policy = JoinPolicy::from_modifiers(&Modifiers::new().with(IS_LOOKUP, "true"), &ctx).unwrap();
		assert!(policy.is_detail_lookup);
		assert_eq!(policy.right, SidePolicy::default());
	}

	#[test]
	fn test_any_of_rules() {
		let columns = vec!["name".to_string(), "note".to_string()];
		let mut ctx = context(JoinKind::LeftOuter);
		ctx.non_preserved_columns = &columns;

		let policy = JoinPolicy::from_modifiers(&Modifiers::new().with(ANY_OF, "name, note"), &ctx).unwrap();
		assert_eq!(policy.any_of, Some(columns.clone()));

		let err = JoinPolicy::from_modifiers(&Modifiers::new().with(ALL_OF, "missing"), &ctx).unwrap_err();
		assert_eq!(err.code(), "JOIN_008");

		let err = JoinPolicy::from_modifiers(&Modifiers::new().with(ANY_OF, "name"), &context(JoinKind::Inner))
			.unwrap_err();
		assert_eq!(err.code(), "JOIN_008");
	}

	#[test]
	fn test_semi_never_touches_right() {
		let modifiers = Modifiers::new().with("PropagateInsertRight", "Propagate");
		let policy = JoinPolicy::from_modifiers(&modifiers, &context(JoinKind::Having)).unwrap();
		assert_eq!(policy.right.insert, PropagateAction::Suppress);
		assert!(!policy.right.update);
	}
}
