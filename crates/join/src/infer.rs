// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Key, nilability and cardinality inference for join results.

use relate_core::{Cardinality, ColumnDef, JoinKind, Key, Keys, RelationDef, Type};
use tracing::trace;

use crate::{
	JoinSide,
	policy::{JoinPolicy, PropagateAction},
};

/// Everything key inference looks at.
#[derive(Debug, Clone)]
pub struct KeyInference<'a> {
	pub left_keys: &'a Keys,
	pub right_keys: &'a Keys,
	pub left_key: &'a [String],
	pub right_key: &'a [String],
	pub merged: &'a [String],
	pub is_left_outer: bool,
	pub is_right_outer: bool,
	pub cardinality: Cardinality,
}

/// A join key is unique when it covers a candidate key of its relation.
pub fn is_unique(keys: &Keys, join_key: &[String]) -> bool {
	keys.is_unique(join_key)
}

pub fn cardinality(left_unique: bool, right_unique: bool) -> Cardinality {
	Cardinality::classify(left_unique, right_unique)
}

/// A lookup join is a detail lookup when the lookup side has a candidate key
/// strictly wider than its join key, i.e. one lookup key value can select
/// several rows of it.
pub fn is_detail_lookup(lookup_keys: &Keys, lookup_join_key: &[String]) -> bool {
	lookup_keys.proper_supersets_of(lookup_join_key).next().is_some()
}

/// Candidate keys of the join result, minimal and conservative about
/// sparseness.
pub fn infer_keys(input: &KeyInference) -> Keys {
	let left_optional = input.is_right_outer
		&& matches!(input.cardinality, Cardinality::OneToOne | Cardinality::OneToMany);
	let right_optional = input.is_left_outer
		&& matches!(input.cardinality, Cardinality::OneToOne | Cardinality::ManyToOne);

	let mut keys = Vec::new();
	for left in input.left_keys {
		for right in input.right_keys {
			// key A: a left key extended with the right key columns the
			// join does not already determine
			let mut columns = left.columns.clone();
			extend(&mut columns, &right.columns, input.right_key);
			let sparse = left.is_sparse || (left_optional && !is_trivial(left, input.merged));
			keys.push(key(columns, sparse));

			// key B, the mirror image
			let mut columns = right.columns.clone();
			extend(&mut columns, &left.columns, input.left_key);
			let sparse = right.is_sparse || (right_optional && !is_trivial(right, input.merged));
			keys.push(key(columns, sparse));
		}
	}

	let result = minimize(keys);
	trace!(keys = ?result, "inferred result keys");
	result
}

fn extend(columns: &mut Vec<String>, other: &[String], determined: &[String]) {
	for column in other {
		if !determined.contains(column) && !columns.contains(column) {
			columns.push(column.clone());
		}
	}
}

/// Every column of the key is supplied by the preserved side as well.
fn is_trivial(key: &Key, merged: &[String]) -> bool {
	key.columns.iter().all(|c| merged.contains(c))
}

fn key(columns: Vec<String>, sparse: bool) -> Key {
	// no columns means at most one row, with or without values
	let is_sparse = sparse && !columns.is_empty();
	Key {
		columns,
		is_sparse,
	}
}

/// Drops every key that is a non-proper superset of another key at least as
/// strong as itself. Of exact duplicates the first is kept, a non-sparse
/// one preferred.
pub fn minimize(keys: Vec<Key>) -> Keys {
	let mut result = Keys::new();
	for (i, key) in keys.iter().enumerate() {
		let dominated = keys.iter().enumerate().any(|(j, other)| i != j && dominates(other, key, j < i));
		if !dominated {
			result.push(key.clone());
		}
	}
	result
}

fn dominates(other: &Key, key: &Key, other_first: bool) -> bool {
	if !other.is_subset_of(&key.columns) {
		return false;
	}
	if other.is_sparse && !key.is_sparse {
		return false;
	}
	if other.same_columns(key) && other.is_sparse == key.is_sparse {
		return other_first;
	}
	true
}

/// Result columns: left columns, then right columns that are not merged,
/// then the row-exists column. Semi joins keep the left columns as they
/// are.
pub fn infer_columns(
	kind: JoinKind,
	left: &RelationDef,
	right: &RelationDef,
	merged: &[String],
	policy: &JoinPolicy,
	row_exists_column: Option<&str>,
) -> Vec<ColumnDef> {
	if kind.is_semi() {
		return left.columns.clone();
	}

	let preserved = match kind {
		JoinKind::LeftOuter => Some(JoinSide::Left),
		JoinKind::RightOuter => Some(JoinSide::Right),
		_ => None,
	};

	let nilable = |side: JoinSide, def: &ColumnDef, is_merged: bool| {
		let side_policy = policy.side(side);
		def.nilable
			|| side_policy.insert == PropagateAction::Suppress
			|| !side_policy.update
			|| (!is_merged && preserved.is_some_and(|p| p != side))
	};

	let mut columns = Vec::with_capacity(left.columns.len() + right.columns.len() + 1);
	for def in &left.columns {
		if merged.contains(&def.name) {
			let supplier = preserved.unwrap_or(JoinSide::Left);
			let source = match supplier {
				JoinSide::Left => def,
				JoinSide::Right => right.column(&def.name).unwrap_or(def),
			};
			columns.push(source.clone().with_nilable(nilable(supplier, source, true)));
		} else {
			columns.push(def.clone().with_nilable(nilable(JoinSide::Left, def, false)));
		}
	}
	for def in right.columns.iter().filter(|c| !merged.contains(&c.name)) {
		columns.push(def.clone().with_nilable(nilable(JoinSide::Right, def, false)));
	}
	if let Some(name) = row_exists_column {
		columns.push(ColumnDef::new(name, Type::Boolean));
	}
	columns
}
