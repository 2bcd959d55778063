// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Physical algorithm selection.

use std::fmt::{Display, Formatter};

use relate_core::{JoinKind, Order, RelationDef};
use tracing::trace;

use crate::{JoinConfig, JoinSide};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinAlgorithm {
	/// Every row of one side against every row of the other.
	Product,
	/// Co-sorted scan of both sides. The orders list their key columns in
	/// correlated positions.
	Merge {
		left_order: Order,
		right_order: Order,
	},
	/// Scan the other side and probe `side` through `order`.
	Search {
		side: JoinSide,
		order: Order,
	},
	/// Compare every pair of rows. When `unique` names a side, at most one
	/// of its rows matches.
	NestedLoop {
		unique: Option<JoinSide>,
	},
}

impl Display for JoinAlgorithm {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			JoinAlgorithm::Product => f.write_str("product"),
			JoinAlgorithm::Merge {
				..
			} => f.write_str("merge"),
			JoinAlgorithm::Search {
				side,
				..
			} => write!(f, "search({})", side),
			JoinAlgorithm::NestedLoop {
				unique: Some(side),
			} => write!(f, "nested loop (unique {})", side),
			JoinAlgorithm::NestedLoop {
				unique: None,
			} => f.write_str("nested loop"),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
	pub algorithm: JoinAlgorithm,
	/// An ordering the join builds for one side because neither side had
	/// one.
	pub injected: Option<(JoinSide, Order)>,
	pub output_order: Option<Order>,
}

#[derive(Debug, Clone)]
pub struct SelectionInput<'a> {
	pub kind: JoinKind,
	pub left: &'a RelationDef,
	pub right: &'a RelationDef,
	pub left_key: &'a [String],
	pub right_key: &'a [String],
	pub left_unique: bool,
	pub right_unique: bool,
}

impl SelectionInput<'_> {
	fn definition(&self, side: JoinSide) -> &RelationDef {
		match side {
			JoinSide::Left => self.left,
			JoinSide::Right => self.right,
		}
	}

	fn key(&self, side: JoinSide) -> &[String] {
		match side {
			JoinSide::Left => self.left_key,
			JoinSide::Right => self.right_key,
		}
	}

	fn is_unique(&self, side: JoinSide) -> bool {
		match side {
			JoinSide::Left => self.left_unique,
			JoinSide::Right => self.right_unique,
		}
	}

	/// Outer joins scan the side they preserve, semi joins scan the left.
	fn may_probe(&self, side: JoinSide) -> bool {
		match self.kind {
			JoinKind::LeftOuter | JoinKind::Having | JoinKind::Without => side == JoinSide::Right,
			JoinKind::RightOuter => side == JoinSide::Left,
			JoinKind::Inner | JoinKind::Times => true,
		}
	}

	/// The side nested iteration drives from.
	fn outer(&self) -> JoinSide {
		match self.kind {
			JoinKind::RightOuter => JoinSide::Right,
			_ => JoinSide::Left,
		}
	}

	/// Prefers a unique side, then the right one.
	fn preferred(&self, candidates: &[JoinSide]) -> Option<JoinSide> {
		let unique: Vec<JoinSide> = candidates.iter().copied().filter(|s| self.is_unique(*s)).collect();
		let pool = if unique.len() == 1 {
			unique
		} else {
			candidates.to_vec()
		};
		if pool.contains(&JoinSide::Right) {
			Some(JoinSide::Right)
		} else {
			pool.first().copied()
		}
	}
}

pub fn select_algorithm(input: &SelectionInput, config: &JoinConfig) -> Selection {
	let selection = select(input, config);
	trace!(
		algorithm = %selection.algorithm,
		injected = ?selection.injected,
		"selected join algorithm"
	);
	selection
}

fn select(input: &SelectionInput, config: &JoinConfig) -> Selection {
	let outer_order = || input.definition(input.outer()).orders.first().cloned();

	if input.left_key.is_empty() {
		return Selection {
			algorithm: JoinAlgorithm::Product,
			injected: None,
			output_order: outer_order(),
		};
	}

	let mut left_order = input.left.order_covering(input.left_key).cloned();
	let mut right_order = input.right.order_covering(input.right_key).cloned();
	let mut injected = None;

	// an order the join may not probe through counts as no order at all
	let usable = |side: JoinSide, order: &Option<Order>| order.is_some() && input.may_probe(side);
	let mergeable = |left: &Option<Order>, right: &Option<Order>| match (left, right) {
		(Some(left), Some(right)) => {
			!input.kind.is_semi()
				&& (input.left_unique || input.right_unique)
				&& aligned(left, right, input.left_key, input.right_key).is_some()
		}
		_ => false,
	};

	if config.inject_ordering
		&& !mergeable(&left_order, &right_order)
		&& !usable(JoinSide::Left, &left_order)
		&& !usable(JoinSide::Right, &right_order)
	{
		let candidates: Vec<JoinSide> =
			[JoinSide::Left, JoinSide::Right].into_iter().filter(|s| input.may_probe(*s)).collect();
		if let Some(side) = input.preferred(&candidates) {
			let order = Order::ascending(input.key(side).iter().cloned());
			match side {
				JoinSide::Left => left_order = Some(order.clone()),
				JoinSide::Right => right_order = Some(order.clone()),
			}
			injected = Some((side, order));
		}
	}

	if !input.kind.is_semi() && (input.left_unique || input.right_unique) {
		if let (Some(left), Some(right)) = (&left_order, &right_order) {
			if let Some((left_order, right_order)) = aligned(left, right, input.left_key, input.right_key) {
				let preserved = match input.kind {
					JoinKind::RightOuter => &right_order,
					_ => &left_order,
				};
				let output_order = Some(preserved.clone());
				return Selection {
					algorithm: JoinAlgorithm::Merge {
						left_order,
						right_order,
					},
					injected,
					output_order,
				};
			}
		}
	}

	let probeable: Vec<JoinSide> = [(JoinSide::Left, &left_order), (JoinSide::Right, &right_order)]
		.into_iter()
		.filter(|(side, order)| order.is_some() && input.may_probe(*side))
		.map(|(side, _)| side)
		.collect();
	if let Some(side) = input.preferred(&probeable) {
		let order = match side {
			JoinSide::Left => left_order,
			JoinSide::Right => right_order,
		};
		if let Some(order) = order {
			let scanned = side.other();
			return Selection {
				algorithm: JoinAlgorithm::Search {
					side,
					order: order.prefix(input.key(side).len()),
				},
				injected,
				output_order: input.definition(scanned).orders.first().cloned(),
			};
		}
	}

	let unique = if input.right_unique {
		Some(JoinSide::Right)
	} else if input.left_unique {
		Some(JoinSide::Left)
	} else {
		None
	};
	Selection {
		algorithm: JoinAlgorithm::NestedLoop {
			unique,
		},
		injected,
		output_order: outer_order(),
	}
}

/// Key prefixes of both orders when position `i` of one names the column the
/// other's position `i` is correlated with, in the same direction.
fn aligned(left: &Order, right: &Order, left_key: &[String], right_key: &[String]) -> Option<(Order, Order)> {
	let len = left_key.len();
	let mut left_columns = Vec::with_capacity(len);
	let mut right_columns = Vec::with_capacity(len);
	for (l, r) in left.columns.iter().take(len).zip(right.columns.iter().take(len)) {
		let position = left_key.iter().position(|c| c == &l.column)?;
		if right_key[position] != r.column || l.ascending != r.ascending {
			return None;
		}
		left_columns.push(l.clone());
		right_columns.push(r.clone());
	}
	if left_columns.len() != len {
		return None;
	}
	Some((Order::new(left_columns), Order::new(right_columns)))
}

#[cfg(test)]
mod tests {
	use relate_core::{ColumnDef, OrderColumn, Type};

	use super::*;

	fn relation(name: &str, columns: &[&str]) -> RelationDef {
		RelationDef::new(name, columns.iter().map(|c| ColumnDef::new(*c, Type::Int8)).collect())
	}

	fn strings(columns: &[&str]) -> Vec<String> {
		columns.iter().map(|c| c.to_string()).collect()
	}

	fn input<'a>(
		kind: JoinKind,
		left: &'a RelationDef,
		right: &'a RelationDef,
		left_key: &'a [String],
		right_key: &'a [String],
		unique: (bool, bool),
	) -> SelectionInput<'a> {
		SelectionInput {
			kind,
			left,
			right,
			left_key,
			right_key,
			left_unique: unique.0,
			right_unique: unique.1,
		}
	}

	#[test]
	fn test_product_without_key() {
		let left = relation("l", &["a"]).with_order(Order::ascending(["a"]));
		let right = relation("r", &["b"]);
		let selection =
			select_algorithm(&input(JoinKind::Times, &left, &right, &[], &[], (false, false)), &JoinConfig::default());
		assert_eq!(selection.algorithm, JoinAlgorithm::Product);
		assert_eq!(selection.injected, None);
		assert_eq!(selection.output_order, Some(Order::ascending(["a"])));
	}

	#[test]
	fn test_merge_when_both_ordered_and_unique() {
		let left = relation("l", &["id", "v"]).with_order(Order::ascending(["id"]));
		let right = relation("r", &["rid", "w"]).with_order(Order::ascending(["rid", "w"]));
		let (lk, rk) = (strings(&["id"]), strings(&["rid"]));
		let selection =
			select_algorithm(&input(JoinKind::Inner, &left, &right, &lk, &rk, (true, true)), &JoinConfig::default());
		assert_eq!(
			selection.algorithm,
			JoinAlgorithm::Merge {
				left_order: Order::ascending(["id"]),
				right_order: Order::ascending(["rid"]),
			}
		);
		assert_eq!(selection.output_order, Some(Order::ascending(["id"])));
	}

	#[test]
	fn test_merge_needs_a_unique_key() {
		let left = relation("l", &["id"]).with_order(Order::ascending(["id"]));
		let right = relation("r", &["rid"]).with_order(Order::ascending(["rid"]));
		let (lk, rk) = (strings(&["id"]), strings(&["rid"]));
		let selection =
			select_algorithm(&input(JoinKind::Inner, &left, &right, &lk, &rk, (false, false)), &JoinConfig::default());
		assert!(matches!(
			selection.algorithm,
			JoinAlgorithm::Search {
				side: JoinSide::Right,
				..
			}
		));
	}

	#[test]
	fn test_merge_requires_matching_directions() {
		let left = relation("l", &["a", "b"])
			.with_order(Order::new(vec![OrderColumn::asc("a"), OrderColumn::desc("b")]));
		let right = relation("r", &["x", "y"])
			.with_order(Order::new(vec![OrderColumn::asc("x"), OrderColumn::asc("y")]));
		let (lk, rk) = (strings(&["a", "b"]), strings(&["x", "y"]));
		let selection =
			select_algorithm(&input(JoinKind::Inner, &left, &right, &lk, &rk, (true, true)), &JoinConfig::default());
		assert!(matches!(selection.algorithm, JoinAlgorithm::Search { .. }));
	}

	#[test]
	fn test_merge_follows_key_correlation() {
		let left = relation("l", &["a", "b"]).with_order(Order::ascending(["b", "a"]));
		let right = relation("r", &["x", "y"]).with_order(Order::ascending(["y", "x"]));
		let (lk, rk) = (strings(&["a", "b"]), strings(&["x", "y"]));
		let selection =
			select_algorithm(&input(JoinKind::Inner, &left, &right, &lk, &rk, (true, false)), &JoinConfig::default());
		assert!(matches!(selection.algorithm, JoinAlgorithm::Merge { .. }));

		let right = relation("r", &["x", "y"]).with_order(Order::ascending(["x", "y"]));
		let selection =
			select_algorithm(&input(JoinKind::Inner, &left, &right, &lk, &rk, (true, false)), &JoinConfig::default());
		assert!(matches!(selection.algorithm, JoinAlgorithm::Search { .. }));
	}

	#[test]
	fn test_search_on_the_ordered_side() {
		let left = relation("l", &["id"]).with_order(Order::ascending(["id"]));
		let right = relation("r", &["rid", "n"]).with_order(Order::ascending(["n"]));
		let (lk, rk) = (strings(&["id"]), strings(&["rid"]));
		let selection =
			select_algorithm(&input(JoinKind::Inner, &left, &right, &lk, &rk, (true, false)), &JoinConfig::default());
		assert_eq!(
			selection.algorithm,
			JoinAlgorithm::Search {
				side: JoinSide::Left,
				order: Order::ascending(["id"]),
			}
		);
		assert_eq!(selection.injected, None);
		assert_eq!(selection.output_order, Some(Order::ascending(["n"])));
	}

	#[test]
	fn test_injection_prefers_unique_side() {
		let left = relation("l", &["id"]);
		let right = relation("r", &["rid"]);
		let (lk, rk) = (strings(&["id"]), strings(&["rid"]));

		let selection =
			select_algorithm(&input(JoinKind::Inner, &left, &right, &lk, &rk, (true, false)), &JoinConfig::default());
		assert_eq!(selection.injected, Some((JoinSide::Left, Order::ascending(["id"]))));
		assert!(matches!(
			selection.algorithm,
			JoinAlgorithm::Search {
				side: JoinSide::Left,
				..
			}
		));

		for unique in [(true, true), (false, false), (false, true)] {
			let selection =
				select_algorithm(&input(JoinKind::Inner, &left, &right, &lk, &rk, unique), &JoinConfig::default());
			assert_eq!(selection.injected, Some((JoinSide::Right, Order::ascending(["rid"]))));
		}
	}

	#[test]
	fn test_outer_join_probes_optional_side() {
		let left = relation("l", &["id"]).with_order(Order::ascending(["id"]));
		let right = relation("r", &["rid"]);
		let (lk, rk) = (strings(&["id"]), strings(&["rid"]));

		// the preserved side's order cannot be probed, so the other side gets one
		let selection = select_algorithm(
			&input(JoinKind::LeftOuter, &left, &right, &lk, &rk, (true, false)),
			&JoinConfig::default(),
		);
		assert_eq!(selection.injected, Some((JoinSide::Right, Order::ascending(["rid"]))));
		assert!(matches!(selection.algorithm, JoinAlgorithm::Merge { .. }));
		assert_eq!(selection.output_order, Some(Order::ascending(["id"])));

		let config = JoinConfig {
			inject_ordering: false,
			..JoinConfig::default()
		};
		let selection =
			select_algorithm(&input(JoinKind::LeftOuter, &left, &right, &lk, &rk, (true, false)), &config);
		assert!(matches!(
			selection.algorithm,
			JoinAlgorithm::NestedLoop {
				unique: Some(JoinSide::Left)
			}
		));

		let left = relation("l", &["id"]);
		let selection = select_algorithm(
			&input(JoinKind::RightOuter, &left, &right, &lk, &rk, (false, true)),
			&JoinConfig::default(),
		);
		assert_eq!(selection.injected, Some((JoinSide::Left, Order::ascending(["id"]))));
	}

	#[test]
	fn test_semi_join_probes_right() {
		let left = relation("l", &["id"]);
		let right = relation("r", &["rid"]);
		let (lk, rk) = (strings(&["id"]), strings(&["rid"]));
		let selection = select_algorithm(
			&input(JoinKind::Without, &left, &right, &lk, &rk, (true, true)),
			&JoinConfig::default(),
		);
		assert_eq!(selection.injected, Some((JoinSide::Right, Order::ascending(["rid"]))));
		assert!(matches!(
			selection.algorithm,
			JoinAlgorithm::Search {
				side: JoinSide::Right,
				..
			}
		));
	}

	#[test]
	fn test_nested_loop_without_injection() {
		let left = relation("l", &["id"]);
		let right = relation("r", &["rid"]);
		let (lk, rk) = (strings(&["id"]), strings(&["rid"]));
		let config = JoinConfig {
			inject_ordering: false,
			..JoinConfig::default()
		};
		let selection = select_algorithm(&input(JoinKind::Inner, &left, &right, &lk, &rk, (false, true)), &config);
		assert_eq!(
			selection.algorithm,
			JoinAlgorithm::NestedLoop {
				unique: Some(JoinSide::Right)
			}
		);
		assert_eq!(selection.injected, None);

		let selection = select_algorithm(&input(JoinKind::Inner, &left, &right, &lk, &rk, (false, false)), &config);
		assert_eq!(
			selection.algorithm,
			JoinAlgorithm::NestedLoop {
				unique: None
			}
		);
	}
}
