// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Binding: analysis, inference, policy and algorithm selection run once
//! per join and produce an immutable plan and the node executing it.

use std::sync::Arc;

use relate_core::{
	Capabilities, Catalog, JoinExpression, JoinKind, RelationDef, RowHeader, SourceExpression, TableNode,
};
use relate_type::{Diagnostic, Result, err, return_error};
use tracing::{debug, instrument};

use crate::{
	InnerJoinNode, JoinBuilder, JoinConfig, JoinPlan, OuterJoinNode, SemiJoinNode,
	analyze::analyze,
	error::JoinError,
	infer::{KeyInference, cardinality, infer_columns, infer_keys, is_detail_lookup, is_unique},
	policy::{JoinPolicy, PolicyContext},
	select::{SelectionInput, select_algorithm},
};

/// A bound join, ready to execute.
#[derive(Clone)]
pub enum BoundJoin {
	Inner(Arc<InnerJoinNode>),
	Outer(Arc<OuterJoinNode>),
	Semi(Arc<SemiJoinNode>),
}

impl BoundJoin {
	pub fn plan(&self) -> &Arc<JoinPlan> {
		match self {
			BoundJoin::Inner(node) => node.plan(),
			BoundJoin::Outer(node) => node.plan(),
			BoundJoin::Semi(node) => node.plan(),
		}
	}

	pub fn node(&self) -> Arc<dyn TableNode> {
		match self {
			BoundJoin::Inner(node) => node.clone(),
			BoundJoin::Outer(node) => node.clone(),
			BoundJoin::Semi(node) => node.clone(),
		}
	}

	/// Advisories raised while binding. They never fail the bind.
	pub fn warnings(&self) -> &[Diagnostic] {
		&self.plan().warnings
	}
}

#[instrument(name = "join::bind", level = "trace", skip_all, fields(kind = %builder.kind))]
pub(crate) fn bind(builder: JoinBuilder) -> Result<BoundJoin> {
	let JoinBuilder {
		kind,
		left,
		right,
		condition,
		row_exists_column,
		modifiers,
		config,
	} = builder;
	let left_def = left.definition();
	let right_def = right.definition();

	let analysis = analyze(kind, left_def, right_def, condition.as_ref(), &config)?;
	let left_unique = is_unique(&left_def.keys, &analysis.left_key);
	let right_unique = is_unique(&right_def.keys, &analysis.right_key);
	let cardinality = cardinality(left_unique, right_unique);

	let (lookup_def, lookup_key) = match kind {
		JoinKind::RightOuter => (left_def, &analysis.left_key),
		_ => (right_def, &analysis.right_key),
	};
	let is_detail_lookup = JoinPolicy::is_lookup(&modifiers)? && is_detail_lookup(&lookup_def.keys, lookup_key);

	let non_preserved_columns = match kind {
		JoinKind::LeftOuter => right_def.column_names(),
		JoinKind::RightOuter => left_def.column_names(),
		_ => vec![],
	};
	let policy = JoinPolicy::from_modifiers(
		&modifiers,
		&PolicyContext {
			kind,
			has_key: !analysis.is_product(),
			left_unique,
			right_unique,
			is_detail_lookup,
			non_preserved_columns: &non_preserved_columns,
		},
	)?;

	if let Some(column) = &row_exists_column {
		if !kind.is_outer() {
			return_error!(JoinError::InvalidPropagationPolicy {
				reason: format!("row exists column '{}' needs an outer join", column),
			});
		}
		if left_def.contains(column) || right_def.contains(column) {
			return_error!(JoinError::TableExpressionsNotProductCompatible {
				column: column.clone(),
			});
		}
	}

	let keys = if kind.is_semi() {
		left_def.keys.clone()
	} else {
		infer_keys(&KeyInference {
			left_keys: &left_def.keys,
			right_keys: &right_def.keys,
			left_key: &analysis.left_key,
			right_key: &analysis.right_key,
			merged: &analysis.merged,
			is_left_outer: kind == JoinKind::LeftOuter,
			is_right_outer: kind == JoinKind::RightOuter,
			cardinality,
		})
	};
	let columns =
		infer_columns(kind, left_def, right_def, &analysis.merged, &policy, row_exists_column.as_deref());

	let selection = select_algorithm(
		&SelectionInput {
			kind,
			left: left_def,
			right: right_def,
			left_key: &analysis.left_key,
			right_key: &analysis.right_key,
			left_unique,
			right_unique,
		},
		&config,
	);

	let mut definition = if kind.is_semi() {
		left_def.clone()
	} else {
		let mut definition = RelationDef::new(format!("{}_{}", left_def.name, right_def.name), columns);
		definition.orders = selection.output_order.iter().cloned().collect();
		definition.capabilities = capabilities(kind, left_def, right_def, &policy);
		definition.should_default = left_def.should_default || right_def.should_default;
		definition.should_change = left_def.should_change || right_def.should_change;
		definition.should_validate = left_def.should_validate || right_def.should_validate;
		definition
	};
	definition.keys = keys;

	let header = Arc::new(RowHeader::new(definition.columns.iter().map(|c| c.name.clone())));
	let plan = Arc::new(JoinPlan {
		kind,
		natural: analysis.natural,
		condition: analysis.condition,
		bound_condition: analysis.bound_condition,
		left_key: analysis.left_key,
		right_key: analysis.right_key,
		merged: analysis.merged,
		left_unique,
		right_unique,
		cardinality,
		algorithm: selection.algorithm,
		injected: selection.injected,
		policy,
		definition,
		header,
		left_header: left.header(),
		right_header: right.header(),
		row_exists_column,
		modifiers,
		warnings: analysis.warnings,
	});

	debug!(
		relation = %plan.definition.name,
		left_key = ?plan.left_key,
		right_key = ?plan.right_key,
		cardinality = %plan.cardinality,
		algorithm = %plan.algorithm,
		keys = ?plan.definition.keys,
		"bound join"
	);

	Ok(match kind {
		JoinKind::Inner | JoinKind::Times => BoundJoin::Inner(Arc::new(InnerJoinNode::new(plan, left, right))),
		JoinKind::LeftOuter | JoinKind::RightOuter => {
			BoundJoin::Outer(Arc::new(OuterJoinNode::new(plan, left, right)))
		}
		JoinKind::Having | JoinKind::Without => BoundJoin::Semi(Arc::new(SemiJoinNode::new(plan, left, right))),
	})
}

/// The side that drives a join must be updatable. The other side must be as
/// well, unless it is only looked up.
fn capabilities(kind: JoinKind, left: &RelationDef, right: &RelationDef, policy: &JoinPolicy) -> Capabilities {
	let (primary, secondary) = match kind {
		JoinKind::RightOuter => (right, left),
		_ => (left, right),
	};
	Capabilities {
		navigable: left.capabilities.navigable && right.capabilities.navigable,
		backwards_navigable: false,
		searchable: false,
		updatable: primary.capabilities.updatable && (policy.is_lookup || secondary.capabilities.updatable),
	}
}

/// Binds emitted join expressions against the relations a catalog knows,
/// recursively for nested joins.
pub struct JoinBinder<'a> {
	catalog: &'a dyn Catalog,
	config: JoinConfig,
}

impl<'a> JoinBinder<'a> {
	pub fn new(catalog: &'a dyn Catalog) -> Self {
		Self {
			catalog,
			config: JoinConfig::default(),
		}
	}

	pub fn with_config(mut self, config: JoinConfig) -> Self {
		self.config = config;
		self
	}

	pub fn bind(&self, expression: &JoinExpression) -> Result<BoundJoin> {
		let mut builder = JoinBuilder::new(expression.kind, self.source(&expression.left)?, self.source(&expression.right)?)
			.modifiers(expression.modifiers.clone())
			.config(self.config.clone());
		if let Some(condition) = &expression.condition {
			builder = builder.on(condition.clone());
		}
		if let Some(column) = &expression.row_exists_column {
			builder = builder.row_exists(column.clone());
		}
		builder.build()
	}

	fn source(&self, source: &SourceExpression) -> Result<Arc<dyn TableNode>> {
		match source {
			SourceExpression::Table(name) => self.catalog.find(name).map_or_else(
				|| {
					err!(JoinError::UnknownSource {
						name: name.clone(),
					})
				},
				Ok,
			),
			SourceExpression::Join(join) => Ok(self.bind(join)?.node()),
		}
	}
}
