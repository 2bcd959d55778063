// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use super::TableNode;

/// Resolves the relation names used by emitted expressions back to nodes.
pub trait Catalog: Send + Sync {
	fn find(&self, name: &str) -> Option<Arc<dyn TableNode>>;
}
