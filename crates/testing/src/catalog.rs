// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{collections::HashMap, sync::Arc};

use parking_lot::RwLock;
use relate_core::{Catalog, TableNode};

/// Relations by name.
#[derive(Default)]
pub struct MemoryCatalog {
	nodes: RwLock<HashMap<String, Arc<dyn TableNode>>>,
}

impl MemoryCatalog {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register(&self, node: Arc<dyn TableNode>) {
		let name = node.definition().name.clone();
		self.nodes.write().insert(name, node);
	}

	pub fn with(self, node: Arc<dyn TableNode>) -> Self {
		self.register(node);
		self
	}
}

impl Catalog for MemoryCatalog {
	fn find(&self, name: &str) -> Option<Arc<dyn TableNode>> {
		self.nodes.read().get(name).cloned()
	}
}
