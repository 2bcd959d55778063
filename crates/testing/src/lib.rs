// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

mod catalog;
pub mod fixture;
mod table;

pub use catalog::MemoryCatalog;
pub use table::{MemoryTable, TableEvent};
