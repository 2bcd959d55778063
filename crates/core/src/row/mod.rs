// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

mod header;
mod row;

pub use header::RowHeader;
pub use row::Row;
