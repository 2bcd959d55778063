// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{collections::VecDeque, sync::Arc};

use relate_core::{Cursor, TableNode};
use relate_type::Result;

use super::{Pair, PairStream, SideIndex, key_values, orient};
use crate::{JoinPlan, JoinSide};

/// Scans one side and probes the other through its index for every row.
pub(crate) struct SearchStream {
	scanned: Box<dyn Cursor>,
	side: JoinSide,
	key: Vec<String>,
	index: SideIndex,
	preserve: bool,
	pending: VecDeque<Pair>,
}

impl SearchStream {
	pub(crate) fn open(
		plan: &Arc<JoinPlan>,
		scanned: &Arc<dyn TableNode>,
		side: JoinSide,
		index: SideIndex,
	) -> Result<Self> {
		Ok(Self {
			scanned: scanned.open()?,
			side,
			key: plan.key(side).to_vec(),
			index,
			preserve: plan.preserved() == Some(side),
			pending: VecDeque::new(),
		})
	}
}

impl PairStream for SearchStream {
	fn next_pair(&mut self) -> Result<Option<Pair>> {
		loop {
			if let Some(pair) = self.pending.pop_front() {
				return Ok(Some(pair));
			}
			let Some(row) = self.scanned.next()? else {
				return Ok(None);
			};

			let matches = self.index.lookup(&key_values(&row, &self.key))?;
			if matches.is_empty() {
				if self.preserve {
					return Ok(Some(orient(self.side, Some(row), None)));
				}
				continue;
			}
			for other in matches {
				self.pending.push_back(orient(self.side, Some(row.clone()), Some(other)));
			}
		}
	}
}
