// Copyright 2018 The Scribe Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Deltas: semantically meaningful edits expressed as operation runs.

use serde::{Deserialize, Serialize};

use crate::operation::Operation;
use crate::position::Position;

/// An ordered run of operations produced against one history version.
///
/// `base_version` is the history version the delta was applied at; the
/// history log uses it to select the slice of intervening deltas when
/// rebasing. `origin` is reversion provenance: the source/insert position
/// of the recorded delta a reversion delta inverts. It stays `None` on
/// user-originated deltas, which is how the move-conflict post-fix
/// recognizes the history entries it may consult.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Delta {
    pub operations: Vec<Operation>,
    pub base_version: u64,
    pub origin: Option<Position>,
}

impl Delta {
    pub fn new(operations: Vec<Operation>, base_version: u64) -> Delta {
        Delta { operations, base_version, origin: None }
    }

    /// The delta that semantically inverts this one: every operation
    /// reversed, in reverse order, based right after this delta.
    pub fn reversed(&self) -> Delta {
        let operations = self.operations.iter().rev().map(Operation::reversed).collect();
        Delta { operations, base_version: self.base_version + 1, origin: None }
    }

    /// The position reverted content originates from: the insert position
    /// of a single insert, the source of a single move-like operation.
    pub fn origin_position(&self) -> Option<Position> {
        if self.operations.len() != 1 {
            return None;
        }
        match &self.operations[0] {
            Operation::Insert { position, .. } => Some(position.clone()),
            op => op.move_spec().map(|(source, _, _)| source.clone()),
        }
    }

    /// Whether the delta is exactly one `Move` operation.
    pub fn is_single_move(&self) -> bool {
        self.operations.len() == 1 && matches!(self.operations[0], Operation::Move { .. })
    }
}
