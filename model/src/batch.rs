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

//! Batches: atomic units of change on the editor change stream.

use serde::{Deserialize, Serialize};

use crate::delta::Delta;
use crate::operation::Operation;

/// Identity of a batch. Batches are value types; identity is the id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BatchId(pub u64);

/// The kind tag routing a batch between the undo and redo stacks. Batches
/// are `User` unless a reversion step tagged them otherwise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchKind {
    User,
    Undo,
    Redo,
}

impl Default for BatchKind {
    fn default() -> BatchKind {
        BatchKind::User
    }
}

/// An ordered sequence of deltas applied as one atomic unit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    pub id: BatchId,
    pub kind: BatchKind,
    pub deltas: Vec<Delta>,
}

impl Batch {
    pub fn new(id: BatchId, kind: BatchKind) -> Batch {
        Batch { id, kind, deltas: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    /// Whether any operation of any delta addresses document content.
    pub fn touches_document(&self) -> bool {
        self.deltas
            .iter()
            .flat_map(|delta| &delta.operations)
            .any(Operation::touches_document)
    }

    /// The history version the batch's first delta was applied at.
    pub fn base_version(&self) -> Option<u64> {
        self.deltas.first().map(|delta| delta.base_version)
    }
}
