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

//! Tree document model for a collaborative-capable structured-document
//! editor: nodes, positions, ranges, primitive operations, deltas, and the
//! history log with its rebase transform.

pub mod batch;
pub mod delta;
pub mod document;
pub mod error;
pub mod history;
pub mod node;
pub mod operation;
pub mod position;
pub mod range;
pub mod transform;

pub use crate::batch::{Batch, BatchId, BatchKind};
pub use crate::delta::Delta;
pub use crate::document::{ChangeEvent, ChangeScope, Document, Selection};
pub use crate::error::ModelError;
pub use crate::history::History;
pub use crate::node::{Element, Node};
pub use crate::operation::Operation;
pub use crate::position::{Position, RootRef};
pub use crate::range::Range;
