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

//! Undo/redo core for the scribe structured-document editor: twin history
//! stacks, the reversion engine, and the controller routing kind-tagged
//! batches on the document change stream.

pub mod controller;
pub mod error;
pub mod history_stack;
pub mod reversion;

pub use crate::controller::{StepKind, UndoController, UndoEvent};
pub use crate::error::UndoError;
pub use crate::history_stack::{HistoryItem, HistoryStack, SelectionSnapshot};
pub use crate::reversion::ReversionEngine;
