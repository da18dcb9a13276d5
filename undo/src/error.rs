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

//! The undo core's error taxonomy. A reversion delta fully obsoleted by
//! later history is not an error: the engine skips it and the step goes on.

use thiserror::Error;

use scribe_model::{BatchId, ModelError};

#[derive(Debug, Error)]
pub enum UndoError {
    /// A step was triggered with nothing to revert.
    #[error("nothing to revert")]
    EmptyStack,

    /// A step targeted a batch that is not on the stack.
    #[error("batch {0:?} is not on the stack")]
    NotFound(BatchId),

    /// The document layer rejected the reversion. The change scope was
    /// rolled back and the item stays on its stack.
    #[error("reversion failed to apply: {0}")]
    ApplicationFailure(#[from] ModelError),
}
