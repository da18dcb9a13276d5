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

//! Model-layer errors.

use thiserror::Error;

use crate::position::{Position, RootRef};

#[derive(Clone, Debug, PartialEq, Error)]
pub enum ModelError {
    /// The path does not address a node list in its root.
    #[error("no node at position {0:?}")]
    InvalidPosition(Position),

    #[error("block of {how_many} nodes at {at:?} exceeds its parent")]
    InvalidRange { at: Position, how_many: usize },

    #[error("move target {0:?} lies inside the moved block")]
    TargetInMovedBlock(Position),

    #[error("unknown root {0}")]
    UnknownRoot(RootRef),
}
