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

//! Primitive tree edits.

use serde::{Deserialize, Serialize};

use crate::node::Node;
use crate::position::{Position, RootRef};

/// A primitive edit of the document tree.
///
/// `Move`, `Remove` and `Reinsert` share one geometric signature and differ
/// in which side of the graveyard the content travels. `NoOp` is what an
/// operation degenerates to when a rebase annihilates it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    Insert { position: Position, nodes: Vec<Node> },
    Move { source: Position, target: Position, how_many: usize },
    Remove { source: Position, target: Position, how_many: usize },
    Reinsert { source: Position, target: Position, how_many: usize },
    NoOp,
}

impl Operation {
    /// A removal parking its content at the head of the graveyard. Rebasing
    /// against other removals spreads graveyard targets apart, so the
    /// constructor needs no document access.
    pub fn remove_to_graveyard(source: Position, how_many: usize) -> Operation {
        Operation::Remove {
            source,
            target: Position::new(RootRef::Graveyard, vec![0]),
            how_many,
        }
    }

    /// The source/target geometry of the move-like variants.
    pub fn move_spec(&self) -> Option<(&Position, &Position, usize)> {
        match self {
            Operation::Move { source, target, how_many }
            | Operation::Remove { source, target, how_many }
            | Operation::Reinsert { source, target, how_many } => {
                Some((source, target, *how_many))
            }
            _ => None,
        }
    }

    /// Whether any position of the operation addresses document content.
    /// Named roots and the graveyard count; detached fragments do not.
    pub fn touches_document(&self) -> bool {
        match self {
            Operation::Insert { position, .. } => position.root.is_document(),
            Operation::Move { source, target, .. }
            | Operation::Remove { source, target, .. }
            | Operation::Reinsert { source, target, .. } => {
                source.root.is_document() || target.root.is_document()
            }
            Operation::NoOp => false,
        }
    }

    /// The operation that semantically inverts this one, expressed in the
    /// coordinates of the document after this one has been applied.
    pub fn reversed(&self) -> Operation {
        match self {
            Operation::Insert { position, nodes } => {
                Operation::remove_to_graveyard(position.clone(), nodes.len())
            }
            Operation::Move { source, target, how_many } => {
                let landing = landing_of(source, target, *how_many);
                Operation::Move {
                    target: source.transformed_by_insertion(&landing, *how_many, true),
                    source: landing,
                    how_many: *how_many,
                }
            }
            Operation::Remove { source, target, how_many } => {
                let landing = landing_of(source, target, *how_many);
                Operation::Reinsert {
                    source: landing,
                    target: source.clone(),
                    how_many: *how_many,
                }
            }
            Operation::Reinsert { source, target, how_many } => {
                let landing = landing_of(source, target, *how_many);
                Operation::Remove {
                    source: landing,
                    target: source.clone(),
                    how_many: *how_many,
                }
            }
            Operation::NoOp => Operation::NoOp,
        }
    }
}

/// Where a moved block actually lands: the target as seen once the block
/// has been taken out.
pub(crate) fn landing_of(source: &Position, target: &Position, how_many: usize) -> Position {
    match target.transformed_by_deletion(source, how_many) {
        Some(p) => p,
        None => target.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(path: &[usize]) -> Position {
        Position::new(RootRef::root("main"), path.to_vec())
    }

    #[test]
    fn insert_reverses_to_remove() {
        let op = Operation::Insert { position: p(&[2]), nodes: Node::text("ab") };
        match op.reversed() {
            Operation::Remove { source, target, how_many } => {
                assert_eq!(source, p(&[2]));
                assert_eq!(target.root, RootRef::Graveyard);
                assert_eq!(how_many, 2);
            }
            other => panic!("unexpected reversal: {:?}", other),
        }
    }

    #[test]
    fn move_reverses_to_the_landing() {
        // "foobar": "foo" moved to the end lands at 3
        let op = Operation::Move { source: p(&[0]), target: p(&[6]), how_many: 3 };
        assert_eq!(
            op.reversed(),
            Operation::Move { source: p(&[3]), target: p(&[0]), how_many: 3 }
        );
        // moving backward: the put-back target accounts for the landing
        let op = Operation::Move { source: p(&[3]), target: p(&[0]), how_many: 2 };
        assert_eq!(
            op.reversed(),
            Operation::Move { source: p(&[0]), target: p(&[5]), how_many: 2 }
        );
    }

    #[test]
    fn remove_reinsert_round_trip() {
        let op = Operation::remove_to_graveyard(p(&[1]), 2);
        let back = op.reversed();
        assert_eq!(
            back,
            Operation::Reinsert {
                source: Position::new(RootRef::Graveyard, vec![0]),
                target: p(&[1]),
                how_many: 2,
            }
        );
        assert_eq!(back.reversed(), Operation::Remove {
            source: p(&[1]),
            target: Position::new(RootRef::Graveyard, vec![0]),
            how_many: 2,
        });
    }
}
