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

//! The append-only log of applied deltas and the rebase transform.

use crate::delta::Delta;
use crate::operation::Operation;
use crate::transform;

/// Monotonically growing log of every delta applied to the document. The
/// version advances by one per applied delta; a delta's `base_version` is
/// the version it was applied at.
#[derive(Clone, Debug, Default)]
pub struct History {
    deltas: Vec<Delta>,
}

impl History {
    pub fn new() -> History {
        History::default()
    }

    pub fn version(&self) -> u64 {
        self.deltas.len() as u64
    }

    pub fn push(&mut self, delta: Delta) {
        debug_assert_eq!(delta.base_version, self.version());
        self.deltas.push(delta);
    }

    pub(crate) fn truncate(&mut self, version: u64) {
        self.deltas.truncate(version as usize);
    }

    /// All deltas applied at or after `base_version`, in log order.
    pub fn deltas_since(&self, base_version: u64) -> &[Delta] {
        let from = base_version.min(self.version()) as usize;
        &self.deltas[from..]
    }

    /// Rebases `delta` onto the current tip, transforming it through every
    /// delta applied since its base version. Returns one rebased delta, or
    /// several when a single-operation delta splits, or nothing when every
    /// operation was annihilated.
    pub fn transform_to_tip(&self, delta: &Delta) -> Vec<Delta> {
        let mut ops: Vec<Operation> = delta.operations.clone();
        for past in self.deltas_since(delta.base_version) {
            for past_op in &past.operations {
                ops = ops
                    .iter()
                    .flat_map(|op| transform::transformed(op, past_op))
                    .collect();
            }
        }
        let split = delta.operations.len() == 1 && ops.len() > 1;
        ops.retain(|op| !matches!(op, Operation::NoOp));
        if ops.is_empty() {
            return Vec::new();
        }
        let base_version = self.version();
        let wrap = |operations: Vec<Operation>| Delta {
            operations,
            base_version,
            origin: delta.origin.clone(),
        };
        if split {
            ops.into_iter().map(|op| wrap(vec![op])).collect()
        } else {
            vec![wrap(ops)]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;
    use crate::position::{Position, RootRef};

    fn p(path: &[usize]) -> Position {
        Position::new(RootRef::root("main"), path.to_vec())
    }

    fn insert(at: usize, text: &str, base_version: u64) -> Delta {
        Delta::new(
            vec![Operation::Insert { position: p(&[at]), nodes: Node::text(text) }],
            base_version,
        )
    }

    #[test]
    fn versions_advance_per_delta() {
        let mut history = History::new();
        assert_eq!(history.version(), 0);
        history.push(insert(0, "ab", 0));
        history.push(insert(2, "cd", 1));
        assert_eq!(history.version(), 2);
        assert_eq!(history.deltas_since(1).len(), 1);
        assert_eq!(history.deltas_since(5).len(), 0);
    }

    #[test]
    fn rebase_shifts_later_work() {
        let mut history = History::new();
        history.push(insert(0, "ab", 0));
        // produced before the push, inserting at what is now offset 3
        let stale = insert(1, "x", 0);
        let rebased = history.transform_to_tip(&stale);
        assert_eq!(rebased.len(), 1);
        assert_eq!(rebased[0].base_version, 1);
        match &rebased[0].operations[0] {
            Operation::Insert { position, .. } => assert_eq!(position, &p(&[3])),
            other => panic!("unexpected op: {:?}", other),
        }
    }

    #[test]
    fn rebase_splits_single_move() {
        let mut history = History::new();
        history.push(insert(0, "abc", 0));
        let mv = Delta::new(
            vec![Operation::Move { source: p(&[0]), target: p(&[3]), how_many: 3 }],
            1,
        );
        history.push(Delta::new(
            vec![Operation::Insert { position: p(&[1]), nodes: Node::text("q") }],
            1,
        ));
        let rebased = history.transform_to_tip(&mv);
        assert_eq!(rebased.len(), 2);
        assert!(rebased.iter().all(Delta::is_single_move));
    }
}
