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

//! The ordered record of revertible batches.

use std::collections::HashSet;

use scribe_model::{Batch, BatchId, Range, Selection};

/// The user's selection as it was when a batch was recorded. Immutable
/// once captured.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectionSnapshot {
    pub ranges: Vec<Range>,
    pub is_backward: bool,
}

impl SelectionSnapshot {
    pub fn of(selection: &Selection) -> SelectionSnapshot {
        SelectionSnapshot {
            ranges: selection.ranges.clone(),
            is_backward: selection.is_backward,
        }
    }
}

/// A recorded batch together with the selection to restore when it is
/// reverted.
#[derive(Clone, Debug)]
pub struct HistoryItem {
    pub batch: Batch,
    pub selection: SelectionSnapshot,
}

/// An ordered collection of history items with identity-based
/// deduplication; the top is the most recently recorded item.
#[derive(Debug, Default)]
pub struct HistoryStack {
    items: Vec<HistoryItem>,
    ids: HashSet<BatchId>,
    generation: u64,
}

impl HistoryStack {
    pub fn new() -> HistoryStack {
        HistoryStack::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Monotonic counter bumped on every mutation: the state-changed signal
    /// the surrounding editor polls to refresh enabled/disabled UI.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Records a batch. Idempotent by batch identity: recording a batch
    /// already on the stack is a no-op and does not refresh its selection.
    pub fn record(&mut self, batch: Batch, selection: SelectionSnapshot) {
        if !self.ids.insert(batch.id) {
            return;
        }
        self.items.push(HistoryItem { batch, selection });
        self.generation += 1;
    }

    /// Drops every item and empties the identity set.
    pub fn clear(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.items.clear();
        self.ids.clear();
        self.generation += 1;
    }

    pub fn peek_item(&self, batch: Option<BatchId>) -> Option<&HistoryItem> {
        match batch {
            Some(id) => self.items.iter().find(|item| item.batch.id == id),
            None => self.items.last(),
        }
    }

    /// Removes and returns an item, by batch identity or from the top. The
    /// identity is released, so the same batch may be recorded again later;
    /// redo-of-undo cycles depend on this.
    pub fn pop_item(&mut self, batch: Option<BatchId>) -> Option<HistoryItem> {
        let index = match batch {
            Some(id) => self.items.iter().position(|item| item.batch.id == id)?,
            None => self.items.len().checked_sub(1)?,
        };
        let item = self.items.remove(index);
        self.ids.remove(&item.batch.id);
        self.generation += 1;
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scribe_model::BatchKind;

    fn batch(id: u64) -> Batch {
        Batch::new(BatchId(id), BatchKind::User)
    }

    fn snapshot() -> SelectionSnapshot {
        SelectionSnapshot { ranges: Vec::new(), is_backward: false }
    }

    #[test]
    fn record_and_pop() {
        let mut stack = HistoryStack::new();
        assert!(stack.is_empty());
        stack.record(batch(1), snapshot());
        stack.record(batch(2), snapshot());
        assert_eq!(stack.len(), 2);
        let top = stack.pop_item(None).unwrap();
        assert_eq!(top.batch.id, BatchId(2));
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn record_is_idempotent_by_identity() {
        let mut stack = HistoryStack::new();
        stack.record(batch(7), snapshot());
        stack.record(batch(7), snapshot());
        assert_eq!(stack.len(), 1);
        // popping releases the identity for re-recording
        stack.pop_item(Some(BatchId(7))).unwrap();
        stack.record(batch(7), snapshot());
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn pop_by_identity() {
        let mut stack = HistoryStack::new();
        stack.record(batch(1), snapshot());
        stack.record(batch(2), snapshot());
        stack.record(batch(3), snapshot());
        let item = stack.pop_item(Some(BatchId(2))).unwrap();
        assert_eq!(item.batch.id, BatchId(2));
        assert_eq!(stack.len(), 2);
        assert!(stack.pop_item(Some(BatchId(2))).is_none());
    }

    #[test]
    fn clear_empties_everything() {
        let mut stack = HistoryStack::new();
        stack.record(batch(1), snapshot());
        stack.clear();
        assert!(stack.is_empty());
        assert!(stack.pop_item(None).is_none());
    }

    #[test]
    fn generation_tracks_mutations() {
        let mut stack = HistoryStack::new();
        let g0 = stack.generation();
        stack.clear();
        assert_eq!(stack.generation(), g0);
        stack.record(batch(1), snapshot());
        assert!(stack.generation() > g0);
        let g1 = stack.generation();
        stack.record(batch(1), snapshot());
        assert_eq!(stack.generation(), g1);
        stack.pop_item(None).unwrap();
        assert!(stack.generation() > g1);
    }
}
