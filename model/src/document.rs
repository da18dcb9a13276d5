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

//! The live document: roots, selection, history, and the enqueued-change
//! scope that ships every mutation as one kind-tagged batch.

use std::collections::{BTreeMap, HashMap, VecDeque};

use crate::batch::{Batch, BatchId, BatchKind};
use crate::delta::Delta;
use crate::error::ModelError;
use crate::history::History;
use crate::node::{self, Node};
use crate::operation::{landing_of, Operation};
use crate::position::{Position, RootRef};
use crate::range::Range;

/// The user's live selection.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
    pub ranges: Vec<Range>,
    pub is_backward: bool,
}

impl Selection {
    pub fn get_ranges(&self) -> &[Range] {
        &self.ranges
    }

    pub fn set_ranges(&mut self, ranges: Vec<Range>, is_backward: bool) {
        self.ranges = ranges;
        self.is_backward = is_backward;
    }
}

/// One entry of the change stream: an applied batch, and the selection as
/// it was when the batch's scope was entered.
#[derive(Clone, Debug)]
pub struct ChangeEvent {
    pub batch: Batch,
    pub selection_before: Selection,
}

/// A tree document: named roots, the graveyard, detached fragments, the
/// history log, and the live selection.
///
/// All mutation goes through [`Document::enqueue_change`]; the operations
/// applied inside one scope ship as a single batch on the change queue,
/// delivered only when the scope exits cleanly.
#[derive(Debug, Default)]
pub struct Document {
    roots: BTreeMap<String, Vec<Node>>,
    graveyard: Vec<Node>,
    fragments: HashMap<u32, Vec<Node>>,
    history: History,
    selection: Selection,
    changes: VecDeque<ChangeEvent>,
    next_batch_id: u64,
    next_fragment_id: u32,
}

struct Checkpoint {
    roots: BTreeMap<String, Vec<Node>>,
    graveyard: Vec<Node>,
    fragments: HashMap<u32, Vec<Node>>,
    version: u64,
    selection: Selection,
}

impl Document {
    pub fn new() -> Document {
        Document::default()
    }

    /// Creates a named root seeded with initial content. Seeding bypasses
    /// the history, like loading a file into a fresh buffer.
    pub fn create_root(&mut self, name: &str, children: Vec<Node>) {
        self.roots.insert(name.to_string(), children);
    }

    /// Creates a detached fragment and returns its root reference.
    pub fn create_fragment(&mut self) -> RootRef {
        let id = self.next_fragment_id;
        self.next_fragment_id += 1;
        self.fragments.insert(id, Vec::new());
        RootRef::Fragment(id)
    }

    pub fn root(&self, name: &str) -> Option<&[Node]> {
        self.roots.get(name).map(Vec::as_slice)
    }

    /// Text content of a named root, for quick inspection.
    pub fn root_text(&self, name: &str) -> String {
        self.root(name).map(node::text_of).unwrap_or_default()
    }

    pub fn graveyard(&self) -> &[Node] {
        &self.graveyard
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn version(&self) -> u64 {
        self.history.version()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn set_selection(&mut self, ranges: Vec<Range>, is_backward: bool) {
        self.selection.set_ranges(ranges, is_backward);
    }

    /// Drains the change queue.
    pub fn take_changes(&mut self) -> Vec<ChangeEvent> {
        self.changes.drain(..).collect()
    }

    /// Runs `f` with exclusive mutation. Everything applied inside ships as
    /// one batch of the given kind, queued when the scope exits cleanly; an
    /// error rolls the document back to the scope entry state. The scope
    /// borrows the document mutably, so scopes cannot nest or interleave.
    pub fn enqueue_change<T, F>(&mut self, kind: BatchKind, f: F) -> Result<T, ModelError>
    where
        F: FnOnce(&mut ChangeScope) -> Result<T, ModelError>,
    {
        let checkpoint = Checkpoint {
            roots: self.roots.clone(),
            graveyard: self.graveyard.clone(),
            fragments: self.fragments.clone(),
            version: self.history.version(),
            selection: self.selection.clone(),
        };
        let selection_before = self.selection.clone();
        let id = BatchId(self.next_batch_id);
        self.next_batch_id += 1;

        let mut scope = ChangeScope { doc: self, batch: Batch::new(id, kind) };
        let result = f(&mut scope);
        let batch = scope.batch;

        match result {
            Ok(value) => {
                if !batch.is_empty() {
                    self.changes.push_back(ChangeEvent { batch, selection_before });
                }
                Ok(value)
            }
            Err(err) => {
                self.roots = checkpoint.roots;
                self.graveyard = checkpoint.graveyard;
                self.fragments = checkpoint.fragments;
                self.history.truncate(checkpoint.version);
                self.selection = checkpoint.selection;
                self.next_batch_id = id.0;
                Err(err)
            }
        }
    }

    /// Applies one operation to the live tree. On error the tree may be
    /// left partially mutated; the enclosing change scope rolls it back.
    pub fn apply_operation(&mut self, op: &Operation) -> Result<(), ModelError> {
        match op {
            Operation::NoOp => Ok(()),
            Operation::Insert { position, nodes } => {
                let (list, offset) = self.resolve_mut(position)?;
                if offset > list.len() {
                    return Err(ModelError::InvalidPosition(position.clone()));
                }
                list.splice(offset..offset, nodes.iter().cloned());
                Ok(())
            }
            Operation::Move { source, target, how_many }
            | Operation::Remove { source, target, how_many }
            | Operation::Reinsert { source, target, how_many } => {
                self.apply_move(source, target, *how_many)
            }
        }
    }

    fn apply_move(
        &mut self,
        source: &Position,
        target: &Position,
        how_many: usize,
    ) -> Result<(), ModelError> {
        if target.is_in_block(source, how_many) {
            return Err(ModelError::TargetInMovedBlock(target.clone()));
        }
        let (list, offset) = self.resolve_mut(source)?;
        if offset + how_many > list.len() {
            return Err(ModelError::InvalidRange { at: source.clone(), how_many });
        }
        let nodes: Vec<Node> = list.splice(offset..offset + how_many, std::iter::empty()).collect();
        let landing = landing_of(source, target, how_many);
        let (list, offset) = self.resolve_mut(&landing)?;
        if offset > list.len() {
            return Err(ModelError::InvalidPosition(landing));
        }
        list.splice(offset..offset, nodes);
        Ok(())
    }

    fn node_list_mut(&mut self, root: &RootRef) -> Result<&mut Vec<Node>, ModelError> {
        match root {
            RootRef::Root(name) => self
                .roots
                .get_mut(name)
                .ok_or_else(|| ModelError::UnknownRoot(root.clone())),
            RootRef::Graveyard => Ok(&mut self.graveyard),
            RootRef::Fragment(id) => self
                .fragments
                .get_mut(id)
                .ok_or_else(|| ModelError::UnknownRoot(root.clone())),
        }
    }

    /// Walks to the node list the position points into.
    fn resolve_mut(&mut self, pos: &Position) -> Result<(&mut Vec<Node>, usize), ModelError> {
        let mut list = self.node_list_mut(&pos.root)?;
        for &step in pos.parent_path() {
            let node = list
                .get_mut(step)
                .ok_or_else(|| ModelError::InvalidPosition(pos.clone()))?;
            list = match node {
                Node::Element(el) => &mut el.children,
                Node::Text(_) => return Err(ModelError::InvalidPosition(pos.clone())),
            };
        }
        Ok((list, pos.offset()))
    }
}

/// Exclusive mutation scope handed to [`Document::enqueue_change`]
/// closures. Deltas applied through the scope are logged in the history
/// and collected into the scope's batch.
pub struct ChangeScope<'a> {
    doc: &'a mut Document,
    batch: Batch,
}

impl<'a> ChangeScope<'a> {
    pub fn history(&self) -> &History {
        &self.doc.history
    }

    pub fn version(&self) -> u64 {
        self.doc.history.version()
    }

    /// Applies a delta: every operation in order, then logs it at the
    /// current version. Callers rebase stale deltas first.
    pub fn apply_delta(&mut self, mut delta: Delta) -> Result<(), ModelError> {
        delta.base_version = self.doc.history.version();
        for op in &delta.operations {
            self.doc.apply_operation(op)?;
        }
        self.doc.history.push(delta.clone());
        self.batch.deltas.push(delta);
        Ok(())
    }

    pub fn insert(&mut self, position: Position, nodes: Vec<Node>) -> Result<(), ModelError> {
        let version = self.version();
        self.apply_delta(Delta::new(vec![Operation::Insert { position, nodes }], version))
    }

    pub fn insert_text(&mut self, position: Position, text: &str) -> Result<(), ModelError> {
        self.insert(position, Node::text(text))
    }

    /// Removes `how_many` nodes at `source` into the graveyard.
    pub fn remove(&mut self, source: Position, how_many: usize) -> Result<(), ModelError> {
        let version = self.version();
        self.apply_delta(Delta::new(
            vec![Operation::remove_to_graveyard(source, how_many)],
            version,
        ))
    }

    pub fn move_nodes(
        &mut self,
        source: Position,
        how_many: usize,
        target: Position,
    ) -> Result<(), ModelError> {
        let version = self.version();
        self.apply_delta(Delta::new(
            vec![Operation::Move { source, target, how_many }],
            version,
        ))
    }

    pub fn set_selection(&mut self, ranges: Vec<Range>, is_backward: bool) {
        self.doc.selection.set_ranges(ranges, is_backward);
    }
}
