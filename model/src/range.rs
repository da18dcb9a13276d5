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

//! Ranges over tree positions and their spread-mode transformations.

use serde::{Deserialize, Serialize};

use crate::operation::Operation;
use crate::position::Position;

/// A contiguous region of the tree between two positions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Range {
        Range { start, end }
    }

    pub fn collapsed(at: Position) -> Range {
        Range { start: at.clone(), end: at }
    }

    /// A flat block of `how_many` sibling nodes starting at `start`.
    pub fn block(start: &Position, how_many: usize) -> Range {
        let mut end = start.clone();
        *end.offset_mut() += how_many;
        Range { start: start.clone(), end }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    pub fn contains_position(&self, pos: &Position) -> bool {
        self.start.is_before(pos) && pos.is_before(&self.end)
    }

    /// The part of `self` also covered by `other`, if any.
    pub fn intersection(&self, other: &Range) -> Option<Range> {
        if self.start.root != other.start.root {
            return None;
        }
        let start = if self.start.is_before(&other.start) { &other.start } else { &self.start };
        let end = if self.end.is_before(&other.end) { &self.end } else { &other.end };
        if start.is_before(end) {
            Some(Range::new(start.clone(), end.clone()))
        } else {
            None
        }
    }

    /// The parts of `self` not covered by `other`, in document order.
    pub fn difference(&self, other: &Range) -> Vec<Range> {
        if self.start.root != other.start.root {
            return vec![self.clone()];
        }
        let mut out = Vec::new();
        if self.start.is_before(&other.start) {
            let end = if self.end.is_before(&other.start) { &self.end } else { &other.start };
            out.push(Range::new(self.start.clone(), end.clone()));
        }
        if other.end.is_before(&self.end) {
            let start = if other.end.is_before(&self.start) { &self.start } else { &other.end };
            out.push(Range::new(start.clone(), self.end.clone()));
        }
        out
    }

    /// Transforms the range by an insertion. With `spread`, an insertion
    /// strictly inside the range splits it around the inserted content;
    /// without, the range stretches over it. A collapsed range at the
    /// insertion point is pushed after the inserted content.
    pub fn transformed_by_insertion(
        &self,
        at: &Position,
        how_many: usize,
        spread: bool,
    ) -> Vec<Range> {
        if self.is_collapsed() {
            return vec![Range::collapsed(self.start.transformed_by_insertion(at, how_many, true))];
        }
        if self.contains_position(at) {
            let end = self.end.transformed_by_insertion(at, how_many, false);
            if spread {
                return vec![
                    Range::new(self.start.clone(), at.clone()),
                    Range::new(at.transformed_by_insertion(at, how_many, true), end),
                ];
            }
            return vec![Range::new(self.start.clone(), end)];
        }
        vec![Range::new(
            self.start.transformed_by_insertion(at, how_many, true),
            self.end.transformed_by_insertion(at, how_many, false),
        )]
    }

    /// Transforms the range by a move. The part overlapping the moved block
    /// travels to the landing site (possibly the graveyard); the rest is
    /// shifted, and split if the landing falls inside it.
    pub fn transformed_by_move(
        &self,
        source: &Position,
        target: &Position,
        how_many: usize,
        spread: bool,
    ) -> Vec<Range> {
        if self.is_collapsed() {
            return vec![Range::collapsed(
                self.start.transformed_by_move(source, target, how_many, true),
            )];
        }
        let block = Range::block(source, how_many);
        let landing = match target.transformed_by_deletion(source, how_many) {
            Some(p) => p,
            None => target.clone(),
        };
        let mut result = Vec::new();
        for piece in self.difference(&block) {
            // difference boundaries never fall inside the moved block
            let start = match piece.start.transformed_by_deletion(source, how_many) {
                Some(p) => p,
                None => continue,
            };
            let end = match piece.end.transformed_by_deletion(source, how_many) {
                Some(p) => p,
                None => continue,
            };
            result.extend(Range::new(start, end).transformed_by_insertion(&landing, how_many, spread));
        }
        if let Some(common) = self.intersection(&block) {
            result.push(Range::new(
                common.start.combined(source, &landing),
                common.end.combined(source, &landing),
            ));
        }
        result
    }

    /// Result of transforming by one primitive operation. Operations other
    /// than the four tree edits leave the range untouched.
    pub fn transformed_by_operation(&self, op: &Operation) -> Vec<Range> {
        match op {
            Operation::Insert { position, nodes } => {
                self.transformed_by_insertion(position, nodes.len(), true)
            }
            Operation::Move { source, target, how_many }
            | Operation::Remove { source, target, how_many }
            | Operation::Reinsert { source, target, how_many } => {
                self.transformed_by_move(source, target, *how_many, true)
            }
            Operation::NoOp => vec![self.clone()],
        }
    }
}
