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

//! Positions in the document tree and their transformations.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of the tree a position points into.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RootRef {
    /// A named document root.
    Root(String),
    /// The special root holding content removed from the document.
    Graveyard,
    /// A detached fragment; not part of the document.
    Fragment(u32),
}

impl RootRef {
    pub fn root(name: &str) -> RootRef {
        RootRef::Root(name.to_string())
    }

    pub fn is_graveyard(&self) -> bool {
        matches!(self, RootRef::Graveyard)
    }

    /// Whether content under this root is part of the document. The
    /// graveyard counts; detached fragments do not.
    pub fn is_document(&self) -> bool {
        !matches!(self, RootRef::Fragment(_))
    }
}

impl fmt::Display for RootRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RootRef::Root(name) => write!(f, "{}", name),
            RootRef::Graveyard => write!(f, "$graveyard"),
            RootRef::Fragment(id) => write!(f, "$fragment{}", id),
        }
    }
}

/// A position in a tree: a root identity plus a path of offsets, one per
/// level. The last component is the offset the position points at in its
/// parent; earlier components descend through element nodes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub root: RootRef,
    pub path: Vec<usize>,
}

impl Position {
    pub fn new(root: RootRef, path: Vec<usize>) -> Position {
        assert!(!path.is_empty(), "a position path has at least one offset");
        Position { root, path }
    }

    /// The offset in the immediate parent.
    pub fn offset(&self) -> usize {
        *self.path.last().unwrap()
    }

    pub fn offset_mut(&mut self) -> &mut usize {
        self.path.last_mut().unwrap()
    }

    pub fn parent_path(&self) -> &[usize] {
        &self.path[..self.path.len() - 1]
    }

    /// Document order within one root; positions in different roots are
    /// unordered. A path is less than its own extensions.
    pub fn compare(&self, other: &Position) -> Option<Ordering> {
        if self.root != other.root {
            return None;
        }
        Some(self.path.cmp(&other.path))
    }

    pub fn is_before(&self, other: &Position) -> bool {
        self.compare(other) == Some(Ordering::Less)
    }

    pub fn is_after(&self, other: &Position) -> bool {
        self.compare(other) == Some(Ordering::Greater)
    }

    /// Whether there is no content between the two positions. Decided
    /// path-wise: equal positions touch, and a position touches its own
    /// first-child descent (`[i]` touches `[i, 0]`).
    pub fn is_touching(&self, other: &Position) -> bool {
        if self.root != other.root {
            return false;
        }
        let (short, long) = if self.path.len() <= other.path.len() {
            (&self.path, &other.path)
        } else {
            (&other.path, &self.path)
        };
        long[..short.len()] == short[..] && long[short.len()..].iter().all(|&off| off == 0)
    }

    /// Transforms the position by an insertion of `how_many` nodes at `at`.
    /// `insert_before` decides the equal-offset tie: when true the inserted
    /// content lands before this position and pushes it forward. A position
    /// inside the node the insertion displaces always travels with it.
    pub fn transformed_by_insertion(
        &self,
        at: &Position,
        how_many: usize,
        insert_before: bool,
    ) -> Position {
        if self.root != at.root {
            return self.clone();
        }
        let level = at.path.len() - 1;
        if self.path.len() <= level || self.path[..level] != at.path[..level] {
            return self.clone();
        }
        let mut out = self.clone();
        let ins_off = at.path[level];
        let off = out.path[level];
        if off > ins_off || (off == ins_off && (insert_before || out.path.len() > level + 1)) {
            out.path[level] += how_many;
        }
        out
    }

    /// Transforms the position by removal of `how_many` nodes at `at`.
    /// Returns `None` if the position was inside one of the removed nodes;
    /// positions between removed nodes collapse onto the removal point.
    pub fn transformed_by_deletion(&self, at: &Position, how_many: usize) -> Option<Position> {
        if self.root != at.root {
            return Some(self.clone());
        }
        let level = at.path.len() - 1;
        if self.path.len() <= level || self.path[..level] != at.path[..level] {
            return Some(self.clone());
        }
        let mut out = self.clone();
        let del_off = at.path[level];
        let off = out.path[level];
        if off < del_off {
            return Some(out);
        }
        if off >= del_off + how_many {
            out.path[level] -= how_many;
            return Some(out);
        }
        if out.path.len() > level + 1 {
            return None;
        }
        out.path[level] = del_off;
        Some(out)
    }

    /// Transforms the position by a move of `how_many` nodes from `source`
    /// to `target`. Positions inside the moved block travel with it.
    pub fn transformed_by_move(
        &self,
        source: &Position,
        target: &Position,
        how_many: usize,
        insert_before: bool,
    ) -> Position {
        let landing = match target.transformed_by_deletion(source, how_many) {
            Some(p) => p,
            None => target.clone(),
        };
        if self.is_in_block(source, how_many) {
            return self.combined(source, &landing);
        }
        match self.transformed_by_deletion(source, how_many) {
            Some(p) => p.transformed_by_insertion(&landing, how_many, insert_before),
            // interior positions are all caught by is_in_block
            None => self.clone(),
        }
    }

    /// Whether the position is within a block of `how_many` sibling nodes
    /// starting at `at`: strictly between them, or anywhere inside one.
    pub fn is_in_block(&self, at: &Position, how_many: usize) -> bool {
        if self.root != at.root {
            return false;
        }
        let level = at.path.len() - 1;
        if self.path.len() <= level || self.path[..level] != at.path[..level] {
            return false;
        }
        let off = self.path[level];
        let start = at.path[level];
        if self.path.len() > level + 1 {
            off >= start && off < start + how_many
        } else {
            off > start && off < start + how_many
        }
    }

    /// Maps a position inside a moved block onto the block's landing site.
    pub(crate) fn combined(&self, source: &Position, landing: &Position) -> Position {
        let level = source.path.len() - 1;
        let mut path = landing.parent_path().to_vec();
        path.push(landing.offset() + (self.path[level] - source.path[level]));
        path.extend_from_slice(&self.path[level + 1..]);
        Position::new(landing.root.clone(), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(path: &[usize]) -> Position {
        Position::new(RootRef::root("main"), path.to_vec())
    }

    fn gy(path: &[usize]) -> Position {
        Position::new(RootRef::Graveyard, path.to_vec())
    }

    #[test]
    fn ordering() {
        assert!(p(&[1]).is_before(&p(&[2])));
        assert!(p(&[2, 0]).is_after(&p(&[2])));
        assert!(p(&[2, 5]).is_before(&p(&[3])));
        assert_eq!(p(&[1]).compare(&gy(&[1])), None);
    }

    #[test]
    fn touching() {
        assert!(p(&[2]).is_touching(&p(&[2])));
        assert!(p(&[2]).is_touching(&p(&[2, 0])));
        assert!(p(&[2, 0, 0]).is_touching(&p(&[2])));
        assert!(!p(&[2]).is_touching(&p(&[3])));
        assert!(!p(&[2]).is_touching(&p(&[2, 1])));
        assert!(!p(&[2]).is_touching(&gy(&[2])));
    }

    #[test]
    fn insertion_shifts() {
        assert_eq!(p(&[5]).transformed_by_insertion(&p(&[3]), 2, false), p(&[7]));
        assert_eq!(p(&[2]).transformed_by_insertion(&p(&[3]), 2, false), p(&[2]));
        assert_eq!(p(&[3]).transformed_by_insertion(&p(&[3]), 2, false), p(&[3]));
        assert_eq!(p(&[3]).transformed_by_insertion(&p(&[3]), 2, true), p(&[5]));
        // inside the displaced node
        assert_eq!(p(&[3, 1]).transformed_by_insertion(&p(&[3]), 2, false), p(&[5, 1]));
        // other root or deeper list untouched
        assert_eq!(p(&[3]).transformed_by_insertion(&gy(&[0]), 2, true), p(&[3]));
        assert_eq!(p(&[3]).transformed_by_insertion(&p(&[3, 0]), 2, true), p(&[3]));
    }

    #[test]
    fn deletion_shifts_and_collapses() {
        assert_eq!(p(&[5]).transformed_by_deletion(&p(&[1]), 2), Some(p(&[3])));
        assert_eq!(p(&[0]).transformed_by_deletion(&p(&[1]), 2), Some(p(&[0])));
        assert_eq!(p(&[2]).transformed_by_deletion(&p(&[1]), 2), Some(p(&[1])));
        assert_eq!(p(&[2, 4]).transformed_by_deletion(&p(&[1]), 2), None);
        assert_eq!(p(&[3, 4]).transformed_by_deletion(&p(&[1]), 2), Some(p(&[1, 4])));
    }

    #[test]
    fn move_transforms() {
        // "foobar": move "foo" (0..3) to 6; caret after "foo" collapses to 0
        assert_eq!(p(&[3]).transformed_by_move(&p(&[0]), &p(&[6]), 3, false), p(&[0]));
        // caret inside the moved block travels with it
        assert_eq!(p(&[1]).transformed_by_move(&p(&[0]), &p(&[6]), 3, false), p(&[4]));
        // positions after the landing shift by the block width
        assert_eq!(p(&[5]).transformed_by_move(&p(&[0]), &p(&[3]), 1, false), p(&[5]));
        // cross-root moves only touch the affected root
        assert_eq!(p(&[2]).transformed_by_move(&gy(&[0]), &p(&[0]), 1, false), p(&[3]));
    }

    #[test]
    fn combined_maps_into_landing() {
        // block of 3 at [2] lands at [7]; a position inside node 3 follows
        let inside = p(&[3, 1]);
        assert_eq!(inside.combined(&p(&[2]), &p(&[7])), p(&[8, 1]));
    }
}
