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

//! Rebase rules for pairs of concurrent operations.

use std::cmp::{max, min};

use crate::operation::{landing_of, Operation};
use crate::position::Position;

// Equal-position ties: content arriving later lands after content already
// put there, with one exception — between two proper moves the ordering is
// the move-conflict post-fix's call, so the default must not shift.
fn tie(a: &Operation, b_is_move: bool) -> bool {
    !(b_is_move && matches!(a, Operation::Move { .. }))
}

/// Rebases `a` over an already-applied `b`, yielding the operations with
/// the same meaning against the post-`b` document. A move whose block is
/// split produces several operations, sequenced so that applying them in
/// order is exact.
pub fn transformed(a: &Operation, b: &Operation) -> Vec<Operation> {
    match b {
        Operation::NoOp => vec![a.clone()],
        Operation::Insert { position, nodes } => by_insertion(a, position, nodes.len()),
        Operation::Move { source, target, how_many } => {
            by_move(a, source, target, *how_many, true)
        }
        Operation::Remove { source, target, how_many }
        | Operation::Reinsert { source, target, how_many } => {
            by_move(a, source, target, *how_many, false)
        }
    }
}

fn by_insertion(a: &Operation, at: &Position, how_many: usize) -> Vec<Operation> {
    match a {
        Operation::NoOp => vec![Operation::NoOp],
        Operation::Insert { position, nodes } => vec![Operation::Insert {
            position: position.transformed_by_insertion(at, how_many, true),
            nodes: nodes.clone(),
        }],
        _ => {
            let (source, target, len) = a.move_spec().unwrap();
            let pieces = split_block_by_insertion(source, len, at, how_many);
            let target = target.transformed_by_insertion(at, how_many, tie(a, false));
            sequence_moves(a, pieces, target)
        }
    }
}

fn by_move(
    a: &Operation,
    b_source: &Position,
    b_target: &Position,
    b_len: usize,
    b_is_move: bool,
) -> Vec<Operation> {
    match a {
        Operation::NoOp => vec![Operation::NoOp],
        Operation::Insert { position, nodes } => vec![Operation::Insert {
            position: position.transformed_by_move(b_source, b_target, b_len, true),
            nodes: nodes.clone(),
        }],
        _ => {
            let (source, target, len) = a.move_spec().unwrap();
            let pieces = split_block_by_move(source, len, b_source, b_target, b_len);
            let target =
                target.transformed_by_move(b_source, b_target, b_len, tie(a, b_is_move));
            sequence_moves(a, pieces, target)
        }
    }
}

/// Splits a flat block by an insertion landing between its nodes; anywhere
/// else the block shifts (or stays) whole. Pieces are `(start, len)` in
/// content order.
fn split_block_by_insertion(
    start: &Position,
    len: usize,
    at: &Position,
    how_many: usize,
) -> Vec<(Position, usize)> {
    let level = start.path.len() - 1;
    let same_list = at.root == start.root
        && at.path.len() == level + 1
        && at.path[..level] == start.path[..level];
    let off = start.path[level];
    if same_list && at.offset() > off && at.offset() < off + len {
        let cut = at.offset() - off;
        let mut second = start.clone();
        second.path[level] = at.offset() + how_many;
        return vec![(start.clone(), cut), (second, len - cut)];
    }
    vec![(start.transformed_by_insertion(at, how_many, true), len)]
}

/// Splits a flat block by another move: the overlap travels to `b`'s
/// landing site, the remainder shifts around the removal and the landing.
fn split_block_by_move(
    start: &Position,
    len: usize,
    b_source: &Position,
    b_target: &Position,
    b_len: usize,
) -> Vec<(Position, usize)> {
    let landing = landing_of(b_source, b_target, b_len);
    let level = b_source.path.len() - 1;
    let same_list = start.root == b_source.root
        && start.path.len() == level + 1
        && start.path[..level] == b_source.path[..level];
    if !same_list {
        let moved = start.transformed_by_move(b_source, b_target, b_len, true);
        return split_block_by_insertion(&moved, len, &landing, b_len);
    }

    let b_off = b_source.path[level];
    let off = start.path[level];
    let pre_len = min(off + len, b_off).saturating_sub(off);
    let mid_from = max(off, b_off);
    let mid_len = min(off + len, b_off + b_len).saturating_sub(mid_from);
    let post_from = max(off, b_off + b_len);
    let post_len = (off + len).saturating_sub(post_from);

    let mut pieces = Vec::new();
    if pre_len > 0 {
        // before b's block: untouched by the removal
        pieces.extend(split_block_by_insertion(start, pre_len, &landing, b_len));
    }
    if mid_len > 0 {
        let mut piece = landing.clone();
        *piece.offset_mut() = landing.offset() + (mid_from - b_off);
        pieces.push((piece, mid_len));
    }
    if post_len > 0 {
        let mut piece = start.clone();
        piece.path[level] = post_from - b_len;
        pieces.extend(split_block_by_insertion(&piece, post_len, &landing, b_len));
    }
    pieces
}

/// Turns block pieces into move operations toward `target`, each piece
/// transformed by the moves emitted before it so the run applies in order.
fn sequence_moves(
    proto: &Operation,
    pieces: Vec<(Position, usize)>,
    target: Position,
) -> Vec<Operation> {
    let mut out: Vec<Operation> = Vec::new();
    for (start, how_many) in pieces {
        if how_many == 0 {
            continue;
        }
        let mut source = start;
        let mut piece_target = target.clone();
        for prev in &out {
            if let Some((prev_source, prev_target, prev_len)) = prev.move_spec() {
                source = source.transformed_by_move(prev_source, prev_target, prev_len, false);
                // later pieces land after the ones already at the target
                piece_target =
                    piece_target.transformed_by_move(prev_source, prev_target, prev_len, true);
            }
        }
        out.push(like(proto, source, piece_target, how_many));
    }
    if out.is_empty() {
        vec![Operation::NoOp]
    } else {
        out
    }
}

fn like(proto: &Operation, source: Position, target: Position, how_many: usize) -> Operation {
    match proto {
        Operation::Remove { .. } => Operation::Remove { source, target, how_many },
        Operation::Reinsert { .. } => Operation::Reinsert { source, target, how_many },
        _ => Operation::Move { source, target, how_many },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;
    use crate::position::RootRef;

    fn p(path: &[usize]) -> Position {
        Position::new(RootRef::root("main"), path.to_vec())
    }

    fn gy(off: usize) -> Position {
        Position::new(RootRef::Graveyard, vec![off])
    }

    fn mv(source: usize, target: usize, how_many: usize) -> Operation {
        Operation::Move { source: p(&[source]), target: p(&[target]), how_many }
    }

    #[test]
    fn insert_by_insert_lands_after() {
        let a = Operation::Insert { position: p(&[3]), nodes: Node::text("x") };
        let b = Operation::Insert { position: p(&[1]), nodes: Node::text("yz") };
        assert_eq!(
            transformed(&a, &b),
            vec![Operation::Insert { position: p(&[5]), nodes: Node::text("x") }]
        );
        // equal positions: the content already there wins the slot
        let b = Operation::Insert { position: p(&[3]), nodes: Node::text("yz") };
        assert_eq!(
            transformed(&a, &b),
            vec![Operation::Insert { position: p(&[5]), nodes: Node::text("x") }]
        );
    }

    #[test]
    fn equal_move_targets_do_not_shift() {
        // two proper moves landing on one target stay put; ordering them is
        // the reversion engine's conflict fix, not the transform's
        let a = mv(4, 0, 1);
        let b = mv(5, 0, 1);
        let out = transformed(&a, &b);
        assert_eq!(out, vec![mv(5, 0, 1)]);
    }

    #[test]
    fn reinsert_after_reinsert_lands_behind() {
        // both reinsert at 0; the one transformed later goes behind the
        // content the first already restored
        let a = Operation::Reinsert { source: gy(0), target: p(&[0]), how_many: 2 };
        let b = Operation::Reinsert { source: gy(2), target: p(&[0]), how_many: 3 };
        let out = transformed(&a, &b);
        assert_eq!(
            out,
            vec![Operation::Reinsert { source: gy(0), target: p(&[3]), how_many: 2 }]
        );
    }

    #[test]
    fn graveyard_targets_append() {
        let a = Operation::Remove { source: p(&[4]), target: gy(0), how_many: 1 };
        let b = Operation::Remove { source: p(&[0]), target: gy(0), how_many: 2 };
        let out = transformed(&a, &b);
        assert_eq!(
            out,
            vec![Operation::Remove { source: p(&[2]), target: gy(2), how_many: 1 }]
        );
    }

    #[test]
    fn move_split_by_insertion() {
        // block [0, 3) with two nodes inserted at 1
        let a = mv(0, 6, 3);
        let b = Operation::Insert { position: p(&[1]), nodes: Node::text("xy") };
        let out = transformed(&a, &b);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], mv(0, 8, 1));
        // after the first piece moved away, the second sits two slots left
        // and lands right behind it
        match &out[1] {
            Operation::Move { source, target, how_many } => {
                assert_eq!((source, target, *how_many), (&p(&[2]), &p(&[8]), 2));
            }
            other => panic!("unexpected op: {:?}", other),
        }
    }

    #[test]
    fn move_annihilated_to_noop() {
        let a = mv(2, 2, 0);
        let b = Operation::Insert { position: p(&[0]), nodes: Node::text("q") };
        assert_eq!(transformed(&a, &b), vec![Operation::NoOp]);
    }

    #[test]
    fn move_overlap_travels_with_other_move() {
        // a moves [1, 4); b already removed [2, 4) to the graveyard
        let a = mv(1, 6, 3);
        let b = Operation::Remove { source: p(&[2]), target: gy(0), how_many: 2 };
        let out = transformed(&a, &b);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], mv(1, 4, 1));
        match &out[1] {
            Operation::Move { source, target, how_many } => {
                assert_eq!(source, &gy(0));
                assert_eq!(*how_many, 2);
                // behind the first piece at the target
                assert_eq!(target, &p(&[4]));
            }
            other => panic!("unexpected op: {:?}", other),
        }
    }
}
