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

//! Producing reversion batches: delta reversal and rebase, the
//! move-conflict post-fix, and selection transformation.

use std::cmp::Ordering;

use log::debug;

use scribe_model::{ChangeScope, Delta, ModelError, Operation, Range};

use crate::history_stack::{HistoryItem, SelectionSnapshot};

/// Builds reversion batches inside a change scope.
///
/// Reverting an item walks its deltas newest-first, reverses each, rebases
/// the inverse onto the history tip, corrects symmetric move conflicts,
/// and applies the result; the scope collects everything into one tagged
/// batch. The transformed selection is restored at the tail of the scope.
#[derive(Debug, Default)]
pub struct ReversionEngine;

impl ReversionEngine {
    pub fn new() -> ReversionEngine {
        ReversionEngine
    }

    /// Reverts `item` inside `scope`. Returns the selection to restore, or
    /// `None` when every snapshot range collapses into the graveyard — the
    /// live selection is then left alone.
    pub fn revert(
        &self,
        scope: &mut ChangeScope,
        item: &HistoryItem,
    ) -> Result<Option<SelectionSnapshot>, ModelError> {
        for delta in item.batch.deltas.iter().rev() {
            let mut reversed = delta.reversed();
            reversed.origin = delta.origin_position();
            let rebased = scope.history().transform_to_tip(&reversed);
            if rebased.is_empty() {
                debug!(
                    "reversion delta at version {} fully obsoleted; skipping",
                    delta.base_version
                );
                continue;
            }
            for mut rebased_delta in rebased {
                fix_move_conflict(scope, delta.base_version, &mut rebased_delta);
                scope.apply_delta(rebased_delta)?;
            }
        }

        let selection = transform_selection(scope, item);
        if let Some(snapshot) = &selection {
            scope.set_selection(snapshot.ranges.clone(), snapshot.is_backward);
        }
        Ok(selection)
    }
}

/// The symmetric-move post-fix.
///
/// When a rebased reversion move lands on exactly the same target as a
/// move a previous reversion already applied, classical transformation
/// cannot order the two blocks; the recorded origins can. Only history
/// moves carrying reversion provenance are consulted — for user deltas
/// the engine knows nothing about where their content came from.
fn fix_move_conflict(scope: &ChangeScope, base_version: u64, delta: &mut Delta) {
    if !delta.is_single_move() {
        return;
    }
    let origin = match delta.origin.clone() {
        Some(position) => position,
        None => return,
    };
    for past in scope.history().deltas_since(base_version + 1) {
        if !past.is_single_move() {
            continue;
        }
        let past_origin = match &past.origin {
            Some(position) => position,
            None => continue,
        };
        let (past_target, past_how_many) = match &past.operations[0] {
            Operation::Move { target, how_many, .. } => (target, *how_many),
            _ => continue,
        };
        if let Operation::Move { target, .. } = &mut delta.operations[0] {
            if target == past_target && origin.is_after(past_origin) {
                *target.offset_mut() += past_how_many;
            }
        }
    }
}

/// Maps the snapshot ranges through every operation applied since the
/// reverted batch was recorded — including the reversion itself, which is
/// what carries the selection back. Per original range: transform with
/// spreading on, sort, coalesce touching pieces, then keep the first piece
/// that did not end up in the graveyard.
fn transform_selection(scope: &ChangeScope, item: &HistoryItem) -> Option<SelectionSnapshot> {
    let base_version = item.batch.base_version()?;
    let deltas = scope.history().deltas_since(base_version);

    let mut restored: Vec<Range> = Vec::new();
    for range in &item.selection.ranges {
        let mut pieces = vec![range.clone()];
        for delta in deltas {
            for op in &delta.operations {
                pieces = pieces
                    .iter()
                    .flat_map(|piece| piece.transformed_by_operation(op))
                    .collect();
            }
        }
        pieces.sort_by(|a, b| a.start.compare(&b.start).unwrap_or(Ordering::Equal));
        let mut merged: Vec<Range> = Vec::new();
        for piece in pieces {
            match merged.last_mut() {
                Some(last) if last.end.is_touching(&piece.start) => last.end = piece.end,
                _ => merged.push(piece),
            }
        }
        if let Some(survivor) = merged.into_iter().find(|r| !r.start.root.is_graveyard()) {
            restored.push(survivor);
        }
    }

    if restored.is_empty() {
        return None;
    }
    Some(SelectionSnapshot { ranges: restored, is_backward: item.selection.is_backward })
}
