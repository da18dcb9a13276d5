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

//! Routing batches between the twin stacks and driving reversion steps.

use std::collections::VecDeque;

use log::warn;

use scribe_model::{Batch, BatchId, BatchKind, Document};

use crate::error::UndoError;
use crate::history_stack::{HistoryItem, HistoryStack, SelectionSnapshot};
use crate::reversion::ReversionEngine;

/// Which of the two externally triggerable operations ran.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepKind {
    Undo,
    Redo,
}

/// Events the controller emits for the surrounding editor, drained in the
/// same style as the document change queue.
#[derive(Clone, Debug)]
pub enum UndoEvent {
    /// A stack changed; carries the refreshed command-enabled state.
    StackChanged { undo_enabled: bool, redo_enabled: bool },
    /// A step completed; carries the original batch that was reverted.
    Reverted { step: StepKind, batch: Batch },
}

/// Owns the undo-side and redo-side stacks, classifies every batch on the
/// document change stream, and drives the reversion engine.
///
/// The change stream doubles as the signal path between the two sides: a
/// step applies its reversion inside one change scope, the document
/// re-delivers it as a kind-tagged batch, and the classifier routes that
/// batch to the opposite stack. Redo-of-undo and undo-of-redo fall out of
/// the loop.
#[derive(Debug, Default)]
pub struct UndoController {
    undo_stack: HistoryStack,
    redo_stack: HistoryStack,
    engine: ReversionEngine,
    events: VecDeque<UndoEvent>,
}

impl UndoController {
    pub fn new() -> UndoController {
        UndoController::default()
    }

    pub fn undo_enabled(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn redo_enabled(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_stack(&self) -> &HistoryStack {
        &self.undo_stack
    }

    pub fn redo_stack(&self) -> &HistoryStack {
        &self.redo_stack
    }

    /// Drains the controller's event queue.
    pub fn take_events(&mut self) -> Vec<UndoEvent> {
        self.events.drain(..).collect()
    }

    /// Drains the document change queue and routes each batch: user
    /// batches land on the undo stack and clear the redo stack; reversion
    /// batches land on the stack opposite the side that emitted them.
    /// Batches that never touch a document root are not revertible and are
    /// skipped.
    pub fn process_changes(&mut self, document: &mut Document) {
        for event in document.take_changes() {
            if !event.batch.touches_document() {
                continue;
            }
            let snapshot = SelectionSnapshot::of(&event.selection_before);
            let before = (self.undo_stack.generation(), self.redo_stack.generation());
            match event.batch.kind {
                BatchKind::User => {
                    self.undo_stack.record(event.batch, snapshot);
                    self.redo_stack.clear();
                }
                BatchKind::Undo => self.redo_stack.record(event.batch, snapshot),
                BatchKind::Redo => self.undo_stack.record(event.batch, snapshot),
            }
            if before != (self.undo_stack.generation(), self.redo_stack.generation()) {
                self.emit_stack_changed();
            }
        }
    }

    /// Reverts a batch from the undo stack — the given one, or the top —
    /// and routes the resulting `Undo`-tagged batch to the redo stack.
    pub fn undo_step(
        &mut self,
        document: &mut Document,
        target: Option<BatchId>,
    ) -> Result<(), UndoError> {
        self.step(document, target, StepKind::Undo)
    }

    /// Reverts a batch from the redo stack — the given one, or the top —
    /// and routes the resulting `Redo`-tagged batch to the undo stack.
    pub fn redo_step(
        &mut self,
        document: &mut Document,
        target: Option<BatchId>,
    ) -> Result<(), UndoError> {
        self.step(document, target, StepKind::Redo)
    }

    fn step(
        &mut self,
        document: &mut Document,
        target: Option<BatchId>,
        step: StepKind,
    ) -> Result<(), UndoError> {
        let (stack, kind) = match step {
            StepKind::Undo => (&self.undo_stack, BatchKind::Undo),
            StepKind::Redo => (&self.redo_stack, BatchKind::Redo),
        };
        let item: HistoryItem = match stack.peek_item(target) {
            Some(item) => item.clone(),
            None => {
                let err = match target {
                    Some(id) if !stack.is_empty() => UndoError::NotFound(id),
                    _ => UndoError::EmptyStack,
                };
                warn!("{:?} step is a no-op: {}", step, err);
                return Err(err);
            }
        };

        // the item is consumed only once the scope has committed
        let engine = &self.engine;
        document
            .enqueue_change(kind, |scope| engine.revert(scope, &item))
            .map_err(UndoError::from)?;

        let stack = match step {
            StepKind::Undo => &mut self.undo_stack,
            StepKind::Redo => &mut self.redo_stack,
        };
        let _ = stack.pop_item(Some(item.batch.id));
        self.emit_stack_changed();
        self.events.push_back(UndoEvent::Reverted { step, batch: item.batch });
        self.process_changes(document);
        Ok(())
    }

    fn emit_stack_changed(&mut self) {
        self.events.push_back(UndoEvent::StackChanged {
            undo_enabled: self.undo_enabled(),
            redo_enabled: self.redo_enabled(),
        });
    }
}
