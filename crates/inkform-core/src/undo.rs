//! Undo checkpoints and edit coalescing.

use std::sync::atomic::{AtomicU64, Ordering};

/// Opaque identity of an undo checkpoint.
///
/// Tokens are only ever compared for equality; they carry no ordering and
/// nothing can be learned from their contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CheckpointToken(u64);

impl CheckpointToken {
    /// Mint a token distinct from every other token minted in this process.
    pub fn fresh() -> Self {
        static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);
        Self(NEXT_TOKEN.fetch_add(1, Ordering::Relaxed))
    }
}

/// The undo log the panel checkpoints into.
pub trait UndoLog {
    /// Record the current state as a new checkpoint.
    fn push_checkpoint(&mut self);

    /// Check if there are no checkpoints.
    fn is_empty(&self) -> bool;

    /// Token of the most recent checkpoint, or `None` when empty.
    fn peek(&self) -> Option<CheckpointToken>;
}

/// Collapses a burst of edits into a single undo checkpoint.
///
/// The first edit of a gesture pushes a checkpoint and remembers its token.
/// Later edits push nothing while that checkpoint is still the top of the
/// log. Anything else pushing in between, or a [`reset`](Self::reset) when
/// the selection changes, starts a new gesture.
#[derive(Debug, Clone, Default)]
pub struct UndoCoalescer {
    previous: Option<CheckpointToken>,
}

impl UndoCoalescer {
    /// Create a coalescer with no gesture in progress.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the current gesture.
    pub fn reset(&mut self) {
        self.previous = None;
    }

    /// Token of the checkpoint pushed for the current gesture.
    pub fn previous(&self) -> Option<CheckpointToken> {
        self.previous
    }

    /// Push a checkpoint unless the current gesture already owns the top one.
    /// Returns true if a checkpoint was pushed.
    pub fn checkpoint<L: UndoLog + ?Sized>(&mut self, log: &mut L) -> bool {
        let top = if log.is_empty() { None } else { log.peek() };
        if top.is_some() && top == self.previous {
            return false;
        }
        log.push_checkpoint();
        self.previous = log.peek();
        true
    }
}

/// How a binding checkpoints its edits.
#[derive(Debug, Clone)]
pub enum CheckpointPolicy {
    /// One checkpoint per submitted edit (text fields, checkboxes).
    EveryEdit,
    /// One checkpoint per gesture (color pickers, sliders).
    Coalesced(UndoCoalescer),
}

impl CheckpointPolicy {
    /// Policy for discrete controls.
    pub fn discrete() -> Self {
        Self::EveryEdit
    }

    /// Policy for continuous controls.
    pub fn continuous() -> Self {
        Self::Coalesced(UndoCoalescer::new())
    }

    /// Checkpoint ahead of an edit. Returns true if a checkpoint was pushed.
    pub fn checkpoint<L: UndoLog + ?Sized>(&mut self, log: &mut L) -> bool {
        match self {
            Self::EveryEdit => {
                log.push_checkpoint();
                true
            }
            Self::Coalesced(coalescer) => coalescer.checkpoint(log),
        }
    }

    /// Start a new gesture.
    pub fn reset(&mut self) {
        if let Self::Coalesced(coalescer) = self {
            coalescer.reset();
        }
    }
}
