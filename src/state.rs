//! Per-buffer interaction state.
//!
//! One `ViewState` lives as long as its buffer and carries everything the
//! pipeline tracks across commands: the prefix-argument accumulator, the
//! last/current command, active-mark mode, drag tracking, the mark ring,
//! and the pending slots for operations that span a modal prompt.

use std::collections::HashMap;

use crate::command::{ArgToken, CommandKind};
use crate::kill::MoveThenDeleteHelper;
use crate::region::Region;

const MARK_RING_DEPTH: usize = 16;

/// A saved cursor set on the mark ring.
#[derive(Debug, Clone)]
pub struct MarkEntry {
    pub cursors: Vec<Region>,
    /// Whether the save captured a live region rather than bare cursors
    pub was_region: bool,
}

/// Bounded stack of saved cursor sets. Pushing never drops the newest
/// save; at capacity the oldest entry goes instead.
#[derive(Debug, Default)]
pub struct MarkRing {
    entries: Vec<MarkEntry>,
}

impl MarkRing {
    /// Push a new mark. `was_region` records whether the saved cursors
    /// carried a selection.
    pub fn set(&mut self, cursors: Vec<Region>, was_region: bool) {
        self.entries.push(MarkEntry { cursors, was_region });
        if self.entries.len() > MARK_RING_DEPTH {
            self.entries.remove(0);
        }
    }

    /// Pop the most recent mark. None on an empty ring (the caller reports
    /// the failure; nothing is mutated).
    pub fn pop(&mut self) -> Option<Vec<Region>> {
        self.entries.pop().map(|e| e.cursors)
    }

    /// The most recent mark without removing it.
    pub fn top(&self) -> Option<&[Region]> {
        self.entries.last().map(|e| e.cursors.as_slice())
    }

    /// Replace the most recent mark in place (point/mark swap).
    pub fn replace_top(&mut self, cursors: Vec<Region>) {
        if let Some(top) = self.entries.last_mut() {
            top.cursors = cursors;
        } else {
            self.set(cursors, false);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// What a pending modal prompt will do with its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Jump to the typed character; `zap` also finishes a kill transaction
    JumpChar { plus_one: bool, zap: bool },
    /// Jump past the typed word (acts on confirm, not per keystroke)
    JumpWord,
    /// Go to the typed line number
    GotoLine,
}

/// A modal prompt whose input arrives after the command returns.
#[derive(Debug, Clone)]
pub struct PendingPrompt {
    pub kind: PromptKind,
    /// Count captured when the prompt was opened
    pub count: i64,
}

/// Cycling state for the recenter command, held per view so buffers never
/// interfere with each other.
#[derive(Debug, Default, Clone)]
pub struct RecenterState {
    pub last_sel: Option<Region>,
    /// 0 = center, 1 = top, 2 = bottom
    pub last_position: u8,
}

/// Per-buffer interaction state. See the module docs.
#[derive(Debug, Default)]
pub struct ViewState {
    pub this_cmd: Option<CommandKind>,
    pub last_cmd: Option<CommandKind>,
    argument_value: i64,
    pub argument_supplied: bool,
    argument_negative: bool,
    pub active_mark: bool,
    /// Selection-changed notifications seen since the last drag started
    pub drag_count: u32,
    pub mark_ring: MarkRing,
    pub pending_kill: Option<MoveThenDeleteHelper>,
    pub pending_prompt: Option<PendingPrompt>,
    /// Bumps whenever the pending-kill slot changes; deferred tasks use it
    /// to detect that the transaction they expected is gone.
    pub kill_seq: u64,
    pub recenter: RecenterState,
    saved_cursors: HashMap<&'static str, Vec<Region>>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Prefix-argument accumulator
    // =========================================================================

    /// Feed one token to the accumulator.
    pub fn supply_argument(&mut self, token: ArgToken) {
        if !self.argument_supplied {
            self.argument_supplied = true;
            match token {
                ArgToken::ByFour => self.argument_value = 4,
                ArgToken::Negate => self.argument_negative = true,
                ArgToken::Digit(d) => self.argument_value = i64::from(d),
            }
        } else {
            match token {
                ArgToken::ByFour => self.argument_value *= 4,
                ArgToken::Digit(d) => {
                    self.argument_value = self.argument_value * 10 + i64::from(d)
                }
                ArgToken::Negate => {
                    if self.argument_value == 0 {
                        self.argument_negative = !self.argument_negative;
                    } else {
                        self.argument_value = -self.argument_value;
                    }
                }
            }
        }
    }

    /// Resolve the accumulator to a count. Absent argument means 1. A bare
    /// negate means -1. Does not reset; that happens at the command
    /// boundary.
    pub fn get_count(&self, signed_ok: bool) -> i64 {
        let mut count = if !self.argument_supplied {
            1
        } else if self.argument_negative {
            if self.argument_value == 0 {
                -1
            } else {
                -self.argument_value
            }
        } else if self.argument_value == 0 {
            // an even run of bare negates cancels back to plus one
            1
        } else {
            self.argument_value
        };
        if !signed_ok {
            count = count.abs();
        }
        count
    }

    pub fn has_prefix_arg(&self) -> bool {
        self.argument_supplied
    }

    pub fn reset_argument(&mut self) {
        self.argument_value = 0;
        self.argument_supplied = false;
        self.argument_negative = false;
    }

    // =========================================================================
    // Command bookkeeping
    // =========================================================================

    /// Whether the previous command captured text into the kill ring.
    pub fn last_was_kill_cmd(&self) -> bool {
        self.last_cmd.map(|k| k.is_kill()).unwrap_or(false)
    }

    /// Take the pending kill transaction, bumping the validity sequence.
    pub fn take_pending_kill(&mut self) -> Option<MoveThenDeleteHelper> {
        let helper = self.pending_kill.take();
        if helper.is_some() {
            self.kill_seq += 1;
        }
        helper
    }

    /// Park a kill transaction until a later command finishes it. At most
    /// one may be pending; a second is a programming error.
    pub fn set_pending_kill(&mut self, helper: MoveThenDeleteHelper) -> bool {
        debug_assert!(
            self.pending_kill.is_none(),
            "a kill transaction is already pending"
        );
        if self.pending_kill.is_some() {
            return false;
        }
        self.pending_kill = Some(helper);
        self.kill_seq += 1;
        true
    }

    // =========================================================================
    // Named cursor snapshots
    // =========================================================================

    pub fn save_cursors(&mut self, tag: &'static str, cursors: Vec<Region>) {
        self.saved_cursors.insert(tag, cursors);
    }

    pub fn restore_cursors(&mut self, tag: &'static str) -> Option<Vec<Region>> {
        self.saved_cursors.remove(tag)
    }
}
