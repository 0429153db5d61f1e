//! The interception pipeline.
//!
//! Every command the host wants to run flows through `dispatch`: a
//! pre-dispatch pass may rewrite or refuse it, the command executes,
//! and a post-dispatch pass settles the per-view bookkeeping. The host
//! also forwards its view events (selection changed, buffer modified,
//! view deactivated, about to save) and reads back `Effect`s it must
//! perform itself, such as opening a one-character prompt.

use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::buffer::TextView;
use crate::command::{Command, CommandKind};
use crate::commands;
use crate::editor::Editor;
use crate::facade::CmdUtil;
use crate::region::Region;
use crate::state::{PendingPrompt, PromptKind};
use crate::tracing::CursorSnapshot;

/// Pre-dispatch verdict for an incoming command.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// Run the command as-is
    Proceed,
    /// Run this command instead
    Replace(Command),
    /// Do not run anything
    Block,
}

/// Side effects the host must perform; drained with [`Pipeline::take_effects`].
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Open a single-line input prompt with this label
    Prompt { label: String },
    /// Close any open prompt or transient panel
    HidePanel,
}

/// When a deferred task is still allowed to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validity {
    Always,
    /// Only while the kill transaction captured at enqueue time is still
    /// the pending one.
    KillSeq(u64),
}

#[derive(Debug, Clone)]
pub struct Task {
    pub cmd: Command,
    pub validity: Validity,
}

#[derive(Debug, Default)]
pub struct TaskQueue {
    queue: VecDeque<Task>,
}

impl TaskQueue {
    pub fn push(&mut self, cmd: Command, validity: Validity) {
        self.queue.push_back(Task { cmd, validity });
    }

    pub fn pop(&mut self) -> Option<Task> {
        self.queue.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Keys the host's keybinding conditionals may ask about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKey {
    IsearchActive,
    HasPrefixArgument,
    HasVisibleMark,
}

pub struct Pipeline<B: TextView> {
    pub ed: Editor<B>,
    pub tasks: TaskQueue,
    effects: Vec<Effect>,
}

impl<B: TextView> Pipeline<B> {
    pub fn new(ed: Editor<B>) -> Self {
        Self {
            ed,
            tasks: TaskQueue::default(),
            effects: Vec::new(),
        }
    }

    pub fn push_effect(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    pub fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Run one incoming command through the full cycle: pre-dispatch
    /// rewrite, execution, post-dispatch bookkeeping, deferred tasks.
    /// An escape wrapper loops so the wrapped command re-enters the
    /// cycle after the search session closes.
    pub fn dispatch(&mut self, cmd: Command) {
        self.ed.status = None;
        let mut pending = Some(cmd);
        while let Some(cmd) = pending.take() {
            let cmd = match self.on_text_command(&cmd) {
                Dispatch::Block => return,
                Dispatch::Replace(c) => c,
                Dispatch::Proceed => cmd,
            };
            if let Command::IsearchEscape { next } = cmd {
                commands::finish_isearch(self);
                pending = Some(*next);
                continue;
            }
            let before = CursorSnapshot::capture(&self.ed.view);
            self.execute(&cmd);
            if let Some(diff) = before.diff(&CursorSnapshot::capture(&self.ed.view)) {
                debug!(%diff, "cursors changed");
            }
            self.on_post_text_command(&cmd);
            self.run_pending();
        }
    }

    /// Pre-dispatch pass. Public so a host that runs commands itself can
    /// still ask for the verdict first.
    pub fn on_text_command(&mut self, cmd: &Command) -> Dispatch {
        trace!(?cmd, "pre-dispatch");

        // A foreign command while a search is open closes the search
        // first, then re-issues the command.
        if self.ed.isearch.is_some()
            && !matches!(
                cmd,
                Command::Isearch { .. } | Command::IsearchEscape { .. } | Command::Quit
            )
        {
            return Dispatch::Replace(Command::IsearchEscape {
                next: Box::new(cmd.clone()),
            });
        }

        // One kill transaction at a time.
        if cmd.is_kill()
            && !matches!(cmd, Command::FinishMoveThenDelete)
            && self.ed.state.pending_kill.is_some()
        {
            self.ed.set_status("A kill is already in progress");
            return Dispatch::Block;
        }

        if cmd.owns_state() {
            return Dispatch::Proceed;
        }

        // Native command bookkeeping the host cannot do for us.
        self.ed.state.this_cmd = Some(cmd.kind());
        if let Command::DragSelect { by, .. } = cmd {
            self.ed.state.drag_count = if by.is_some() { 2 } else { 0 };
        }

        let mut rewritten = cmd.clone();
        let mut changed = false;

        // An active mark turns plain motion into extending motion.
        if self.ed.state.active_mark {
            match &mut rewritten {
                Command::Move { extend, .. } | Command::MoveTo { extend, .. } if !*extend => {
                    *extend = true;
                    changed = true;
                }
                _ => {}
            }
        }

        // A prefix argument turns a repeatable command into a repeat
        // wrapper. A negative count flips the direction once; the wrapper
        // runs the absolute number of times.
        if self.ed.state.has_prefix_arg() && rewritten.is_repeatable() {
            let count = self.ed.state.get_count(true);
            let mut inner = rewritten;
            if count < 0 {
                inner.invert_forward();
            }
            rewritten = Command::DoTimes {
                times: count.unsigned_abs() as usize,
                cmd: Box::new(inner),
            };
            changed = true;
        }

        // Scroll amount scales by the argument directly.
        if let Command::ScrollLines { amount } = &mut rewritten {
            if self.ed.state.has_prefix_arg() {
                *amount *= self.ed.state.get_count(true);
                changed = true;
            }
        }

        if changed {
            debug!(from = ?cmd, to = ?rewritten, "command rewritten");
            Dispatch::Replace(rewritten)
        } else {
            Dispatch::Proceed
        }
    }

    fn execute(&mut self, cmd: &Command) {
        if cmd.owns_state() {
            self.ed.state.this_cmd = Some(cmd.kind());
            commands::run(self, cmd);
            self.ed.state.last_cmd = self.ed.state.this_cmd;
            if !matches!(cmd, Command::UniversalArgument(_)) {
                self.ed.state.reset_argument();
            }
        } else {
            self.ed.run_native(cmd);
        }
    }

    /// Run a nested command on behalf of a wrapper, bypassing the hooks
    /// and the bookkeeping so `last_cmd` and the argument accumulator
    /// stay those of the outer command.
    pub(crate) fn run_nested(&mut self, cmd: &Command) {
        if cmd.owns_state() {
            commands::run(self, cmd);
        } else {
            self.ed.run_native(cmd);
        }
    }

    /// Post-dispatch pass for a command that just ran.
    pub fn on_post_text_command(&mut self, cmd: &Command) {
        trace!(?cmd, "post-dispatch");
        if !cmd.owns_state() {
            // A drag-built region lasts only until the next command. The
            // context-menu click is the exception so the menu can act on
            // the region.
            if self.ed.state.active_mark
                && self.ed.state.last_cmd == Some(CommandKind::DragSelect)
                && !matches!(cmd.kind(), CommandKind::DragSelect | CommandKind::ContextMenu)
            {
                CmdUtil::new(&mut self.ed).set_active_mark_mode(false);
            }
            if self.mutates_buffer(cmd) && self.ed.state.active_mark {
                self.ed.state.active_mark = false;
            }
            self.ed.state.last_cmd = self.ed.state.this_cmd;
            self.ed.state.reset_argument();
        }

        // With the mark active, re-derive the selection from mark to
        // point after any motion.
        if self.ed.state.active_mark && !self.mutates_buffer(cmd) {
            let regions = CmdUtil::new(&mut self.ed).get_regions();
            if !regions.is_empty() {
                self.ed.view.set_cursors(regions);
            }
        }

        if cmd.ensure_visible() && self.ed.view.cursors().len() == 1 {
            let pos = self.ed.view.cursors()[0].b;
            self.ed.view.show(pos);
        }
    }

    fn mutates_buffer(&self, cmd: &Command) -> bool {
        matches!(
            cmd,
            Command::Insert { .. }
                | Command::LeftDelete
                | Command::RightDelete
                | Command::Undo
                | Command::Redo
        )
    }

    /// Drain the deferred tasks whose validity still holds.
    pub fn run_pending(&mut self) {
        while let Some(task) = self.tasks.pop() {
            let valid = match task.validity {
                Validity::Always => true,
                Validity::KillSeq(seq) => {
                    self.ed.state.kill_seq == seq && self.ed.state.pending_kill.is_some()
                }
            };
            if valid {
                self.execute(&task.cmd);
            } else {
                debug!(cmd = ?task.cmd, "stale deferred task dropped");
            }
        }
    }

    // =========================================================================
    // View events forwarded by the host
    // =========================================================================

    /// Selection-changed notification. The second notification after a
    /// double or triple click plants the mark at the drag origin so the
    /// growing selection behaves like an active-mark region; the first
    /// notification of a plain click dismisses any visible mark instead.
    pub fn on_selection_modified(&mut self) {
        if self.ed.state.this_cmd == Some(CommandKind::DragSelect)
            && self.ed.view.cursors().len() == 1
        {
            if self.ed.state.drag_count == 2 {
                if let Some(first) = self.ed.view.cursors().first().copied() {
                    let mut u = CmdUtil::new(&mut self.ed);
                    u.set_mark_at(vec![Region::point(first.a)]);
                    u.set_active_mark_mode(true);
                }
            } else if self.ed.state.drag_count == 0 && self.ed.state.active_mark {
                let mut u = CmdUtil::new(&mut self.ed);
                u.set_active_mark_mode(false);
                u.make_cursors_empty();
            }
        }
        self.ed.state.drag_count += 1;
    }

    /// Buffer-modified notification for edits that did not come through
    /// `dispatch` (typing routed around the pipeline, tool edits).
    pub fn on_modified(&mut self) {
        self.ed.state.this_cmd = None;
        self.ed.status = None;
        if self.ed.state.active_mark {
            self.ed.state.active_mark = false;
        }
    }

    /// The view lost focus; an open search accepts its position.
    pub fn on_deactivated(&mut self) {
        commands::finish_isearch(self);
    }

    /// About-to-save hook: trailing-blank trimming and the final newline,
    /// per config.
    pub fn on_pre_save(&mut self) {
        if self.ed.config.trim_trailing_white_space_on_save {
            for row in (0..self.ed.view.line_count()).rev() {
                let span = self.ed.view.line_span(self.ed.view.text_point(row, 0));
                let text = self.ed.view.substr(span);
                let trimmed = text.trim_end_matches([' ', '\t']).chars().count();
                if trimmed < text.chars().count() {
                    self.ed
                        .view
                        .erase(Region::new(span.begin() + trimmed, span.end()));
                }
            }
        }
        if self.ed.config.ensure_newline_at_eof_on_save {
            let size = self.ed.view.size();
            if size > 0 && self.ed.view.char_at(size - 1) != Some('\n') {
                self.ed.view.insert(size, "\n");
            }
        }
    }

    /// Answer a keybinding conditional.
    pub fn query_context(&self, key: ContextKey) -> bool {
        match key {
            ContextKey::IsearchActive => self.ed.isearch.is_some(),
            ContextKey::HasPrefixArgument => self.ed.state.has_prefix_arg(),
            ContextKey::HasVisibleMark => {
                self.ed.config.cancel_mark_enabled && self.ed.state.active_mark
            }
        }
    }

    // =========================================================================
    // Prompt plumbing
    // =========================================================================

    /// Incremental prompt input. Character prompts complete on the first
    /// character typed.
    pub fn prompt_change(&mut self, text: &str) {
        let complete = matches!(
            self.ed.state.pending_prompt,
            Some(PendingPrompt {
                kind: PromptKind::JumpChar { .. },
                ..
            })
        );
        if complete && !text.is_empty() {
            self.prompt_done(text);
        }
    }

    /// The prompt was confirmed with `text`.
    pub fn prompt_done(&mut self, text: &str) {
        let prompt = match self.ed.state.pending_prompt.take() {
            Some(p) => p,
            None => return,
        };
        self.push_effect(Effect::HidePanel);
        match prompt.kind {
            PromptKind::JumpChar { plus_one, zap } => {
                let ch = match text.chars().next() {
                    Some(c) => c,
                    None => {
                        self.abort_pending_kill();
                        return;
                    }
                };
                self.jump_cursors_to_char(ch, plus_one, prompt.count);
                if zap {
                    let seq = self.ed.state.kill_seq;
                    self.tasks
                        .push(Command::FinishMoveThenDelete, Validity::KillSeq(seq));
                    self.run_pending();
                }
            }
            PromptKind::JumpWord => {
                if !text.is_empty() {
                    self.jump_cursors_to_text(text, prompt.count);
                }
            }
            PromptKind::GotoLine => {
                if let Ok(line) = text.trim().parse::<usize>() {
                    CmdUtil::new(&mut self.ed).goto_line(line);
                }
            }
        }
    }

    /// The prompt was dismissed without input.
    pub fn prompt_cancel(&mut self) {
        if self.ed.state.pending_prompt.take().is_some() {
            self.push_effect(Effect::HidePanel);
            self.abort_pending_kill();
        }
    }

    fn abort_pending_kill(&mut self) {
        if let Some(helper) = self.ed.state.take_pending_kill() {
            let orig = helper.orig_cursors().to_vec();
            self.ed.view.set_cursors(orig);
        }
    }

    fn jump_cursors_to_char(&mut self, ch: char, plus_one: bool, count: i64) {
        let forward = count >= 0;
        let times = count.unsigned_abs().max(1);
        let mut util = CmdUtil::new(&mut self.ed);
        util.for_each_cursor(|ed, r| {
            let mut pos = r.b;
            for _ in 0..times {
                pos = if forward {
                    let mut scan = pos;
                    let hit = loop {
                        match ed.view.char_at(scan) {
                            Some(c) if c == ch => break scan,
                            Some(_) => scan += 1,
                            None => return None,
                        }
                    };
                    hit + 1
                } else {
                    let mut scan = pos;
                    loop {
                        if scan == 0 {
                            return None;
                        }
                        scan -= 1;
                        match ed.view.char_at(scan) {
                            Some(c) if c == ch => break scan,
                            _ => {}
                        }
                    }
                };
            }
            // Land after the character going forward, on it going
            // backward; without plus-one, stop just before it.
            let landing = if forward {
                if plus_one {
                    pos
                } else {
                    pos.saturating_sub(1)
                }
            } else if plus_one {
                pos
            } else {
                (pos + 1).min(ed.view.size())
            };
            Some(Region::point(landing))
        });
        util.ensure_visible();
    }

    fn jump_cursors_to_text(&mut self, text: &str, count: i64) {
        let times = count.unsigned_abs().max(1);
        let mut util = CmdUtil::new(&mut self.ed);
        util.for_each_cursor(|ed, r| {
            let mut pos = r.b;
            for _ in 0..times {
                pos = ed.view.find(text, pos + 1)?.begin();
            }
            Some(Region::point(pos))
        });
        util.ensure_visible();
    }
}
