//! The editor a pipeline mediates.
//!
//! `Editor` bundles a text view with the per-view mediation state, the
//! kill ring, the config, and an optional open search session. It also
//! executes the host-native command family directly; reserved commands
//! live in `commands`.

use tracing::debug;

use crate::buffer::{self, Boundary, TextView};
use crate::command::{Command, DragUnit, MoveTarget, MoveUnit};
use crate::config::EmaxConfig;
use crate::kill_ring::KillRing;
use crate::region::Region;
use crate::search::IsearchSession;
use crate::state::ViewState;

pub struct Editor<B: TextView> {
    pub view: B,
    pub state: ViewState,
    pub config: EmaxConfig,
    pub kill_ring: KillRing,
    pub isearch: Option<IsearchSession>,
    pub isearch_history: Vec<String>,
    /// Last message for the host's status line, cleared on new input.
    pub status: Option<String>,
}

impl<B: TextView> Editor<B> {
    pub fn new(view: B) -> Self {
        Self::with_config(view, EmaxConfig::default())
    }

    pub fn with_config(view: B, config: EmaxConfig) -> Self {
        Self {
            view,
            state: ViewState::new(),
            config,
            kill_ring: KillRing::default(),
            isearch: None,
            isearch_history: Vec::new(),
            status: None,
        }
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = Some(msg.into());
    }

    /// Execute a host-native command. Reserved commands are not accepted
    /// here; the dispatcher routes them to their own handlers.
    pub fn run_native(&mut self, cmd: &Command) {
        debug!(?cmd, "native command");
        match cmd {
            Command::Move {
                by,
                forward,
                extend,
            } => self.do_move(*by, *forward, *extend),
            Command::MoveTo { to, extend } => self.do_move_to(*to, *extend),
            Command::LeftDelete => self.do_delete(false),
            Command::RightDelete => self.do_delete(true),
            Command::Undo => {
                self.view.undo();
            }
            Command::Redo => {
                self.view.redo();
            }
            Command::Insert { characters } => self.do_insert(characters),
            Command::ScrollLines { amount } => self.view.scroll_lines(*amount),
            Command::DragSelect { at, by } => self.do_drag_select(*at, *by),
            Command::ContextMenu => {}
            other => {
                debug!(?other, "not a native command, ignored");
            }
        }
    }

    // =========================================================================
    // Cursor motion
    // =========================================================================

    /// Map every cursor point through `f`. Without `extend` a non-empty
    /// cursor first collapses to the edge in the direction of travel, as
    /// the host does, and does not move further.
    fn move_points(&mut self, forward: bool, extend: bool, f: impl Fn(&B, usize) -> usize) {
        let cursors: Vec<Region> = self
            .view
            .cursors()
            .iter()
            .map(|r| {
                if extend {
                    Region::new(r.a, f(&self.view, r.b))
                } else if !r.is_empty() {
                    Region::point(if forward { r.end() } else { r.begin() })
                } else {
                    Region::point(f(&self.view, r.b))
                }
            })
            .collect();
        self.view.set_cursors(cursors);
    }

    fn do_move(&mut self, by: MoveUnit, forward: bool, extend: bool) {
        let separators = self.config.word_separators.clone();
        match by {
            MoveUnit::Characters => self.move_points(forward, extend, |view, pos| {
                if forward {
                    (pos + 1).min(view.size())
                } else {
                    pos.saturating_sub(1)
                }
            }),
            MoveUnit::Words => self.move_points(forward, extend, |view, pos| {
                let boundary = if forward {
                    Boundary::WordEnd
                } else {
                    Boundary::WordStart
                };
                buffer::find_by_class(view, pos, forward, boundary, &separators)
            }),
            MoveUnit::Lines => self.move_lines(forward, extend, 1),
            MoveUnit::Pages => {
                let lines = self.page_lines();
                self.move_lines(forward, extend, lines);
            }
        }
    }

    fn page_lines(&self) -> usize {
        let visible = self.view.visible_region();
        let (top, _) = self.view.rowcol(visible.begin());
        let (bottom, _) = self.view.rowcol(visible.end());
        (bottom - top).max(1)
    }

    /// Vertical motion keeps the column, clamped to the target line.
    fn move_lines(&mut self, forward: bool, extend: bool, count: usize) {
        self.move_points(forward, extend, |view, pos| {
            let (row, col) = view.rowcol(pos);
            let target = if forward {
                (row + count).min(view.line_count().saturating_sub(1))
            } else {
                row.saturating_sub(count)
            };
            view.text_point(target, col)
        });
    }

    fn do_move_to(&mut self, to: MoveTarget, extend: bool) {
        self.move_points(true, extend, |view, pos| match to {
            MoveTarget::HardBol => view.line_span(pos).begin(),
            MoveTarget::Bol => {
                // Smart home: first non-blank, or column zero when already
                // at or before it.
                let span = view.line_span(pos);
                let mut first = span.begin();
                while first < span.end() {
                    match view.char_at(first) {
                        Some(c) if c == ' ' || c == '\t' => first += 1,
                        _ => break,
                    }
                }
                if pos == first || pos < first {
                    span.begin()
                } else {
                    first
                }
            }
            MoveTarget::Eol => view.line_span(pos).end(),
            MoveTarget::Bof => 0,
            MoveTarget::Eof => view.size(),
        });
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Backspace or forward delete at every cursor, back to front so the
    /// earlier erasures do not shift the later positions mid-loop.
    fn do_delete(&mut self, forward: bool) {
        let mut cursors: Vec<Region> = self.view.cursors().to_vec();
        cursors.sort_by_key(|r| r.begin());
        for r in cursors.iter().rev() {
            let target = if !r.is_empty() {
                Region::new(r.begin(), r.end())
            } else if forward {
                Region::new(r.b, (r.b + 1).min(self.view.size()))
            } else {
                Region::new(r.b.saturating_sub(1), r.b)
            };
            if !target.is_empty() {
                self.view.erase(target);
            }
        }
    }

    fn do_insert(&mut self, text: &str) {
        let mut cursors: Vec<Region> = self.view.cursors().to_vec();
        cursors.sort_by_key(|r| r.begin());
        for r in cursors.iter().rev() {
            self.view.replace(*r, text);
        }
        let collapsed = self.view.cursors().iter().map(|r| r.to_point()).collect();
        self.view.set_cursors(collapsed);
    }

    fn do_drag_select(&mut self, at: usize, by: Option<DragUnit>) {
        let region = match by {
            None => Region::point(at),
            Some(DragUnit::Words) => {
                let separators = self.config.word_separators.clone();
                let begin = buffer::find_by_class(
                    &self.view,
                    (at + 1).min(self.view.size()),
                    false,
                    Boundary::WordStart,
                    &separators,
                );
                let end =
                    buffer::find_by_class(&self.view, at, true, Boundary::WordEnd, &separators);
                Region::new(begin, end)
            }
            Some(DragUnit::Lines) => {
                let span = self.view.line_span(at);
                Region::new(span.begin(), (span.end() + 1).min(self.view.size()))
            }
        };
        self.view.set_cursors(vec![region]);
    }
}
