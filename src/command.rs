//! The command vocabulary observed by the interception pipeline.
//!
//! Two families share one descriptor type: the host editor's native
//! commands (cursor motion, deletion, scrolling, mouse drags) and the
//! mediation layer's own reserved commands. Capabilities that used to be
//! name-pattern tests in the host ("does this command manage its own
//! state?") are methods on the descriptor here.

/// Token fed to the prefix-argument accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgToken {
    /// A decimal digit 0-9
    Digit(u8),
    /// The universal-argument key (multiply by four)
    ByFour,
    /// Negate the argument
    Negate,
}

/// Units for the host's native `Move` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveUnit {
    Characters,
    Words,
    Lines,
    Pages,
}

/// Targets for the host's native `MoveTo` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveTarget {
    /// Start of line
    Bol,
    /// Start of line, ignoring soft wrap
    HardBol,
    /// End of line
    Eol,
    Bof,
    Eof,
}

/// Multi-click units carried by a drag-select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragUnit {
    Words,
    Lines,
}

/// Destinations for the layer's move-to-edge command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Beginning of file
    Bof,
    /// End of file
    Eof,
    /// Beginning of the visible window
    Bow,
    /// End of the visible window
    Eow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseMode {
    Upper,
    Lower,
    Capitalize,
}

/// Sub-operations of an open incremental-search session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IsearchOp {
    /// Extend the pattern by one typed character
    AddChar(char),
    /// Jump to the next (or previous) occurrence
    Next { forward: bool },
    /// Undo the last pattern extension or jump
    Pop,
    /// Append the character under the cursor to the pattern
    AppendFromCursor,
    /// Turn every remaining match into a cursor and finish
    KeepAll,
    /// Accept the current position
    Done,
    /// Abort and restore the starting position
    Quit,
    /// Replace the whole pattern
    SetSearch(String),
    /// Cycle the pattern through past searches
    History { backward: bool },
}

/// A command descriptor flowing through the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // === Host-native commands ===
    Move {
        by: MoveUnit,
        forward: bool,
        extend: bool,
    },
    MoveTo {
        to: MoveTarget,
        extend: bool,
    },
    /// Backspace
    LeftDelete,
    /// Forward delete
    RightDelete,
    Undo,
    Redo,
    /// Type text at every cursor
    Insert { characters: String },
    ScrollLines { amount: i64 },
    /// Mouse drag started at `at`; `by` present for double/triple click
    DragSelect {
        at: usize,
        by: Option<DragUnit>,
    },
    ContextMenu,

    // === Reserved commands (the layer's own vocabulary) ===
    UniversalArgument(ArgToken),
    SetMark,
    CancelMark,
    SwapPointAndMark { toggle_active_mark: bool },
    MoveWord { direction: i64 },
    /// Advance to the nearest word boundary without consuming the count
    ToWord { direction: i64 },
    MoveSexpr { direction: i64 },
    MoveBackToIndentation,
    MoveToParagraph { direction: i64 },
    CaseWord { mode: CaseMode },
    CaseRegion { mode: CaseMode },
    ShiftRegion { direction: i64 },
    KillRegion { is_copy: bool },
    /// Kill-line motion: cursor sweep for a line kill
    MoveForKillLine,
    /// Generic kill transaction: run the motion, delete what it swept
    MoveThenDelete { move_cmd: Box<Command> },
    /// Complete a kill transaction left pending by a modal prompt
    FinishMoveThenDelete,
    Yank { pop: i64 },
    JumpToChar { plus_one: bool },
    JumpToWord,
    ZapToChar,
    MoveToEdge { to: Edge, always_push_mark: bool },
    GotoLine,
    OpenLine,
    DeleteWhiteSpace,
    /// Repeat wrapper produced by the prefix-argument rewrite
    DoTimes { times: usize, cmd: Box<Command> },
    CenterView { center_only: bool },
    Isearch {
        forward: bool,
        regex: bool,
        op: Option<IsearchOp>,
    },
    /// Close the search session, then re-issue the wrapped command
    IsearchEscape { next: Box<Command> },
    Quit,
}

/// Fieldless discriminant used for `this_cmd`/`last_cmd` bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Move,
    MoveTo,
    LeftDelete,
    RightDelete,
    Undo,
    Redo,
    Insert,
    ScrollLines,
    DragSelect,
    ContextMenu,
    UniversalArgument,
    SetMark,
    /// Recorded by set-mark when the prefix argument popped the ring
    PopMark,
    CancelMark,
    SwapPointAndMark,
    MoveWord,
    ToWord,
    MoveSexpr,
    MoveBackToIndentation,
    MoveToParagraph,
    CaseWord,
    CaseRegion,
    ShiftRegion,
    KillRegion,
    MoveForKillLine,
    MoveThenDelete,
    FinishMoveThenDelete,
    Yank,
    JumpToChar,
    JumpToWord,
    ZapToChar,
    MoveToEdge,
    GotoLine,
    OpenLine,
    DeleteWhiteSpace,
    DoTimes,
    CenterView,
    Isearch,
    IsearchEscape,
    Quit,
}

impl CommandKind {
    /// Kill commands join their text with a preceding kill in the ring.
    pub fn is_kill(&self) -> bool {
        matches!(
            self,
            CommandKind::KillRegion
                | CommandKind::MoveThenDelete
                | CommandKind::FinishMoveThenDelete
                | CommandKind::ZapToChar
        )
    }
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Move { .. } => CommandKind::Move,
            Command::MoveTo { .. } => CommandKind::MoveTo,
            Command::LeftDelete => CommandKind::LeftDelete,
            Command::RightDelete => CommandKind::RightDelete,
            Command::Undo => CommandKind::Undo,
            Command::Redo => CommandKind::Redo,
            Command::Insert { .. } => CommandKind::Insert,
            Command::ScrollLines { .. } => CommandKind::ScrollLines,
            Command::DragSelect { .. } => CommandKind::DragSelect,
            Command::ContextMenu => CommandKind::ContextMenu,
            Command::UniversalArgument(_) => CommandKind::UniversalArgument,
            Command::SetMark => CommandKind::SetMark,
            Command::CancelMark => CommandKind::CancelMark,
            Command::SwapPointAndMark { .. } => CommandKind::SwapPointAndMark,
            Command::MoveWord { .. } => CommandKind::MoveWord,
            Command::ToWord { .. } => CommandKind::ToWord,
            Command::MoveSexpr { .. } => CommandKind::MoveSexpr,
            Command::MoveBackToIndentation => CommandKind::MoveBackToIndentation,
            Command::MoveToParagraph { .. } => CommandKind::MoveToParagraph,
            Command::CaseWord { .. } => CommandKind::CaseWord,
            Command::CaseRegion { .. } => CommandKind::CaseRegion,
            Command::ShiftRegion { .. } => CommandKind::ShiftRegion,
            Command::KillRegion { .. } => CommandKind::KillRegion,
            Command::MoveForKillLine => CommandKind::MoveForKillLine,
            Command::MoveThenDelete { .. } => CommandKind::MoveThenDelete,
            Command::FinishMoveThenDelete => CommandKind::FinishMoveThenDelete,
            Command::Yank { .. } => CommandKind::Yank,
            Command::JumpToChar { .. } => CommandKind::JumpToChar,
            Command::JumpToWord => CommandKind::JumpToWord,
            Command::ZapToChar => CommandKind::ZapToChar,
            Command::MoveToEdge { .. } => CommandKind::MoveToEdge,
            Command::GotoLine => CommandKind::GotoLine,
            Command::OpenLine => CommandKind::OpenLine,
            Command::DeleteWhiteSpace => CommandKind::DeleteWhiteSpace,
            Command::DoTimes { .. } => CommandKind::DoTimes,
            Command::CenterView { .. } => CommandKind::CenterView,
            Command::Isearch { .. } => CommandKind::Isearch,
            Command::IsearchEscape { .. } => CommandKind::IsearchEscape,
            Command::Quit => CommandKind::Quit,
        }
    }

    /// Whether this command manages `this_cmd`/`last_cmd` and the argument
    /// accumulator itself instead of leaving that to the pipeline hooks.
    pub fn owns_state(&self) -> bool {
        !matches!(
            self,
            Command::Move { .. }
                | Command::MoveTo { .. }
                | Command::LeftDelete
                | Command::RightDelete
                | Command::Undo
                | Command::Redo
                | Command::Insert { .. }
                | Command::ScrollLines { .. }
                | Command::DragSelect { .. }
                | Command::ContextMenu
        )
    }

    /// Whether a supplied prefix argument turns this command into a repeat.
    pub fn is_repeatable(&self) -> bool {
        matches!(
            self,
            Command::Move { .. }
                | Command::LeftDelete
                | Command::RightDelete
                | Command::Undo
                | Command::Redo
        )
    }

    /// Commands whose cursor should be scrolled into view afterward.
    pub fn ensure_visible(&self) -> bool {
        matches!(
            self,
            Command::Move { .. }
                | Command::MoveTo { .. }
                | Command::MoveWord { .. }
                | Command::MoveSexpr { .. }
                | Command::MoveToEdge { .. }
                | Command::MoveThenDelete { .. }
                | Command::DoTimes { .. }
        )
    }

    /// Kill commands capture their text into the kill ring.
    pub fn is_kill(&self) -> bool {
        self.kind().is_kill()
    }

    /// Flip the `forward` flag if this command carries one. Returns whether
    /// a flag was present.
    pub fn invert_forward(&mut self) -> bool {
        match self {
            Command::Move { forward, .. } => {
                *forward = !*forward;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_commands_do_not_own_state() {
        assert!(!Command::LeftDelete.owns_state());
        assert!(!Command::ContextMenu.owns_state());
        assert!(Command::SetMark.owns_state());
        assert!(Command::UniversalArgument(ArgToken::ByFour).owns_state());
    }

    #[test]
    fn test_invert_forward_only_on_move() {
        let mut cmd = Command::Move {
            by: MoveUnit::Characters,
            forward: true,
            extend: false,
        };
        assert!(cmd.invert_forward());
        assert!(matches!(cmd, Command::Move { forward: false, .. }));
        assert!(!Command::LeftDelete.clone().invert_forward());
    }

    #[test]
    fn test_kill_kinds() {
        assert!(Command::KillRegion { is_copy: true }.is_kill());
        assert!(Command::ZapToChar.is_kill());
        assert!(!Command::Yank { pop: 0 }.is_kill());
    }
}
