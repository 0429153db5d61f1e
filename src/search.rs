//! Incremental search session.
//!
//! The pipeline treats a session as opaque: it only needs to know whether
//! one exists and to call `done`/`quit` when a foreign command or a
//! window-level navigation arrives. The session itself keeps a stack of
//! states so every pattern extension and every jump can be popped off
//! again, Emacs style. Matching is literal.

use crate::buffer::TextView;
use crate::region::Region;
use crate::state::MarkRing;

#[derive(Debug, Clone)]
struct Frame {
    pattern_len: usize,
    cursors: Vec<Region>,
    found: bool,
}

/// One open incremental search.
#[derive(Debug)]
pub struct IsearchSession {
    pub forward: bool,
    pub regex: bool,
    start: Vec<Region>,
    pattern: String,
    frames: Vec<Frame>,
    history_index: Option<usize>,
}

impl IsearchSession {
    /// Open a session at the view's current cursors.
    pub fn open<B: TextView + ?Sized>(view: &B, forward: bool, regex: bool) -> Self {
        let start = view.cursors().to_vec();
        let frames = vec![Frame {
            pattern_len: 0,
            cursors: start.clone(),
            found: true,
        }];
        Self {
            forward,
            regex,
            start,
            pattern: String::new(),
            frames,
            history_index: None,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Where the search began (for the mark push on done).
    pub fn start_cursors(&self) -> &[Region] {
        &self.start
    }

    fn current_frame(&self) -> &Frame {
        self.frames.last().expect("session always has a frame")
    }

    /// The match the session currently sits on.
    fn anchor(&self) -> Region {
        *self
            .current_frame()
            .cursors
            .last()
            .unwrap_or(&Region::point(0))
    }

    /// One-line status for the host's echo area.
    pub fn status(&self) -> String {
        let fail = if self.current_frame().found { "" } else { "failing " };
        let kind = if self.regex { "regexp I-search" } else { "I-search" };
        let dir = if self.forward { "" } else { " backward" };
        format!("{fail}{kind}{dir}: {}", self.pattern)
    }

    fn search_from<B: TextView + ?Sized>(&self, view: &B, from: usize) -> Option<Region> {
        if self.pattern.is_empty() {
            return None;
        }
        if self.forward {
            view.find(&self.pattern, from)
        } else {
            view.rfind(&self.pattern, from)
        }
    }

    fn push_frame(&mut self, cursors: Vec<Region>, found: bool) {
        self.frames.push(Frame {
            pattern_len: self.pattern.chars().count(),
            cursors,
            found,
        });
    }

    /// Extend the pattern by one character and re-match from the current
    /// match start. A failed extension keeps the pattern (pop removes it).
    pub fn add_char<B: TextView + ?Sized>(&mut self, view: &mut B, ch: char) {
        self.pattern.push(ch);
        let from = if self.forward {
            self.anchor().begin()
        } else {
            (self.anchor().begin() + self.pattern.chars().count()).min(view.size())
        };
        match self.search_from(view, from) {
            Some(m) => {
                view.set_cursors(vec![m]);
                self.push_frame(vec![m], true);
            }
            None => {
                let cursors = self.current_frame().cursors.clone();
                self.push_frame(cursors, false);
            }
        }
    }

    /// Jump to the next occurrence in the given direction.
    pub fn next<B: TextView + ?Sized>(&mut self, view: &mut B, forward: bool) {
        self.forward = forward;
        let from = if forward {
            self.anchor().end()
        } else {
            self.anchor().begin()
        };
        match self.search_from(view, from) {
            Some(m) => {
                view.set_cursors(vec![m]);
                self.push_frame(vec![m], true);
            }
            None => {
                let cursors = self.current_frame().cursors.clone();
                self.push_frame(cursors, false);
            }
        }
    }

    /// Undo the most recent extension or jump.
    pub fn pop<B: TextView + ?Sized>(&mut self, view: &mut B) -> bool {
        if self.frames.len() <= 1 {
            return false;
        }
        self.frames.pop();
        let frame = self.current_frame();
        let truncated: String = self.pattern.chars().take(frame.pattern_len).collect();
        let cursors = frame.cursors.clone();
        self.pattern = truncated;
        view.set_cursors(cursors);
        true
    }

    /// Append the character just past the current match to the pattern.
    pub fn append_from_cursor<B: TextView + ?Sized>(&mut self, view: &mut B) {
        let pos = self.anchor().end();
        if let Some(ch) = view.char_at(pos) {
            self.add_char(view, ch);
        }
    }

    /// Turn every occurrence of the pattern into a cursor. The caller
    /// normally follows with `done`.
    pub fn keep_all<B: TextView + ?Sized>(&mut self, view: &mut B) -> usize {
        if self.pattern.is_empty() {
            return 0;
        }
        let mut matches = Vec::new();
        let mut from = 0;
        while let Some(m) = view.find(&self.pattern, from) {
            from = m.end().max(m.begin() + 1);
            matches.push(m);
        }
        if !matches.is_empty() {
            view.set_cursors(matches.clone());
        }
        matches.len()
    }

    /// Accept the current position: push the starting cursors onto the
    /// mark ring and collapse the match to a point.
    pub fn done<B: TextView + ?Sized>(self, view: &mut B, mark_ring: &mut MarkRing) {
        mark_ring.set(self.start, true);
        let collapsed = view.cursors().iter().map(|r| r.to_point()).collect();
        view.set_cursors(collapsed);
    }

    /// Abort: restore the cursors from before the search.
    pub fn quit<B: TextView + ?Sized>(self, view: &mut B) {
        view.set_cursors(self.start);
    }

    /// Replace the whole pattern (from history or an explicit set-search).
    pub fn set_pattern<B: TextView + ?Sized>(&mut self, view: &mut B, pattern: &str) {
        self.pattern.clear();
        self.frames.truncate(1);
        view.set_cursors(self.start.clone());
        for ch in pattern.chars().collect::<Vec<_>>() {
            self.add_char(view, ch);
        }
    }

    /// Cycle the pattern through past searches.
    pub fn history<B: TextView + ?Sized>(
        &mut self,
        view: &mut B,
        entries: &[String],
        backward: bool,
    ) {
        if entries.is_empty() {
            return;
        }
        let next = match self.history_index {
            None => {
                if backward {
                    entries.len() - 1
                } else {
                    0
                }
            }
            Some(i) => {
                if backward {
                    i.checked_sub(1).unwrap_or(entries.len() - 1)
                } else {
                    (i + 1) % entries.len()
                }
            }
        };
        self.history_index = Some(next);
        let pattern = entries[next].clone();
        self.set_pattern(view, &pattern);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::RopeBuffer;

    fn view(text: &str) -> RopeBuffer {
        RopeBuffer::from_text(text)
    }

    #[test]
    fn test_incremental_match_advances_with_pattern() {
        let mut v = view("the cat sat on the mat");
        let mut s = IsearchSession::open(&v, true, false);
        s.add_char(&mut v, 's');
        s.add_char(&mut v, 'a');
        assert_eq!(v.cursors(), &[Region::new(8, 10)]);
        assert!(s.status().starts_with("I-search: sa"));
    }

    #[test]
    fn test_next_jumps_to_following_occurrence() {
        let mut v = view("aba aba");
        let mut s = IsearchSession::open(&v, true, false);
        s.add_char(&mut v, 'a');
        assert_eq!(v.cursors(), &[Region::new(0, 1)]);
        s.next(&mut v, true);
        assert_eq!(v.cursors(), &[Region::new(2, 3)]);
        s.next(&mut v, true);
        assert_eq!(v.cursors(), &[Region::new(4, 5)]);
    }

    #[test]
    fn test_pop_restores_previous_state() {
        let mut v = view("abc abd");
        let mut s = IsearchSession::open(&v, true, false);
        s.add_char(&mut v, 'a');
        s.add_char(&mut v, 'b');
        s.add_char(&mut v, 'd');
        assert_eq!(v.cursors(), &[Region::new(4, 7)]);
        assert!(s.pop(&mut v));
        assert_eq!(s.pattern(), "ab");
        assert_eq!(v.cursors(), &[Region::new(0, 2)]);
    }

    #[test]
    fn test_failed_extension_keeps_position_and_pops_off() {
        let mut v = view("abc");
        let mut s = IsearchSession::open(&v, true, false);
        s.add_char(&mut v, 'a');
        s.add_char(&mut v, 'z');
        assert!(s.status().starts_with("failing"));
        assert_eq!(v.cursors(), &[Region::new(0, 1)]);
        s.pop(&mut v);
        assert_eq!(s.pattern(), "a");
        assert!(s.status().starts_with("I-search"));
    }

    #[test]
    fn test_quit_restores_start() {
        let mut v = view("hello world");
        v.set_cursors(vec![Region::point(3)]);
        let mut s = IsearchSession::open(&v, true, false);
        s.add_char(&mut v, 'w');
        s.quit(&mut v);
        assert_eq!(v.cursors(), &[Region::point(3)]);
    }

    #[test]
    fn test_done_pushes_mark_and_collapses() {
        let mut v = view("hello world");
        v.set_cursors(vec![Region::point(2)]);
        let mut s = IsearchSession::open(&v, true, false);
        s.add_char(&mut v, 'w');
        let mut ring = MarkRing::default();
        s.done(&mut v, &mut ring);
        assert_eq!(ring.top(), Some(&[Region::point(2)][..]));
        assert_eq!(v.cursors(), &[Region::point(7)]);
    }

    #[test]
    fn test_keep_all_creates_a_cursor_per_match() {
        let mut v = view("x.x.x");
        let mut s = IsearchSession::open(&v, true, false);
        s.add_char(&mut v, 'x');
        assert_eq!(s.keep_all(&mut v), 3);
        assert_eq!(v.cursors().len(), 3);
    }

    #[test]
    fn test_backward_search() {
        let mut v = view("foo foo");
        v.set_cursors(vec![Region::point(7)]);
        let mut s = IsearchSession::open(&v, false, false);
        s.add_char(&mut v, 'f');
        assert_eq!(v.cursors(), &[Region::new(4, 5)]);
        s.next(&mut v, false);
        assert_eq!(v.cursors(), &[Region::new(0, 1)]);
    }
}
