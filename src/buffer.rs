//! The buffer/view collaborator contract and a ropey-backed reference
//! implementation.
//!
//! The mediation layer never owns text storage; it drives whatever the host
//! editor provides through [`TextView`]. All positions are zero-based
//! character offsets into a single linear buffer. [`RopeBuffer`] implements
//! the contract over a [`ropey::Rope`] for tests and for embedders that
//! have no host of their own.

use ropey::Rope;

use crate::region::Region;
use crate::util;

/// Word boundary classes for class-based motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// First character of a word (previous char is not a word char)
    WordStart,
    /// One past the last character of a word
    WordEnd,
}

/// The buffer/view surface the mediation layer requires from the host.
///
/// Implementations keep the cursor set sorted in ascending document order.
/// Text mutations must adjust the stored cursors the way a real editor
/// does: positions after an edit shift by the edit's delta.
pub trait TextView {
    /// Total length in characters.
    fn size(&self) -> usize;

    /// The current cursor set, ascending by `begin()`.
    fn cursors(&self) -> &[Region];

    /// Replace the cursor set. Implementations sort and drop exact
    /// duplicates but never merge distinct regions.
    fn set_cursors(&mut self, regions: Vec<Region>);

    /// Text of a region.
    fn substr(&self, r: Region) -> String;

    /// Character at an offset, if in bounds.
    fn char_at(&self, pos: usize) -> Option<char>;

    /// Insert text, shifting cursors at or after `pos` right.
    fn insert(&mut self, pos: usize, text: &str);

    /// Erase a region, clamping cursors inside it to its begin.
    fn erase(&mut self, r: Region);

    /// Replace a region with text. The cursor owning the region ends up
    /// spanning the new text.
    fn replace(&mut self, r: Region, text: &str);

    /// The full line containing `pos`, excluding the trailing newline.
    fn line_span(&self, pos: usize) -> Region;

    /// (row, column) of an offset.
    fn rowcol(&self, pos: usize) -> (usize, usize);

    /// Offset of (row, column), clamped to the line and buffer ends.
    fn text_point(&self, row: usize, col: usize) -> usize;

    fn line_count(&self) -> usize;

    /// Find the next literal occurrence of `pat` at or after `from`.
    fn find(&self, pat: &str, from: usize) -> Option<Region>;

    /// Find the last literal occurrence of `pat` ending at or before `until`.
    fn rfind(&self, pat: &str, until: usize) -> Option<Region>;

    /// The region of the buffer currently on screen.
    fn visible_region(&self) -> Region;

    /// Scroll the minimum amount needed to bring `pos` on screen.
    fn show(&mut self, pos: usize);

    /// Scroll so the line containing `pos` is centered.
    fn show_at_center(&mut self, pos: usize);

    /// Scroll by whole lines (positive = down).
    fn scroll_lines(&mut self, amount: i64);

    /// Host undo hook. Returns false when nothing was undone.
    fn undo(&mut self) -> bool;

    /// Host redo hook. Returns false when nothing was redone.
    fn redo(&mut self) -> bool;
}

// =============================================================================
// Class-based motion over any TextView
// =============================================================================

/// Advance from `point` to the next boundary of the given class, honoring
/// the separator set. Mirrors the host's find-by-class word scanning:
/// a WordStart is a word char whose predecessor is not, a WordEnd is the
/// offset just past a word char whose successor is not.
pub fn find_by_class<B: TextView + ?Sized>(
    view: &B,
    point: usize,
    forward: bool,
    boundary: Boundary,
    separators: &str,
) -> usize {
    let size = view.size();
    let word_at = |pos: usize| -> bool {
        view.char_at(pos)
            .map(|ch| util::is_word_char(ch, separators))
            .unwrap_or(false)
    };
    let is_boundary = |pos: usize| -> bool {
        match boundary {
            Boundary::WordStart => word_at(pos) && (pos == 0 || !word_at(pos - 1)),
            Boundary::WordEnd => pos > 0 && word_at(pos - 1) && !word_at(pos),
        }
    };

    if forward {
        let mut pos = point + 1;
        while pos < size {
            if is_boundary(pos) {
                return pos;
            }
            pos += 1;
        }
        // the buffer end bounds any forward scan
        size
    } else {
        let mut pos = point;
        while pos > 0 {
            pos -= 1;
            if is_boundary(pos) {
                return pos;
            }
        }
        0
    }
}

// =============================================================================
// RopeBuffer - reference implementation
// =============================================================================

/// Ropey-backed [`TextView`] with a simple line viewport and snapshot-based
/// undo (rope clones are cheap).
#[derive(Debug, Clone)]
pub struct RopeBuffer {
    rope: Rope,
    cursors: Vec<Region>,
    top_line: usize,
    viewport_lines: usize,
    undo_stack: Vec<(Rope, Vec<Region>)>,
    redo_stack: Vec<(Rope, Vec<Region>)>,
}

const UNDO_DEPTH: usize = 100;
const DEFAULT_VIEWPORT_LINES: usize = 40;

impl RopeBuffer {
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            cursors: vec![Region::point(0)],
            top_line: 0,
            viewport_lines: DEFAULT_VIEWPORT_LINES,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    pub fn with_viewport_lines(mut self, lines: usize) -> Self {
        self.viewport_lines = lines.max(1);
        self
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    pub fn top_line(&self) -> usize {
        self.top_line
    }

    fn checkpoint(&mut self) {
        self.undo_stack.push((self.rope.clone(), self.cursors.clone()));
        if self.undo_stack.len() > UNDO_DEPTH {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
    }

    /// Shift cursor endpoints for an edit at `pos` that removed `removed`
    /// characters and inserted `inserted`.
    fn adjust_cursors(&mut self, pos: usize, removed: usize, inserted: usize) {
        let shift = |p: usize| -> usize {
            if p < pos {
                p
            } else if p < pos + removed {
                pos
            } else {
                p - removed + inserted
            }
        };
        for c in &mut self.cursors {
            c.a = shift(c.a);
            c.b = shift(c.b);
        }
    }

    fn clamp(&self, pos: usize) -> usize {
        pos.min(self.rope.len_chars())
    }

    fn normalize_cursors(regions: &mut Vec<Region>) {
        regions.sort_by_key(|r| (r.begin(), r.end()));
        regions.dedup();
        if regions.is_empty() {
            regions.push(Region::point(0));
        }
    }
}

impl TextView for RopeBuffer {
    fn size(&self) -> usize {
        self.rope.len_chars()
    }

    fn cursors(&self) -> &[Region] {
        &self.cursors
    }

    fn set_cursors(&mut self, mut regions: Vec<Region>) {
        let size = self.rope.len_chars();
        for r in &mut regions {
            r.a = r.a.min(size);
            r.b = r.b.min(size);
        }
        Self::normalize_cursors(&mut regions);
        self.cursors = regions;
    }

    fn substr(&self, r: Region) -> String {
        let begin = self.clamp(r.begin());
        let end = self.clamp(r.end());
        self.rope.slice(begin..end).to_string()
    }

    fn char_at(&self, pos: usize) -> Option<char> {
        if pos < self.rope.len_chars() {
            Some(self.rope.char(pos))
        } else {
            None
        }
    }

    fn insert(&mut self, pos: usize, text: &str) {
        if text.is_empty() {
            return;
        }
        self.checkpoint();
        let pos = self.clamp(pos);
        self.rope.insert(pos, text);
        self.adjust_cursors(pos, 0, text.chars().count());
    }

    fn erase(&mut self, r: Region) {
        if r.is_empty() {
            return;
        }
        self.checkpoint();
        let begin = self.clamp(r.begin());
        let end = self.clamp(r.end());
        self.rope.remove(begin..end);
        self.adjust_cursors(begin, end - begin, 0);
    }

    fn replace(&mut self, r: Region, text: &str) {
        self.checkpoint();
        let begin = self.clamp(r.begin());
        let end = self.clamp(r.end());
        self.rope.remove(begin..end);
        self.rope.insert(begin, text);
        let inserted = text.chars().count();
        self.adjust_cursors(begin, end - begin, inserted);
        // the cursor owning the replaced region spans the new text
        for c in &mut self.cursors {
            if c.begin() == begin && c.end() == begin + inserted {
                c.a = begin;
                c.b = begin + inserted;
            }
        }
    }

    fn line_span(&self, pos: usize) -> Region {
        let pos = self.clamp(pos);
        let row = self.rope.char_to_line(pos);
        let start = self.rope.line_to_char(row);
        let line = self.rope.line(row);
        let mut len = line.len_chars();
        if len > 0 && line.char(len - 1) == '\n' {
            len -= 1;
        }
        Region::new(start, start + len)
    }

    fn rowcol(&self, pos: usize) -> (usize, usize) {
        let pos = self.clamp(pos);
        let row = self.rope.char_to_line(pos);
        (row, pos - self.rope.line_to_char(row))
    }

    fn text_point(&self, row: usize, col: usize) -> usize {
        let row = row.min(self.line_count().saturating_sub(1));
        let span = self.line_span(self.rope.line_to_char(row));
        (span.begin() + col).min(span.end())
    }

    fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    fn find(&self, pat: &str, from: usize) -> Option<Region> {
        if pat.is_empty() {
            return None;
        }
        let from = self.clamp(from);
        let text: String = self.rope.slice(from..).to_string();
        let byte_idx = text.find(pat)?;
        let char_off = text[..byte_idx].chars().count();
        let begin = from + char_off;
        Some(Region::new(begin, begin + pat.chars().count()))
    }

    fn rfind(&self, pat: &str, until: usize) -> Option<Region> {
        if pat.is_empty() {
            return None;
        }
        let until = self.clamp(until);
        let text: String = self.rope.slice(..until).to_string();
        let byte_idx = text.rfind(pat)?;
        let begin = text[..byte_idx].chars().count();
        Some(Region::new(begin, begin + pat.chars().count()))
    }

    fn visible_region(&self) -> Region {
        let first = self.top_line.min(self.line_count().saturating_sub(1));
        let last = (self.top_line + self.viewport_lines.saturating_sub(1))
            .min(self.line_count().saturating_sub(1));
        let begin = self.rope.line_to_char(first);
        let end = self.line_span(self.rope.line_to_char(last)).end();
        Region::new(begin, end)
    }

    fn show(&mut self, pos: usize) {
        let (row, _) = self.rowcol(pos);
        if row < self.top_line {
            self.top_line = row;
        } else if row >= self.top_line + self.viewport_lines {
            self.top_line = row + 1 - self.viewport_lines;
        }
    }

    fn show_at_center(&mut self, pos: usize) {
        let (row, _) = self.rowcol(pos);
        self.top_line = row.saturating_sub(self.viewport_lines / 2);
    }

    fn scroll_lines(&mut self, amount: i64) {
        let max_top = self.line_count().saturating_sub(1);
        let top = self.top_line as i64 + amount;
        self.top_line = top.clamp(0, max_top as i64) as usize;
    }

    fn undo(&mut self) -> bool {
        match self.undo_stack.pop() {
            Some((rope, cursors)) => {
                self.redo_stack
                    .push((std::mem::replace(&mut self.rope, rope), std::mem::take(&mut self.cursors)));
                self.cursors = cursors;
                true
            }
            None => false,
        }
    }

    fn redo(&mut self) -> bool {
        match self.redo_stack.pop() {
            Some((rope, cursors)) => {
                self.undo_stack
                    .push((std::mem::replace(&mut self.rope, rope), std::mem::take(&mut self.cursors)));
                self.cursors = cursors;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_shifts_cursors() {
        let mut buf = RopeBuffer::from_text("hello");
        buf.set_cursors(vec![Region::point(5)]);
        buf.insert(0, "ab");
        assert_eq!(buf.text(), "abhello");
        assert_eq!(buf.cursors(), &[Region::point(7)]);
    }

    #[test]
    fn test_erase_clamps_inner_cursors() {
        let mut buf = RopeBuffer::from_text("hello world");
        buf.set_cursors(vec![Region::point(8)]);
        buf.erase(Region::new(5, 11));
        assert_eq!(buf.text(), "hello");
        assert_eq!(buf.cursors(), &[Region::point(5)]);
    }

    #[test]
    fn test_replace_spans_new_text() {
        let mut buf = RopeBuffer::from_text("hello world");
        buf.set_cursors(vec![Region::new(0, 5)]);
        buf.replace(Region::new(0, 5), "hi");
        assert_eq!(buf.text(), "hi world");
        assert_eq!(buf.cursors(), &[Region::new(0, 2)]);
    }

    #[test]
    fn test_line_span_excludes_newline() {
        let buf = RopeBuffer::from_text("one\ntwo\n");
        assert_eq!(buf.line_span(0), Region::new(0, 3));
        assert_eq!(buf.line_span(5), Region::new(4, 7));
    }

    #[test]
    fn test_rowcol_and_text_point() {
        let buf = RopeBuffer::from_text("one\ntwo");
        assert_eq!(buf.rowcol(5), (1, 1));
        assert_eq!(buf.text_point(1, 1), 5);
        // column clamps to line end
        assert_eq!(buf.text_point(0, 99), 3);
    }

    #[test]
    fn test_find_and_rfind() {
        let buf = RopeBuffer::from_text("abc abc");
        assert_eq!(buf.find("abc", 0), Some(Region::new(0, 3)));
        assert_eq!(buf.find("abc", 1), Some(Region::new(4, 7)));
        assert_eq!(buf.rfind("abc", 7), Some(Region::new(4, 7)));
        assert_eq!(buf.rfind("abc", 6), Some(Region::new(0, 3)));
        assert_eq!(buf.rfind("abc", 99), Some(Region::new(4, 7)));
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut buf = RopeBuffer::from_text("abc");
        buf.insert(3, "d");
        assert_eq!(buf.text(), "abcd");
        assert!(buf.undo());
        assert_eq!(buf.text(), "abc");
        assert!(buf.redo());
        assert_eq!(buf.text(), "abcd");
        assert!(!buf.redo());
    }

    #[test]
    fn test_find_by_class_word_start() {
        let buf = RopeBuffer::from_text("foo bar");
        let seps = crate::config::DEFAULT_WORD_SEPARATORS;
        assert_eq!(find_by_class(&buf, 0, true, Boundary::WordStart, seps), 4);
        assert_eq!(find_by_class(&buf, 0, true, Boundary::WordEnd, seps), 3);
        assert_eq!(find_by_class(&buf, 6, false, Boundary::WordStart, seps), 4);
    }

    #[test]
    fn test_set_cursors_sorts_and_dedups() {
        let mut buf = RopeBuffer::from_text("hello");
        buf.set_cursors(vec![Region::point(4), Region::point(1), Region::point(4)]);
        assert_eq!(buf.cursors(), &[Region::point(1), Region::point(4)]);
    }

    #[test]
    fn test_viewport_show() {
        let text = (0..100).map(|i| format!("line {i}\n")).collect::<String>();
        let mut buf = RopeBuffer::from_text(&text).with_viewport_lines(10);
        let pos = buf.text_point(50, 0);
        buf.show(pos);
        assert!(buf.top_line() <= 50 && 50 < buf.top_line() + 10);
        buf.show_at_center(pos);
        assert_eq!(buf.top_line(), 45);
    }
}
