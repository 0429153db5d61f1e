//! Cursor and mark helpers shared by the reserved commands.
//!
//! `CmdUtil` wraps a mutable editor borrow for the duration of one
//! command, the way the original layer handed every handler a utility
//! object instead of raw view access. Everything multi-cursor flows
//! through here so the per-cursor iteration rules live in one place.

use crate::buffer::TextView;
use crate::editor::Editor;
use crate::region::Region;
use crate::util;

pub struct CmdUtil<'a, B: TextView> {
    pub ed: &'a mut Editor<B>,
}

impl<'a, B: TextView> CmdUtil<'a, B> {
    pub fn new(ed: &'a mut Editor<B>) -> Self {
        Self { ed }
    }

    // =========================================================================
    // Prefix argument
    // =========================================================================

    pub fn get_count(&self, signed_ok: bool) -> i64 {
        self.ed.state.get_count(signed_ok)
    }

    pub fn has_prefix_arg(&self) -> bool {
        self.ed.state.has_prefix_arg()
    }

    // =========================================================================
    // Cursors
    // =========================================================================

    /// The active point: the last cursor's `b` end.
    pub fn get_point(&self) -> usize {
        self.get_last_cursor().b
    }

    pub fn get_last_cursor(&self) -> Region {
        *self
            .ed
            .view
            .cursors()
            .last()
            .unwrap_or(&Region::point(0))
    }

    pub fn just_one_cursor(&self) -> bool {
        self.ed.view.cursors().len() == 1
    }

    pub fn get_cursors(&self) -> Vec<Region> {
        self.ed.view.cursors().to_vec()
    }

    pub fn set_cursors(&mut self, cursors: Vec<Region>) {
        self.ed.view.set_cursors(cursors);
    }

    pub fn set_selection(&mut self, region: Region) {
        self.ed.view.set_cursors(vec![region]);
    }

    pub fn make_cursors_empty(&mut self) {
        let collapsed = self.ed.view.cursors().iter().map(|r| r.to_point()).collect();
        self.ed.view.set_cursors(collapsed);
    }

    /// Run `f` once per cursor, in buffer order, replacing each cursor
    /// with the region `f` returns (or keeping it on `None`). The new set
    /// is applied only after every cursor ran, so a handler never sees a
    /// half-updated selection.
    pub fn for_each_cursor<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut Editor<B>, Region) -> Option<Region>,
    {
        let cursors = self.get_cursors();
        let mut result = Vec::with_capacity(cursors.len());
        for r in cursors {
            result.push(f(self.ed, r).unwrap_or(r));
        }
        self.ed.view.set_cursors(result);
    }

    pub fn save_cursors(&mut self, tag: &'static str) {
        let cursors = self.get_cursors();
        self.ed.state.save_cursors(tag, cursors);
    }

    pub fn restore_cursors(&mut self, tag: &'static str) {
        if let Some(cursors) = self.ed.state.restore_cursors(tag) {
            self.ed.view.set_cursors(cursors);
        }
    }

    // =========================================================================
    // Mark
    // =========================================================================

    /// Push the current cursors onto the mark ring as the new mark.
    pub fn set_mark_here(&mut self) {
        let cursors: Vec<Region> = self.get_cursors().iter().map(|r| r.to_point()).collect();
        let was_region = self.get_cursors().iter().any(|r| !r.is_empty());
        self.ed.state.mark_ring.set(cursors, was_region);
    }

    pub fn set_mark_at(&mut self, cursors: Vec<Region>) {
        self.ed.state.mark_ring.set(cursors, false);
    }

    /// Turn the visible mark on or off. `value` of `None` toggles. Turning
    /// it on materializes the mark-to-point regions as the selection;
    /// turning it off leaves the selection untouched.
    pub fn toggle_active_mark_mode(&mut self, value: Option<bool>) {
        let on = value.unwrap_or(!self.ed.state.active_mark);
        self.ed.state.active_mark = on;
        if on {
            let regions = self.get_regions();
            if !regions.is_empty() {
                self.ed.view.set_cursors(regions);
            }
        }
    }

    pub fn set_active_mark_mode(&mut self, on: bool) {
        self.toggle_active_mark_mode(Some(on));
    }

    /// Set the mark at the current cursors, then jump to `pos`.
    pub fn push_mark_and_goto_position(&mut self, pos: usize) {
        self.set_mark_here();
        self.set_selection(Region::point(pos));
        self.ed.view.show(pos);
    }

    /// Exchange the cursors with the top of the mark ring.
    pub fn swap_point_and_mark(&mut self) -> bool {
        let mark = match self.ed.state.mark_ring.top() {
            Some(m) => m.to_vec(),
            None => return false,
        };
        let cursors: Vec<Region> = self.get_cursors().iter().map(|r| r.to_point()).collect();
        self.ed.state.mark_ring.replace_top(cursors);
        self.ed.view.set_cursors(mark);
        if let Some(last) = self.ed.view.cursors().last() {
            let pos = last.b;
            self.ed.view.show(pos);
        }
        true
    }

    /// The regions a region command operates on: the non-empty selections
    /// if there are any, otherwise mark-to-point regions built by zipping
    /// the mark-ring top against the cursors.
    pub fn get_regions(&self) -> Vec<Region> {
        let cursors = self.get_cursors();
        if cursors.iter().any(|r| !r.is_empty()) {
            return cursors.into_iter().filter(|r| !r.is_empty()).collect();
        }
        let marks = match self.ed.state.mark_ring.top() {
            Some(m) if m.len() == cursors.len() => m,
            _ => return Vec::new(),
        };
        marks
            .iter()
            .zip(cursors.iter())
            .map(|(m, c)| Region::new(m.b, c.b))
            .collect()
    }

    // =========================================================================
    // Lines and characters
    // =========================================================================

    /// Indent of the line at `pos`: column count of the first non-blank
    /// character, plus that character's offset.
    pub fn line_indent(&self, pos: usize) -> (usize, usize) {
        let span = self.ed.view.line_span(pos);
        let mut offset = span.begin();
        let mut cols = 0;
        while offset < span.end() {
            match self.ed.view.char_at(offset) {
                Some(' ') => cols += 1,
                Some('\t') => cols += self.ed.config.tab_size - (cols % self.ed.config.tab_size),
                _ => break,
            }
            offset += 1;
        }
        (cols, offset)
    }


    // =========================================================================
    // Navigation
    // =========================================================================

    pub fn is_visible(&self, pos: usize) -> bool {
        self.ed.view.visible_region().contains(pos)
    }

    pub fn ensure_visible(&mut self) {
        let pos = self.get_point();
        self.ed.view.show(pos);
    }

    /// Jump to a 1-based line number, clamped to the buffer.
    pub fn goto_line(&mut self, line: usize) {
        let row = line.saturating_sub(1);
        let pos = self.ed.view.text_point(row, 0);
        self.set_selection(Region::point(pos));
        self.ed.view.show(pos);
    }

    /// The matching position across a bracket or string at `point`:
    /// just past the closer when `point` sits on an opener, just before
    /// the opener when the character before `point` is a closer.
    pub fn to_other_end(&self, point: usize, forward: bool) -> Option<usize> {
        let view = &self.ed.view;
        if forward {
            let ch = view.char_at(point)?;
            let close = util::matching_close(ch)?;
            if ch == close {
                // Strings have identical delimiters, no nesting.
                let mut pos = point + 1;
                while pos < view.size() {
                    if view.char_at(pos)? == close {
                        return Some(pos + 1);
                    }
                    pos += 1;
                }
                return None;
            }
            let mut depth: i64 = 0;
            let mut pos = point;
            while pos < view.size() {
                let c = view.char_at(pos)?;
                if c == ch {
                    depth += 1;
                } else if c == close {
                    depth -= 1;
                    if depth == 0 {
                        return Some(pos + 1);
                    }
                }
                pos += 1;
            }
            None
        } else {
            if point == 0 {
                return None;
            }
            let ch = view.char_at(point - 1)?;
            let open = util::matching_open(ch)?;
            if ch == open {
                let mut pos = point - 1;
                while pos > 0 {
                    pos -= 1;
                    if view.char_at(pos)? == open {
                        return Some(pos);
                    }
                }
                return None;
            }
            let mut depth: i64 = 0;
            let mut pos = point;
            while pos > 0 {
                pos -= 1;
                let c = view.char_at(pos)?;
                if c == ch {
                    depth += 1;
                } else if c == open {
                    depth -= 1;
                    if depth == 0 {
                        return Some(pos);
                    }
                }
            }
            None
        }
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.ed.set_status(msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::RopeBuffer;

    fn editor(text: &str) -> Editor<RopeBuffer> {
        Editor::new(RopeBuffer::from_text(text))
    }

    #[test]
    fn test_get_regions_prefers_selections() {
        let mut ed = editor("hello world");
        ed.view.set_cursors(vec![Region::new(0, 5)]);
        let util = CmdUtil::new(&mut ed);
        assert_eq!(util.get_regions(), vec![Region::new(0, 5)]);
    }

    #[test]
    fn test_get_regions_falls_back_to_mark() {
        let mut ed = editor("hello world");
        ed.view.set_cursors(vec![Region::point(2)]);
        let mut util = CmdUtil::new(&mut ed);
        util.set_mark_here();
        util.set_selection(Region::point(7));
        assert_eq!(util.get_regions(), vec![Region::new(2, 7)]);
    }

    #[test]
    fn test_swap_point_and_mark() {
        let mut ed = editor("hello world");
        ed.view.set_cursors(vec![Region::point(1)]);
        let mut util = CmdUtil::new(&mut ed);
        util.set_mark_here();
        util.set_selection(Region::point(8));
        assert!(util.swap_point_and_mark());
        assert_eq!(util.get_point(), 1);
        assert_eq!(util.ed.state.mark_ring.top(), Some(&[Region::point(8)][..]));
    }

    #[test]
    fn test_toggle_active_mark_materializes_region() {
        let mut ed = editor("hello world");
        ed.view.set_cursors(vec![Region::point(0)]);
        let mut util = CmdUtil::new(&mut ed);
        util.set_mark_here();
        util.set_selection(Region::point(5));
        util.toggle_active_mark_mode(Some(true));
        assert_eq!(util.get_cursors(), vec![Region::new(0, 5)]);
        util.toggle_active_mark_mode(Some(false));
        assert_eq!(util.get_cursors(), vec![Region::new(0, 5)]);
    }

    #[test]
    fn test_toggle_off_keeps_the_selection_shape() {
        let mut ed = editor("hello world");
        ed.view.set_cursors(vec![Region::new(2, 7)]);
        ed.state.active_mark = true;
        let mut util = CmdUtil::new(&mut ed);
        util.toggle_active_mark_mode(Some(false));
        assert!(!util.ed.state.active_mark);
        assert_eq!(util.get_cursors(), vec![Region::new(2, 7)]);
    }

    #[test]
    fn test_line_indent_counts_tabs() {
        let mut ed = editor("\t  x\n");
        let util = CmdUtil::new(&mut ed);
        let (cols, offset) = util.line_indent(0);
        assert_eq!(cols, 6);
        assert_eq!(offset, 3);
    }

    #[test]
    fn test_to_other_end_brackets() {
        let mut ed = editor("(a (b) c)");
        let util = CmdUtil::new(&mut ed);
        assert_eq!(util.to_other_end(0, true), Some(9));
        assert_eq!(util.to_other_end(3, true), Some(6));
        assert_eq!(util.to_other_end(9, false), Some(0));
    }

    #[test]
    fn test_to_other_end_strings() {
        let mut ed = editor("\"abc\" x");
        let util = CmdUtil::new(&mut ed);
        assert_eq!(util.to_other_end(0, true), Some(5));
        assert_eq!(util.to_other_end(5, false), Some(0));
    }

    #[test]
    fn test_goto_line_clamps() {
        let mut ed = editor("a\nb\nc\n");
        let mut util = CmdUtil::new(&mut ed);
        util.goto_line(2);
        assert_eq!(util.get_point(), 2);
        util.goto_line(99);
        assert_eq!(util.get_point(), 6);
    }
}
