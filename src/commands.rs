//! Reserved command handlers.
//!
//! These run inside the pipeline's bookkeeping wrapper: `this_cmd` is
//! already set when a handler starts, and `last_cmd` plus the argument
//! reset happen after it returns. Handlers that need the previous
//! command (kill joins, the set-mark toggle, yank-pop) therefore read
//! `last_cmd` before doing anything else.

use tracing::debug;

use crate::buffer::{self, Boundary, TextView};
use crate::command::{ArgToken, CaseMode, Command, CommandKind, Edge, IsearchOp};
use crate::facade::CmdUtil;
use crate::kill::{KillOutcome, MoveThenDeleteHelper};
use crate::pipeline::{Effect, Pipeline, Validity};
use crate::region::Region;
use crate::search::IsearchSession;
use crate::state::{PendingPrompt, PromptKind};
use crate::util;

pub(crate) fn run<B: TextView>(p: &mut Pipeline<B>, cmd: &Command) {
    match cmd {
        Command::UniversalArgument(token) => universal_argument(p, *token),
        Command::SetMark => set_mark(p),
        Command::CancelMark => cancel_mark(p),
        Command::SwapPointAndMark { toggle_active_mark } => {
            swap_point_and_mark(p, *toggle_active_mark)
        }
        Command::MoveWord { direction } => move_word(p, *direction),
        Command::ToWord { direction } => to_word(p, *direction),
        Command::MoveSexpr { direction } => move_sexpr(p, *direction),
        Command::MoveBackToIndentation => move_back_to_indentation(p),
        Command::MoveToParagraph { direction } => move_to_paragraph(p, *direction),
        Command::CaseWord { mode } => case_word(p, *mode),
        Command::CaseRegion { mode } => case_region(p, *mode),
        Command::ShiftRegion { direction } => shift_region(p, *direction),
        Command::KillRegion { is_copy } => kill_region(p, *is_copy),
        Command::MoveForKillLine => move_for_kill_line(p),
        Command::MoveThenDelete { move_cmd } => move_then_delete(p, move_cmd),
        Command::FinishMoveThenDelete => finish_move_then_delete(p),
        Command::Yank { pop } => yank(p, *pop),
        Command::JumpToChar { plus_one } => jump_to_char(p, *plus_one),
        Command::JumpToWord => jump_to_word(p),
        Command::ZapToChar => zap_to_char(p),
        Command::MoveToEdge {
            to,
            always_push_mark,
        } => move_to_edge(p, *to, *always_push_mark),
        Command::GotoLine => goto_line(p),
        Command::OpenLine => open_line(p),
        Command::DeleteWhiteSpace => delete_white_space(p),
        Command::DoTimes { times, cmd } => do_times(p, *times, cmd),
        Command::CenterView { center_only } => center_view(p, *center_only),
        Command::Isearch {
            forward,
            regex,
            op,
        } => isearch(p, *forward, *regex, op.as_ref()),
        Command::Quit => quit(p),
        other => {
            debug!(?other, "native command routed to the reserved dispatcher");
        }
    }
}

// =============================================================================
// Prefix argument
// =============================================================================

fn universal_argument<B: TextView>(p: &mut Pipeline<B>, token: ArgToken) {
    p.ed.state.supply_argument(token);
}

/// Signed repeat count for a directional command: the prefix argument
/// times the command's own direction.
fn directed_count<B: TextView>(p: &Pipeline<B>, direction: i64) -> (bool, u64) {
    let net = p.ed.state.get_count(true) * direction.signum();
    (net >= 0, net.unsigned_abs().max(1))
}

// =============================================================================
// Mark
// =============================================================================

fn set_mark<B: TextView>(p: &mut Pipeline<B>) {
    if p.ed.state.has_prefix_arg() {
        match p.ed.state.mark_ring.pop() {
            Some(cursors) => {
                p.ed.state.active_mark = false;
                p.ed.view.set_cursors(cursors);
                // typing it again pops further back, without re-toggling
                p.ed.state.this_cmd = Some(CommandKind::PopMark);
                let mut u = CmdUtil::new(&mut p.ed);
                u.ensure_visible();
            }
            None => p.ed.set_status("No mark to pop!"),
        }
        return;
    }
    if p.ed.state.last_cmd == Some(CommandKind::SetMark) {
        CmdUtil::new(&mut p.ed).toggle_active_mark_mode(None);
        return;
    }
    let auto_activate = p.ed.config.active_mark_mode;
    let mut u = CmdUtil::new(&mut p.ed);
    u.set_mark_here();
    if auto_activate {
        u.set_active_mark_mode(true);
    }
    u.set_status("Mark set");
}

fn cancel_mark<B: TextView>(p: &mut Pipeline<B>) {
    let mut u = CmdUtil::new(&mut p.ed);
    u.set_active_mark_mode(false);
    u.make_cursors_empty();
}

fn swap_point_and_mark<B: TextView>(p: &mut Pipeline<B>, toggle_active_mark: bool) {
    let mut u = CmdUtil::new(&mut p.ed);
    if !u.swap_point_and_mark() {
        u.set_status("No mark in this buffer");
        return;
    }
    if toggle_active_mark {
        u.toggle_active_mark_mode(None);
    }
}

// =============================================================================
// Motion
// =============================================================================

fn move_word<B: TextView>(p: &mut Pipeline<B>, direction: i64) {
    let (forward, times) = directed_count(p, direction);
    let separators = p.ed.config.word_separators.clone();
    let boundary = if forward {
        Boundary::WordEnd
    } else {
        Boundary::WordStart
    };
    let mut u = CmdUtil::new(&mut p.ed);
    for _ in 0..times {
        u.for_each_cursor(|ed, r| {
            Some(Region::point(buffer::find_by_class(
                &ed.view,
                r.b,
                forward,
                boundary,
                &separators,
            )))
        });
    }
}

fn to_word<B: TextView>(p: &mut Pipeline<B>, direction: i64) {
    let forward = direction >= 0;
    let separators = p.ed.config.word_separators.clone();
    // the opposite boundary of move-word: land where a word begins
    let boundary = if forward {
        Boundary::WordStart
    } else {
        Boundary::WordEnd
    };
    let mut u = CmdUtil::new(&mut p.ed);
    u.for_each_cursor(|ed, r| {
        Some(Region::point(buffer::find_by_class(
            &ed.view,
            r.b,
            forward,
            boundary,
            &separators,
        )))
    });
}

fn move_sexpr<B: TextView>(p: &mut Pipeline<B>, direction: i64) {
    let (forward, times) = directed_count(p, direction);
    let separators = p.ed.config.sexpr_separators.clone();
    let mut u = CmdUtil::new(&mut p.ed);
    for _ in 0..times {
        u.for_each_cursor(|ed, r| {
            let target = sexpr_step(ed, r.b, forward, &separators)?;
            Some(Region::point(target))
        });
    }
}

/// One balanced-expression step: skip separators, then either hop the
/// whole bracketed or quoted group or cross one symbol.
fn sexpr_step<B: TextView>(
    ed: &mut crate::editor::Editor<B>,
    point: usize,
    forward: bool,
    separators: &str,
) -> Option<usize> {
    if forward {
        let mut pos = point;
        while pos < ed.view.size() {
            let ch = ed.view.char_at(pos)?;
            if util::is_word_char(ch, separators) {
                return Some(buffer::find_by_class(
                    &ed.view,
                    pos,
                    true,
                    Boundary::WordEnd,
                    separators,
                ));
            }
            if util::sexpr_open(ch) {
                return CmdUtil::new(ed).to_other_end(pos, true);
            }
            pos += 1;
        }
        Some(ed.view.size())
    } else {
        let mut pos = point;
        while pos > 0 {
            let ch = ed.view.char_at(pos - 1)?;
            if util::is_word_char(ch, separators) {
                return Some(buffer::find_by_class(
                    &ed.view,
                    pos,
                    false,
                    Boundary::WordStart,
                    separators,
                ));
            }
            if util::sexpr_close(ch) {
                return CmdUtil::new(ed).to_other_end(pos, false);
            }
            pos -= 1;
        }
        Some(0)
    }
}

fn move_back_to_indentation<B: TextView>(p: &mut Pipeline<B>) {
    let mut u = CmdUtil::new(&mut p.ed);
    u.for_each_cursor(|ed, r| {
        let (_, offset) = CmdUtil::new(ed).line_indent(r.b);
        Some(Region::point(offset))
    });
}

fn move_to_paragraph<B: TextView>(p: &mut Pipeline<B>, direction: i64) {
    let (forward, times) = directed_count(p, direction);
    let mut u = CmdUtil::new(&mut p.ed);
    for _ in 0..times {
        u.for_each_cursor(|ed, r| {
            let last = ed.view.line_count().saturating_sub(1);
            let (mut row, _) = ed.view.rowcol(r.b);
            if forward {
                while row < last && row_is_blank(ed, row) {
                    row += 1;
                }
                while row < last && !row_is_blank(ed, row) {
                    row += 1;
                }
                if row_is_blank(ed, row) {
                    Some(Region::point(ed.view.text_point(row, 0)))
                } else {
                    Some(Region::point(ed.view.size()))
                }
            } else {
                if row > 0 {
                    row -= 1;
                }
                while row > 0 && row_is_blank(ed, row) {
                    row -= 1;
                }
                while row > 0 && !row_is_blank(ed, row - 1) {
                    row -= 1;
                }
                Some(Region::point(ed.view.text_point(row, 0)))
            }
        });
    }
}

fn row_is_blank<B: TextView>(ed: &crate::editor::Editor<B>, row: usize) -> bool {
    let span = ed.view.line_span(ed.view.text_point(row, 0));
    ed.view
        .substr(span)
        .chars()
        .all(|c| c == ' ' || c == '\t')
}

fn move_to_edge<B: TextView>(p: &mut Pipeline<B>, to: Edge, always_push_mark: bool) {
    let target = match to {
        Edge::Bof => 0,
        Edge::Eof => p.ed.view.size(),
        Edge::Bow => p.ed.view.visible_region().begin(),
        Edge::Eow => p.ed.view.visible_region().end(),
    };
    let push = always_push_mark || matches!(to, Edge::Bof | Edge::Eof);
    let mut u = CmdUtil::new(&mut p.ed);
    if push {
        u.push_mark_and_goto_position(target);
    } else {
        u.set_selection(Region::point(target));
        u.ensure_visible();
    }
}

fn goto_line<B: TextView>(p: &mut Pipeline<B>) {
    if p.ed.state.has_prefix_arg() {
        let line = p.ed.state.get_count(false).max(1) as usize;
        CmdUtil::new(&mut p.ed).goto_line(line);
        return;
    }
    let count = p.ed.state.get_count(true);
    p.ed.state.pending_prompt = Some(PendingPrompt {
        kind: PromptKind::GotoLine,
        count,
    });
    p.push_effect(Effect::Prompt {
        label: "Goto line:".to_string(),
    });
}

fn jump_to_char<B: TextView>(p: &mut Pipeline<B>, plus_one: bool) {
    let count = p.ed.state.get_count(true);
    p.ed.state.pending_prompt = Some(PendingPrompt {
        kind: PromptKind::JumpChar {
            plus_one,
            zap: false,
        },
        count,
    });
    p.push_effect(Effect::Prompt {
        label: "Jump to char:".to_string(),
    });
}

fn jump_to_word<B: TextView>(p: &mut Pipeline<B>) {
    let count = p.ed.state.get_count(true);
    p.ed.state.pending_prompt = Some(PendingPrompt {
        kind: PromptKind::JumpWord,
        count,
    });
    p.push_effect(Effect::Prompt {
        label: "Jump to word:".to_string(),
    });
}

// =============================================================================
// Case and indentation
// =============================================================================

fn apply_case(mode: CaseMode, text: &str) -> String {
    match mode {
        CaseMode::Upper => text.to_uppercase(),
        CaseMode::Lower => text.to_lowercase(),
        CaseMode::Capitalize => util::title_case(text),
    }
}

fn case_word<B: TextView>(p: &mut Pipeline<B>, mode: CaseMode) {
    let selections: Vec<Region> = p
        .ed
        .view
        .cursors()
        .iter()
        .filter(|r| !r.is_empty())
        .copied()
        .collect();
    if !selections.is_empty() {
        transform_regions(p, mode, &selections);
        return;
    }

    let (forward, times) = directed_count(p, 1);
    let separators = p.ed.config.word_separators.clone();
    let mut u = CmdUtil::new(&mut p.ed);
    u.for_each_cursor(|ed, r| {
        let start = r.b;
        let mut end = start;
        for _ in 0..times {
            end = buffer::find_by_class(
                &ed.view,
                end,
                forward,
                if forward {
                    Boundary::WordEnd
                } else {
                    Boundary::WordStart
                },
                &separators,
            );
        }
        let region = if forward {
            Region::new(start, end)
        } else {
            Region::new(end, start)
        };
        if region.is_empty() {
            return None;
        }
        let text = ed.view.substr(region);
        ed.view.replace(region, &apply_case(mode, &text));
        // forward ends past the word, backward stays put
        Some(Region::point(if forward { region.end() } else { start }))
    });
}

fn case_region<B: TextView>(p: &mut Pipeline<B>, mode: CaseMode) {
    let regions = CmdUtil::new(&mut p.ed).get_regions();
    if regions.is_empty() {
        p.ed.set_status("The mark is not set");
        return;
    }
    transform_regions(p, mode, &regions);
}

fn transform_regions<B: TextView>(p: &mut Pipeline<B>, mode: CaseMode, regions: &[Region]) {
    let mut sorted: Vec<Region> = regions.to_vec();
    sorted.sort_by_key(|r| r.begin());
    for region in sorted.iter().rev() {
        let text = p.ed.view.substr(*region);
        p.ed.view.replace(*region, &apply_case(mode, &text));
    }
}

fn shift_region<B: TextView>(p: &mut Pipeline<B>, direction: i64) {
    let cols = if p.ed.state.has_prefix_arg() {
        p.ed.state.get_count(false).max(1) as usize
    } else {
        p.ed.config.tab_size
    };
    let indent = direction > 0;

    let mut regions = CmdUtil::new(&mut p.ed).get_regions();
    if regions.is_empty() {
        // no region: the cursor lines themselves
        regions = p.ed.view.cursors().to_vec();
    }
    let mut rows = std::collections::BTreeSet::new();
    for r in &regions {
        let (first, _) = p.ed.view.rowcol(r.begin());
        let (mut last, col) = p.ed.view.rowcol(r.end());
        // a region ending at column zero does not include that line
        if col == 0 && last > first {
            last -= 1;
        }
        for row in first..=last {
            rows.insert(row);
        }
    }

    CmdUtil::new(&mut p.ed).save_cursors("shift");

    let total = rows.len();
    let mut shifted = 0;
    let pad = " ".repeat(cols);
    for row in rows.iter().rev() {
        let start = p.ed.view.text_point(*row, 0);
        if indent {
            p.ed.view.insert(start, &pad);
            shifted += 1;
        } else {
            let span = p.ed.view.line_span(start);
            let mut n = 0;
            while n < cols && start + n < span.end() && p.ed.view.char_at(start + n) == Some(' ') {
                n += 1;
            }
            if n > 0 {
                p.ed.view.erase(Region::new(start, start + n));
                shifted += 1;
            }
        }
    }

    let mut u = CmdUtil::new(&mut p.ed);
    u.restore_cursors("shift");
    u.set_status(format!("Shifted {shifted} of {total} lines in the region"));
}

// =============================================================================
// Kills and the kill ring
// =============================================================================

fn kill_region<B: TextView>(p: &mut Pipeline<B>, is_copy: bool) {
    let join = p.ed.state.last_was_kill_cmd();
    let mut regions = CmdUtil::new(&mut p.ed).get_regions();
    if regions.is_empty() {
        p.ed.set_status("The mark is not set");
        return;
    }
    regions.sort_by_key(|r| r.begin());
    let texts: Vec<String> = regions.iter().map(|r| p.ed.view.substr(*r)).collect();
    let bytes: usize = texts.iter().map(|t| t.len()).sum();
    let count = regions.len();

    if is_copy {
        p.ed.kill_ring.add(texts, true, false);
        p.ed
            .set_status(format!("Copied {bytes} bytes in {count} regions"));
        return;
    }

    p.ed.kill_ring.add(texts, true, join);
    for region in regions.iter().rev() {
        p.ed.view.erase(*region);
    }
    let collapsed = p.ed.view.cursors().iter().map(|r| r.to_point()).collect();
    p.ed.view.set_cursors(collapsed);
    p.ed.state.active_mark = false;
}

/// The kill-line motion, run inside a move-then-delete transaction.
/// Sweeps to end of line, swallowing the newline when only blanks
/// remain; with an argument, sweeps whole lines instead.
fn move_for_kill_line<B: TextView>(p: &mut Pipeline<B>) {
    let has_arg = p.ed.state.has_prefix_arg();
    let count = p.ed.state.get_count(true);
    let mut u = CmdUtil::new(&mut p.ed);
    u.for_each_cursor(|ed, r| {
        if has_arg {
            let (row, _) = ed.view.rowcol(r.b);
            let target = (row as i64 + count).max(0) as usize;
            let last = ed.view.line_count().saturating_sub(1);
            if target > last {
                return Some(Region::point(ed.view.size()));
            }
            return Some(Region::point(ed.view.text_point(target, 0)));
        }
        let span = ed.view.line_span(r.b);
        let rest = ed.view.substr(Region::new(r.b, span.end()));
        if rest.chars().all(|c| c == ' ' || c == '\t') {
            Some(Region::point((span.end() + 1).min(ed.view.size())))
        } else {
            Some(Region::point(span.end()))
        }
    });
}

/// Which way a kill motion travels, before the count's sign is applied.
fn motion_direction(cmd: &Command) -> i64 {
    match cmd {
        Command::MoveWord { direction }
        | Command::ToWord { direction }
        | Command::MoveSexpr { direction }
        | Command::MoveToParagraph { direction } => {
            if *direction < 0 {
                -1
            } else {
                1
            }
        }
        _ => 1,
    }
}

fn move_then_delete<B: TextView>(p: &mut Pipeline<B>, move_cmd: &Command) {
    let count = p.ed.state.get_count(true);
    let sign = if count >= 0 { 1 } else { -1 };
    let mut helper = MoveThenDeleteHelper::new(&p.ed.view);
    helper.forward = sign * motion_direction(move_cmd) >= 0;
    helper.join = p.ed.state.last_was_kill_cmd();
    if !p.ed.state.set_pending_kill(helper) {
        return;
    }
    p.run_nested(move_cmd);
    if p.ed.state.pending_prompt.is_some() {
        // the motion opened a prompt; a deferred task finishes the kill
        return;
    }
    if let Some(helper) = p.ed.state.take_pending_kill() {
        finish_kill(p, helper);
    }
}

fn finish_move_then_delete<B: TextView>(p: &mut Pipeline<B>) {
    match p.ed.state.take_pending_kill() {
        Some(helper) => finish_kill(p, helper),
        None => debug!("no pending kill transaction to finish"),
    }
}

fn finish_kill<B: TextView>(p: &mut Pipeline<B>, helper: MoveThenDeleteHelper) {
    let join = helper.join;
    match helper.finish(&mut p.ed.view, &mut p.ed.kill_ring, join) {
        KillOutcome::Killed { regions, bytes } => {
            if regions > 1 {
                p.ed
                    .set_status(format!("Killed {bytes} bytes in {regions} regions"));
            }
        }
        KillOutcome::Aborted => {
            p.ed
                .set_status("Overlapping kill regions; nothing deleted");
        }
    }
}

fn zap_to_char<B: TextView>(p: &mut Pipeline<B>) {
    let count = p.ed.state.get_count(true);
    let mut helper = MoveThenDeleteHelper::new(&p.ed.view);
    helper.forward = count >= 0;
    helper.join = p.ed.state.last_was_kill_cmd();
    if !p.ed.state.set_pending_kill(helper) {
        return;
    }
    p.ed.state.pending_prompt = Some(PendingPrompt {
        kind: PromptKind::JumpChar {
            plus_one: true,
            zap: true,
        },
        count,
    });
    p.push_effect(Effect::Prompt {
        label: "Zap to char:".to_string(),
    });
}

fn yank<B: TextView>(p: &mut Pipeline<B>, pop: i64) {
    if pop != 0 && p.ed.state.last_cmd != Some(CommandKind::Yank) {
        p.ed.set_status("Previous command was not a yank!");
        return;
    }
    let n = p.ed.view.cursors().len();
    let parts = match p.ed.kill_ring.get_current(n, pop) {
        Some(parts) => parts,
        None => {
            p.ed.set_status("Kill ring is empty");
            return;
        }
    };

    // First yank replaces the selections; yank-pop replaces what the
    // previous yank inserted, found between mark and point.
    let mut regions: Vec<Region> = if pop != 0 {
        CmdUtil::new(&mut p.ed).get_regions()
    } else {
        p.ed.view.cursors().to_vec()
    };
    if regions.len() != parts.len() {
        debug!(
            regions = regions.len(),
            parts = parts.len(),
            "yank arity mismatch"
        );
        return;
    }
    regions.sort_by_key(|r| r.begin());

    for i in (0..regions.len()).rev() {
        p.ed.view.replace(regions[i], &parts[i]);
    }

    // mark the start of every inserted part, leave point at its end,
    // accounting for the length change of the parts inserted before it
    let mut shift: i64 = 0;
    let mut marks = Vec::with_capacity(regions.len());
    let mut points = Vec::with_capacity(regions.len());
    for (region, part) in regions.iter().zip(parts.iter()) {
        let len = part.chars().count();
        let start = (region.begin() as i64 + shift) as usize;
        marks.push(Region::point(start));
        points.push(Region::point(start + len));
        shift += len as i64 - region.size() as i64;
    }
    p.ed.state.mark_ring.set(marks, true);
    p.ed.view.set_cursors(points);
    let mut u = CmdUtil::new(&mut p.ed);
    u.ensure_visible();
}

// =============================================================================
// Editing helpers
// =============================================================================

fn open_line<B: TextView>(p: &mut Pipeline<B>) {
    let times = p.ed.state.get_count(false).max(1) as usize;
    let text = "\n".repeat(times);
    let mut points: Vec<usize> = p.ed.view.cursors().iter().map(|r| r.b).collect();
    points.sort_unstable();
    for pos in points.iter().rev() {
        p.ed.view.insert(*pos, &text);
    }
    // the point stays before the newline it opened
    let cursors = points
        .iter()
        .enumerate()
        .map(|(i, pos)| Region::point(pos + i * times))
        .collect();
    p.ed.view.set_cursors(cursors);
}

fn delete_white_space<B: TextView>(p: &mut Pipeline<B>) {
    let mut cursors: Vec<Region> = p.ed.view.cursors().to_vec();
    cursors.sort_by_key(|r| r.begin());
    for r in cursors.iter().rev() {
        let mut start = r.b;
        while start > 0 && matches!(p.ed.view.char_at(start - 1), Some(' ') | Some('\t')) {
            start -= 1;
        }
        let mut end = r.b;
        while matches!(p.ed.view.char_at(end), Some(' ') | Some('\t')) {
            end += 1;
        }
        if start < end {
            p.ed.view.erase(Region::new(start, end));
        }
    }
}

fn do_times<B: TextView>(p: &mut Pipeline<B>, times: usize, cmd: &Command) {
    // repeated undo/redo goes through the task queue so each step runs at
    // a command boundary instead of inside this handler
    if matches!(cmd, Command::Undo | Command::Redo) {
        for _ in 0..times {
            p.tasks.push(cmd.clone(), Validity::Always);
        }
        return;
    }
    for _ in 0..times {
        p.run_nested(cmd);
    }
}

fn center_view<B: TextView>(p: &mut Pipeline<B>, center_only: bool) {
    let point = CmdUtil::new(&mut p.ed).get_point();
    let (row, _) = p.ed.view.rowcol(point);
    let visible = p.ed.view.visible_region();
    let (top_row, _) = p.ed.view.rowcol(visible.begin());
    let (bottom_row, _) = p.ed.view.rowcol(visible.end());

    if p.ed.state.has_prefix_arg() {
        // put the point's line N lines from the top of the window
        let n = p.ed.state.get_count(false).max(0);
        let delta = row as i64 - n - top_row as i64;
        p.ed.view.scroll_lines(delta);
        return;
    }
    if center_only {
        p.ed.view.show_at_center(point);
        return;
    }

    // cycle center, top, bottom on repeated invocations at the same spot
    let sel = p.ed.view.cursors().last().copied();
    let position = if p.ed.state.recenter.last_sel == sel {
        (p.ed.state.recenter.last_position + 1) % 3
    } else {
        0
    };
    p.ed.state.recenter.last_sel = sel;
    p.ed.state.recenter.last_position = position;
    match position {
        0 => p.ed.view.show_at_center(point),
        1 => p.ed.view.scroll_lines(row as i64 - top_row as i64),
        _ => p.ed.view.scroll_lines(row as i64 - bottom_row as i64),
    }
}

// =============================================================================
// Incremental search
// =============================================================================

fn isearch<B: TextView>(p: &mut Pipeline<B>, forward: bool, regex: bool, op: Option<&IsearchOp>) {
    let ed = &mut p.ed;
    match op {
        None => match ed.isearch.as_mut() {
            Some(session) => session.next(&mut ed.view, forward),
            None => {
                // a prefix argument flips the regex flag at open
                let regex = regex != ed.state.has_prefix_arg();
                ed.isearch = Some(IsearchSession::open(&ed.view, forward, regex));
            }
        },
        Some(IsearchOp::AddChar(ch)) => {
            if let Some(session) = ed.isearch.as_mut() {
                session.add_char(&mut ed.view, *ch);
            }
        }
        Some(IsearchOp::Next { forward }) => {
            if let Some(session) = ed.isearch.as_mut() {
                session.next(&mut ed.view, *forward);
            }
        }
        Some(IsearchOp::Pop) => {
            if let Some(session) = ed.isearch.as_mut() {
                if !session.pop(&mut ed.view) {
                    // popping past the start abandons the search
                    if let Some(session) = ed.isearch.take() {
                        session.quit(&mut ed.view);
                    }
                }
            }
        }
        Some(IsearchOp::AppendFromCursor) => {
            if let Some(session) = ed.isearch.as_mut() {
                session.append_from_cursor(&mut ed.view);
            }
        }
        Some(IsearchOp::KeepAll) => {
            if let Some(mut session) = ed.isearch.take() {
                let kept = session.keep_all(&mut ed.view);
                remember_pattern(ed, session.pattern());
                session.done(&mut ed.view, &mut ed.state.mark_ring);
                ed.set_status(format!("Kept {kept} cursors"));
                return;
            }
        }
        Some(IsearchOp::Done) => {
            finish_isearch(p);
            return;
        }
        Some(IsearchOp::Quit) => {
            if let Some(session) = ed.isearch.take() {
                session.quit(&mut ed.view);
            }
            ed.set_status("Quit");
            return;
        }
        Some(IsearchOp::SetSearch(text)) => {
            if let Some(mut session) = ed.isearch.take() {
                session.set_pattern(&mut ed.view, text);
                ed.isearch = Some(session);
            }
        }
        Some(IsearchOp::History { backward }) => {
            if let Some(mut session) = ed.isearch.take() {
                let entries = ed.isearch_history.clone();
                session.history(&mut ed.view, &entries, *backward);
                ed.isearch = Some(session);
            }
        }
    }
    if let Some(session) = p.ed.isearch.as_ref() {
        let status = session.status();
        p.ed.set_status(status);
    }
}

/// Accept an open search: record the pattern and push the mark at the
/// starting position. Safe to call when no session is open.
pub(crate) fn finish_isearch<B: TextView>(p: &mut Pipeline<B>) {
    let ed = &mut p.ed;
    if let Some(session) = ed.isearch.take() {
        remember_pattern(ed, session.pattern());
        session.done(&mut ed.view, &mut ed.state.mark_ring);
    }
}

fn remember_pattern<B: TextView>(ed: &mut crate::editor::Editor<B>, pattern: &str) {
    if !pattern.is_empty() && ed.isearch_history.last().map(String::as_str) != Some(pattern) {
        ed.isearch_history.push(pattern.to_string());
    }
}

// =============================================================================
// Quit
// =============================================================================

/// The escape hatch, in priority order: an open search quits, then a
/// pending prompt, then extra cursors collapse, then the visible mark
/// goes away, then a leftover selection collapses to a visible end.
fn quit<B: TextView>(p: &mut Pipeline<B>) {
    if let Some(session) = p.ed.isearch.take() {
        session.quit(&mut p.ed.view);
        p.ed.set_status("Quit");
        p.push_effect(Effect::HidePanel);
        return;
    }
    if p.ed.state.pending_prompt.is_some() {
        p.prompt_cancel();
        p.ed.set_status("Quit");
        return;
    }
    if p.ed.view.cursors().len() > 1 {
        let last = CmdUtil::new(&mut p.ed).get_last_cursor();
        p.ed.view.set_cursors(vec![last.to_point()]);
        return;
    }
    if p.ed.state.active_mark {
        CmdUtil::new(&mut p.ed).set_active_mark_mode(false);
        return;
    }
    // a leftover selection collapses to whichever end is on screen, or
    // failing that to the start of the line in the middle of the viewport
    if let Some(&r) = p.ed.view.cursors().first() {
        if !r.is_empty() {
            let on_screen = {
                let u = CmdUtil::new(&mut p.ed);
                if u.is_visible(r.b) {
                    Some(r.b)
                } else if u.is_visible(r.a) {
                    Some(r.a)
                } else {
                    None
                }
            };
            let pos = match on_screen {
                Some(pos) => pos,
                None => {
                    let visible = p.ed.view.visible_region();
                    let top = p.ed.view.rowcol(visible.begin()).0;
                    let bottom = p.ed.view.rowcol(visible.end()).0;
                    p.ed.view.text_point((top + bottom) / 2, 0)
                }
            };
            p.ed.view.set_cursors(vec![Region::point(pos)]);
            return;
        }
    }
    p.push_effect(Effect::HidePanel);
    p.ed.set_status("Quit");
}
