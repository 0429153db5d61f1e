//! Move-then-delete kill transactions, the kill ring, and zap-to-char.

mod common;

use common::*;
use emax::command::Command;
use emax::pipeline::Effect;
use emax::{Region, TextView};

#[test]
fn kill_word_captures_and_deletes() {
    let mut p = pipeline("hello world");
    p.dispatch(kill_word(1));
    assert_eq!(text(&p), " world");
    assert_eq!(points(&p), vec![0]);
    assert_eq!(ring_current(&mut p), vec!["hello".to_string()]);
}

#[test]
fn consecutive_kills_join_forward() {
    let mut p = pipeline("one two three");
    p.dispatch(kill_word(1));
    p.dispatch(kill_word(1));
    assert_eq!(text(&p), " three");
    assert_eq!(ring_current(&mut p), vec!["one two".to_string()]);
}

#[test]
fn backward_kill_prepends_to_the_entry() {
    let mut p = pipeline_at("one two three", 13);
    p.dispatch(kill_word(-1));
    p.dispatch(kill_word(-1));
    assert_eq!(text(&p), "one ");
    assert_eq!(ring_current(&mut p), vec!["two three".to_string()]);
}

#[test]
fn intervening_command_breaks_the_join() {
    let mut p = pipeline("one two three");
    p.dispatch(kill_word(1));
    p.dispatch(move_chars(true));
    p.dispatch(kill_word(1));
    assert_eq!(p.ed.kill_ring.len(), 2);
    assert_eq!(ring_current(&mut p), vec!["two".to_string()]);
}

#[test]
fn kill_line_stops_at_eol_then_swallows_the_newline() {
    let mut p = pipeline("hello world\nnext");
    p.dispatch(kill_line());
    assert_eq!(text(&p), "\nnext");
    p.dispatch(kill_line());
    assert_eq!(text(&p), "next");
    assert_eq!(ring_current(&mut p), vec!["hello world\n".to_string()]);
}

#[test]
fn kill_line_with_count_takes_whole_lines() {
    let mut p = pipeline("aa\nbb\ncc\ndd\n");
    supply_count(&mut p, 2);
    p.dispatch(kill_line());
    assert_eq!(text(&p), "cc\ndd\n");
    assert_eq!(ring_current(&mut p), vec!["aa\nbb\n".to_string()]);
}

#[test]
fn multi_cursor_kill_keeps_one_part_per_cursor() {
    let mut p = pipeline("one two\nthree four\n");
    p.ed
        .view
        .set_cursors(vec![Region::point(0), Region::point(8)]);
    p.dispatch(kill_word(1));
    assert_eq!(text(&p), " two\n four\n");
    assert_eq!(
        ring_current(&mut p),
        vec!["one".to_string(), "three".to_string()]
    );
}

#[test]
fn overlapping_regions_abort_and_restore() {
    let mut p = pipeline("one two");
    p.ed
        .view
        .set_cursors(vec![Region::point(0), Region::point(2)]);
    p.dispatch(kill_word(1));
    assert_eq!(text(&p), "one two");
    assert_eq!(points(&p), vec![0, 2]);
    assert!(p.ed.kill_ring.is_empty());
    assert!(p.ed.status.as_deref().unwrap_or("").contains("Overlapping"));
}

#[test]
fn zap_to_char_kills_through_the_prompt() {
    let mut p = pipeline("hello world");
    p.dispatch(Command::ZapToChar);
    assert!(p
        .take_effects()
        .iter()
        .any(|e| matches!(e, Effect::Prompt { .. })));
    assert!(p.ed.state.pending_kill.is_some());
    p.prompt_change("o");
    assert_eq!(text(&p), " world");
    assert!(p.ed.state.pending_kill.is_none());
    assert_eq!(ring_current(&mut p), vec!["hello".to_string()]);
}

#[test]
fn quit_aborts_a_pending_zap() {
    let mut p = pipeline_at("hello world", 2);
    p.dispatch(Command::ZapToChar);
    p.dispatch(Command::Quit);
    assert!(p.ed.state.pending_kill.is_none());
    assert_eq!(text(&p), "hello world");
    assert_eq!(points(&p), vec![2]);
}

#[test]
fn second_kill_is_blocked_while_one_is_pending() {
    let mut p = pipeline("hello world");
    p.dispatch(Command::ZapToChar);
    p.dispatch(kill_word(1));
    assert_eq!(text(&p), "hello world");
    assert!(p.ed.state.pending_kill.is_some());
}

#[test]
fn kill_after_zap_joins() {
    let mut p = pipeline("one two three");
    p.dispatch(Command::ZapToChar);
    p.prompt_change("e");
    assert_eq!(text(&p), " two three");
    p.dispatch(kill_word(1));
    assert_eq!(ring_current(&mut p), vec!["one two".to_string()]);
}

#[test]
fn kill_region_uses_mark_to_point() {
    let mut p = pipeline("hello world");
    p.dispatch(Command::SetMark);
    p.ed.view.set_cursors(vec![Region::point(5)]);
    p.dispatch(Command::KillRegion { is_copy: false });
    assert_eq!(text(&p), " world");
    assert_eq!(ring_current(&mut p), vec!["hello".to_string()]);
}

#[test]
fn copy_region_leaves_the_buffer_alone() {
    let mut p = pipeline("hello world");
    p.dispatch(Command::SetMark);
    p.ed.view.set_cursors(vec![Region::point(5)]);
    p.dispatch(Command::KillRegion { is_copy: true });
    assert_eq!(text(&p), "hello world");
    assert_eq!(ring_current(&mut p), vec!["hello".to_string()]);
    assert!(p.ed.status.as_deref().unwrap_or("").starts_with("Copied"));
}

#[test]
fn delete_white_space_removes_blanks_around_point() {
    let mut p = pipeline_at("one   two", 4);
    p.dispatch(Command::DeleteWhiteSpace);
    assert_eq!(text(&p), "onetwo");
    assert_eq!(points(&p), vec![3]);
}
