//! Mark ring, active mark, and region commands.

mod common;

use common::*;
use emax::command::{CaseMode, Command};
use emax::{Region, TextView};

#[test]
fn set_mark_then_swap_returns() {
    let mut p = pipeline_at("hello world", 2);
    p.dispatch(Command::SetMark);
    p.ed.view.set_cursors(vec![Region::point(8)]);
    p.dispatch(Command::SwapPointAndMark {
        toggle_active_mark: false,
    });
    assert_eq!(points(&p), vec![2]);
    p.dispatch(Command::SwapPointAndMark {
        toggle_active_mark: false,
    });
    assert_eq!(points(&p), vec![8]);
}

#[test]
fn set_mark_twice_activates_the_mark() {
    let mut p = pipeline("hello");
    p.dispatch(Command::SetMark);
    assert!(!p.ed.state.active_mark);
    p.dispatch(Command::SetMark);
    assert!(p.ed.state.active_mark);
    p.dispatch(move_chars(true));
    p.dispatch(move_chars(true));
    p.dispatch(move_chars(true));
    assert_eq!(cursors(&p), vec![Region::new(0, 3)]);
}

#[test]
fn cancel_mark_collapses_the_selection() {
    let mut p = pipeline("hello");
    p.dispatch(Command::SetMark);
    p.dispatch(Command::SetMark);
    p.dispatch(move_chars(true));
    p.dispatch(Command::CancelMark);
    assert!(!p.ed.state.active_mark);
    assert_eq!(cursors(&p), vec![Region::point(1)]);
}

#[test]
fn prefix_arg_pops_the_mark_ring() {
    let mut p = pipeline_at("aaa bbb ccc ddd", 0);
    p.dispatch(Command::SetMark);
    p.dispatch(Command::DragSelect { at: 4, by: None });
    p.dispatch(Command::SetMark);
    p.dispatch(Command::DragSelect { at: 12, by: None });

    supply_count(&mut p, 4);
    p.dispatch(Command::SetMark);
    assert_eq!(points(&p), vec![4]);
    supply_count(&mut p, 4);
    p.dispatch(Command::SetMark);
    assert_eq!(points(&p), vec![0]);
    supply_count(&mut p, 4);
    p.dispatch(Command::SetMark);
    assert_eq!(p.ed.status.as_deref(), Some("No mark to pop!"));
}

#[test]
fn move_to_edge_pushes_the_mark() {
    let mut p = pipeline_at("hello\nworld\n", 3);
    p.dispatch(Command::MoveToEdge {
        to: emax::command::Edge::Eof,
        always_push_mark: true,
    });
    assert_eq!(points(&p), vec![12]);
    p.dispatch(Command::SwapPointAndMark {
        toggle_active_mark: false,
    });
    assert_eq!(points(&p), vec![3]);
}

#[test]
fn case_region_transforms_mark_to_point() {
    let mut p = pipeline("hello world");
    p.dispatch(Command::SetMark);
    p.ed.view.set_cursors(vec![Region::point(5)]);
    p.dispatch(Command::CaseRegion {
        mode: CaseMode::Upper,
    });
    assert_eq!(text(&p), "HELLO world");
}

#[test]
fn shift_region_indents_and_reports() {
    let mut p = pipeline("aa\nbb\ncc\n");
    p.dispatch(Command::SetMark);
    p.ed.view.set_cursors(vec![Region::point(6)]);
    p.dispatch(Command::ShiftRegion { direction: 1 });
    assert_eq!(text(&p), "    aa\n    bb\ncc\n");
    assert_eq!(
        p.ed.status.as_deref(),
        Some("Shifted 2 of 2 lines in the region")
    );
}

#[test]
fn shift_region_dedent_skips_unindented_lines() {
    let mut p = pipeline("    aa\nbb\n");
    p.ed.view.set_cursors(vec![Region::new(0, 9)]);
    p.dispatch(Command::ShiftRegion { direction: -1 });
    assert_eq!(text(&p), "aa\nbb\n");
    assert_eq!(
        p.ed.status.as_deref(),
        Some("Shifted 1 of 2 lines in the region")
    );
}

#[test]
fn quit_collapses_extra_cursors_before_deactivating_the_mark() {
    let mut p = pipeline("hello");
    p.ed
        .view
        .set_cursors(vec![Region::point(1), Region::point(3)]);
    p.ed.state.active_mark = true;
    p.dispatch(Command::Quit);
    assert_eq!(cursors(&p), vec![Region::point(3)]);
    assert!(p.ed.state.active_mark);
    p.dispatch(Command::Quit);
    assert!(!p.ed.state.active_mark);
}

#[test]
fn quit_collapses_a_leftover_selection_to_its_visible_end() {
    let mut p = pipeline("hello world");
    p.ed.view.set_cursors(vec![Region::new(2, 7)]);
    p.dispatch(Command::Quit);
    assert_eq!(cursors(&p), vec![Region::point(7)]);
}

#[test]
fn quit_lands_an_off_screen_selection_mid_viewport() {
    use emax::buffer::RopeBuffer;
    use emax::{Editor, Pipeline};

    let text = "x\n".repeat(100);
    let buf = RopeBuffer::from_text(&text).with_viewport_lines(10);
    let mut p = Pipeline::new(Editor::new(buf));
    p.ed.view.set_cursors(vec![Region::new(160, 170)]);
    p.dispatch(Command::Quit);
    // rows 0..=9 are on screen, so point lands at the start of row 4
    assert_eq!(p.ed.view.cursors(), &[Region::point(8)]);
}
