//! Prefix-argument accumulation and the repeat rewrite.

mod common;

use common::*;
use emax::command::{ArgToken, Command};
use emax::pipeline::ContextKey;
use emax::Region;

#[test]
fn digits_compose_a_decimal_count() {
    let mut p = pipeline(&"x".repeat(60));
    supply_count(&mut p, 42);
    p.dispatch(move_chars(true));
    assert_eq!(points(&p), vec![42]);
}

#[test]
fn by_four_multiplies() {
    let mut p = pipeline(&"x".repeat(70));
    p.dispatch(Command::UniversalArgument(ArgToken::ByFour));
    p.dispatch(Command::UniversalArgument(ArgToken::ByFour));
    p.dispatch(Command::UniversalArgument(ArgToken::ByFour));
    p.dispatch(move_chars(true));
    assert_eq!(points(&p), vec![64]);
}

#[test]
fn bare_negate_counts_as_minus_one() {
    let mut p = pipeline_at("abcdef", 3);
    p.dispatch(Command::UniversalArgument(ArgToken::Negate));
    p.dispatch(move_chars(true));
    assert_eq!(points(&p), vec![2]);
}

#[test]
fn negative_count_repeats_in_the_other_direction() {
    let mut p = pipeline_at("abcdefgh", 6);
    supply_count(&mut p, -4);
    p.dispatch(move_chars(true));
    assert_eq!(points(&p), vec![2]);
}

#[test]
fn argument_is_consumed_by_the_next_command() {
    let mut p = pipeline(&"x".repeat(20));
    supply_count(&mut p, 5);
    assert!(p.query_context(ContextKey::HasPrefixArgument));
    p.dispatch(move_chars(true));
    assert!(!p.query_context(ContextKey::HasPrefixArgument));
    p.dispatch(move_chars(true));
    assert_eq!(points(&p), vec![6]);
}

#[test]
fn repeat_applies_to_deletion() {
    let mut p = pipeline("abcdef");
    supply_count(&mut p, 3);
    p.dispatch(Command::RightDelete);
    assert_eq!(text(&p), "def");
}

#[test]
fn repeat_applies_to_backspace() {
    let mut p = pipeline_at("abcdef", 5);
    supply_count(&mut p, 2);
    p.dispatch(Command::LeftDelete);
    assert_eq!(text(&p), "abcf");
    assert_eq!(points(&p), vec![3]);
}

#[test]
fn scroll_amount_scales_directly() {
    let mut p = pipeline(&"line\n".repeat(200));
    supply_count(&mut p, 7);
    p.dispatch(Command::ScrollLines { amount: 3 });
    assert_eq!(p.ed.view.top_line(), 21);
}

#[test]
fn goto_line_uses_the_count() {
    let mut p = pipeline("aa\nbb\ncc\ndd\n");
    supply_count(&mut p, 3);
    p.dispatch(Command::GotoLine);
    assert_eq!(cursors(&p), vec![Region::point(6)]);
}

#[test]
fn word_motion_honors_a_signed_count() {
    let mut p = pipeline("one two three four");
    supply_count(&mut p, 3);
    p.dispatch(Command::MoveWord { direction: 1 });
    assert_eq!(points(&p), vec![13]);
    supply_count(&mut p, 2);
    p.dispatch(Command::MoveWord { direction: -1 });
    assert_eq!(points(&p), vec![4]);
}
