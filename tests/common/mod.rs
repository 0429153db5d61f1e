//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use emax::buffer::RopeBuffer;
use emax::command::{ArgToken, Command, MoveUnit};
use emax::{Editor, Pipeline, Region, TextView};

/// Pipeline over a rope buffer with the cursor at offset zero.
pub fn pipeline(text: &str) -> Pipeline<RopeBuffer> {
    Pipeline::new(Editor::new(RopeBuffer::from_text(text)))
}

/// Pipeline with the single cursor parked at `pos`.
pub fn pipeline_at(text: &str, pos: usize) -> Pipeline<RopeBuffer> {
    let mut p = pipeline(text);
    p.ed.view.set_cursors(vec![Region::point(pos)]);
    p
}

pub fn text(p: &Pipeline<RopeBuffer>) -> String {
    p.ed.view.text()
}

pub fn cursors(p: &Pipeline<RopeBuffer>) -> Vec<Region> {
    p.ed.view.cursors().to_vec()
}

pub fn points(p: &Pipeline<RopeBuffer>) -> Vec<usize> {
    p.ed.view.cursors().iter().map(|r| r.b).collect()
}

/// Feed a signed count through the universal-argument command.
pub fn supply_count(p: &mut Pipeline<RopeBuffer>, count: i64) {
    if count < 0 {
        p.dispatch(Command::UniversalArgument(ArgToken::Negate));
    }
    for ch in count.unsigned_abs().to_string().chars() {
        let digit = ch.to_digit(10).unwrap() as u8;
        p.dispatch(Command::UniversalArgument(ArgToken::Digit(digit)));
    }
}

pub fn move_chars(forward: bool) -> Command {
    Command::Move {
        by: MoveUnit::Characters,
        forward,
        extend: false,
    }
}

pub fn kill_word(direction: i64) -> Command {
    Command::MoveThenDelete {
        move_cmd: Box::new(Command::MoveWord { direction }),
    }
}

pub fn kill_line() -> Command {
    Command::MoveThenDelete {
        move_cmd: Box::new(Command::MoveForKillLine),
    }
}

pub fn ring_current(p: &mut Pipeline<RopeBuffer>) -> Vec<String> {
    let n = p.ed.view.cursors().len();
    p.ed.kill_ring.get_current(n, 0).unwrap_or_default()
}
