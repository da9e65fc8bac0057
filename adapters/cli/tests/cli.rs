use std::process::{Command, Output};

fn ball_maze(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ball-maze"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to invoke ball-maze binary")
}

#[test]
fn render_prints_a_seeded_maze() {
    let first = ball_maze(&["render", "--rows", "3", "--columns", "4", "--seed", "9"]);
    let second = ball_maze(&["render", "--rows", "3", "--columns", "4", "--seed", "9"]);

    assert!(first.status.success(), "render should succeed");
    assert_eq!(first.stdout, second.stdout);

    let drawing = String::from_utf8(first.stdout).expect("utf-8 output");
    assert_eq!(drawing.lines().count(), 7);
    assert!(drawing.contains('B'));
    assert!(drawing.contains('G'));
}

#[test]
fn play_clears_the_requested_rounds() {
    let output = ball_maze(&["play", "--rounds", "3", "--seed", "4", "--start", "3", "--max", "4"]);
    assert!(output.status.success(), "play should succeed");

    let text = String::from_utf8(output.stdout).expect("utf-8 output");
    assert!(text.starts_with("Welcome to Ball Maze."));
    assert_eq!(text.matches("You win this time [Next Stage]").count(), 2);
    assert_eq!(text.matches("You are a real WINNER! [New Game]").count(), 1);
}

#[test]
fn inverted_level_flags_are_rejected() {
    let output = ball_maze(&["play", "--start", "5", "--max", "2"]);
    assert!(!output.status.success());
}

#[test]
fn empty_mazes_are_rejected() {
    let output = ball_maze(&["render", "--rows", "0", "--columns", "3"]);
    assert!(!output.status.success());
}

#[test]
fn oversized_mazes_are_rejected() {
    let output = ball_maze(&["render", "--rows", "100000", "--columns", "100000"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8(output.stderr).expect("utf-8 output");
    assert!(stderr.contains("exceeds the limit"), "{stderr}");
}

#[test]
fn extreme_arena_flags_fail_cleanly() {
    let output = ball_maze(&["play", "--width", "1", "--height", "1000000000"]);
    assert!(!output.status.success());
}
