use std::process::{Command, Output};

fn tile_trail(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tile-trail"))
        .args(args)
        .output()
        .expect("failed to invoke the tile-trail binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn list_levels_prints_catalogue() {
    let output = tile_trail(&["--list-levels"]);
    assert!(output.status.success());

    let listing = stdout(&output);
    for name in ["straight", "diagonal", "knot", "switchback"] {
        assert!(listing.contains(name), "{name} missing from {listing}");
    }
}

#[test]
fn headless_straight_level_is_won() {
    let output = tile_trail(&[
        "--headless",
        "--level",
        "straight",
        "--animation-rate-ms",
        "100",
    ]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("level straight: Win"));
}

#[test]
fn headless_switchback_needs_rotations() {
    let untouched = tile_trail(&["--headless", "--level", "switchback", "-q"]);
    assert!(untouched.status.success());
    assert!(stdout(&untouched).contains("Lose"));

    let solved = tile_trail(&[
        "--headless",
        "--level",
        "switchback",
        "--rotate",
        "1,0,2",
        "--rotate",
        "1,1,-2",
    ]);
    assert!(solved.status.success());
    assert!(stdout(&solved).contains("Win"));
}

#[test]
fn invalid_input_fails_with_error() {
    assert!(!tile_trail(&["--headless", "--level", "missing"]).status.success());
    assert!(!tile_trail(&["--headless", "--animation-rate-ms", "0"]).status.success());
    assert!(!tile_trail(&["--headless", "--level", "diagonal", "--rotate", "2,0"])
        .status
        .success());
}
