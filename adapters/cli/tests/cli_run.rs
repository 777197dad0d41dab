use std::{
    fs,
    process::{Command, Output},
};

fn robot_maze(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_robot-maze"))
        .args(["--step-delay-ms", "0", "--frame-ms", "0"])
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to launch robot-maze")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn solving_the_default_course_prints_goal_banner() {
    let output = robot_maze(&["--program", "DDDRRURRDDLDDDRRRR"]);

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.starts_with("Welcome to Robot Maze.\n"));
    assert!(text.contains("R ~ . . . . . .\n"), "board drawn from the session scene");
    assert!(text.contains("The robot reached the goal!"));
    assert!(text.ends_with("outcome: succeeded\n"));
}

#[test]
fn walking_into_water_fails_quietly() {
    let output = robot_maze(&["--quiet", "--program", "R"]);

    assert!(output.status.success());
    assert_eq!(stdout(&output), "Welcome to Robot Maze.\noutcome: failed\n");
}

#[test]
fn removals_apply_after_the_program_is_entered() {
    let output = robot_maze(&["--quiet", "--program", "RD", "--remove", "0"]);

    assert!(output.status.success());
    assert_eq!(stdout(&output), "Welcome to Robot Maze.\noutcome: exhausted\n");
}

#[test]
fn unknown_glyph_is_reported() {
    let output = robot_maze(&["--program", "RXD"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown instruction 'X'"));
}

#[test]
fn custom_level_file_is_loaded() {
    let dir = std::env::temp_dir().join(format!("robot-maze-cli-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join("corridor.toml");
    fs::write(
        &path,
        "dimension = 3\ngoal = [2, 0]\n\n[[obstacles]]\nkind = \"fire\"\nat = [0, 1]\n",
    )
    .expect("level written");

    let output = robot_maze(&[
        "--quiet",
        "--level",
        path.to_str().expect("utf-8 path"),
        "--program",
        "RR",
    ]);

    assert!(output.status.success());
    assert_eq!(stdout(&output), "Welcome to Robot Maze.\noutcome: succeeded\n");
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn missing_level_file_is_an_error() {
    let output = robot_maze(&["--level", "/nonexistent/robot-maze/level.toml"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to read level file"));
}
