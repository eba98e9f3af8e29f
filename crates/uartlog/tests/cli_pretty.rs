#![cfg(all(unix, feature = "cli"))]

use std::path::PathBuf;
use std::process::{Command, Output};

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = PathBuf::from(format!(
        "/tmp/uartlog-pretty-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn uartlog(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_uartlog"))
        .arg("--log-level")
        .arg("error")
        .args(args)
        .output()
        .expect("uartlog should run")
}

const DELIMITED_LOG: &str = "\
A 08:00:00.100 02
A 08:00:00.101 50
A 08:00:00.102 31
A 08:00:00.103 03
B 08:00:00.050 02
B 08:00:00.051 41
B 08:00:00.052 2C
B 08:00:00.053 42
B 08:00:00.054 03
A 08:00:00.200 02
A 08:00:00.201 50
A 08:00:00.202 31
A 08:00:00.203 03
";

#[test]
fn pretty_writes_file_and_summary() {
    let dir = unique_temp_dir("delimited");
    let input = dir.join("bus_9600.txt");
    std::fs::write(&input, DELIMITED_LOG).unwrap();

    let output = uartlog(&["pretty", input.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "bus_9600.txt -> bus_9600_pretty.txt (3 lines)\n"
    );

    let written = std::fs::read_to_string(dir.join("bus_9600_pretty.txt")).unwrap();
    assert_eq!(
        written,
        "B 08:00:00.050 A,B\nA 08:00:00.100 P1\nR 08:00:00.100 x2\n"
    );

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn pretty_compresses_consecutive_repeats() {
    let dir = unique_temp_dir("repeat");
    let input = dir.join("link_b115200.log");
    let mut text = String::new();
    for second in 0..4 {
        for (i, byte) in ["EB", "90", "05", "01", "7E"].iter().enumerate() {
            text.push_str(&format!("A 09:00:0{second}.00{i} {byte}\n"));
        }
    }
    std::fs::write(&input, text).unwrap();

    let output = uartlog(&["pretty", input.to_str().unwrap()]);
    assert!(output.status.success());

    let written = std::fs::read_to_string(dir.join("link_b115200_pretty.txt")).unwrap();
    assert_eq!(written, "A 09:00:00.000 05 01 7E\nR 09:00:00.000 x4\n");

    let output = uartlog(&["pretty", "--no-compress", "--strip-envelope", input.to_str().unwrap()]);
    assert!(output.status.success());
    let written = std::fs::read_to_string(dir.join("link_b115200_pretty.txt")).unwrap();
    assert_eq!(written.lines().count(), 4);
    assert!(written.lines().all(|line| line.ends_with(" 01")));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn trim_last_field_option() {
    let dir = unique_temp_dir("trim");
    let input = dir.join("bus.txt");
    std::fs::write(&input, DELIMITED_LOG).unwrap();

    let output = uartlog(&["pretty", "--trim-last-field", "--no-compress", input.to_str().unwrap()]);
    assert!(output.status.success());
    let written = std::fs::read_to_string(dir.join("bus_pretty.txt")).unwrap();
    assert!(written.starts_with("B 08:00:00.050 A\n"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_file_is_skipped_and_exit_is_1() {
    let dir = unique_temp_dir("skip");
    let input = dir.join("ok.txt");
    std::fs::write(&input, "").unwrap();
    let missing = dir.join("missing.txt");

    let output = uartlog(&[
        "pretty",
        missing.to_str().unwrap(),
        input.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], format!("Skip: {}", missing.display()));
    assert_eq!(lines[1], "ok.txt -> ok_pretty.txt (0 lines)");
    assert_eq!(std::fs::read_to_string(dir.join("ok_pretty.txt")).unwrap(), "");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn json_summary() {
    let dir = unique_temp_dir("json");
    let input = dir.join("bus.txt");
    std::fs::write(&input, DELIMITED_LOG).unwrap();

    let output = uartlog(&["--format", "json", "pretty", input.to_str().unwrap()]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"output\":\"bus_pretty.txt\""), "{stdout}");
    assert!(stdout.contains("\"lines\":3"));
    assert!(stdout.contains("\"status\":\"ok\""));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn version_prints_name() {
    let output = uartlog(&["version"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("uartlog "));
}
