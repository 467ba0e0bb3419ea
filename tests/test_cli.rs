mod common;

use common::TestProject;
use std::process::Command;

fn autoreg(project: &TestProject) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_autoreg"));
    command.current_dir(project.path());
    command
}

#[test]
fn test_generates_and_reports() {
    let project = TestProject::new();
    project.add_file(
        "foo.h",
        "class REGISTER_CLASS Foo { REGISTER_PROPERTY int x; };\n",
    );

    let output = autoreg(&project)
        .args(["foo.h", "out/foo_reg.cpp"])
        .output()
        .expect("run autoreg");

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Generated code written to"));
    assert!(stdout.contains("1 classes, 0 enums"));
    assert!(project.path().join("out/foo_reg.cpp").exists());
}

#[test]
fn test_json_report() {
    let project = TestProject::new();
    project.add_file("color.h", "enum REGISTER_ENUM Color { Red, Green };\n");

    let output = autoreg(&project)
        .args(["--json", "color.h", "color_reg.cpp"])
        .output()
        .expect("run autoreg");

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json report");
    assert_eq!(report["enums"], 1);
    assert_eq!(report["classes"], 0);
    assert_eq!(report["includes"][0], "color.h");
}

#[test]
fn test_missing_input_exit_code() {
    let project = TestProject::new();

    let output = autoreg(&project)
        .args(["missing.h", "out.cpp"])
        .output()
        .expect("run autoreg");

    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("does not exist"));
    assert!(!project.path().join("out.cpp").exists());
}

#[test]
fn test_config_file_is_discovered() {
    let project = TestProject::new();
    project.add_file("autoreg.toml", "[output]\nbanner = \"Made by the build\"\n");
    project.add_file("foo.h", "class REGISTER_CLASS Foo {};\n");

    let output = autoreg(&project)
        .args(["foo.h", "foo_reg.cpp"])
        .output()
        .expect("run autoreg");

    assert!(output.status.success());
    let text = std::fs::read_to_string(project.path().join("foo_reg.cpp")).unwrap();
    assert!(text.starts_with("// Made by the build\n"));
}

#[test]
fn test_invalid_config_exit_code() {
    let project = TestProject::new();
    project.add_file("bad.toml", "[markers]\nclass = \"NOT VALID\"\n");
    project.add_file("foo.h", "class Foo {};\n");

    let output = autoreg(&project)
        .args(["--config", "bad.toml", "foo.h", "foo_reg.cpp"])
        .output()
        .expect("run autoreg");

    assert_eq!(output.status.code(), Some(6));
}

#[test]
fn test_print_config_without_paths() {
    let project = TestProject::new();

    let output = autoreg(&project)
        .args(["--print-config", "--std", "c11", "-I", "vendor"])
        .output()
        .expect("run autoreg");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("language_standard = \"c11\""));
    assert!(stdout.contains("vendor"));
}
