use std::path::PathBuf;

fn bin_exe() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_unveil")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "unveil.exe"
            } else {
                "unveil"
            });
            p
        })
}

fn fixture_path(dir: &std::path::Path) -> PathBuf {
    std::fs::create_dir_all(dir).unwrap();
    let spec_path = dir.join("spec.json");
    std::fs::write(&spec_path, include_str!("data/portfolio.json")).unwrap();
    spec_path
}

#[test]
fn cli_inspect_prints_the_plan() {
    let dir = PathBuf::from("target").join("cli_smoke_inspect");
    let spec_path = fixture_path(&dir);
    let spec_arg = spec_path.to_string_lossy().to_string();

    let output = std::process::Command::new(bin_exe())
        .args(["inspect", "--in", spec_arg.as_str()])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("loader"));
    assert!(stdout.contains("hero"));
    assert!(stdout.contains("scroll reveals"));
}

#[test]
fn cli_simulate_writes_an_event_log() {
    let dir = PathBuf::from("target").join("cli_smoke_simulate");
    let spec_path = fixture_path(&dir);
    let out_path = dir.join("events.json");
    let _ = std::fs::remove_file(&out_path);

    let spec_arg = spec_path.to_string_lossy().to_string();
    let out_arg = out_path.to_string_lossy().to_string();

    let status = std::process::Command::new(bin_exe())
        .args([
            "simulate",
            "--in",
            spec_arg.as_str(),
            "--duration",
            "8",
            "--fps",
            "60",
            "--scroll",
            "6:0,6.5:1200",
            "--out",
        ])
        .arg(out_arg.as_str())
        .status()
        .unwrap();

    assert!(status.success());
    let log: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out_path).unwrap()).unwrap();
    let entries = log.as_array().unwrap();
    assert!(!entries.is_empty());
    // The run reaches idle, so the log carries all three phase changes.
    let phase_changes = entries
        .iter()
        .filter(|e| e["event"].get("PhaseChanged").is_some())
        .count();
    assert_eq!(phase_changes, 3);
}

#[test]
fn cli_rejects_a_broken_spec() {
    let dir = PathBuf::from("target").join("cli_smoke_invalid");
    std::fs::create_dir_all(&dir).unwrap();
    let spec_path = dir.join("broken.json");
    std::fs::write(&spec_path, "{\"viewport_height\": 900.0}").unwrap();
    let spec_arg = spec_path.to_string_lossy().to_string();

    let status = std::process::Command::new(bin_exe())
        .args(["inspect", "--in", spec_arg.as_str()])
        .status()
        .unwrap();
    assert!(!status.success());
}
