use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::tempdir;

fn write_run(root: &Path, name: &str, max_gen: u64, gens: &[u64]) {
    let dir = root.join(name);
    fs::create_dir_all(&dir).expect("run dir");
    fs::write(
        dir.join("run_config.csv"),
        format!(
            "parameter,value\n\"SELECTION\",\"1\"\n\"MAX_GENS\",\"{max_gen}\"\n\
             \"POP_SIZE\",\"100\"\n\"OBJECTIVE_CNT\",\"10\"\n\"MU\",\"0.5\"\n"
        ),
    )
    .expect("settings");
    let body = |header: &str| {
        let mut content = format!("{header}\n");
        for gen in gens {
            content.push_str(&format!("\"{gen}\",\"{}\"\n", gen * 10));
        }
        content
    };
    fs::write(dir.join("data.csv"), body("update,max_fitness")).expect("data");
    fs::write(dir.join("phylodiversity.csv"), body("update,mrca_depth")).expect("phylo");
    fs::write(dir.join("phenotype_systematics.csv"), body("generation,richness"))
        .expect("phenotype");
}

fn aggregate(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dia-aggregate"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("spawn dia-aggregate")
}

fn aggregate_with_env(args: &[&str], rust_log: &str) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dia-aggregate"))
        .args(args)
        .env("RUST_LOG", rust_log)
        .output()
        .expect("spawn dia-aggregate")
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("utf-8 path")
}

#[test]
fn aggregates_runs_and_reports_progress() {
    let data = tempdir().expect("data dir");
    let dump = tempdir().expect("dump dir");
    write_run(data.path(), "RUN_A_2", 4, &[0, 1, 2, 3, 4]);
    write_run(data.path(), "RUN_A_1", 8, &[0, 1, 2, 3, 4]);
    let report = dump.path().join("summary.json");

    let output = aggregate(&[
        "--data",
        path_arg(data.path()),
        "--dump",
        path_arg(dump.path()),
        "--resolution",
        "3",
        "--out_fname",
        "agg.csv",
        "--report",
        path_arg(&report),
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8(output.stdout).expect("utf-8 stdout");
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "Found 2 run directories.");
    assert!(lines[1].starts_with("Extracting information from "));
    assert!(lines[1].ends_with("RUN_A_1"));
    assert_eq!(lines[2], "  Time points: 2");
    assert!(lines[3].ends_with("RUN_A_2"));
    assert_eq!(lines[4], "  Time points: 3");
    assert_eq!(lines[6], "Unfinished runs (1)");
    assert!(lines[7].starts_with("  - ") && lines[7].ends_with("RUN_A_1"));
    assert!(lines[8].starts_with("DONE! Output written to "));

    let mut reader = csv::Reader::from_path(dump.path().join("agg.csv")).expect("open output");
    let header = reader.headers().expect("header").clone();
    assert!(header.iter().any(|field| field == "phen_richness"));
    assert!(!header.iter().any(|field| field == "MU"));
    let gens: Vec<String> = reader
        .records()
        .map(|record| {
            let record = record.expect("record");
            let idx = header.iter().position(|field| field == "gen").expect("gen column");
            record[idx].to_string()
        })
        .collect();
    assert_eq!(gens, vec!["0", "3", "0", "3", "4"]);

    let summary: serde_json::Value =
        serde_json::from_slice(&fs::read(&report).expect("read report")).expect("json");
    assert_eq!(summary["rows_written"], 5);
}

#[test]
fn evaluation_stride_is_accepted() {
    let data = tempdir().expect("data dir");
    let dump = tempdir().expect("dump dir");
    write_run(data.path(), "RUN_B_1", 4, &[0, 1, 2, 3, 4]);

    // 100 * 10 * 1.0 = 1000 evaluations per generation.
    let output = aggregate(&[
        "--data",
        path_arg(data.path()),
        "--dump",
        path_arg(dump.path()),
        "--by_evals",
        "true",
        "--resolution",
        "2000",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf-8 stdout");
    assert!(stdout.contains("  Time points: 3"));
    assert!(dump.path().join("timeseries.csv").is_file());
}

#[test]
fn zero_resolution_exits_with_failure() {
    let data = tempdir().expect("data dir");
    let dump = tempdir().expect("dump dir");
    write_run(data.path(), "RUN_C_1", 2, &[0, 1, 2]);

    let output = aggregate(&[
        "--data",
        path_arg(data.path()),
        "--dump",
        path_arg(dump.path()),
        "--resolution",
        "0",
    ]);
    assert!(!output.status.success());
    #[cfg(unix)]
    assert_eq!(output.status.code(), Some(255));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Resolution must be >= 1"));
    assert!(!dump.path().join("timeseries.csv").exists());
}

#[test]
fn missing_data_directory_is_named() {
    let dump = tempdir().expect("dump dir");
    let missing = dump.path().join("no-such-root");

    let output = aggregate(&["--data", path_arg(&missing), "--dump", path_arg(dump.path())]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unable to locate all data directories"));
    assert!(stderr.contains("no-such-root=missing"));
}

#[test]
fn missing_run_file_stops_before_writing() {
    let data = tempdir().expect("data dir");
    let dump = tempdir().expect("dump dir");
    write_run(data.path(), "RUN_D_1", 2, &[0, 1, 2]);
    fs::remove_file(data.path().join("RUN_D_1/phylodiversity.csv")).expect("remove source");

    let output = aggregate(&["--data", path_arg(data.path()), "--dump", path_arg(dump.path())]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to find phylodiversity.csv"));
    assert!(!dump.path().join("timeseries.csv").exists());
}

#[test]
fn unparsable_rust_log_falls_back_to_log_level() {
    let data = tempdir().expect("data dir");
    let dump = tempdir().expect("dump dir");
    write_run(data.path(), "RUN_E_1", 2, &[0, 1, 2]);
    let args = [
        "--data",
        path_arg(data.path()),
        "--dump",
        path_arg(dump.path()),
        "--log-level",
        "debug",
    ];

    let output = aggregate_with_env(&args, "dia_agg=loudest");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("aggregation config"));

    let quiet = aggregate(&args[..4]);
    assert!(quiet.status.success());
    assert!(!String::from_utf8_lossy(&quiet.stderr).contains("aggregation config"));
}
