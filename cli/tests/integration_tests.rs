use std::fs;
use std::path::PathBuf;
use std::process::Output;

/// Helper to create a temp directory that is cleaned up on drop.
struct TempDir {
    path: PathBuf,
}

impl TempDir {
    fn new(name: &str) -> Self {
        let path =
            std::env::temp_dir().join(format!("sql_practice_cli_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&path);
        fs::create_dir_all(&path).expect("failed to create temp dir");
        Self { path }
    }

    fn path(&self) -> &PathBuf {
        &self.path
    }

    fn join(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// Minimal question catalog at the default location inside `dir`.
fn write_catalog(dir: &TempDir) -> PathBuf {
    let json = r#"{
  "Basics": [
    {"title": "List all departments", "target_tables": ["departments"]}
  ],
  "Joins": [
    {"title": "List employees with department", "target_tables": ["employees", "departments"]}
  ]
}"#;
    let path = dir.join("topics/questions.json");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, json).expect("failed to write catalog");
    path
}

/// Runs the binary inside `dir`, so default paths resolve there.
fn sql_practice(dir: &TempDir, args: &[&str]) -> Output {
    std::process::Command::new(env!("CARGO_BIN_EXE_sql-practice"))
        .current_dir(dir.path())
        .args(args)
        .output()
        .expect("failed to run sql-practice")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn save_joins_attempt(dir: &TempDir, extra: &[&str]) -> Output {
    let mut args = vec![
        "run",
        "--topic",
        "Joins",
        "--question",
        "List employees with department",
        "--query",
        "SELECT * FROM employees",
        "--save",
        "--export",
        "practice_log.csv",
    ];
    args.extend_from_slice(extra);
    sql_practice(dir, &args)
}

// ---------------------------------------------------------------------------
// init / status
// ---------------------------------------------------------------------------

#[test]
fn init_seeds_once() {
    let dir = TempDir::new("init_seeds_once");

    let first = sql_practice(&dir, &["init"]);
    assert!(first.status.success(), "{}", stderr(&first));
    assert!(stdout(&first).contains("Reference data seeded: yes"));
    assert!(dir.join("practice.db").exists());

    let second = sql_practice(&dir, &["init"]);
    assert!(second.status.success());
    assert!(stdout(&second).contains("Reference data seeded: no"));
}

#[test]
fn status_reports_counts() {
    let dir = TempDir::new("status_counts");

    let before = sql_practice(&dir, &["status"]);
    assert!(before.status.success());
    assert!(stdout(&before).contains("does not exist yet"));
    assert!(!dir.join("practice.db").exists());

    sql_practice(&dir, &["init"]);
    let after = sql_practice(&dir, &["status"]);
    let text = stdout(&after);
    assert!(text.contains("Tables exist: yes"), "{text}");
    assert!(text.contains("employees: 12 row(s)"), "{text}");
    assert!(text.contains("practice_log: 0 row(s)"), "{text}");
}

#[test]
fn schema_shows_sample_rows() {
    let dir = TempDir::new("schema_rows");
    let output = sql_practice(&dir, &["schema", "--rows", "2"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("departments (id, dept_name, location)"));
    assert!(text.contains("orders (order_id, customer_name"));
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

#[test]
fn run_prints_rows_and_count() {
    let dir = TempDir::new("run_rows");
    let output = sql_practice(&dir, &["run", "--query", "select * from departments"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("dept_name"));
    assert!(text.contains("5 rows ("));
}

#[test]
fn run_rejects_non_select() {
    let dir = TempDir::new("run_rejects");
    for sql in ["DROP TABLE employees", "insert into orders values(1)", "  "] {
        let output = sql_practice(&dir, &["run", "--query", sql]);
        assert!(!output.status.success(), "{sql} should fail");
        assert!(stderr(&output).contains("rejected query"), "{}", stderr(&output));
    }

    let output = sql_practice(&dir, &["run", "--query", "SELECT COUNT(*) AS n FROM employees"]);
    assert!(stdout(&output).contains("12"));
}

#[test]
fn rejected_query_does_not_create_database() {
    let dir = TempDir::new("run_rejects_no_db");
    let query_file = dir.join("drop.sql");
    fs::write(&query_file, "DROP TABLE employees").unwrap();

    let output = sql_practice(&dir, &["run", "--query", "DROP TABLE employees"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("rejected query"), "{}", stderr(&output));

    let output = sql_practice(&dir, &["run", "--file", "drop.sql"]);
    assert!(!output.status.success());
    assert!(!dir.join("practice.db").exists());
}

#[test]
fn run_reports_engine_errors() {
    let dir = TempDir::new("run_engine_error");
    let output = sql_practice(&dir, &["run", "--query", "SELECT * FROM customers"]);
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("error running query"), "{err}");
    assert!(err.contains("customers"), "{err}");
}

#[test]
fn run_writes_result_csv() {
    let dir = TempDir::new("run_csv");
    let output = sql_practice(
        &dir,
        &[
            "run",
            "--query",
            "SELECT name FROM employees WHERE dept_id IS NULL",
            "--csv",
            "out/result.csv",
        ],
    );
    assert!(output.status.success(), "{}", stderr(&output));
    let csv = fs::read_to_string(dir.join("out/result.csv")).unwrap();
    assert_eq!(csv, "name\nLiam Moore\n");
}

#[test]
fn run_json_output() {
    let dir = TempDir::new("run_json");
    let output = sql_practice(
        &dir,
        &["run", "--query", "SELECT id FROM departments ORDER BY id LIMIT 2", "--format", "json"],
    );
    assert!(output.status.success(), "{}", stderr(&output));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["row_count"], 2);
    assert_eq!(value["result"]["columns"][0], "id");
    assert_eq!(value["result"]["rows"][1][0], 2);
}

#[test]
fn run_unknown_question_fails() {
    let dir = TempDir::new("run_unknown_question");
    write_catalog(&dir);
    let output = sql_practice(
        &dir,
        &["run", "--topic", "Joins", "--question", "Nope", "--query", "SELECT 1"],
    );
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Unknown question 'Nope'"));
}

#[test]
fn save_without_question_fails() {
    let dir = TempDir::new("save_without_question");
    let output = sql_practice(&dir, &["run", "--query", "SELECT 1", "--save"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("select a topic and question first"));
}

// ---------------------------------------------------------------------------
// Practice log
// ---------------------------------------------------------------------------

#[test]
fn save_twice_lists_newest_first() {
    let dir = TempDir::new("save_twice");
    write_catalog(&dir);

    let first = save_joins_attempt(&dir, &[]);
    assert!(first.status.success(), "{}", stderr(&first));
    assert!(stdout(&first).contains("Saved as record 1."));
    assert!(stdout(&first).contains("Exported 1 record(s)"));

    let second = save_joins_attempt(&dir, &["--note", "again"]);
    assert!(stdout(&second).contains("Saved as record 2."));

    let listed = sql_practice(&dir, &["log", "list", "--topic", "Joins", "--format", "json"]);
    let records: serde_json::Value = serde_json::from_slice(&listed.stdout).unwrap();
    let ids: Vec<i64> = records
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![2, 1]);
    assert_eq!(records[0]["user_note"], "again");

    let export = fs::read_to_string(dir.join("practice_log.csv")).unwrap();
    let lines: Vec<&str> = export.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("2,Joins,"));
    assert!(lines[2].starts_with("1,Joins,"));
}

#[test]
fn overwrite_updates_latest_record() {
    let dir = TempDir::new("overwrite");
    write_catalog(&dir);

    save_joins_attempt(&dir, &[]);
    let output = sql_practice(
        &dir,
        &[
            "run",
            "--topic",
            "Joins",
            "--question",
            "List employees with department",
            "--query",
            "SELECT e.name, d.dept_name FROM employees e JOIN departments d ON d.id = e.dept_id",
            "--save",
            "--overwrite",
            "--note",
            "inner join",
            "--no-export",
        ],
    );
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("Updated record 1."));

    let shown = sql_practice(&dir, &["log", "show", "1"]);
    let text = stdout(&shown);
    assert!(text.contains("Note:     inner join"), "{text}");
    assert!(text.contains("JOIN departments d"), "{text}");
    assert!(text.contains("Rows:     11"), "{text}");
}

#[test]
fn log_run_replays_saved_query() {
    let dir = TempDir::new("log_run");
    write_catalog(&dir);
    save_joins_attempt(&dir, &[]);

    let output = sql_practice(&dir, &["log", "run", "1"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("Record 1: Joins / List employees with department"));
    assert!(text.contains("12 rows ("));

    let missing = sql_practice(&dir, &["log", "run", "99"]);
    assert!(!missing.status.success());
    assert!(stderr(&missing).contains("No practice record with id 99"));
}

#[test]
fn run_from_log_can_be_saved_again() {
    let dir = TempDir::new("run_from_log");
    write_catalog(&dir);
    save_joins_attempt(&dir, &[]);

    let output = sql_practice(&dir, &["run", "--from-log", "1", "--save", "--no-export"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("Saved as record 2."));
}

#[test]
fn log_delete_requires_confirmation() {
    let dir = TempDir::new("log_delete");
    write_catalog(&dir);
    save_joins_attempt(&dir, &[]);

    let request = sql_practice(&dir, &["log", "delete", "1"]);
    assert!(request.status.success(), "{}", stderr(&request));
    let text = stdout(&request);
    assert!(text.contains("Delete this saved query?"));
    let token = text
        .lines()
        .find_map(|line| line.split("--confirm ").nth(1))
        .expect("confirmation token printed")
        .trim()
        .to_string();

    let listed = sql_practice(&dir, &["log", "list"]);
    assert!(stdout(&listed).contains("List employees with department"));

    let confirm = sql_practice(
        &dir,
        &["log", "delete", "1", "--confirm", &token, "--export", "practice_log.csv"],
    );
    assert!(confirm.status.success(), "{}", stderr(&confirm));
    assert!(stdout(&confirm).contains("Deleted record 1."));
    let export = fs::read_to_string(dir.join("practice_log.csv")).unwrap();
    assert_eq!(export.lines().count(), 1);

    let again = sql_practice(&dir, &["log", "delete", "1", "--confirm", &token]);
    assert!(again.status.success());
    assert!(stdout(&again).contains("already deleted"));

    let listed = sql_practice(&dir, &["log", "list"]);
    assert!(stdout(&listed).contains("No practice records."));
}

#[test]
fn log_delete_rejects_bad_token() {
    let dir = TempDir::new("log_delete_bad_token");
    write_catalog(&dir);
    save_joins_attempt(&dir, &[]);

    let output = sql_practice(&dir, &["log", "delete", "1", "--confirm", "1:not-a-token"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("invalid confirmation token"));

    let listed = sql_practice(&dir, &["log", "list", "--format", "json"]);
    let records: serde_json::Value = serde_json::from_slice(&listed.stdout).unwrap();
    assert_eq!(records.as_array().unwrap().len(), 1);
}

#[test]
fn log_list_writes_csv() {
    let dir = TempDir::new("log_list_csv");
    write_catalog(&dir);
    save_joins_attempt(&dir, &[]);

    let output = sql_practice(&dir, &["log", "list", "--topic", "All", "--csv", "log.csv"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let csv = fs::read_to_string(dir.join("log.csv")).unwrap();
    assert!(csv.starts_with(
        "id,topic,question_title,query_text,user_note,rows_returned,exec_time_ms,created_at"
    ));
    assert_eq!(csv.lines().count(), 2);
}

// ---------------------------------------------------------------------------
// Catalog and configuration
// ---------------------------------------------------------------------------

#[test]
fn catalog_add_persists_only_on_request() {
    let dir = TempDir::new("catalog_add");
    let catalog = write_catalog(&dir);

    let transient = sql_practice(
        &dir,
        &["catalog", "add", "--topic", "Aggregation", "--question", "Count orders"],
    );
    assert!(transient.status.success(), "{}", stderr(&transient));
    assert!(!fs::read_to_string(&catalog).unwrap().contains("Count orders"));

    let persisted = sql_practice(
        &dir,
        &[
            "catalog",
            "add",
            "--topic",
            "Aggregation",
            "--question",
            "Count orders",
            "--tables",
            "orders",
            "--persist",
        ],
    );
    assert!(persisted.status.success(), "{}", stderr(&persisted));

    let questions = sql_practice(&dir, &["questions", "Aggregation"]);
    let text = stdout(&questions);
    assert!(text.contains("1. Count orders"), "{text}");
    assert!(text.contains("tables: orders"), "{text}");

    let duplicate = sql_practice(
        &dir,
        &["catalog", "add", "--topic", "Aggregation", "--question", "Count orders"],
    );
    assert!(!duplicate.status.success());
}

#[test]
fn catalog_add_rejects_unknown_table() {
    let dir = TempDir::new("catalog_unknown_table");
    write_catalog(&dir);
    let output = sql_practice(
        &dir,
        &["catalog", "add", "--topic", "Basics", "--question", "X", "--tables", "customers"],
    );
    assert!(!output.status.success());
    assert!(stderr(&output).contains("customers"));
}

#[test]
fn topics_follow_catalog_order() {
    let dir = TempDir::new("topics_order");
    write_catalog(&dir);
    let output = sql_practice(&dir, &["topics"]);
    let text = stdout(&output);
    let basics = text.find("Basics").unwrap();
    let joins = text.find("Joins").unwrap();
    assert!(basics < joins);
}

#[test]
fn config_file_sets_paths() {
    let dir = TempDir::new("config_file");
    fs::write(
        dir.join("custom.yaml"),
        "database: data/custom.db\nexport: null\nsample_rows: 1\n",
    )
    .unwrap();

    let output = sql_practice(&dir, &["--config", "custom.yaml", "init"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(dir.join("data/custom.db").exists());
    assert!(!dir.join("practice.db").exists());

    let missing = sql_practice(&dir, &["--config", "missing.yaml", "init"]);
    assert!(!missing.status.success());
    assert!(stderr(&missing).contains("Failed to load config"));
}
