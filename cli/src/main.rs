use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use rusqlite::Connection;
use sql_practice_catalog::{Catalog, PracticeConfig};
use sql_practice_core::{
    PendingLoad, PracticeRecord, PracticeSession, QueryRun, REFERENCE_TABLES, ResultSet,
    RunSummary, SaveMode, SaveOutcome, Selection, validate_select,
};
use sql_practice_store::{
    ConfirmationToken, Database, DeleteOutcome, ExportStatus, LogBrowser, LogExporter, Migration,
    PracticeLog, QueryExecutor, write_records_csv, write_result_csv,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Configuration file read when `--config` is not given, if it exists.
const DEFAULT_CONFIG: &str = "sql-practice.yaml";

/// Longest query or note shown in a log listing before it is cut.
const LIST_TEXT_WIDTH: usize = 48;

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum CliOutputFormat {
    Table,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "sql-practice")]
#[command(about = "Practice SQL queries against a small seeded SQLite database")]
struct Cli {
    /// Configuration file (YAML). Defaults to ./sql-practice.yaml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Database file path, overriding the configuration.
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Question catalog path, overriding the configuration.
    #[arg(long = "catalog", global = true)]
    catalog_path: Option<PathBuf>,
    /// Practice log export (.xlsx or .csv), overriding the configuration.
    #[arg(long, global = true, conflicts_with = "no_export")]
    export: Option<PathBuf>,
    /// Do not mirror the practice log to a spreadsheet.
    #[arg(long, global = true)]
    no_export: bool,
    /// More log output on stderr (-v info, -vv debug).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create the tables, seed the reference data and upgrade the practice log.
    Init,
    /// Show which tables exist and how many rows they hold.
    Status,
    /// Show the reference tables with their columns and sample rows.
    Schema(SchemaArgs),
    /// List the topics of the question catalog.
    Topics,
    /// List the questions of one topic.
    Questions(QuestionsArgs),
    /// Run a query for a question and optionally save it to the practice log.
    Run(RunArgs),
    /// Review, re-run and delete saved practice records.
    Log(LogArgs),
    /// Modify the question catalog.
    Catalog(CatalogArgs),
}

#[derive(Debug, Args)]
struct SchemaArgs {
    /// Sample rows per table (default: `sample_rows` from the configuration).
    #[arg(long)]
    rows: Option<usize>,
}

#[derive(Debug, Args)]
struct QuestionsArgs {
    /// Topic name as listed by `topics`.
    topic: String,
    /// Output format.
    #[arg(long, default_value = "table")]
    format: CliOutputFormat,
}

/// Where the query text comes from. Exactly one is required.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
struct QuerySource {
    /// SQL text to run.
    #[arg(long)]
    query: Option<String>,
    /// File containing the SQL text to run.
    #[arg(long)]
    file: Option<PathBuf>,
    /// Load the query (and its question, if still in the catalog) from a
    /// practice log record.
    #[arg(long, value_name = "ID")]
    from_log: Option<i64>,
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Topic of the practiced question.
    #[arg(long, requires = "question")]
    topic: Option<String>,
    /// Title of the practiced question.
    #[arg(long, requires = "topic")]
    question: Option<String>,
    #[command(flatten)]
    source: QuerySource,
    /// Also write the result rows to a CSV file.
    #[arg(long, value_name = "PATH")]
    csv: Option<PathBuf>,
    /// Save the query to the practice log after a successful run.
    #[arg(long)]
    save: bool,
    /// Note stored with the saved query.
    #[arg(long, requires = "save")]
    note: Option<String>,
    /// Update the latest record for the same question instead of adding one.
    #[arg(long, requires = "save")]
    overwrite: bool,
    /// Output format.
    #[arg(long, default_value = "table")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct LogArgs {
    #[command(subcommand)]
    operation: LogOperation,
}

#[derive(Debug, Subcommand)]
enum LogOperation {
    /// List saved records, newest first.
    List(LogListArgs),
    /// Show one record in full.
    Show(LogShowArgs),
    /// Run a saved query again.
    Run(LogRunArgs),
    /// Delete a record. The first call prints a confirmation token; pass it
    /// back with --confirm to delete.
    Delete(LogDeleteArgs),
}

#[derive(Debug, Args)]
struct LogListArgs {
    /// Only show records of this topic ("All" shows every topic).
    #[arg(long)]
    topic: Option<String>,
    /// Also write the listed records to a CSV file.
    #[arg(long, value_name = "PATH")]
    csv: Option<PathBuf>,
    /// Output format.
    #[arg(long, default_value = "table")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct LogShowArgs {
    /// Record id.
    id: i64,
    /// Output format.
    #[arg(long, default_value = "table")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct LogRunArgs {
    /// Record id.
    id: i64,
    /// Also write the result rows to a CSV file.
    #[arg(long, value_name = "PATH")]
    csv: Option<PathBuf>,
    /// Output format.
    #[arg(long, default_value = "table")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct LogDeleteArgs {
    /// Record id.
    id: i64,
    /// Token printed by the first call.
    #[arg(long, value_name = "TOKEN")]
    confirm: Option<String>,
}

#[derive(Debug, Args)]
struct CatalogArgs {
    #[command(subcommand)]
    operation: CatalogOperation,
}

#[derive(Debug, Subcommand)]
enum CatalogOperation {
    /// Add a question to a topic (the topic is created if needed).
    Add(CatalogAddArgs),
}

#[derive(Debug, Args)]
struct CatalogAddArgs {
    /// Topic name.
    #[arg(long)]
    topic: String,
    /// Question title.
    #[arg(long)]
    question: String,
    /// Comma-separated reference tables the question is about.
    #[arg(long)]
    tables: Option<String>,
    /// Write the updated catalog back to its file.
    #[arg(long)]
    persist: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = Context::from_cli(&cli).and_then(|ctx| match cli.command {
        Command::Init => run_init(&ctx),
        Command::Status => run_status(&ctx),
        Command::Schema(args) => run_schema(&ctx, args),
        Command::Topics => run_topics(&ctx),
        Command::Questions(args) => run_questions(&ctx, args),
        Command::Run(args) => run_run(&ctx, args),
        Command::Log(args) => run_log(&ctx, args),
        Command::Catalog(args) => run_catalog(&ctx, args),
    });

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Resolved configuration shared by every command.
struct Context {
    config: PracticeConfig,
}

impl Context {
    fn from_cli(cli: &Cli) -> Result<Self, String> {
        let mut config = match &cli.config {
            Some(path) => PracticeConfig::load(path)
                .map_err(|e| format!("Failed to load config '{}': {e}", path.display()))?,
            None => PracticeConfig::load_or_default(DEFAULT_CONFIG)
                .map_err(|e| format!("Failed to load config '{DEFAULT_CONFIG}': {e}"))?,
        };

        if let Some(db) = &cli.db {
            config.database = db.clone();
        }
        if let Some(catalog) = &cli.catalog_path {
            config.catalog = catalog.clone();
        }
        if cli.no_export {
            config.export = None;
        } else if let Some(export) = &cli.export {
            config.export = Some(export.clone());
        }

        debug!(?config, "resolved configuration");
        Ok(Self { config })
    }

    /// Returns the database, creating and seeding it on first use.
    fn database(&self) -> Result<Database, String> {
        let db = Database::new(&self.config.database);
        db.initialize().map_err(|e| {
            format!(
                "Failed to initialize database '{}': {e}",
                self.config.database.display()
            )
        })?;
        Ok(db)
    }

    fn catalog(&self) -> Result<Catalog, String> {
        Catalog::load_or_empty(&self.config.catalog).map_err(|e| {
            format!(
                "Failed to load catalog '{}': {e}",
                self.config.catalog.display()
            )
        })
    }

    fn exporter(&self) -> Result<Option<LogExporter>, String> {
        self.config
            .export
            .as_ref()
            .map(LogExporter::new)
            .transpose()
            .map_err(|e| format!("Invalid export file: {e}"))
    }
}

fn practice_log<'a>(conn: &'a Connection, exporter: Option<&LogExporter>) -> PracticeLog<'a> {
    let log = PracticeLog::new(conn);
    match exporter {
        Some(exporter) => log.with_exporter(exporter.clone()),
        None => log,
    }
}

// ---------------------------------------------------------------------------
// init / status / schema
// ---------------------------------------------------------------------------

fn run_init(ctx: &Context) -> Result<(), String> {
    let db = Database::new(&ctx.config.database);
    let report = db
        .initialize()
        .map_err(|e| format!("Initialization failed: {e}"))?;
    println!("Database ready at '{}'.", db.path().display());
    println!("  Reference data seeded: {}", yes_no(report.seeded));
    if report.added_columns.is_empty() {
        println!("  Practice log columns added: none");
    } else {
        println!(
            "  Practice log columns added: {}",
            report.added_columns.join(", ")
        );
    }
    Ok(())
}

fn run_status(ctx: &Context) -> Result<(), String> {
    let db = Database::new(&ctx.config.database);
    if !db.path().exists() {
        println!(
            "Database '{}' does not exist yet; run `sql-practice init`.",
            db.path().display()
        );
        return Ok(());
    }

    let status = db
        .with_connection(|conn| Migration::new(conn).status())
        .map_err(|e| format!("Failed to get database status: {e}"))?;
    println!("Database Status ({}):", db.path().display());
    println!("  Tables exist: {}", yes_no(status.tables_exist));
    for count in &status.table_counts {
        match count.rows {
            Some(rows) => println!("  {}: {rows} row(s)", count.table),
            None => println!("  {}: missing", count.table),
        }
    }
    Ok(())
}

fn run_schema(ctx: &Context, args: SchemaArgs) -> Result<(), String> {
    let rows = args.rows.unwrap_or(ctx.config.sample_rows);
    let db = ctx.database()?;
    let samples = db
        .with_connection(|conn| {
            let executor = QueryExecutor::new(conn);
            REFERENCE_TABLES
                .iter()
                .map(|table| -> sql_practice_store::Result<_> {
                    let sample = executor.sample(table.name, rows)?;
                    Ok((table.name, table.columns, sample))
                })
                .collect::<sql_practice_store::Result<Vec<_>>>()
        })
        .map_err(|e| format!("Failed to read reference tables: {e}"))?;

    for (name, columns, sample) in samples {
        println!("{name} ({})", columns.join(", "));
        print!("{}", render_result(&sample));
        println!();
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Catalog browsing
// ---------------------------------------------------------------------------

fn run_topics(ctx: &Context) -> Result<(), String> {
    let catalog = ctx.catalog()?;
    if catalog.is_empty() {
        println!("No topics in '{}'.", ctx.config.catalog.display());
        return Ok(());
    }
    for topic in catalog.topics() {
        let count = catalog.questions(topic).map_or(0, <[_]>::len);
        println!("{topic} ({count} question(s))");
    }
    Ok(())
}

fn run_questions(ctx: &Context, args: QuestionsArgs) -> Result<(), String> {
    let catalog = ctx.catalog()?;
    let questions = catalog
        .questions(&args.topic)
        .ok_or_else(|| format!("Unknown topic '{}'", args.topic))?;

    match args.format {
        CliOutputFormat::Json => {
            let json = serde_json::to_string_pretty(questions)
                .map_err(|e| format!("JSON serialization failed: {e}"))?;
            println!("{json}");
        }
        CliOutputFormat::Table => {
            for (idx, question) in questions.iter().enumerate() {
                println!("{:>3}. {}", idx + 1, question.title);
                if !question.target_tables.is_empty() {
                    println!("     tables: {}", question.target_tables.join(", "));
                }
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// run command
// ---------------------------------------------------------------------------

fn run_run(ctx: &Context, args: RunArgs) -> Result<(), String> {
    let catalog = ctx.catalog()?;
    let mut session = PracticeSession::new();

    // Typed queries are checked before the database is created or opened.
    let db = if let Some(id) = args.source.from_log {
        let db = ctx.database()?;
        session.apply_pending(load_pending(&db, &catalog, id)?);
        db
    } else {
        if let Some(path) = &args.source.file {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("Failed to read '{}': {e}", path.display()))?;
            session.set_editor(text);
        } else if let Some(query) = &args.source.query {
            session.set_editor(query.as_str());
        }
        validate_select(session.editor()).map_err(|e| format!("rejected query: {e}"))?;
        ctx.database()?
    };

    if let (Some(topic), Some(question)) = (&args.topic, &args.question) {
        session.select(select_question(&catalog, topic, question)?);
    }

    let run = execute_query(&db, session.editor())?;
    session.record_run(RunSummary {
        rows_returned: run.row_count as u64,
        exec_time_ms: run.elapsed_ms,
    });
    print_run(&run, args.format)?;
    if let Some(path) = &args.csv {
        write_result_file(&run.result, path)?;
    }

    if args.save {
        let entry = session
            .save_entry(args.note.as_deref().unwrap_or(""))
            .map_err(|e| format!("Cannot save: {e}"))?;
        let mode = if args.overwrite {
            SaveMode::Overwrite
        } else {
            SaveMode::Append
        };
        let exporter = ctx.exporter()?;
        let report = db
            .with_connection(|conn| practice_log(conn, exporter.as_ref()).save(&entry, mode))
            .map_err(|e| format!("Failed to save practice record: {e}"))?;
        match report.outcome {
            SaveOutcome::Inserted(id) => println!("Saved as record {id}."),
            SaveOutcome::Updated(id) => println!("Updated record {id}."),
        }
        report_export(&report.export);
        session.mark_saved();
    }
    Ok(())
}

fn select_question(catalog: &Catalog, topic: &str, question: &str) -> Result<Selection, String> {
    catalog
        .find(topic, question)
        .map(|q| Selection::new(topic, q.title.clone()))
        .ok_or_else(|| format!("Unknown question '{question}' in topic '{topic}'"))
}

fn load_pending(db: &Database, catalog: &Catalog, id: i64) -> Result<PendingLoad, String> {
    db.with_connection(|conn| LogBrowser::new(PracticeLog::new(conn), catalog).load(id))
        .map_err(|e| format!("Failed to read practice log: {e}"))?
        .ok_or_else(|| format!("No practice record with id {id}"))
}

fn execute_query(db: &Database, query: &str) -> Result<QueryRun, String> {
    db.with_connection(|conn| QueryExecutor::new(conn).execute(query))
        .map_err(|e| e.to_string())
}

fn print_run(run: &QueryRun, format: CliOutputFormat) -> Result<(), String> {
    match format {
        CliOutputFormat::Json => {
            let json = serde_json::to_string_pretty(run)
                .map_err(|e| format!("JSON serialization failed: {e}"))?;
            println!("{json}");
        }
        CliOutputFormat::Table => {
            print!("{}", render_result(&run.result));
            println!("{} rows ({} ms)", run.row_count, run.elapsed_ms);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// log command
// ---------------------------------------------------------------------------

fn run_log(ctx: &Context, args: LogArgs) -> Result<(), String> {
    match args.operation {
        LogOperation::List(a) => run_log_list(ctx, a),
        LogOperation::Show(a) => run_log_show(ctx, a),
        LogOperation::Run(a) => run_log_run(ctx, a),
        LogOperation::Delete(a) => run_log_delete(ctx, a),
    }
}

fn run_log_list(ctx: &Context, args: LogListArgs) -> Result<(), String> {
    let db = ctx.database()?;
    let records = db
        .with_connection(|conn| PracticeLog::new(conn).fetch(args.topic.as_deref()))
        .map_err(|e| format!("Failed to read practice log: {e}"))?;

    match args.format {
        CliOutputFormat::Json => {
            let json = serde_json::to_string_pretty(&records)
                .map_err(|e| format!("JSON serialization failed: {e}"))?;
            println!("{json}");
        }
        CliOutputFormat::Table if records.is_empty() => println!("No practice records."),
        CliOutputFormat::Table => print!("{}", render_records(&records)),
    }

    if let Some(path) = &args.csv {
        let writer = create_output(path)?;
        write_records_csv(&records, writer).map_err(|e| e.to_string())?;
        println!("Wrote {} record(s) to '{}'.", records.len(), path.display());
    }
    Ok(())
}

fn run_log_show(ctx: &Context, args: LogShowArgs) -> Result<(), String> {
    let db = ctx.database()?;
    let record = db
        .with_connection(|conn| PracticeLog::new(conn).get(args.id))
        .map_err(|e| format!("Failed to read practice log: {e}"))?
        .ok_or_else(|| format!("No practice record with id {}", args.id))?;

    match args.format {
        CliOutputFormat::Json => {
            let json = serde_json::to_string_pretty(&record)
                .map_err(|e| format!("JSON serialization failed: {e}"))?;
            println!("{json}");
        }
        CliOutputFormat::Table => {
            println!("Record {}", record.id);
            println!("  Topic:    {}", record.topic);
            println!("  Question: {}", record.question_title);
            println!("  Created:  {}", record.created_at_display());
            println!("  Rows:     {}", record.rows_returned);
            println!("  Time:     {} ms", record.exec_time_ms);
            println!("  Note:     {}", record.note());
            println!("  Query:");
            for line in record.query_text.lines() {
                println!("    {line}");
            }
        }
    }
    Ok(())
}

fn run_log_run(ctx: &Context, args: LogRunArgs) -> Result<(), String> {
    let catalog = ctx.catalog()?;
    let db = ctx.database()?;
    let pending = load_pending(&db, &catalog, args.id)?;

    if args.format == CliOutputFormat::Table {
        match (&pending.topic, &pending.question_title) {
            (Some(topic), Some(question)) => {
                println!("Record {}: {topic} / {question}", args.id);
            }
            (Some(topic), None) => {
                println!("Record {}: {topic} (question no longer in the catalog)", args.id);
            }
            (None, _) => println!("Record {} (question no longer in the catalog)", args.id),
        }
    }

    let run = execute_query(&db, &pending.query_text)?;
    print_run(&run, args.format)?;
    if let Some(path) = &args.csv {
        write_result_file(&run.result, path)?;
    }
    Ok(())
}

fn run_log_delete(ctx: &Context, args: LogDeleteArgs) -> Result<(), String> {
    let catalog = ctx.catalog()?;
    let db = ctx.database()?;
    let exporter = ctx.exporter()?;

    let Some(raw) = &args.confirm else {
        let requested = db
            .with_connection(|conn| {
                let browser = LogBrowser::new(PracticeLog::new(conn), &catalog);
                let record = browser.log().get(args.id)?;
                let token = browser.request_delete(args.id)?;
                Ok(record.zip(token))
            })
            .map_err(|e| format!("Failed to read practice log: {e}"))?;

        match requested {
            Some((record, token)) => {
                println!(
                    "Record {}: {} / {}",
                    record.id, record.topic, record.question_title
                );
                println!("Delete this saved query? Confirm with:");
                println!("  sql-practice log delete {} --confirm {token}", record.id);
            }
            None => println!("No practice record with id {}; nothing to delete.", args.id),
        }
        return Ok(());
    };

    let token = raw
        .parse::<ConfirmationToken>()
        .map_err(|e| e.to_string())?;
    if token.id() != args.id {
        return Err(format!(
            "Confirmation token is for record {}, not {}",
            token.id(),
            args.id
        ));
    }

    let outcome = db
        .with_connection(|conn| {
            LogBrowser::new(practice_log(conn, exporter.as_ref()), &catalog).confirm_delete(&token)
        })
        .map_err(|e| format!("Delete failed: {e}"))?;
    match outcome {
        DeleteOutcome::Deleted { export } => {
            println!("Deleted record {}.", args.id);
            report_export(&export);
        }
        DeleteOutcome::AlreadyGone => println!("Record {} was already deleted.", args.id),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// catalog command
// ---------------------------------------------------------------------------

fn run_catalog(ctx: &Context, args: CatalogArgs) -> Result<(), String> {
    match args.operation {
        CatalogOperation::Add(a) => run_catalog_add(ctx, a),
    }
}

fn run_catalog_add(ctx: &Context, args: CatalogAddArgs) -> Result<(), String> {
    let mut catalog = ctx.catalog()?;
    let selection = catalog
        .add_question(&args.topic, &args.question, parse_csv_list(args.tables))
        .map_err(|e| format!("Cannot add question: {e}"))?;
    println!(
        "Added '{}' to topic '{}'.",
        selection.question_title, selection.topic
    );

    let path = &ctx.config.catalog;
    if args.persist {
        catalog
            .save(path)
            .map_err(|e| format!("Failed to save catalog '{}': {e}", path.display()))?;
        println!("Saved catalog to '{}'.", path.display());
    } else {
        println!(
            "Not persisted; pass --persist to write it to '{}'.",
            path.display()
        );
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn report_export(status: &ExportStatus) {
    match status {
        ExportStatus::Disabled => {}
        ExportStatus::Written { path, rows } => {
            println!("Exported {rows} record(s) to '{}'.", path.display());
        }
        ExportStatus::Failed(msg) => eprintln!("warning: practice log export failed: {msg}"),
    }
}

fn create_output(path: &Path) -> Result<BufWriter<fs::File>, String> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create directory '{}': {e}", parent.display()))?;
    }
    let file = fs::File::create(path)
        .map_err(|e| format!("Failed to create '{}': {e}", path.display()))?;
    Ok(BufWriter::new(file))
}

fn write_result_file(result: &ResultSet, path: &Path) -> Result<(), String> {
    let writer = create_output(path)?;
    write_result_csv(result, writer).map_err(|e| e.to_string())?;
    println!("Wrote {} row(s) to '{}'.", result.row_count(), path.display());
    Ok(())
}

fn render_result(result: &ResultSet) -> String {
    let rows: Vec<Vec<String>> = result
        .rows
        .iter()
        .map(|row| row.iter().map(ToString::to_string).collect())
        .collect();
    render_table(&result.columns, &rows)
}

fn render_records(records: &[PracticeRecord]) -> String {
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.created_at_display(),
                r.topic.clone(),
                r.question_title.clone(),
                truncate(&r.query_text, LIST_TEXT_WIDTH),
                r.rows_returned.to_string(),
                r.exec_time_ms.to_string(),
                truncate(r.note(), LIST_TEXT_WIDTH),
            ]
        })
        .collect();
    render_table(
        &["id", "created_at", "topic", "question", "query", "rows", "ms", "note"],
        &rows,
    )
}

/// Renders an aligned text table with a header separator. Line breaks in
/// cells are shown as spaces.
fn render_table<S: AsRef<str>>(headers: &[S], rows: &[Vec<String>]) -> String {
    let headers: Vec<String> = headers.iter().map(|h| single_line(h.as_ref())).collect();
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|cell| single_line(cell)).collect())
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &headers, &widths);
    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&separator.join("-+-"));
    out.push('\n');
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    out.push_str(padded.join(" | ").trim_end());
    out.push('\n');
}

fn single_line(text: &str) -> String {
    text.replace(['\r', '\n', '\t'], " ")
}

fn truncate(text: &str, max_chars: usize) -> String {
    let text = single_line(text.trim());
    if text.chars().count() <= max_chars {
        return text;
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{cut}...")
}

fn parse_csv_list(raw: Option<String>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(ToOwned::to_owned)
            .collect()
    })
    .unwrap_or_default()
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
