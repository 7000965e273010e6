// ==========================================
// Customer Visit Planner - CLI Entry
// ==========================================
// Runs a workbook import against the planner database and prints the
// summary as JSON. Owns the ambient transaction: commits only when the
// run is applied and the summary reports can_apply.
//
// Usage:
//   visit-planner <workbook.xlsx> [--db <path>] [--year <YYYY>]
//       [--policy merge|create_only|overwrite]
//       [--validation standard|strict]
//       [--duplicates last_wins|first_wins|error]
//       [--apply]
//
// Without --apply the run is a dry-run preview and every write is
// rolled back.
// ==========================================

use std::path::PathBuf;
use std::process::ExitCode;

use visit_planner::importer::{import_planner_workbook, ImportOptions};
use visit_planner::repository::SqlitePlannerStore;
use visit_planner::{db, logging};

fn default_db_path() -> String {
    dirs::data_dir()
        .map(|dir| dir.join("visit-planner").join("planner.db"))
        .unwrap_or_else(|| PathBuf::from("planner.db"))
        .to_string_lossy()
        .to_string()
}

struct CliArgs {
    workbook: String,
    db_path: String,
    year_override: Option<i32>,
    upsert_policy: String,
    validation_mode: String,
    duplicate_policy: String,
    apply: bool,
}

fn parse_args() -> Result<CliArgs, String> {
    let mut args = std::env::args().skip(1);
    let mut workbook = None;
    let mut db_path = default_db_path();
    let mut year_override = None;
    let mut upsert_policy = String::new();
    let mut validation_mode = String::new();
    let mut duplicate_policy = String::new();
    let mut apply = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--db" => db_path = args.next().ok_or("--db requires a path")?,
            "--year" => {
                let raw = args.next().ok_or("--year requires a value")?;
                let year = raw.parse().map_err(|_| format!("invalid year '{raw}'"))?;
                year_override = Some(year);
            }
            "--policy" => upsert_policy = args.next().ok_or("--policy requires a value")?,
            "--validation" => {
                validation_mode = args.next().ok_or("--validation requires a value")?
            }
            "--duplicates" => {
                duplicate_policy = args.next().ok_or("--duplicates requires a value")?
            }
            "--apply" => apply = true,
            other if other.starts_with("--") => {
                return Err(format!("unknown flag '{other}'"));
            }
            other => {
                if workbook.replace(other.to_string()).is_some() {
                    return Err("only one workbook path may be given".to_string());
                }
            }
        }
    }

    Ok(CliArgs {
        workbook: workbook.ok_or("usage: visit-planner <workbook.xlsx> [options]")?,
        db_path,
        year_override,
        upsert_policy,
        validation_mode,
        duplicate_policy,
        apply,
    })
}

fn run() -> Result<bool, Box<dyn std::error::Error>> {
    let cli = parse_args()?;

    let options = ImportOptions::from_raw(
        cli.year_override,
        &cli.upsert_policy,
        &cli.validation_mode,
        &cli.duplicate_policy,
        !cli.apply,
    )?;

    let content = std::fs::read(&cli.workbook)?;
    let filename = PathBuf::from(&cli.workbook)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| cli.workbook.clone());

    if let Some(parent) = PathBuf::from(&cli.db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut conn = db::open_sqlite_connection(&cli.db_path)?;
    db::init_schema(&conn)?;

    let tx = conn.transaction()?;
    let summary = {
        let store = SqlitePlannerStore::new(&tx);
        import_planner_workbook(&store, &content, &filename, &options)?
    };

    let applied = !options.dry_run && summary.can_apply;
    if applied {
        tx.commit()?;
        tracing::info!(run_id = %summary.run_id, "import committed");
    } else {
        tx.rollback()?;
        if options.dry_run {
            tracing::info!(run_id = %summary.run_id, "dry run; all writes discarded");
        } else {
            tracing::warn!(
                run_id = %summary.run_id,
                blockers = summary.blockers.len(),
                "import blocked; all writes rolled back"
            );
        }
    }

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(applied || options.dry_run)
}

fn main() -> ExitCode {
    logging::init();

    tracing::info!("{} v{}", visit_planner::APP_NAME, visit_planner::VERSION);

    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            tracing::error!(error = %err, "import failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
