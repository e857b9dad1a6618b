use anyhow::{anyhow, Result};
use clap::{Arg, ArgMatches, Command};
use ehs::cli;
use ehs::cli::{App, Console};
use ehs::config::*;
use ehs::ledger::db_ops::DbOpsImpl;
use ehs::ledger::open_store;
use ehs::ledger::worker::ReportWorker;
use ehs::media::FileMedia;
use ehs::utils::ensure_db_file;
use log::*;
use simplelog::*;
use std::str::FromStr;
use std::sync::Arc;
use tokio::io::BufReader;

#[tokio::main()]
async fn main() {
    let app_m = Command::new("ehs")
        .version("0.1.0")
        .about("environment, health and safety task tracker")
        .args(cli::get_store_args())
        .args(&[
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .env("EHS_LOG_LEVEL")
                .default_value("warn")
                .help("set log level for application"),
            Arg::new("media-dir")
                .long("media-dir")
                .global(true)
                .env("EHS_MEDIA_DIR")
                .default_value(DEFAULT_MEDIA_DIR)
                .help("directory that receives files attached to work reports"),
            Arg::new("report-delay")
                .long("report-delay")
                .global(true)
                .env("EHS_REPORT_DELAY")
                .default_value("0s")
                .help("wait this long before a work report is saved, e.g. 3m"),
        ])
        .subcommand(Command::new("run").about("start the interactive console (default)"))
        .subcommand(cli::task_cmds())
        .subcommand(cli::rule_cmds())
        .subcommand(cli::user_cmds())
        .get_matches();

    let cfg_m = app_m.subcommand().map(|(_, sub_m)| sub_m).unwrap_or(&app_m);
    let cfg = match load_config(cfg_m) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{:?}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = init_logger(&cfg) {
        eprintln!("{:?}", e);
    }

    let exec_result: Result<()> = match app_m.subcommand() {
        Some(("task", sub_m)) => cli::tasks_command(sub_m).await,
        Some(("rule", sub_m)) => cli::rules_command(sub_m).await,
        Some(("user", sub_m)) => cli::users_command(sub_m).await,
        _ => start_console(cfg).await,
    };

    if let Err(e) = exec_result {
        eprintln!("{:?}", e);
        std::process::exit(1);
    }
}

fn init_logger(cfg: &ServiceConfig) -> Result<()> {
    let lv = LevelFilter::from_str(cfg.log_level.as_str())?;
    // stdout belongs to the prompts
    TermLogger::init(lv, Config::default(), TerminalMode::Stderr, ColorChoice::Auto)?;
    Ok(())
}

fn load_config(sub_m: &ArgMatches) -> Result<ServiceConfig> {
    let db_dsn = sub_m
        .get_one::<String>("db-dsn")
        .ok_or_else(|| anyhow!("db-dsn flag not found"))?
        .clone();
    let media_dir = sub_m
        .get_one::<String>("media-dir")
        .ok_or_else(|| anyhow!("media-dir flag not found"))?
        .clone();
    let report_delay = sub_m
        .get_one::<String>("report-delay")
        .ok_or_else(|| anyhow!("report-delay flag not found"))?;
    let log_level = sub_m
        .get_one::<String>("log-level")
        .ok_or_else(|| anyhow!("log-level flag not found"))?
        .clone();
    let debug_sql = sub_m.get_one::<bool>("debug-sql").copied().unwrap_or(false);

    let report_delay = duration_str::parse(report_delay.as_str())
        .map_err(|e| anyhow!("invalid report-delay {}: {}", report_delay, e))?;

    Ok(ServiceConfig::new(
        db_dsn,
        media_dir,
        report_delay,
        log_level,
        debug_sql,
    ))
}

async fn start_console(cfg: ServiceConfig) -> Result<()> {
    ensure_db_file(&cfg.db_dsn).await?;
    let db_conn = open_store(&cfg.db_dsn, cfg.debug_sql).await?;
    let db_ops = Arc::new(DbOpsImpl::new(db_conn));
    info!("open store {}", cfg.db_dsn);

    let media = Arc::new(FileMedia::new(cfg.media_dir));
    info!(
        "media saved to {}, report delay {}",
        media.root().display(),
        humantime::format_duration(cfg.report_delay)
    );
    let reporter = ReportWorker::new(db_ops.clone(), media, cfg.report_delay);

    let app = App::new(db_ops, reporter.clone());
    let mut console = Console::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout());
    app.run(&mut console).await?;

    if reporter.in_flight() > 0 {
        warn!("{} report(s) still running at exit", reporter.in_flight());
    }
    info!("Shutdown program");
    Ok(())
}
