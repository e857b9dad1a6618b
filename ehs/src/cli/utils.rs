use crate::ledger::db_ops::DbOpsImpl;
use crate::ledger::open_store;
use crate::utils::ensure_db_file;
use anyhow::{anyhow, Result};
use clap::{Arg, ArgAction, ArgMatches};

/// Store flags shared by every subcommand
pub fn get_store_args<'a>() -> Vec<Arg<'a>> {
    [
        Arg::new("db-dsn")
            .long("db-dsn")
            .env("EHS_DSN")
            .global(true)
            .default_value(crate::config::DEFAULT_DB_DSN)
            .help("specify sqlite path to store users, tasks and rules"),
        Arg::new("debug-sql")
            .long("debug-sql")
            .env("EHS_DEBUG_SQL")
            .global(true)
            .required(false)
            .action(ArgAction::SetTrue)
            .help("print sql to debug"),
    ]
    .to_vec()
}

pub async fn open_repo(sub_m: &ArgMatches) -> Result<DbOpsImpl> {
    let db_dsn = sub_m
        .get_one::<String>("db-dsn")
        .ok_or_else(|| anyhow!("db-dsn flag not found"))?
        .clone();
    let debug_sql = sub_m.get_one::<bool>("debug-sql").copied().unwrap_or(false);

    ensure_db_file(&db_dsn).await?;
    let conn = open_store(&db_dsn, debug_sql).await?;
    Ok(DbOpsImpl::new(conn))
}
