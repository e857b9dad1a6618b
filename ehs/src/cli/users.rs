use crate::cli::tables::account_table;
use crate::cli::utils::open_repo;
use crate::ledger::db_ops::UserRepo;
use anyhow::{anyhow, Result};
use clap::{ArgMatches, Command};

pub fn user_cmds<'a>() -> Command<'a> {
    Command::new("user")
        .arg_required_else_help(true)
        .about("inspect registered accounts")
        .subcommand(Command::new("list").about("list users and roles"))
}

pub async fn users_command(user_m: &ArgMatches) -> Result<()> {
    match user_m.subcommand() {
        Some(("list", sub_m)) => {
            let users = open_repo(sub_m).await?.list_users().await?;
            println!("{}", account_table(&users));
            Ok(())
        }
        _ => Err(anyhow!("command not found")),
    }
}
