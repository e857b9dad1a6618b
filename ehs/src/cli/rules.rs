use crate::cli::tables::feedback_table;
use crate::cli::tables::rule_table;
use crate::cli::utils::open_repo;
use crate::ledger::db_ops::RuleRepo;
use anyhow::{anyhow, Result};
use clap::{ArgMatches, Command};

pub fn rule_cmds<'a>() -> Command<'a> {
    Command::new("rule")
        .arg_required_else_help(true)
        .about("inspect safety rules")
        .subcommand(Command::new("list").about("list safety rules"))
        .subcommand(Command::new("feedback").about("list rules with worker feedback"))
}

pub async fn rules_command(rule_m: &ArgMatches) -> Result<()> {
    match rule_m.subcommand() {
        Some(("list", sub_m)) => {
            let rules = open_repo(sub_m).await?.list_rules().await?;
            println!("{}", rule_table(&rules));
            Ok(())
        }
        Some(("feedback", sub_m)) => {
            let rules = open_repo(sub_m).await?.list_with_feedback().await?;
            println!("{}", feedback_table(&rules));
            Ok(())
        }
        _ => Err(anyhow!("command not found")),
    }
}
