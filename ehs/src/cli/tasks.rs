use crate::cli::tables::{task_detail, task_table};
use crate::cli::utils::open_repo;
use crate::ledger::db_ops::TaskRepo;
use anyhow::{anyhow, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};

pub fn task_cmds<'a>() -> Command<'a> {
    Command::new("task")
        .arg_required_else_help(true)
        .about("inspect tasks without logging in")
        .subcommand(
            Command::new("list").about("list tasks").args(&[
                Arg::new("worker")
                    .long("worker")
                    .takes_value(true)
                    .value_parser(value_parser!(i32))
                    .help("only tasks assigned to this worker id"),
                Arg::new("json")
                    .long("json")
                    .action(ArgAction::SetTrue)
                    .help("print json instead of a table"),
            ]),
        )
        .subcommand(
            Command::new("get")
                .about("get task detail")
                .args(&[Arg::new("id")
                    .takes_value(true)
                    .required(true)
                    .value_parser(value_parser!(i32))
                    .help("task id")]),
        )
}

pub async fn tasks_command(task_m: &ArgMatches) -> Result<()> {
    match task_m.subcommand() {
        Some(("list", sub_m)) => list_tasks(sub_m).await,
        Some(("get", sub_m)) => get_task(sub_m).await,
        _ => Err(anyhow!("command not found")),
    }
}

pub async fn list_tasks(sub_m: &ArgMatches) -> Result<()> {
    let repo = open_repo(sub_m).await?;
    let tasks = match sub_m.get_one::<i32>("worker") {
        Some(worker_id) => repo.list_for_worker(*worker_id).await?,
        None => repo.list_all().await?,
    };

    if sub_m.get_one::<bool>("json").copied().unwrap_or(false) {
        println!("{}", serde_json::to_string_pretty(&tasks)?);
    } else {
        println!("{}", task_table(&tasks, true));
    }
    Ok(())
}

pub async fn get_task(sub_m: &ArgMatches) -> Result<()> {
    let id = *sub_m
        .get_one::<i32>("id")
        .ok_or_else(|| anyhow!("id argument not found"))?;

    let repo = open_repo(sub_m).await?;
    let task = repo.get_task(id).await?;
    println!("{}", task_detail(&task));
    Ok(())
}
