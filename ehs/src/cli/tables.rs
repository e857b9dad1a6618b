use crate::credential::Account;
use crate::utils::short_msg;
use entity::rules::Model as Rule;
use entity::tasks::Model as Task;
use tabled::builder::Builder;
use tabled::settings::style::Style;

const NONE: &str = "None";

fn or_none(v: &Option<String>) -> String {
    v.clone().unwrap_or_else(|| NONE.to_string())
}

/// Task overview, the manager view carries the assignee columns
pub fn task_table(tasks: &[Task], with_worker: bool) -> String {
    let mut builder = Builder::default();
    let mut header = vec!["Id"];
    if with_worker {
        header.extend(["WorkerId", "AssignedTo"]);
    }
    header.extend([
        "Task",
        "Status",
        "ViolationComment",
        "ViolationAt",
        "Report",
        "Media",
    ]);
    builder.set_header(header);

    for task in tasks {
        let mut record = vec![task.id.to_string()];
        if with_worker {
            record.push(task.worker_id.clone());
            record.push(task.worker_username.clone());
        }
        record.extend([
            short_msg(&task.task_description, 40),
            task.status.clone(),
            short_msg(&or_none(&task.violation_comment), 30),
            or_none(&task.violation_timestamp),
            short_msg(&or_none(&task.worker_report), 30),
            or_none(&task.worker_media),
        ]);
        builder.push_record(record);
    }
    builder.build().with(Style::ascii()).to_string()
}

pub fn task_detail(task: &Task) -> String {
    let mut table = Builder::default();
    table
        .set_header(["Name", "Value"])
        .push_record(["Id".to_string(), task.id.to_string()])
        .push_record(["WorkerId".to_string(), task.worker_id.clone()])
        .push_record(["AssignedTo".to_string(), task.worker_username.clone()])
        .push_record(["Task".to_string(), task.task_description.clone()])
        .push_record(["Status".to_string(), task.status.clone()])
        .push_record(["ViolationComment".to_string(), or_none(&task.violation_comment)])
        .push_record(["ViolationAt".to_string(), or_none(&task.violation_timestamp)])
        .push_record(["Report".to_string(), or_none(&task.worker_report)])
        .push_record(["Media".to_string(), or_none(&task.worker_media)]);
    table.build().with(Style::ascii()).to_string()
}

pub fn rule_table(rules: &[Rule]) -> String {
    let mut builder = Builder::default();
    builder.set_header(["Id", "Rule", "CreateAt"]);
    for rule in rules {
        builder.push_record([
            rule.id.to_string(),
            rule.rule_text.clone(),
            rule.timestamp.clone().unwrap_or_default(),
        ]);
    }
    builder.build().with(Style::ascii()).to_string()
}

pub fn feedback_table(rules: &[Rule]) -> String {
    let mut builder = Builder::default();
    builder.set_header(["Id", "Rule", "Feedback"]);
    for rule in rules {
        builder.push_record([
            rule.id.to_string(),
            rule.rule_text.clone(),
            rule.feedback
                .clone()
                .unwrap_or_else(|| "No feedback yet.".to_string()),
        ]);
    }
    builder.build().with(Style::ascii()).to_string()
}

pub fn account_table(accounts: &[Account]) -> String {
    let mut builder = Builder::default();
    builder.set_header(["Id", "Username", "Role"]);
    for account in accounts {
        builder.push_record([
            account.id.to_string(),
            account.username.clone(),
            account.role.to_string(),
        ]);
    }
    builder.build().with(Style::ascii()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use entity::Role;

    fn task() -> Task {
        Task {
            id: 1,
            worker_id: "2".into(),
            worker_username: "alice".into(),
            task_description: "inspect valve".into(),
            status: "pending".into(),
            violation_comment: None,
            violation_timestamp: None,
            worker_report: None,
            worker_media: None,
        }
    }

    #[test]
    fn worker_view_hides_assignee() {
        let manager = task_table(&[task()], true);
        let worker = task_table(&[task()], false);
        assert!(manager.contains("AssignedTo"));
        assert!(manager.contains("alice"));
        assert!(!worker.contains("AssignedTo"));
        assert!(worker.contains("inspect valve"));
        assert!(worker.contains("None"));
    }

    #[test]
    fn missing_feedback_is_spelled_out() {
        let rule = Rule {
            id: 4,
            rule_text: "wear helmets".into(),
            feedback: None,
            timestamp: Some("2025-06-01 10:00:00".into()),
        };
        assert!(feedback_table(&[rule.clone()]).contains("No feedback yet."));
        assert!(rule_table(&[rule]).contains("2025-06-01 10:00:00"));
    }

    #[test]
    fn accounts_show_role() {
        let table = account_table(&[Account {
            id: 1,
            username: "bob".into(),
            role: Role::Manager,
        }]);
        assert!(table.contains("manager"));
        assert!(task_detail(&task()).contains("inspect valve"));
    }
}
