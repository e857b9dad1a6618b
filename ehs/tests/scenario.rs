use ehs::error::{ehs_error, EhsError};
use ehs::ledger::db_ops::{DbOpsImpl, UserRepo};
use ehs::ledger::open_memory_store;
use ehs::ledger::worker::ReportWorker;
use ehs::media::{FileMedia, MediaStore};
use ehs::session::Session;
use entity::{Role, STATUS_COMPLETED, STATUS_PENDING};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn manager_assigns_worker_completes() {
    let dir = tempfile::tempdir().unwrap();
    let repo = Arc::new(DbOpsImpl::new(open_memory_store().await.unwrap()));
    let media = Arc::new(FileMedia::new(dir.path().join("uploads")));
    let reporter = ReportWorker::new(repo.clone(), media.clone(), Duration::ZERO);

    let alice_id = repo
        .register("alice".into(), "pw1".into(), Role::Worker)
        .await
        .unwrap();
    repo.register("bob".into(), "pw2".into(), Role::Manager)
        .await
        .unwrap();

    let Session::Manager(bob) =
        Session::login(repo.clone(), reporter.clone(), "bob".into(), "pw2".into())
            .await
            .unwrap()
    else {
        panic!("bob registered as manager");
    };
    let Session::Worker(mut alice) =
        Session::login(repo.clone(), reporter.clone(), "alice".into(), "pw1".into())
            .await
            .unwrap()
    else {
        panic!("alice registered as worker");
    };
    assert_eq!(alice.account().id, alice_id);

    let err = bob.assign(alice_id + 100, "fix leak".into()).await.unwrap_err();
    assert!(matches!(ehs_error(&err), Some(EhsError::WorkerNotFound(_))));

    let task_id = bob.assign(alice_id, "inspect valve".into()).await.unwrap();
    let tasks = alice.list_tasks().await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].status, STATUS_PENDING);
    assert_eq!(tasks[0].worker_username, "alice");

    let photo = dir.path().join("valve.jpg");
    tokio::fs::write(&photo, b"jpeg bytes").await.unwrap();
    let handle = alice
        .report_work(task_id, "fixed".into(), photo)
        .await
        .unwrap();
    alice.track(handle);
    let outcomes = alice.wait_reports().await;
    let stored = outcomes.into_iter().next().unwrap().1.unwrap();

    let mine = alice.list_tasks().await.unwrap();
    assert_eq!(mine[0].status, STATUS_COMPLETED);
    assert_eq!(mine[0].worker_report.as_deref(), Some("fixed"));
    assert!(media.has_media(task_id, alice_id).await.unwrap());
    assert_eq!(std::path::PathBuf::from(&stored), media.destination(task_id, alice_id));

    let all = bob.list_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].status, STATUS_COMPLETED);
    assert_eq!(all[0].worker_report.as_deref(), Some("fixed"));
    assert_eq!(all[0].worker_media.as_deref(), Some(stored.as_str()));
}

#[tokio::test]
async fn rule_lifecycle_across_roles() {
    let dir = tempfile::tempdir().unwrap();
    let repo = Arc::new(DbOpsImpl::new(open_memory_store().await.unwrap()));
    let media = Arc::new(FileMedia::new(dir.path()));
    let reporter = ReportWorker::new(repo.clone(), media, Duration::ZERO);
    repo.register("alice".into(), "pw1".into(), Role::Worker)
        .await
        .unwrap();
    repo.register("bob".into(), "pw2".into(), Role::Manager)
        .await
        .unwrap();

    let Session::Manager(bob) =
        Session::login(repo.clone(), reporter.clone(), "bob".into(), "pw2".into())
            .await
            .unwrap()
    else {
        panic!("bob registered as manager");
    };
    let Session::Worker(alice) =
        Session::login(repo.clone(), reporter, "alice".into(), "pw1".into())
            .await
            .unwrap()
    else {
        panic!("alice registered as worker");
    };

    let rule = bob.add_rule("lock out before servicing".into()).await.unwrap();
    alice.give_feedback(rule, "needs more tags".into()).await.unwrap();
    let before = bob.view_rules().await.unwrap();
    assert_eq!(before[0].feedback.as_deref(), Some("needs more tags"));

    let err = bob.delete_rule(rule + 1).await.unwrap_err();
    assert!(matches!(ehs_error(&err), Some(EhsError::RuleNotFound(_))));
    assert_eq!(bob.view_rules().await.unwrap(), before);

    bob.delete_rule(rule).await.unwrap();
    assert!(alice.view_feedback().await.unwrap().is_empty());
}
