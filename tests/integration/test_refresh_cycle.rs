//! Integration Tests for the refresh cycle
//!
//! Drive a [`Repository`] through complete refresh cycles against scripted
//! git output.

#[path = "../test_utils/mod.rs"]
mod test_utils;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use gitview::{Category, FileRecord, FileStatus, Repository, RepositoryEvent};
use test_utils::{repo_dir, Fixture, ScriptedRunner};

#[tokio::test]
async fn test_cycle_fills_all_categories() {
    let dir = repo_dir();
    let runner = ScriptedRunner::with_status("M\tfoo.txt\n", "A\tbar.txt\n", "baz.txt\n");
    let mut repository = Repository::open(dir.path(), runner.clone()).unwrap();

    assert!(repository.refresh());
    assert_eq!(repository.next_event().await, Some(RepositoryEvent::Refreshed));

    assert_eq!(repository.unstaged(), [FileRecord::new("foo.txt", FileStatus::Modified)]);
    assert_eq!(repository.staged(), [FileRecord::new("bar.txt", FileStatus::Added)]);
    assert_eq!(repository.untracked(), [FileRecord::new("baz.txt", FileStatus::Untracked)]);
    assert!(repository.unmerged().is_empty());

    assert_eq!(
        runner.calls(),
        vec![
            "diff --name-status",
            "diff --cached --name-status",
            "ls-files --others --exclude-standard",
        ]
    );
    assert_eq!(runner.max_concurrency(), 1);
}

#[tokio::test]
async fn test_clean_tree_yields_empty_lists() {
    let dir = repo_dir();
    let mut repository =
        Repository::open(dir.path(), ScriptedRunner::with_status("", "", "")).unwrap();

    repository.refresh();
    assert_eq!(repository.next_event().await, Some(RepositoryEvent::Refreshed));
    assert!(repository.snapshot().is_empty());
    assert!(repository.snapshot().refreshed_at().is_some());
}

#[tokio::test]
async fn test_unmerged_takes_precedence_across_steps() {
    let dir = repo_dir();
    let runner = ScriptedRunner::with_status(
        "U\tboth.rs\nM\tonly_unstaged.rs\n",
        "U\tboth.rs\nM\tboth.rs\nA\tonly_staged.rs\n",
        "",
    );
    let mut repository = Repository::open(dir.path(), runner).unwrap();

    repository.refresh();
    repository.next_event().await;

    assert_eq!(repository.unmerged(), [FileRecord::new("both.rs", FileStatus::Unmerged)]);
    assert_eq!(repository.unstaged().len(), 1);
    assert_eq!(repository.unstaged()[0].path(), "only_unstaged.rs");
    assert_eq!(repository.staged().len(), 1);
    assert_eq!(repository.staged()[0].path(), "only_staged.rs");
}

#[tokio::test]
async fn test_second_refresh_replaces_lists() {
    let dir = repo_dir();
    let runner = ScriptedRunner::with_status("M\tfoo.txt\n", "", "");
    let mut repository = Repository::open(dir.path(), runner.clone()).unwrap();

    repository.refresh();
    repository.next_event().await;
    assert_eq!(repository.files(Category::Unstaged).len(), 1);

    runner.script("diff --name-status", Fixture::ok(""));
    runner.script("ls-files --others --exclude-standard", Fixture::ok("new.txt\n"));
    repository.refresh();
    repository.next_event().await;

    assert!(repository.files(Category::Unstaged).is_empty());
    assert_eq!(repository.files(Category::Untracked).len(), 1);
}

#[tokio::test]
async fn test_refresh_while_running_is_ignored() {
    let dir = repo_dir();
    let runner = ScriptedRunner::with_status("", "", "");
    runner.script(
        "diff --name-status",
        Fixture::ok("M\ta.txt\n").after(Duration::from_millis(30)),
    );
    let mut repository = Repository::open(dir.path(), runner.clone()).unwrap();

    assert!(repository.refresh());
    assert!(repository.is_refreshing());
    assert!(!repository.refresh());

    assert_eq!(repository.next_event().await, Some(RepositoryEvent::Refreshed));
    assert_eq!(runner.calls().len(), 3);
}

#[tokio::test]
async fn test_poll_events_delivers_to_observers() {
    let dir = repo_dir();
    let mut repository =
        Repository::open(dir.path(), ScriptedRunner::with_status("", "", "x\n")).unwrap();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);
    repository.subscribe(move |event| log.lock().unwrap().push(event.clone()));

    repository.refresh();
    let mut events = Vec::new();
    for _ in 0..200 {
        events.extend(repository.poll_events());
        if !repository.is_refreshing() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    assert_eq!(events, vec![RepositoryEvent::Refreshed]);
    assert_eq!(*seen.lock().unwrap(), vec![RepositoryEvent::Refreshed]);
    assert_eq!(repository.untracked().len(), 1);
}

#[tokio::test]
async fn test_event_subscription_on_other_task() {
    let dir = repo_dir();
    let mut repository =
        Repository::open(dir.path(), ScriptedRunner::with_status("", "", "")).unwrap();
    let mut subscription = repository.event_subscription();

    let listener = tokio::spawn(async move { subscription.recv().await });
    repository.refresh();
    repository.next_event().await;

    assert_eq!(listener.await.unwrap(), Some(RepositoryEvent::Refreshed));
}

#[tokio::test]
async fn test_file_diff_uses_cached_flag() {
    let dir = repo_dir();
    let runner = ScriptedRunner::new();
    runner.script("diff -- foo.txt", Fixture::ok("worktree\n"));
    runner.script("diff --cached -- foo.txt", Fixture::ok("index\n"));
    let repository = Repository::open(dir.path(), runner).unwrap();

    assert_eq!(repository.file_diff("foo.txt", false).await.unwrap(), "worktree\n");
    assert_eq!(repository.file_diff("foo.txt", true).await.unwrap(), "index\n");
}

#[tokio::test]
async fn test_file_diff_of_untracked_path_shows_whole_file() {
    let dir = repo_dir();
    let runner = ScriptedRunner::with_status("", "", "new.txt\n");
    runner.script(
        "diff --no-index -- /dev/null new.txt",
        Fixture {
            exit_code: 1,
            ..Fixture::ok("+hello\n")
        },
    );
    let mut repository = Repository::open(dir.path(), runner.clone()).unwrap();
    repository.refresh();
    assert_eq!(repository.next_event().await, Some(RepositoryEvent::Refreshed));

    assert_eq!(repository.file_diff("new.txt", false).await.unwrap(), "+hello\n");
    assert_eq!(
        runner.calls().last().map(String::as_str),
        Some("diff --no-index -- /dev/null new.txt")
    );
}

#[tokio::test]
async fn test_dropped_repository_discards_late_completions() {
    let dir = repo_dir();
    let runner = ScriptedRunner::with_status("", "", "");
    runner.script(
        "diff --name-status",
        Fixture::ok("").after(Duration::from_millis(20)),
    );
    let mut repository = Repository::open(dir.path(), runner.clone()).unwrap();
    repository.refresh();
    drop(repository);

    tokio::time::sleep(Duration::from_millis(60)).await;
    // Nothing drove the cycle further once the handle was gone
    assert_eq!(runner.calls(), vec!["diff --name-status"]);
}
