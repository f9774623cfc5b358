use std::collections::HashSet;

use tracing::{info, warn};

use crate::clients::{IssueSource, Notifier, TaskBoard};
use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::model::{Issue, Task, TaskDraft, TaskUpdate};
use crate::store::LinkStore;
use crate::util::images::extract_image_urls;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub closed: usize,
    pub failed: usize,
}

enum Outcome {
    Created,
    Updated,
    Skipped,
}

/// One full sync pass: fetch both sides, create or reconcile a task per
/// issue, then optionally close tasks whose issue disappeared upstream.
///
/// A failure in the top-level fetches aborts the run; a failure inside one
/// issue's side effects is logged and counted without touching the rest.
pub async fn run(
    config: &SyncConfig,
    source: &dyn IssueSource,
    board: &dyn TaskBoard,
    notifier: &dyn Notifier,
    links: &mut LinkStore,
) -> SyncResult<SyncSummary> {
    info!("fetching GitHub issues and ClickUp tasks");
    let (issues, tasks, statuses) = tokio::try_join!(
        source.list_open_issues(),
        board.list_tasks(),
        board.list_statuses(),
    )?;
    info!(
        issues = issues.len(),
        tasks = tasks.len(),
        "fetched both sides"
    );

    let field_id = match &config.clickup.request_type_field_id {
        Some(id) => id.clone(),
        None => board.request_type_field_id().await?.ok_or_else(|| {
            SyncError::Configuration(
                "no \"Request Type\" custom field found on the ClickUp space".into(),
            )
        })?,
    };
    let initial_status = initial_status(&statuses)?;

    // A link whose task was deleted on the ClickUp side is dead; the issue
    // should fall through to title matching or a fresh create.
    links.retain_tasks(|id| tasks.iter().any(|task| task.id == id))?;

    let mut summary = SyncSummary::default();
    for issue in &issues {
        match sync_issue(
            config,
            source,
            board,
            notifier,
            links,
            &tasks,
            &field_id,
            initial_status,
            issue,
        )
        .await
        {
            Ok(Outcome::Created) => summary.created += 1,
            Ok(Outcome::Updated) => summary.updated += 1,
            Ok(Outcome::Skipped) => summary.skipped += 1,
            Err(err) => {
                warn!(issue = issue.number, error = %err, "issue sync failed");
                summary.failed += 1;
            }
        }
    }

    if config.close_missing {
        close_missing(board, &issues, &tasks, links, &mut summary).await;
    }

    Ok(summary)
}

#[allow(clippy::too_many_arguments)]
async fn sync_issue(
    config: &SyncConfig,
    source: &dyn IssueSource,
    board: &dyn TaskBoard,
    notifier: &dyn Notifier,
    links: &mut LinkStore,
    tasks: &[Task],
    field_id: &str,
    initial_status: &str,
    issue: &Issue,
) -> SyncResult<Outcome> {
    if let Some(task) = find_existing(issue, tasks, links) {
        if links.task_id_for(issue.number) != Some(task.id.as_str()) {
            links.record(issue.number, &task.id, &issue.title)?;
        }

        let update = reconcile(issue, task);
        let outcome = if update.is_empty() {
            Outcome::Skipped
        } else {
            board.update_task(&task.id, &update).await?;
            info!(issue = issue.number, task = %task.id, "reconciled task");
            Outcome::Updated
        };

        if config.mirror_comments {
            if let Err(err) = mirror_comments(source, board, issue, &task.id).await {
                warn!(issue = issue.number, error = %err, "comment mirroring failed");
            }
        }
        return Ok(outcome);
    }

    // Re-fetch so the body (and the images in it) reflect the issue as it is
    // now, not as it was when the listing page was built.
    let detail = source.issue(issue.number).await?;
    let request_type_id = config.maps.resolve_request_type(&detail.labels).to_string();
    let priority = config.maps.resolve_priority(&detail.labels, &request_type_id);
    let image_urls = detail
        .body
        .as_deref()
        .map(extract_image_urls)
        .unwrap_or_default();

    let draft = TaskDraft {
        name: detail.title.clone(),
        description: build_description(detail.body.as_deref(), &detail.html_url),
        status: initial_status.to_string(),
        priority,
        request_type_field_id: field_id.to_string(),
        request_type_id,
    };
    let task = board.create_task(&draft).await?;
    links.record(issue.number, &task.id, &detail.title)?;
    info!(issue = issue.number, task = %task.id, priority = priority.value(), "created task");

    if priority.alerting() {
        for url in &image_urls {
            if let Err(err) = board.attach_image(&task.id, url).await {
                warn!(issue = issue.number, url = %url, error = %err, "image attach failed");
            }
        }
        let task_url = task.url.as_deref().unwrap_or_default();
        if let Err(err) = notifier
            .task_created(&detail.html_url, &task.name, task_url)
            .await
        {
            warn!(issue = issue.number, error = %err, "notification failed");
        }
    }

    if config.mirror_comments {
        if let Err(err) = mirror_comments(source, board, issue, &task.id).await {
            warn!(issue = issue.number, error = %err, "comment mirroring failed");
        }
    }

    Ok(Outcome::Created)
}

/// Recorded link first, then normalized-title equality.
fn find_existing<'a>(issue: &Issue, tasks: &'a [Task], links: &LinkStore) -> Option<&'a Task> {
    if let Some(task_id) = links.task_id_for(issue.number) {
        if let Some(task) = tasks.iter().find(|task| task.id == task_id) {
            return Some(task);
        }
    }
    let title = issue.normalized_title();
    tasks.iter().find(|task| task.normalized_name() == title)
}

/// New tasks land in "TO DO" when the list has it, else the first status.
fn initial_status(statuses: &[String]) -> SyncResult<&str> {
    if let Some(status) = statuses
        .iter()
        .find(|status| status.trim().eq_ignore_ascii_case("to do"))
    {
        return Ok(status);
    }
    statuses
        .first()
        .map(String::as_str)
        .ok_or_else(|| SyncError::Configuration("the ClickUp list defines no statuses".into()))
}

fn build_description(body: Option<&str>, issue_url: &str) -> String {
    let body = body
        .filter(|body| !body.trim().is_empty())
        .unwrap_or("No description provided");
    format!("{body}\n\nOriginal GitHub Issue: {issue_url}")
}

/// Last writer wins on description and close status; everything else on the
/// task is left alone.
fn reconcile(issue: &Issue, task: &Task) -> TaskUpdate {
    let mut update = TaskUpdate::default();

    if issue
        .body
        .as_deref()
        .is_some_and(|body| !body.trim().is_empty())
    {
        let expected = build_description(issue.body.as_deref(), &issue.html_url);
        if task.description.as_deref() != Some(expected.as_str()) {
            update.description = Some(expected);
        }
    }

    let already_complete = task
        .status
        .as_deref()
        .is_some_and(|status| status.eq_ignore_ascii_case("complete"));
    if issue.is_closed() && !already_complete {
        update.status = Some("complete".to_string());
    }

    update
}

async fn mirror_comments(
    source: &dyn IssueSource,
    board: &dyn TaskBoard,
    issue: &Issue,
    task_id: &str,
) -> SyncResult<()> {
    let issue_comments = source.list_comments(issue.number).await?;
    if issue_comments.is_empty() {
        return Ok(());
    }
    let existing = board.list_task_comments(task_id).await?;
    for comment in issue_comments {
        let text = format!("{}: {}", comment.author, comment.body);
        if existing.iter().any(|c| c.text == text) {
            continue;
        }
        board.add_comment(task_id, &text).await?;
    }
    Ok(())
}

/// Tasks with no live issue behind them are treated as deleted upstream and
/// moved to "complete". Tasks still linked to a fetched issue are safe even
/// if the issue was renamed.
async fn close_missing(
    board: &dyn TaskBoard,
    issues: &[Issue],
    tasks: &[Task],
    links: &LinkStore,
    summary: &mut SyncSummary,
) {
    let live_titles: HashSet<String> = issues.iter().map(Issue::normalized_title).collect();
    let linked_task_ids: HashSet<&str> = issues
        .iter()
        .filter_map(|issue| links.task_id_for(issue.number))
        .collect();

    for task in tasks {
        if live_titles.contains(&task.normalized_name())
            || linked_task_ids.contains(task.id.as_str())
        {
            continue;
        }
        if task
            .status
            .as_deref()
            .is_some_and(|status| status.eq_ignore_ascii_case("complete"))
        {
            continue;
        }
        let update = TaskUpdate {
            description: None,
            status: Some("complete".to_string()),
        };
        match board.update_task(&task.id, &update).await {
            Ok(()) => {
                info!(task = %task.id, name = %task.name, "closed task with no upstream issue");
                summary.closed += 1;
            }
            Err(err) => {
                warn!(task = %task.id, error = %err, "failed to close task");
                summary.failed += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;
    use crate::config::{ClickUpConfig, GitHubConfig};
    use crate::error::SyncError;
    use crate::mapping::LabelMaps;
    use crate::model::{IssueComment, IssueState, Priority, TaskComment};

    const ENHANCEMENT_ID: &str = "15c61688-3ad5-4dc5-bb7f-17b6c6ff30d9";

    fn issue(number: u64, title: &str, body: &str, labels: &[&str]) -> Issue {
        Issue {
            number,
            title: title.to_string(),
            body: if body.is_empty() {
                None
            } else {
                Some(body.to_string())
            },
            html_url: format!("https://github.com/octo/widgets/issues/{number}"),
            state: IssueState::Open,
            labels: labels.iter().map(|l| l.to_string()).collect(),
        }
    }

    fn task(id: &str, name: &str, status: &str) -> Task {
        Task {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            status: Some(status.to_string()),
            priority: None,
            url: Some(format!("https://app.clickup.test/t/{id}")),
        }
    }

    fn test_config() -> SyncConfig {
        SyncConfig {
            github: GitHubConfig {
                token: "ghp_test".into(),
                owner: "octo".into(),
                repo: "widgets".into(),
            },
            clickup: ClickUpConfig {
                api_key: "pk_test".into(),
                list_id: "901".into(),
                space_id: None,
                request_type_field_id: Some("field-1".into()),
            },
            slack_webhook_url: None,
            maps: LabelMaps::new(None, None).unwrap(),
            close_missing: false,
            mirror_comments: false,
        }
    }

    fn test_links(dir: &tempfile::TempDir) -> LinkStore {
        LinkStore::open(dir.path().join("links.json")).unwrap()
    }

    struct MockSource {
        issues: Vec<Issue>,
        comments: Vec<IssueComment>,
    }

    impl MockSource {
        fn new(issues: Vec<Issue>) -> Self {
            Self {
                issues,
                comments: Vec::new(),
            }
        }
    }

    #[async_trait]
    impl IssueSource for MockSource {
        async fn list_open_issues(&self) -> SyncResult<Vec<Issue>> {
            Ok(self.issues.clone())
        }

        async fn issue(&self, number: u64) -> SyncResult<Issue> {
            self.issues
                .iter()
                .find(|issue| issue.number == number)
                .cloned()
                .ok_or(SyncError::Data {
                    service: "GitHub",
                    detail: format!("no issue #{number}"),
                })
        }

        async fn list_comments(&self, _number: u64) -> SyncResult<Vec<IssueComment>> {
            Ok(self.comments.clone())
        }
    }

    #[derive(Default)]
    struct MockBoard {
        statuses: Vec<String>,
        tasks: Vec<Task>,
        existing_comments: Vec<TaskComment>,
        fail_create_for: Option<String>,
        created: Arc<Mutex<Vec<TaskDraft>>>,
        updated: Arc<Mutex<Vec<(String, TaskUpdate)>>>,
        attached: Arc<Mutex<Vec<(String, String)>>>,
        comments: Arc<Mutex<Vec<(String, String)>>>,
    }

    impl MockBoard {
        fn new(statuses: &[&str], tasks: Vec<Task>) -> Self {
            Self {
                statuses: statuses.iter().map(|s| s.to_string()).collect(),
                tasks,
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl TaskBoard for MockBoard {
        async fn list_statuses(&self) -> SyncResult<Vec<String>> {
            Ok(self.statuses.clone())
        }

        async fn list_tasks(&self) -> SyncResult<Vec<Task>> {
            Ok(self.tasks.clone())
        }

        async fn create_task(&self, draft: &TaskDraft) -> SyncResult<Task> {
            if self.fail_create_for.as_deref() == Some(draft.name.as_str()) {
                return Err(SyncError::Upstream {
                    service: "ClickUp",
                    status: 400,
                    body: "mock create failure".into(),
                });
            }
            let mut created = self.created.lock().unwrap();
            created.push(draft.clone());
            let id = format!("task-{}", created.len());
            Ok(Task {
                id: id.clone(),
                name: draft.name.clone(),
                description: Some(draft.description.clone()),
                status: Some(draft.status.clone()),
                priority: Some(draft.priority),
                url: Some(format!("https://app.clickup.test/t/{id}")),
            })
        }

        async fn update_task(&self, task_id: &str, update: &TaskUpdate) -> SyncResult<()> {
            self.updated
                .lock()
                .unwrap()
                .push((task_id.to_string(), update.clone()));
            Ok(())
        }

        async fn add_comment(&self, task_id: &str, text: &str) -> SyncResult<()> {
            self.comments
                .lock()
                .unwrap()
                .push((task_id.to_string(), text.to_string()));
            Ok(())
        }

        async fn list_task_comments(&self, _task_id: &str) -> SyncResult<Vec<TaskComment>> {
            Ok(self.existing_comments.clone())
        }

        async fn attach_image(&self, task_id: &str, image_url: &str) -> SyncResult<()> {
            self.attached
                .lock()
                .unwrap()
                .push((task_id.to_string(), image_url.to_string()));
            Ok(())
        }

        async fn request_type_field_id(&self) -> SyncResult<Option<String>> {
            Ok(Some("discovered-field".to_string()))
        }
    }

    #[derive(Default)]
    struct MockNotifier {
        sent: Arc<Mutex<Vec<(String, String, String)>>>,
    }

    #[async_trait]
    impl Notifier for MockNotifier {
        async fn task_created(
            &self,
            issue_url: &str,
            task_name: &str,
            task_url: &str,
        ) -> SyncResult<()> {
            self.sent.lock().unwrap().push((
                issue_url.to_string(),
                task_name.to_string(),
                task_url.to_string(),
            ));
            Ok(())
        }
    }

    #[tokio::test]
    async fn creates_a_task_per_unmatched_issue() {
        let dir = tempfile::tempdir().unwrap();
        let source = MockSource::new(vec![issue(
            42,
            "Add dark mode",
            "Please add a dark theme.",
            &["enhancement"],
        )]);
        let board = MockBoard::new(&["To Do", "In Progress"], vec![]);
        let notifier = MockNotifier::default();
        let mut links = test_links(&dir);

        let summary = run(&test_config(), &source, &board, &notifier, &mut links)
            .await
            .unwrap();

        assert_eq!(summary.created, 1);
        let created = board.created.lock().unwrap();
        assert_eq!(created.len(), 1);
        let draft = &created[0];
        assert_eq!(draft.name, "Add dark mode");
        assert_eq!(
            draft.description,
            "Please add a dark theme.\n\nOriginal GitHub Issue: \
             https://github.com/octo/widgets/issues/42"
        );
        assert_eq!(draft.priority, Priority::Normal);
        assert_eq!(draft.request_type_id, ENHANCEMENT_ID);
        assert_eq!(draft.status, "To Do");
        // normal priority: no images, no slack
        assert!(board.attached.lock().unwrap().is_empty());
        assert!(notifier.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn matched_issue_is_not_recreated() {
        let dir = tempfile::tempdir().unwrap();
        let source = MockSource::new(vec![issue(1, "Fix crash", "", &[])]);
        // matching is case- and whitespace-insensitive
        let board = MockBoard::new(&["To Do"], vec![task("t1", "  fix CRASH ", "to do")]);
        let notifier = MockNotifier::default();
        let mut links = test_links(&dir);

        let summary = run(&test_config(), &source, &board, &notifier, &mut links)
            .await
            .unwrap();

        assert_eq!(summary.created, 0);
        assert_eq!(summary.skipped, 1);
        assert!(board.created.lock().unwrap().is_empty());
        // title match seeds the link store
        assert_eq!(links.task_id_for(1), Some("t1"));
    }

    #[tokio::test]
    async fn rerun_after_create_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config();
        let source = MockSource::new(vec![issue(7, "Fix crash", "boom", &["bug"])]);
        let notifier = MockNotifier::default();
        let mut links = test_links(&dir);

        let board = MockBoard::new(&["To Do"], vec![]);
        let first = run(&config, &source, &board, &notifier, &mut links)
            .await
            .unwrap();
        assert_eq!(first.created, 1);
        let created_task = {
            let created = board.created.lock().unwrap();
            Task {
                id: "task-1".into(),
                name: created[0].name.clone(),
                description: Some(created[0].description.clone()),
                status: Some(created[0].status.clone()),
                priority: Some(created[0].priority),
                url: None,
            }
        };

        // second run sees the same GitHub state and the task now in the list
        let board = MockBoard::new(&["To Do"], vec![created_task]);
        let second = run(&config, &source, &board, &notifier, &mut links)
            .await
            .unwrap();
        assert_eq!(second.created, 0);
        assert!(board.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn recorded_link_survives_issue_rename() {
        let dir = tempfile::tempdir().unwrap();
        let source = MockSource::new(vec![issue(9, "New title after rename", "body", &[])]);
        let board = MockBoard::new(&["To Do"], vec![task("t9", "Old title", "to do")]);
        let notifier = MockNotifier::default();
        let mut links = test_links(&dir);
        links.record(9, "t9", "Old title").unwrap();

        let summary = run(&test_config(), &source, &board, &notifier, &mut links)
            .await
            .unwrap();

        // no duplicate task; the existing one is reconciled instead
        assert_eq!(summary.created, 0);
        assert!(board.created.lock().unwrap().is_empty());
        let updated = board.updated.lock().unwrap();
        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0].0, "t9");
    }

    #[tokio::test]
    async fn urgent_ticket_gets_images_and_notification() {
        let dir = tempfile::tempdir().unwrap();
        let source = MockSource::new(vec![issue(
            7,
            "Crash on save",
            "see https://img.test/screenshot.png",
            &["bug", "p0"],
        )]);
        let board = MockBoard::new(&["To Do"], vec![]);
        let notifier = MockNotifier::default();
        let mut links = test_links(&dir);

        run(&test_config(), &source, &board, &notifier, &mut links)
            .await
            .unwrap();

        let created = board.created.lock().unwrap();
        assert_eq!(created[0].priority, Priority::Urgent);
        let attached = board.attached.lock().unwrap();
        assert_eq!(
            attached.as_slice(),
            &[("task-1".to_string(), "https://img.test/screenshot.png".to_string())]
        );
        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].1, "Crash on save");
    }

    #[tokio::test]
    async fn one_failing_issue_does_not_abort_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let source = MockSource::new(vec![
            issue(1, "First", "a", &[]),
            issue(2, "Second", "b", &[]),
        ]);
        let mut board = MockBoard::new(&["To Do"], vec![]);
        board.fail_create_for = Some("First".to_string());
        let notifier = MockNotifier::default();
        let mut links = test_links(&dir);

        let summary = run(&test_config(), &source, &board, &notifier, &mut links)
            .await
            .unwrap();

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.created, 1);
        assert_eq!(board.created.lock().unwrap()[0].name, "Second");
    }

    #[tokio::test]
    async fn reconciles_description_drift_and_closed_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut closed_issue = issue(3, "Stale task", "fresh body", &[]);
        closed_issue.state = IssueState::Closed;
        let source = MockSource::new(vec![closed_issue]);
        let mut stale = task("t3", "Stale task", "in progress");
        stale.description = Some("old body\n\nOriginal GitHub Issue: x".to_string());
        let board = MockBoard::new(&["To Do"], vec![stale]);
        let notifier = MockNotifier::default();
        let mut links = test_links(&dir);

        let summary = run(&test_config(), &source, &board, &notifier, &mut links)
            .await
            .unwrap();

        assert_eq!(summary.updated, 1);
        let updated = board.updated.lock().unwrap();
        let (task_id, update) = &updated[0];
        assert_eq!(task_id, "t3");
        assert_eq!(
            update.description.as_deref(),
            Some(
                "fresh body\n\nOriginal GitHub Issue: \
                 https://github.com/octo/widgets/issues/3"
            )
        );
        assert_eq!(update.status.as_deref(), Some("complete"));
    }

    #[tokio::test]
    async fn up_to_date_task_is_skipped_without_calls() {
        let dir = tempfile::tempdir().unwrap();
        let current = issue(4, "Settled", "body", &[]);
        let mut existing = task("t4", "Settled", "to do");
        existing.description = Some(build_description(Some("body"), &current.html_url));
        let source = MockSource::new(vec![current]);
        let board = MockBoard::new(&["To Do"], vec![existing]);
        let notifier = MockNotifier::default();
        let mut links = test_links(&dir);

        let summary = run(&test_config(), &source, &board, &notifier, &mut links)
            .await
            .unwrap();

        assert_eq!(summary.skipped, 1);
        assert!(board.updated.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn close_missing_completes_stale_tasks_only() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config();
        config.close_missing = true;
        let live = issue(5, "Alive", "body", &[]);
        let source = MockSource::new(vec![live]);
        let mut alive_task = task("t5", "Alive", "to do");
        alive_task.description = Some(build_description(
            Some("body"),
            "https://github.com/octo/widgets/issues/5",
        ));
        let board = MockBoard::new(
            &["To Do"],
            vec![
                alive_task,
                task("t6", "Deleted upstream", "to do"),
                task("t7", "Already done", "Complete"),
            ],
        );
        let notifier = MockNotifier::default();
        let mut links = test_links(&dir);

        let summary = run(&config, &source, &board, &notifier, &mut links)
            .await
            .unwrap();

        assert_eq!(summary.closed, 1);
        let updated = board.updated.lock().unwrap();
        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0].0, "t6");
        assert_eq!(updated[0].1.status.as_deref(), Some("complete"));
    }

    #[tokio::test]
    async fn close_missing_spares_renamed_but_linked_tasks() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config();
        config.close_missing = true;
        let renamed = issue(8, "Renamed issue", "body", &[]);
        let source = MockSource::new(vec![renamed]);
        let board = MockBoard::new(&["To Do"], vec![task("t8", "Original name", "to do")]);
        let notifier = MockNotifier::default();
        let mut links = test_links(&dir);
        links.record(8, "t8", "Original name").unwrap();

        let summary = run(&config, &source, &board, &notifier, &mut links)
            .await
            .unwrap();

        assert_eq!(summary.closed, 0);
        let updated = board.updated.lock().unwrap();
        // only the description reconcile, never a forced "complete"
        assert!(updated.iter().all(|(_, u)| u.status.is_none()));
    }

    #[tokio::test]
    async fn mirrors_only_missing_comments() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config();
        config.mirror_comments = true;
        let mut source = MockSource::new(vec![issue(11, "Chatty", "body", &[])]);
        source.comments = vec![
            IssueComment {
                author: "alice".into(),
                body: "first".into(),
            },
            IssueComment {
                author: "bob".into(),
                body: "second".into(),
            },
        ];
        let mut existing = task("t11", "Chatty", "to do");
        existing.description = Some(build_description(
            Some("body"),
            "https://github.com/octo/widgets/issues/11",
        ));
        let mut board = MockBoard::new(&["To Do"], vec![existing]);
        board.existing_comments = vec![TaskComment {
            author: "sync".into(),
            text: "alice: first".into(),
        }];
        let notifier = MockNotifier::default();
        let mut links = test_links(&dir);

        run(&config, &source, &board, &notifier, &mut links)
            .await
            .unwrap();

        let comments = board.comments.lock().unwrap();
        assert_eq!(
            comments.as_slice(),
            &[("t11".to_string(), "bob: second".to_string())]
        );
    }

    #[tokio::test]
    async fn discovers_field_id_when_not_configured() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config();
        config.clickup.request_type_field_id = None;
        let source = MockSource::new(vec![issue(12, "Needs field", "body", &[])]);
        let board = MockBoard::new(&["To Do"], vec![]);
        let notifier = MockNotifier::default();
        let mut links = test_links(&dir);

        run(&config, &source, &board, &notifier, &mut links)
            .await
            .unwrap();

        assert_eq!(
            board.created.lock().unwrap()[0].request_type_field_id,
            "discovered-field"
        );
    }

    #[tokio::test]
    async fn empty_body_becomes_placeholder_description() {
        let dir = tempfile::tempdir().unwrap();
        let source = MockSource::new(vec![issue(13, "No body", "", &[])]);
        let board = MockBoard::new(&["To Do"], vec![]);
        let notifier = MockNotifier::default();
        let mut links = test_links(&dir);

        run(&test_config(), &source, &board, &notifier, &mut links)
            .await
            .unwrap();

        assert_eq!(
            board.created.lock().unwrap()[0].description,
            "No description provided\n\nOriginal GitHub Issue: \
             https://github.com/octo/widgets/issues/13"
        );
    }

    #[test]
    fn initial_status_prefers_to_do() {
        let statuses = vec!["Backlog".to_string(), "TO DO".to_string()];
        assert_eq!(initial_status(&statuses).unwrap(), "TO DO");
    }

    #[test]
    fn initial_status_falls_back_to_first() {
        let statuses = vec![
            "Open".to_string(),
            "In Progress".to_string(),
            "Complete".to_string(),
        ];
        assert_eq!(initial_status(&statuses).unwrap(), "Open");
    }

    #[test]
    fn initial_status_requires_some_status() {
        let err = initial_status(&[]).unwrap_err();
        assert!(matches!(err, SyncError::Configuration(_)));
    }
}
