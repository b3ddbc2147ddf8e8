//! Behavioural tests for the frontier traverser against an in-memory drive.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::storage::{ChildPage, RemoteEntry, StorageProvider};
use core_traversal::{FolderId, FrontierTraverser, TraversalStats};
use futures::StreamExt;
use tokio::sync::Notify;
use tokio::time::timeout;

const FOLDER: &str = "application/vnd.google-apps.folder";

type Call = (String, Option<String>);

fn owned(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

/// In-memory drive; each folder holds an ordered list of pages
#[derive(Default)]
struct FakeDrive {
    pages: HashMap<String, Vec<(Vec<String>, Vec<String>)>>,
    failing: HashSet<String>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<Call>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeDrive {
    fn new() -> Self {
        Self::default()
    }

    /// Add one page to `id`; repeated calls add further pages
    fn folder(mut self, id: &str, files: &[&str], folders: &[&str]) -> Self {
        self.pages
            .entry(id.to_string())
            .or_default()
            .push((owned(files), owned(folders)));
        self
    }

    /// Page `index` of `id`, with cursors "<id>#p1", "<id>#p2", ...
    fn page(&self, id: &str, cursor: Option<&str>) -> ChildPage {
        let Some(pages) = self.pages.get(id) else {
            return ChildPage::empty();
        };
        let index = match cursor {
            None => 0,
            Some(c) => c
                .strip_prefix(&format!("{}#p", id))
                .and_then(|n| n.parse::<usize>().ok())
                .unwrap_or(usize::MAX),
        };
        let Some((files, folders)) = pages.get(index) else {
            return ChildPage::empty();
        };

        let entries = files
            .iter()
            .map(|f| RemoteEntry::new(f.as_str(), "text/plain"))
            .chain(folders.iter().map(|d| RemoteEntry::new(d.as_str(), FOLDER)))
            .collect();
        let next = (index + 1 < pages.len()).then(|| format!("{}#p{}", id, index + 1));

        ChildPage::classify(entries, next, |e| e.mime_type == FOLDER)
    }

    fn failing(mut self, id: &str) -> Self {
        self.failing.insert(id.to_string());
        self
    }

    fn delay(mut self, id: &str, delay: Duration) -> Self {
        self.delays.insert(id.to_string(), delay);
        self
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn calls_for(&self, id: &str) -> Vec<Option<String>> {
        self.calls()
            .into_iter()
            .filter(|(folder, _)| folder == id)
            .map(|(_, cursor)| cursor)
            .collect()
    }

    fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StorageProvider for FakeDrive {
    async fn list_children(&self, folder_id: &str, cursor: Option<String>) -> BridgeResult<ChildPage> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.calls
            .lock()
            .unwrap()
            .push((folder_id.to_string(), cursor.clone()));

        match self.delays.get(folder_id) {
            Some(delay) => tokio::time::sleep(*delay).await,
            None => tokio::time::sleep(Duration::from_millis(2)).await,
        }

        let result = if self.failing.contains(folder_id) {
            Err(BridgeError::OperationFailed("API error (status 503)".to_string()))
        } else {
            Ok(self.page(folder_id, cursor.as_deref()))
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

async fn run(drive: Arc<FakeDrive>, root: &str) -> (Vec<Vec<String>>, TraversalStats) {
    let traverser = FrontierTraverser::new(drive);
    let mut traversal = traverser.traverse(FolderId::parse(root).unwrap());

    let mut batches = Vec::new();
    while let Some(batch) = traversal.next().await {
        batches.push(batch);
    }
    let stats = traversal.stats();
    (batches, stats)
}

fn flatten(batches: &[Vec<String>]) -> Vec<String> {
    let mut all: Vec<String> = batches.iter().flatten().cloned().collect();
    all.sort();
    all
}

#[tokio::test]
async fn test_scenario_root_with_one_empty_folder() {
    let drive = Arc::new(FakeDrive::new().folder("ROOT", &["f1", "f2"], &["c1"]));

    let (batches, stats) = run(Arc::clone(&drive), "ROOT").await;

    assert_eq!(batches, vec![vec!["f1".to_string(), "f2".to_string()]]);
    assert_eq!(
        drive.calls(),
        vec![("ROOT".to_string(), None), ("c1".to_string(), None)]
    );
    assert_eq!(stats.rounds, 2);
}

#[tokio::test]
async fn test_completeness_and_termination_on_nested_tree() {
    let drive = Arc::new(
        FakeDrive::new()
            .folder("R", &["a", "b"], &["C", "D"])
            .folder("C", &["c"], &["E"])
            .folder("D", &[], &[])
            .folder("E", &["e1", "e2", "e3"], &["F"])
            .folder("F", &["f"], &[]),
    );

    let (batches, stats) = run(Arc::clone(&drive), "R").await;

    assert_eq!(flatten(&batches), vec!["a", "b", "c", "e1", "e2", "e3", "f"]);
    assert!(batches.iter().all(|batch| !batch.is_empty()));
    assert_eq!(drive.calls().len(), 5);
    assert_eq!(stats.files_emitted, 7);
    assert_eq!(stats.folders_discovered, 4);
    assert_eq!(stats.pages_failed, 0);
}

#[tokio::test]
async fn test_pagination_is_drained() {
    let drive = Arc::new(
        FakeDrive::new()
            .folder("ROOT", &[], &["P"])
            .folder("P", &["x1", "x2"], &[])
            .folder("P", &["x3"], &["Q"])
            .folder("P", &["x4"], &[])
            .folder("Q", &["q"], &[]),
    );

    let (batches, stats) = run(Arc::clone(&drive), "ROOT").await;

    assert_eq!(
        drive.calls_for("P"),
        vec![None, Some("P#p1".to_string()), Some("P#p2".to_string())]
    );
    assert_eq!(flatten(&batches), vec!["q", "x1", "x2", "x3", "x4"]);
    assert_eq!(stats.pages_listed, 5);
}

#[tokio::test]
async fn test_failed_folder_is_dropped_without_error() {
    let drive = Arc::new(
        FakeDrive::new()
            .folder("ROOT", &["r"], &["bad", "good"])
            .folder("bad", &["lost1"], &["lost_dir"])
            .folder("bad", &["lost2"], &[])
            .folder("good", &["g"], &[])
            .failing("bad"),
    );

    let (batches, stats) = run(Arc::clone(&drive), "ROOT").await;

    assert_eq!(flatten(&batches), vec!["g", "r"]);
    assert_eq!(drive.calls_for("bad"), vec![None]);
    assert!(drive.calls_for("lost_dir").is_empty());
    assert_eq!(stats.pages_failed, 1);
    assert_eq!(stats.pages_listed, 2);
}

#[tokio::test]
async fn test_at_most_ten_calls_in_flight() {
    let children: Vec<String> = (0..25).map(|i| format!("d{:02}", i)).collect();
    let child_refs: Vec<&str> = children.iter().map(String::as_str).collect();

    let mut drive = FakeDrive::new().folder("ROOT", &[], &child_refs);
    for child in &children {
        drive = drive
            .folder(child, &[child.as_str()], &[])
            .delay(child, Duration::from_millis(10));
    }
    let drive = Arc::new(drive);

    let (batches, stats) = run(Arc::clone(&drive), "ROOT").await;

    assert_eq!(drive.max_in_flight(), 10);
    // root, then 10 + 10 + 5 children
    assert_eq!(stats.rounds, 4);
    assert_eq!(drive.calls().len(), 26);
    assert_eq!(flatten(&batches), children);

    // later entries are dispatched only after earlier rounds
    let order: Vec<String> = drive.calls().into_iter().skip(1).map(|(f, _)| f).collect();
    let first_round: HashSet<&str> = order[..10].iter().map(String::as_str).collect();
    let expected: HashSet<&str> = child_refs[..10].iter().copied().collect();
    assert_eq!(first_round, expected);
}

#[tokio::test]
async fn test_custom_concurrency_bound() {
    let mut drive = FakeDrive::new().folder("ROOT", &[], &["a", "b", "c", "d", "e"]);
    for child in ["a", "b", "c", "d", "e"] {
        drive = drive.delay(child, Duration::from_millis(10));
    }
    let drive = Arc::new(drive);

    let traverser = FrontierTraverser::new(Arc::clone(&drive) as Arc<dyn StorageProvider>)
        .with_concurrency(2);
    let traversal = traverser.traverse(FolderId::parse("ROOT").unwrap());
    let _: Vec<Vec<String>> = traversal.collect().await;

    assert_eq!(drive.max_in_flight(), 2);
    assert_eq!(drive.calls().len(), 6);
}

#[tokio::test]
async fn test_folder_under_two_parents_is_listed_twice() {
    let drive = Arc::new(
        FakeDrive::new()
            .folder("ROOT", &[], &["p1", "p2"])
            .folder("p1", &[], &["shared"])
            .folder("p2", &[], &["shared"])
            .folder("shared", &["s"], &[]),
    );

    let (batches, _) = run(Arc::clone(&drive), "ROOT").await;

    assert_eq!(drive.calls_for("shared").len(), 2);
    assert_eq!(flatten(&batches), vec!["s", "s"]);
}

/// "slow" answers only once `gate` is notified; every other folder answers at once
struct GatedDrive {
    gate: Notify,
}

#[async_trait]
impl StorageProvider for GatedDrive {
    async fn list_children(&self, folder_id: &str, _cursor: Option<String>) -> BridgeResult<ChildPage> {
        let entries = match folder_id {
            "ROOT" => vec![RemoteEntry::new("slow", FOLDER), RemoteEntry::new("fast", FOLDER)],
            "slow" => {
                self.gate.notified().await;
                vec![RemoteEntry::new("s", "text/plain")]
            }
            "fast" => vec![RemoteEntry::new("f", "text/plain")],
            _ => vec![],
        };
        Ok(ChildPage::classify(entries, None, |e| e.mime_type == FOLDER))
    }
}

#[tokio::test]
async fn test_batches_are_emitted_as_calls_complete() {
    let drive = Arc::new(GatedDrive { gate: Notify::new() });
    let traverser = FrontierTraverser::new(Arc::clone(&drive) as Arc<dyn StorageProvider>);
    let mut traversal = traverser.traverse(FolderId::parse("ROOT").unwrap());

    // "slow" is still pending in the same round when "fast" is yielded
    let first = timeout(Duration::from_secs(5), traversal.next())
        .await
        .expect("fast batch was held back by a pending call");
    assert_eq!(first, Some(owned(&["f"])));

    drive.gate.notify_one();
    let second = timeout(Duration::from_secs(5), traversal.next()).await.unwrap();
    assert_eq!(second, Some(owned(&["s"])));

    assert_eq!(timeout(Duration::from_secs(5), traversal.next()).await.unwrap(), None);
    assert_eq!(traversal.stats().rounds, 2);
}

/// Every page of every folder holds one file and an empty continuation token
struct EmptyTokenDrive {
    calls: AtomicUsize,
}

#[async_trait]
impl StorageProvider for EmptyTokenDrive {
    async fn list_children(&self, _folder_id: &str, _cursor: Option<String>) -> BridgeResult<ChildPage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ChildPage {
            files: vec![RemoteEntry::new("f1", "text/plain")],
            folders: vec![],
            next_cursor: Some(String::new()),
        })
    }
}

#[tokio::test]
async fn test_empty_continuation_token_ends_folder() {
    let drive = Arc::new(EmptyTokenDrive { calls: AtomicUsize::new(0) });
    let traverser = FrontierTraverser::new(Arc::clone(&drive) as Arc<dyn StorageProvider>);
    let traversal = traverser.traverse(FolderId::parse("ROOT").unwrap());

    let batches: Vec<Vec<String>> = timeout(Duration::from_secs(5), traversal.collect())
        .await
        .expect("traversal kept following an empty token");

    assert_eq!(batches, vec![owned(&["f1"])]);
    assert_eq!(drive.calls.load(Ordering::SeqCst), 1);
}
