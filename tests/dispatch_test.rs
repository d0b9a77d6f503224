//! Dispatcher behaviour against an in-memory store and a pinned clock.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, TimeZone};
use serde_json::{json, Value};

use tugas_webhook::{
    completion_policy::CompletionPolicy,
    data_access::{
        memory_store::MemoryStore,
        task_query::TaskQuery,
        task_store::{StoreError, TaskStore},
    },
    fulfillment::{
        calendar::wib,
        clock::FixedClock,
        dispatcher::{DispatchConfig, IntentDispatcher},
        replies,
    },
    new_task::NewTask,
    task::{Task, TaskId},
    task_priority::TaskPriority,
    task_status::TaskStatus,
    webhook_request::WebhookRequest,
};

// Thursday 2025-12-18, 09:30 WIB.
fn now() -> DateTime<FixedOffset> {
    wib().with_ymd_and_hms(2025, 12, 18, 9, 30, 0).unwrap()
}

fn due(day: u32, h: u32, m: u32, s: u32) -> DateTime<FixedOffset> {
    wib().with_ymd_and_hms(2025, 12, day, h, m, s).unwrap()
}

fn task(id: &str, title: &str, course: &str, due_at: DateTime<FixedOffset>, status: TaskStatus) -> Task {
    Task {
        id: TaskId(id.into()),
        user_id: "demo".into(),
        title: title.into(),
        course: course.into(),
        due_at,
        priority: TaskPriority::Medium,
        status,
    }
}

fn request(intent: &str, params: Value, text: &str) -> WebhookRequest {
    serde_json::from_value(json!({
        "queryResult": {
            "intent": { "displayName": intent },
            "parameters": params,
            "queryText": text
        }
    }))
    .unwrap()
}

fn dispatcher_with(store: Arc<MemoryStore>, config: DispatchConfig) -> IntentDispatcher {
    IntentDispatcher::new(store, Arc::new(FixedClock(now())), config)
}

fn dispatcher(store: Arc<MemoryStore>) -> IntentDispatcher {
    dispatcher_with(store, DispatchConfig::default())
}

// ── Create ─────────────────────────────────────────────────────

#[tokio::test]
async fn create_with_defaults() {
    let store = Arc::new(MemoryStore::new());
    let reply = dispatcher(store.clone())
        .handle(&request("add_task", json!({ "title": "Quiz 2", "course": "kalkulus" }), "tambah tugas Quiz 2"))
        .await;

    let rows = store.snapshot();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.title, "Quiz 2");
    assert_eq!(row.course, "kalkulus");
    assert_eq!(row.user_id, "demo");
    assert_eq!(row.due_at.to_rfc3339(), "2025-12-18T23:59:00+07:00");
    assert_eq!(row.priority, TaskPriority::Medium);
    assert_eq!(row.status, TaskStatus::Todo);

    assert!(reply.contains("Quiz 2"), "{reply}");
    assert!(reply.contains("18 Des 2025, 23.59 WIB"), "{reply}");
}

#[tokio::test]
async fn create_without_title_asks_and_stores_nothing() {
    let store = Arc::new(MemoryStore::new());
    let d = dispatcher(store.clone());

    for params in [json!({}), json!({ "title": "" }), json!({ "title": ["  "], "course": "fisika" })] {
        let reply = d.handle(&request("tambah_tugas", params, "tambah tugas")).await;
        assert_eq!(reply, replies::ASK_TITLE);
    }
    assert_eq!(store.mutation_count(), 0);
}

#[tokio::test]
async fn create_course_fillers_normalize_to_same_key() {
    let store = Arc::new(MemoryStore::new());
    let d = dispatcher(store.clone());

    for course in ["mata kuliah Kalkulus", "matakuliah kalkulus", "tugas kalkulus", "Kalkulus"] {
        d.handle(&request("add_task", json!({ "title": "Latihan", "course": course }), "")).await;
    }
    d.handle(&request("add_task", json!({ "title": "Bebas" }), "")).await;

    let courses: Vec<String> = store.snapshot().into_iter().map(|t| t.course).collect();
    assert_eq!(courses, ["kalkulus", "kalkulus", "kalkulus", "kalkulus", "umum"]);
}

#[tokio::test]
async fn create_priority_and_explicit_due() {
    let store = Arc::new(MemoryStore::new());
    let d = dispatcher(store.clone());

    d.handle(&request(
        "add_task",
        json!({ "title": "UAS", "priority": "urgent", "date-time": { "startDateTime": "2025-12-22T08:00:00+07:00" } }),
        "",
    ))
    .await;
    d.handle(&request("add_task", json!({ "title": "Baca", "date": "2025-12-23" }), "tugas baca prioritas rendah"))
        .await;

    let rows = store.snapshot();
    assert_eq!(rows[0].priority, TaskPriority::High);
    assert_eq!(rows[0].due_at.to_rfc3339(), "2025-12-22T08:00:00+07:00");
    assert_eq!(rows[1].priority, TaskPriority::Low);
    assert_eq!(rows[1].due_at.to_rfc3339(), "2025-12-23T23:59:00+07:00");
}

// ── List by course ─────────────────────────────────────────────

#[tokio::test]
async fn course_listing_sorted_without_done() {
    let store = Arc::new(MemoryStore::with_tasks(vec![
        task("1", "Late", "kalkulus", due(24, 10, 0, 0), TaskStatus::Todo),
        task("2", "Finished", "kalkulus", due(19, 10, 0, 0), TaskStatus::Done),
        task("3", "Early", "Kalkulus", due(19, 8, 0, 0), TaskStatus::InProgress),
        task("4", "Other", "fisika", due(18, 8, 0, 0), TaskStatus::Todo),
    ]));

    let reply = dispatcher(store.clone())
        .handle(&request("list_tasks_by_course", json!({ "course": "Mata Kuliah Kalkulus" }), ""))
        .await;

    let lines: Vec<&str> = reply.lines().collect();
    assert_eq!(lines[0], "📚 Tugas Mata Kuliah Kalkulus yang belum selesai:");
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("• Early — 19 Des 2025, 08.00 WIB"), "{reply}");
    assert!(lines[2].starts_with("• Late — 24 Des 2025, 10.00 WIB"), "{reply}");
    assert!(!reply.contains("Finished"));
    assert_eq!(store.mutation_count(), 0);
}

#[tokio::test]
async fn course_listing_with_status_filter() {
    let store = Arc::new(MemoryStore::with_tasks(vec![
        task("1", "Open", "kalkulus", due(24, 10, 0, 0), TaskStatus::Todo),
        task("2", "Finished", "kalkulus", due(19, 10, 0, 0), TaskStatus::Done),
    ]));

    let reply = dispatcher(store)
        .handle(&request("course", json!({ "course": "kalkulus", "status": "selesai" }), ""))
        .await;
    assert!(reply.starts_with("📚 Tugas kalkulus dengan status done:"), "{reply}");
    assert!(reply.contains("Finished"));
    assert!(!reply.contains("Open"));
}

#[tokio::test]
async fn course_listing_empty_and_missing() {
    let store = Arc::new(MemoryStore::new());
    let d = dispatcher(store);

    let reply = d.handle(&request("list_tasks_by_course", json!({ "course": "Fisika" }), "")).await;
    assert_eq!(reply, "Belum ada tugas (atau semua sudah selesai) untuk Fisika.");

    let reply = d.handle(&request("list_tasks_by_course", json!({}), "")).await;
    assert_eq!(reply, replies::ASK_COURSE);
}

#[tokio::test]
async fn course_with_only_fillers_lists_what_create_stored() {
    let store = Arc::new(MemoryStore::new());
    let d = dispatcher(store.clone());

    d.handle(&request("add_task", json!({ "title": "Essay", "course": "Tugas" }), "")).await;
    assert_eq!(store.snapshot()[0].course, "umum");

    let reply = d.handle(&request("list_tasks_by_course", json!({ "course": "Tugas" }), "")).await;
    assert!(reply.contains("• Essay"), "{reply}");

    let reply = d.handle(&request("list_tasks_by_course", json!({ "course": "umum" }), "")).await;
    assert!(reply.contains("• Essay"), "{reply}");
}

#[tokio::test]
async fn course_listing_truncates() {
    let tasks = (1..=5)
        .map(|n| task(&n.to_string(), &format!("T{n}"), "kalkulus", due(19 + n, 9, 0, 0), TaskStatus::Todo))
        .collect();
    let store = Arc::new(MemoryStore::with_tasks(tasks));
    let d = dispatcher_with(
        store,
        DispatchConfig {
            list_limit: 2,
            ..DispatchConfig::default()
        },
    );

    let reply = d.handle(&request("list_tasks_by_course", json!({ "course": "kalkulus" }), "")).await;
    assert_eq!(reply.lines().count(), 4);
    assert!(reply.contains("• T1"));
    assert!(reply.contains("• T2"));
    assert!(!reply.contains("• T3"));
    assert!(reply.ends_with("…dan 3 tugas lainnya."));
}

// ── List by date ───────────────────────────────────────────────

#[tokio::test]
async fn date_listing_uses_inclusive_wib_window() {
    let store = Arc::new(MemoryStore::with_tasks(vec![
        task("before", "Kemarin", "x", due(19, 23, 59, 59), TaskStatus::Todo),
        task("start", "Pagi", "x", due(20, 0, 0, 0), TaskStatus::Todo),
        task("end", "Malam", "x", due(20, 23, 59, 59), TaskStatus::Todo),
        task("done", "Beres", "x", due(20, 12, 0, 0), TaskStatus::Done),
        task("after", "Besok", "x", due(21, 0, 0, 0), TaskStatus::Todo),
    ]));

    let reply = dispatcher(store)
        .handle(&request("list_tasks_by_date", json!({ "date": "2025-12-20" }), ""))
        .await;

    let lines: Vec<&str> = reply.lines().collect();
    assert_eq!(lines[0], "📅 Tugas yang belum selesai pada 2025-12-20:");
    assert_eq!(lines.len(), 3, "{reply}");
    assert!(lines[1].starts_with("• Pagi [x] — 20 Des 2025, 00.00 WIB"));
    assert!(lines[2].starts_with("• Malam [x] — 20 Des 2025, 23.59 WIB"));
}

#[tokio::test]
async fn date_listing_defaults_to_today() {
    let store = Arc::new(MemoryStore::with_tasks(vec![task(
        "t",
        "Hari Ini",
        "x",
        due(18, 15, 0, 0),
        TaskStatus::Todo,
    )]));
    let d = dispatcher(store);

    let reply = d.handle(&request("tugas_hari_ini", json!({}), "tugas hari ini apa")).await;
    assert!(reply.contains("Hari Ini"), "{reply}");

    let reply = d.handle(&request("tugas_per_tanggal", json!({ "date-time": "2025-12-25T10:00:00+07:00" }), "")).await;
    assert_eq!(reply, "Tidak ada tugas yang belum selesai pada 2025-12-25.");
}

// ── Update status ──────────────────────────────────────────────

#[tokio::test]
async fn update_without_match_changes_nothing() {
    let store = Arc::new(MemoryStore::with_tasks(vec![task(
        "1",
        "Essay",
        "x",
        due(20, 9, 0, 0),
        TaskStatus::Todo,
    )]));
    let reply = dispatcher(store.clone())
        .handle(&request("update_status", json!({ "title": "Quiz 9" }), ""))
        .await;

    assert_eq!(reply, replies::not_found("Quiz 9"));
    assert_eq!(store.mutation_count(), 0);
    assert_eq!(store.snapshot()[0].status, TaskStatus::Todo);
}

#[tokio::test]
async fn update_from_utterance_archives_by_default() {
    let store = Arc::new(MemoryStore::with_tasks(vec![task(
        "1",
        "Quiz 1 Lanjutan",
        "kalkulus",
        due(20, 9, 0, 0),
        TaskStatus::Todo,
    )]));
    let reply = dispatcher(store.clone())
        .handle(&request("update_status", json!({}), "Tandai tugas Quiz 1 selesai"))
        .await;

    assert_eq!(reply, "✅ Oke. Status \"Quiz 1 Lanjutan\" sudah jadi done.");
    let rows = store.snapshot();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, TaskStatus::Done);
}

#[tokio::test]
async fn update_from_utterance_deletes_under_delete_policy() {
    let store = Arc::new(MemoryStore::with_tasks(vec![task(
        "1",
        "Quiz 1 Lanjutan",
        "kalkulus",
        due(20, 9, 0, 0),
        TaskStatus::Todo,
    )]));
    let d = dispatcher_with(
        store.clone(),
        DispatchConfig {
            completion_policy: CompletionPolicy::Delete,
            ..DispatchConfig::default()
        },
    );
    let reply = d.handle(&request("ubah_status_tugas", json!({}), "Tandai tugas Quiz 1 selesai")).await;

    assert_eq!(reply, "✅ Oke. \"Quiz 1 Lanjutan\" sudah selesai dan dihapus dari daftar.");
    assert!(store.snapshot().is_empty());
}

#[tokio::test]
async fn delete_policy_only_applies_to_done() {
    let store = Arc::new(MemoryStore::with_tasks(vec![task(
        "1",
        "Laporan Praktikum",
        "fisika",
        due(20, 9, 0, 0),
        TaskStatus::Todo,
    )]));
    let d = dispatcher_with(
        store.clone(),
        DispatchConfig {
            completion_policy: CompletionPolicy::Delete,
            ..DispatchConfig::default()
        },
    );
    let reply = d
        .handle(&request("update_status", json!({}), "Ubah status tugas laporan praktikum jadi in progress"))
        .await;

    assert_eq!(reply, "✅ Oke. Status \"Laporan Praktikum\" sudah jadi in_progress.");
    assert_eq!(store.snapshot()[0].status, TaskStatus::InProgress);
}

#[tokio::test]
async fn earliest_due_match_wins() {
    let store = Arc::new(MemoryStore::with_tasks(vec![
        task("late", "Quiz 1 Remedial", "x", due(28, 9, 0, 0), TaskStatus::Todo),
        task("early", "Quiz 1", "x", due(19, 9, 0, 0), TaskStatus::Todo),
    ]));
    dispatcher(store.clone())
        .handle(&request("update_status", json!({ "title": "quiz 1", "status": "beres" }), ""))
        .await;

    let rows = store.snapshot();
    let status_of = |id: &str| rows.iter().find(|t| t.id == TaskId(id.into())).unwrap().status;
    assert_eq!(status_of("early"), TaskStatus::Done);
    assert_eq!(status_of("late"), TaskStatus::Todo);
    assert_eq!(store.mutation_count(), 1);
}

#[tokio::test]
async fn update_without_title_asks() {
    let store = Arc::new(MemoryStore::new());
    let reply = dispatcher(store.clone())
        .handle(&request("update_status", json!({ "status": "done" }), "tandai selesai"))
        .await;
    assert_eq!(reply, replies::ASK_UPDATE_TITLE);
    assert_eq!(store.mutation_count(), 0);
}

// ── Routing and failures ───────────────────────────────────────

#[tokio::test]
async fn unknown_intent_touches_nothing() {
    let store = Arc::new(MemoryStore::new());
    let reply = dispatcher(store.clone())
        .handle(&request("Default Welcome Intent", json!({ "title": "x" }), "halo"))
        .await;
    assert_eq!(reply, replies::UNHANDLED_INTENT);
    assert_eq!(store.mutation_count(), 0);
}

struct BrokenStore;

#[async_trait]
impl TaskStore for BrokenStore {
    async fn insert(&self, _task: NewTask) -> Result<Task, StoreError> {
        Err(StoreError::Status {
            status: 500,
            body: "relation \"public.tasks\" does not exist".into(),
        })
    }

    async fn select(&self, _query: &TaskQuery) -> Result<Vec<Task>, StoreError> {
        Err(StoreError::Decode("unexpected token".into()))
    }

    async fn update_status(&self, _tenant: &str, _id: &TaskId, _status: TaskStatus) -> Result<Option<Task>, StoreError> {
        Err(StoreError::Redb("locked".into()))
    }

    async fn delete(&self, _tenant: &str, _id: &TaskId) -> Result<Option<Task>, StoreError> {
        Err(StoreError::Redb("locked".into()))
    }
}

#[tokio::test]
async fn store_failures_become_generic_reply() {
    let d = IntentDispatcher::new(Arc::new(BrokenStore), Arc::new(FixedClock(now())), DispatchConfig::default());

    let cases = [
        request("add_task", json!({ "title": "Quiz" }), ""),
        request("list_tasks_by_course", json!({ "course": "kalkulus" }), ""),
        request("list_tasks_by_date", json!({}), ""),
        request("update_status", json!({ "title": "Quiz" }), ""),
    ];
    for req in &cases {
        let reply = d.handle(req).await;
        assert_eq!(reply, replies::SERVER_ERROR);
        assert!(!reply.contains("relation"));
    }
}
