#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use ticksync::entity::task;
use ticksync::sea_orm::{EntityTrait, IntoActiveModel};
use ticksync::{
    Remote, SyncDb, SyncDbBuilder, SyncError, SyncRequest, SyncResponse, TaskDto, Updates,
};

pub async fn memory_db() -> SyncDb {
    let _ = env_logger::builder().is_test(true).try_init();
    SyncDbBuilder::new("sqlite::memory:")
        .build()
        .await
        .expect("Failed to create in-memory store")
}

/// Insert a task row as-is, bypassing the draft defaults, so tests control
/// `modified_time` and `sync_status` exactly.
pub async fn seed_task(db: &SyncDb, row: task::Model) {
    task::Entity::insert(row.into_active_model())
        .exec_without_returning(db.conn())
        .await
        .expect("Failed to seed task");
}

pub fn raw_task(id: &str, title: &str, modified_time: i64, sync_status: &str) -> task::Model {
    task::Model {
        id: id.into(),
        project_id: "p1".into(),
        title: title.into(),
        content: String::new(),
        status: 0,
        priority: 0,
        progress: 0,
        is_all_day: false,
        time_zone: "UTC".into(),
        start_date: None,
        due_date: None,
        tags: "[]".into(),
        items: "[]".into(),
        is_deleted: false,
        modified_time,
        sync_status: sync_status.into(),
    }
}

pub fn task_dto(id: &str, title: &str, modified_time: i64) -> TaskDto {
    TaskDto {
        id: id.into(),
        title: Some(title.into()),
        modified_time: Some(modified_time),
        ..Default::default()
    }
}

pub fn response(check_point: i64) -> SyncResponse {
    SyncResponse {
        check_point: Some(check_point),
        updates: Updates::default(),
    }
}

/// Scripted remote endpoint: records every request, pops scripted responses
/// in order, and answers `{checkPoint: 1, updates: {}}` once the script runs
/// out. Tracks concurrent calls for the single-flight test.
pub struct MockRemote {
    requests: Mutex<Vec<SyncRequest>>,
    scripted: Mutex<VecDeque<Result<SyncResponse, String>>>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockRemote {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            scripted: Mutex::new(VecDeque::new()),
            delay: None,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        })
    }

    pub fn with_delay(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            scripted: Mutex::new(VecDeque::new()),
            delay: Some(delay),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        })
    }

    pub fn script(&self, response: SyncResponse) {
        self.scripted.lock().unwrap().push_back(Ok(response));
    }

    pub fn script_error(&self, message: &str) {
        self.scripted
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<SyncRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Remote for MockRemote {
    async fn exchange(&self, request: SyncRequest) -> Result<SyncResponse, SyncError> {
        self.requests.lock().unwrap().push(request);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.scripted.lock().unwrap().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(SyncError::Transport(message)),
            None => Ok(response(1)),
        }
    }
}
