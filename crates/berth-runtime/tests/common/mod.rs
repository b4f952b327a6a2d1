//! Scripted runtime and recording store shared by the integration tests.

#![allow(dead_code, clippy::expect_used, clippy::unwrap_used)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use berth_common::config::WatchPolicy;
use berth_common::status::{RuntimeState, RuntimeStatus};
use berth_common::types::ContainerId;
use berth_runtime::backend::{ContainerBackend, ContainerConfig, ContainerInfo};
use berth_runtime::engine::Engine;
use berth_runtime::error::{Result, RuntimeError};
use berth_store::StatusStore;
use berth_store::error::{Result as StoreResult, StoreError};
use berth_store::memory::MemoryStore;

/// One scripted answer to an inspection.
pub type Inspection = std::result::Result<RuntimeState, String>;

#[derive(Debug, Clone)]
struct Stored {
    name: String,
    env: Vec<String>,
}

#[derive(Debug, Default)]
struct Inner {
    containers: HashMap<ContainerId, Stored>,
    script: VecDeque<Inspection>,
    fail_pull: Option<String>,
    fail_start: Option<String>,
    pulls: Vec<String>,
    starts: u32,
    inspects: u32,
}

/// In-memory runtime whose inspections follow a script.
///
/// Inspections pop the script front; the last entry repeats forever. An
/// empty script reports `created`.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    inner: Mutex<Inner>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_script(script: impl IntoIterator<Item = Inspection>) -> Self {
        let backend = Self::new();
        backend.inner.lock().unwrap().script = script.into_iter().collect();
        backend
    }

    pub fn fail_pull(&self, message: &str) {
        self.inner.lock().unwrap().fail_pull = Some(message.to_string());
    }

    pub fn fail_start(&self, message: &str) {
        self.inner.lock().unwrap().fail_start = Some(message.to_string());
    }

    pub fn set_script(&self, script: impl IntoIterator<Item = Inspection>) {
        self.inner.lock().unwrap().script = script.into_iter().collect();
    }

    pub fn exists(&self, id: &ContainerId) -> bool {
        self.inner.lock().unwrap().containers.contains_key(id)
    }

    pub fn container_count(&self) -> usize {
        self.inner.lock().unwrap().containers.len()
    }

    pub fn pulls(&self) -> Vec<String> {
        self.inner.lock().unwrap().pulls.clone()
    }

    pub fn starts(&self) -> u32 {
        self.inner.lock().unwrap().starts
    }

    pub fn inspects(&self) -> u32 {
        self.inner.lock().unwrap().inspects
    }
}

#[async_trait]
impl ContainerBackend for ScriptedBackend {
    async fn pull_image(&self, reference: &str) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(message) = inner.fail_pull.clone() {
            return Err(RuntimeError::Backend { message });
        }
        inner.pulls.push(reference.to_string());
        Ok(())
    }

    async fn create(&self, config: &ContainerConfig) -> Result<ContainerId> {
        let id = ContainerId::new(uuid::Uuid::new_v4().simple().to_string());
        let stored = Stored {
            name: config.name.clone(),
            env: config.env_entries(),
        };
        let _ = self
            .inner
            .lock()
            .unwrap()
            .containers
            .insert(id.clone(), stored);
        Ok(id)
    }

    async fn start(&self, id: &ContainerId) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.containers.contains_key(id) {
            return Err(RuntimeError::not_found(id.to_string()));
        }
        inner.starts += 1;
        match inner.fail_start.clone() {
            Some(message) => Err(RuntimeError::Backend { message }),
            None => Ok(()),
        }
    }

    async fn inspect(&self, id: &ContainerId) -> Result<ContainerInfo> {
        let mut inner = self.inner.lock().unwrap();
        let Some(stored) = inner.containers.get(id).cloned() else {
            return Err(RuntimeError::not_found(id.to_string()));
        };
        inner.inspects += 1;

        let next = if inner.script.len() > 1 {
            inner.script.pop_front()
        } else {
            inner.script.front().cloned()
        };
        let state = next
            .unwrap_or_else(|| Ok(RuntimeState::new(RuntimeStatus::Created)))
            .map_err(|message| RuntimeError::Backend { message })?;

        Ok(ContainerInfo {
            id: id.clone(),
            name: stored.name,
            env: stored.env,
            state,
        })
    }

    async fn remove(&self, id: &ContainerId) -> Result<()> {
        match self.inner.lock().unwrap().containers.remove(id) {
            Some(_) => Ok(()),
            None => Err(RuntimeError::not_found(id.to_string())),
        }
    }
}

/// Memory store that keeps a log of every successful write.
#[derive(Debug, Default)]
pub struct RecordingStore {
    entries: MemoryStore,
    writes: Mutex<Vec<(String, String)>>,
    fail_sets: AtomicBool,
    delete_failures: AtomicU32,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following `set_data` fail.
    pub fn fail_sets(&self) {
        self.fail_sets.store(true, Ordering::SeqCst);
    }

    /// Makes the next `count` calls to `delete_data` fail.
    pub fn fail_deletes(&self, count: u32) {
        self.delete_failures.store(count, Ordering::SeqCst);
    }

    /// Values written under `key`, oldest first.
    pub fn history(&self, key: &str) -> Vec<String> {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .collect()
    }

    pub fn write_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }

    pub async fn value(&self, key: &str) -> Option<String> {
        self.entries.snapshot().await.get(key).cloned()
    }
}

#[async_trait]
impl StatusStore for RecordingStore {
    async fn set_data(&self, key: &str, value: &str) -> StoreResult<()> {
        if self.fail_sets.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable {
                message: "connection refused".to_string(),
            });
        }
        self.entries.set_data(key, value).await?;
        self.writes
            .lock()
            .unwrap()
            .push((key.to_string(), value.to_string()));
        Ok(())
    }

    async fn get_data(&self, key: &str) -> StoreResult<String> {
        self.entries.get_data(key).await
    }

    async fn delete_data(&self, key: &str) -> StoreResult<()> {
        let failing = self
            .delete_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(StoreError::Unavailable {
                message: "connection reset".to_string(),
            });
        }
        self.entries.delete_data(key).await
    }
}

/// Engine wired to a scripted backend and a recording store.
pub struct Harness {
    pub engine: Engine,
    pub backend: Arc<ScriptedBackend>,
    pub store: Arc<RecordingStore>,
}

impl Harness {
    pub fn new(backend: ScriptedBackend) -> Self {
        Self::with_policy(backend, policy(None))
    }

    pub fn with_policy(backend: ScriptedBackend, policy: WatchPolicy) -> Self {
        let backend = Arc::new(backend);
        let store = Arc::new(RecordingStore::new());
        let engine = Engine::new(
            Arc::clone(&backend) as Arc<dyn ContainerBackend>,
            Arc::clone(&store) as Arc<dyn StatusStore>,
            policy,
        );
        Self {
            engine,
            backend,
            store,
        }
    }
}

/// Five-second polling with an optional poll limit.
pub fn policy(max_polls: Option<u32>) -> WatchPolicy {
    WatchPolicy {
        poll_interval: Duration::from_secs(5),
        max_polls,
    }
}

pub fn running() -> Inspection {
    Ok(RuntimeState::new(RuntimeStatus::Running))
}

pub fn pending(status: RuntimeStatus) -> Inspection {
    Ok(RuntimeState::new(status))
}

pub fn exited(code: i64, error: &str) -> Inspection {
    Ok(RuntimeState::exited(code, error))
}
