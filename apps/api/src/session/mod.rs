//! Sessions — the explicit per-user state threaded through the pipeline.
//!
//! A session moves through: resume text + job description → analysis →
//! generated resume + document. Changing an input drops everything derived
//! from it, so a stored result always matches the inputs it was built from.

pub mod handlers;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::analysis::AnalysisResult;

/// Idle time after which a session is dropped.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone)]
pub struct Session {
    pub created_at: DateTime<Utc>,
    /// Last read or write through the store.
    pub last_active: DateTime<Utc>,
    pub resume_text: Option<String>,
    pub job_description: String,
    pub analysis: Option<AnalysisResult>,
    pub generated: Option<Value>,
    pub document: Option<Bytes>,
    /// Bumped on every input change; results computed against an older
    /// revision are discarded.
    pub revision: u64,
}

impl Session {
    fn new() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            last_active: now,
            resume_text: None,
            job_description: String::new(),
            analysis: None,
            generated: None,
            document: None,
            revision: 0,
        }
    }

    pub fn set_resume_text(&mut self, text: String) {
        self.resume_text = Some(text);
        self.invalidate();
    }

    pub fn set_job_description(&mut self, job_description: String) {
        if self.job_description != job_description {
            self.job_description = job_description;
            self.invalidate();
        }
    }

    /// Clears the generated resume and its document.
    pub fn clear_generated(&mut self) {
        self.generated = None;
        self.document = None;
    }

    fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        (now - self.last_active)
            .to_std()
            .map(|idle| idle > ttl)
            .unwrap_or(false)
    }

    fn invalidate(&mut self) {
        self.revision += 1;
        self.analysis = None;
        self.clear_generated();
    }

    pub fn summary(&self, session_id: Uuid) -> SessionSummary {
        SessionSummary {
            session_id,
            created_at: self.created_at,
            resume_characters: self.resume_text.as_ref().map(|t| t.chars().count()),
            has_job_description: !self.job_description.trim().is_empty(),
            analyzed: self.analysis.is_some(),
            generated: self.generated.is_some(),
            document_ready: self.document.is_some(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub resume_characters: Option<usize>,
    pub has_job_description: bool,
    pub analyzed: bool,
    pub generated: bool,
    pub document_ready: bool,
}

/// In-memory session map. Locks are held only for the duration of a read or
/// an update, never across a backend call.
///
/// Sessions idle for longer than the TTL behave as if deleted. Expired entries
/// are evicted lazily on access and swept whenever a session is created.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Session>>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL)
    }
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::default(),
            ttl,
        }
    }

    pub async fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let mut sessions = self.inner.write().await;

        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(now, self.ttl));
        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!("Evicted {evicted} idle sessions");
        }

        sessions.insert(id, Session::new());
        id
    }

    pub async fn get(&self, id: Uuid) -> Result<Session, AppError> {
        self.update(id, |s| s.clone()).await
    }

    /// Applies `f` to the session under the write lock.
    pub async fn update<T>(&self, id: Uuid, f: impl FnOnce(&mut Session) -> T) -> Result<T, AppError> {
        let now = Utc::now();
        let mut sessions = self.inner.write().await;
        if sessions.get(&id).is_some_and(|s| s.is_expired(now, self.ttl)) {
            sessions.remove(&id);
            debug!("Session {id} expired");
        }
        let session = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;
        session.last_active = now;
        Ok(f(session))
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        self.inner
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found(id))
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found"))
}
