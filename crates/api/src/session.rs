use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use axum::http::{HeaderMap, header};
use lru::LruCache;
use parking_lot::Mutex;
use tracing::debug;

pub const SESSION_COOKIE: &str = "diskview_session";

/// Where a session stands in the OAuth flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    AwaitingCallback,
    Authenticated,
}

#[derive(Debug, Clone, Default)]
pub struct SessionData {
    pub disk_token: Option<String>,
    pub awaiting_callback: bool,
}

impl SessionData {
    pub fn auth_state(&self) -> AuthState {
        if self.disk_token.is_some() {
            AuthState::Authenticated
        } else if self.awaiting_callback {
            AuthState::AwaitingCallback
        } else {
            AuthState::Unauthenticated
        }
    }
}

struct StoredSession {
    data: SessionData,
    touched: Instant,
}

/// In-memory sessions keyed by the random id carried in the session cookie.
///
/// Bounded like the listing cache: at most `capacity` sessions, least
/// recently used evicted first, and a session idle past `idle_ttl` is dropped
/// on the lookup that finds it. Nothing here outlives the process.
pub struct SessionStore {
    sessions: Mutex<LruCache<String, StoredSession>>,
    idle_ttl: Duration,
}

impl SessionStore {
    pub fn new(capacity: usize, idle_ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            sessions: Mutex::new(LruCache::new(capacity)),
            idle_ttl,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Returns the session and marks it as recently used.
    pub fn get(&self, id: &str) -> Option<SessionData> {
        let mut sessions = self.sessions.lock();

        match sessions.get_mut(id) {
            Some(stored) if stored.touched.elapsed() < self.idle_ttl => {
                stored.touched = Instant::now();
                return Some(stored.data.clone());
            }
            Some(_) => {}
            None => return None,
        }

        sessions.pop(id);
        debug!("Dropped idle session");
        None
    }

    /// Marks the session as waiting for the provider callback, creating it
    /// if needed. Returns the session id.
    pub fn begin_authorization(&self, id: Option<&str>) -> String {
        self.update(id, |data| data.awaiting_callback = true)
    }

    /// Stores the access token, creating the session if needed. Returns the
    /// session id.
    pub fn store_token(&self, id: Option<&str>, token: String) -> String {
        self.update(id, move |data| {
            data.disk_token = Some(token);
            data.awaiting_callback = false;
        })
    }

    /// Drops a pending authorization after a failed callback.
    pub fn abort_authorization(&self, id: &str) {
        if let Some(stored) = self.sessions.lock().peek_mut(id) {
            stored.data.awaiting_callback = false;
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn update(&self, id: Option<&str>, f: impl FnOnce(&mut SessionData)) -> String {
        let existing = id.and_then(|id| self.get(id).map(|data| (id.to_string(), data)));
        let (id, mut data) =
            existing.unwrap_or_else(|| (new_session_id(), SessionData::default()));
        f(&mut data);

        let stored = StoredSession {
            data,
            touched: Instant::now(),
        };
        if let Some((evicted, _)) = self.sessions.lock().push(id.clone(), stored) {
            if evicted != id {
                debug!("Evicted least recently used session");
            }
        }
        id
    }
}

fn new_session_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Reads the session id from the `Cookie` header.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .find_map(|cookie| {
            cookie
                .trim()
                .strip_prefix(SESSION_COOKIE)
                .and_then(|rest| rest.strip_prefix('='))
                .map(|s| s.to_string())
        })
        .filter(|id| !id.is_empty())
}

pub fn session_cookie(id: &str) -> String {
    format!("{}={}; HttpOnly; Path=/; SameSite=Lax", SESSION_COOKIE, id)
}
