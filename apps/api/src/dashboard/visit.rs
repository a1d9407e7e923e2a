//! A visit is one browser tab: its auth state plus the dashboard mounted on it.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::info;
use uuid::Uuid;

use crate::auth::observer::{AuthObserver, AuthPhase, Subscription};
use crate::auth::AuthUser;
use crate::dashboard::notice::Notice;
use crate::dashboard::state::{DashboardSnapshot, DashboardState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewRoute {
    /// Session check still pending; nothing may be fetched.
    Loading,
    Login,
    Dashboard,
}

impl ViewRoute {
    pub fn for_phase(phase: &AuthPhase) -> Self {
        match phase {
            AuthPhase::Pending => ViewRoute::Loading,
            AuthPhase::Anonymous => ViewRoute::Login,
            AuthPhase::Authenticated(_) => ViewRoute::Dashboard,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ViewSnapshot {
    pub visit_id: Uuid,
    pub view: ViewRoute,
    pub user: Option<AuthUser>,
    /// Present only on the dashboard route.
    pub dashboard: Option<DashboardSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

pub struct Visit {
    pub id: Uuid,
    auth: AuthObserver,
    dashboard: Arc<Mutex<DashboardState>>,
    last_seen: Mutex<Instant>,
    /// The dashboard's session subscription, released when the visit is dropped.
    _mount: Subscription,
}

impl Visit {
    /// Opens a visit with its session check still pending.
    pub fn open() -> Self {
        let auth = AuthObserver::new();
        let dashboard = Arc::new(Mutex::new(DashboardState::default()));

        let mounted = dashboard.clone();
        let mount = auth.observe(move |phase| {
            if *phase == AuthPhase::Anonymous {
                mounted.lock().reset();
            }
        });

        Self {
            id: Uuid::new_v4(),
            auth,
            dashboard,
            last_seen: Mutex::new(Instant::now()),
            _mount: mount,
        }
    }

    /// Completes the session-presence check.
    pub fn resolve(&self, user: Option<AuthUser>) {
        match user {
            Some(user) => self.sign_in(user),
            None => self.auth.set(AuthPhase::Anonymous),
        }
    }

    pub fn sign_in(&self, user: AuthUser) {
        info!("Visit {} signed in as {}", self.id, user.uid);
        self.auth.set(AuthPhase::Authenticated(user));
    }

    /// Drops the session; the mounted dashboard resets itself.
    pub fn sign_out(&self) {
        info!("Visit {} signed out", self.id);
        self.auth.set(AuthPhase::Anonymous);
    }

    /// Records activity; idle visits are evicted by the registry.
    pub fn touch(&self) {
        *self.last_seen.lock() = Instant::now();
    }

    fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(*self.last_seen.lock())
    }

    pub fn route(&self) -> ViewRoute {
        ViewRoute::for_phase(&self.auth.phase())
    }

    pub fn user(&self) -> Option<AuthUser> {
        self.auth.current_user()
    }

    pub fn dashboard(&self) -> &Mutex<DashboardState> {
        &self.dashboard
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        let view = self.route();
        ViewSnapshot {
            visit_id: self.id,
            view,
            user: self.user(),
            dashboard: (view == ViewRoute::Dashboard).then(|| self.dashboard.lock().snapshot()),
            notice: None,
        }
    }
}

/// Visits with no request for this long are dropped.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// All open visits, in memory only. Idle visits expire.
#[derive(Clone)]
pub struct VisitRegistry {
    visits: Arc<RwLock<HashMap<Uuid, Arc<Visit>>>>,
    idle_timeout: Duration,
}

impl Default for VisitRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl VisitRegistry {
    pub fn new() -> Self {
        Self::with_idle_timeout(DEFAULT_IDLE_TIMEOUT)
    }

    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        Self {
            visits: Arc::new(RwLock::new(HashMap::new())),
            idle_timeout,
        }
    }

    /// Opens a visit. No session is restored, so the presence check resolves anonymous.
    /// Idle visits are swept first.
    pub async fn open(&self) -> Arc<Visit> {
        let visit = Arc::new(Visit::open());
        visit.resolve(None);

        let mut visits = self.visits.write().await;
        self.sweep(&mut visits);
        visits.insert(visit.id, visit.clone());
        visit
    }

    /// Returns a live visit and marks it active. Expired visits are treated as gone.
    pub async fn get(&self, id: Uuid) -> Option<Arc<Visit>> {
        let visit = self.visits.read().await.get(&id).cloned()?;
        if visit.idle_for(Instant::now()) >= self.idle_timeout {
            return None;
        }
        visit.touch();
        Some(visit)
    }

    pub async fn close(&self, id: Uuid) -> Option<Arc<Visit>> {
        self.visits.write().await.remove(&id)
    }

    pub async fn len(&self) -> usize {
        self.visits.read().await.len()
    }

    fn sweep(&self, visits: &mut HashMap<Uuid, Arc<Visit>>) {
        let now = Instant::now();
        let before = visits.len();
        visits.retain(|_, visit| visit.idle_for(now) < self.idle_timeout);
        let evicted = before - visits.len();
        if evicted > 0 {
            info!("Evicted {evicted} idle visit(s)");
        }
    }
}
