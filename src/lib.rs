use std::sync::Arc;

use tokio::sync::Mutex;

use client::{AnalyticsConnector, Authenticator};
use config::Config;
use dashboard::{DashboardMount, DashboardOrchestrator};
use session::{Session, SessionStore};

pub mod client;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod gate;
pub mod middleware;
pub mod models;
pub mod result;
pub mod router;
pub mod routes;
pub mod session;
pub mod utils;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub session: Arc<SessionStore>,
    pub authenticator: Arc<dyn Authenticator>,
    pub analytics: Arc<dyn AnalyticsConnector>,
    /// 控制台同一时间只挂载一个仪表盘
    pub dashboard: Arc<Mutex<Option<DashboardMount>>>,
}

impl AppState {
    pub fn new(
        config: Config,
        session: Arc<SessionStore>,
        authenticator: Arc<dyn Authenticator>,
        analytics: Arc<dyn AnalyticsConnector>,
    ) -> Self {
        Self {
            config,
            session,
            authenticator,
            analytics,
            dashboard: Arc::new(Mutex::new(None)),
        }
    }

    pub fn orchestrator_for(&self, session: &Session) -> DashboardOrchestrator {
        DashboardOrchestrator::new(
            self.analytics.connect(session),
            self.config.prediction_limit,
        )
    }

    /// 卸载当前仪表盘，未到达的结果会被丢弃
    pub async fn unmount_dashboard(&self) {
        if let Some(mount) = self.dashboard.lock().await.take() {
            tracing::debug!("Unmounting dashboard {}", mount.area().path());
            mount.unmount();
        }
    }
}
