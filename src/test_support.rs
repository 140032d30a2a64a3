//! 测试用的桩协作方

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, oneshot};

use crate::client::{AnalyticsClient, AnalyticsConnector, Authenticator, ClientError};
use crate::models::{
    AnalyticsOverview, Credentials, DonorPrediction, MentorMatch, Role, SalaryByMajor, User,
};
use crate::session::Session;

struct Scripted<T> {
    result: Result<T, String>,
    gate: Mutex<Option<oneshot::Receiver<()>>>,
}

impl<T: Clone> Scripted<T> {
    fn ok(value: T) -> Self {
        Self {
            result: Ok(value),
            gate: Mutex::new(None),
        }
    }

    fn hold(&mut self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.gate.get_mut() = Some(rx);
        tx
    }

    async fn settle(&self) -> Result<T, ClientError> {
        let gate = self.gate.lock().await.take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        self.result.clone().map_err(|body| ClientError::Status { status: 500, body })
    }
}

/// 可编排结果和完成时机的分析服务桩
///
/// `hold_*` 返回的发送端被触发或丢弃之前，对应请求不会完成。
pub struct StubAnalytics {
    overview: Scripted<AnalyticsOverview>,
    salary: Scripted<Vec<SalaryByMajor>>,
    donors: Scripted<Vec<DonorPrediction>>,
    mentors: Scripted<Vec<MentorMatch>>,
    calls: Mutex<Vec<String>>,
}

impl Default for StubAnalytics {
    fn default() -> Self {
        Self::new()
    }
}

impl StubAnalytics {
    pub fn new() -> Self {
        Self {
            overview: Scripted::ok(AnalyticsOverview::default()),
            salary: Scripted::ok(Vec::new()),
            donors: Scripted::ok(Vec::new()),
            mentors: Scripted::ok(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_overview(mut self, overview: AnalyticsOverview) -> Self {
        self.overview.result = Ok(overview);
        self
    }

    pub fn with_salary(mut self, rows: Vec<SalaryByMajor>) -> Self {
        self.salary.result = Ok(rows);
        self
    }

    pub fn with_donors(mut self, donors: Vec<DonorPrediction>) -> Self {
        self.donors.result = Ok(donors);
        self
    }

    pub fn with_mentors(mut self, mentors: Vec<MentorMatch>) -> Self {
        self.mentors.result = Ok(mentors);
        self
    }

    pub fn failing_overview(mut self) -> Self {
        self.overview.result = Err("overview unavailable".into());
        self
    }

    pub fn failing_salary(mut self) -> Self {
        self.salary.result = Err("salary unavailable".into());
        self
    }

    pub fn failing_donors(mut self) -> Self {
        self.donors.result = Err("donor model unavailable".into());
        self
    }

    pub fn failing_mentors(mut self) -> Self {
        self.mentors.result = Err("mentor model unavailable".into());
        self
    }

    pub fn hold_overview(&mut self) -> oneshot::Sender<()> {
        self.overview.hold()
    }

    pub fn hold_salary(&mut self) -> oneshot::Sender<()> {
        self.salary.hold()
    }

    pub fn hold_donors(&mut self) -> oneshot::Sender<()> {
        self.donors.hold()
    }

    pub fn hold_mentors(&mut self) -> oneshot::Sender<()> {
        self.mentors.hold()
    }

    /// 已发起的请求，按发起顺序记录
    pub async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }

    async fn record(&self, call: String) {
        self.calls.lock().await.push(call);
    }
}

#[async_trait]
impl AnalyticsClient for StubAnalytics {
    async fn overview(&self) -> Result<AnalyticsOverview, ClientError> {
        self.record("overview".into()).await;
        self.overview.settle().await
    }

    async fn salary_distribution(&self) -> Result<Vec<SalaryByMajor>, ClientError> {
        self.record("salary_distribution".into()).await;
        self.salary.settle().await
    }

    async fn top_donors(&self, limit: u32) -> Result<Vec<DonorPrediction>, ClientError> {
        self.record(format!("top_donors?limit={limit}")).await;
        self.donors.settle().await
    }

    async fn mentor_matches(&self, limit: u32) -> Result<Vec<MentorMatch>, ClientError> {
        self.record(format!("mentor_matches?limit={limit}")).await;
        self.mentors.settle().await
    }
}

/// 始终返回同一个桩客户端，并记录每次连接使用的令牌
pub struct StubConnector {
    client: Arc<StubAnalytics>,
    tokens: std::sync::Mutex<Vec<String>>,
}

impl StubConnector {
    pub fn new(client: Arc<StubAnalytics>) -> Self {
        Self {
            client,
            tokens: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn tokens(&self) -> Vec<String> {
        self.tokens
            .lock()
            .map(|tokens| tokens.clone())
            .unwrap_or_default()
    }
}

impl AnalyticsConnector for StubConnector {
    fn connect(&self, session: &Session) -> Arc<dyn AnalyticsClient> {
        if let Ok(mut tokens) = self.tokens.lock() {
            tokens.push(session.token.clone());
        }
        self.client.clone()
    }
}

/// 只认识预先登记账户的认证服务桩
#[derive(Default)]
pub struct StubAuthenticator {
    accounts: Vec<(Credentials, User, String)>,
    unavailable: bool,
}

impl StubAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(mut self, password: &str, user: User, token: &str) -> Self {
        let credentials = Credentials {
            email: user.email.clone(),
            password: password.to_string(),
        };
        self.accounts.push((credentials, user, token.to_string()));
        self
    }

    /// 模拟认证服务不可达
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }
}

#[async_trait]
impl Authenticator for StubAuthenticator {
    async fn login(&self, credentials: &Credentials) -> Result<(User, String), ClientError> {
        if self.unavailable {
            return Err(ClientError::Status {
                status: 503,
                body: "auth service down".into(),
            });
        }
        self.accounts
            .iter()
            .find(|(known, _, _)| {
                known.email == credentials.email && known.password == credentials.password
            })
            .map(|(_, user, token)| (user.clone(), token.clone()))
            .ok_or(ClientError::Rejected)
    }
}

pub fn user(role: Role, full_name: &str) -> User {
    User {
        id: format!("{}-1", role),
        full_name: full_name.to_string(),
        email: format!("{}@example.edu", role),
        role,
    }
}

pub fn salary_rows(count: usize) -> Vec<SalaryByMajor> {
    (0..count)
        .map(|i| SalaryByMajor {
            major: format!("Major {i}"),
            // 故意不按薪资排序
            avg_salary: 50_000.0 + ((i * 7919) % 13) as f64 * 1_000.0,
        })
        .collect()
}

pub fn donors(count: usize) -> Vec<DonorPrediction> {
    (0..count)
        .map(|i| DonorPrediction {
            full_name: format!("Donor {i}"),
            email: format!("donor{i}@example.edu"),
            current_company: "Acme".into(),
            donor_score: 95.5 - i as f64,
        })
        .collect()
}

pub fn mentors(count: usize) -> Vec<MentorMatch> {
    (0..count)
        .map(|i| MentorMatch {
            full_name: format!("Mentor {i}"),
            industry: "Technology".into(),
            years_since_grad: 5 + i as i32,
            match_score: 0.9 - i as f64 * 0.05,
        })
        .collect()
}
