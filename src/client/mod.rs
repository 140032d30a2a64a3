//! 远程分析 / 预测服务的调用接口

mod http;

use std::sync::Arc;

use async_trait::async_trait;

pub use http::HttpAnalyticsClient;

use crate::models::{
    AnalyticsOverview, Credentials, DonorPrediction, MentorMatch, SalaryByMajor, User,
};
use crate::session::Session;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid response payload: {0}")]
    Decode(String),
    #[error("credentials rejected")]
    Rejected,
}

/// 四个只读分析端点
#[async_trait]
pub trait AnalyticsClient: Send + Sync {
    async fn overview(&self) -> Result<AnalyticsOverview, ClientError>;

    async fn salary_distribution(&self) -> Result<Vec<SalaryByMajor>, ClientError>;

    async fn top_donors(&self, limit: u32) -> Result<Vec<DonorPrediction>, ClientError>;

    async fn mentor_matches(&self, limit: u32) -> Result<Vec<MentorMatch>, ClientError>;
}

/// 登录认证服务
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// 成功时返回用户和令牌，凭据错误返回 [`ClientError::Rejected`]
    async fn login(&self, credentials: &Credentials) -> Result<(User, String), ClientError>;
}

/// 为某个会话创建分析客户端
pub trait AnalyticsConnector: Send + Sync {
    fn connect(&self, session: &Session) -> Arc<dyn AnalyticsClient>;
}
