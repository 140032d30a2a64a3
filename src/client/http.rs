use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::{AnalyticsClient, AnalyticsConnector, Authenticator, ClientError};
use crate::models::{
    AnalyticsOverview, Credentials, DonorPrediction, MentorMatch, SalaryByMajor, User,
};
use crate::session::Session;

const USER_AGENT: &str = concat!("alumni-console/", env!("CARGO_PKG_VERSION"));

/// 基于 reqwest 的后端客户端
///
/// 只负责请求构造、状态码映射和 JSON 解码，超时由 reqwest 客户端控制。
#[derive(Clone)]
pub struct HttpAnalyticsClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Deserialize)]
struct LoginPayload {
    user: User,
    token: String,
}

impl HttpAnalyticsClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// 携带会话令牌的副本，底层连接池共享
    pub fn with_token(&self, token: &str) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: Some(token.to_string()),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        let mut request = self
            .client
            .get(self.endpoint(path))
            .header(reqwest::header::ACCEPT, "application/json")
            .query(query);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(status_error(status, &body));
        }
        decode(&body)
    }
}

fn status_error(status: StatusCode, body: &[u8]) -> ClientError {
    ClientError::Status {
        status: status.as_u16(),
        body: String::from_utf8_lossy(body).chars().take(512).collect(),
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ClientError> {
    serde_json::from_slice(body).map_err(|e| ClientError::Decode(e.to_string()))
}

#[async_trait]
impl AnalyticsClient for HttpAnalyticsClient {
    async fn overview(&self) -> Result<AnalyticsOverview, ClientError> {
        self.get_json("analytics/overview", &[]).await
    }

    async fn salary_distribution(&self) -> Result<Vec<SalaryByMajor>, ClientError> {
        self.get_json("analytics/salary-distribution", &[]).await
    }

    async fn top_donors(&self, limit: u32) -> Result<Vec<DonorPrediction>, ClientError> {
        self.get_json("predictions/top-donors", &[("limit", limit.to_string())])
            .await
    }

    async fn mentor_matches(&self, limit: u32) -> Result<Vec<MentorMatch>, ClientError> {
        self.get_json("predictions/mentor-matches", &[("limit", limit.to_string())])
            .await
    }
}

#[async_trait]
impl Authenticator for HttpAnalyticsClient {
    async fn login(&self, credentials: &Credentials) -> Result<(User, String), ClientError> {
        let response = self
            .client
            .post(self.endpoint("auth/login"))
            .json(credentials)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        match status {
            s if s.is_success() => {
                let payload: LoginPayload = decode(&body)?;
                Ok((payload.user, payload.token))
            }
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(ClientError::Rejected)
            }
            s => Err(status_error(s, &body)),
        }
    }
}

impl AnalyticsConnector for HttpAnalyticsClient {
    fn connect(&self, session: &Session) -> Arc<dyn AnalyticsClient> {
        Arc::new(self.with_token(&session.token))
    }
}
