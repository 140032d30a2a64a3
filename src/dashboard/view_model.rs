use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{AnalyticsOverview, DonorPrediction, MentorMatch, SalaryByMajor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Error,
}

/// 展示给用户的瞬时提示
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

impl Notification {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
            raised_at: Utc::now(),
        }
    }
}

/// 仪表盘视图模型
///
/// 部分切片为空是正常的稳定状态。`loading` 只反映总览请求是否完成，
/// 不代表其他切片已经到达。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardViewModel {
    pub overview: Option<AnalyticsOverview>,
    pub salary_by_major: Vec<SalaryByMajor>,
    pub top_donors: Vec<DonorPrediction>,
    pub mentor_matches: Vec<MentorMatch>,
    pub loading: bool,
    pub notifications: Vec<Notification>,
}

impl DashboardViewModel {
    pub fn new() -> Self {
        Self {
            overview: None,
            salary_by_major: Vec::new(),
            top_donors: Vec::new(),
            mentor_matches: Vec::new(),
            loading: true,
            notifications: Vec::new(),
        }
    }

    /// 总览加载失败时渲染层使用的默认值
    pub fn overview_or_default(&self) -> AnalyticsOverview {
        self.overview.clone().unwrap_or_default()
    }
}

impl Default for DashboardViewModel {
    fn default() -> Self {
        Self::new()
    }
}
