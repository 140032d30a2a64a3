use serde::{Deserialize, Serialize};

/// 行业分布条目
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IndustryCount {
    pub name: String,
    pub count: u64,
}

/// 毕业年份趋势条目
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GraduationTrend {
    pub year: i32,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngagementStats {
    pub avg_events: f64,
    pub avg_engagement: f64,
    pub high_engagement: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MentorshipStats {
    pub total_mentors: u64,
    pub interested_mentors: u64,
    pub mentees: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DonationStats {
    pub total_donations: f64,
    pub donors_count: u64,
    pub predicted_donations: f64,
}

/// 分析总览快照，每次挂载仪表盘时重新获取
///
/// 缺失字段取默认值，渲染层对缺失数据同样按零值处理。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsOverview {
    pub total_alumni: u64,
    pub active_alumni: u64,
    pub avg_salary: f64,
    pub top_industries: Vec<IndustryCount>,
    pub graduation_trends: Vec<GraduationTrend>,
    pub engagement_stats: EngagementStats,
    pub mentorship_stats: MentorshipStats,
    pub donation_stats: DonationStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryByMajor {
    pub major: String,
    pub avg_salary: f64,
}

/// 捐赠预测，分数保留原始精度
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonorPrediction {
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub current_company: String,
    pub donor_score: f64,
}

impl DonorPrediction {
    /// 展示用的取整分数
    pub fn display_score(&self) -> i64 {
        self.donor_score.round() as i64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MentorMatch {
    pub full_name: String,
    #[serde(default)]
    pub industry: String,
    pub years_since_grad: i32,
    /// 取值范围 [0, 1]
    pub match_score: f64,
}

impl MentorMatch {
    pub fn match_percent(&self) -> i64 {
        (self.match_score * 100.0).round() as i64
    }
}
