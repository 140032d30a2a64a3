mod analytics;
mod user;

pub use analytics::{
    AnalyticsOverview, DonationStats, DonorPrediction, EngagementStats, GraduationTrend,
    IndustryCount, MentorMatch, MentorshipStats, SalaryByMajor,
};
pub use user::{Credentials, Role, UnknownRole, User};
