// 仪表盘模块
// 包含视图模型和数据编排

mod orchestrator;
mod view_model;

pub use orchestrator::{
    DashboardMount, DashboardOrchestrator, OVERVIEW_FAILED_MESSAGE, SALARY_TOP_N,
    wait_until_settled,
};
pub use view_model::{DashboardViewModel, Notification, NotificationLevel};
