use serde::Serialize;
use uuid::Uuid;

use crate::dashboard::DashboardViewModel;
use crate::gate::Area;
use crate::models::User;

/// 区域页面数据
#[derive(Debug, Serialize)]
pub struct AreaResponse {
    pub area: Area,
    /// 每次挂载生成新的标识，用于区分重新挂载
    pub mount_id: Uuid,
    pub user: User,
    pub view: DashboardViewModel,
}
