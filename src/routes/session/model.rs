use serde::{Deserialize, Serialize};

use crate::gate::Area;
use crate::models::User;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: User,
    /// 登录后应跳转的区域路径
    pub redirect: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub user: Option<User>,
}

#[derive(Debug, Serialize)]
pub struct AreaLink {
    pub area: Area,
    pub path: &'static str,
    pub allowed: bool,
}

#[derive(Debug, Serialize)]
pub struct LandingResponse {
    pub user: Option<User>,
    pub areas: Vec<AreaLink>,
}
