//! 区域导航授权
//!
//! 所有判断都是纯函数，每次导航都要用当前会话重新求值，不做缓存。

use serde::Serialize;

use crate::models::Role;
use crate::session::Session;

/// 控制台可导航区域
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Area {
    Public,
    Alumni,
    Admin,
    Employer,
}

impl Area {
    pub const ALL: [Area; 4] = [Area::Public, Area::Alumni, Area::Admin, Area::Employer];

    pub fn path(&self) -> &'static str {
        match self {
            Area::Public => "/",
            Area::Alumni => "/alumni",
            Area::Admin => "/admin",
            Area::Employer => "/employer",
        }
    }

    /// 进入该区域需要的角色，公共区域不需要
    pub fn required_role(&self) -> Option<Role> {
        match self {
            Area::Public => None,
            Area::Alumni => Some(Role::Alumni),
            Area::Admin => Some(Role::Admin),
            Area::Employer => Some(Role::Employer),
        }
    }

    pub fn for_role(role: Role) -> Area {
        match role {
            Role::Alumni => Area::Alumni,
            Role::Admin => Area::Admin,
            Role::Employer => Area::Employer,
        }
    }

    /// 把路径段解析为角色区域，未知的段返回 `None`
    pub fn from_segment(segment: &str) -> Option<Area> {
        segment.parse::<Role>().ok().map(Area::for_role)
    }
}

/// 授权结果，拒绝不是错误而是重定向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    DenyRedirect(Area),
}

impl Access {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Access::Allow)
    }
}

/// 仅当会话存在且角色一致时放行，其他情况一律重定向到公共区域
pub fn authorize(session: Option<&Session>, required: Role) -> Access {
    match session {
        Some(session) if session.user.role == required => Access::Allow,
        _ => Access::DenyRedirect(Area::Public),
    }
}

/// 按区域授权，公共区域总是放行
pub fn navigate(session: Option<&Session>, area: Area) -> Access {
    match area.required_role() {
        None => Access::Allow,
        Some(role) => authorize(session, role),
    }
}

/// 按原始角色标签授权，无法识别的标签按不匹配处理
pub fn authorize_tag(session: Option<&Session>, required: &str) -> Access {
    match required.parse::<Role>() {
        Ok(role) => authorize(session, role),
        Err(_) => Access::DenyRedirect(Area::Public),
    }
}

/// 登录后默认进入的区域
pub fn home_area(role: Role) -> Area {
    Area::for_role(role)
}
