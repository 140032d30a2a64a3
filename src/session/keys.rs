/// 持久化用户槽位名
pub const USER_SLOT: &str = "user";

/// 持久化令牌槽位名
pub const TOKEN_SLOT: &str = "token";

/// 生成 Redis 中用户槽位的键
pub fn user_slot_key(namespace: &str) -> String {
    format!("{}:slot:{}", namespace, USER_SLOT)
}

/// 生成 Redis 中令牌槽位的键
pub fn token_slot_key(namespace: &str) -> String {
    format!("{}:slot:{}", namespace, TOKEN_SLOT)
}
