//! 认证模块
//!
//! 管理用户会话状态，与路由系统解耦。
//! LocalStorage 中的 `user` 键是会话标记；路由服务只拿到它的信号。

use crate::api::{ApiError, InventoryApi};
use crate::forms::{validate_login, validate_registration};
use crate::web::LocalStorage;
use crate::web::guard::SessionSource;
use leptos::prelude::*;
use multi_inventory_shared::{STORAGE_TOKEN_KEY, STORAGE_USER_KEY, User};

/// 认证状态
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthState {
    /// 会话标记原文（存在即已登录）
    pub marker: Option<String>,
    /// 解析出的用户；旧版本或手工写入的标记可能无法解析
    pub user: Option<User>,
}

impl AuthState {
    fn from_marker(marker: Option<String>) -> Self {
        let marker = marker.filter(|m| !m.is_empty());
        let user = marker
            .as_deref()
            .and_then(|m| serde_json::from_str::<User>(m).ok());
        Self { marker, user }
    }

    pub fn is_authenticated(&self) -> bool {
        self.marker.is_some()
    }

    pub fn display_name(&self) -> String {
        self.user
            .as_ref()
            .map(|u| u.username.clone())
            .unwrap_or_else(|| "user".to_string())
    }

    pub fn user_id(&self) -> Option<String> {
        self.user.as_ref().map(|u| u.id.clone())
    }
}

/// 认证上下文
///
/// 包含读写信号，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    pub state: ReadSignal<AuthState>,
    pub set_state: WriteSignal<AuthState>,
}

impl AuthContext {
    pub fn new() -> Self {
        let (state, set_state) = signal(AuthState::default());
        Self { state, set_state }
    }

    /// 会话标记信号（用于路由服务注入）
    pub fn session_signal(&self) -> Signal<Option<String>> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.marker.clone()))
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 初始化认证状态：从 LocalStorage 恢复会话标记
pub fn init_auth(ctx: &AuthContext) {
    let state = AuthState::from_marker(LocalStorage.session_marker());
    if state.is_authenticated() {
        tracing::info!(user = %state.display_name(), "session restored");
    }
    ctx.set_state.set(state);
}

/// 登录失败时给用户看的信息
pub fn login_error_message(err: &ApiError) -> String {
    match err.status() {
        Some(401) => "Invalid credentials".to_string(),
        Some(_) => err.to_string(),
        None => "Unable to reach the server".to_string(),
    }
}

/// 登录并写入会话标记
pub async fn login(ctx: &AuthContext, username: String, password: String) -> Result<User, String> {
    let credentials = validate_login(&username, &password).map_err(|e| e.to_string())?;
    let response = InventoryApi::new()
        .login(credentials)
        .await
        .map_err(|e| login_error_message(&e))?;

    let marker = serde_json::to_string(&response.user).map_err(|e| e.to_string())?;
    if !LocalStorage::set(STORAGE_USER_KEY, &marker) {
        tracing::warn!("local storage unavailable, session will not survive a reload");
    }
    LocalStorage::set(STORAGE_TOKEN_KEY, &response.token);

    tracing::info!(user = %response.user.username, "logged in");
    ctx.set_state.set(AuthState::from_marker(Some(marker)));
    Ok(response.user)
}

/// 注册新用户（不自动登录）
pub async fn register(username: String, password: String, confirm: String) -> Result<User, String> {
    let credentials =
        validate_registration(&username, &password, &confirm).map_err(|e| e.to_string())?;
    let response = InventoryApi::new()
        .register(credentials)
        .await
        .map_err(|e| match e.status() {
            Some(_) => e.to_string(),
            None => "Unable to reach the server".to_string(),
        })?;
    tracing::info!(user = %response.user.username, "registered");
    Ok(response.user)
}

/// 注销并清除状态
///
/// 导航将由路由服务的会话监听自动处理。
pub fn logout(ctx: &AuthContext) {
    LocalStorage::delete(STORAGE_USER_KEY);
    LocalStorage::delete(STORAGE_TOKEN_KEY);
    ctx.set_state.set(AuthState::default());
    tracing::info!("logged out");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_with_user_json_is_parsed() {
        let state = AuthState::from_marker(Some(r#"{"id":"u-1","username":"ana","role":"user"}"#.to_string()));
        assert!(state.is_authenticated());
        assert_eq!(state.display_name(), "ana");
        assert_eq!(state.user_id().as_deref(), Some("u-1"));
    }

    #[test]
    fn opaque_marker_still_counts_as_signed_in() {
        let state = AuthState::from_marker(Some("true".to_string()));
        assert!(state.is_authenticated());
        assert_eq!(state.user, None);
        assert_eq!(state.display_name(), "user");
    }

    #[test]
    fn empty_or_missing_marker_is_signed_out() {
        assert!(!AuthState::from_marker(Some(String::new())).is_authenticated());
        assert!(!AuthState::from_marker(None).is_authenticated());
    }
}
