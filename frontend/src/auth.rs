//! 认证模块
//!
//! 管理会话状态，与路由系统解耦。
//! 路由服务通过注入的认证信号来检查认证状态。
//! 凭据本身是服务端的 HttpOnly Cookie，客户端只持有镜像的用户身份。

use crate::api::{ApiError, MediMindApi};
use gloo_storage::{LocalStorage, Storage};
use leptos::prelude::*;
use leptos::task::spawn_local;
use medimind_shared::SessionUser;

const STORAGE_EMAIL_KEY: &str = "medimind_email";

/// 认证状态
///
/// `session` 为 `Some` 即已认证，不存在半认证的中间状态。
#[derive(Clone, Default, PartialEq)]
pub struct AuthState {
    /// 当前会话（仅在认证成功后存在）
    pub session: Option<SessionUser>,
    /// 启动恢复是否仍在进行
    pub is_loading: bool,
    /// 上次登录使用的邮箱（仅用于表单自动填充，不存密码）
    pub last_email: String,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.user_id.as_str())
    }

    fn install(&mut self, session: SessionUser) {
        self.last_email = session.email.clone();
        self.session = Some(session);
        self.is_loading = false;
    }

    fn clear(&mut self) {
        self.session = None;
        self.is_loading = false;
        // 保留 last_email 方便下次登录
    }
}

/// 认证上下文
///
/// 包含读写信号，通过 Context 在组件间共享。
/// 会话只有这里的 mutator 可以写入，其余组件只读。
#[derive(Clone, Copy)]
pub struct AuthContext {
    pub state: ReadSignal<AuthState>,
    pub set_state: WriteSignal<AuthState>,
}

impl AuthContext {
    /// 创建新的认证上下文，初始为"恢复中"
    pub fn new() -> Self {
        let (state, set_state) = signal(AuthState {
            is_loading: true,
            ..AuthState::default()
        });
        Self { state, set_state }
    }

    /// 获取认证状态信号（用于路由服务注入）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.get().is_authenticated())
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 初始化认证状态
///
/// 尝试用环境 Cookie 恢复会话（`GET /auth/me`）；
/// Cookie 不存在或已失效则落到未认证，不视为瞬时故障。
pub fn init_auth(ctx: &AuthContext) {
    let set_state = ctx.set_state;

    if let Ok(email) = LocalStorage::get::<String>(STORAGE_EMAIL_KEY) {
        set_state.update(|state| state.last_email = email);
    }

    let api = MediMindApi::from_env();
    spawn_local(async move {
        match api.me().await {
            Ok(session) => set_state.update(|state| state.install(session)),
            Err(_) => set_state.update(|state| state.clear()),
        }
    });
}

/// 登录并保存状态
pub async fn login(ctx: &AuthContext, email: String, password: String) -> Result<(), ApiError> {
    let api = MediMindApi::from_env();
    let session = api.login(&email, &password).await?;

    // 只记住邮箱方便下次自动填充，绝不保存密码
    let _ = LocalStorage::set(STORAGE_EMAIL_KEY, &session.email);

    ctx.set_state.update(|state| state.install(session));
    Ok(())
}

/// 注册，成功后的处理与登录一致
pub async fn signup(
    ctx: &AuthContext,
    email: String,
    password: String,
    full_name: Option<String>,
) -> Result<(), ApiError> {
    let api = MediMindApi::from_env();
    let session = api.signup(&email, &password, full_name).await?;

    let _ = LocalStorage::set(STORAGE_EMAIL_KEY, &session.email);

    ctx.set_state.update(|state| state.install(session));
    Ok(())
}

/// 注销并清除状态
///
/// 本地状态无条件清除；远端调用尽力而为，失败被吞掉。
/// 导航由路由服务的认证状态监听自动处理。
pub fn logout(ctx: &AuthContext) {
    ctx.set_state.update(|state| state.clear());

    let api = MediMindApi::from_env();
    spawn_local(async move {
        let _ = api.logout().await;
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(user_id: &str, email: &str) -> SessionUser {
        SessionUser {
            user_id: user_id.to_string(),
            email: email.to_string(),
            full_name: None,
        }
    }

    #[test]
    fn install_moves_to_authenticated() {
        let mut state = AuthState {
            is_loading: true,
            ..AuthState::default()
        };
        state.install(session("u1", "a@b.com"));

        assert!(state.is_authenticated());
        assert_eq!(state.user_id(), Some("u1"));
        assert!(!state.is_loading);
        assert_eq!(state.last_email, "a@b.com");
    }

    #[test]
    fn clear_moves_to_unauthenticated_but_keeps_email() {
        let mut state = AuthState::default();
        state.install(session("u1", "a@b.com"));
        state.clear();

        assert!(!state.is_authenticated());
        assert_eq!(state.user_id(), None);
        assert_eq!(state.last_email, "a@b.com");
    }

    #[test]
    fn session_is_all_or_nothing() {
        // 未认证时不暴露任何身份字段
        let state = AuthState::default();
        assert_eq!(state.user_id(), None);
        assert!(state.session.is_none());
    }
}
