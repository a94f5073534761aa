//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，所有对 window.history 的操作都集中在此模块。
//! 每次导航都走"解析 -> 守卫 -> 提交"流程，守卫执行完毕后才会写入 History。

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::guard::{SessionSnapshot, resolve_navigation};
use super::route::RouteMatch;
use crate::views::ViewRegistry;

/// 获取当前浏览器地址（路径 + 查询串）
fn current_location() -> String {
    web_sys::window()
        .map(|w| {
            let location = w.location();
            let path = location.pathname().unwrap_or_else(|_| "/".to_string());
            let search = location.search().unwrap_or_default();
            format!("{}{}", path, search)
        })
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态
fn push_history_state(href: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(href));
        }
    }
}

/// 替换 History 状态（用于重定向）
fn replace_history_state(href: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(href));
        }
    }
}

/// History 写入方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HistoryMode {
    Push,
    Replace,
    /// 浏览器已经更新了地址（popstate），仅在重定向时改写
    Keep,
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 会话标记以信号形式注入，守卫读取的是它的快照而不是浏览器存储。
#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: ReadSignal<RouteMatch>,
    set_route: WriteSignal<RouteMatch>,
    session: Signal<Option<String>>,
}

impl RouterService {
    fn new(session: Signal<Option<String>>) -> Self {
        // 初始地址同样经过守卫
        let snapshot = SessionSnapshot(session.get_untracked());
        let resolved = resolve_navigation(&current_location(), None, &snapshot);
        if resolved.redirected {
            replace_history_state(&resolved.route.href());
        }
        let (current_route, set_route) = signal(resolved.route);

        Self {
            current_route,
            set_route,
            session,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<RouteMatch> {
        self.current_route
    }

    /// **核心方法：导航与守卫**
    pub fn navigate(&self, url: &str) {
        self.navigate_with(url, HistoryMode::Push);
    }

    /// 导航且不新增历史记录
    pub fn replace(&self, url: &str) {
        self.navigate_with(url, HistoryMode::Replace);
    }

    fn navigate_with(&self, url: &str, mode: HistoryMode) {
        let from = self.current_route.get_untracked();
        let snapshot = SessionSnapshot(self.session.get_untracked());
        let resolved = resolve_navigation(url, Some(&from), &snapshot);
        let href = resolved.route.href();

        match mode {
            HistoryMode::Push => push_history_state(&href),
            HistoryMode::Replace => replace_history_state(&href),
            HistoryMode::Keep if resolved.redirected => replace_history_state(&href),
            HistoryMode::Keep => {}
        }

        tracing::debug!(from = %from, to = %href, redirected = resolved.redirected, "navigate");
        self.set_route.set(resolved.route);
    }

    /// 浏览器后退/前进按钮同样执行守卫
    fn init_popstate_listener(&self) {
        let router = *self;
        let closure = Closure::<dyn Fn()>::new(move || {
            router.navigate_with(&current_location(), HistoryMode::Keep);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 会话被清除（登出）时重新对当前路由执行守卫
    fn setup_session_watch(&self) {
        let router = *self;
        let session = self.session;

        Effect::new(move |_| {
            let signed_in = session.get().is_some_and(|m| !m.is_empty());
            let route = router.current_route.get_untracked();
            if !signed_in && route.requires_auth() {
                tracing::info!(route = %route, "session cleared, re-running guard");
                router.navigate_with(&route.href(), HistoryMode::Replace);
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(session: Signal<Option<String>>) -> RouterService {
    let router = RouterService::new(session);

    router.init_popstate_listener();
    router.setup_session_watch();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 会话标记信号
    session: Signal<Option<String>>,
    children: Children,
) -> impl IntoView {
    provide_router(session);

    children()
}

/// 路由出口组件
///
/// 根据当前路由，从视图注册表中取出对应视图渲染。
#[component]
pub fn RouterOutlet(registry: ViewRegistry) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        registry.render_for(&current)
    }
}

/// 站内链接：拦截点击，交给路由服务导航
#[component]
pub fn Link(
    /// 目标路径
    #[prop(into)]
    to: String,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let target = to.clone();
    let on_click = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        router.navigate(&target);
    };

    view! {
        <a href=to class=class on:click=on_click>
            {children()}
        </a>
    }
}
