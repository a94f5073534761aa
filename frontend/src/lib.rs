//! Multi Inventory 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route`: 路由表（领域模型）
//! - `web::guard`: 导航守卫（纯函数，不接触 DOM）
//! - `web::router`: 路由服务（核心引擎）
//! - `views`: 路由名到视图的注册表
//! - `auth`: 认证状态管理
//! - `components`: UI 组件层

mod api;
mod auth;
mod config;
mod forms;
mod views;
mod components {
    pub mod dashboard;
    pub mod inventory_edit;
    pub mod inventory_list;
    pub mod inventory_scan;
    pub mod layout;
    pub mod login;
    pub mod order_checker;
    pub mod register;
    pub mod sales_create;
    pub mod sales_list;
}

use crate::auth::{AuthContext, init_auth};
use crate::views::app_views;

use leptos::prelude::*;

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装，替代 gloo-* 系列 crate，
// 以减小 WASM 二进制体积。
pub(crate) mod web {
    pub mod guard;
    mod http;
    pub mod route;
    pub mod router;
    mod storage;

    pub use http::{HttpError, HttpRequestBuilder};
    pub use storage::LocalStorage;
}

use web::router::{Router, RouterOutlet};

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建认证上下文
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);

    // 2. 初始化认证状态（从 LocalStorage 恢复会话标记）
    init_auth(&auth_ctx);

    // 3. 会话标记信号注入路由服务，路由层不直接依赖认证模块
    let session = auth_ctx.session_signal();

    view! {
        <Router session=session>
            <RouterOutlet registry=app_views() />
        </Router>
    }
}
