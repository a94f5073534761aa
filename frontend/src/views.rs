//! 视图注册表
//!
//! 每个路由名对应一个渲染函数，启动时构建一次。

use std::collections::HashMap;

use leptos::prelude::*;

use crate::components::dashboard::DashboardPage;
use crate::components::inventory_edit::InventoryEditPage;
use crate::components::inventory_list::InventoryListPage;
use crate::components::inventory_scan::InventoryScanPage;
use crate::components::login::LoginPage;
use crate::components::order_checker::OrderCheckerPage;
use crate::components::register::RegisterPage;
use crate::components::sales_create::SalesCreatePage;
use crate::components::sales_list::SalesListPage;
use crate::web::route::{RouteMatch, RouteParams, names};

/// 根据路由参数渲染视图
pub type RenderFn = fn(&RouteParams) -> AnyView;

#[derive(Clone)]
pub struct ViewRegistry {
    views: HashMap<&'static str, RenderFn>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self {
            views: HashMap::new(),
        }
    }

    pub fn register(mut self, name: &'static str, render: RenderFn) -> Self {
        self.views.insert(name, render);
        self
    }

    /// 渲染路由对应的视图，未注册的名称回退到 404
    pub fn render_for(&self, route: &RouteMatch) -> AnyView {
        match self.views.get(route.name()) {
            Some(render) => render(&route.params),
            None => not_found(&route.params),
        }
    }
}

impl Default for ViewRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// 应用的完整视图表
pub fn app_views() -> ViewRegistry {
    ViewRegistry::new()
        .register(names::LOGIN, |params| {
            let registered = params.query("registered").is_some();
            view! { <LoginPage registered=registered /> }.into_any()
        })
        .register(names::REGISTER, |_| view! { <RegisterPage /> }.into_any())
        .register(names::DASHBOARD, |_| view! { <DashboardPage /> }.into_any())
        .register(names::INVENTORY_LIST, |_| {
            view! { <InventoryListPage /> }.into_any()
        })
        .register(names::INVENTORY_ADD, |params| {
            let barcode = params.query("barcode").unwrap_or_default().to_string();
            view! { <InventoryEditPage id=None barcode=barcode /> }.into_any()
        })
        .register(names::INVENTORY_EDIT, |params| {
            let id = params.get("id").map(str::to_string);
            view! { <InventoryEditPage id=id barcode=String::new() /> }.into_any()
        })
        .register(names::INVENTORY_SCAN, |_| {
            view! { <InventoryScanPage /> }.into_any()
        })
        .register(names::SALES_LIST, |_| view! { <SalesListPage /> }.into_any())
        .register(names::SALES_CREATE, |_| {
            view! { <SalesCreatePage /> }.into_any()
        })
        .register(names::ORDER_CHECKER, |_| {
            view! { <OrderCheckerPage /> }.into_any()
        })
        .register(names::NOT_FOUND, not_found)
}

fn not_found(_params: &RouteParams) -> AnyView {
    view! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <div class="text-center">
                <h1 class="text-6xl font-bold text-error">"404"</h1>
                <p class="text-xl mt-4">"Page not found"</p>
                <a class="link link-primary mt-4 inline-block" href="/dashboard">"Back to dashboard"</a>
            </div>
        </div>
    }
    .into_any()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::route::ROUTES;

    #[test]
    fn every_renderable_route_has_a_view() {
        let registry = app_views();
        for entry in ROUTES.iter().filter(|e| e.redirect.is_none()) {
            assert!(registry.views.contains_key(entry.name), "missing view for {}", entry.name);
        }
        assert!(registry.views.contains_key(names::NOT_FOUND));
    }
}
