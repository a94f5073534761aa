//! 受保护页面共用的外壳：导航栏、标题、通知条

use std::time::Duration;

use leptos::prelude::*;

use crate::auth::{logout, use_auth};
use crate::web::router::Link;

/// 通知消息：内容，是否出错
pub type Notification = Option<(String, bool)>;

const TOAST_DURATION: Duration = Duration::from_secs(3);

#[component]
pub fn AppShell(#[prop(into)] title: String, children: Children) -> impl IntoView {
    let auth = use_auth();
    // 导航由路由服务监听会话变化后完成
    let on_logout = move |_| logout(&auth);

    view! {
        <div class="min-h-screen bg-base-200 font-sans">
            <div class="navbar bg-base-100 shadow-sm px-4">
                <div class="flex-1">
                    <Link to="/dashboard" class="btn btn-ghost text-xl">"Multi Inventory"</Link>
                </div>
                <div class="flex-none flex items-center gap-1">
                    <Link to="/inventory" class="btn btn-ghost btn-sm">"Inventory"</Link>
                    <Link to="/inventory/scan" class="btn btn-ghost btn-sm">"Scan"</Link>
                    <Link to="/sales" class="btn btn-ghost btn-sm">"Sales"</Link>
                    <Link to="/order-checker" class="btn btn-ghost btn-sm">"Order checker"</Link>
                    <span class="text-sm text-base-content/70 px-2">
                        {move || auth.state.with(|s| s.display_name())}
                    </span>
                    <button class="btn btn-outline btn-sm" on:click=on_logout>"Logout"</button>
                </div>
            </div>
            <main class="max-w-5xl mx-auto p-4 md:p-8 space-y-6">
                <h1 class="text-2xl font-bold">{title}</h1>
                {children()}
            </main>
        </div>
    }
}

/// 通知提示框，3 秒后自动清除
#[component]
pub fn NotificationToast(
    notification: ReadSignal<Notification>,
    set_notification: WriteSignal<Notification>,
) -> impl IntoView {
    let pending = StoredValue::new(None::<TimeoutHandle>);
    // 新消息到来时取消上一条的计时
    let cancel_pending = move || {
        if let Some(handle) = pending.try_update_value(Option::take).flatten() {
            handle.clear();
        }
    };

    Effect::new(move |_| {
        let has_message = notification.with(Option::is_some);
        cancel_pending();
        if has_message {
            match set_timeout_with_handle(move || set_notification.set(None), TOAST_DURATION) {
                Ok(handle) => pending.set_value(Some(handle)),
                Err(e) => tracing::warn!(?e, "failed to schedule toast dismissal"),
            }
        }
    });
    on_cleanup(cancel_pending);

    move || {
        notification.get().map(|(message, is_err)| {
            let class = if is_err {
                "alert alert-error shadow-lg"
            } else {
                "alert alert-success shadow-lg"
            };
            view! {
                <div class="toast toast-top toast-end z-50">
                    <div class=class>
                        <span>{message}</span>
                    </div>
                </div>
            }
        })
    }
}

/// 加载中占位
#[component]
pub fn Spinner() -> impl IntoView {
    view! {
        <div class="flex justify-center py-10">
            <span class="loading loading-spinner loading-lg text-primary"></span>
        </div>
    }
}

/// 行内错误提示
#[component]
pub fn ErrorAlert(error: ReadSignal<Option<String>>) -> impl IntoView {
    move || {
        error.get().map(|message| {
            view! {
                <div role="alert" class="alert alert-error text-sm py-2">
                    <span>{message}</span>
                </div>
            }
        })
    }
}
