//! 核单
//!
//! 列出待处理订单，逐行勾选已拣货的商品。扫码时自动勾选该商品第一条未完成的行。
//! 页面存活期间定时刷新订单列表。

use std::time::Duration;

use crate::api::InventoryApi;
use crate::components::layout::{AppShell, NotificationToast, Spinner};
use crate::config::ORDER_REFRESH_INTERVAL_MS;
use leptos::prelude::*;
use leptos::task::spawn_local;
use multi_inventory_shared::orders::{
    FulfillmentProgress, claim_line, mark_line, pending_orders, sort_newest_first,
};
use multi_inventory_shared::stock::find_by_barcode;
use multi_inventory_shared::{Item, SalesOrder, format_price};

#[component]
pub fn OrderCheckerPage() -> impl IntoView {
    let (orders, set_orders) = signal(Vec::<SalesOrder>::new());
    let (items, set_items) = signal(Vec::<Item>::new());
    let (selected, set_selected) = signal(Option::<i64>::None);
    let (loading, set_loading) = signal(true);
    let (code, set_code) = signal(String::new());
    let (notification, set_notification) = signal(Option::<(String, bool)>::None);

    let load_orders = move || {
        spawn_local(async move {
            match InventoryApi::new().list_orders().await {
                Ok(data) => {
                    let mut pending: Vec<SalesOrder> =
                        pending_orders(&data).into_iter().cloned().collect();
                    sort_newest_first(&mut pending);
                    // 选中的订单已不再待处理时取消选中
                    if let Some(id) = selected.get_untracked() {
                        if !pending.iter().any(|o| o.id == id) {
                            set_selected.set(None);
                        }
                    }
                    set_orders.set(pending);
                }
                Err(e) => set_notification.set(Some((format!("Failed to load orders: {}", e), true))),
            }
            set_loading.set(false);
        });
    };

    load_orders();
    spawn_local(async move {
        match InventoryApi::new().list_items().await {
            Ok(data) => set_items.set(data),
            Err(e) => set_notification.set(Some((format!("Failed to load inventory: {}", e), true))),
        }
    });

    match set_interval_with_handle(load_orders, Duration::from_millis(ORDER_REFRESH_INTERVAL_MS)) {
        Ok(handle) => on_cleanup(move || handle.clear()),
        Err(e) => tracing::warn!(?e, "failed to start order refresh"),
    }

    let current = Memo::new(move |_| {
        let id = selected.get()?;
        orders.with(|list| list.iter().find(|o| o.id == id).cloned())
    });

    // 本地副本先更新，请求失败时撤销
    let revert_on_error = move |order_id: i64, line_id: i64, is_fulfilled: bool| {
        spawn_local(async move {
            if let Err(e) = InventoryApi::new().set_fulfillment(line_id, is_fulfilled).await {
                set_orders.update(|list| {
                    if let Some(order) = list.iter_mut().find(|o| o.id == order_id) {
                        mark_line(order, line_id, !is_fulfilled);
                    }
                });
                set_notification.set(Some((format!("Failed to update line: {}", e), true)));
            }
        });
    };

    let set_line = move |order_id: i64, line_id: i64, is_fulfilled: bool| {
        set_orders.update(|list| {
            if let Some(order) = list.iter_mut().find(|o| o.id == order_id) {
                mark_line(order, line_id, is_fulfilled);
            }
        });
        revert_on_error(order_id, line_id, is_fulfilled);
    };

    let on_scan = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let scanned = code.get_untracked().trim().to_string();
        set_code.set(String::new());
        if scanned.is_empty() {
            return;
        }
        let Some(order_id) = current.with_untracked(|c| c.as_ref().map(|o| o.id)) else {
            set_notification.set(Some(("Select an order first".to_string(), true)));
            return;
        };
        let Some(item) = items.with_untracked(|all| find_by_barcode(all, &scanned).cloned()) else {
            set_notification.set(Some((format!("Unknown barcode {}", scanned), true)));
            return;
        };
        // 连续扫码时每次都基于最新的本地副本选行
        let mut claimed = None;
        set_orders.update(|list| {
            if let Some(order) = list.iter_mut().find(|o| o.id == order_id) {
                claimed = claim_line(order, item.id);
            }
        });
        match claimed {
            Some(line_id) => {
                set_notification.set(Some((format!("Checked {}", item.name), false)));
                revert_on_error(order_id, line_id, true);
            }
            None => set_notification.set(Some((
                format!("{} is not outstanding on order #{}", item.name, order_id),
                true,
            ))),
        }
    };

    let order_rows = move || {
        orders
            .get()
            .into_iter()
            .map(|order| {
                let id = order.id;
                let progress = FulfillmentProgress::of(&order);
                view! {
                    <li>
                        <a
                            class:active=move || selected.get() == Some(id)
                            on:click=move |_| set_selected.set(Some(id))
                        >
                            <span>"#" {id}</span>
                            <span class="text-xs opacity-70">
                                {order.created_at.format("%H:%M").to_string()}
                            </span>
                            <span class="badge badge-sm" class:badge-success=progress.is_complete()>
                                {format!("{}/{}", progress.fulfilled, progress.total)}
                            </span>
                        </a>
                    </li>
                }
            })
            .collect_view()
    };

    let line_rows = move || {
        current.get().map(|order| {
            let order_id = order.id;
            order
                .items
                .into_iter()
                .map(|line| {
                    let line_id = line.id;
                    let name = line
                        .item_name
                        .clone()
                        .unwrap_or_else(|| format!("Item #{}", line.item_id));
                    view! {
                        <tr class:opacity-50=line.is_fulfilled>
                            <td>
                                <input
                                    type="checkbox"
                                    class="checkbox checkbox-success"
                                    prop:checked=line.is_fulfilled
                                    on:change=move |ev| set_line(order_id, line_id, event_target_checked(&ev))
                                />
                            </td>
                            <td>{name}</td>
                            <td>{line.quantity}</td>
                            <td class="text-right">{format_price(line.price_at_sale)}</td>
                        </tr>
                    }
                })
                .collect_view()
        })
    };

    view! {
        <AppShell title="Order checker">
            <NotificationToast notification=notification set_notification=set_notification />

            <Show when=move || !loading.get() fallback=|| view! { <Spinner /> }>
                <div class="grid md:grid-cols-3 gap-6">
                    <div class="card bg-base-100 shadow-xl">
                        <div class="card-body p-2">
                            <h3 class="card-title px-2">"Pending"</h3>
                            <Show
                                when=move || orders.with(|o| !o.is_empty())
                                fallback=|| view! { <p class="p-2 text-base-content/50">"No pending orders."</p> }
                            >
                                <ul class="menu">{order_rows}</ul>
                            </Show>
                        </div>
                    </div>

                    <div class="card bg-base-100 shadow-xl md:col-span-2">
                        <div class="card-body">
                            <form class="flex gap-2" on:submit=on_scan>
                                <input
                                    type="text"
                                    autofocus
                                    placeholder="Scan an item to check it off"
                                    class="input input-bordered flex-1 font-mono"
                                    on:input=move |ev| set_code.set(event_target_value(&ev))
                                    prop:value=code
                                />
                                <button class="btn btn-primary">"Check"</button>
                            </form>
                            <Show
                                when=move || current.with(|c| c.is_some())
                                fallback=|| view! { <p class="text-base-content/50">"Select an order to check."</p> }
                            >
                                <table class="table">
                                    <thead>
                                        <tr><th></th><th>"Item"</th><th>"Qty"</th><th class="text-right">"Price"</th></tr>
                                    </thead>
                                    <tbody>{line_rows}</tbody>
                                </table>
                            </Show>
                        </div>
                    </div>
                </div>
            </Show>
        </AppShell>
    }
}
