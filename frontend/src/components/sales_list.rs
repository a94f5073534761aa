use crate::api::InventoryApi;
use crate::components::layout::{AppShell, NotificationToast, Spinner};
use crate::web::router::Link;
use leptos::prelude::*;
use leptos::task::spawn_local;
use multi_inventory_shared::orders::{FulfillmentProgress, sort_newest_first};
use multi_inventory_shared::{SalesOrder, format_price};

#[component]
pub fn SalesListPage() -> impl IntoView {
    let (orders, set_orders) = signal(Vec::<SalesOrder>::new());
    let (loading, set_loading) = signal(true);
    // 展开的订单及其明细（明细按需加载）
    let (expanded, set_expanded) = signal(Option::<i64>::None);
    let (detail, set_detail) = signal(Option::<SalesOrder>::None);
    let (notification, set_notification) = signal(Option::<(String, bool)>::None);

    spawn_local(async move {
        match InventoryApi::new().list_orders().await {
            Ok(mut data) => {
                sort_newest_first(&mut data);
                set_orders.set(data);
            }
            Err(e) => set_notification.set(Some((format!("Failed to load sales: {}", e), true))),
        }
        set_loading.set(false);
    });

    let toggle = move |id: i64| {
        if expanded.get_untracked() == Some(id) {
            set_expanded.set(None);
            return;
        }
        set_expanded.set(Some(id));
        set_detail.set(None);
        spawn_local(async move {
            match InventoryApi::new().get_order(id).await {
                // 用户可能已经展开了别的订单
                Ok(order) if expanded.get_untracked() == Some(id) => set_detail.set(Some(order)),
                Ok(_) => {}
                Err(e) => set_notification.set(Some((format!("Failed to load order #{}: {}", id, e), true))),
            }
        });
    };

    let detail_view = move || {
        detail.get().map(|order| {
            order
                .items
                .into_iter()
                .map(|line| {
                    let name = line
                        .item_name
                        .clone()
                        .unwrap_or_else(|| format!("Item #{}", line.item_id));
                    view! {
                        <tr class="text-sm">
                            <td>{name}</td>
                            <td>{line.quantity} " x " {format_price(line.price_at_sale)}</td>
                            <td class="text-right">{format_price(line.line_total())}</td>
                            <td>{if line.is_fulfilled { "fulfilled" } else { "pending" }}</td>
                        </tr>
                    }
                })
                .collect_view()
        })
    };

    let rows = move || {
        orders
            .get()
            .into_iter()
            .map(|order| {
                let id = order.id;
                let progress = FulfillmentProgress::of(&order);
                let is_open = move || expanded.get() == Some(id);
                view! {
                    <tr class="hover cursor-pointer" on:click=move |_| toggle(id)>
                        <td>"#" {id}</td>
                        <td>{order.created_at.format("%Y-%m-%d %H:%M").to_string()}</td>
                        <td><span class="badge badge-outline">{order.status.label()}</span></td>
                        <td>{format!("{}/{}", progress.fulfilled, progress.total)}</td>
                        <td class="text-right">{format_price(order.total_price)}</td>
                    </tr>
                    <Show when=is_open>
                        <tr>
                            <td colspan="5" class="bg-base-200">
                                <Show when=move || detail.with(|d| d.is_some()) fallback=|| view! { <Spinner /> }>
                                    <table class="table table-xs">
                                        <tbody>{detail_view}</tbody>
                                    </table>
                                </Show>
                            </td>
                        </tr>
                    </Show>
                }
            })
            .collect_view()
    };

    view! {
        <AppShell title="Sales">
            <NotificationToast notification=notification set_notification=set_notification />

            <div class="flex justify-end">
                <Link to="/sales/create" class="btn btn-primary">"New sale"</Link>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="overflow-x-auto w-full">
                    <table class="table w-full">
                        <thead>
                            <tr>
                                <th>"Order"</th>
                                <th>"Created"</th>
                                <th>"Status"</th>
                                <th>"Fulfilled"</th>
                                <th class="text-right">"Total"</th>
                            </tr>
                        </thead>
                        <tbody>
                            <Show when=move || !loading.get() && orders.with(|o| o.is_empty())>
                                <tr>
                                    <td colspan="5" class="text-center py-8 text-base-content/50">"No sales yet."</td>
                                </tr>
                            </Show>
                            {rows}
                        </tbody>
                    </table>
                </div>
                <Show when=move || loading.get()>
                    <Spinner />
                </Show>
            </div>
        </AppShell>
    }
}
