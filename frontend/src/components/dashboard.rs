use crate::api::InventoryApi;
use crate::components::layout::{AppShell, NotificationToast, Spinner};
use crate::web::router::Link;
use leptos::prelude::*;
use leptos::task::spawn_local;
use multi_inventory_shared::orders::{SalesSummary, sort_newest_first};
use multi_inventory_shared::stock::{InventorySummary, is_low_stock};
use multi_inventory_shared::{Item, SalesOrder, format_price};

/// 最近订单的展示条数
const RECENT_ORDERS: usize = 5;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let (items, set_items) = signal(Vec::<Item>::new());
    let (orders, set_orders) = signal(Vec::<SalesOrder>::new());
    let (loading, set_loading) = signal(true);
    let (notification, set_notification) = signal(Option::<(String, bool)>::None);

    let load = move || {
        set_loading.set(true);
        spawn_local(async move {
            let api = InventoryApi::new();
            match api.list_items().await {
                Ok(data) => set_items.set(data),
                Err(e) => set_notification.set(Some((format!("Failed to load inventory: {}", e), true))),
            }
            match api.list_orders().await {
                Ok(mut data) => {
                    sort_newest_first(&mut data);
                    set_orders.set(data);
                }
                Err(e) => set_notification.set(Some((format!("Failed to load sales: {}", e), true))),
            }
            set_loading.set(false);
        });
    };

    load();

    let stock = Memo::new(move |_| items.with(|i| InventorySummary::from_items(i)));
    let sales = Memo::new(move |_| orders.with(|o| SalesSummary::from_orders(o)));

    let low_stock_rows = move || {
        items
            .get()
            .into_iter()
            .filter(is_low_stock)
            .map(|item| {
                let href = format!("/inventory/edit/{}", item.id);
                view! {
                    <tr>
                        <td>{item.name}</td>
                        <td class="font-mono text-xs">{item.barcode}</td>
                        <td class="text-error font-semibold">{item.quantity}</td>
                        <td><Link to=href class="btn btn-xs btn-ghost">"Edit"</Link></td>
                    </tr>
                }
            })
            .collect_view()
    };

    let recent_rows = move || {
        orders
            .get()
            .into_iter()
            .take(RECENT_ORDERS)
            .map(|order| {
                view! {
                    <tr>
                        <td>"#" {order.id}</td>
                        <td>{order.created_at.format("%Y-%m-%d %H:%M").to_string()}</td>
                        <td><span class="badge badge-outline">{order.status.label()}</span></td>
                        <td class="text-right">{format_price(order.total_price)}</td>
                    </tr>
                }
            })
            .collect_view()
    };

    view! {
        <AppShell title="Dashboard">
            <NotificationToast notification=notification set_notification=set_notification />

            <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                <div class="stat">
                    <div class="stat-title">"Items"</div>
                    <div class="stat-value text-primary">{move || stock.get().distinct_items}</div>
                    <div class="stat-desc">{move || format!("{} units in stock", stock.get().total_units)}</div>
                </div>
                <div class="stat">
                    <div class="stat-title">"Low stock"</div>
                    <div class="stat-value text-error">{move || stock.get().low_stock}</div>
                    <div class="stat-desc">{move || format!("Stock value {}", format_price(stock.get().stock_value))}</div>
                </div>
                <div class="stat">
                    <div class="stat-title">"Orders"</div>
                    <div class="stat-value">{move || sales.get().orders}</div>
                    <div class="stat-desc">{move || format!("{} pending", sales.get().pending)}</div>
                </div>
                <div class="stat">
                    <div class="stat-title">"Revenue"</div>
                    <div class="stat-value text-success text-2xl">{move || format_price(sales.get().revenue)}</div>
                </div>
            </div>

            <Show when=move || !loading.get() fallback=|| view! { <Spinner /> }>
                <div class="grid md:grid-cols-2 gap-6">
                    <div class="card bg-base-100 shadow-xl">
                        <div class="card-body">
                            <h3 class="card-title">"Low stock"</h3>
                            <table class="table table-sm">
                                <thead>
                                    <tr><th>"Name"</th><th>"Barcode"</th><th>"Qty"</th><th></th></tr>
                                </thead>
                                <tbody>{low_stock_rows}</tbody>
                            </table>
                        </div>
                    </div>
                    <div class="card bg-base-100 shadow-xl">
                        <div class="card-body">
                            <div class="flex items-center justify-between">
                                <h3 class="card-title">"Recent orders"</h3>
                                <Link to="/sales/create" class="btn btn-primary btn-sm">"New sale"</Link>
                            </div>
                            <table class="table table-sm">
                                <thead>
                                    <tr><th>"Order"</th><th>"Created"</th><th>"Status"</th><th class="text-right">"Total"</th></tr>
                                </thead>
                                <tbody>{recent_rows}</tbody>
                            </table>
                        </div>
                    </div>
                </div>
            </Show>
        </AppShell>
    }
}
