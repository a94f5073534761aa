use crate::api::InventoryApi;
use crate::components::layout::{AppShell, NotificationToast, Spinner};
use crate::web::router::Link;
use leptos::prelude::*;
use leptos::task::spawn_local;
use multi_inventory_shared::stock::{is_low_stock, search_items};
use multi_inventory_shared::{Item, format_price};

/// 浏览器确认框；拿不到 window 时视为取消
fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

#[component]
pub fn InventoryListPage() -> impl IntoView {
    let (items, set_items) = signal(Vec::<Item>::new());
    let (query, set_query) = signal(String::new());
    let (loading, set_loading) = signal(true);
    let (notification, set_notification) = signal(Option::<(String, bool)>::None);

    let load_items = move || {
        set_loading.set(true);
        spawn_local(async move {
            match InventoryApi::new().list_items().await {
                Ok(data) => set_items.set(data),
                Err(e) => set_notification.set(Some((format!("Failed to load inventory: {}", e), true))),
            }
            set_loading.set(false);
        });
    };

    load_items();

    let handle_delete = move |id: i64, name: String| {
        if !confirm(&format!("Delete \"{}\"?", name)) {
            return;
        }
        spawn_local(async move {
            match InventoryApi::new().delete_item(id).await {
                Ok(()) => {
                    set_notification.set(Some((format!("Deleted {}", name), false)));
                    set_items.update(|list| list.retain(|i| i.id != id));
                }
                Err(e) => set_notification.set(Some((format!("Failed to delete item: {}", e), true))),
            }
        });
    };

    let visible = Memo::new(move |_| {
        let q = query.get();
        items.with(|all| search_items(all, &q).into_iter().cloned().collect::<Vec<_>>())
    });

    let rows = move || {
        visible
            .get()
            .into_iter()
            .map(|item| {
                let href = format!("/inventory/edit/{}", item.id);
                let low = is_low_stock(&item);
                let (id, name) = (item.id, item.name.clone());
                view! {
                    <tr>
                        <td>{item.name}</td>
                        <td class="font-mono text-xs">{item.barcode}</td>
                        <td>{item.location}</td>
                        <td>{if item.is_halal { "Yes" } else { "No" }}</td>
                        <td class="text-right">{format_price(item.price)}</td>
                        <td class="text-right" class:text-error=low>{item.quantity}</td>
                        <td class="text-right whitespace-nowrap">
                            <Link to=href class="btn btn-ghost btn-xs">"Edit"</Link>
                            <button
                                class="btn btn-ghost btn-xs text-error"
                                on:click=move |_| handle_delete(id, name.clone())
                            >
                                "Delete"
                            </button>
                        </td>
                    </tr>
                }
            })
            .collect_view()
    };

    view! {
        <AppShell title="Inventory">
            <NotificationToast notification=notification set_notification=set_notification />

            <div class="flex flex-wrap items-center gap-2">
                <input
                    type="search"
                    placeholder="Search name, barcode or location"
                    class="input input-bordered flex-1 min-w-64"
                    on:input=move |ev| set_query.set(event_target_value(&ev))
                    prop:value=query
                />
                <button class="btn btn-ghost" on:click=move |_| load_items() disabled=move || loading.get()>
                    "Refresh"
                </button>
                <Link to="/inventory/scan" class="btn btn-outline">"Scan"</Link>
                <Link to="/inventory/add" class="btn btn-primary">"Add item"</Link>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="overflow-x-auto w-full">
                    <table class="table table-zebra w-full">
                        <thead>
                            <tr>
                                <th>"Name"</th>
                                <th>"Barcode"</th>
                                <th>"Location"</th>
                                <th>"Halal"</th>
                                <th class="text-right">"Price"</th>
                                <th class="text-right">"Qty"</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            <Show when=move || !loading.get() && visible.with(|v| v.is_empty())>
                                <tr>
                                    <td colspan="7" class="text-center py-8 text-base-content/50">
                                        "No items found."
                                    </td>
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
