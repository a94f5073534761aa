use crate::api::InventoryApi;
use crate::auth::use_auth;
use crate::components::layout::{AppShell, ErrorAlert};
use crate::forms::{parse_cart_quantity, parse_positive_quantity};
use crate::web::router::{Link, use_router};
use leptos::prelude::*;
use leptos::task::spawn_local;
use multi_inventory_shared::cart::Cart;
use multi_inventory_shared::stock::{find_by_barcode, search_items};
use multi_inventory_shared::{Item, format_price};

/// 候选列表最多展示的条数
const MAX_SUGGESTIONS: usize = 8;

#[component]
pub fn SalesCreatePage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    let (items, set_items) = signal(Vec::<Item>::new());
    let cart = RwSignal::new(Cart::new());
    let (query, set_query) = signal(String::new());
    let (quantity, set_quantity) = signal("1".to_string());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    spawn_local(async move {
        match InventoryApi::new().list_items().await {
            Ok(data) => set_items.set(data),
            Err(e) => set_error_msg.set(Some(format!("Failed to load inventory: {}", e))),
        }
    });

    let add_to_cart = move |item: Item| {
        let Some(qty) = parse_positive_quantity(&quantity.get_untracked()) else {
            set_error_msg.set(Some("Quantity must be at least 1".to_string()));
            return;
        };
        let mut result = Ok(());
        cart.update(|c| result = c.add(&item, qty));
        match result {
            Ok(()) => {
                set_error_msg.set(None);
                set_query.set(String::new());
                set_quantity.set("1".to_string());
            }
            Err(e) => set_error_msg.set(Some(e.to_string())),
        }
    };

    // 在搜索框回车：条码精确匹配优先，否则取唯一的搜索结果
    let on_search_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let q = query.get_untracked();
        let picked = items.with_untracked(|all| {
            find_by_barcode(all, &q).cloned().or_else(|| {
                let hits = search_items(all, &q);
                (hits.len() == 1).then(|| hits[0].clone())
            })
        });
        match picked {
            Some(item) => add_to_cart(item),
            None => set_error_msg.set(Some(format!("No unique item matches \"{}\"", q.trim()))),
        }
    };

    let suggestions = move || {
        let q = query.get();
        if q.trim().is_empty() {
            return Vec::new();
        }
        items.with(|all| {
            search_items(all, &q)
                .into_iter()
                .take(MAX_SUGGESTIONS)
                .cloned()
                .collect::<Vec<_>>()
        })
    };

    let suggestion_rows = move || {
        suggestions()
            .into_iter()
            .map(|item| {
                let label = format!("{} ({} in stock)", item.name, item.quantity);
                let price = format_price(item.price);
                view! {
                    <li>
                        <button type="button" class="flex justify-between" on:click=move |_| add_to_cart(item.clone())>
                            <span>{label}</span>
                            <span>{price}</span>
                        </button>
                    </li>
                }
            })
            .collect_view()
    };

    let cart_rows = move || {
        cart.with(|c| c.lines().to_vec())
            .into_iter()
            .map(|line| {
                let id = line.item_id;
                let current_qty = line.quantity;
                let subtotal = format_price(line.subtotal());
                view! {
                    <tr>
                        <td>{line.name}</td>
                        <td class="font-mono text-xs">{line.barcode}</td>
                        <td>{format_price(line.unit_price)}</td>
                        <td>
                            <input
                                type="number"
                                min="0"
                                max=line.available.to_string()
                                class="input input-bordered input-sm w-20"
                                prop:value=line.quantity.to_string()
                                on:change=move |ev| {
                                    let qty = match parse_cart_quantity(&event_target_value(&ev)) {
                                        Ok(qty) => qty,
                                        Err(e) => {
                                            // 购物车不变，输入框恢复原数量
                                            event_target::<web_sys::HtmlInputElement>(&ev)
                                                .set_value(&current_qty.to_string());
                                            set_error_msg.set(Some(e.to_string()));
                                            return;
                                        }
                                    };
                                    let mut result = Ok(());
                                    cart.update(|c| result = c.set_quantity(id, qty));
                                    match result {
                                        Ok(()) => set_error_msg.set(None),
                                        Err(e) => set_error_msg.set(Some(e.to_string())),
                                    }
                                }
                            />
                        </td>
                        <td class="text-right">{subtotal}</td>
                        <td>
                            <button
                                type="button"
                                class="btn btn-ghost btn-xs text-error"
                                on:click=move |_| {
                                    cart.update(|c| {
                                        c.remove(id);
                                    });
                                }
                            >
                                "Remove"
                            </button>
                        </td>
                    </tr>
                }
            })
            .collect_view()
    };

    let on_checkout = move |_| {
        let user_id = auth.state.with_untracked(|s| s.user_id());
        let request = match cart.with_untracked(|c| c.to_request(user_id)) {
            Ok(request) => request,
            Err(e) => {
                set_error_msg.set(Some(e.to_string()));
                return;
            }
        };

        set_is_submitting.set(true);
        set_error_msg.set(None);
        spawn_local(async move {
            let result = InventoryApi::new().create_order(request).await;
            set_is_submitting.set(false);
            match result {
                Ok(order) => {
                    tracing::info!(id = order.id, total = order.total_price, "order created");
                    cart.update(Cart::clear);
                    router.navigate("/sales");
                }
                Err(e) => set_error_msg.set(Some(format!("Failed to create order: {}", e))),
            }
        });
    };

    view! {
        <AppShell title="New sale">
            <ErrorAlert error=error_msg />

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <form class="flex gap-2" on:submit=on_search_submit>
                        <input
                            type="text"
                            autofocus
                            placeholder="Scan a barcode or search by name"
                            class="input input-bordered flex-1"
                            on:input=move |ev| set_query.set(event_target_value(&ev))
                            prop:value=query
                        />
                        <input
                            type="number"
                            min="1"
                            class="input input-bordered w-24"
                            on:input=move |ev| set_quantity.set(event_target_value(&ev))
                            prop:value=quantity
                        />
                        <button class="btn btn-secondary">"Add"</button>
                    </form>
                    <ul class="menu bg-base-200 rounded-box">{suggestion_rows}</ul>
                </div>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h3 class="card-title">"Cart"</h3>
                    <table class="table">
                        <thead>
                            <tr>
                                <th>"Name"</th>
                                <th>"Barcode"</th>
                                <th>"Price"</th>
                                <th>"Qty"</th>
                                <th class="text-right">"Subtotal"</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>{cart_rows}</tbody>
                    </table>
                    <div class="flex items-center justify-between mt-4">
                        <span class="text-lg">
                            {move || cart.with(|c| format!("{} units, total {}", c.total_units(), format_price(c.total())))}
                        </span>
                        <div class="flex gap-2">
                            <Link to="/sales" class="btn btn-ghost">"Cancel"</Link>
                            <button
                                class="btn btn-primary"
                                disabled=move || is_submitting.get() || cart.with(|c| c.is_empty())
                                on:click=on_checkout
                            >
                                {move || if is_submitting.get() { "Saving..." } else { "Complete sale" }}
                            </button>
                        </div>
                    </div>
                </div>
            </div>
        </AppShell>
    }
}
