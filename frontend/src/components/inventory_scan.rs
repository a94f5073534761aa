//! 扫码查货
//!
//! 扫码枪以键盘方式输入条码并以回车结束，这里把它当作表单提交处理。
//! 后端没有按条码查询的接口，查找在已加载的库存列表上完成。

use crate::api::InventoryApi;
use crate::components::layout::{AppShell, NotificationToast};
use crate::web::route::encode_component;
use crate::web::router::Link;
use leptos::prelude::*;
use leptos::task::spawn_local;
use multi_inventory_shared::stock::{adjust_quantity, find_by_barcode};
use multi_inventory_shared::{Item, format_price};

/// 一次扫码的结果
#[derive(Debug, Clone, PartialEq)]
enum ScanResult {
    Found(Item),
    Missing(String),
}

#[component]
pub fn InventoryScanPage() -> impl IntoView {
    let (items, set_items) = signal(Vec::<Item>::new());
    let (code, set_code) = signal(String::new());
    let (result, set_result) = signal(Option::<ScanResult>::None);
    let (busy, set_busy) = signal(false);
    let (notification, set_notification) = signal(Option::<(String, bool)>::None);
    let input_ref = NodeRef::<leptos::html::Input>::new();

    spawn_local(async move {
        match InventoryApi::new().list_items().await {
            Ok(data) => set_items.set(data),
            Err(e) => set_notification.set(Some((format!("Failed to load inventory: {}", e), true))),
        }
    });

    let refocus = move || {
        if let Some(input) = input_ref.get() {
            let _ = input.focus();
        }
    };

    let on_scan = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let scanned = code.get_untracked().trim().to_string();
        if scanned.is_empty() {
            return;
        }
        let found = items.with_untracked(|all| find_by_barcode(all, &scanned).cloned());
        tracing::debug!(barcode = %scanned, found = found.is_some(), "scan");
        set_result.set(Some(match found {
            Some(item) => ScanResult::Found(item),
            None => ScanResult::Missing(scanned),
        }));
        set_code.set(String::new());
        refocus();
    };

    let adjust = move |item: Item, delta: i32| {
        let mut draft = item.to_draft();
        draft.quantity = adjust_quantity(item.quantity, delta);
        if draft.quantity == item.quantity {
            return;
        }
        set_busy.set(true);
        spawn_local(async move {
            match InventoryApi::new().update_item(item.id, draft).await {
                Ok(updated) => {
                    set_items.update(|list| {
                        if let Some(slot) = list.iter_mut().find(|i| i.id == updated.id) {
                            *slot = updated.clone();
                        }
                    });
                    set_result.set(Some(ScanResult::Found(updated)));
                }
                Err(e) => set_notification.set(Some((format!("Failed to update stock: {}", e), true))),
            }
            set_busy.set(false);
            refocus();
        });
    };

    let result_view = move || {
        result.get().map(|scan| match scan {
            ScanResult::Found(item) => {
                let href = format!("/inventory/edit/{}", item.id);
                let minus = item.clone();
                let plus = item.clone();
                view! {
                    <div class="card bg-base-100 shadow-xl">
                        <div class="card-body">
                            <h3 class="card-title">{item.name}</h3>
                            <p class="font-mono text-sm">{item.barcode}</p>
                            <p>"Location: " {item.location}</p>
                            <p>"Price: " {format_price(item.price)}</p>
                            <div class="flex items-center gap-4 mt-2">
                                <button
                                    class="btn btn-outline btn-sm"
                                    disabled=move || busy.get()
                                    on:click=move |_| adjust(minus.clone(), -1)
                                >
                                    "-1"
                                </button>
                                <span class="text-3xl font-bold">{item.quantity}</span>
                                <button
                                    class="btn btn-outline btn-sm"
                                    disabled=move || busy.get()
                                    on:click=move |_| adjust(plus.clone(), 1)
                                >
                                    "+1"
                                </button>
                            </div>
                            <div class="card-actions justify-end">
                                <Link to=href class="btn btn-ghost btn-sm">"Edit"</Link>
                            </div>
                        </div>
                    </div>
                }
                .into_any()
            }
            ScanResult::Missing(barcode) => {
                let href = format!("/inventory/add?barcode={}", encode_component(&barcode));
                view! {
                    <div role="alert" class="alert alert-warning">
                        <span>"No item with barcode " <span class="font-mono">{barcode}</span></span>
                        <Link to=href class="btn btn-sm btn-primary">"Add item"</Link>
                    </div>
                }
                .into_any()
            }
        })
    };

    view! {
        <AppShell title="Scan">
            <NotificationToast notification=notification set_notification=set_notification />

            <form class="flex gap-2" on:submit=on_scan>
                <input
                    node_ref=input_ref
                    type="text"
                    autofocus
                    placeholder="Scan or type a barcode and press Enter"
                    class="input input-bordered flex-1 font-mono"
                    on:input=move |ev| set_code.set(event_target_value(&ev))
                    prop:value=code
                />
                <button class="btn btn-primary">"Look up"</button>
            </form>

            {result_view}
        </AppShell>
    }
}
