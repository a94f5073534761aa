//! 商品新增 / 编辑表单
//!
//! `id` 为空时是新增模式，`barcode` 来自扫码页的预填；否则先拉取商品再编辑。

use crate::api::InventoryApi;
use crate::components::layout::{AppShell, ErrorAlert, Spinner};
use crate::forms::{ItemFormInput, parse_item_id};
use crate::web::router::{Link, use_router};
use leptos::prelude::*;
use leptos::task::spawn_local;
use multi_inventory_shared::ItemDraft;

#[component]
pub fn InventoryEditPage(id: Option<String>, barcode: String) -> impl IntoView {
    let router = use_router();

    let initial = ItemFormInput {
        barcode,
        ..ItemFormInput::from_draft(&ItemDraft::default())
    };
    let form = RwSignal::new(initial);
    let (loading, set_loading) = signal(false);
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let is_edit = id.is_some();
    let item_id = match id.as_deref().map(parse_item_id) {
        Some(Ok(item_id)) => Some(item_id),
        Some(Err(e)) => {
            set_error_msg.set(Some(e.to_string()));
            None
        }
        None => None,
    };

    if let Some(item_id) = item_id {
        set_loading.set(true);
        spawn_local(async move {
            match InventoryApi::new().get_item(item_id).await {
                Ok(item) => form.set(ItemFormInput::from_draft(&item.to_draft())),
                Err(e) => set_error_msg.set(Some(format!("Failed to load item: {}", e))),
            }
            set_loading.set(false);
        });
    }

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if is_edit && item_id.is_none() {
            return;
        }
        let draft = match form.with_untracked(|f| f.validate()) {
            Ok(draft) => draft,
            Err(e) => {
                set_error_msg.set(Some(e.to_string()));
                return;
            }
        };

        set_is_submitting.set(true);
        set_error_msg.set(None);
        spawn_local(async move {
            let api = InventoryApi::new();
            let result = match item_id {
                Some(item_id) => api.update_item(item_id, draft).await,
                None => api.create_item(draft).await,
            };
            set_is_submitting.set(false);
            match result {
                Ok(item) => {
                    tracing::info!(id = item.id, "item saved");
                    router.navigate("/inventory");
                }
                Err(e) => set_error_msg.set(Some(format!("Failed to save item: {}", e))),
            }
        });
    };

    let title = if is_edit { "Edit item" } else { "Add item" };

    // 文本输入框：读写表单中的一个字段
    let text_field = move |label: &'static str,
                           input_type: &'static str,
                           get: fn(&ItemFormInput) -> String,
                           set: fn(&mut ItemFormInput, String)| {
        view! {
            <div class="form-control">
                <label class="label">
                    <span class="label-text">{label}</span>
                </label>
                <input
                    type=input_type
                    step="any"
                    class="input input-bordered"
                    prop:value=move || form.with(get)
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        form.update(|f| set(f, value));
                    }
                />
            </div>
        }
    };

    view! {
        <AppShell title=title>
            <div class="card bg-base-100 shadow-xl max-w-xl">
                <Show when=move || !loading.get() fallback=|| view! { <Spinner /> }>
                    <form class="card-body" on:submit=on_submit>
                        <ErrorAlert error=error_msg />

                        {text_field("Name", "text", |f| f.name.clone(), |f, v| f.name = v)}
                        {text_field("Barcode", "text", |f| f.barcode.clone(), |f, v| f.barcode = v)}
                        {text_field("Price", "number", |f| f.price.clone(), |f, v| f.price = v)}
                        {text_field("Quantity", "number", |f| f.quantity.clone(), |f, v| f.quantity = v)}
                        {text_field("Location", "text", |f| f.location.clone(), |f, v| f.location = v)}

                        <label class="label cursor-pointer justify-start gap-3">
                            <input
                                type="checkbox"
                                class="checkbox checkbox-primary"
                                prop:checked=move || form.with(|f| f.is_halal)
                                on:change=move |ev| {
                                    let checked = event_target_checked(&ev);
                                    form.update(|f| f.is_halal = checked);
                                }
                            />
                            <span class="label-text">"Halal"</span>
                        </label>

                        <div class="card-actions justify-end mt-4">
                            <Link to="/inventory" class="btn btn-ghost">"Cancel"</Link>
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() { "Saving..." } else { "Save" }}
                            </button>
                        </div>
                    </form>
                </Show>
            </div>
        </AppShell>
    }
}
