use crate::auth::use_auth;
use crate::components::icons::{Pencil, Plus, RefreshCw, Trash2};
use crate::components::layout::{ErrorAlert, Layout, Toast};
use leptos::prelude::*;
use leptos::task::spawn_local;
use rbac_console::controller::RolesController;
use rbac_console::controller::roles::RolesState;
use rbac_console_shared::Permission;

type Ctrl = StoredValue<RolesController<crate::web::FetchHttpClient>, LocalStorage>;

#[component]
pub fn RolesPage() -> impl IntoView {
    let auth = use_auth();

    let ctrl = RolesController::new(auth.api()).on_unauthorized(auth.auth_failure_hook());
    let (state, set_state) = signal(ctrl.snapshot());
    ctrl.subscribe(move |s| set_state.set(s.clone()));
    let ctrl: Ctrl = StoredValue::new_local(ctrl);

    on_cleanup(move || {
        ctrl.try_with_value(|c| c.dispose());
    });

    let load = move || {
        let c = ctrl.get_value();
        spawn_local(async move { c.load().await });
    };

    // 初始加载
    load();

    let loading = move || state.with(|s| s.roles.is_loading());

    view! {
        <Layout>
            <Toast
                notice=Signal::derive(move || state.with(|s| s.notice.clone()))
                on_dismiss=Callback::new(move |_| ctrl.with_value(|c| c.dismiss_notice()))
            />

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <div class="flex justify-between items-center mb-4">
                        <h2 class="card-title text-2xl">"Roles"</h2>
                        <div class="flex gap-2">
                            <button
                                on:click=move |_| load()
                                class="btn btn-square btn-ghost"
                                title="Refresh"
                                disabled=loading
                            >
                                <RefreshCw attr:class=move || {
                                    if loading() { "h-5 w-5 animate-spin" } else { "h-5 w-5" }
                                } />
                            </button>
                            <button
                                on:click=move |_| ctrl.with_value(|c| c.open_create())
                                class="btn btn-primary gap-2"
                            >
                                <Plus attr:class="h-4 w-4" /> "Create Role"
                            </button>
                        </div>
                    </div>

                    <ErrorAlert message=Signal::derive(move || {
                        state.with(|s| s.roles.error().map(str::to_string))
                    }) />

                    <Show
                        when=move || !(loading() && state.with(|s| s.roles.is_empty()))
                        fallback=|| view! {
                            <div class="flex justify-center p-8">
                                <span class="loading loading-spinner loading-lg text-primary"></span>
                            </div>
                        }
                    >
                        <Show
                            when=move || !state.with(|s| s.roles.is_empty())
                            fallback=|| view! {
                                <div class="text-center py-12 text-base-content/50">
                                    <p class="text-lg">"No roles yet"</p>
                                </div>
                            }
                        >
                            <div class="overflow-x-auto">
                                <table class="table table-zebra w-full">
                                    <thead>
                                        <tr>
                                            <th>"Name"</th>
                                            <th>"Permissions"</th>
                                            <th class="text-right">"Actions"</th>
                                        </tr>
                                    </thead>
                                    <tbody>
                                        <For
                                            each=move || state.with(|s| s.roles.items().to_vec())
                                            key=|r| (r.id.clone(), r.name.clone(), r.permissions.clone())
                                            children=move |role| {
                                                let permissions = role.permissions.iter().cloned().collect::<Vec<_>>();
                                                let edit_role = role.clone();
                                                let delete_role = role.clone();
                                                view! {
                                                    <tr class="hover">
                                                        <td class="font-bold">{role.name.clone()}</td>
                                                        <td>
                                                            <div class="flex flex-wrap gap-1">
                                                                {permissions
                                                                    .into_iter()
                                                                    .map(|p| view! {
                                                                        <span class="badge badge-sm badge-outline">{p.to_string()}</span>
                                                                    })
                                                                    .collect_view()}
                                                            </div>
                                                        </td>
                                                        <td class="text-right space-x-1">
                                                            <button
                                                                on:click=move |_| ctrl.with_value(|c| c.open_edit(&edit_role))
                                                                class="btn btn-sm btn-ghost btn-square"
                                                                title="Edit"
                                                            >
                                                                <Pencil attr:class="h-4 w-4" />
                                                            </button>
                                                            <button
                                                                on:click=move |_| ctrl.with_value(|c| c.request_delete(&delete_role))
                                                                class="btn btn-sm btn-ghost btn-square text-error"
                                                                title="Delete"
                                                            >
                                                                <Trash2 attr:class="h-4 w-4" />
                                                            </button>
                                                        </td>
                                                    </tr>
                                                }
                                            }
                                        />
                                    </tbody>
                                </table>
                            </div>
                        </Show>
                    </Show>
                </div>
            </div>

            <RoleEditorDialog state=state ctrl=ctrl />
            <DeleteRoleDialog state=state ctrl=ctrl />
        </Layout>
    }
}

/// 打开 / 关闭原生 `<dialog>`，跟随 `open` 的值
fn sync_dialog(dialog_ref: NodeRef<leptos::html::Dialog>, open: impl Fn() -> bool + 'static) {
    Effect::new(move |_| {
        if let Some(dialog) = dialog_ref.get() {
            if open() {
                if !dialog.open() {
                    let _ = dialog.show_modal();
                }
            } else if dialog.open() {
                dialog.close();
            }
        }
    });
}

#[component]
fn RoleEditorDialog(state: ReadSignal<RolesState>, ctrl: Ctrl) -> impl IntoView {
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();
    sync_dialog(dialog_ref, move || state.with(|s| s.editor.is_some()));

    let is_create = move || state.with(|s| s.editor.as_ref().is_none_or(|e| e.is_create()));
    let saving = move || state.with(|s| s.editor.as_ref().is_some_and(|e| e.saving));

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let c = ctrl.get_value();
        spawn_local(async move {
            let _ = c.submit().await;
        });
    };

    view! {
        <dialog node_ref=dialog_ref class="modal" on:close=move |_| ctrl.with_value(|c| c.close_editor())>
            <div class="modal-box">
                <h3 class="font-bold text-lg">
                    {move || if is_create() { "Create Role" } else { "Edit Role" }}
                </h3>
                <form on:submit=on_submit class="py-4 space-y-4">
                    <ErrorAlert message=Signal::derive(move || {
                        state.with(|s| s.editor.as_ref().and_then(|e| e.error.clone()))
                    }) />

                    <div class="form-control">
                        <label class="label" for="role-name">
                            <span class="label-text">"Role Name"</span>
                        </label>
                        <input
                            id="role-name"
                            type="text"
                            placeholder="e.g. editor"
                            class="input input-bordered w-full"
                            prop:value=move || state.with(|s| s.editor.as_ref().map(|e| e.name.clone()).unwrap_or_default())
                            on:input=move |ev| ctrl.with_value(|c| c.set_name(&event_target_value(&ev)))
                        />
                    </div>

                    <div class="form-control">
                        <span class="label-text mb-2">"Permissions"</span>
                        <div class="grid grid-cols-2 gap-2">
                            {Permission::catalog()
                                .map(|permission| {
                                    let checked = {
                                        let permission = permission.clone();
                                        move || state.with(|s| {
                                            s.editor.as_ref().is_some_and(|e| e.has_permission(&permission))
                                        })
                                    };
                                    let label = permission.to_string();
                                    view! {
                                        <label class="label cursor-pointer justify-start gap-2">
                                            <input
                                                type="checkbox"
                                                class="checkbox checkbox-primary checkbox-sm"
                                                prop:checked=checked
                                                on:change=move |_| ctrl.with_value(|c| c.toggle_permission(&permission))
                                            />
                                            <span class="label-text">{label}</span>
                                        </label>
                                    }
                                })
                                .collect_view()}
                        </div>
                    </div>

                    <div class="modal-action">
                        <button
                            type="button"
                            class="btn"
                            on:click=move |_| ctrl.with_value(|c| c.close_editor())
                            disabled=saving
                        >
                            "Cancel"
                        </button>
                        <button type="submit" class="btn btn-primary" disabled=saving>
                            {move || if saving() {
                                view! { <span class="loading loading-spinner"></span> "Saving..." }.into_any()
                            } else if is_create() {
                                "Create".into_any()
                            } else {
                                "Update".into_any()
                            }}
                        </button>
                    </div>
                </form>
            </div>
            <form method="dialog" class="modal-backdrop">
                <button>"close"</button>
            </form>
        </dialog>
    }
}

#[component]
fn DeleteRoleDialog(state: ReadSignal<RolesState>, ctrl: Ctrl) -> impl IntoView {
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();
    sync_dialog(dialog_ref, move || state.with(|s| s.pending_delete.is_some()));

    let deleting = move || state.with(|s| s.deleting);
    let on_confirm = move |_: leptos::ev::MouseEvent| {
        let c = ctrl.get_value();
        spawn_local(async move {
            let _ = c.confirm_delete().await;
        });
    };

    view! {
        <dialog node_ref=dialog_ref class="modal" on:close=move |_| ctrl.with_value(|c| c.cancel_delete())>
            <div class="modal-box">
                <h3 class="font-bold text-lg">"Delete Role"</h3>
                <p class="py-4">
                    "Are you sure you want to delete the role "
                    <span class="font-bold">
                        {move || state.with(|s| s.pending_delete.as_ref().map(|r| r.name.clone()).unwrap_or_default())}
                    </span>
                    "? This action cannot be undone."
                </p>
                <div class="modal-action">
                    <button
                        class="btn"
                        on:click=move |_| ctrl.with_value(|c| c.cancel_delete())
                        disabled=deleting
                    >
                        "Cancel"
                    </button>
                    <button class="btn btn-error" on:click=on_confirm disabled=deleting>
                        {move || if deleting() {
                            view! { <span class="loading loading-spinner"></span> "Deleting..." }.into_any()
                        } else {
                            "Delete".into_any()
                        }}
                    </button>
                </div>
            </div>
        </dialog>
    }
}
