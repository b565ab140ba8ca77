use crate::auth::use_auth;
use crate::components::icons::{RefreshCw, UserCog};
use crate::components::layout::{ErrorAlert, Layout, Toast};
use leptos::prelude::*;
use leptos::task::spawn_local;
use rbac_console::controller::UsersController;
use rbac_console::controller::users::UsersState;

#[component]
pub fn UsersPage() -> impl IntoView {
    let auth = use_auth();

    let ctrl = UsersController::new(auth.api()).on_unauthorized(auth.auth_failure_hook());
    let (state, set_state) = signal(ctrl.snapshot());
    ctrl.subscribe(move |s| set_state.set(s.clone()));
    let ctrl = StoredValue::new_local(ctrl);

    on_cleanup(move || {
        ctrl.try_with_value(|c| c.dispose());
    });

    let load = move || {
        let c = ctrl.get_value();
        spawn_local(async move { c.load().await });
    };

    // 初始加载
    load();

    let users_loading = move || state.with(|s| s.users.is_loading());

    view! {
        <Layout>
            <Toast
                notice=Signal::derive(move || state.with(|s| s.notice.clone()))
                on_dismiss=Callback::new(move |_| ctrl.with_value(|c| c.dismiss_notice()))
            />

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <div class="flex justify-between items-center mb-4">
                        <h2 class="card-title text-2xl">"Users"</h2>
                        <button
                            on:click=move |_| load()
                            class="btn btn-square btn-ghost"
                            title="Refresh"
                            disabled=users_loading
                        >
                            <RefreshCw attr:class=move || {
                                if users_loading() { "h-5 w-5 animate-spin" } else { "h-5 w-5" }
                            } />
                        </button>
                    </div>

                    <ErrorAlert message=Signal::derive(move || {
                        state.with(|s| s.users.error().map(str::to_string))
                    }) />
                    <ErrorAlert message=Signal::derive(move || {
                        state.with(|s| s.roles.error().map(str::to_string))
                    }) />

                    <Show
                        when=move || !(users_loading() && state.with(|s| s.users.is_empty()))
                        fallback=|| view! {
                            <div class="flex justify-center p-8">
                                <span class="loading loading-spinner loading-lg text-primary"></span>
                            </div>
                        }
                    >
                        <div class="overflow-x-auto">
                            <table class="table table-zebra w-full">
                                <thead>
                                    <tr>
                                        <th>"Name"</th>
                                        <th>"Email"</th>
                                        <th>"Role"</th>
                                        <th class="text-right">"Actions"</th>
                                    </tr>
                                </thead>
                                <tbody>
                                    <For
                                        each=move || state.with(|s| s.users.items().to_vec())
                                        key=|u| (u.id.clone(), u.role_name().map(str::to_string))
                                        children=move |user| {
                                            let id = user.id.clone();
                                            view! {
                                                <tr class="hover">
                                                    <td class="font-bold">{user.name.clone()}</td>
                                                    <td>{user.email.clone()}</td>
                                                    <td>
                                                        <span class="badge badge-ghost">
                                                            {UsersState::role_label(&user).to_string()}
                                                        </span>
                                                    </td>
                                                    <td class="text-right">
                                                        <button
                                                            on:click=move |_| ctrl.with_value(|c| c.open_assign(&id))
                                                            class="btn btn-sm btn-ghost gap-1"
                                                        >
                                                            <UserCog attr:class="h-4 w-4" /> "Assign Role"
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
                </div>
            </div>

            <AssignRoleDialog state=state ctrl=ctrl />
        </Layout>
    }
}

type Ctrl = StoredValue<UsersController<crate::web::FetchHttpClient>, LocalStorage>;

#[component]
fn AssignRoleDialog(state: ReadSignal<UsersState>, ctrl: Ctrl) -> impl IntoView {
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();
    let open = move || state.with(|s| s.assign.is_some());

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

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let c = ctrl.get_value();
        spawn_local(async move {
            let _ = c.assign().await;
        });
    };

    let saving = move || state.with(|s| s.assign.as_ref().is_some_and(|a| a.saving));
    let selected = move || {
        state.with(|s| s.assign.as_ref().map(|a| a.selected_role_id.clone()).unwrap_or_default())
    };

    view! {
        <dialog node_ref=dialog_ref class="modal" on:close=move |_| ctrl.with_value(|c| c.close_assign())>
            <div class="modal-box">
                <h3 class="font-bold text-lg">
                    "Assign Role to "
                    {move || state.with(|s| s.assign.as_ref().map(|a| a.user.name.clone()).unwrap_or_default())}
                </h3>
                <form on:submit=on_submit class="py-4 space-y-4">
                    <ErrorAlert message=Signal::derive(move || {
                        state.with(|s| s.assign.as_ref().and_then(|a| a.error.clone()))
                    }) />

                    <div class="form-control">
                        <label class="label" for="assign-role">
                            <span class="label-text">"Role"</span>
                        </label>
                        <select
                            id="assign-role"
                            class="select select-bordered w-full"
                            prop:value=selected
                            on:change=move |ev| ctrl.with_value(|c| c.select_role(&event_target_value(&ev)))
                        >
                            <option value="">"Select a role"</option>
                            <For
                                each=move || state.with(|s| s.roles.items().to_vec())
                                key=|r| r.id.clone()
                                children=move |role| {
                                    let value = role.id.clone();
                                    let is_selected = move || selected() == value;
                                    view! {
                                        <option value=role.id.clone() selected=is_selected>{role.name.clone()}</option>
                                    }
                                }
                            />
                        </select>
                    </div>

                    <div class="modal-action">
                        <button
                            type="button"
                            class="btn"
                            on:click=move |_| ctrl.with_value(|c| c.close_assign())
                            disabled=saving
                        >
                            "Cancel"
                        </button>
                        <button type="submit" class="btn btn-primary" disabled=saving>
                            {move || if saving() {
                                view! { <span class="loading loading-spinner"></span> "Assigning..." }.into_any()
                            } else {
                                "Assign".into_any()
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
