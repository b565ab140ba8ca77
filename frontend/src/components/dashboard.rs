use crate::auth::use_auth;
use crate::components::layout::Layout;
use leptos::prelude::*;
use leptos::task::spawn_local;
use rbac_console::controller::DashboardController;
use rbac_console::controller::dashboard::role_label;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = use_auth();
    let session = auth.session;

    let ctrl = DashboardController::new(auth.api());
    let (state, set_state) = signal(ctrl.snapshot());
    ctrl.subscribe(move |s| set_state.set(s.clone()));
    let ctrl = StoredValue::new_local(ctrl);

    on_cleanup(move || {
        ctrl.try_with_value(|c| c.dispose());
    });

    // 初始加载
    let c = ctrl.get_value();
    spawn_local(async move { c.load().await });

    let user = move || session.with(|s| s.current_user().cloned());

    let permissions = move || {
        user()
            .map(|u| state.with(|s| s.permissions_for(&u)))
            .unwrap_or_default()
            .into_iter()
            .collect::<Vec<_>>()
    };

    view! {
        <Layout>
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h2 class="card-title text-2xl">
                        "Welcome, " {move || user().map(|u| u.name).unwrap_or_default()}
                    </h2>
                    <div class="grid md:grid-cols-3 gap-4 mt-4">
                        <div class="stat bg-base-200 rounded-box">
                            <div class="stat-title">"Email"</div>
                            <div class="stat-value text-lg">{move || user().map(|u| u.email).unwrap_or_default()}</div>
                        </div>
                        <div class="stat bg-base-200 rounded-box">
                            <div class="stat-title">"Role"</div>
                            <div class="stat-value text-lg">
                                {move || user().map(|u| role_label(&u).to_string()).unwrap_or_default()}
                            </div>
                        </div>
                        <div class="stat bg-base-200 rounded-box">
                            <div class="stat-title">"Access"</div>
                            <div class="stat-value text-lg">
                                {move || if session.with(|s| s.is_admin()) { "Administrator" } else { "Standard" }}
                            </div>
                        </div>
                    </div>
                </div>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h2 class="card-title">"Your Permissions"</h2>
                    <Show
                        when=move || !state.with(|s| s.roles.is_loading())
                        fallback=|| view! {
                            <div class="flex justify-center p-8">
                                <span class="loading loading-spinner loading-lg text-primary"></span>
                            </div>
                        }
                    >
                        <Show
                            when=move || !permissions().is_empty()
                            fallback=|| view! {
                                <p class="text-base-content/60">"No permissions assigned."</p>
                            }
                        >
                            <div class="flex flex-wrap gap-2">
                                <For
                                    each=permissions
                                    key=|p| p.clone()
                                    children=|p| view! {
                                        <span class="badge badge-primary badge-outline">{p.to_string()}</span>
                                    }
                                />
                            </div>
                        </Show>
                    </Show>
                </div>
            </div>
        </Layout>
    }
}
