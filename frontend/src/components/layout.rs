use crate::auth::use_auth;
use crate::components::icons::{LogOut, ShieldCheck};
use crate::web::router::Link;
use leptos::prelude::*;
use rbac_console::AppRoute;
use rbac_console::controller::Notice;
use std::time::Duration;

/// 已登录页面的外壳：导航栏 + 内容
#[component]
pub fn Layout(children: Children) -> impl IntoView {
    let auth = use_auth();
    let session = auth.session;

    let user_name = move || {
        session.with(|s| s.current_user().map(|u| u.name.clone()).unwrap_or_default())
    };
    let is_admin = move || session.with(|s| s.is_admin());

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-7xl mx-auto space-y-8">
                <div class="navbar bg-base-100 rounded-box shadow-xl">
                    <div class="flex-1 gap-2">
                        <ShieldCheck attr:class="text-primary h-6 w-6" />
                        <Link route=AppRoute::Dashboard class="btn btn-ghost text-xl">"RBAC Console"</Link>
                        <ul class="menu menu-horizontal px-1 hidden md:flex">
                            <li><Link route=AppRoute::Dashboard>"Dashboard"</Link></li>
                            <li><Link route=AppRoute::Profile>"Profile"</Link></li>
                            <Show when=is_admin>
                                <li><Link route=AppRoute::Users>"Users"</Link></li>
                                <li><Link route=AppRoute::Roles>"Roles"</Link></li>
                            </Show>
                        </ul>
                    </div>
                    <div class="flex-none gap-2">
                        <span class="badge badge-neutral hidden md:inline-flex">{user_name}</span>
                        <button on:click=move |_| auth.logout() class="btn btn-outline btn-error gap-2">
                            <LogOut attr:class="h-4 w-4" /> "Logout"
                        </button>
                    </div>
                </div>

                {children()}
            </div>
        </div>
    }
}

/// 右上角提示，3 秒后自动消失
#[component]
pub fn Toast(
    #[prop(into)] notice: Signal<Option<Notice>>,
    #[prop(into)] on_dismiss: Callback<()>,
) -> impl IntoView {
    Effect::new(move |_| {
        if notice.get().is_some() {
            set_timeout(move || on_dismiss.run(()), Duration::from_secs(3));
        }
    });

    view! {
        <Show when=move || notice.with(Option::is_some)>
            <div class="toast toast-top toast-end z-50">
                <div class=move || {
                    if notice.with(|n| n.as_ref().is_some_and(Notice::is_error)) {
                        "alert alert-error shadow-lg"
                    } else {
                        "alert alert-success shadow-lg"
                    }
                }>
                    <span>{move || notice.with(|n| n.as_ref().map(|n| n.message.clone()).unwrap_or_default())}</span>
                </div>
            </div>
        </Show>
    }
}

/// 内联错误提示
#[component]
pub fn ErrorAlert(#[prop(into)] message: Signal<Option<String>>) -> impl IntoView {
    view! {
        <Show when=move || message.with(Option::is_some)>
            <div role="alert" class="alert alert-error text-sm py-2">
                <span>{move || message.get().unwrap_or_default()}</span>
            </div>
        </Show>
    }
}
