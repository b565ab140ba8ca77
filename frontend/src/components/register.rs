use crate::auth::use_auth;
use crate::components::icons::ShieldCheck;
use crate::components::layout::ErrorAlert;
use crate::web::router::Link;
use leptos::prelude::*;
use leptos::task::spawn_local;
use rbac_console::AppRoute;
use rbac_console::controller::RegisterForm;

/// 表单字段，`RwSignal` 是 Copy 的，便于在闭包间传递
#[derive(Clone, Copy)]
struct RegisterFields {
    name: RwSignal<String>,
    email: RwSignal<String>,
    password: RwSignal<String>,
    gender: RwSignal<String>,
    age: RwSignal<String>,
}

impl RegisterFields {
    fn new() -> Self {
        Self {
            name: RwSignal::new(String::new()),
            email: RwSignal::new(String::new()),
            password: RwSignal::new(String::new()),
            gender: RwSignal::new(String::new()),
            age: RwSignal::new(String::new()),
        }
    }

    fn to_form(self) -> RegisterForm {
        RegisterForm {
            name: self.name.get(),
            email: self.email.get(),
            password: self.password.get(),
            gender: self.gender.get(),
            age: self.age.get(),
        }
    }
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let auth = use_auth();
    let fields = RegisterFields::new();
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let form = fields.to_form();
        if let Err(e) = form.validate() {
            set_error_msg.set(Some(e.to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let store = auth.store();
        spawn_local(async move {
            if let Err(e) = form.submit(&store).await {
                set_error_msg.set(Some(e.to_string()));
            }
            set_is_submitting.set(false);
        });
    };

    let text_input = move |id: &'static str, label: &'static str, kind: &'static str, field: RwSignal<String>| {
        view! {
            <div class="form-control">
                <label class="label" for=id>
                    <span class="label-text">{label}</span>
                </label>
                <input
                    id=id
                    type=kind
                    on:input=move |ev| field.set(event_target_value(&ev))
                    prop:value=field
                    class="input input-bordered"
                    required
                />
            </div>
        }
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <div class="flex flex-col items-center gap-2">
                        <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                            <ShieldCheck attr:class="h-8 w-8" />
                        </div>
                        <h1 class="text-3xl font-bold">"Create an account"</h1>
                    </div>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <ErrorAlert message=error_msg />

                        {text_input("name", "Name", "text", fields.name)}
                        {text_input("email", "Email", "email", fields.email)}
                        {text_input("password", "Password", "password", fields.password)}

                        <div class="grid grid-cols-2 gap-4">
                            <div class="form-control">
                                <label class="label" for="gender">
                                    <span class="label-text">"Gender"</span>
                                </label>
                                <select
                                    id="gender"
                                    class="select select-bordered w-full"
                                    on:change=move |ev| fields.gender.set(event_target_value(&ev))
                                >
                                    <option value="" selected=move || fields.gender.with(String::is_empty)>"Select"</option>
                                    <option value="male">"Male"</option>
                                    <option value="female">"Female"</option>
                                    <option value="other">"Other"</option>
                                </select>
                            </div>
                            {text_input("age", "Age", "number", fields.age)}
                        </div>

                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Creating account..." }.into_any()
                                } else {
                                    "Register".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-center text-sm mt-2">
                            "Already have an account? "
                            <Link route=AppRoute::Login class="link link-primary">"Login"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
