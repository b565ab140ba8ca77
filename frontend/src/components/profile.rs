use crate::auth::use_auth;
use crate::components::layout::{ErrorAlert, Layout, Toast};
use leptos::prelude::*;
use leptos::task::spawn_local;
use rbac_console::controller::ProfileController;
use rbac_console::controller::profile::{ProfileField, ProfileForm};

#[component]
pub fn ProfilePage() -> impl IntoView {
    let auth = use_auth();

    let ctrl = ProfileController::new(auth.store());
    let (state, set_state) = signal(ctrl.snapshot());
    ctrl.subscribe(move |s| set_state.set(s.clone()));
    let ctrl = StoredValue::new_local(ctrl);

    on_cleanup(move || {
        ctrl.try_with_value(|c| c.dispose());
    });

    let form_value = move |get: fn(&ProfileForm) -> &str| move || state.with(|s| get(&s.form).to_string());
    let set_field = move |field: ProfileField, value: String| {
        ctrl.with_value(|c| c.set_field(field, &value))
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let c = ctrl.get_value();
        spawn_local(async move {
            let _ = c.submit().await;
        });
    };

    let saving = move || state.with(|s| s.saving);

    view! {
        <Layout>
            <Toast
                notice=Signal::derive(move || state.with(|s| s.notice.clone()))
                on_dismiss=Callback::new(move |_| ctrl.with_value(|c| c.dismiss_notice()))
            />

            <div class="card bg-base-100 shadow-xl max-w-2xl">
                <form class="card-body" on:submit=on_submit>
                    <h2 class="card-title text-2xl">"Profile"</h2>

                    <ErrorAlert message=Signal::derive(move || state.with(|s| s.error.clone())) />
                    <Show when=move || state.with(|s| s.saved)>
                        <div role="alert" class="alert alert-success text-sm py-2">
                            <span>"Your changes have been saved."</span>
                        </div>
                    </Show>

                    <div class="form-control">
                        <label class="label" for="profile-name">
                            <span class="label-text">"Name"</span>
                        </label>
                        <input
                            id="profile-name"
                            type="text"
                            class="input input-bordered"
                            prop:value=form_value(|f| &f.name)
                            on:input=move |ev| set_field(ProfileField::Name, event_target_value(&ev))
                        />
                    </div>
                    <div class="form-control">
                        <label class="label" for="profile-email">
                            <span class="label-text">"Email"</span>
                        </label>
                        <input
                            id="profile-email"
                            type="email"
                            class="input input-bordered"
                            prop:value=form_value(|f| &f.email)
                            on:input=move |ev| set_field(ProfileField::Email, event_target_value(&ev))
                        />
                    </div>
                    <div class="grid grid-cols-2 gap-4">
                        <div class="form-control">
                            <label class="label" for="profile-gender">
                                <span class="label-text">"Gender"</span>
                            </label>
                            <select
                                id="profile-gender"
                                class="select select-bordered w-full"
                                prop:value=form_value(|f| &f.gender)
                                on:change=move |ev| set_field(ProfileField::Gender, event_target_value(&ev))
                            >
                                <option value="">"Select"</option>
                                <option value="male">"Male"</option>
                                <option value="female">"Female"</option>
                                <option value="other">"Other"</option>
                            </select>
                        </div>
                        <div class="form-control">
                            <label class="label" for="profile-age">
                                <span class="label-text">"Age"</span>
                            </label>
                            <input
                                id="profile-age"
                                type="number"
                                class="input input-bordered"
                                prop:value=form_value(|f| &f.age)
                                on:input=move |ev| set_field(ProfileField::Age, event_target_value(&ev))
                            />
                        </div>
                    </div>

                    <div class="card-actions justify-end mt-6">
                        <button type="submit" class="btn btn-primary" disabled=saving>
                            {move || if saving() {
                                view! { <span class="loading loading-spinner"></span> "Saving..." }.into_any()
                            } else {
                                "Save Changes".into_any()
                            }}
                        </button>
                    </div>
                </form>
            </div>
        </Layout>
    }
}
