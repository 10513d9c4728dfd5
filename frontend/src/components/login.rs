use crate::auth::{login, signup, use_auth};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Login / signup form.
///
/// Successful authentication flips the auth signal; the router's
/// auth listener then resumes whatever destination was recorded,
/// so this component never navigates by itself.
#[component]
pub fn LoginPage() -> impl IntoView {
    let ctx = use_auth();
    let auth_state = ctx.state;

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (full_name, set_full_name) = signal(String::new());
    let (is_signup, set_is_signup) = signal(false);
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    // Prefill the email last used on this device once restoration settles
    Effect::new(move |_| {
        let state = auth_state.get();
        if !state.is_loading && !state.last_email.is_empty() && email.get_untracked().is_empty() {
            set_email.set(state.last_email.clone());
        }
    });

    let is_loading = move || auth_state.get().is_loading;

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if email.get().is_empty() || password.get().is_empty() {
            set_error_msg.set(Some("Please fill in all fields".to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        spawn_local(async move {
            let result = if is_signup.get_untracked() {
                let name = full_name.get_untracked();
                let name = if name.trim().is_empty() { None } else { Some(name) };
                signup(&ctx, email.get_untracked(), password.get_untracked(), name).await
            } else {
                login(&ctx, email.get_untracked(), password.get_untracked()).await
            };

            if let Err(e) = result {
                set_error_msg.set(Some(e.message().to_string()));
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <Show when=move || !is_loading() fallback=|| view! { <div class="flex items-center justify-center min-h-screen"><span class="loading loading-spinner loading-lg text-primary"></span></div> }>
            <div class="hero min-h-screen bg-base-200">
                <div class="hero-content flex-col w-full max-w-md">
                    <div class="text-center mb-4">
                        <div class="flex flex-col items-center gap-2">
                            <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                                <svg xmlns="http://www.w3.org/2000/svg" class="h-8 w-8" fill="none" viewBox="0 0 24 24" stroke="currentColor"><path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M19.428 15.428a2 2 0 00-1.022-.547l-2.387-.477a6 6 0 00-3.86.517l-.318.158a6 6 0 01-3.86.517L6.05 15.21a2 2 0 00-1.806.547M8 4h8l-1 1v5.172a2 2 0 00.586 1.414l5 5c1.26 1.26.367 3.414-1.415 3.414H4.828c-1.782 0-2.674-2.154-1.414-3.414l5-5A2 2 0 009 10.172V5L8 4z" /></svg>
                            </div>
                            <h1 class="text-3xl font-bold">"MediMind"</h1>
                            <p class="text-base-content/70">
                                {move || if is_signup.get() {
                                    "Create an account to manage your prescriptions"
                                } else {
                                    "Sign in to your prescription dashboard"
                                }}
                            </p>
                        </div>
                    </div>

                    <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                        <form class="card-body" on:submit=on_submit>
                            <div role="tablist" class="tabs tabs-boxed">
                                <a role="tab"
                                    class=move || if is_signup.get() { "tab" } else { "tab tab-active" }
                                    on:click=move |_| { set_is_signup.set(false); set_error_msg.set(None); }
                                >"Sign in"</a>
                                <a role="tab"
                                    class=move || if is_signup.get() { "tab tab-active" } else { "tab" }
                                    on:click=move |_| { set_is_signup.set(true); set_error_msg.set(None); }
                                >"Sign up"</a>
                            </div>

                            <Show when=move || error_msg.get().is_some()>
                                <div role="alert" class="alert alert-error text-sm py-2">
                                    <svg xmlns="http://www.w3.org/2000/svg" class="stroke-current shrink-0 h-6 w-6" fill="none" viewBox="0 0 24 24"><path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M10 14l2-2m0 0l2-2m-2 2l-2-2m2 2l2 2m7-2a9 9 0 11-18 0 9 9 0 0118 0z" /></svg>
                                    <span>{move || error_msg.get().unwrap()}</span>
                                </div>
                            </Show>

                            <Show when=move || is_signup.get()>
                                <div class="form-control">
                                    <label class="label" for="full_name">
                                        <span class="label-text">"Full name (optional)"</span>
                                    </label>
                                    <input
                                        id="full_name"
                                        type="text"
                                        placeholder="Ada Lovelace"
                                        on:input=move |ev| set_full_name.set(event_target_value(&ev))
                                        prop:value=full_name
                                        class="input input-bordered"
                                    />
                                </div>
                            </Show>

                            <div class="form-control">
                                <label class="label" for="email">
                                    <span class="label-text">"Email"</span>
                                </label>
                                <input
                                    id="email"
                                    type="email"
                                    placeholder="you@example.com"
                                    on:input=move |ev| set_email.set(event_target_value(&ev))
                                    prop:value=email
                                    class="input input-bordered"
                                    required
                                />
                            </div>
                            <div class="form-control">
                                <label class="label" for="password">
                                    <span class="label-text">"Password"</span>
                                </label>
                                <input
                                    id="password"
                                    type="password"
                                    placeholder="••••••••"
                                    on:input=move |ev| set_password.set(event_target_value(&ev))
                                    prop:value=password
                                    class="input input-bordered"
                                    required
                                />
                            </div>
                            <div class="form-control mt-6">
                                <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                    {move || if is_submitting.get() {
                                        view! { <span class="loading loading-spinner"></span> "Please wait..." }.into_any()
                                    } else if is_signup.get() {
                                        "Create account".into_any()
                                    } else {
                                        "Sign in".into_any()
                                    }}
                                </button>
                            </div>
                        </form>
                    </div>
                </div>
            </div>
        </Show>
    }
}
