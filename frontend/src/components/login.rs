use leptos::prelude::*;

use crate::auth::{login, use_session};
use crate::components::common::{Flash, FlashBanner};
use crate::validation::validate_credentials;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};
use crate::web::task::TaskScope;

#[component]
pub fn LoginPage() -> impl IntoView {
    let ctx = use_session();
    let router = use_router();
    let scope = TaskScope::current();

    let (username, set_username) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (flash, set_flash) = signal(Option::<Flash>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let credentials = match validate_credentials(&username.get(), &password.get()) {
            Ok(c) => c,
            Err(msg) => {
                set_flash.set(Flash::error(msg));
                return;
            }
        };

        set_is_submitting.set(true);
        set_flash.set(None);

        scope.spawn(async move {
            match login(ctx, credentials).await {
                Ok(()) => {
                    // 守卫拦截前的路径优先，否则进入个人页
                    let target = router
                        .return_to()
                        .unwrap_or_else(|| AppRoute::auth_success_redirect().to_path());
                    router.navigate(&target);
                }
                Err(msg) => set_flash.set(Flash::error(msg)),
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-[80vh] bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"Connexion"</h1>
                    <p class="text-base-content/70">"Accède à tes exercices SQL"</p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <FlashBanner flash=flash />

                        <div class="form-control">
                            <label class="label" for="username">
                                <span class="label-text">"Nom d'utilisateur"</span>
                            </label>
                            <input
                                id="username"
                                type="text"
                                autocomplete="username"
                                on:input=move |ev| set_username.set(event_target_value(&ev))
                                prop:value=username
                                class="input input-bordered"
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Mot de passe"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                autocomplete="current-password"
                                placeholder="••••••••"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Connexion..." }.into_any()
                                } else {
                                    "Se connecter".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-sm text-center mt-2">
                            "Pas encore de compte ? "
                            <Link to="/register" class="link link-primary">"S'inscrire"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
