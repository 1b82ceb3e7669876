use leptos::prelude::*;

use crate::auth::{register, use_session};
use crate::components::common::{Flash, FlashBanner};
use crate::validation::validate_registration;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};
use crate::web::task::TaskScope;

#[component]
pub fn RegisterPage() -> impl IntoView {
    let ctx = use_session();
    let router = use_router();
    let scope = TaskScope::current();

    let username = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let is_teacher = RwSignal::new(false);
    let (is_submitting, set_is_submitting) = signal(false);
    let (flash, set_flash) = signal(Option::<Flash>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let request = match validate_registration(
            &username.get(),
            &email.get(),
            &password.get(),
            is_teacher.get(),
        ) {
            Ok(r) => r,
            Err(msg) => {
                set_flash.set(Flash::error(msg));
                return;
            }
        };

        set_is_submitting.set(true);
        set_flash.set(None);

        scope.spawn(async move {
            match register(ctx, request).await {
                Ok(()) => router.navigate(&AppRoute::Login.to_path()),
                Err(msg) => set_flash.set(Flash::error(msg)),
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-[80vh] bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <h1 class="text-3xl font-bold">"Inscription"</h1>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <FlashBanner flash=flash />

                        <label class="form-control">
                            <span class="label-text">"Nom d'utilisateur"</span>
                            <input
                                type="text"
                                class="input input-bordered"
                                on:input=move |ev| username.set(event_target_value(&ev))
                                prop:value=username
                            />
                        </label>
                        <label class="form-control">
                            <span class="label-text">"Adresse e-mail"</span>
                            <input
                                type="email"
                                class="input input-bordered"
                                on:input=move |ev| email.set(event_target_value(&ev))
                                prop:value=email
                            />
                        </label>
                        <label class="form-control">
                            <span class="label-text">"Mot de passe (8 caractères minimum)"</span>
                            <input
                                type="password"
                                class="input input-bordered"
                                on:input=move |ev| password.set(event_target_value(&ev))
                                prop:value=password
                            />
                        </label>
                        <label class="label cursor-pointer justify-start gap-3">
                            <input
                                type="checkbox"
                                class="checkbox checkbox-primary"
                                prop:checked=is_teacher
                                on:change=move |ev| is_teacher.set(event_target_checked(&ev))
                            />
                            <span class="label-text">"Je suis enseignant"</span>
                        </label>

                        <button class="btn btn-primary mt-4" disabled=move || is_submitting.get()>
                            "S'inscrire"
                        </button>
                        <p class="text-sm text-center mt-2">
                            "Déjà inscrit ? "
                            <Link to="/login" class="link link-primary">"Se connecter"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
