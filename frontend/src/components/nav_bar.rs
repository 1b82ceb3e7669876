use leptos::prelude::*;

use crate::auth::{logout, use_session};
use crate::nav::header_items;
use crate::theme::use_theme;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};

#[component]
pub fn NavBar() -> impl IntoView {
    let ctx = use_session();
    let theme = use_theme();
    let router = use_router();
    let session = ctx.session();

    let on_logout = move |_| {
        logout(ctx);
        router.navigate(&AppRoute::Home.to_path());
    };

    let is_dark = move || theme.dark_mode().get().unwrap_or(false);

    view! {
        <div class="navbar bg-base-100 shadow-md px-4">
            <div class="flex-1">
                <Link to="/" class="btn btn-ghost text-xl font-bold">"Smart Query"</Link>
            </div>
            <div class="flex-none gap-2">
                <ul class="menu menu-horizontal px-1">
                    <For
                        each=move || header_items(&session.get())
                        key=|item| item.route.to_path()
                        children=move |item| {
                            let path = item.route.to_path();
                            let target = item.route.clone();
                            let active = move || router.current_route().get() == target;
                            view! {
                                <li>
                                    <Link to=path>
                                        <span class:font-semibold=active>{item.label}</span>
                                    </Link>
                                </li>
                            }
                        }
                    />
                </ul>
                <label class="label cursor-pointer gap-2">
                    <span class="label-text">"Mode sombre"</span>
                    <input
                        type="checkbox"
                        class="toggle toggle-secondary"
                        prop:checked=is_dark
                        on:change=move |_| theme.toggle()
                    />
                </label>
                <Show when=move || session.get().is_authenticated()>
                    <button class="btn btn-outline btn-error btn-sm" on:click=on_logout>
                        "Déconnexion"
                    </button>
                </Show>
            </div>
        </div>
    }
}
