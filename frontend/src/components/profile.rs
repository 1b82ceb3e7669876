use leptos::prelude::*;
use sqlab_shared::UserInfo;

use crate::auth::{refresh, sync_role, use_session};
use crate::components::common::{Flash, FlashBanner, Loading};
use crate::error::ClientErrorKind;
use crate::nav::profile_sections;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};
use crate::web::task::{TaskScope, spawn_bound};

#[component]
pub fn ProfilePage() -> impl IntoView {
    let ctx = use_session();
    let router = use_router();
    let scope = TaskScope::current();

    // 守卫重定向带来的提示只显示一次
    let notice = router.take_notice();

    let (user, set_user) = signal(Option::<UserInfo>::None);
    let (flash, set_flash) = signal(Option::<Flash>::None);
    let (expired, set_expired) = signal(false);
    let reload = RwSignal::new(0u32);

    Effect::new(move |_| {
        reload.track();
        spawn_bound(async move {
            match ctx.api().user_info().await {
                Ok(info) => {
                    if sync_role(&ctx.store(), &info) {
                        ctx.reload();
                    }
                    set_expired.set(false);
                    set_user.set(Some(info));
                }
                Err(e) if e.kind == ClientErrorKind::MissingSession => {
                    router.replace(&AppRoute::Login.to_path());
                }
                Err(e) if e.kind == ClientErrorKind::Unauthorized => {
                    set_expired.set(true);
                    set_flash.set(Flash::error(
                        "Ta session a expiré. Rafraîchis-la ou reconnecte-toi.",
                    ));
                }
                Err(e) => set_flash.set(Flash::error(e.message())),
            }
        });
    });

    let on_refresh = move |_| {
        scope.spawn(async move {
            match refresh(ctx).await {
                Ok(()) => {
                    set_flash.set(None);
                    reload.update(|n| *n += 1);
                }
                Err(_) => set_flash.set(Flash::error(
                    "Impossible de rafraîchir la session. Veuillez vous reconnecter.",
                )),
            }
        });
    };

    view! {
        <div class="max-w-4xl mx-auto p-4 md:p-8 space-y-6">
            {notice.map(|n| view! {
                <div role="alert" class="alert alert-warning"><span>{n}</span></div>
            })}
            <FlashBanner flash=flash />
            <Show when=move || expired.get()>
                <div class="flex gap-2">
                    <button class="btn btn-primary btn-sm" on:click=on_refresh>"Rafraîchir la session"</button>
                    <Link to="/login" class="btn btn-ghost btn-sm">"Se reconnecter"</Link>
                </div>
            </Show>

            {move || match user.get() {
                None if !expired.get() && flash.get().is_none() => {
                    view! { <Loading label="Chargement de votre profil..." /> }.into_any()
                }
                None => ().into_any(),
                Some(info) => {
                    let role = info.role();
                    let role_label = match role {
                        sqlab_shared::Role::Teacher => "Enseignant",
                        sqlab_shared::Role::Student => "Étudiant",
                    };
                    view! {
                        <div class="card bg-base-100 shadow-xl">
                            <div class="card-body">
                                <h2 class="card-title text-2xl">"Bonjour, " {info.username.clone()}</h2>
                                <p class="text-base-content/70">{info.email.clone()}</p>
                                <div class="badge badge-primary">{role_label}</div>
                            </div>
                        </div>
                        <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                            {profile_sections(role)
                                .into_iter()
                                .map(|item| view! {
                                    <Link to=item.route.to_path() class="btn btn-outline justify-start">
                                        {item.label}
                                    </Link>
                                })
                                .collect_view()}
                        </div>
                    }
                    .into_any()
                }
            }}
        </div>
    }
}
