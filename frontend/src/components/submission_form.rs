use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use sqlab_shared::Exercise;
use sqlab_shared::protocol::Upload;

use crate::auth::use_session;
use crate::components::common::{Flash, FlashBanner, Loading};
use crate::validation::validate_submission;
use crate::web::dom;
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use crate::web::task::{TaskScope, spawn_bound};

/// 提交成功后跳转前的停留时间
const REDIRECT_DELAY_MS: u32 = 1500;

#[component]
pub fn SubmissionFormPage() -> impl IntoView {
    let ctx = use_session();
    let router = use_router();
    let scope = TaskScope::current();

    let (exercises, set_exercises) = signal(Vec::<Exercise>::new());
    let (loading, set_loading) = signal(true);
    let exercise_id = RwSignal::new(Option::<u64>::None);
    let file = RwSignal::new(Option::<Upload>::None);
    let (dragging, set_dragging) = signal(false);
    let (submitting, set_submitting) = signal(false);
    let (flash, set_flash) = signal(Option::<Flash>::None);

    spawn_bound(async move {
        match ctx.api().exercises().await {
            Ok(list) => set_exercises.set(list),
            Err(e) => match AppRoute::redirect_for(&e) {
                Some(route) => router.replace(&route.to_path()),
                None => {
                    log::warn!("[Api] exercises: {}", e);
                    set_flash.set(Flash::error(
                        "Impossible de récupérer les exercices. Veuillez réessayer.",
                    ));
                }
            },
        }
        set_loading.set(false);
    });

    let accept_file = move |picked: Option<web_sys::File>| {
        let Some(picked) = picked else {
            return;
        };
        scope.spawn(async move {
            match dom::read_upload(picked).await {
                Ok(upload) if upload.is_pdf() => {
                    set_flash.set(None);
                    file.set(Some(upload));
                }
                _ => {
                    file.set(None);
                    set_flash.set(Flash::error("Veuillez déposer un fichier PDF valide."));
                }
            }
        });
    };

    let on_drop = move |ev: web_sys::DragEvent| {
        ev.prevent_default();
        set_dragging.set(false);
        accept_file(dom::dropped_file(&ev));
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let (id, upload) = match validate_submission(exercise_id.get(), file.get().as_ref()) {
            Ok(v) => v,
            Err(msg) => {
                set_flash.set(Flash::error(msg));
                return;
            }
        };

        set_submitting.set(true);
        set_flash.set(None);
        scope.spawn(async move {
            match ctx.api().submit(id, upload).await {
                Ok(receipt) => {
                    log::info!("[Api] submission {} created", receipt.id);
                    set_flash.set(Flash::success(
                        "Soumission envoyée ! Redirection vers vos soumissions...",
                    ));
                    set_submitting.set(false);
                    TimeoutFuture::new(REDIRECT_DELAY_MS).await;
                    router.navigate(&AppRoute::Submissions.to_path());
                }
                Err(e) => {
                    set_submitting.set(false);
                    match AppRoute::redirect_for(&e) {
                        Some(route) => router.replace(&route.to_path()),
                        None => set_flash.set(Flash::error(e.message())),
                    }
                }
            }
        });
    };

    view! {
        <div class="max-w-2xl mx-auto p-4 md:p-8 space-y-4">
            <h1 class="text-3xl font-bold">"Soumettre une réponse"</h1>
            <p class="text-base-content/70">"Sélectionnez un exercice et téléversez votre fichier PDF"</p>
            <FlashBanner flash=flash />

            <Show when=move || !loading.get() fallback=|| view! { <Loading label="Chargement des exercices..." /> }>
                <form class="card bg-base-100 shadow-xl card-body space-y-4" on:submit=on_submit>
                    <select
                        class="select select-bordered w-full"
                        on:change=move |ev| exercise_id.set(event_target_value(&ev).parse().ok())
                    >
                        <option value="" selected=move || exercise_id.get().is_none()>"Choisir un exercice"</option>
                        <For
                            each=move || exercises.get()
                            key=|e| e.id
                            children=move |e| view! {
                                <option value=e.id.to_string()>{e.title}</option>
                            }
                        />
                    </select>

                    <div
                        class=move || if dragging.get() {
                            "border-2 border-dashed border-primary rounded-box p-8 text-center bg-base-200"
                        } else {
                            "border-2 border-dashed border-base-300 rounded-box p-8 text-center"
                        }
                        on:dragover=move |ev: web_sys::DragEvent| {
                            ev.prevent_default();
                            set_dragging.set(true);
                        }
                        on:dragleave=move |_| set_dragging.set(false)
                        on:drop=on_drop
                    >
                        <p>"Glissez-déposez votre fichier PDF ici"</p>
                        <p class="text-sm text-base-content/60 my-2">"ou"</p>
                        <input
                            type="file"
                            accept="application/pdf"
                            class="file-input file-input-bordered file-input-sm"
                            on:change=move |ev| {
                                let input = event_target::<web_sys::HtmlInputElement>(&ev);
                                accept_file(dom::first_file(&input));
                            }
                        />
                        {move || file.get().map(|f| view! {
                            <div class="badge badge-primary badge-lg mt-3">{f.file_name}</div>
                        })}
                    </div>

                    <button class="btn btn-primary" disabled=move || submitting.get()>
                        {move || if submitting.get() { "Envoi..." } else { "Soumettre" }}
                    </button>
                </form>
            </Show>
        </div>
    }
}
