use leptos::prelude::*;
use sqlab_shared::date::display_datetime;
use sqlab_shared::protocol::{Upload, file_name_of};
use sqlab_shared::report::{ScoreTone, score_label};
use sqlab_shared::{SubmissionRecord, SubmissionSummary};

use crate::auth::use_session;
use crate::components::common::{Flash, FlashBanner, Loading, PdfPicker};
use crate::validation::validate_pdf;
use crate::web::dom;
use crate::web::task::{TaskScope, spawn_bound};

/// 用编辑接口返回的记录更新列表中的对应行
///
/// 编辑接口不返回练习标题，保留原值。
pub fn apply_replacement(rows: &mut [SubmissionSummary], record: SubmissionRecord) {
    if let Some(row) = rows.iter_mut().find(|r| r.id == record.id) {
        row.file = record.file;
        row.submitted_at = record.submitted_at;
        row.score = record.score;
        row.feedback = record.feedback;
        row.is_locked = record.is_locked;
    }
}

#[component]
pub fn SubmissionListPage() -> impl IntoView {
    let ctx = use_session();
    let scope = TaskScope::current();

    let (submissions, set_submissions) = signal(Vec::<SubmissionSummary>::new());
    let (loading, set_loading) = signal(true);
    let (flash, set_flash) = signal(Option::<Flash>::None);
    let editing = RwSignal::new(Option::<u64>::None);
    let new_file = RwSignal::new(Option::<Upload>::None);

    spawn_bound(async move {
        match ctx.api().submissions().await {
            Ok(list) => set_submissions.set(list),
            Err(e) => {
                log::warn!("[Api] submissions: {}", e);
                set_flash.set(Flash::error(
                    "Échec du chargement des soumissions. Vérifiez votre connexion ou essayez à nouveau plus tard.",
                ));
            }
        }
        set_loading.set(false);
    });

    let cancel = move || {
        editing.set(None);
        new_file.set(None);
    };

    let replace = move |id: u64| {
        let Some(upload) = new_file.get() else {
            set_flash.set(Flash::error("Veuillez sélectionner un fichier."));
            return;
        };
        if let Err(msg) = validate_pdf(&upload) {
            set_flash.set(Flash::error(msg));
            return;
        }
        scope.spawn(async move {
            match ctx.api().replace_submission_file(id, upload).await {
                Ok(record) => {
                    set_submissions.update(|rows| apply_replacement(rows, record));
                    cancel();
                    set_flash.set(Flash::success("Soumission mise à jour avec succès !"));
                }
                Err(e) => {
                    log::warn!("[Api] replace submission {}: {}", id, e);
                    set_flash.set(Flash::error("Erreur lors de la mise à jour de la soumission."));
                }
            }
        });
    };

    view! {
        <div class="max-w-5xl mx-auto p-4 md:p-8 space-y-4">
            <h1 class="text-3xl font-bold">"Mes soumissions"</h1>
            <FlashBanner flash=flash />
            <Show when=move || !loading.get() fallback=|| view! { <Loading label="Chargement des soumissions..." /> }>
                <Show when=move || submissions.with(|s| !s.is_empty()) fallback=|| view! {
                    <p class="text-base-content/60">"Aucune soumission pour le moment."</p>
                }>
                    <div class="overflow-x-auto">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <th>"Exercice"</th>
                                    <th>"Date"</th>
                                    <th>"Note"</th>
                                    <th>"Feedback"</th>
                                    <th>"Fichier"</th>
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                <For
                                    each=move || submissions.get()
                                    key=|s| (s.id, s.submitted_at.clone(), s.is_locked)
                                    children=move |sub| {
                                        let id = sub.id;
                                        let file_url = sub.file.as_deref().map(|f| ctx.api().file_url(f));
                                        view! {
                                            <tr>
                                                <td>{sub.exercise_title.clone()}</td>
                                                <td>{display_datetime(&sub.submitted_at)}</td>
                                                <td>
                                                    <span class=ScoreTone::of(sub.score).badge_class()>
                                                        {score_label(sub.score)}
                                                    </span>
                                                </td>
                                                <td>{sub.feedback.clone().unwrap_or_else(|| "Aucun feedback".to_string())}</td>
                                                <td>
                                                    {file_url.map(|url| {
                                                        let name = file_name_of(&url).to_string();
                                                        view! {
                                                            <button
                                                                class="btn btn-link btn-xs"
                                                                on:click=move |_| dom::trigger_download(&url, &name)
                                                            >"Télécharger"</button>
                                                        }
                                                    })}
                                                </td>
                                                <td>
                                                    {if sub.is_locked {
                                                        view! { <span class="badge badge-neutral">"Verrouillée"</span> }.into_any()
                                                    } else {
                                                        view! {
                                                            <Show
                                                                when=move || editing.get() == Some(id)
                                                                fallback=move || view! {
                                                                    <button
                                                                        class="btn btn-outline btn-xs"
                                                                        on:click=move |_| {
                                                                            new_file.set(None);
                                                                            editing.set(Some(id));
                                                                        }
                                                                    >"Modifier"</button>
                                                                }
                                                            >
                                                                <div class="flex flex-col gap-2">
                                                                    <PdfPicker
                                                                        label="Nouveau fichier PDF"
                                                                        selected=Signal::derive(move || new_file.get().map(|f| f.file_name))
                                                                        on_pick=move |upload: Upload| new_file.set(Some(upload))
                                                                        on_reject=move |msg: String| set_flash.set(Flash::error(msg))
                                                                    />
                                                                    <div class="flex gap-2">
                                                                        <button class="btn btn-primary btn-xs" on:click=move |_| replace(id)>"Enregistrer"</button>
                                                                        <button class="btn btn-ghost btn-xs" on:click=move |_| cancel()>"Annuler"</button>
                                                                    </div>
                                                                </div>
                                                            </Show>
                                                        }.into_any()
                                                    }}
                                                </td>
                                            </tr>
                                        }
                                    }
                                />
                            </tbody>
                        </table>
                    </div>
                </Show>
            </Show>
        </div>
    }
}
