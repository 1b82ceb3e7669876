use leptos::prelude::*;
use sqlab_shared::SubmissionRecord;
use sqlab_shared::date::display_datetime;
use sqlab_shared::protocol::file_name_of;
use sqlab_shared::report::{ScoreTone, score_label};

use crate::auth::use_session;
use crate::components::common::{Flash, FlashBanner, Loading};
use crate::validation::validate_adjustment;
use crate::web::dom;
use crate::web::router::Link;
use crate::web::task::{TaskScope, spawn_bound};

pub fn exercise_title_or_fallback(title: Option<String>, exercise_id: u64) -> String {
    title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| format!("Exercice {}", exercise_id))
}

/// 正在编辑的评分
#[derive(Clone, Copy)]
struct AdjustForm {
    submission: RwSignal<Option<u64>>,
    score: RwSignal<String>,
    feedback: RwSignal<String>,
}

impl AdjustForm {
    fn new() -> Self {
        Self {
            submission: RwSignal::new(None),
            score: RwSignal::new(String::new()),
            feedback: RwSignal::new(String::new()),
        }
    }

    fn open(&self, sub: &SubmissionRecord) {
        self.submission.set(Some(sub.id));
        self.score
            .set(sub.score.map(|s| s.to_string()).unwrap_or_default());
        self.feedback.set(sub.feedback.clone().unwrap_or_default());
    }

    fn close(&self) {
        self.submission.set(None);
        self.score.set(String::new());
        self.feedback.set(String::new());
    }
}

#[component]
pub fn TeacherSubmissionsPage(exercise_id: u64) -> impl IntoView {
    let ctx = use_session();
    let scope = TaskScope::current();

    let (title, set_title) = signal(format!("Exercice {}", exercise_id));
    let (submissions, set_submissions) = signal(Vec::<SubmissionRecord>::new());
    let (loading, set_loading) = signal(true);
    let (flash, set_flash) = signal(Option::<Flash>::None);
    let form = AdjustForm::new();

    spawn_bound(async move {
        let api = ctx.api();
        let (detail, list) = futures::join!(
            api.exercise(exercise_id),
            api.exercise_submissions(exercise_id)
        );
        set_title.set(exercise_title_or_fallback(
            detail.ok().map(|d| d.title),
            exercise_id,
        ));
        match list {
            Ok(list) => set_submissions.set(list),
            Err(e) => {
                log::warn!("[Api] exercise {} submissions: {}", exercise_id, e);
                set_flash.set(Flash::error(
                    "Échec du chargement des soumissions ou des détails de l'exercice. Vérifiez vos permissions ou la connexion.",
                ));
            }
        }
        set_loading.set(false);
    });

    let submit_adjust = move |id: u64| {
        let adjustment = match validate_adjustment(&form.score.get(), &form.feedback.get()) {
            Ok(a) => a,
            Err(msg) => {
                set_flash.set(Flash::error(msg));
                return;
            }
        };
        scope.spawn(async move {
            let api = ctx.api();
            let result = match api.adjust_submission(id, adjustment).await {
                Ok(_) => api.exercise_submissions(exercise_id).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(list) => {
                    set_submissions.set(list);
                    form.close();
                    set_flash.set(Flash::success("Note et feedback mis à jour avec succès !"));
                }
                Err(e) => {
                    log::warn!("[Api] adjust submission {}: {}", id, e);
                    set_flash.set(Flash::error("Erreur lors de la mise à jour de la soumission."));
                }
            }
        });
    };

    view! {
        <div class="max-w-6xl mx-auto p-4 md:p-8 space-y-4">
            <Link to="/teacher-dashboard" class="btn btn-ghost btn-sm">"← Retour au tableau de bord"</Link>
            <h1 class="text-3xl font-bold">"Soumissions pour l'exercice : " {title}</h1>
            <FlashBanner flash=flash />
            <Show when=move || !loading.get() fallback=|| view! { <Loading label="Chargement des soumissions..." /> }>
                <Show when=move || submissions.with(|s| !s.is_empty()) fallback=|| view! {
                    <p class="text-base-content/60">"Aucune soumission pour cet exercice."</p>
                }>
                    <div class="overflow-x-auto">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <th>"Étudiant"</th>
                                    <th>"Date"</th>
                                    <th>"Fichier"</th>
                                    <th>"Note"</th>
                                    <th>"Feedback"</th>
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                <For
                                    each=move || submissions.get()
                                    key=|s| (s.id, s.score, s.feedback.clone())
                                    children=move |sub| {
                                        let id = sub.id;
                                        let file = sub.file.clone().map(|f| ctx.api().file_url(&f));
                                        let editable = sub.clone();
                                        view! {
                                            <tr>
                                                <td>{sub.student.username.clone()}</td>
                                                <td>{display_datetime(&sub.submitted_at)}</td>
                                                <td>
                                                    {file.map(|url| {
                                                        let name = file_name_of(&url).to_string();
                                                        view! {
                                                            <button class="btn btn-link btn-xs" on:click=move |_| dom::trigger_download(&url, &name)>
                                                                "Télécharger"
                                                            </button>
                                                        }
                                                    })}
                                                </td>
                                                <td>
                                                    <span class=ScoreTone::of(sub.score).badge_class()>{score_label(sub.score)}</span>
                                                    {sub.is_locked.then(|| view! { <span class="badge badge-neutral ml-1">"Verrouillée"</span> })}
                                                </td>
                                                <td>{sub.feedback.clone().unwrap_or_default()}</td>
                                                <td>
                                                    <Show
                                                        when=move || form.submission.get() == Some(id)
                                                        fallback=move || {
                                                            let editable = editable.clone();
                                                            view! {
                                                                <button class="btn btn-outline btn-xs" on:click=move |_| form.open(&editable)>
                                                                    "Ajuster"
                                                                </button>
                                                            }
                                                        }
                                                    >
                                                        <div class="flex flex-col gap-2 min-w-56">
                                                            <input
                                                                type="number"
                                                                min="0"
                                                                max="20"
                                                                step="1"
                                                                class="input input-bordered input-sm"
                                                                placeholder="Note /20"
                                                                prop:value=form.score
                                                                on:input=move |ev| form.score.set(event_target_value(&ev))
                                                            />
                                                            <textarea
                                                                class="textarea textarea-bordered textarea-sm"
                                                                placeholder="Feedback"
                                                                prop:value=form.feedback
                                                                on:input=move |ev| form.feedback.set(event_target_value(&ev))
                                                            ></textarea>
                                                            <div class="flex gap-2">
                                                                <button class="btn btn-primary btn-xs" on:click=move |_| submit_adjust(id)>"Valider"</button>
                                                                <button class="btn btn-ghost btn-xs" on:click=move |_| form.close()>"Annuler"</button>
                                                            </div>
                                                        </div>
                                                    </Show>
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_title_falls_back_to_id() {
        assert_eq!(exercise_title_or_fallback(None, 4), "Exercice 4");
        assert_eq!(exercise_title_or_fallback(Some("  ".to_string()), 4), "Exercice 4");
        assert_eq!(
            exercise_title_or_fallback(Some("Agrégats".to_string()), 4),
            "Agrégats"
        );
    }
}
