mod exercise_dialog;
mod form_state;

use leptos::prelude::*;
use sqlab_shared::TeacherExercise;
use sqlab_shared::date::display_date;
use sqlab_shared::protocol::{Upload, file_name_of};

use crate::auth::use_session;
use crate::components::common::{Flash, FlashBanner, Loading, PdfPicker};
use crate::web::dom;
use crate::web::route::AppRoute;
use crate::web::router::Link;
use crate::web::task::{TaskScope, spawn_bound};
use exercise_dialog::ExerciseDialog;
use form_state::FormState;

/// 练习及其提交数
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardRow {
    pub exercise: TeacherExercise,
    pub submissions: usize,
}

pub fn dashboard_rows(exercises: Vec<TeacherExercise>, counts: &[(u64, usize)]) -> Vec<DashboardRow> {
    exercises
        .into_iter()
        .map(|exercise| {
            let submissions = counts
                .iter()
                .find(|(id, _)| *id == exercise.id)
                .map(|(_, n)| *n)
                .unwrap_or(0);
            DashboardRow {
                exercise,
                submissions,
            }
        })
        .collect()
}

pub fn total_submissions(rows: &[DashboardRow]) -> usize {
    rows.iter().map(|r| r.submissions).sum()
}

#[component]
pub fn TeacherDashboardPage() -> impl IntoView {
    let ctx = use_session();
    let scope = TaskScope::current();

    let (rows, set_rows) = signal(Vec::<DashboardRow>::new());
    let (loading, set_loading) = signal(true);
    let (flash, set_flash) = signal(Option::<Flash>::None);
    let reload = RwSignal::new(0u32);
    let editing = RwSignal::new(Option::<u64>::None);
    let confirming = RwSignal::new(Option::<u64>::None);
    let edit_form = FormState::new();

    Effect::new(move |_| {
        reload.track();
        spawn_bound(async move {
            let api = ctx.api();
            match api.teacher_exercises().await {
                Ok(exercises) => {
                    let ids: Vec<u64> = exercises.iter().map(|e| e.id).collect();
                    let counts = api.submission_counts(&ids).await;
                    set_rows.set(dashboard_rows(exercises, &counts));
                }
                Err(e) => set_flash.set(Flash::error(format!("Erreur: {}", e.message()))),
            }
            set_loading.set(false);
        });
    });

    let refetch = move || reload.update(|n| *n += 1);

    let on_created = move |_: ()| {
        set_flash.set(Flash::success("Exercice ajouté avec succès !"));
        refetch();
    };

    let start_edit = move |exercise: &TeacherExercise| {
        confirming.set(None);
        edit_form.load(exercise);
        editing.set(Some(exercise.id));
    };

    let cancel_edit = move || {
        editing.set(None);
        edit_form.reset();
    };

    let save_edit = move |id: u64| {
        let draft = match edit_form.to_draft(false) {
            Ok(d) => d,
            Err(msg) => {
                set_flash.set(Flash::error(msg));
                return;
            }
        };
        scope.spawn(async move {
            match ctx
                .api()
                .edit_exercise(id, &draft.title, draft.file, draft.correction)
                .await
            {
                Ok(_) => {
                    cancel_edit();
                    set_flash.set(Flash::success("Exercice modifié avec succès !"));
                    refetch();
                }
                Err(e) => set_flash.set(Flash::error(format!("Erreur: {}", e.message()))),
            }
        });
    };

    let delete = move |id: u64| {
        confirming.set(None);
        scope.spawn(async move {
            match ctx.api().delete_exercise(id).await {
                Ok(()) => {
                    set_rows.update(|rows| rows.retain(|r| r.exercise.id != id));
                    set_flash.set(Flash::success("Exercice supprimé."));
                }
                Err(e) => set_flash.set(Flash::error(format!("Erreur: {}", e.message()))),
            }
        });
    };

    view! {
        <div class="max-w-6xl mx-auto p-4 md:p-8 space-y-6">
            <div class="flex flex-wrap justify-between items-center gap-4">
                <h1 class="text-3xl font-bold">"Tableau de bord enseignant"</h1>
                <div class="flex gap-2">
                    <Link to=AppRoute::TeacherStatistics.to_path() class="btn btn-outline">"Statistiques"</Link>
                    <ExerciseDialog on_created=on_created />
                </div>
            </div>

            <FlashBanner flash=flash />

            <div class="stats shadow w-full">
                <div class="stat">
                    <div class="stat-title">"Exercices"</div>
                    <div class="stat-value">{move || rows.with(|r| r.len())}</div>
                </div>
                <div class="stat">
                    <div class="stat-title">"Soumissions"</div>
                    <div class="stat-value">{move || rows.with(|r| total_submissions(r))}</div>
                </div>
            </div>

            <Show when=move || !loading.get() fallback=|| view! { <Loading label="Chargement des exercices..." /> }>
                <Show when=move || rows.with(|r| !r.is_empty()) fallback=|| view! {
                    <p class="text-base-content/60">"Aucun exercice pour le moment."</p>
                }>
                    <div class="grid gap-4">
                        <For
                            each=move || rows.get()
                            key=|r| (r.exercise.id, r.exercise.title.clone(), r.exercise.file.clone(), r.submissions)
                            children=move |row| {
                                let id = row.exercise.id;
                                let count = row.submissions;
                                let exercise = row.exercise.clone();
                                let api = ctx.api();
                                let statement = row.exercise.file.as_deref().map(|f| api.file_url(f));
                                let correction = row.exercise.correction_models.as_deref().map(|f| api.file_url(f));
                                view! {
                                    <div class="card bg-base-100 shadow">
                                        <div class="card-body">
                                            <Show
                                                when=move || editing.get() == Some(id)
                                                fallback=move || {
                                                    let exercise = exercise.clone();
                                                    let statement = statement.clone();
                                                    let correction = correction.clone();
                                                    view! {
                                                        <h2 class="card-title">{exercise.title.clone()}</h2>
                                                        <p class="text-sm text-base-content/60">
                                                            "Créé le " {display_date(&exercise.created_at)}
                                                            " · " {count} " soumission(s)"
                                                        </p>
                                                        <div class="flex flex-wrap gap-2">
                                                            {statement.map(|url| download_button("Énoncé", url))}
                                                            {correction.map(|url| download_button("Correction", url))}
                                                        </div>
                                                        <div class="card-actions justify-end">
                                                            <Link
                                                                to=AppRoute::TeacherSubmissions(id).to_path()
                                                                class="btn btn-sm btn-primary"
                                                            >"Voir les soumissions"</Link>
                                                            <button class="btn btn-sm btn-outline" on:click={
                                                                let exercise = exercise.clone();
                                                                move |_| start_edit(&exercise)
                                                            }>"Modifier"</button>
                                                            <Show
                                                                when=move || confirming.get() == Some(id)
                                                                fallback=move || view! {
                                                                    <button class="btn btn-sm btn-error btn-outline" on:click=move |_| confirming.set(Some(id))>
                                                                        "Supprimer"
                                                                    </button>
                                                                }
                                                            >
                                                                <span class="text-sm self-center">"Confirmer la suppression ?"</span>
                                                                <button class="btn btn-sm btn-error" on:click=move |_| delete(id)>"Oui"</button>
                                                                <button class="btn btn-sm btn-ghost" on:click=move |_| confirming.set(None)>"Non"</button>
                                                            </Show>
                                                        </div>
                                                    }
                                                }
                                            >
                                                <div class="space-y-3">
                                                    <input
                                                        type="text"
                                                        class="input input-bordered w-full"
                                                        prop:value=edit_form.title
                                                        on:input=move |ev| edit_form.title.set(event_target_value(&ev))
                                                    />
                                                    <PdfPicker
                                                        label="Nouvel énoncé (optionnel)"
                                                        selected=edit_form.file_name()
                                                        on_pick=move |upload: Upload| edit_form.file.set(Some(upload))
                                                        on_reject=move |msg: String| set_flash.set(Flash::error(msg))
                                                    />
                                                    <PdfPicker
                                                        label="Nouvelle correction (optionnel)"
                                                        selected=edit_form.correction_name()
                                                        on_pick=move |upload: Upload| edit_form.correction.set(Some(upload))
                                                        on_reject=move |msg: String| set_flash.set(Flash::error(msg))
                                                    />
                                                    <div class="flex gap-2 justify-end">
                                                        <button class="btn btn-sm btn-ghost" on:click=move |_| cancel_edit()>"Annuler"</button>
                                                        <button class="btn btn-sm btn-primary" on:click=move |_| save_edit(id)>"Enregistrer"</button>
                                                    </div>
                                                </div>
                                            </Show>
                                        </div>
                                    </div>
                                }
                            }
                        />
                    </div>
                </Show>
            </Show>
        </div>
    }
}

fn download_button(label: &'static str, url: String) -> impl IntoView {
    let name = file_name_of(&url).to_string();
    view! {
        <button class="btn btn-xs btn-link" on:click=move |_| dom::trigger_download(&url, &name)>
            {label}
        </button>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(id: u64) -> TeacherExercise {
        TeacherExercise {
            id,
            title: format!("Exercice {}", id),
            file: None,
            correction_models: None,
            created_at: "2025-02-01T09:00:00Z".to_string(),
        }
    }

    #[test]
    fn rows_pick_counts_by_id() {
        let rows = dashboard_rows(vec![exercise(1), exercise(2), exercise(3)], &[(3, 4), (1, 2)]);
        let counts: Vec<usize> = rows.iter().map(|r| r.submissions).collect();
        assert_eq!(counts, vec![2, 0, 4]);
        assert_eq!(total_submissions(&rows), 6);
    }

    #[test]
    fn empty_dashboard_totals_zero() {
        assert_eq!(total_submissions(&dashboard_rows(Vec::new(), &[])), 0);
    }
}
