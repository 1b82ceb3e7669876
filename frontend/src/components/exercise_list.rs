use leptos::prelude::*;
use sqlab_shared::Exercise;
use sqlab_shared::protocol::file_name_of;

use crate::auth::use_session;
use crate::components::common::{Flash, FlashBanner, Loading};
use crate::web::dom;
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use crate::web::task::spawn_bound;

/// 列表行：练习与下载地址
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseRow {
    pub id: u64,
    pub title: String,
    pub file_url: Option<String>,
    /// 仅教师可见
    pub correction_url: Option<String>,
}

pub fn exercise_rows(
    exercises: Vec<Exercise>,
    is_teacher: bool,
    resolve: impl Fn(&str) -> String,
) -> Vec<ExerciseRow> {
    exercises
        .into_iter()
        .map(|e| ExerciseRow {
            id: e.id,
            title: e.title,
            file_url: e.file.as_deref().map(&resolve),
            correction_url: e
                .correction_models
                .as_deref()
                .filter(|_| is_teacher)
                .map(&resolve),
        })
        .collect()
}

#[component]
pub fn ExerciseListPage() -> impl IntoView {
    let ctx = use_session();
    let router = use_router();

    let (rows, set_rows) = signal(Vec::<ExerciseRow>::new());
    let (loading, set_loading) = signal(true);
    let (flash, set_flash) = signal(Option::<Flash>::None);

    spawn_bound(async move {
        let api = ctx.api();
        let (exercises, user) = futures::join!(api.exercises(), api.user_info());
        match exercises {
            Ok(list) => {
                let is_teacher = user.map(|u| u.is_teacher).unwrap_or(false);
                set_rows.set(exercise_rows(list, is_teacher, |f| api.file_url(f)));
            }
            Err(e) => match AppRoute::redirect_for(&e) {
                Some(route) => router.replace(&route.to_path()),
                None => set_flash.set(Flash::error(format!(
                    "Erreur lors du chargement des exercices : {}",
                    e.message()
                ))),
            },
        }
        set_loading.set(false);
    });

    view! {
        <div class="max-w-5xl mx-auto p-4 md:p-8 space-y-4">
            <h1 class="text-3xl font-bold">"Exercices"</h1>
            <FlashBanner flash=flash />
            <Show when=move || !loading.get() fallback=|| view! { <Loading label="Chargement des exercices..." /> }>
                <Show when=move || rows.with(|r| !r.is_empty()) fallback=|| view! {
                    <p class="text-base-content/60">"Aucun exercice disponible."</p>
                }>
                    <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                        <For
                            each=move || rows.get()
                            key=|row| row.id
                            children=move |row| view! { <ExerciseCard row=row /> }
                        />
                    </div>
                </Show>
            </Show>
        </div>
    }
}

#[component]
fn ExerciseCard(row: ExerciseRow) -> impl IntoView {
    let download = |url: String| {
        move |_: web_sys::MouseEvent| {
            let name = file_name_of(&url).to_string();
            dom::trigger_download(&url, &name);
        }
    };

    view! {
        <div class="card bg-base-100 shadow-md">
            <div class="card-body">
                <h2 class="card-title">{row.title.clone()}</h2>
                <div class="card-actions justify-end">
                    {row.file_url.clone().map(|url| view! {
                        <button class="btn btn-primary btn-sm" on:click=download(url)>"Télécharger"</button>
                    })}
                    {row.correction_url.clone().map(|url| view! {
                        <button class="btn btn-secondary btn-sm" on:click=download(url)>"Correction"</button>
                    })}
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(id: u64, file: Option<&str>, correction: Option<&str>) -> Exercise {
        Exercise {
            id,
            title: format!("Exercice {}", id),
            file: file.map(str::to_string),
            correction_models: correction.map(str::to_string),
        }
    }

    fn resolve(f: &str) -> String {
        format!("https://api.test{}", f)
    }

    #[test]
    fn corrections_are_hidden_from_students() {
        let list = vec![exercise(1, Some("/media/e1.pdf"), Some("/media/c1.pdf"))];
        let rows = exercise_rows(list, false, resolve);
        assert_eq!(rows[0].file_url.as_deref(), Some("https://api.test/media/e1.pdf"));
        assert_eq!(rows[0].correction_url, None);
    }

    #[test]
    fn teachers_get_correction_links() {
        let list = vec![
            exercise(1, Some("/media/e1.pdf"), Some("/media/c1.pdf")),
            exercise(2, None, None),
        ];
        let rows = exercise_rows(list, true, resolve);
        assert_eq!(rows[0].correction_url.as_deref(), Some("https://api.test/media/c1.pdf"));
        assert_eq!(rows[1].file_url, None);
        assert_eq!(rows[1].correction_url, None);
    }
}
