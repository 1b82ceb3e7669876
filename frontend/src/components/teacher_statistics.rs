use leptos::prelude::*;
use sqlab_shared::MAX_SCORE;
use sqlab_shared::report::{StatisticsRow, statistics_rows};

use crate::auth::use_session;
use crate::components::common::{Flash, FlashBanner, Loading};
use crate::web::task::spawn_bound;

#[component]
pub fn TeacherStatisticsPage() -> impl IntoView {
    let ctx = use_session();

    let (rows, set_rows) = signal(Vec::<StatisticsRow>::new());
    let (loading, set_loading) = signal(true);
    let (flash, set_flash) = signal(Option::<Flash>::None);

    spawn_bound(async move {
        match ctx.api().teacher_statistics().await {
            Ok(stats) => set_rows.set(statistics_rows(&stats)),
            Err(e) => set_flash.set(Flash::error(format!(
                "Erreur lors de la récupération des statistiques : {}",
                e.message()
            ))),
        }
        set_loading.set(false);
    });

    view! {
        <div class="max-w-5xl mx-auto p-4 md:p-8 space-y-6">
            <h1 class="text-3xl font-bold">"Statistiques"</h1>
            <FlashBanner flash=flash />
            <Show when=move || !loading.get() fallback=|| view! { <Loading label="Chargement des statistiques..." /> }>
                <div class="overflow-x-auto">
                    <table class="table w-full">
                        <thead>
                            <tr>
                                <th>"Exercice"</th>
                                <th>"Soumissions"</th>
                                <th>"Moyenne"</th>
                                <th class="w-1/2"></th>
                            </tr>
                        </thead>
                        <tbody>
                            <For
                                each=move || rows.get()
                                key=|r| r.exercise_id
                                children=move |row| {
                                    let width = format!(
                                        "width: {:.0}%",
                                        (row.average_score / MAX_SCORE as f64 * 100.0).clamp(0.0, 100.0)
                                    );
                                    view! {
                                        <tr>
                                            <td>{format!("Exercice {}", row.exercise_id)}</td>
                                            <td>{row.submission_count}</td>
                                            <td>{row.average_label()}</td>
                                            <td>
                                                <div class="w-full bg-base-200 rounded h-3">
                                                    <div class="bg-secondary h-3 rounded" style=width></div>
                                                </div>
                                            </td>
                                        </tr>
                                    }
                                }
                            />
                        </tbody>
                    </table>
                </div>
            </Show>
        </div>
    }
}
