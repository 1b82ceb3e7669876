use leptos::prelude::*;
use sqlab_shared::date::display_datetime;
use sqlab_shared::report::{PerformancePoint, ScoreTone, performance_series, score_label};
use sqlab_shared::{MAX_SCORE, SubmissionRecord};

use crate::auth::use_session;
use crate::components::common::{Flash, FlashBanner, Loading};
use crate::web::task::spawn_bound;

/// 柱高百分比
fn bar_height(score: i32) -> String {
    let pct = (score.clamp(0, MAX_SCORE as i32) as f64 / MAX_SCORE as f64) * 100.0;
    format!("height: {:.0}%", pct)
}

#[component]
pub fn StudentPerformancePage() -> impl IntoView {
    let ctx = use_session();

    let (submissions, set_submissions) = signal(Vec::<SubmissionRecord>::new());
    let (loading, set_loading) = signal(true);
    let (flash, set_flash) = signal(Option::<Flash>::None);

    spawn_bound(async move {
        match ctx.api().student_performance().await {
            Ok(list) => set_submissions.set(list),
            Err(e) => set_flash.set(Flash::error(format!(
                "Erreur lors de la récupération des performances : {}",
                e.message()
            ))),
        }
        set_loading.set(false);
    });

    let series = Memo::new(move |_| submissions.with(|s| performance_series(s)));

    view! {
        <div class="max-w-5xl mx-auto p-4 md:p-8 space-y-6">
            <h1 class="text-3xl font-bold">"Mes performances"</h1>
            <FlashBanner flash=flash />
            <Show when=move || !loading.get() fallback=|| view! { <Loading label="Chargement des performances..." /> }>
                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body">
                        <h2 class="card-title">"Évolution des notes"</h2>
                        <div class="flex items-end gap-2 h-48 border-b border-base-300">
                            <For
                                each=move || series.get().into_iter().enumerate()
                                key=|(i, _)| *i
                                children=move |(_, point): (usize, PerformancePoint)| view! {
                                    <div class="flex-1 flex flex-col items-center justify-end h-full" title=point.label.clone()>
                                        <span class="text-xs">{point.score}</span>
                                        <div class="w-full bg-primary rounded-t" style=bar_height(point.score)></div>
                                    </div>
                                }
                            />
                        </div>
                    </div>
                </div>

                <div class="overflow-x-auto">
                    <table class="table table-zebra w-full">
                        <thead>
                            <tr>
                                <th>"Exercice"</th>
                                <th>"Date"</th>
                                <th>"Note"</th>
                                <th>"Feedback"</th>
                            </tr>
                        </thead>
                        <tbody>
                            <For
                                each=move || submissions.get()
                                key=|s| s.id
                                children=move |sub| view! {
                                    <tr>
                                        <td>{sub.exercise.clone().unwrap_or_else(|| "Exercice supprimé".to_string())}</td>
                                        <td>{display_datetime(&sub.submitted_at)}</td>
                                        <td>
                                            <span class=ScoreTone::of(sub.score).badge_class()>{score_label(sub.score)}</span>
                                        </td>
                                        <td>{sub.feedback.clone().unwrap_or_default()}</td>
                                    </tr>
                                }
                            />
                        </tbody>
                    </table>
                </div>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_height_is_clamped_to_scale() {
        assert_eq!(bar_height(10), "height: 50%");
        assert_eq!(bar_height(25), "height: 100%");
        assert_eq!(bar_height(-3), "height: 0%");
    }
}
