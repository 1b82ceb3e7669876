use leptos::prelude::*;
use sqlab_shared::protocol::Upload;

use super::form_state::FormState;
use crate::auth::use_session;
use crate::components::common::PdfPicker;
use crate::web::task::TaskScope;

/// 新建练习的模态框
///
/// 创建成功后调用 `on_created`，由父组件重新拉取列表。
#[component]
pub fn ExerciseDialog(#[prop(into)] on_created: Callback<()>) -> impl IntoView {
    let ctx = use_session();
    let scope = TaskScope::current();

    let (open, set_open) = signal(false);
    let (loading, set_loading) = signal(false);
    let (error, set_error) = signal(Option::<String>::None);
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();
    let form = FormState::new();

    Effect::new(move |_| {
        if let Some(dialog) = dialog_ref.get() {
            if open.get() {
                if !dialog.open() {
                    let _ = dialog.show_modal();
                }
            } else if dialog.open() {
                dialog.close();
            }
        }
    });

    let close = move || {
        set_open.set(false);
        set_error.set(None);
        form.reset();
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let draft = match form.to_draft(true) {
            Ok(d) => d,
            Err(msg) => {
                set_error.set(Some(msg));
                return;
            }
        };
        let Some(file) = draft.file else {
            return;
        };

        set_loading.set(true);
        set_error.set(None);
        scope.spawn(async move {
            match ctx
                .api()
                .create_exercise(&draft.title, file, draft.correction)
                .await
            {
                Ok(created) => {
                    log::info!("[Api] exercise {} created", created.id);
                    close();
                    on_created.run(());
                }
                Err(e) => set_error.set(Some(format!("Erreur: {}", e.message()))),
            }
            set_loading.set(false);
        });
    };

    view! {
        <button class="btn btn-primary" on:click=move |_| set_open.set(true)>
            "+ Ajouter un exercice"
        </button>

        <dialog class="modal" node_ref=dialog_ref on:close=move |_| set_open.set(false)>
            <div class="modal-box">
                <h3 class="font-bold text-lg">"Nouvel exercice"</h3>
                <form on:submit=on_submit class="space-y-4 mt-4">
                    {move || error.get().map(|msg| view! {
                        <div role="alert" class="alert alert-error"><span>{msg}</span></div>
                    })}
                    <div class="form-control">
                        <label for="exercise_title" class="label">
                            <span class="label-text">"Titre"</span>
                        </label>
                        <input id="exercise_title" required
                            type="text"
                            class="input input-bordered w-full"
                            prop:value=form.title
                            on:input=move |ev| form.title.set(event_target_value(&ev))
                        />
                    </div>
                    <PdfPicker
                        label="Énoncé (PDF)"
                        selected=form.file_name()
                        on_pick=move |upload: Upload| form.file.set(Some(upload))
                        on_reject=move |msg: String| set_error.set(Some(msg))
                    />
                    <PdfPicker
                        label="Modèle de correction (PDF, optionnel)"
                        selected=form.correction_name()
                        on_pick=move |upload: Upload| form.correction.set(Some(upload))
                        on_reject=move |msg: String| set_error.set(Some(msg))
                    />
                    <div class="modal-action">
                        <button type="button" class="btn btn-ghost" on:click=move |_| close()>"Annuler"</button>
                        <button type="submit" disabled=move || loading.get() class="btn btn-primary">
                            {move || if loading.get() {
                                view! { <span class="loading loading-spinner"></span> "Ajout..." }.into_any()
                            } else {
                                "Ajouter".into_any()
                            }}
                        </button>
                    </div>
                </form>
            </div>
            <form method="dialog" class="modal-backdrop">
                <button>"close"</button>
            </form>
        </dialog>
    }
}
