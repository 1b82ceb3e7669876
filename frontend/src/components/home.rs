use leptos::prelude::*;

use crate::auth::use_session;
use crate::web::router::Link;

#[component]
pub fn HomePage() -> impl IntoView {
    let session = use_session().session();

    view! {
        <div class="hero min-h-[70vh] bg-base-200">
            <div class="hero-content text-center">
                <div class="max-w-xl">
                    <h1 class="text-5xl font-bold">"Smart Query"</h1>
                    <p class="py-6">
                        "Entraîne-toi aux requêtes SQL : télécharge les exercices, "
                        "soumets tes réponses en PDF et suis tes progrès."
                    </p>
                    <div class="flex justify-center gap-3">
                        <Link to="/exercises" class="btn btn-primary">"Voir les exercices"</Link>
                        {move || if session.get().is_authenticated() {
                            view! { <Link to="/profile" class="btn btn-outline">"Mon profil"</Link> }.into_any()
                        } else {
                            view! { <Link to="/login" class="btn btn-outline">"Se connecter"</Link> }.into_any()
                        }}
                    </div>
                </div>
            </div>
        </div>
    }
}
