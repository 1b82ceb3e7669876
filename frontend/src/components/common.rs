//! 页面间复用的小组件：提示条、加载状态、PDF 选择器

use leptos::prelude::*;
use sqlab_shared::protocol::Upload;

use crate::web::dom;
use crate::web::task::TaskScope;

/// 内联提示
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flash {
    Success(String),
    Error(String),
}

impl Flash {
    pub fn error(message: impl Into<String>) -> Option<Self> {
        Some(Flash::Error(message.into()))
    }

    pub fn success(message: impl Into<String>) -> Option<Self> {
        Some(Flash::Success(message.into()))
    }
}

#[component]
pub fn FlashBanner(#[prop(into)] flash: Signal<Option<Flash>>) -> impl IntoView {
    move || {
        flash.get().map(|f| {
            let (class, text) = match f {
                Flash::Success(text) => ("alert alert-success text-sm py-2", text),
                Flash::Error(text) => ("alert alert-error text-sm py-2", text),
            };
            view! {
                <div role="alert" class=class>
                    <span>{text}</span>
                </div>
            }
        })
    }
}

#[component]
pub fn Loading(#[prop(into)] label: String) -> impl IntoView {
    view! {
        <div class="flex items-center justify-center py-12 gap-3 text-base-content/70">
            <span class="loading loading-spinner loading-md text-primary"></span>
            <span>{label}</span>
        </div>
    }
}

/// PDF 文件选择框
///
/// 选中后立即读入内存再交给 `on_pick`；非 PDF 文件交给 `on_reject`。
#[component]
pub fn PdfPicker(
    #[prop(into)] label: String,
    #[prop(into)] selected: Signal<Option<String>>,
    #[prop(into)] on_pick: Callback<Upload>,
    #[prop(optional, into)] on_reject: Option<Callback<String>>,
) -> impl IntoView {
    let scope = TaskScope::current();
    let on_change = move |ev: leptos::ev::Event| {
        let input = event_target::<web_sys::HtmlInputElement>(&ev);
        let Some(file) = dom::first_file(&input) else {
            return;
        };
        scope.spawn(async move {
            match dom::read_upload(file).await {
                Ok(upload) if upload.is_pdf() => on_pick.run(upload),
                Ok(_) => {
                    if let Some(reject) = on_reject {
                        reject.run("Veuillez sélectionner un fichier PDF valide.".to_string());
                    }
                }
                Err(e) => log::warn!("[Upload] {}", e),
            }
        });
    };

    view! {
        <label class="form-control w-full">
            <span class="label-text mb-1">{label}</span>
            <input
                type="file"
                accept="application/pdf"
                class="file-input file-input-bordered w-full"
                on:change=on_change
            />
            <span class="text-xs text-base-content/60 mt-1">
                {move || selected.get().unwrap_or_else(|| "Aucun fichier choisi".to_string())}
            </span>
        </label>
    }
}
