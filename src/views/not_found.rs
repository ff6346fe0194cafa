use dioxus::prelude::*;

use crate::Route;

/// Catch-all: any unmatched path lands back on the welcome view.
#[component]
pub fn NotFound(segments: Vec<String>) -> Element {
    let nav = navigator();

    use_effect(move || {
        tracing::debug!("unmatched route: /{}", segments.join("/"));
        nav.replace(Route::Home {});
    });

    rsx! {
        div { class: "w-full h-full rounded-xl border border-slate-200 bg-white shadow-sm flex items-center justify-center",
            p { class: "text-slate-600", "404 Not Found" }
        }
    }
}
