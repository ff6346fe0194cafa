use dioxus::prelude::*;

#[component]
pub fn Home() -> Element {
    rsx! {
        div { class: "w-full h-full rounded-xl border border-slate-200 bg-white shadow-sm flex items-center justify-center",
            p { class: "text-slate-600", "Welcome to Automatic Reports." }
        }
    }
}
