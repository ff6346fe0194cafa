use dioxus::prelude::*;

/// Searchable single-select dropdown: a trigger button opening a panel with a
/// search input and the filtered option list. Search matches
/// case-insensitively; the emitted value is always the stored form.
#[component]
pub fn Picker(
    label: String,
    placeholder: String,
    options: Vec<String>,
    selected: Option<String>,
    on_select: EventHandler<String>,
) -> Element {
    let mut open = use_signal(|| false);
    let mut search = use_signal(String::new);

    let filtered: Vec<String> = {
        let q = search.read().to_lowercase();
        options
            .iter()
            .filter(|o| o.to_lowercase().contains(&q))
            .cloned()
            .collect()
    };

    rsx! {
        div { class: "relative w-[200px]",
            button {
                class: "h-9 w-full px-3 inline-flex items-center justify-between rounded-md border border-slate-300 bg-white text-sm text-slate-700 hover:bg-slate-50 transition",
                onclick: move |_| {
                    search.set(String::new());
                    open.set(!open());
                },
                span { { selected.clone().unwrap_or_else(|| placeholder.clone()) } }
                span { class: "opacity-50", "⇅" }
            }
            { open().then(|| rsx!(
                div { class: "absolute left-0 top-10 z-50 w-full rounded-md border border-slate-200 bg-white shadow-lg",
                    input {
                        class: "h-9 w-full border-b border-slate-200 px-3 text-sm focus:outline-none",
                        placeholder: "Search {label}...",
                        value: search.read().clone(),
                        oninput: move |e| search.set(e.value()),
                    }
                    { if filtered.is_empty() {
                        rsx!( div { class: "p-3 text-sm text-slate-500", "No {label} found." } )
                    } else {
                        rsx!(
                            ul { class: "max-h-48 overflow-y-auto py-1",
                                for option in filtered.into_iter() {
                                    li {
                                        key: "{option}",
                                        class: "flex items-center gap-2 px-3 py-1.5 text-sm cursor-pointer hover:bg-slate-100",
                                        onclick: {
                                            let option = option.clone();
                                            move |_| {
                                                open.set(false);
                                                on_select.call(option.clone());
                                            }
                                        },
                                        span {
                                            class: if selected.as_deref() == Some(option.as_str()) { "opacity-100" } else { "opacity-0" },
                                            "✓"
                                        }
                                        "{option}"
                                    }
                                }
                            }
                        )
                    } }
                }
            )) }
        }
    }
}
