use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;

use crate::api::ApiClient;
use crate::Route;

/// Window between the last search edit and the fetch it triggers.
const SEARCH_DEBOUNCE_MS: u32 = 100;

/// Case-sensitive substring filter. The backend list is already sorted, so
/// filtering preserves the ascending order.
fn filter_groups(names: Vec<String>, query: &str) -> Vec<String> {
    if query.is_empty() {
        return names;
    }
    names.into_iter().filter(|n| n.contains(query)).collect()
}

/// Sidebar listing all shift groups. Re-fetches (debounced) whenever the
/// search text changes or an import bumps the shared refresh counter;
/// selecting an entry navigates to that group's schedule view.
#[component]
pub fn GroupDirectory() -> Element {
    let api = use_context::<ApiClient>();
    let refresh: Signal<u32> = use_context();
    let nav = navigator();

    let mut groups = use_signal(Vec::<String>::new);
    let mut search = use_signal(String::new);
    let mut pending = use_signal(|| None as Option<Task>);

    use_effect(move || {
        let query = search.read().clone();
        let _tick = refresh();
        let api = api.clone();
        // cancelling the pending task kills both the debounce timer and any
        // fetch that has not applied its result yet
        if let Some(task) = pending.write().take() {
            task.cancel();
        }
        let task = spawn(async move {
            TimeoutFuture::new(SEARCH_DEBOUNCE_MS).await;
            match api.shift_groups().await {
                Ok(names) => groups.set(filter_groups(names, &query)),
                // keep the previously rendered list on failure
                Err(err) => tracing::warn!("shift group fetch failed: {err}"),
            }
        });
        pending.set(Some(task));
    });

    use_drop(move || {
        if let Some(task) = pending.write().take() {
            task.cancel();
        }
    });

    rsx! {
        aside { class: "w-64 shrink-0 rounded-xl border border-slate-200 bg-white shadow-sm p-3 flex flex-col gap-3 overflow-hidden",
            a { class: "text-lg font-semibold cursor-pointer",
                onclick: move |_| { nav.push(Route::Home {}); },
                "Automatic Reports"
            }
            input {
                class: "h-9 rounded-md border border-slate-300 px-3 text-sm focus:outline-none focus:ring-2 focus:ring-blue-500",
                placeholder: "Search groups...",
                value: search.read().clone(),
                oninput: move |e| search.set(e.value()),
            }
            ul { class: "flex-1 overflow-y-auto space-y-1",
                for group in groups.read().iter().cloned() {
                    li {
                        key: "{group}",
                        class: "px-3 py-2 rounded-md text-sm text-slate-700 cursor-pointer hover:bg-slate-100 truncate",
                        onclick: {
                            let group = group.clone();
                            move |_| {
                                nav.push(Route::ShiftGroup { shift_group: group.clone() });
                            }
                        },
                        "{group}"
                    }
                }
                { groups.read().is_empty().then(|| rsx!(
                    li { class: "px-3 py-2 text-sm text-slate-500", "No groups." }
                )) }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::filter_groups;

    fn names() -> Vec<String> {
        ["Alpha", "Beta", "alphabet", "Gamma"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    #[test]
    fn empty_query_keeps_everything() {
        assert_eq!(filter_groups(names(), ""), names());
    }

    #[test]
    fn filter_is_case_sensitive_substring() {
        assert_eq!(filter_groups(names(), "alpha"), vec!["alphabet"]);
        assert_eq!(filter_groups(names(), "Alpha"), vec!["Alpha"]);
        assert_eq!(filter_groups(names(), "bet"), vec!["alphabet"]);
    }

    #[test]
    fn filter_preserves_order() {
        assert_eq!(filter_groups(names(), "et"), vec!["Beta", "alphabet"]);
    }
}
