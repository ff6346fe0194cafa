use chrono::{Duration, NaiveDate};
use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::JsCast;

use crate::api::{ApiClient, ReportKind};
use crate::components::Picker;
use crate::dates;

/// How long the completion notice stays on screen before the form resets.
const NOTICE_DISPLAY_MS: u32 = 5_000;

/// Add a group to the selection, de-duplicated by name: re-selecting removes
/// the old occurrence and re-adds, so the set never holds a name twice.
fn add_group(mut selected: Vec<String>, group: String) -> Vec<String> {
    selected.retain(|g| g != &group);
    selected.push(group);
    selected
}

fn remove_group(mut selected: Vec<String>, group: &str) -> Vec<String> {
    selected.retain(|g| g != group);
    selected
}

/// The ordered request plan: per group, efficiency first, then consolidated.
/// The export loop walks this sequence one request at a time.
fn report_sequence(groups: &[String]) -> Vec<(String, ReportKind)> {
    groups
        .iter()
        .flat_map(|g| {
            [
                (g.clone(), ReportKind::Efficiency),
                (g.clone(), ReportKind::Consolidated),
            ]
        })
        .collect()
}

/// Hand the payload to the browser as a named download via a Blob object URL
/// and a synthesized anchor click.
fn trigger_download(bytes: &[u8], filename: &str) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let parts = js_sys::Array::new();
    parts.push(&js_sys::Uint8Array::from(bytes).buffer());
    let options = web_sys::BlobPropertyBag::new();
    options.set_type("text/csv");
    let Ok(blob) = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options) else {
        return;
    };
    let Ok(url) = web_sys::Url::create_object_url_with_blob(&blob) else {
        return;
    };
    if let Ok(element) = document.create_element("a") {
        if let Ok(anchor) = element.dyn_into::<web_sys::HtmlAnchorElement>() {
            anchor.set_href(&url);
            anchor.set_download(filename);
            if let Some(body) = document.body() {
                let _ = body.append_child(&anchor);
                anchor.click();
                let _ = body.remove_child(&anchor);
            }
        }
    }
    let _ = web_sys::Url::revoke_object_url(&url);
}

#[derive(Clone, PartialEq)]
enum Stage {
    Form,
    Exporting,
    Exported,
}

/// Export workflow: a date range plus a multi-select of groups. Submission
/// walks the groups strictly sequentially, two report downloads per group;
/// a failed request records its error (last one wins) without aborting the
/// remaining groups.
#[component]
pub fn ExportModal(shift_groups: Vec<String>) -> Element {
    let api = use_context::<ApiClient>();

    let today = chrono::Local::now().date_naive();
    let mut open = use_signal(|| false);
    let mut date_from = use_signal(move || today);
    let mut date_to = use_signal(move || today + Duration::days(7));
    let mut selected = use_signal(Vec::<String>::new);
    let mut stage = use_signal(|| Stage::Form);
    let mut error = use_signal(|| None as Option<String>);

    let begin_export = move |_| {
        error.set(None);
        let groups = selected.read().clone();
        if groups.is_empty() {
            error.set(Some("You must select at least one group.".into()));
            return;
        }
        stage.set(Stage::Exporting);
        let api = api.clone();
        let start = dates::format_ymd(date_from());
        let end = dates::format_ymd(date_to());
        spawn(async move {
            // one request at a time: a later group never starts before the
            // earlier group's pair has completed
            for (group, kind) in report_sequence(&groups) {
                match api.generate_report(kind, &start, &end, &group).await {
                    Ok(bytes) => {
                        trigger_download(&bytes, &format!("{}-{}", group, kind.file_suffix()));
                    }
                    Err(err) => {
                        tracing::warn!("export of {group} {:?} failed: {err}", kind);
                        error.set(Some(err.to_string()));
                    }
                }
            }
            stage.set(Stage::Exported);
            TimeoutFuture::new(NOTICE_DISPLAY_MS).await;
            stage.set(Stage::Form);
            selected.set(Vec::new());
        });
    };

    rsx! {
        button {
            class: "h-9 px-3 rounded-md bg-blue-600 hover:bg-blue-500 text-white text-sm font-medium transition",
            onclick: move |_| open.set(true),
            "Export Data"
        }

        { open().then(|| rsx!(
            div { class: "fixed inset-0 z-50 flex items-center justify-center bg-black/50 p-4",
                div { class: "w-full max-w-md rounded-xl border border-slate-200 bg-white shadow-lg p-5 space-y-4",
                    h2 { class: "text-xl font-bold", "Export Data" }
                    { match error.read().as_ref() {
                        Some(msg) => rsx!( p { class: "text-sm text-red-600", {msg.clone()} } ),
                        None => rsx!( p { class: "text-sm text-slate-500",
                            "Please select the date range you would like to export as well as the group/s you would like to export."
                        } ),
                    } }

                    { (stage() == Stage::Form).then(|| rsx!(
                        div { class: "space-y-4",
                            div { class: "space-y-2",
                                div { class: "text-lg font-semibold", "Export Date Range" }
                                div { class: "flex items-center gap-2",
                                    input {
                                        r#type: "date",
                                        class: "h-9 w-full rounded-md border border-slate-300 px-3 text-sm",
                                        value: dates::format_ymd(date_from()),
                                        onchange: move |e| {
                                            if let Ok(d) = NaiveDate::parse_from_str(&e.value(), "%Y-%m-%d") {
                                                date_from.set(d);
                                            }
                                        },
                                    }
                                    span { class: "text-slate-500", "–" }
                                    input {
                                        r#type: "date",
                                        class: "h-9 w-full rounded-md border border-slate-300 px-3 text-sm",
                                        value: dates::format_ymd(date_to()),
                                        onchange: move |e| {
                                            if let Ok(d) = NaiveDate::parse_from_str(&e.value(), "%Y-%m-%d") {
                                                date_to.set(d);
                                            }
                                        },
                                    }
                                }
                            }

                            { (!selected.read().is_empty()).then(|| rsx!(
                                div { class: "space-y-2",
                                    div { class: "text-lg font-semibold", "Selected Groups" }
                                    div { class: "grid grid-cols-3 gap-2 rounded-md bg-neutral-100 p-1",
                                        for group in selected.read().iter().cloned() {
                                            span {
                                                key: "{group}",
                                                class: "inline-flex items-center gap-1 h-6 px-1 rounded-md border border-slate-300 bg-white text-xs truncate",
                                                button {
                                                    class: "w-4 h-4 leading-none text-slate-500 hover:text-slate-800",
                                                    onclick: {
                                                        let group = group.clone();
                                                        move |_| {
                                                            let next = remove_group(selected.read().clone(), &group);
                                                            selected.set(next);
                                                        }
                                                    },
                                                    "✕"
                                                }
                                                "{group}"
                                            }
                                        }
                                    }
                                }
                            )) }

                            div { class: "space-y-2",
                                div { class: "text-lg font-semibold", "Select New Group" }
                                Picker {
                                    label: "group".to_string(),
                                    placeholder: "Select group...".to_string(),
                                    options: shift_groups.clone(),
                                    selected: None,
                                    on_select: move |group: String| {
                                        let next = add_group(selected.read().clone(), group);
                                        selected.set(next);
                                    },
                                }
                            }
                        }
                    )) }

                    { (stage() == Stage::Exporting).then(|| rsx!(
                        div { class: "w-full text-center text-sm text-slate-600", "Exporting data..." }
                    )) }

                    { (stage() == Stage::Exported).then(|| rsx!(
                        div { class: "text-sm text-slate-600",
                            "Data has been exported. Find the corresponding export reports in your downloads folder."
                        }
                    )) }

                    div { class: "flex items-center justify-end gap-2",
                        button {
                            class: "h-9 px-3 rounded-md border border-slate-300 text-sm font-medium text-slate-700 hover:bg-slate-100 transition",
                            onclick: move |_| open.set(false),
                            "Close"
                        }
                        button {
                            class: "h-9 px-3 rounded-md bg-blue-600 hover:bg-blue-500 text-white text-sm font-medium transition disabled:opacity-50",
                            disabled: stage() != Stage::Form,
                            onclick: begin_export,
                            "Begin Export"
                        }
                    }
                }
            }
        )) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adding_the_same_group_twice_keeps_one_occurrence() {
        let sel = add_group(vec![], "A".into());
        let sel = add_group(sel, "B".into());
        let sel = add_group(sel, "A".into());
        assert_eq!(sel, vec!["B", "A"]);
        assert_eq!(sel.iter().filter(|g| *g == "A").count(), 1);
    }

    #[test]
    fn removal_is_by_name() {
        let sel = vec!["A".to_string(), "B".to_string()];
        assert_eq!(remove_group(sel.clone(), "A"), vec!["B"]);
        assert_eq!(remove_group(sel, "missing"), vec!["A", "B"]);
    }

    #[test]
    fn report_sequence_is_per_group_efficiency_then_consolidated() {
        let groups = vec!["A".to_string(), "B".to_string()];
        assert_eq!(
            report_sequence(&groups),
            vec![
                ("A".to_string(), ReportKind::Efficiency),
                ("A".to_string(), ReportKind::Consolidated),
                ("B".to_string(), ReportKind::Efficiency),
                ("B".to_string(), ReportKind::Consolidated),
            ]
        );
    }

    #[test]
    fn empty_selection_yields_no_requests() {
        assert!(report_sequence(&[]).is_empty());
    }
}
