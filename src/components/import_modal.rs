use chrono::{Duration, NaiveDate};
use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;

use crate::api::{ApiClient, ImportResult};
use crate::dates;

/// How long the result grid stays on screen before the form resets.
const RESULT_DISPLAY_MS: u32 = 5_000;

const SPREADSHEET_EXT: &str = ".xlsx";
const TABULAR_EXT: &str = ".csv";

/// Multipart field names; each attachment is re-bound to the matching fixed
/// filename regardless of what the user's file was called.
const FIELD_DIALOGUE_ONE: &str = "dialogue-1.xlsx";
const FIELD_DIALOGUE_TWO: &str = "dialogue-2.xlsx";
const FIELD_INVOICING: &str = "invoicing-report.csv";

/// A picked file: its original name (validated) and its content.
#[derive(Clone, PartialEq)]
pub struct Attachment {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Dialogue 1 covers the period ending 6 days before the reference date.
fn dialogue_one_date(reference: NaiveDate) -> NaiveDate {
    reference - Duration::days(6)
}

/// Client-side validation, run before any network call. Short-circuits on the
/// first failure, in a fixed order: presence of all three files, then
/// extension and date-suffix checks per file.
fn validate_bundle(
    dialogue_one: Option<&str>,
    dialogue_two: Option<&str>,
    invoicing: Option<&str>,
    reference: NaiveDate,
) -> Result<(), String> {
    let dialogue_one = dialogue_one.ok_or("Dialogue 1 must be selected.")?;
    let dialogue_two = dialogue_two.ok_or("Dialogue 2 must be selected.")?;
    let invoicing = invoicing.ok_or("Invoicing Report must be selected.")?;

    if !dialogue_one.ends_with(SPREADSHEET_EXT) {
        return Err("Dialogue 1 must be an Excel file.".into());
    }
    if !dialogue_one.contains(&dates::format_ymd(dialogue_one_date(reference))) {
        return Err("Dialogue 1 must be for the correct date.".into());
    }
    if !dialogue_two.ends_with(SPREADSHEET_EXT) {
        return Err("Dialogue 2 must be an Excel file.".into());
    }
    if !dialogue_two.contains(&dates::format_ymd(reference)) {
        return Err("Dialogue 2 must be for the correct date.".into());
    }
    if !invoicing.ends_with(TABULAR_EXT) {
        return Err("Invoicing Report must be a CSV file.".into());
    }
    Ok(())
}

fn to_blob(bytes: &[u8]) -> Option<web_sys::Blob> {
    let parts = js_sys::Array::new();
    parts.push(&js_sys::Uint8Array::from(bytes).buffer());
    web_sys::Blob::new_with_u8_array_sequence(&parts).ok()
}

fn build_form(
    dialogue_one: &Attachment,
    dialogue_two: &Attachment,
    invoicing: &Attachment,
) -> Option<web_sys::FormData> {
    let form = web_sys::FormData::new().ok()?;
    for (field, attachment) in [
        (FIELD_DIALOGUE_ONE, dialogue_one),
        (FIELD_DIALOGUE_TWO, dialogue_two),
        (FIELD_INVOICING, invoicing),
    ] {
        let blob = to_blob(&attachment.bytes)?;
        form.append_with_blob_and_filename(field, &blob, field).ok()?;
    }
    Some(form)
}

#[derive(Clone, PartialEq)]
enum Stage {
    Form,
    Importing,
    Imported,
}

/// Import workflow: reference date + three source files, validated
/// client-side, submitted as one multipart POST. Success shows the backend's
/// counts for a fixed window, then resets and notifies the caller so group
/// lists can refresh. Failure returns to the form with the files kept.
#[component]
pub fn ImportModal(on_imported: EventHandler<()>) -> Element {
    let api = use_context::<ApiClient>();

    let mut open = use_signal(|| false);
    let mut date = use_signal(|| chrono::Local::now().date_naive());
    let mut dialogue_one = use_signal(|| None as Option<Attachment>);
    let mut dialogue_two = use_signal(|| None as Option<Attachment>);
    let mut invoicing = use_signal(|| None as Option<Attachment>);
    let mut stage = use_signal(|| Stage::Form);
    let mut error = use_signal(|| None as Option<String>);
    let mut result = use_signal(ImportResult::default);

    let pick_file = |mut slot: Signal<Option<Attachment>>| {
        move |e: FormEvent| {
            if let Some(engine) = e.files() {
                spawn(async move {
                    if let Some(name) = engine.files().first().cloned() {
                        if let Some(bytes) = engine.read_file(&name).await {
                            slot.set(Some(Attachment { name, bytes }));
                        }
                    }
                });
            }
        }
    };

    let begin_import = move |_| {
        error.set(None);
        let reference = date();
        if let Err(msg) = validate_bundle(
            dialogue_one.read().as_ref().map(|a| a.name.as_str()),
            dialogue_two.read().as_ref().map(|a| a.name.as_str()),
            invoicing.read().as_ref().map(|a| a.name.as_str()),
            reference,
        ) {
            error.set(Some(msg));
            return;
        }
        let (Some(d1), Some(d2), Some(inv)) = (
            dialogue_one.read().clone(),
            dialogue_two.read().clone(),
            invoicing.read().clone(),
        ) else {
            return;
        };
        stage.set(Stage::Importing);
        let api = api.clone();
        spawn(async move {
            let Some(form) = build_form(&d1, &d2, &inv) else {
                error.set(Some("Could not assemble the upload.".into()));
                stage.set(Stage::Form);
                return;
            };
            match api.upload_and_process(&dates::format_ymd(reference), form).await {
                Ok(counts) => {
                    result.set(counts);
                    stage.set(Stage::Imported);
                    TimeoutFuture::new(RESULT_DISPLAY_MS).await;
                    stage.set(Stage::Form);
                    dialogue_one.set(None);
                    dialogue_two.set(None);
                    invoicing.set(None);
                    on_imported.call(());
                }
                Err(err) => {
                    tracing::warn!("import failed: {err}");
                    // keep the selected files so the user can retry
                    error.set(Some(err.to_string()));
                    stage.set(Stage::Form);
                }
            }
        });
    };

    rsx! {
        button {
            class: "h-9 px-3 rounded-md bg-blue-600 hover:bg-blue-500 text-white text-sm font-medium transition",
            onclick: move |_| open.set(true),
            "Import Data"
        }

        { open().then(|| rsx!(
            div { class: "fixed inset-0 z-50 flex items-center justify-center bg-black/50 p-4",
                div { class: "w-full max-w-md rounded-xl border border-slate-200 bg-white shadow-lg p-5 space-y-4",
                    h2 { class: "text-xl font-bold", "Import Data" }
                    { match error.read().as_ref() {
                        Some(msg) => rsx!( p { class: "text-sm text-red-600", {msg.clone()} } ),
                        None => rsx!( p { class: "text-sm text-slate-500",
                            "Please select the date you would like to import data for and also select the corresponding files required."
                        } ),
                    } }

                    { (stage() == Stage::Form).then(|| rsx!(
                        div { class: "space-y-4",
                            div { class: "space-y-2",
                                div { class: "text-lg font-semibold", "Import Date" }
                                input {
                                    r#type: "date",
                                    class: "h-9 w-full rounded-md border border-slate-300 px-3 text-sm",
                                    value: dates::format_ymd(date()),
                                    onchange: move |e| {
                                        if let Ok(d) = NaiveDate::parse_from_str(&e.value(), "%Y-%m-%d") {
                                            date.set(d);
                                        }
                                    },
                                }
                            }
                            div { class: "space-y-2",
                                div { class: "text-sm", { format!("{}'s Dialogue", dates::format_long(dialogue_one_date(date()))) } }
                                input { r#type: "file", accept: SPREADSHEET_EXT, onchange: pick_file(dialogue_one) }
                                { dialogue_one.read().as_ref().map(|a| rsx!( div { class: "text-xs text-slate-500", {a.name.clone()} } )) }
                            }
                            div { class: "space-y-2",
                                div { class: "text-sm", { format!("{}'s Dialogue", dates::format_long(date())) } }
                                input { r#type: "file", accept: SPREADSHEET_EXT, onchange: pick_file(dialogue_two) }
                                { dialogue_two.read().as_ref().map(|a| rsx!( div { class: "text-xs text-slate-500", {a.name.clone()} } )) }
                            }
                            div { class: "space-y-2",
                                div { class: "text-sm", { format!("{}'s Invoicing Document", date().format("%B")) } }
                                input { r#type: "file", accept: TABULAR_EXT, onchange: pick_file(invoicing) }
                                { invoicing.read().as_ref().map(|a| rsx!( div { class: "text-xs text-slate-500", {a.name.clone()} } )) }
                            }
                        }
                    )) }

                    { (stage() == Stage::Importing).then(|| rsx!(
                        div { class: "text-sm text-slate-600", "Importing data..." }
                    )) }

                    { (stage() == Stage::Imported).then(|| {
                        let res = result.read().clone();
                        rsx!(
                            div { class: "grid grid-cols-2 gap-2 text-sm",
                                div { class: "col-span-2 font-medium", {res.message.clone()} }
                                div { "New Invoices" } div { {res.inserted_invoices.to_string()} }
                                div { "Updated Invoices" } div { {res.updated_invoices.to_string()} }
                                div { "Skipped Invoices" } div { {res.skipped_invoices.to_string()} }
                                div { "New Shifts" } div { {res.new_shifts.to_string()} }
                                div { "Skipped Shifts" } div { {res.skipped_shifts.to_string()} }
                                div { "New Teachers" } div { {res.new_teachers.to_string()} }
                                div { "Skipped Teachers" } div { {res.skipped_teachers.to_string()} }
                            }
                        )
                    }) }

                    div { class: "flex items-center justify-end gap-2",
                        button {
                            class: "h-9 px-3 rounded-md border border-slate-300 text-sm font-medium text-slate-700 hover:bg-slate-100 transition",
                            onclick: move |_| open.set(false),
                            "Close"
                        }
                        button {
                            class: "h-9 px-3 rounded-md bg-blue-600 hover:bg-blue-500 text-white text-sm font-medium transition disabled:opacity-50",
                            disabled: stage() != Stage::Form,
                            onclick: begin_import,
                            "Begin Import"
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

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn dialogue_one_is_six_days_earlier() {
        assert_eq!(
            dialogue_one_date(reference()),
            NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
        );
    }

    #[test]
    fn missing_files_short_circuit_in_order() {
        assert_eq!(
            validate_bundle(None, None, None, reference()),
            Err("Dialogue 1 must be selected.".into())
        );
        assert_eq!(
            validate_bundle(Some("a.xlsx"), None, None, reference()),
            Err("Dialogue 2 must be selected.".into())
        );
        assert_eq!(
            validate_bundle(Some("a.xlsx"), Some("b.xlsx"), None, reference()),
            Err("Invoicing Report must be selected.".into())
        );
    }

    #[test]
    fn dialogue_one_extension_checked_before_date() {
        assert_eq!(
            validate_bundle(
                Some("dialogue-2024-03-09.pdf"),
                Some("b.xlsx"),
                Some("c.csv"),
                reference()
            ),
            Err("Dialogue 1 must be an Excel file.".into())
        );
    }

    #[test]
    fn dialogue_one_without_date_is_rejected_before_any_later_check() {
        // correct extension but no date suffix, with a dialogue 2 that would
        // also fail: dialogue 1's date error must win
        assert_eq!(
            validate_bundle(
                Some("report.xlsx"),
                Some("nodate.xlsx"),
                Some("c.csv"),
                reference()
            ),
            Err("Dialogue 1 must be for the correct date.".into())
        );
    }

    #[test]
    fn dialogue_two_checks_reference_date_itself() {
        assert_eq!(
            validate_bundle(
                Some("dialogue-2024-03-09.xlsx"),
                Some("dialogue-2024-03-09.xlsx"),
                Some("c.csv"),
                reference()
            ),
            Err("Dialogue 2 must be for the correct date.".into())
        );
    }

    #[test]
    fn invoicing_must_be_csv() {
        assert_eq!(
            validate_bundle(
                Some("dialogue-2024-03-09.xlsx"),
                Some("dialogue-2024-03-15.xlsx"),
                Some("march.xlsx"),
                reference()
            ),
            Err("Invoicing Report must be a CSV file.".into())
        );
    }

    #[test]
    fn well_named_bundle_passes() {
        assert_eq!(
            validate_bundle(
                Some("dialogue-2024-03-09.xlsx"),
                Some("dialogue-2024-03-15.xlsx"),
                Some("march.csv"),
                reference()
            ),
            Ok(())
        );
    }
}
