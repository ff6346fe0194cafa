use chrono::Datelike;
use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;

use crate::api::{ApiClient, ScheduleEntry};
use crate::components::{ExportModal, ImportModal, Picker};
use crate::dates;

/// Window between a dependency change and the fetch it triggers.
const FETCH_DEBOUNCE_MS: u32 = 100;

/// Defensive client-side filter: the rendered set for a month/year must hold
/// exactly the entries whose start timestamp falls in it, even if the backend
/// ignored the explicit range.
fn schedules_in_month(entries: Vec<ScheduleEntry>, month: u32, year: i32) -> Vec<ScheduleEntry> {
    entries
        .into_iter()
        .filter(|e| {
            e.start()
                .map_or(false, |s| s.month() == month && s.year() == year)
        })
        .collect()
}

fn schedules_on_day(entries: &[ScheduleEntry], day: u32) -> Vec<ScheduleEntry> {
    entries
        .iter()
        .filter(|e| e.start().map_or(false, |s| s.day() == day))
        .cloned()
        .collect()
}

/// Schedule browser for one shift group: month/year pickers resolve a
/// month-wide query window, the result renders partitioned into one tab per
/// calendar day. Day changes are pure view-state transitions; group, month or
/// year changes cancel the pending fetch and start a new one.
#[component]
pub fn ShiftGroup(shift_group: String) -> Element {
    let api = use_context::<ApiClient>();
    let mut refresh: Signal<u32> = use_context();

    let today = chrono::Local::now().date_naive();
    let mut year = use_signal(move || today.year());
    let mut month = use_signal(move || dates::month_name(today.month()).to_string());
    let mut active_day = use_signal(|| 1u32);
    let mut entries = use_signal(Vec::<ScheduleEntry>::new);
    let mut groups = use_signal(Vec::<String>::new);
    let mut schedules_pending = use_signal(|| None as Option<Task>);
    let mut groups_pending = use_signal(|| None as Option<Task>);

    // schedule fetch, superseded on any dependency change
    {
        let api = api.clone();
        use_effect(use_reactive!(|shift_group| {
            let month_name = month.read().clone();
            let y = year();
            let api = api.clone();
            if let Some(task) = schedules_pending.write().take() {
                task.cancel();
            }
            let task = spawn(async move {
                TimeoutFuture::new(FETCH_DEBOUNCE_MS).await;
                let Some(m) = dates::month_number(&month_name) else {
                    return;
                };
                let (start, end) = dates::month_window(y, m);
                match api.schedules(&shift_group, Some((&start, &end))).await {
                    Ok(list) => entries.set(schedules_in_month(list, m, y)),
                    Err(err) => tracing::warn!("schedule fetch failed: {err}"),
                }
            });
            schedules_pending.set(Some(task));
        }));
    }

    // group list feeding the import/export panel; re-runs after an import
    {
        let api = api.clone();
        use_effect(move || {
            let _tick = refresh();
            let api = api.clone();
            if let Some(task) = groups_pending.write().take() {
                task.cancel();
            }
            let task = spawn(async move {
                TimeoutFuture::new(FETCH_DEBOUNCE_MS).await;
                match api.shift_groups().await {
                    Ok(names) => groups.set(names),
                    Err(err) => tracing::warn!("shift group fetch failed: {err}"),
                }
            });
            groups_pending.set(Some(task));
        });
    }

    use_drop(move || {
        if let Some(task) = schedules_pending.write().take() {
            task.cancel();
        }
        if let Some(task) = groups_pending.write().take() {
            task.cancel();
        }
    });

    let month_number = dates::month_number(&month.read()).unwrap_or(1);
    let days = dates::days_in_month(year(), month_number);
    let day = active_day().clamp(1, days.max(1));
    let day_entries = schedules_on_day(&entries.read(), day);

    rsx! {
        div { class: "flex flex-col w-full h-full space-y-3 overflow-hidden",
            div { class: "rounded-xl border border-slate-200 bg-white shadow-sm p-3 space-x-3",
                ImportModal { on_imported: move |_| { *refresh.write() += 1; } }
                ExportModal { shift_groups: groups.read().clone() }
            }

            div { class: "rounded-xl border border-slate-200 bg-white shadow-sm p-3 space-y-3 flex-1 overflow-hidden flex flex-col",
                div { class: "flex items-center justify-between",
                    div { class: "text-lg font-bold", "{shift_group}" }
                    div { class: "flex items-center space-x-3",
                        Picker {
                            label: "month".to_string(),
                            placeholder: "Select month...".to_string(),
                            options: dates::MONTHS.iter().map(|m| m.to_string()).collect::<Vec<_>>(),
                            selected: Some(month.read().clone()),
                            on_select: move |m: String| {
                                month.set(m);
                                active_day.set(1);
                            },
                        }
                        Picker {
                            label: "year".to_string(),
                            placeholder: "Select year...".to_string(),
                            options: dates::years().iter().map(|y| y.to_string()).collect::<Vec<_>>(),
                            selected: Some(year().to_string()),
                            on_select: move |y: String| {
                                if let Ok(y) = y.parse::<i32>() {
                                    year.set(y);
                                    active_day.set(1);
                                }
                            },
                        }
                    }
                }

                div { class: "flex items-center gap-1 overflow-x-auto rounded-md bg-neutral-100 p-1",
                    for d in 1..=days {
                        button {
                            key: "{d}",
                            class: if d == day {
                                "h-8 min-w-8 px-2 rounded-md bg-white text-sm font-medium shadow-sm"
                            } else {
                                "h-8 min-w-8 px-2 rounded-md text-sm text-slate-600 hover:bg-white/60 transition"
                            },
                            onclick: move |_| active_day.set(d),
                            "{d}"
                        }
                    }
                }

                div { class: "flex-1 overflow-y-auto border border-slate-200 rounded-md",
                    table { class: "w-full text-sm",
                        thead {
                            tr { class: "border-b border-slate-200 text-left text-slate-500",
                                th { class: "px-3 py-2 font-medium", "Shift" }
                                th { class: "px-3 py-2 font-medium", "Shift Type" }
                                th { class: "px-3 py-2 font-medium", "Teacher" }
                                th { class: "px-3 py-2 font-medium", "Time" }
                            }
                        }
                        tbody {
                            { if day_entries.is_empty() {
                                rsx!(
                                    tr {
                                        td { colspan: 4, class: "h-24 px-3 text-center text-slate-500", "No results." }
                                    }
                                )
                            } else {
                                rsx!(
                                    for (i, entry) in day_entries.iter().enumerate() {
                                        tr { key: "{i}", class: "border-b border-slate-100",
                                            td { class: "px-3 py-2 capitalize", {entry.shift.clone()} }
                                            td { class: "px-3 py-2", {entry.shift_type.clone()} }
                                            td { class: "px-3 py-2", {entry.teacher_name.clone()} }
                                            td { class: "px-3 py-2", {entry.start_date.clone()} }
                                        }
                                    }
                                )
                            } }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(start: &str) -> ScheduleEntry {
        ScheduleEntry {
            shift: "Morning".into(),
            shift_type: "Regular".into(),
            teacher_name: "J. Doe".into(),
            start_date: start.into(),
            end_date: String::new(),
        }
    }

    #[test]
    fn month_filter_drops_other_months_and_years() {
        let all = vec![
            entry("2024-03-01 09:00:00"),
            entry("2024-02-29 09:00:00"),
            entry("2023-03-10 09:00:00"),
            entry("2024-03-31 18:00:00"),
        ];
        let march = schedules_in_month(all, 3, 2024);
        assert_eq!(march.len(), 2);
        assert!(march.iter().all(|e| e.start_date.starts_with("2024-03")));
    }

    #[test]
    fn month_filter_drops_unparseable_rows() {
        let all = vec![entry("not a timestamp"), entry("2024-03-05 10:00:00")];
        assert_eq!(schedules_in_month(all, 3, 2024).len(), 1);
    }

    #[test]
    fn day_filter_matches_day_of_month_only() {
        let march = vec![
            entry("2024-03-05 09:00:00"),
            entry("2024-03-05 14:00:00"),
            entry("2024-03-06 09:00:00"),
        ];
        assert_eq!(schedules_on_day(&march, 5).len(), 2);
        assert_eq!(schedules_on_day(&march, 6).len(), 1);
        assert!(schedules_on_day(&march, 7).is_empty());
    }
}
