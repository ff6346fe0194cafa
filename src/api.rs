use chrono::NaiveDateTime;
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Wire format of schedule timestamps.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Transport(#[from] gloo_net::Error),
    /// Backend answered with a non-success status; `message` is the backend's
    /// own message when the error body carries one.
    #[error("{message}")]
    Status { status: u16, message: String },
}

#[derive(Deserialize)]
struct ShiftGroupsResponse {
    shift_groups: Vec<ShiftGroupEntry>,
}

#[derive(Deserialize)]
struct ShiftGroupEntry {
    shift_group: String,
}

#[derive(Deserialize)]
struct SchedulesResponse {
    schedules: Vec<ScheduleEntry>,
}

/// One worked shift as returned by the backend. Immutable snapshot; the
/// browser re-fetches instead of caching across navigations.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ScheduleEntry {
    pub shift: String,
    pub shift_type: String,
    pub teacher_name: String,
    pub start_date: String,
    pub end_date: String,
}

impl ScheduleEntry {
    /// Parsed start timestamp. Rows the backend sends in an unexpected
    /// format never match any calendar day.
    pub fn start(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.start_date, TIMESTAMP_FORMAT).ok()
    }
}

/// Structured counts returned by `/upload-and-process`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ImportResult {
    pub message: String,
    pub inserted_invoices: i64,
    pub updated_invoices: i64,
    pub skipped_invoices: i64,
    pub new_shifts: i64,
    pub skipped_shifts: i64,
    pub new_teachers: i64,
    pub skipped_teachers: i64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ReportKind {
    Efficiency,
    Consolidated,
}

impl ReportKind {
    pub fn endpoint(self) -> &'static str {
        match self {
            ReportKind::Efficiency => "generate-efficiency-report",
            ReportKind::Consolidated => "generate-consolidated-report",
        }
    }

    /// Suffix of the downloaded file, appended to the group name.
    pub fn file_suffix(self) -> &'static str {
        match self {
            ReportKind::Efficiency => "efficiency-report.csv",
            ReportKind::Consolidated => "consolidated-report.csv",
        }
    }
}

/// Thin wrapper over the reporting backend. The base URL is injected at
/// construction and the client is handed to components through context.
#[derive(Clone, PartialEq)]
pub struct ApiClient {
    base: String,
}

impl ApiClient {
    pub fn new(base: &str) -> Self {
        Self { base: base.trim_end_matches('/').to_string() }
    }

    /// Compile-time `API_URL` override, falling back to a local backend.
    pub fn from_env() -> Self {
        Self::new(option_env!("API_URL").unwrap_or(DEFAULT_BASE_URL))
    }

    /// `GET /shift-groups`, sorted ascending by name.
    pub async fn shift_groups(&self) -> Result<Vec<String>, ApiError> {
        let resp = Request::get(&format!("{}/shift-groups", self.base))
            .send()
            .await?;
        let body: ShiftGroupsResponse = Self::decode(resp).await?;
        Ok(sorted_group_names(body))
    }

    /// `GET /schedules` for one group, optionally bounded by an explicit
    /// `start_date`/`end_date` window in the backend's timestamp format.
    pub async fn schedules(
        &self,
        group: &str,
        window: Option<(&str, &str)>,
    ) -> Result<Vec<ScheduleEntry>, ApiError> {
        let mut params = vec![("shift_group", group)];
        if let Some((start, end)) = window {
            params.push(("start_date", start));
            params.push(("end_date", end));
        }
        let resp = Request::get(&format!("{}/schedules", self.base))
            .query(params)
            .send()
            .await?;
        let body: SchedulesResponse = Self::decode(resp).await?;
        Ok(body.schedules)
    }

    /// Generate one report for a group over a `yyyy-MM-dd` date range and
    /// return the raw CSV payload.
    pub async fn generate_report(
        &self,
        kind: ReportKind,
        start_date: &str,
        end_date: &str,
        group: &str,
    ) -> Result<Vec<u8>, ApiError> {
        let resp = Request::get(&format!("{}/{}", self.base, kind.endpoint()))
            .query([
                ("start_date", start_date),
                ("end_date", end_date),
                ("shift_group", group),
            ])
            .send()
            .await?;
        if !resp.ok() {
            return Err(Self::status_error(resp).await);
        }
        Ok(resp.binary().await?)
    }

    /// `POST /upload-and-process?date=...` with the three source files as a
    /// multipart body.
    pub async fn upload_and_process(
        &self,
        date: &str,
        form: web_sys::FormData,
    ) -> Result<ImportResult, ApiError> {
        let resp = Request::post(&format!("{}/upload-and-process", self.base))
            .query([("date", date)])
            .body(form)?
            .send()
            .await?;
        Self::decode(resp).await
    }

    async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
        if !resp.ok() {
            return Err(Self::status_error(resp).await);
        }
        Ok(resp.json().await?)
    }

    async fn status_error(resp: Response) -> ApiError {
        #[derive(Deserialize)]
        struct ErrorBody {
            message: String,
        }
        let status = resp.status();
        let message = match resp.json::<ErrorBody>().await {
            Ok(body) => body.message,
            Err(_) => format!("Request failed with status {status}"),
        };
        ApiError::Status { status, message }
    }
}

fn sorted_group_names(body: ShiftGroupsResponse) -> Vec<String> {
    let mut names: Vec<String> = body
        .shift_groups
        .into_iter()
        .map(|g| g.shift_group)
        .collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn group_names_decode_and_sort() {
        let body: ShiftGroupsResponse = serde_json::from_str(
            r#"{"shift_groups":[{"shift_group":"beta"},{"shift_group":"Alpha"},{"shift_group":"alpha"}]}"#,
        )
        .unwrap();
        // case-sensitive lexicographic: uppercase sorts before lowercase
        assert_eq!(sorted_group_names(body), vec!["Alpha", "alpha", "beta"]);
    }

    #[test]
    fn schedule_entry_decodes_and_parses_start() {
        let body: SchedulesResponse = serde_json::from_str(
            r#"{"schedules":[{
                "shift":"Morning A",
                "shift_type":"Regular",
                "teacher_name":"J. Doe",
                "start_date":"2024-03-15 09:00:00",
                "end_date":"2024-03-15 12:00:00"
            }]}"#,
        )
        .unwrap();
        let entry = &body.schedules[0];
        let start = entry.start().unwrap();
        assert_eq!((start.year(), start.month(), start.day()), (2024, 3, 15));
        assert_eq!(start.hour(), 9);
    }

    #[test]
    fn malformed_start_never_parses() {
        let entry = ScheduleEntry {
            shift: "x".into(),
            shift_type: "y".into(),
            teacher_name: "z".into(),
            start_date: "15/03/2024".into(),
            end_date: String::new(),
        };
        assert!(entry.start().is_none());
    }

    #[test]
    fn import_result_decodes_all_counts() {
        let res: ImportResult = serde_json::from_str(
            r#"{"message":"Processed.","inserted_invoices":3,"updated_invoices":1,
                "skipped_invoices":0,"new_shifts":12,"skipped_shifts":2,
                "new_teachers":1,"skipped_teachers":4}"#,
        )
        .unwrap();
        assert_eq!(res.message, "Processed.");
        assert_eq!(res.inserted_invoices, 3);
        assert_eq!(res.skipped_teachers, 4);
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://api.example.com/");
        assert_eq!(client.base, "http://api.example.com");
    }

    #[test]
    fn report_kind_names() {
        assert_eq!(ReportKind::Efficiency.endpoint(), "generate-efficiency-report");
        assert_eq!(ReportKind::Consolidated.endpoint(), "generate-consolidated-report");
        assert_eq!(ReportKind::Efficiency.file_suffix(), "efficiency-report.csv");
        assert_eq!(ReportKind::Consolidated.file_suffix(), "consolidated-report.csv");
    }
}
