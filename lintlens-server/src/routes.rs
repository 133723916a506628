//! HTTP handlers for LintLens server.

use std::sync::Arc;

use actix_web::{HttpResponse, Responder, get, web};
use chrono::{DateTime, Utc};
use lintlens_core::{
    Category, CategoryStatistics, ComplexityReading, CorrelationReport, HeatmapGrid,
    HeatmapSnapshot, IssueDescription, LatestSlot, LintLensError, RawSourceView, RequestTicket,
    ResultId, ResultsBundle, ResultsSource, RunHistory, StoredView, TrendReport,
    complexity_reading, correlation_report, describe, heatmap_snapshot, issue_statistics,
    raw_source_view, run_history, snapshot_grid, stored_view, trend_for_path,
};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::openapi::ApiDoc;

/// Shared application state for handlers.
pub struct AppState {
    /// Backend the views are computed from.
    pub source: Arc<dyn ResultsSource>,
    /// Latest dashboard snapshot; stale fetches never replace it.
    pub dashboard: LatestSlot<DashboardSnapshot>,
}

impl AppState {
    /// State reading from `source` with no snapshot yet.
    pub fn new(source: Arc<dyn ResultsSource>) -> Self {
        Self {
            source,
            dashboard: LatestSlot::new(),
        }
    }
}

/// Error response payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message.
    pub message: String,
}

/// Query selecting files by path.
#[derive(Debug, Deserialize)]
pub struct PathQuery {
    /// File path or path fragment.
    pub path: Option<String>,
}

impl PathQuery {
    fn value(&self) -> Option<&str> {
        self.path
            .as_deref()
            .map(str::trim)
            .filter(|path| !path.is_empty())
    }
}

/// Every bundle-wide view computed from one fetch.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    /// Sequence number of the fetch that produced the snapshot.
    pub sequence: u64,
    /// When the fetch completed.
    #[schema(value_type = String)]
    pub fetched_at: DateTime<Utc>,
    /// Cross-category correlation.
    pub correlation: CorrelationReport,
    /// Issue key frequencies.
    pub statistics: Vec<CategoryStatistics>,
    /// Latest per-file counts.
    pub heatmap: HeatmapResponse,
}

impl DashboardSnapshot {
    fn build(ticket: RequestTicket, bundle: &ResultsBundle) -> Self {
        Self {
            sequence: ticket.sequence(),
            fetched_at: Utc::now(),
            correlation: correlation_report(bundle),
            statistics: issue_statistics(bundle),
            heatmap: HeatmapResponse::build(bundle, None),
        }
    }
}

/// Latest per-file counts with their heatmap.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapResponse {
    /// Counts per file and category.
    pub snapshot: HeatmapSnapshot,
    /// Coloured grid of the counts.
    pub grid: HeatmapGrid,
}

impl HeatmapResponse {
    fn build(bundle: &ResultsBundle, filter: Option<&str>) -> Self {
        let snapshot = heatmap_snapshot(bundle, filter);
        let grid = snapshot_grid(&snapshot);
        Self { snapshot, grid }
    }
}

fn bad_request(message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        message: message.into(),
    })
}

fn not_found(message: impl Into<String>) -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse {
        message: message.into(),
    })
}

fn backend_error(err: LintLensError) -> HttpResponse {
    log::warn!("dashboard request failed: {err}");
    let message = err.to_string();
    match err {
        LintLensError::Other(_) => not_found(message),
        LintLensError::Io(_) | LintLensError::Http(_) | LintLensError::Decode(_) => {
            HttpResponse::BadGateway().json(ErrorResponse { message })
        }
    }
}

/// Fetch the whole bundle and commit the derived snapshot if no newer fetch
/// was issued meanwhile.
pub async fn refresh_dashboard(state: &AppState) -> lintlens_core::Result<DashboardSnapshot> {
    let ticket = state.dashboard.begin();
    let bundle = state.source.all_results().await?;
    let snapshot = DashboardSnapshot::build(ticket, &bundle);
    state.dashboard.commit(ticket, snapshot.clone());
    Ok(snapshot)
}

#[utoipa::path(
    get,
    path = "/correlation",
    responses(
        (status = 200, description = "Correlated lines and co-occurrence matrix", body = CorrelationReport),
        (status = 502, description = "Backend unavailable", body = ErrorResponse)
    ),
    tag = "analysis"
)]
#[get("/api/correlation")]
/// Correlate issues across categories.
pub async fn correlation(state: web::Data<AppState>) -> impl Responder {
    match refresh_dashboard(&state).await {
        Ok(snapshot) => HttpResponse::Ok().json(snapshot.correlation),
        Err(err) => backend_error(err),
    }
}

#[utoipa::path(
    get,
    path = "/statistics",
    responses(
        (status = 200, description = "Issue key frequencies", body = Vec<CategoryStatistics>),
        (status = 502, description = "Backend unavailable", body = ErrorResponse)
    ),
    tag = "analysis"
)]
#[get("/api/statistics")]
/// Count issue keys per category.
pub async fn statistics(state: web::Data<AppState>) -> impl Responder {
    match refresh_dashboard(&state).await {
        Ok(snapshot) => HttpResponse::Ok().json(snapshot.statistics),
        Err(err) => backend_error(err),
    }
}

#[utoipa::path(
    get,
    path = "/heatmap",
    params(
        ("path" = Option<String>, Query, description = "Only include paths containing this text")
    ),
    responses(
        (status = 200, description = "Latest per-file counts", body = HeatmapResponse),
        (status = 502, description = "Backend unavailable", body = ErrorResponse)
    ),
    tag = "analysis"
)]
#[get("/api/heatmap")]
/// Latest counts of every file, optionally filtered by path.
pub async fn heatmap(state: web::Data<AppState>, query: web::Query<PathQuery>) -> impl Responder {
    match state.source.all_results().await {
        Ok(bundle) => HttpResponse::Ok().json(HeatmapResponse::build(&bundle, query.value())),
        Err(err) => backend_error(err),
    }
}

#[utoipa::path(
    get,
    path = "/trend",
    params(
        ("path" = String, Query, description = "Exact file path")
    ),
    responses(
        (status = 200, description = "Per-category counts over time", body = TrendReport),
        (status = 400, description = "Missing path", body = ErrorResponse),
        (status = 502, description = "Backend unavailable", body = ErrorResponse)
    ),
    tag = "analysis"
)]
#[get("/api/trend")]
/// Trends of one file.
pub async fn trend(state: web::Data<AppState>, query: web::Query<PathQuery>) -> impl Responder {
    let Some(path) = query.value() else {
        return bad_request("path is required");
    };
    match state.source.all_results().await {
        Ok(bundle) => HttpResponse::Ok().json(trend_for_path(&bundle, path)),
        Err(err) => backend_error(err),
    }
}

#[utoipa::path(
    get,
    path = "/runs",
    params(
        ("path" = String, Query, description = "Path or path fragment")
    ),
    responses(
        (status = 200, description = "Combined and individual runs, newest first", body = RunHistory),
        (status = 400, description = "Missing path", body = ErrorResponse),
        (status = 502, description = "Backend unavailable", body = ErrorResponse)
    ),
    tag = "analysis"
)]
#[get("/api/runs")]
/// Run history of matching files.
pub async fn runs(state: web::Data<AppState>, query: web::Query<PathQuery>) -> impl Responder {
    let Some(path) = query.value() else {
        return bad_request("path is required");
    };
    match state.source.results_for_path(path).await {
        Ok(bundle) => HttpResponse::Ok().json(run_history(&bundle, path)),
        Err(err) => backend_error(err),
    }
}

#[utoipa::path(
    get,
    path = "/results/{id}",
    params(
        ("id" = String, Path, description = "Database id, or a custom id containing '-'")
    ),
    responses(
        (status = 200, description = "Stored analysis", body = StoredView),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Nothing stored under the id", body = ErrorResponse),
        (status = 502, description = "Backend unavailable", body = ErrorResponse)
    ),
    tag = "results"
)]
#[get("/api/results/{id}")]
/// Fetch a stored analysis.
pub async fn stored_result(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = match ResultId::parse(&path) {
        Ok(id) => id,
        Err(err) => return bad_request(err.to_string()),
    };
    match state.source.stored_results(&id).await {
        Ok(stored) if stored.is_empty() => not_found(format!("no stored results found for {id}")),
        Ok(stored) => HttpResponse::Ok().json(stored_view(&stored)),
        Err(err) => backend_error(err),
    }
}

#[utoipa::path(
    get,
    path = "/raw/{id}",
    params(
        ("id" = String, Path, description = "Database id, or a custom id containing '-'")
    ),
    responses(
        (status = 200, description = "Raw source with issue lines highlighted", body = RawSourceView),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "No repository information stored", body = ErrorResponse),
        (status = 502, description = "Backend unavailable", body = ErrorResponse)
    ),
    tag = "results"
)]
#[get("/api/raw/{id}")]
/// Fetch the raw source of a stored analysis.
pub async fn raw_source(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = match ResultId::parse(&path) {
        Ok(id) => id,
        Err(err) => return bad_request(err.to_string()),
    };
    match raw_source_view(state.source.as_ref(), &id).await {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(err) => backend_error(err),
    }
}

#[utoipa::path(
    get,
    path = "/descriptions/{category}/{key}",
    params(
        ("category" = Category, Path, description = "Issue category"),
        ("key" = String, Path, description = "Two-word classification key")
    ),
    responses(
        (status = 200, description = "Issue description", body = IssueDescription),
        (status = 400, description = "Unknown category", body = ErrorResponse),
        (status = 404, description = "Unknown key", body = ErrorResponse)
    ),
    tag = "descriptions"
)]
#[get("/api/descriptions/{category}/{key}")]
/// Describe an issue key.
pub async fn description(path: web::Path<(String, String)>) -> impl Responder {
    let (category, key) = path.into_inner();
    let category: Category = match category.parse() {
        Ok(category) => category,
        Err(err) => return bad_request(err.to_string()),
    };
    let description = describe(category, &key);
    if !description.known {
        return not_found(format!(
            "no description for {category} key {}",
            description.key
        ));
    }
    HttpResponse::Ok().json(description)
}

#[utoipa::path(
    get,
    path = "/complexity/{score}",
    params(
        ("score" = u64, Path, description = "Cyclomatic complexity score")
    ),
    responses(
        (status = 200, description = "Complexity bands", body = ComplexityReading)
    ),
    tag = "descriptions"
)]
#[get("/api/complexity/{score}")]
/// Read a complexity score against the band table.
pub async fn complexity(path: web::Path<u64>) -> impl Responder {
    HttpResponse::Ok().json(complexity_reading(path.into_inner()))
}

#[utoipa::path(
    get,
    path = "/dashboard/snapshot",
    responses(
        (status = 200, description = "Latest committed dashboard snapshot", body = DashboardSnapshot),
        (status = 502, description = "Backend unavailable", body = ErrorResponse)
    ),
    tag = "dashboard"
)]
#[get("/api/dashboard/snapshot")]
/// Serve the latest dashboard snapshot, fetching one if none exists yet.
pub async fn dashboard_snapshot(state: web::Data<AppState>) -> impl Responder {
    if let Some(snapshot) = state.dashboard.current() {
        return HttpResponse::Ok().json(snapshot.as_ref());
    }
    match refresh_dashboard(&state).await {
        Ok(snapshot) => HttpResponse::Ok().json(snapshot),
        Err(err) => backend_error(err),
    }
}

#[utoipa::path(
    get,
    path = "/openapi.json",
    responses(
        (status = 200, description = "OpenAPI document", body = serde_json::Value)
    ),
    tag = "system"
)]
#[get("/api/openapi.json")]
/// Serve the OpenAPI document.
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

/// Register every handler on an app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(correlation)
        .service(statistics)
        .service(heatmap)
        .service(trend)
        .service(runs)
        .service(stored_result)
        .service(raw_source)
        .service(description)
        .service(complexity)
        .service(dashboard_snapshot)
        .service(openapi_json);
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use httpmock::prelude::*;
    use lintlens_core::{
        ApiConfig, HttpResultsSource, RepositoryInfo, SourceFuture, StoredResults,
    };
    use serde_json::{Value, json};

    fn bundle_json() -> Value {
        json!({
            "securityResults": [{
                "timestamp": "2024-03-01T10:00:00Z",
                "vulnerabilitiesCount": 1,
                "repositoryInfo": {"username": "octo", "repo": "demo", "commitId": "abc", "path": "Foo.java"},
                "vulnerabilities": ["Violation at line 10: Potential SQL injection risk"]
            }],
            "styleResults": [{
                "timestamp": "2024-03-02T10:00:00Z",
                "violationCount": 2,
                "repositoryInfo": {"username": "octo", "repo": "demo", "commitId": "abc", "path": "Foo.java"},
                "violations": [
                    "Violation at line 10: Magic number 7",
                    "Violation at line 11: Method name Foo"
                ]
            }],
            "complexityResults": [{
                "cyclomaticComplexity": 14,
                "repositoryInfo": {"path": "Bar.java"}
            }]
        })
    }

    fn stored_json() -> Value {
        json!({
            "styleResult": {
                "customId": "brave-otter",
                "violationCount": 1,
                "repositoryInfo": {"username": "octo", "repo": "demo", "commitId": "abc", "path": "Foo.java"},
                "violations": ["Violation at line 2: Magic number 7"]
            }
        })
    }

    struct StubSource {
        bundle: ResultsBundle,
        stored: StoredResults,
    }

    impl ResultsSource for StubSource {
        fn all_results(&self) -> SourceFuture<'_, ResultsBundle> {
            let bundle = self.bundle.clone();
            Box::pin(async move { Ok(bundle) })
        }

        fn results_for_path<'a>(&'a self, _path: &'a str) -> SourceFuture<'a, ResultsBundle> {
            let bundle = self.bundle.clone();
            Box::pin(async move { Ok(bundle) })
        }

        fn stored_results<'a>(&'a self, id: &'a ResultId) -> SourceFuture<'a, StoredResults> {
            let stored = match id {
                ResultId::Custom(_) => self.stored.clone(),
                ResultId::Database(_) => StoredResults::default(),
            };
            Box::pin(async move { Ok(stored) })
        }

        fn raw_source<'a>(&'a self, _info: &'a RepositoryInfo) -> SourceFuture<'a, String> {
            Box::pin(async { Ok("class Foo {\n  int x = 7;\n}".to_string()) })
        }
    }

    fn stub_state() -> web::Data<AppState> {
        web::Data::new(AppState::new(Arc::new(StubSource {
            bundle: serde_json::from_value(bundle_json()).expect("bundle"),
            stored: serde_json::from_value(stored_json()).expect("stored"),
        })))
    }

    fn http_state(base_url: &str) -> web::Data<AppState> {
        let config = ApiConfig::new(base_url).expect("config");
        let source = HttpResultsSource::new(config).expect("source");
        web::Data::new(AppState::new(Arc::new(source)))
    }

    #[actix_web::test]
    async fn correlation_and_statistics_return_payloads() {
        let app = test::init_service(App::new().app_data(stub_state()).configure(configure)).await;

        let req = test::TestRequest::get().uri("/api/correlation").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["filesSeen"], 1);
        assert_eq!(body["files"][0]["path"], "Foo.java");
        assert_eq!(body["matrix"]["security"]["style"], 1);
        assert_eq!(body["grid"]["cells"][0][3]["value"], 1);

        let req = test::TestRequest::get().uri("/api/statistics").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.as_array().expect("array").len(), 4);
        assert_eq!(body[3]["category"], "style");
        assert_eq!(body[3]["rows"][0]["key"], "Magic number");
    }

    #[actix_web::test]
    async fn heatmap_trend_and_runs_use_the_path_query() {
        let app = test::init_service(App::new().app_data(stub_state()).configure(configure)).await;

        let req = test::TestRequest::get().uri("/api/heatmap").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["snapshot"]["rows"].as_array().expect("rows").len(), 2);
        assert_eq!(body["snapshot"]["rows"][1]["counts"], json!([0, 0, 0, 0, 14]));

        let req = test::TestRequest::get()
            .uri("/api/heatmap?path=Foo")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["grid"]["yLabels"], json!(["Foo.java"]));

        let req = test::TestRequest::get()
            .uri("/api/trend?path=Foo.java")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["path"], "Foo.java");
        assert_eq!(body["repositoryInfo"]["repo"], "demo");
        assert_eq!(body["series"][0]["name"], "security");

        let req = test::TestRequest::get().uri("/api/trend").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get()
            .uri("/api/runs?path=Foo")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["individual"][0]["category"], "style");
        assert_eq!(body["individual"][0]["count"], 2);

        let req = test::TestRequest::get().uri("/api/runs?path=%20").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn stored_and_raw_results_resolve_ids() {
        let app = test::init_service(App::new().app_data(stub_state()).configure(configure)).await;

        let req = test::TestRequest::get()
            .uri("/api/results/brave-otter")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["customId"], "brave-otter");
        assert_eq!(body["categories"][0]["category"], "style");

        let req = test::TestRequest::get()
            .uri("/api/results/65f0c0ffee")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get()
            .uri("/api/raw/brave-otter")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["lines"][1]["highlighted"], true);
        assert_eq!(body["lines"][0]["highlighted"], false);

        let req = test::TestRequest::get()
            .uri("/api/raw/65f0c0ffee")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn descriptions_and_complexity_are_served() {
        let app = test::init_service(App::new().app_data(stub_state()).configure(configure)).await;

        let req = test::TestRequest::get()
            .uri("/api/descriptions/style/Magic%20number")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["known"], true);
        assert_eq!(body["key"], "Magic number");

        let req = test::TestRequest::get()
            .uri("/api/descriptions/style/Nope%20nope")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get()
            .uri("/api/descriptions/weather/Magic%20number")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get()
            .uri("/api/complexity/0")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["calculated"], false);

        let req = test::TestRequest::get()
            .uri("/api/complexity/15")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["score"], 15);
        assert_eq!(body["calculated"], true);
    }

    #[actix_web::test]
    async fn dashboard_snapshot_keeps_the_latest_fetch() {
        let state = stub_state();
        let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

        let req = test::TestRequest::get()
            .uri("/api/dashboard/snapshot")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["sequence"], 1);

        let slow = state.dashboard.begin();
        let fresh = refresh_dashboard(&state).await.expect("refresh");
        assert_eq!(fresh.sequence, 3);
        let stale = fresh.clone();
        assert!(!state.dashboard.commit(slow, stale));

        let req = test::TestRequest::get()
            .uri("/api/dashboard/snapshot")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["sequence"], 3);
        assert_eq!(body["correlation"]["files"][0]["path"], "Foo.java");
    }

    #[actix_web::test]
    async fn backend_failures_map_to_bad_gateway() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/combined-results/all");
                then.status(500);
            })
            .await;
        let app = test::init_service(
            App::new()
                .app_data(http_state(&server.base_url()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/correlation").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert!(body.message.contains("backend request failed"));
        mock.assert_async().await;
    }

    #[actix_web::test]
    async fn fetches_runs_from_the_backend() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/combined-results/all/path/Foo.java");
                then.status(200).json_body(bundle_json());
            })
            .await;
        let app = test::init_service(
            App::new()
                .app_data(http_state(&server.base_url()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/runs?path=Foo.java")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["individual"].as_array().expect("runs").len(), 2);
        mock.assert_async().await;
    }

    #[actix_web::test]
    async fn openapi_json_returns_document() {
        let app = test::init_service(App::new().app_data(stub_state()).configure(configure)).await;
        let req = test::TestRequest::get()
            .uri("/api/openapi.json")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["paths"]["/correlation"].is_object());
    }
}
