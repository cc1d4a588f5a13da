use std::convert::Infallible;
use std::sync::Arc;

use serde_json::{Value, json};
use tracing::{error, warn};
use warp::http::header::{CONTENT_TYPE, HeaderValue};
use warp::http::StatusCode;
use warp::hyper::body::Bytes;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

use crate::services::report_service::{GenerateReportRequest, ReportError, ReportService};

pub const MAX_BODY_BYTES: u64 = 64 * 1024;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// Every route of the service, with rejections turned into plain status replies.
pub fn routes(
    service: Arc<ReportService>,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let index = warp::path::end()
        .and(warp::get())
        .map(|| warp::reply::html(INDEX_HTML).into_response());

    let simulate = warp::path!("simulate")
        .and(warp::post())
        .and(request_body())
        .and(with_service(service.clone()))
        .map(handle_simulate);

    let generate_report = warp::path!("generate_report")
        .and(warp::post())
        .and(request_body())
        .and(with_service(service.clone()))
        .and_then(|body: Bytes, service: Arc<ReportService>| {
            run_blocking(move || handle_generate_report(body, service))
        });

    let fetch_report = warp::path!("reports" / String)
        .and(warp::get())
        .and(with_service(service.clone()))
        .and_then(|filename: String, service: Arc<ReportService>| {
            run_blocking(move || handle_fetch_report(filename, service))
        });

    let list_scenarios = warp::path!("scenarios")
        .and(warp::get())
        .and(with_service(service.clone()))
        .map(handle_list_scenarios);

    let save_scenario = warp::path!("scenarios")
        .and(warp::post())
        .and(request_body())
        .and(with_service(service.clone()))
        .map(handle_save_scenario);

    let get_scenario = warp::path!("scenarios" / String)
        .and(warp::get())
        .and(with_service(service))
        .map(handle_get_scenario);

    index
        .or(simulate)
        .or(generate_report)
        .or(fetch_report)
        .or(list_scenarios)
        .or(save_scenario)
        .or(get_scenario)
        .with(warp::trace::request())
        .recover(handle_rejection)
}

fn with_service(
    service: Arc<ReportService>,
) -> impl Filter<Extract = (Arc<ReportService>,), Error = Infallible> + Clone {
    warp::any().map(move || service.clone())
}

fn request_body() -> impl Filter<Extract = (Bytes,), Error = Rejection> + Clone {
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::bytes())
}

/// Runs a handler that touches the report store off the async worker threads.
async fn run_blocking<F>(handler: F) -> Result<Response, Rejection>
where
    F: FnOnce() -> Response + Send + 'static,
{
    match tokio::task::spawn_blocking(handler).await {
        Ok(response) => Ok(response),
        Err(err) => {
            error!(error = %err, "report handler task failed");
            Ok(json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal error"))
        }
    }
}

fn handle_simulate(body: Bytes, service: Arc<ReportService>) -> Response {
    match parse_json_body(&body).and_then(|payload| service.simulate(&payload)) {
        Ok(result) => warp::reply::json(&result).into_response(),
        Err(err) => error_response(&err),
    }
}

fn handle_generate_report(body: Bytes, service: Arc<ReportService>) -> Response {
    let outcome = parse_json_body(&body)
        .and_then(parse_report_request)
        .and_then(|request| service.generate_report(request));
    match outcome {
        Ok(report) => {
            warp::reply::json(&json!({"ok": true, "report_url": report.report_url})).into_response()
        }
        Err(err) => error_response(&err),
    }
}

fn handle_fetch_report(filename: String, service: Arc<ReportService>) -> Response {
    match service.fetch_report(&filename) {
        Ok(bytes) => {
            let mut response = Response::new(bytes.into());
            response.headers_mut().insert(
                CONTENT_TYPE,
                HeaderValue::from_static("text/html; charset=utf-8"),
            );
            response
        }
        Err(ReportError::NotFound(_)) => StatusCode::NOT_FOUND.into_response(),
        Err(err) => error_response(&err),
    }
}

fn handle_list_scenarios(service: Arc<ReportService>) -> Response {
    match service.list_scenarios() {
        Ok(summaries) => warp::reply::json(&summaries).into_response(),
        Err(err) => error_response(&err),
    }
}

fn handle_save_scenario(body: Bytes, service: Arc<ReportService>) -> Response {
    match parse_json_body(&body).and_then(|payload| service.save_scenario(&payload)) {
        Ok(id) => warp::reply::json(&json!({"ok": true, "id": id, "message": "Scenario saved!"}))
            .into_response(),
        Err(err) => error_response(&err),
    }
}

fn handle_get_scenario(id: String, service: Arc<ReportService>) -> Response {
    match service.get_scenario(&id) {
        Ok(scenario) => warp::reply::json(&scenario.to_flat_json()).into_response(),
        Err(err) => error_response(&err),
    }
}

/// An empty body reads as `null`; anything else must be JSON.
fn parse_json_body(body: &[u8]) -> Result<Value, ReportError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body)
        .map_err(|_| ReportError::BadRequest("request body must be valid JSON".to_string()))
}

fn parse_report_request(body: Value) -> Result<GenerateReportRequest, ReportError> {
    if body.is_null() {
        return Ok(GenerateReportRequest::default());
    }
    serde_json::from_value(body)
        .map_err(|_| ReportError::BadRequest("invalid report request".to_string()))
}

fn error_response(err: &ReportError) -> Response {
    let (status, message) = match err {
        ReportError::BadRequest(message) => (StatusCode::BAD_REQUEST, message.clone()),
        ReportError::InvalidInput(invalid) => (StatusCode::BAD_REQUEST, invalid.to_string()),
        ReportError::NotFound(message) => (StatusCode::NOT_FOUND, message.clone()),
        ReportError::Store(_) | ReportError::ReportStore(_) => {
            error!(error = %err, "request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal error".to_string(),
            )
        }
    };
    json_error(status, &message)
}

fn json_error(status: StatusCode, message: &str) -> Response {
    warp::reply::with_status(
        warp::reply::json(&json!({"ok": false, "error": message})),
        status,
    )
    .into_response()
}

async fn handle_rejection(rejection: Rejection) -> Result<Response, Infallible> {
    let status = if rejection.is_not_found() {
        StatusCode::NOT_FOUND
    } else if rejection.find::<warp::reject::PayloadTooLarge>().is_some() {
        StatusCode::PAYLOAD_TOO_LARGE
    } else if rejection.find::<warp::reject::LengthRequired>().is_some() {
        StatusCode::LENGTH_REQUIRED
    } else if rejection.find::<warp::reject::MethodNotAllowed>().is_some() {
        StatusCode::METHOD_NOT_ALLOWED
    } else {
        warn!(?rejection, "unhandled rejection");
        StatusCode::INTERNAL_SERVER_ERROR
    };
    Ok(status.into_response())
}
