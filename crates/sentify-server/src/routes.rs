use crate::error::{error_body, status_for};
use log::{debug, error};
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{Catcher, Request, Route, State, catch, catchers, get, post, routes};
use sentify_core::{RecordQuery, Sentify, SentifyError, Summary, SummaryReport};
use sentify_protocol::{
    BatchReport, BatchRow, ConsultationRecord, ErrorBody, SentimentLabel, SubmitRequest,
};
use serde::Serialize;
use serde_json::{Value, json};

type ApiError = (Status, Json<ErrorBody>);
type ApiResult<T> = Result<Json<T>, ApiError>;

/// Listing response; `error` is set when the store could not be read.
#[derive(Debug, Serialize)]
pub struct ListingBody {
    pub records: Vec<ConsultationRecord>,
    pub error: Option<ErrorBody>,
}

/// Summary response; `error` is set when the store could not be read.
#[derive(Debug, Serialize)]
pub struct SummaryBody {
    pub summary: Summary,
    pub error: Option<ErrorBody>,
}

pub(crate) fn routes() -> Vec<Route> {
    routes![health, submit, submit_batch, list, summary]
}

pub(crate) fn catchers() -> Vec<Catcher> {
    catchers![bad_request, not_found, unprocessable]
}

#[get("/health")]
fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[post("/consultations", format = "json", data = "<request>")]
async fn submit(
    sentify: &State<Sentify>,
    request: Json<SubmitRequest>,
) -> ApiResult<ConsultationRecord> {
    let request = request.into_inner();
    let record = blocking(sentify, move |sentify| {
        sentify.submit_one(&request.serial_id, &request.comment)
    })
    .await?
    .map_err(reject)?;
    Ok(Json(record))
}

#[post("/consultations/batch", format = "json", data = "<rows>")]
async fn submit_batch(sentify: &State<Sentify>, rows: Json<Vec<BatchRow>>) -> ApiResult<BatchReport> {
    let rows = rows.into_inner();
    debug!("batch submission received (rows={})", rows.len());
    let report = blocking(sentify, move |sentify| sentify.submit_batch(rows)).await?;
    Ok(Json(report))
}

#[get("/consultations?<serial>&<label>")]
async fn list(
    sentify: &State<Sentify>,
    serial: Option<String>,
    label: Option<String>,
) -> ApiResult<ListingBody> {
    let query = record_query(serial, label)?;
    let listing = blocking(sentify, move |sentify| sentify.query(&query)).await?;
    Ok(Json(ListingBody {
        records: listing.records,
        error: listing.error.as_ref().map(error_body),
    }))
}

#[get("/summary?<serial>&<label>")]
async fn summary(
    sentify: &State<Sentify>,
    serial: Option<String>,
    label: Option<String>,
) -> ApiResult<SummaryBody> {
    let query = record_query(serial, label)?;
    let SummaryReport { summary, error } =
        blocking(sentify, move |sentify| sentify.summary(&query)).await?;
    Ok(Json(SummaryBody {
        summary,
        error: error.as_ref().map(error_body),
    }))
}

#[catch(400)]
fn bad_request(request: &Request<'_>) -> Json<ErrorBody> {
    caught("bad_request", request)
}

#[catch(404)]
fn not_found(request: &Request<'_>) -> Json<ErrorBody> {
    caught("not_found", request)
}

#[catch(422)]
fn unprocessable(request: &Request<'_>) -> Json<ErrorBody> {
    caught("validation", request)
}

fn caught(kind: &str, request: &Request<'_>) -> Json<ErrorBody> {
    Json(ErrorBody {
        kind: kind.to_string(),
        message: format!("cannot handle {} {}", request.method(), request.uri()),
    })
}

fn record_query(serial: Option<String>, label: Option<String>) -> Result<RecordQuery, ApiError> {
    let label = match label.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(
            raw.parse::<SentimentLabel>()
                .map_err(|err| reject(SentifyError::Validation(err.to_string())))?,
        ),
    };
    Ok(RecordQuery { serial, label })
}

fn reject(err: SentifyError) -> ApiError {
    let status = status_for(&err);
    debug!("request rejected (status={}, kind={})", status.code, err.kind());
    (status, Json(error_body(&err)))
}

/// Run a core call on the blocking pool with a clone of the managed facade.
async fn blocking<T, F>(sentify: &State<Sentify>, call: F) -> Result<T, ApiError>
where
    F: FnOnce(Sentify) -> T + Send + 'static,
    T: Send + 'static,
{
    let sentify = sentify.inner().clone();
    tokio::task::spawn_blocking(move || call(sentify))
        .await
        .map_err(|err| {
            error!("blocking task failed: {err}");
            (
                Status::InternalServerError,
                Json(ErrorBody {
                    kind: "internal".to_string(),
                    message: "request handler failed".to_string(),
                }),
            )
        })
}
