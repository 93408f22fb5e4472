use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use serde::Serialize;
use tracing::{error, warn};

use super::domain::{
    CandidateId, CandidateIntake, Department, MeetingRequest, NewStaffMember, RequestViolation,
    StaffId,
};
use super::repository::{CandidateRepository, StaffRepository};
use super::service::{CandidateLifecycleService, PipelineError, StaffDirectory};

/// Uniform JSON envelope for every pipeline response.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    fn respond(status: StatusCode, message: impl Into<String>, data: T) -> Response {
        let body = ApiResponse {
            code: status.as_u16(),
            message: message.into(),
            data: Some(data),
        };
        (status, Json(body)).into_response()
    }
}

fn ok<T: Serialize>(message: &str, data: T) -> Response {
    ApiResponse::respond(StatusCode::OK, message, data)
}

fn created<T: Serialize>(message: &str, data: T) -> Response {
    ApiResponse::respond(StatusCode::CREATED, message, data)
}

fn failure(status: StatusCode, message: String) -> Response {
    let body: ApiResponse<()> = ApiResponse {
        code: status.as_u16(),
        message,
        data: None,
    };
    (status, Json(body)).into_response()
}

/// Unwrap a JSON body and run its validation, answering 400 in the envelope on either failure.
fn validated_body<T>(
    payload: Result<Json<T>, JsonRejection>,
    validate: impl FnOnce(&T) -> Result<(), RequestViolation>,
) -> Result<T, Response> {
    let Json(body) = payload.map_err(|rejection| {
        warn!(reason = %rejection.body_text(), "rejected request body");
        failure(StatusCode::BAD_REQUEST, rejection.body_text())
    })?;
    validate(&body).map_err(|violation| {
        warn!(%violation, "rejected request body");
        failure(StatusCode::BAD_REQUEST, violation.to_string())
    })?;
    Ok(body)
}

pub(crate) fn status_for(error: &PipelineError) -> StatusCode {
    match error {
        PipelineError::NotFound | PipelineError::StaffNotFound => StatusCode::NOT_FOUND,
        PipelineError::AlreadyExists
        | PipelineError::StaffAlreadyExists
        | PipelineError::AlreadyDecided { .. }
        | PipelineError::ConcurrentModification => StatusCode::CONFLICT,
        PipelineError::InsufficientMeetings { .. } | PipelineError::NoArrangedMeeting => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        PipelineError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, "pipeline storage failure");
            return failure(status, "internal server error".to_string());
        }
        failure(status, self.to_string())
    }
}

/// Shared handles for the pipeline routes.
pub struct PipelineState<C, S> {
    pub candidates: Arc<CandidateLifecycleService<C, S>>,
    pub staff: Arc<StaffDirectory<S>>,
}

impl<C, S> Clone for PipelineState<C, S> {
    fn clone(&self) -> Self {
        Self {
            candidates: Arc::clone(&self.candidates),
            staff: Arc::clone(&self.staff),
        }
    }
}

/// Router builder exposing HTTP endpoints for candidates, staff, and meetings.
pub fn pipeline_router<C, S>(
    candidates: Arc<CandidateLifecycleService<C, S>>,
    staff: Arc<StaffDirectory<S>>,
) -> Router
where
    C: CandidateRepository + 'static,
    S: StaffRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/internship/candidates",
            post(intake_handler::<C, S>).get(list_candidates_handler::<C, S>),
        )
        .route(
            "/api/v1/internship/candidates/:candidate_id",
            get(read_candidate_handler::<C, S>).delete(delete_candidate_handler::<C, S>),
        )
        .route(
            "/api/v1/internship/candidates/:candidate_id/deny",
            patch(deny_handler::<C, S>),
        )
        .route(
            "/api/v1/internship/candidates/:candidate_id/accept",
            patch(accept_handler::<C, S>),
        )
        .route(
            "/api/v1/internship/staff",
            post(create_staff_handler::<C, S>).get(list_staff_handler::<C, S>),
        )
        .route(
            "/api/v1/internship/staff/:staff_id/candidates",
            get(staff_candidates_handler::<C, S>),
        )
        .route(
            "/api/v1/internship/staff/name/:name",
            get(staff_id_by_name_handler::<C, S>),
        )
        .route(
            "/api/v1/internship/staff/department/:department",
            get(staff_by_department_handler::<C, S>),
        )
        .route(
            "/api/v1/internship/meetings/arrange",
            post(arrange_meeting_handler::<C, S>),
        )
        .route(
            "/api/v1/internship/meetings/:candidate_id/complete",
            post(complete_meeting_handler::<C, S>),
        )
        .with_state(PipelineState { candidates, staff })
}

pub(crate) async fn intake_handler<C, S>(
    State(state): State<PipelineState<C, S>>,
    payload: Result<Json<CandidateIntake>, JsonRejection>,
) -> Response
where
    C: CandidateRepository + 'static,
    S: StaffRepository + 'static,
{
    let intake = match validated_body(payload, CandidateIntake::validate) {
        Ok(intake) => intake,
        Err(response) => return response,
    };
    match state.candidates.intake(intake) {
        Ok(candidate) => created("Successfully created candidate", candidate),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn list_candidates_handler<C, S>(
    State(state): State<PipelineState<C, S>>,
) -> Response
where
    C: CandidateRepository + 'static,
    S: StaffRepository + 'static,
{
    match state.candidates.list() {
        Ok(candidates) => ok("Successfully fetched all candidates", candidates),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn read_candidate_handler<C, S>(
    State(state): State<PipelineState<C, S>>,
    Path(candidate_id): Path<String>,
) -> Response
where
    C: CandidateRepository + 'static,
    S: StaffRepository + 'static,
{
    match state.candidates.get(&CandidateId(candidate_id)) {
        Ok(candidate) => ok("Successfully read candidate", candidate),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn delete_candidate_handler<C, S>(
    State(state): State<PipelineState<C, S>>,
    Path(candidate_id): Path<String>,
) -> Response
where
    C: CandidateRepository + 'static,
    S: StaffRepository + 'static,
{
    let id = CandidateId(candidate_id);
    match state.candidates.delete(&id) {
        Ok(()) => ok("Successfully deleted candidate", id),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn deny_handler<C, S>(
    State(state): State<PipelineState<C, S>>,
    Path(candidate_id): Path<String>,
) -> Response
where
    C: CandidateRepository + 'static,
    S: StaffRepository + 'static,
{
    match state.candidates.deny(&CandidateId(candidate_id)) {
        Ok(candidate) => ok("Successfully denied candidate", candidate),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn accept_handler<C, S>(
    State(state): State<PipelineState<C, S>>,
    Path(candidate_id): Path<String>,
) -> Response
where
    C: CandidateRepository + 'static,
    S: StaffRepository + 'static,
{
    match state.candidates.accept(&CandidateId(candidate_id)) {
        Ok(candidate) => ok("Successfully accepted candidate", candidate),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn staff_candidates_handler<C, S>(
    State(state): State<PipelineState<C, S>>,
    Path(staff_id): Path<String>,
) -> Response
where
    C: CandidateRepository + 'static,
    S: StaffRepository + 'static,
{
    match state.candidates.list_for_staff(&StaffId(staff_id)) {
        Ok(candidates) => ok("Successfully found candidates of staff member", candidates),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn create_staff_handler<C, S>(
    State(state): State<PipelineState<C, S>>,
    payload: Result<Json<NewStaffMember>, JsonRejection>,
) -> Response
where
    C: CandidateRepository + 'static,
    S: StaffRepository + 'static,
{
    let member = match validated_body(payload, NewStaffMember::validate) {
        Ok(member) => member,
        Err(response) => return response,
    };
    match state.staff.create(member) {
        Ok(member) => created("Successfully created staff member", member),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn list_staff_handler<C, S>(State(state): State<PipelineState<C, S>>) -> Response
where
    C: CandidateRepository + 'static,
    S: StaffRepository + 'static,
{
    match state.staff.list() {
        Ok(members) => ok("Successfully fetched all staff members", members),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn staff_id_by_name_handler<C, S>(
    State(state): State<PipelineState<C, S>>,
    Path(name): Path<String>,
) -> Response
where
    C: CandidateRepository + 'static,
    S: StaffRepository + 'static,
{
    match state.staff.find_id_by_name(&name) {
        Ok(id) => ok("Successfully found staff id by name", id),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn staff_by_department_handler<C, S>(
    State(state): State<PipelineState<C, S>>,
    Path(department): Path<String>,
) -> Response
where
    C: CandidateRepository + 'static,
    S: StaffRepository + 'static,
{
    let department = match department.parse::<Department>() {
        Ok(department) => department,
        Err(err) => return failure(StatusCode::BAD_REQUEST, err.to_string()),
    };

    match state.staff.list_by_department(department) {
        Ok(members) => ok("Successfully fetched staff members by department", members),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn arrange_meeting_handler<C, S>(
    State(state): State<PipelineState<C, S>>,
    payload: Result<Json<MeetingRequest>, JsonRejection>,
) -> Response
where
    C: CandidateRepository + 'static,
    S: StaffRepository + 'static,
{
    let request = match validated_body(payload, MeetingRequest::validate) {
        Ok(request) => request,
        Err(response) => return response,
    };
    match state
        .candidates
        .arrange_meeting(&request.candidate_id, request.next_meeting_time)
    {
        Ok(candidate) => ok(
            "Successfully arranged meeting with candidate on given date",
            candidate,
        ),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn complete_meeting_handler<C, S>(
    State(state): State<PipelineState<C, S>>,
    Path(candidate_id): Path<String>,
) -> Response
where
    C: CandidateRepository + 'static,
    S: StaffRepository + 'static,
{
    match state.candidates.complete_meeting(&CandidateId(candidate_id)) {
        Ok(candidate) => ok("Successfully completed meeting with candidate", candidate),
        Err(err) => err.into_response(),
    }
}
