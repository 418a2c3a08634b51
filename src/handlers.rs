use crate::errors::AppError;
use crate::models::{
    ExportDocument, ImportResponse, LogRequest, LogResponse, NavigateRequest, PeriodRequest,
    QuickAddQuery, SettingsRequest, TodayResponse, ViewResponse,
};
use crate::navigation::Direction;
use crate::render::FrameBuffer;
use crate::state::AppState;
use crate::stats::Period;
use crate::tracker::Tracker;
use crate::ui::render_index;
use axum::{
    extract::{Query, State},
    http::header,
    response::{Html, IntoResponse, Redirect},
    Json,
};
use tracing::info;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let tracker = state.tracker.lock().await;
    Html(render_index(&tracker.today()))
}

pub async fn get_today(State(state): State<AppState>) -> Json<TodayResponse> {
    let tracker = state.tracker.lock().await;
    Json(tracker.today())
}

pub async fn log(
    State(state): State<AppState>,
    Json(payload): Json<LogRequest>,
) -> Result<Json<LogResponse>, AppError> {
    if payload.amount == 0 {
        return Err(AppError::bad_request("amount must be at least 1"));
    }

    let mut tracker = state.tracker.lock().await;
    let outcome = tracker.log_intake(payload.amount);
    Ok(Json(LogResponse {
        outcome: outcome.as_str().to_string(),
        message: outcome.message(),
        today: tracker.today(),
        notices: tracker.take_notices(),
    }))
}

/// `/quick-add?amount=N` shortcut. A missing amount logs one cup.
pub async fn quick_add(
    State(state): State<AppState>,
    Query(query): Query<QuickAddQuery>,
) -> Result<Redirect, AppError> {
    let amount = match query.amount.as_deref().map(str::trim) {
        None | Some("") => 1,
        Some(raw) => raw
            .parse::<u32>()
            .ok()
            .filter(|amount| *amount > 0)
            .ok_or_else(|| AppError::bad_request("amount must be a positive whole number"))?,
    };

    let outcome = state.tracker.lock().await.log_intake(amount);
    info!(amount, outcome = outcome.as_str(), "quick add");
    Ok(Redirect::to("/"))
}

pub async fn reset_day(State(state): State<AppState>) -> Json<TodayResponse> {
    let mut tracker = state.tracker.lock().await;
    tracker.reset_day();
    Json(tracker.today())
}

pub async fn get_view(State(state): State<AppState>) -> Json<ViewResponse> {
    let mut tracker = state.tracker.lock().await;
    tracker.refresh_view();
    Json(view_response(&mut tracker))
}

pub async fn set_period(
    State(state): State<AppState>,
    Json(payload): Json<PeriodRequest>,
) -> Result<Json<ViewResponse>, AppError> {
    let period = Period::parse(&payload.period)
        .ok_or_else(|| AppError::bad_request("period must be 'week', 'month' or 'year'"))?;

    let mut tracker = state.tracker.lock().await;
    tracker.switch_period(period);
    Ok(Json(view_response(&mut tracker)))
}

pub async fn navigate(
    State(state): State<AppState>,
    Json(payload): Json<NavigateRequest>,
) -> Result<Json<ViewResponse>, AppError> {
    let direction = Direction::from_step(payload.direction)
        .ok_or_else(|| AppError::bad_request("direction must be -1 or 1"))?;

    let mut tracker = state.tracker.lock().await;
    tracker.navigate(direction);
    Ok(Json(view_response(&mut tracker)))
}

pub async fn update_settings(
    State(state): State<AppState>,
    Json(payload): Json<SettingsRequest>,
) -> Json<TodayResponse> {
    let mut tracker = state.tracker.lock().await;
    tracker.set_daily_goal(payload.daily_goal);
    Json(tracker.today())
}

pub async fn export(State(state): State<AppState>) -> impl IntoResponse {
    let tracker = state.tracker.lock().await;
    let document: ExportDocument = tracker.export();
    let filename = format!("water-tracker-{}.json", tracker.today().date);
    (
        [(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        )],
        Json(document),
    )
}

pub async fn import(State(state): State<AppState>, body: String) -> Result<Json<ImportResponse>, AppError> {
    let mut tracker = state.tracker.lock().await;
    let days = tracker.import_json(&body)?;
    Ok(Json(ImportResponse {
        days,
        today: tracker.today(),
        notices: tracker.take_notices(),
    }))
}

pub async fn clear(State(state): State<AppState>) -> Json<TodayResponse> {
    let mut tracker = state.tracker.lock().await;
    tracker.clear_all();
    Json(tracker.today())
}

fn view_response(tracker: &mut Tracker<FrameBuffer>) -> ViewResponse {
    let navigation = tracker.navigation();
    ViewResponse {
        period: navigation.period.as_str().to_string(),
        offset: navigation.offset,
        frame: tracker.surface().frame().clone(),
        notices: tracker.take_notices(),
    }
}
