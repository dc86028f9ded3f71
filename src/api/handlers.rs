use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::health::{AggregateStatus, StatusBoard, StatusSnapshot, TargetStatus};

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
}

pub async fn get_health() -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
    })
}

pub async fn get_status(State(board): State<StatusBoard>) -> Json<StatusSnapshot> {
    Json(board.snapshot())
}

pub async fn get_targets(State(board): State<StatusBoard>) -> Json<Vec<TargetStatus>> {
    Json(board.targets())
}

pub async fn get_target(
    State(board): State<StatusBoard>,
    Path(identifier): Path<String>,
) -> Result<Json<TargetStatus>, StatusCode> {
    board.target(&identifier).map(Json).ok_or(StatusCode::NOT_FOUND)
}

pub async fn get_aggregate(
    State(board): State<StatusBoard>,
) -> Result<Json<AggregateStatus>, StatusCode> {
    board.aggregate().map(Json).ok_or(StatusCode::NOT_FOUND)
}
