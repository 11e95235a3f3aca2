/*
 * Responsibility
 * - GET /api/v1/session
 * - access rule を通過したリクエストの acting group / available groups を返す
 */
use axum::Json;
use serde::Serialize;

use crate::api::v1::extractors::AccessCtxExtractor;

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub rule: String,
    pub current_group: Option<String>,
    pub available_groups: Vec<String>,
}

pub async fn session(AccessCtxExtractor(access): AccessCtxExtractor) -> Json<SessionResponse> {
    Json(SessionResponse {
        rule: access.rule,
        current_group: access.current_group,
        available_groups: access.available_groups,
    })
}
