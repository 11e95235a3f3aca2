use axum::extract::FromRequestParts;
use axum::http::{StatusCode, request::Parts};

use crate::state::AppState;

use super::AccessCtx;

/// Handler で AccessCtx を受け取るための extractor
/// middleware が AccessCtx を request.extensions() に insert 済みである前提
/// 見つからない場合は 401 を返す（ミドルウェア未設定）
pub struct AccessCtxExtractor(pub AccessCtx);

impl FromRequestParts<AppState> for AccessCtxExtractor
where
    AppState: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AccessCtx>()
            .cloned()
            .map(AccessCtxExtractor)
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}
