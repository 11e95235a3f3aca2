/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - access rule を掛ける範囲をここで決める (/health は対象外)
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::{health::health, session::session};
use crate::middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new().route("/session", get(session));
    let protected = middleware::auth::access::apply(protected, state);

    Router::new().route("/health", get(health)).merge(protected)
}
