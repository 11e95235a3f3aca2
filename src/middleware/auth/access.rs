//! Run the configured access rule for every request → AccessCtx を extensions に入れる
//!
//! - No match: 401 with a Basic challenge, the handler never runs.
//! - Match: the handler runs, and headers recorded by the rule are copied onto its response.
//! - Rule failure (misconfiguration): 500, no rule headers leak out.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::acl::groups::{AVAILABLE_GROUPS_HEADER, CURRENT_GROUP_HEADER};
use crate::api::v1::extractors::AccessCtx;
use crate::error::AppError;
use crate::middleware::auth::HttpRequestContext;
use crate::state::AppState;

/// Put `/api/v1/*` behind the access rule.
///
/// 例：
/// ```ignore
/// let v1 = api::v1::routes();
/// let v1 = middleware::auth::access::apply(v1, state.clone());
/// app = app.nest("/api/v1", v1);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let mut ctx = HttpRequestContext::new(req.headers().clone());

    let outcome = state.rule.check(&mut ctx).await?;
    if !outcome.is_match() {
        tracing::info!(
            rule = %state.rule.key(),
            method = %req.method(),
            uri = %req.uri(),
            "request rejected"
        );
        return Err(AppError::Unauthorized);
    }

    let access = AccessCtx {
        rule: state.rule.key().to_string(),
        current_group: ctx.response_header(CURRENT_GROUP_HEADER).map(str::to_string),
        available_groups: ctx
            .response_header(AVAILABLE_GROUPS_HEADER)
            .map(|v| v.split(',').map(str::to_string).collect())
            .unwrap_or_default(),
    };

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(access);

    let mut res = next.run(req).await;
    res.headers_mut().extend(ctx.into_response_headers());
    Ok(res)
}
