/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: access rule (groups) per request
 * - http: cross-cutting transport layers (trace / request id / timeout)
 */
pub mod auth;
pub mod http;
