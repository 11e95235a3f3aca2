/*!
 * Access context extractor
 *
 * Public API:
 * - AccessCtx
 * - AccessCtxExtractor
 */

mod core;
mod types;

pub use self::core::AccessCtxExtractor;
pub use types::AccessCtx;
