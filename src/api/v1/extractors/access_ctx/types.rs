/*
 * Responsibility
 * - Handler から見える「アクセスルール通過済みコンテキスト」の型
 * - middleware がルールを評価して request extensions に格納し、handler はこの型だけを受け取る
 */

/// Context attached to requests admitted by the access rule.
///
/// `current_group` / `available_groups` are empty when response metadata is disabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessCtx {
    pub rule: String,
    pub current_group: Option<String>,
    pub available_groups: Vec<String>,
}
