/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - rule: リクエストごとに評価するアクセスルール
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::acl::Rule;

#[derive(Clone)]
pub struct AppState {
    pub rule: Arc<dyn Rule>,
}

impl AppState {
    pub fn new(rule: Arc<dyn Rule>) -> Self {
        Self { rule }
    }
}
