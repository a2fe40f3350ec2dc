/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - middleware が token を検証して request extensions に格納し、handler はこの型だけを受け取る
 */

/// Identity of the caller, taken from a verified access token.
///
/// - `user_id` は token の `sub`
/// - request ごとに作られ、request と一緒に捨てられる
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCtx {
    pub user_id: String,
    pub username: String,
}

impl AuthCtx {
    pub fn new(user_id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.user_id.is_empty() && !self.username.is_empty()
    }
}
