/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: Bearer token の検証 (保護ルートのみ), http: 全ルート共通の横断的関心事
 */
pub mod auth;
pub mod http;
