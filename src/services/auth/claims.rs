/*
 * Responsibility
 * - access token の中身 (Claims) の型
 * - wire 上の claim 名 (sub/username/iat/exp) と Rust 側のフィールド名の対応
 * - iat/exp は NumericDate (秒) だが、ミリ秒まで小数で保持する
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Decoded identity payload of an access token.
///
/// Produced only by `TokenCodec::verify*` (or `issue*` for tests);
/// immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "sub")]
    pub user_id: String,
    pub username: String,
    #[serde(rename = "iat", with = "numeric_date")]
    pub issued_at: DateTime<Utc>,
    #[serde(rename = "exp", with = "numeric_date")]
    pub expires_at: DateTime<Utc>,
}

impl Claims {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// RFC 7519 NumericDate with millisecond resolution.
///
/// Serialized as fractional seconds (`1760700000.123`); integer seconds are
/// accepted on input.
mod numeric_date {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(value.timestamp_millis() as f64 / 1000.0)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = f64::deserialize(deserializer)?;
        if !secs.is_finite() {
            return Err(D::Error::custom("NumericDate must be finite"));
        }

        let millis = (secs * 1000.0).round() as i64;
        DateTime::from_timestamp_millis(millis)
            .ok_or_else(|| D::Error::custom("NumericDate out of range"))
    }
}
