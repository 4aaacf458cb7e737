use chrono::{DateTime, Duration, Local, Utc};
use serde::{Deserialize, Serialize};

/// Lifetime, in days, Instagram grants a long-lived access token.
pub const LONG_LIVED_TOKEN_TTL_DAYS: i64 = 60;

/// Tokens expiring sooner than this many days are refreshed.
pub const REFRESH_WINDOW_DAYS: i64 = 7;

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Long-lived Instagram access token as persisted in `instagram_tokens.json`.
///
/// `expires_at` is stored as unix seconds. Files written by older tooling
/// with fractional timestamps or numeric user ids load as well.
///
/// # Example
/// ```
/// use chrono::{Duration, Utc};
/// use instacrew::auth::Token;
///
/// let token = Token::new("IGQV...", Some("17841400000".to_string()), Utc::now() + Duration::days(3));
/// assert!(token.needs_refresh());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub user_id: Option<String>,
    #[serde(default, with = "epoch_seconds")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Token {
    pub fn new(
        access_token: impl Into<String>,
        user_id: Option<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            user_id,
            expires_at: Some(expires_at),
        }
    }

    /// Whether the token expires within [`REFRESH_WINDOW_DAYS`] of `now`.
    ///
    /// A token without an expiry is treated as already expired.
    pub fn needs_refresh_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at - now < Duration::days(REFRESH_WINDOW_DAYS),
            None => true,
        }
    }

    pub fn needs_refresh(&self) -> bool {
        self.needs_refresh_at(Utc::now())
    }

    /// Expiry rendered in local time, e.g. `2025-03-01 14:02:11`.
    pub fn valid_until(&self) -> String {
        format_local(self.expires_at.unwrap_or_default())
    }
}

pub(crate) fn format_local(time: DateTime<Utc>) -> String {
    time.with_timezone(&Local).format(DISPLAY_FORMAT).to_string()
}

fn parse_epoch(value: &serde_json::Value) -> Option<DateTime<Utc>> {
    let secs = value
        .as_f64()
        .or_else(|| value.as_str().and_then(|text| text.trim().parse::<f64>().ok()))?;
    // millisecond timestamps
    let secs = if secs > 10_000_000_000.0 {
        secs / 1000.0
    } else {
        secs
    };
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1_000_000_000.0) as u32;
    DateTime::from_timestamp(whole as i64, nanos)
}

mod epoch_seconds {
    use chrono::{DateTime, Utc};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(time) => serializer.serialize_i64(time.timestamp()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        match Option::<serde_json::Value>::deserialize(deserializer)? {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(value) => super::parse_epoch(&value)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid expires_at: {value}"))),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(
        match Option::<serde_json::Value>::deserialize(deserializer)? {
            Some(serde_json::Value::String(text)) => Some(text),
            Some(serde_json::Value::Number(number)) => Some(number.to_string()),
            _ => None,
        },
    )
}
