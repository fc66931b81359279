use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Identity token claims.
///
/// Binds a numeric user identifier to an absolute expiry instant.
/// Serialized as `{"user_id": <int>, "iat": <unix>, "exp": <unix>}`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user identifier)
    pub user_id: i64,

    /// Issued at (Unix timestamp)
    #[serde(default)]
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for a user, valid for `validity` from now.
    ///
    /// # Arguments
    /// * `user_id` - Unique user identifier
    /// * `validity` - Time until the token expires
    ///
    /// # Returns
    /// Claims with user_id, iat and exp set, or `None` when the expiry falls
    /// outside the representable date range
    pub fn for_user(user_id: i64, validity: Duration) -> Option<Self> {
        Self::issued_at(user_id, Utc::now(), validity)
    }

    /// Create claims for a user issued at a fixed instant.
    pub fn issued_at(user_id: i64, now: DateTime<Utc>, validity: Duration) -> Option<Self> {
        let expiration = now.checked_add_signed(validity)?;

        Some(Self {
            user_id,
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        })
    }

    /// Set expiration (Unix timestamp).
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = exp;
        self
    }

    /// Set issued at (Unix timestamp).
    pub fn with_issued_at(mut self, iat: i64) -> Self {
        self.iat = iat;
        self
    }

    /// Expiry as a UTC instant.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Check if token is expired.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_user() {
        let claims = Claims::for_user(42, Duration::hours(24)).unwrap();

        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60); // 24 hours
    }

    #[test]
    fn test_issued_at_fixed_instant() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let claims = Claims::issued_at(7, now, Duration::hours(1)).unwrap();

        assert_eq!(claims.iat, 1_700_000_000);
        assert_eq!(claims.exp, 1_700_003_600);
        assert_eq!(
            claims.expires_at(),
            DateTime::from_timestamp(1_700_003_600, 0)
        );
    }

    #[test]
    fn test_expiry_out_of_range() {
        let validity = Duration::try_hours(10_000_000_000).unwrap();

        assert_eq!(Claims::for_user(1, validity), None);
    }

    #[test]
    fn test_builder_pattern() {
        let claims = Claims::for_user(1, Duration::hours(1))
            .unwrap()
            .with_expiration(1234567890)
            .with_issued_at(1234567800);

        assert_eq!(claims.exp, 1234567890);
        assert_eq!(claims.iat, 1234567800);
    }

    #[test]
    fn test_is_expired() {
        let claims = Claims::for_user(1, Duration::hours(1))
            .unwrap()
            .with_expiration(1000);

        assert!(!claims.is_expired(999)); // Not expired
        assert!(!claims.is_expired(1000)); // Exactly at expiration
        assert!(claims.is_expired(1001)); // Expired
    }

    #[test]
    fn test_wire_shape() {
        let claims = Claims {
            user_id: 7,
            iat: 100,
            exp: 200,
        };

        let json = serde_json::to_value(claims).unwrap();
        assert_eq!(json, serde_json::json!({"user_id": 7, "iat": 100, "exp": 200}));
    }

    #[test]
    fn test_rejects_non_numeric_subject() {
        let result =
            serde_json::from_str::<Claims>(r#"{"user_id": "7", "exp": 200}"#);
        assert!(result.is_err());

        let result = serde_json::from_str::<Claims>(r#"{"exp": 200}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_issued_at_is_optional_on_input() {
        let claims = serde_json::from_str::<Claims>(r#"{"user_id": 7, "exp": 200}"#).unwrap();
        assert_eq!(claims.iat, 0);
    }
}
