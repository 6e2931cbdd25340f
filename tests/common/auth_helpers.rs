//! Authentication test helpers

use std::time::Duration;

use chrono::Utc;
use parley::backend::auth::sessions::{create_token, encode_claims, Claims};
use uuid::Uuid;

/// Secret every test app is configured with
pub const TEST_SECRET: &str = "parley-test-secret";

/// A token valid for one hour
pub fn generate_test_token(user_id: Uuid) -> String {
    create_token(user_id, None, TEST_SECRET, Duration::from_secs(3600))
        .expect("Failed to generate test token")
}

/// A correctly signed token that expired an hour ago
pub fn generate_expired_token(user_id: Uuid) -> String {
    let now = Utc::now().timestamp() as u64;
    let claims = Claims {
        sub: user_id.to_string(),
        username: None,
        exp: now - 3600,
        iat: now - 7200,
    };
    encode_claims(&claims, TEST_SECRET).expect("Failed to encode expired token")
}
