use serde::{Deserialize, Serialize};

/// Issuer stamped into every session token.
pub const TOKEN_ISSUER: &str = "mealplanner";

/// JWT payload used for authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub email: String,
    pub iat: i64,    // issued at (unix timestamp)
    pub exp: i64,    // expires at (unix timestamp)
    pub iss: String, // issuer
    pub jti: String, // random per token
}

/// 128 random bits, hex encoded. Keeps two tokens issued in the same second apart.
pub fn new_token_id() -> String {
    format!("{:032x}", rand::random::<u128>())
}
