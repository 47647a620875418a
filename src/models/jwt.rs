use serde::{Deserialize, Serialize};

/// Access-token claims. `sub` carries the user's database id so handlers
/// can run ownership checks without an extra lookup.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,
    pub email: String,
    pub iat: usize,
    pub exp: usize,
}
