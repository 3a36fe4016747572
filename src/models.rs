use serde::{Deserialize, Serialize};

/// Claims of the bearer tokens issued by the identity provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: u64,
    pub sub: String,
    pub exp: usize,
    pub jti: String,

    pub token_type: TokenType,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub enum TokenType {
    Access,
    Refresh,
}
