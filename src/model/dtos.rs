use serde::{Deserialize, Deserializer, Serialize};

/// `status` value every successful cart exchange carries.
pub const STATUS_SUCCESS: &str = "success";

/// Outcome of `/favorite/toggle/{id}/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoriteStatus {
    Added,
    Removed,
    Other(String),
}

impl From<&str> for FavoriteStatus {
    fn from(status: &str) -> Self {
        match status {
            "added" => FavoriteStatus::Added,
            "removed" => FavoriteStatus::Removed,
            other => FavoriteStatus::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToggleFavoriteResponse {
    pub status: String,
    /// Not sent by the current server; honoured when present.
    #[serde(default)]
    pub count: Option<i64>,
}

impl ToggleFavoriteResponse {
    pub fn favorite_status(&self) -> FavoriteStatus {
        FavoriteStatus::from(self.status.as_str())
    }
}

/// `/favorites/remove/{id}/` answers `success` or `not_found`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RemoveFavoriteResponse {
    pub status: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AddToCartResponse {
    pub status: String,
    #[serde(default)]
    pub count: i64,
    /// False when the course was already in the cart.
    #[serde(default)]
    pub added: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RemoveFromCartResponse {
    pub status: String,
    #[serde(default)]
    pub count: i64,
    #[serde(default, deserialize_with = "amount")]
    pub total: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CartSnippetResponse {
    pub html: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CartTotalResponse {
    #[serde(deserialize_with = "amount")]
    pub total: f64,
}

/// Decimal fields come back as strings ("49.99") from the Decimal encoder, or
/// as a bare `0` when the cart is empty.
fn amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Number(f64),
        Text(String),
    }

    match Amount::deserialize(deserializer)? {
        Amount::Number(n) => Ok(n),
        Amount::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| serde::de::Error::custom(format!("invalid amount {s:?}: {e}"))),
    }
}

/// Renders an amount the way the totals slots show it.
pub fn format_amount(total: f64) -> String {
    // -0.0 would print as "-0.00"
    let total = if total == 0.0 { 0.0 } else { total };
    format!("{total:.2}")
}
