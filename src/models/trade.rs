use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Trade direction. Long profits when price rises, short when it falls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Long => "long",
            Direction::Short => "short",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub id: String,
    pub date: DateTime<Utc>,
    pub symbol: String,
    pub direction: Direction,

    pub entry_price: f64,
    pub exit_price: f64,
    pub quantity: f64,
    pub leverage: f64,

    pub stop_loss: f64,   // 0 = not set
    pub take_profit: f64, // 0 = not set
    pub fees: f64,

    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTradeInput {
    pub date: DateTime<Utc>,
    pub symbol: String,
    pub direction: Direction,

    pub entry_price: f64,
    pub exit_price: f64,
    pub quantity: f64,
    pub leverage: f64,

    pub stop_loss: f64,
    pub take_profit: f64,
    pub fees: f64,

    pub notes: String,
}

/// Partial update; only provided fields are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTradeInput {
    pub date: Option<DateTime<Utc>>,
    pub symbol: Option<String>,
    pub direction: Option<Direction>,

    pub entry_price: Option<f64>,
    pub exit_price: Option<f64>,
    pub quantity: Option<f64>,
    pub leverage: Option<f64>,

    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
    pub fees: Option<f64>,

    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TradeFilters {
    pub symbol: Option<String>,
    pub direction: Option<Direction>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}
