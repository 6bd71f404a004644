use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Trade not found: {id}")]
    TradeNotFound { id: String },

    #[error("Invalid trade: {0}")]
    InvalidTrade(String),

    #[error("Trade store lock poisoned")]
    StorePoisoned,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
