use crate::error::{Error, Result};
use crate::models::{CreateTradeInput, Trade, TradeFilters, UpdateTradeInput};
use crate::store::TradeStore;

/// Validate and insert a new trade.
pub fn create_trade(store: &TradeStore, input: CreateTradeInput) -> Result<Trade> {
    validate_create(&input)?;
    store.add(input)
}

pub fn get_trade(store: &TradeStore, id: &str) -> Result<Trade> {
    store.get(id)
}

pub fn get_trades(store: &TradeStore, filters: Option<&TradeFilters>) -> Result<Vec<Trade>> {
    store.list(filters)
}

/// Apply a partial update. Any numeric field that is provided is checked
/// against the same rules as trade creation.
pub fn update_trade(store: &TradeStore, id: &str, update: UpdateTradeInput) -> Result<Trade> {
    validate_update(&update)?;
    store.update(id, update)
}

pub fn delete_trade(store: &TradeStore, id: &str) -> Result<()> {
    store.delete(id)
}

pub fn duplicate_trade(store: &TradeStore, id: &str) -> Result<Trade> {
    store.duplicate(id)
}

pub fn delete_all_trades(store: &TradeStore) -> Result<usize> {
    store.clear()
}

/// Numeric sanity for trade inputs. The analytics functions trust their
/// input, so NaN or non-positive prices must never get past this point.
pub(crate) fn validate_create(input: &CreateTradeInput) -> Result<()> {
    if input.symbol.trim().is_empty() {
        return Err(Error::InvalidTrade("symbol must not be empty".to_string()));
    }
    require_positive("entry_price", input.entry_price)?;
    require_positive("exit_price", input.exit_price)?;
    require_positive("quantity", input.quantity)?;
    require_leverage(input.leverage)?;
    require_non_negative("stop_loss", input.stop_loss)?;
    require_non_negative("take_profit", input.take_profit)?;
    require_non_negative("fees", input.fees)?;
    Ok(())
}

fn validate_update(update: &UpdateTradeInput) -> Result<()> {
    if let Some(symbol) = &update.symbol {
        if symbol.trim().is_empty() {
            return Err(Error::InvalidTrade("symbol must not be empty".to_string()));
        }
    }
    if let Some(v) = update.entry_price {
        require_positive("entry_price", v)?;
    }
    if let Some(v) = update.exit_price {
        require_positive("exit_price", v)?;
    }
    if let Some(v) = update.quantity {
        require_positive("quantity", v)?;
    }
    if let Some(v) = update.leverage {
        require_leverage(v)?;
    }
    if let Some(v) = update.stop_loss {
        require_non_negative("stop_loss", v)?;
    }
    if let Some(v) = update.take_profit {
        require_non_negative("take_profit", v)?;
    }
    if let Some(v) = update.fees {
        require_non_negative("fees", v)?;
    }
    Ok(())
}

fn require_positive(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::InvalidTrade(format!(
            "{} must be a positive number, got {}",
            field, value
        )));
    }
    Ok(())
}

fn require_non_negative(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::InvalidTrade(format!(
            "{} must be a non-negative number, got {}",
            field, value
        )));
    }
    Ok(())
}

fn require_leverage(value: f64) -> Result<()> {
    if !value.is_finite() || value < 1.0 {
        return Err(Error::InvalidTrade(format!(
            "leverage must be at least 1, got {}",
            value
        )));
    }
    Ok(())
}
