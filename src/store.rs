use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use crate::error::{Error, Result};
use crate::models::{CreateTradeInput, Trade, TradeFilters, UpdateTradeInput};

/// In-memory trade journal. The application owns one instance and hands
/// snapshots to the analytics functions; nothing is persisted.
pub struct TradeStore {
    trades: Mutex<Vec<Trade>>,
}

impl TradeStore {
    pub fn new() -> Self {
        TradeStore {
            trades: Mutex::new(Vec::new()),
        }
    }

    pub fn with_trades(trades: Vec<Trade>) -> Self {
        log::info!("Initializing trade store with {} trades", trades.len());
        TradeStore {
            trades: Mutex::new(trades),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Trade>>> {
        self.trades.lock().map_err(|_| Error::StorePoisoned)
    }

    /// Insert a new trade and return it with its assigned id.
    pub fn add(&self, input: CreateTradeInput) -> Result<Trade> {
        let trade = Trade {
            id: new_trade_id(),
            date: input.date,
            symbol: input.symbol,
            direction: input.direction,
            entry_price: input.entry_price,
            exit_price: input.exit_price,
            quantity: input.quantity,
            leverage: input.leverage,
            stop_loss: input.stop_loss,
            take_profit: input.take_profit,
            fees: input.fees,
            notes: input.notes,
        };

        let mut trades = self.lock()?;
        trades.push(trade.clone());
        Ok(trade)
    }

    pub fn get(&self, id: &str) -> Result<Trade> {
        let trades = self.lock()?;
        trades
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| Error::TradeNotFound { id: id.to_string() })
    }

    /// Apply the provided fields of a partial update and return the
    /// updated trade.
    pub fn update(&self, id: &str, update: UpdateTradeInput) -> Result<Trade> {
        let mut trades = self.lock()?;
        let trade = trades
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| Error::TradeNotFound { id: id.to_string() })?;

        if let Some(date) = update.date {
            trade.date = date;
        }
        if let Some(symbol) = update.symbol {
            trade.symbol = symbol;
        }
        if let Some(direction) = update.direction {
            trade.direction = direction;
        }
        if let Some(entry_price) = update.entry_price {
            trade.entry_price = entry_price;
        }
        if let Some(exit_price) = update.exit_price {
            trade.exit_price = exit_price;
        }
        if let Some(quantity) = update.quantity {
            trade.quantity = quantity;
        }
        if let Some(leverage) = update.leverage {
            trade.leverage = leverage;
        }
        if let Some(stop_loss) = update.stop_loss {
            trade.stop_loss = stop_loss;
        }
        if let Some(take_profit) = update.take_profit {
            trade.take_profit = take_profit;
        }
        if let Some(fees) = update.fees {
            trade.fees = fees;
        }
        if let Some(notes) = update.notes {
            trade.notes = notes;
        }

        Ok(trade.clone())
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        let mut trades = self.lock()?;
        let before = trades.len();
        trades.retain(|t| t.id != id);
        if trades.len() == before {
            return Err(Error::TradeNotFound { id: id.to_string() });
        }
        Ok(())
    }

    /// Delete every trade; returns how many were removed.
    pub fn clear(&self) -> Result<usize> {
        let mut trades = self.lock()?;
        let count = trades.len();
        trades.clear();
        log::info!("Cleared {} trades from store", count);
        Ok(count)
    }

    /// Insert, or replace the trade with the same id (backup restore).
    pub fn upsert(&self, trade: Trade) -> Result<()> {
        let mut trades = self.lock()?;
        match trades.iter_mut().find(|t| t.id == trade.id) {
            Some(existing) => *existing = trade,
            None => trades.push(trade),
        }
        Ok(())
    }

    /// Filtered view of the journal, newest first. Pagination is applied
    /// after filtering and ordering.
    pub fn list(&self, filters: Option<&TradeFilters>) -> Result<Vec<Trade>> {
        let trades = self.lock()?;

        let mut result: Vec<Trade> = trades
            .iter()
            .filter(|t| matches_filters(t, filters))
            .cloned()
            .collect();

        result.sort_by(|a, b| b.date.cmp(&a.date));

        if let Some(f) = filters {
            if let (Some(page), Some(limit)) = (f.page, f.limit) {
                let offset = (page.saturating_sub(1) as usize) * limit as usize;
                result = result
                    .into_iter()
                    .skip(offset)
                    .take(limit as usize)
                    .collect();
            }
        }

        Ok(result)
    }

    /// Copy a trade under a fresh id, notes tagged as a copy.
    pub fn duplicate(&self, id: &str) -> Result<Trade> {
        let original = self.get(id)?;

        let notes = if original.notes.is_empty() {
            "(Copy)".to_string()
        } else {
            format!("{} (Copy)", original.notes)
        };

        let copy = Trade {
            id: new_trade_id(),
            notes,
            ..original
        };

        let mut trades = self.lock()?;
        trades.push(copy.clone());
        Ok(copy)
    }

    /// Clone of the current contents in insertion order.
    pub fn snapshot(&self) -> Result<Vec<Trade>> {
        Ok(self.lock()?.clone())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }
}

impl Default for TradeStore {
    fn default() -> Self {
        Self::new()
    }
}

fn matches_filters(trade: &Trade, filters: Option<&TradeFilters>) -> bool {
    let Some(f) = filters else {
        return true;
    };

    if let Some(symbol) = &f.symbol {
        if !trade
            .symbol
            .to_lowercase()
            .contains(&symbol.to_lowercase())
        {
            return false;
        }
    }
    if let Some(direction) = f.direction {
        if trade.direction != direction {
            return false;
        }
    }
    if let Some(start) = f.start_date {
        if trade.date < start {
            return false;
        }
    }
    if let Some(end) = f.end_date {
        if trade.date > end {
            return false;
        }
    }

    true
}

fn new_trade_id() -> String {
    format!("TRADE-{}-{}", Utc::now().timestamp_millis(), uuid::Uuid::new_v4())
}
