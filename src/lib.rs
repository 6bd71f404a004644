//! Personal trading journal: an in-memory trade store with a command
//! surface for CRUD, CSV/JSON interchange, and pure performance
//! analytics (win rate, profit factor, streaks, cumulative P&L curve).

pub mod analytics;
pub mod commands;
pub mod error;
pub mod models;
pub mod store;

pub use analytics::{
    calculate_analytics, calculate_analytics_by_date, calculate_pnl, generate_pnl_chart_data,
    PnlChartPoint, TradeAnalytics,
};
pub use error::{Error, Result};
pub use models::{CreateTradeInput, Direction, Trade, TradeFilters, UpdateTradeInput};
pub use store::TradeStore;
