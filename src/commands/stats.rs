use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::analytics::{calculate_analytics, generate_pnl_chart_data, PnlChartPoint, TradeAnalytics};
use crate::error::Result;
use crate::models::TradeFilters;
use crate::store::TradeStore;

/// Dashboard date-range presets, counted back from now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateRange {
    Today,
    Week,
    Month,
    #[serde(rename = "3months")]
    ThreeMonths,
    #[serde(rename = "6months")]
    SixMonths,
    Year,
}

impl DateRange {
    fn threshold(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            DateRange::Today => now
                .date_naive()
                .and_hms_opt(0, 0, 0)
                .unwrap()
                .and_utc(),
            DateRange::Week => now - Duration::days(7),
            DateRange::Month => now - Duration::days(30),
            DateRange::ThreeMonths => now - Duration::days(90),
            DateRange::SixMonths => now - Duration::days(180),
            DateRange::Year => now - Duration::days(365),
        }
    }
}

/// Summary statistics over the journal, optionally restricted to a date
/// range. Trades are consumed newest-first (the store's list order), so
/// the streak counters follow that order.
pub fn get_dashboard_stats(
    store: &TradeStore,
    date_range: Option<DateRange>,
) -> Result<TradeAnalytics> {
    let trades = store.list(range_filters(date_range).as_ref())?;
    Ok(calculate_analytics(&trades))
}

/// Cumulative P&L curve for charting, oldest trade first.
pub fn get_equity_curve(
    store: &TradeStore,
    date_range: Option<DateRange>,
) -> Result<Vec<PnlChartPoint>> {
    let trades = store.list(range_filters(date_range).as_ref())?;
    Ok(generate_pnl_chart_data(&trades))
}

fn range_filters(date_range: Option<DateRange>) -> Option<TradeFilters> {
    date_range.map(|range| TradeFilters {
        start_date: Some(range.threshold(Utc::now())),
        ..Default::default()
    })
}
