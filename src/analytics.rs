//! Pure analytics over a list of closed trades: per-trade P&L, summary
//! statistics and the cumulative P&L curve. No I/O and no state; callers
//! hand in a snapshot of the journal and render whatever comes back.

use serde::{Deserialize, Serialize};

use crate::models::{Direction, Trade};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeAnalytics {
    pub total_trades: usize,
    pub win_count: usize,
    pub loss_count: usize,
    pub win_rate: f64,
    pub total_profit: f64,
    pub total_loss: f64,
    pub net_pnl: f64,
    pub average_rr: f64,
    pub profit_factor: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
    pub average_win: f64,
    pub average_loss: f64,
    pub successive_wins: usize,
    pub successive_losses: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PnlChartPoint {
    pub date: String,
    pub pnl: f64,
    pub cumulative_pnl: f64,
}

/// Realized P&L of a single trade, after fees.
pub fn calculate_pnl(trade: &Trade) -> f64 {
    match trade.direction {
        Direction::Long => (trade.exit_price - trade.entry_price) * trade.quantity - trade.fees,
        Direction::Short => (trade.entry_price - trade.exit_price) * trade.quantity - trade.fees,
    }
}

/// Fold a list of trades into summary statistics in a single pass.
///
/// Trades are consumed in the order given. The streak counters
/// (`successive_wins` / `successive_losses`) therefore reflect runs in
/// iteration order, not chronological order; use
/// [`calculate_analytics_by_date`] for the chronological reading.
/// A trade with zero P&L counts as a loss.
pub fn calculate_analytics(trades: &[Trade]) -> TradeAnalytics {
    if trades.is_empty() {
        // Short-circuit so none of the ratios below divide by zero
        return TradeAnalytics::default();
    }

    let mut win_count = 0usize;
    let mut loss_count = 0usize;
    let mut total_profit = 0.0;
    let mut total_loss = 0.0;
    let mut largest_win = 0.0f64;
    let mut largest_loss = 0.0f64;
    let mut current_successive_wins = 0usize;
    let mut current_successive_losses = 0usize;
    let mut max_successive_wins = 0usize;
    let mut max_successive_losses = 0usize;
    let mut total_rr = 0.0;

    for trade in trades {
        let pnl = calculate_pnl(trade);

        // Risk: distance from entry to stop, in money terms
        let risk = if trade.stop_loss > 0.0 {
            let distance = match trade.direction {
                Direction::Long => trade.entry_price - trade.stop_loss,
                Direction::Short => trade.stop_loss - trade.entry_price,
            };
            distance.abs() * trade.quantity
        } else {
            0.0
        };

        // Reward: realized gain for winners, target distance otherwise
        let reward = if pnl > 0.0 {
            pnl
        } else if trade.take_profit > 0.0 {
            let distance = match trade.direction {
                Direction::Long => trade.take_profit - trade.entry_price,
                Direction::Short => trade.entry_price - trade.take_profit,
            };
            distance.abs() * trade.quantity
        } else {
            0.0
        };

        let rr = if risk > 0.0 { reward / risk } else { 0.0 };
        if rr > 0.0 {
            total_rr += rr;
        }

        if pnl > 0.0 {
            win_count += 1;
            total_profit += pnl;
            largest_win = largest_win.max(pnl);
            current_successive_wins += 1;
            current_successive_losses = 0;
            max_successive_wins = max_successive_wins.max(current_successive_wins);
        } else {
            loss_count += 1;
            total_loss += pnl.abs();
            largest_loss = largest_loss.max(pnl.abs());
            current_successive_losses += 1;
            current_successive_wins = 0;
            max_successive_losses = max_successive_losses.max(current_successive_losses);
        }
    }

    let total_trades = trades.len();
    let win_rate = (win_count as f64 / total_trades as f64) * 100.0;
    let net_pnl = total_profit - total_loss;
    let average_win = if win_count > 0 {
        total_profit / win_count as f64
    } else {
        0.0
    };
    let average_loss = if loss_count > 0 {
        total_loss / loss_count as f64
    } else {
        0.0
    };
    let profit_factor = if total_loss > 0.0 {
        total_profit / total_loss
    } else if total_profit > 0.0 {
        f64::INFINITY
    } else {
        0.0
    };
    // Denominator is the win count, even when a losing trade contributed
    // a positive ratio via its take-profit target
    let average_rr = if win_count > 0 {
        total_rr / win_count as f64
    } else {
        0.0
    };

    TradeAnalytics {
        total_trades,
        win_count,
        loss_count,
        win_rate,
        total_profit,
        total_loss,
        net_pnl,
        average_rr,
        profit_factor,
        largest_win,
        largest_loss,
        average_win,
        average_loss,
        successive_wins: max_successive_wins,
        successive_losses: max_successive_losses,
    }
}

/// Same summary, but over the trades sorted ascending by date, so the
/// streak counters measure true chronological runs.
pub fn calculate_analytics_by_date(trades: &[Trade]) -> TradeAnalytics {
    let mut sorted = trades.to_vec();
    sorted.sort_by_key(|t| t.date);
    calculate_analytics(&sorted)
}

/// Cumulative P&L series for charting, one point per trade, sorted
/// ascending by date. The running total is rounded to 2 decimals.
pub fn generate_pnl_chart_data(trades: &[Trade]) -> Vec<PnlChartPoint> {
    if trades.is_empty() {
        return Vec::new();
    }

    let mut sorted = trades.to_vec();
    sorted.sort_by_key(|t| t.date);

    let mut cumulative_pnl = 0.0;
    sorted
        .iter()
        .map(|trade| {
            let pnl = calculate_pnl(trade);
            cumulative_pnl += pnl;

            PnlChartPoint {
                date: trade.date.format("%Y-%m-%d").to_string(),
                pnl,
                cumulative_pnl: round2(cumulative_pnl),
            }
        })
        .collect()
}

// f64::round rounds half away from zero
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trade(direction: Direction, entry: f64, exit: f64, quantity: f64, fees: f64) -> Trade {
        dated_trade("2024-06-01", direction, entry, exit, quantity, fees)
    }

    fn dated_trade(
        date: &str,
        direction: Direction,
        entry: f64,
        exit: f64,
        quantity: f64,
        fees: f64,
    ) -> Trade {
        Trade {
            id: format!("TRADE-test-{}", date),
            date: format!("{}T12:00:00Z", date).parse().unwrap(),
            symbol: "BTCUSD".to_string(),
            direction,
            entry_price: entry,
            exit_price: exit,
            quantity,
            leverage: 1.0,
            stop_loss: 0.0,
            take_profit: 0.0,
            fees,
            notes: String::new(),
        }
    }

    #[test]
    fn test_pnl_long() {
        let t = trade(Direction::Long, 100.0, 110.0, 10.0, 2.5);
        assert_eq!(calculate_pnl(&t), 97.5);
    }

    #[test]
    fn test_pnl_short() {
        let t = trade(Direction::Short, 50.0, 60.0, 5.0, 0.0);
        assert_eq!(calculate_pnl(&t), -50.0);
    }

    #[test]
    fn test_pnl_antisymmetric_under_direction_swap() {
        let long = trade(Direction::Long, 100.0, 93.7, 4.0, 0.0);
        let short = trade(Direction::Short, 100.0, 93.7, 4.0, 0.0);
        assert_eq!(calculate_pnl(&long), -calculate_pnl(&short));
    }

    #[test]
    fn test_empty_trades_all_zero() {
        let analytics = calculate_analytics(&[]);
        assert_eq!(analytics.total_trades, 0);
        assert_eq!(analytics.win_rate, 0.0);
        assert_eq!(analytics.profit_factor, 0.0);
        assert_eq!(analytics.average_rr, 0.0);
        assert!(!analytics.win_rate.is_nan());
        assert_eq!(analytics, TradeAnalytics::default());
    }

    #[test]
    fn test_single_winning_trade() {
        let trades = vec![trade(Direction::Long, 100.0, 110.0, 10.0, 0.0)];
        let analytics = calculate_analytics(&trades);

        assert_eq!(analytics.total_trades, 1);
        assert_eq!(analytics.win_count, 1);
        assert_eq!(analytics.loss_count, 0);
        assert_eq!(analytics.win_rate, 100.0);
        assert_eq!(analytics.net_pnl, 100.0);
        assert_eq!(analytics.largest_win, 100.0);
        assert_eq!(analytics.average_win, 100.0);
        assert_eq!(analytics.average_loss, 0.0);
        assert!(analytics.profit_factor.is_infinite());
    }

    #[test]
    fn test_win_and_loss_mix() {
        let trades = vec![
            trade(Direction::Long, 100.0, 110.0, 10.0, 0.0), // +100
            trade(Direction::Short, 50.0, 60.0, 5.0, 0.0),   // -50
        ];
        let analytics = calculate_analytics(&trades);

        assert_eq!(analytics.win_count, 1);
        assert_eq!(analytics.loss_count, 1);
        assert_eq!(analytics.win_count + analytics.loss_count, analytics.total_trades);
        assert_eq!(analytics.win_rate, 50.0);
        assert_eq!(analytics.total_profit, 100.0);
        assert_eq!(analytics.total_loss, 50.0);
        assert_eq!(analytics.net_pnl, 50.0);
        assert_eq!(analytics.net_pnl, analytics.total_profit - analytics.total_loss);
        assert_eq!(analytics.profit_factor, 2.0);
        assert_eq!(analytics.successive_wins, 1);
        assert_eq!(analytics.successive_losses, 1);
    }

    #[test]
    fn test_zero_pnl_counts_as_loss() {
        let trades = vec![trade(Direction::Long, 100.0, 100.0, 10.0, 0.0)];
        let analytics = calculate_analytics(&trades);

        assert_eq!(analytics.win_count, 0);
        assert_eq!(analytics.loss_count, 1);
        assert_eq!(analytics.win_rate, 0.0);
        assert_eq!(analytics.total_loss, 0.0);
        assert_eq!(analytics.profit_factor, 0.0);
    }

    #[test]
    fn test_streaks_follow_input_order() {
        // win, win, loss, win in input order; dates deliberately shuffled
        let trades = vec![
            dated_trade("2024-03-04", Direction::Long, 100.0, 110.0, 1.0, 0.0),
            dated_trade("2024-03-01", Direction::Long, 100.0, 105.0, 1.0, 0.0),
            dated_trade("2024-03-03", Direction::Long, 100.0, 90.0, 1.0, 0.0),
            dated_trade("2024-03-02", Direction::Long, 100.0, 101.0, 1.0, 0.0),
        ];
        let analytics = calculate_analytics(&trades);

        assert_eq!(analytics.successive_wins, 2);
        assert_eq!(analytics.successive_losses, 1);
    }

    #[test]
    fn test_by_date_variant_sorts_before_counting_streaks() {
        // Input order win, loss, win; chronological order loss, win, win
        let trades = vec![
            dated_trade("2024-03-03", Direction::Long, 100.0, 110.0, 1.0, 0.0),
            dated_trade("2024-03-01", Direction::Long, 100.0, 90.0, 1.0, 0.0),
            dated_trade("2024-03-02", Direction::Long, 100.0, 105.0, 1.0, 0.0),
        ];

        assert_eq!(calculate_analytics(&trades).successive_wins, 1);
        assert_eq!(calculate_analytics_by_date(&trades).successive_wins, 2);
    }

    #[test]
    fn test_largest_loss_is_absolute() {
        let trades = vec![
            trade(Direction::Long, 100.0, 90.0, 1.0, 0.0),  // -10
            trade(Direction::Long, 100.0, 60.0, 1.0, 0.0),  // -40
        ];
        let analytics = calculate_analytics(&trades);

        assert_eq!(analytics.largest_loss, 40.0);
        assert_eq!(analytics.average_loss, 25.0);
        assert_eq!(analytics.largest_win, 0.0);
        assert_eq!(analytics.average_win, 0.0);
    }

    #[test]
    fn test_average_rr_divides_by_win_count() {
        // Winner: risk 50 (stop at 95), reward = realized 100 -> rr 2
        let mut winner = trade(Direction::Long, 100.0, 110.0, 10.0, 0.0);
        winner.stop_loss = 95.0;

        // Loser with a take-profit: risk 50, reward = target 200 -> rr 4,
        // still accumulated even though the trade lost
        let mut loser = trade(Direction::Long, 100.0, 90.0, 10.0, 0.0);
        loser.stop_loss = 95.0;
        loser.take_profit = 120.0;

        let analytics = calculate_analytics(&[winner, loser]);

        // (2 + 4) / 1 winner, not / 2 trades
        assert_eq!(analytics.average_rr, 6.0);
    }

    #[test]
    fn test_rr_zero_without_stop_loss() {
        // No stop -> risk 0 -> ratio never accumulates
        let mut winner = trade(Direction::Long, 100.0, 110.0, 10.0, 0.0);
        winner.take_profit = 120.0;

        let analytics = calculate_analytics(&[winner]);
        assert_eq!(analytics.average_rr, 0.0);
    }

    #[test]
    fn test_short_risk_sign_convention() {
        // Short with stop above entry: risk |105 - 100| * 10 = 50
        let mut t = trade(Direction::Short, 100.0, 90.0, 10.0, 0.0); // +100
        t.stop_loss = 105.0;

        let analytics = calculate_analytics(&[t]);
        assert_eq!(analytics.average_rr, 2.0);
    }

    #[test]
    fn test_chart_data_empty_input() {
        assert!(generate_pnl_chart_data(&[]).is_empty());
    }

    #[test]
    fn test_chart_data_sorts_by_date_and_accumulates() {
        // Fed newest-first; output must come back oldest-first
        let trades = vec![
            dated_trade("2024-01-02", Direction::Long, 100.0, 101.0, 10.0, 0.0), // +10
            dated_trade("2024-01-01", Direction::Long, 100.0, 99.5, 10.0, 0.0),  // -5
        ];
        let points = generate_pnl_chart_data(&trades);

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].date, "2024-01-01");
        assert_eq!(points[0].pnl, -5.0);
        assert_eq!(points[0].cumulative_pnl, -5.0);
        assert_eq!(points[1].date, "2024-01-02");
        assert_eq!(points[1].pnl, 10.0);
        assert_eq!(points[1].cumulative_pnl, 5.0);
    }

    #[test]
    fn test_chart_data_rounds_to_two_decimals() {
        let trades = vec![dated_trade(
            "2024-01-05",
            Direction::Long,
            100.0,
            103.33333,
            10.0,
            0.0,
        )];
        let points = generate_pnl_chart_data(&trades);

        assert_eq!(points[0].cumulative_pnl, 33.33);
    }

    #[test]
    fn test_fees_reduce_pnl_in_chart_and_summary() {
        let trades = vec![trade(Direction::Long, 100.0, 101.0, 10.0, 10.0)]; // gross +10, net 0
        let analytics = calculate_analytics(&trades);
        let points = generate_pnl_chart_data(&trades);

        assert_eq!(analytics.loss_count, 1); // net zero is a loss
        assert_eq!(points[0].pnl, 0.0);
    }
}
