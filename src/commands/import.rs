use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::analytics::calculate_pnl;
use crate::commands::trades::validate_create;
use crate::error::{Error, Result};
use crate::models::{CreateTradeInput, Direction, Trade};
use crate::store::TradeStore;

/// One CSV row of the journal interchange format. Field order doubles as
/// the exported header order.
#[derive(Debug, Serialize, Deserialize)]
struct CsvTradeRecord {
    date: DateTime<Utc>,
    symbol: String,
    direction: Direction,
    entry_price: f64,
    exit_price: f64,
    quantity: f64,
    leverage: f64,
    stop_loss: f64,
    take_profit: f64,
    fees: f64,
    #[serde(default)]
    notes: String,
}

impl From<&Trade> for CsvTradeRecord {
    fn from(trade: &Trade) -> Self {
        CsvTradeRecord {
            date: trade.date,
            symbol: trade.symbol.clone(),
            direction: trade.direction,
            entry_price: trade.entry_price,
            exit_price: trade.exit_price,
            quantity: trade.quantity,
            leverage: trade.leverage,
            stop_loss: trade.stop_loss,
            take_profit: trade.take_profit,
            fees: trade.fees,
            notes: trade.notes.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportPreview {
    pub date: String,
    pub symbol: String,
    pub direction: Direction,
    pub entry_price: f64,
    pub exit_price: f64,
    pub quantity: f64,
    pub pnl: f64,
    pub fingerprint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResult {
    pub imported: usize,
    pub duplicates: usize,
    pub errors: Vec<String>,
}

/// Parse CSV content and return a preview of the trades it holds,
/// without touching the store. Rows that fail to parse are skipped here;
/// the import itself reports them.
pub fn preview_csv_import(csv_content: &str) -> Result<Vec<ImportPreview>> {
    let mut previews = Vec::new();
    let mut reader = csv::Reader::from_reader(csv_content.as_bytes());

    for record in reader.deserialize::<CsvTradeRecord>() {
        let Ok(record) = record else {
            continue;
        };
        let trade = record.into_unsaved_trade();
        let fingerprint = csv_fingerprint(
            &trade.symbol,
            trade.direction,
            trade.entry_price,
            trade.exit_price,
            trade.quantity,
            trade.date,
        );
        previews.push(ImportPreview {
            date: trade.date.format("%Y-%m-%d").to_string(),
            // Per-row P&L for display in the preview table
            pnl: calculate_pnl(&trade),
            symbol: trade.symbol,
            direction: trade.direction,
            entry_price: trade.entry_price,
            exit_price: trade.exit_price,
            quantity: trade.quantity,
            fingerprint,
        });
    }

    Ok(previews)
}

/// Import CSV trades into the store. Rows already present (by
/// fingerprint) are counted as duplicates; malformed or invalid rows are
/// collected into the result instead of aborting the whole import.
pub fn import_csv(store: &TradeStore, csv_content: &str) -> Result<ImportResult> {
    let mut imported = 0;
    let mut duplicates = 0;
    let mut errors = Vec::new();

    let mut seen: HashSet<String> = store
        .snapshot()?
        .iter()
        .map(|t| {
            csv_fingerprint(
                &t.symbol,
                t.direction,
                t.entry_price,
                t.exit_price,
                t.quantity,
                t.date,
            )
        })
        .collect();

    let mut reader = csv::Reader::from_reader(csv_content.as_bytes());
    for (row, record) in reader.deserialize::<CsvTradeRecord>().enumerate() {
        let line = row + 2; // header is line 1
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                errors.push(format!("Line {}: {}", line, e));
                continue;
            }
        };

        let input = record.into_trade_input();
        if let Err(e) = validate_create(&input) {
            errors.push(format!("Line {}: {}", line, e));
            continue;
        }

        let fingerprint = csv_fingerprint(
            &input.symbol,
            input.direction,
            input.entry_price,
            input.exit_price,
            input.quantity,
            input.date,
        );
        if !seen.insert(fingerprint) {
            duplicates += 1;
            continue;
        }

        store.add(input)?;
        imported += 1;
    }

    log::info!(
        "CSV import complete: {} imported, {} duplicates, {} errors",
        imported,
        duplicates,
        errors.len()
    );

    Ok(ImportResult {
        imported,
        duplicates,
        errors,
    })
}

/// Export the full journal as CSV, newest trade first.
pub fn export_csv(store: &TradeStore) -> Result<String> {
    let trades = store.list(None)?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    for trade in &trades {
        writer.serialize(CsvTradeRecord::from(trade))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Csv(csv::Error::from(e.into_error())))?;

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Versioned JSON backup of the whole journal.
#[derive(Debug, Serialize, Deserialize)]
pub struct BackupData {
    pub exported_at: DateTime<Utc>,
    pub trades: Vec<Trade>,
}

pub fn export_all_data(store: &TradeStore) -> Result<String> {
    let backup = BackupData {
        exported_at: Utc::now(),
        trades: store.snapshot()?,
    };
    Ok(serde_json::to_string_pretty(&backup)?)
}

/// Restore a JSON backup. Trades with matching ids are replaced, the
/// rest are appended. Returns how many trades the backup carried.
pub fn import_all_data(store: &TradeStore, json_data: &str) -> Result<usize> {
    let backup: BackupData = serde_json::from_str(json_data)?;

    let count = backup.trades.len();
    for trade in backup.trades {
        store.upsert(trade)?;
    }

    log::info!("Restored {} trades from backup", count);
    Ok(count)
}

impl CsvTradeRecord {
    /// Trade with no id yet, for previewing before anything is stored.
    fn into_unsaved_trade(self) -> Trade {
        Trade {
            id: String::new(),
            date: self.date,
            symbol: self.symbol,
            direction: self.direction,
            entry_price: self.entry_price,
            exit_price: self.exit_price,
            quantity: self.quantity,
            leverage: self.leverage,
            stop_loss: self.stop_loss,
            take_profit: self.take_profit,
            fees: self.fees,
            notes: self.notes,
        }
    }

    fn into_trade_input(self) -> CreateTradeInput {
        CreateTradeInput {
            date: self.date,
            symbol: self.symbol,
            direction: self.direction,
            entry_price: self.entry_price,
            exit_price: self.exit_price,
            quantity: self.quantity,
            leverage: self.leverage,
            stop_loss: self.stop_loss,
            take_profit: self.take_profit,
            fees: self.fees,
            notes: self.notes,
        }
    }
}

/// Dedup key: same instrument, direction, prices, size and timestamp
/// means the same fill regardless of which file it came from.
fn csv_fingerprint(
    symbol: &str,
    direction: Direction,
    entry: f64,
    exit: f64,
    quantity: f64,
    date: DateTime<Utc>,
) -> String {
    format!(
        "csv|{}|{}|{:.8}|{:.8}|{:.8}|{}",
        symbol.to_lowercase(),
        direction.as_str(),
        entry,
        exit,
        quantity,
        date.timestamp()
    )
}
