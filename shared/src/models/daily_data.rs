//! Daily channel aggregation (the engine's input boundary)
//!
//! Per-date money movement grouped by revenue channel, derived from the
//! transactional tables: completed point-of-sale sales, layaway deposit
//! payments (abonos), and membership sales.

use serde::{Deserialize, Serialize};

/// Aggregated figures for one revenue channel on one date.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelTotals {
    #[serde(default)]
    pub efectivo: f64,
    #[serde(default)]
    pub transferencia: f64,
    #[serde(default)]
    pub debito: f64,
    #[serde(default)]
    pub credito: f64,
    #[serde(default)]
    pub mixto: f64,
    /// Sum of the five method buckets
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub transactions: i64,
    #[serde(default)]
    pub commissions: f64,
}

/// Cross-channel totals for the day.
///
/// `net_amount` here is gross minus commissions (what the house keeps of the
/// day's intake) - distinct from a cut's `net_amount`, which aliases its
/// final balance after expenses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyTotals {
    pub efectivo: f64,
    pub transferencia: f64,
    pub debito: f64,
    pub credito: f64,
    pub mixto: f64,
    pub total: f64,
    pub transactions: i64,
    pub commissions: f64,
    pub net_amount: f64,
}

/// The full per-date aggregation object served to the cut-creation flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyData {
    /// Calendar day (YYYY-MM-DD)
    pub date: String,
    pub pos: ChannelTotals,
    pub abonos: ChannelTotals,
    pub memberships: ChannelTotals,
    pub totals: DailyTotals,
}
