//! Cash Cut Model (corte de caja)
//!
//! One cash-drawer reconciliation per calendar day. Base figures are the
//! five payment-method buckets per revenue channel plus transaction counts
//! and commissions; every derived field (channel totals, method totals,
//! grand total, final balance) is recomputed by the reconciliation engine
//! before a record is persisted, never trusted from the caller.

use serde::{Deserialize, Serialize};

use super::serde_helpers;

/// Cut lifecycle status.
///
/// `open → edited` on any manual change; `open/edited → closed` on explicit
/// close. A closed cut is never reopened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum CutStatus {
    Open,
    Closed,
    Edited,
}

impl Default for CutStatus {
    fn default() -> Self {
        Self::Open
    }
}

impl CutStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Edited => "edited",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "closed" => Self::Closed,
            "edited" => Self::Edited,
            _ => Self::Open,
        }
    }

    /// Whether a status change is allowed. The only forbidden transition is
    /// reopening a closed cut.
    pub fn can_transition(self, to: CutStatus) -> bool {
        !(self == Self::Closed && to == Self::Open)
    }
}

/// Payment method (payment instrument) for a money movement.
///
/// Unknown method strings fold into cash, mirroring how drawer counts have
/// always been reconciled when a record arrives without a usable method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Efectivo,
    Transferencia,
    Debito,
    Credito,
    Mixto,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Efectivo => "efectivo",
            Self::Transferencia => "transferencia",
            Self::Debito => "debito",
            Self::Credito => "credito",
            Self::Mixto => "mixto",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "transferencia" => Self::Transferencia,
            "debito" => Self::Debito,
            "credito" => Self::Credito,
            "mixto" => Self::Mixto,
            _ => Self::Efectivo,
        }
    }
}

/// The five method buckets of a single revenue channel.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ChannelAmounts {
    pub efectivo: f64,
    pub transferencia: f64,
    pub debito: f64,
    pub credito: f64,
    pub mixto: f64,
}

/// Cash cut record - one reconciliation for one calendar day.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CashCut {
    pub id: i64,
    /// Human-readable sequence, e.g. `CORTE-20260805-1754436000000`
    pub cut_number: String,
    /// Calendar day (YYYY-MM-DD), unique per cut
    pub cut_date: String,
    pub status: CutStatus,
    /// Operator-entered figures vs system-derived from the day's transactions
    #[serde(default)]
    pub is_manual: bool,

    // === POS channel ===
    #[serde(default)]
    pub pos_efectivo: f64,
    #[serde(default)]
    pub pos_transferencia: f64,
    #[serde(default)]
    pub pos_debito: f64,
    #[serde(default)]
    pub pos_credito: f64,
    #[serde(default)]
    pub pos_mixto: f64,
    #[serde(default)]
    pub pos_total: f64,
    #[serde(default)]
    pub pos_transactions: i64,
    #[serde(default)]
    pub pos_commissions: f64,

    // === Abonos channel (layaway deposits) ===
    #[serde(default)]
    pub abonos_efectivo: f64,
    #[serde(default)]
    pub abonos_transferencia: f64,
    #[serde(default)]
    pub abonos_debito: f64,
    #[serde(default)]
    pub abonos_credito: f64,
    #[serde(default)]
    pub abonos_mixto: f64,
    #[serde(default)]
    pub abonos_total: f64,
    #[serde(default)]
    pub abonos_transactions: i64,
    #[serde(default)]
    pub abonos_commissions: f64,

    // === Membership channel ===
    #[serde(default)]
    pub membership_efectivo: f64,
    #[serde(default)]
    pub membership_transferencia: f64,
    #[serde(default)]
    pub membership_debito: f64,
    #[serde(default)]
    pub membership_credito: f64,
    #[serde(default)]
    pub membership_mixto: f64,
    #[serde(default)]
    pub membership_total: f64,
    #[serde(default)]
    pub membership_transactions: i64,
    #[serde(default)]
    pub membership_commissions: f64,

    // === Per-method grand totals ===
    #[serde(default)]
    pub total_efectivo: f64,
    #[serde(default)]
    pub total_transferencia: f64,
    #[serde(default)]
    pub total_debito: f64,
    #[serde(default)]
    pub total_credito: f64,
    #[serde(default)]
    pub total_mixto: f64,

    // === Aggregates ===
    #[serde(default)]
    pub total_transactions: i64,
    #[serde(default)]
    pub total_commissions: f64,
    #[serde(default)]
    pub grand_total: f64,
    /// Day's recorded expenses (overridable from the expense ledger)
    #[serde(default)]
    pub expenses_amount: f64,
    /// grand_total - expenses_amount; may be negative
    #[serde(default)]
    pub final_balance: f64,
    /// Alias of final_balance kept in the persisted shape
    #[serde(default)]
    pub net_amount: f64,

    // === Metadata ===
    pub notes: Option<String>,
    pub created_by: Option<i64>,
    pub closed_by: Option<i64>,
    /// Unix millis
    pub closed_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,

    /// Denormalized creator display name (populated by a join on read)
    #[serde(default)]
    pub creator_name: Option<String>,
}

impl CashCut {
    pub fn pos_amounts(&self) -> ChannelAmounts {
        ChannelAmounts {
            efectivo: self.pos_efectivo,
            transferencia: self.pos_transferencia,
            debito: self.pos_debito,
            credito: self.pos_credito,
            mixto: self.pos_mixto,
        }
    }

    pub fn abonos_amounts(&self) -> ChannelAmounts {
        ChannelAmounts {
            efectivo: self.abonos_efectivo,
            transferencia: self.abonos_transferencia,
            debito: self.abonos_debito,
            credito: self.abonos_credito,
            mixto: self.abonos_mixto,
        }
    }

    pub fn membership_amounts(&self) -> ChannelAmounts {
        ChannelAmounts {
            efectivo: self.membership_efectivo,
            transferencia: self.membership_transferencia,
            debito: self.membership_debito,
            credito: self.membership_credito,
            mixto: self.membership_mixto,
        }
    }
}

/// Create cut payload. Only base figures are accepted; every derived field
/// is recomputed server-side. Numeric fields tolerate strings/null/missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashCutCreate {
    /// Calendar day (YYYY-MM-DD)
    pub cut_date: String,
    pub notes: Option<String>,
    #[serde(default)]
    pub is_manual: bool,
    /// Explicit status; defaults to `closed` (a registered cut settles the day)
    pub status: Option<CutStatus>,
    /// Creating operator; falls back to the default admin when absent
    pub created_by: Option<i64>,

    // POS
    #[serde(default, deserialize_with = "serde_helpers::lenient_amount")]
    pub pos_efectivo: f64,
    #[serde(default, deserialize_with = "serde_helpers::lenient_amount")]
    pub pos_transferencia: f64,
    #[serde(default, deserialize_with = "serde_helpers::lenient_amount")]
    pub pos_debito: f64,
    #[serde(default, deserialize_with = "serde_helpers::lenient_amount")]
    pub pos_credito: f64,
    #[serde(default, deserialize_with = "serde_helpers::lenient_amount")]
    pub pos_mixto: f64,
    #[serde(default, deserialize_with = "serde_helpers::lenient_count")]
    pub pos_transactions: i64,
    #[serde(default, deserialize_with = "serde_helpers::lenient_amount")]
    pub pos_commissions: f64,

    // Abonos
    #[serde(default, deserialize_with = "serde_helpers::lenient_amount")]
    pub abonos_efectivo: f64,
    #[serde(default, deserialize_with = "serde_helpers::lenient_amount")]
    pub abonos_transferencia: f64,
    #[serde(default, deserialize_with = "serde_helpers::lenient_amount")]
    pub abonos_debito: f64,
    #[serde(default, deserialize_with = "serde_helpers::lenient_amount")]
    pub abonos_credito: f64,
    #[serde(default, deserialize_with = "serde_helpers::lenient_amount")]
    pub abonos_mixto: f64,
    #[serde(default, deserialize_with = "serde_helpers::lenient_count")]
    pub abonos_transactions: i64,
    #[serde(default, deserialize_with = "serde_helpers::lenient_amount")]
    pub abonos_commissions: f64,

    // Membership
    #[serde(default, deserialize_with = "serde_helpers::lenient_amount")]
    pub membership_efectivo: f64,
    #[serde(default, deserialize_with = "serde_helpers::lenient_amount")]
    pub membership_transferencia: f64,
    #[serde(default, deserialize_with = "serde_helpers::lenient_amount")]
    pub membership_debito: f64,
    #[serde(default, deserialize_with = "serde_helpers::lenient_amount")]
    pub membership_credito: f64,
    #[serde(default, deserialize_with = "serde_helpers::lenient_amount")]
    pub membership_mixto: f64,
    #[serde(default, deserialize_with = "serde_helpers::lenient_count")]
    pub membership_transactions: i64,
    #[serde(default, deserialize_with = "serde_helpers::lenient_amount")]
    pub membership_commissions: f64,

    #[serde(default, deserialize_with = "serde_helpers::lenient_amount")]
    pub expenses_amount: f64,
}

/// Partial edit payload. `None` means "leave unchanged"; present values are
/// coerced leniently, so a malformed figure edits the field to zero rather
/// than failing the save.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CutEditRequest {
    pub notes: Option<String>,
    pub status: Option<CutStatus>,

    #[serde(default, deserialize_with = "serde_helpers::lenient_opt_amount")]
    pub pos_efectivo: Option<f64>,
    #[serde(default, deserialize_with = "serde_helpers::lenient_opt_amount")]
    pub pos_transferencia: Option<f64>,
    #[serde(default, deserialize_with = "serde_helpers::lenient_opt_amount")]
    pub pos_debito: Option<f64>,
    #[serde(default, deserialize_with = "serde_helpers::lenient_opt_amount")]
    pub pos_credito: Option<f64>,
    #[serde(default, deserialize_with = "serde_helpers::lenient_opt_amount")]
    pub pos_mixto: Option<f64>,
    #[serde(default, deserialize_with = "serde_helpers::lenient_opt_count")]
    pub pos_transactions: Option<i64>,
    #[serde(default, deserialize_with = "serde_helpers::lenient_opt_amount")]
    pub pos_commissions: Option<f64>,

    #[serde(default, deserialize_with = "serde_helpers::lenient_opt_amount")]
    pub abonos_efectivo: Option<f64>,
    #[serde(default, deserialize_with = "serde_helpers::lenient_opt_amount")]
    pub abonos_transferencia: Option<f64>,
    #[serde(default, deserialize_with = "serde_helpers::lenient_opt_amount")]
    pub abonos_debito: Option<f64>,
    #[serde(default, deserialize_with = "serde_helpers::lenient_opt_amount")]
    pub abonos_credito: Option<f64>,
    #[serde(default, deserialize_with = "serde_helpers::lenient_opt_amount")]
    pub abonos_mixto: Option<f64>,
    #[serde(default, deserialize_with = "serde_helpers::lenient_opt_count")]
    pub abonos_transactions: Option<i64>,
    #[serde(default, deserialize_with = "serde_helpers::lenient_opt_amount")]
    pub abonos_commissions: Option<f64>,

    #[serde(default, deserialize_with = "serde_helpers::lenient_opt_amount")]
    pub membership_efectivo: Option<f64>,
    #[serde(default, deserialize_with = "serde_helpers::lenient_opt_amount")]
    pub membership_transferencia: Option<f64>,
    #[serde(default, deserialize_with = "serde_helpers::lenient_opt_amount")]
    pub membership_debito: Option<f64>,
    #[serde(default, deserialize_with = "serde_helpers::lenient_opt_amount")]
    pub membership_credito: Option<f64>,
    #[serde(default, deserialize_with = "serde_helpers::lenient_opt_amount")]
    pub membership_mixto: Option<f64>,
    #[serde(default, deserialize_with = "serde_helpers::lenient_opt_count")]
    pub membership_transactions: Option<i64>,
    #[serde(default, deserialize_with = "serde_helpers::lenient_opt_amount")]
    pub membership_commissions: Option<f64>,

    #[serde(default, deserialize_with = "serde_helpers::lenient_opt_amount")]
    pub expenses_amount: Option<f64>,
}

/// Canonical persistable field set for an edited cut. Always complete:
/// every derived field is present (mixto buckets included), so a stored
/// record can never carry totals that are stale relative to its line items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashCutUpdate {
    pub notes: Option<String>,
    pub status: CutStatus,
    pub expenses_amount: f64,

    pub pos_efectivo: f64,
    pub pos_transferencia: f64,
    pub pos_debito: f64,
    pub pos_credito: f64,
    pub pos_mixto: f64,
    pub pos_total: f64,
    pub pos_transactions: i64,
    pub pos_commissions: f64,

    pub abonos_efectivo: f64,
    pub abonos_transferencia: f64,
    pub abonos_debito: f64,
    pub abonos_credito: f64,
    pub abonos_mixto: f64,
    pub abonos_total: f64,
    pub abonos_transactions: i64,
    pub abonos_commissions: f64,

    pub membership_efectivo: f64,
    pub membership_transferencia: f64,
    pub membership_debito: f64,
    pub membership_credito: f64,
    pub membership_mixto: f64,
    pub membership_total: f64,
    pub membership_transactions: i64,
    pub membership_commissions: f64,

    pub total_efectivo: f64,
    pub total_transferencia: f64,
    pub total_debito: f64,
    pub total_credito: f64,
    pub total_mixto: f64,
    pub total_transactions: i64,
    pub total_commissions: f64,
    pub grand_total: f64,
    pub final_balance: f64,
    pub net_amount: f64,
}

/// Advisory flag: the cut's recorded expense figure disagrees with the
/// independently tallied expense ledger for the same date.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ExpenseDesync {
    pub cut_expenses: f64,
    pub real_expenses: f64,
    pub difference: f64,
}

/// Aggregate statistics over the cut history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CutStats {
    pub total_cuts: i64,
    pub total_amount: f64,
    pub avg_amount: f64,
    pub manual_cuts: i64,
    pub automatic_cuts: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_strings() {
        for s in [CutStatus::Open, CutStatus::Closed, CutStatus::Edited] {
            assert_eq!(CutStatus::from_str(s.as_str()), s);
        }
        assert_eq!(CutStatus::from_str("garbage"), CutStatus::Open);
    }

    #[test]
    fn closed_cuts_cannot_reopen() {
        assert!(!CutStatus::Closed.can_transition(CutStatus::Open));
        assert!(CutStatus::Closed.can_transition(CutStatus::Edited));
        assert!(CutStatus::Open.can_transition(CutStatus::Closed));
        assert!(CutStatus::Edited.can_transition(CutStatus::Closed));
    }

    #[test]
    fn unknown_payment_method_folds_into_cash() {
        assert_eq!(PaymentMethod::from_str("EFECTIVO"), PaymentMethod::Efectivo);
        assert_eq!(PaymentMethod::from_str("tarjeta"), PaymentMethod::Efectivo);
        assert_eq!(PaymentMethod::from_str("debito"), PaymentMethod::Debito);
    }

    #[test]
    fn create_payload_tolerates_partial_json() {
        let create: CashCutCreate = serde_json::from_str(
            r#"{"cut_date": "2026-08-05", "pos_efectivo": "1500.50", "pos_transactions": "12"}"#,
        )
        .unwrap();
        assert_eq!(create.pos_efectivo, 1500.5);
        assert_eq!(create.pos_transactions, 12);
        assert_eq!(create.abonos_credito, 0.0);
        assert!(!create.is_manual);
    }
}
