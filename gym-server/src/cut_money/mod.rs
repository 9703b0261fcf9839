//! Money calculation for cash cuts using rust_decimal for precision
//!
//! All calculations are done using `Decimal` internally, then converted to
//! `f64` for storage/serialization. Base figures are normalized to minor
//! units (2 decimal places) before aggregation, so every derived total is an
//! exact sum and the stored record is internally consistent to the cent:
//!
//! - `{channel}_total` equals the sum of that channel's five method buckets
//! - `total_{method}` equals the sum of that method across the three channels
//! - `grand_total` equals both the sum of channel totals and the sum of
//!   method totals
//! - `final_balance` equals `grand_total - expenses_amount`, never clamped
//!
//! Malformed numeric input never errors here: non-finite values degrade to
//! zero so a reconciliation screen can always render. Negative figures pass
//! through unchanged - corrections and refunds are representable.

use rust_decimal::prelude::*;

use shared::models::{
    CashCut, CashCutUpdate, ChannelAmounts, ChannelTotals, DailyTotals, ExpenseDesync,
    PaymentMethod,
};

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for the expense desync check (0.01)
pub const EXPENSE_SYNC_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Convert f64 to Decimal for calculation. Non-finite input degrades to zero.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

/// Normalize an amount to minor units: non-finite degrades to zero, the
/// value is rounded half-up to 2 decimals. Negatives pass through.
#[inline]
fn norm(value: f64) -> Decimal {
    to_decimal(value).round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Normalize an amount for arithmetic. Idempotent: re-normalizing a
/// normalized value is a no-op.
#[inline]
pub fn normalize_amount(value: f64) -> f64 {
    to_f64(norm(value))
}

fn channel_total_dec(amounts: &ChannelAmounts) -> Decimal {
    norm(amounts.efectivo)
        + norm(amounts.transferencia)
        + norm(amounts.debito)
        + norm(amounts.credito)
        + norm(amounts.mixto)
}

/// Sum the five method buckets of one channel
pub fn channel_total(amounts: &ChannelAmounts) -> f64 {
    to_f64(channel_total_dec(amounts))
}

/// Grand total for one payment method across the three channels
pub fn method_grand_total(pos: f64, abonos: f64, membership: f64) -> f64 {
    to_f64(norm(pos) + norm(abonos) + norm(membership))
}

/// Grand total for the cut (sum of the three channel totals)
pub fn grand_total(pos_total: f64, abonos_total: f64, membership_total: f64) -> f64 {
    to_f64(norm(pos_total) + norm(abonos_total) + norm(membership_total))
}

/// Total commissions across the three channels
pub fn total_commissions(pos: f64, abonos: f64, membership: f64) -> f64 {
    to_f64(norm(pos) + norm(abonos) + norm(membership))
}

/// Net cash position for the day. May be negative when expenses exceed
/// intake; deliberately not clamped.
pub fn final_balance(grand_total: f64, expenses_amount: f64) -> f64 {
    to_f64(norm(grand_total) - norm(expenses_amount))
}

/// Whether a cut's recorded expense figure disagrees with the authoritative
/// daily expense sum beyond the tolerance. Strict comparison on the
/// un-rounded difference: a 0.01 gap is still in sync, 0.011 is not.
pub fn is_desynced(cut_expenses: f64, real_expenses: f64) -> bool {
    (to_decimal(cut_expenses) - to_decimal(real_expenses)).abs() > EXPENSE_SYNC_TOLERANCE
}

/// Advisory desync report for display: both figures plus the absolute
/// difference, or `None` when in sync. Never blocks editing or saving.
pub fn expense_desync(cut_expenses: f64, real_expenses: f64) -> Option<ExpenseDesync> {
    if !is_desynced(cut_expenses, real_expenses) {
        return None;
    }
    let difference = (to_decimal(cut_expenses) - to_decimal(real_expenses)).abs();
    Some(ExpenseDesync {
        cut_expenses: normalize_amount(cut_expenses),
        real_expenses: normalize_amount(real_expenses),
        difference: to_f64(difference),
    })
}

/// Recompute every derived field of a cut from its normalized base figures.
///
/// Derived fields on the input are ignored entirely - a loaded record whose
/// totals were tampered with or went stale self-heals on the next pass.
/// Status and metadata are left untouched.
pub fn recalculate(cut: &CashCut) -> CashCut {
    let pos = cut.pos_amounts();
    let abonos = cut.abonos_amounts();
    let membership = cut.membership_amounts();

    let pos_total = channel_total_dec(&pos);
    let abonos_total = channel_total_dec(&abonos);
    let membership_total = channel_total_dec(&membership);

    let total_efectivo = norm(pos.efectivo) + norm(abonos.efectivo) + norm(membership.efectivo);
    let total_transferencia =
        norm(pos.transferencia) + norm(abonos.transferencia) + norm(membership.transferencia);
    let total_debito = norm(pos.debito) + norm(abonos.debito) + norm(membership.debito);
    let total_credito = norm(pos.credito) + norm(abonos.credito) + norm(membership.credito);
    let total_mixto = norm(pos.mixto) + norm(abonos.mixto) + norm(membership.mixto);

    let pos_commissions = norm(cut.pos_commissions);
    let abonos_commissions = norm(cut.abonos_commissions);
    let membership_commissions = norm(cut.membership_commissions);

    let expenses_amount = norm(cut.expenses_amount);
    let grand_total = pos_total + abonos_total + membership_total;
    let final_balance = grand_total - expenses_amount;

    CashCut {
        pos_efectivo: to_f64(norm(pos.efectivo)),
        pos_transferencia: to_f64(norm(pos.transferencia)),
        pos_debito: to_f64(norm(pos.debito)),
        pos_credito: to_f64(norm(pos.credito)),
        pos_mixto: to_f64(norm(pos.mixto)),
        pos_total: to_f64(pos_total),

        abonos_efectivo: to_f64(norm(abonos.efectivo)),
        abonos_transferencia: to_f64(norm(abonos.transferencia)),
        abonos_debito: to_f64(norm(abonos.debito)),
        abonos_credito: to_f64(norm(abonos.credito)),
        abonos_mixto: to_f64(norm(abonos.mixto)),
        abonos_total: to_f64(abonos_total),

        membership_efectivo: to_f64(norm(membership.efectivo)),
        membership_transferencia: to_f64(norm(membership.transferencia)),
        membership_debito: to_f64(norm(membership.debito)),
        membership_credito: to_f64(norm(membership.credito)),
        membership_mixto: to_f64(norm(membership.mixto)),
        membership_total: to_f64(membership_total),

        total_efectivo: to_f64(total_efectivo),
        total_transferencia: to_f64(total_transferencia),
        total_debito: to_f64(total_debito),
        total_credito: to_f64(total_credito),
        total_mixto: to_f64(total_mixto),

        total_transactions: cut.pos_transactions
            + cut.abonos_transactions
            + cut.membership_transactions,
        pos_commissions: to_f64(pos_commissions),
        abonos_commissions: to_f64(abonos_commissions),
        membership_commissions: to_f64(membership_commissions),
        total_commissions: to_f64(pos_commissions + abonos_commissions + membership_commissions),

        grand_total: to_f64(grand_total),
        expenses_amount: to_f64(expenses_amount),
        final_balance: to_f64(final_balance),
        net_amount: to_f64(final_balance),

        ..cut.clone()
    }
}

/// Build the canonical persistable field set for an edited cut.
///
/// Re-runs the full recalculation on every base field, then emits every
/// derived field - mixto buckets always present, `net_amount` aliasing
/// `final_balance`. This is the only path by which an edited cut reaches
/// the persistence boundary.
pub fn build_update_payload(cut: &CashCut) -> CashCutUpdate {
    let r = recalculate(cut);

    CashCutUpdate {
        notes: r.notes.clone(),
        status: r.status,
        expenses_amount: r.expenses_amount,

        pos_efectivo: r.pos_efectivo,
        pos_transferencia: r.pos_transferencia,
        pos_debito: r.pos_debito,
        pos_credito: r.pos_credito,
        pos_mixto: r.pos_mixto,
        pos_total: r.pos_total,
        pos_transactions: r.pos_transactions,
        pos_commissions: r.pos_commissions,

        abonos_efectivo: r.abonos_efectivo,
        abonos_transferencia: r.abonos_transferencia,
        abonos_debito: r.abonos_debito,
        abonos_credito: r.abonos_credito,
        abonos_mixto: r.abonos_mixto,
        abonos_total: r.abonos_total,
        abonos_transactions: r.abonos_transactions,
        abonos_commissions: r.abonos_commissions,

        membership_efectivo: r.membership_efectivo,
        membership_transferencia: r.membership_transferencia,
        membership_debito: r.membership_debito,
        membership_credito: r.membership_credito,
        membership_mixto: r.membership_mixto,
        membership_total: r.membership_total,
        membership_transactions: r.membership_transactions,
        membership_commissions: r.membership_commissions,

        total_efectivo: r.total_efectivo,
        total_transferencia: r.total_transferencia,
        total_debito: r.total_debito,
        total_credito: r.total_credito,
        total_mixto: r.total_mixto,
        total_transactions: r.total_transactions,
        total_commissions: r.total_commissions,
        grand_total: r.grand_total,
        final_balance: r.final_balance,
        net_amount: r.net_amount,
    }
}

/// Cross-channel totals for a day's derived figures.
pub fn daily_totals(
    pos: &ChannelTotals,
    abonos: &ChannelTotals,
    memberships: &ChannelTotals,
) -> DailyTotals {
    let efectivo = norm(pos.efectivo) + norm(abonos.efectivo) + norm(memberships.efectivo);
    let transferencia =
        norm(pos.transferencia) + norm(abonos.transferencia) + norm(memberships.transferencia);
    let debito = norm(pos.debito) + norm(abonos.debito) + norm(memberships.debito);
    let credito = norm(pos.credito) + norm(abonos.credito) + norm(memberships.credito);
    let mixto = norm(pos.mixto) + norm(abonos.mixto) + norm(memberships.mixto);
    let total = norm(pos.total) + norm(abonos.total) + norm(memberships.total);
    let commissions =
        norm(pos.commissions) + norm(abonos.commissions) + norm(memberships.commissions);

    DailyTotals {
        efectivo: to_f64(efectivo),
        transferencia: to_f64(transferencia),
        debito: to_f64(debito),
        credito: to_f64(credito),
        mixto: to_f64(mixto),
        total: to_f64(total),
        transactions: pos.transactions + abonos.transactions + memberships.transactions,
        commissions: to_f64(commissions),
        net_amount: to_f64(total - commissions),
    }
}

/// Accumulates one channel's payment rows into per-method buckets.
///
/// Card commissions ride on top of the recorded amount, so the gross figure
/// (amount + commission) lands in the method bucket; commissions are tallied
/// separately by the caller through [`add_commission`](Self::add_commission).
/// Unknown payment methods fold into efectivo.
#[derive(Debug, Default)]
pub struct ChannelAccumulator {
    efectivo: Decimal,
    transferencia: Decimal,
    debito: Decimal,
    credito: Decimal,
    mixto: Decimal,
    commissions: Decimal,
    transactions: i64,
}

impl ChannelAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    fn bucket(&mut self, method: &str) -> &mut Decimal {
        match PaymentMethod::from_str(method) {
            PaymentMethod::Efectivo => &mut self.efectivo,
            PaymentMethod::Transferencia => &mut self.transferencia,
            PaymentMethod::Debito => &mut self.debito,
            PaymentMethod::Credito => &mut self.credito,
            PaymentMethod::Mixto => &mut self.mixto,
        }
    }

    /// Add a payment detail: gross (amount + commission) into its bucket.
    pub fn add_gross(&mut self, method: &str, amount: f64, commission: f64) {
        *self.bucket(method) += norm(amount) + norm(commission);
    }

    /// Add a whole-record amount with no commission component.
    pub fn add_flat(&mut self, method: &str, amount: f64) {
        *self.bucket(method) += norm(amount);
    }

    /// Tally a commission figure for the channel.
    pub fn add_commission(&mut self, commission: f64) {
        self.commissions += norm(commission);
    }

    /// Count one transaction.
    pub fn count_transaction(&mut self) {
        self.transactions += 1;
    }

    /// Override the transaction count (e.g. distinct-sale counting for
    /// layaway deposits).
    pub fn set_transactions(&mut self, n: i64) {
        self.transactions = n;
    }

    /// Finish the channel: total is the exact sum of the buckets.
    pub fn finish(self) -> ChannelTotals {
        let total = self.efectivo + self.transferencia + self.debito + self.credito + self.mixto;
        ChannelTotals {
            efectivo: to_f64(self.efectivo),
            transferencia: to_f64(self.transferencia),
            debito: to_f64(self.debito),
            credito: to_f64(self.credito),
            mixto: to_f64(self.mixto),
            total: to_f64(total),
            transactions: self.transactions,
            commissions: to_f64(self.commissions),
        }
    }
}

#[cfg(test)]
mod tests;
