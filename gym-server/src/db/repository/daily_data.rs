//! Daily Channel Aggregation
//!
//! Derives the per-date channel figures (pos, abonos, memberships) from the
//! transactional tables. Row bucketing and decimal arithmetic live in
//! [`cut_money::ChannelAccumulator`]; this module only issues the queries
//! and feeds rows through.

use std::collections::HashMap;

use sqlx::SqlitePool;

use shared::models::{ChannelTotals, DailyData};

use crate::cut_money::{self, ChannelAccumulator};

use super::RepoResult;

#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    payment_method: Option<String>,
    amount: f64,
    commission_amount: f64,
}

#[derive(Debug, sqlx::FromRow)]
struct MembershipRow {
    id: i64,
    amount_paid: f64,
    payment_method: Option<String>,
    commission_amount: f64,
}

#[derive(Debug, sqlx::FromRow)]
struct MembershipPaymentRow {
    membership_id: i64,
    payment_method: Option<String>,
    amount: f64,
    commission_amount: f64,
}

/// Completed point-of-sale sales: full (non-partial) payments, bucketed by
/// method with the commission riding on top of the recorded amount.
async fn pos_channel(
    pool: &SqlitePool,
    start_millis: i64,
    end_millis: i64,
) -> RepoResult<ChannelTotals> {
    let mut acc = ChannelAccumulator::new();

    let sales_count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sales \
         WHERE sale_type = 'sale' AND status = 'completed' \
         AND created_at >= ? AND created_at < ?",
    )
    .bind(start_millis)
    .bind(end_millis)
    .fetch_one(pool)
    .await?;
    acc.set_transactions(sales_count);

    let payments = sqlx::query_as::<_, PaymentRow>(
        "SELECT p.payment_method, p.amount, p.commission_amount \
         FROM sale_payments p \
         JOIN sales s ON s.id = p.sale_id \
         WHERE p.is_partial_payment = 0 \
         AND s.sale_type = 'sale' AND s.status = 'completed' \
         AND s.created_at >= ? AND s.created_at < ?",
    )
    .bind(start_millis)
    .bind(end_millis)
    .fetch_all(pool)
    .await?;

    for p in payments {
        acc.add_gross(
            p.payment_method.as_deref().unwrap_or(""),
            p.amount,
            p.commission_amount,
        );
        acc.add_commission(p.commission_amount);
    }

    Ok(acc.finish())
}

/// Layaway deposit payments (abonos), bucketed by the date the deposit was
/// taken. Transactions count distinct layaways, not individual deposits.
async fn abonos_channel(
    pool: &SqlitePool,
    start_millis: i64,
    end_millis: i64,
) -> RepoResult<ChannelTotals> {
    let mut acc = ChannelAccumulator::new();

    let distinct_sales: i64 = sqlx::query_scalar(
        "SELECT COUNT(DISTINCT sale_id) FROM sale_payments \
         WHERE is_partial_payment = 1 AND payment_date >= ? AND payment_date < ?",
    )
    .bind(start_millis)
    .bind(end_millis)
    .fetch_one(pool)
    .await?;
    acc.set_transactions(distinct_sales);

    let payments = sqlx::query_as::<_, PaymentRow>(
        "SELECT payment_method, amount, commission_amount FROM sale_payments \
         WHERE is_partial_payment = 1 AND payment_date >= ? AND payment_date < ?",
    )
    .bind(start_millis)
    .bind(end_millis)
    .fetch_all(pool)
    .await?;

    for p in payments {
        acc.add_gross(
            p.payment_method.as_deref().unwrap_or(""),
            p.amount,
            p.commission_amount,
        );
        acc.add_commission(p.commission_amount);
    }

    Ok(acc.finish())
}

/// Membership sales. Detail rows carry the per-method breakdown; a
/// membership without detail rows falls back to its own payment_method for
/// the whole amount_paid.
async fn membership_channel(
    pool: &SqlitePool,
    start_millis: i64,
    end_millis: i64,
) -> RepoResult<ChannelTotals> {
    let mut acc = ChannelAccumulator::new();

    let memberships = sqlx::query_as::<_, MembershipRow>(
        "SELECT id, amount_paid, payment_method, commission_amount FROM memberships \
         WHERE created_at >= ? AND created_at < ?",
    )
    .bind(start_millis)
    .bind(end_millis)
    .fetch_all(pool)
    .await?;

    let details = sqlx::query_as::<_, MembershipPaymentRow>(
        "SELECT mp.membership_id, mp.payment_method, mp.amount, mp.commission_amount \
         FROM membership_payments mp \
         JOIN memberships m ON m.id = mp.membership_id \
         WHERE m.created_at >= ? AND m.created_at < ?",
    )
    .bind(start_millis)
    .bind(end_millis)
    .fetch_all(pool)
    .await?;

    let mut by_membership: HashMap<i64, Vec<MembershipPaymentRow>> = HashMap::new();
    for d in details {
        by_membership.entry(d.membership_id).or_default().push(d);
    }

    for m in memberships {
        acc.count_transaction();
        acc.add_commission(m.commission_amount);

        match by_membership.get(&m.id) {
            Some(rows) if !rows.is_empty() => {
                for d in rows {
                    acc.add_gross(
                        d.payment_method.as_deref().unwrap_or(""),
                        d.amount,
                        d.commission_amount,
                    );
                }
            }
            _ => {
                acc.add_flat(m.payment_method.as_deref().unwrap_or(""), m.amount_paid);
            }
        }
    }

    Ok(acc.finish())
}

/// The full per-date aggregation object: three channels plus cross-channel
/// totals. This is the engine's input boundary for automatic cut creation.
pub async fn collect(
    pool: &SqlitePool,
    date: &str,
    start_millis: i64,
    end_millis: i64,
) -> RepoResult<DailyData> {
    let pos = pos_channel(pool, start_millis, end_millis).await?;
    let abonos = abonos_channel(pool, start_millis, end_millis).await?;
    let memberships = membership_channel(pool, start_millis, end_millis).await?;

    let totals = cut_money::daily_totals(&pos, &abonos, &memberships);

    Ok(DailyData {
        date: date.to_string(),
        pos,
        abonos,
        memberships,
        totals,
    })
}
