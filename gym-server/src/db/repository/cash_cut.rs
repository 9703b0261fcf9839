//! Cash Cut Repository

use chrono::NaiveDate;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use shared::models::{CashCut, CashCutUpdate, CutStats, CutStatus};

use super::{RepoError, RepoResult};

/// All cut columns plus the joined creator display name.
const SELECT_CUT: &str = r#"
SELECT c.*,
       CASE
           WHEN u.id IS NULL THEN NULL
           WHEN TRIM(COALESCE(u.first_name, '') || ' ' || COALESCE(u.last_name, '')) = ''
               THEN u.username
           ELSE TRIM(COALESCE(u.first_name, '') || ' ' || COALESCE(u.last_name, ''))
       END AS creator_name
FROM cash_cuts c
LEFT JOIN users u ON u.id = c.created_by
"#;

/// Human-readable cut number: CORTE-YYYYMMDD-<millis>
pub fn make_cut_number(date: NaiveDate, millis: i64) -> String {
    format!("CORTE-{}-{}", date.format("%Y%m%d"), millis)
}

/// History filter. Sort fields outside the whitelist fall back to created_at.
#[derive(Debug, Clone)]
pub struct HistoryFilter {
    pub search: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub status: Option<CutStatus>,
    pub is_manual: Option<bool>,
    pub sort_by: String,
    pub sort_order: String,
    pub limit: i64,
    pub offset: i64,
}

impl Default for HistoryFilter {
    fn default() -> Self {
        Self {
            search: None,
            date_from: None,
            date_to: None,
            status: None,
            is_manual: None,
            sort_by: "created_at".to_string(),
            sort_order: "desc".to_string(),
            limit: 10,
            offset: 0,
        }
    }
}

const SORTABLE: &[&str] = &[
    "created_at",
    "cut_date",
    "cut_number",
    "grand_total",
    "final_balance",
    "total_transactions",
];

fn push_filters<'a>(qb: &mut QueryBuilder<'a, Sqlite>, filter: &'a HistoryFilter) {
    qb.push(" WHERE 1 = 1");
    if let Some(search) = &filter.search
        && !search.trim().is_empty()
    {
        let pattern = format!("%{}%", search.trim());
        qb.push(" AND (c.cut_number LIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR c.notes LIKE ");
        qb.push_bind(pattern);
        qb.push(")");
    }
    if let Some(from) = &filter.date_from {
        qb.push(" AND c.cut_date >= ");
        qb.push_bind(from);
    }
    if let Some(to) = &filter.date_to {
        qb.push(" AND c.cut_date <= ");
        qb.push_bind(to);
    }
    if let Some(status) = filter.status {
        qb.push(" AND c.status = ");
        qb.push_bind(status.as_str());
    }
    if let Some(is_manual) = filter.is_manual {
        qb.push(" AND c.is_manual = ");
        qb.push_bind(is_manual);
    }
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<CashCut>> {
    let sql = format!("{SELECT_CUT} WHERE c.id = ?");
    let cut = sqlx::query_as::<_, CashCut>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(cut)
}

pub async fn find_by_date(pool: &SqlitePool, date: &str) -> RepoResult<Option<CashCut>> {
    let sql = format!("{SELECT_CUT} WHERE c.cut_date = ? LIMIT 1");
    let cut = sqlx::query_as::<_, CashCut>(&sql)
        .bind(date)
        .fetch_optional(pool)
        .await?;
    Ok(cut)
}

/// Filtered, paginated history. Returns the page plus the total matching
/// row count for pagination.
pub async fn search(
    pool: &SqlitePool,
    filter: &HistoryFilter,
) -> RepoResult<(Vec<CashCut>, i64)> {
    let mut count_qb: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT COUNT(*) FROM cash_cuts c");
    push_filters(&mut count_qb, filter);
    let total: i64 = count_qb.build_query_scalar().fetch_one(pool).await?;

    let sort_by = if SORTABLE.contains(&filter.sort_by.as_str()) {
        filter.sort_by.as_str()
    } else {
        "created_at"
    };
    let sort_order = if filter.sort_order.eq_ignore_ascii_case("asc") {
        "ASC"
    } else {
        "DESC"
    };

    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT_CUT);
    push_filters(&mut qb, filter);
    qb.push(format!(" ORDER BY c.{sort_by} {sort_order} LIMIT "));
    qb.push_bind(filter.limit);
    qb.push(" OFFSET ");
    qb.push_bind(filter.offset);

    let cuts = qb.build_query_as::<CashCut>().fetch_all(pool).await?;
    Ok((cuts, total))
}

/// Aggregate statistics over the whole history.
pub async fn stats(pool: &SqlitePool) -> RepoResult<CutStats> {
    let stats = sqlx::query_as::<_, CutStats>(
        r#"
        SELECT COUNT(*) AS total_cuts,
               COALESCE(SUM(grand_total), 0.0) AS total_amount,
               COALESCE(AVG(grand_total), 0.0) AS avg_amount,
               COALESCE(SUM(CASE WHEN is_manual THEN 1 ELSE 0 END), 0) AS manual_cuts,
               COALESCE(SUM(CASE WHEN is_manual THEN 0 ELSE 1 END), 0) AS automatic_cuts
        FROM cash_cuts
        "#,
    )
    .fetch_one(pool)
    .await?;
    Ok(stats)
}

/// Insert a fully recomputed cut record. One cut per calendar day.
pub async fn create(pool: &SqlitePool, cut: &CashCut) -> RepoResult<CashCut> {
    if find_by_date(pool, &cut.cut_date).await?.is_some() {
        return Err(RepoError::Duplicate(format!(
            "A cut for {} already exists",
            cut.cut_date
        )));
    }

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO cash_cuts (
            cut_number, cut_date, status, is_manual,
            pos_efectivo, pos_transferencia, pos_debito, pos_credito, pos_mixto,
            pos_total, pos_transactions, pos_commissions,
            abonos_efectivo, abonos_transferencia, abonos_debito, abonos_credito, abonos_mixto,
            abonos_total, abonos_transactions, abonos_commissions,
            membership_efectivo, membership_transferencia, membership_debito,
            membership_credito, membership_mixto,
            membership_total, membership_transactions, membership_commissions,
            total_efectivo, total_transferencia, total_debito, total_credito, total_mixto,
            total_transactions, total_commissions, grand_total,
            expenses_amount, final_balance, net_amount,
            notes, created_by, closed_by, closed_at, created_at, updated_at
        ) VALUES (
            ?, ?, ?, ?,
            ?, ?, ?, ?, ?,
            ?, ?, ?,
            ?, ?, ?, ?, ?,
            ?, ?, ?,
            ?, ?, ?,
            ?, ?,
            ?, ?, ?,
            ?, ?, ?, ?, ?,
            ?, ?, ?,
            ?, ?, ?,
            ?, ?, ?, ?, ?, ?
        )
        RETURNING id
        "#,
    )
    .bind(&cut.cut_number)
    .bind(&cut.cut_date)
    .bind(cut.status)
    .bind(cut.is_manual)
    .bind(cut.pos_efectivo)
    .bind(cut.pos_transferencia)
    .bind(cut.pos_debito)
    .bind(cut.pos_credito)
    .bind(cut.pos_mixto)
    .bind(cut.pos_total)
    .bind(cut.pos_transactions)
    .bind(cut.pos_commissions)
    .bind(cut.abonos_efectivo)
    .bind(cut.abonos_transferencia)
    .bind(cut.abonos_debito)
    .bind(cut.abonos_credito)
    .bind(cut.abonos_mixto)
    .bind(cut.abonos_total)
    .bind(cut.abonos_transactions)
    .bind(cut.abonos_commissions)
    .bind(cut.membership_efectivo)
    .bind(cut.membership_transferencia)
    .bind(cut.membership_debito)
    .bind(cut.membership_credito)
    .bind(cut.membership_mixto)
    .bind(cut.membership_total)
    .bind(cut.membership_transactions)
    .bind(cut.membership_commissions)
    .bind(cut.total_efectivo)
    .bind(cut.total_transferencia)
    .bind(cut.total_debito)
    .bind(cut.total_credito)
    .bind(cut.total_mixto)
    .bind(cut.total_transactions)
    .bind(cut.total_commissions)
    .bind(cut.grand_total)
    .bind(cut.expenses_amount)
    .bind(cut.final_balance)
    .bind(cut.net_amount)
    .bind(&cut.notes)
    .bind(cut.created_by)
    .bind(cut.closed_by)
    .bind(cut.closed_at)
    .bind(cut.created_at)
    .bind(cut.updated_at)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create cut".into()))
}

/// Persist a canonical update payload. Every derived column is written -
/// the payload shape makes a partial, inconsistent update unrepresentable.
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    payload: &CashCutUpdate,
    now: i64,
) -> RepoResult<CashCut> {
    let rows = sqlx::query(
        r#"
        UPDATE cash_cuts SET
            notes = ?, status = ?, expenses_amount = ?,
            pos_efectivo = ?, pos_transferencia = ?, pos_debito = ?, pos_credito = ?,
            pos_mixto = ?, pos_total = ?, pos_transactions = ?, pos_commissions = ?,
            abonos_efectivo = ?, abonos_transferencia = ?, abonos_debito = ?, abonos_credito = ?,
            abonos_mixto = ?, abonos_total = ?, abonos_transactions = ?, abonos_commissions = ?,
            membership_efectivo = ?, membership_transferencia = ?, membership_debito = ?,
            membership_credito = ?, membership_mixto = ?, membership_total = ?,
            membership_transactions = ?, membership_commissions = ?,
            total_efectivo = ?, total_transferencia = ?, total_debito = ?, total_credito = ?,
            total_mixto = ?, total_transactions = ?, total_commissions = ?, grand_total = ?,
            final_balance = ?, net_amount = ?,
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&payload.notes)
    .bind(payload.status)
    .bind(payload.expenses_amount)
    .bind(payload.pos_efectivo)
    .bind(payload.pos_transferencia)
    .bind(payload.pos_debito)
    .bind(payload.pos_credito)
    .bind(payload.pos_mixto)
    .bind(payload.pos_total)
    .bind(payload.pos_transactions)
    .bind(payload.pos_commissions)
    .bind(payload.abonos_efectivo)
    .bind(payload.abonos_transferencia)
    .bind(payload.abonos_debito)
    .bind(payload.abonos_credito)
    .bind(payload.abonos_mixto)
    .bind(payload.abonos_total)
    .bind(payload.abonos_transactions)
    .bind(payload.abonos_commissions)
    .bind(payload.membership_efectivo)
    .bind(payload.membership_transferencia)
    .bind(payload.membership_debito)
    .bind(payload.membership_credito)
    .bind(payload.membership_mixto)
    .bind(payload.membership_total)
    .bind(payload.membership_transactions)
    .bind(payload.membership_commissions)
    .bind(payload.total_efectivo)
    .bind(payload.total_transferencia)
    .bind(payload.total_debito)
    .bind(payload.total_credito)
    .bind(payload.total_mixto)
    .bind(payload.total_transactions)
    .bind(payload.total_commissions)
    .bind(payload.grand_total)
    .bind(payload.final_balance)
    .bind(payload.net_amount)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Cut {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Cut {id} not found")))
}

/// Overwrite the expense figure and final balance after an expense-ledger
/// sync. The grand total is untouched; only the two dependent columns move.
pub async fn update_expenses(
    pool: &SqlitePool,
    id: i64,
    expenses_amount: f64,
    final_balance: f64,
    now: i64,
) -> RepoResult<()> {
    let rows = sqlx::query(
        "UPDATE cash_cuts SET expenses_amount = ?, final_balance = ?, net_amount = ?, updated_at = ? WHERE id = ?",
    )
    .bind(expenses_amount)
    .bind(final_balance)
    .bind(final_balance)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Cut {id} not found")));
    }
    Ok(())
}

/// Hard delete. Deletion is terminal; there is no soft-delete for cuts.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM cash_cuts WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Bulk hard delete; returns the number of removed records.
pub async fn delete_many(pool: &SqlitePool, ids: &[i64]) -> RepoResult<u64> {
    if ids.is_empty() {
        return Ok(0);
    }
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("DELETE FROM cash_cuts WHERE id IN (");
    let mut separated = qb.separated(", ");
    for id in ids {
        separated.push_bind(id);
    }
    separated.push_unseparated(")");

    let rows = qb.build().execute(pool).await?;
    Ok(rows.rows_affected())
}
