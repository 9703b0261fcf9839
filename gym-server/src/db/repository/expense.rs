//! Expense Repository

use sqlx::SqlitePool;

use shared::models::{
    DailyExpenseSummary, Expense, ExpenseCreate, ExpenseStatus, ExpenseTypeBreakdown,
    ExpenseUpdate,
};
use shared::util::now_millis;

use super::{RepoError, RepoResult};

const COLUMNS: &str = "id, expense_date, expense_time, expense_type, description, amount, \
                       receipt_number, notes, status, created_by, created_at, updated_at";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Expense>> {
    let sql = format!("SELECT {COLUMNS} FROM expenses WHERE id = ?");
    let expense = sqlx::query_as::<_, Expense>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(expense)
}

/// Active expenses for a calendar day, newest first.
pub async fn find_by_date(pool: &SqlitePool, date: &str) -> RepoResult<Vec<Expense>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM expenses \
         WHERE expense_date = ? AND status = 'active' \
         ORDER BY expense_time DESC"
    );
    let expenses = sqlx::query_as::<_, Expense>(&sql)
        .bind(date)
        .fetch_all(pool)
        .await?;
    Ok(expenses)
}

/// Sum and count of the day's active expenses - the authoritative figure
/// the cut sync compares against.
pub async fn daily_summary(pool: &SqlitePool, date: &str) -> RepoResult<DailyExpenseSummary> {
    let (total_amount, total_expenses): (f64, i64) = sqlx::query_as(
        "SELECT COALESCE(SUM(amount), 0.0), COUNT(*) \
         FROM expenses WHERE expense_date = ? AND status = 'active'",
    )
    .bind(date)
    .fetch_one(pool)
    .await?;

    Ok(DailyExpenseSummary {
        date: date.to_string(),
        total_amount,
        total_expenses,
    })
}

/// Per-category totals for a day's active expenses.
pub async fn type_breakdown(
    pool: &SqlitePool,
    date: &str,
) -> RepoResult<Vec<ExpenseTypeBreakdown>> {
    let breakdown = sqlx::query_as::<_, ExpenseTypeBreakdown>(
        "SELECT expense_type, COUNT(*) AS count, COALESCE(SUM(amount), 0.0) AS total \
         FROM expenses WHERE expense_date = ? AND status = 'active' \
         GROUP BY expense_type ORDER BY total DESC",
    )
    .bind(date)
    .fetch_all(pool)
    .await?;
    Ok(breakdown)
}

pub async fn create(pool: &SqlitePool, data: ExpenseCreate) -> RepoResult<Expense> {
    let now = now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO expenses (expense_date, expense_time, expense_type, description, amount, \
         receipt_number, notes, status, created_by, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, 'active', ?, ?, ?) RETURNING id",
    )
    .bind(&data.expense_date)
    .bind(now)
    .bind(&data.expense_type)
    .bind(&data.description)
    .bind(data.amount)
    .bind(&data.receipt_number)
    .bind(&data.notes)
    .bind(data.created_by)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create expense".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: ExpenseUpdate) -> RepoResult<Expense> {
    let now = now_millis();
    let status = data.status.map(|s| s.as_str());

    let rows = sqlx::query(
        "UPDATE expenses SET \
         expense_type = COALESCE(?, expense_type), \
         description = COALESCE(?, description), \
         amount = COALESCE(?, amount), \
         receipt_number = COALESCE(?, receipt_number), \
         notes = COALESCE(?, notes), \
         status = COALESCE(?, status), \
         updated_at = ? \
         WHERE id = ?",
    )
    .bind(&data.expense_type)
    .bind(&data.description)
    .bind(data.amount)
    .bind(&data.receipt_number)
    .bind(&data.notes)
    .bind(status)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Expense {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Expense {id} not found")))
}

/// Cancel an expense: keeps the entry on file but removes it from every
/// aggregate.
pub async fn cancel(pool: &SqlitePool, id: i64) -> RepoResult<Expense> {
    update(
        pool,
        id,
        ExpenseUpdate {
            status: Some(ExpenseStatus::Cancelled),
            ..Default::default()
        },
    )
    .await
}

/// Hard delete (admin path).
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM expenses WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
