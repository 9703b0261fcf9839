//! Expense API Handlers (egresos)

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use shared::models::{
    CashCut, DailyExpenseSummary, Expense, ExpenseCreate, ExpenseTypeBreakdown, ExpenseUpdate,
};
use shared::util::now_millis;

use crate::core::ServerState;
use crate::cut_money;
use crate::db::repository::{cash_cut, expense, user};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_expense_amount,
    validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, time};

#[derive(Debug, Deserialize)]
pub struct DailyQuery {
    pub date: String,
}

#[derive(Debug, Serialize)]
pub struct DailyExpensesResponse {
    pub date: String,
    pub expenses: Vec<Expense>,
    pub summary: DailyExpenseSummary,
    pub categories: Vec<ExpenseTypeBreakdown>,
}

/// GET /api/expenses/daily?date= - day's active expenses with summary
pub async fn daily(
    State(state): State<ServerState>,
    Query(query): Query<DailyQuery>,
) -> AppResult<Json<DailyExpensesResponse>> {
    time::parse_date(&query.date)?;

    let expenses = expense::find_by_date(&state.pool, &query.date).await?;
    let summary = expense::daily_summary(&state.pool, &query.date).await?;
    let categories = expense::type_breakdown(&state.pool, &query.date).await?;

    Ok(Json(DailyExpensesResponse {
        date: query.date,
        expenses,
        summary,
        categories,
    }))
}

/// POST /api/expenses - register an expense
pub async fn create(
    State(state): State<ServerState>,
    Json(mut payload): Json<ExpenseCreate>,
) -> AppResult<Json<Expense>> {
    time::parse_date(&payload.expense_date)?;
    validate_required_text(&payload.expense_type, "expense_type", MAX_NAME_LEN)?;
    validate_required_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_expense_amount(payload.amount)?;
    validate_optional_text(&payload.receipt_number, "receipt_number", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;

    if payload.created_by.is_none() {
        payload.created_by = user::find_default_admin(&state.pool).await?.map(|u| u.id);
    }

    let created = expense::create(&state.pool, payload).await?;

    tracing::info!(
        expense_id = created.id,
        amount = created.amount,
        expense_type = %created.expense_type,
        "Expense registered"
    );

    Ok(Json(created))
}

/// PUT /api/expenses/{id} - edit or cancel an expense
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ExpenseUpdate>,
) -> AppResult<Json<Expense>> {
    if let Some(t) = &payload.expense_type {
        validate_required_text(t, "expense_type", MAX_NAME_LEN)?;
    }
    if let Some(d) = &payload.description {
        validate_required_text(d, "description", MAX_NOTE_LEN)?;
    }
    if let Some(amount) = payload.amount {
        validate_expense_amount(amount)?;
    }
    validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;

    let updated = expense::update(&state.pool, id, payload).await?;
    Ok(Json(updated))
}

/// DELETE /api/expenses/{id} - hard delete (admin)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let deleted = expense::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Expense {} not found", id)));
    }
    Ok(Json(true))
}

#[derive(Debug, Deserialize)]
pub struct SyncRequest {
    pub date: String,
}

#[derive(Debug, Serialize)]
pub struct SyncDetails {
    pub old_expenses_amount: f64,
    pub new_expenses_amount: f64,
    pub expense_count: i64,
    pub old_final_balance: f64,
    pub new_final_balance: f64,
    pub difference: f64,
}

#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub date: String,
    pub cut_number: String,
    pub sync_details: SyncDetails,
    pub updated_cut: CashCut,
}

/// POST /api/expenses/sync-with-cut - overwrite a cut's expense figure with
/// the day's authoritative ledger total
///
/// The overwrite is offered, never forced: callers hit this endpoint only
/// after the advisory desync flag surfaced the disagreement.
pub async fn sync_with_cut(
    State(state): State<ServerState>,
    Json(payload): Json<SyncRequest>,
) -> AppResult<Json<SyncResponse>> {
    time::parse_date(&payload.date)?;

    let summary = expense::daily_summary(&state.pool, &payload.date).await?;
    let cut = cash_cut::find_by_date(&state.pool, &payload.date)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!("No cut registered for {}", payload.date))
        })?;

    let old_expenses = cut.expenses_amount;
    let old_balance = cut.final_balance;
    let new_expenses = summary.total_amount;
    let new_balance = cut_money::final_balance(cut.grand_total, new_expenses);

    cash_cut::update_expenses(&state.pool, cut.id, new_expenses, new_balance, now_millis())
        .await?;

    let updated = cash_cut::find_by_id(&state.pool, cut.id)
        .await?
        .ok_or_else(|| AppError::internal("Cut vanished during sync"))?;

    tracing::info!(
        cut_number = %updated.cut_number,
        old_expenses,
        new_expenses,
        "Expense figures synced with cut"
    );

    Ok(Json(SyncResponse {
        date: payload.date,
        cut_number: updated.cut_number.clone(),
        sync_details: SyncDetails {
            old_expenses_amount: old_expenses,
            new_expenses_amount: new_expenses,
            expense_count: summary.total_expenses,
            old_final_balance: old_balance,
            new_final_balance: new_balance,
            difference: cut_money::to_f64(
                cut_money::to_decimal(new_expenses) - cut_money::to_decimal(old_expenses),
            ),
        },
        updated_cut: updated,
    }))
}
