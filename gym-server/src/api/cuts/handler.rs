//! Cash Cut API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use shared::models::{
    CashCut, CashCutCreate, CutEditRequest, CutStats, CutStatus, DailyData, ExpenseDesync,
};
use shared::util::now_millis;

use crate::core::ServerState;
use crate::cut_money;
use crate::db::repository::{cash_cut, daily_data, expense, user};
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult, time};

/// Query params for the cut history
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    pub search: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    /// open | closed | edited | all
    pub status: Option<String>,
    /// true | false | all
    pub is_manual: Option<String>,
    #[serde(default = "default_sort_by")]
    pub sort_by: String,
    #[serde(default = "default_sort_order")]
    pub sort_order: String,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    10
}

fn default_sort_by() -> String {
    "created_at".to_string()
}

fn default_sort_order() -> String {
    "desc".to_string()
}

#[derive(Debug, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

#[derive(Debug, Serialize)]
pub struct CutHistoryResponse {
    pub cuts: Vec<CashCut>,
    pub pagination: Pagination,
    pub stats: CutStats,
}

/// Cut detail plus the advisory expense desync, when the stored figure
/// disagrees with the day's ledger.
#[derive(Debug, Serialize)]
pub struct CutDetailResponse {
    pub cut: CashCut,
    pub desync: Option<ExpenseDesync>,
}

#[derive(Debug, Deserialize)]
pub struct DailyDataQuery {
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub struct BulkDeleteResponse {
    pub deleted: u64,
}

/// GET /api/cuts - paginated history with filters and summary stats
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<CutHistoryResponse>> {
    let page = query.page.max(1);
    let limit = query.limit.clamp(1, 100);

    let status = match query.status.as_deref() {
        None | Some("all") | Some("") => None,
        Some(s) => Some(CutStatus::from_str(s)),
    };
    let is_manual = match query.is_manual.as_deref() {
        Some("true") => Some(true),
        Some("false") => Some(false),
        _ => None,
    };

    let filter = cash_cut::HistoryFilter {
        search: query.search,
        date_from: query.date_from,
        date_to: query.date_to,
        status,
        is_manual,
        sort_by: query.sort_by,
        sort_order: query.sort_order,
        limit,
        offset: (page - 1) * limit,
    };

    let (cuts, total) = cash_cut::search(&state.pool, &filter).await?;
    let stats = cash_cut::stats(&state.pool).await?;

    Ok(Json(CutHistoryResponse {
        cuts,
        pagination: Pagination {
            page,
            limit,
            total,
            total_pages: (total + limit - 1) / limit,
        },
        stats,
    }))
}

/// GET /api/cuts/{id} - cut detail with advisory desync info
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<CutDetailResponse>> {
    let cut = cash_cut::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Cut {} not found", id)))?;

    let summary = expense::daily_summary(&state.pool, &cut.cut_date).await?;
    let desync = cut_money::expense_desync(cut.expenses_amount, summary.total_amount);

    Ok(Json(CutDetailResponse { cut, desync }))
}

/// GET /api/cuts/date/{date} - cut for a calendar day
pub async fn get_by_date(
    State(state): State<ServerState>,
    Path(date): Path<String>,
) -> AppResult<Json<CashCut>> {
    time::parse_date(&date)?;
    let cut = cash_cut::find_by_date(&state.pool, &date)
        .await?
        .ok_or_else(|| AppError::not_found(format!("No cut registered for {}", date)))?;
    Ok(Json(cut))
}

/// GET /api/cuts/daily-data?date= - per-date channel aggregation from the
/// transactional tables (the figures a new automatic cut starts from)
pub async fn get_daily_data(
    State(state): State<ServerState>,
    Query(query): Query<DailyDataQuery>,
) -> AppResult<Json<DailyData>> {
    let date = time::parse_date(&query.date)?;
    let tz = state.config.timezone;

    let start = time::day_start_millis(date, tz);
    let end = time::day_end_millis(date, tz);

    let data = daily_data::collect(&state.pool, &query.date, start, end).await?;
    Ok(Json(data))
}

/// Resolve the operator a record is attributed to: the explicit id when
/// given, otherwise the first admin on file.
async fn resolve_creator(state: &ServerState, explicit: Option<i64>) -> AppResult<i64> {
    if let Some(id) = explicit {
        let found = user::find_by_id(&state.pool, id).await?;
        return match found {
            Some(u) => Ok(u.id),
            None => Err(AppError::validation(format!("Unknown user {}", id))),
        };
    }
    let admin = user::find_default_admin(&state.pool).await?;
    admin
        .map(|u| u.id)
        .ok_or_else(|| AppError::business_rule("No operator available to attribute the cut to"))
}

/// POST /api/cuts - register a cut (manual figures or derived figures)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CashCutCreate>,
) -> AppResult<Json<CashCut>> {
    let date = time::parse_date(&payload.cut_date)?;
    time::validate_not_future(date, state.config.timezone)?;
    validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;

    let created_by = resolve_creator(&state, payload.created_by).await?;
    let now = now_millis();
    let status = payload.status.unwrap_or(CutStatus::Closed);
    let (closed_at, closed_by) = if status == CutStatus::Closed {
        (Some(now), Some(created_by))
    } else {
        (None, None)
    };

    let draft = CashCut {
        id: 0,
        cut_number: cash_cut::make_cut_number(date, now),
        cut_date: payload.cut_date.clone(),
        status,
        is_manual: payload.is_manual,

        pos_efectivo: payload.pos_efectivo,
        pos_transferencia: payload.pos_transferencia,
        pos_debito: payload.pos_debito,
        pos_credito: payload.pos_credito,
        pos_mixto: payload.pos_mixto,
        pos_total: 0.0,
        pos_transactions: payload.pos_transactions,
        pos_commissions: payload.pos_commissions,

        abonos_efectivo: payload.abonos_efectivo,
        abonos_transferencia: payload.abonos_transferencia,
        abonos_debito: payload.abonos_debito,
        abonos_credito: payload.abonos_credito,
        abonos_mixto: payload.abonos_mixto,
        abonos_total: 0.0,
        abonos_transactions: payload.abonos_transactions,
        abonos_commissions: payload.abonos_commissions,

        membership_efectivo: payload.membership_efectivo,
        membership_transferencia: payload.membership_transferencia,
        membership_debito: payload.membership_debito,
        membership_credito: payload.membership_credito,
        membership_mixto: payload.membership_mixto,
        membership_total: 0.0,
        membership_transactions: payload.membership_transactions,
        membership_commissions: payload.membership_commissions,

        total_efectivo: 0.0,
        total_transferencia: 0.0,
        total_debito: 0.0,
        total_credito: 0.0,
        total_mixto: 0.0,
        total_transactions: 0,
        total_commissions: 0.0,
        grand_total: 0.0,
        expenses_amount: payload.expenses_amount,
        final_balance: 0.0,
        net_amount: 0.0,

        notes: payload.notes.as_deref().map(str::trim).filter(|n| !n.is_empty()).map(String::from),
        created_by: Some(created_by),
        closed_by,
        closed_at,
        created_at: now,
        updated_at: now,
        creator_name: None,
    };

    // Derived fields are never trusted from the caller
    let cut = cut_money::recalculate(&draft);
    let created = cash_cut::create(&state.pool, &cut).await?;

    tracing::info!(
        cut_number = %created.cut_number,
        grand_total = created.grand_total,
        is_manual = created.is_manual,
        "Cut registered"
    );

    Ok(Json(created))
}

fn apply_edit(cut: &mut CashCut, req: &CutEditRequest) {
    if let Some(v) = &req.notes {
        cut.notes = Some(v.clone()).filter(|n| !n.trim().is_empty());
    }

    if let Some(v) = req.pos_efectivo {
        cut.pos_efectivo = v;
    }
    if let Some(v) = req.pos_transferencia {
        cut.pos_transferencia = v;
    }
    if let Some(v) = req.pos_debito {
        cut.pos_debito = v;
    }
    if let Some(v) = req.pos_credito {
        cut.pos_credito = v;
    }
    if let Some(v) = req.pos_mixto {
        cut.pos_mixto = v;
    }
    if let Some(v) = req.pos_transactions {
        cut.pos_transactions = v;
    }
    if let Some(v) = req.pos_commissions {
        cut.pos_commissions = v;
    }

    if let Some(v) = req.abonos_efectivo {
        cut.abonos_efectivo = v;
    }
    if let Some(v) = req.abonos_transferencia {
        cut.abonos_transferencia = v;
    }
    if let Some(v) = req.abonos_debito {
        cut.abonos_debito = v;
    }
    if let Some(v) = req.abonos_credito {
        cut.abonos_credito = v;
    }
    if let Some(v) = req.abonos_mixto {
        cut.abonos_mixto = v;
    }
    if let Some(v) = req.abonos_transactions {
        cut.abonos_transactions = v;
    }
    if let Some(v) = req.abonos_commissions {
        cut.abonos_commissions = v;
    }

    if let Some(v) = req.membership_efectivo {
        cut.membership_efectivo = v;
    }
    if let Some(v) = req.membership_transferencia {
        cut.membership_transferencia = v;
    }
    if let Some(v) = req.membership_debito {
        cut.membership_debito = v;
    }
    if let Some(v) = req.membership_credito {
        cut.membership_credito = v;
    }
    if let Some(v) = req.membership_mixto {
        cut.membership_mixto = v;
    }
    if let Some(v) = req.membership_transactions {
        cut.membership_transactions = v;
    }
    if let Some(v) = req.membership_commissions {
        cut.membership_commissions = v;
    }

    if let Some(v) = req.expenses_amount {
        cut.expenses_amount = v;
    }
}

/// PUT /api/cuts/{id} - edit a cut
///
/// The only write path for edits: base figures are merged into the stored
/// record and the whole derived field set is rebuilt before persisting, so
/// a single-field edit can never leave stale totals behind.
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<CutEditRequest>,
) -> AppResult<Json<CashCut>> {
    validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;

    let mut cut = cash_cut::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Cut {} not found", id)))?;

    let old_status = cut.status;
    let new_status = payload
        .status
        .unwrap_or(if old_status == CutStatus::Open {
            CutStatus::Edited
        } else {
            old_status
        });
    if !old_status.can_transition(new_status) {
        return Err(AppError::business_rule(format!(
            "Cut {} is closed and cannot be reopened",
            cut.cut_number
        )));
    }

    apply_edit(&mut cut, &payload);
    cut.status = new_status;
    if new_status == CutStatus::Closed && old_status != CutStatus::Closed {
        cut.closed_at = Some(now_millis());
        cut.closed_by = cut.created_by;
    }

    let update_payload = cut_money::build_update_payload(&cut);
    let updated = cash_cut::update(&state.pool, id, &update_payload, now_millis()).await?;

    tracing::info!(
        cut_number = %updated.cut_number,
        grand_total = updated.grand_total,
        status = updated.status.as_str(),
        "Cut updated"
    );

    Ok(Json(updated))
}

/// DELETE /api/cuts/{id} - remove a cut (terminal)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let deleted = cash_cut::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Cut {} not found", id)));
    }
    Ok(Json(true))
}

/// POST /api/cuts/bulk-delete - remove several cuts at once
pub async fn bulk_delete(
    State(state): State<ServerState>,
    Json(payload): Json<BulkDeleteRequest>,
) -> AppResult<Json<BulkDeleteResponse>> {
    if payload.ids.is_empty() {
        return Err(AppError::validation("ids must not be empty"));
    }
    let deleted = cash_cut::delete_many(&state.pool, &payload.ids).await?;
    Ok(Json(BulkDeleteResponse { deleted }))
}
