//! End-to-end repository + engine flow over an in-memory database:
//! seed a day of transactions, derive the channel figures, register the
//! cut, detect expense drift, sync, edit, delete.

use chrono_tz::America::Mexico_City;
use sqlx::SqlitePool;

use gym_server::cut_money;
use gym_server::db::DbService;
use gym_server::db::repository::{cash_cut, daily_data, expense, user};
use gym_server::utils::time;
use shared::models::{
    CashCut, CutStatus, ExpenseCreate, ExpenseUpdate, ExpenseStatus, UserCreate,
};
use shared::util::now_millis;

const DATE: &str = "2026-08-05";

async fn seed_admin(pool: &SqlitePool) -> i64 {
    user::create(
        pool,
        UserCreate {
            username: "lhernandez".into(),
            first_name: Some("Luis".into()),
            last_name: Some("Hernández".into()),
            email: None,
            role: "admin".into(),
        },
    )
    .await
    .expect("seed admin")
    .id
}

async fn insert_sale(pool: &SqlitePool, sale_type: &str, status: &str, at: i64) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO sales (sale_type, status, total_amount, created_at, updated_at) \
         VALUES (?, ?, 0, ?, ?) RETURNING id",
    )
    .bind(sale_type)
    .bind(status)
    .bind(at)
    .bind(at)
    .fetch_one(pool)
    .await
    .expect("seed sale")
}

async fn insert_payment(
    pool: &SqlitePool,
    sale_id: i64,
    method: &str,
    amount: f64,
    commission: f64,
    partial: bool,
    at: i64,
) {
    sqlx::query(
        "INSERT INTO sale_payments \
         (sale_id, payment_method, amount, commission_amount, is_partial_payment, payment_date, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(sale_id)
    .bind(method)
    .bind(amount)
    .bind(commission)
    .bind(partial)
    .bind(at)
    .bind(at)
    .execute(pool)
    .await
    .expect("seed payment");
}

async fn insert_membership(
    pool: &SqlitePool,
    amount_paid: f64,
    method: Option<&str>,
    commission: f64,
    at: i64,
) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO memberships \
         (member_name, plan_name, amount_paid, payment_method, commission_amount, created_at, updated_at) \
         VALUES ('Socia', 'Mensual', ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(amount_paid)
    .bind(method)
    .bind(commission)
    .bind(at)
    .bind(at)
    .fetch_one(pool)
    .await
    .expect("seed membership")
}

async fn insert_membership_payment(
    pool: &SqlitePool,
    membership_id: i64,
    method: &str,
    amount: f64,
    commission: f64,
    at: i64,
) {
    sqlx::query(
        "INSERT INTO membership_payments \
         (membership_id, payment_method, amount, commission_amount, created_at) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(membership_id)
    .bind(method)
    .bind(amount)
    .bind(commission)
    .bind(at)
    .execute(pool)
    .await
    .expect("seed membership payment");
}

/// A cut draft carrying the derived channel figures; derived totals are
/// zeroed and left for the engine.
fn draft_from_daily(data: &shared::models::DailyData, expenses: f64, created_by: i64) -> CashCut {
    let now = now_millis();
    let date = time::parse_date(&data.date).unwrap();
    CashCut {
        id: 0,
        cut_number: cash_cut::make_cut_number(date, now),
        cut_date: data.date.clone(),
        status: CutStatus::Closed,
        is_manual: false,
        pos_efectivo: data.pos.efectivo,
        pos_transferencia: data.pos.transferencia,
        pos_debito: data.pos.debito,
        pos_credito: data.pos.credito,
        pos_mixto: data.pos.mixto,
        pos_total: 0.0,
        pos_transactions: data.pos.transactions,
        pos_commissions: data.pos.commissions,
        abonos_efectivo: data.abonos.efectivo,
        abonos_transferencia: data.abonos.transferencia,
        abonos_debito: data.abonos.debito,
        abonos_credito: data.abonos.credito,
        abonos_mixto: data.abonos.mixto,
        abonos_total: 0.0,
        abonos_transactions: data.abonos.transactions,
        abonos_commissions: data.abonos.commissions,
        membership_efectivo: data.memberships.efectivo,
        membership_transferencia: data.memberships.transferencia,
        membership_debito: data.memberships.debito,
        membership_credito: data.memberships.credito,
        membership_mixto: data.memberships.mixto,
        membership_total: 0.0,
        membership_transactions: data.memberships.transactions,
        membership_commissions: data.memberships.commissions,
        total_efectivo: 0.0,
        total_transferencia: 0.0,
        total_debito: 0.0,
        total_credito: 0.0,
        total_mixto: 0.0,
        total_transactions: 0,
        total_commissions: 0.0,
        grand_total: 0.0,
        expenses_amount: expenses,
        final_balance: 0.0,
        net_amount: 0.0,
        notes: None,
        created_by: Some(created_by),
        closed_by: Some(created_by),
        closed_at: Some(now),
        created_at: now,
        updated_at: now,
        creator_name: None,
    }
}

#[tokio::test]
async fn full_day_reconciliation_flow() {
    let db = DbService::in_memory().await.expect("open db");
    let pool = &db.pool;

    let admin = seed_admin(pool).await;

    let date = time::parse_date(DATE).unwrap();
    let start = time::day_start_millis(date, Mexico_City);
    let noon = start + 12 * 60 * 60 * 1000;

    // POS: two completed sales (cash 100; credit 200 + 6 commission), plus
    // one out-of-range sale that must not leak in
    let s1 = insert_sale(pool, "sale", "completed", noon).await;
    insert_payment(pool, s1, "efectivo", 100.0, 0.0, false, noon).await;
    let s2 = insert_sale(pool, "sale", "completed", noon).await;
    insert_payment(pool, s2, "credito", 200.0, 6.0, false, noon).await;
    let stale = insert_sale(pool, "sale", "completed", start - 1000).await;
    insert_payment(pool, stale, "efectivo", 999.0, 0.0, false, start - 1000).await;

    // Abonos: one layaway taking two deposits today
    let layaway = insert_sale(pool, "layaway", "pending", start - 86_400_000).await;
    insert_payment(pool, layaway, "transferencia", 50.0, 0.0, true, noon).await;
    insert_payment(pool, layaway, "efectivo", 20.0, 0.0, true, noon).await;

    // Memberships: one with a method breakdown, one whole-record fallback
    let m1 = insert_membership(pool, 400.0, Some("credito"), 12.0, noon).await;
    insert_membership_payment(pool, m1, "efectivo", 200.0, 0.0, noon).await;
    insert_membership_payment(pool, m1, "credito", 200.0, 12.0, noon).await;
    insert_membership(pool, 150.0, None, 0.0, noon).await;

    let end = time::day_end_millis(date, Mexico_City);
    let data = daily_data::collect(pool, DATE, start, end).await.expect("daily data");

    assert_eq!(data.pos.transactions, 2);
    assert_eq!(data.pos.efectivo, 100.0);
    assert_eq!(data.pos.credito, 206.0);
    assert_eq!(data.pos.commissions, 6.0);
    assert_eq!(data.pos.total, 306.0);

    assert_eq!(data.abonos.transactions, 1);
    assert_eq!(data.abonos.efectivo, 20.0);
    assert_eq!(data.abonos.transferencia, 50.0);
    assert_eq!(data.abonos.total, 70.0);

    assert_eq!(data.memberships.transactions, 2);
    assert_eq!(data.memberships.efectivo, 350.0);
    assert_eq!(data.memberships.credito, 212.0);
    assert_eq!(data.memberships.commissions, 12.0);
    assert_eq!(data.memberships.total, 562.0);

    assert_eq!(data.totals.total, 938.0);
    assert_eq!(data.totals.transactions, 5);
    assert_eq!(data.totals.commissions, 18.0);
    assert_eq!(data.totals.net_amount, 920.0);

    // Expense ledger: two active entries plus one that gets cancelled
    expense::create(
        pool,
        ExpenseCreate {
            expense_date: DATE.into(),
            expense_type: "nomina".into(),
            description: "Pago quincenal".into(),
            amount: 300.0,
            receipt_number: None,
            notes: None,
            created_by: Some(admin),
        },
    )
    .await
    .unwrap();
    expense::create(
        pool,
        ExpenseCreate {
            expense_date: DATE.into(),
            expense_type: "servicios".into(),
            description: "Luz".into(),
            amount: 99.5,
            receipt_number: Some("F-1022".into()),
            notes: None,
            created_by: Some(admin),
        },
    )
    .await
    .unwrap();
    let cancelled = expense::create(
        pool,
        ExpenseCreate {
            expense_date: DATE.into(),
            expense_type: "otros".into(),
            description: "Duplicado".into(),
            amount: 50.0,
            receipt_number: None,
            notes: None,
            created_by: Some(admin),
        },
    )
    .await
    .unwrap();
    let cancelled = expense::cancel(pool, cancelled.id).await.unwrap();
    assert_eq!(cancelled.status, ExpenseStatus::Cancelled);

    let summary = expense::daily_summary(pool, DATE).await.unwrap();
    assert_eq!(summary.total_expenses, 2);
    assert_eq!(summary.total_amount, 399.5);

    // Register the cut from the derived figures
    let draft = draft_from_daily(&data, summary.total_amount, admin);
    let cut = cash_cut::create(pool, &cut_money::recalculate(&draft)).await.unwrap();

    assert_eq!(cut.grand_total, 938.0);
    assert_eq!(cut.expenses_amount, 399.5);
    assert_eq!(cut.final_balance, 538.5);
    assert_eq!(cut.net_amount, 538.5);
    assert_eq!(cut.total_transactions, 5);
    assert_eq!(cut.total_commissions, 18.0);
    assert_eq!(cut.creator_name.as_deref(), Some("Luis Hernández"));

    // Only one cut per day
    let dup = cash_cut::create(pool, &cut_money::recalculate(&draft)).await;
    assert!(dup.is_err());

    // In sync right after creation
    assert!(cut_money::expense_desync(cut.expenses_amount, summary.total_amount).is_none());

    // A late expense desyncs the cut...
    expense::create(
        pool,
        ExpenseCreate {
            expense_date: DATE.into(),
            expense_type: "mantenimiento".into(),
            description: "Refacción caminadora".into(),
            amount: 100.0,
            receipt_number: None,
            notes: None,
            created_by: Some(admin),
        },
    )
    .await
    .unwrap();
    let summary = expense::daily_summary(pool, DATE).await.unwrap();
    let desync = cut_money::expense_desync(cut.expenses_amount, summary.total_amount)
        .expect("late expense must desync the cut");
    assert_eq!(desync.difference, 100.0);

    // ...and syncing overwrites the figure and the balance
    let new_balance = cut_money::final_balance(cut.grand_total, summary.total_amount);
    cash_cut::update_expenses(pool, cut.id, summary.total_amount, new_balance, now_millis())
        .await
        .unwrap();
    let synced = cash_cut::find_by_id(pool, cut.id).await.unwrap().unwrap();
    assert_eq!(synced.expenses_amount, 499.5);
    assert_eq!(synced.final_balance, 438.5);
    assert_eq!(synced.net_amount, 438.5);

    // Edit one base figure through the payload builder: every derived field
    // follows, nothing goes stale
    let mut edited = synced.clone();
    edited.pos_efectivo = 150.0;
    edited.status = CutStatus::Edited;
    let payload = cut_money::build_update_payload(&edited);
    let updated = cash_cut::update(pool, cut.id, &payload, now_millis()).await.unwrap();

    assert_eq!(updated.pos_total, 356.0);
    assert_eq!(updated.total_efectivo, 520.0);
    assert_eq!(updated.grand_total, 988.0);
    assert_eq!(updated.final_balance, 488.5);
    assert_eq!(updated.status, CutStatus::Edited);

    // History search finds it by number; stats see a single automatic cut
    let (found, total) = cash_cut::search(
        pool,
        &cash_cut::HistoryFilter {
            search: Some(updated.cut_number.clone()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(total, 1);
    assert_eq!(found[0].id, updated.id);

    let stats = cash_cut::stats(pool).await.unwrap();
    assert_eq!(stats.total_cuts, 1);
    assert_eq!(stats.automatic_cuts, 1);
    assert_eq!(stats.manual_cuts, 0);
    assert_eq!(stats.total_amount, 988.0);

    // Deletion is terminal
    assert!(cash_cut::delete(pool, cut.id).await.unwrap());
    assert!(cash_cut::find_by_id(pool, cut.id).await.unwrap().is_none());
}

#[tokio::test]
async fn file_backed_database_opens_and_migrates() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("gym.db");
    let db = DbService::new(db_path.to_str().unwrap()).await.expect("open file db");

    let admin = seed_admin(&db.pool).await;
    let found = user::find_default_admin(&db.pool).await.unwrap().unwrap();
    assert_eq!(found.id, admin);
    assert_eq!(found.display_name(), "Luis Hernández");
}

#[tokio::test]
async fn expense_update_keeps_ledger_consistent() {
    let db = DbService::in_memory().await.expect("open db");
    let pool = &db.pool;
    let admin = seed_admin(pool).await;

    let e = expense::create(
        pool,
        ExpenseCreate {
            expense_date: DATE.into(),
            expense_type: "servicios".into(),
            description: "Agua".into(),
            amount: 80.0,
            receipt_number: None,
            notes: None,
            created_by: Some(admin),
        },
    )
    .await
    .unwrap();

    let updated = expense::update(
        pool,
        e.id,
        ExpenseUpdate {
            amount: Some(95.25),
            description: Some("Agua y drenaje".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.amount, 95.25);
    assert_eq!(updated.description, "Agua y drenaje");

    let summary = expense::daily_summary(pool, DATE).await.unwrap();
    assert_eq!(summary.total_amount, 95.25);
    assert_eq!(summary.total_expenses, 1);

    let breakdown = expense::type_breakdown(pool, DATE).await.unwrap();
    assert_eq!(breakdown.len(), 1);
    assert_eq!(breakdown[0].expense_type, "servicios");
    assert_eq!(breakdown[0].total, 95.25);
}
