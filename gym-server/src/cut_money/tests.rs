use super::*;
use shared::models::{CashCut, ChannelTotals, CutStatus};

fn empty_cut() -> CashCut {
    CashCut {
        id: 1,
        cut_number: "CORTE-20260805-1754400000000".to_string(),
        cut_date: "2026-08-05".to_string(),
        status: CutStatus::Open,
        is_manual: true,
        pos_efectivo: 0.0,
        pos_transferencia: 0.0,
        pos_debito: 0.0,
        pos_credito: 0.0,
        pos_mixto: 0.0,
        pos_total: 0.0,
        pos_transactions: 0,
        pos_commissions: 0.0,
        abonos_efectivo: 0.0,
        abonos_transferencia: 0.0,
        abonos_debito: 0.0,
        abonos_credito: 0.0,
        abonos_mixto: 0.0,
        abonos_total: 0.0,
        abonos_transactions: 0,
        abonos_commissions: 0.0,
        membership_efectivo: 0.0,
        membership_transferencia: 0.0,
        membership_debito: 0.0,
        membership_credito: 0.0,
        membership_mixto: 0.0,
        membership_total: 0.0,
        membership_transactions: 0,
        membership_commissions: 0.0,
        total_efectivo: 0.0,
        total_transferencia: 0.0,
        total_debito: 0.0,
        total_credito: 0.0,
        total_mixto: 0.0,
        total_transactions: 0,
        total_commissions: 0.0,
        grand_total: 0.0,
        expenses_amount: 0.0,
        final_balance: 0.0,
        net_amount: 0.0,
        notes: None,
        created_by: Some(1),
        closed_by: None,
        closed_at: None,
        created_at: 1_754_400_000_000,
        updated_at: 1_754_400_000_000,
        creator_name: None,
    }
}

#[test]
fn test_to_decimal_precision() {
    // Classic floating point problem: 0.1 + 0.2 != 0.3
    let a = 0.1_f64;
    let b = 0.2_f64;
    let sum_f64 = a + b;

    // f64 fails
    assert_ne!(sum_f64, 0.3);

    // Decimal succeeds
    let sum_dec = to_decimal(a) + to_decimal(b);
    assert_eq!(to_f64(sum_dec), 0.3);
}

#[test]
fn test_accumulation_precision() {
    // Sum 0.01 one thousand times
    let mut total = Decimal::ZERO;
    for _ in 0..1000 {
        total += to_decimal(0.01);
    }
    assert_eq!(to_f64(total), 10.0);
}

#[test]
fn test_normalize_amount_degrades_to_zero() {
    assert_eq!(normalize_amount(f64::NAN), 0.0);
    assert_eq!(normalize_amount(f64::INFINITY), 0.0);
    assert_eq!(normalize_amount(f64::NEG_INFINITY), 0.0);
}

#[test]
fn test_normalize_amount_is_idempotent() {
    for v in [0.0, 100.0, 99.999, -45.5, 0.005, 123456.789, f64::NAN] {
        let once = normalize_amount(v);
        assert_eq!(normalize_amount(once), once);
    }
}

#[test]
fn test_normalize_amount_passes_negatives_through() {
    // Corrections/refunds: negatives are not clamped to zero
    assert_eq!(normalize_amount(-120.50), -120.50);
    assert_eq!(normalize_amount(-0.005), -0.01);
}

#[test]
fn test_channel_total_sums_all_five_buckets() {
    let amounts = shared::models::ChannelAmounts {
        efectivo: 100.0,
        transferencia: 50.0,
        debito: 25.25,
        credito: 10.10,
        mixto: 5.0,
    };
    assert_eq!(channel_total(&amounts), 190.35);
}

#[test]
fn test_final_balance_allows_negative() {
    assert_eq!(final_balance(370.0, 30.0), 340.0);
    // Expenses exceeding intake must not clamp to zero
    assert_eq!(final_balance(100.0, 250.0), -150.0);
}

#[test]
fn test_desync_boundary_is_strict() {
    // Within tolerance (0.005 and exactly 0.01): in sync
    assert!(!is_desynced(100.00, 100.005));
    assert!(!is_desynced(100.00, 100.01));
    // Beyond tolerance: desynced
    assert!(is_desynced(100.00, 100.02));
    assert!(is_desynced(100.02, 100.00));
}

#[test]
fn test_expense_desync_reports_both_figures() {
    let desync = expense_desync(500.0, 480.0).expect("should flag desync");
    assert_eq!(desync.cut_expenses, 500.0);
    assert_eq!(desync.real_expenses, 480.0);
    assert_eq!(desync.difference, 20.0);

    assert!(expense_desync(500.0, 500.0).is_none());
}

#[test]
fn test_recalculate_example_day() {
    // pos cash 100 + transfer 50, one layaway deposit of 20 cash,
    // one membership paid 200 by credit, 30 in expenses
    let mut cut = empty_cut();
    cut.pos_efectivo = 100.0;
    cut.pos_transferencia = 50.0;
    cut.abonos_efectivo = 20.0;
    cut.membership_credito = 200.0;
    cut.expenses_amount = 30.0;

    let r = recalculate(&cut);

    assert_eq!(r.pos_total, 150.0);
    assert_eq!(r.abonos_total, 20.0);
    assert_eq!(r.membership_total, 200.0);
    assert_eq!(r.total_efectivo, 120.0);
    assert_eq!(r.total_credito, 200.0);
    assert_eq!(r.grand_total, 370.0);
    assert_eq!(r.final_balance, 340.0);
    assert_eq!(r.net_amount, 340.0);
}

#[test]
fn test_totalizer_agrees_with_channel_aggregator() {
    let pos = shared::models::ChannelAmounts {
        efectivo: 123.45,
        transferencia: 67.89,
        debito: 10.01,
        credito: 0.99,
        mixto: 3.33,
    };
    let abonos = shared::models::ChannelAmounts {
        efectivo: 55.55,
        transferencia: 44.44,
        debito: 33.33,
        credito: 22.22,
        mixto: 11.11,
    };
    let membership = shared::models::ChannelAmounts {
        efectivo: 9.99,
        transferencia: 8.88,
        debito: 7.77,
        credito: 6.66,
        mixto: 5.55,
    };

    // Summing channel totals across channels must equal summing method
    // totals across methods
    let by_channel = grand_total(
        channel_total(&pos),
        channel_total(&abonos),
        channel_total(&membership),
    );
    let methods = [
        method_grand_total(pos.efectivo, abonos.efectivo, membership.efectivo),
        method_grand_total(pos.transferencia, abonos.transferencia, membership.transferencia),
        method_grand_total(pos.debito, abonos.debito, membership.debito),
        method_grand_total(pos.credito, abonos.credito, membership.credito),
        method_grand_total(pos.mixto, abonos.mixto, membership.mixto),
    ];
    let by_method = to_f64(methods.iter().map(|m| to_decimal(*m)).sum::<Decimal>());

    assert_eq!(by_channel, by_method);
    assert_eq!(by_channel, 411.17);
}

#[test]
fn test_total_commissions_sums_three_channels() {
    assert_eq!(total_commissions(15.50, 2.25, 7.00), 24.75);
    assert_eq!(total_commissions(f64::NAN, 2.25, 0.0), 2.25);
}

#[test]
fn test_recalculate_channel_method_cross_consistency() {
    // Arbitrary figures in all 15 buckets: summing channel totals and
    // summing method totals must agree with grand_total to the cent.
    let mut cut = empty_cut();
    cut.pos_efectivo = 123.45;
    cut.pos_transferencia = 67.89;
    cut.pos_debito = 10.01;
    cut.pos_credito = 0.99;
    cut.pos_mixto = 3.33;
    cut.abonos_efectivo = 55.55;
    cut.abonos_transferencia = 44.44;
    cut.abonos_debito = 33.33;
    cut.abonos_credito = 22.22;
    cut.abonos_mixto = 11.11;
    cut.membership_efectivo = 9.99;
    cut.membership_transferencia = 8.88;
    cut.membership_debito = 7.77;
    cut.membership_credito = 6.66;
    cut.membership_mixto = 5.55;

    let r = recalculate(&cut);

    let by_channel = to_decimal(r.pos_total) + to_decimal(r.abonos_total)
        + to_decimal(r.membership_total);
    let by_method = to_decimal(r.total_efectivo)
        + to_decimal(r.total_transferencia)
        + to_decimal(r.total_debito)
        + to_decimal(r.total_credito)
        + to_decimal(r.total_mixto);

    assert_eq!(to_f64(by_channel), r.grand_total);
    assert_eq!(to_f64(by_method), r.grand_total);
}

#[test]
fn test_recalculate_overwrites_stale_derived_fields() {
    let mut cut = empty_cut();
    cut.pos_efectivo = 100.0;
    // Tampered/stale totals on the input are ignored and overwritten
    cut.pos_total = 9999.0;
    cut.grand_total = -1.0;
    cut.total_efectivo = 42.0;
    cut.final_balance = 77.7;

    let r = recalculate(&cut);
    assert_eq!(r.pos_total, 100.0);
    assert_eq!(r.grand_total, 100.0);
    assert_eq!(r.total_efectivo, 100.0);
    assert_eq!(r.final_balance, 100.0);
}

#[test]
fn test_recalculate_degrades_non_finite_input_to_zero() {
    let mut cut = empty_cut();
    cut.pos_efectivo = f64::NAN;
    cut.abonos_credito = f64::INFINITY;
    cut.membership_efectivo = 50.0;

    let r = recalculate(&cut);
    assert_eq!(r.pos_efectivo, 0.0);
    assert_eq!(r.abonos_credito, 0.0);
    assert_eq!(r.grand_total, 50.0);
}

#[test]
fn test_recalculate_sums_counts_and_commissions() {
    let mut cut = empty_cut();
    cut.pos_transactions = 12;
    cut.abonos_transactions = 3;
    cut.membership_transactions = 5;
    cut.pos_commissions = 15.50;
    cut.abonos_commissions = 2.25;
    cut.membership_commissions = 7.00;

    let r = recalculate(&cut);
    assert_eq!(r.total_transactions, 20);
    assert_eq!(r.total_commissions, 24.75);
}

#[test]
fn test_build_update_payload_is_deterministic() {
    let mut cut = empty_cut();
    cut.pos_efectivo = 333.33;
    cut.abonos_transferencia = 150.0;
    cut.membership_debito = 89.90;
    cut.expenses_amount = 120.0;

    let first = build_update_payload(&cut);
    let second = build_update_payload(&cut);
    assert_eq!(first, second);
}

#[test]
fn test_build_update_payload_is_a_fixed_point() {
    let mut cut = empty_cut();
    cut.pos_efectivo = 250.10;
    cut.abonos_credito = 99.99;
    cut.expenses_amount = 75.0;

    let payload = build_update_payload(&cut);

    // Feed the payload's figures back through a cut: nothing may change
    let mut roundtrip = empty_cut();
    roundtrip.pos_efectivo = payload.pos_efectivo;
    roundtrip.abonos_credito = payload.abonos_credito;
    roundtrip.expenses_amount = payload.expenses_amount;
    roundtrip.pos_total = payload.pos_total;
    roundtrip.grand_total = payload.grand_total;
    roundtrip.final_balance = payload.final_balance;

    let again = build_update_payload(&roundtrip);
    assert_eq!(payload, again);
}

#[test]
fn test_build_update_payload_always_emits_mixto() {
    // A record that never carried mixto figures still persists explicit
    // zeros for every mixto-derived output
    let cut = empty_cut();
    let payload = build_update_payload(&cut);
    assert_eq!(payload.pos_mixto, 0.0);
    assert_eq!(payload.abonos_mixto, 0.0);
    assert_eq!(payload.membership_mixto, 0.0);
    assert_eq!(payload.total_mixto, 0.0);
}

#[test]
fn test_daily_totals_cross_channel() {
    let pos = ChannelTotals {
        efectivo: 100.0,
        transferencia: 50.0,
        total: 150.0,
        transactions: 4,
        commissions: 5.0,
        ..Default::default()
    };
    let abonos = ChannelTotals {
        efectivo: 20.0,
        total: 20.0,
        transactions: 1,
        ..Default::default()
    };
    let memberships = ChannelTotals {
        credito: 200.0,
        total: 200.0,
        transactions: 1,
        commissions: 7.0,
        ..Default::default()
    };

    let totals = daily_totals(&pos, &abonos, &memberships);
    assert_eq!(totals.efectivo, 120.0);
    assert_eq!(totals.credito, 200.0);
    assert_eq!(totals.total, 370.0);
    assert_eq!(totals.transactions, 6);
    assert_eq!(totals.commissions, 12.0);
    assert_eq!(totals.net_amount, 358.0);
}

#[test]
fn test_channel_accumulator_buckets_by_method() {
    let mut acc = ChannelAccumulator::new();
    acc.count_transaction();
    acc.add_gross("efectivo", 100.0, 0.0);
    acc.add_gross("credito", 200.0, 6.0);
    acc.add_commission(6.0);
    acc.count_transaction();
    acc.add_gross("transferencia", 50.0, 0.0);

    let totals = acc.finish();
    assert_eq!(totals.efectivo, 100.0);
    assert_eq!(totals.credito, 206.0);
    assert_eq!(totals.transferencia, 50.0);
    assert_eq!(totals.total, 356.0);
    assert_eq!(totals.transactions, 2);
    assert_eq!(totals.commissions, 6.0);
}

#[test]
fn test_channel_accumulator_folds_unknown_methods_into_cash() {
    let mut acc = ChannelAccumulator::new();
    acc.add_gross("tarjeta_regalo", 30.0, 0.0);
    acc.add_flat("", 15.0);

    let totals = acc.finish();
    assert_eq!(totals.efectivo, 45.0);
    assert_eq!(totals.total, 45.0);
}
