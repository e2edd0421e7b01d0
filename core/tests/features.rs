//! Derived view tests: customer_ltv, churn_analysis, and the
//! customer_risk_features contract. Fixtures are written through the
//! store with dates computed relative to the current date so the
//! views' sliding windows line up.

use chrono::{Duration, NaiveDate, Utc};
use churnlab_core::{
    config::ServiceConfig,
    customer_stage::CustomerRecord,
    engine::SeedEngine,
    features::RiskCategory,
    payment_stage::PaymentRecord,
    store::DataStore,
    subscription_stage::SubscriptionRecord,
    usage_stage::UsageMetricRecord,
};

fn store() -> DataStore {
    let store = DataStore::in_memory().unwrap();
    store.migrate().unwrap();
    store
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn seed_service(store: &DataStore) {
    store
        .insert_service(&ServiceConfig {
            service_id: "svc-test".into(),
            service_name: "Test Internet".into(),
            service_type: "Internet".into(),
            monthly_price: 50.0,
            setup_fee: 0.0,
            contract_length_months: 12,
        })
        .unwrap();
}

fn customer(store: &DataStore, id: &str, segment: &str, signup: NaiveDate) {
    store
        .insert_customer(&CustomerRecord {
            customer_id: id.into(),
            name: format!("Customer {id}"),
            email: format!("{id}@example.com"),
            phone: "(212) 555-0100".into(),
            age: 40,
            gender: "Female".into(),
            city: "Denver".into(),
            state: "CO".into(),
            country: "USA".into(),
            signup_date: signup,
            customer_segment: segment.into(),
        })
        .unwrap();
}

#[allow(clippy::too_many_arguments)]
fn subscription(
    store: &DataStore,
    id: &str,
    customer_id: &str,
    start: NaiveDate,
    churn: Option<NaiveDate>,
    monthly: f64,
    total: f64,
    paperless: bool,
) {
    store
        .insert_subscription(&SubscriptionRecord {
            subscription_id: id.into(),
            customer_id: customer_id.into(),
            service_id: "svc-test".into(),
            start_date: start,
            end_date: None,
            monthly_charges: monthly,
            total_charges: total,
            payment_method: "Credit Card".into(),
            paperless_billing: paperless,
            is_active: churn.is_none(),
            churn_date: churn,
            churn_reason: churn.map(|_| "Price too high".into()),
        })
        .unwrap();
}

fn usage(
    store: &DataStore,
    customer_id: &str,
    date: NaiveDate,
    satisfaction: i64,
    tickets: i64,
    data_gb: Option<f64>,
) {
    store
        .insert_usage_metric(&UsageMetricRecord {
            customer_id: customer_id.into(),
            record_date: date,
            data_usage_gb: data_gb,
            call_minutes: 100.0,
            support_tickets: tickets,
            website_visits: 10,
            app_logins: 20,
            satisfaction_score: satisfaction,
        })
        .unwrap();
}

fn payment(store: &DataStore, customer_id: &str, date: NaiveDate, status: &str, late_fee: f64) {
    store
        .insert_payment(&PaymentRecord {
            customer_id: customer_id.into(),
            payment_date: date,
            amount: 50.0,
            status: status.into(),
            late_fee,
        })
        .unwrap();
}

// ── customer_ltv ─────────────────────────────────────────────────────────────

#[test]
fn ltv_marks_churned_iff_any_churn_date_exists() {
    let store = store();
    seed_service(&store);
    let signup = today() - Duration::days(400);
    let churn = today() - Duration::days(100);

    customer(&store, "c-churned", "Premium", signup);
    subscription(&store, "s-1", "c-churned", signup, Some(churn), 50.0, 500.0, false);

    customer(&store, "c-active", "Premium", signup);
    subscription(&store, "s-2", "c-active", signup, None, 50.0, 650.0, false);

    let churned = store.customer_ltv_for("c-churned").unwrap().unwrap();
    assert_eq!(churned.current_status, "Churned");
    assert_eq!(churned.last_churn_date, Some(churn));
    assert_eq!(churned.tenure_days, 300, "tenure runs signup -> last churn");

    let active = store.customer_ltv_for("c-active").unwrap().unwrap();
    assert_eq!(active.current_status, "Active");
    assert_eq!(active.last_churn_date, None);
    let expected = (today() - signup).num_days();
    assert!(
        (active.tenure_days - expected).abs() <= 1,
        "tenure {} vs {expected} (signup -> now)",
        active.tenure_days
    );
}

#[test]
fn ltv_aggregates_multiple_subscriptions() {
    let store = store();
    seed_service(&store);
    let signup = today() - Duration::days(500);
    let churn = today() - Duration::days(50);

    customer(&store, "c-multi", "Standard", signup);
    subscription(&store, "s-1", "c-multi", signup, Some(churn), 40.0, 400.0, false);
    subscription(&store, "s-2", "c-multi", signup, None, 60.0, 900.0, true);

    let row = store.customer_ltv_for("c-multi").unwrap().unwrap();
    assert_eq!(row.subscription_count, 2);
    assert!((row.total_revenue - 1300.0).abs() < 1e-9);
    assert!((row.avg_monthly_charges - 50.0).abs() < 1e-9);
    // One churned subscription is enough to flip the status.
    assert_eq!(row.current_status, "Churned");
    assert_eq!(row.last_churn_date, Some(churn));
}

#[test]
fn ltv_defaults_for_a_customer_with_no_subscriptions() {
    let store = store();
    customer(&store, "c-empty", "Basic", today() - Duration::days(90));

    let row = store.customer_ltv_for("c-empty").unwrap().unwrap();
    assert_eq!(row.subscription_count, 0);
    assert_eq!(row.total_revenue, 0.0);
    assert_eq!(row.avg_monthly_charges, 0.0);
    assert_eq!(row.current_status, "Active");
    assert!((row.tenure_days - 90).abs() <= 1);
}

// ── churn_analysis ───────────────────────────────────────────────────────────

#[test]
fn churn_analysis_rolls_up_per_segment() {
    let store = store();
    seed_service(&store);
    let signup = today() - Duration::days(200);
    let churn = today() - Duration::days(60);

    customer(&store, "c-p1", "Premium", signup);
    subscription(&store, "s-p1", "c-p1", signup, Some(churn), 50.0, 200.0, false);
    customer(&store, "c-p2", "Premium", signup);
    subscription(&store, "s-p2", "c-p2", signup, None, 50.0, 300.0, false);

    for i in 0..3 {
        let id = format!("c-b{i}");
        customer(&store, &id, "Basic", signup);
        subscription(&store, &format!("s-b{i}"), &id, signup, None, 30.0, 180.0, false);
    }

    let rows = store.churn_analysis().unwrap();
    assert_eq!(rows.len(), 2);

    let premium = rows.iter().find(|r| r.customer_segment == "Premium").unwrap();
    assert_eq!(premium.total_customers, 2);
    assert_eq!(premium.churned_customers, 1);
    assert!((premium.churn_rate_pct - 50.0).abs() < 1e-9);
    assert!((premium.avg_ltv - 250.0).abs() < 1e-9);

    let basic = rows.iter().find(|r| r.customer_segment == "Basic").unwrap();
    assert_eq!(basic.total_customers, 3);
    assert_eq!(basic.churned_customers, 0);
    assert_eq!(basic.churn_rate_pct, 0.0);
    assert!((basic.avg_ltv - 180.0).abs() < 1e-9);
}

#[test]
fn churn_analysis_agrees_with_ltv_statuses() {
    let mut engine = SeedEngine::build_test(42).unwrap();
    engine.run().unwrap();
    let store = engine.store();

    let ltv = store.customer_ltv().unwrap();
    for row in store.churn_analysis().unwrap() {
        let segment: Vec<_> = ltv
            .iter()
            .filter(|l| l.customer_segment == row.customer_segment)
            .collect();
        let churned = segment.iter().filter(|l| l.current_status == "Churned").count() as i64;
        assert_eq!(row.total_customers, segment.len() as i64);
        assert_eq!(row.churned_customers, churned);
        let pct = 100.0 * churned as f64 / segment.len() as f64;
        let expected_pct = (pct * 100.0).round() / 100.0;
        assert!(
            (row.churn_rate_pct - expected_pct).abs() < 0.01,
            "segment {}: {} vs {}",
            row.customer_segment,
            row.churn_rate_pct,
            expected_pct
        );
    }
}

// ── customer_risk_features ───────────────────────────────────────────────────

#[test]
fn high_risk_requires_low_satisfaction_and_tickets() {
    // Churned subscription, satisfaction {2,3,4} over the last
    // 3 months, 4 support tickets -> High Risk.
    let store = store();
    seed_service(&store);
    let signup = today() - Duration::days(300);

    customer(&store, "c-high", "Standard", signup);
    subscription(
        &store,
        "s-high",
        "c-high",
        signup,
        Some(today() - Duration::days(5)),
        50.0,
        500.0,
        false,
    );
    usage(&store, "c-high", today() - Duration::days(10), 2, 2, Some(10.0));
    usage(&store, "c-high", today() - Duration::days(40), 3, 1, Some(12.0));
    usage(&store, "c-high", today() - Duration::days(70), 4, 1, Some(9.0));

    let row = store.risk_features_for("c-high").unwrap().unwrap();
    assert!((row.avg_satisfaction - 3.0).abs() < 1e-9);
    assert_eq!(row.total_support_tickets, 4);
    assert_eq!(row.has_churned, 1);
    assert_eq!(row.risk_category, RiskCategory::High);
}

#[test]
fn customer_with_no_history_gets_null_safe_defaults_and_low_risk() {
    // No subscriptions, no usage, no payments. Every feature column
    // still materializes, from defaults alone.
    let store = store();
    customer(&store, "c-none", "Basic", today() - Duration::days(30));

    let row = store.risk_features_for("c-none").unwrap().unwrap();
    assert_eq!(row.subscription_count, 0);
    assert_eq!(row.avg_monthly_charges, 0.0);
    assert_eq!(row.total_spent, 0.0);
    assert_eq!(row.has_churned, 0);
    assert!(!row.has_paperless_billing);
    assert_eq!(row.avg_data_usage_gb, 0.0);
    assert_eq!(row.avg_satisfaction, 7.0, "neutral satisfaction default");
    assert_eq!(row.total_support_tickets, 0);
    assert_eq!(row.failed_payments_count, 0);
    assert_eq!(row.avg_late_fees, 0.0);
    assert_eq!(row.risk_category, RiskCategory::Low);
}

#[test]
fn medium_risk_via_satisfaction_alone() {
    // Average satisfaction 6.5, no failed payments.
    let store = store();
    customer(&store, "c-mid", "Standard", today() - Duration::days(200));
    usage(&store, "c-mid", today() - Duration::days(15), 6, 0, Some(20.0));
    usage(&store, "c-mid", today() - Duration::days(45), 7, 0, Some(25.0));

    let row = store.risk_features_for("c-mid").unwrap().unwrap();
    assert!((row.avg_satisfaction - 6.5).abs() < 1e-9);
    assert_eq!(row.failed_payments_count, 0);
    assert_eq!(row.risk_category, RiskCategory::Medium);
}

#[test]
fn medium_risk_via_failed_payments_alone() {
    let store = store();
    customer(&store, "c-fail", "Premium", today() - Duration::days(200));
    usage(&store, "c-fail", today() - Duration::days(15), 9, 0, Some(20.0));
    payment(&store, "c-fail", today() - Duration::days(20), "Failed", 0.0);
    payment(&store, "c-fail", today() - Duration::days(50), "Failed", 2.5);
    payment(&store, "c-fail", today() - Duration::days(80), "Success", 0.0);

    let row = store.risk_features_for("c-fail").unwrap().unwrap();
    assert_eq!(row.failed_payments_count, 2, "counts Failed only");
    assert!((row.avg_satisfaction - 9.0).abs() < 1e-9);
    assert_eq!(row.risk_category, RiskCategory::Medium);
    let expected_late = (0.0 + 2.5 + 0.0) / 3.0;
    assert!((row.avg_late_fees - expected_late).abs() < 1e-9);
}

#[test]
fn usage_window_slides_with_query_time() {
    // Old misery outside the 3-month window must not leak in.
    let store = store();
    customer(&store, "c-slide", "Basic", today() - Duration::days(400));
    usage(&store, "c-slide", today() - Duration::days(120), 1, 5, Some(5.0));
    usage(&store, "c-slide", today() - Duration::days(150), 1, 5, Some(5.0));
    usage(&store, "c-slide", today() - Duration::days(10), 9, 0, Some(30.0));

    let row = store.risk_features_for("c-slide").unwrap().unwrap();
    assert!((row.avg_satisfaction - 9.0).abs() < 1e-9, "only the recent row counts");
    assert_eq!(row.total_support_tickets, 0);
    assert_eq!(row.risk_category, RiskCategory::Low);
}

#[test]
fn all_null_data_usage_in_window_still_defaults_to_zero() {
    let store = store();
    customer(&store, "c-nulls", "Basic", today() - Duration::days(100));
    usage(&store, "c-nulls", today() - Duration::days(10), 8, 0, None);
    usage(&store, "c-nulls", today() - Duration::days(40), 8, 0, None);

    let row = store.risk_features_for("c-nulls").unwrap().unwrap();
    assert_eq!(row.avg_data_usage_gb, 0.0);
    assert!((row.avg_satisfaction - 8.0).abs() < 1e-9);
}

#[test]
fn paperless_flag_surfaces_from_any_subscription() {
    let store = store();
    seed_service(&store);
    let signup = today() - Duration::days(300);
    customer(&store, "c-paperless", "Premium", signup);
    subscription(&store, "s-pl1", "c-paperless", signup, None, 50.0, 500.0, false);
    subscription(&store, "s-pl2", "c-paperless", signup, None, 60.0, 600.0, true);

    let row = store.risk_features_for("c-paperless").unwrap().unwrap();
    assert!(row.has_paperless_billing);
    assert_eq!(row.subscription_count, 2);
    assert!((row.total_spent - 1100.0).abs() < 1e-9);
    assert!((row.avg_monthly_charges - 55.0).abs() < 1e-9);
}

#[test]
fn generated_dataset_matches_the_rust_side_classifier() {
    let mut engine = SeedEngine::build_test(77).unwrap();
    engine.run().unwrap();
    let store = engine.store();

    let rows = store.customer_risk_features().unwrap();
    assert_eq!(rows.len() as i64, store.customer_count().unwrap());

    for row in rows {
        let expected = RiskCategory::classify(
            row.avg_satisfaction,
            row.total_support_tickets,
            row.failed_payments_count,
        );
        assert_eq!(
            row.risk_category, expected,
            "customer {}: view and classifier disagree",
            row.customer_id
        );
        assert!((1.0..=10.0).contains(&row.avg_satisfaction) || row.avg_satisfaction == 7.0);
    }
}
