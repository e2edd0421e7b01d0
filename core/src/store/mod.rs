//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database. Generator stages and
//! view consumers call store methods — they never execute SQL directly.

use crate::{
    config::ServiceConfig,
    customer_stage::CustomerRecord,
    error::DataResult,
    payment_stage::PaymentRecord,
    subscription_stage::SubscriptionRecord,
    usage_stage::UsageMetricRecord,
};
use rusqlite::{params, Connection, OptionalExtension};

mod features;

pub struct DataStore {
    conn: Connection,
    path: Option<String>, // None for :memory:, Some(path) for file
}

impl DataStore {
    pub fn open(path: &str) -> DataResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (:memory: ignores it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self {
            conn,
            path: Some(path.to_string()),
        })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> DataResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn, path: None })
    }

    /// Reopen a new connection to the same database. In-memory stores
    /// get a fresh, isolated database.
    pub fn reopen(&self) -> DataResult<Self> {
        match &self.path {
            Some(p) => Self::open(p),
            None => Self::in_memory(),
        }
    }

    /// Apply all schema migrations in order. Idempotent: every
    /// statement is IF NOT EXISTS so a re-run over a seeded database
    /// is safe.
    pub fn migrate(&self) -> DataResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_foundation.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/002_customers.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/003_services.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/004_subscriptions.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/005_usage_metrics.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/006_payments.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/007_analytics_views.sql"))?;
        Ok(())
    }

    // ── Seed run ───────────────────────────────────────────────

    pub fn insert_seed_run(
        &self,
        dataset_id: &str,
        seed: u64,
        customer_count: usize,
        version: &str,
    ) -> DataResult<()> {
        self.conn.execute(
            "INSERT INTO seed_run (dataset_id, seed, customer_count, version)
             VALUES (?1, ?2, ?3, ?4)",
            params![dataset_id, seed as i64, customer_count as i64, version],
        )?;
        Ok(())
    }

    pub fn latest_seed_run(&self) -> DataResult<Option<(String, u64)>> {
        let row = self
            .conn
            .query_row(
                "SELECT dataset_id, seed FROM seed_run
                 ORDER BY generated_at DESC LIMIT 1",
                [],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64)),
            )
            .optional()?;
        Ok(row)
    }

    // ── Services ───────────────────────────────────────────────

    pub fn insert_service(&self, s: &ServiceConfig) -> DataResult<()> {
        self.conn.execute(
            "INSERT INTO services (
                service_id, service_name, service_type,
                monthly_price, setup_fee, contract_length_months
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                &s.service_id,
                &s.service_name,
                &s.service_type,
                s.monthly_price,
                s.setup_fee,
                s.contract_length_months,
            ],
        )?;
        Ok(())
    }

    pub fn all_services(&self) -> DataResult<Vec<ServiceConfig>> {
        let mut stmt = self.conn.prepare(
            "SELECT service_id, service_name, service_type,
                    monthly_price, setup_fee, contract_length_months
             FROM services ORDER BY service_id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(ServiceConfig {
                service_id: row.get(0)?,
                service_name: row.get(1)?,
                service_type: row.get(2)?,
                monthly_price: row.get(3)?,
                setup_fee: row.get(4)?,
                contract_length_months: row.get(5)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    // ── Customers ──────────────────────────────────────────────

    /// Insert a customer. Returns false when the row was skipped
    /// because the email already exists — the only swallowed
    /// conflict; every other constraint violation is an error.
    pub fn insert_customer(&self, c: &CustomerRecord) -> DataResult<bool> {
        let changed = self.conn.execute(
            "INSERT INTO customers (
                customer_id, name, email, phone, age, gender,
                city, state, country, signup_date, customer_segment
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            ON CONFLICT(email) DO NOTHING",
            params![
                &c.customer_id,
                &c.name,
                &c.email,
                &c.phone,
                c.age,
                &c.gender,
                &c.city,
                &c.state,
                &c.country,
                c.signup_date,
                &c.customer_segment,
            ],
        )?;
        Ok(changed > 0)
    }

    pub fn all_customers(&self) -> DataResult<Vec<CustomerRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT customer_id, name, email, phone, age, gender,
                    city, state, country, signup_date, customer_segment
             FROM customers ORDER BY customer_id",
        )?;
        let rows = stmt.query_map([], customer_row_mapper)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn get_customer(&self, customer_id: &str) -> DataResult<Option<CustomerRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT customer_id, name, email, phone, age, gender,
                    city, state, country, signup_date, customer_segment
             FROM customers WHERE customer_id = ?1",
        )?;
        let row = stmt
            .query_row(params![customer_id], customer_row_mapper)
            .optional()?;
        Ok(row)
    }

    pub fn customer_count(&self) -> DataResult<i64> {
        self.count("SELECT COUNT(*) FROM customers")
    }

    pub fn segment_counts(&self) -> DataResult<Vec<(String, i64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT customer_segment, COUNT(*) FROM customers
             GROUP BY customer_segment ORDER BY customer_segment",
        )?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    // ── Subscriptions ──────────────────────────────────────────

    pub fn insert_subscription(&self, s: &SubscriptionRecord) -> DataResult<()> {
        self.conn.execute(
            "INSERT INTO subscriptions (
                subscription_id, customer_id, service_id, start_date, end_date,
                monthly_charges, total_charges, payment_method,
                paperless_billing, is_active, churn_date, churn_reason
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                &s.subscription_id,
                &s.customer_id,
                &s.service_id,
                s.start_date,
                s.end_date,
                s.monthly_charges,
                s.total_charges,
                &s.payment_method,
                if s.paperless_billing { 1 } else { 0 },
                if s.is_active { 1 } else { 0 },
                s.churn_date,
                s.churn_reason.as_deref(),
            ],
        )?;
        Ok(())
    }

    pub fn all_subscriptions(&self) -> DataResult<Vec<SubscriptionRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT subscription_id, customer_id, service_id, start_date, end_date,
                    monthly_charges, total_charges, payment_method,
                    paperless_billing, is_active, churn_date, churn_reason
             FROM subscriptions ORDER BY subscription_id",
        )?;
        let rows = stmt.query_map([], subscription_row_mapper)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn subscriptions_for(&self, customer_id: &str) -> DataResult<Vec<SubscriptionRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT subscription_id, customer_id, service_id, start_date, end_date,
                    monthly_charges, total_charges, payment_method,
                    paperless_billing, is_active, churn_date, churn_reason
             FROM subscriptions WHERE customer_id = ?1 ORDER BY subscription_id",
        )?;
        let rows = stmt.query_map(params![customer_id], subscription_row_mapper)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn subscription_count(&self) -> DataResult<i64> {
        self.count("SELECT COUNT(*) FROM subscriptions")
    }

    pub fn churned_subscription_count(&self) -> DataResult<i64> {
        self.count("SELECT COUNT(*) FROM subscriptions WHERE churn_date IS NOT NULL")
    }

    // ── Usage metrics ──────────────────────────────────────────

    pub fn insert_usage_metric(&self, u: &UsageMetricRecord) -> DataResult<()> {
        self.conn.execute(
            "INSERT INTO usage_metrics (
                customer_id, record_date, data_usage_gb, call_minutes,
                support_tickets, website_visits, app_logins, satisfaction_score
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                &u.customer_id,
                u.record_date,
                u.data_usage_gb,
                u.call_minutes,
                u.support_tickets,
                u.website_visits,
                u.app_logins,
                u.satisfaction_score,
            ],
        )?;
        Ok(())
    }

    pub fn usage_rows_for(&self, customer_id: &str) -> DataResult<Vec<UsageMetricRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT customer_id, record_date, data_usage_gb, call_minutes,
                    support_tickets, website_visits, app_logins, satisfaction_score
             FROM usage_metrics WHERE customer_id = ?1 ORDER BY record_date",
        )?;
        let rows = stmt.query_map(params![customer_id], |row| {
            Ok(UsageMetricRecord {
                customer_id: row.get(0)?,
                record_date: row.get(1)?,
                data_usage_gb: row.get(2)?,
                call_minutes: row.get(3)?,
                support_tickets: row.get(4)?,
                website_visits: row.get(5)?,
                app_logins: row.get(6)?,
                satisfaction_score: row.get(7)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn usage_metric_count(&self) -> DataResult<i64> {
        self.count("SELECT COUNT(*) FROM usage_metrics")
    }

    pub fn null_data_usage_count(&self) -> DataResult<i64> {
        self.count("SELECT COUNT(*) FROM usage_metrics WHERE data_usage_gb IS NULL")
    }

    // ── Payments ───────────────────────────────────────────────

    pub fn insert_payment(&self, p: &PaymentRecord) -> DataResult<()> {
        self.conn.execute(
            "INSERT INTO payments (customer_id, payment_date, amount, status, late_fee)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![&p.customer_id, p.payment_date, p.amount, &p.status, p.late_fee],
        )?;
        Ok(())
    }

    pub fn payments_for(&self, customer_id: &str) -> DataResult<Vec<PaymentRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT customer_id, payment_date, amount, status, late_fee
             FROM payments WHERE customer_id = ?1 ORDER BY payment_date",
        )?;
        let rows = stmt.query_map(params![customer_id], |row| {
            Ok(PaymentRecord {
                customer_id: row.get(0)?,
                payment_date: row.get(1)?,
                amount: row.get(2)?,
                status: row.get(3)?,
                late_fee: row.get(4)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn payment_count(&self) -> DataResult<i64> {
        self.count("SELECT COUNT(*) FROM payments")
    }

    pub fn payment_status_counts(&self) -> DataResult<Vec<(String, i64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT status, COUNT(*) FROM payments GROUP BY status ORDER BY status",
        )?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    // ── Internal ───────────────────────────────────────────────

    fn count(&self, sql: &str) -> DataResult<i64> {
        self.conn
            .query_row(sql, [], |row| row.get(0))
            .map_err(Into::into)
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }
}

fn customer_row_mapper(row: &rusqlite::Row<'_>) -> rusqlite::Result<CustomerRecord> {
    Ok(CustomerRecord {
        customer_id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        age: row.get(4)?,
        gender: row.get(5)?,
        city: row.get(6)?,
        state: row.get(7)?,
        country: row.get(8)?,
        signup_date: row.get(9)?,
        customer_segment: row.get(10)?,
    })
}

fn subscription_row_mapper(row: &rusqlite::Row<'_>) -> rusqlite::Result<SubscriptionRecord> {
    Ok(SubscriptionRecord {
        subscription_id: row.get(0)?,
        customer_id: row.get(1)?,
        service_id: row.get(2)?,
        start_date: row.get(3)?,
        end_date: row.get(4)?,
        monthly_charges: row.get(5)?,
        total_charges: row.get(6)?,
        payment_method: row.get(7)?,
        paperless_billing: row.get::<_, i32>(8)? != 0,
        is_active: row.get::<_, i32>(9)? != 0,
        churn_date: row.get(10)?,
        churn_reason: row.get(11)?,
    })
}
