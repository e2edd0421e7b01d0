//! Typed readers over the analytical views. Views are recomputed by
//! SQLite on every query; nothing here caches.

use super::DataStore;
use crate::{
    error::DataResult,
    features::{ChurnAnalysisRow, CustomerLtvRow, RiskCategory, RiskFeatureRow},
};
use rusqlite::{params, OptionalExtension};

impl DataStore {
    pub fn customer_ltv(&self) -> DataResult<Vec<CustomerLtvRow>> {
        let mut stmt = self.conn().prepare(
            "SELECT customer_id, name, customer_segment, signup_date,
                    subscription_count, total_revenue, avg_monthly_charges,
                    last_churn_date, current_status, tenure_days
             FROM customer_ltv ORDER BY customer_id",
        )?;
        let rows = stmt.query_map([], ltv_row_mapper)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn customer_ltv_for(&self, customer_id: &str) -> DataResult<Option<CustomerLtvRow>> {
        let mut stmt = self.conn().prepare(
            "SELECT customer_id, name, customer_segment, signup_date,
                    subscription_count, total_revenue, avg_monthly_charges,
                    last_churn_date, current_status, tenure_days
             FROM customer_ltv WHERE customer_id = ?1",
        )?;
        let row = stmt
            .query_row(params![customer_id], ltv_row_mapper)
            .optional()?;
        Ok(row)
    }

    pub fn churn_analysis(&self) -> DataResult<Vec<ChurnAnalysisRow>> {
        let mut stmt = self.conn().prepare(
            "SELECT customer_segment, total_customers, churned_customers,
                    churn_rate_pct, avg_ltv, avg_tenure_days
             FROM churn_analysis ORDER BY customer_segment",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(ChurnAnalysisRow {
                customer_segment: row.get(0)?,
                total_customers: row.get(1)?,
                churned_customers: row.get(2)?,
                churn_rate_pct: row.get(3)?,
                avg_ltv: row.get(4)?,
                avg_tenure_days: row.get(5)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn customer_risk_features(&self) -> DataResult<Vec<RiskFeatureRow>> {
        let mut stmt = self.conn().prepare(
            "SELECT customer_id, customer_segment, age, subscription_count,
                    avg_monthly_charges, total_spent, has_churned,
                    has_paperless_billing, avg_data_usage_gb, avg_satisfaction,
                    total_support_tickets, failed_payments_count, avg_late_fees,
                    risk_category
             FROM customer_risk_features ORDER BY customer_id",
        )?;
        let rows = stmt.query_map([], risk_row_mapper)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn risk_features_for(&self, customer_id: &str) -> DataResult<Option<RiskFeatureRow>> {
        let mut stmt = self.conn().prepare(
            "SELECT customer_id, customer_segment, age, subscription_count,
                    avg_monthly_charges, total_spent, has_churned,
                    has_paperless_billing, avg_data_usage_gb, avg_satisfaction,
                    total_support_tickets, failed_payments_count, avg_late_fees,
                    risk_category
             FROM customer_risk_features WHERE customer_id = ?1",
        )?;
        let row = stmt
            .query_row(params![customer_id], risk_row_mapper)
            .optional()?;
        Ok(row)
    }
}

fn ltv_row_mapper(row: &rusqlite::Row<'_>) -> rusqlite::Result<CustomerLtvRow> {
    Ok(CustomerLtvRow {
        customer_id: row.get(0)?,
        name: row.get(1)?,
        customer_segment: row.get(2)?,
        signup_date: row.get(3)?,
        subscription_count: row.get(4)?,
        total_revenue: row.get(5)?,
        avg_monthly_charges: row.get(6)?,
        last_churn_date: row.get(7)?,
        current_status: row.get(8)?,
        tenure_days: row.get(9)?,
    })
}

fn risk_row_mapper(row: &rusqlite::Row<'_>) -> rusqlite::Result<RiskFeatureRow> {
    let label: String = row.get(13)?;
    let risk_category = RiskCategory::from_label(&label).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            13,
            rusqlite::types::Type::Text,
            format!("unknown risk category: {label}").into(),
        )
    })?;
    Ok(RiskFeatureRow {
        customer_id: row.get(0)?,
        customer_segment: row.get(1)?,
        age: row.get(2)?,
        subscription_count: row.get(3)?,
        avg_monthly_charges: row.get(4)?,
        total_spent: row.get(5)?,
        has_churned: row.get(6)?,
        has_paperless_billing: row.get::<_, i32>(7)? != 0,
        avg_data_usage_gb: row.get(8)?,
        avg_satisfaction: row.get(9)?,
        total_support_tickets: row.get(10)?,
        failed_payments_count: row.get(11)?,
        avg_late_fees: row.get(12)?,
        risk_category,
    })
}
