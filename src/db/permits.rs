use super::{insert_outcome, tables, InsertOutcome, Store, Table};
use crate::error::Result;
use crate::models::{Permit, RiskDistribution};

const PERMIT_COLUMNS: &str = "codigo, empresa, actividad, nombre, edad, dni, fecha_permiso, riesgo";

impl Store {
    /// Insert a company-submitted permit
    pub async fn insert_validation(&self, permit: &Permit) -> Result<InsertOutcome> {
        let outcome = self.insert_permit(tables::VALIDATIONS, permit).await?;
        if outcome == InsertOutcome::AlreadyExists {
            tracing::warn!("Permit code {} already registered", permit.code);
        }
        Ok(outcome)
    }

    /// Look up a permit by circulation code (zero or one rows)
    pub async fn query_validation(&self, code: i64) -> Result<Vec<Permit>> {
        self.query_permit(tables::VALIDATIONS, code).await
    }

    /// Mirror a looked-up permit into the check-in table
    pub async fn insert_entry(&self, permit: &Permit) -> Result<InsertOutcome> {
        let outcome = self.insert_permit(tables::ENTRIES, permit).await?;
        if outcome == InsertOutcome::AlreadyExists {
            tracing::info!("Permit code {} already checked in", permit.code);
        }
        Ok(outcome)
    }

    /// Look up a check-in by circulation code
    pub async fn query_entry(&self, code: i64) -> Result<Vec<Permit>> {
        self.query_permit(tables::ENTRIES, code).await
    }

    /// Permit count per risk category
    pub async fn aggregate_by_risk(&self) -> Result<RiskDistribution> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT riesgo, COUNT(dni) FROM validacion GROUP BY riesgo ORDER BY riesgo",
        )
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().collect())
    }

    /// Page through permits in insertion order; `limit == 0` means no limit
    pub async fn list_validations(&self, limit: u64, offset: u64) -> Result<Vec<Permit>> {
        // SQLite treats a negative LIMIT as unbounded
        let limit = if limit == 0 {
            -1
        } else {
            i64::try_from(limit).unwrap_or(i64::MAX)
        };
        let offset = i64::try_from(offset).unwrap_or(i64::MAX);

        let permits = sqlx::query_as::<_, Permit>(&format!(
            "SELECT {} FROM {} ORDER BY id LIMIT ? OFFSET ?",
            PERMIT_COLUMNS,
            tables::VALIDATIONS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool())
        .await?;

        Ok(permits)
    }

    async fn insert_permit(&self, table: Table, permit: &Permit) -> Result<InsertOutcome> {
        let sql = format!(
            "INSERT INTO {} ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            table, PERMIT_COLUMNS
        );

        let result = sqlx::query(&sql)
            .bind(permit.code)
            .bind(&permit.company)
            .bind(&permit.activity)
            .bind(&permit.person_name)
            .bind(permit.age)
            .bind(permit.national_id)
            .bind(&permit.issued_at)
            .bind(&permit.risk)
            .execute(self.pool())
            .await;

        insert_outcome(result)
    }

    async fn query_permit(&self, table: Table, code: i64) -> Result<Vec<Permit>> {
        let permits = sqlx::query_as::<_, Permit>(&format!(
            "SELECT {} FROM {} WHERE codigo = ?",
            PERMIT_COLUMNS, table
        ))
        .bind(code)
        .fetch_all(self.pool())
        .await?;

        Ok(permits)
    }
}
