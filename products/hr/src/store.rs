use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use entity::employee::{self, EmployeeType, Status};
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, DbBackend, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, SqlErr,
};
use thiserror::Error;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::model::{Employee, EmployeeFields, EmployeeFilter, EmployeeStats};
use crate::validate::{FieldErrors, Validated, candidate_email, validate};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("employee not found")]
    NotFound,
    #[error("employee failed validation")]
    Validation(FieldErrors),
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

pub type StoreResult<T> = Result<T, StoreError>;

const DUPLICATE_EMAIL: &str = "Email already exists";

/// Employee persistence backed by any sea-orm connection (PostgreSQL or SQLite).
#[derive(Clone)]
pub struct EmployeeStore {
    db: Arc<DatabaseConnection>,
}

impl EmployeeStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Records matching every supplied filter, newest first.
    #[instrument(name = "hr.employees.list", skip_all)]
    pub async fn list(&self, filter: &EmployeeFilter) -> StoreResult<Vec<Employee>> {
        let mut query = employee::Entity::find();
        if let Some(status) = present(&filter.status) {
            // An out-of-set value can never be stored, so nothing matches it.
            let Some(status) = Status::parse(status) else {
                return Ok(Vec::new());
            };
            query = query.filter(employee::Column::Status.eq(status));
        }
        if let Some(department) = present(&filter.department) {
            query = query.filter(employee::Column::Department.eq(department));
        }
        if let Some(employee_type) = present(&filter.employee_type) {
            let Some(employee_type) = EmployeeType::parse(employee_type) else {
                return Ok(Vec::new());
            };
            query = query.filter(employee::Column::EmployeeType.eq(employee_type));
        }
        let rows = query
            .order_by_desc(employee::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;
        debug!(count = rows.len(), "employees listed");
        Ok(rows.into_iter().map(Employee::from).collect())
    }

    /// Case-insensitive substring match over name, email, position and department.
    #[instrument(name = "hr.employees.search", skip(self))]
    pub async fn search(&self, query: &str) -> StoreResult<Vec<Employee>> {
        let needle = query.trim().to_lowercase();
        let mut select = employee::Entity::find().order_by_desc(employee::Column::CreatedAt);
        // SQLite's lower() and LIKE only fold ASCII, so matching happens here instead.
        let fold_in_process = self.db.get_database_backend() == DbBackend::Sqlite;
        if !needle.is_empty() && !fold_in_process {
            let pattern = format!("%{}%", escape_like(&needle));
            let condition = SEARCHED_COLUMNS
                .into_iter()
                .fold(Condition::any(), |condition, column| {
                    condition.add(
                        Expr::expr(Func::lower(Expr::col(column)))
                            .like(LikeExpr::new(pattern.clone()).escape('\\')),
                    )
                });
            select = select.filter(condition);
        }
        let rows = select.all(self.db.as_ref()).await?;
        Ok(rows
            .into_iter()
            .filter(|row| !fold_in_process || matches_needle(row, &needle))
            .map(Employee::from)
            .collect())
    }

    #[instrument(name = "hr.employees.get", skip(self))]
    pub async fn get(&self, id: Uuid) -> StoreResult<Employee> {
        self.find_model(id).await.map(Employee::from)
    }

    #[instrument(name = "hr.employees.create", skip_all)]
    pub async fn create(&self, fields: EmployeeFields) -> StoreResult<Employee> {
        let valid = self.validate_unique(None, &fields).await?;
        let now: DateTime<FixedOffset> = Utc::now().into();
        let model = employee::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(valid.name),
            email: Set(valid.email),
            phone: Set(valid.phone),
            position: Set(valid.position),
            department: Set(valid.department),
            status: Set(valid.status),
            hire_date: Set(valid.hire_date.unwrap_or(now)),
            employee_type: Set(valid.employee_type),
            address: Set(valid.address),
            profile_pic: Set(valid.profile_pic),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.db.as_ref())
        .await
        .map_err(write_error)?;
        info!(employee_id = %model.id, "employee created");
        Ok(model.into())
    }

    /// Merge `fields` over the stored record; absent fields are left untouched.
    #[instrument(name = "hr.employees.update", skip(self, fields))]
    pub async fn update(&self, id: Uuid, fields: EmployeeFields) -> StoreResult<Employee> {
        let existing = self.find_model(id).await?;
        let valid = self.validate_unique(Some(&existing), &fields).await?;
        let mut active: employee::ActiveModel = existing.into();
        active.name = Set(valid.name);
        active.email = Set(valid.email);
        active.phone = Set(valid.phone);
        active.position = Set(valid.position);
        active.department = Set(valid.department);
        active.status = Set(valid.status);
        if let Some(hire_date) = valid.hire_date {
            active.hire_date = Set(hire_date);
        }
        active.employee_type = Set(valid.employee_type);
        active.address = Set(valid.address);
        active.profile_pic = Set(valid.profile_pic);
        active.updated_at = Set(Utc::now().into());
        let model = active
            .update(self.db.as_ref())
            .await
            .map_err(write_error)?;
        info!(employee_id = %model.id, "employee updated");
        Ok(model.into())
    }

    #[instrument(name = "hr.employees.delete", skip(self))]
    pub async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let result = employee::Entity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await?;
        if result.rows_affected == 0 {
            return Err(StoreError::NotFound);
        }
        info!(employee_id = %id, "employee deleted");
        Ok(())
    }

    pub async fn count(&self) -> StoreResult<u64> {
        Ok(employee::Entity::find().count(self.db.as_ref()).await?)
    }

    /// Dashboard headline numbers plus the most recently created records.
    #[instrument(name = "hr.employees.stats", skip(self))]
    pub async fn stats(&self, recent: u64) -> StoreResult<EmployeeStats> {
        let total = self.count().await?;
        let active = employee::Entity::find()
            .filter(employee::Column::Status.eq(Status::Active))
            .count(self.db.as_ref())
            .await?;
        let recently_added = employee::Entity::find()
            .order_by_desc(employee::Column::CreatedAt)
            .limit(recent)
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(Employee::from)
            .collect();
        Ok(EmployeeStats {
            total_employees: total,
            active_employees: active,
            inactive_employees: total.saturating_sub(active),
            recently_added,
        })
    }

    async fn find_model(&self, id: Uuid) -> StoreResult<employee::Model> {
        employee::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(StoreError::NotFound)
    }

    /// Field rules plus the uniqueness check, reported together.
    async fn validate_unique(
        &self,
        existing: Option<&employee::Model>,
        fields: &EmployeeFields,
    ) -> StoreResult<Validated> {
        let mut outcome = validate(existing, fields);
        if let Some(email) = candidate_email(existing, fields)
            && self.email_taken(&email, existing.map(|m| m.id)).await?
        {
            outcome = match outcome {
                Ok(_) => Err(duplicate_email()),
                Err(mut errors) => {
                    errors.insert("email".into(), DUPLICATE_EMAIL.into());
                    Err(errors)
                }
            };
        }
        outcome.map_err(StoreError::Validation)
    }

    async fn email_taken(&self, email: &str, exclude: Option<Uuid>) -> StoreResult<bool> {
        let mut query = employee::Entity::find().filter(employee::Column::Email.eq(email));
        if let Some(id) = exclude {
            query = query.filter(employee::Column::Id.ne(id));
        }
        Ok(query.count(self.db.as_ref()).await? > 0)
    }
}

const SEARCHED_COLUMNS: [employee::Column; 4] = [
    employee::Column::Name,
    employee::Column::Email,
    employee::Column::Position,
    employee::Column::Department,
];

fn matches_needle(row: &employee::Model, needle: &str) -> bool {
    [&row.name, &row.email, &row.position, &row.department]
        .into_iter()
        .any(|value| value.to_lowercase().contains(needle))
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn duplicate_email() -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.insert("email".into(), DUPLICATE_EMAIL.into());
    errors
}

/// A racing writer can still trip the unique index after the pre-check passed.
fn write_error(err: DbErr) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => StoreError::Validation(duplicate_email()),
        _ => StoreError::Database(err),
    }
}
