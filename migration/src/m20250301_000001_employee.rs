use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Employee {
    Table,
    Id,
    Name,
    Email,
    Phone,
    Position,
    Department,
    Status,
    HireDate,
    EmployeeType,
    Address,
    ProfilePic,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Ids and timestamps are assigned by the application, so no backend-specific
/// defaults. Free text is unbounded; only the enum columns carry a length.
fn employee_table() -> TableCreateStatement {
    Table::create()
        .table(Employee::Table)
        .if_not_exists()
        .col(ColumnDef::new(Employee::Id).uuid().not_null().primary_key())
        .col(ColumnDef::new(Employee::Name).text().not_null())
        .col(ColumnDef::new(Employee::Email).text().not_null())
        .col(ColumnDef::new(Employee::Phone).text().not_null())
        .col(ColumnDef::new(Employee::Position).text().not_null())
        .col(ColumnDef::new(Employee::Department).text().not_null())
        .col(ColumnDef::new(Employee::Status).string_len(16).not_null())
        .col(
            ColumnDef::new(Employee::HireDate)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(ColumnDef::new(Employee::EmployeeType).string_len(16).not_null())
        .col(ColumnDef::new(Employee::Address).text().not_null())
        .col(ColumnDef::new(Employee::ProfilePic).text().not_null())
        .col(
            ColumnDef::new(Employee::CreatedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(
            ColumnDef::new(Employee::UpdatedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(employee_table()).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_employee_email")
                    .table(Employee::Table)
                    .col(Employee::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_employee_department")
                    .table(Employee::Table)
                    .col(Employee::Department)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_employee_created_at")
                    .table(Employee::Table)
                    .col(Employee::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Employee::Table).to_owned())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_enum_columns_are_length_bounded_on_postgres() {
        let sql = employee_table().to_string(PostgresQueryBuilder);
        assert_eq!(sql.matches("varchar").count(), 2, "{sql}");
        for column in ["name", "email", "phone", "position", "department", "address", "profile_pic"] {
            assert!(sql.contains(&format!("\"{column}\" text NOT NULL")), "{column}: {sql}");
        }
    }
}
