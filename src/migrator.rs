use anyhow::Result;
use sea_orm::{ConnectOptions, Database, DbBackend};
use sea_orm_migration::prelude::*;
use std::time::Duration;
use tracing::{error, info};

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users_table::Migration),
            Box::new(m20240101_000002_create_customers_table::Migration),
            Box::new(m20240101_000003_create_material_tables::Migration),
            Box::new(m20240101_000004_create_machinery_tables::Migration),
            Box::new(m20240101_000005_create_quotation_tables::Migration),
            Box::new(m20240315_000006_add_company_code_to_users::Migration),
        ]
    }
}

/// Audit columns shared by every table
#[derive(DeriveIden)]
enum Audit {
    CreatedAt,
    CreatedBy,
    UpdatedAt,
    UpdatedBy,
    DeletedAt,
    DeletedBy,
}

fn audit_columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::new(Audit::CreatedAt)
            .timestamp_with_time_zone()
            .not_null()
            .default(Expr::current_timestamp())
            .to_owned(),
        ColumnDef::new(Audit::CreatedBy).integer().not_null().to_owned(),
        ColumnDef::new(Audit::UpdatedAt)
            .timestamp_with_time_zone()
            .null()
            .to_owned(),
        ColumnDef::new(Audit::UpdatedBy).integer().null().to_owned(),
        ColumnDef::new(Audit::DeletedAt)
            .timestamp_with_time_zone()
            .null()
            .to_owned(),
        ColumnDef::new(Audit::DeletedBy).integer().null().to_owned(),
    ]
}

fn with_audit_columns(mut table: TableCreateStatement) -> TableCreateStatement {
    for column in audit_columns() {
        table.col(column);
    }
    table
}

fn serial_id<T: IntoIden>(column: T) -> ColumnDef {
    ColumnDef::new(column)
        .integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

/// Nullable money or measure column. SQLite keeps these in a REAL column since
/// NUMERIC affinity folds whole values to INTEGER.
fn money_column<T: IntoIden>(manager: &SchemaManager, column: T) -> ColumnDef {
    let mut def = ColumnDef::new(column);
    match manager.get_database_backend() {
        DbBackend::Sqlite => def.double(),
        _ => def.decimal_len(10, 2),
    };
    def.null().to_owned()
}

// Migration implementations

mod m20240101_000001_create_users_table {

    use super::{serial_id, with_audit_columns};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let table = Table::create()
                .table(Users::Table)
                .if_not_exists()
                .col(serial_id(Users::Id))
                .col(ColumnDef::new(Users::UserName).string_len(100).not_null())
                .col(
                    ColumnDef::new(Users::Email)
                        .string_len(100)
                        .not_null()
                        .unique_key(),
                )
                .col(ColumnDef::new(Users::MobileNumber).string_len(15).null())
                .col(ColumnDef::new(Users::Password).string_len(255).not_null())
                .col(
                    ColumnDef::new(Users::Role)
                        .string_len(50)
                        .null()
                        .default("user"),
                )
                .col(ColumnDef::new(Users::Department).string_len(50).null())
                .col(
                    ColumnDef::new(Users::IsActive)
                        .boolean()
                        .not_null()
                        .default(true),
                )
                .to_owned();

            manager.create_table(with_audit_columns(table)).await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Users {
        Table,
        Id,
        UserName,
        Email,
        MobileNumber,
        Password,
        Role,
        Department,
        IsActive,
    }
}

mod m20240101_000002_create_customers_table {

    use super::{serial_id, with_audit_columns};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_customers_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let table = Table::create()
                .table(Customers::Table)
                .if_not_exists()
                .col(serial_id(Customers::Id))
                .col(
                    ColumnDef::new(Customers::CustomerName)
                        .string_len(255)
                        .not_null(),
                )
                .col(
                    ColumnDef::new(Customers::CustomerAbbr)
                        .string_len(6)
                        .not_null()
                        .unique_key(),
                )
                .col(ColumnDef::new(Customers::ContactPerson).string_len(255).null())
                .col(
                    ColumnDef::new(Customers::ContactPersonDesignation)
                        .string_len(255)
                        .null(),
                )
                .col(ColumnDef::new(Customers::Email).string_len(255).null())
                .col(ColumnDef::new(Customers::Phone).string_len(50).null())
                .col(ColumnDef::new(Customers::Address).text().null())
                .col(ColumnDef::new(Customers::Terms).text().null())
                .col(
                    ColumnDef::new(Customers::IsActive)
                        .boolean()
                        .not_null()
                        .default(true),
                )
                .to_owned();

            manager.create_table(with_audit_columns(table)).await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_customers_deleted_at")
                        .table(Customers::Table)
                        .col(Customers::DeletedAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Customers::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Customers {
        Table,
        Id,
        CustomerName,
        CustomerAbbr,
        ContactPerson,
        ContactPersonDesignation,
        Email,
        Phone,
        Address,
        Terms,
        IsActive,
        DeletedAt,
    }
}

mod m20240101_000003_create_material_tables {

    use super::{money_column, serial_id, with_audit_columns};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_material_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let materials = Table::create()
                .table(Materials::Table)
                .if_not_exists()
                .col(serial_id(Materials::Id))
                .col(
                    ColumnDef::new(Materials::MaterialName)
                        .string_len(255)
                        .not_null(),
                )
                .col(ColumnDef::new(Materials::MaterialGrade).string_len(100).null())
                .col(ColumnDef::new(Materials::Density).string_len(50).null())
                .col(ColumnDef::new(Materials::Unit).string_len(50).null())
                .col(money_column(manager, Materials::CurrentPrice))
                .col(ColumnDef::new(Materials::Description).text().null())
                .col(ColumnDef::new(Materials::Remark).text().null())
                .to_owned();
            manager.create_table(with_audit_columns(materials)).await?;

            let material_types = Table::create()
                .table(MaterialTypes::Table)
                .if_not_exists()
                .col(serial_id(MaterialTypes::Id))
                .col(
                    ColumnDef::new(MaterialTypes::TypeName)
                        .string_len(255)
                        .not_null(),
                )
                .col(ColumnDef::new(MaterialTypes::Description).text().null())
                .col(ColumnDef::new(MaterialTypes::Remark).text().null())
                .to_owned();
            manager
                .create_table(with_audit_columns(material_types))
                .await?;

            let links = Table::create()
                .table(MaterialTypeLinks::Table)
                .if_not_exists()
                .col(serial_id(MaterialTypeLinks::Id))
                .col(ColumnDef::new(MaterialTypeLinks::MaterialId).integer().null())
                .col(
                    ColumnDef::new(MaterialTypeLinks::MaterialTypeId)
                        .integer()
                        .null(),
                )
                .col(money_column(manager, MaterialTypeLinks::CurrentPrice))
                .col(ColumnDef::new(MaterialTypeLinks::Remark).text().null())
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_material_type_links_material_id")
                        .from(MaterialTypeLinks::Table, MaterialTypeLinks::MaterialId)
                        .to(Materials::Table, Materials::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_material_type_links_material_type_id")
                        .from(MaterialTypeLinks::Table, MaterialTypeLinks::MaterialTypeId)
                        .to(MaterialTypes::Table, MaterialTypes::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .to_owned();
            manager.create_table(with_audit_columns(links)).await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_material_type_links_material_id")
                        .table(MaterialTypeLinks::Table)
                        .col(MaterialTypeLinks::MaterialId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(MaterialTypeLinks::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(MaterialTypes::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Materials::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Materials {
        Table,
        Id,
        MaterialName,
        MaterialGrade,
        Density,
        Unit,
        CurrentPrice,
        Description,
        Remark,
    }

    #[derive(DeriveIden)]
    enum MaterialTypes {
        Table,
        Id,
        TypeName,
        Description,
        Remark,
    }

    #[derive(DeriveIden)]
    enum MaterialTypeLinks {
        Table,
        Id,
        MaterialId,
        MaterialTypeId,
        CurrentPrice,
        Remark,
    }
}

mod m20240101_000004_create_machinery_tables {

    use super::{money_column, serial_id, with_audit_columns};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_machinery_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let master = Table::create()
                .table(MachineryMaster::Table)
                .if_not_exists()
                .col(serial_id(MachineryMaster::Id))
                .col(ColumnDef::new(MachineryMaster::Name).string_len(255).not_null())
                .col(ColumnDef::new(MachineryMaster::MainCategoryId).integer().null())
                .col(ColumnDef::new(MachineryMaster::Description).text().null())
                .to_owned();
            manager.create_table(with_audit_columns(master)).await?;

            let subcategories = Table::create()
                .table(MachinerySubcategories::Table)
                .if_not_exists()
                .col(serial_id(MachinerySubcategories::Id))
                .col(
                    ColumnDef::new(MachinerySubcategories::CategoryId)
                        .integer()
                        .null(),
                )
                .col(
                    ColumnDef::new(MachinerySubcategories::SubcategoryName)
                        .string_len(255)
                        .not_null(),
                )
                .col(ColumnDef::new(MachinerySubcategories::Description).text().null())
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_machinery_subcategories_category_id")
                        .from(
                            MachinerySubcategories::Table,
                            MachinerySubcategories::CategoryId,
                        )
                        .to(MachineryMaster::Table, MachineryMaster::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .to_owned();
            manager
                .create_table(with_audit_columns(subcategories))
                .await?;

            let pricing = Table::create()
                .table(ProcessPricing::Table)
                .if_not_exists()
                .col(serial_id(ProcessPricing::Id))
                .col(ColumnDef::new(ProcessPricing::MaterialId).integer().null())
                .col(ColumnDef::new(ProcessPricing::ProcessId).integer().null())
                .col(money_column(manager, ProcessPricing::Minutes))
                .col(ColumnDef::new(ProcessPricing::Unit).string_len(50).null())
                .col(money_column(manager, ProcessPricing::Rate))
                .col(
                    ColumnDef::new(ProcessPricing::IsManualRate)
                        .boolean()
                        .not_null()
                        .default(false),
                )
                .col(ColumnDef::new(ProcessPricing::Note).text().null())
                .col(ColumnDef::new(ProcessPricing::Remark).text().null())
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_process_pricing_material_id")
                        .from(ProcessPricing::Table, ProcessPricing::MaterialId)
                        .to(Materials::Table, Materials::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_process_pricing_process_id")
                        .from(ProcessPricing::Table, ProcessPricing::ProcessId)
                        .to(MachinerySubcategories::Table, MachinerySubcategories::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .to_owned();
            manager.create_table(with_audit_columns(pricing)).await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ProcessPricing::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(MachinerySubcategories::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(MachineryMaster::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum MachineryMaster {
        Table,
        Id,
        Name,
        MainCategoryId,
        Description,
    }

    #[derive(DeriveIden)]
    enum MachinerySubcategories {
        Table,
        Id,
        CategoryId,
        SubcategoryName,
        Description,
    }

    #[derive(DeriveIden)]
    enum ProcessPricing {
        Table,
        Id,
        MaterialId,
        ProcessId,
        Minutes,
        Unit,
        Rate,
        IsManualRate,
        Note,
        Remark,
    }

    #[derive(DeriveIden)]
    enum Materials {
        Table,
        Id,
    }
}

mod m20240101_000005_create_quotation_tables {

    use super::{money_column, serial_id, with_audit_columns};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_quotation_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let quotations = Table::create()
                .table(Quotations::Table)
                .if_not_exists()
                .col(serial_id(Quotations::Id))
                .col(
                    ColumnDef::new(Quotations::QuotationNumber)
                        .string_len(100)
                        .not_null()
                        .unique_key(),
                )
                .col(
                    ColumnDef::new(Quotations::RevisionNumber)
                        .integer()
                        .not_null()
                        .default(0),
                )
                .col(ColumnDef::new(Quotations::CustomerId).integer().null())
                .col(ColumnDef::new(Quotations::CustomerName).string_len(255).null())
                .col(ColumnDef::new(Quotations::OurDrawingRef).string_len(100).null())
                .col(
                    ColumnDef::new(Quotations::CustomerDrawingRef)
                        .string_len(100)
                        .null(),
                )
                .col(ColumnDef::new(Quotations::DrawingDesc).text().null())
                .col(ColumnDef::new(Quotations::ContactPerson).string_len(100).null())
                .col(ColumnDef::new(Quotations::EnquiryNumber).string_len(100).null())
                .col(ColumnDef::new(Quotations::EnquiryDate).date().null())
                .col(ColumnDef::new(Quotations::QuotationDate).date().null())
                .col(ColumnDef::new(Quotations::ValidTill).date().null())
                .col(ColumnDef::new(Quotations::Currency).string_len(10).null())
                .col(
                    ColumnDef::new(Quotations::Status)
                        .string_len(50)
                        .not_null()
                        .default("Draft"),
                )
                .col(ColumnDef::new(Quotations::Remark).text().null())
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_quotations_customer_id")
                        .from(Quotations::Table, Quotations::CustomerId)
                        .to(Customers::Table, Customers::Id),
                )
                .to_owned();
            manager.create_table(with_audit_columns(quotations)).await?;

            let lines = Table::create()
                .table(QuotationLines::Table)
                .if_not_exists()
                .col(serial_id(QuotationLines::Id))
                .col(ColumnDef::new(QuotationLines::QuotationId).integer().not_null())
                .col(ColumnDef::new(QuotationLines::LineNumber).integer().null())
                .col(
                    ColumnDef::new(QuotationLines::DrawingDescription)
                        .string_len(255)
                        .null(),
                )
                .col(
                    ColumnDef::new(QuotationLines::DrawingNumber)
                        .string_len(100)
                        .null(),
                )
                .col(
                    ColumnDef::new(QuotationLines::MaterialGrade)
                        .string_len(100)
                        .null(),
                )
                .col(money_column(manager, QuotationLines::UnitPrice))
                .col(ColumnDef::new(QuotationLines::NoOfUnits).integer().null())
                .col(money_column(manager, QuotationLines::TotalPrice))
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_quotation_lines_quotation_id")
                        .from(QuotationLines::Table, QuotationLines::QuotationId)
                        .to(Quotations::Table, Quotations::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                        .on_update(ForeignKeyAction::Cascade),
                )
                .to_owned();
            manager.create_table(with_audit_columns(lines)).await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_quotation_lines_quotation_id")
                        .table(QuotationLines::Table)
                        .col(QuotationLines::QuotationId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_quotations_status")
                        .table(Quotations::Table)
                        .col(Quotations::Status)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(QuotationLines::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Quotations::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Quotations {
        Table,
        Id,
        QuotationNumber,
        RevisionNumber,
        CustomerId,
        CustomerName,
        OurDrawingRef,
        CustomerDrawingRef,
        DrawingDesc,
        ContactPerson,
        EnquiryNumber,
        EnquiryDate,
        QuotationDate,
        ValidTill,
        Currency,
        Status,
        Remark,
    }

    #[derive(DeriveIden)]
    enum QuotationLines {
        Table,
        Id,
        QuotationId,
        LineNumber,
        DrawingDescription,
        DrawingNumber,
        MaterialGrade,
        UnitPrice,
        NoOfUnits,
        TotalPrice,
    }

    #[derive(DeriveIden)]
    enum Customers {
        Table,
        Id,
    }
}

mod m20240315_000006_add_company_code_to_users {

    use crate::config::DEFAULT_COMPANY_CODE;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240315_000006_add_company_code_to_users"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Databases bootstrapped by older builds may already carry the column
            if manager.has_column("users", "company_code").await? {
                return Ok(());
            }

            manager
                .alter_table(
                    Table::alter()
                        .table(Users::Table)
                        .add_column(
                            ColumnDef::new(Users::CompanyCode)
                                .string_len(10)
                                .not_null()
                                .default(DEFAULT_COMPANY_CODE),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .alter_table(
                    Table::alter()
                        .table(Users::Table)
                        .drop_column(Users::CompanyCode)
                        .to_owned(),
                )
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Users {
        Table,
        CompanyCode,
    }
}

// Database migration CLI runner
pub async fn run_migration(db_url: &str) -> Result<()> {
    info!("Setting up database connection for migrations");

    let mut opt = ConnectOptions::new(db_url);
    opt.max_connections(5)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(30))
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(300))
        .sqlx_logging(true);

    let db = Database::connect(opt).await?;

    info!("Running database migrations");

    match Migrator::up(&db, None).await {
        Ok(_) => {
            info!("Migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            error!("Migration failed: {}", e);
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, Statement};

    async fn memory_db() -> DatabaseConnection {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).min_connections(1);
        Database::connect(opt).await.unwrap()
    }

    #[tokio::test]
    async fn bootstrap_is_idempotent_and_creates_every_table() {
        let db = memory_db().await;
        Migrator::up(&db, None).await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let manager = SchemaManager::new(&db);
        for table in [
            "users",
            "customers",
            "materials",
            "material_types",
            "material_type_links",
            "machinery_master",
            "machinery_subcategories",
            "process_pricing",
            "quotations",
            "quotation_lines",
        ] {
            assert!(manager.has_table(table).await.unwrap(), "missing {table}");
        }
        assert!(manager.has_column("users", "company_code").await.unwrap());
    }

    #[tokio::test]
    async fn company_code_defaults_for_existing_rows() {
        let db = memory_db().await;
        Migrator::up(&db, None).await.unwrap();

        db.execute_unprepared(
            "INSERT INTO users (user_name, email, password, created_by) \
             VALUES ('a', 'a@example.com', 'x', 0)",
        )
        .await
        .unwrap();

        let row = db
            .query_one(Statement::from_string(
                DbBackend::Sqlite,
                "SELECT company_code FROM users".to_string(),
            ))
            .await
            .unwrap()
            .unwrap();
        let code: String = row.try_get("", "company_code").unwrap();
        assert_eq!(code, crate::config::DEFAULT_COMPANY_CODE);
    }
}
