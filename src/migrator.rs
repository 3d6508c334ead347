use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240115_000001_create_catalog_tables::Migration),
            Box::new(m20240115_000002_create_import_logs_table::Migration),
        ]
    }
}

// Migration implementations

mod m20240115_000001_create_catalog_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240115_000001_create_catalog_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Departments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Departments::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Departments::Name).string().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Categories::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Categories::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Categories::Title)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(Categories::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Products::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Products::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Products::Sku).string().not_null())
                        .col(ColumnDef::new(Products::Brand).string().not_null())
                        .col(ColumnDef::new(Products::DepartmentId).uuid().not_null())
                        .col(ColumnDef::new(Products::Title).string().not_null())
                        .col(
                            ColumnDef::new(Products::SupplierPrice)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Products::Price)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Products::Description).text())
                        .col(ColumnDef::new(Products::ImageUrl).string())
                        .col(ColumnDef::new(Products::CategoryId).uuid())
                        .col(
                            ColumnDef::new(Products::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Products::UpdatedAt).timestamp_with_time_zone())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_products_department")
                                .from(Products::Table, Products::DepartmentId)
                                .to(Departments::Table, Departments::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_products_category")
                                .from(Products::Table, Products::CategoryId)
                                .to(Categories::Table, Categories::Id),
                        )
                        .to_owned(),
                )
                .await?;

            // Natural key used by import upserts; conflicts on it are skipped
            manager
                .create_index(
                    Index::create()
                        .name("idx_products_sku_brand_department")
                        .table(Products::Table)
                        .col(Products::Sku)
                        .col(Products::Brand)
                        .col(Products::DepartmentId)
                        .unique()
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Products::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Categories::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Departments::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Departments {
        Table,
        Id,
        Name,
    }

    #[derive(Iden)]
    enum Categories {
        Table,
        Id,
        Title,
        CreatedAt,
    }

    #[derive(Iden)]
    enum Products {
        Table,
        Id,
        Sku,
        Brand,
        DepartmentId,
        Title,
        SupplierPrice,
        Price,
        Description,
        ImageUrl,
        CategoryId,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240115_000002_create_import_logs_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240115_000002_create_import_logs_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ImportLogs::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ImportLogs::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ImportLogs::ActorId).uuid().not_null())
                        .col(ColumnDef::new(ImportLogs::DepartmentId).uuid().not_null())
                        .col(ColumnDef::new(ImportLogs::FileName).string().not_null())
                        .col(
                            ColumnDef::new(ImportLogs::CreatedCount)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ImportLogs::UpdatedCount)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ImportLogs::SkippedCount)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ImportLogs::Message).text())
                        .col(
                            ColumnDef::new(ImportLogs::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ImportLogs::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum ImportLogs {
        Table,
        Id,
        ActorId,
        DepartmentId,
        FileName,
        CreatedCount,
        UpdatedCount,
        SkippedCount,
        Message,
        CreatedAt,
    }
}
