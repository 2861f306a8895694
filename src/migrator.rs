use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_planes_table::Migration),
            Box::new(m20240101_000002_create_features_table::Migration),
            Box::new(m20240101_000003_create_contact_submissions_table::Migration),
        ]
    }
}

mod m20240101_000001_create_planes_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_planes_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Planes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Planes::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Planes::Nombre)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Planes::Precio).decimal().not_null())
                        .col(ColumnDef::new(Planes::Descripcion).string().null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Planes::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Planes {
        Table,
        Id,
        Nombre,
        Precio,
        Descripcion,
    }
}

mod m20240101_000002_create_features_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_features_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Features::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Features::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Features::Nombre)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Features::Precio).decimal().not_null())
                        .col(ColumnDef::new(Features::Descripcion).string().null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Features::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Features {
        Table,
        Id,
        Nombre,
        Precio,
        Descripcion,
    }
}

mod m20240101_000003_create_contact_submissions_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_contact_submissions_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ContactSubmissions::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ContactSubmissions::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(ContactSubmissions::Name).string().not_null())
                        .col(
                            ColumnDef::new(ContactSubmissions::Email)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ContactSubmissions::Phone).string().null())
                        .col(
                            ColumnDef::new(ContactSubmissions::PlanSelected)
                                .string()
                                .not_null(),
                        )
                        // Serialized JSON, not a native structured column.
                        .col(
                            ColumnDef::new(ContactSubmissions::SelectedFeatures)
                                .text()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ContactSubmissions::TotalPrice)
                                .decimal()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ContactSubmissions::Message).text().null())
                        .col(
                            ColumnDef::new(ContactSubmissions::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ContactSubmissions::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum ContactSubmissions {
        Table,
        Id,
        Name,
        Email,
        Phone,
        PlanSelected,
        SelectedFeatures,
        TotalPrice,
        Message,
        CreatedAt,
    }
}
