//! Database migrations for the service planner
//!
//! Migrations share this file, so each one names itself explicitly.

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_songs::Migration),
            Box::new(m20250101_000002_create_templates::Migration),
            Box::new(m20250101_000003_create_services::Migration),
        ]
    }
}

mod m20250101_000001_create_songs {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000001_create_songs"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Songs::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Songs::Id).uuid().not_null().primary_key())
                        .col(ColumnDef::new(Songs::Name).string_len(200).not_null())
                        .col(ColumnDef::new(Songs::Key).string_len(10))
                        .col(ColumnDef::new(Songs::SongSelectId).integer())
                        .col(
                            ColumnDef::new(Songs::Seasonal)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Songs::Speed)
                                .string_len(50)
                                .not_null()
                                .default("Medium"),
                        )
                        .col(
                            ColumnDef::new(Songs::Publisher)
                                .string_len(100)
                                .not_null()
                                .default("Unknown"),
                        )
                        .col(
                            ColumnDef::new(Songs::Artist)
                                .string_len(100)
                                .not_null()
                                .default("Unknown"),
                        )
                        .col(ColumnDef::new(Songs::Category).string_len(100))
                        .col(ColumnDef::new(Songs::Notes).string_len(1000))
                        .col(
                            ColumnDef::new(Songs::Disabled)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Songs::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_songs_name")
                        .table(Songs::Table)
                        .col(Songs::Name)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Songs::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Songs {
        Table,
        Id,
        Name,
        Key,
        SongSelectId,
        Seasonal,
        Speed,
        Publisher,
        Artist,
        Category,
        Notes,
        Disabled,
        CreatedAt,
    }
}

mod m20250101_000002_create_templates {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000002_create_templates"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ServiceTemplates::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ServiceTemplates::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(ServiceTemplates::Name)
                                .string_len(200)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ServiceTemplates::Description)
                                .string_len(1000)
                                .not_null()
                                .default(""),
                        )
                        .col(
                            ColumnDef::new(ServiceTemplates::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(ServiceTemplates::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ServiceEvents::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ServiceEvents::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(ServiceEvents::TemplateId).uuid().not_null())
                        .col(ColumnDef::new(ServiceEvents::Kind).string_len(20).not_null())
                        .col(
                            ColumnDef::new(ServiceEvents::Title)
                                .string_len(200)
                                .not_null(),
                        )
                        .col(ColumnDef::new(ServiceEvents::SortOrder).integer().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_service_events_template")
                                .from(ServiceEvents::Table, ServiceEvents::TemplateId)
                                .to(ServiceTemplates::Table, ServiceTemplates::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_service_events_template_id")
                        .table(ServiceEvents::Table)
                        .col(ServiceEvents::TemplateId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ServiceEvents::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(ServiceTemplates::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum ServiceTemplates {
        Table,
        Id,
        Name,
        Description,
        IsActive,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum ServiceEvents {
        Table,
        Id,
        TemplateId,
        Kind,
        Title,
        SortOrder,
    }
}

mod m20250101_000003_create_services {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000003_create_services"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // template_id is indexed only: a service may outlive or predate its template row
            manager
                .create_table(
                    Table::create()
                        .table(Services::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Services::Id).uuid().not_null().primary_key())
                        .col(ColumnDef::new(Services::Name).string_len(200).not_null())
                        .col(ColumnDef::new(Services::ServiceDate).date().not_null())
                        .col(ColumnDef::new(Services::TemplateId).uuid().not_null())
                        .col(
                            ColumnDef::new(Services::IsSeasonal)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ServiceEventInstances::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ServiceEventInstances::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(ServiceEventInstances::ServiceId)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ServiceEventInstances::SlotId).uuid().not_null())
                        .col(
                            ColumnDef::new(ServiceEventInstances::Position)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(ServiceEventInstances::PersonName).string_len(100))
                        .col(ColumnDef::new(ServiceEventInstances::SongTitle).string_len(200))
                        .col(ColumnDef::new(ServiceEventInstances::Notes).string_len(1000))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_instances_service")
                                .from(ServiceEventInstances::Table, ServiceEventInstances::ServiceId)
                                .to(Services::Table, Services::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_instances_slot")
                                .from(ServiceEventInstances::Table, ServiceEventInstances::SlotId)
                                .to(ServiceEvents::Table, ServiceEvents::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            // Create indexes
            manager
                .create_index(
                    Index::create()
                        .name("idx_services_template_id")
                        .table(Services::Table)
                        .col(Services::TemplateId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_services_service_date")
                        .table(Services::Table)
                        .col(Services::ServiceDate)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_instances_service_id")
                        .table(ServiceEventInstances::Table)
                        .col(ServiceEventInstances::ServiceId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_instances_song_title")
                        .table(ServiceEventInstances::Table)
                        .col(ServiceEventInstances::SongTitle)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ServiceEventInstances::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Services::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Services {
        Table,
        Id,
        Name,
        ServiceDate,
        TemplateId,
        IsSeasonal,
    }

    #[derive(DeriveIden)]
    enum ServiceEventInstances {
        Table,
        Id,
        ServiceId,
        SlotId,
        Position,
        PersonName,
        SongTitle,
        Notes,
    }

    #[derive(DeriveIden)]
    enum ServiceEvents {
        Table,
        Id,
    }
}
