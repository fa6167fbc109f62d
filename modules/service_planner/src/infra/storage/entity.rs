//! SeaORM entities for database tables

/// Song catalog table
pub mod song {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "songs")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub name: String,
        pub key: Option<String>,
        pub song_select_id: Option<i32>,
        pub seasonal: bool,
        pub speed: String,
        pub publisher: String,
        pub artist: String,
        pub category: Option<String>,
        pub notes: Option<String>,
        pub disabled: bool,
        pub created_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// Service template table
pub mod template {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "service_templates")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub name: String,
        pub description: String,
        pub is_active: bool,
        pub created_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        /// Owned event slots
        #[sea_orm(has_many = "super::slot::Entity")]
        Slots,
    }

    impl Related<super::slot::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Slots.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Template event slot table
pub mod slot {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "service_events")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub template_id: Uuid,
        /// Event kind name (Speaker, Prayer, Communion, Baptism, Song)
        pub kind: String,
        pub title: String,
        pub sort_order: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::template::Entity",
            from = "Column::TemplateId",
            to = "super::template::Column::Id",
            on_delete = "Cascade"
        )]
        Template,
    }

    impl Related<super::template::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Template.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Scheduled service table
pub mod service {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "services")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub name: String,
        pub service_date: Date,
        /// Originating template; indexed but not constrained
        pub template_id: Uuid,
        pub is_seasonal: bool,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        /// Owned event instances
        #[sea_orm(has_many = "super::instance::Entity")]
        Instances,
    }

    impl Related<super::instance::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Instances.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Filled-in slot table
pub mod instance {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "service_event_instances")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub service_id: Uuid,
        pub slot_id: Uuid,
        pub position: i32,
        pub person_name: Option<String>,
        pub song_title: Option<String>,
        pub notes: Option<String>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::service::Entity",
            from = "Column::ServiceId",
            to = "super::service::Column::Id",
            on_delete = "Cascade"
        )]
        Service,
        #[sea_orm(
            belongs_to = "super::slot::Entity",
            from = "Column::SlotId",
            to = "super::slot::Column::Id",
            on_delete = "Restrict"
        )]
        Slot,
    }

    impl Related<super::service::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Service.def()
        }
    }

    impl Related<super::slot::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Slot.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}
