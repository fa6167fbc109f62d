//! SeaORM repository implementations

use crate::contract::{EventInstance, EventSlot, Service, Song, SongUsage, Template};
use crate::domain::repository::{ServiceRepository, SongFilter, SongRepository, TemplateRepository};
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{
    prelude::Expr, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::entity::{instance, service, slot, song, template};
use super::mapper::{service_from_parts, template_from_parts};

// ===== Song Repository =====

pub struct SeaOrmSongRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmSongRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SongRepository for SeaOrmSongRepository {
    async fn insert(&self, song: &Song) -> Result<Song> {
        song::Entity::insert(song::ActiveModel::from(song))
            .exec(&*self.db)
            .await?;
        Ok(song.clone())
    }

    async fn update(&self, song: &Song) -> Result<Song> {
        let result = song::Entity::update(song::ActiveModel::from(song))
            .exec(&*self.db)
            .await?;
        Ok(result.into())
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = song::Entity::delete_by_id(id).exec(&*self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Song>> {
        let result = song::Entity::find_by_id(id).one(&*self.db).await?;
        Ok(result.map(|e| e.into()))
    }

    async fn list(&self, filter: &SongFilter) -> Result<Vec<Song>> {
        let mut query = song::Entity::find();

        if !filter.include_disabled {
            query = query.filter(song::Column::Disabled.eq(false));
        }
        if filter.seasonal_only {
            query = query.filter(song::Column::Seasonal.eq(true));
        }
        if let Some(category) = &filter.category {
            query = query.filter(song::Column::Category.eq(category.as_str()));
        }
        if let Some(term) = &filter.search {
            query = query.filter(
                Condition::any()
                    .add(song::Column::Name.contains(term.as_str()))
                    .add(song::Column::Artist.contains(term.as_str()))
                    .add(song::Column::Category.contains(term.as_str()))
                    .add(song::Column::Publisher.contains(term.as_str())),
            );
        }

        let results = query
            .order_by_asc(song::Column::Name)
            .all(&*self.db)
            .await?;

        Ok(results.into_iter().map(|e| e.into()).collect())
    }

    async fn count(&self) -> Result<u64> {
        Ok(song::Entity::find().count(&*self.db).await?)
    }
}

// ===== Template Repository =====

pub struct SeaOrmTemplateRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmTemplateRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

async fn insert_slots<C: ConnectionTrait>(conn: &C, slots: &[EventSlot]) -> Result<()> {
    if slots.is_empty() {
        return Ok(());
    }
    slot::Entity::insert_many(slots.iter().map(slot::ActiveModel::from))
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

#[async_trait]
impl TemplateRepository for SeaOrmTemplateRepository {
    async fn insert(&self, template: &Template) -> Result<Template> {
        let txn = self.db.begin().await?;
        template::Entity::insert(template::ActiveModel::from(template))
            .exec(&txn)
            .await?;
        insert_slots(&txn, &template.slots).await?;
        txn.commit().await?;

        Ok(template.clone())
    }

    async fn update_metadata(&self, template: &Template) -> Result<Template> {
        template::Entity::update(template::ActiveModel::from(template))
            .exec(&*self.db)
            .await?;
        Ok(template.clone())
    }

    async fn replace_structure(&self, template: &Template) -> Result<()> {
        let txn = self.db.begin().await?;
        template::Entity::update(template::ActiveModel::from(template))
            .exec(&txn)
            .await?;
        slot::Entity::delete_many()
            .filter(slot::Column::TemplateId.eq(template.id))
            .exec(&txn)
            .await?;
        insert_slots(&txn, &template.slots).await?;
        txn.commit().await?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Template>> {
        let Some(row) = template::Entity::find_by_id(id).one(&*self.db).await? else {
            return Ok(None);
        };

        let slots = row
            .find_related(slot::Entity)
            .order_by_asc(slot::Column::SortOrder)
            .order_by_asc(slot::Column::Id)
            .all(&*self.db)
            .await?;

        Ok(Some(template_from_parts(row, slots)?))
    }

    async fn list(&self, active_only: bool) -> Result<Vec<Template>> {
        let mut query = template::Entity::find();
        if active_only {
            query = query.filter(template::Column::IsActive.eq(true));
        }
        let rows = query
            .order_by_asc(template::Column::Name)
            .all(&*self.db)
            .await?;

        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let mut slots_by_template: HashMap<Uuid, Vec<slot::Model>> = HashMap::new();
        for slot in slot::Entity::find()
            .filter(slot::Column::TemplateId.is_in(ids))
            .order_by_asc(slot::Column::SortOrder)
            .order_by_asc(slot::Column::Id)
            .all(&*self.db)
            .await?
        {
            slots_by_template.entry(slot.template_id).or_default().push(slot);
        }

        rows.into_iter()
            .map(|row| {
                let slots = slots_by_template.remove(&row.id).unwrap_or_default();
                template_from_parts(row, slots)
            })
            .collect()
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let txn = self.db.begin().await?;
        slot::Entity::delete_many()
            .filter(slot::Column::TemplateId.eq(id))
            .exec(&txn)
            .await?;
        let result = template::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        Ok(result.rows_affected > 0)
    }

    async fn count(&self) -> Result<u64> {
        Ok(template::Entity::find().count(&*self.db).await?)
    }
}

// ===== Service Repository =====

pub struct SeaOrmServiceRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmServiceRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Attach instances to service rows, keeping the row order
    async fn with_instances(&self, rows: Vec<service::Model>) -> Result<Vec<Service>> {
        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let mut by_service: HashMap<Uuid, Vec<instance::Model>> = HashMap::new();
        for instance in instance::Entity::find()
            .filter(instance::Column::ServiceId.is_in(ids))
            .order_by_asc(instance::Column::Position)
            .all(&*self.db)
            .await?
        {
            by_service.entry(instance.service_id).or_default().push(instance);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let instances = by_service.remove(&row.id).unwrap_or_default();
                service_from_parts(row, instances)
            })
            .collect())
    }
}

#[async_trait]
impl ServiceRepository for SeaOrmServiceRepository {
    async fn insert(&self, service: &Service) -> Result<Service> {
        let txn = self.db.begin().await?;
        service::Entity::insert(service::ActiveModel::from(service))
            .exec(&txn)
            .await?;
        if !service.instances.is_empty() {
            instance::Entity::insert_many(service.instances.iter().map(instance::ActiveModel::from))
                .exec_without_returning(&txn)
                .await?;
        }
        txn.commit().await?;

        Ok(service.clone())
    }

    async fn update(&self, service: &Service) -> Result<Service> {
        let txn = self.db.begin().await?;
        service::Entity::update(service::ActiveModel::from(service))
            .exec(&txn)
            .await?;

        for EventInstance {
            id,
            person_name,
            song_title,
            notes,
            ..
        } in &service.instances
        {
            instance::Entity::update_many()
                .col_expr(instance::Column::PersonName, Expr::value(person_name.clone()))
                .col_expr(instance::Column::SongTitle, Expr::value(song_title.clone()))
                .col_expr(instance::Column::Notes, Expr::value(notes.clone()))
                .filter(instance::Column::Id.eq(*id))
                .filter(instance::Column::ServiceId.eq(service.id))
                .exec(&txn)
                .await?;
        }
        txn.commit().await?;

        Ok(service.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let txn = self.db.begin().await?;
        instance::Entity::delete_many()
            .filter(instance::Column::ServiceId.eq(id))
            .exec(&txn)
            .await?;
        let result = service::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        Ok(result.rows_affected > 0)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Service>> {
        let Some(row) = service::Entity::find_by_id(id).one(&*self.db).await? else {
            return Ok(None);
        };

        let instances = row
            .find_related(instance::Entity)
            .order_by_asc(instance::Column::Position)
            .all(&*self.db)
            .await?;

        Ok(Some(service_from_parts(row, instances)))
    }

    async fn list_all(&self) -> Result<Vec<Service>> {
        let rows = service::Entity::find()
            .order_by_desc(service::Column::ServiceDate)
            .all(&*self.db)
            .await?;
        self.with_instances(rows).await
    }

    async fn list_in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Service>> {
        let rows = service::Entity::find()
            .filter(service::Column::ServiceDate.between(start, end))
            .order_by_asc(service::Column::ServiceDate)
            .all(&*self.db)
            .await?;
        self.with_instances(rows).await
    }

    async fn count_by_template(&self, template_id: Uuid) -> Result<u64> {
        let count = service::Entity::find()
            .filter(service::Column::TemplateId.eq(template_id))
            .count(&*self.db)
            .await?;
        Ok(count)
    }

    async fn song_usage(&self) -> Result<Vec<SongUsage>> {
        let rows = instance::Entity::find()
            .filter(instance::Column::SongTitle.is_not_null())
            .filter(instance::Column::SongTitle.ne(""))
            .find_also_related(service::Entity)
            .all(&*self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(instance, service)| {
                let title = instance.song_title?;
                let service = service?;
                (!title.trim().is_empty()).then_some(SongUsage {
                    song_title: title,
                    service_date: service.service_date,
                })
            })
            .collect())
    }
}
