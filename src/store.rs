use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, Statement,
};

use crate::{
    entities::favorite_entry::{self, Column, Entity},
    models::{EntryKind, EntryPatch, NewEntry},
    timestamps,
};

/// Raw aggregates for the stats endpoint; formatting happens in the handler.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatsSnapshot {
    pub total: u64,
    pub movies: u64,
    pub tv_shows: u64,
    pub recent: u64,
    pub avg_budget: i64,
}

/// All reads and writes against the `favorite_entries` table. Handlers and
/// tests get this as an explicit context instead of a process-wide handle.
#[derive(Clone)]
pub struct EntryStore {
    db: DatabaseConnection,
}

impl EntryStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<favorite_entry::Model>, DbErr> {
        Entity::find().filter(Column::Id.eq(id)).one(&self.db).await
    }

    /// Create-time duplicate probe: same title and year.
    pub async fn find_by_title_year(
        &self,
        title: &str,
        year: i32,
    ) -> Result<Option<favorite_entry::Model>, DbErr> {
        Entity::find()
            .filter(Column::Title.eq(title))
            .filter(Column::Year.eq(year))
            .one(&self.db)
            .await
    }

    /// Update-time duplicate probe: title only, excluding the entry itself.
    pub async fn title_taken_by_other(&self, title: &str, id: i64) -> Result<bool, DbErr> {
        let other = Entity::find()
            .filter(Column::Title.eq(title))
            .filter(Column::Id.ne(id))
            .one(&self.db)
            .await?;
        Ok(other.is_some())
    }

    pub async fn insert(&self, entry: NewEntry) -> Result<favorite_entry::Model, DbErr> {
        let now = timestamps::now_sec();
        let model = favorite_entry::ActiveModel {
            id: Default::default(),
            title: Set(entry.title),
            kind: Set(entry.kind.as_str().to_string()),
            director: Set(entry.director),
            budget: Set(entry.budget),
            location: Set(entry.location),
            duration: Set(entry.duration),
            year: Set(entry.year),
            created_at: Set(now),
            updated_at: Set(now),
        };
        model.insert(&self.db).await
    }

    /// Applies the patch, refreshes `updated_at`, and re-fetches so the
    /// caller responds with exactly what was stored.
    pub async fn update(
        &self,
        current: favorite_entry::Model,
        patch: EntryPatch,
    ) -> Result<favorite_entry::Model, DbErr> {
        let id = current.id;
        let mut active: favorite_entry::ActiveModel = current.into();
        if let Some(title) = patch.title {
            active.title = Set(title);
        }
        if let Some(kind) = patch.kind {
            active.kind = Set(kind.as_str().to_string());
        }
        if let Some(director) = patch.director {
            active.director = Set(director);
        }
        if let Some(budget) = patch.budget {
            active.budget = Set(budget);
        }
        if let Some(location) = patch.location {
            active.location = Set(location);
        }
        if let Some(duration) = patch.duration {
            active.duration = Set(duration);
        }
        if let Some(year) = patch.year {
            active.year = Set(year);
        }
        active.updated_at = Set(timestamps::now_sec());
        active.update(&self.db).await?;

        Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("favorite entry {id}")))
    }

    pub async fn delete(&self, entry: favorite_entry::Model) -> Result<(), DbErr> {
        entry.delete(&self.db).await?;
        Ok(())
    }

    pub async fn count_all(&self) -> Result<u64, DbErr> {
        Entity::find().count(&self.db).await
    }

    /// One pagination window, newest first. Id breaks ties at second
    /// resolution so pages stay stable.
    pub async fn page(&self, offset: u64, limit: u64) -> Result<Vec<favorite_entry::Model>, DbErr> {
        Entity::find()
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
    }

    pub async fn count_matching(&self, q: &str) -> Result<u64, DbErr> {
        Entity::find().filter(Column::Title.contains(q)).count(&self.db).await
    }

    /// Title substring match, ordered alphabetically.
    pub async fn search(
        &self,
        q: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<favorite_entry::Model>, DbErr> {
        Entity::find()
            .filter(Column::Title.contains(q))
            .order_by_asc(Column::Title)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
    }

    pub async fn stats(&self, current_year: i32) -> Result<StatsSnapshot, DbErr> {
        let total = self.count_all().await?;
        let movies = Entity::find()
            .filter(Column::Kind.eq(EntryKind::Movie.as_str()))
            .count(&self.db)
            .await?;
        let tv_shows = Entity::find()
            .filter(Column::Kind.eq(EntryKind::TvShow.as_str()))
            .count(&self.db)
            .await?;
        let recent =
            Entity::find().filter(Column::Year.gte(current_year - 10)).count(&self.db).await?;

        // AVG of an empty table is NULL, which maps to 0 here.
        let row = self
            .db
            .query_one(Statement::from_string(
                self.db.get_database_backend(),
                "SELECT AVG(budget) AS avg_budget FROM favorite_entries".to_string(),
            ))
            .await?;
        let avg: Option<f64> = match row {
            Some(row) => row.try_get("", "avg_budget").unwrap_or(None),
            None => None,
        };
        let avg_budget = avg.unwrap_or(0.0).round() as i64;

        Ok(StatsSnapshot { total, movies, tv_shows, recent, avg_budget })
    }

    pub async fn insert_many(&self, entries: Vec<NewEntry>) -> Result<u64, DbErr> {
        let now = timestamps::now_sec();
        let count = entries.len() as u64;
        if entries.is_empty() {
            return Ok(0);
        }
        let models = entries.into_iter().map(|entry| favorite_entry::ActiveModel {
            id: Default::default(),
            title: Set(entry.title),
            kind: Set(entry.kind.as_str().to_string()),
            director: Set(entry.director),
            budget: Set(entry.budget),
            location: Set(entry.location),
            duration: Set(entry.duration),
            year: Set(entry.year),
            created_at: Set(now),
            updated_at: Set(now),
        });
        Entity::insert_many(models).exec(&self.db).await?;
        Ok(count)
    }
}
