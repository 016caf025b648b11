use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;

use color_eyre::{Result, eyre::Context};
use migration::MigratorTrait;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectOptions, Database as SeaDatabase,
    DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, SqlErr, TransactionTrait,
};

use crate::entities::{actor, cinema_hall, genre, movie, movie_actor, movie_genre};
use crate::error::{CinemaError, CinemaResult};
use crate::ports::store::{
    ActorChanges, CinemaHallChanges, CinemaStore, GenreChanges, MovieChanges, NewActor,
    NewCinemaHall, NewGenre, NewMovie, RelationKind,
};

pub struct Database {
    pub conn: DatabaseConnection,
}

impl Database {
    /// Open or create a database at the given path
    pub async fn open(path: &Path) -> Result<Self> {
        log::debug!("Opening database at: {}", path.display());

        // Create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context(format!(
                "Failed to create database directory: {}",
                parent.display()
            ))?;
        }

        let url = format!("sqlite://{}?mode=rwc", path.display());

        let mut opt = ConnectOptions::new(url);
        opt.max_connections(16)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(8))
            .acquire_timeout(Duration::from_secs(8))
            .sqlx_logging(false);

        let conn = SeaDatabase::connect(opt)
            .await
            .context(format!("Failed to open database: {}", path.display()))?;

        let database = Database { conn };
        database.migrate().await?;

        log::info!("Database ready at: {}", path.display());
        Ok(database)
    }

    /// A private, migrated in-memory database. One pooled connection keeps
    /// every query on the same SQLite memory instance.
    pub async fn in_memory() -> Result<Self> {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);

        let conn = SeaDatabase::connect(opt)
            .await
            .context("Failed to open in-memory database")?;

        let database = Database { conn };
        database.migrate().await?;
        Ok(database)
    }

    /// Apply any pending migrations
    pub async fn migrate(&self) -> Result<()> {
        log::debug!("Running database migrations");
        migration::Migrator::up(&self.conn, None)
            .await
            .context("Failed to run database migrations")
    }
}

fn genre_write_error(err: DbErr) -> CinemaError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => CinemaError::UniquenessViolation {
            entity: "genre",
            field: "name",
        },
        _ => CinemaError::Store(err),
    }
}

fn unique_ids(ids: &[i64]) -> Vec<i64> {
    let mut seen = BTreeSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

#[async_trait::async_trait]
impl CinemaStore for Database {
    // ========== Actor Methods ==========

    async fn list_actors(&self) -> CinemaResult<Vec<actor::Model>> {
        log::debug!("Listing actors");
        Ok(actor::Entity::find()
            .order_by_asc(actor::Column::Id)
            .all(&self.conn)
            .await?)
    }

    async fn get_actor(&self, id: i64) -> CinemaResult<actor::Model> {
        log::debug!("Fetching actor (ID: {})", id);
        actor::Entity::find_by_id(id)
            .one(&self.conn)
            .await?
            .ok_or(CinemaError::not_found("actor", id))
    }

    async fn create_actor(&self, actor: NewActor) -> CinemaResult<actor::Model> {
        log::debug!(
            "Creating actor: '{} {}'",
            actor.first_name,
            actor.last_name
        );

        let model = actor::ActiveModel {
            id: ActiveValue::NotSet,
            first_name: ActiveValue::Set(actor.first_name),
            last_name: ActiveValue::Set(actor.last_name),
        }
        .insert(&self.conn)
        .await?;

        log::info!("Actor created: '{}' (ID: {})", model, model.id);
        Ok(model)
    }

    async fn update_actor(&self, id: i64, changes: ActorChanges) -> CinemaResult<actor::Model> {
        let existing = self.get_actor(id).await?;
        if changes == ActorChanges::default() {
            return Ok(existing);
        }

        let mut active: actor::ActiveModel = existing.into();
        if let Some(first_name) = changes.first_name {
            active.first_name = ActiveValue::Set(first_name);
        }
        if let Some(last_name) = changes.last_name {
            active.last_name = ActiveValue::Set(last_name);
        }

        let model = active.update(&self.conn).await?;
        log::info!("Actor updated: '{}' (ID: {})", model, id);
        Ok(model)
    }

    async fn delete_actor(&self, id: i64) -> CinemaResult<()> {
        log::debug!("Deleting actor (ID: {})", id);
        let result = actor::Entity::delete_by_id(id).exec(&self.conn).await?;
        if result.rows_affected == 0 {
            return Err(CinemaError::not_found("actor", id));
        }
        log::info!("Actor deleted (ID: {})", id);
        Ok(())
    }

    // ========== Genre Methods ==========

    async fn list_genres(&self) -> CinemaResult<Vec<genre::Model>> {
        log::debug!("Listing genres");
        Ok(genre::Entity::find()
            .order_by_asc(genre::Column::Id)
            .all(&self.conn)
            .await?)
    }

    async fn get_genre(&self, id: i64) -> CinemaResult<genre::Model> {
        log::debug!("Fetching genre (ID: {})", id);
        genre::Entity::find_by_id(id)
            .one(&self.conn)
            .await?
            .ok_or(CinemaError::not_found("genre", id))
    }

    async fn create_genre(&self, genre: NewGenre) -> CinemaResult<genre::Model> {
        log::debug!("Creating genre: '{}'", genre.name);

        let model = genre::ActiveModel {
            id: ActiveValue::NotSet,
            name: ActiveValue::Set(genre.name),
        }
        .insert(&self.conn)
        .await
        .map_err(genre_write_error)?;

        log::info!("Genre created: '{}' (ID: {})", model, model.id);
        Ok(model)
    }

    async fn update_genre(&self, id: i64, changes: GenreChanges) -> CinemaResult<genre::Model> {
        let existing = self.get_genre(id).await?;
        let Some(name) = changes.name else {
            return Ok(existing);
        };

        let mut active: genre::ActiveModel = existing.into();
        active.name = ActiveValue::Set(name);

        let model = active.update(&self.conn).await.map_err(genre_write_error)?;
        log::info!("Genre updated: '{}' (ID: {})", model, id);
        Ok(model)
    }

    async fn delete_genre(&self, id: i64) -> CinemaResult<()> {
        log::debug!("Deleting genre (ID: {})", id);
        let result = genre::Entity::delete_by_id(id).exec(&self.conn).await?;
        if result.rows_affected == 0 {
            return Err(CinemaError::not_found("genre", id));
        }
        log::info!("Genre deleted (ID: {})", id);
        Ok(())
    }

    // ========== Cinema Hall Methods ==========

    async fn list_cinema_halls(&self) -> CinemaResult<Vec<cinema_hall::Model>> {
        log::debug!("Listing cinema halls");
        Ok(cinema_hall::Entity::find()
            .order_by_asc(cinema_hall::Column::Id)
            .all(&self.conn)
            .await?)
    }

    async fn get_cinema_hall(&self, id: i64) -> CinemaResult<cinema_hall::Model> {
        log::debug!("Fetching cinema hall (ID: {})", id);
        cinema_hall::Entity::find_by_id(id)
            .one(&self.conn)
            .await?
            .ok_or(CinemaError::not_found("cinema hall", id))
    }

    async fn create_cinema_hall(&self, hall: NewCinemaHall) -> CinemaResult<cinema_hall::Model> {
        log::debug!(
            "Creating cinema hall: '{}' ({} rows x {} seats)",
            hall.name,
            hall.rows,
            hall.seats_in_row
        );

        let model = cinema_hall::ActiveModel {
            id: ActiveValue::NotSet,
            name: ActiveValue::Set(hall.name),
            rows: ActiveValue::Set(hall.rows),
            seats_in_row: ActiveValue::Set(hall.seats_in_row),
        }
        .insert(&self.conn)
        .await?;

        log::info!("Cinema hall created: '{}' (ID: {})", model, model.id);
        Ok(model)
    }

    async fn update_cinema_hall(
        &self,
        id: i64,
        changes: CinemaHallChanges,
    ) -> CinemaResult<cinema_hall::Model> {
        let existing = self.get_cinema_hall(id).await?;
        if changes == CinemaHallChanges::default() {
            return Ok(existing);
        }

        let mut active: cinema_hall::ActiveModel = existing.into();
        if let Some(name) = changes.name {
            active.name = ActiveValue::Set(name);
        }
        if let Some(rows) = changes.rows {
            active.rows = ActiveValue::Set(rows);
        }
        if let Some(seats_in_row) = changes.seats_in_row {
            active.seats_in_row = ActiveValue::Set(seats_in_row);
        }

        let model = active.update(&self.conn).await?;
        log::info!("Cinema hall updated: '{}' (ID: {})", model, id);
        Ok(model)
    }

    async fn delete_cinema_hall(&self, id: i64) -> CinemaResult<()> {
        log::debug!("Deleting cinema hall (ID: {})", id);
        let result = cinema_hall::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await?;
        if result.rows_affected == 0 {
            return Err(CinemaError::not_found("cinema hall", id));
        }
        log::info!("Cinema hall deleted (ID: {})", id);
        Ok(())
    }

    // ========== Movie Methods ==========

    async fn list_movies(&self) -> CinemaResult<Vec<movie::Model>> {
        log::debug!("Listing movies");
        Ok(movie::Entity::find()
            .order_by_asc(movie::Column::Id)
            .all(&self.conn)
            .await?)
    }

    async fn get_movie(&self, id: i64) -> CinemaResult<movie::Model> {
        log::debug!("Fetching movie (ID: {})", id);
        movie::Entity::find_by_id(id)
            .one(&self.conn)
            .await?
            .ok_or(CinemaError::not_found("movie", id))
    }

    async fn create_movie(&self, movie: NewMovie) -> CinemaResult<movie::Model> {
        log::debug!(
            "Creating movie: '{}' ({} minutes)",
            movie.title,
            movie.duration
        );

        let model = movie::ActiveModel {
            id: ActiveValue::NotSet,
            title: ActiveValue::Set(movie.title),
            description: ActiveValue::Set(movie.description),
            duration: ActiveValue::Set(movie.duration),
        }
        .insert(&self.conn)
        .await?;

        log::info!("Movie created: '{}' (ID: {})", model, model.id);
        Ok(model)
    }

    async fn update_movie(&self, id: i64, changes: MovieChanges) -> CinemaResult<movie::Model> {
        let existing = self.get_movie(id).await?;
        if changes == MovieChanges::default() {
            return Ok(existing);
        }

        let mut active: movie::ActiveModel = existing.into();
        if let Some(title) = changes.title {
            active.title = ActiveValue::Set(title);
        }
        if let Some(description) = changes.description {
            active.description = ActiveValue::Set(description);
        }
        if let Some(duration) = changes.duration {
            active.duration = ActiveValue::Set(duration);
        }

        let model = active.update(&self.conn).await?;
        log::info!("Movie updated: '{}' (ID: {})", model, id);
        Ok(model)
    }

    async fn delete_movie(&self, id: i64) -> CinemaResult<()> {
        log::debug!("Deleting movie (ID: {})", id);
        let result = movie::Entity::delete_by_id(id).exec(&self.conn).await?;
        if result.rows_affected == 0 {
            return Err(CinemaError::not_found("movie", id));
        }
        log::info!("Movie deleted (ID: {})", id);
        Ok(())
    }

    // ========== Junction Table Methods ==========

    async fn movie_actors(&self, movie_id: i64) -> CinemaResult<Vec<actor::Model>> {
        log::debug!("Fetching actors of movie (ID: {})", movie_id);
        Ok(actor::Entity::find()
            .inner_join(movie::Entity)
            .filter(movie::Column::Id.eq(movie_id))
            .order_by_asc(actor::Column::Id)
            .all(&self.conn)
            .await?)
    }

    async fn movie_genres(&self, movie_id: i64) -> CinemaResult<Vec<genre::Model>> {
        log::debug!("Fetching genres of movie (ID: {})", movie_id);
        Ok(genre::Entity::find()
            .inner_join(movie::Entity)
            .filter(movie::Column::Id.eq(movie_id))
            .order_by_asc(genre::Column::Id)
            .all(&self.conn)
            .await?)
    }

    async fn missing_ids(&self, kind: RelationKind, ids: &[i64]) -> CinemaResult<Vec<i64>> {
        log::debug!("Checking {} ids exist: {:?}", kind, ids);
        let ids = unique_ids(ids);
        if ids.is_empty() {
            return Ok(ids);
        }

        let existing: BTreeSet<i64> = match kind {
            RelationKind::Actors => actor::Entity::find()
                .filter(actor::Column::Id.is_in(ids.clone()))
                .all(&self.conn)
                .await?
                .into_iter()
                .map(|a| a.id)
                .collect(),
            RelationKind::Genres => genre::Entity::find()
                .filter(genre::Column::Id.is_in(ids.clone()))
                .all(&self.conn)
                .await?
                .into_iter()
                .map(|g| g.id)
                .collect(),
        };

        let missing: Vec<i64> = ids.into_iter().filter(|id| !existing.contains(id)).collect();
        if !missing.is_empty() {
            log::debug!("Missing {} ids: {:?}", kind, missing);
        }
        Ok(missing)
    }

    async fn set_associations(
        &self,
        movie_id: i64,
        kind: RelationKind,
        ids: &[i64],
    ) -> CinemaResult<()> {
        let wanted = unique_ids(ids);
        log::debug!(
            "Replacing movie {} associations: movie_id={}, ids={:?}",
            kind,
            movie_id,
            wanted
        );

        let txn = self.conn.begin().await?;

        match kind {
            RelationKind::Actors => {
                let current: BTreeSet<i64> = movie_actor::Entity::find()
                    .filter(movie_actor::Column::MovieId.eq(movie_id))
                    .all(&txn)
                    .await?
                    .into_iter()
                    .map(|row| row.actor_id)
                    .collect();

                movie_actor::Entity::delete_many()
                    .filter(movie_actor::Column::MovieId.eq(movie_id))
                    .filter(movie_actor::Column::ActorId.is_not_in(wanted.clone()))
                    .exec(&txn)
                    .await?;

                let rows: Vec<movie_actor::ActiveModel> = wanted
                    .iter()
                    .filter(|id| !current.contains(id))
                    .map(|&actor_id| movie_actor::ActiveModel {
                        movie_id: ActiveValue::Set(movie_id),
                        actor_id: ActiveValue::Set(actor_id),
                    })
                    .collect();
                if !rows.is_empty() {
                    movie_actor::Entity::insert_many(rows).exec(&txn).await?;
                }
            }
            RelationKind::Genres => {
                let current: BTreeSet<i64> = movie_genre::Entity::find()
                    .filter(movie_genre::Column::MovieId.eq(movie_id))
                    .all(&txn)
                    .await?
                    .into_iter()
                    .map(|row| row.genre_id)
                    .collect();

                movie_genre::Entity::delete_many()
                    .filter(movie_genre::Column::MovieId.eq(movie_id))
                    .filter(movie_genre::Column::GenreId.is_not_in(wanted.clone()))
                    .exec(&txn)
                    .await?;

                let rows: Vec<movie_genre::ActiveModel> = wanted
                    .iter()
                    .filter(|id| !current.contains(id))
                    .map(|&genre_id| movie_genre::ActiveModel {
                        movie_id: ActiveValue::Set(movie_id),
                        genre_id: ActiveValue::Set(genre_id),
                    })
                    .collect();
                if !rows.is_empty() {
                    movie_genre::Entity::insert_many(rows).exec(&txn).await?;
                }
            }
        }

        txn.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_db;

    async fn seed_movie(db: &Database) -> movie::Model {
        db.create_movie(NewMovie {
            title: "Heat".into(),
            description: "Cops and robbers".into(),
            duration: 170,
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_get_missing_actor_is_not_found() {
        let db = test_db().await;
        let result = db.get_actor(42).await;
        assert!(matches!(
            result,
            Err(CinemaError::NotFound {
                entity: "actor",
                id: 42
            })
        ));
    }

    #[tokio::test]
    async fn test_duplicate_genre_name_is_uniqueness_violation() {
        let db = test_db().await;
        db.create_genre(NewGenre {
            name: "Drama".into(),
        })
        .await
        .unwrap();

        let result = db
            .create_genre(NewGenre {
                name: "Drama".into(),
            })
            .await;
        assert!(matches!(
            result,
            Err(CinemaError::UniquenessViolation {
                entity: "genre",
                field: "name"
            })
        ));
        assert_eq!(db.list_genres().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rename_genre_onto_existing_name_fails() {
        let db = test_db().await;
        db.create_genre(NewGenre {
            name: "Drama".into(),
        })
        .await
        .unwrap();
        let comedy = db
            .create_genre(NewGenre {
                name: "Comedy".into(),
            })
            .await
            .unwrap();

        let result = db
            .update_genre(
                comedy.id,
                GenreChanges {
                    name: Some("Drama".into()),
                },
            )
            .await;
        assert!(matches!(
            result,
            Err(CinemaError::UniquenessViolation { .. })
        ));
        assert_eq!(db.get_genre(comedy.id).await.unwrap().name, "Comedy");
    }

    #[tokio::test]
    async fn test_update_with_no_changes_returns_record() {
        let db = test_db().await;
        let hall = db
            .create_cinema_hall(NewCinemaHall {
                name: "Blue".into(),
                rows: 10,
                seats_in_row: 12,
            })
            .await
            .unwrap();

        let same = db
            .update_cinema_hall(hall.id, CinemaHallChanges::default())
            .await
            .unwrap();
        assert_eq!(same, hall);
    }

    #[tokio::test]
    async fn test_missing_ids_dedupes_and_keeps_order() {
        let db = test_db().await;
        let actor = db
            .create_actor(NewActor {
                first_name: "Al".into(),
                last_name: "Pacino".into(),
            })
            .await
            .unwrap();

        let missing = db
            .missing_ids(RelationKind::Actors, &[9, actor.id, 5, 9])
            .await
            .unwrap();
        assert_eq!(missing, vec![9, 5]);
        assert!(
            db.missing_ids(RelationKind::Genres, &[])
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_set_associations_replaces_set() {
        let db = test_db().await;
        let movie = seed_movie(&db).await;
        let mut ids = Vec::new();
        for name in ["Crime", "Thriller", "Drama"] {
            ids.push(
                db.create_genre(NewGenre { name: name.into() })
                    .await
                    .unwrap()
                    .id,
            );
        }

        db.set_associations(movie.id, RelationKind::Genres, &ids[..2])
            .await
            .unwrap();
        db.set_associations(movie.id, RelationKind::Genres, &[ids[2], ids[1], ids[1]])
            .await
            .unwrap();

        let genres: Vec<i64> = db
            .movie_genres(movie.id)
            .await
            .unwrap()
            .into_iter()
            .map(|g| g.id)
            .collect();
        assert_eq!(genres, vec![ids[1], ids[2]]);
    }

    #[tokio::test]
    async fn test_deleting_actor_cascades_association_rows() {
        let db = test_db().await;
        let movie = seed_movie(&db).await;
        let actor = db
            .create_actor(NewActor {
                first_name: "Robert".into(),
                last_name: "De Niro".into(),
            })
            .await
            .unwrap();
        db.set_associations(movie.id, RelationKind::Actors, &[actor.id])
            .await
            .unwrap();

        db.delete_actor(actor.id).await.unwrap();

        assert!(db.movie_actors(movie.id).await.unwrap().is_empty());
        assert!(matches!(
            db.delete_actor(actor.id).await,
            Err(CinemaError::NotFound { .. })
        ));
    }
}
