use crate::error::{CinemaError, CinemaResult};
use crate::ports::store::{CinemaStore, RelationKind};

/// Fail with `ReferenceNotFound` unless every id names an existing record.
pub async fn ensure_references_exist(
    store: &dyn CinemaStore,
    kind: RelationKind,
    ids: Option<&[i64]>,
) -> CinemaResult<()> {
    let Some(ids) = ids.filter(|ids| !ids.is_empty()) else {
        return Ok(());
    };

    let missing = store.missing_ids(kind, ids).await?;
    if missing.is_empty() {
        Ok(())
    } else {
        Err(CinemaError::ReferenceNotFound {
            field: kind.field(),
            ids: missing,
        })
    }
}

/// Replace a movie's actor and genre sets.
///
/// `None` leaves that relation as it is; `Some(&[])` clears it. Actors are
/// written before genres, each in its own transaction.
pub async fn set_related_fields(
    store: &dyn CinemaStore,
    movie_id: i64,
    actors: Option<&[i64]>,
    genres: Option<&[i64]>,
) -> CinemaResult<()> {
    if let Some(actors) = actors {
        store
            .set_associations(movie_id, RelationKind::Actors, actors)
            .await?;
    }
    if let Some(genres) = genres {
        store
            .set_associations(movie_id, RelationKind::Genres, genres)
            .await?;
    }
    Ok(())
}
