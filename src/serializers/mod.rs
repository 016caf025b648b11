//! Serializers translate JSON payloads into store operations and render
//! records back out. Each one validates the whole payload before touching
//! the store.

pub mod actor;
pub mod cinema_hall;
pub mod fields;
pub mod genre;
pub mod movie;

pub use actor::ActorSerializer;
pub use cinema_hall::CinemaHallSerializer;
pub use genre::GenreSerializer;
pub use movie::{MovieDetail, MovieSerializer};
