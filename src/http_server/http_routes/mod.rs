pub mod actors;
pub mod cinema_halls;
pub mod genres;
pub mod movies;
