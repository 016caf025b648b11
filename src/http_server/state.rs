use std::sync::Arc;

use crate::ports::store::CinemaStore;
use crate::serializers::{
    ActorSerializer, CinemaHallSerializer, GenreSerializer, MovieSerializer,
};

pub struct AppState {
    pub store: Arc<dyn CinemaStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn CinemaStore>) -> Self {
        Self { store }
    }

    pub fn actors(&self) -> ActorSerializer {
        ActorSerializer::new(self.store.clone())
    }

    pub fn genres(&self) -> GenreSerializer {
        GenreSerializer::new(self.store.clone())
    }

    pub fn cinema_halls(&self) -> CinemaHallSerializer {
        CinemaHallSerializer::new(self.store.clone())
    }

    pub fn movies(&self) -> MovieSerializer {
        MovieSerializer::new(self.store.clone())
    }
}
