use poem_openapi::payload::Json;

use crate::{
    api::models::{ReadyDto, ReadyResponseDto},
    shelf::Shelf,
};

pub struct HealthService<'a> {
    pub shelf: &'a Shelf,
}

impl<'a> HealthService<'a> {
    pub fn new(shelf: &'a Shelf) -> Self {
        Self { shelf }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub fn ready(&self) -> ReadyResponseDto {
        let ready = self.shelf.is_ready();
        if ready {
            ReadyResponseDto::Ok(Json(ReadyDto { ready }))
        } else {
            ReadyResponseDto::NotReady(Json(ReadyDto { ready }))
        }
    }
}
