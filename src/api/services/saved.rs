use poem_openapi::payload::Json;

use crate::{
    api::models::{
        ClearedDto, ClearedResponseDto, ErrorDto, SavedCourseDto, SavedListResponseDto,
        SavedStatusDto, SavedStatusResponseDto,
    },
    shelf::Shelf,
};

pub struct SavedService<'a> {
    pub shelf: &'a Shelf,
}

impl<'a> SavedService<'a> {
    pub fn new(shelf: &'a Shelf) -> Self {
        Self { shelf }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub fn list(&self) -> SavedListResponseDto {
        let dtos = self
            .shelf
            .saved()
            .saved()
            .into_iter()
            .map(SavedCourseDto::from)
            .collect();
        SavedListResponseDto::Ok(Json(dtos))
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub fn status(&self, id: &str) -> SavedStatusResponseDto {
        let saved = self.shelf.saved();
        SavedStatusResponseDto::Ok(Json(SavedStatusDto {
            id: id.to_string(),
            saved: saved.is_saved(id),
            saved_count: saved.saved_count() as u64,
        }))
    }

    #[tracing::instrument(level = "debug", skip(self, course), fields(id = %course.id))]
    pub async fn toggle(&self, course: SavedCourseDto) -> SavedStatusResponseDto {
        if course.id.trim().is_empty() {
            return SavedStatusResponseDto::BadRequest(Json(ErrorDto {
                message: "Course id is required".to_string(),
            }));
        }
        let id = course.id.clone();
        let saved = self.shelf.saved().toggle_save(course.into()).await;
        SavedStatusResponseDto::Ok(Json(SavedStatusDto {
            id,
            saved,
            saved_count: self.shelf.saved().saved_count() as u64,
        }))
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn clear(&self) -> ClearedResponseDto {
        let removed = self.shelf.saved().clear_all().await;
        ClearedResponseDto::Ok(Json(ClearedDto {
            removed: removed as u64,
        }))
    }
}
