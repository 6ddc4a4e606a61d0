use poem_openapi::payload::Json;

use crate::{
    api::models::{CompleteLessonResponseDto, ErrorDto, SyncResultDto},
    shelf::Shelf,
};

pub struct LessonService<'a> {
    pub shelf: &'a Shelf,
}

impl<'a> LessonService<'a> {
    pub fn new(shelf: &'a Shelf) -> Self {
        Self { shelf }
    }

    /// Record a completed lesson upstream, then pull the course again so its
    /// stored progress picks up the change.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn complete(&self, lesson_id: &str, course_id: &str) -> CompleteLessonResponseDto {
        let reconciler = self.shelf.reconciler();
        if let Err(e) = reconciler
            .gateway()
            .complete_lesson(lesson_id, Some(course_id))
            .await
        {
            tracing::error!(error = %format!("{:?}", e), %lesson_id, %course_id, "failed to complete lesson");
            return CompleteLessonResponseDto::BadGateway(Json(ErrorDto {
                message: format!("Lesson API error: {}", e),
            }));
        }
        let outcome = reconciler.refresh(course_id).await;
        let progress = self
            .shelf
            .owned()
            .get(course_id)
            .map(|c| u32::from(c.progress.value()));
        CompleteLessonResponseDto::Ok(Json(SyncResultDto::new(outcome, progress)))
    }
}
