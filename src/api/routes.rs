use poem_openapi::{
    OpenApi,
    param::{Path, Query},
    payload::Json,
};

use super::models::{
    AddCourseRequestDto, AddCourseResponseDto, ClearedResponseDto, CompleteLessonRequestDto,
    CompleteLessonResponseDto, CourseTabDto, NoContentResponseDto, OwnedCourseListResponseDto,
    OwnedCourseResponseDto, ReadyResponseDto, SavedCourseDto, SavedListResponseDto,
    SavedStatusResponseDto, SetProgressRequestDto, StatsResponseDto, SyncResponseDto,
};
use super::services::{
    courses::CourseService, health::HealthService, lessons::LessonService, saved::SavedService,
};
use crate::shelf::Shelf;

pub struct CourseShelfApi {
    pub shelf: Shelf,
}

#[OpenApi]
impl CourseShelfApi {
    /// Whether both stores finished hydrating
    #[oai(path = "/ready", method = "get")]
    #[tracing::instrument(level = "debug", skip(self))]
    async fn ready(&self) -> ReadyResponseDto {
        HealthService::new(&self.shelf).ready()
    }

    // ===== Owned courses =====

    /// Owned courses, optionally narrowed to one tab
    #[oai(path = "/my-courses", method = "get")]
    #[tracing::instrument(level = "debug", skip(self, tab))]
    async fn list_my_courses(
        &self,
        /// all (default), ongoing or completed
        Query(tab): Query<Option<CourseTabDto>>,
    ) -> OwnedCourseListResponseDto {
        CourseService::new(&self.shelf).list(tab)
    }

    /// Take ownership of a course; a course already owned keeps its progress
    #[oai(path = "/my-courses", method = "post")]
    #[tracing::instrument(level = "debug", skip(self, body))]
    async fn add_course(&self, body: Json<AddCourseRequestDto>) -> AddCourseResponseDto {
        CourseService::new(&self.shelf).add(body.0).await
    }

    /// Remove every owned course
    #[oai(path = "/my-courses", method = "delete")]
    #[tracing::instrument(level = "debug", skip(self))]
    async fn clear_my_courses(&self) -> ClearedResponseDto {
        CourseService::new(&self.shelf).clear().await
    }

    #[oai(path = "/my-courses/:course_id", method = "get")]
    #[tracing::instrument(level = "debug", skip(self, course_id))]
    async fn get_course(&self, course_id: Path<String>) -> OwnedCourseResponseDto {
        CourseService::new(&self.shelf).get(&course_id.0)
    }

    #[oai(path = "/my-courses/:course_id", method = "delete")]
    #[tracing::instrument(level = "debug", skip(self, course_id))]
    async fn remove_course(&self, course_id: Path<String>) -> NoContentResponseDto {
        CourseService::new(&self.shelf).remove(&course_id.0).await
    }

    #[oai(path = "/my-courses/:course_id/progress", method = "put")]
    #[tracing::instrument(level = "debug", skip(self, course_id, body))]
    async fn set_progress(
        &self,
        course_id: Path<String>,
        body: Json<SetProgressRequestDto>,
    ) -> OwnedCourseResponseDto {
        CourseService::new(&self.shelf)
            .set_progress(&course_id.0, body.0.progress)
            .await
    }

    #[oai(path = "/my-courses/:course_id/complete", method = "post")]
    #[tracing::instrument(level = "debug", skip(self, course_id))]
    async fn mark_completed(&self, course_id: Path<String>) -> OwnedCourseResponseDto {
        CourseService::new(&self.shelf).complete(&course_id.0).await
    }

    /// Start observing an owned course; pulls lesson completion once per ownership
    #[oai(path = "/my-courses/:course_id/sync", method = "post")]
    #[tracing::instrument(level = "debug", skip(self, course_id))]
    async fn sync_course(&self, course_id: Path<String>) -> SyncResponseDto {
        CourseService::new(&self.shelf).sync(&course_id.0).await
    }

    /// View torn down; cancels a pull still in flight
    #[oai(path = "/my-courses/:course_id/sync", method = "delete")]
    #[tracing::instrument(level = "debug", skip(self, course_id))]
    async fn release_course(&self, course_id: Path<String>) -> NoContentResponseDto {
        CourseService::new(&self.shelf).release(&course_id.0)
    }

    /// Counters for the profile screen
    #[oai(path = "/stats", method = "get")]
    #[tracing::instrument(level = "debug", skip(self))]
    async fn stats(&self) -> StatsResponseDto {
        CourseService::new(&self.shelf).stats()
    }

    // ===== Bookmarks =====

    #[oai(path = "/saved", method = "get")]
    #[tracing::instrument(level = "debug", skip(self))]
    async fn list_saved(&self) -> SavedListResponseDto {
        SavedService::new(&self.shelf).list()
    }

    /// Save the course, or unsave it if already saved
    #[oai(path = "/saved/toggle", method = "post")]
    #[tracing::instrument(level = "debug", skip(self, body))]
    async fn toggle_saved(&self, body: Json<SavedCourseDto>) -> SavedStatusResponseDto {
        SavedService::new(&self.shelf).toggle(body.0).await
    }

    #[oai(path = "/saved", method = "delete")]
    #[tracing::instrument(level = "debug", skip(self))]
    async fn clear_saved(&self) -> ClearedResponseDto {
        SavedService::new(&self.shelf).clear().await
    }

    #[oai(path = "/saved/:course_id", method = "get")]
    #[tracing::instrument(level = "debug", skip(self, course_id))]
    async fn saved_status(&self, course_id: Path<String>) -> SavedStatusResponseDto {
        SavedService::new(&self.shelf).status(&course_id.0)
    }

    // ===== Lessons =====

    /// Mark a lesson completed upstream and refresh the course's progress
    #[oai(path = "/lessons/:lesson_id/complete", method = "post")]
    #[tracing::instrument(level = "debug", skip(self, lesson_id, body))]
    async fn complete_lesson(
        &self,
        lesson_id: Path<String>,
        body: Json<CompleteLessonRequestDto>,
    ) -> CompleteLessonResponseDto {
        LessonService::new(&self.shelf)
            .complete(&lesson_id.0, &body.0.course_id)
            .await
    }
}
