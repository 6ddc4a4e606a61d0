use poem_openapi::payload::Json;

use crate::{
    api::models::{
        AddCourseRequestDto, AddCourseResponseDto, ClearedDto, ClearedResponseDto, CourseTabDto,
        ErrorDto, NoContentResponseDto, OwnedCourseDto, OwnedCourseListResponseDto,
        OwnedCourseResponseDto, StatsDto, StatsResponseDto, SyncResponseDto, SyncResultDto,
    },
    domain::{CourseInfo, CourseTab},
    shelf::Shelf,
};

pub struct CourseService<'a> {
    pub shelf: &'a Shelf,
}

impl<'a> CourseService<'a> {
    pub fn new(shelf: &'a Shelf) -> Self {
        Self { shelf }
    }

    fn not_owned(id: &str) -> ErrorDto {
        ErrorDto {
            message: format!("Course {} is not owned", id),
        }
    }

    fn stored_progress(&self, id: &str) -> Option<u32> {
        self.shelf
            .owned()
            .get(id)
            .map(|c| u32::from(c.progress.value()))
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub fn list(&self, tab: Option<CourseTabDto>) -> OwnedCourseListResponseDto {
        let tab = tab.map(CourseTab::from).unwrap_or_default();
        let dtos = self
            .shelf
            .owned()
            .filter(tab)
            .into_iter()
            .map(OwnedCourseDto::from)
            .collect();
        OwnedCourseListResponseDto::Ok(Json(dtos))
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub fn get(&self, id: &str) -> OwnedCourseResponseDto {
        match self.shelf.owned().get(id) {
            Some(course) => OwnedCourseResponseDto::Ok(Json(course.into())),
            None => OwnedCourseResponseDto::NotFound(Json(Self::not_owned(id))),
        }
    }

    #[tracing::instrument(level = "debug", skip(self, req), fields(id = %req.course.id))]
    pub async fn add(&self, req: AddCourseRequestDto) -> AddCourseResponseDto {
        if req.course.id.trim().is_empty() {
            return AddCourseResponseDto::BadRequest(Json(ErrorDto {
                message: "Course id is required".to_string(),
            }));
        }
        let info = CourseInfo::from(req.course);
        let id = info.id.clone();
        let added = self
            .shelf
            .owned()
            .add_course(info, req.progress.unwrap_or(0.0))
            .await;
        let Some(course) = self.shelf.owned().get(&id) else {
            // Removed concurrently between add and read.
            return AddCourseResponseDto::BadRequest(Json(Self::not_owned(&id)));
        };
        if added {
            AddCourseResponseDto::Created(Json(course.into()))
        } else {
            AddCourseResponseDto::AlreadyOwned(Json(course.into()))
        }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn set_progress(&self, id: &str, progress: f64) -> OwnedCourseResponseDto {
        if !self.shelf.owned().set_progress(id, progress).await {
            return OwnedCourseResponseDto::NotFound(Json(Self::not_owned(id)));
        }
        self.get(id)
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn complete(&self, id: &str) -> OwnedCourseResponseDto {
        if !self.shelf.owned().mark_completed(id).await {
            return OwnedCourseResponseDto::NotFound(Json(Self::not_owned(id)));
        }
        self.get(id)
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn remove(&self, id: &str) -> NoContentResponseDto {
        if self.shelf.owned().remove_course(id).await {
            NoContentResponseDto::NoContent
        } else {
            NoContentResponseDto::NotFound(Json(Self::not_owned(id)))
        }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn clear(&self) -> ClearedResponseDto {
        let removed = self.shelf.owned().clear_all().await;
        ClearedResponseDto::Ok(Json(ClearedDto {
            removed: removed as u64,
        }))
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub fn stats(&self) -> StatsResponseDto {
        StatsResponseDto::Ok(Json(StatsDto::new(
            self.shelf.owned().stats(),
            self.shelf.saved().saved_count(),
        )))
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn sync(&self, id: &str) -> SyncResponseDto {
        let outcome = self.shelf.reconciler().observe(id).await;
        SyncResponseDto::Ok(Json(SyncResultDto::new(outcome, self.stored_progress(id))))
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub fn release(&self, id: &str) -> NoContentResponseDto {
        if self.shelf.reconciler().release(id) {
            tracing::debug!("cancelled request in flight");
        }
        NoContentResponseDto::NoContent
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::api::models::{CourseInfoDto, SyncOutcomeDto};
    use crate::shelf::ShelfOptions;
    use crate::storage::MemoryStore;
    use crate::test_support::FakeGateway;

    async fn shelf(gateway: FakeGateway) -> Shelf {
        Shelf::open(
            Arc::new(MemoryStore::new()),
            Arc::new(gateway),
            ShelfOptions::default(),
        )
        .await
    }

    fn add_req(id: &str, progress: Option<f64>) -> AddCourseRequestDto {
        AddCourseRequestDto {
            course: CourseInfoDto {
                id: id.into(),
                title: "UI Basics".into(),
                teacher: "Julia Kim".into(),
                price: "$19".into(),
                image: String::new(),
            },
            progress,
        }
    }

    #[tokio::test]
    async fn add_then_add_again_keeps_progress() {
        let shelf = shelf(FakeGateway::new()).await;
        let service = CourseService::new(&shelf);

        match service.add(add_req("c1", Some(35.4))).await {
            AddCourseResponseDto::Created(Json(c)) => assert_eq!(c.progress, 35),
            _ => panic!("expected Created"),
        }
        match service.add(add_req("c1", None)).await {
            AddCourseResponseDto::AlreadyOwned(Json(c)) => assert_eq!(c.progress, 35),
            _ => panic!("expected AlreadyOwned"),
        }
        assert!(matches!(
            service.add(add_req("  ", None)).await,
            AddCourseResponseDto::BadRequest(_)
        ));
    }

    #[tokio::test]
    async fn progress_on_unowned_course_is_404() {
        let shelf = shelf(FakeGateway::new()).await;
        let service = CourseService::new(&shelf);
        assert!(matches!(
            service.set_progress("ghost", 50.0).await,
            OwnedCourseResponseDto::NotFound(_)
        ));
        assert!(matches!(
            service.complete("ghost").await,
            OwnedCourseResponseDto::NotFound(_)
        ));
        assert!(!shelf.owned().is_owned("ghost"));
    }

    #[tokio::test]
    async fn tabs_and_stats() {
        let shelf = shelf(FakeGateway::new()).await;
        let service = CourseService::new(&shelf);
        for (id, p) in [("a", 0.0), ("b", 45.0), ("c", 100.0)] {
            service.add(add_req(id, Some(p))).await;
        }
        let OwnedCourseListResponseDto::Ok(Json(ongoing)) =
            service.list(Some(CourseTabDto::Ongoing));
        assert_eq!(ongoing.len(), 1);
        assert_eq!(ongoing[0].id, "b");
        let OwnedCourseListResponseDto::Ok(Json(all)) = service.list(None);
        assert_eq!(all.len(), 3);

        let StatsResponseDto::Ok(Json(stats)) = service.stats();
        assert_eq!((stats.all, stats.ongoing, stats.completed, stats.saved), (3, 1, 1, 0));

        assert!(matches!(service.remove("c").await, NoContentResponseDto::NoContent));
        assert!(matches!(service.remove("c").await, NoContentResponseDto::NotFound(_)));
        let ClearedResponseDto::Ok(Json(cleared)) = service.clear().await;
        assert_eq!(cleared.removed, 2);
    }

    #[tokio::test]
    async fn sync_reports_outcome_and_stored_progress() {
        let shelf = shelf(FakeGateway::new().with_course("c1", &[true, false, true, true])).await;
        let service = CourseService::new(&shelf);

        let SyncResponseDto::Ok(Json(res)) = service.sync("c1").await;
        assert_eq!(res.outcome, SyncOutcomeDto::NotOwned);
        assert_eq!(res.progress, None);

        service.add(add_req("c1", None)).await;
        let SyncResponseDto::Ok(Json(res)) = service.sync("c1").await;
        assert_eq!(res.outcome, SyncOutcomeDto::Applied);
        assert_eq!(res.progress, Some(75));

        let SyncResponseDto::Ok(Json(res)) = service.sync("c1").await;
        assert_eq!(res.outcome, SyncOutcomeDto::AlreadySynced);

        assert!(matches!(service.release("c1"), NoContentResponseDto::NoContent));
        let SyncResponseDto::Ok(Json(res)) = service.sync("c1").await;
        assert_eq!(res.outcome, SyncOutcomeDto::AlreadySynced);
        assert_eq!(res.progress, Some(75));
    }
}
