use poem_openapi::{ApiResponse, Enum, Object, payload::Json};

use crate::domain::{CourseInfo, CourseStats, CourseTab, OwnedCourse, SavedCourse};
use crate::shelf::ReconcileOutcome;

#[derive(Debug, Clone, Object)]
pub struct ErrorDto {
    /// Human-readable error message
    pub message: String,
}

#[derive(Debug, Clone, Object)]
#[oai(rename_all = "camelCase")]
pub struct CourseInfoDto {
    pub id: String,
    #[oai(default)]
    pub title: String,
    #[oai(default)]
    pub teacher: String,
    #[oai(default)]
    pub price: String,
    #[oai(default)]
    pub image: String,
}

impl From<CourseInfoDto> for CourseInfo {
    fn from(dto: CourseInfoDto) -> Self {
        CourseInfo {
            id: dto.id,
            title: dto.title,
            teacher: dto.teacher,
            price: dto.price,
            image: dto.image,
        }
    }
}

#[derive(Debug, Clone, Object)]
#[oai(rename_all = "camelCase")]
pub struct OwnedCourseDto {
    pub id: String,
    pub title: String,
    pub teacher: String,
    pub price: String,
    pub image: String,
    /// Whole percentage, 0-100
    pub progress: u32,
}

impl From<OwnedCourse> for OwnedCourseDto {
    fn from(c: OwnedCourse) -> Self {
        OwnedCourseDto {
            id: c.id,
            title: c.title,
            teacher: c.teacher,
            price: c.price,
            image: c.image,
            progress: u32::from(c.progress.value()),
        }
    }
}

#[derive(Debug, Clone, Object)]
pub struct AddCourseRequestDto {
    pub course: CourseInfoDto,
    /// Initial progress; defaults to 0 and is ignored if the course is already owned
    pub progress: Option<f64>,
}

#[derive(Debug, Clone, Object)]
pub struct SetProgressRequestDto {
    /// Any number; stored clamped to 0-100 and rounded
    pub progress: f64,
}

#[derive(Debug, Clone, Object)]
#[oai(rename_all = "camelCase")]
pub struct SavedCourseDto {
    pub id: String,
    #[oai(default)]
    pub title: String,
    #[oai(default)]
    pub teacher: String,
    #[oai(default)]
    pub price: String,
    #[oai(default)]
    pub image: String,
    pub rating: Option<String>,
    pub lessons: Option<String>,
    pub badge: Option<String>,
}

impl From<SavedCourse> for SavedCourseDto {
    fn from(c: SavedCourse) -> Self {
        SavedCourseDto {
            id: c.id,
            title: c.title,
            teacher: c.teacher,
            price: c.price,
            image: c.image,
            rating: c.rating,
            lessons: c.lessons,
            badge: c.badge,
        }
    }
}

impl From<SavedCourseDto> for SavedCourse {
    fn from(dto: SavedCourseDto) -> Self {
        SavedCourse {
            id: dto.id,
            title: dto.title,
            teacher: dto.teacher,
            price: dto.price,
            image: dto.image,
            rating: dto.rating,
            lessons: dto.lessons,
            badge: dto.badge,
        }
    }
}

#[derive(Debug, Clone, Object)]
#[oai(rename_all = "camelCase")]
pub struct SavedStatusDto {
    pub id: String,
    pub saved: bool,
    pub saved_count: u64,
}

#[derive(Debug, Clone, Object)]
pub struct ClearedDto {
    pub removed: u64,
}

#[derive(Debug, Clone, Object)]
pub struct StatsDto {
    pub all: u64,
    pub ongoing: u64,
    pub completed: u64,
    pub saved: u64,
}

impl StatsDto {
    pub fn new(stats: CourseStats, saved: usize) -> Self {
        StatsDto {
            all: stats.all as u64,
            ongoing: stats.ongoing as u64,
            completed: stats.completed as u64,
            saved: saved as u64,
        }
    }
}

#[derive(Debug, Clone, Object)]
pub struct ReadyDto {
    pub ready: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum)]
#[oai(rename_all = "lowercase")]
pub enum CourseTabDto {
    All,
    Ongoing,
    Completed,
}

impl From<CourseTabDto> for CourseTab {
    fn from(tab: CourseTabDto) -> Self {
        match tab {
            CourseTabDto::All => CourseTab::All,
            CourseTabDto::Ongoing => CourseTab::Ongoing,
            CourseTabDto::Completed => CourseTab::Completed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum)]
#[oai(rename_all = "snake_case")]
pub enum SyncOutcomeDto {
    NotOwned,
    AlreadySynced,
    Applied,
    NoLessons,
    Failed,
    Discarded,
}

#[derive(Debug, Clone, Object)]
pub struct SyncResultDto {
    pub outcome: SyncOutcomeDto,
    /// Stored progress after the sync, if the course is owned
    pub progress: Option<u32>,
}

impl SyncResultDto {
    pub fn new(outcome: ReconcileOutcome, progress: Option<u32>) -> Self {
        let outcome = match outcome {
            ReconcileOutcome::NotOwned => SyncOutcomeDto::NotOwned,
            ReconcileOutcome::AlreadySynced => SyncOutcomeDto::AlreadySynced,
            ReconcileOutcome::Applied(_) => SyncOutcomeDto::Applied,
            ReconcileOutcome::NoLessons => SyncOutcomeDto::NoLessons,
            ReconcileOutcome::Failed => SyncOutcomeDto::Failed,
            ReconcileOutcome::Discarded => SyncOutcomeDto::Discarded,
        };
        SyncResultDto { outcome, progress }
    }
}

#[derive(Debug, Clone, Object)]
#[oai(rename_all = "camelCase")]
pub struct CompleteLessonRequestDto {
    pub course_id: String,
}

// ===== Responses =====

#[derive(ApiResponse)]
pub enum ReadyResponseDto {
    /// Both stores hydrated
    #[oai(status = 200)]
    Ok(Json<ReadyDto>),

    /// Still hydrating
    #[oai(status = 503)]
    NotReady(Json<ReadyDto>),
}

#[derive(ApiResponse)]
pub enum OwnedCourseListResponseDto {
    #[oai(status = 200)]
    Ok(Json<Vec<OwnedCourseDto>>),
}

#[derive(ApiResponse)]
pub enum OwnedCourseResponseDto {
    #[oai(status = 200)]
    Ok(Json<OwnedCourseDto>),

    /// Course is not owned
    #[oai(status = 404)]
    NotFound(Json<ErrorDto>),
}

#[derive(ApiResponse)]
pub enum AddCourseResponseDto {
    /// Newly owned
    #[oai(status = 201)]
    Created(Json<OwnedCourseDto>),

    /// Already owned; existing progress kept
    #[oai(status = 200)]
    AlreadyOwned(Json<OwnedCourseDto>),

    #[oai(status = 400)]
    BadRequest(Json<ErrorDto>),
}

#[derive(ApiResponse)]
pub enum NoContentResponseDto {
    /// Empty 204 response
    #[oai(status = 204)]
    NoContent,

    #[oai(status = 404)]
    NotFound(Json<ErrorDto>),
}

#[derive(ApiResponse)]
pub enum ClearedResponseDto {
    #[oai(status = 200)]
    Ok(Json<ClearedDto>),
}

#[derive(ApiResponse)]
pub enum StatsResponseDto {
    #[oai(status = 200)]
    Ok(Json<StatsDto>),
}

#[derive(ApiResponse)]
pub enum SyncResponseDto {
    #[oai(status = 200)]
    Ok(Json<SyncResultDto>),
}

#[derive(ApiResponse)]
pub enum SavedListResponseDto {
    /// Most recently saved first
    #[oai(status = 200)]
    Ok(Json<Vec<SavedCourseDto>>),
}

#[derive(ApiResponse)]
pub enum SavedStatusResponseDto {
    #[oai(status = 200)]
    Ok(Json<SavedStatusDto>),

    #[oai(status = 400)]
    BadRequest(Json<ErrorDto>),
}

#[derive(ApiResponse)]
pub enum CompleteLessonResponseDto {
    /// Lesson recorded; progress re-synced
    #[oai(status = 200)]
    Ok(Json<SyncResultDto>),

    /// Upstream lesson API error
    #[oai(status = 502)]
    BadGateway(Json<ErrorDto>),
}
