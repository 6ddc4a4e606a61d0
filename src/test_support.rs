// Doubles shared by the unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use tokio::sync::Semaphore;

use crate::domain::CourseInfo;
use crate::lesson_client::{LessonDto, LessonGateway};

pub(crate) fn course_info(id: &str) -> CourseInfo {
    CourseInfo {
        id: id.into(),
        title: format!("Course {id}"),
        teacher: "Teacher".into(),
        price: "$19".into(),
        image: String::new(),
    }
}

/// Lesson API stand-in. Courses it doesn't know answer with an error.
/// A held gateway parks every response until `release` hands out permits.
#[derive(Default)]
pub(crate) struct FakeGateway {
    courses: Mutex<HashMap<String, Vec<bool>>>,
    calls: AtomicUsize,
    hold: Option<Semaphore>,
    completed_lessons: Mutex<Vec<String>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn held() -> Self {
        Self {
            hold: Some(Semaphore::new(0)),
            ..Self::default()
        }
    }

    pub fn with_course(self, course_id: &str, completed: &[bool]) -> Self {
        self.set_course(course_id, completed);
        self
    }

    pub fn set_course(&self, course_id: &str, completed: &[bool]) {
        self.courses
            .lock()
            .insert(course_id.to_string(), completed.to_vec());
    }

    pub fn release(&self, n: usize) {
        if let Some(hold) = &self.hold {
            hold.add_permits(n);
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn completed_lessons(&self) -> Vec<String> {
        self.completed_lessons.lock().clone()
    }

    /// Yield until `n` requests have been issued.
    pub async fn wait_for_calls(&self, n: usize) {
        while self.calls() < n {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait::async_trait]
impl LessonGateway for FakeGateway {
    async fn lessons_by_course(&self, course_id: &str) -> anyhow::Result<Vec<LessonDto>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(hold) = &self.hold {
            hold.acquire().await?.forget();
        }
        let flags = self
            .courses
            .lock()
            .get(course_id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("502 Bad Gateway for course {course_id}"))?;
        Ok(flags
            .into_iter()
            .enumerate()
            .map(|(i, completed)| LessonDto {
                id: Some(format!("{course_id}-l{i}")),
                completed: Some(completed),
                ..LessonDto::default()
            })
            .collect())
    }

    async fn complete_lesson(
        &self,
        lesson_id: &str,
        course_id: Option<&str>,
    ) -> anyhow::Result<()> {
        let Some(course_id) = course_id else {
            anyhow::bail!("400 Bad Request: courseId missing");
        };
        let mut courses = self.courses.lock();
        let flags = courses
            .get_mut(course_id)
            .ok_or_else(|| anyhow::anyhow!("404 Not Found: {course_id}"))?;
        let index = lesson_id
            .rsplit_once("-l")
            .and_then(|(_, i)| i.parse::<usize>().ok())
            .filter(|i| *i < flags.len())
            .ok_or_else(|| anyhow::anyhow!("404 Not Found: {lesson_id}"))?;
        flags[index] = true;
        self.completed_lessons.lock().push(lesson_id.to_string());
        Ok(())
    }
}
