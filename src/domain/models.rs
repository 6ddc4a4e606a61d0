// Records held by the shelf. Field names match the persisted JSON snapshots.

use serde::{Deserialize, Serialize};

use super::progress::Progress;

/// Display metadata shared by owned and saved courses. Opaque to the shelf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseInfo {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub teacher: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnedCourse {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub teacher: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub progress: Progress,
}

impl OwnedCourse {
    pub fn new(info: CourseInfo, progress: Progress) -> Self {
        let CourseInfo {
            id,
            title,
            teacher,
            price,
            image,
        } = info;
        OwnedCourse {
            id,
            title,
            teacher,
            price,
            image,
            progress,
        }
    }
}

/// A bookmark. Carries the listing fields the catalog shows but no progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedCourse {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub teacher: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lessons: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
}

impl From<CourseInfo> for SavedCourse {
    fn from(info: CourseInfo) -> Self {
        SavedCourse {
            id: info.id,
            title: info.title,
            teacher: info.teacher,
            price: info.price,
            image: info.image,
            rating: None,
            lessons: None,
            badge: None,
        }
    }
}

/// The "My Courses" tabs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CourseTab {
    #[default]
    All,
    Ongoing,
    Completed,
}

impl CourseTab {
    pub fn matches(self, course: &OwnedCourse) -> bool {
        match self {
            CourseTab::All => true,
            CourseTab::Ongoing => course.progress.is_ongoing(),
            CourseTab::Completed => course.progress.is_completed(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CourseStats {
    pub all: usize,
    pub ongoing: usize,
    pub completed: usize,
}

impl CourseStats {
    pub fn tally<'a>(courses: impl IntoIterator<Item = &'a OwnedCourse>) -> Self {
        courses
            .into_iter()
            .fold(CourseStats::default(), |mut stats, course| {
                stats.all += 1;
                if course.progress.is_ongoing() {
                    stats.ongoing += 1;
                }
                if course.progress.is_completed() {
                    stats.completed += 1;
                }
                stats
            })
    }
}

/// Records addressable by course id inside a persisted list.
pub trait Keyed {
    fn id(&self) -> &str;
}

impl Keyed for OwnedCourse {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Keyed for SavedCourse {
    fn id(&self) -> &str {
        &self.id
    }
}
