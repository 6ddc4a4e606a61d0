// Mapping from lesson API DTOs to shelf progress

use super::progress::Progress;
use crate::lesson_client::LessonDto;

/// Percentage of lessons marked completed, or `None` for a course with no
/// lessons (the ratio is undefined and must not be stored).
pub fn completion_progress(lessons: &[LessonDto]) -> Option<Progress> {
    let total = lessons.len();
    if total == 0 {
        return None;
    }
    let done = lessons.iter().filter(|l| l.is_completed()).count();
    Some(Progress::new(100.0 * done as f64 / total as f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lessons(flags: &[Option<bool>]) -> Vec<LessonDto> {
        flags
            .iter()
            .map(|c| LessonDto {
                completed: *c,
                ..LessonDto::default()
            })
            .collect()
    }

    #[test]
    fn three_of_four_is_75() {
        let ls = lessons(&[Some(true), Some(true), Some(false), Some(true)]);
        assert_eq!(completion_progress(&ls), Some(Progress::new(75.0)));
    }

    #[test]
    fn missing_flag_counts_as_not_completed() {
        let ls = lessons(&[Some(true), None, None]);
        assert_eq!(completion_progress(&ls).map(u8::from), Some(33));
    }

    #[test]
    fn two_of_three_rounds_up() {
        let ls = lessons(&[Some(true), Some(true), None]);
        assert_eq!(completion_progress(&ls).map(u8::from), Some(67));
    }

    #[test]
    fn empty_course_has_no_progress() {
        assert_eq!(completion_progress(&[]), None);
    }
}
