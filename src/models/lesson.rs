// src/models/lesson.rs

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub video_url: Option<String>,
    /// 1-based position within the course.
    pub order: u32,
    #[serde(default)]
    pub is_completed: bool,
}

/// Sorts lessons into playback order. The backend does not guarantee
/// ordering on the wire.
pub fn sort_lessons(lessons: &mut [Lesson]) {
    lessons.sort_by_key(|l| l.order);
}

/// Per-lesson unlock flags for a sorted lesson list.
///
/// A lesson is unlocked while its order does not exceed the first
/// uncompleted lesson's order: completed lessons stay reviewable, the
/// next lesson opens up, everything past it stays locked. A fully
/// completed course is entirely unlocked.
pub fn unlocked_flags(lessons: &[Lesson]) -> Vec<bool> {
    let limit = lessons.iter().find(|l| !l.is_completed).map(|l| l.order);
    lessons
        .iter()
        .map(|l| match limit {
            Some(order) => l.order <= order,
            None => true,
        })
        .collect()
}

/// The lesson adjacent to `current` in playback order, if any.
/// `offset` is +1 for next, -1 for previous.
pub fn neighbor<'a>(lessons: &'a [Lesson], current: &Lesson, offset: i64) -> Option<&'a Lesson> {
    let target = current.order as i64 + offset;
    if target < 1 {
        return None;
    }
    lessons.iter().find(|l| l.order as i64 == target)
}
