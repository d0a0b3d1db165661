//! Catalog: categories, courses, sections, lessons, reviews.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

/// Editorial status of a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CourseStatus {
    Draft,
    Pending,
    Approved,
    Rejected,
    Published,
}

impl CourseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CourseStatus::Draft => "DRAFT",
            CourseStatus::Pending => "PENDING",
            CourseStatus::Approved => "APPROVED",
            CourseStatus::Rejected => "REJECTED",
            CourseStatus::Published => "PUBLISHED",
        }
    }
}

impl std::str::FromStr for CourseStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DRAFT" => Ok(CourseStatus::Draft),
            "PENDING" => Ok(CourseStatus::Pending),
            "APPROVED" => Ok(CourseStatus::Approved),
            "REJECTED" => Ok(CourseStatus::Rejected),
            "PUBLISHED" => Ok(CourseStatus::Published),
            other => Err(format!("unknown course status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LessonType {
    Video,
    Article,
    Quiz,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub course_count: u64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

/// A course as listed in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseSummary {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub instructor_name: String,
    #[serde(default)]
    pub category_name: String,
    pub difficulty_level: Difficulty,
    /// Decimal serialized as a string, e.g. `"49.99"`.
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub is_free: bool,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub duration_hours: u32,
    pub status: CourseStatus,
    #[serde(default)]
    pub enrollment_count: u64,
    #[serde(default)]
    pub average_rating: Option<String>,
    #[serde(default)]
    pub total_reviews: u64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

impl CourseSummary {
    /// Price for display: "Free" or the decimal string.
    pub fn price_label(&self) -> String {
        if self.is_free {
            "Free".to_string()
        } else {
            self.price.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonSummary {
    pub id: Uuid,
    pub title: String,
    pub lesson_type: LessonType,
    #[serde(default)]
    pub video_duration: Option<u32>,
    #[serde(default)]
    pub is_preview: bool,
    #[serde(default)]
    pub order: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: Uuid,
    #[serde(default)]
    pub course: Option<Uuid>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub lessons: Vec<LessonSummary>,
    #[serde(default)]
    pub lesson_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: Uuid,
    #[serde(default)]
    pub section: Option<Uuid>,
    pub title: String,
    pub lesson_type: LessonType,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub video_duration: Option<u32>,
    #[serde(default)]
    pub is_preview: bool,
    #[serde(default)]
    pub order: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    #[serde(default)]
    pub course: Option<Uuid>,
    #[serde(default)]
    pub student_name: String,
    pub rating: u8,
    #[serde(default)]
    pub review_text: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A course with its instructor, curriculum and reviews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseDetail {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub instructor: Option<User>,
    #[serde(default)]
    pub category: Option<Category>,
    pub difficulty_level: Difficulty,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub is_free: bool,
    #[serde(default)]
    pub duration_hours: u32,
    pub status: CourseStatus,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub enrollment_count: u64,
    #[serde(default)]
    pub average_rating: Option<String>,
    #[serde(default)]
    pub is_enrolled: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewSection {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub order: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewLesson {
    pub title: String,
    pub lesson_type: LessonType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_duration: Option<u32>,
    pub is_preview: bool,
    pub order: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewReview {
    pub rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_text: Option<String>,
}

/// Fields of a course to create or change. Unset fields are left out of
/// the body, so the same type serves `POST` and `PATCH`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CourseDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty_level: Option<Difficulty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_hours: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub learning_outcomes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
}

/// Admin decision on a course or an instructor request.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewDecision {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_notes: Option<String>,
}
