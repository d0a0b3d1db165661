//! Enrollments and lesson progress.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::course::CourseSummary;

/// The course of an enrollment: nested summary, or just its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnrollmentCourse {
    Summary(Box<CourseSummary>),
    Id(Uuid),
}

impl EnrollmentCourse {
    pub fn id(&self) -> Uuid {
        match self {
            EnrollmentCourse::Summary(course) => course.id,
            EnrollmentCourse::Id(id) => *id,
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            EnrollmentCourse::Summary(course) => Some(&course.title),
            EnrollmentCourse::Id(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: Uuid,
    pub course: EnrollmentCourse,
    #[serde(default)]
    pub student_name: Option<String>,
    /// Decimal serialized as a string, e.g. `"33.33"`.
    #[serde(default)]
    pub progress_percentage: Option<String>,
    #[serde(default)]
    pub completed_lessons: Vec<Uuid>,
    #[serde(default)]
    pub enrolled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Enrollment {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}
