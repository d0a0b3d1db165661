//! Wire models of the marketplace API.
//!
//! Fields the backend may omit depending on the serializer in use are
//! optional or defaulted, so the same type reads list and detail payloads.

mod course;
mod enrollment;
mod envelope;
mod instructor;
mod user;

pub use course::{
    Category, CourseDetail, CourseDraft, CourseStatus, CourseSummary, Difficulty, Lesson,
    LessonSummary, LessonType, NewLesson, NewReview, NewSection, Review, ReviewDecision, Section,
};
pub use enrollment::{Enrollment, EnrollmentCourse};
pub use envelope::{Envelope, Page, PageResults};
pub use instructor::{InstructorRequest, NewInstructorRequest, RequestStatus};
pub use user::{LoginResponse, LoginTokens, NewAccount, Role, User, UserUpdate};
