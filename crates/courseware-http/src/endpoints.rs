//! Endpoint paths, relative to the API base URL.

pub mod paths {
    use uuid::Uuid;

    pub const LOGIN: &str = "/accounts/login/";
    pub const REGISTER: &str = "/accounts/register/";
    pub const TOKEN_REFRESH: &str = "/accounts/token/refresh/";
    pub const VERIFY_EMAIL: &str = "/accounts/verify-email/";
    pub const PROFILE: &str = "/accounts/profile/";
    pub const INSTRUCTOR_REQUESTS: &str = "/accounts/instructor-requests/";

    pub const COURSES: &str = "/courses/courses/";
    pub const MY_COURSES: &str = "/courses/my-courses/";
    pub const CATEGORIES: &str = "/courses/categories/";

    pub const ENROLLMENTS: &str = "/enrollments/enrollments/";

    pub const ANALYTICS_INSTRUCTOR: &str = "/analytics/instructor/";
    pub const ANALYTICS_ADMIN: &str = "/analytics/admin/";

    pub fn course(id: Uuid) -> String {
        format!("{COURSES}{id}/")
    }

    pub fn course_submit(id: Uuid) -> String {
        format!("{COURSES}{id}/submit_for_review/")
    }

    pub fn course_review(id: Uuid) -> String {
        format!("{COURSES}{id}/review/")
    }

    pub fn category(id: Uuid) -> String {
        format!("{CATEGORIES}{id}/")
    }

    pub fn sections(course: Uuid) -> String {
        format!("{COURSES}{course}/sections/")
    }

    pub fn lessons(course: Uuid, section: Uuid) -> String {
        format!("{COURSES}{course}/sections/{section}/lessons/")
    }

    pub fn reviews(course: Uuid) -> String {
        format!("{COURSES}{course}/reviews/")
    }

    pub fn mark_complete(lesson: Uuid) -> String {
        format!("/enrollments/progress/{lesson}/mark_complete/")
    }

    pub fn instructor_request(id: Uuid) -> String {
        format!("{INSTRUCTOR_REQUESTS}{id}/")
    }

    pub fn instructor_request_review(id: Uuid) -> String {
        format!("{INSTRUCTOR_REQUESTS}{id}/review/")
    }

    pub fn user(id: Uuid) -> String {
        format!("/accounts/users/{id}/")
    }

    pub fn user_role(id: Uuid) -> String {
        format!("/accounts/users/{id}/update_role/")
    }
}
