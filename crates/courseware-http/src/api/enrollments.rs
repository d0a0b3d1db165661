//! Enrollments and lesson progress.

use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use courseware_core::Result;
use courseware_core::models::Enrollment;

use crate::client::AuthenticatedHttpClient;
use crate::endpoints::paths;
use crate::request::RequestDescriptor;

#[derive(Serialize)]
struct NewEnrollment {
    course: Uuid,
}

impl AuthenticatedHttpClient {
    /// The signed-in student's enrollments.
    pub async fn my_enrollments(&self) -> Result<Vec<Enrollment>> {
        self.fetch_list(RequestDescriptor::get(paths::ENROLLMENTS))
            .await
    }

    #[instrument(skip(self))]
    pub async fn enroll(&self, course: Uuid) -> Result<Enrollment> {
        let descriptor =
            RequestDescriptor::post(paths::ENROLLMENTS).json(&NewEnrollment { course })?;
        let enrollment: Enrollment = self.fetch_item(descriptor).await?;
        info!(enrollment = %enrollment.id, "Enrolled");
        Ok(enrollment)
    }

    /// Record a lesson as completed. Returns the server's message.
    #[instrument(skip(self))]
    pub async fn mark_lesson_complete(&self, lesson: Uuid) -> Result<Option<String>> {
        let response = self
            .request(RequestDescriptor::post(paths::mark_complete(lesson)))
            .await?;
        Ok(response.message())
    }
}
