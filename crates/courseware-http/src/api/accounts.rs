//! Profile, instructor requests and user administration.

use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use courseware_core::Result;
use courseware_core::error::{Error, InvalidInputError};
use courseware_core::models::{
    InstructorRequest, NewInstructorRequest, ReviewDecision, Role, User, UserUpdate,
};

use crate::client::AuthenticatedHttpClient;
use crate::endpoints::paths;
use crate::request::RequestDescriptor;

#[derive(Serialize)]
struct RoleChange {
    role: Role,
}

impl AuthenticatedHttpClient {
    /// The signed-in user's profile. Refreshes the cached user.
    #[instrument(skip(self))]
    pub async fn profile(&self) -> Result<User> {
        let user: User = self.fetch_item(RequestDescriptor::get(paths::PROFILE)).await?;
        self.inner.store.save_user(&user)?;
        Ok(user)
    }

    /// Change profile fields; the returned user replaces the cached one.
    #[instrument(skip(self, update))]
    pub async fn update_profile(&self, update: &UserUpdate) -> Result<User> {
        if update.is_empty() {
            return Err(Error::InvalidInput(InvalidInputError::Other {
                message: "no profile fields to update".to_string(),
            }));
        }
        let descriptor = RequestDescriptor::patch(paths::PROFILE).json(update)?;
        let user: User = self.fetch_item(descriptor).await?;
        self.inner.store.save_user(&user)?;
        info!("Profile updated");
        Ok(user)
    }

    /// Replace the profile wholesale with PUT. Unset fields are sent as absent.
    #[instrument(skip(self, profile))]
    pub async fn replace_profile(&self, profile: &UserUpdate) -> Result<User> {
        let descriptor = RequestDescriptor::put(paths::PROFILE).json(profile)?;
        let user: User = self.fetch_item(descriptor).await?;
        self.inner.store.save_user(&user)?;
        info!("Profile replaced");
        Ok(user)
    }

    /// The caller's own requests, or every request for an admin.
    pub async fn instructor_requests(&self) -> Result<Vec<InstructorRequest>> {
        self.fetch_list(RequestDescriptor::get(paths::INSTRUCTOR_REQUESTS))
            .await
    }

    pub async fn instructor_request(&self, id: Uuid) -> Result<InstructorRequest> {
        self.fetch_item(RequestDescriptor::get(paths::instructor_request(id)))
            .await
    }

    #[instrument(skip(self, request))]
    pub async fn create_instructor_request(
        &self,
        request: &NewInstructorRequest,
    ) -> Result<InstructorRequest> {
        let descriptor = RequestDescriptor::post(paths::INSTRUCTOR_REQUESTS).json(request)?;
        self.fetch_item(descriptor).await
    }

    /// Approve or reject a request (admin).
    #[instrument(skip(self, decision), fields(status = %decision.status))]
    pub async fn review_instructor_request(
        &self,
        id: Uuid,
        decision: &ReviewDecision,
    ) -> Result<InstructorRequest> {
        let descriptor =
            RequestDescriptor::post(paths::instructor_request_review(id)).json(decision)?;
        self.fetch_item(descriptor).await
    }

    /// Any user by id (admin).
    pub async fn user(&self, id: Uuid) -> Result<User> {
        self.fetch_item(RequestDescriptor::get(paths::user(id))).await
    }

    /// Change a user's role (admin).
    #[instrument(skip(self), fields(role = role.as_str()))]
    pub async fn set_user_role(&self, id: Uuid, role: Role) -> Result<User> {
        let descriptor = RequestDescriptor::patch(paths::user_role(id)).json(&RoleChange { role })?;
        self.fetch_item(descriptor).await
    }
}
