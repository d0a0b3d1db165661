//! Dashboard statistics.
//!
//! The statistics objects have no fixed schema, so they are returned as JSON.

use courseware_core::Result;

use crate::client::AuthenticatedHttpClient;
use crate::endpoints::paths;
use crate::request::RequestDescriptor;

impl AuthenticatedHttpClient {
    pub async fn instructor_analytics(&self) -> Result<serde_json::Value> {
        self.send_data(RequestDescriptor::get(paths::ANALYTICS_INSTRUCTOR))
            .await
    }

    pub async fn admin_analytics(&self) -> Result<serde_json::Value> {
        self.send_data(RequestDescriptor::get(paths::ANALYTICS_ADMIN))
            .await
    }
}
