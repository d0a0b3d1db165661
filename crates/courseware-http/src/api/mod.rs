//! Typed operations over the marketplace endpoints.
//!
//! Every operation is a thin wrapper over
//! [`AuthenticatedHttpClient::request`](crate::AuthenticatedHttpClient::request),
//! so all of them share the refresh-and-replay behavior.

mod accounts;
mod analytics;
mod courses;
mod enrollments;

pub use courses::CourseQuery;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use courseware_core::Result;
use courseware_core::models::{Envelope, Page};

use crate::client::AuthenticatedHttpClient;
use crate::request::RequestDescriptor;

/// A list answer in any of the shapes the backend uses: a paginated page,
/// an enveloped array, or a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum ListBody<T> {
    Paged(Page<T>),
    Enveloped(Envelope<Vec<T>>),
    Bare(Vec<T>),
}

impl<T> ListBody<T> {
    /// Items and the link to the next page, if any.
    pub fn into_parts(self) -> (Vec<T>, Option<String>) {
        match self {
            ListBody::Paged(page) => {
                let next = page.next.clone().filter(|n| !n.is_empty());
                (page.into_items(), next)
            }
            ListBody::Enveloped(envelope) => (envelope.data, None),
            ListBody::Bare(items) => (items, None),
        }
    }

    pub fn into_items(self) -> Vec<T> {
        self.into_parts().0
    }
}

/// A single object, enveloped or bare.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum ItemBody<T> {
    Enveloped(Envelope<T>),
    Bare(T),
}

impl<T> ItemBody<T> {
    pub fn into_inner(self) -> T {
        match self {
            ItemBody::Enveloped(envelope) => envelope.data,
            ItemBody::Bare(item) => item,
        }
    }
}

impl AuthenticatedHttpClient {
    pub(crate) async fn fetch_list<T: DeserializeOwned>(
        &self,
        descriptor: RequestDescriptor,
    ) -> Result<Vec<T>> {
        let body: ListBody<T> = self.send_json(descriptor).await?;
        Ok(body.into_items())
    }

    pub(crate) async fn fetch_item<T: DeserializeOwned>(
        &self,
        descriptor: RequestDescriptor,
    ) -> Result<T> {
        let body: ItemBody<T> = self.send_json(descriptor).await?;
        Ok(body.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_body_reads_every_shape() {
        let paged: ListBody<u32> = serde_json::from_value(json!({
            "count": 3,
            "next": "http://localhost:8000/api/v1/courses/courses/?page=2",
            "previous": null,
            "results": { "success": true, "data": [1, 2] }
        }))
        .unwrap();
        let (items, next) = paged.into_parts();
        assert_eq!(items, vec![1, 2]);
        assert!(next.unwrap().ends_with("page=2"));

        let enveloped: ListBody<u32> =
            serde_json::from_value(json!({ "success": true, "data": [3] })).unwrap();
        assert_eq!(enveloped.into_items(), vec![3]);

        let bare: ListBody<u32> = serde_json::from_value(json!([4, 5])).unwrap();
        assert_eq!(bare.into_items(), vec![4, 5]);
    }

    #[test]
    fn empty_next_link_ends_pagination() {
        let paged: ListBody<u32> = serde_json::from_value(json!({
            "count": 1, "next": "", "results": [1]
        }))
        .unwrap();
        assert_eq!(paged.into_parts().1, None);
    }

    #[test]
    fn item_body_reads_both_shapes() {
        let enveloped: ItemBody<String> =
            serde_json::from_value(json!({ "success": true, "data": "x" })).unwrap();
        assert_eq!(enveloped.into_inner(), "x");

        let bare: ItemBody<String> = serde_json::from_value(json!("y")).unwrap();
        assert_eq!(bare.into_inner(), "y");
    }
}
