//! Following `next` links through paginated lists.

use std::collections::HashSet;

use async_stream::try_stream;
use futures_core::Stream;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use courseware_core::Result;
use courseware_core::models::Page;

use crate::api::ListBody;
use crate::client::AuthenticatedHttpClient;
use crate::request::RequestDescriptor;

impl AuthenticatedHttpClient {
    /// Fetch a single page.
    pub async fn fetch_page<T: DeserializeOwned>(
        &self,
        descriptor: RequestDescriptor,
    ) -> Result<Page<T>> {
        self.send_json(descriptor).await
    }

    /// Stream every item of a list, page by page.
    ///
    /// Each page is a separate request with its own refresh-and-replay
    /// handling, carrying the headers and timeout of `first`. Lists that are
    /// not paginated yield their items as a single page. The stream stops at
    /// the first error, or when a `next` link points at a page already read.
    pub fn paginate<T>(
        &self,
        first: RequestDescriptor,
    ) -> impl Stream<Item = Result<T>> + Send + 'static
    where
        T: DeserializeOwned + Send + 'static,
    {
        let client = self.clone();
        try_stream! {
            let mut visited = HashSet::new();
            let mut next = Some(first);
            while let Some(descriptor) = next.take() {
                let page = client.page_url(&descriptor)?;
                if !visited.insert(page) {
                    warn!(path = descriptor.path(), "Pagination cycle, stopping");
                    break;
                }

                let body: ListBody<T> = client.send_json(descriptor.clone()).await?;
                let (items, link) = body.into_parts();
                debug!(items = items.len(), more = link.is_some(), "Page fetched");

                next = link.map(|link| descriptor.follow(link));
                for item in items {
                    yield item;
                }
            }
        }
    }

    /// The full URL a descriptor addresses, query included.
    fn page_url(&self, descriptor: &RequestDescriptor) -> Result<String> {
        let mut url = self.config().api_url().resolve(descriptor.path())?;
        if !descriptor.query_params().is_empty() {
            url.query_pairs_mut().extend_pairs(
                descriptor
                    .query_params()
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str())),
            );
        }
        Ok(url.to_string())
    }
}
