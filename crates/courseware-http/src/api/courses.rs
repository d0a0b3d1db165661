//! Catalog: courses, categories, sections, lessons and reviews.

use futures_core::Stream;
use tracing::{info, instrument};
use uuid::Uuid;

use courseware_core::Result;
use courseware_core::models::{
    Category, CourseDetail, CourseDraft, CourseStatus, CourseSummary, Difficulty, Lesson,
    NewLesson, NewReview, NewSection, Page, Review, ReviewDecision, Section,
};

use crate::client::AuthenticatedHttpClient;
use crate::endpoints::paths;
use crate::request::RequestDescriptor;

/// Filters for the course catalog.
#[derive(Debug, Clone, Default)]
pub struct CourseQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub status: Option<CourseStatus>,
    pub is_free: Option<bool>,
    pub ordering: Option<String>,
    pub page: Option<u32>,
}

impl CourseQuery {
    fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(category) = &self.category {
            pairs.push(("category", category.clone()));
        }
        if let Some(difficulty) = self.difficulty {
            let value = serde_json::to_value(difficulty)
                .ok()
                .and_then(|v| v.as_str().map(str::to_string));
            if let Some(value) = value {
                pairs.push(("difficulty_level", value));
            }
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        if let Some(is_free) = self.is_free {
            pairs.push(("is_free", is_free.to_string()));
        }
        if let Some(ordering) = &self.ordering {
            pairs.push(("ordering", ordering.clone()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        pairs
    }

    pub(crate) fn descriptor(&self) -> RequestDescriptor {
        RequestDescriptor::get(paths::COURSES).query_pairs(self.pairs())
    }
}

impl AuthenticatedHttpClient {
    /// One page of the catalog.
    #[instrument(skip(self))]
    pub async fn courses(&self, query: &CourseQuery) -> Result<Page<CourseSummary>> {
        self.fetch_page(query.descriptor()).await
    }

    /// Every course matching `query`, following `next` links.
    pub fn all_courses(
        &self,
        query: &CourseQuery,
    ) -> impl Stream<Item = Result<CourseSummary>> + Send + 'static {
        self.paginate(query.descriptor())
    }

    pub async fn course(&self, id: Uuid) -> Result<CourseDetail> {
        self.fetch_item(RequestDescriptor::get(paths::course(id)))
            .await
    }

    /// Courses the signed-in instructor teaches.
    pub async fn my_courses(&self) -> Result<Vec<CourseSummary>> {
        self.fetch_list(RequestDescriptor::get(paths::MY_COURSES))
            .await
    }

    #[instrument(skip(self, draft))]
    pub async fn create_course(&self, draft: &CourseDraft) -> Result<CourseDetail> {
        let descriptor = RequestDescriptor::post(paths::COURSES).json(draft)?;
        let course: CourseDetail = self.fetch_item(descriptor).await?;
        info!(course = %course.id, "Course created");
        Ok(course)
    }

    #[instrument(skip(self, draft))]
    pub async fn update_course(&self, id: Uuid, draft: &CourseDraft) -> Result<CourseDetail> {
        let descriptor = RequestDescriptor::patch(paths::course(id)).json(draft)?;
        self.fetch_item(descriptor).await
    }

    #[instrument(skip(self))]
    pub async fn delete_course(&self, id: Uuid) -> Result<()> {
        self.request(RequestDescriptor::delete(paths::course(id)))
            .await
            .map(|_| ())
    }

    /// Move a draft into the review queue. Returns the server's message.
    #[instrument(skip(self))]
    pub async fn submit_course(&self, id: Uuid) -> Result<Option<String>> {
        let response = self
            .request(RequestDescriptor::post(paths::course_submit(id)))
            .await?;
        Ok(response.message())
    }

    /// Approve or reject a submitted course (admin).
    #[instrument(skip(self, decision), fields(status = %decision.status))]
    pub async fn review_course(&self, id: Uuid, decision: &ReviewDecision) -> Result<CourseDetail> {
        let descriptor = RequestDescriptor::post(paths::course_review(id)).json(decision)?;
        self.fetch_item(descriptor).await
    }

    pub async fn categories(&self) -> Result<Vec<Category>> {
        self.fetch_list(RequestDescriptor::get(paths::CATEGORIES))
            .await
    }

    pub async fn category(&self, id: Uuid) -> Result<Category> {
        self.fetch_item(RequestDescriptor::get(paths::category(id)))
            .await
    }

    pub async fn sections(&self, course: Uuid) -> Result<Vec<Section>> {
        self.fetch_list(RequestDescriptor::get(paths::sections(course)))
            .await
    }

    pub async fn create_section(&self, course: Uuid, section: &NewSection) -> Result<Section> {
        let descriptor = RequestDescriptor::post(paths::sections(course)).json(section)?;
        self.fetch_item(descriptor).await
    }

    pub async fn lessons(&self, course: Uuid, section: Uuid) -> Result<Vec<Lesson>> {
        self.fetch_list(RequestDescriptor::get(paths::lessons(course, section)))
            .await
    }

    pub async fn create_lesson(
        &self,
        course: Uuid,
        section: Uuid,
        lesson: &NewLesson,
    ) -> Result<Lesson> {
        let descriptor = RequestDescriptor::post(paths::lessons(course, section)).json(lesson)?;
        self.fetch_item(descriptor).await
    }

    pub async fn reviews(&self, course: Uuid) -> Result<Vec<Review>> {
        self.fetch_list(RequestDescriptor::get(paths::reviews(course)))
            .await
    }

    #[instrument(skip(self, review), fields(rating = review.rating))]
    pub async fn create_review(&self, course: Uuid, review: &NewReview) -> Result<Review> {
        let descriptor = RequestDescriptor::post(paths::reviews(course)).json(review)?;
        self.fetch_item(descriptor).await
    }
}
