//! Article data model and list filtering.

use std::fmt;

use chrono::{DateTime, Utc};
use pagination::PageRequest;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::user::{User, UserId};

/// Validation errors raised by the article value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleValidationError {
    InvalidId,
    EmptyTitle,
    TitleTooLong { max: usize },
    EmptyDescription,
}

impl fmt::Display for ArticleValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "article id must be a valid UUID"),
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
            Self::EmptyDescription => write!(f, "description must not be empty"),
        }
    }
}

impl std::error::Error for ArticleValidationError {}

/// Stable article identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, example = "7c9e6679-7425-40de-944b-e07fc1f90ae7")]
pub struct ArticleId(Uuid);

impl ArticleId {
    /// Validate and construct an [`ArticleId`] from string input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, ArticleValidationError> {
        Uuid::parse_str(id.as_ref())
            .map(Self)
            .map_err(|_| ArticleValidationError::InvalidId)
    }

    /// Wrap an already-parsed UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random [`ArticleId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Maximum allowed length for an article title.
pub const TITLE_MAX: usize = 256;

/// Article headline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "Notes on the Analytical Engine")]
pub struct Title(String);

impl Title {
    /// Validate and construct a [`Title`].
    pub fn new(title: impl Into<String>) -> Result<Self, ArticleValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ArticleValidationError::EmptyTitle);
        }
        if title.chars().count() > TITLE_MAX {
            return Err(ArticleValidationError::TitleTooLong { max: TITLE_MAX });
        }
        Ok(Self(title))
    }
}

impl AsRef<str> for Title {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Title> for String {
    fn from(value: Title) -> Self {
        value.0
    }
}

impl TryFrom<String> for Title {
    type Error = ArticleValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Published article joined with its author.
///
/// ## Invariants
/// - Exactly one author; the author never changes after creation.
/// - `updated_at >= created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    id: ArticleId,
    title: Title,
    description: String,
    publish_date: DateTime<Utc>,
    author: User,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Article {
    /// Build an [`Article`] from validated components.
    pub fn new(
        id: ArticleId,
        title: Title,
        description: String,
        publish_date: DateTime<Utc>,
        author: User,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            description,
            publish_date,
            author,
            created_at,
            updated_at,
        }
    }

    /// Stable article identifier.
    pub fn id(&self) -> &ArticleId {
        &self.id
    }

    /// Article headline.
    pub fn title(&self) -> &Title {
        &self.title
    }

    /// Article body text.
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Caller-supplied publication timestamp.
    pub fn publish_date(&self) -> DateTime<Utc> {
        self.publish_date
    }

    /// Owning author.
    pub fn author(&self) -> &User {
        &self.author
    }

    /// Record creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last modification timestamp.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Validated content for a new article, before an author is bound.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleDraft {
    /// Article headline.
    pub title: Title,
    /// Article body text.
    pub description: String,
    /// Caller-supplied publication timestamp.
    pub publish_date: DateTime<Utc>,
}

impl ArticleDraft {
    /// Validate and construct a draft.
    pub fn new(
        title: Title,
        description: impl Into<String>,
        publish_date: DateTime<Utc>,
    ) -> Result<Self, ArticleValidationError> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err(ArticleValidationError::EmptyDescription);
        }
        Ok(Self {
            title,
            description,
            publish_date,
        })
    }
}

/// New article with its author bound, ready for persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct NewArticle {
    /// Validated article content.
    pub draft: ArticleDraft,
    /// Identifier of the authenticated author.
    pub author: UserId,
}

/// Partial update to an existing article.
///
/// `None` fields are left untouched. The author is deliberately absent:
/// articles cannot be reassigned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArticlePatch {
    /// Replacement headline, if any.
    pub title: Option<Title>,
    /// Replacement body text, if any.
    pub description: Option<String>,
    /// Replacement publication timestamp, if any.
    pub publish_date: Option<DateTime<Utc>>,
}

impl ArticlePatch {
    /// True when the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.publish_date.is_none()
    }
}

/// Filter and window for the article list operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleFilter {
    page: PageRequest,
    author: Option<UserId>,
    from_date: Option<DateTime<Utc>>,
    to_date: Option<DateTime<Utc>>,
}

impl ArticleFilter {
    /// Build a filter from a validated page request and optional criteria.
    pub fn new(
        page: PageRequest,
        author: Option<UserId>,
        from_date: Option<DateTime<Utc>>,
        to_date: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            page,
            author,
            from_date,
            to_date,
        }
    }

    /// Requested page window.
    pub fn page(&self) -> PageRequest {
        self.page
    }

    /// Optional author equality filter.
    pub fn author(&self) -> Option<&UserId> {
        self.author.as_ref()
    }

    /// Inclusive publish-date range, applied only when both bounds are set.
    pub fn date_range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        match (self.from_date, self.to_date) {
            (Some(from), Some(to)) => Some((from, to)),
            _ => None,
        }
    }

    /// Lower publish-date bound as received.
    pub fn from_date(&self) -> Option<DateTime<Utc>> {
        self.from_date
    }

    /// Upper publish-date bound as received.
    pub fn to_date(&self) -> Option<DateTime<Utc>> {
        self.to_date
    }

    /// Serialise the filter for cache-key derivation.
    ///
    /// The serialisation is the JSON of the filter fields in declaration
    /// order with absent criteria omitted, so equal filters always map to
    /// equal keys and distinct filters never collide.
    pub fn cache_fingerprint(&self) -> Result<String, serde_json::Error> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Fingerprint<'a> {
            page: u32,
            limit: u32,
            #[serde(skip_serializing_if = "Option::is_none")]
            author: Option<&'a UserId>,
            #[serde(skip_serializing_if = "Option::is_none")]
            from_date: Option<DateTime<Utc>>,
            #[serde(skip_serializing_if = "Option::is_none")]
            to_date: Option<DateTime<Utc>>,
        }

        serde_json::to_string(&Fingerprint {
            page: self.page.page(),
            limit: self.page.limit(),
            author: self.author.as_ref(),
            from_date: self.from_date,
            to_date: self.to_date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn page(page: u32, limit: u32) -> PageRequest {
        PageRequest::new(page, limit).expect("valid page request")
    }

    #[rstest]
    #[case("", ArticleValidationError::EmptyTitle)]
    #[case("   ", ArticleValidationError::EmptyTitle)]
    fn title_rejects_blank_input(#[case] input: &str, #[case] expected: ArticleValidationError) {
        assert_eq!(Title::new(input).expect_err("invalid title"), expected);
    }

    #[test]
    fn title_rejects_oversized_input() {
        let oversized = "x".repeat(TITLE_MAX + 1);
        assert_eq!(
            Title::new(oversized).expect_err("oversized title"),
            ArticleValidationError::TitleTooLong { max: TITLE_MAX }
        );
    }

    #[test]
    fn draft_rejects_blank_description() {
        let title = Title::new("A title").expect("valid title");
        let err = ArticleDraft::new(title, "  ", Utc::now()).expect_err("blank description");
        assert_eq!(err, ArticleValidationError::EmptyDescription);
    }

    #[test]
    fn empty_patch_reports_empty() {
        assert!(ArticlePatch::default().is_empty());
        let patch = ArticlePatch {
            description: Some("updated".to_owned()),
            ..ArticlePatch::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn date_range_requires_both_bounds() {
        let from = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().expect("valid date");
        let filter = ArticleFilter::new(page(1, 10), None, Some(from), None);
        assert!(filter.date_range().is_none());

        let to = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).single().expect("valid date");
        let filter = ArticleFilter::new(page(1, 10), None, Some(from), Some(to));
        assert_eq!(filter.date_range(), Some((from, to)));
    }

    #[test]
    fn fingerprint_is_deterministic_and_omits_absent_criteria() {
        let bare = ArticleFilter::new(page(1, 10), None, None, None);
        let fingerprint = bare.cache_fingerprint().expect("serialisable filter");
        assert_eq!(fingerprint, r#"{"page":1,"limit":10}"#);

        let again = ArticleFilter::new(page(1, 10), None, None, None)
            .cache_fingerprint()
            .expect("serialisable filter");
        assert_eq!(fingerprint, again);
    }

    #[test]
    fn fingerprint_distinguishes_distinct_filters() {
        let author = UserId::random();
        let bare = ArticleFilter::new(page(1, 10), None, None, None);
        let by_author = ArticleFilter::new(page(1, 10), Some(author), None, None);
        let second_page = ArticleFilter::new(page(2, 10), None, None, None);

        let keys = [
            bare.cache_fingerprint().expect("serialisable filter"),
            by_author.cache_fingerprint().expect("serialisable filter"),
            second_page.cache_fingerprint().expect("serialisable filter"),
        ];
        assert_ne!(keys[0], keys[1]);
        assert_ne!(keys[0], keys[2]);
        assert_ne!(keys[1], keys[2]);
    }
}
