//! Behavioural coverage for the cache-aside article service.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{TimeZone, Utc};
use mockall::predicate::eq;
use pagination::PageRequest;
use rstest::rstest;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::article::Title;
use crate::domain::ports::{ArticleCacheError, MockArticleRepository};
use crate::domain::user::{Email, User, UserId, Username};

/// In-memory cache double with switchable failure injection.
///
/// Entries never expire; tests assert on presence and payloads rather than
/// timing.
#[derive(Default)]
struct InMemoryCache {
    entries: Mutex<HashMap<String, String>>,
    fail_get: AtomicBool,
    fail_set: AtomicBool,
    fail_delete: AtomicBool,
}

impl InMemoryCache {
    fn seed(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .expect("cache lock")
            .insert(key.to_owned(), value.to_owned());
    }

    fn contains(&self, key: &str) -> bool {
        self.entries.lock().expect("cache lock").contains_key(key)
    }

    fn value(&self, key: &str) -> Option<String> {
        self.entries.lock().expect("cache lock").get(key).cloned()
    }

    fn fail_reads(&self) {
        self.fail_get.store(true, Ordering::SeqCst);
    }

    fn fail_writes(&self) {
        self.fail_set.store(true, Ordering::SeqCst);
    }

    fn fail_deletes(&self) {
        self.fail_delete.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl ArticleCache for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, ArticleCacheError> {
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(ArticleCacheError::backend("connection refused"));
        }
        Ok(self.value(key))
    }

    async fn set(&self, key: &str, value: &str, _ttl: Duration) -> Result<(), ArticleCacheError> {
        if self.fail_set.load(Ordering::SeqCst) {
            return Err(ArticleCacheError::backend("connection refused"));
        }
        self.seed(key, value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), ArticleCacheError> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(ArticleCacheError::backend("connection refused"));
        }
        self.entries.lock().expect("cache lock").remove(key);
        Ok(())
    }
}

fn author() -> User {
    let created = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).single().expect("valid date");
    User::new(
        UserId::random(),
        Email::new("ada@example.com").expect("valid email"),
        Username::new("ada_lovelace").expect("valid username"),
        created,
        created,
    )
}

fn article_by(author: &User, title: &str) -> Article {
    let created = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).single().expect("valid date");
    Article::new(
        ArticleId::random(),
        Title::new(title).expect("valid title"),
        "A body of text.".to_owned(),
        created,
        author.clone(),
        created,
        created,
    )
}

fn identity_of(user: &User) -> AuthenticatedUser {
    AuthenticatedUser {
        user_id: *user.id(),
        email: user.email().clone(),
    }
}

fn stranger_identity() -> AuthenticatedUser {
    AuthenticatedUser {
        user_id: UserId::random(),
        email: Email::new("mallory@example.com").expect("valid email"),
    }
}

fn draft(title: &str) -> ArticleDraft {
    ArticleDraft::new(
        Title::new(title).expect("valid title"),
        "A body of text.",
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).single().expect("valid date"),
    )
    .expect("valid draft")
}

fn bare_filter() -> ArticleFilter {
    ArticleFilter::new(
        PageRequest::new(1, 10).expect("valid page request"),
        None,
        None,
        None,
    )
}

fn service(
    repository: MockArticleRepository,
    cache: Arc<InMemoryCache>,
) -> ArticleService<MockArticleRepository, InMemoryCache> {
    ArticleService::new(Arc::new(repository), cache)
}

mod cache_keys {
    use super::*;

    #[test]
    fn single_article_key_concatenates_namespace_and_id() {
        let id = ArticleId::new("7c9e6679-7425-40de-944b-e07fc1f90ae7").expect("valid id");
        assert_eq!(
            article_cache_key(&id),
            "article_7c9e6679-7425-40de-944b-e07fc1f90ae7"
        );
    }

    #[test]
    fn list_key_embeds_filter_json() {
        let key = list_cache_key(&bare_filter()).expect("derivable key");
        assert_eq!(key, r#"articles_list_{"page":1,"limit":10}"#);
    }

    #[test]
    fn ttl_is_sixty_seconds() {
        assert_eq!(ARTICLE_CACHE_TTL, Duration::from_millis(60_000));
    }
}

mod get {
    use super::*;

    #[rstest]
    #[tokio::test]
    async fn returns_cached_copy_without_repository_access() {
        let expected = article_by(&author(), "Cached");
        let cache = Arc::new(InMemoryCache::default());
        cache.seed(
            &article_cache_key(expected.id()),
            &serde_json::to_string(&expected).expect("serialisable article"),
        );
        // No expectations: any repository call panics the mock.
        let service = service(MockArticleRepository::new(), cache);

        let found = service.get_article(expected.id()).await.expect("cache hit");
        assert_eq!(found, expected);
    }

    #[rstest]
    #[tokio::test]
    async fn populates_cache_on_miss_and_serves_second_call_from_it() {
        let expected = article_by(&author(), "Fresh");
        let id = *expected.id();
        let cache = Arc::new(InMemoryCache::default());
        let mut repository = MockArticleRepository::new();
        let loaded = expected.clone();
        repository
            .expect_find_with_author()
            .with(eq(id))
            .times(1)
            .returning(move |_| Ok(Some(loaded.clone())));
        let service = service(repository, cache.clone());

        let first = service.get_article(&id).await.expect("miss then load");
        let second = service.get_article(&id).await.expect("cache hit");

        assert_eq!(first, expected);
        assert_eq!(first, second);
        assert!(cache.contains(&article_cache_key(&id)));
    }

    #[rstest]
    #[tokio::test]
    async fn missing_article_is_not_found() {
        let id = ArticleId::random();
        let mut repository = MockArticleRepository::new();
        repository
            .expect_find_with_author()
            .times(1)
            .returning(|_| Ok(None));
        let service = service(repository, Arc::new(InMemoryCache::default()));

        let err = service.get_article(&id).await.expect_err("absent article");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert!(err.message().contains(&id.to_string()));
    }

    #[rstest]
    #[tokio::test]
    async fn cache_failure_degrades_to_repository() {
        let expected = article_by(&author(), "Resilient");
        let id = *expected.id();
        let cache = Arc::new(InMemoryCache::default());
        cache.fail_reads();
        cache.fail_writes();
        let mut repository = MockArticleRepository::new();
        let loaded = expected.clone();
        repository
            .expect_find_with_author()
            .times(1)
            .returning(move |_| Ok(Some(loaded.clone())));
        let service = service(repository, cache);

        let found = service.get_article(&id).await.expect("degraded read");
        assert_eq!(found, expected);
    }

    #[rstest]
    #[tokio::test]
    async fn repository_connection_failure_maps_to_service_unavailable() {
        let mut repository = MockArticleRepository::new();
        repository
            .expect_find_with_author()
            .times(1)
            .returning(|_| Err(ArticleRepositoryError::connection("connection refused")));
        let service = service(repository, Arc::new(InMemoryCache::default()));

        let err = service
            .get_article(&ArticleId::random())
            .await
            .expect_err("connection failure");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}

mod list {
    use super::*;

    #[rstest]
    #[tokio::test]
    async fn builds_page_envelope_from_rows_and_total() {
        let writer = author();
        let items: Vec<Article> = (0..10)
            .map(|n| article_by(&writer, &format!("Article {n}")))
            .collect();
        let rows = items.clone();
        let mut repository = MockArticleRepository::new();
        repository
            .expect_list_with_authors()
            .times(1)
            .returning(move |_| Ok((rows.clone(), 11)));
        let service = service(repository, Arc::new(InMemoryCache::default()));

        let page = service.list_articles(bare_filter()).await.expect("listing");

        assert_eq!(page.items.len(), 10);
        assert_eq!(page.total, 11);
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, 10);
        assert_eq!(page.pages, 2);
    }

    #[rstest]
    #[tokio::test]
    async fn identical_filters_share_one_repository_query() {
        let writer = author();
        let rows = vec![article_by(&writer, "Only")];
        let mut repository = MockArticleRepository::new();
        let loaded = rows.clone();
        repository
            .expect_list_with_authors()
            .times(1)
            .returning(move |_| Ok((loaded.clone(), 1)));
        let cache = Arc::new(InMemoryCache::default());
        let service = service(repository, cache.clone());

        let first = service.list_articles(bare_filter()).await.expect("miss");
        let second = service.list_articles(bare_filter()).await.expect("hit");

        assert_eq!(first, second);
        let key = list_cache_key(&bare_filter()).expect("derivable key");
        assert!(cache.contains(&key));
    }

    #[rstest]
    #[tokio::test]
    async fn cached_page_is_returned_unchanged() {
        let writer = author();
        let cached = pagination::Page::new(
            vec![article_by(&writer, "Stale but served")],
            1,
            PageRequest::new(1, 10).expect("valid page request"),
        );
        let cache = Arc::new(InMemoryCache::default());
        cache.seed(
            &list_cache_key(&bare_filter()).expect("derivable key"),
            &serde_json::to_string(&cached).expect("serialisable page"),
        );
        let service = service(MockArticleRepository::new(), cache);

        let page = service.list_articles(bare_filter()).await.expect("cache hit");
        assert_eq!(page, cached);
    }
}

mod create {
    use super::*;

    #[rstest]
    #[tokio::test]
    async fn persists_with_caller_as_author_and_clears_bare_list_key() {
        let writer = author();
        let identity = identity_of(&writer);
        let persisted = article_by(&writer, "Created");
        let author_id = identity.user_id;
        let mut repository = MockArticleRepository::new();
        let inserted = persisted.clone();
        repository
            .expect_insert()
            .withf(move |new_article| new_article.author == author_id)
            .times(1)
            .returning(move |_| Ok(inserted.clone()));

        let cache = Arc::new(InMemoryCache::default());
        cache.seed(ARTICLES_LIST_KEY, "stale");
        let parameterised = list_cache_key(&bare_filter()).expect("derivable key");
        cache.seed(&parameterised, "stale page");
        let service = service(repository, cache.clone());

        let created = service
            .create_article(draft("Created"), &identity)
            .await
            .expect("creation succeeds");

        assert_eq!(created, persisted);
        assert!(!cache.contains(ARTICLES_LIST_KEY));
        // Parameterised list keys are left to TTL expiry.
        assert!(cache.contains(&parameterised));
    }
}

mod update {
    use super::*;

    #[rstest]
    #[tokio::test]
    async fn non_author_is_forbidden_and_nothing_mutates() {
        let writer = author();
        let existing = article_by(&writer, "Owned");
        let id = *existing.id();
        let mut repository = MockArticleRepository::new();
        repository
            .expect_find_with_author()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        // update/delete expectations deliberately absent: any call panics.

        let cache = Arc::new(InMemoryCache::default());
        cache.seed(ARTICLES_LIST_KEY, "untouched");
        let service = service(repository, cache.clone());

        let err = service
            .update_article(&id, ArticlePatch::default(), &stranger_identity())
            .await
            .expect_err("ownership violation");

        assert_eq!(err.code(), ErrorCode::Forbidden);
        assert_eq!(err.message(), "you can only update your own articles");
        assert!(cache.contains(ARTICLES_LIST_KEY));
    }

    #[rstest]
    #[tokio::test]
    async fn author_update_applies_patch_and_refreshes_cache() {
        let writer = author();
        let identity = identity_of(&writer);
        let original = article_by(&writer, "Before");
        let id = *original.id();
        let updated = Article::new(
            id,
            Title::new("After").expect("valid title"),
            original.description().to_owned(),
            original.publish_date(),
            writer.clone(),
            original.created_at(),
            original.updated_at() + chrono::Duration::seconds(5),
        );

        let mut repository = MockArticleRepository::new();
        let mut loads = vec![updated.clone(), original.clone()];
        repository
            .expect_find_with_author()
            .with(eq(id))
            .times(2)
            .returning(move |_| Ok(Some(loads.pop().expect("two loads"))));
        repository
            .expect_update()
            .withf(move |update_id, patch| {
                *update_id == id && patch.title.as_ref().is_some_and(|t| t.as_ref() == "After")
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let cache = Arc::new(InMemoryCache::default());
        cache.seed(ARTICLES_LIST_KEY, "stale");
        let service = service(repository, cache.clone());

        let patch = ArticlePatch {
            title: Some(Title::new("After").expect("valid title")),
            ..ArticlePatch::default()
        };
        let result = service
            .update_article(&id, patch, &identity)
            .await
            .expect("author update succeeds");

        assert_eq!(result, updated);
        // The reload repopulated the single-article key with the fresh row.
        let cached = cache
            .value(&article_cache_key(&id))
            .expect("repopulated entry");
        assert_eq!(
            cached,
            serde_json::to_string(&updated).expect("serialisable article")
        );
        assert!(!cache.contains(ARTICLES_LIST_KEY));
    }

    #[rstest]
    #[tokio::test]
    async fn invalidation_failure_does_not_fail_the_write() {
        let writer = author();
        let identity = identity_of(&writer);
        let original = article_by(&writer, "Sturdy");
        let id = *original.id();

        let mut repository = MockArticleRepository::new();
        let mut loads = vec![original.clone(), original.clone()];
        repository
            .expect_find_with_author()
            .times(2)
            .returning(move |_| Ok(Some(loads.pop().expect("two loads"))));
        repository.expect_update().times(1).returning(|_, _| Ok(()));

        let cache = Arc::new(InMemoryCache::default());
        cache.fail_deletes();
        let service = service(repository, cache);

        service
            .update_article(
                &id,
                ArticlePatch {
                    description: Some("still fine".to_owned()),
                    ..ArticlePatch::default()
                },
                &identity,
            )
            .await
            .expect("write survives cache outage");
    }
}

mod remove {
    use super::*;

    #[rstest]
    #[tokio::test]
    async fn author_delete_removes_row_and_invalidates_keys() {
        let writer = author();
        let identity = identity_of(&writer);
        let existing = article_by(&writer, "Doomed");
        let id = *existing.id();

        let mut repository = MockArticleRepository::new();
        repository
            .expect_find_with_author()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        repository
            .expect_delete()
            .with(eq(id))
            .times(1)
            .returning(|_| Ok(()));

        let cache = Arc::new(InMemoryCache::default());
        cache.seed(&article_cache_key(&id), "stale article");
        cache.seed(ARTICLES_LIST_KEY, "stale list");
        let service = service(repository, cache.clone());

        service
            .remove_article(&id, &identity)
            .await
            .expect("author delete succeeds");

        assert!(!cache.contains(&article_cache_key(&id)));
        assert!(!cache.contains(ARTICLES_LIST_KEY));
    }

    #[rstest]
    #[tokio::test]
    async fn non_author_is_forbidden() {
        let writer = author();
        let existing = article_by(&writer, "Guarded");
        let id = *existing.id();
        let mut repository = MockArticleRepository::new();
        repository
            .expect_find_with_author()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        let service = service(repository, Arc::new(InMemoryCache::default()));

        let err = service
            .remove_article(&id, &stranger_identity())
            .await
            .expect_err("ownership violation");

        assert_eq!(err.code(), ErrorCode::Forbidden);
        assert_eq!(err.message(), "you can only delete your own articles");
    }

    #[rstest]
    #[tokio::test]
    async fn deleted_article_reads_as_not_found() {
        let id = ArticleId::random();
        let mut repository = MockArticleRepository::new();
        repository
            .expect_find_with_author()
            .times(1)
            .returning(|_| Ok(None));
        let service = service(repository, Arc::new(InMemoryCache::default()));

        let err = service.get_article(&id).await.expect_err("gone");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
