// Paginated listing semantics over the in-memory store: the 25-rows-at-
// limit-10 walk, beyond-range pages, conjunctive filters, sort validation.

#[path = "../helpers/mod.rs"]
mod helpers;

use helpers::test_data::{admin, guide, member, post_request, post_service, seed_posts};

use trailhub::core::error::AppError;
use trailhub::core::pagination::PageRequest;
use trailhub::core::query::{FilterCriteria, Predicate, SortSpec};
use trailhub::modules::posts::PostStatus;

fn page(page: u32, limit: u32) -> PageRequest {
    PageRequest::new(Some(page), Some(limit)).unwrap()
}

#[tokio::test]
async fn test_paging_walk_over_25_rows() {
    let service = post_service();
    let author = guide();
    seed_posts(&service, &author, 25).await.unwrap();

    let reader = member();
    let criteria = FilterCriteria::new();

    let page1 = service
        .list(&reader, &criteria, None, page(1, 10), false)
        .await
        .unwrap();
    assert_eq!(page1.data.len(), 10);
    assert_eq!(page1.total, 25);
    assert_eq!(page1.total_pages, 3);
    assert!(page1.has_next);
    assert!(!page1.has_prev);

    let page2 = service
        .list(&reader, &criteria, None, page(2, 10), false)
        .await
        .unwrap();
    assert_eq!(page2.data.len(), 10);
    assert_eq!(page2.total, 25);
    assert!(page2.has_next);
    assert!(page2.has_prev);

    let page3 = service
        .list(&reader, &criteria, None, page(3, 10), false)
        .await
        .unwrap();
    assert_eq!(page3.data.len(), 5);
    assert_eq!(page3.total, 25);
    assert!(!page3.has_next);
    assert!(page3.has_prev);
}

#[tokio::test]
async fn test_page_beyond_range_returns_empty_with_total() {
    let service = post_service();
    seed_posts(&service, &guide(), 25).await.unwrap();

    let result = service
        .list(
            &member(),
            &FilterCriteria::new(),
            None,
            page(9, 10),
            false,
        )
        .await
        .unwrap();

    assert!(result.data.is_empty());
    assert_eq!(result.total, 25);
    assert_eq!(result.total_pages, 3);
    assert!(!result.has_next);
    assert!(result.has_prev);
}

#[tokio::test]
async fn test_filters_compose_conjunctively() {
    let service = post_service();
    let author = guide();
    seed_posts(&service, &author, 3).await.unwrap();
    service
        .compose(&author, post_request("Gear list draft", PostStatus::Draft))
        .await
        .unwrap();
    service
        .compose(&author, post_request("Gear list final", PostStatus::Published))
        .await
        .unwrap();

    // status AND title search must both hold
    let criteria = FilterCriteria::new()
        .with("status", Predicate::one_of_csv("published"))
        .with("title", Predicate::Search("gear".to_string()));

    let result = service
        .list(&admin(), &criteria, None, PageRequest::default(), false)
        .await
        .unwrap();

    assert_eq!(result.total, 1);
    assert_eq!(result.data[0].title, "Gear list final");
}

#[tokio::test]
async fn test_absent_filters_impose_no_constraint() {
    let service = post_service();
    seed_posts(&service, &guide(), 4).await.unwrap();

    let result = service
        .list(
            &admin(),
            &FilterCriteria::new(),
            None,
            PageRequest::default(),
            false,
        )
        .await
        .unwrap();

    assert_eq!(result.total, 4);
}

#[tokio::test]
async fn test_unknown_filter_field_rejected() {
    let service = post_service();

    let criteria =
        FilterCriteria::new().with("body", Predicate::Search("ridge".to_string()));
    let err = service
        .list(&admin(), &criteria, None, PageRequest::default(), false)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_sort_by_approved_column() {
    let service = post_service();
    let author = guide();
    for title in ["Cirque", "Arete", "Bivouac"] {
        service
            .compose(&author, post_request(title, PostStatus::Published))
            .await
            .unwrap();
    }

    let sort = SortSpec::parse("title:asc").unwrap();
    let result = service
        .list(
            &admin(),
            &FilterCriteria::new(),
            Some(&sort),
            PageRequest::default(),
            false,
        )
        .await
        .unwrap();

    let titles: Vec<&str> = result.data.iter().map(|post| post.title.as_str()).collect();
    assert_eq!(titles, vec!["Arete", "Bivouac", "Cirque"]);
}

#[tokio::test]
async fn test_unapproved_sort_field_rejected() {
    let service = post_service();

    let sort = SortSpec::parse("body:desc").unwrap();
    let err = service
        .list(
            &admin(),
            &FilterCriteria::new(),
            Some(&sort),
            PageRequest::default(),
            false,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
}
