use reader_core::model::ChapterId;
use services::ReaderIntent;
use storage::repository::InMemoryRepository;

use super::test_harness::{ViewKind, setup_view_harness};

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_lists_chapters_with_progress() {
    let repo = InMemoryRepository::new();
    repo.put_raw(
        ChapterId::new(1),
        r#"{"terms":[{"id":"token","visited":true,"mastery":20}],"total":3,"lastVisitedIndex":1,"timestamp":0}"#,
    )
    .expect("seed progress");

    let mut harness = setup_view_harness(ViewKind::Home, repo);
    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Module 1"), "missing chapter link in {html}");
    assert!(html.contains("1 / 3 read · 33%"), "missing progress in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_marks_untouched_chapters() {
    let mut harness = setup_view_harness(ViewKind::Home, InMemoryRepository::new());
    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Not started"), "missing label in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn reader_view_smoke_renders_items_and_counts() {
    let mut harness = setup_view_harness(ViewKind::Reader(1), InMemoryRepository::new());
    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Module 1: Foundations"), "missing heading in {html}");
    assert!(html.contains("0 / 3"), "missing position in {html}");
    assert!(html.contains("Read: 0 / 3"), "missing read count in {html}");
    assert!(html.contains("0%"), "missing percent in {html}");
    assert!(html.contains("Basics"), "missing section in {html}");
    assert!(html.contains("<strong>smallest</strong>"), "missing definition in {html}");
    assert!(html.contains("tokenizer"), "missing keyword in {html}");
    assert!(html.contains("Has demo"), "missing demo badge in {html}");
    assert!(
        html.contains("section-card active"),
        "first item should be active in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn reader_view_smoke_restores_saved_progress() {
    let repo = InMemoryRepository::new();
    repo.put_raw(
        ChapterId::new(1),
        r#"{"terms":[{"id":"embedding","visited":true,"mastery":40}],"total":3,"lastVisitedIndex":2,"timestamp":0}"#,
    )
    .expect("seed progress");

    let mut harness = setup_view_harness(ViewKind::Reader(1), repo);
    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Read: 1 / 3"), "missing read count in {html}");
    assert!(html.contains("term-card read"), "missing read card in {html}");
    assert!(html.contains("Mastery 40%"), "missing mastery in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn reader_view_smoke_reports_missing_chapter() {
    let mut harness = setup_view_harness(ViewKind::Reader(9), InMemoryRepository::new());
    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Error Loading Chapter"), "missing error in {html}");
    assert!(html.contains("chapter9.md"), "missing hint in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn reader_view_smoke_next_moves_to_the_first_term() {
    let mut harness = setup_view_harness(ViewKind::Reader(1), InMemoryRepository::new());
    harness.rebuild();
    harness.settle().await;

    let handles = harness.reader_handles.clone().expect("reader handles");
    harness.act(|| handles.dispatch().call(ReaderIntent::Next));
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("term-card active"), "token should be active in {html}");
    assert!(html.contains("1 / 3"), "missing position in {html}");
    assert!(html.contains("visuals/token.html"), "missing visualization in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn reader_view_smoke_reset_clears_progress_after_confirm() {
    let repo = InMemoryRepository::new();
    repo.put_raw(
        ChapterId::new(1),
        r#"{"terms":[{"id":"token","visited":true,"mastery":20}],"total":3,"lastVisitedIndex":1,"timestamp":0}"#,
    )
    .expect("seed progress");

    let mut harness = setup_view_harness(ViewKind::Reader(1), repo);
    harness.rebuild();
    harness.settle().await;
    assert!(harness.render().contains("Read: 1 / 3"));

    let handles = harness.reader_handles.clone().expect("reader handles");
    harness.act(|| handles.request_reset().call(()));
    let html = harness.render();
    assert!(
        html.contains("Reset progress for this module?"),
        "missing confirmation in {html}"
    );
    assert!(
        harness.repo.get_raw(ChapterId::new(1)).unwrap().is_some(),
        "asking must not reset yet"
    );

    harness.act(|| handles.confirm_reset().call(()));
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Read: 0 / 3"), "counts not cleared in {html}");
    assert!(!html.contains("term-card read"), "card still read in {html}");
    assert!(!html.contains("Reset progress for this module?"), "dialog still open in {html}");
    assert!(harness.repo.get_raw(ChapterId::new(1)).unwrap().is_none());
}
