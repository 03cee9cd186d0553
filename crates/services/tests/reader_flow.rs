use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reader_core::model::{ChapterId, Visualization, VisualizationCatalog};
use reader_core::panel::PanelDisplay;
use reader_core::parser::RawContent;
use reader_core::time::fixed_clock;
use services::error::{ContentSourceError, ReaderError};
use services::{
    ContentSource, ProgressService, ReaderIntent, ReaderService, ReaderSession, ReaderSettings,
};
use storage::repository::{InMemoryRepository, ProgressRepository};

const CHAPTER: &str = "\
# Foundations
## Basics
### Token
Definition: The smallest unit a model reads.
Keywords: tokenizer, vocabulary
### Embedding
Definition: A vector representation.
## Generation
### Temperature
Definition: How random sampling is.
";

struct StaticSource(Option<RawContent>);

#[async_trait]
impl ContentSource for StaticSource {
    async fn fetch(&self, chapter: ChapterId) -> Result<RawContent, ContentSourceError> {
        self.0.clone().ok_or(ContentSourceError::NotFound(chapter))
    }
}

fn reader(repo: &InMemoryRepository, settings: ReaderSettings) -> ReaderService {
    let catalog =
        VisualizationCatalog::new().with_entry("Token", Visualization::new("visuals/token.html"));
    ReaderService::new(
        Arc::new(StaticSource(Some(RawContent::Markdown(CHAPTER.into())))),
        ProgressService::new(fixed_clock(), Arc::new(repo.clone())),
        Arc::new(catalog),
        settings,
    )
}

async fn open(repo: &InMemoryRepository) -> ReaderSession {
    reader(repo, ReaderSettings::default())
        .open(ChapterId::new(1))
        .await
        .expect("open chapter")
}

async fn no_dwell_within(session: &mut ReaderSession, wait: Duration) -> bool {
    tokio::time::timeout(wait, session.next_dwell()).await.is_err()
}

#[tokio::test(start_paused = true)]
async fn dwelling_on_first_term_credits_it() {
    let repo = InMemoryRepository::new();
    let mut session = open(&repo).await;

    let view = session.view();
    assert_eq!(view.items.len(), 5);
    assert_eq!(view.heading(), "Module 1: Foundations");
    assert_eq!(view.summary.read, 0);
    assert_eq!(view.summary.total, 3);
    assert_eq!(view.summary.percent_label(), "0%");
    assert_eq!(session.current(), Some(0));

    assert!(session.dispatch(ReaderIntent::Next));
    tokio::time::advance(Duration::from_secs(10)).await;
    let ticket = session.next_dwell().await.expect("dwell fired");
    assert!(session.on_dwell(ticket).await.unwrap());

    let view = session.view();
    assert_eq!(view.summary.read, 1);
    assert_eq!(view.items[1].mastery, 20);
    assert!(view.items[1].read);

    let saved = repo.get_progress(ChapterId::new(1)).await.unwrap().unwrap();
    assert_eq!(saved.total, 3);
    assert!(saved.terms[0].visited);
}

#[tokio::test(start_paused = true)]
async fn leaving_before_the_delay_grants_nothing() {
    let repo = InMemoryRepository::new();
    let mut session = open(&repo).await;

    session.activate(1);
    tokio::time::advance(Duration::from_secs(5)).await;
    session.activate(2);

    let ticket = session.next_dwell().await.expect("second dwell fired");
    assert_eq!(ticket.index(), 2);
    assert!(session.on_dwell(ticket).await.unwrap());

    let view = session.view();
    assert!(!view.items[1].read);
    assert_eq!(view.items[1].mastery, 0);
    assert!(view.items[2].read);
}

#[tokio::test(start_paused = true)]
async fn rapid_navigation_grants_nothing() {
    let repo = InMemoryRepository::new();
    let mut session = open(&repo).await;

    for _ in 0..4 {
        session.next();
        tokio::time::advance(Duration::from_secs(3)).await;
    }
    assert_eq!(session.current(), Some(4));
    session.activate(0);

    assert!(no_dwell_within(&mut session, Duration::from_secs(60)).await);
    assert_eq!(session.view().summary.read, 0);
    assert!(repo.get_progress(ChapterId::new(1)).await.unwrap().is_none());
}

#[tokio::test(start_paused = true)]
async fn long_stay_credits_exactly_once() {
    let repo = InMemoryRepository::new();
    let mut session = open(&repo).await;

    session.activate(4);
    tokio::time::advance(Duration::from_secs(60)).await;
    let ticket = session.next_dwell().await.unwrap();
    assert!(session.on_dwell(ticket).await.unwrap());
    assert!(!session.on_dwell(ticket).await.unwrap());
    assert!(no_dwell_within(&mut session, Duration::from_secs(120)).await);

    assert_eq!(session.view().items[4].mastery, 20);
}

#[tokio::test(start_paused = true)]
async fn headers_never_start_a_dwell() {
    let repo = InMemoryRepository::new();
    let mut session = open(&repo).await;
    session.activate(3);
    assert!(!session.dwell_pending());
    assert!(no_dwell_within(&mut session, Duration::from_secs(30)).await);
}

#[tokio::test(start_paused = true)]
async fn boundaries_are_silent() {
    let repo = InMemoryRepository::new();
    let mut session = open(&repo).await;

    assert!(!session.prev());
    assert!(!session.activate(99));
    assert_eq!(session.current(), Some(0));

    session.activate(4);
    assert!(!session.dispatch(ReaderIntent::Next));
    assert_eq!(session.current(), Some(4));
}

#[tokio::test(start_paused = true)]
async fn reset_clears_memory_and_store() {
    let repo = InMemoryRepository::new();
    let mut session = open(&repo).await;

    session.activate(1);
    let ticket = session.next_dwell().await.unwrap();
    session.on_dwell(ticket).await.unwrap();
    assert_eq!(session.view().summary.read, 1);

    session.activate(2);
    session.reset().await.unwrap();

    assert_eq!(session.current(), Some(0));
    assert_eq!(session.view().summary.read, 0);
    assert!(session.view().items.iter().all(|i| i.mastery == 0));
    assert!(repo.get_progress(ChapterId::new(1)).await.unwrap().is_none());
    assert!(no_dwell_within(&mut session, Duration::from_secs(30)).await);
}

#[tokio::test(start_paused = true)]
async fn progress_survives_reopen_and_can_resume() {
    let repo = InMemoryRepository::new();
    let mut session = open(&repo).await;
    session.activate(4);
    let ticket = session.next_dwell().await.unwrap();
    session.on_dwell(ticket).await.unwrap();
    drop(session);

    let reopened = open(&repo).await;
    assert_eq!(reopened.current(), Some(0));
    assert!(reopened.view().items[4].read);

    let settings = ReaderSettings {
        resume_last_position: true,
        ..ReaderSettings::default()
    };
    let resumed = reader(&repo, settings).open(ChapterId::new(1)).await.unwrap();
    assert_eq!(resumed.current(), Some(4));
}

#[tokio::test(start_paused = true)]
async fn corrupt_saved_progress_does_not_block_open() {
    let repo = InMemoryRepository::new();
    repo.put_raw(ChapterId::new(1), "{\"terms\": 42").unwrap();

    let session = open(&repo).await;
    assert_eq!(session.view().summary.read, 0);
}

#[tokio::test(start_paused = true)]
async fn panel_follows_the_active_item() {
    let repo = InMemoryRepository::new();
    let mut session = open(&repo).await;
    assert_eq!(session.panel().display(), &PanelDisplay::Placeholder);

    assert!(!session.dispatch(ReaderIntent::ToggleCompact));

    session.activate(1);
    assert_eq!(session.panel().loaded_path(), Some("visuals/token.html"));
    assert!(session.view().can_toggle_compact);
    assert!(session.dispatch(ReaderIntent::ToggleCompact));
    assert!(session.view().panel.compact_showing);

    session.next();
    assert!(!session.view().panel.compact_showing);
    assert!(session.panel().loaded_path().is_none());

    assert!(session.dispatch(ReaderIntent::OpenVisualization(1)));
    assert_eq!(session.current(), Some(2));
    assert_eq!(session.panel().loaded_path(), Some("visuals/token.html"));
    assert!(!session.open_visualization(2));

    session.dispatch(ReaderIntent::ClosePanel);
    assert!(!session.view().panel.open);
    assert!(session.toggle_panel());
}

#[tokio::test]
async fn missing_content_is_reported() {
    let repo = InMemoryRepository::new();
    let service = ReaderService::new(
        Arc::new(StaticSource(None)),
        ProgressService::new(fixed_clock(), Arc::new(repo)),
        Arc::new(VisualizationCatalog::new()),
        ReaderSettings::default(),
    );
    let err = service.open(ChapterId::new(7)).await.err().unwrap();
    assert!(matches!(
        err,
        ReaderError::Source(ContentSourceError::NotFound(c)) if c == ChapterId::new(7)
    ));
}
