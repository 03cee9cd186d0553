use std::sync::Arc;

use async_trait::async_trait;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use reader_core::model::{ChapterId, Visualization, VisualizationCatalog};
use reader_core::parser::RawContent;
use reader_core::time::fixed_clock;
use services::error::ContentSourceError;
use services::{ContentSource, ProgressService, ReaderService, ReaderSettings};
use storage::repository::InMemoryRepository;

use crate::context::{UiApp, build_app_context};
use crate::views::reader::ReaderTestHandles;
use crate::views::{HomeView, ReaderView};

pub const CHAPTER_ONE: &str = "\
# Foundations
## Basics
### Token
Definition: The **smallest** unit a model reads.
Keywords: tokenizer, vocabulary
### Embedding
Definition: A vector representation.
### Attention
Definition: Weighs tokens against each other.
";

/// Serves chapter 1 from memory; every other chapter is missing.
struct MemorySource;

#[async_trait]
impl ContentSource for MemorySource {
    async fn fetch(&self, chapter: ChapterId) -> Result<RawContent, ContentSourceError> {
        if chapter == ChapterId::new(1) {
            Ok(RawContent::Markdown(CHAPTER_ONE.to_string()))
        } else {
            Err(ContentSourceError::NotFound(chapter))
        }
    }

    async fn list_chapters(&self) -> Result<Vec<ChapterId>, ContentSourceError> {
        Ok(vec![ChapterId::new(1)])
    }
}

#[derive(Clone)]
struct TestApp {
    reader: Arc<ReaderService>,
    progress: Arc<ProgressService>,
}

impl UiApp for TestApp {
    fn initial_chapter(&self) -> Option<ChapterId> {
        None
    }

    fn reader(&self) -> Arc<ReaderService> {
        Arc::clone(&self.reader)
    }

    fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Home,
    Reader(u32),
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    reader_handles: Option<ReaderTestHandles>,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    if let Some(handles) = props.reader_handles.clone() {
        use_context_provider(|| handles);
    }
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    match use_context::<ViewKind>() {
        ViewKind::Home => rsx! { HomeView {} },
        ViewKind::Reader(number) => rsx! { ReaderView { number } },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub repo: InMemoryRepository,
    pub reader_handles: Option<ReaderTestHandles>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Drives the dom a few times so chained async work settles.
    pub async fn settle(&mut self) {
        for _ in 0..6 {
            self.drive_async().await;
        }
    }

    /// Runs `f` inside the dom's runtime, as an event handler would.
    pub fn act(&mut self, f: impl FnOnce()) {
        self.dom.in_runtime(f);
        drive_dom(&mut self.dom);
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(view: ViewKind, repo: InMemoryRepository) -> ViewHarness {
    let progress = ProgressService::new(fixed_clock(), Arc::new(repo.clone()));
    let catalog =
        VisualizationCatalog::new().with_entry("Token", Visualization::new("visuals/token.html"));
    let reader = ReaderService::new(
        Arc::new(MemorySource),
        progress.clone(),
        Arc::new(catalog),
        ReaderSettings::default(),
    );

    let app = Arc::new(TestApp {
        reader: Arc::new(reader),
        progress: Arc::new(progress),
    });

    let reader_handles = match view {
        ViewKind::Reader(_) => Some(ReaderTestHandles::default()),
        ViewKind::Home => None,
    };

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app,
            view,
            reader_handles: reader_handles.clone(),
        },
    );
    ViewHarness {
        dom,
        repo,
        reader_handles,
    }
}
