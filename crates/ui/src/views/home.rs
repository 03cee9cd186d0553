use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewState, view_state_from_resource};
use crate::vm::load_chapter_cards;

#[component]
pub fn HomeView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();

    let ctx_for_launch = ctx.clone();
    use_effect(move || {
        if let Some(chapter) = ctx_for_launch.take_initial_chapter() {
            let _ = navigator.replace(Route::Reader {
                number: chapter.value(),
            });
        }
    });

    let resource = use_resource(move || {
        let reader = ctx.reader();
        let progress = ctx.progress();
        async move { load_chapter_cards(&reader, &progress).await }
    });
    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page home-page",
            h2 { "Chapters" }
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    div { class: "error-card",
                        p { "{err.message()}" }
                    }
                },
                ViewState::Ready(cards) => rsx! {
                    if cards.is_empty() {
                        p { class: "muted", "No chapters found. Add data/chapterN.json or chapters/chapterN.md to the content directory." }
                    }
                    ul { class: "chapter-list",
                        for card in cards {
                            li { key: "{card.number}", class: "chapter-card",
                                Link { to: Route::Reader { number: card.number }, "{card.label}" }
                                span { class: "chapter-card__progress", "{card.progress_label}" }
                                div { class: "progress-bar",
                                    div { class: "progress-bar__fill", style: "width: {card.percent}%" }
                                }
                            }
                        }
                    }
                },
            }
        }
    }
}
