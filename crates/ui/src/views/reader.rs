#[cfg(test)]
use std::{cell::RefCell, rc::Rc};

use dioxus::prelude::*;
use dioxus_router::Link;

use reader_core::model::ChapterId;
use reader_core::panel::PanelDisplay;
use services::{ReaderIntent, ReaderSnapshot};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState};
use crate::vm::{ItemCardVm, ReaderCommand, ReaderUpdate, map_item_cards, run_reader};

#[component]
pub fn ReaderView(number: u32) -> Element {
    let ctx = use_context::<AppContext>();

    let status = use_signal(|| ViewState::<()>::Loading);
    let snapshot = use_signal(|| None::<ReaderSnapshot>);
    let error = use_signal(|| None::<ViewError>);
    let mut confirm_reset = use_signal(|| false);

    let commands = use_coroutine(move |rx: UnboundedReceiver<ReaderCommand>| {
        let reader = ctx.reader();
        let mut status = status;
        let mut snapshot = snapshot;
        let mut error = error;

        run_reader(reader, rx, move |update| match update {
            ReaderUpdate::Loading => {
                status.set(ViewState::Loading);
                snapshot.set(None);
                error.set(None);
            }
            ReaderUpdate::Snapshot(next) => {
                status.set(ViewState::Ready(()));
                snapshot.set(Some(next));
                error.set(None);
            }
            ReaderUpdate::LoadFailed(err) => {
                status.set(ViewState::Error(err));
                snapshot.set(None);
            }
            ReaderUpdate::ActionFailed(err) => error.set(Some(err)),
        })
    });

    use_effect(use_reactive!(|(number,)| {
        commands.send(ReaderCommand::Open(ChapterId::new(number)));
    }));

    let dispatch = use_callback(move |intent: ReaderIntent| {
        commands.send(ReaderCommand::Intent(intent));
    });

    let request_reset = use_callback(move |()| confirm_reset.set(true));

    let reset = use_callback(move |()| {
        confirm_reset.set(false);
        commands.send(ReaderCommand::Reset);
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<ReaderTestHandles>() {
                handles.register(dispatch, request_reset, reset);
            }
        }
    }

    let on_key = move |evt: KeyboardEvent| {
        if let Some(intent) = ReaderIntent::from_key(&evt.data.key().to_string()) {
            evt.prevent_default();
            dispatch.call(intent);
        }
    };

    let state = status.read().clone();
    let snap = snapshot.read().clone();
    let action_error = error.read().clone();
    let topbar = snap.as_ref().map(|s| TopBar {
        heading: s.heading(),
        position: s.position_label(),
        read: format!("Read: {} / {}", s.summary.read, s.summary.total),
        percent: s.summary.percent_label(),
        panel_open: s.panel.open,
    });

    rsx! {
        div { class: "page reader-page", id: "reader-root", tabindex: "0", onkeydown: on_key,
            header { class: "reader-topbar",
                Link { class: "reader-back", to: Route::Home {}, "← Chapters" }
                if let Some(bar) = topbar {
                    h2 { class: "reader-title", "{bar.heading}" }
                    div { class: "reader-stats",
                        span { class: "reader-position", "{bar.position}" }
                        span { class: "reader-read", "{bar.read}" }
                        span { class: "reader-percent", "{bar.percent}" }
                    }
                    div { class: "progress-bar",
                        div { class: "progress-bar__fill", style: "width: {bar.percent}" }
                    }
                    div { class: "reader-actions",
                        button {
                            class: "btn btn-secondary",
                            id: "reader-panel-toggle",
                            r#type: "button",
                            onclick: move |_| dispatch.call(ReaderIntent::TogglePanel),
                            if bar.panel_open { "Hide demo" } else { "Show demo" }
                        }
                        button {
                            class: "btn btn-danger",
                            id: "reader-reset",
                            r#type: "button",
                            onclick: move |_| request_reset.call(()),
                            "Reset progress"
                        }
                    }
                }
            }

            if let Some(err) = action_error {
                p { class: "reader-action-error", "{err.message()}" }
            }

            match (state, snap) {
                (ViewState::Error(err), _) => rsx! {
                    div { class: "error-card",
                        h2 { "Error Loading Chapter" }
                        p { "{err.message()}" }
                    }
                },
                (ViewState::Ready(()), Some(snap)) => rsx! {
                    ReaderBody { snapshot: snap, on_intent: dispatch }
                },
                _ => rsx! {
                    p { "Loading..." }
                },
            }

            if confirm_reset() {
                div { class: "modal-overlay",
                    div { class: "modal", role: "dialog", aria_modal: "true",
                        p { "Reset progress for this module?" }
                        div { class: "modal__actions",
                            button {
                                class: "btn btn-secondary",
                                id: "reader-reset-cancel",
                                r#type: "button",
                                onclick: move |_| confirm_reset.set(false),
                                "Cancel"
                            }
                            button {
                                class: "btn btn-danger",
                                id: "reader-reset-confirm",
                                r#type: "button",
                                onclick: move |_| reset.call(()),
                                "Reset"
                            }
                        }
                    }
                }
            }
        }
    }
}

struct TopBar {
    heading: String,
    position: String,
    read: String,
    percent: String,
    panel_open: bool,
}

#[component]
fn ReaderBody(snapshot: ReaderSnapshot, on_intent: EventHandler<ReaderIntent>) -> Element {
    let cards = map_item_cards(&snapshot);
    let compact = snapshot.panel.compact_showing;
    let terms_class = if compact {
        "terms-panel mobile-viz-hidden"
    } else {
        "terms-panel"
    };
    let viz_class = if compact {
        "viz-panel mobile-viz-active"
    } else {
        "viz-panel"
    };

    rsx! {
        div { class: "reader-body",
            section { class: "{terms_class}",
                for card in cards {
                    ItemCard { key: "{card.key}", card: card.clone(), on_intent }
                }
            }

            if snapshot.panel.open {
                aside { class: "{viz_class}",
                    header { class: "viz-panel__header",
                        button {
                            class: "viz-panel__close",
                            r#type: "button",
                            onclick: move |_| on_intent.call(ReaderIntent::ClosePanel),
                            "×"
                        }
                    }
                    match snapshot.panel.display.clone() {
                        PanelDisplay::Frame { path, title } => rsx! {
                            h3 { class: "viz-panel__title", "{title}" }
                            iframe { class: "viz-frame", src: "{path}", title: "{title}" }
                        },
                        PanelDisplay::Placeholder => rsx! {
                            div { class: "viz-placeholder",
                                p { "Select a term with a demo to load its visualization." }
                            }
                        },
                    }
                }
            }

            if snapshot.can_toggle_compact {
                button {
                    class: if compact { "mobile-viz-toggle active" } else { "mobile-viz-toggle" },
                    id: "mobile-viz-toggle",
                    r#type: "button",
                    onclick: move |_| on_intent.call(ReaderIntent::ToggleCompact),
                    if compact { "←" } else { "→" }
                }
            }
        }
    }
}

#[component]
fn ItemCard(card: ItemCardVm, on_intent: EventHandler<ReaderIntent>) -> Element {
    let index = card.index;

    rsx! {
        div {
            class: "{card.class}",
            id: "item-{card.key}",
            onclick: move |_| on_intent.call(ReaderIntent::Activate(index)),
            if card.is_header {
                h3 { class: "section-card__title", "{card.title}" }
            } else {
                div { class: "term-card__header",
                    h4 { class: "term-card__title", "{card.title}" }
                    if card.has_demo {
                        button {
                            class: "badge badge-demo",
                            r#type: "button",
                            onclick: move |evt: MouseEvent| {
                                evt.stop_propagation();
                                on_intent.call(ReaderIntent::OpenVisualization(index));
                            },
                            "Has demo"
                        }
                    }
                }
                if !card.definition_html.is_empty() {
                    div { class: "term-card__definition", dangerous_inner_html: "{card.definition_html}" }
                }
                if !card.keywords.is_empty() {
                    div { class: "term-card__keywords",
                        for keyword in card.keywords.iter() {
                            span { key: "{keyword}", class: "tag", "{keyword}" }
                        }
                    }
                }
                span { class: "term-card__mastery", "{card.mastery_label}" }
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct ReaderTestHandles {
    dispatch: Rc<RefCell<Option<Callback<ReaderIntent>>>>,
    request_reset: Rc<RefCell<Option<Callback<()>>>>,
    confirm_reset: Rc<RefCell<Option<Callback<()>>>>,
}

#[cfg(test)]
impl ReaderTestHandles {
    pub(crate) fn register(
        &self,
        dispatch: Callback<ReaderIntent>,
        request_reset: Callback<()>,
        confirm_reset: Callback<()>,
    ) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.request_reset.borrow_mut() = Some(request_reset);
        *self.confirm_reset.borrow_mut() = Some(confirm_reset);
    }

    pub(crate) fn dispatch(&self) -> Callback<ReaderIntent> {
        (*self.dispatch.borrow()).expect("reader dispatch registered")
    }

    pub(crate) fn request_reset(&self) -> Callback<()> {
        (*self.request_reset.borrow()).expect("reset request registered")
    }

    pub(crate) fn confirm_reset(&self) -> Callback<()> {
        (*self.confirm_reset.borrow()).expect("reset confirm registered")
    }
}
