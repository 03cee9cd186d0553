//! The single owner of an open chapter.
//!
//! Chapter opens, user intents, resets and elapsed dwell tickets all pass
//! through one loop, so they apply strictly in arrival order and an intent
//! that arrives during a save waits for it instead of being lost.

use std::sync::Arc;

use futures::{Stream, StreamExt};
use reader_core::model::ChapterId;
use reader_core::navigation::DwellTicket;
use services::reader::DwellEvents;
use services::{ReaderIntent, ReaderService, ReaderSnapshot};

use super::reader_vm::{ReaderVm, open_reader};
use crate::views::ViewError;

/// What the reader view asks of the open chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderCommand {
    /// Open a chapter, closing whatever was open.
    Open(ChapterId),
    Intent(ReaderIntent),
    /// Clear saved and in-memory progress for the open chapter.
    Reset,
}

/// What the loop reports back after each step.
#[derive(Debug, Clone, PartialEq)]
pub enum ReaderUpdate {
    Loading,
    Snapshot(ReaderSnapshot),
    /// The chapter could not be opened.
    LoadFailed(ViewError),
    /// A save or reset failed; the chapter stays open.
    ActionFailed(ViewError),
}

enum Step {
    Command(ReaderCommand),
    Dwell(DwellTicket),
}

async fn next_ticket(events: &mut Option<DwellEvents>) -> Option<DwellTicket> {
    match events {
        Some(events) => events.recv().await,
        None => std::future::pending().await,
    }
}

/// Runs until `commands` ends, applying each command and dwell ticket in turn.
pub async fn run_reader<S>(
    reader: Arc<ReaderService>,
    mut commands: S,
    mut publish: impl FnMut(ReaderUpdate),
) where
    S: Stream<Item = ReaderCommand> + Unpin,
{
    let mut vm: Option<ReaderVm> = None;
    let mut events: Option<DwellEvents> = None;

    loop {
        let step = tokio::select! {
            biased;
            command = commands.next() => match command {
                Some(command) => Step::Command(command),
                None => break,
            },
            Some(ticket) = next_ticket(&mut events) => Step::Dwell(ticket),
        };

        match step {
            Step::Command(ReaderCommand::Open(chapter)) => {
                // Dropping the old session and its events discards any ticket
                // it still had in flight.
                vm = None;
                events = None;
                publish(ReaderUpdate::Loading);
                match open_reader(&reader, chapter).await {
                    Ok((opened, dwell)) => {
                        publish(ReaderUpdate::Snapshot(opened.snapshot()));
                        vm = Some(opened);
                        events = dwell;
                    }
                    Err(err) => publish(ReaderUpdate::LoadFailed(err)),
                }
            }
            Step::Command(ReaderCommand::Intent(intent)) => {
                if let Some(local) = vm.as_mut()
                    && local.dispatch(intent)
                {
                    publish(ReaderUpdate::Snapshot(local.snapshot()));
                }
            }
            Step::Command(ReaderCommand::Reset) => {
                if let Some(local) = vm.as_mut() {
                    let result = local.reset().await;
                    publish(ReaderUpdate::Snapshot(local.snapshot()));
                    if let Err(err) = result {
                        publish(ReaderUpdate::ActionFailed(err));
                    }
                }
            }
            Step::Dwell(ticket) => {
                if let Some(local) = vm.as_mut() {
                    match local.credit_dwell(ticket).await {
                        Ok(true) => publish(ReaderUpdate::Snapshot(local.snapshot())),
                        Ok(false) => {}
                        Err(err) => publish(ReaderUpdate::ActionFailed(err)),
                    }
                }
            }
        }
    }
}
