use services::{ProgressService, ReaderService, SavedProgress};

use crate::views::ViewError;

/// A chapter entry on the home page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChapterCardVm {
    pub number: u32,
    pub label: String,
    pub progress_label: String,
    pub percent: u8,
}

fn progress_label(saved: Option<SavedProgress>) -> (String, u8) {
    match saved {
        Some(saved) if saved.read > 0 => (
            format!("{} / {} read · {}%", saved.read, saved.total, saved.percent),
            saved.percent,
        ),
        _ => ("Not started".to_string(), 0),
    }
}

/// # Errors
///
/// Returns `ViewError::Unknown` if the content source cannot list chapters.
pub async fn load_chapter_cards(
    reader: &ReaderService,
    progress: &ProgressService,
) -> Result<Vec<ChapterCardVm>, ViewError> {
    let chapters = reader
        .list_chapters()
        .await
        .map_err(|_| ViewError::Unknown)?;

    let mut cards = Vec::with_capacity(chapters.len());
    for chapter in chapters {
        let (progress_label, percent) = progress_label(progress.saved(chapter).await);
        cards.push(ChapterCardVm {
            number: chapter.value(),
            label: format!("Module {chapter}"),
            progress_label,
            percent,
        });
    }
    Ok(cards)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_untouched_and_started_chapters() {
        assert_eq!(progress_label(None), ("Not started".to_string(), 0));
        let zero = SavedProgress {
            read: 0,
            total: 4,
            percent: 0,
        };
        assert_eq!(progress_label(Some(zero)).0, "Not started");
        let some = SavedProgress {
            read: 1,
            total: 3,
            percent: 33,
        };
        assert_eq!(progress_label(Some(some)), ("1 / 3 read · 33%".to_string(), 33));
    }
}
