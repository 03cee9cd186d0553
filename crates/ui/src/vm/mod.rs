mod chapter_vm;
mod markdown_vm;
mod reader_loop;
mod reader_vm;

pub use chapter_vm::{ChapterCardVm, load_chapter_cards};
pub use markdown_vm::{markdown_to_html, sanitize_html};
pub use reader_loop::{ReaderCommand, ReaderUpdate, run_reader};
pub use reader_vm::{ItemCardVm, map_item_cards};
