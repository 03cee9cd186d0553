mod home;
mod reader;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use home::HomeView;
pub use reader::ReaderView;
pub use state::{ViewError, ViewState, view_state_from_resource};
