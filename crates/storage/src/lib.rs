//! Store adapters for the burner board: the hand-edited CSV task sheet and the
//! JSON board state served to the web front-end.

pub mod error;
pub mod sheet;
pub mod state_store;

pub use error::StoreError;
pub use sheet::TaskSheet;
pub use state_store::{seed_from_sheet, StateStore};
