//! The project stage screen: loading, record dialogs and reordering.

pub mod dialog;
pub mod list;
pub mod notice;
pub mod reference;
pub mod reorder;

pub use dialog::*;
pub use list::*;
pub use notice::*;
pub use reference::*;
pub use reorder::{Direction, is_dense};
