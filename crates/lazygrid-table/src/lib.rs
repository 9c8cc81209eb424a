//! LazyGrid Table - paginated grid state and controller
//!
//! The grid is one immutable [`GridViewState`] transformed by [`reduce`].
//! Components that make up the state:
//!
//! - [`PageWindow`] - which slice of the remote collection is shown
//! - [`PinSet`] - rows locked above the paginated rows
//! - [`EditState`] - the single inline edit session
//! - [`SelectionSet`] - selected records, kept by identity
//!
//! [`GridController`] runs the effects of each transition against a
//! [`lazygrid_core::RecordSource`].

mod controller;
mod edit_session;
mod intent;
mod page_window;
mod pin_set;
mod reducer;
mod selection;
mod view_state;

pub use controller::*;
pub use edit_session::*;
pub use intent::*;
pub use page_window::*;
pub use pin_set::*;
pub use reducer::*;
pub use selection::*;
pub use view_state::*;
