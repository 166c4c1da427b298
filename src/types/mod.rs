//! Data types for the man-hour grid.

mod cell;
mod change;
mod column;
mod employee;
mod state;
mod ui_state;

pub use cell::*;
pub use change::*;
pub use column::*;
pub use employee::*;
pub use state::*;
pub use ui_state::*;
