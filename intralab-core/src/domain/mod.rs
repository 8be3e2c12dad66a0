//! Domain types for Intralab.

pub mod bar;
pub mod position;
pub mod session;
pub mod trade;

pub use bar::Bar;
pub use position::{Direction, Position};
pub use session::{SessionError, SessionWindow};
pub use trade::{ExitReason, Trade};
