//! Domain models for the vet-reminders system.

mod consent;
mod interaction;
mod patient;
mod vaccine;

pub use consent::*;
pub use interaction::*;
pub use patient::*;
pub use vaccine::*;
