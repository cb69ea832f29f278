//! Domain models for Shelfie Inventories

mod expense;
mod good;
mod incoming;
mod outgoing;
mod party;
mod report;

pub use expense::*;
pub use good::*;
pub use incoming::*;
pub use outgoing::*;
pub use party::*;
pub use report::*;

/// Status flow shared by stock movements.
///
/// A movement starts `pending` and may move once to a terminal status.
/// Terminal statuses accept no further transitions.
pub trait MovementStatus: Copy + Eq {
    fn is_terminal(self) -> bool;

    fn can_transition_to(self, _next: Self) -> bool {
        !self.is_terminal()
    }
}
