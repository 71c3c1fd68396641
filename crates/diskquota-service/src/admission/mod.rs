//! Admission control: reservation ledger, per-scope serialization and the
//! controller that ties them to usage and policy.

pub mod controller;
pub mod ledger;
pub mod locks;
pub mod sweeper;
pub mod ticket;

pub use controller::{Admission, AdmissionController};
pub use ledger::{Reservation, ReservationLedger};
pub use locks::ScopeLocks;
pub use sweeper::ReservationSweeper;
pub use ticket::AdmissionTicket;
