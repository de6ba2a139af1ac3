mod action;
mod intake;
mod pending_job;
mod shared;
pub mod time;
mod user;

pub use action::{IntakeAction, InvalidIntakeAction};
pub use intake::{Intake, IntakeStatus};
pub use pending_job::PendingJob;
pub use shared::entity::{Entity, InvalidIDError, ID};
pub use time::{InvalidTimeOfDay, TimeOfDay};
pub use user::{InvalidSlot, Slot, User, DEFAULT_SLOT1_TIME, DEFAULT_SLOT2_TIME};
