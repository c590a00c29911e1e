pub mod filter;
pub mod poller;

pub use crate::domain::model::{AuthSession, AvailableSlot, Center, LocationTarget, Session};
pub use crate::domain::ports::{Notifier, Prompt, SlotSource};
pub use crate::utils::error::Result;
