mod participant;
mod side;

pub use participant::{MarketParticipant, ParticipantId};
pub use side::Side;
