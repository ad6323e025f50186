pub mod actor;
pub mod appointment;
pub mod assistant_profile;
pub mod conversation;
pub mod employee;

pub use actor::{Actor, ActorRole, Claims};
pub use appointment::{
    Appointment, AppointmentCreateRequest, AppointmentDraft, BookingEdit, BookingMethod,
    DraftError, FinalizedBooking, ManualBookingForm,
};
pub use assistant_profile::AssistantProfile;
pub use conversation::{ConversationTurn, SessionStatus, Transcript, TurnRole};
pub use employee::{Department, DirectoryEntry, Employee};
