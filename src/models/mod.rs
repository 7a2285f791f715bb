pub mod appointment;
pub mod conversation;
pub mod fields;
pub mod intent;

pub use appointment::{Appointment, Customer};
pub use conversation::{Conversation, ConversationMessage, PatientKind, Stage};
pub use fields::{AppointmentDraft, Field};
pub use intent::{ExtractedFields, FlowIntent, UtteranceIntent};
