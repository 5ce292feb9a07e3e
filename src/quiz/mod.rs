//! Quiz domain: the question catalogue, the answer map and the wizard state
//! machine that drives a run from the first question to the compute call.

pub mod answers;
pub mod question;
pub mod transport;
pub mod wizard;

pub use answers::{AnswerMap, TRANSPORT_KEY};
pub use question::{default_questions, Question, ANNUALIZE_FACTOR, DISTANCE_KEY};
pub use transport::{TransportMode, UnknownTransport};
pub use wizard::{parse_answer, Submitted, WizardController, WizardState};
