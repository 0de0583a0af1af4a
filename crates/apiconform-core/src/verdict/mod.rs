//! Verdict module - evaluation outcomes, body violations, and polarity judgement

mod outcome;
mod policy;
mod violation;

pub use outcome::{Endpoint, Outcome, OutcomeKind};
pub use policy::{Polarity, Verdict, VerdictStatus, judge};
pub use violation::{Violation, ViolationKind};
