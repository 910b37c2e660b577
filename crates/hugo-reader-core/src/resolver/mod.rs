//! Ordered multi-candidate endpoint resolution.
//!
//! A query describes *where the data might be* as a [`CandidateSet`]; the
//! [`Resolver`] finds the first candidate whose payload passes its
//! [`Validator`], consulting the shared cache before the network.

mod candidate;
mod engine;
mod validator;

pub use candidate::{Candidate, CandidateSet};
pub use engine::{CandidateOutcome, Origin, Resolved, Resolver, SourceDescriptor, Unsatisfied};
pub use validator::Validator;
