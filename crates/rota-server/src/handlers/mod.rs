pub mod collaborators;
pub mod schedule;
pub mod session;
