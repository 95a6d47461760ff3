//! Session-scoped builder services
//!
//! The operations a builder conversation drives: gateway lifecycle, tool
//! packaging and registration, agent deployment, and A2A connection
//! management, plus the operator-facing result rendering.

pub mod a2a;
pub mod deployment;
pub mod gateway;
pub mod report;
pub mod session;
pub mod tools;

#[cfg(test)]
mod a2a_test;
#[cfg(test)]
mod deployment_test;
#[cfg(test)]
mod gateway_test;
