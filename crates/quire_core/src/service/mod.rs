//! Use-case services over the document model.
//!
//! # Responsibility
//! - Provide the explicit session handle the boundary layer drives,
//!   instead of ambient "currently open project" state.

pub mod session;
