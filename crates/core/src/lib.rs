//! Domain primitives shared by every `inmo` crate.
//!
//! Nothing in here touches the network or the database: these are the
//! constants, validation rules, and small pure helpers that the repository
//! and HTTP layers agree on.

pub mod assignment;
pub mod avatar;
pub mod contact;
pub mod error;
pub mod photo;
pub mod roles;
pub mod search;
pub mod types;
