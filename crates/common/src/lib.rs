//! Shared building blocks for backend services: identifier obfuscation,
//! the domain error taxonomy, validation failure phrasing, common payload
//! types, an in-process event emitter and logging bootstrap.

pub mod emitter;
pub mod errors;
pub mod hashid;
pub mod types;
pub mod utils;
pub mod validation;

pub use errors::{Error, ErrorKind};
pub use hashid::{HashId, Id, IdHasher};

