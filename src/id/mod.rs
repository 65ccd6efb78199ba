//! Correlation id generation.
//!
//! # Responsibilities
//! - Produce short unique ids for connections, statements and transactions
//! - Allow callers to plug in their own generator
//! - Turn fallible generators into total ones
//!
//! # Design Decisions
//! - A generator is a shared closure, so one instance serves every resource level
//! - The default generator draws from the thread-local CSPRNG and never fails

pub mod generator;

pub use generator::{
    default_id_gen, id_gen_with_fallback, uuid_id_gen, IdGenerator, RandomIdGen, DEFAULT_ALPHABET, DEFAULT_ID_LENGTH,
};
