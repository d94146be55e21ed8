//! Top-level module for the chain generation system.
//!
//! - Token pairs (`Context`) and their observed continuations (`Followers`)
//! - Model construction (`ModelBuilder`, `build_model`)
//! - The model itself (`ChainModel`)
//! - Generation parameters (`GenerationInput`) and output (`Message`)
//! - Generation (`generate_message`, `Generator`)

/// Two-token contexts and terminal punctuation.
pub mod context;

/// Candidate next tokens of one context, with weighted picking.
pub mod followers;

/// Corpus-to-model construction, sequential or on worker threads.
pub mod builder;

/// Transition map, starter registry, merging and binary cache.
pub mod chain_model;

/// Length budget, length policy, step bound and retry count.
pub mod generation_input;

pub mod message;

/// Random walk over a model, and the high-level `Generator`.
pub mod generator;
