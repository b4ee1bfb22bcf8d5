//! # Engine Module
//!
//! The stateful part of the pipeline: an explicit alignment session that owns the
//! dimer and its copies, the superposition routine that chains the copies into a
//! ring fragment, and the numeric analysis that turns the resulting geometry into
//! an RMSD curve and a stoichiometry estimate.
//!
//! - **Session** ([`session`]) - Named molecular objects, copying, chain-on-chain
//!   alignment, saving and ring model export
//! - **Superposition** ([`superposition`]) - Homologous atom pairing and iterative
//!   best-fit with outlier rejection
//! - **Analysis** ([`analysis`]) - Chain RMSD and first local minimum search
//! - **Configuration** ([`config`]) - Analysis parameters and their builder
//! - **Progress Monitoring** ([`progress`]) - Progress events for front ends
//! - **Error Handling** ([`error`]) - Engine error type
//!
//! No state is shared between sessions; every analysis call creates its own.

pub mod analysis;
pub mod config;
pub mod error;
pub mod progress;
pub mod session;
pub mod superposition;
