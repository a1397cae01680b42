//! Random number generation subsystem.
//!
//! Provides the ISAAC-derived generator and the password keystream that
//! drives key derivation for the encryption envelope.

pub mod isaac;
pub mod keystream;
