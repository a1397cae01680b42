//! Low-level helpers shared by the cipher and compression stages.

pub(crate) mod bits;
pub(crate) mod buffer;
pub(crate) mod converter;
