//! Tuning parameters for the DMC stage.
//!
//! The defaults define the on-disk format: a stream compressed with one
//! configuration only decodes under the same configuration.

use crate::error::{CodecError, Result};

/// Default number of clone nodes reserved next to the braid.
pub const DEFAULT_CLONE_CAPACITY: usize = 0x80000;

/// Default number of reserved clone slots left unused before the braid
/// is rebuilt.
pub const DEFAULT_CLONE_HEADROOM: usize = 20;

/// Default growth, in compressed bytes per 256 coded bytes, above which
/// the model is discarded.
pub const DEFAULT_FLUSH_WINDOW: usize = 0x100;

/// Predictor memory and flush thresholds.
///
/// # Examples
///
/// ```
/// use braidcodec::config::DmcConfig;
///
/// let cfg = DmcConfig::new(4096, 8, 0x100).unwrap();
/// assert_eq!(cfg.clone_limit(), 4088);
///
/// assert!(DmcConfig::new(16, 16, 0x100).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DmcConfig {
    clone_capacity: usize,
    clone_headroom: usize,
    flush_window: usize,
}

impl Default for DmcConfig {
    fn default() -> Self {
        DmcConfig {
            clone_capacity: DEFAULT_CLONE_CAPACITY,
            clone_headroom: DEFAULT_CLONE_HEADROOM,
            flush_window: DEFAULT_FLUSH_WINDOW,
        }
    }
}

impl DmcConfig {
    /// Creates a validated configuration.
    ///
    /// # Parameters
    /// - `clone_capacity`: Clone nodes reserved beside the braid.
    /// - `clone_headroom`: Slots kept free; the braid is rebuilt once more
    ///   than `clone_capacity - clone_headroom` clones exist.
    /// - `flush_window`: Compressed-side growth per 256 bytes that forces a
    ///   model flush.
    ///
    /// # Errors
    /// Returns [`CodecError::InvalidConfig`] if the headroom is zero, is not
    /// smaller than the capacity, or the flush window is zero.
    pub fn new(clone_capacity: usize, clone_headroom: usize, flush_window: usize) -> Result<Self> {
        if clone_headroom == 0 {
            return Err(CodecError::InvalidConfig {
                reason: "clone headroom must be at least 1",
            });
        }
        if clone_headroom >= clone_capacity {
            return Err(CodecError::InvalidConfig {
                reason: "clone headroom must be smaller than clone capacity",
            });
        }
        if flush_window == 0 {
            return Err(CodecError::InvalidConfig {
                reason: "flush window must be non-zero",
            });
        }
        Ok(DmcConfig {
            clone_capacity,
            clone_headroom,
            flush_window,
        })
    }

    /// Number of clone nodes reserved beside the braid.
    pub fn clone_capacity(&self) -> usize {
        self.clone_capacity
    }

    /// Reserved slots left unused before a rebuild.
    pub fn clone_headroom(&self) -> usize {
        self.clone_headroom
    }

    /// Clone count above which the braid is rebuilt.
    pub fn clone_limit(&self) -> usize {
        self.clone_capacity - self.clone_headroom
    }

    /// Flush threshold in compressed bytes per 256 coded bytes.
    pub fn flush_window(&self) -> usize {
        self.flush_window
    }
}
