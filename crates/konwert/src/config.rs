//! Resource limits shared by all parsers

use crate::error::{Error, ErrorKind, Result};

pub const DEFAULT_MAX_DEPTH: u16 = 128;
pub const DEFAULT_MAX_SIZE: usize = 10 * 1024 * 1024;
/// Hard ceiling on nesting depth. Trees are walked recursively (bridge,
/// writers, drop), so depth is never unbounded.
pub const MAX_DEPTH_CEILING: u16 = 1024;

/// Input limits applied while parsing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Limits {
    /// Maximum nesting depth of containers / elements.
    /// 0 or anything above [`MAX_DEPTH_CEILING`] means the ceiling.
    pub max_depth: u16,
    /// Maximum input size in bytes (0 means unlimited)
    pub max_size: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_size: DEFAULT_MAX_SIZE,
        }
    }
}

impl Limits {
    /// No size limit, depth up to [`MAX_DEPTH_CEILING`]
    pub const fn permissive() -> Self {
        Self {
            max_depth: 0,
            max_size: 0,
        }
    }

    pub const fn new(max_depth: u16, max_size: usize) -> Self {
        Self {
            max_depth,
            max_size,
        }
    }

    pub fn check_size(&self, len: usize) -> Result<()> {
        if self.max_size != 0 && len > self.max_size {
            return Err(Error::new(ErrorKind::MaxSizeExceeded { max: self.max_size }));
        }
        Ok(())
    }

    /// Depth limit actually enforced
    pub fn effective_max_depth(&self) -> u16 {
        match self.max_depth {
            0 => MAX_DEPTH_CEILING,
            n => n.min(MAX_DEPTH_CEILING),
        }
    }

    pub fn check_depth(&self, depth: usize) -> Result<()> {
        let max = self.effective_max_depth();
        if depth > usize::from(max) {
            return Err(Error::new(ErrorKind::MaxDepthExceeded { max }));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = Limits::default();
        assert!(limits.check_size(DEFAULT_MAX_SIZE).is_ok());
        assert!(limits.check_size(DEFAULT_MAX_SIZE + 1).is_err());
        assert!(limits.check_depth(128).is_ok());
        assert!(limits.check_depth(129).is_err());
    }

    #[test]
    fn test_permissive_keeps_depth_ceiling() {
        let limits = Limits::permissive();
        assert!(limits.check_size(usize::MAX).is_ok());
        assert!(limits.check_depth(usize::from(MAX_DEPTH_CEILING)).is_ok());
        let err = limits.check_depth(usize::MAX).unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::MaxDepthExceeded {
                max: MAX_DEPTH_CEILING
            }
        );
    }

    #[test]
    fn test_depth_above_ceiling_is_clamped() {
        let limits = Limits::new(u16::MAX, 0);
        assert_eq!(limits.effective_max_depth(), MAX_DEPTH_CEILING);
        assert!(limits.check_depth(usize::from(MAX_DEPTH_CEILING) + 1).is_err());
    }

    #[test]
    fn test_error_kinds() {
        let limits = Limits::new(2, 4);
        let err = limits.check_depth(3).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::MaxDepthExceeded { max: 2 });
        let err = limits.check_size(5).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::MaxSizeExceeded { max: 4 });
    }
}
