//! High-level interface: engineering-unit profiles
//!
//! This module derives the two engineering-unit curves a configured PGA460
//! carries: the per-channel threshold profile ([`ThresholdProfile`]) and the
//! time-varying-gain profile ([`TvgProfile`]). This is the recommended way to
//! consume a configuration block, unless you need the greater flexibility
//! provided by the [register-level interface].
//!
//! [register-level interface]: ../ll/index.html

pub use threshold::*;
pub use tvg::*;

mod threshold;
mod tvg;

/// Burst/listen channel of the device
///
/// The PGA460 stores two independent threshold configurations, one per
/// channel (typically short range and long range presets).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Channel {
    /// Preset 1
    P1,
    /// Preset 2
    P2,
}

impl Channel {
    /// 0-based frame offset of this channel's Px_THR_0 register
    pub(crate) fn thr_base(self) -> usize {
        match self {
            Channel::P1 => 23, // REG24
            Channel::P2 => 39, // REG40
        }
    }
}
