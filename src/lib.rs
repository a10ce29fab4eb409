//! Decoder for the PGA460 ultrasonic AFE configuration register block
//!
//! The PGA460 stores its burst/listen configuration in a block of 55
//! single-byte registers (REG1..REG55). This crate turns such a block into
//! named bitfields and derives the two engineering-unit curves it encodes:
//! the per-channel 12-stage threshold profile and the 6-segment
//! time-varying-gain (TVG) profile.
//!
//! The recommended way to use this crate is the [high-level interface]. If
//! you require a higher degree of flexibility, you can use the
//! [register-level interface] instead.
//!
//! Everything here is a pure function of an immutable input snapshot, so
//! frames can be decoded concurrently without coordination.
//!
//! ```
//! use pga460_cfg::{Channel, ConfigFrame, ThresholdProfile, TvgProfile};
//!
//! let frame = ConfigFrame::new(&[0u8; 55])?;
//!
//! let p1 = ThresholdProfile::decode(&frame, Channel::P1);
//! let tvg = TvgProfile::decode(&frame);
//!
//! assert_eq!(p1.stages[0].delta_us, 100);
//! assert_eq!(tvg.segments.len(), 6);
//! # Ok::<(), pga460_cfg::Error>(())
//! ```
//!
//! [high-level interface]: hl/index.html
//! [register-level interface]: ll/index.html
#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod hl;
pub mod ll;
pub mod time;

pub use crate::{
    hl::{
        Channel, Segment, Stage, ThresholdProfile, TvgFlags, TvgProfile, THRESHOLD_STAGES,
        TVG_GAIN_MAX, TVG_SEGMENTS,
    },
    ll::{ConfigFrame, Error, ReservedBits, FRAME_LEN},
};
