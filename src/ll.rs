//! Register-level interface to the PGA460 configuration block
//!
//! This module implements a register-level view of the 55-byte configuration
//! block (REG1..REG55, the TVGAIN0..P2_THR_15 range of the device EEPROM).
//! Users of this library should typically not need to use this. Please
//! consider using the [high-level interface] instead.
//!
//! **NOTE**: Field access methods return the field right-aligned in a `u8`.
//! Fields that span two registers (the TVG gains G2 and G3) are reconstructed
//! by explicit methods on [`ConfigFrame`]; they are deliberately not part of
//! the register map, so the exact two-register split stays visible.
//!
//! [high-level interface]: ../hl/index.html

use core::fmt;

/// Length of the configuration block in bytes
///
/// The block covers REG1..REG55 in fixed order. Any transfer prefix must be
/// stripped by the frame-assembly layer before construction.
pub const FRAME_LEN: usize = 55;

/// Extracts `width` bits of `byte` starting at bit `lsb`
///
/// Bit 0 is the least-significant bit. Callers guarantee `width` is in 1..=8
/// and `lsb + width <= 8`.
#[inline(always)]
pub const fn get_bits(byte: u8, lsb: u8, width: u8) -> u8 {
    (byte >> lsb) & (((1u16 << width) - 1) as u8)
}

/// Extracts bits [7:4] of a byte
#[inline(always)]
pub const fn hi_nibble(byte: u8) -> u8 {
    (byte >> 4) & 0x0f
}

/// Extracts bits [3:0] of a byte
#[inline(always)]
pub const fn lo_nibble(byte: u8) -> u8 {
    byte & 0x0f
}

/// An error that can occur when assembling a configuration frame
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The supplied buffer does not hold exactly [`FRAME_LEN`] bytes
    InvalidFrameLength {
        /// Length of the buffer that was supplied
        len: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidFrameLength { len } => {
                write!(
                    f,
                    "invalid frame length: got {} bytes, expected {}",
                    len, FRAME_LEN
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Immutable view of the 55-byte configuration block
///
/// Construction validates the length and nothing else: every byte value is a
/// legal register state. Reserved bits being set are observations (see
/// [`ConfigFrame::reserved_bits`]), never decode failures.
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct ConfigFrame([u8; FRAME_LEN]);

impl ConfigFrame {
    /// Creates a frame from a buffer holding REG1..REG55
    ///
    /// Returns [`Error::InvalidFrameLength`] unless the buffer is exactly
    /// [`FRAME_LEN`] bytes. The bytes are copied; the frame never changes
    /// after construction.
    pub fn new(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != FRAME_LEN {
            return Err(Error::InvalidFrameLength { len: bytes.len() });
        }

        let mut buf = [0; FRAME_LEN];
        buf.copy_from_slice(bytes);

        Ok(ConfigFrame(buf))
    }

    /// Returns the raw register bytes, REG1 first
    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.0
    }

    /// TVG gain G2, reconstructed from its two-register split
    ///
    /// G2 is a 6-bit field whose upper 2 bits live in TVGAIN3 bits [1:0] and
    /// whose lower 4 bits live in TVGAIN4 bits [7:4].
    pub fn tvg_g2(&self) -> u8 {
        (self.tvgain3().tvg_g2_hi() << 4) | self.tvgain4().tvg_g2_lo()
    }

    /// TVG gain G3, reconstructed from its two-register split
    ///
    /// G3 is a 6-bit field whose upper 4 bits live in TVGAIN4 bits [3:0] and
    /// whose lower 2 bits live in TVGAIN5 bits [7:6].
    pub fn tvg_g3(&self) -> u8 {
        (self.tvgain4().tvg_g3_hi() << 2) | self.tvgain5().tvg_g3_lo()
    }

    /// Reserved bits and bytes that the datasheet expects to be zero
    pub fn reserved_bits(&self) -> ReservedBits {
        ReservedBits {
            tvgain6: self.tvgain6().reserved() != 0,
            curr_lim_p1: self.curr_lim_p1().reserved() != 0,
            p1_thr_15: self.p1_thr_15().value() != 0,
            p2_thr_15: self.p2_thr_15().value() != 0,
        }
    }
}

impl From<[u8; FRAME_LEN]> for ConfigFrame {
    fn from(bytes: [u8; FRAME_LEN]) -> Self {
        ConfigFrame(bytes)
    }
}

impl TryFrom<&[u8]> for ConfigFrame {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Error> {
        ConfigFrame::new(bytes)
    }
}

impl fmt::Debug for ConfigFrame {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ConfigFrame(0x")?;
        for byte in self.0.iter() {
            write!(f, "{:02x}", byte)?;
        }
        write!(f, ")")
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigFrame {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "ConfigFrame(0x");
        for byte in self.0.iter() {
            defmt::write!(f, "{:02x}", byte);
        }
        defmt::write!(f, ")");
    }
}

/// Observations of reserved bits that are non-zero
///
/// A set reserved bit is valid-but-unexpected hardware state. Callers decide
/// what to do with it; the decoder itself never treats it as a failure.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReservedBits {
    /// TVGAIN6 bit 1 is set
    pub tvgain6: bool,
    /// CURR_LIM_P1 bit 6 is set
    pub curr_lim_p1: bool,
    /// P1_THR_15 is non-zero (byte is nominally reserved)
    pub p1_thr_15: bool,
    /// P2_THR_15 is non-zero (byte is nominally reserved)
    pub p2_thr_15: bool,
}

impl ReservedBits {
    /// Returns `true` if any reserved bit or byte is non-zero
    pub fn any(&self) -> bool {
        self.tvgain6 || self.curr_lim_p1 || self.p1_thr_15 || self.p2_thr_15
    }
}

/// Implemented for all registers in the configuration block
///
/// The PGA460 datasheet numbers the EEPROM configuration registers 1..55;
/// `INDEX` follows that numbering.
pub trait Register {
    /// The 1-based register index within the block
    const INDEX: usize;
}

/// Generates register implementations
macro_rules! impl_register {
    (
        $(
            $index:expr,
            $name:ident($name_lower:ident) {
            #[$doc:meta]
            $(
                $field:ident,
                $first_bit:expr,
                $last_bit:expr;
                #[$field_doc:meta]
            )*
            }
        )*
    ) => {
        $(
            #[$doc]
            #[allow(non_camel_case_types)]
            pub struct $name;

            impl Register for $name {
                const INDEX: usize = $index;
            }

            #[$doc]
            pub mod $name_lower {
                use core::fmt;

                /// Read-only view of the register byte
                #[derive(Copy, Clone, Eq, PartialEq)]
                pub struct R(pub(crate) u8);

                impl R {
                    /// The raw register byte
                    #[inline(always)]
                    pub fn value(&self) -> u8 {
                        self.0
                    }

                    $(
                        #[$field_doc]
                        #[inline(always)]
                        pub fn $field(&self) -> u8 {
                            super::get_bits(
                                self.0,
                                $first_bit,
                                $last_bit - $first_bit + 1,
                            )
                        }
                    )*
                }

                impl fmt::Debug for R {
                    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                        write!(f, "0x{:02x}", self.0)
                    }
                }

                #[cfg(feature = "defmt")]
                impl defmt::Format for R {
                    fn format(&self, f: defmt::Formatter) {
                        defmt::write!(f, "0x{:02x}", self.0);
                    }
                }
            }
        )*

        impl ConfigFrame {
            $(
                #[$doc]
                pub fn $name_lower(&self) -> $name_lower::R {
                    $name_lower::R(self.0[$name::INDEX - 1])
                }
            )*
        }
    }
}

// All registers are implemented in this macro invocation. It follows the
// following syntax:
// <index>, <NAME(name)> { /// <doc>
//     <field>, <first-bit-index>, <last-bit-index>; /// <doc>
//     ...
// }
//
// Bit indices are within the single register byte, bit 0 being the LSB.
// The layout follows the PGA460 datasheet EEPROM map, REG1..REG55.

impl_register! {
    1, TVGAIN0(tvgain0) { /// TVG time nibbles T0/T1
        tvg_t0, 4, 7; /// Duration of TVG segment 1 (time-table nibble)
        tvg_t1, 0, 3; /// Duration of TVG segment 2 (time-table nibble)
    }
    2, TVGAIN1(tvgain1) { /// TVG time nibbles T2/T3
        tvg_t2, 4, 7; /// Duration of TVG segment 3 (time-table nibble)
        tvg_t3, 0, 3; /// Duration of TVG segment 4 (time-table nibble)
    }
    3, TVGAIN2(tvgain2) { /// TVG time nibbles T4/T5
        tvg_t4, 4, 7; /// Duration of TVG segment 5 (time-table nibble)
        tvg_t5, 0, 3; /// Duration of TVG segment 6 (time-table nibble)
    }
    4, TVGAIN3(tvgain3) { /// TVG gain G1 and the upper half of G2
        tvg_g1,    2, 7; /// TVG gain G1 (6 bits, byte-aligned)
        tvg_g2_hi, 0, 1; /// Upper 2 bits of TVG gain G2
    }
    5, TVGAIN4(tvgain4) { /// Lower half of TVG gain G2, upper half of G3
        tvg_g2_lo, 4, 7; /// Lower 4 bits of TVG gain G2
        tvg_g3_hi, 0, 3; /// Upper 4 bits of TVG gain G3
    }
    6, TVGAIN5(tvgain5) { /// Lower half of TVG gain G3 and gain G4
        tvg_g3_lo, 6, 7; /// Lower 2 bits of TVG gain G3
        tvg_g4,    0, 5; /// TVG gain G4 (6 bits, byte-aligned)
    }
    7, TVGAIN6(tvgain6) { /// TVG gain G5 and frequency shift flag
        tvg_g5,     2, 7; /// TVG gain G5 (6 bits)
        reserved,   1, 1; /// Reserved, expected 0
        freq_shift, 0, 0; /// Frequency shift enable
    }
    8, INIT_GAIN(init_gain) { /// Initial AFE gain
        bpf_bw,    6, 7; /// Bandpass filter bandwidth
        gain_init, 0, 5; /// Initial gain value
    }
    9, FREQUENCY(frequency) { /// Burst frequency
        freq, 0, 7; /// Burst frequency code
    }
    10, DEADTIME(deadtime) { /// Comparator deglitch and pulse dead time
        thr_cmp_degltch, 4, 7; /// Threshold comparator deglitch period
        pulse_dt,        0, 3; /// Burst pulse dead time
    }
    11, PULSE_P1(pulse_p1) { /// Interface options and P1 burst pulse count
        io_if_sel, 7, 7; /// IO interface select
        uart_diag, 6, 6; /// UART diagnostic page select
        io_dis,    5, 5; /// IO pin disable
        p1_pulse,  0, 4; /// Number of burst pulses on channel P1
    }
    12, PULSE_P2(pulse_p2) { /// UART address and P2 burst pulse count
        uart_addr, 4, 7; /// UART device address
        p2_pulse,  0, 3; /// Number of burst pulses on channel P2
    }
    13, CURR_LIM_P1(curr_lim_p1) { /// Driver current limit, channel P1
        dis_cl,    7, 7; /// Current limit disable
        reserved,  6, 6; /// Reserved, expected 0
        curr_lim1, 0, 5; /// Current limit value for P1
    }
    14, CURR_LIM_P2(curr_lim_p2) { /// Lowpass cutoff and driver current limit, channel P2
        lpf_co,    6, 7; /// Lowpass filter cutoff
        curr_lim2, 0, 5; /// Current limit value for P2
    }
    15, REC_LENGTH(rec_length) { /// Record lengths
        p1_rec, 4, 7; /// Record time length, channel P1
        p2_rec, 0, 3; /// Record time length, channel P2
    }
    16, FREQ_DIAG(freq_diag) { /// Frequency diagnostic window
        fdiag_len,   4, 7; /// Frequency diagnostic length
        fdiag_start, 0, 3; /// Frequency diagnostic start time
    }
    17, SAT_FDIAG_TH(sat_fdiag_th) { /// Saturation and frequency diagnostic thresholds
        fdiag_err_th, 5, 7; /// Frequency diagnostic error threshold
        sat_th,       1, 4; /// Saturation diagnostic threshold
        p1_nls_en,    0, 0; /// Non-linear scaling enable, channel P1
    }
    18, FVOLT_DEC(fvolt_dec) { /// Voltage thresholds and low-power timer
        p2_nls_en,    7, 7; /// Non-linear scaling enable, channel P2
        vpwr_ov_th,   5, 6; /// VPWR overvoltage threshold
        lmp_tmr,      3, 4; /// Low-power mode enter timer
        fvolt_err_th, 0, 2; /// Voltage diagnostic error threshold
    }
    19, DECPL_TEMP(decpl_temp) { /// AFE gain range and decouple time/temperature
        afe_gain_rng,   6, 7; /// AFE gain range
        lpm_en,         5, 5; /// Low-power mode enable
        decpl_temp_sel, 4, 4; /// Decouple select (time vs temperature)
        decpl_t,        0, 3; /// Decouple time or temperature value
    }
    20, DSP_SCALE(dsp_scale) { /// Noise level and non-linear scaling exponents
        noise_lvl, 3, 7; /// Noise level
        scale_k,   2, 2; /// Non-linear scaling exponent K
        scale_n,   0, 1; /// Non-linear scaling exponent N
    }
    21, TEMP_TRIM(temp_trim) { /// Temperature sensor trim
        temp_gain, 4, 7; /// Temperature sensor gain trim
        temp_off,  0, 3; /// Temperature sensor offset trim
    }
    22, P1_GAIN_CTRL(p1_gain_ctrl) { /// Digital gain, channel P1
        p1_dig_gain_lr_st, 6, 7; /// Long-range digital gain start time
        p1_dig_gain_lr,    3, 5; /// Long-range digital gain
        p1_dig_gain_sr,    0, 2; /// Short-range digital gain
    }
    23, P2_GAIN_CTRL(p2_gain_ctrl) { /// Digital gain, channel P2
        p2_dig_gain_lr_st, 6, 7; /// Long-range digital gain start time
        p2_dig_gain_lr,    3, 5; /// Long-range digital gain
        p2_dig_gain_sr,    0, 2; /// Short-range digital gain
    }
    24, P1_THR_0(p1_thr_0) { /// P1 threshold times T1/T2
        t1, 4, 7; /// Threshold stage 1 duration (time-table nibble)
        t2, 0, 3; /// Threshold stage 2 duration (time-table nibble)
    }
    25, P1_THR_1(p1_thr_1) { /// P1 threshold times T3/T4
        t3, 4, 7; /// Threshold stage 3 duration (time-table nibble)
        t4, 0, 3; /// Threshold stage 4 duration (time-table nibble)
    }
    26, P1_THR_2(p1_thr_2) { /// P1 threshold times T5/T6
        t5, 4, 7; /// Threshold stage 5 duration (time-table nibble)
        t6, 0, 3; /// Threshold stage 6 duration (time-table nibble)
    }
    27, P1_THR_3(p1_thr_3) { /// P1 threshold times T7/T8
        t7, 4, 7; /// Threshold stage 7 duration (time-table nibble)
        t8, 0, 3; /// Threshold stage 8 duration (time-table nibble)
    }
    28, P1_THR_4(p1_thr_4) { /// P1 threshold times T9/T10
        t9,  4, 7; /// Threshold stage 9 duration (time-table nibble)
        t10, 0, 3; /// Threshold stage 10 duration (time-table nibble)
    }
    29, P1_THR_5(p1_thr_5) { /// P1 threshold times T11/T12
        t11, 4, 7; /// Threshold stage 11 duration (time-table nibble)
        t12, 0, 3; /// Threshold stage 12 duration (time-table nibble)
    }
    30, P1_THR_6(p1_thr_6) { /// P1 threshold levels L1..L8, packed (byte 1 of 5)
    }
    31, P1_THR_7(p1_thr_7) { /// P1 threshold levels L1..L8, packed (byte 2 of 5)
    }
    32, P1_THR_8(p1_thr_8) { /// P1 threshold levels L1..L8, packed (byte 3 of 5)
    }
    33, P1_THR_9(p1_thr_9) { /// P1 threshold levels L1..L8, packed (byte 4 of 5)
    }
    34, P1_THR_10(p1_thr_10) { /// P1 threshold levels L1..L8, packed (byte 5 of 5)
    }
    35, P1_THR_11(p1_thr_11) { /// P1 threshold level L9
        l9, 0, 7; /// Threshold level L9 (8 bits)
    }
    36, P1_THR_12(p1_thr_12) { /// P1 threshold level L10
        l10, 0, 7; /// Threshold level L10 (8 bits)
    }
    37, P1_THR_13(p1_thr_13) { /// P1 threshold level L11
        l11, 0, 7; /// Threshold level L11 (8 bits)
    }
    38, P1_THR_14(p1_thr_14) { /// P1 threshold level L12
        l12, 0, 7; /// Threshold level L12 (8 bits)
    }
    39, P1_THR_15(p1_thr_15) { /// P1 threshold trailer, nominally reserved
    }
    40, P2_THR_0(p2_thr_0) { /// P2 threshold times T1/T2
        t1, 4, 7; /// Threshold stage 1 duration (time-table nibble)
        t2, 0, 3; /// Threshold stage 2 duration (time-table nibble)
    }
    41, P2_THR_1(p2_thr_1) { /// P2 threshold times T3/T4
        t3, 4, 7; /// Threshold stage 3 duration (time-table nibble)
        t4, 0, 3; /// Threshold stage 4 duration (time-table nibble)
    }
    42, P2_THR_2(p2_thr_2) { /// P2 threshold times T5/T6
        t5, 4, 7; /// Threshold stage 5 duration (time-table nibble)
        t6, 0, 3; /// Threshold stage 6 duration (time-table nibble)
    }
    43, P2_THR_3(p2_thr_3) { /// P2 threshold times T7/T8
        t7, 4, 7; /// Threshold stage 7 duration (time-table nibble)
        t8, 0, 3; /// Threshold stage 8 duration (time-table nibble)
    }
    44, P2_THR_4(p2_thr_4) { /// P2 threshold times T9/T10
        t9,  4, 7; /// Threshold stage 9 duration (time-table nibble)
        t10, 0, 3; /// Threshold stage 10 duration (time-table nibble)
    }
    45, P2_THR_5(p2_thr_5) { /// P2 threshold times T11/T12
        t11, 4, 7; /// Threshold stage 11 duration (time-table nibble)
        t12, 0, 3; /// Threshold stage 12 duration (time-table nibble)
    }
    46, P2_THR_6(p2_thr_6) { /// P2 threshold levels L1..L8, packed (byte 1 of 5)
    }
    47, P2_THR_7(p2_thr_7) { /// P2 threshold levels L1..L8, packed (byte 2 of 5)
    }
    48, P2_THR_8(p2_thr_8) { /// P2 threshold levels L1..L8, packed (byte 3 of 5)
    }
    49, P2_THR_9(p2_thr_9) { /// P2 threshold levels L1..L8, packed (byte 4 of 5)
    }
    50, P2_THR_10(p2_thr_10) { /// P2 threshold levels L1..L8, packed (byte 5 of 5)
    }
    51, P2_THR_11(p2_thr_11) { /// P2 threshold level L9
        l9, 0, 7; /// Threshold level L9 (8 bits)
    }
    52, P2_THR_12(p2_thr_12) { /// P2 threshold level L10
        l10, 0, 7; /// Threshold level L10 (8 bits)
    }
    53, P2_THR_13(p2_thr_13) { /// P2 threshold level L11
        l11, 0, 7; /// Threshold level L11 (8 bits)
    }
    54, P2_THR_14(p2_thr_14) { /// P2 threshold level L12
        l12, 0, 7; /// Threshold level L12 (8 bits)
    }
    55, P2_THR_15(p2_thr_15) { /// P2 threshold trailer, nominally reserved
    }
}
