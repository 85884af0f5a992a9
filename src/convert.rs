//! Code-to-voltage conversion.

use serde::{Deserialize, Serialize};

use crate::range::Range;
use crate::regs;

/// Conversion parameters for one device configuration.
///
/// Derived from the driver state at the point of use; single-precision
/// arithmetic throughout, matching the device family's dynamic range.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Converter {
    vref: f32,
    range: Range,
    width: u32,
}

impl Converter {
    pub fn new(vref: f32, range: Range, width: u32) -> Self {
        Self { vref, range, width }
    }

    /// Largest representable voltage of the active range.
    pub fn positive_full_scale(&self) -> f32 {
        self.range.multiplier() * self.vref
    }

    /// Smallest representable voltage: `-PFS` on bipolar ranges, zero on
    /// unipolar ones.
    pub fn negative_full_scale(&self) -> f32 {
        if self.range.is_bipolar() {
            -self.positive_full_scale()
        } else {
            0.0
        }
    }

    /// Full-scale span in volts.
    pub fn full_scale_range(&self) -> f32 {
        self.positive_full_scale() - self.negative_full_scale()
    }

    /// Voltage step of one code.
    pub fn lsb(&self) -> f32 {
        self.full_scale_range() / (1u64 << self.width) as f32
    }

    /// Convert a right-justified conversion code to volts.
    ///
    /// Codes beyond the device's code mask saturate at full scale rather
    /// than being rejected.
    pub fn code_to_volts(&self, code: u32) -> f32 {
        let code = code.min(regs::mask(self.width));
        self.negative_full_scale() + code as f32 * self.lsb()
    }
}
