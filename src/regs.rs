//! Command frame codec.
//!
//! Every exchange on the wire is exactly four bytes, MSB first, and the
//! device pipelines by one conversion: each frame kicks off conversion `i+1`
//! while clocking out the result of conversion `i`. An all-zero frame is
//! therefore both "trigger the next conversion" and "read the previous one".

use arbitrary_int::u4;
use bitbybit::bitfield;

/// No-operation opcode, also the read path.
pub const NOP: u8 = 0x00;
/// Write a 16-bit register, `[opcode, address, hi, lo]`.
pub const WRITE_REG: u8 = 0xD0;

/// Input range / reference control register address.
pub const RANGE_SEL: u8 = 0x14;

/// `RANGE_SEL` register layout.
#[bitfield(u16, default = 0x0000)]
#[derive(Debug, PartialEq)]
pub struct RangeSel {
    /// 4-bit input range selector code.
    #[bits(0..=3, rw)]
    range: u4,
    /// Clearing this bit keeps the internal 4.096 V reference enabled.
    #[bit(6, rw)]
    intref_dis: bool,
}

/// The all-zero no-op/read frame.
pub const NOP_FRAME: [u8; 4] = [NOP; 4];

/// Assemble a register write frame. The reply clocked out during a write is
/// meaningless and is discarded by the caller.
pub fn write_reg_frame(addr: u8, value: u16) -> [u8; 4] {
    let value = value.to_be_bytes();
    [WRITE_REG, addr, value[0], value[1]]
}

/// Bit position of the conversion result within a packed 32-bit reply.
pub const fn shift(width: u32) -> u32 {
    32 - width
}

/// Mask of a right-justified conversion result.
pub const fn mask(width: u32) -> u32 {
    (1 << width) - 1
}

/// Right-justify and mask the conversion code carried in a raw reply word.
pub const fn decode(raw: u32, width: u32) -> u32 {
    (raw >> shift(width)) & mask(width)
}
