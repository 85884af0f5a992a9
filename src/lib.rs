//! Burst-capture driver for the TI ADS8681 (16-bit) and ADS8691 (18-bit)
//! SAR ADCs.
//!
//! The device speaks fixed four-byte SPI frames and pipelines by one
//! conversion: every frame starts the next conversion while returning the
//! previous result, and the RVS pin signals when a result may be read. This
//! driver configures the input range against the internal 4.096 V reference
//! and then captures fixed-length bursts at the pace the RVS line allows,
//! spinning on the pin between exchanges to keep the ready-to-exchange
//! latency as low as the bus permits.
//!
//! The capture sequence is strictly phased: [`Ads868x::configure`] once,
//! [`Ads868x::capture_burst`] into a caller-owned [`SampleBuffer`], then
//! [`SampleBuffer::decode_in_place`] and [`Converter::code_to_volts`] on the
//! results. Waits on RVS have no timeout; an unresponsive device blocks the
//! caller. That is deliberate, transport errors from the bus or the pin are
//! the only failures surfaced here.

#![cfg_attr(not(test), no_std)]

pub mod capture;
pub mod convert;
pub mod range;
pub mod regs;

pub use capture::{Instant, MonotonicMicros, SampleBuffer};
pub use convert::Converter;
pub use range::Range;

use arbitrary_int::u4;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, Error as _, InputPin, OutputPin};
use embedded_hal::spi::{self, SpiDevice};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("SPI {0}")]
    Spi(spi::ErrorKind),
    #[error("ready pin")]
    Pin(digital::ErrorKind),
}

impl<E: spi::Error> From<E> for Error {
    fn from(value: E) -> Self {
        Error::Spi(value.kind())
    }
}

/// Electrical sense of the RVS conversion-ready line.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReadyPolarity {
    #[default]
    ActiveHigh,
    ActiveLow,
}

/// RST pulse width.
const RESET_PULSE_US: u32 = 10;
/// Settle time after releasing RST before the device accepts frames.
const RESET_SETTLE_US: u32 = 5000;

/// Pulse the active-low RST line and wait out the device's settle time.
///
/// Runs before the driver is constructed, on platforms that wire the line.
pub fn reset<P: OutputPin>(rst: &mut P, delay: &mut impl DelayNs) -> Result<(), Error> {
    rst.set_low().map_err(|e| Error::Pin(e.kind()))?;
    delay.delay_us(RESET_PULSE_US);
    rst.set_high().map_err(|e| Error::Pin(e.kind()))?;
    delay.delay_us(RESET_SETTLE_US);
    Ok(())
}

/// ADS868x/ADS869x driver over a chip-select-framed SPI device and the RVS
/// ready input. `WIDTH` is the converter resolution in bits.
#[derive(Debug)]
pub struct Ads868x<B, P, const WIDTH: u32> {
    spi: B,
    rdy: P,
    vref: f32,
    range: Range,
    polarity: ReadyPolarity,
}

/// 16-bit ADS8681.
pub type Ads8681<B, P> = Ads868x<B, P, 16>;
/// 18-bit ADS8691.
pub type Ads8691<B, P> = Ads868x<B, P, 18>;

impl<B: SpiDevice<u8>, P: InputPin, const WIDTH: u32> Ads868x<B, P, WIDTH> {
    /// Converter resolution in bits.
    pub const WIDTH: u32 = WIDTH;
    /// Bit position of the code field in a raw reply word.
    pub const SHIFT: u32 = 32 - WIDTH;
    /// Mask of a right-justified conversion code.
    pub const MASK: u32 = (1 << WIDTH) - 1;

    /// Construct a driver.
    ///
    /// `vref` is the reference voltage in volts (4.096 with the internal
    /// reference). The range takes effect on [`configure`](Self::configure).
    pub fn new(spi: B, rdy: P, vref: f32, range: Range) -> Self {
        Self {
            spi,
            rdy,
            vref,
            range,
            polarity: ReadyPolarity::default(),
        }
    }

    pub fn with_ready_polarity(mut self, polarity: ReadyPolarity) -> Self {
        self.polarity = polarity;
        self
    }

    /// Select a new input range. Takes effect on the next
    /// [`configure`](Self::configure); must not be called while a captured
    /// burst is still awaiting conversion to volts.
    pub fn set_range(&mut self, range: Range) {
        self.range = range;
    }

    pub fn range(&self) -> Range {
        self.range
    }

    /// Conversion parameters for the active configuration.
    pub fn converter(&self) -> Converter {
        Converter::new(self.vref, self.range, WIDTH)
    }

    /// Convert a decoded conversion code to volts under the active range.
    pub fn code_to_volts(&self, code: u32) -> f32 {
        self.converter().code_to_volts(code)
    }

    /// One chip-select-framed full-duplex frame, reply packed MSB first.
    fn exchange(&mut self, frame: [u8; 4]) -> Result<u32, Error> {
        let mut buf = frame;
        self.spi.transfer_in_place(&mut buf)?;
        Ok(u32::from_be_bytes(buf))
    }

    /// No-op frame: starts the next conversion, returns the previous result.
    fn nop(&mut self) -> Result<u32, Error> {
        self.exchange(regs::NOP_FRAME)
    }

    fn write_reg(&mut self, addr: u8, value: u16) -> Result<(), Error> {
        self.exchange(regs::write_reg_frame(addr, value)).map(drop)
    }

    /// Spin on RVS until it reports a valid result. No timeout: latency
    /// between assertion and the next exchange dominates throughput, so the
    /// loop stays as tight as the pin read allows.
    fn wait_ready(&mut self) -> Result<(), Error> {
        let active_high = self.polarity == ReadyPolarity::ActiveHigh;
        loop {
            let level = self.rdy.is_high().map_err(|e| Error::Pin(e.kind()))?;
            if level == active_high {
                return Ok(());
            }
        }
    }

    /// One-time device initialization: select the range with the internal
    /// reference enabled and flush the pipeline.
    ///
    /// The device pipelines by one conversion, so the first result readable
    /// after the register write reflects pre-configuration state. The second
    /// no-op discards it while starting the first valid conversion. Exactly
    /// three frames cross the bus. Re-running is harmless but wasteful.
    pub fn configure(&mut self) -> Result<(), Error> {
        let cfg = regs::RangeSel::builder()
            .with_range(u4::new(self.range.code()))
            .with_intref_dis(false)
            .build();
        self.write_reg(regs::RANGE_SEL, cfg.raw_value())?;
        self.nop()?;
        self.wait_ready()?;
        self.nop()?;
        log::debug!("configured {:?}, vref {} V", self.range, self.vref);
        Ok(())
    }

    /// Capture `n` back-to-back samples into `buf`, paced by RVS.
    ///
    /// One no-op first ensures a conversion is in flight, then the loop runs
    /// exactly `n` times: wait for RVS, exchange one no-op, store the raw
    /// frame (the exchange simultaneously starts the next conversion).
    /// Returns the elapsed microseconds bracketing only the `n` capture
    /// exchanges. Samples land in issue order; `n` is capped at the buffer
    /// capacity. Precondition: [`configure`](Self::configure) has run.
    pub fn capture_burst<const N: usize>(
        &mut self,
        clock: &mut impl MonotonicMicros,
        buf: &mut SampleBuffer<N>,
        n: usize,
    ) -> Result<u32, Error> {
        let n = n.min(buf.capacity());
        buf.clear();
        self.nop()?;
        self.wait_ready()?;
        let start = clock.now();
        for _ in 0..n {
            self.wait_ready()?;
            let raw = self.nop()?;
            buf.record(raw);
        }
        let elapsed = (clock.now() - start).ticks();
        log::debug!("burst: {} samples in {} us", n, elapsed);
        Ok(elapsed)
    }

    /// Normalize a captured burst: right-justify and mask every raw frame.
    pub fn decode<const N: usize>(&self, buf: &mut SampleBuffer<N>) {
        buf.decode_in_place(WIDTH);
    }
}
