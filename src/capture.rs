//! Burst sample storage and post-processing.

use heapless::Vec;

use crate::convert::Converter;
use crate::regs;

/// Microsecond-resolution monotonic instant.
pub type Instant = fugit::TimerInstantU32<1_000_000>;

/// Monotonic microsecond clock used to bracket a burst.
///
/// Implemented for any `FnMut() -> Instant`, so a platform can hand the
/// driver a closure over its monotonic timer.
pub trait MonotonicMicros {
    fn now(&mut self) -> Instant;
}

impl<F: FnMut() -> Instant> MonotonicMicros for F {
    fn now(&mut self) -> Instant {
        self()
    }
}

/// Preallocated burst storage.
///
/// Capacity is fixed at compile time and the backing store is never
/// reallocated; a burst leaves the length at exactly the number of samples
/// captured. The capture loop is the only writer, afterwards the buffer is
/// plain read-only data.
#[derive(Debug, Default, serde::Serialize)]
pub struct SampleBuffer<const N: usize> {
    samples: Vec<u32, N>,
}

impl<const N: usize> SampleBuffer<N> {
    pub const fn new() -> Self {
        Self {
            samples: Vec::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        N
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples in issue order: raw frames after a capture, right-justified
    /// codes once `decode_in_place` has run.
    pub fn as_slice(&self) -> &[u32] {
        &self.samples
    }

    pub(crate) fn clear(&mut self) {
        self.samples.clear();
    }

    pub(crate) fn record(&mut self, raw: u32) {
        // The burst length is capped to the capacity before the loop starts.
        self.samples.push(raw).ok();
    }

    /// Right-justify and mask every raw frame in place.
    ///
    /// Runs exactly once per burst; the raw frames are consumed by the
    /// shift, so a second application would operate on already-normalized
    /// codes and is not meaningful.
    pub fn decode_in_place(&mut self, width: u32) {
        for sample in self.samples.iter_mut() {
            *sample = regs::decode(*sample, width);
        }
    }

    /// Decoded codes as voltages, in issue order.
    pub fn volts<'a>(&'a self, converter: &'a Converter) -> impl Iterator<Item = f32> + 'a {
        self.samples.iter().map(|&code| converter.code_to_volts(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::Range;

    #[test]
    fn decode_normalizes_raw_frames() {
        let mut buf: SampleBuffer<8> = SampleBuffer::new();
        for code in [0u32, 1, 0x2A5A5, 0x3FFFF] {
            buf.record(code << 14);
        }
        buf.decode_in_place(18);
        assert_eq!(buf.as_slice(), &[0, 1, 0x2A5A5, 0x3FFFF]);
        assert!(buf.as_slice().iter().all(|&c| c <= 0x3FFFF));
    }

    #[test]
    fn frames_sharing_a_code_field_decode_identically() {
        // Bits below the code field differ, the code does not.
        let mut buf: SampleBuffer<2> = SampleBuffer::new();
        buf.record((0x12345 << 14) | 0x0000);
        buf.record((0x12345 << 14) | 0x3FFF);
        buf.decode_in_place(18);
        assert_eq!(buf.as_slice()[0], buf.as_slice()[1]);
    }

    #[test]
    fn record_is_bounded_by_capacity() {
        let mut buf: SampleBuffer<2> = SampleBuffer::new();
        for raw in 0..5 {
            buf.record(raw);
        }
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.as_slice(), &[0, 1]);
    }

    #[test]
    fn volts_iterates_in_issue_order() {
        let c = Converter::new(4.096, Range::Bipolar2500, 18);
        let mut buf: SampleBuffer<4> = SampleBuffer::new();
        buf.record(0);
        buf.record(131072);
        let v: std::vec::Vec<f32> = buf.volts(&c).collect();
        assert_eq!(v.len(), 2);
        assert_eq!(v[0], -10.24);
        assert!(v[1].abs() <= c.lsb());
    }

    #[test]
    fn closure_clock() {
        let mut t = 0u32;
        let mut clock = move || {
            t += 7;
            Instant::from_ticks(t)
        };
        let start = MonotonicMicros::now(&mut clock);
        let end = MonotonicMicros::now(&mut clock);
        assert_eq!((end - start).ticks(), 7);
    }
}
