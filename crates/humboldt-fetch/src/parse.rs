//! Binary record decoding for the two on-wire formats.
//!
//! Both formats are sequences of fixed-size big-endian records with no
//! padding or framing; an input whose length is not a whole number of
//! records is malformed.

use byteorder::{BigEndian, ByteOrder};
use thiserror::Error;

use humboldt_types::{RawBar, RawTick};

/// Errors that can occur while decoding a decompressed blob.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Tick data length is not a multiple of the record size.
    #[error("invalid tick data: {0} bytes is not a multiple of {1}")]
    InvalidTickFormat(usize, usize),

    /// Bar data length is not a multiple of the record size.
    #[error("invalid bar data: {0} bytes is not a multiple of {1}")]
    InvalidBarFormat(usize, usize),
}

/// Parses raw ticks from a decompressed hourly blob.
///
/// An empty blob yields an empty iterator. File order is preserved; the
/// remote writes ticks monotonically non-decreasing in time.
///
/// # Errors
///
/// Returns [`ParseError::InvalidTickFormat`] if trailing bytes do not
/// form a full record.
pub fn parse_ticks(data: &[u8]) -> Result<impl Iterator<Item = RawTick> + '_, ParseError> {
    if !data.len().is_multiple_of(RawTick::SIZE) {
        return Err(ParseError::InvalidTickFormat(data.len(), RawTick::SIZE));
    }

    Ok(data.chunks_exact(RawTick::SIZE).map(parse_single_tick))
}

#[inline]
fn parse_single_tick(data: &[u8]) -> RawTick {
    RawTick::new(
        BigEndian::read_u32(&data[0..4]),
        BigEndian::read_i32(&data[4..8]),
        BigEndian::read_i32(&data[8..12]),
        BigEndian::read_f32(&data[12..16]),
        BigEndian::read_f32(&data[16..20]),
    )
}

/// Parses raw bars from a decompressed candle blob.
///
/// An empty blob yields an empty iterator.
///
/// # Errors
///
/// Returns [`ParseError::InvalidBarFormat`] if trailing bytes do not
/// form a full record.
pub fn parse_bars(data: &[u8]) -> Result<impl Iterator<Item = RawBar> + '_, ParseError> {
    if !data.len().is_multiple_of(RawBar::SIZE) {
        return Err(ParseError::InvalidBarFormat(data.len(), RawBar::SIZE));
    }

    Ok(data.chunks_exact(RawBar::SIZE).map(parse_single_bar))
}

#[inline]
fn parse_single_bar(data: &[u8]) -> RawBar {
    RawBar::new(
        BigEndian::read_i32(&data[0..4]),
        BigEndian::read_i32(&data[4..8]),
        BigEndian::read_i32(&data[8..12]),
        BigEndian::read_i32(&data[12..16]),
        BigEndian::read_i32(&data[16..20]),
        BigEndian::read_f32(&data[20..24]),
    )
}

/// Returns the number of ticks in a blob of the given length.
#[must_use]
pub const fn tick_count(data_len: usize) -> usize {
    data_len / RawTick::SIZE
}

/// Returns the number of bars in a blob of the given length.
#[must_use]
pub const fn bar_count(data_len: usize) -> usize {
    data_len / RawBar::SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick_bytes(ms: u32, ask: i32, bid: i32, ask_vol: f32, bid_vol: f32) -> Vec<u8> {
        let mut bytes = vec![0u8; RawTick::SIZE];
        BigEndian::write_u32(&mut bytes[0..4], ms);
        BigEndian::write_i32(&mut bytes[4..8], ask);
        BigEndian::write_i32(&mut bytes[8..12], bid);
        BigEndian::write_f32(&mut bytes[12..16], ask_vol);
        BigEndian::write_f32(&mut bytes[16..20], bid_vol);
        bytes
    }

    fn bar_bytes(delta: i32, o: i32, h: i32, l: i32, c: i32, vol: f32) -> Vec<u8> {
        let mut bytes = vec![0u8; RawBar::SIZE];
        BigEndian::write_i32(&mut bytes[0..4], delta);
        BigEndian::write_i32(&mut bytes[4..8], o);
        BigEndian::write_i32(&mut bytes[8..12], h);
        BigEndian::write_i32(&mut bytes[12..16], l);
        BigEndian::write_i32(&mut bytes[16..20], c);
        BigEndian::write_f32(&mut bytes[20..24], vol);
        bytes
    }

    #[test]
    fn test_parse_single_tick_fields() {
        let bytes = tick_bytes(994, 114_545, 114_543, 1.0, 2.06);
        let tick = parse_single_tick(&bytes);

        assert_eq!(tick.time_delta_ms, 994);
        assert_eq!(tick.ask_raw, 114_545);
        assert_eq!(tick.bid_raw, 114_543);
        assert!((tick.ask_volume - 1.0).abs() < 1e-6);
        assert!((tick.bid_volume - 2.06).abs() < 1e-6);
    }

    #[test]
    fn test_parse_multiple_ticks_in_file_order() {
        let mut data = tick_bytes(0, 100, 99, 10.0, 20.0);
        data.extend(tick_bytes(1000, 101, 100, 15.0, 25.0));

        let ticks: Vec<_> = parse_ticks(&data).unwrap().collect();
        assert_eq!(ticks.len(), 2);
        assert_eq!(ticks[0].time_delta_ms, 0);
        assert_eq!(ticks[1].time_delta_ms, 1000);
    }

    #[test]
    fn test_parse_ticks_trailing_bytes() {
        let mut data = tick_bytes(0, 100, 99, 1.0, 1.0);
        data.push(0xff);
        assert!(matches!(
            parse_ticks(&data),
            Err(ParseError::InvalidTickFormat(21, 20))
        ));
    }

    #[test]
    fn test_parse_ticks_empty() {
        let ticks: Vec<_> = parse_ticks(&[]).unwrap().collect();
        assert!(ticks.is_empty());
    }

    #[test]
    fn test_parse_single_bar_fields() {
        let bytes = bar_bytes(60, 114_543, 114_570, 114_542, 114_569, 293.76);
        let bar = parse_single_bar(&bytes);

        assert_eq!(bar.time_delta_secs, 60);
        assert_eq!(bar.open_raw, 114_543);
        assert_eq!(bar.high_raw, 114_570);
        assert_eq!(bar.low_raw, 114_542);
        assert_eq!(bar.close_raw, 114_569);
        assert!((bar.volume - 293.76).abs() < 1e-3);
    }

    #[test]
    fn test_parse_bars_trailing_bytes() {
        let mut data = bar_bytes(0, 1, 2, 0, 1, 1.0);
        data.extend_from_slice(&[0, 0, 0]);
        assert!(matches!(
            parse_bars(&data),
            Err(ParseError::InvalidBarFormat(27, 24))
        ));
    }

    #[test]
    fn test_parse_bars_empty() {
        let bars: Vec<_> = parse_bars(&[]).unwrap().collect();
        assert!(bars.is_empty());
    }

    #[test]
    fn test_counts() {
        assert_eq!(tick_count(0), 0);
        assert_eq!(tick_count(200), 10);
        assert_eq!(bar_count(24), 1);
        assert_eq!(bar_count(240), 10);
    }
}
