//! Byte-group framing.
//!
//! A packed flag group uses the low 7 bits of each byte for flags and the
//! high bit as a continuation marker: set on every byte but the last one of
//! the group. Groups are concatenated without separators, so the marker alone
//! tells where one group ends and the next begins.

use crate::vocab::FlagIndex;

/// High bit of a packed byte: another byte of the same group follows.
pub const CONTINUE_BIT: u8 = 1 << 7;

/// Number of flag bits carried per byte.
pub const BITS_PER_BYTE: u32 = 7;

/// Split a byte stream into groups.
///
/// A group closes at the first byte without [`CONTINUE_BIT`]. Trailing bytes
/// that never close still form a final group.
///
/// # Examples
/// ```
/// use sgs_runs::transcoder::group;
/// assert_eq!(group(&[0x81, 0x02, 0x05]), vec![vec![0x81, 0x02], vec![0x05]]);
/// ```
pub fn group(bytes: &[u8]) -> Vec<Vec<u8>> {
    let mut groups = Vec::new();
    let mut current = Vec::new();

    for &byte in bytes {
        current.push(byte);
        if byte & CONTINUE_BIT == 0 {
            groups.push(std::mem::take(&mut current));
        }
    }

    if !current.is_empty() {
        groups.push(current);
    }

    groups
}

/// Flag indices set in one group, ascending.
///
/// Bit `i` of the group's byte `g` is index `g * 7 + i`.
pub fn get_set_bits(group: &[u8]) -> Vec<FlagIndex> {
    let mut bits = Vec::new();

    for (g, &byte) in group.iter().enumerate() {
        for i in 0..BITS_PER_BYTE {
            if byte & (1 << i) != 0 {
                bits.push(g as FlagIndex * BITS_PER_BYTE + i);
            }
        }
    }

    bits
}
