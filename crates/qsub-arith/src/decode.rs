//! Histogram decoding.

use serde::Serialize;

use qsub_sim::Counts;

use crate::error::{ArithError, ArithResult};

/// A decoded measurement histogram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedResult {
    /// The signed value of the winning bitstring.
    pub value: i64,
    /// The winning bitstring, most significant bit first.
    pub bitstring: String,
    /// How often the winning bitstring was observed.
    pub count: u64,
    /// The full histogram.
    pub counts: Counts,
}

/// Interpret a bitstring (most significant bit first) as a two's-complement
/// integer of its own length.
///
/// ```rust
/// use qsub_arith::decode_bitstring;
///
/// assert_eq!(decode_bitstring("0101")?, 5);
/// assert_eq!(decode_bitstring("1101")?, -3);
/// assert_eq!(decode_bitstring("1")?, -1);
/// # Ok::<(), qsub_arith::ArithError>(())
/// ```
pub fn decode_bitstring(bits: &str) -> ArithResult<i64> {
    let len = bits.len();
    if len == 0 || len > i64::BITS as usize {
        return Err(invalid(bits, format!("length must be 1..={}", i64::BITS)));
    }
    let mut raw = 0_u64;
    for ch in bits.chars() {
        let bit = match ch {
            '0' => 0,
            '1' => 1,
            other => return Err(invalid(bits, format!("unexpected character '{other}'"))),
        };
        raw = (raw << 1) | bit;
    }
    // Sign-extend from the top bit of the string.
    let shift = i64::BITS - len as u32;
    Ok(((raw << shift) as i64) >> shift)
}

/// Decode the most frequent bitstring of a histogram measured at `width` bits.
///
/// Ties are broken toward the lexicographically smallest bitstring. Every key
/// must be a `width`-character `0`/`1` string.
pub fn decode_counts(counts: &Counts, width: u32) -> ArithResult<DecodedResult> {
    for (bits, _) in counts.iter() {
        if bits.len() != width as usize {
            return Err(invalid(
                bits,
                format!("expected {width} bits, got {}", bits.len()),
            ));
        }
    }
    let (bitstring, count) = counts.most_frequent().ok_or(ArithError::EmptyHistogram)?;
    let value = decode_bitstring(bitstring)?;
    Ok(DecodedResult {
        value,
        bitstring: bitstring.to_string(),
        count,
        counts: counts.clone(),
    })
}

fn invalid(bits: &str, reason: String) -> ArithError {
    ArithError::InvalidBitstring {
        bitstring: bits.to_string(),
        reason,
    }
}
