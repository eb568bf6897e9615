//! Cyclic prefix insertion and removal (C5)
//!
//! Domain-agnostic: works over `&[T]` for whichever domain (complex IFFT
//! output, or the real stream after Nyquist modulation) the profile
//! applies it to - see `OfdmCodec`'s encode/decode ordering.

use crate::error::{OfdmError, Result};

/// Prepend the last `prefix_len` samples of `symbol` back onto its own
/// front.
pub fn prepend<T: Copy>(symbol: &[T], prefix_len: usize) -> Result<Vec<T>> {
    if prefix_len > symbol.len() {
        return Err(OfdmError::LengthMismatch {
            expected: symbol.len(),
            actual: prefix_len,
        });
    }
    let mut out = Vec::with_capacity(symbol.len() + prefix_len);
    out.extend_from_slice(&symbol[symbol.len() - prefix_len..]);
    out.extend_from_slice(symbol);
    Ok(out)
}

/// Drop the first `prefix_len` samples of a framed symbol.
pub fn strip<T: Copy>(framed: &[T], prefix_len: usize) -> Result<&[T]> {
    if prefix_len > framed.len() {
        return Err(OfdmError::LengthMismatch {
            expected: prefix_len,
            actual: framed.len(),
        });
    }
    Ok(&framed[prefix_len..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepend_copies_the_tail() {
        let symbol = [1, 2, 3, 4, 5];
        let framed = prepend(&symbol, 2).unwrap();
        assert_eq!(framed, vec![4, 5, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn strip_is_the_inverse_of_prepend() {
        let symbol = [1, 2, 3, 4, 5];
        let framed = prepend(&symbol, 2).unwrap();
        let recovered = strip(&framed, 2).unwrap();
        assert_eq!(recovered, &symbol);
    }

    #[test]
    fn prepend_rejects_prefix_longer_than_symbol() {
        let symbol = [1, 2, 3];
        assert!(prepend(&symbol, 4).is_err());
    }

    #[test]
    fn zero_length_prefix_is_a_no_op() {
        let symbol = [1, 2, 3];
        let framed = prepend(&symbol, 0).unwrap();
        assert_eq!(framed, vec![1, 2, 3]);
    }
}
