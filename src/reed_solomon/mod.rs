//! Reed-Solomon error correction codes.
//!
//! Both symbologies protect their data with Reed-Solomon codes over GF(256).
//! They only differ in the field modulus and the exponent of the first root
//! of the generator polynomial, see [Field].
//!
//! Assuming you have never heard of coding theory: By putting some redundancy
//! into the symbol one can recover from, say, detection or printing errors
//! when trying to read it. A clever way to add redundancy is the Reed-Solomon
//! code. Any book about coding theory should cover it, for example
//! "Error Correction Coding: Mathematical Methods and Algorithms" by Moon.
//!
//! The decoder is syndrome based and made of four steps:
//!
//! 1. Compute the syndrome values.
//! 2. Compute the error locator polynomial (Berlekamp-Massey).
//! 3. Compute the error locations (Chien search).
//! 4. Compute the error values (Forney).
//!
//! Polynomials are stored with the lowest coefficient first, codeword
//! buffers with the highest coefficient first.
mod galois;

use thiserror::Error;

pub use galois::{DataMatrixField, Field, QrField, GF};

#[cfg(test)]
use pretty_assertions::assert_eq;

/// The block has more errors than the code can correct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("too many errors in Reed-Solomon block")]
pub struct TooManyErrors;

/// Compute the generator polynomial (x - a^b)(x - a^(b+1))...(x - a^(b+len-1)),
/// highest coefficient first.
pub(crate) fn generator<F: Field>(len: usize) -> Vec<GF<F>> {
    let mut g = vec![GF::ONE];
    for i in 0..len {
        let root = GF::primitive_power(F::GENERATOR_BASE + i);
        g.push(GF::ZERO);
        for j in (1..g.len()).rev() {
            g[j] = g[j] + g[j - 1] * root;
        }
    }
    g
}

/// Compute the error correction codewords.
///
/// The first `buf.len() - ec_len` bytes are the data, the remaining
/// `ec_len` bytes are overwritten with the error code.
pub fn encode<F: Field>(buf: &mut [u8], ec_len: usize) {
    assert!(ec_len <= buf.len(), "error code longer than block");
    let data_len = buf.len() - ec_len;
    let g = generator::<F>(ec_len);
    let mut ecc = vec![GF::<F>::ZERO; ec_len + 1];
    ecc_block(buf[..data_len].iter().cloned(), &g, &mut ecc);
    for (out, e) in buf[data_len..].iter_mut().zip(&ecc[..ec_len]) {
        *out = e.0;
    }
}

fn ecc_block<F: Field, T: Iterator<Item = u8>>(data: T, g: &[GF<F>], ecc: &mut [GF<F>]) {
    // Let d be the data polynomial (n coefficients) and g the generator polynomial
    // with k + 1 coefficients. Euclidean division of d(x) * x^k by g gives a
    // remainder r(x), and d(x) * x^k - r(x) is divisible by g. The error code
    // is r, kept in ecc, which is also used to store intermediate results.
    let ecc_len = g.len() - 1;
    for a in data {
        let k = ecc[0] + GF::new(a);
        for j in 0..ecc_len {
            ecc[j] = ecc[j + 1] + k * g[j + 1];
        }
    }
}

/// Correct errors in place.
///
/// `buf` contains data followed by `ec_len` error correction codewords.
/// Returns the number of corrected codewords.
pub fn decode<F: Field>(buf: &mut [u8], ec_len: usize) -> Result<usize, TooManyErrors> {
    let n = buf.len();
    if ec_len == 0 || ec_len > n {
        return Ok(0);
    }

    let syndromes: Vec<GF<F>> = (0..ec_len)
        .map(|i| {
            let x = GF::primitive_power(F::GENERATOR_BASE + i);
            buf.iter().fold(GF::ZERO, |acc, b| acc * x + GF::new(*b))
        })
        .collect();
    if syndromes.iter().all(|s| *s == GF::ZERO) {
        return Ok(0);
    }

    let (locator, num_errors) = berlekamp_massey(&syndromes);
    if 2 * num_errors > ec_len {
        return Err(TooManyErrors);
    }

    // error evaluator: syndromes * locator mod x^ec_len
    let evaluator: Vec<GF<F>> = (0..ec_len)
        .map(|i| {
            (0..=i)
                .filter_map(|j| locator.get(j).map(|l| *l * syndromes[i - j]))
                .fold(GF::ZERO, |acc, v| acc + v)
        })
        .collect();

    // Chien search, an error at position p from the end has locator root x^-p
    let positions: Vec<usize> = (0..n)
        .filter(|p| eval(&locator, GF::primitive_power(255 - p % 255)) == GF::ZERO)
        .collect();
    if positions.len() != num_errors {
        return Err(TooManyErrors);
    }

    // Forney
    for p in positions.iter().cloned() {
        let x_inv = GF::primitive_power(255 - p % 255);
        let mut derivative = GF::ZERO;
        let mut x_pow = GF::ONE;
        for (i, c) in locator.iter().enumerate().skip(1) {
            if i % 2 == 1 {
                derivative += *c * x_pow;
            }
            x_pow *= x_inv;
        }
        if derivative == GF::ZERO {
            return Err(TooManyErrors);
        }
        let mut magnitude = eval(&evaluator, x_inv) / derivative;
        if F::GENERATOR_BASE == 0 {
            magnitude *= GF::primitive_power(p);
        }
        buf[n - 1 - p] ^= magnitude.0;
    }
    Ok(num_errors)
}

/// Compute the error locator polynomial, lowest coefficient first, and its degree.
fn berlekamp_massey<F: Field>(syndromes: &[GF<F>]) -> (Vec<GF<F>>, usize) {
    let mut c = vec![GF::ONE];
    let mut b = vec![GF::ONE];
    let mut l = 0;
    let mut m = 1;
    let mut last_discrepancy = GF::ONE;

    for k in 0..syndromes.len() {
        let mut d = syndromes[k];
        for i in 1..=l {
            if let Some(ci) = c.get(i) {
                d += *ci * syndromes[k - i];
            }
        }
        if d == GF::ZERO {
            m += 1;
            continue;
        }
        let coef = d / last_discrepancy;
        let previous = c.clone();
        if c.len() < b.len() + m {
            c.resize(b.len() + m, GF::ZERO);
        }
        for (i, bi) in b.iter().enumerate() {
            c[i + m] = c[i + m] - coef * *bi;
        }
        if 2 * l <= k {
            l = k + 1 - l;
            b = previous;
            last_discrepancy = d;
            m = 1;
        } else {
            m += 1;
        }
    }
    c.truncate(l + 1);
    (c, l)
}

/// Evaluate a polynomial stored lowest coefficient first.
fn eval<F: Field>(poly: &[GF<F>], x: GF<F>) -> GF<F> {
    poly.iter().rev().fold(GF::ZERO, |acc, c| acc * x + *c)
}

#[test]
fn generator_data_matrix_5() {
    let g: Vec<u8> = generator::<DataMatrixField>(5).iter().map(|v| v.0).collect();
    assert_eq!(g, vec![1, 62, 111, 15, 48, 228]);
}

#[test]
fn generator_data_matrix_7() {
    let g: Vec<u8> = generator::<DataMatrixField>(7).iter().map(|v| v.0).collect();
    assert_eq!(g, vec![1, 254, 92, 240, 134, 144, 68, 23]);
}

#[test]
fn ecc_block_1() {
    let mut buf = [23, 40, 11, 0, 0, 0, 0, 0];
    encode::<DataMatrixField>(&mut buf, 5);
    assert_eq!(buf[3..], [255, 207, 37, 244, 81]);
}

#[test]
fn qr_version_1_m() {
    // "01234567" in numeric mode, version 1-M, ISO 18004 annex I
    let mut buf = [0u8; 26];
    buf[..16].copy_from_slice(&[
        0x10, 0x20, 0x0C, 0x56, 0x61, 0x80, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11, 0xEC,
        0x11,
    ]);
    encode::<QrField>(&mut buf, 10);
    assert_eq!(
        buf[16..],
        [0xA5, 0x24, 0xD4, 0xC1, 0xED, 0x36, 0xC7, 0x87, 0x2C, 0x55]
    );
}

#[cfg(test)]
fn corrupt_and_correct<F: Field>(data_len: usize, ec_len: usize, errors: &[usize]) {
    let mut buf: Vec<u8> = (0..data_len + ec_len).map(|i| (i * 37 + 11) as u8).collect();
    encode::<F>(&mut buf, ec_len);
    let clean = buf.clone();
    for (k, pos) in errors.iter().enumerate() {
        buf[*pos] ^= (k as u8).wrapping_mul(29).wrapping_add(1);
    }
    assert_eq!(decode::<F>(&mut buf, ec_len), Ok(errors.len()));
    assert_eq!(buf, clean);
}

#[test]
fn corrects_up_to_half_ec() {
    corrupt_and_correct::<DataMatrixField>(3, 5, &[0, 4]);
    corrupt_and_correct::<DataMatrixField>(156, 62, &(0..31).map(|i| i * 7).collect::<Vec<_>>());
    corrupt_and_correct::<QrField>(16, 10, &[1, 7, 15, 20, 25]);
    corrupt_and_correct::<QrField>(19, 7, &[18, 19, 0]);
}

#[test]
fn clean_block_has_no_errors() {
    let mut buf = [0u8; 8];
    assert_eq!(decode::<DataMatrixField>(&mut buf, 5), Ok(0));
}

#[test]
fn too_many_errors_detected() {
    let mut buf = [255u8; 8];
    assert_eq!(decode::<DataMatrixField>(&mut buf, 5), Err(TooManyErrors));
}
