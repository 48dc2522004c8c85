//! Arithmetic in GF(256).
//!
//! An element is represented by an u8 value. Its bits correspond to the
//! coefficients of a degree 7 polynomial with the least significant bit being
//! the coefficient for 1. For example:
//!
//! > 242 = 0b11110010 = x^7 + x^6 + x^5 + x^4 + x.
//!
//! Addition is done coefficient by coefficient. Multiplication is defined
//! modulo a fixed irreducible polynomial, and the choice differs between the
//! symbologies: Data Matrix uses 301 (0x12D), QR Code uses 285 (0x11D).
//! In both fields x is a generator, so every non-zero element is a power
//! x^i. Multiplication then reduces to adding exponents, which is done with
//! the two lookup tables LOG and ANTI_LOG.
use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Sub};

/// Compute the two lookup tables for the field with the given modulus.
const fn compute_alog_log(modulus: u16) -> ([u8; 255], [u8; 256]) {
    let mut alog = [0u8; 255];
    let mut log = [0u8; 256];
    let mut p: u16 = 1; // polynomial representation
    let mut i: u8 = 0; // power
    while i < 255 {
        alog[i as usize] = p as u8;
        log[p as usize] = i;

        p *= 2;
        if p >= 256 {
            p ^= modulus;
        }

        i += 1;
    }
    (alog, log)
}

static DATAMATRIX_TABLES: ([u8; 255], [u8; 256]) = compute_alog_log(0x12D);
static QR_TABLES: ([u8; 255], [u8; 256]) = compute_alog_log(0x11D);

/// Parameters of a Reed-Solomon field.
pub trait Field {
    /// Exponent of the first root of the generator polynomial.
    const GENERATOR_BASE: usize;

    fn tables() -> &'static ([u8; 255], [u8; 256]);
}

/// GF(256) with modulus 0x12D, generator roots starting at x^1.
#[derive(Debug, Clone, Copy)]
pub struct DataMatrixField;

impl Field for DataMatrixField {
    const GENERATOR_BASE: usize = 1;

    fn tables() -> &'static ([u8; 255], [u8; 256]) {
        &DATAMATRIX_TABLES
    }
}

/// GF(256) with modulus 0x11D, generator roots starting at x^0.
#[derive(Debug, Clone, Copy)]
pub struct QrField;

impl Field for QrField {
    const GENERATOR_BASE: usize = 0;

    fn tables() -> &'static ([u8; 255], [u8; 256]) {
        &QR_TABLES
    }
}

pub struct GF<F>(pub u8, PhantomData<F>);

impl<F: Field> GF<F> {
    pub const ZERO: Self = GF(0, PhantomData);
    pub const ONE: Self = GF(1, PhantomData);

    pub fn new(v: u8) -> Self {
        GF(v, PhantomData)
    }

    /// Compute x^i.
    pub fn primitive_power(i: usize) -> Self {
        Self::new(F::tables().0[i % 255])
    }

    pub fn log(self) -> usize {
        assert!(self.0 != 0, "log of 0");
        F::tables().1[self.0 as usize] as usize
    }

    pub fn inverse(self) -> Self {
        Self::ONE / self
    }
}

impl<F> Clone for GF<F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F> Copy for GF<F> {}

impl<F> PartialEq for GF<F> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<F> Eq for GF<F> {}

impl<F> Debug for GF<F> {
    fn fmt(&self, f: &mut Formatter) -> Result<(), std::fmt::Error> {
        f.write_fmt(format_args!("{}₂₅₆", self.0))
    }
}

impl<F: Field> Add<GF<F>> for GF<F> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.0 ^ rhs.0)
    }
}

impl<F: Field> AddAssign<GF<F>> for GF<F> {
    fn add_assign(&mut self, rhs: GF<F>) {
        *self = *self + rhs;
    }
}

impl<F: Field> Sub<GF<F>> for GF<F> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self + rhs
    }
}

impl<F: Field> Mul<GF<F>> for GF<F> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        if self.0 == 0 || rhs.0 == 0 {
            return Self::ZERO;
        }
        let (alog, log) = F::tables();
        let i = (log[self.0 as usize] as usize + log[rhs.0 as usize] as usize) % 255;
        Self::new(alog[i])
    }
}

impl<F: Field> MulAssign<GF<F>> for GF<F> {
    fn mul_assign(&mut self, rhs: GF<F>) {
        *self = *self * rhs;
    }
}

impl<F: Field> Div<GF<F>> for GF<F> {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        assert_ne!(rhs.0, 0, "division by zero");
        if self.0 == 0 {
            return Self::ZERO;
        }
        let (alog, log) = F::tables();
        let i = (255 + log[self.0 as usize] as usize - log[rhs.0 as usize] as usize) % 255;
        Self::new(alog[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    type Dm = GF<DataMatrixField>;
    type Qr = GF<QrField>;

    fn sanity_check<F: Field>() {
        let (alog, log) = F::tables();
        let anti_log: HashSet<u8> = alog.iter().cloned().collect();
        assert_eq!(anti_log.len(), alog.len());

        for i in 0..255 {
            assert_eq!(i, log[alog[i] as usize] as usize);
            assert_eq!(i + 1, alog[log[i + 1] as usize] as usize);
        }
    }

    #[test]
    fn sanity_check_tables() {
        sanity_check::<DataMatrixField>();
        sanity_check::<QrField>();
    }

    #[test]
    fn gf256_mul() {
        assert_eq!(Dm::new(123) * Dm::new(1), Dm::new(123));
        assert_eq!(Dm::new(234) * Dm::ZERO, Dm::ZERO);
        assert_eq!(Dm::ZERO * Dm::new(23), Dm::ZERO);
        assert_eq!(
            Dm::new(2) * Dm::new(4) * Dm::new(8) * Dm::new(16) * Dm::new(32),
            Dm::new(228)
        );
        // x^8 = x^4 + x^3 + x^2 + 1 for the QR modulus
        assert_eq!(Qr::new(128) * Qr::new(2), Qr::new(0x1D));
    }

    #[test]
    fn gf256_div_mul() {
        for a in 0..=255 {
            for b in 1..=255 {
                assert_eq!((Dm::new(a) / Dm::new(b)) * Dm::new(b), Dm::new(a));
                assert_eq!((Qr::new(a) / Qr::new(b)) * Qr::new(b), Qr::new(a));
            }
        }
    }

    #[test]
    fn power_wraps_around() {
        let mut a = Qr::ONE;
        for i in 0..500 {
            assert_eq!(Qr::primitive_power(i), a);
            a *= Qr::new(2);
        }
        assert_eq!(Dm::new(7).inverse() * Dm::new(7), Dm::ONE);
        assert_eq!(Dm::primitive_power(Dm::new(77).log()), Dm::new(77));
    }
}
