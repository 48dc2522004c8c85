//! Look-ahead heuristic for choosing the next encodation mode.
//!
//! The costs of all modes are tracked in fractions of codewords while
//! walking the remaining input. Fractions are exact, all denominators
//! divide 12.
use std::fmt::{Debug, Error, Formatter};

use flagset::FlagSet;

use super::{c40, edifact, text, x12, EncodationType};

#[cfg(test)]
use pretty_assertions::assert_eq;

type C = u32;

const DENUM: C = 12;

/// Fraction with a fixed denominator.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Frac(C);

impl Debug for Frac {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        f.write_fmt(format_args!("{}", self.0 as f32 / DENUM as f32))
    }
}

impl Frac {
    #[inline]
    fn new(num: C, denum: C) -> Self {
        let mut me = Self(0);
        me.add_mut(num, denum);
        me
    }

    #[inline]
    fn add_mut(&mut self, num: C, denum: C) -> &mut Self {
        debug_assert!(denum > 0 && DENUM % denum == 0);
        self.0 += num * (DENUM / denum);
        self
    }

    #[inline]
    fn ceil(&mut self) -> &mut Self {
        let rest = self.0 % DENUM;
        if rest != 0 {
            self.0 += DENUM - rest;
        }
        self
    }
}

#[derive(Debug, Clone)]
struct Stat {
    ascii: Frac,
    c40: Frac,
    text: Frac,
    x12: Frac,
    edf: Frac,
    b256: Frac,
}

impl Stat {
    fn new(mode: EncodationType) -> Self {
        let mut me = if mode.is_ascii() {
            Self {
                ascii: Frac::new(0, 1),
                c40: Frac::new(1, 1),
                text: Frac::new(1, 1),
                x12: Frac::new(1, 1),
                edf: Frac::new(1, 1),
                b256: Frac::new(5, 4),
            }
        } else {
            Self {
                ascii: Frac::new(1, 1),
                c40: Frac::new(2, 1),
                text: Frac::new(2, 1),
                x12: Frac::new(2, 1),
                edf: Frac::new(2, 1),
                b256: Frac::new(9, 4),
            }
        };
        *me.get_mut(mode) = Frac::new(0, 1);
        me
    }

    fn get_mut(&mut self, mode: EncodationType) -> &mut Frac {
        match mode {
            EncodationType::Ascii => &mut self.ascii,
            EncodationType::C40 => &mut self.c40,
            EncodationType::Text => &mut self.text,
            EncodationType::X12 => &mut self.x12,
            EncodationType::Edifact => &mut self.edf,
            EncodationType::Base256 => &mut self.b256,
        }
    }

    fn get(&self, mode: EncodationType) -> Frac {
        match mode {
            EncodationType::Ascii => self.ascii,
            EncodationType::C40 => self.c40,
            EncodationType::Text => self.text,
            EncodationType::X12 => self.x12,
            EncodationType::Edifact => self.edf,
            EncodationType::Base256 => self.b256,
        }
    }

    fn count(&mut self, ch: u8) {
        if ch.is_ascii_digit() {
            self.ascii.add_mut(1, 2);
        } else if ch > 127 {
            self.ascii.ceil().add_mut(2, 1);
        } else {
            self.ascii.ceil().add_mut(1, 1);
        }

        // (1/3) * 2 per value, extended characters need an upper shift
        if c40::in_base_set(ch) {
            self.c40.add_mut(2, 3);
        } else if ch > 127 {
            self.c40.add_mut(8, 3);
        } else {
            self.c40.add_mut(4, 3);
        }

        if text::in_base_set(ch) {
            self.text.add_mut(2, 3);
        } else if ch > 127 {
            self.text.add_mut(8, 3);
        } else {
            self.text.add_mut(4, 3);
        }

        if x12::is_native(ch) {
            self.x12.add_mut(2, 3);
        } else if ch > 127 {
            self.x12.add_mut(13, 3);
        } else {
            self.x12.add_mut(10, 3);
        }

        if edifact::is_encodable(ch) {
            self.edf.add_mut(3, 4);
        } else if ch > 127 {
            self.edf.add_mut(17, 4);
        } else {
            self.edf.add_mut(13, 4);
        }

        self.b256.add_mut(1, 1);
    }

    fn round_up(&mut self) {
        for mode in EncodationType::all() {
            self.get_mut(mode).ceil();
        }
    }

    /// Is `mode` (plus `extra` codewords) strictly cheaper than all of `others`?
    fn strictly_below(
        &self,
        mode: EncodationType,
        extra: C,
        others: FlagSet<EncodationType>,
    ) -> bool {
        let cost = self.get(mode).0 + extra * DENUM;
        others.into_iter().all(|other| cost < self.get(other).0)
    }

    /// The modes sharing the minimal cost.
    fn minimal(&self) -> FlagSet<EncodationType> {
        let min = EncodationType::all()
            .into_iter()
            .map(|mode| self.get(mode))
            .min()
            .unwrap_or(Frac(0));
        EncodationType::all()
            .into_iter()
            .filter(|mode| self.get(*mode) == min)
            .fold(FlagSet::default(), |set, mode| set | mode)
    }
}

/// Does X12 win a tie with C40 on the following data?
fn x12_advantage(data: &[u8]) -> bool {
    for ch in data.iter() {
        if matches!(*ch, 13 | 42 | 62) {
            return true;
        }
        if !x12::is_native(*ch) {
            return false;
        }
    }
    false
}

fn look_ahead_intern(encodation: EncodationType, data: &[u8]) -> EncodationType {
    use EncodationType::*;

    if data.is_empty() {
        return encodation;
    }
    let mut stat = Stat::new(encodation);

    for (processed, ch) in data.iter().cloned().enumerate() {
        stat.count(ch);
        if processed + 1 < 4 {
            continue;
        }

        let mut stat = stat.clone();
        stat.round_up();
        if stat.strictly_below(Ascii, 0, Base256 | C40 | Text | X12 | Edifact) {
            return Ascii;
        }
        if stat.b256 < stat.ascii || stat.strictly_below(Base256, 1, C40 | Text | X12 | Edifact) {
            return Base256;
        }
        if stat.strictly_below(Edifact, 1, Base256 | C40 | Text | X12 | Ascii) {
            return Edifact;
        }
        if stat.strictly_below(Text, 1, Base256 | C40 | Edifact | X12 | Ascii) {
            return Text;
        }
        if stat.strictly_below(X12, 1, Base256 | C40 | Edifact | Text | Ascii) {
            return X12;
        }
        if stat.strictly_below(C40, 1, Ascii | Base256 | Edifact | Text) {
            if stat.c40 < stat.x12 {
                return C40;
            }
            if stat.c40 == stat.x12 {
                // the character after the next one decides
                let tail = data.get(processed + 2..).unwrap_or(&[]);
                return if x12_advantage(tail) { X12 } else { C40 };
            }
        }
    }

    stat.round_up();
    let minimal = stat.minimal();
    if minimal.contains(Ascii) {
        return Ascii;
    }
    if minimal.into_iter().count() == 1 {
        for mode in [Base256, Edifact, Text, X12] {
            if minimal.contains(mode) {
                return mode;
            }
        }
    }
    C40
}

/// Choose the mode for the remaining `data` if the encoder is in `encodation` now.
pub(super) fn look_ahead(encodation: EncodationType, data: &[u8]) -> EncodationType {
    let new_mode = look_ahead_intern(encodation, data);
    // X12 and EDIFACT can not continue with characters outside their set
    match (encodation, new_mode) {
        (EncodationType::X12, EncodationType::X12)
            if data.iter().take(3).any(|ch| !x12::is_native(*ch)) =>
        {
            EncodationType::Ascii
        }
        (EncodationType::Edifact, EncodationType::Edifact)
            if data.iter().take(4).any(|ch| !edifact::is_encodable(*ch)) =>
        {
            EncodationType::Ascii
        }
        _ => new_mode,
    }
}

#[test]
fn test_frac_init() {
    assert_eq!(Frac::new(0, 1).0, 0);
    assert_eq!(Frac::new(1, 2).0, 6);
    assert_eq!(Frac::new(1, 1).0, 12);
}

#[test]
fn test_frac_add_mut() {
    assert_eq!(Frac::new(1, 2).add_mut(3, 4).0, 15);
}

#[test]
fn test_frac_ceil() {
    assert_eq!(Frac::new(1, 2).ceil().0, 12);
    assert_eq!(Frac::new(12, 1).ceil().0, 12 * 12);
    assert_eq!(Frac::new(1, 1).ceil().0, 12);
    assert_eq!(Frac::new(0, 1).ceil().0, 0);
}

#[test]
fn test_edifact_switch() {
    assert_eq!(
        look_ahead(EncodationType::Edifact, b".\xFCXX.XXX.XXX.XXX.XXX.XXX.XXX"),
        EncodationType::Ascii,
    );
    assert_eq!(
        look_ahead(EncodationType::Ascii, b".A.C1.3.DATA.123DATA.123DATA"),
        EncodationType::Edifact,
    );
}

#[test]
fn test_c40_text_switch() {
    assert_eq!(
        look_ahead(EncodationType::C40, b"AIMaimaimaim"),
        EncodationType::Text,
    );
    assert_eq!(
        look_ahead(EncodationType::Ascii, b"aimaimaim"),
        EncodationType::Text,
    );
}

#[test]
fn test_digits_stay_ascii() {
    assert_eq!(
        look_ahead(EncodationType::Ascii, b"123456"),
        EncodationType::Ascii
    );
}

#[test]
fn test_empty_keeps_mode() {
    assert_eq!(look_ahead(EncodationType::X12, b""), EncodationType::X12);
}

#[test]
fn test_x12_wins_tie_with_separator() {
    assert_eq!(
        look_ahead(EncodationType::Ascii, b"ABC>ABC123>AB"),
        EncodationType::X12
    );
}
