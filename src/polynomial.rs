// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Reads complex polynomials such as `z^3 - z + (-0.7+0.27015i)` and
//! turns them into something the escape-time engine can iterate.
//!
//! A polynomial is a sum of terms, each shaped like
//! `[sign][coefficient][z][^exponent]`.  The coefficient is either a
//! plain real number (optionally followed by `i`, making it
//! imaginary), or a parenthesized complex number `(a+bi)`.  A
//! coefficient may be omitted in front of `z`, in which case it is
//! one.  Terms with the same exponent are added together.
//!
//! Parsing produces a dense coefficient array, which is evaluated
//! with Horner's rule, and a canonical string used to show the user
//! what was actually understood.

use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use log::debug;
use num::{Complex, One, Zero};

use crate::error::{JuliaError, Result};

/// The highest exponent accepted in an expression.
pub const MAX_EXPONENT: usize = 256;

// Below this, a coefficient part is left out of the canonical string.
const DISPLAY_TOLERANCE: f64 = 1e-10;

/// A polynomial in one complex variable, stored densely: the
/// coefficient of `z^n` lives at index `n`.  The highest stored
/// coefficient is never exactly zero.
#[derive(Clone, Debug, PartialEq)]
pub struct Polynomial {
    coefficients: Vec<Complex<f64>>,
}

impl Polynomial {
    /// Builds a polynomial from coefficients indexed by exponent.
    /// Leading zero coefficients are dropped; if nothing but zeros
    /// remain, there is no polynomial.
    pub fn new(mut coefficients: Vec<Complex<f64>>) -> Result<Polynomial> {
        while coefficients.last().map_or(false, |c| c.is_zero()) {
            coefficients.pop();
        }
        if coefficients.is_empty() {
            return Err(JuliaError::InvalidExpression(
                "the polynomial has no non-zero coefficient".to_string(),
            ));
        }
        Ok(Polynomial { coefficients })
    }

    /// The highest exponent with a non-zero coefficient.
    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    /// Coefficients, indexed by exponent.
    pub fn coefficients(&self) -> &[Complex<f64>] {
        &self.coefficients
    }

    /// Evaluates the polynomial at `z` using Horner's rule.
    #[inline]
    pub fn eval(&self, z: Complex<f64>) -> Complex<f64> {
        self.coefficients
            .iter()
            .rev()
            .fold(Complex::zero(), |acc, c| acc * z + *c)
    }

    /// The polynomial as an iteration function for the escape-time
    /// engine.
    pub fn evaluator(&self) -> impl Fn(Complex<f64>) -> Complex<f64> + Sync + '_ {
        move |z| self.eval(z)
    }
}

impl FromStr for Polynomial {
    type Err = JuliaError;

    fn from_str(text: &str) -> Result<Polynomial> {
        let mut tokenizer = Tokenizer::new(text);
        let mut coefficients: Vec<Complex<f64>> = vec![];
        while let Some(term) = tokenizer.next_term()? {
            if coefficients.len() <= term.exponent {
                coefficients.resize(term.exponent + 1, Complex::zero());
            }
            let sum = coefficients[term.exponent] + term.coefficient;
            if !(sum.re.is_finite() && sum.im.is_finite()) {
                return Err(JuliaError::coefficient(
                    text,
                    &format!("the terms in z^{} add up to a non-finite number", term.exponent),
                ));
            }
            coefficients[term.exponent] = sum;
        }
        if coefficients.is_empty() {
            return Err(JuliaError::InvalidExpression(format!(
                "no polynomial term found in '{}'",
                text
            )));
        }
        Polynomial::new(coefficients)
    }
}

/// The canonical string.  Parts smaller than the display tolerance are
/// left out, so a polynomial made only of such parts prints as `0`,
/// which does not parse back.
impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let terms = self
            .coefficients
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, c)| !negligible(c.re) || !negligible(c.im))
            .map(|(exponent, c)| format_term(*c, exponent))
            .join(" + ");
        if terms.is_empty() {
            return write!(f, "0");
        }
        write!(f, "{}", terms.replace("+ -", "- "))
    }
}

/// Parses `text` into a polynomial, and returns it with its canonical
/// string.
pub fn parse_polynomial(text: &str) -> Result<(Polynomial, String)> {
    let polynomial: Polynomial = text.parse()?;
    let canonical = polynomial.to_string();
    debug!(
        "parsed '{}' as '{}' (degree {})",
        text,
        canonical,
        polynomial.degree()
    );
    Ok((polynomial, canonical))
}

fn negligible(x: f64) -> bool {
    x.abs() < DISPLAY_TOLERANCE
}

fn format_term(c: Complex<f64>, exponent: usize) -> String {
    let variable = match exponent {
        0 => String::new(),
        1 => "z".to_string(),
        n => format!("z^{}", n),
    };
    let unit = exponent > 0;
    let coefficient = if negligible(c.im) {
        match c.re {
            re if unit && negligible(re - 1.0) => String::new(),
            re if unit && negligible(re + 1.0) => "-".to_string(),
            re => format!("{}", re),
        }
    } else if negligible(c.re) {
        match c.im {
            im if unit && negligible(im - 1.0) => "i".to_string(),
            im if unit && negligible(im + 1.0) => "-i".to_string(),
            im => format!("{}i", im),
        }
    } else if c.im < 0.0 {
        format!("({}-{}i)", c.re, -c.im)
    } else {
        format!("({}+{}i)", c.re, c.im)
    };
    format!("{}{}", coefficient, variable)
}

/// Reads a single complex coefficient: a real number such as `-2.5`,
/// an imaginary one such as `3i`, or a parenthesized complex number
/// such as `(-0.7+0.27015i)`, optionally preceded by a sign that
/// applies to both parts.
pub fn parse_coefficient(text: &str) -> Result<Complex<f64>> {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let (negative, rest) = match cleaned.as_bytes().first() {
        Some(b'-') => (true, &cleaned[1..]),
        Some(b'+') => (false, &cleaned[1..]),
        _ => (false, &cleaned[..]),
    };
    let rest = match (rest.starts_with('('), rest.ends_with(')')) {
        (true, true) if rest.len() >= 2 => &rest[1..rest.len() - 1],
        (false, false) => rest,
        _ => return Err(JuliaError::coefficient(text, "unbalanced parenthesis")),
    };
    if rest.is_empty() {
        return Err(JuliaError::coefficient(text, "no number found"));
    }

    let value = match rest.strip_suffix('i') {
        Some(body) if !body.contains('i') => match split_point(body) {
            Some(at) => Complex::new(
                real_part(&body[..at], text)?,
                imaginary_part(&body[at..], text)?,
            ),
            None => Complex::new(0.0, imaginary_part(body, text)?),
        },
        Some(_) => return Err(JuliaError::coefficient(text, "repeated imaginary marker")),
        None if rest.contains('i') => {
            return Err(JuliaError::coefficient(
                text,
                "the imaginary marker must end the coefficient",
            ))
        }
        None => Complex::new(real_part(rest, text)?, 0.0),
    };
    Ok(if negative { -value } else { value })
}

// The last sign that separates the real part from the imaginary one.
// A sign in first position belongs to the real part, and a sign after
// an exponent marker belongs to the number it is in.
fn split_point(body: &str) -> Option<usize> {
    let bytes = body.as_bytes();
    (1..bytes.len())
        .rev()
        .find(|&at| matches!(bytes[at], b'+' | b'-') && !matches!(bytes[at - 1], b'e' | b'E'))
}

fn real_part(number: &str, text: &str) -> Result<f64> {
    match number.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        Ok(_) => Err(JuliaError::coefficient(text, "the number is not finite")),
        Err(_) => Err(JuliaError::coefficient(
            text,
            &format!("'{}' is not a number", number),
        )),
    }
}

// An imaginary part with no digits, as in `i` or `(3-i)`, has a
// magnitude of one.
fn imaginary_part(number: &str, text: &str) -> Result<f64> {
    match number {
        "" | "+" => Ok(1.0),
        "-" => Ok(-1.0),
        _ => real_part(number, text),
    }
}

struct Term {
    coefficient: Complex<f64>,
    exponent: usize,
}

/// A hand-written scanner over the expression.  It only ever steps
/// over ASCII bytes, so every position it holds is a char boundary.
struct Tokenizer<'a> {
    text: &'a str,
    pos: usize,
    terms: usize,
}

impl<'a> Tokenizer<'a> {
    fn new(text: &'a str) -> Self {
        Tokenizer {
            text,
            pos: 0,
            terms: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).cloned()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().map_or(false, |b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn at_variable(&self) -> bool {
        matches!(self.peek(), Some(b'z') | Some(b'Z'))
    }

    fn unexpected(&self) -> JuliaError {
        match self.text[self.pos..].chars().next() {
            Some(c) => JuliaError::InvalidExpression(format!(
                "unexpected '{}' at position {}",
                c, self.pos
            )),
            None => JuliaError::InvalidExpression("unexpected end of expression".to_string()),
        }
    }

    /// Consumes any run of signs and whitespace.  Returns whether a
    /// sign was seen, and whether the run is negative overall.  Runs
    /// of signs with nothing after them are connectives, never terms.
    fn signs(&mut self) -> (bool, bool) {
        let (mut signed, mut negative) = (false, false);
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(b'+') => signed = true,
                Some(b'-') => {
                    signed = true;
                    negative = !negative;
                }
                _ => break,
            }
            self.pos += 1;
        }
        (signed, negative)
    }

    fn coefficient(&mut self) -> Result<&'a str> {
        let text = self.text;
        let start = self.pos;
        match self.peek() {
            Some(b'(') => match text[start..].find(')') {
                Some(offset) => {
                    self.pos = start + offset + 1;
                    Ok(&text[start..self.pos])
                }
                None => Err(JuliaError::coefficient(
                    &text[start..],
                    "unbalanced parenthesis",
                )),
            },
            _ => {
                while let Some(b) = self.peek() {
                    match b {
                        b'0'..=b'9' | b'.' => self.pos += 1,
                        b'e' | b'E' if self.pos > start => {
                            self.pos += 1;
                            if let Some(b'+') | Some(b'-') = self.peek() {
                                self.pos += 1;
                            }
                        }
                        _ => break,
                    }
                }
                if self.peek() == Some(b'i') {
                    self.pos += 1;
                }
                Ok(&text[start..self.pos])
            }
        }
    }

    fn exponent(&mut self) -> Result<usize> {
        self.skip_whitespace();
        if self.peek() != Some(b'^') {
            return Ok(1);
        }
        self.pos += 1;
        self.skip_whitespace();
        let start = self.pos;
        while self.peek().map_or(false, |b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        let digits = &self.text[start..self.pos];
        if digits.is_empty() {
            return Err(JuliaError::coefficient(
                &self.text[start - 1..],
                "expected a non-negative integer exponent",
            ));
        }
        match digits.parse::<usize>() {
            Ok(exponent) if exponent <= MAX_EXPONENT => Ok(exponent),
            _ => Err(JuliaError::coefficient(
                digits,
                &format!("exponents above {} are not supported", MAX_EXPONENT),
            )),
        }
    }

    fn next_term(&mut self) -> Result<Option<Term>> {
        let (signed, negative) = self.signs();
        match self.peek() {
            None => return Ok(None),
            Some(b')') => {
                return Err(JuliaError::coefficient(
                    &self.text[self.pos..],
                    "unbalanced parenthesis",
                ))
            }
            _ => {}
        }
        if self.terms > 0 && !signed {
            return Err(self.unexpected());
        }

        let coefficient = self.coefficient()?;
        self.skip_whitespace();
        if !coefficient.is_empty() && self.peek() == Some(b'*') {
            self.pos += 1;
            self.skip_whitespace();
            if !self.at_variable() {
                return Err(self.unexpected());
            }
        }

        let exponent = if self.at_variable() {
            self.pos += 1;
            self.exponent()?
        } else if coefficient.is_empty() {
            return Err(self.unexpected());
        } else {
            0
        };

        let magnitude = if coefficient.is_empty() {
            Complex::one()
        } else {
            parse_coefficient(coefficient)?
        };
        self.terms += 1;
        Ok(Some(Term {
            coefficient: if negative { -magnitude } else { magnitude },
            exponent,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn canonical(text: &str) -> String {
        parse_polynomial(text).unwrap().1
    }

    fn close(a: Complex<f64>, b: Complex<f64>) -> bool {
        (a - b).norm() < 1e-9
    }

    #[test]
    fn julia_constant_evaluates_at_origin() {
        let (poly, display) = parse_polynomial("z^2+(-0.7+0.27015i)").unwrap();
        assert_eq!(poly.eval(Complex::zero()), Complex::new(-0.7, 0.27015));
        assert_eq!(display, "z^2 + (-0.7+0.27015i)");
        assert_eq!(poly.degree(), 2);
    }

    #[test]
    fn canonical_string_reparses_to_the_same_function() {
        let inputs = [
            "z^2+(-0.7+0.27015i)",
            "3z^3 - z + 2",
            "-z^2 + 0.5iz - (1-2i)",
            "z^5 + (1e-3+2E+1i)z^2 - 0.25",
            "iz^3 - i",
        ];
        let points = [
            Complex::new(0.0, 0.0),
            Complex::new(0.3, -0.4),
            Complex::new(-1.1, 0.9),
        ];
        for input in inputs.iter() {
            let (first, display) = parse_polynomial(input).unwrap();
            let (second, again) = parse_polynomial(&display).unwrap();
            assert_eq!(display, again);
            for z in points.iter() {
                assert!(close(first.eval(*z), second.eval(*z)), "{} vs {}", input, display);
            }
        }
    }

    #[test]
    fn canonical_string_formats_signs_and_units() {
        assert_eq!(canonical("3z^3 - z + 2"), "3z^3 - z + 2");
        assert_eq!(canonical("-z^2 + z - 1"), "-z^2 + z - 1");
        assert_eq!(canonical("2 - z^2"), "-z^2 + 2");
        assert_eq!(canonical("0.5iz + (1-2i)"), "0.5iz + (1-2i)");
        assert_eq!(canonical("-iz^2"), "-iz^2");
        assert_eq!(canonical("1"), "1");
        assert_eq!(canonical("2*z"), "2z");
    }

    #[test]
    fn negligible_terms_are_hidden_but_kept() {
        let (poly, display) = parse_polynomial("z^2 + 1e-12").unwrap();
        assert_eq!(display, "z^2");
        assert_eq!(poly.coefficients()[0], Complex::new(1e-12, 0.0));

        assert_eq!(canonical("(2+1e-12i)z"), "2z");
        assert_eq!(canonical("1e-12z"), "0");
    }

    #[test]
    fn duplicate_exponents_add_up() {
        assert_eq!(canonical("z^2 + z^2 + z + 1 + 1"), "2z^2 + z + 2");
        let (poly, _) = parse_polynomial("z + (0+1i)z").unwrap();
        assert_eq!(poly.coefficients()[1], Complex::new(1.0, 1.0));
    }

    #[test]
    fn lone_signs_are_connectives() {
        assert_eq!(canonical("z^2 + - z"), "z^2 - z");
        assert_eq!(canonical("z + + z"), "2z");
        assert_eq!(canonical("z^2 - - 1"), "z^2 + 1");
        assert_eq!(canonical("z^2 + 1 +"), "z^2 + 1");
    }

    #[test]
    fn exponents_default_sensibly() {
        let (poly, _) = parse_polynomial("z").unwrap();
        assert_eq!(
            poly.coefficients().to_vec(),
            vec![Complex::new(0.0, 0.0), Complex::new(1.0, 0.0)]
        );
        let (poly, _) = parse_polynomial("4").unwrap();
        assert_eq!(poly.coefficients().to_vec(), vec![Complex::new(4.0, 0.0)]);
        let (poly, _) = parse_polynomial("Z ^ 3").unwrap();
        assert_eq!(poly.degree(), 3);
    }

    #[test]
    fn empty_input_is_an_invalid_expression() {
        for text in ["", "   ", "+", " - "].iter() {
            match parse_polynomial(text) {
                Err(JuliaError::InvalidExpression(_)) => {}
                other => panic!("{:?} parsed as {:?}", text, other),
            }
        }
    }

    #[test]
    fn garbage_is_an_invalid_expression() {
        for text in ["z^2 z", "x^2", "z^2 + ? ", "2^3", "z - z"].iter() {
            match parse_polynomial(text) {
                Err(JuliaError::InvalidExpression(_)) => {}
                other => panic!("{:?} parsed as {:?}", text, other),
            }
        }
    }

    #[test]
    fn bad_numbers_are_coefficient_errors() {
        for text in [
            "z^2 + (1+2i",
            "z^2 + 1+2i)",
            "z^2 + 1e+",
            "z^2 + 1.2.3",
            "z^",
            "z^-1",
            "z^999",
            "(inf)z",
        ]
        .iter()
        {
            match parse_polynomial(text) {
                Err(JuliaError::CoefficientParse { .. }) => {}
                other => panic!("{:?} parsed as {:?}", text, other),
            }
        }
    }

    #[test]
    fn overflowing_sums_are_coefficient_errors() {
        for text in ["1e308 + 1e308", "1e308z - z + (1e308+0i)z", "(0+1e308i) + 1e308i"].iter() {
            match parse_polynomial(text) {
                Err(JuliaError::CoefficientParse { .. }) => {}
                other => panic!("{:?} parsed as {:?}", text, other),
            }
        }
        assert_eq!(canonical("1e308 - 1e308 + z"), "z");
    }

    #[test]
    fn coefficients_split_at_the_right_sign() {
        assert_eq!(parse_coefficient("(1e-3+2E+1i)").unwrap(), Complex::new(0.001, 20.0));
        assert_eq!(parse_coefficient("(1e-5i)").unwrap(), Complex::new(0.0, 1e-5));
        assert_eq!(parse_coefficient("-(1-2i)").unwrap(), Complex::new(-1.0, 2.0));
        assert_eq!(parse_coefficient("( -0.7 + 0.27015i )").unwrap(), Complex::new(-0.7, 0.27015));
        assert_eq!(parse_coefficient("2.5").unwrap(), Complex::new(2.5, 0.0));
        assert_eq!(parse_coefficient("-3i").unwrap(), Complex::new(0.0, -3.0));
    }

    #[test]
    fn imaginary_marker_without_digits_is_unit() {
        assert_eq!(parse_coefficient("i").unwrap(), Complex::new(0.0, 1.0));
        assert_eq!(parse_coefficient("(3-i)").unwrap(), Complex::new(3.0, -1.0));
        assert_eq!(parse_coefficient("(-i)").unwrap(), Complex::new(0.0, -1.0));
    }

    #[test]
    fn horner_agrees_with_summing_powers() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let degree = rng.gen_range(1, 8);
            let coefficients: Vec<Complex<f64>> = (0..=degree)
                .map(|_| Complex::new(rng.gen_range(-2.0, 2.0), rng.gen_range(-2.0, 2.0)))
                .collect();
            let poly = Polynomial::new(coefficients.clone()).unwrap();
            let z = Complex::new(rng.gen_range(-1.5, 1.5), rng.gen_range(-1.5, 1.5));
            let naive = coefficients
                .iter()
                .enumerate()
                .fold(Complex::zero(), |acc, (n, c)| acc + *c * z.powu(n as u32));
            assert!(close(poly.eval(z), naive));
        }
    }

    #[test]
    fn evaluator_matches_eval() {
        let (poly, _) = parse_polynomial("z^3 - 2z + i").unwrap();
        let f = poly.evaluator();
        let z = Complex::new(0.25, -0.75);
        assert_eq!(f(z), poly.eval(z));
    }
}
