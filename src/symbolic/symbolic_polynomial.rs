//! # Polynomial Module
//!
//! Sparse multivariate polynomials with exact rational coefficients. This is the canonical
//! form behind simplification, expansion, factoring and equation solving: an expression is
//! brought to polynomial (or rational function) form, manipulated, and printed back.
//!
//! ## Generators
//! A polynomial is built over *generators*: plain variables and opaque atoms. An atom is any
//! subexpression that is not polynomial, such as `sin(x)`, `sqrt(2)` or `i`. Two atoms are
//! algebraic and are reduced on multiplication:
//! - `i^2 = -1`
//! - `sqrt(n)^2 = n` for a rational constant `n`
//!
//! ## Term order
//! Terms are printed by descending total degree, ties broken lexicographically over the
//! generator order (variables alphabetically, then atoms). The same graded order drives
//! multivariate exact division.

use crate::symbolic::symbolic_engine::Expr;
use num::bigint::BigInt;
use num::rational::BigRational;
use num::{Integer, One, Signed, Zero};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// A variable or an opaque atom a polynomial is built over.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Generator {
    Var(String),
    Atom(Expr),
}

impl Generator {
    pub fn to_expr(&self) -> Expr {
        match self {
            Generator::Var(name) => Expr::Var(name.clone()),
            Generator::Atom(expr) => expr.clone(),
        }
    }

    /// Rational value of the square of an algebraic atom.
    pub(crate) fn square_value(&self) -> Option<BigRational> {
        match self {
            Generator::Atom(Expr::ImagUnit) => Some(-BigRational::one()),
            Generator::Atom(Expr::Sqrt(arg)) => arg.as_rational().cloned(),
            _ => None,
        }
    }
}

/// Generator -> exponent. Exponents are always >= 1.
pub type Monomial = BTreeMap<Generator, u32>;

fn degree_of(mono: &Monomial) -> u32 {
    mono.values().sum()
}

/// Graded lexicographic comparison; `Ordering::Less` means `a` comes first (is "larger").
fn term_order(a: &Monomial, b: &Monomial) -> Ordering {
    degree_of(b).cmp(&degree_of(a)).then_with(|| {
        let generators: BTreeSet<&Generator> = a.keys().chain(b.keys()).collect();
        for g in generators {
            let ea = a.get(g).copied().unwrap_or(0);
            let eb = b.get(g).copied().unwrap_or(0);
            if ea != eb {
                return eb.cmp(&ea);
            }
        }
        Ordering::Equal
    })
}

fn monomial_mul(a: &Monomial, b: &Monomial) -> Monomial {
    let mut out = a.clone();
    for (g, e) in b {
        *out.entry(g.clone()).or_insert(0) += e;
    }
    out
}

fn monomial_div(a: &Monomial, b: &Monomial) -> Option<Monomial> {
    let mut out = a.clone();
    for (g, e) in b {
        let have = out.get(g).copied().unwrap_or(0);
        if have < *e {
            return None;
        }
        if have == *e {
            out.remove(g);
        } else {
            out.insert(g.clone(), have - e);
        }
    }
    Some(out)
}

/// Constant atoms (`sqrt(2)`, `I`) print before variables, other atoms after them.
fn print_rank(g: &Generator) -> u8 {
    match g {
        Generator::Atom(expr) if expr.extract_variables().is_empty() => 0,
        Generator::Var(_) => 1,
        Generator::Atom(_) => 2,
    }
}

fn monomial_expr(mono: &Monomial) -> Option<Expr> {
    let mut factors: Vec<(&Generator, &u32)> = mono.iter().collect();
    factors.sort_by_key(|(g, _)| print_rank(g));
    factors
        .into_iter()
        .map(|(g, e)| {
            if *e == 1 {
                g.to_expr()
            } else {
                Expr::Pow(Box::new(g.to_expr()), Box::new(Expr::integer(*e as i64)))
            }
        })
        .reduce(|acc, factor| Expr::Mul(acc.boxed(), factor.boxed()))
}

/// Applies `i^2 = -1` and `sqrt(n)^2 = n` to a single term.
fn reduce_term(mut mono: Monomial, mut coeff: BigRational) -> (Monomial, BigRational) {
    let reducible: Vec<(Generator, u32, BigRational)> = mono
        .iter()
        .filter(|(_, e)| **e >= 2)
        .filter_map(|(g, e)| g.square_value().map(|sq| (g.clone(), *e, sq)))
        .collect();
    for (g, e, square) in reducible {
        for _ in 0..e / 2 {
            coeff = coeff * square.clone();
        }
        if e % 2 == 0 {
            mono.remove(&g);
        } else {
            mono.insert(g, 1);
        }
    }
    (mono, coeff)
}

/// Sparse multivariate polynomial with rational coefficients. Zero coefficients are never stored.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Polynomial {
    terms: BTreeMap<Monomial, BigRational>,
}

impl Polynomial {
    pub fn zero() -> Self {
        Polynomial::default()
    }

    pub fn one() -> Self {
        Polynomial::constant(BigRational::one())
    }

    pub fn constant(c: BigRational) -> Self {
        let mut p = Polynomial::zero();
        p.add_term(Monomial::new(), c);
        p
    }

    pub fn generator(g: Generator) -> Self {
        let mut mono = Monomial::new();
        mono.insert(g, 1);
        let mut p = Polynomial::zero();
        p.add_term(mono, BigRational::one());
        p
    }

    pub fn variable(name: &str) -> Self {
        Polynomial::generator(Generator::Var(name.to_string()))
    }

    /// Polynomial in `var` from ascending coefficients (`coeffs[k]` multiplies `var^k`).
    pub fn from_univariate(var: &str, coeffs: &[BigRational]) -> Self {
        let mut p = Polynomial::zero();
        for (k, c) in coeffs.iter().enumerate() {
            let mut mono = Monomial::new();
            if k > 0 {
                mono.insert(Generator::Var(var.to_string()), k as u32);
            }
            p.add_term(mono, c.clone());
        }
        p
    }

    fn single(mono: Monomial, coeff: BigRational) -> Self {
        let mut p = Polynomial::zero();
        p.add_term(mono, coeff);
        p
    }

    fn add_term(&mut self, mono: Monomial, coeff: BigRational) {
        if coeff.is_zero() {
            return;
        }
        let (mono, coeff) = reduce_term(mono, coeff);
        let entry = self.terms.entry(mono).or_insert_with(BigRational::zero);
        *entry = entry.clone() + coeff;
        if entry.is_zero() {
            self.terms.retain(|_, c| !c.is_zero());
        }
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// The value of a polynomial without generators.
    pub fn as_constant(&self) -> Option<BigRational> {
        match self.terms.len() {
            0 => Some(BigRational::zero()),
            1 => self.terms.get(&Monomial::new()).cloned(),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn terms(&self) -> impl Iterator<Item = (&Monomial, &BigRational)> {
        self.terms.iter()
    }

    pub fn coefficients(&self) -> impl Iterator<Item = &BigRational> {
        self.terms.values()
    }

    pub fn coefficient_of(&self, mono: &Monomial) -> BigRational {
        self.terms.get(mono).cloned().unwrap_or_else(BigRational::zero)
    }

    pub fn add(&self, other: &Polynomial) -> Polynomial {
        let mut out = self.clone();
        for (mono, c) in &other.terms {
            out.add_term(mono.clone(), c.clone());
        }
        out
    }

    pub fn neg(&self) -> Polynomial {
        Polynomial {
            terms: self
                .terms
                .iter()
                .map(|(m, c)| (m.clone(), -c.clone()))
                .collect(),
        }
    }

    pub fn sub(&self, other: &Polynomial) -> Polynomial {
        self.add(&other.neg())
    }

    pub fn scale(&self, factor: &BigRational) -> Polynomial {
        if factor.is_zero() {
            return Polynomial::zero();
        }
        Polynomial {
            terms: self
                .terms
                .iter()
                .map(|(m, c)| (m.clone(), c * factor))
                .collect(),
        }
    }

    pub fn mul(&self, other: &Polynomial) -> Polynomial {
        let mut out = Polynomial::zero();
        for (ma, ca) in &self.terms {
            for (mb, cb) in &other.terms {
                out.add_term(monomial_mul(ma, mb), ca * cb);
            }
        }
        out
    }

    pub fn pow(&self, n: u32) -> Polynomial {
        let mut result = Polynomial::one();
        let mut base = self.clone();
        let mut n = n;
        while n > 0 {
            if n & 1 == 1 {
                result = result.mul(&base);
            }
            n >>= 1;
            if n > 0 {
                base = base.mul(&base);
            }
        }
        result
    }

    pub fn generators(&self) -> BTreeSet<Generator> {
        self.terms
            .keys()
            .flat_map(|m| m.keys().cloned())
            .collect()
    }

    /// Names of the plain variables, sorted.
    pub fn variables(&self) -> Vec<String> {
        self.generators()
            .into_iter()
            .filter_map(|g| match g {
                Generator::Var(name) => Some(name),
                Generator::Atom(_) => None,
            })
            .collect()
    }

    pub fn has_atoms(&self) -> bool {
        self.generators()
            .iter()
            .any(|g| matches!(g, Generator::Atom(_)))
    }

    pub fn degree_in(&self, g: &Generator) -> u32 {
        self.terms
            .keys()
            .map(|m| m.get(g).copied().unwrap_or(0))
            .max()
            .unwrap_or(0)
    }

    pub fn total_degree(&self) -> u32 {
        self.terms.keys().map(degree_of).max().unwrap_or(0)
    }

    /// Ascending coefficients when `var` is the only generator; `[]` for the zero polynomial.
    pub fn univariate_coeffs(&self, var: &str) -> Option<Vec<BigRational>> {
        let g = Generator::Var(var.to_string());
        if self.generators().iter().any(|other| *other != g) {
            return None;
        }
        let degree = self.degree_in(&g) as usize;
        let mut coeffs = vec![BigRational::zero(); if self.is_zero() { 0 } else { degree + 1 }];
        for (mono, c) in &self.terms {
            let k = mono.get(&g).copied().unwrap_or(0) as usize;
            coeffs[k] = c.clone();
        }
        Some(coeffs)
    }

    /// Terms in printing order.
    pub fn sorted_terms(&self) -> Vec<(&Monomial, &BigRational)> {
        let mut terms: Vec<(&Monomial, &BigRational)> = self.terms.iter().collect();
        terms.sort_by(|a, b| term_order(a.0, b.0));
        terms
    }

    pub fn leading_term(&self) -> Option<(Monomial, BigRational)> {
        self.sorted_terms()
            .first()
            .map(|(m, c)| ((*m).clone(), (*c).clone()))
    }

    pub fn leading_coefficient(&self) -> BigRational {
        self.leading_term()
            .map(|(_, c)| c)
            .unwrap_or_else(BigRational::zero)
    }

    /// Exact quotient `self / divisor`, or `None` when the division leaves a remainder.
    pub fn div_exact(&self, divisor: &Polynomial) -> Option<Polynomial> {
        let (lead_mono, lead_coeff) = divisor.leading_term()?;
        let mut rem = self.clone();
        let mut quotient = Polynomial::zero();
        let mut steps = 0;
        while let Some((mono, coeff)) = rem.leading_term() {
            steps += 1;
            if steps > 10_000 {
                return None;
            }
            let q_mono = monomial_div(&mono, &lead_mono)?;
            let term = Polynomial::single(q_mono, coeff / lead_coeff.clone());
            rem = rem.sub(&term.mul(divisor));
            // atom reductions can keep the leading term alive; such a divisor is not exact
            if !rem.coefficient_of(&mono).is_zero() {
                return None;
            }
            quotient = quotient.add(&term);
        }
        Some(quotient)
    }

    /// Largest monomial dividing every term.
    pub fn monomial_content(&self) -> Monomial {
        let mut iter = self.terms.keys();
        let Some(first) = iter.next() else {
            return Monomial::new();
        };
        let mut common = first.clone();
        for mono in iter {
            common = common
                .into_iter()
                .filter_map(|(g, e)| mono.get(&g).map(|other| (g, e.min(*other))))
                .collect();
        }
        common
    }

    pub fn div_monomial(&self, mono: &Monomial) -> Option<Polynomial> {
        let mut out = Polynomial::zero();
        for (m, c) in &self.terms {
            out.terms.insert(monomial_div(m, mono)?, c.clone());
        }
        Some(out)
    }

    pub fn monomial(mono: Monomial) -> Polynomial {
        Polynomial::single(mono, BigRational::one())
    }

    /// Rational `c` such that `self / c` has coprime integer coefficients and a positive
    /// leading coefficient. Zero for the zero polynomial.
    pub fn content(&self) -> BigRational {
        if self.is_zero() {
            return BigRational::zero();
        }
        let mut numer_gcd = BigInt::zero();
        let mut denom_lcm = BigInt::one();
        for c in self.terms.values() {
            numer_gcd = numer_gcd.gcd(c.numer());
            denom_lcm = denom_lcm.lcm(c.denom());
        }
        let content = BigRational::new(numer_gcd, denom_lcm);
        if self.leading_coefficient().is_negative() {
            -content
        } else {
            content
        }
    }

    pub fn primitive_part(&self) -> Polynomial {
        if self.is_zero() {
            return Polynomial::zero();
        }
        self.scale(&self.content().recip())
    }

    /// Canonical expression: terms in printing order, subtraction for negative coefficients.
    pub fn to_expr(&self) -> Expr {
        let mut acc: Option<Expr> = None;
        for (mono, coeff) in self.sorted_terms() {
            acc = Some(match acc {
                None => term_expr(mono, coeff),
                Some(prev) if coeff.is_negative() => {
                    Expr::Sub(prev.boxed(), term_expr(mono, &-coeff.clone()).boxed())
                }
                Some(prev) => Expr::Add(prev.boxed(), term_expr(mono, coeff).boxed()),
            });
        }
        acc.unwrap_or_else(|| Expr::integer(0))
    }
}

fn term_expr(mono: &Monomial, coeff: &BigRational) -> Expr {
    match monomial_expr(mono) {
        None => Expr::Const(coeff.clone()),
        Some(m) => Expr::scaled(coeff, m),
    }
}

/////////////////////////////////////////////////////////////////////////////////////////
//                 UNIVARIATE HELPERS (ascending coefficient vectors)
/////////////////////////////////////////////////////////////////////////////////////////

pub fn uni_trim(coeffs: &mut Vec<BigRational>) {
    while coeffs.last().is_some_and(|c| c.is_zero()) {
        coeffs.pop();
    }
}

/// Polynomial long division over the rationals. `divisor` must be non-zero.
pub fn uni_div_rem(
    dividend: &[BigRational],
    divisor: &[BigRational],
) -> (Vec<BigRational>, Vec<BigRational>) {
    let mut divisor = divisor.to_vec();
    uni_trim(&mut divisor);
    let mut rem = dividend.to_vec();
    uni_trim(&mut rem);
    let Some(lead) = divisor.last().cloned() else {
        return (Vec::new(), rem);
    };
    if rem.len() < divisor.len() {
        return (Vec::new(), rem);
    }
    let mut quotient = vec![BigRational::zero(); rem.len() - divisor.len() + 1];
    while rem.len() >= divisor.len() {
        let shift = rem.len() - divisor.len();
        let factor = rem[rem.len() - 1].clone() / lead.clone();
        for (i, d) in divisor.iter().enumerate() {
            let t = &factor * d;
            rem[shift + i] -= t;
        }
        quotient[shift] = factor;
        // the top coefficient cancels exactly
        rem.pop();
        uni_trim(&mut rem);
    }
    uni_trim(&mut quotient);
    (quotient, rem)
}

/// Monic greatest common divisor.
pub fn uni_gcd(a: &[BigRational], b: &[BigRational]) -> Vec<BigRational> {
    let mut a = a.to_vec();
    let mut b = b.to_vec();
    uni_trim(&mut a);
    uni_trim(&mut b);
    while !b.is_empty() {
        let (_, r) = uni_div_rem(&a, &b);
        a = b;
        b = r;
    }
    if let Some(lead) = a.last().cloned() {
        for c in a.iter_mut() {
            *c = c.clone() / lead.clone();
        }
    }
    a
}

/// Horner evaluation.
pub fn uni_eval(coeffs: &[BigRational], x: &BigRational) -> BigRational {
    coeffs
        .iter()
        .rev()
        .fold(BigRational::zero(), |acc, c| acc * x + c)
}
