//! # Factorization
//!
//! Factoring over the rationals:
//! - numeric content and common monomials are pulled out first,
//! - univariate polynomials are split into square-free parts (Yun's algorithm), and
//!   rational roots of every part become linear factors,
//! - parts of degree four and higher without rational roots are split by Kronecker's
//!   method (trial interpolation through divisors of the values at small integers), so
//!   `x^4 - 4` becomes `(x^2 - 2)(x^2 + 2)`,
//! - homogeneous polynomials in two variables are factored through their dehomogenization
//!   (`x^2 - y^2` via `x^2 - 1`).

use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_polynomial::{
    Generator, Monomial, Polynomial, uni_div_rem, uni_eval, uni_gcd, uni_trim,
};
use crate::symbolic::symbolic_rational::{RationalFunction, SymbolicError};
use num::bigint::BigInt;
use num::rational::BigRational;
use num::{Integer, One, Signed, ToPrimitive, Zero};

/// Candidate root pairs above this count are not searched.
const MAX_ROOT_CANDIDATES: usize = 20_000;
/// Integers above this are not split into divisors.
const MAX_DIVISIBLE: u64 = 1_000_000_000_000;
/// Kronecker trial factors are tried up to this degree.
const MAX_TRIAL_DEGREE: usize = 6;
/// Interpolation candidates per trial degree above this count are not searched.
const MAX_TRIAL_COMBINATIONS: usize = 10_000;

pub fn uni_derivative(coeffs: &[BigRational]) -> Vec<BigRational> {
    coeffs
        .iter()
        .enumerate()
        .skip(1)
        .map(|(k, c)| c * BigRational::from_integer(BigInt::from(k)))
        .collect()
}

fn is_constant(coeffs: &[BigRational]) -> bool {
    coeffs.len() <= 1
}

/// Square-free decomposition: `f = lc * prod(a_i^i)` with monic, pairwise coprime `a_i`.
pub fn square_free(coeffs: &[BigRational]) -> Vec<(Vec<BigRational>, u32)> {
    let mut f = coeffs.to_vec();
    uni_trim(&mut f);
    if is_constant(&f) {
        return Vec::new();
    }
    let mut out = Vec::new();
    let derivative = uni_derivative(&f);
    let a0 = uni_gcd(&f, &derivative);
    let mut b = uni_div_rem(&f, &a0).0;
    let c = uni_div_rem(&derivative, &a0).0;
    let mut d = sub(&c, &uni_derivative(&b));
    let mut i = 1;
    while !is_constant(&b) {
        let a = uni_gcd(&b, &d);
        b = uni_div_rem(&b, &a).0;
        let c = uni_div_rem(&d, &a).0;
        d = sub(&c, &uni_derivative(&b));
        if !is_constant(&a) {
            out.push((a, i));
        }
        i += 1;
    }
    out.into_iter().map(|(a, i)| (monic(&a), i)).collect()
}

fn sub(a: &[BigRational], b: &[BigRational]) -> Vec<BigRational> {
    let n = a.len().max(b.len());
    let zero = BigRational::zero();
    let mut out: Vec<BigRational> = (0..n)
        .map(|k| a.get(k).unwrap_or(&zero) - b.get(k).unwrap_or(&zero))
        .collect();
    uni_trim(&mut out);
    out
}

fn monic(coeffs: &[BigRational]) -> Vec<BigRational> {
    match coeffs.last() {
        Some(lead) if !lead.is_zero() => coeffs.iter().map(|c| c / lead).collect(),
        _ => coeffs.to_vec(),
    }
}

/// Positive divisors of `n`, or `None` when `n` is too large to split.
fn divisors(n: &BigInt) -> Option<Vec<BigInt>> {
    let n = n.abs().to_u64()?;
    if n == 0 || n > MAX_DIVISIBLE {
        return None;
    }
    let mut small = Vec::new();
    let mut large = Vec::new();
    let mut d: u64 = 1;
    while d * d <= n {
        if n % d == 0 {
            small.push(BigInt::from(d));
            if d * d != n {
                large.push(BigInt::from(n / d));
            }
        }
        d += 1;
    }
    small.extend(large.into_iter().rev());
    Some(small)
}

/// Distinct rational roots of a polynomial with non-zero constant term, ascending.
pub fn rational_roots(coeffs: &[BigRational]) -> Vec<BigRational> {
    let mut f = coeffs.to_vec();
    uni_trim(&mut f);
    if is_constant(&f) {
        return Vec::new();
    }
    let mut roots = Vec::new();
    if f[0].is_zero() {
        roots.push(BigRational::zero());
        while f.first().is_some_and(|c| c.is_zero()) {
            f.remove(0);
        }
        if is_constant(&f) {
            return roots;
        }
    }
    let denom_lcm = f
        .iter()
        .fold(BigInt::one(), |acc, c| acc.lcm(c.denom()));
    let integer: Vec<BigInt> = f
        .iter()
        .map(|c| (c * BigRational::from_integer(denom_lcm.clone())).to_integer())
        .collect();
    let (Some(ps), Some(qs)) = (
        divisors(&integer[0]),
        divisors(&integer[integer.len() - 1]),
    ) else {
        return roots;
    };
    if ps.len() * qs.len() > MAX_ROOT_CANDIDATES {
        return roots;
    }
    let mut candidates: Vec<BigRational> = Vec::new();
    for p in &ps {
        for q in &qs {
            let r = BigRational::new(p.clone(), q.clone());
            for candidate in [r.clone(), -r] {
                if !candidates.contains(&candidate) {
                    candidates.push(candidate);
                }
            }
        }
    }
    roots.extend(candidates.into_iter().filter(|r| uni_eval(&f, r).is_zero()));
    roots.sort();
    roots
}

/// Integer evaluation points 0, 1, -1, 2, -2, ...
fn trial_points(count: usize) -> Vec<BigRational> {
    (0..count)
        .map(|k| {
            let step = BigInt::from(k.div_ceil(2));
            let point = if k % 2 == 1 { step } else { -step };
            BigRational::from_integer(point)
        })
        .collect()
}

/// Newton interpolation through `(xs[i], ys[i])`, coefficients lowest degree first.
fn interpolate(xs: &[BigRational], ys: &[BigRational]) -> Vec<BigRational> {
    let n = xs.len();
    let mut differences = ys.to_vec();
    for j in 1..n {
        for i in (j..n).rev() {
            differences[i] =
                (&differences[i] - &differences[i - 1]) / (&xs[i] - &xs[i - j]);
        }
    }
    let mut coeffs = vec![differences[n - 1].clone()];
    for i in (0..n - 1).rev() {
        // coeffs * (x - xs[i]) + differences[i]
        let mut next = vec![BigRational::zero(); coeffs.len() + 1];
        for (k, c) in coeffs.iter().enumerate() {
            next[k + 1] += c;
            next[k] -= c * &xs[i];
        }
        next[0] += &differences[i];
        coeffs = next;
    }
    uni_trim(&mut coeffs);
    coeffs
}

/// Kronecker's method: a factor `g` of degree `d` of an integer polynomial `f` takes at
/// `d + 1` integer points values dividing those of `f`, so every choice of divisors
/// interpolates a candidate `g`. Returns a monic proper factor and its monic cofactor.
fn kronecker_split(coeffs: &[BigRational]) -> Option<(Vec<BigRational>, Vec<BigRational>)> {
    let degree = coeffs.len().checked_sub(1)?;
    if degree < 4 {
        return None;
    }
    let denom_lcm = coeffs.iter().fold(BigInt::one(), |acc, c| acc.lcm(c.denom()));
    let scale = BigRational::from_integer(denom_lcm);
    let integer: Vec<BigRational> = coeffs.iter().map(|c| c * &scale).collect();

    let max_degree = (degree / 2).min(MAX_TRIAL_DEGREE);
    let points = trial_points(max_degree + 1);
    let values: Vec<BigInt> = points
        .iter()
        .map(|x| uni_eval(&integer, x).to_integer())
        .collect();

    for trial_degree in 2..=max_degree {
        let mut choices: Vec<Vec<BigInt>> = Vec::with_capacity(trial_degree + 1);
        for (k, value) in values.iter().take(trial_degree + 1).enumerate() {
            if value.is_zero() {
                choices.push(vec![BigInt::zero()]);
                continue;
            }
            let positive = divisors(value)?;
            // a factor is fixed up to sign, so the first value is taken positive
            if k == 0 {
                choices.push(positive);
            } else {
                choices.push(positive.iter().flat_map(|d| [d.clone(), -d]).collect());
            }
        }
        let combinations = choices
            .iter()
            .try_fold(1usize, |acc, set| acc.checked_mul(set.len()));
        if combinations.is_none_or(|count| count > MAX_TRIAL_COMBINATIONS) {
            continue;
        }

        let mut index = vec![0usize; choices.len()];
        loop {
            let ys: Vec<BigRational> = index
                .iter()
                .zip(&choices)
                .map(|(i, set)| BigRational::from_integer(set[*i].clone()))
                .collect();
            let candidate = interpolate(&points[..trial_degree + 1], &ys);
            if candidate.len() == trial_degree + 1 && candidate.iter().all(|c| c.is_integer()) {
                let (quotient, remainder) = uni_div_rem(coeffs, &candidate);
                if remainder.is_empty() {
                    return Some((monic(&candidate), monic(&quotient)));
                }
            }
            // next combination, odometer style
            let mut position = 0;
            loop {
                if position == index.len() {
                    break;
                }
                index[position] += 1;
                if index[position] < choices[position].len() {
                    break;
                }
                index[position] = 0;
                position += 1;
            }
            if position == index.len() {
                break;
            }
        }
    }
    None
}

/// Splits a square-free part without rational roots into factors of degree two and higher.
fn split_without_roots(part: Vec<BigRational>) -> Vec<Vec<BigRational>> {
    let mut pending = vec![part];
    let mut done = Vec::new();
    while let Some(f) = pending.pop() {
        match kronecker_split(&f) {
            Some((g, h)) => {
                pending.push(g);
                pending.push(h);
            }
            None => done.push(f),
        }
    }
    done
}

/// Monic irreducible-over-the-rationals (as far as detected) factors with multiplicities.
/// Linear factors come first, then the remaining parts by degree.
pub fn factor_univariate(coeffs: &[BigRational]) -> Vec<(Vec<BigRational>, u32)> {
    let mut linear = Vec::new();
    let mut rest = Vec::new();
    for (part, multiplicity) in square_free(coeffs) {
        let mut remaining = part;
        for root in rational_roots(&remaining) {
            let factor = vec![-root, BigRational::one()];
            remaining = uni_div_rem(&remaining, &factor).0;
            linear.push((factor, multiplicity));
        }
        if !is_constant(&remaining) {
            for factor in split_without_roots(remaining) {
                rest.push((factor, multiplicity));
            }
        }
    }
    rest.sort_by_key(|(f, _)| f.len());
    linear.extend(rest);
    linear
}

/// Factors of a polynomial in integer primitive form: `unit * monomial * prod(f_i^m_i)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Factorization {
    pub unit: BigRational,
    pub monomial: Monomial,
    pub factors: Vec<(Polynomial, u32)>,
}

impl Factorization {
    pub fn to_expr(&self) -> Expr {
        let mut parts: Vec<Expr> = Vec::new();
        for (g, e) in &self.monomial {
            parts.push(power_expr(g.to_expr(), *e));
        }
        for (f, m) in &self.factors {
            parts.push(power_expr(f.to_expr(), *m));
        }
        let Some(product) = parts.into_iter().reduce(|acc, f| Expr::Mul(acc.boxed(), f.boxed()))
        else {
            return Expr::Const(self.unit.clone());
        };
        Expr::scaled(&self.unit, product)
    }
}

fn power_expr(base: Expr, e: u32) -> Expr {
    if e == 1 {
        base
    } else {
        Expr::Pow(base.boxed(), Expr::integer(e as i64).boxed())
    }
}

fn sort_key(p: &Polynomial) -> (u32, Vec<BigRational>) {
    let mut coeffs: Vec<BigRational> = p.sorted_terms().into_iter().map(|(_, c)| c.clone()).collect();
    coeffs.reverse();
    (p.total_degree(), coeffs)
}

fn is_homogeneous(p: &Polynomial) -> bool {
    let degree = p.total_degree();
    p.terms().all(|(m, _)| m.values().sum::<u32>() == degree)
}

/// `y^d * f(x/y)` for a univariate `f` of degree `d` in `x`.
fn homogenize(coeffs: &[BigRational], x: &str, y: &str) -> Polynomial {
    let degree = coeffs.len().saturating_sub(1);
    let mut out = Polynomial::zero();
    for (k, c) in coeffs.iter().enumerate() {
        let term = Polynomial::variable(x)
            .pow(k as u32)
            .mul(&Polynomial::variable(y).pow((degree - k) as u32))
            .scale(c);
        out = out.add(&term);
    }
    out
}

/// Factors of a polynomial with no common monomial and integer primitive coefficients.
fn split(p: &Polynomial) -> Vec<(Polynomial, u32)> {
    let variables = p.variables();
    if p.has_atoms() || p.total_degree() < 2 {
        return vec![(p.clone(), 1)];
    }
    match variables.as_slice() {
        [x] => {
            let Some(coeffs) = p.univariate_coeffs(x) else {
                return vec![(p.clone(), 1)];
            };
            factor_univariate(&coeffs)
                .into_iter()
                .map(|(f, m)| (Polynomial::from_univariate(x, &f), m))
                .collect()
        }
        [x, y] if is_homogeneous(p) => {
            let dehomogenized = p.terms().fold(Polynomial::zero(), |acc, (mono, c)| {
                let k = mono.get(&Generator::Var(x.clone())).copied().unwrap_or(0);
                acc.add(&Polynomial::variable(x).pow(k).scale(c))
            });
            let Some(coeffs) = dehomogenized.univariate_coeffs(x) else {
                return vec![(p.clone(), 1)];
            };
            factor_univariate(&coeffs)
                .into_iter()
                .map(|(f, m)| (homogenize(&f, x, y), m))
                .collect()
        }
        _ => vec![(p.clone(), 1)],
    }
}

/// Factors a polynomial over the rationals.
pub fn factor_polynomial(p: &Polynomial) -> Factorization {
    if p.is_zero() {
        return Factorization {
            unit: BigRational::zero(),
            monomial: Monomial::new(),
            factors: Vec::new(),
        };
    }
    let monomial = p.monomial_content();
    let reduced = p.div_monomial(&monomial).unwrap_or_else(|| p.clone());
    let mut factors: Vec<(Polynomial, u32)> = if reduced.as_constant().is_some() {
        Vec::new()
    } else {
        split(&reduced)
            .into_iter()
            .map(|(f, m)| (f.primitive_part(), m))
            .collect()
    };
    factors.sort_by(|a, b| sort_key(&a.0).cmp(&sort_key(&b.0)));

    let mut product = Polynomial::monomial(monomial.clone());
    for (f, m) in &factors {
        product = product.mul(&f.pow(*m));
    }
    let unit = p.leading_coefficient() / product.leading_coefficient();
    Factorization {
        unit,
        monomial,
        factors,
    }
}

impl Expr {
    /// Factors the expression over the rationals. Rational functions are factored in
    /// numerator and denominator separately.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let expr = Expr::parse_expression("x**3 - 2*x**2 - 5*x + 6").unwrap();
    /// assert_eq!(expr.factor().unwrap().to_string(), "(x - 3)*(x - 1)*(x + 2)");
    /// ```
    pub fn factor(&self) -> Result<Expr, SymbolicError> {
        let canon = |e: &Expr| e.simplify_();
        let rf = RationalFunction::from_expr(self, &canon)?.cancel();
        match rf.as_polynomial() {
            Some(p) => Ok(factor_polynomial(&p).to_expr()),
            None => {
                let num = factor_polynomial(&rf.num);
                let den = factor_polynomial(&rf.den);
                // cancel() leaves the denominator with a positive leading coefficient
                let unit = num.unit.clone() / den.unit.clone();
                let num_expr = Factorization {
                    unit: BigRational::one(),
                    ..num
                }
                .to_expr();
                let den_expr = Factorization {
                    unit: BigRational::one(),
                    ..den
                }
                .to_expr();
                let quotient = Expr::Div(num_expr.boxed(), den_expr.boxed());
                Ok(if unit.is_one() {
                    quotient
                } else if unit == -BigRational::one() {
                    quotient.negate()
                } else {
                    Expr::Mul(Expr::Const(unit).boxed(), quotient.boxed())
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(n: i64) -> BigRational {
        BigRational::from_integer(BigInt::from(n))
    }

    fn factored(input: &str) -> String {
        Expr::parse_expression(input)
            .unwrap()
            .factor()
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_rational_roots() {
        // 2x^2 - 3x + 1 = (2x - 1)(x - 1)
        let roots = rational_roots(&[r(1), r(-3), r(2)]);
        assert_eq!(roots, vec![BigRational::new(1.into(), 2.into()), r(1)]);
        assert!(rational_roots(&[r(-2), r(0), r(1)]).is_empty());
        assert_eq!(rational_roots(&[r(0), r(-1), r(1)]), vec![r(0), r(1)]);
    }

    #[test]
    fn test_square_free() {
        // (x - 1)^2 (x + 2) = x^3 - 3x + 2
        let parts = square_free(&[r(2), r(-3), r(0), r(1)]);
        assert_eq!(parts, vec![(vec![r(2), r(1)], 1), (vec![r(-1), r(1)], 2)]);
    }

    #[test]
    fn test_factor_cubic() {
        assert_eq!(factored("x**3 - 2*x**2 - 5*x + 6"), "(x - 3)*(x - 1)*(x + 2)");
    }

    #[test]
    fn test_factor_content_and_monomial() {
        assert_eq!(factored("2*x**2 + 4*x"), "2*x*(x + 2)");
        assert_eq!(factored("-x**2 + 1"), "-(x - 1)*(x + 1)");
        assert_eq!(factored("x**2/2 - 1/2"), "(x - 1)*(x + 1)/2");
        assert_eq!(factored("6"), "6");
        assert_eq!(factored("x*y + x"), "x*(y + 1)");
    }

    #[test]
    fn test_factor_multiplicities() {
        assert_eq!(factored("x**2 + 2*x + 1"), "(x + 1)**2");
        assert_eq!(factored("4*x**2 - 4*x + 1"), "(2*x - 1)**2");
        assert_eq!(factored("x**4 - 2*x**2 + 1"), "(x - 1)**2*(x + 1)**2");
    }

    #[test]
    fn test_factor_homogeneous() {
        assert_eq!(factored("x**2 - y**2"), "(x - y)*(x + y)");
        assert_eq!(factored("x**2 + 2*x*y + y**2"), "(x + y)**2");
    }

    #[test]
    fn test_factor_irreducible() {
        assert_eq!(factored("x**2 + 1"), "x**2 + 1");
        assert_eq!(factored("x**3 - x - 1"), "x**3 - x - 1");
        assert_eq!(factored("x**4 + 1"), "x**4 + 1");
    }

    #[test]
    fn test_factor_quadratic_factors_without_roots() {
        assert_eq!(factored("x**4 - 4"), "(x**2 - 2)*(x**2 + 2)");
        assert_eq!(factored("x**4 + 4"), "(x**2 - 2*x + 2)*(x**2 + 2*x + 2)");
        assert_eq!(factored("x**4 + 5*x**2 + 6"), "(x**2 + 2)*(x**2 + 3)");
        assert_eq!(factored("x**5 - 4*x"), "x*(x**2 - 2)*(x**2 + 2)");
    }

    #[test]
    fn test_interpolate() {
        // through (0, 2), (1, 1), (-1, 5): x^2 - 2x + 2
        let points = trial_points(3);
        assert_eq!(points, vec![r(0), r(1), r(-1)]);
        assert_eq!(interpolate(&points, &[r(2), r(1), r(5)]), vec![r(2), r(-2), r(1)]);
    }

    #[test]
    fn test_factor_of_expansion() {
        for input in ["(x + 2)**5", "(x - 1)*(x + 3)*(2*x + 1)", "3*(x - y)*(x + y)"] {
            let original = Expr::parse_expression(input).unwrap();
            let refactored = original.expand().unwrap().factor().unwrap();
            let difference = (refactored - original).simplify_().unwrap();
            assert!(difference.is_zero(), "{} does not survive expand/factor", input);
        }
    }

    #[test]
    fn test_factor_rational_function() {
        assert_eq!(factored("(x**2 - 1)/(x**2 + 4*x + 4)"), "(x - 1)*(x + 1)/(x + 2)**2");
    }
}
