// A module which contains the algorithms computing Shamir's shares of a single field element
// and recovering that element from a set of shares.

use alloc::vec::Vec;

#[cfg(feature = "zeroize_memory")]
use zeroize::Zeroize;

use super::error::Error;
use super::field::{Fp, PRIME};
use super::random::{random_u32, ByteSource};

// Checks `1 <= k <= n < PRIME`.
pub fn check_parameters(n: u32, k: u32) -> Result<(), Error> {
    if k == 0 || k > n || n >= PRIME {
        Err(Error::InvalidParameters { n, k })
    } else {
        Ok(())
    }
}

// Generates `k` polynomial coefficients, lowest degree first: the first one is `s` and the
// others are four random bytes reduced into the field.
pub fn random_polynomial<S: ByteSource + ?Sized>(s: Fp, k: u32, source: &mut S) -> Vec<Fp> {
    let mut poly = Vec::with_capacity(k as usize);
    poly.push(s);

    for _ in 1..k {
        poly.push(Fp::new(random_u32(source)));
    }

    poly
}

// Evaluates `poly` (lowest degree first) at `x`, accumulating the powers of `x` as it goes.
pub fn evaluate(poly: &[Fp], x: Fp) -> Fp {
    let mut power = Fp::ONE;
    let mut sum = Fp::ZERO;

    for c in poly {
        sum = sum + *c * power;
        power = power * x;
    }

    sum
}

/// Splits one field element into `n` shares with threshold `k`.
///
/// The returned vector holds the evaluations at `x = 1..=n`, so position `i`
/// belongs to the share with index `i + 1`. Nothing is produced unless
/// `secret < PRIME` and `1 <= k <= n < PRIME`.
pub fn generate_shares<S: ByteSource + ?Sized>(
    secret: u32,
    n: u32,
    k: u32,
    source: &mut S,
) -> Result<Vec<Fp>, Error> {
    let secret = Fp::try_from(secret)?;
    check_parameters(n, k)?;

    #[allow(unused_mut)]
    let mut poly = random_polynomial(secret, k, source);
    let shares = (1..=n).map(|x| evaluate(&poly, Fp(x))).collect();

    #[cfg(feature = "zeroize_memory")]
    poly.zeroize();

    Ok(shares)
}

// Builds the augmented Vandermonde system: row `j` is `[x_j^0, x_j^1, .., x_j^(m-1), y_j]`.
pub fn vandermonde_system(indices: &[Fp], values: &[Fp]) -> Vec<Vec<Fp>> {
    let m = indices.len();

    indices
        .iter()
        .zip(values)
        .map(|(x, y)| {
            let mut row = Vec::with_capacity(m + 1);
            let mut power = Fp::ONE;
            for _ in 0..m {
                row.push(power);
                power = power * *x;
            }
            row.push(*y);
            row
        })
        .collect()
}

fn scale_row(row: &mut [Fp], factor: Fp) {
    for entry in row.iter_mut() {
        *entry = *entry * factor;
    }
}

// `to = from - to`, entry by entry.
fn subtract_row(from: &[Fp], to: &mut [Fp]) {
    for (t, f) in to.iter_mut().zip(from) {
        *t = *f - *t;
    }
}

// Borrows two distinct rows mutably.
fn row_pair(eqn: &mut [Vec<Fp>], a: usize, b: usize) -> (&mut Vec<Fp>, &mut Vec<Fp>) {
    if a < b {
        let (head, tail) = eqn.split_at_mut(b);
        (&mut head[a], &mut tail[0])
    } else {
        let (head, tail) = eqn.split_at_mut(a);
        (&mut tail[0], &mut head[b])
    }
}

/// Fraction-free elimination of an `m x (m + 1)` augmented system.
///
/// For every ordered pair of distinct rows `(a, b)` row `a` is scaled by
/// `eqn[b][a]`, row `b` by `eqn[a][a]`, and row `b` is replaced by their
/// difference, which clears column `a` from row `b` without dividing. Pairs
/// whose cross term is already zero are skipped, and a zero pivot is replaced
/// by a later row with a non-zero entry in that column. Afterwards every row
/// has a single non-zero coefficient, on the diagonal.
pub fn eliminate(eqn: &mut [Vec<Fp>]) -> Result<(), Error> {
    let m = eqn.len();

    for a in 0..m {
        if eqn[a][a].is_zero() {
            let pivot_row = (a + 1..m)
                .find(|&r| !eqn[r][a].is_zero())
                .ok_or(Error::SingularSystem)?;
            eqn.swap(a, pivot_row);
        }

        for b in 0..m {
            if a == b {
                continue;
            }

            let (row_a, row_b) = row_pair(eqn, a, b);
            let pivot = row_a[a];
            let cross = row_b[a];
            if cross.is_zero() {
                continue;
            }

            scale_row(row_a, cross);
            scale_row(row_b, pivot);
            subtract_row(row_a, row_b);
        }
    }

    Ok(())
}

/// Recovers the constant term of the degree-`(m - 1)` polynomial through the
/// `m` points `(indices[j], values[j])`.
pub fn solve_constant_term(indices: &[Fp], values: &[Fp]) -> Result<Fp, Error> {
    if indices.is_empty() {
        return Err(Error::NoShares);
    }
    if indices.len() != values.len() {
        return Err(Error::LengthMismatch {
            expected: indices.len(),
            found: values.len(),
        });
    }

    let m = indices.len();
    let mut eqn = vandermonde_system(indices, values);
    let solved = eliminate(&mut eqn).map(|()| eqn[0][m] / eqn[0][0]);

    #[cfg(feature = "zeroize_memory")]
    eqn.iter_mut().for_each(|row| row.zeroize());

    solved
}

#[cfg(test)]
mod tests {
    use super::{
        check_parameters, eliminate, evaluate, generate_shares, random_polynomial,
        solve_constant_term, vandermonde_system, Fp, PRIME,
    };
    use crate::error::Error;
    use crate::random::ByteSource;
    use alloc::{vec, vec::Vec};
    use rand_chacha::rand_core::SeedableRng;
    use rstest::rstest;

    struct Constant(u8);

    impl ByteSource for Constant {
        fn random_byte(&mut self) -> u8 {
            self.0
        }
    }

    fn rng() -> rand_chacha::ChaCha8Rng {
        rand_chacha::ChaCha8Rng::from_seed([0x90; 32])
    }

    #[test]
    fn random_polynomial_works() {
        let poly = random_polynomial(Fp(1), 3, &mut rng());
        assert_eq!(poly.len(), 3);
        assert_eq!(poly[0], Fp(1));
        assert!(poly.iter().all(|c| c.value() < PRIME));
    }

    #[test]
    fn random_polynomial_reduces_coefficients() {
        // 0xffffffff % 65809
        let poly = random_polynomial(Fp(7), 2, &mut Constant(0xff));
        assert_eq!(poly, vec![Fp(7), Fp(u32::MAX % PRIME)]);
    }

    #[test]
    fn evaluate_works() {
        let poly = vec![Fp(3), Fp(2), Fp(5)];
        assert_eq!(evaluate(&poly, Fp(0)), Fp(3));
        assert_eq!(evaluate(&poly, Fp(1)), Fp(10));
        assert_eq!(evaluate(&poly, Fp(2)), Fp(27));
        assert_eq!(evaluate(&[], Fp(2)), Fp::ZERO);
    }

    #[rstest]
    #[case(1, 1)]
    #[case(5, 3)]
    #[case(5, 5)]
    #[case(PRIME - 1, 2)]
    fn valid_parameters_accepted(#[case] n: u32, #[case] k: u32) {
        assert!(check_parameters(n, k).is_ok());
    }

    #[rstest]
    #[case(3, 0)]
    #[case(3, 4)]
    #[case(PRIME, 2)]
    #[case(0, 0)]
    fn invalid_parameters_rejected(#[case] n: u32, #[case] k: u32) {
        assert!(matches!(
            check_parameters(n, k),
            Err(Error::InvalidParameters { .. })
        ));
    }

    #[test]
    fn generate_shares_rejects_out_of_range_secret() {
        assert!(matches!(
            generate_shares(PRIME, 5, 3, &mut rng()),
            Err(Error::ElementOutOfRange(PRIME))
        ));
        assert!(generate_shares(PRIME - 1, 5, 3, &mut rng()).is_ok());
    }

    #[test]
    fn generate_shares_threshold_one_copies_secret() {
        let shares = generate_shares(200, 6, 1, &mut rng()).unwrap();
        assert_eq!(shares, vec![Fp(200); 6]);
    }

    #[test]
    fn generate_shares_follows_polynomial() {
        // Every coefficient past the constant term is 0x01010101 % PRIME.
        let c = Fp::new(0x0101_0101);
        let shares = generate_shares(65, 4, 3, &mut Constant(1)).unwrap();
        for (i, share) in shares.iter().enumerate() {
            let x = Fp(i as u32 + 1);
            assert_eq!(*share, Fp(65) + c * x + c * x * x);
        }
    }

    #[test]
    fn vandermonde_system_works() {
        let eqn = vandermonde_system(&[Fp(2), Fp(3)], &[Fp(10), Fp(11)]);
        assert_eq!(
            eqn,
            vec![vec![Fp(1), Fp(2), Fp(10)], vec![Fp(1), Fp(3), Fp(11)]]
        );
    }

    #[test]
    fn eliminate_diagonalizes() {
        let mut eqn = vandermonde_system(&[Fp(1), Fp(2), Fp(4)], &[Fp(5), Fp(6), Fp(7)]);
        eliminate(&mut eqn).unwrap();
        for (r, row) in eqn.iter().enumerate() {
            for (c, entry) in row[..3].iter().enumerate() {
                assert_eq!(entry.is_zero(), r != c, "row {r} column {c}");
            }
        }
    }

    #[test]
    fn eliminate_swaps_zero_pivot() {
        let mut eqn = vec![
            vec![Fp(0), Fp(1), Fp(4)],
            vec![Fp(1), Fp(0), Fp(9)],
        ];
        eliminate(&mut eqn).unwrap();
        let x0 = eqn[0][2] / eqn[0][0];
        let x1 = eqn[1][2] / eqn[1][1];
        assert_eq!((x0, x1), (Fp(9), Fp(4)));
    }

    #[test]
    fn eliminate_reports_singular_system() {
        let mut eqn = vandermonde_system(&[Fp(3), Fp(3)], &[Fp(1), Fp(2)]);
        assert!(matches!(eliminate(&mut eqn), Err(Error::SingularSystem)));
    }

    #[test]
    fn solve_single_share() {
        assert_eq!(solve_constant_term(&[Fp(4)], &[Fp(99)]).unwrap(), Fp(99));
    }

    #[test]
    fn solve_rejects_empty_and_uneven_input() {
        assert!(matches!(solve_constant_term(&[], &[]), Err(Error::NoShares)));
        assert!(matches!(
            solve_constant_term(&[Fp(1), Fp(2)], &[Fp(1)]),
            Err(Error::LengthMismatch { .. })
        ));
    }

    #[test]
    fn solve_recovers_every_byte_from_any_three_of_five() {
        let mut rng = rng();
        for secret in 0..=255u32 {
            let shares = generate_shares(secret, 5, 3, &mut rng).unwrap();
            for (a, b, c) in [(0, 1, 2), (0, 2, 4), (1, 3, 4), (4, 2, 0)] {
                let indices = [Fp(a + 1), Fp(b + 1), Fp(c + 1)];
                let values = [shares[a as usize], shares[b as usize], shares[c as usize]];
                assert_eq!(solve_constant_term(&indices, &values).unwrap(), Fp(secret));
            }
        }
    }

    #[test]
    fn solve_handles_large_indices() {
        let mut rng = rng();
        let n = PRIME - 1;
        let poly = random_polynomial(Fp(255), 4, &mut rng);
        let xs: Vec<Fp> = [n, n - 1, n - 1000, 12345].into_iter().map(Fp).collect();
        let ys: Vec<Fp> = xs.iter().map(|x| evaluate(&poly, *x)).collect();
        assert_eq!(solve_constant_term(&xs, &ys).unwrap(), Fp(255));
    }

    #[test]
    fn solve_with_too_few_shares_does_not_error() {
        let shares = generate_shares(42, 5, 4, &mut rng()).unwrap();
        let indices = [Fp(1), Fp(2)];
        let values = [shares[0], shares[1]];
        assert!(solve_constant_term(&indices, &values).is_ok());
    }
}
