//! Tools for treating fractions as notated musical lengths.

use std::collections::VecDeque;

use fraction::Fraction;

/// Largest power of two less than or equal to `num`.
fn largest_power_of_two(num: u64) -> u64 {
    debug_assert!(0 < num);
    1u64 << (63 - num.leading_zeros())
}

/// True if the fraction can be written as a single notated symbol:
/// a power-of-two denominator and, once reduced, a numerator no larger
/// than a dot can explain (1, 3, or the breve-class integers 2 and 4).
///
/// # Example
/// ```
/// # use fraction::Fraction;
/// # use score_tree::primitives::is_assignable_fraction;
/// assert!(is_assignable_fraction(Fraction::new(3u64, 8u64)));
/// assert!(!is_assignable_fraction(Fraction::new(5u64, 8u64)));
/// assert!(!is_assignable_fraction(Fraction::new(1u64, 12u64)));
/// ```
pub fn is_assignable_fraction(frac: Fraction) -> bool {
    let (num, den) = match (frac.numer(), frac.denom()) {
        (Some(num), Some(den)) => (*num, *den),
        _ => return false,
    };
    if num == 0 || frac.is_sign_negative() {
        return false;
    }
    den.is_power_of_two() && num <= 4
}

/// Floor of a signed fraction, computed from its parts.
///
/// The wrapping types guarantee finite input, so the numerator and
/// denominator are always present.
pub fn floor_fraction(frac: Fraction) -> Fraction {
    let num = *frac.numer().expect("finite fraction has a numerator");
    let den = *frac.denom().expect("finite fraction has a denominator");
    let quotient = num / den;
    if frac.is_sign_negative() && num % den != 0 {
        -Fraction::from(quotient + 1)
    } else if frac.is_sign_negative() {
        -Fraction::from(quotient)
    } else {
        Fraction::from(quotient)
    }
}

/// Split a complex fraction into simple fractions that can each be
/// written as one notated length.
///
/// Input must be non-negative with a power-of-two denominator; this is
/// the caller's contract, checked by the duration layer.
///
/// # Returns
///
/// Deque of fractions, smallest first, summing to the input. The input
/// comes back as a singleton when it is already assignable.
///
/// # Example
///
/// ```
/// # use fraction::Fraction;
/// # use std::collections::VecDeque;
/// # use score_tree::primitives::decompose_fraction;
/// assert_eq!(
///     decompose_fraction(Fraction::new(13u64, 16u64), VecDeque::new()),
///     vec![
///         Fraction::new(1u64, 16u64),
///         Fraction::new(1u64, 4u64),
///         Fraction::new(1u64, 2u64)
///     ]
/// );
/// ```
pub fn decompose_fraction(frac: Fraction, mut head: VecDeque<Fraction>) -> VecDeque<Fraction> {
    let num = *frac.numer().expect("finite fraction has a numerator");
    let den = *frac.denom().expect("finite fraction has a denominator");
    if num == 0 {
        return head;
    }
    if den == 1 || num < 5 {
        head.push_back(frac);
        return head;
    }
    if num == largest_power_of_two(num) {
        head.push_back(frac);
        return head;
    }
    let whole_num = largest_power_of_two(num);

    let whole = Fraction::new(whole_num, den);
    let remainder = Fraction::new(num - whole_num, den);
    if *remainder.numer().expect("finite fraction has a numerator") > 3 {
        head.push_back(whole);
        return decompose_fraction(remainder, head);
    }
    head.push_front(whole);
    head.push_front(remainder);
    head
}
