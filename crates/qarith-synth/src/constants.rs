//! Compile-time constants and the classical arithmetic on them.
//!
//! Constants never become circuit state. They only decide which wires
//! receive conditioning operations, always through [`bits_set`].

use num_integer::Integer;

use crate::error::{SynthError, SynthResult};

/// Largest supported bit width.
pub const MAX_BIT_WIDTH: u32 = 64;

/// Smallest width the multiplier and exponentiator accept.
pub const MIN_MULTIPLIER_BITS: u32 = 2;

/// Value of the modular adder's flag wire after a subtraction that
/// underflowed.
///
/// The flag is 1 when `A + B - M` is non-negative, in which case the modulus
/// register is masked to zero before the restoring addition.
pub const FLAG_UNDERFLOWED: bool = false;

/// Wire offsets of the set bits of `constant`, least significant first.
///
/// ```rust
/// use qarith_synth::constants::bits_set;
///
/// assert_eq!(bits_set(0b1011), vec![0, 1, 3]);
/// assert!(bits_set(0).is_empty());
/// ```
pub fn bits_set(constant: u64) -> Vec<u32> {
    (0..u64::BITS)
        .filter(|i| (constant >> i) & 1 == 1)
        .collect()
}

/// Check if `value` fits in `bits` bits.
#[inline]
pub fn fits(value: u64, bits: u32) -> bool {
    bits >= u64::BITS || value >> bits == 0
}

/// Smallest width able to hold every residue modulo `modulus`, i.e.
/// `ceil(log2(modulus))`.
pub fn min_bit_width(modulus: u64) -> u32 {
    u64::BITS - modulus.saturating_sub(1).leading_zeros()
}

/// `a * b mod m` without overflow.
#[inline]
pub fn mod_mul(a: u64, b: u64, m: u64) -> u64 {
    ((u128::from(a) * u128::from(b)) % u128::from(m)) as u64
}

/// `base^exp mod modulus` by square-and-multiply.
pub fn mod_pow(base: u64, mut exp: u64, modulus: u64) -> u64 {
    if modulus == 1 {
        return 0;
    }
    let mut result = 1;
    let mut base = base % modulus;
    while exp > 0 {
        if exp & 1 == 1 {
            result = mod_mul(result, base, modulus);
        }
        base = mod_mul(base, base, modulus);
        exp >>= 1;
    }
    result
}

/// `base^(2^k) mod modulus`, by `k` squarings.
pub fn mod_pow2k(base: u64, k: u32, modulus: u64) -> u64 {
    (0..k).fold(base % modulus, |acc, _| mod_mul(acc, acc, modulus))
}

/// Multiplicative inverse of `value` modulo `modulus`.
///
/// Fails with [`SynthError::NoModularInverse`] when `value` and `modulus`
/// are not coprime.
pub fn mod_inverse(value: u64, modulus: u64) -> SynthResult<u64> {
    let m = i128::from(modulus);
    let egcd = i128::from(value % modulus).extended_gcd(&m);
    if egcd.gcd != 1 {
        return Err(SynthError::NoModularInverse { value, modulus });
    }
    Ok(egcd.x.mod_floor(&m) as u64)
}

/// Validate a bit width.
pub fn check_bit_width(bits: u32) -> SynthResult<()> {
    check_bit_width_from(bits, 1)
}

/// Validate a bit width against a gate-specific lower bound.
pub fn check_bit_width_from(bits: u32, min: u32) -> SynthResult<()> {
    if bits < min || bits > MAX_BIT_WIDTH {
        return Err(SynthError::InvalidBitWidth {
            got: bits,
            min,
            max: MAX_BIT_WIDTH,
        });
    }
    Ok(())
}

/// Validate a modulus.
pub fn check_modulus(modulus: u64) -> SynthResult<()> {
    if modulus <= 1 {
        return Err(SynthError::InvalidModulus(modulus));
    }
    Ok(())
}

/// Validate that every residue modulo `modulus` fits in `bits` wires.
pub fn check_residues_fit(modulus: u64, bits: u32) -> SynthResult<()> {
    check_modulus(modulus)?;
    if !fits(modulus - 1, bits) {
        return Err(SynthError::ModulusTooWide { modulus, bits });
    }
    Ok(())
}
