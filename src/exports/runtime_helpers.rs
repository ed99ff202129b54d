//=========================================================================
// ARM EABI Runtime Helpers
//=========================================================================
//
// Integer division and 64-bit conversion helpers that ARM code calls
// instead of hardware instructions. Game libraries are built against
// these names, but the host's static libgcc does not export them to
// dynamically loaded code.
//
// All helpers use the base-standard convention: arguments and results
// travel in core registers. `f64` values are therefore passed as their
// bit pattern in a `u64` (r0:r1), independent of the hard-float ABI the
// host itself is built with. Paired results (quotient, remainder) are
// packed into a `u64` with the quotient in the low word.
//
// Division by zero returns 0, which is what the default `__aeabi_idiv0`
// handler yields.
//
//=========================================================================

//=== Signed Division =====================================================

/// `__aeabi_idiv`
pub extern "C" fn aeabi_idiv(numerator: i32, denominator: i32) -> i32 {
    if denominator == 0 {
        return 0;
    }
    numerator.wrapping_div(denominator)
}

/// `__aeabi_idivmod`: quotient in r0, remainder in r1.
pub extern "C" fn aeabi_idivmod(numerator: i32, denominator: i32) -> u64 {
    if denominator == 0 {
        return pack(0, numerator as u32);
    }
    let quot = numerator.wrapping_div(denominator);
    let rem = numerator.wrapping_rem(denominator);
    pack(quot as u32, rem as u32)
}

//=== Unsigned Division ===================================================

/// `__aeabi_uidiv`
pub extern "C" fn aeabi_uidiv(numerator: u32, denominator: u32) -> u32 {
    numerator.checked_div(denominator).unwrap_or(0)
}

/// `__aeabi_uidivmod`: quotient in r0, remainder in r1.
pub extern "C" fn aeabi_uidivmod(numerator: u32, denominator: u32) -> u64 {
    match (numerator.checked_div(denominator), numerator.checked_rem(denominator)) {
        (Some(quot), Some(rem)) => pack(quot, rem),
        _ => pack(0, numerator),
    }
}

//=== 64-bit Conversions ==================================================

/// `__aeabi_d2ulz`: double → unsigned long long, saturating.
pub extern "C" fn aeabi_d2ulz(value_bits: u64) -> u64 {
    f64::from_bits(value_bits) as u64
}

/// `__aeabi_ul2d`: unsigned long long → double.
pub extern "C" fn aeabi_ul2d(value: u64) -> u64 {
    (value as f64).to_bits()
}

//--- Helpers -------------------------------------------------------------

fn pack(low: u32, high: u32) -> u64 {
    (low as u64) | ((high as u64) << 32)
}

//=========================================================================
// Unit Tests
//=========================================================================
