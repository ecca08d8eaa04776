use rand::Rng;

/// Clamp into `[min, max]`, mapping NaN to `min`.
pub fn clamp_finite(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}

/// Add uniform noise in `[-half_width, half_width]` and clamp into range.
pub fn perturb<R: Rng + ?Sized>(value: f64, half_width: f64, min: f64, max: f64, rng: &mut R) -> f64 {
    let variation = (rng.gen::<f64>() - 0.5) * 2.0 * half_width;
    clamp_finite(value + variation, min, max)
}

/// Invert `value` with probability `chance`.
pub fn maybe_flip<R: Rng + ?Sized>(value: bool, chance: f64, rng: &mut R) -> bool {
    if rng.gen::<f64>() < chance {
        !value
    } else {
        value
    }
}

/// Pick one of two inherited values with equal odds.
pub fn pick<'a, T, R: Rng + ?Sized>(a: &'a T, b: &'a T, rng: &mut R) -> &'a T {
    if rng.gen_bool(0.5) {
        a
    } else {
        b
    }
}
