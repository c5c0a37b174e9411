/// Signal primitive - the scalar carried on every port
///
/// Every value flowing through a circuit lives in the closed interval
/// [`SIGNAL_MIN`, `SIGNAL_MAX`]. [`clamp`] is the only gate enforcing that
/// range; node evaluate rules call it before returning anything that could
/// overflow.

/// A single port value for one tick
pub type Signal = f32;

/// Lowest representable signal
pub const SIGNAL_MIN: Signal = -100.0;

/// Highest representable signal
pub const SIGNAL_MAX: Signal = 100.0;

/// Clamp a value into the signal range
///
/// Results equal to zero are normalized to positive zero, so `-0.0` never
/// escapes. NaN has no place in the range and collapses to `0.0`.
///
/// # Example
/// ```
/// use tickwire::signal::clamp;
///
/// assert_eq!(clamp(150.0), 100.0);
/// assert_eq!(clamp(-250.0), -100.0);
/// assert!(clamp(-0.0).is_sign_positive());
/// ```
#[inline]
pub fn clamp(value: Signal) -> Signal {
    clamp_to(value, SIGNAL_MIN, SIGNAL_MAX)
}

/// Clamp into an arbitrary `[min, max]` range with the same zero rule
#[inline]
pub fn clamp_to(value: Signal, min: Signal, max: Signal) -> Signal {
    if value.is_nan() {
        return 0.0;
    }

    let clamped = if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    };

    // -0.0 == 0.0, so this also catches negative zero
    if clamped == 0.0 {
        0.0
    } else {
        clamped
    }
}

/// True when `value` is a legal signal (in range and not NaN)
#[inline]
pub fn in_range(value: Signal) -> bool {
    (SIGNAL_MIN..=SIGNAL_MAX).contains(&value)
}
