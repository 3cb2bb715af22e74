//! Duration units for task spans.
//!
//! The board is laid out in hour-long slots, so every duration a task is
//! given in ends up as a whole number of [`Hour`]s. Any `qtty` unit of the
//! time dimension is accepted and converted here.

use qtty::{Hour, Quantity, Unit};

/// The unit one board slot covers.
pub type SlotUnit = Hour;

/// Marker trait for units that share the same physical dimension.
///
/// Automatically implemented for any pair of units where
/// `From::Dim == To::Dim`, so a task duration in minutes or days converts to
/// slots while a length in meters is rejected at compile time.
///
/// ```ignore
/// use qtty::{Hour, Minute, Meter};
/// use timeboard::units::SameDim;
///
/// fn accepts_same_dim<From: SameDim<Hour>>() {}
///
/// accepts_same_dim::<Minute>(); // OK
/// // accepts_same_dim::<Meter>(); // Error: different dimensions
/// ```
pub trait SameDim<To: Unit>: Unit<Dim = To::Dim> {}

impl<From, To> SameDim<To> for From
where
    From: Unit,
    To: Unit<Dim = From::Dim>,
{
}

/// Converts a quantity from one unit to another unit of the same dimension.
#[inline]
pub const fn convert<From, To>(q: Quantity<From>) -> Quantity<To>
where
    From: SameDim<To>,
    To: Unit,
{
    q.to_const::<To>()
}

/// Number of whole slots needed to cover `duration`, rounding partial hours up.
///
/// Negative and NaN durations cover no slots.
pub fn slots_for<U: SameDim<SlotUnit>>(duration: Quantity<U>) -> u32 {
    let hours: Quantity<SlotUnit> = convert(duration);
    let value = hours.value();
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    // Float noise from unit ratios (e.g. 120 min -> 2.0000000000000004 h).
    let rounded = value.round();
    if (value - rounded).abs() < 1e-9 {
        rounded as u32
    } else {
        value.ceil() as u32
    }
}
