//! Abstractions for rolling individual dice using various means.

use core::iter::Peekable;

#[cfg(feature = "fastrand")]
use fastrand::Rng;

use super::{Error, MAX_SIDES, MIN_SIDES};

/// Rolls dice - what else is there to say?
pub trait Roller {
	/// Rolls a single die without checking the number of sides.
	#[must_use]
	fn roll_die(&mut self, sides: u8) -> u8;

	/// Rolls a single die, producing a value from 1 to `sides` (inclusive).
	///
	/// # Errors
	/// If `sides` is outside of 2-100, [`Error::InvalidSides`] is returned.
	///
	/// # Examples
	/// ```
	/// use celtic_dice::dice::{roller::{Max as MaxRoller, Roller}, Error};
	///
	/// assert_eq!(MaxRoller.roll_single_die(20), Ok(20));
	/// assert_eq!(MaxRoller.roll_single_die(101), Err(Error::InvalidSides(101)));
	/// ```
	fn roll_single_die(&mut self, sides: u8) -> Result<u8, Error> {
		if !(MIN_SIDES..=MAX_SIDES).contains(&sides) {
			return Err(Error::InvalidSides(sides));
		}

		Ok(self.roll_die(sides))
	}

	/// Rolls `count` dice one after another, returning the values in the order they were rolled.
	///
	/// # Errors
	/// If `sides` is outside of 2-100, [`Error::InvalidSides`] is returned.
	fn roll_dice(&mut self, count: u8, sides: u8) -> Result<Vec<u8>, Error> {
		(0..count).map(|_| self.roll_single_die(sides)).collect()
	}
}

/// Generates rolls with random values using [fastrand]. Requires the `fastrand` feature (enabled by default).
///
/// # Examples
///
/// ## Default fastrand roller
/// ```
/// use celtic_dice::dice::roller::{FastRand as FastRandRoller, Roller};
///
/// let mut roller = FastRandRoller::default();
///
/// let rolls = roller.roll_dice(4, 6)?;
/// assert!(rolls.iter().all(|roll| (1..=6).contains(roll)));
/// # Ok::<(), celtic_dice::dice::Error>(())
/// ```
///
/// ## Manually seeded fastrand roller
/// ```
/// use celtic_dice::dice::roller::{FastRand as FastRandRoller, Roller};
///
/// let mut a = FastRandRoller::with_seed(0x750c38d574400);
/// let mut b = FastRandRoller::with_seed(0x750c38d574400);
/// assert_eq!(a.roll_dice(8, 20)?, b.roll_dice(8, 20)?);
/// # Ok::<(), celtic_dice::dice::Error>(())
/// ```
#[cfg(feature = "fastrand")]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "std", derive(Default))]
pub struct FastRand(Rng);

#[cfg(feature = "fastrand")]
impl FastRand {
	/// Creates a new fastrand roller that uses the given RNG instance to generate rolls.
	#[must_use]
	#[inline]
	pub const fn new(rng: Rng) -> Self {
		Self(rng)
	}

	/// Creates a new fastrand roller that uses a pre-seeded RNG instance to generate rolls.
	#[must_use]
	#[inline]
	pub fn with_seed(seed: u64) -> Self {
		Self(Rng::with_seed(seed))
	}
}

#[cfg(feature = "fastrand")]
impl Roller for FastRand {
	/// Rolls a single die using the [`fastrand::Rng`] the roller was created with.
	#[inline]
	fn roll_die(&mut self, sides: u8) -> u8 {
		if sides > 0 {
			self.0.u8(1..=sides)
		} else {
			0
		}
	}
}

/// Generates rolls from a source of uniformly distributed floats in `[0, 1)`, such as a platform RNG.
///
/// # Examples
/// ```
/// use celtic_dice::dice::roller::{Roller, Unit as UnitRoller};
///
/// let mut samples = [0.0, 0.5, 0.99].into_iter();
/// let mut roller = UnitRoller(move || samples.next().unwrap_or(0.0));
/// assert_eq!(roller.roll_dice(3, 6)?, vec![1, 4, 6]);
/// # Ok::<(), celtic_dice::dice::Error>(())
/// ```
#[derive(Debug, Clone)]
#[expect(clippy::exhaustive_structs, reason = "Plain wrapper around the source")]
pub struct Unit<F: FnMut() -> f64>(pub F);

impl<F: FnMut() -> f64> Roller for Unit<F> {
	/// Scales the next sample onto `1..=sides`. Samples outside of `[0, 1)` are clamped onto the nearest face, and
	/// non-finite samples land on the lowest face.
	#[expect(
		clippy::cast_possible_truncation,
		clippy::cast_sign_loss,
		reason = "The value is clamped to the range of a u8 beforehand"
	)]
	fn roll_die(&mut self, sides: u8) -> u8 {
		let sample = (self.0)();
		let sample = if sample.is_finite() { sample.clamp(0.0, 1.0) } else { 0.0 };
		let face = (sample * f64::from(sides)).floor() + 1.0;
		face.clamp(1.0, f64::from(sides.max(1))) as u8
	}
}

/// Generates rolls that always have a specific value.
///
/// # Examples
/// ```
/// use celtic_dice::dice::roller::{Roller, Val as ValRoller};
///
/// let mut roller = ValRoller(4);
/// assert_eq!(roller.roll_dice(3, 6)?, vec![4, 4, 4]);
/// # Ok::<(), celtic_dice::dice::Error>(())
/// ```
#[derive(Debug, Default, Clone)]
#[expect(clippy::exhaustive_structs, reason = "Highly unlikely to change")]
pub struct Val(pub u8);

impl Roller for Val {
	/// Rolls a single die, always with one specific value.
	#[inline]
	fn roll_die(&mut self, _sides: u8) -> u8 {
		self.0
	}
}

/// Generates rolls that always have their max value.
///
/// # Examples
/// ```
/// use celtic_dice::dice::roller::{Max as MaxRoller, Roller};
///
/// let mut roller = MaxRoller;
/// assert_eq!(roller.roll_dice(2, 20)?, vec![20, 20]);
/// # Ok::<(), celtic_dice::dice::Error>(())
/// ```
#[derive(Debug, Default, Clone)]
#[expect(clippy::exhaustive_structs, reason = "Highly unlikely to change")]
pub struct Max;

impl Roller for Max {
	/// Rolls a single die, always with the max value (same as the number of sides).
	#[inline]
	fn roll_die(&mut self, sides: u8) -> u8 {
		sides
	}
}

/// Generates rolls from an iterator of values. Mainly useful for testing purposes.
///
/// # Examples
/// ```
/// use celtic_dice::dice::roller::{Iter as IterRoller, Roller};
///
/// let mut roller = IterRoller::new(vec![1, 2, 3, 4, 10]);
/// assert_eq!(roller.roll_dice(5, 6)?, vec![1, 2, 3, 4, 10]);
/// assert!(!roller.can_roll());
/// # Ok::<(), celtic_dice::dice::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Iter<I: Iterator<Item = u8>>(Peekable<I>);

impl<I: Iterator<Item = u8>> Iter<I> {
	/// Checks whether the iterator still has values available.
	#[inline]
	pub fn can_roll(&mut self) -> bool {
		self.0.peek().is_some()
	}

	/// Creates a new roller that uses the given iterator to provide roll values.
	#[must_use]
	#[inline]
	pub fn new(iter: impl IntoIterator<IntoIter = I>) -> Self {
		Self(iter.into_iter().peekable())
	}
}

impl<I: Iterator<Item = u8>> Roller for Iter<I> {
	/// Rolls a die with the value from the next iteration.
	///
	/// # Panics
	/// If the iterator has finished, this will panic.
	#[inline]
	#[expect(
		clippy::expect_used,
		reason = "Mostly for testing, otherwise manual checking of can_roll() is expected"
	)]
	fn roll_die(&mut self, _sides: u8) -> u8 {
		self.0.next().expect("iterator is finished")
	}
}
