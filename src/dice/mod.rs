//! All functionality for describing a pool of dice to roll, rolling it, and working with the resulting rolls.
//!
//! This is the home of the dice "primitives". For rolling with history tracking, see [`RollEngine`].
//!
//! [`RollEngine`]: crate::engine::RollEngine

pub mod calc;
pub mod modifier;
pub mod roller;

use core::fmt;

use serde::{Deserialize, Serialize};

use self::modifier::AdvancedOptions;
pub use self::{calc::Calculation, roller::Roller};

/// Fewest dice that can be rolled at once
pub const MIN_COUNT: u8 = 1;

/// Most dice that can be rolled at once
pub const MAX_COUNT: u8 = 100;

/// Fewest sides a die can have
pub const MIN_SIDES: u8 = 2;

/// Most sides a die can have
pub const MAX_SIDES: u8 = 100;

/// Lowest value a per-die cap can be set to
pub const MIN_CAP: u8 = 1;

/// Highest value a per-die cap can be set to
pub const MAX_CAP: u8 = 100;

/// Where the flat modifier of a [`RollConfig`] is applied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[expect(clippy::exhaustive_enums, reason = "Only two places a modifier can go")]
pub enum ApplyTo {
	/// Added once to the total of all kept dice
	#[default]
	Sum,

	/// Added to every kept die individually before summing
	Each,
}

impl ApplyTo {
	/// Interprets a user-provided value, coercing anything other than `"each"` to [`Self::Sum`].
	///
	/// # Examples
	/// ```
	/// use celtic_dice::dice::ApplyTo;
	///
	/// assert_eq!(ApplyTo::from_input("each"), ApplyTo::Each);
	/// assert_eq!(ApplyTo::from_input("sum"), ApplyTo::Sum);
	/// assert_eq!(ApplyTo::from_input("everything"), ApplyTo::Sum);
	/// ```
	#[must_use]
	pub fn from_input(input: &str) -> Self {
		match input {
			"each" => Self::Each,
			_ => Self::Sum,
		}
	}

	/// Gets the name used for this placement in serialized configurations.
	#[must_use]
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Sum => "sum",
			Self::Each => "each",
		}
	}
}

impl fmt::Display for ApplyTo {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Full description of a single roll: a pool of dice, the advanced options to run the rolls through, and a flat
/// modifier.
///
/// Counts of zero for the drop/reroll options and [`None`] for the caps disable the respective step.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[expect(clippy::exhaustive_structs, reason = "Constructed directly by callers with struct update syntax")]
pub struct RollConfig {
	/// Number of dice to roll (1-100)
	pub count: u8,

	/// Number of sides for each die (2-100)
	pub sides: u8,

	/// Flat value added to the result
	pub modifier: i32,

	/// Whether the modifier is added to the total or to each kept die
	pub apply_to: ApplyTo,

	/// Number of highest dice to drop
	pub drop_highest: u32,

	/// Number of lowest dice to drop
	pub drop_lowest: u32,

	/// Number of highest dice to reroll once
	pub reroll_highest: u32,

	/// Number of lowest dice to reroll once
	pub reroll_lowest: u32,

	/// Minimum value any single die can have
	pub min_cap: Option<u8>,

	/// Maximum value any single die can have
	pub max_cap: Option<u8>,
}

impl RollConfig {
	/// Creates a new roll configuration with a given count and number of sides and no other options.
	#[must_use]
	pub const fn new(count: u8, sides: u8) -> Self {
		Self {
			count,
			sides,
			modifier: 0,
			apply_to: ApplyTo::Sum,
			drop_highest: 0,
			drop_lowest: 0,
			reroll_highest: 0,
			reroll_lowest: 0,
			min_cap: None,
			max_cap: None,
		}
	}

	/// Creates a new roll configuration builder.
	#[must_use]
	#[inline]
	pub fn builder() -> Builder {
		Builder::default()
	}

	/// Extracts the options that are applied to the dice between rolling and summing.
	#[must_use]
	pub const fn advanced_options(&self) -> AdvancedOptions {
		AdvancedOptions {
			sides: self.sides,
			min_cap: self.min_cap,
			max_cap: self.max_cap,
			reroll_highest: self.reroll_highest,
			reroll_lowest: self.reroll_lowest,
			drop_highest: self.drop_highest,
			drop_lowest: self.drop_lowest,
		}
	}

	/// Indicates whether any drop, reroll, or cap option is in effect.
	///
	/// # Examples
	/// ```
	/// use celtic_dice::RollConfig;
	///
	/// assert!(!RollConfig::new(4, 6).has_advanced_options());
	/// assert!(RollConfig::builder().count(4).sides(6).drop_lowest(1).build().has_advanced_options());
	/// assert!(RollConfig::builder().count(4).sides(6).min_cap(2).build().has_advanced_options());
	/// ```
	#[must_use]
	pub const fn has_advanced_options(&self) -> bool {
		self.drop_highest > 0
			|| self.drop_lowest > 0
			|| self.reroll_highest > 0
			|| self.reroll_lowest > 0
			|| self.min_cap.is_some()
			|| self.max_cap.is_some()
	}

	/// Checks that the configuration is within the domain the dice engine accepts.
	///
	/// # Errors
	/// If the count, sides, or either cap is out of range, the corresponding error variant is returned.
	///
	/// # Examples
	/// ```
	/// use celtic_dice::{dice::Error, RollConfig};
	///
	/// assert!(RollConfig::new(4, 6).validate().is_ok());
	/// assert_eq!(RollConfig::new(4, 1).validate(), Err(Error::InvalidSides(1)));
	/// assert_eq!(RollConfig::new(0, 6).validate(), Err(Error::InvalidCount(0)));
	/// ```
	pub fn validate(&self) -> Result<(), Error> {
		if !(MIN_COUNT..=MAX_COUNT).contains(&self.count) {
			return Err(Error::InvalidCount(self.count));
		}
		if !(MIN_SIDES..=MAX_SIDES).contains(&self.sides) {
			return Err(Error::InvalidSides(self.sides));
		}
		for cap in [self.min_cap, self.max_cap].into_iter().flatten() {
			if !(MIN_CAP..=MAX_CAP).contains(&cap) {
				return Err(Error::InvalidCap(cap));
			}
		}

		Ok(())
	}
}

impl Default for RollConfig {
	/// Creates the default roll configuration (1d6).
	#[inline]
	fn default() -> Self {
		Self::new(1, 6)
	}
}

impl fmt::Display for RollConfig {
	/// Formats the configuration as its canonical roll expression.
	///
	/// Tokens always appear in the same order: `{count}d{sides}`, `dh`, `dl`, `rh`, `rl`, `min`, `max`, then the
	/// signed modifier (suffixed with `(each)` when applied to each die). Disabled options are left out entirely.
	///
	/// # Examples
	/// ```
	/// use celtic_dice::{dice::ApplyTo, RollConfig};
	///
	/// let config = RollConfig::builder().count(4).sides(6).drop_lowest(1).modifier(2).build();
	/// assert_eq!(config.to_string(), "4d6dl1+2");
	///
	/// let config = RollConfig::builder()
	/// 	.count(3)
	/// 	.sides(8)
	/// 	.reroll_lowest(1)
	/// 	.max_cap(7)
	/// 	.modifier(-1)
	/// 	.apply_to(ApplyTo::Each)
	/// 	.build();
	/// assert_eq!(config.to_string(), "3d8rl1max7-1(each)");
	/// ```
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}d{}", self.count, self.sides)?;

		for (token, count) in [
			("dh", self.drop_highest),
			("dl", self.drop_lowest),
			("rh", self.reroll_highest),
			("rl", self.reroll_lowest),
		] {
			if count > 0 {
				write!(f, "{token}{count}")?;
			}
		}

		if let Some(min) = self.min_cap {
			write!(f, "min{min}")?;
		}
		if let Some(max) = self.max_cap {
			write!(f, "max{max}")?;
		}

		if self.modifier != 0 {
			write!(f, "{:+}", self.modifier)?;
			if self.apply_to == ApplyTo::Each {
				f.write_str("(each)")?;
			}
		}

		Ok(())
	}
}

/// An error resulting from a dice operation
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
	/// A die was requested with a number of sides outside of 2-100.
	///
	/// # Examples
	/// ```
	/// use celtic_dice::dice::{roller::{Max as MaxRoller, Roller}, Error};
	///
	/// assert_eq!(MaxRoller.roll_single_die(1), Err(Error::InvalidSides(1)));
	/// ```
	#[error("dice must have between 2 and 100 sides, got {0}")]
	InvalidSides(u8),

	/// A roll was requested with a number of dice outside of 1-100.
	#[error("between 1 and 100 dice must be rolled, got {0}")]
	InvalidCount(u8),

	/// A per-die cap was set outside of 1-100.
	#[error("die caps must be between 1 and 100, got {0}")]
	InvalidCap(u8),
}

/// Builds a [`RollConfig`] with a fluent interface.
///
/// # Examples
///
/// ## Basic dice
/// ```
/// use celtic_dice::RollConfig;
///
/// let config = RollConfig::builder().count(2).sides(6).build();
/// assert_eq!(config, RollConfig::new(2, 6));
/// ```
///
/// ## Advanced options
/// ```
/// use celtic_dice::{dice::ApplyTo, RollConfig};
///
/// let config = RollConfig::builder()
/// 	.count(4)
/// 	.sides(6)
/// 	.reroll_lowest(1)
/// 	.drop_lowest(1)
/// 	.modifier(1)
/// 	.apply_to(ApplyTo::Each)
/// 	.build();
/// assert_eq!(
/// 	config,
/// 	RollConfig {
/// 		reroll_lowest: 1,
/// 		drop_lowest: 1,
/// 		modifier: 1,
/// 		apply_to: ApplyTo::Each,
/// 		..RollConfig::new(4, 6)
/// 	},
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct Builder(RollConfig);

impl Builder {
	/// Sets the number of dice to roll.
	#[must_use]
	pub const fn count(mut self, count: u8) -> Self {
		self.0.count = count;
		self
	}

	/// Sets the number of sides per die.
	#[must_use]
	pub const fn sides(mut self, sides: u8) -> Self {
		self.0.sides = sides;
		self
	}

	/// Sets the flat modifier.
	#[must_use]
	pub const fn modifier(mut self, modifier: i32) -> Self {
		self.0.modifier = modifier;
		self
	}

	/// Sets where the flat modifier is applied.
	#[must_use]
	pub const fn apply_to(mut self, apply_to: ApplyTo) -> Self {
		self.0.apply_to = apply_to;
		self
	}

	/// Sets the number of highest dice to drop.
	#[must_use]
	pub const fn drop_highest(mut self, count: u32) -> Self {
		self.0.drop_highest = count;
		self
	}

	/// Sets the number of lowest dice to drop.
	#[must_use]
	pub const fn drop_lowest(mut self, count: u32) -> Self {
		self.0.drop_lowest = count;
		self
	}

	/// Sets the number of highest dice to reroll.
	#[must_use]
	pub const fn reroll_highest(mut self, count: u32) -> Self {
		self.0.reroll_highest = count;
		self
	}

	/// Sets the number of lowest dice to reroll.
	#[must_use]
	pub const fn reroll_lowest(mut self, count: u32) -> Self {
		self.0.reroll_lowest = count;
		self
	}

	/// Sets the minimum value of each die.
	#[must_use]
	pub const fn min_cap(mut self, min: u8) -> Self {
		self.0.min_cap = Some(min);
		self
	}

	/// Sets the maximum value of each die.
	#[must_use]
	pub const fn max_cap(mut self, max: u8) -> Self {
		self.0.max_cap = Some(max);
		self
	}

	/// Finalizes the configuration.
	#[must_use]
	pub fn build(self) -> RollConfig {
		self.0
	}
}
