//! The roll engine: runs complete rolls from a [`RollConfig`] and keeps a bounded history of the results.

use core::fmt;
use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "fastrand")]
use crate::dice::roller::FastRand;
use crate::dice::{
	modifier::{AdvancedOptions, Processed},
	roller::Roller,
	ApplyTo, Calculation, Error, RollConfig,
};

/// Maximum number of results kept in an engine's history
pub const HISTORY_CAPACITY: usize = 100;

/// Number of results [`RollEngine::recent_history()`] returns
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Number of results [`RollEngine::recent_statistics()`] analyzes
pub const DEFAULT_STATISTICS_LIMIT: usize = 50;

/// Source of timestamps for roll results
pub trait Clock {
	/// Gets the current time.
	#[must_use]
	fn now(&self) -> DateTime<Utc>;
}

/// Clock that reads the system time
#[derive(Debug, Default, Clone, Copy)]
#[expect(clippy::exhaustive_structs, reason = "Unit struct")]
pub struct SystemClock;

impl Clock for SystemClock {
	#[inline]
	fn now(&self) -> DateTime<Utc> {
		Utc::now()
	}
}

impl<F: Fn() -> DateTime<Utc>> Clock for F {
	#[inline]
	fn now(&self) -> DateTime<Utc> {
		self()
	}
}

/// Identifier of a single roll result, made of the roll's timestamp (in milliseconds) and a sequence number that is
/// unique within the engine that produced it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RollId(String);

impl RollId {
	/// Builds an ID from a timestamp and a sequence number.
	fn new(timestamp: DateTime<Utc>, seq: u64) -> Self {
		Self(format!("roll_{}_{seq}", timestamp.timestamp_millis()))
	}

	/// Gets the ID as a string slice.
	#[must_use]
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for RollId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Everything produced by a single complete roll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct RollResult {
	/// Unique identifier of the roll
	pub id: RollId,

	/// When the roll was made
	pub timestamp: DateTime<Utc>,

	/// Configuration that was rolled
	pub config: RollConfig,

	/// Values of the dice as first rolled, before any advanced options
	pub initial_rolls: Vec<u8>,

	/// Dice after capping, rerolling, and dropping
	#[serde(rename = "processedResults")]
	pub processed: Processed,

	/// Sum of the kept dice with the modifier applied
	pub calculation: Calculation,

	/// Canonical expression of the configuration that was rolled
	#[serde(rename = "rollExpression")]
	pub expression: String,
}

impl RollResult {
	/// Gets the final total of the roll.
	#[must_use]
	#[inline]
	pub const fn total(&self) -> i64 {
		self.calculation.final_result
	}

	/// Builds the value of each die in roll order after the pipeline ran, along with whether it was dropped.
	fn final_dice(&self) -> Vec<(u8, bool)> {
		let mut kept = self.processed.kept.iter();
		(0..self.initial_rolls.len())
			.filter_map(|index| {
				match self.processed.dropped.iter().find(|dropped| dropped.index == index) {
					Some(dropped) => Some((dropped.value, true)),
					None => kept.next().map(|&val| (val, false)),
				}
			})
			.collect()
	}
}

/// Trait to allow creation of expanded descriptions with individual die rolls listed
pub trait Describe {
	/// Builds a detailed expression string with all of the individual results that occurred (ideally, up to
	/// `list_limit` of them).
	#[must_use]
	fn describe(&self, list_limit: Option<usize>) -> String;
}

impl Describe for RollResult {
	/// Builds a string of the roll's expression and a list of the final value of every die. Rerolled dice are
	/// appended with ` (r)`, and dropped dice with ` (d)`.
	///
	/// If `list_limit` is specified and there are more dice than it, the list will be truncated and appended with
	/// "X more..." (where X is the remaining die count past the max).
	///
	/// # Examples
	/// ```
	/// use celtic_dice::{dice::roller::Iter as IterRoller, engine::{Describe, RollEngine}, RollConfig};
	///
	/// let mut engine = RollEngine::new(IterRoller::new([6, 2, 5, 3]));
	/// let config = RollConfig::builder().count(4).sides(6).drop_lowest(2).build();
	/// let result = engine.execute_roll(&config)?;
	///
	/// assert_eq!(result.describe(None), "4d6dl2[6, 2 (d), 5, 3 (d)]");
	/// assert_eq!(result.describe(Some(2)), "4d6dl2[6, 2 (d), 2 more...]");
	/// # Ok::<(), celtic_dice::dice::Error>(())
	/// ```
	fn describe(&self, list_limit: Option<usize>) -> String {
		let list_limit = list_limit.unwrap_or(usize::MAX);
		let dice = self.final_dice();
		let truncated = dice.len().saturating_sub(list_limit);

		format!(
			"{}[{}{}]",
			self.expression,
			dice.iter()
				.enumerate()
				.take(list_limit)
				.map(|(index, &(val, dropped))| {
					let rerolled = self.processed.rerolled.iter().any(|reroll| reroll.index == index);
					format!(
						"{val}{}{}",
						if rerolled { " (r)" } else { "" },
						if dropped { " (d)" } else { "" }
					)
				})
				.collect::<Vec<_>>()
				.join(", "),
			if truncated > 0 {
				format!(", {truncated} more...")
			} else {
				String::new()
			}
		)
	}
}

impl fmt::Display for RollResult {
	/// Formats the value using the given formatter. [Read more][core::fmt::Debug::fmt()]
	///
	/// The output is the description of the roll (see [`Self::describe()`]) followed by its total.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} = {}", self.describe(None), self.total())
	}
}

/// Aggregate figures over a number of recent roll results
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct Statistics {
	/// Number of results analyzed
	pub total_rolls: usize,

	/// Mean of the final results, rounded to two decimal places
	pub average: f64,

	/// Lowest final result
	pub min: i64,

	/// Highest final result
	pub max: i64,

	/// Sum of the final results
	pub sum: i64,
}

/// Rolls dice configurations to completion and keeps the most recent results.
///
/// # Examples
/// ```
/// use celtic_dice::{dice::roller::Iter as IterRoller, engine::RollEngine, RollConfig};
///
/// let mut engine = RollEngine::new(IterRoller::new([3, 1, 6, 4]));
/// let config = RollConfig::builder().count(4).sides(6).drop_lowest(1).modifier(2).build();
///
/// let result = engine.execute_roll(&config)?;
/// assert_eq!(result.expression, "4d6dl1+2");
/// assert_eq!(result.processed.kept, vec![3, 6, 4]);
/// assert_eq!(result.total(), 15);
/// assert_eq!(engine.history(5).count(), 1);
/// # Ok::<(), celtic_dice::dice::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct RollEngine<R, C = SystemClock> {
	/// Source of die values
	roller: R,

	/// Source of timestamps
	clock: C,

	/// Results, most recent first
	history: VecDeque<RollResult>,

	/// Sequence number for the next roll ID
	next_seq: u64,
}

impl<R: Roller> RollEngine<R> {
	/// Creates a new engine that rolls with the given roller and timestamps results with the system clock.
	#[must_use]
	pub fn new(roller: R) -> Self {
		Self::with_clock(roller, SystemClock)
	}
}

#[cfg(all(feature = "fastrand", feature = "std"))]
impl Default for RollEngine<FastRand> {
	/// Creates an engine with a randomly seeded fastrand roller and the system clock.
	fn default() -> Self {
		Self::new(FastRand::default())
	}
}

impl<R: Roller, C: Clock> RollEngine<R, C> {
	/// Creates a new engine that rolls with the given roller and timestamps results with the given clock.
	#[must_use]
	pub fn with_clock(roller: R, clock: C) -> Self {
		Self {
			roller,
			clock,
			history: VecDeque::with_capacity(HISTORY_CAPACITY),
			next_seq: 0,
		}
	}

	/// Rolls a single die with 2-100 sides.
	///
	/// # Errors
	/// If `sides` is out of range, [`Error::InvalidSides`] is returned.
	#[inline]
	pub fn roll_single_die(&mut self, sides: u8) -> Result<u8, Error> {
		self.roller.roll_single_die(sides)
	}

	/// Rolls `count` dice with 2-100 sides, in order.
	///
	/// # Errors
	/// If `sides` is out of range, [`Error::InvalidSides`] is returned.
	#[inline]
	pub fn roll_multiple_dice(&mut self, count: u8, sides: u8) -> Result<Vec<u8>, Error> {
		self.roller.roll_dice(count, sides)
	}

	/// Runs a set of rolls through the cap, reroll, and drop pipeline. See [`AdvancedOptions::apply()`].
	///
	/// # Errors
	/// If a reroll is needed and the options' sides are out of range, [`Error::InvalidSides`] is returned.
	#[inline]
	pub fn apply_advanced_options(&mut self, rolls: &[u8], options: &AdvancedOptions) -> Result<Processed, Error> {
		options.apply(rolls, &mut self.roller)
	}

	/// Sums kept dice and applies a modifier. See [`Calculation::calculate()`].
	#[must_use]
	#[inline]
	pub fn calculate_result(&self, kept: &[u8], modifier: i32, apply_to: ApplyTo) -> Calculation {
		Calculation::calculate(kept, modifier, apply_to)
	}

	/// Builds the canonical expression for a configuration (e.g. `4d6dl1+2`).
	#[must_use]
	#[inline]
	pub fn build_roll_expression(&self, config: &RollConfig) -> String {
		config.to_string()
	}

	/// Rolls a configuration to completion: rolls the dice, runs them through the pipeline, calculates the total,
	/// and records the result in the history.
	///
	/// # Errors
	/// If the configuration's count, sides, or caps are out of range, the corresponding error variant is returned
	/// and nothing is recorded.
	pub fn execute_roll(&mut self, config: &RollConfig) -> Result<RollResult, Error> {
		config.validate()?;

		let initial_rolls = self.roll_multiple_dice(config.count, config.sides)?;
		let processed = self.apply_advanced_options(&initial_rolls, &config.advanced_options())?;
		let calculation = self.calculate_result(&processed.kept, config.modifier, config.apply_to);

		let timestamp = self.clock.now();
		let id = RollId::new(timestamp, self.next_seq);
		self.next_seq = self.next_seq.wrapping_add(1);

		let result = RollResult {
			id,
			timestamp,
			config: config.clone(),
			initial_rolls,
			processed,
			calculation,
			expression: self.build_roll_expression(config),
		};
		tracing::debug!(id = %result.id, expression = %result.expression, total = result.total(), "executed roll");

		self.push_history(result.clone());
		Ok(result)
	}

	/// Adds a result to the front of the history, evicting the oldest one past capacity.
	fn push_history(&mut self, result: RollResult) {
		self.history.push_front(result);
		self.history.truncate(HISTORY_CAPACITY);
	}

	/// Gets up to `limit` of the most recent results, most recent first.
	pub fn history(&self, limit: usize) -> impl Iterator<Item = &RollResult> {
		self.history.iter().take(limit)
	}

	/// Gets the [`DEFAULT_HISTORY_LIMIT`] most recent results, most recent first.
	pub fn recent_history(&self) -> impl Iterator<Item = &RollResult> {
		self.history(DEFAULT_HISTORY_LIMIT)
	}

	/// Gets the number of results currently in the history.
	#[must_use]
	#[inline]
	pub fn history_len(&self) -> usize {
		self.history.len()
	}

	/// Removes every result from the history.
	pub fn clear_history(&mut self) {
		self.history.clear();
		tracing::debug!("cleared roll history");
	}

	/// Calculates statistics over the final results of up to `limit` of the most recent rolls.
	/// Returns [`None`] when there is nothing to analyze.
	///
	/// # Examples
	/// ```
	/// use celtic_dice::{dice::roller::Iter as IterRoller, engine::RollEngine, RollConfig};
	///
	/// let mut engine = RollEngine::new(IterRoller::new([2, 5, 6]));
	/// assert!(engine.statistics(50).is_none());
	///
	/// let config = RollConfig::new(1, 6);
	/// for _ in 0..3 {
	/// 	engine.execute_roll(&config)?;
	/// }
	///
	/// let stats = engine.statistics(50).unwrap();
	/// assert_eq!(stats.total_rolls, 3);
	/// assert_eq!(stats.average, 4.33);
	/// assert_eq!((stats.min, stats.max, stats.sum), (2, 6, 13));
	/// # Ok::<(), celtic_dice::dice::Error>(())
	/// ```
	#[must_use]
	#[expect(clippy::cast_precision_loss, reason = "Totals are far below 2^52")]
	pub fn statistics(&self, limit: usize) -> Option<Statistics> {
		let results = self.history(limit).map(RollResult::total).collect::<Vec<_>>();
		let min = results.iter().copied().min()?;
		let max = results.iter().copied().max()?;
		let sum = results.iter().sum::<i64>();
		let average = sum as f64 / results.len() as f64;

		Some(Statistics {
			total_rolls: results.len(),
			average: (average * 100.0).round() / 100.0,
			min,
			max,
			sum,
		})
	}

	/// Calculates statistics over the [`DEFAULT_STATISTICS_LIMIT`] most recent rolls.
	#[must_use]
	pub fn recent_statistics(&self) -> Option<Statistics> {
		self.statistics(DEFAULT_STATISTICS_LIMIT)
	}

	/// Gets the current time from the engine's clock.
	#[must_use]
	#[inline]
	pub fn now(&self) -> DateTime<Utc> {
		self.clock.now()
	}

	/// Gets a mutable reference to the engine's roller.
	#[inline]
	pub fn roller_mut(&mut self) -> &mut R {
		&mut self.roller
	}
}
