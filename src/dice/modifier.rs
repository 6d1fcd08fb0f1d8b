//! The pipeline of advanced options applied to freshly rolled dice before they are summed.
//!
//! Options always run in the same order: capping, then rerolling, then dropping.

use serde::{Deserialize, Serialize};

use super::{roller::Roller, Error};

/// Options that transform a rolled dice pool before it is summed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[expect(clippy::exhaustive_structs, reason = "Mirrors the advanced fields of RollConfig")]
pub struct AdvancedOptions {
	/// Number of sides to use when rerolling dice
	pub sides: u8,

	/// Minimum value any single die can have
	pub min_cap: Option<u8>,

	/// Maximum value any single die can have
	pub max_cap: Option<u8>,

	/// Number of highest dice to reroll once
	pub reroll_highest: u32,

	/// Number of lowest dice to reroll once
	pub reroll_lowest: u32,

	/// Number of highest dice to drop
	pub drop_highest: u32,

	/// Number of lowest dice to drop
	pub drop_lowest: u32,
}

impl AdvancedOptions {
	/// Runs a set of rolls through the full pipeline, using a given roller for any rerolls.
	///
	/// 1. Each die is clamped to the caps that are present.
	/// 2. The lowest `reroll_lowest` dice, then the highest `reroll_highest` dice are rerolled once each. Both windows
	///    are picked from a single ranking of the capped values, so a die is only rerolled twice when they overlap.
	/// 3. The lowest `drop_lowest` and highest `drop_highest` dice of the post-reroll values are dropped. Each count is
	///    limited to one less than the pool size, and at least one die always survives.
	///
	/// Rankings sort ascending by value, with ties going to the die rolled first.
	///
	/// # Errors
	/// If a reroll is needed and `sides` is outside of 2-100, [`Error::InvalidSides`] is returned.
	///
	/// # Examples
	/// ```
	/// use celtic_dice::dice::{modifier::{AdvancedOptions, Dropped}, roller::Max as MaxRoller};
	///
	/// let options = AdvancedOptions {
	/// 	sides: 6,
	/// 	drop_lowest: 1,
	/// 	..AdvancedOptions::default()
	/// };
	/// let processed = options.apply(&[4, 1, 6, 3], &mut MaxRoller)?;
	/// assert_eq!(processed.kept, vec![4, 6, 3]);
	/// assert_eq!(processed.dropped, vec![Dropped { value: 1, index: 1 }]);
	/// assert!(processed.rerolled.is_empty());
	/// # Ok::<(), celtic_dice::dice::Error>(())
	/// ```
	pub fn apply(&self, rolls: &[u8], rng: &mut impl Roller) -> Result<Processed, Error> {
		let mut vals = rolls.to_vec();
		self.apply_caps(&mut vals);
		let rerolled = self.apply_rerolls(&mut vals, rng)?;
		let (kept, dropped) = self.apply_drops(vals);

		tracing::trace!(
			kept = kept.len(),
			dropped = dropped.len(),
			rerolled = rerolled.len(),
			"applied advanced options"
		);

		Ok(Processed {
			kept,
			dropped,
			rerolled,
		})
	}

	/// Clamps every die to the caps that are present.
	fn apply_caps(&self, vals: &mut [u8]) {
		for val in vals {
			if let Some(min) = self.min_cap {
				if *val < min {
					*val = min;
				}
			}
			if let Some(max) = self.max_cap {
				if *val > max {
					*val = max;
				}
			}
		}
	}

	/// Rerolls the lowest and then the highest dice, replacing their values in place.
	fn apply_rerolls(&self, vals: &mut [u8], rng: &mut impl Roller) -> Result<Vec<Reroll>, Error> {
		if self.reroll_lowest == 0 && self.reroll_highest == 0 {
			return Ok(Vec::new());
		}

		let order = ranked(vals);
		let low = window(self.reroll_lowest, vals.len());
		let high = window(self.reroll_highest, vals.len());

		let lowest = order.iter().take(low);
		let highest = order.iter().skip(order.len().saturating_sub(high));

		let mut rerolled = Vec::with_capacity(low.saturating_add(high));
		for &index in lowest.chain(highest) {
			let Some(val) = vals.get_mut(index) else {
				continue;
			};
			let new = rng.roll_single_die(self.sides)?;
			rerolled.push(Reroll {
				original: *val,
				new,
				index,
			});
			*val = new;
		}

		Ok(rerolled)
	}

	/// Splits the dice into the kept values (in roll order) and the dropped dice (in ascending rank order).
	fn apply_drops(&self, vals: Vec<u8>) -> (Vec<u8>, Vec<Dropped>) {
		if vals.is_empty() || (self.drop_lowest == 0 && self.drop_highest == 0) {
			return (vals, Vec::new());
		}

		let len = vals.len();
		let max_drop = len.saturating_sub(1);
		let low = window(self.drop_lowest, max_drop);
		let high = window(self.drop_highest, max_drop);

		// Mark ranks for removal; a rank in both windows is only marked once
		let mut drop_rank = vec![false; len];
		for (rank, marked) in drop_rank.iter_mut().enumerate() {
			*marked = rank < low || rank >= len.saturating_sub(high);
		}

		// Overlapping windows can cover the whole pool, so spare the first die above the low window
		if drop_rank.iter().all(|&marked| marked) {
			if let Some(marked) = drop_rank.get_mut(low) {
				*marked = false;
			}
		}

		let order = ranked(&vals);
		let mut is_dropped = vec![false; len];
		let mut dropped = Vec::new();
		for (&index, _) in order.iter().zip(&drop_rank).filter(|&(_, &marked)| marked) {
			if let (Some(&value), Some(flag)) = (vals.get(index), is_dropped.get_mut(index)) {
				*flag = true;
				dropped.push(Dropped { value, index });
			}
		}

		let kept = vals
			.into_iter()
			.zip(is_dropped)
			.filter(|&(_, dropped)| !dropped)
			.map(|(val, _)| val)
			.collect();

		(kept, dropped)
	}
}

/// Details about a die that was rerolled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[expect(clippy::exhaustive_structs, reason = "Plain record")]
pub struct Reroll {
	/// Value of the die before it was rerolled
	pub original: u8,

	/// Value the die was rerolled to
	pub new: u8,

	/// Position of the die in the original roll order
	pub index: usize,
}

/// Details about a die that was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[expect(clippy::exhaustive_structs, reason = "Plain record")]
pub struct Dropped {
	/// Value of the die at the time it was dropped
	pub value: u8,

	/// Position of the die in the original roll order
	pub index: usize,
}

/// Dice produced from running rolls through the [`AdvancedOptions`] pipeline
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[expect(clippy::exhaustive_structs, reason = "Plain record")]
pub struct Processed {
	/// Values of the dice that survived, in their original roll order
	#[serde(rename = "keptRolls")]
	pub kept: Vec<u8>,

	/// Dice that were dropped, lowest ranked first
	#[serde(rename = "droppedRolls")]
	pub dropped: Vec<Dropped>,

	/// Every reroll that was made, in the order they were made
	#[serde(rename = "rerolledRolls")]
	pub rerolled: Vec<Reroll>,
}

/// Ranks dice ascending by value, with the earlier die first among equal values.
fn ranked(vals: &[u8]) -> Vec<usize> {
	let mut order = (0..vals.len()).collect::<Vec<_>>();
	order.sort_by_key(|&index| vals.get(index).copied());
	order
}

/// Converts a requested die count into a window size no larger than `limit`.
fn window(count: u32, limit: usize) -> usize {
	usize::try_from(count).map_or(limit, |count| count.min(limit))
}
