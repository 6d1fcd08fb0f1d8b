//! Summing kept dice and applying the flat modifier.

use serde::{Deserialize, Serialize};

use super::ApplyTo;

/// Result of summing a set of kept dice and applying a modifier to them
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[expect(clippy::exhaustive_structs, reason = "Plain record")]
pub struct Calculation {
	/// Sum of the kept dice before the modifier
	pub base_sum: i64,

	/// Each kept die after the modifier was added to it, only present when a nonzero modifier applied to each die
	#[serde(skip_serializing_if = "Option::is_none")]
	pub modified_rolls: Option<Vec<i64>>,

	/// Final total
	pub final_result: i64,

	/// Modifier that was applied
	pub modifier: i32,

	/// Where the modifier was applied
	pub apply_to: ApplyTo,
}

impl Calculation {
	/// Sums a set of kept dice and applies a modifier to them.
	///
	/// - [`ApplyTo::Each`]: the modifier is added to every die, each of which can't go below 1, then they're summed.
	/// - [`ApplyTo::Sum`]: the dice are summed and the modifier is added once. The total can't go below the number of
	///   kept dice (1 per die).
	///
	/// A modifier of zero always yields the plain sum and reports [`ApplyTo::Sum`].
	///
	/// # Examples
	/// ```
	/// use celtic_dice::dice::{ApplyTo, Calculation};
	///
	/// let calc = Calculation::calculate(&[3, 4, 5], -10, ApplyTo::Each);
	/// assert_eq!(calc.modified_rolls, Some(vec![1, 1, 1]));
	/// assert_eq!(calc.final_result, 3);
	///
	/// let calc = Calculation::calculate(&[1, 1], -5, ApplyTo::Sum);
	/// assert_eq!(calc.base_sum, 2);
	/// assert_eq!(calc.final_result, 2);
	/// ```
	#[must_use]
	pub fn calculate(kept: &[u8], modifier: i32, apply_to: ApplyTo) -> Self {
		let base_sum = kept.iter().copied().map(i64::from).sum::<i64>();

		if modifier == 0 {
			return Self {
				base_sum,
				modified_rolls: None,
				final_result: base_sum,
				modifier: 0,
				apply_to: ApplyTo::Sum,
			};
		}

		let bonus = i64::from(modifier);
		match apply_to {
			ApplyTo::Each => {
				let modified = kept
					.iter()
					.map(|&roll| i64::from(roll).saturating_add(bonus).max(1))
					.collect::<Vec<_>>();
				let final_result = modified.iter().sum();

				Self {
					base_sum,
					modified_rolls: Some(modified),
					final_result,
					modifier,
					apply_to,
				}
			}
			ApplyTo::Sum => {
				let floor = i64::try_from(kept.len()).unwrap_or(i64::MAX);

				Self {
					base_sum,
					modified_rolls: None,
					final_result: base_sum.saturating_add(bonus).max(floor),
					modifier,
					apply_to,
				}
			}
		}
	}
}
