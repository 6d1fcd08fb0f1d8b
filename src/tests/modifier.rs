#[cfg(feature = "fastrand")]
use crate::dice::roller::{FastRand as FastRandRoller, Roller};
use crate::dice::{
	modifier::{AdvancedOptions, Dropped, Processed, Reroll},
	roller::{Iter as IterRoller, Max as MaxRoller},
	Error,
};

fn options(sides: u8) -> AdvancedOptions {
	AdvancedOptions {
		sides,
		..AdvancedOptions::default()
	}
}

#[test]
fn no_options_keeps_everything() {
	let processed = options(6).apply(&[3, 1, 6], &mut MaxRoller).unwrap();
	assert_eq!(
		processed,
		Processed {
			kept: vec![3, 1, 6],
			dropped: Vec::new(),
			rerolled: Vec::new(),
		}
	);
}

#[test]
fn caps_clamp_each_die() {
	let opts = AdvancedOptions {
		min_cap: Some(3),
		max_cap: Some(5),
		..options(6)
	};
	let processed = opts.apply(&[1, 2, 3, 4, 5, 6], &mut MaxRoller).unwrap();
	assert_eq!(processed.kept, vec![3, 3, 3, 4, 5, 5]);
}

#[test]
fn single_sided_caps() {
	let min_only = AdvancedOptions {
		min_cap: Some(4),
		..options(6)
	};
	assert_eq!(min_only.apply(&[1, 6], &mut MaxRoller).unwrap().kept, vec![4, 6]);

	let max_only = AdvancedOptions {
		max_cap: Some(2),
		..options(6)
	};
	assert_eq!(max_only.apply(&[1, 6], &mut MaxRoller).unwrap().kept, vec![1, 2]);
}

#[test]
fn reroll_lowest_uses_stable_ranking() {
	let opts = AdvancedOptions {
		reroll_lowest: 2,
		..options(6)
	};
	let mut roller = IterRoller::new([5, 6]);
	let processed = opts.apply(&[2, 4, 2, 1], &mut roller).unwrap();

	// Ranking is 1 (index 3), 2 (index 0), 2 (index 2), 4 (index 1)
	assert_eq!(
		processed.rerolled,
		vec![
			Reroll {
				original: 1,
				new: 5,
				index: 3,
			},
			Reroll {
				original: 2,
				new: 6,
				index: 0,
			},
		]
	);
	assert_eq!(processed.kept, vec![6, 4, 2, 5]);
}

#[test]
fn reroll_lowest_then_highest() {
	let opts = AdvancedOptions {
		reroll_lowest: 1,
		reroll_highest: 1,
		..options(6)
	};
	let mut roller = IterRoller::new([3, 2]);
	let processed = opts.apply(&[4, 1, 6], &mut roller).unwrap();

	assert_eq!(
		processed.rerolled,
		vec![
			Reroll {
				original: 1,
				new: 3,
				index: 1,
			},
			Reroll {
				original: 6,
				new: 2,
				index: 2,
			},
		]
	);
	assert_eq!(processed.kept, vec![4, 3, 2]);
}

#[test]
fn reroll_works_on_capped_values() {
	let opts = AdvancedOptions {
		min_cap: Some(3),
		reroll_lowest: 1,
		..options(6)
	};
	let mut roller = IterRoller::new([1]);
	let processed = opts.apply(&[1, 5], &mut roller).unwrap();

	assert_eq!(
		processed.rerolled,
		vec![Reroll {
			original: 3,
			new: 1,
			index: 0,
		}]
	);
	assert_eq!(processed.kept, vec![1, 5]);
}

#[test]
fn overlapping_reroll_windows_reroll_twice() {
	let opts = AdvancedOptions {
		reroll_lowest: 2,
		reroll_highest: 2,
		..options(6)
	};
	let mut roller = IterRoller::new([1, 2, 3, 4]);
	let processed = opts.apply(&[5, 3, 4], &mut roller).unwrap();

	// Ranking is 3 (index 1), 4 (index 2), 5 (index 0); index 2 is in both windows
	let indices = processed.rerolled.iter().map(|reroll| reroll.index).collect::<Vec<_>>();
	assert_eq!(indices, vec![1, 2, 2, 0]);
	assert_eq!(processed.rerolled[2].original, 2);
	assert_eq!(processed.kept, vec![4, 1, 3]);
}

#[test]
fn reroll_counts_are_capped_to_pool() {
	let opts = AdvancedOptions {
		reroll_highest: 50,
		..options(6)
	};
	let mut roller = IterRoller::new([1, 1]);
	let processed = opts.apply(&[2, 3], &mut roller).unwrap();
	assert_eq!(processed.rerolled.len(), 2);
	assert_eq!(processed.kept, vec![1, 1]);
}

#[test]
fn reroll_with_invalid_sides_fails() {
	let opts = AdvancedOptions {
		reroll_lowest: 1,
		..options(1)
	};
	assert_eq!(opts.apply(&[1, 1], &mut MaxRoller), Err(Error::InvalidSides(1)));
}

#[test]
fn drop_lowest_and_highest() {
	let opts = AdvancedOptions {
		drop_lowest: 1,
		drop_highest: 1,
		..options(6)
	};
	let processed = opts.apply(&[4, 6, 1, 3], &mut MaxRoller).unwrap();
	assert_eq!(processed.kept, vec![4, 3]);
	assert_eq!(
		processed.dropped,
		vec![Dropped { value: 1, index: 2 }, Dropped { value: 6, index: 1 }]
	);
}

#[test]
fn drop_ties_go_to_earliest_die() {
	let opts = AdvancedOptions {
		drop_lowest: 1,
		..options(6)
	};
	let processed = opts.apply(&[2, 5, 2], &mut MaxRoller).unwrap();
	assert_eq!(processed.kept, vec![5, 2]);
	assert_eq!(processed.dropped, vec![Dropped { value: 2, index: 0 }]);
}

#[test]
fn drop_uses_rerolled_values() {
	let opts = AdvancedOptions {
		reroll_lowest: 1,
		drop_lowest: 1,
		..options(6)
	};
	let mut roller = IterRoller::new([6]);
	let processed = opts.apply(&[1, 3, 4], &mut roller).unwrap();
	assert_eq!(processed.kept, vec![6, 4]);
	assert_eq!(processed.dropped, vec![Dropped { value: 3, index: 1 }]);
}

#[test]
fn excessive_drops_leave_one_die() {
	let opts = AdvancedOptions {
		drop_lowest: 100,
		drop_highest: 100,
		..options(6)
	};
	let processed = opts.apply(&[2, 6, 4], &mut MaxRoller).unwrap();
	assert_eq!(processed.kept.len(), 1);
	assert_eq!(processed.dropped.len(), 2);
	assert_eq!(processed.kept, vec![6]);
}

#[test]
fn excessive_drop_lowest_alone_leaves_highest() {
	let opts = AdvancedOptions {
		drop_lowest: 10,
		..options(6)
	};
	let processed = opts.apply(&[3, 5, 1, 2], &mut MaxRoller).unwrap();
	assert_eq!(processed.kept, vec![5]);
	assert_eq!(
		processed.dropped,
		vec![
			Dropped { value: 1, index: 2 },
			Dropped { value: 2, index: 3 },
			Dropped { value: 3, index: 0 },
		]
	);
}

#[test]
fn overlapping_drop_windows_record_once() {
	let opts = AdvancedOptions {
		drop_lowest: 3,
		drop_highest: 3,
		..options(6)
	};
	let processed = opts.apply(&[1, 2, 3, 4, 5], &mut MaxRoller).unwrap();
	assert_eq!(processed.dropped.len() + processed.kept.len(), 5);
	assert_eq!(processed.kept, vec![4]);

	let mut indices = processed.dropped.iter().map(|dropped| dropped.index).collect::<Vec<_>>();
	indices.dedup();
	assert_eq!(indices, vec![0, 1, 2, 4]);
}

#[test]
fn single_die_is_never_dropped() {
	let opts = AdvancedOptions {
		drop_lowest: 1,
		drop_highest: 1,
		..options(20)
	};
	let processed = opts.apply(&[13], &mut MaxRoller).unwrap();
	assert_eq!(processed.kept, vec![13]);
	assert!(processed.dropped.is_empty());
}

#[test]
#[cfg(feature = "fastrand")]
fn kept_and_dropped_account_for_every_die() {
	let mut rng = FastRandRoller::with_seed(7);
	for count in 1..=20_u8 {
		for drops in 0..count {
			let opts = AdvancedOptions {
				drop_lowest: u32::from(drops / 2),
				drop_highest: u32::from(drops - drops / 2),
				reroll_lowest: 1,
				..options(8)
			};
			let rolls = rng.roll_dice(count, 8).unwrap();
			let processed = opts.apply(&rolls, &mut rng).unwrap();
			assert_eq!(processed.kept.len() + processed.dropped.len(), usize::from(count));
			assert_eq!(processed.dropped.len(), usize::from(drops));
		}
	}
}
