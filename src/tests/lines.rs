use std::collections::HashSet;

use serde_json::json;

use super::fixed_time;
use crate::{
	dice::{
		roller::{Iter as IterRoller, Max as MaxRoller, Roller},
		ApplyTo, RollConfig,
	},
	engine::{Clock, RollEngine},
	lines::{Field, LineId, LineManager, LineUpdate, SNAPSHOT_VERSION},
};

fn manager() -> LineManager<MaxRoller> {
	LineManager::new(RollEngine::new(MaxRoller))
}

fn ids<R: Roller, C: Clock>(manager: &LineManager<R, C>) -> Vec<u32> {
	manager.lines().iter().map(|line| line.id.0).collect()
}

#[test]
fn starts_with_one_default_line() {
	let manager = manager();
	assert_eq!(manager.line_count(), 1);

	let line = &manager.lines()[0];
	assert_eq!(line.id, LineId(1));
	assert_eq!(line.label, "Line 1");
	assert!(!line.show_advanced);
	assert_eq!(line.config, RollConfig::new(1, 6));
}

#[test]
fn add_line_merges_over_defaults() {
	let mut manager = manager();
	let line = manager.add_line(LineUpdate::new().count(3).modifier(2)).clone();

	assert_eq!(line.id, LineId(2));
	assert_eq!(line.label, "Line 2");
	assert_eq!(
		line.config,
		RollConfig {
			count: 3,
			modifier: 2,
			..RollConfig::default()
		}
	);
	assert_eq!(ids(&manager), vec![1, 2]);
}

#[test]
fn add_line_keeps_given_label() {
	let mut manager = manager();
	assert_eq!(manager.add_line(LineUpdate::new().label("Damage")).label, "Damage");
	assert_eq!(manager.add_line(LineUpdate::new().label("")).label, "Line 3");
}

#[test]
fn add_line_validates_fields() {
	let mut manager = manager();
	let update = LineUpdate::new()
		.count("250")
		.sides(1)
		.modifier("-3 bonus")
		.apply_to("EACH")
		.drop_lowest(-2)
		.reroll_highest("lots")
		.min_cap(0)
		.max_cap("150");
	let line = manager.add_line(update);

	assert_eq!(
		line.config,
		RollConfig {
			count: 100,
			sides: 2,
			modifier: -3,
			apply_to: ApplyTo::Sum,
			drop_lowest: 0,
			reroll_highest: 0,
			min_cap: Some(1),
			max_cap: Some(100),
			..RollConfig::default()
		}
	);
}

#[test]
fn unreadable_fields_use_defaults() {
	let update = LineUpdate::new()
		.count("many")
		.sides(Field::Null)
		.modifier(Field::Bool(true))
		.drop_highest("")
		.min_cap("none");
	let config = LineManager::<MaxRoller>::validate_line_config(&update);

	assert_eq!(config.count, 1);
	assert_eq!(config.sides, 6);
	assert_eq!(config.modifier, 0);
	assert_eq!(config.drop_highest, 0);
	assert_eq!(config.min_cap, None);
}

#[test]
fn fractional_fields_truncate() {
	let config = LineManager::<MaxRoller>::validate_line_config(&LineUpdate::new().count(3.7).sides("12.9"));
	assert_eq!((config.count, config.sides), (3, 12));
}

#[test]
fn remove_line() {
	let mut manager = manager();
	let id = manager.add_line(LineUpdate::new()).id;

	assert!(manager.remove_line(id));
	assert_eq!(ids(&manager), vec![1]);
}

#[test]
fn remove_last_line_fails() {
	let mut manager = manager();
	assert!(!manager.remove_line(LineId(1)));
	assert_eq!(manager.line_count(), 1);
	assert_eq!(manager.lines()[0].id, LineId(1));
}

#[test]
fn remove_unknown_line_fails() {
	let mut manager = manager();
	manager.add_line(LineUpdate::new());
	assert!(!manager.remove_line(LineId(42)));
	assert_eq!(manager.line_count(), 2);
}

#[test]
fn duplicate_line_copies_configuration() {
	let mut manager = manager();
	let id = manager
		.add_line(LineUpdate::new().label("Sneak").count(4).sides(8).max_cap(7).show_advanced(true))
		.id;

	let copy = manager.duplicate_line(id).unwrap().clone();
	let source = manager.line(id).unwrap();
	assert_eq!(copy.id, LineId(3));
	assert_eq!(copy.label, "Sneak (Copy)");
	assert!(copy.show_advanced);
	assert_eq!(copy.config, source.config);
	assert_eq!(ids(&manager), vec![1, 2, 3]);
}

#[test]
fn duplicate_unknown_line_fails() {
	let mut manager = manager();
	assert!(manager.duplicate_line(LineId(9)).is_none());
	assert_eq!(manager.line_count(), 1);
}

#[test]
fn update_line_only_touches_present_fields() {
	let mut manager = manager();
	let id = manager.add_line(LineUpdate::new().count(2).sides(10).modifier(1)).id;

	assert!(manager.update_line(id, &LineUpdate::new().sides("0").min_cap(3)));
	let line = manager.line(id).unwrap();
	assert_eq!(line.config.count, 2);
	assert_eq!(line.config.sides, 2);
	assert_eq!(line.config.modifier, 1);
	assert_eq!(line.config.min_cap, Some(3));

	assert!(manager.update_line(id, &LineUpdate::new().min_cap(None::<u8>).label("Renamed")));
	let line = manager.line(id).unwrap();
	assert_eq!(line.config.min_cap, None);
	assert_eq!(line.label, "Renamed");
}

#[test]
fn update_unknown_line_fails() {
	let mut manager = manager();
	assert!(!manager.update_line(LineId(5), &LineUpdate::new().count(3)));
}

#[test]
fn identities_are_never_reused() {
	let mut manager = manager();
	let mut seen = HashSet::new();
	seen.insert(LineId(1));

	for round in 0..20 {
		let id = manager.add_line(LineUpdate::new()).id;
		assert!(seen.insert(id), "identity {id} was reused");

		let copy = manager.duplicate_line(id).unwrap().id;
		assert!(seen.insert(copy), "identity {copy} was reused");

		if round % 2 == 0 {
			assert!(manager.remove_line(id));
			assert!(manager.remove_line(copy));
		}
	}

	let current = ids(&manager).into_iter().collect::<HashSet<_>>();
	assert_eq!(current.len(), manager.line_count());
}

#[test]
fn roll_line_stamps_result() {
	let mut manager = LineManager::new(RollEngine::new(IterRoller::new([2, 5, 3])));
	let id = manager
		.add_line(LineUpdate::new().label("Stats").count(3).sides(6).drop_lowest(1))
		.id;

	let roll = manager.roll_line(id).unwrap().unwrap();
	assert_eq!(roll.line_id, id);
	assert_eq!(roll.line_label, "Stats");
	assert_eq!(roll.result.expression, "3d6dl1");
	assert_eq!(roll.result.total(), 8);
	assert_eq!(manager.engine().history_len(), 1);
}

#[test]
fn roll_unknown_line_is_none() {
	let mut manager = manager();
	assert!(manager.roll_line(LineId(3)).unwrap().is_none());
	assert_eq!(manager.engine().history_len(), 0);
}

#[test]
fn roll_all_lines_in_order() {
	let mut manager = manager();
	manager.add_line(LineUpdate::new().count(2).sides(20));
	manager.add_line(LineUpdate::new().sides(4).modifier(1));
	assert!(manager.move_line(LineId(3), 0));

	let rolls = manager.roll_all_lines().unwrap();
	let totals = rolls.iter().map(|roll| (roll.line_id.0, roll.result.total())).collect::<Vec<_>>();
	assert_eq!(totals, vec![(3, 5), (1, 6), (2, 40)]);
}

#[test]
fn lines_summary_without_rolling() {
	let mut manager = manager();
	manager.add_line(
		LineUpdate::new()
			.label("Attack")
			.count(2)
			.sides(20)
			.drop_lowest(1)
			.modifier(5)
			.apply_to("each"),
	);

	let summary = manager.lines_summary();
	assert_eq!(summary.len(), 2);
	assert_eq!(summary[0].expression, "1d6");
	assert!(!summary[0].config.has_advanced);

	assert_eq!(summary[1].id, LineId(2));
	assert_eq!(summary[1].label, "Attack");
	assert_eq!(summary[1].expression, "2d20dl1+5(each)");
	assert_eq!(summary[1].config.count, 2);
	assert_eq!(summary[1].config.sides, 20);
	assert_eq!(summary[1].config.modifier, 5);
	assert_eq!(summary[1].config.apply_to, ApplyTo::Each);
	assert!(summary[1].config.has_advanced);
	assert_eq!(manager.engine().history_len(), 0);
}

#[test]
fn move_line_reorders() {
	let mut manager = manager();
	manager.add_line(LineUpdate::new());
	manager.add_line(LineUpdate::new());

	assert!(manager.move_line(LineId(1), 2));
	assert_eq!(ids(&manager), vec![2, 3, 1]);

	assert!(manager.move_line(LineId(1), 1));
	assert_eq!(ids(&manager), vec![2, 1, 3]);
}

#[test]
fn move_line_rejects_bad_input() {
	let mut manager = manager();
	manager.add_line(LineUpdate::new());

	assert!(!manager.move_line(LineId(1), 2));
	assert!(!manager.move_line(LineId(7), 0));
	assert_eq!(ids(&manager), vec![1, 2]);
}

#[test]
fn reset_restarts_identities() {
	let mut manager = manager();
	manager.add_line(LineUpdate::new().count(5));
	manager.add_line(LineUpdate::new());
	manager.reset_lines();

	assert_eq!(ids(&manager), vec![1]);
	assert_eq!(manager.lines()[0].config, RollConfig::default());
	assert_eq!(manager.add_line(LineUpdate::new()).id, LineId(2));
}

#[test]
fn export_snapshot() {
	let mut manager = LineManager::new(RollEngine::with_clock(MaxRoller, fixed_time));
	manager.add_line(LineUpdate::new().label("Fire").count(8).sides(6).min_cap(2));

	let snapshot = manager.export_configuration();
	assert_eq!(snapshot.version, SNAPSHOT_VERSION);
	assert_eq!(snapshot.timestamp, fixed_time());
	assert_eq!(snapshot.lines, manager.lines());

	let json = serde_json::to_value(&snapshot).unwrap();
	assert_eq!(json["version"], "1.0");
	assert_eq!(json["timestamp"], "2023-11-14T22:13:20Z");
	assert_eq!(json["lines"][1]["label"], "Fire");
	assert_eq!(json["lines"][1]["minCap"], 2);
	assert_eq!(json["lines"][1]["maxCap"], serde_json::Value::Null);
	assert_eq!(json["lines"][1]["showAdvanced"], false);
}

#[test]
fn export_import_preserves_lines() {
	let mut source = manager();
	source.add_line(LineUpdate::new().label("Heal").count(2).sides(8).modifier(2).apply_to(ApplyTo::Each));
	source.add_line(LineUpdate::new().reroll_lowest(2).max_cap(5).show_advanced(true));
	assert!(source.remove_line(LineId(1)));

	let json = source.export_json().unwrap();
	let mut target = manager();
	assert!(target.import_json(&json));

	assert_eq!(ids(&target), vec![1, 2]);
	let labels = target.lines().iter().map(|line| line.label.as_str()).collect::<Vec<_>>();
	assert_eq!(labels, vec!["Heal", "Line 3"]);
	for (imported, original) in target.lines().iter().zip(source.lines()) {
		assert_eq!(imported.config, original.config);
		assert_eq!(imported.show_advanced, original.show_advanced);
	}
}

#[test]
fn import_validates_lines() {
	let mut manager = manager();
	assert!(manager.import_configuration(&json!({
		"lines": [
			{"id": 77, "count": 0, "sides": 1000, "applyTo": "both", "dropHighest": "2", "maxCap": null},
		],
	})));

	let line = &manager.lines()[0];
	assert_eq!(line.id, LineId(1));
	assert_eq!(line.label, "Line 1");
	assert_eq!(
		line.config,
		RollConfig {
			count: 1,
			sides: 100,
			drop_highest: 2,
			..RollConfig::default()
		}
	);
}

#[test]
fn import_empty_lines_leaves_one_default() {
	let mut manager = manager();
	manager.add_line(LineUpdate::new().count(4));

	assert!(manager.import_configuration(&json!({"lines": []})));
	assert_eq!(ids(&manager), vec![1]);
	assert_eq!(manager.lines()[0].config, RollConfig::default());
}

#[test]
fn import_malformed_snapshot_resets() {
	for snapshot in [
		json!(null),
		json!({}),
		json!({"lines": {"count": 2}}),
		json!({"lines": [{"count": 2}, 5]}),
		json!({"lines": [{"label": 12}]}),
	] {
		let mut manager = manager();
		manager.add_line(LineUpdate::new().count(4));
		manager.add_line(LineUpdate::new().count(5));

		assert!(!manager.import_configuration(&snapshot), "{snapshot} was imported");
		assert_eq!(ids(&manager), vec![1]);
		assert_eq!(manager.lines()[0].config, RollConfig::default());
	}
}

#[test]
fn import_invalid_json_resets() {
	let mut manager = manager();
	manager.add_line(LineUpdate::new());
	assert!(!manager.import_json("{lines: ["));
	assert_eq!(manager.line_count(), 1);
}

#[test]
fn field_deserializes_from_any_scalar() {
	let fields: Vec<Field> = serde_json::from_str(r#"[null, true, 4, 2.5, "x"]"#).unwrap();
	assert_eq!(
		fields,
		vec![
			Field::Null,
			Field::Bool(true),
			Field::Int(4),
			Field::Float(2.5),
			Field::Text("x".to_owned()),
		]
	);
}

#[test]
fn field_integer_parsing() {
	assert_eq!(Field::from("+8").parse_int(), Some(8));
	assert_eq!(Field::from("  42 ").parse_int(), Some(42));
	assert_eq!(Field::from("-").parse_int(), None);
	assert_eq!(Field::from("").parse_int(), None);
	assert_eq!(Field::from("99999999999999999999").parse_int(), Some(i64::MAX));
	assert_eq!(Field::Float(f64::NAN).parse_int(), None);
	assert_eq!(Field::from(-7.9).parse_int(), Some(-7));
}
