//! Management of an ordered collection of independently configured roll lines.
//!
//! User input arrives loosely typed (see [`Field`]) and is validated and clamped whenever a line is created or
//! updated, so every stored [`Line`] always holds a configuration the [`RollEngine`] accepts.

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{
	dice::{roller::Roller, ApplyTo, Error, RollConfig, MAX_CAP, MAX_COUNT, MAX_SIDES, MIN_CAP, MIN_COUNT, MIN_SIDES},
	engine::{Clock, RollEngine, RollResult, SystemClock},
};

/// Version written to (and expected of) exported snapshots
pub const SNAPSHOT_VERSION: &str = "1.0";

/// Identity of a line, unique within the manager that assigned it
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[expect(clippy::exhaustive_structs, reason = "Plain newtype")]
pub struct LineId(pub u32);

impl fmt::Display for LineId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// A named, persistent roll configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct Line {
	/// Identity assigned by the manager
	pub id: LineId,

	/// Display name of the line
	pub label: String,

	/// Whether the advanced options panel is expanded
	pub show_advanced: bool,

	/// Configuration rolled for the line
	#[serde(flatten)]
	pub config: RollConfig,
}

impl Line {
	/// Indicates whether any drop, reroll, or cap option is in effect for the line.
	#[must_use]
	#[inline]
	pub const fn has_advanced_options(&self) -> bool {
		self.config.has_advanced_options()
	}

	/// Builds the canonical expression for the line's configuration.
	#[must_use]
	#[inline]
	pub fn expression(&self) -> String {
		self.config.to_string()
	}

	/// Validates each field present in an update and writes it over the line.
	fn apply(&mut self, update: &LineUpdate) {
		if let Some(label) = &update.label {
			self.label.clone_from(label);
		}
		if let Some(show_advanced) = update.show_advanced {
			self.show_advanced = show_advanced;
		}

		let config = &mut self.config;
		if let Some(count) = &update.count {
			config.count = clamp_u8(count, MIN_COUNT, MAX_COUNT).unwrap_or(1);
		}
		if let Some(sides) = &update.sides {
			config.sides = clamp_u8(sides, MIN_SIDES, MAX_SIDES).unwrap_or(6);
		}
		if let Some(modifier) = &update.modifier {
			config.modifier = modifier.parse_int().map_or(0, saturate_i32);
		}
		if let Some(apply_to) = &update.apply_to {
			config.apply_to = apply_to.as_apply_to();
		}

		for (field, target) in [
			(&update.drop_highest, &mut config.drop_highest),
			(&update.drop_lowest, &mut config.drop_lowest),
			(&update.reroll_highest, &mut config.reroll_highest),
			(&update.reroll_lowest, &mut config.reroll_lowest),
		] {
			if let Some(field) = field {
				*target = field.parse_int().map_or(0, |val| u32::try_from(val.max(0)).unwrap_or(u32::MAX));
			}
		}

		for (field, target) in [(&update.min_cap, &mut config.min_cap), (&update.max_cap, &mut config.max_cap)] {
			if let Some(field) = field {
				*target = clamp_u8(field, MIN_CAP, MAX_CAP);
			}
		}
	}
}

/// Raw value of a single user-supplied line field, before validation.
///
/// Integers are read from fields the way a form would: whole numbers are used as-is, fractional numbers are
/// truncated, and text is read up to the first non-digit (so `" 12px"` reads as 12). Anything else has no integer
/// value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
#[expect(clippy::exhaustive_enums, reason = "Covers every JSON scalar")]
pub enum Field {
	/// Explicitly empty value
	Null,

	/// Boolean value
	Bool(bool),

	/// Whole number
	Int(i64),

	/// Fractional number
	Float(f64),

	/// Free text
	Text(String),
}

impl Field {
	/// Reads the integer value of the field, if it has one.
	///
	/// # Examples
	/// ```
	/// use celtic_dice::lines::Field;
	///
	/// assert_eq!(Field::from(7).parse_int(), Some(7));
	/// assert_eq!(Field::from(3.9).parse_int(), Some(3));
	/// assert_eq!(Field::from(" -12 apples").parse_int(), Some(-12));
	/// assert_eq!(Field::from("apples").parse_int(), None);
	/// assert_eq!(Field::Null.parse_int(), None);
	/// ```
	#[must_use]
	#[expect(clippy::cast_possible_truncation, reason = "Float to int casts saturate")]
	pub fn parse_int(&self) -> Option<i64> {
		match self {
			Self::Int(val) => Some(*val),
			Self::Float(val) if val.is_finite() => Some(val.trunc() as i64),
			Self::Text(text) => parse_leading_int(text),
			Self::Float(..) | Self::Null | Self::Bool(..) => None,
		}
	}

	/// Interprets the field as a modifier placement, coercing anything other than `"each"` to [`ApplyTo::Sum`].
	#[must_use]
	pub fn as_apply_to(&self) -> ApplyTo {
		match self {
			Self::Text(text) => ApplyTo::from_input(text),
			Self::Null | Self::Bool(..) | Self::Int(..) | Self::Float(..) => ApplyTo::Sum,
		}
	}
}

impl From<i64> for Field {
	fn from(val: i64) -> Self {
		Self::Int(val)
	}
}

impl From<i32> for Field {
	fn from(val: i32) -> Self {
		Self::Int(val.into())
	}
}

impl From<u32> for Field {
	fn from(val: u32) -> Self {
		Self::Int(val.into())
	}
}

impl From<u8> for Field {
	fn from(val: u8) -> Self {
		Self::Int(val.into())
	}
}

impl From<f64> for Field {
	fn from(val: f64) -> Self {
		Self::Float(val)
	}
}

impl From<&str> for Field {
	fn from(val: &str) -> Self {
		Self::Text(val.to_owned())
	}
}

impl From<String> for Field {
	fn from(val: String) -> Self {
		Self::Text(val)
	}
}

impl From<ApplyTo> for Field {
	fn from(val: ApplyTo) -> Self {
		Self::Text(val.as_str().to_owned())
	}
}

impl<T: Into<Self>> From<Option<T>> for Field {
	fn from(val: Option<T>) -> Self {
		val.map_or(Self::Null, Into::into)
	}
}

/// Partial line configuration as supplied by a caller. Only the fields that are present are validated and applied.
///
/// # Examples
/// ```
/// use celtic_dice::lines::LineUpdate;
///
/// let update: LineUpdate = serde_json::from_str(r#"{"count": "4", "sides": 6, "minCap": null}"#)?;
/// assert_eq!(update, LineUpdate::new().count("4").sides(6).min_cap(None::<u8>));
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[non_exhaustive]
pub struct LineUpdate {
	/// New display name
	#[serde(skip_serializing_if = "Option::is_none")]
	pub label: Option<String>,

	/// New advanced panel visibility
	#[serde(skip_serializing_if = "Option::is_none")]
	pub show_advanced: Option<bool>,

	/// Number of dice, clamped to 1-100 (1 if unreadable)
	#[serde(skip_serializing_if = "Option::is_none", deserialize_with = "present")]
	pub count: Option<Field>,

	/// Sides per die, clamped to 2-100 (6 if unreadable)
	#[serde(skip_serializing_if = "Option::is_none", deserialize_with = "present")]
	pub sides: Option<Field>,

	/// Flat modifier (0 if unreadable)
	#[serde(skip_serializing_if = "Option::is_none", deserialize_with = "present")]
	pub modifier: Option<Field>,

	/// Modifier placement (`"sum"` unless exactly `"each"`)
	#[serde(skip_serializing_if = "Option::is_none", deserialize_with = "present")]
	pub apply_to: Option<Field>,

	/// Highest dice to drop, at least 0 (0 if unreadable)
	#[serde(skip_serializing_if = "Option::is_none", deserialize_with = "present")]
	pub drop_highest: Option<Field>,

	/// Lowest dice to drop, at least 0 (0 if unreadable)
	#[serde(skip_serializing_if = "Option::is_none", deserialize_with = "present")]
	pub drop_lowest: Option<Field>,

	/// Highest dice to reroll, at least 0 (0 if unreadable)
	#[serde(skip_serializing_if = "Option::is_none", deserialize_with = "present")]
	pub reroll_highest: Option<Field>,

	/// Lowest dice to reroll, at least 0 (0 if unreadable)
	#[serde(skip_serializing_if = "Option::is_none", deserialize_with = "present")]
	pub reroll_lowest: Option<Field>,

	/// Minimum die value, clamped to 1-100 (removed if unreadable)
	#[serde(skip_serializing_if = "Option::is_none", deserialize_with = "present")]
	pub min_cap: Option<Field>,

	/// Maximum die value, clamped to 1-100 (removed if unreadable)
	#[serde(skip_serializing_if = "Option::is_none", deserialize_with = "present")]
	pub max_cap: Option<Field>,
}

/// Generates a fluent setter for a [`Field`] of [`LineUpdate`].
macro_rules! field_setters {
	($($name:ident: $what:literal),* $(,)?) => {
		$(
			#[doc = concat!("Sets the ", $what, ".")]
			#[must_use]
			pub fn $name(mut self, val: impl Into<Field>) -> Self {
				self.$name = Some(val.into());
				self
			}
		)*
	};
}

impl LineUpdate {
	/// Creates an empty update that changes nothing.
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the display name.
	#[must_use]
	pub fn label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	/// Sets the advanced panel visibility.
	#[must_use]
	pub const fn show_advanced(mut self, show: bool) -> Self {
		self.show_advanced = Some(show);
		self
	}

	field_setters! {
		count: "number of dice",
		sides: "sides per die",
		modifier: "flat modifier",
		apply_to: "modifier placement",
		drop_highest: "number of highest dice to drop",
		drop_lowest: "number of lowest dice to drop",
		reroll_highest: "number of highest dice to reroll",
		reroll_lowest: "number of lowest dice to reroll",
		min_cap: "minimum die value",
		max_cap: "maximum die value",
	}
}

impl From<&RollConfig> for LineUpdate {
	/// Creates an update that sets every configuration field to the value in `config`.
	fn from(config: &RollConfig) -> Self {
		Self {
			label: None,
			show_advanced: None,
			count: Some(config.count.into()),
			sides: Some(config.sides.into()),
			modifier: Some(config.modifier.into()),
			apply_to: Some(config.apply_to.into()),
			drop_highest: Some(config.drop_highest.into()),
			drop_lowest: Some(config.drop_lowest.into()),
			reroll_highest: Some(config.reroll_highest.into()),
			reroll_lowest: Some(config.reroll_lowest.into()),
			min_cap: Some(config.min_cap.into()),
			max_cap: Some(config.max_cap.into()),
		}
	}
}

impl From<&Line> for LineUpdate {
	/// Creates an update that sets every field to the value in `line`.
	fn from(line: &Line) -> Self {
		Self {
			label: Some(line.label.clone()),
			show_advanced: Some(line.show_advanced),
			..Self::from(&line.config)
		}
	}
}

/// Deserializes a field that is present in the input, even when it is `null`.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Field>, D::Error> {
	Field::deserialize(deserializer).map(Some)
}

/// Reads the integer value of a field and clamps it to a range, or returns [`None`] if it has no integer value.
fn clamp_u8(field: &Field, min: u8, max: u8) -> Option<u8> {
	field
		.parse_int()
		.map(|val| val.clamp(i64::from(min), i64::from(max)))
		.and_then(|val| u8::try_from(val).ok())
}

/// Converts an integer to an `i32`, saturating at its bounds.
fn saturate_i32(val: i64) -> i32 {
	i32::try_from(val).unwrap_or(if val < 0 { i32::MIN } else { i32::MAX })
}

/// Reads an optionally signed integer from the start of some text, ignoring leading whitespace and anything after
/// the digits.
fn parse_leading_int(text: &str) -> Option<i64> {
	let text = text.trim_start();
	let (negative, digits) = match text.strip_prefix('-') {
		Some(rest) => (true, rest),
		None => (false, text.strip_prefix('+').unwrap_or(text)),
	};

	let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());
	let digits = digits.get(..end).filter(|digits| !digits.is_empty())?;

	// Overlong numbers saturate rather than failing
	let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
	Some(if negative { magnitude.saturating_neg() } else { magnitude })
}

/// Result of rolling a line: the engine's result stamped with the line it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct LineRoll {
	/// Line that was rolled
	pub line_id: LineId,

	/// Label of the line at the time it was rolled
	pub line_label: String,

	/// Complete result of the roll
	#[serde(flatten)]
	pub result: RollResult,
}

/// Condensed view of a line's configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct SummaryConfig {
	/// Number of dice
	pub count: u8,

	/// Sides per die
	pub sides: u8,

	/// Flat modifier
	pub modifier: i32,

	/// Modifier placement
	pub apply_to: ApplyTo,

	/// Whether any drop, reroll, or cap option is in effect
	pub has_advanced: bool,
}

/// Read-only overview of a line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct LineSummary {
	/// Identity of the line
	pub id: LineId,

	/// Display name of the line
	pub label: String,

	/// Canonical expression of the line's configuration
	pub expression: String,

	/// Condensed configuration
	pub config: SummaryConfig,
}

/// Exported copy of every line in a manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Snapshot {
	/// Format version ([`SNAPSHOT_VERSION`])
	pub version: String,

	/// When the snapshot was taken
	pub timestamp: DateTime<Utc>,

	/// Lines in order
	pub lines: Vec<Line>,
}

/// Owns an ordered collection of [`Line`]s and rolls them with its [`RollEngine`].
///
/// The collection is never empty: a new manager starts with one default line, and the last line can't be removed.
///
/// # Examples
/// ```
/// use celtic_dice::{
/// 	dice::roller::Iter as IterRoller,
/// 	engine::RollEngine,
/// 	lines::{LineId, LineManager, LineUpdate},
/// };
///
/// let mut manager = LineManager::new(RollEngine::new(IterRoller::new([5, 2, 6, 1])));
/// let attack = manager.add_line(LineUpdate::new().label("Attack").count(3).sides(6).drop_lowest(1)).id;
/// assert_eq!(attack, LineId(2));
///
/// let roll = manager.roll_line(attack)?.unwrap();
/// assert_eq!(roll.line_label, "Attack");
/// assert_eq!(roll.result.processed.kept, vec![5, 6]);
/// assert_eq!(roll.result.total(), 11);
/// # Ok::<(), celtic_dice::dice::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct LineManager<R, C = SystemClock> {
	/// Engine used to roll lines
	engine: RollEngine<R, C>,

	/// Lines in display order
	lines: Vec<Line>,

	/// Identity to assign to the next created line
	next_id: u32,
}

impl<R: Roller, C: Clock> LineManager<R, C> {
	/// Creates a manager that rolls with the given engine, starting with a single default line.
	#[must_use]
	pub fn new(engine: RollEngine<R, C>) -> Self {
		let mut manager = Self {
			engine,
			lines: Vec::new(),
			next_id: 1,
		};
		manager.add_line(LineUpdate::default());
		manager
	}

	/// Gets the engine used to roll lines.
	#[must_use]
	#[inline]
	pub const fn engine(&self) -> &RollEngine<R, C> {
		&self.engine
	}

	/// Gets a mutable reference to the engine used to roll lines.
	#[inline]
	pub fn engine_mut(&mut self) -> &mut RollEngine<R, C> {
		&mut self.engine
	}

	/// Creates a line from the defaults with `config` validated over them and appends it to the end.
	/// The label defaults to `"Line {id}"` when absent or empty.
	pub fn add_line(&mut self, config: LineUpdate) -> &Line {
		let line = self.create_line(&config);
		tracing::debug!(id = %line.id, label = %line.label, "added line");

		let index = self.lines.len();
		self.lines.push(line);
		&self.lines[index]
	}

	/// Builds a new line with the next identity.
	fn create_line(&mut self, config: &LineUpdate) -> Line {
		let id = LineId(self.next_id);
		self.next_id = self.next_id.saturating_add(1);

		let mut line = Line {
			id,
			label: String::new(),
			show_advanced: false,
			config: RollConfig::default(),
		};
		line.apply(config);

		if line.label.is_empty() {
			line.label = format!("Line {id}");
		}

		line
	}

	/// Removes a line. Returns `false` if the line doesn't exist or is the only remaining line.
	pub fn remove_line(&mut self, id: LineId) -> bool {
		if self.lines.len() <= 1 {
			return false;
		}

		let Some(index) = self.position(id) else {
			return false;
		};
		self.lines.remove(index);
		tracing::debug!(%id, "removed line");
		true
	}

	/// Appends a copy of a line with a fresh identity and `" (Copy)"` appended to its label.
	/// Returns [`None`] if the line doesn't exist.
	pub fn duplicate_line(&mut self, id: LineId) -> Option<&Line> {
		let source = self.line(id)?;
		let mut copy = LineUpdate::from(source);
		copy.label = Some(format!("{} (Copy)", source.label));

		Some(self.add_line(copy))
	}

	/// Gets a line by its identity.
	#[must_use]
	pub fn line(&self, id: LineId) -> Option<&Line> {
		self.lines.iter().find(|line| line.id == id)
	}

	/// Gets every line in order.
	#[must_use]
	#[inline]
	pub fn lines(&self) -> &[Line] {
		&self.lines
	}

	/// Gets the number of lines.
	#[must_use]
	#[inline]
	pub fn line_count(&self) -> usize {
		self.lines.len()
	}

	/// Validates the fields present in `updates` and applies them to a line in place.
	/// Returns `false` if the line doesn't exist.
	pub fn update_line(&mut self, id: LineId, updates: &LineUpdate) -> bool {
		let Some(line) = self.lines.iter_mut().find(|line| line.id == id) else {
			return false;
		};

		line.apply(updates);
		tracing::debug!(%id, expression = %line.config, "updated line");
		true
	}

	/// Validates a partial configuration over the defaults without creating a line.
	///
	/// # Examples
	/// ```
	/// use celtic_dice::{dice::{roller::Max, ApplyTo}, lines::{LineManager, LineUpdate}, RollConfig};
	///
	/// let update = LineUpdate::new().count(500).sides("nope").max_cap(0).apply_to("both");
	/// let config = LineManager::<Max>::validate_line_config(&update);
	/// assert_eq!(config, RollConfig { count: 100, max_cap: Some(1), ..RollConfig::new(1, 6) });
	/// assert_eq!(config.apply_to, ApplyTo::Sum);
	/// ```
	#[must_use]
	pub fn validate_line_config(config: &LineUpdate) -> RollConfig {
		let mut line = Line {
			id: LineId(0),
			label: String::new(),
			show_advanced: false,
			config: RollConfig::default(),
		};
		line.apply(config);
		line.config
	}

	/// Rolls a line with the engine and stamps the result with the line's identity and label.
	/// Returns [`None`] if the line doesn't exist.
	///
	/// # Errors
	/// If the engine rejects the line's configuration, the error is returned. Configurations of managed lines are
	/// always validated, so this doesn't happen in practice.
	pub fn roll_line(&mut self, id: LineId) -> Result<Option<LineRoll>, Error> {
		let Some(line) = self.lines.iter().find(|line| line.id == id) else {
			return Ok(None);
		};

		let result = self.engine.execute_roll(&line.config)?;
		Ok(Some(LineRoll {
			line_id: id,
			line_label: line.label.clone(),
			result,
		}))
	}

	/// Rolls every line in order.
	///
	/// # Errors
	/// If the engine rejects any line's configuration, the error is returned.
	pub fn roll_all_lines(&mut self) -> Result<Vec<LineRoll>, Error> {
		let ids = self.lines.iter().map(|line| line.id).collect::<Vec<_>>();

		let mut rolls = Vec::with_capacity(ids.len());
		for id in ids {
			if let Some(roll) = self.roll_line(id)? {
				rolls.push(roll);
			}
		}

		Ok(rolls)
	}

	/// Builds an overview of every line in order without rolling anything.
	#[must_use]
	pub fn lines_summary(&self) -> Vec<LineSummary> {
		self.lines
			.iter()
			.map(|line| LineSummary {
				id: line.id,
				label: line.label.clone(),
				expression: line.expression(),
				config: SummaryConfig {
					count: line.config.count,
					sides: line.config.sides,
					modifier: line.config.modifier,
					apply_to: line.config.apply_to,
					has_advanced: line.has_advanced_options(),
				},
			})
			.collect()
	}

	/// Moves a line so that it ends up at `new_index`. Returns `false` if the line doesn't exist or the index is past
	/// the last line.
	pub fn move_line(&mut self, id: LineId, new_index: usize) -> bool {
		let Some(index) = self.position(id) else {
			return false;
		};
		if new_index >= self.lines.len() {
			return false;
		}

		let line = self.lines.remove(index);
		self.lines.insert(new_index, line);
		tracing::debug!(%id, from = index, to = new_index, "moved line");
		true
	}

	/// Discards every line, restarts identities from 1, and adds a single default line.
	pub fn reset_lines(&mut self) {
		self.lines.clear();
		self.next_id = 1;
		self.add_line(LineUpdate::default());
		tracing::debug!("reset lines");
	}

	/// Takes a snapshot of every line.
	#[must_use]
	pub fn export_configuration(&self) -> Snapshot {
		Snapshot {
			version: SNAPSHOT_VERSION.to_owned(),
			timestamp: self.engine.now(),
			lines: self.lines.clone(),
		}
	}

	/// Takes a snapshot of every line as JSON.
	///
	/// # Errors
	/// If the snapshot can't be serialized, the error is returned.
	pub fn export_json(&self) -> Result<String, serde_json::Error> {
		serde_json::to_string_pretty(&self.export_configuration())
	}

	/// Replaces every line with the ones in a snapshot, running each through the same validation as
	/// [`Self::add_line()`] and reassigning identities from 1. Identities and unknown fields in the snapshot are
	/// ignored. At least one line always exists afterwards.
	///
	/// If the snapshot has no `lines` array or any of its entries isn't a valid line, the manager is reset (see
	/// [`Self::reset_lines()`]) and `false` is returned.
	///
	/// # Examples
	/// ```
	/// use celtic_dice::{dice::roller::Max, engine::RollEngine, lines::LineManager};
	/// use serde_json::json;
	///
	/// let mut manager = LineManager::new(RollEngine::new(Max));
	/// assert!(manager.import_configuration(&json!({
	/// 	"version": "1.0",
	/// 	"lines": [{"label": "Fireball", "count": 8, "sides": 6}, {"count": "2", "sides": "20", "dropLowest": 1}],
	/// })));
	///
	/// let expressions = manager.lines().iter().map(|line| line.expression()).collect::<Vec<_>>();
	/// assert_eq!(expressions, ["8d6", "2d20dl1"]);
	/// assert_eq!(manager.lines()[1].label, "Line 2");
	///
	/// assert!(!manager.import_configuration(&json!({"lines": "nope"})));
	/// assert_eq!(manager.line_count(), 1);
	/// ```
	pub fn import_configuration(&mut self, snapshot: &Value) -> bool {
		let Some(entries) = snapshot.get("lines").and_then(Value::as_array) else {
			tracing::warn!("snapshot has no lines array, resetting lines");
			self.reset_lines();
			return false;
		};

		let updates = match entries.iter().map(LineUpdate::deserialize).collect::<Result<Vec<_>, _>>() {
			Ok(updates) => updates,
			Err(err) => {
				tracing::warn!(%err, "invalid line in snapshot, resetting lines");
				self.reset_lines();
				return false;
			}
		};

		self.lines.clear();
		self.next_id = 1;
		for update in updates {
			self.add_line(update);
		}
		if self.lines.is_empty() {
			self.add_line(LineUpdate::default());
		}

		tracing::debug!(lines = self.lines.len(), "imported lines");
		true
	}

	/// Replaces every line with the ones in a JSON snapshot. See [`Self::import_configuration()`].
	pub fn import_json(&mut self, json: &str) -> bool {
		match serde_json::from_str::<Value>(json) {
			Ok(snapshot) => self.import_configuration(&snapshot),
			Err(err) => {
				tracing::warn!(%err, "snapshot is not valid JSON, resetting lines");
				self.reset_lines();
				false
			}
		}
	}

	/// Finds the index of a line.
	fn position(&self, id: LineId) -> Option<usize> {
		self.lines.iter().position(|line| line.id == id)
	}
}
