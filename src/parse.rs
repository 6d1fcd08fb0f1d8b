//! Parser generator functions and implementations of [`str::FromStr`] for roll expressions.
//!
//! Parsing is the inverse of formatting a [`RollConfig`]: any expression it renders parses back into an equal
//! configuration. Option tokens may appear in any order, but the modifier must come last.

use core::{fmt, str};

use chumsky::prelude::*;

use crate::dice::{ApplyTo, RollConfig};

/// A single option token following the dice in an expression
#[derive(Debug, Clone, Copy)]
enum Token {
	/// `dh{n}`
	DropHighest(u32),

	/// `dl{n}`
	DropLowest(u32),

	/// `rh{n}`
	RerollHighest(u32),

	/// `rl{n}`
	RerollLowest(u32),

	/// `min{n}`
	MinCap(u8),

	/// `max{n}`
	MaxCap(u8),
}

/// Generates a parser for an unsigned integer, labelling any conversion errors with `what`.
fn number<'src, T>(what: &'static str) -> impl Parser<'src, &'src str, T, extra::Err<Rich<'src, char>>> + Clone
where
	T: str::FromStr,
	T::Err: fmt::Display,
{
	text::int(10).try_map(move |digits: &str, span| {
		digits
			.parse()
			.map_err(|err| Rich::custom(span, format!("{what}: {err}")))
	})
}

/// Generates a parser that handles roll expressions like "d20", "4d6dl1+2", "3d8rl1max7-1(each)", etc.
pub fn roll_config_part<'src>() -> impl Parser<'src, &'src str, RollConfig, extra::Err<Rich<'src, char>>> + Clone {
	let token = choice((
		just("dh").ignore_then(number("Drop highest count")).map(Token::DropHighest),
		just("dl").ignore_then(number("Drop lowest count")).map(Token::DropLowest),
		just("rh").ignore_then(number("Reroll highest count")).map(Token::RerollHighest),
		just("rl").ignore_then(number("Reroll lowest count")).map(Token::RerollLowest),
		just("min").ignore_then(number("Minimum cap")).map(Token::MinCap),
		just("max").ignore_then(number("Maximum cap")).map(Token::MaxCap),
	));

	let modifier = one_of("+-")
		.then(number::<i32>("Modifier"))
		.map(|(sign, val)| if sign == '-' { val.saturating_neg() } else { val })
		.then(just("(each)").or_not().map(|each| {
			if each.is_some() {
				ApplyTo::Each
			} else {
				ApplyTo::Sum
			}
		}));

	number::<u8>("Dice count")
		.or_not()
		.then_ignore(just('d'))
		.then(number::<u8>("Dice sides"))
		.then(token.repeated().collect::<Vec<_>>())
		.then(modifier.or_not())
		.map(|(((count, sides), tokens), modifier)| {
			let mut config = RollConfig::new(count.unwrap_or(1), sides);
			for token in tokens {
				match token {
					Token::DropHighest(count) => config.drop_highest = count,
					Token::DropLowest(count) => config.drop_lowest = count,
					Token::RerollHighest(count) => config.reroll_highest = count,
					Token::RerollLowest(count) => config.reroll_lowest = count,
					Token::MinCap(min) => config.min_cap = Some(min),
					Token::MaxCap(max) => config.max_cap = Some(max),
				}
			}
			if let Some((modifier, apply_to)) = modifier {
				config.modifier = modifier;
				config.apply_to = apply_to;
			}
			config
		})
}

/// Generates a parser that handles roll expressions like "d20", "4d6dl1+2", "3d8rl1max7-1(each)", etc.
/// and expects end of input
pub fn roll_config<'src>() -> impl Parser<'src, &'src str, RollConfig, extra::Err<Rich<'src, char>>> + Clone {
	roll_config_part().padded().then_ignore(end())
}

/// Error that can occur while parsing a string into a roll configuration via [`str::FromStr`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{details}")]
#[non_exhaustive]
pub struct Error {
	/// Details of the parsing failure
	pub details: String,
}

impl str::FromStr for RollConfig {
	type Err = Error;

	/// Parses a roll expression into a configuration. Input is case-insensitive.
	///
	/// The resulting configuration isn't range-checked; see [`RollConfig::validate()`].
	///
	/// # Examples
	/// ```
	/// use celtic_dice::{dice::ApplyTo, RollConfig};
	///
	/// let config: RollConfig = "4d6DL1+2".parse()?;
	/// assert_eq!(config, RollConfig::builder().count(4).sides(6).drop_lowest(1).modifier(2).build());
	///
	/// let config: RollConfig = "d20min5-1(each)".parse()?;
	/// assert_eq!(config.count, 1);
	/// assert_eq!(config.min_cap, Some(5));
	/// assert_eq!((config.modifier, config.apply_to), (-1, ApplyTo::Each));
	///
	/// assert!("4d".parse::<RollConfig>().is_err());
	/// # Ok::<(), celtic_dice::parse::Error>(())
	/// ```
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let lc = s.to_lowercase();
		let result = roll_config().parse(&lc).into_result().map_err(|errs| Error {
			details: errs.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "),
		});
		result
	}
}
