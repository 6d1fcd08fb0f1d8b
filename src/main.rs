use std::{
	env, fs,
	io::{self, Write},
	process::ExitCode,
};

use ariadne::{Label, Report, ReportKind, Source};
use celtic_dice::{
	dice::roller::{FastRand, Roller},
	engine::{Clock, Describe, RollEngine},
	LineManager,
};
use chumsky::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::from_default_env())
		.with_writer(io::stderr)
		.init();

	let args = env::args();
	let inputs = if args.len() > 1 {
		// Each argument is rolled separately. The first argument is ignored since it is typically the name of the
		// executable itself.
		args.skip(1).collect::<Vec<String>>()
	} else {
		let mut lines = io::stdin().lines();

		// If there isn't already input available in stdin, display a prompt for it
		if lines.size_hint().1.is_none() {
			print!("Enter roll expression: ");
			if let Err(err) = io::stdout().flush() {
				eprintln!("Unable to display prompt: {err}");
			}
		}

		// Grab the first line available from stdin
		match lines.next() {
			Some(Ok(line)) => line.split_whitespace().map(ToOwned::to_owned).collect(),
			Some(Err(err)) => {
				eprintln!("Unable to read input: {err}");
				return ExitCode::FAILURE;
			}
			None => Vec::new(),
		}
	};

	let mut engine = RollEngine::new(FastRand::default());
	let mut ok = true;
	for input in &inputs {
		ok &= if input.ends_with(".json") {
			roll_snapshot(input)
		} else {
			roll_expression(&mut engine, input)
		};
	}

	if let Some(stats) = engine.recent_statistics().filter(|stats| stats.total_rolls > 1) {
		println!();
		println!(
			"Rolls: {}, average: {}, min: {}, max: {}, sum: {}",
			stats.total_rolls, stats.average, stats.min, stats.max, stats.sum
		);
	}

	if ok {
		ExitCode::SUCCESS
	} else {
		ExitCode::FAILURE
	}
}

/// Parses and rolls a single expression, printing the result or a report of what went wrong.
fn roll_expression<R: Roller, C: Clock>(engine: &mut RollEngine<R, C>, input: &str) -> bool {
	let lc = input.to_lowercase();
	let config = match celtic_dice::parser().parse(&lc).into_result() {
		Ok(config) => config,
		Err(errs) => {
			for err in errs {
				let span = err.span().into_range();
				let report = Report::build(ReportKind::Error, span.clone())
					.with_message(format!("Unable to parse {input:?}"))
					.with_label(Label::new(span).with_message(err.reason().to_string()))
					.finish();
				if let Err(io_err) = report.eprint(Source::from(&lc)) {
					eprintln!("Unable to parse {input:?}: {} ({io_err})", err.reason());
				}
			}
			return false;
		}
	};

	match engine.execute_roll(&config) {
		Ok(result) => {
			println!("{} = {}", result.describe(Some(50)), result.total());
			true
		}
		Err(err) => {
			eprintln!("{config}: {err}");
			false
		}
	}
}

/// Imports an exported snapshot file and rolls every line in it.
fn roll_snapshot(path: &str) -> bool {
	let json = match fs::read_to_string(path) {
		Ok(json) => json,
		Err(err) => {
			eprintln!("Unable to read {path}: {err}");
			return false;
		}
	};

	let mut manager = LineManager::new(RollEngine::new(FastRand::default()));
	if !manager.import_json(&json) {
		eprintln!("{path} is not a valid snapshot");
		return false;
	}

	match manager.roll_all_lines() {
		Ok(rolls) => {
			for roll in rolls {
				println!("{}: {}", roll.line_label, roll.result);
			}
			true
		}
		Err(err) => {
			eprintln!("{path}: {err}");
			false
		}
	}
}
