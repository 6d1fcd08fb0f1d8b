mod lines;
mod modifier;

use chrono::{DateTime, Utc};

/// Fixed point in time used to make roll timestamps deterministic
fn fixed_time() -> DateTime<Utc> {
	DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}
