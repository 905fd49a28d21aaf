use anyhow::bail;
use lazy_static::lazy_static;
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::{fmt::Display, str::FromStr};

use crate::schemas::{
    common::Comment,
    vehicle::{ScoredVehicle, Vehicle},
};

/// Star ratings above this are junk data and are dropped.
pub const MAX_STARS: i64 = 5;

/// The "rustyMeter": aggregate star-rating quality of a vehicle, as an
/// integer percentage in `0..=100`. Renders as `"86%"`, which is also the
/// serialized form.
#[derive(SerializeDisplay, DeserializeFromStr, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct RustyMeter(u8);

impl RustyMeter {
    /// Aggregate a set of comments into a percentage.
    ///
    /// A comment counts only if its star rating is present and within
    /// `0..=MAX_STARS`; everything else (missing, negative, over-range) is
    /// excluded from both the numerator and the denominator. No comments
    /// at all (or none valid) means 0%. The division truncates, so only a
    /// perfect 5-star average reaches 100%.
    pub fn from_comments<'a, I>(comments: I) -> Self
    where
        I: IntoIterator<Item = &'a Comment>,
    {
        let mut total_stars = 0i64;
        let mut total_comments = 0i64;

        for comment in comments {
            if let Some(stars) = comment.stars {
                if (0..=MAX_STARS).contains(&stars) {
                    total_stars += stars;
                    total_comments += 1;
                }
            }
        }

        if total_comments > 0 {
            Self(((total_stars * 100) / (total_comments * MAX_STARS)) as u8)
        } else {
            Self(0)
        }
    }

    pub fn percent(self) -> u8 {
        self.0
    }
}

impl Display for RustyMeter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl FromStr for RustyMeter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lazy_static! {
            static ref RE_PERCENT: regex::Regex =
                regex::Regex::new(r"^([0-9]+)%?$").unwrap();
        };

        let percent: u8 = match RE_PERCENT.captures(s.trim()) {
            Some(captures) => captures.get(1).unwrap().as_str().parse()?,
            None => bail!("not a percentage"),
        };
        if percent > 100 {
            bail!("percentage out of range");
        }
        Ok(Self(percent))
    }
}

/// Score every vehicle and order the result best-first.
///
/// Total: one [`ScoredVehicle`] per input vehicle, nothing filtered.
/// The relative order of equal scores is unspecified. Truncating to a
/// top-N is left to the caller.
pub fn rank<I>(vehicles: I) -> Vec<ScoredVehicle>
where
    I: IntoIterator<Item = Vehicle>,
{
    let mut scored: Vec<ScoredVehicle> = vehicles
        .into_iter()
        .map(|vehicle| {
            let rusty_meter = vehicle.rusty_meter();
            ScoredVehicle {
                id: vehicle.id,
                rusty_meter,
            }
        })
        .collect();
    scored.sort_by_key(|entry| -i32::from(entry.rusty_meter.percent()));
    scored
}

/// The last `n` entries of an append-ordered "seen recently" sequence,
/// oldest first. A suffix, not a re-sort; shorter inputs come back whole.
pub fn top_recent<T>(viewed: &[T], n: usize) -> &[T] {
    &viewed[viewed.len().saturating_sub(n)..]
}
