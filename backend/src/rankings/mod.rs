//! FMS rankings → TBA rankings conversion.
//!
//! FMS exports generic `sort1..sort5` columns whose meaning changes every
//! season; TBA wants them under the season's sort-order names. Only seasons
//! with a known name table are supported.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use crate::error::{RankingsError, RankingsResult};

/// Name of the win-loss-tie breakdown column.
pub const RECORD_NAME: &str = "Record (W-L-T)";

static EVENT_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+").expect("valid event code pattern"));

const NAMES_2018: &[&str] = &["Ranking Score", "End Game", "Auto", "Ownership", "Vault"];
const NAMES_2019: &[&str] = &["Ranking Score", "Cargo", "Hatch Panel", "HAB Climb", "Sandstorm Bonus"];
const NAMES_2022: &[&str] = &["Ranking Score", "Avg Match", "Avg Hangar", "Avg Taxi + Auto Cargo"];

/// One row of an FMS rankings export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FmsRanking {
    pub team: u32,
    pub rank: u32,
    #[serde(default)]
    pub played: u32,
    #[serde(default)]
    pub dq: u32,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub ties: u32,
    #[serde(default)]
    pub sort1: f64,
    #[serde(default)]
    pub sort2: f64,
    #[serde(default)]
    pub sort3: f64,
    #[serde(default)]
    pub sort4: f64,
    #[serde(default)]
    pub sort5: f64,
}

impl FmsRanking {
    fn sorts(&self) -> [f64; 5] {
        [self.sort1, self.sort2, self.sort3, self.sort4, self.sort5]
    }
}

/// One team's ranking as TBA expects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TbaRanking {
    pub team_key: String,
    pub rank: u32,
    pub played: u32,
    pub dqs: u32,
    #[serde(rename = "Record (W-L-T)")]
    pub record: String,
    /// Season sort orders by name
    #[serde(flatten)]
    pub sort_orders: BTreeMap<String, f64>,
}

/// Rankings upload body: breakdown names plus rankings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingsUpload {
    pub breakdowns: Vec<String>,
    pub rankings: Vec<TbaRanking>,
}

/// Sort-order names of a season, without the record column.
pub fn sort_order_names(year: u16) -> Option<&'static [&'static str]> {
    match year {
        2018 => Some(NAMES_2018),
        2019 => Some(NAMES_2019),
        2022 => Some(NAMES_2022),
        _ => None,
    }
}

/// Breakdown names of a season, record column last.
pub fn ranking_names(year: u16) -> RankingsResult<Vec<String>> {
    let names = sort_order_names(year).ok_or(RankingsError::UnsupportedYear(year))?;
    Ok(names
        .iter()
        .copied()
        .chain(std::iter::once(RECORD_NAME))
        .map(str::to_string)
        .collect())
}

/// Whether `year` parses and has a name table.
pub fn is_valid_year(year: &str) -> bool {
    year.trim()
        .parse::<u16>()
        .ok()
        .and_then(sort_order_names)
        .is_some()
}

/// Event codes start with their season, e.g. `2023miket`.
pub fn is_valid_event_code(event: &str) -> bool {
    EVENT_CODE.is_match(event)
}

/// Convert one FMS ranking row.
pub fn convert_one(year: u16, ranking: &FmsRanking) -> RankingsResult<TbaRanking> {
    let names = sort_order_names(year).ok_or(RankingsError::UnsupportedYear(year))?;
    let sort_orders = names
        .iter()
        .zip(ranking.sorts())
        .map(|(name, value)| (name.to_string(), value))
        .collect();

    Ok(TbaRanking {
        team_key: format!("frc{}", ranking.team),
        rank: ranking.rank,
        played: ranking.played,
        dqs: ranking.dq,
        record: format!("{}-{}-{}", ranking.wins, ranking.losses, ranking.ties),
        sort_orders,
    })
}

/// Convert a whole rankings table into an upload body.
pub fn convert(year: u16, rankings: &[FmsRanking]) -> RankingsResult<RankingsUpload> {
    Ok(RankingsUpload {
        breakdowns: ranking_names(year)?,
        rankings: rankings
            .iter()
            .map(|r| convert_one(year, r))
            .collect::<RankingsResult<_>>()?,
    })
}

/// Parse a JSON array of FMS rankings.
pub fn parse_rankings_json(bytes: &[u8]) -> RankingsResult<Vec<FmsRanking>> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Parse a CSV export with a header row (`team,rank,played,...`).
pub fn parse_rankings_csv<R: Read>(reader: R) -> RankingsResult<Vec<FmsRanking>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rankings = Vec::new();
    for record in csv_reader.deserialize() {
        rankings.push(record?);
    }
    Ok(rankings)
}

/// Read rankings from a `.json` or `.csv` file.
pub fn read_rankings(path: &Path) -> RankingsResult<Vec<FmsRanking>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "json" => parse_rankings_json(&std::fs::read(path)?),
        "csv" => parse_rankings_csv(std::fs::File::open(path)?),
        _ => Err(RankingsError::UnknownFormat(path.display().to_string())),
    }
}
