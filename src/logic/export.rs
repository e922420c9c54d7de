//! CSV export of a ranking table.

use crate::models::RankedEntry;

/// Render ranked rows as CSV with a header line.
pub fn standings_csv(ranked: &[RankedEntry]) -> Result<String, csv::Error> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record([
        "position",
        "participant_id",
        "points",
        "wins",
        "losses",
        "matches_played",
        "win_rate",
        "rank_delta",
    ])?;
    for r in ranked {
        let e = &r.entry;
        wtr.write_record([
            r.position.to_string(),
            e.participant_id.to_string(),
            e.points.to_string(),
            e.wins.to_string(),
            e.losses.to_string(),
            e.matches_played.to_string(),
            format!("{}%", e.win_rate_percent()),
            r.rank_delta.map(|d| d.to_string()).unwrap_or_default(),
        ])?;
    }
    let bytes = wtr.into_inner().map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
