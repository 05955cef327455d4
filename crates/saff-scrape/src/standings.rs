//! Standings table extraction.
//!
//! The site renders league tables with English or Arabic headers (sometimes
//! mixed), so table identification and column resolution are driven entirely
//! by header text, never by fixed positions.

use std::collections::HashMap;

use scraper::{ElementRef, Html};

use saff_core::ScrapedStanding;

use crate::{cell_text, extract_team_id, leading_digits, parse_stat, selector, ScrapeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum StatColumn {
    Played,
    Won,
    Drawn,
    Lost,
    GoalsFor,
    GoalsAgainst,
    GoalDifference,
    Points,
}

/// Map one header cell onto a stat column, under either the English
/// abbreviation or the Arabic word. Unrecognized headers (team name, logo)
/// are ignored but keep their index.
fn classify_header(text: &str) -> Option<StatColumn> {
    match text.trim() {
        "P" | "Pld" | "MP" | "لعب" => Some(StatColumn::Played),
        "W" | "فاز" => Some(StatColumn::Won),
        "D" | "تعادل" => Some(StatColumn::Drawn),
        "L" | "خسر" => Some(StatColumn::Lost),
        "GF" | "له" => Some(StatColumn::GoalsFor),
        "GA" | "عليه" => Some(StatColumn::GoalsAgainst),
        "+/-" | "GD" | "فارق" | "الفارق" => Some(StatColumn::GoalDifference),
        "Pts" | "نقاط" => Some(StatColumn::Points),
        _ => None,
    }
}

fn resolve_columns(headers: impl Iterator<Item = String>) -> HashMap<StatColumn, usize> {
    let mut columns = HashMap::new();
    for (index, text) in headers.enumerate() {
        if let Some(column) = classify_header(&text) {
            columns.entry(column).or_insert(index);
        }
    }
    columns
}

fn stat_at(
    columns: &HashMap<StatColumn, usize>,
    cells: &[ElementRef<'_>],
    column: StatColumn,
) -> Option<i32> {
    let index = *columns.get(&column)?;
    parse_stat(&cell_text(*cells.get(index)?))
}

/// Extract standings rows from every recognizable league table on the page.
/// Returns records ordered by position; tables without both a points and a
/// played column are skipped, as are decorative and summary rows.
pub fn extract_standings(document: &Html) -> Result<Vec<ScrapedStanding>, ScrapeError> {
    let table_sel = selector("table")?;
    let header_sel = selector("th")?;
    let row_sel = selector("tbody tr")?;
    let cell_sel = selector("td")?;
    let team_link_sel = selector(r#"a[href*="team.php"]"#)?;

    let mut standings: Vec<ScrapedStanding> = Vec::new();

    for table in document.select(&table_sel) {
        let columns = resolve_columns(table.select(&header_sel).map(cell_text));
        if !columns.contains_key(&StatColumn::Points) || !columns.contains_key(&StatColumn::Played)
        {
            continue;
        }

        for row in table.select(&row_sel) {
            let Some(link) = row.select(&team_link_sel).next() else {
                continue;
            };
            let Some(saff_team_id) = link.value().attr("href").and_then(extract_team_id) else {
                continue;
            };
            let team_name_en = cell_text(link);

            let cells: Vec<ElementRef<'_>> = row.select(&cell_sel).collect();
            let played = stat_at(&columns, &cells, StatColumn::Played);
            let points = stat_at(&columns, &cells, StatColumn::Points);
            // Guard against header repeats and decorative/summary rows.
            if played.unwrap_or(0) <= 0 && points.unwrap_or(0) <= 0 {
                continue;
            }

            let position = cells
                .first()
                .and_then(|c| leading_digits(&cell_text(*c)))
                .unwrap_or(standings.len() as i32 + 1);

            let goals_for = stat_at(&columns, &cells, StatColumn::GoalsFor).unwrap_or(0);
            let goals_against = stat_at(&columns, &cells, StatColumn::GoalsAgainst).unwrap_or(0);
            let goal_difference = stat_at(&columns, &cells, StatColumn::GoalDifference)
                .unwrap_or(goals_for - goals_against);

            standings.push(ScrapedStanding {
                position,
                saff_team_id,
                team_name_en,
                team_name_ar: String::new(),
                played: played.unwrap_or(0),
                won: stat_at(&columns, &cells, StatColumn::Won).unwrap_or(0),
                drawn: stat_at(&columns, &cells, StatColumn::Drawn).unwrap_or(0),
                lost: stat_at(&columns, &cells, StatColumn::Lost).unwrap_or(0),
                goals_for,
                goals_against,
                goal_difference,
                points: points.unwrap_or(0),
            });
        }
    }

    standings.sort_by_key(|s| s.position);
    Ok(standings)
}
