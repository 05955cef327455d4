//! Fixture list extraction.
//!
//! Fixture pages interleave date-marker rows (calendar links) with match
//! rows, so the current date is carried forward statefully within each
//! table. Rows seen before the first date marker have no usable date and
//! are dropped.

use std::collections::HashSet;

use chrono::NaiveDate;
use scraper::{ElementRef, Html};

use saff_core::ScrapedFixture;

use crate::{cell_text, extract_team_id, selector, ScrapeError};

/// Parse the `YYYY-MM-DD` value out of a `calendar_date=` link.
fn calendar_date(href: &str) -> Option<NaiveDate> {
    let start = href.find("calendar_date=")? + "calendar_date=".len();
    let raw = href.get(start..start + 10)?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Kick-off time cell: `H:MM` or `HH:MM`, digits only around the colon.
fn is_time(text: &str) -> bool {
    let Some((hours, minutes)) = text.split_once(':') else {
        return false;
    };
    (1..=2).contains(&hours.len())
        && minutes.len() == 2
        && hours.chars().all(|c| c.is_ascii_digit())
        && minutes.chars().all(|c| c.is_ascii_digit())
}

/// Score cell: digits, a hyphen, digits. Whitespace around the hyphen
/// varies between rounds, so it is optional.
fn parse_score(text: &str) -> Option<(i32, i32)> {
    let (home, away) = text.trim().split_once('-')?;
    let home = home.trim();
    let away = away.trim();
    if home.is_empty()
        || away.is_empty()
        || !home.bytes().all(|b| b.is_ascii_digit())
        || !away.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    Some((home.parse().ok()?, away.parse().ok()?))
}

/// Venue cell: `Stadium Name (City)`, city optional. Placeholder cells
/// (empty, `-`, or leading digits, which would be a score or time) yield
/// nothing.
fn parse_venue(text: &str) -> Option<(String, String)> {
    let text = text.trim();
    if text.is_empty() || text == "-" || text.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    if let Some(open) = text.rfind('(') {
        if text.ends_with(')') {
            let stadium = text[..open].trim().to_string();
            let city = text[open + 1..text.len() - 1].trim().to_string();
            if !stadium.is_empty() {
                return Some((stadium, city));
            }
        }
    }
    Some((text.to_string(), String::new()))
}

/// Extract fixtures from every table on the page. Duplicate rows (same date
/// and team pair, a quirk of pages that repeat the current round) keep their
/// first occurrence only.
pub fn extract_fixtures(document: &Html) -> Result<Vec<ScrapedFixture>, ScrapeError> {
    let table_sel = selector("table")?;
    let row_sel = selector("tr")?;
    let cell_sel = selector("td")?;
    let team_link_sel = selector(r#"a[href*="team.php"]"#)?;
    let date_link_sel = selector(r#"a[href*="calendar_date"]"#)?;

    let mut fixtures: Vec<ScrapedFixture> = Vec::new();

    for table in document.select(&table_sel) {
        // Date markers apply to every following match row in the same table.
        let mut current_date: Option<NaiveDate> = None;

        for row in table.select(&row_sel) {
            if let Some(date) = row
                .select(&date_link_sel)
                .filter_map(|a| a.value().attr("href").and_then(calendar_date))
                .next()
            {
                current_date = Some(date);
            }

            let teams: Vec<(i32, String)> = row
                .select(&team_link_sel)
                .filter_map(|a| {
                    let id = a.value().attr("href").and_then(extract_team_id)?;
                    Some((id, cell_text(a)))
                })
                .collect();
            if teams.len() < 2 {
                continue;
            }
            let Some(date) = current_date else {
                continue;
            };

            let cells: Vec<ElementRef<'_>> = row.select(&cell_sel).collect();
            let mut time = None;
            let mut score = None;
            for cell in &cells {
                let text = cell_text(*cell);
                if time.is_none() && is_time(&text) {
                    time = Some(text);
                } else if score.is_none() {
                    score = parse_score(&text);
                }
            }
            let venue = cells.last().and_then(|c| parse_venue(&cell_text(*c)));
            let (stadium, city) = venue.unwrap_or_default();

            fixtures.push(ScrapedFixture {
                date,
                time,
                saff_home_team_id: teams[0].0,
                home_team_name_en: teams[0].1.clone(),
                saff_away_team_id: teams[1].0,
                away_team_name_en: teams[1].1.clone(),
                home_score: score.map(|(h, _)| h),
                away_score: score.map(|(_, a)| a),
                stadium,
                city,
            });
        }
    }

    let mut seen = HashSet::new();
    fixtures.retain(|f| seen.insert((f.date, f.saff_home_team_id, f.saff_away_team_id)));
    Ok(fixtures)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(body: &str) -> Html {
        Html::parse_document(body)
    }

    #[test]
    fn date_marker_applies_to_following_rows() {
        let html = r#"
            <table>
              <tr><td><a href="matches.php?calendar_date=2025-09-12">Fri 12 Sep</a></td></tr>
              <tr>
                <td>18:00</td>
                <td><a href="team.php?id=1001">Al Hilal</a></td>
                <td>vs</td>
                <td><a href="team.php?id=1002">Al Nassr</a></td>
                <td>Kingdom Arena (Riyadh)</td>
              </tr>
              <tr>
                <td>20:30</td>
                <td><a href="team.php?id=1003">Al Ahli</a></td>
                <td>2 - 1</td>
                <td><a href="team.php?id=1004">Al Ittihad</a></td>
                <td>Alinma Stadium (Jeddah)</td>
              </tr>
            </table>"#;
        let fixtures = extract_fixtures(&doc(html)).unwrap();
        assert_eq!(fixtures.len(), 2);
        for f in &fixtures {
            assert_eq!(f.date, NaiveDate::from_ymd_opt(2025, 9, 12).unwrap());
        }
        assert_eq!(fixtures[0].time.as_deref(), Some("18:00"));
        assert_eq!(fixtures[0].home_score, None);
        assert_eq!(fixtures[0].stadium, "Kingdom Arena");
        assert_eq!(fixtures[0].city, "Riyadh");
        assert_eq!(fixtures[1].home_score, Some(2));
        assert_eq!(fixtures[1].away_score, Some(1));
    }

    #[test]
    fn rows_before_first_date_marker_are_dropped() {
        let html = r#"
            <table>
              <tr>
                <td><a href="team.php?id=1">A</a></td>
                <td><a href="team.php?id=2">B</a></td>
              </tr>
              <tr><td><a href="?calendar_date=2025-10-01">Wed</a></td></tr>
              <tr>
                <td><a href="team.php?id=3">C</a></td>
                <td><a href="team.php?id=4">D</a></td>
              </tr>
            </table>"#;
        let fixtures = extract_fixtures(&doc(html)).unwrap();
        assert_eq!(fixtures.len(), 1);
        assert_eq!(fixtures[0].saff_home_team_id, 3);
    }

    #[test]
    fn duplicate_pairings_keep_first_occurrence() {
        let html = r#"
            <table>
              <tr><td><a href="?calendar_date=2025-10-01">Wed</a></td></tr>
              <tr>
                <td>18:00</td>
                <td><a href="team.php?id=1">A</a></td>
                <td><a href="team.php?id=2">B</a></td>
              </tr>
              <tr>
                <td>21:00</td>
                <td><a href="team.php?id=1">A</a></td>
                <td><a href="team.php?id=2">B</a></td>
              </tr>
            </table>"#;
        let fixtures = extract_fixtures(&doc(html)).unwrap();
        assert_eq!(fixtures.len(), 1);
        assert_eq!(fixtures[0].time.as_deref(), Some("18:00"));
    }

    #[test]
    fn venue_without_city_keeps_stadium_only() {
        let html = r#"
            <table>
              <tr><td><a href="?calendar_date=2025-10-01">Wed</a></td></tr>
              <tr>
                <td><a href="team.php?id=1">A</a></td>
                <td><a href="team.php?id=2">B</a></td>
                <td>Prince Sultan Stadium</td>
              </tr>
            </table>"#;
        let fixtures = extract_fixtures(&doc(html)).unwrap();
        assert_eq!(fixtures[0].stadium, "Prince Sultan Stadium");
        assert_eq!(fixtures[0].city, "");
    }

    #[test]
    fn time_and_score_cells_are_recognized() {
        assert!(is_time("18:00"));
        assert!(is_time("9:05"));
        assert!(!is_time("2 - 1"));
        assert!(!is_time("18h00"));
        assert_eq!(parse_score("2 - 1"), Some((2, 1)));
        assert_eq!(parse_score("0 - 0"), Some((0, 0)));
        assert_eq!(parse_score("2-1"), Some((2, 1)));
        assert_eq!(parse_score("2 -1"), Some((2, 1)));
        assert_eq!(parse_score("vs"), None);
        assert_eq!(parse_score("12-09-2025"), None);
    }

    #[test]
    fn unspaced_score_is_parsed() {
        let html = r#"
            <table>
              <tr><td><a href="?calendar_date=2025-10-01">Wed</a></td></tr>
              <tr>
                <td><a href="team.php?id=1">A</a></td>
                <td>2-1</td>
                <td><a href="team.php?id=2">B</a></td>
              </tr>
            </table>"#;
        let fixtures = extract_fixtures(&doc(html)).unwrap();
        assert_eq!(fixtures[0].home_score, Some(2));
        assert_eq!(fixtures[0].away_score, Some(1));
    }
}
