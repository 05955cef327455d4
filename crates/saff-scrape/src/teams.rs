//! Team discovery: every team-profile link anywhere on the page.

use std::collections::HashSet;

use scraper::Html;

use saff_core::ScrapedTeam;

use crate::{cell_text, extract_team_id, selector, ScrapeError};

/// Collect every team linked from the page, in document order. A team that
/// appears several times (standings row plus fixtures) keeps the name of its
/// first occurrence.
pub fn extract_teams(document: &Html) -> Result<Vec<ScrapedTeam>, ScrapeError> {
    let team_link_sel = selector(r#"a[href*="team.php"]"#)?;

    let mut seen = HashSet::new();
    let mut teams = Vec::new();
    for link in document.select(&team_link_sel) {
        let Some(id) = link.value().attr("href").and_then(extract_team_id) else {
            continue;
        };
        let name = cell_text(link);
        if name.is_empty() || !seen.insert(id) {
            continue;
        }
        teams.push(ScrapedTeam {
            saff_team_id: id,
            team_name_en: name,
        });
    }
    Ok(teams)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_occurrence_wins_and_badges_are_skipped() {
        let html = r#"
            <div>
              <a href="team.php?id=1001">Al Hilal</a>
              <a href="team.php?id=1001"><img src="badge.png"></a>
              <a href="team.php?id=1002">Al Nassr</a>
              <a href="team.php?id=bad">Broken</a>
            </div>"#;
        let teams = extract_teams(&Html::parse_document(html)).unwrap();
        assert_eq!(teams.len(), 2);
        assert_eq!(teams[0].saff_team_id, 1001);
        assert_eq!(teams[0].team_name_en, "Al Hilal");
        assert_eq!(teams[1].team_name_en, "Al Nassr");
    }

    #[test]
    fn page_without_team_links_yields_nothing() {
        let teams = extract_teams(&Html::parse_document("<p>no data</p>")).unwrap();
        assert!(teams.is_empty());
    }
}
