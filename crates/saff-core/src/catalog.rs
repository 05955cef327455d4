//! Static seed list of known federation championships.
//!
//! Mirrors the catalog on saff.com.sa/en/championships.php. Entries are
//! created once via idempotent seeding and never deleted; only
//! `last_synced_at` changes afterwards.

use crate::{AgencyValue, Category};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TournamentSeed {
    pub saff_id: i32,
    pub name: &'static str,
    pub name_ar: &'static str,
    pub category: Category,
    pub tier: i32,
    pub agency_value: AgencyValue,
    pub icon: &'static str,
}

const fn seed(
    saff_id: i32,
    name: &'static str,
    name_ar: &'static str,
    category: Category,
    tier: i32,
    agency_value: AgencyValue,
    icon: &'static str,
) -> TournamentSeed {
    TournamentSeed {
        saff_id,
        name,
        name_ar,
        category,
        tier,
        agency_value,
        icon,
    }
}

use AgencyValue::{Critical, High, Low, Medium, Niche, Scouting};
use Category::{Beach, Esports, Futsal, Grassroots, Pro, Women, Youth, YouthD1, YouthD2};

static TOURNAMENT_SEED: &[TournamentSeed] = &[
    seed(333, "Roshn Saudi League", "دوري روشن السعودي", Pro, 1, Critical, "🏟️"),
    seed(342, "King Cup", "كأس الملك", Pro, 1, High, "🏆"),
    seed(329, "Saudi Super Cup", "كأس السوبر السعودي", Pro, 1, High, "⭐"),
    seed(334, "Saudi League 1st Division", "دوري الدرجة الأولى", Pro, 2, High, "🏟️"),
    seed(335, "Second Division League", "دوري الدرجة الثانية", Pro, 3, Medium, "🏟️"),
    seed(336, "Saudi League 3rd Division", "دوري الدرجة الثالثة", Pro, 4, Medium, "🏟️"),
    seed(366, "Saudi League 4th Division", "دوري الدرجة الرابعة", Pro, 5, Low, "🏟️"),
    seed(350, "Jawwy Elite League U-21", "دوري جوي النخبة تحت 21", Youth, 1, Critical, "🌟"),
    seed(351, "Saudi U-18 Premier League", "الدوري الممتاز تحت 18", Youth, 1, Critical, "🌟"),
    seed(352, "Saudi U-17 Premier League", "الدوري الممتاز تحت 17", Youth, 1, High, "🌟"),
    seed(353, "Saudi U-16 Premier League", "الدوري الممتاز تحت 16", Youth, 1, High, "🌟"),
    seed(354, "Saudi U-15 Premier League", "الدوري الممتاز تحت 15", Youth, 1, Medium, "🌟"),
    seed(371, "Saudi U-21 League Div.1", "دوري الأولى تحت 21", YouthD1, 2, Medium, "📋"),
    seed(355, "Saudi U-18 League Div.1", "دوري الأولى تحت 18", YouthD1, 2, Medium, "📋"),
    seed(356, "Saudi U-17 League Div.1", "دوري الأولى تحت 17", YouthD1, 2, Medium, "📋"),
    seed(357, "Saudi U-16 League Div.1", "دوري الأولى تحت 16", YouthD1, 2, Low, "📋"),
    seed(358, "Saudi U-15 League Div.1", "دوري الأولى تحت 15", YouthD1, 2, Low, "📋"),
    seed(367, "Saudi U-18 League Div.2", "دوري الثانية تحت 18", YouthD2, 3, Low, "🔍"),
    seed(368, "Saudi U-17 League Div.2", "دوري الثانية تحت 17", YouthD2, 3, Low, "🔍"),
    seed(369, "Saudi U-16 League Div.2", "دوري الثانية تحت 16", YouthD2, 3, Low, "🔍"),
    seed(370, "Saudi U-15 League Div.2", "دوري الثانية تحت 15", YouthD2, 3, Low, "🔍"),
    seed(341, "Saudi U-14 Regional Tournament", "بطولة المناطق تحت 14", Grassroots, 4, Scouting, "🌱"),
    seed(331, "Saudi U-13 Regional Tournament", "بطولة المناطق تحت 13", Grassroots, 4, Scouting, "🌱"),
    seed(386, "League U14", "دوري تحت 14", Grassroots, 4, Scouting, "🌱"),
    seed(387, "League U13", "دوري تحت 13", Grassroots, 4, Scouting, "🌱"),
    seed(388, "League U12", "دوري تحت 12", Grassroots, 5, Scouting, "🌱"),
    seed(389, "League U11", "دوري تحت 11", Grassroots, 5, Scouting, "🌱"),
    seed(345, "Women's Premier League", "الدوري النسائي الممتاز", Women, 1, High, "⚽"),
    seed(361, "SAFF Women's Cup", "كأس الاتحاد النسائي", Women, 1, High, "🏆"),
    seed(322, "Saudi Women's Super Cup", "كأس السوبر النسائي", Women, 1, Medium, "⭐"),
    seed(385, "Women's Premier Challenge Cup", "كأس تحدي الدوري الممتاز", Women, 2, Medium, "🏆"),
    seed(346, "Women's 1st Div. League", "الدوري النسائي الأولى", Women, 2, Medium, "⚽"),
    seed(372, "Women's 2nd Div. League", "الدوري النسائي الثانية", Women, 3, Low, "⚽"),
    seed(347, "Women's Premier League U-17", "الدوري النسائي تحت 17", Women, 2, Medium, "🌟"),
    seed(384, "Saudi Girls U-17 1st Div.", "دوري الأولى للبنات تحت 17", Women, 3, Low, "🌟"),
    seed(374, "SAFF Girl's U-15 Tournament", "بطولة الاتحاد للبنات تحت 15", Women, 3, Scouting, "🌱"),
    seed(299, "Women's Futsal Tournament", "بطولة كرة الصالات النسائية", Women, 2, Low, "🏠"),
    seed(362, "Saudi Futsal League", "دوري كرة الصالات", Futsal, 1, Medium, "🏠"),
    seed(314, "Saudi Futsal League 1st Div.", "دوري الصالات الأولى", Futsal, 2, Low, "🏠"),
    seed(396, "SAFF Futsal Cup", "كأس الاتحاد للصالات", Futsal, 1, Low, "🏆"),
    seed(394, "Saudi Super Futsal Cup", "كأس السوبر للصالات", Futsal, 1, Low, "⭐"),
    seed(395, "Saudi Futsal League U-20", "دوري الصالات تحت 20", Futsal, 2, Low, "🌟"),
    seed(380, "Saudi Beach Soccer Premier League", "دوري كرة الشاطئ الممتاز", Beach, 1, Low, "🏖️"),
    seed(318, "Beach Soccer 1st Div. League", "دوري كرة الشاطئ الأولى", Beach, 2, Low, "🏖️"),
    seed(174, "Kingdom eCup", "كأس المملكة الإلكتروني", Esports, 1, Niche, "🎮"),
];

pub fn tournament_seed() -> &'static [TournamentSeed] {
    TOURNAMENT_SEED
}
