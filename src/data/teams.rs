//! League directory: the 32 franchises

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Conference {
    AFC,
    NFC,
}

impl fmt::Display for Conference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conference::AFC => write!(f, "AFC"),
            Conference::NFC => write!(f, "NFC"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Division {
    North,
    South,
    East,
    West,
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Division::North => "North",
            Division::South => "South",
            Division::East => "East",
            Division::West => "West",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NflTeam {
    pub name: &'static str,
    pub code: &'static str,
    pub conference: Conference,
    pub division: Division,
    pub city: &'static str,
    pub stadium: &'static str,
    pub established: u16,
    /// Team id used by the ESPN site API
    pub espn_id: &'static str,
}

const fn team(
    name: &'static str,
    code: &'static str,
    conference: Conference,
    division: Division,
    city: &'static str,
    stadium: &'static str,
    established: u16,
    espn_id: &'static str,
) -> NflTeam {
    NflTeam {
        name,
        code,
        conference,
        division,
        city,
        stadium,
        established,
        espn_id,
    }
}

use Conference::{AFC, NFC};
use Division::{East, North, South, West};

pub const TEAMS: [NflTeam; 32] = [
    team("Arizona Cardinals", "ARI", NFC, West, "Arizona", "State Farm Stadium", 1898, "22"),
    team("Atlanta Falcons", "ATL", NFC, South, "Atlanta", "Mercedes-Benz Stadium", 1966, "1"),
    team("Baltimore Ravens", "BAL", AFC, North, "Baltimore", "M&T Bank Stadium", 1996, "33"),
    team("Buffalo Bills", "BUF", AFC, East, "Buffalo", "Highmark Stadium", 1960, "2"),
    team("Carolina Panthers", "CAR", NFC, South, "Carolina", "Bank of America Stadium", 1995, "29"),
    team("Chicago Bears", "CHI", NFC, North, "Chicago", "Soldier Field", 1920, "3"),
    team("Cincinnati Bengals", "CIN", AFC, North, "Cincinnati", "Paycor Stadium", 1968, "4"),
    team("Cleveland Browns", "CLE", AFC, North, "Cleveland", "Cleveland Browns Stadium", 1946, "5"),
    team("Dallas Cowboys", "DAL", NFC, East, "Dallas", "AT&T Stadium", 1960, "6"),
    team("Denver Broncos", "DEN", AFC, West, "Denver", "Empower Field at Mile High", 1960, "7"),
    team("Detroit Lions", "DET", NFC, North, "Detroit", "Ford Field", 1930, "8"),
    team("Green Bay Packers", "GB", NFC, North, "Green Bay", "Lambeau Field", 1919, "9"),
    team("Houston Texans", "HOU", AFC, South, "Houston", "NRG Stadium", 2002, "34"),
    team("Indianapolis Colts", "IND", AFC, South, "Indianapolis", "Lucas Oil Stadium", 1953, "11"),
    team("Jacksonville Jaguars", "JAX", AFC, South, "Jacksonville", "TIAA Bank Field", 1995, "30"),
    team("Kansas City Chiefs", "KC", AFC, West, "Kansas City", "Arrowhead Stadium", 1960, "12"),
    team("Las Vegas Raiders", "LV", AFC, West, "Las Vegas", "Allegiant Stadium", 1960, "13"),
    team("Los Angeles Chargers", "LAC", AFC, West, "Los Angeles", "SoFi Stadium", 1960, "24"),
    team("Los Angeles Rams", "LAR", NFC, West, "Los Angeles", "SoFi Stadium", 1937, "14"),
    team("Miami Dolphins", "MIA", AFC, East, "Miami", "Hard Rock Stadium", 1966, "15"),
    team("Minnesota Vikings", "MIN", NFC, North, "Minneapolis", "U.S. Bank Stadium", 1961, "16"),
    team("New England Patriots", "NE", AFC, East, "Foxborough", "Gillette Stadium", 1960, "17"),
    team("New Orleans Saints", "NO", NFC, South, "New Orleans", "Caesars Superdome", 1967, "18"),
    team("New York Giants", "NYG", NFC, East, "East Rutherford", "MetLife Stadium", 1925, "19"),
    team("New York Jets", "NYJ", AFC, East, "East Rutherford", "MetLife Stadium", 1960, "20"),
    team("Philadelphia Eagles", "PHI", NFC, East, "Philadelphia", "Lincoln Financial Field", 1933, "21"),
    team("Pittsburgh Steelers", "PIT", AFC, North, "Pittsburgh", "Heinz Field", 1933, "23"),
    team("San Francisco 49ers", "SF", NFC, West, "San Francisco", "Levi's Stadium", 1946, "25"),
    team("Seattle Seahawks", "SEA", NFC, West, "Seattle", "Lumen Field", 1976, "26"),
    team("Tampa Bay Buccaneers", "TB", NFC, South, "Tampa Bay", "Raymond James Stadium", 1976, "27"),
    team("Tennessee Titans", "TEN", AFC, South, "Nashville", "Nissan Stadium", 1960, "10"),
    team("Washington Commanders", "WAS", NFC, East, "Washington", "FedExField", 1932, "28"),
];

/// ESPN abbreviations that differ from ours
const ESPN_ALIASES: &[(&str, &str)] = &[("WSH", "WAS"), ("JAC", "JAX"), ("LA", "LAR")];

pub fn team_by_code(code: &str) -> Option<&'static NflTeam> {
    TEAMS.iter().find(|t| t.code.eq_ignore_ascii_case(code))
}

pub fn team_by_espn_id(espn_id: &str) -> Option<&'static NflTeam> {
    TEAMS.iter().find(|t| t.espn_id == espn_id)
}

pub fn teams_by_conference(conference: Conference) -> Vec<&'static NflTeam> {
    TEAMS.iter().filter(|t| t.conference == conference).collect()
}

pub fn teams_by_division(conference: Conference, division: Division) -> Vec<&'static NflTeam> {
    TEAMS
        .iter()
        .filter(|t| t.conference == conference && t.division == division)
        .collect()
}

/// Both teams known and in the same conference and division
pub fn same_division(a: &str, b: &str) -> bool {
    match (team_by_code(a), team_by_code(b)) {
        (Some(a), Some(b)) => a.conference == b.conference && a.division == b.division,
        _ => false,
    }
}

/// Map an ESPN abbreviation onto our team code
pub fn normalize_code(abbreviation: &str) -> String {
    let upper = abbreviation.trim().to_uppercase();
    ESPN_ALIASES
        .iter()
        .find(|(espn, _)| *espn == upper)
        .map(|(_, ours)| ours.to_string())
        .unwrap_or(upper)
}

/// Display name, falling back to the raw code
pub fn display_name(code: &str) -> String {
    team_by_code(code)
        .map(|t| t.name.to_string())
        .unwrap_or_else(|| code.to_string())
}
