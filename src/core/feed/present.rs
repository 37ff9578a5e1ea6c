//! Display cards derived from canonical rows, plus a plain-text rendering
//! for terminals.

use std::fmt::Write as _;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::types::{CanonicalRow, FeedKind};

pub const DEFAULT_IMAGE_URL: &str = "https://upload.wikimedia.org/wikipedia/commons/7/7a/Basketball.png";
pub const DEFAULT_HOME_TEAM: &str = "Scorpions";
pub const DEFAULT_AWAY_TEAM: &str = "Gegner";
pub const EMPTY_FEED_TEXT: &str = "Keine Einträge";
const MAX_TEAM_CHIPS: usize = 3;
const MISSING_SCORE: &str = "–";

static DRIVE_FILE_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)drive\.google\.com/file/d/([^/]+)").expect("drive file pattern must compile")
});
static QUERY_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[?&]id=([^&]+)").expect("query id pattern must compile"));

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreLine {
    pub home: String,
    pub away: String,
    pub home_score: Option<f64>,
    pub away_score: Option<f64>,
    pub chips: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardLink {
    pub url: String,
    pub label: String,
    pub is_youtube: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedCard {
    pub id: String,
    pub kind: FeedKind,
    pub badge: &'static str,
    pub image_url: Option<String>,
    pub title: Option<String>,
    pub text: Option<String>,
    pub venue: Option<String>,
    pub date_label: Option<String>,
    pub score: Option<ScoreLine>,
    pub link: Option<CardLink>,
}

impl FeedCard {
    pub fn from_row(row: &CanonicalRow) -> Self {
        let image_url = match row.kind {
            FeedKind::Result => Some(
                row.image
                    .as_deref()
                    .map(display_image_url)
                    .unwrap_or_else(|| DEFAULT_IMAGE_URL.to_string()),
            ),
            FeedKind::Training => None,
            FeedKind::News | FeedKind::Unknown => row.image.as_deref().map(display_image_url),
        };
        let score = (row.kind == FeedKind::Result).then(|| score_line(row));
        let link = match row.kind {
            FeedKind::Training => None,
            _ => row.link_url.as_deref().map(|url| card_link(url, row.link_label.as_deref())),
        };

        Self {
            id: row.id.clone(),
            kind: row.kind,
            badge: badge_label(row.kind),
            image_url,
            title: row.title.clone(),
            text: row.text.clone(),
            venue: (row.kind == FeedKind::Result).then(|| row.venue.clone()).flatten(),
            date_label: row.date_label.clone(),
            score,
            link,
        }
    }
}

pub fn badge_label(kind: FeedKind) -> &'static str {
    match kind {
        FeedKind::Result => "Ergebnis",
        FeedKind::Training => "Training",
        FeedKind::News | FeedKind::Unknown => "News",
    }
}

pub fn looks_like_youtube(url: &str) -> bool {
    let url = url.to_lowercase();
    url.contains("youtube.com") || url.contains("youtu.be")
}

/// Rewrites Google Drive share links to a directly loadable thumbnail URL.
/// Other URLs pass through trimmed.
pub fn display_image_url(url: &str) -> String {
    let url = url.trim();
    let file_id = DRIVE_FILE_ID
        .captures(url)
        .and_then(|captures| captures.get(1))
        .or_else(|| {
            if !url.contains("drive.google.com") {
                return None;
            }
            QUERY_ID.captures(url).and_then(|captures| captures.get(1))
        });

    match file_id {
        Some(id) => format!("https://drive.google.com/thumbnail?id={}&sz=w1200", id.as_str()),
        None => url.to_string(),
    }
}

fn card_link(url: &str, label: Option<&str>) -> CardLink {
    let is_youtube = looks_like_youtube(url);
    let label = match label {
        Some(label) => label.to_string(),
        None if is_youtube => "YouTube".to_string(),
        None => "Link öffnen".to_string(),
    };
    CardLink {
        url: url.to_string(),
        label,
        is_youtube,
    }
}

fn score_line(row: &CanonicalRow) -> ScoreLine {
    let mut chips: Vec<String> = row.teams.iter().take(MAX_TEAM_CHIPS).cloned().collect();
    chips.extend(row.competition.clone());

    ScoreLine {
        home: row.home.clone().unwrap_or_else(|| DEFAULT_HOME_TEAM.to_string()),
        away: row.away.clone().unwrap_or_else(|| DEFAULT_AWAY_TEAM.to_string()),
        home_score: row.home_score,
        away_score: row.away_score,
        chips,
    }
}

fn format_score(score: Option<f64>) -> String {
    score.map_or_else(|| MISSING_SCORE.to_string(), |value| value.to_string())
}

pub fn render_card(card: &FeedCard) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[{}] {}", card.badge, card.id);
    if let Some(score) = &card.score {
        if !score.chips.is_empty() {
            let _ = writeln!(out, "  {}", score.chips.join(" · "));
        }
        let _ = writeln!(
            out,
            "  {} {} : {} {}",
            score.home,
            format_score(score.home_score),
            format_score(score.away_score),
            score.away
        );
    }
    for line in [&card.title, &card.text, &card.venue].into_iter().flatten() {
        let _ = writeln!(out, "  {line}");
    }
    if let Some(date_label) = &card.date_label {
        let _ = writeln!(out, "  {date_label}");
    }
    if let Some(image_url) = &card.image_url {
        let _ = writeln!(out, "  Bild: {image_url}");
    }
    if let Some(link) = &card.link {
        let _ = writeln!(out, "  {}: {}", link.label, link.url);
    }
    out
}

pub fn render_cards(cards: &[FeedCard]) -> String {
    if cards.is_empty() {
        return format!("{EMPTY_FEED_TEXT}\n");
    }
    cards.iter().map(render_card).collect::<Vec<_>>().join("\n")
}
