//! Maps loosely typed feed rows onto [`CanonicalRow`].
//!
//! Every canonical field reads from an ordered list of alias keys; the first
//! alias holding a usable value wins. Normalization never fails: missing or
//! malformed fields end up absent.

use std::fmt::Display;

use chrono::TimeZone;

use super::date::parse_date_in;
use super::teams::parse_teams;
use super::types::{CanonicalRow, FeedKind, RawRow, RawValue};

pub const MISSING_ID: &str = "(ohne-id)";

/// Rendering of `date` in `date_label`.
pub const DATE_LABEL_FORMAT: &str = "%d.%m.%Y %H:%M";

pub const ID_ALIASES: &[&str] = &["id", "ID", "key", "slug"];
pub const KIND_ALIASES: &[&str] = &["type", "kind", "category"];
pub const TITLE_ALIASES: &[&str] = &["title", "headline", "titel", "name"];
pub const TEXT_ALIASES: &[&str] = &["text", "body", "beschreibung", "desc"];
pub const IMAGE_ALIASES: &[&str] = &["heroImageUrl", "image", "img", "bild", "imageUrl"];
pub const LINK_URL_ALIASES: &[&str] = &["linkUrl", "url", "youtubeUrl"];
pub const LINK_LABEL_ALIASES: &[&str] = &["linkLabel", "linkText", "label"];
pub const DATE_ALIASES: &[&str] = &["date", "datum", "created", "timestamp", "time"];
pub const HOME_ALIASES: &[&str] = &["homeTeam", "home", "heim", "teamHome"];
pub const AWAY_ALIASES: &[&str] = &["awayTeam", "away", "gast", "teamAway"];
pub const HOME_SCORE_ALIASES: &[&str] = &["homeScore", "scoreHome", "heimPunkte"];
pub const AWAY_SCORE_ALIASES: &[&str] = &["awayScore", "scoreAway", "gastPunkte"];
pub const TEAM_IDS_ALIASES: &[&str] = &["teamIds", "teamId", "team", "teams"];
pub const COMPETITION_ALIASES: &[&str] = &["competition", "liga", "league"];
pub const VENUE_ALIASES: &[&str] = &["venue", "halle", "stadion"];
pub const HIGHLIGHTS_ALIASES: &[&str] = &["highlights", "highlight", "notes"];
pub const TRAINING_TYPE_ALIASES: &[&str] = &["trainingType", "training", "einheit"];
pub const DURATION_ALIASES: &[&str] = &["durationMin", "minutes", "dauer"];
pub const INTENSITY_ALIASES: &[&str] = &["intensity", "belastung", "level"];

/// Normalizes a row, reading local times in the machine's timezone.
pub fn normalize_row(row: &RawRow) -> CanonicalRow {
    normalize_row_in(row, &chrono::Local)
}

pub fn normalize_row_in<Tz>(row: &RawRow, tz: &Tz) -> CanonicalRow
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let date = first_present(row, DATE_ALIASES).and_then(|raw| parse_date_in(raw, tz));
    let date_label = date.map(|instant| {
        instant
            .with_timezone(tz)
            .format(DATE_LABEL_FORMAT)
            .to_string()
    });
    let team_ids = first_text(row, TEAM_IDS_ALIASES);
    let teams = parse_teams(team_ids.clone().map(RawValue::Text).as_ref());

    CanonicalRow {
        id: first_text(row, ID_ALIASES).unwrap_or_else(|| MISSING_ID.to_string()),
        raw_type: row.get("type").and_then(RawValue::to_clean_text),
        kind: classify_kind(row),
        title: first_text(row, TITLE_ALIASES),
        text: first_text(row, TEXT_ALIASES),
        image: first_text(row, IMAGE_ALIASES),
        link_url: first_text(row, LINK_URL_ALIASES),
        link_label: first_text(row, LINK_LABEL_ALIASES),
        date,
        date_label,
        home: first_text(row, HOME_ALIASES),
        away: first_text(row, AWAY_ALIASES),
        home_score: first_number(row, HOME_SCORE_ALIASES),
        away_score: first_number(row, AWAY_SCORE_ALIASES),
        team_ids,
        teams,
        competition: first_text(row, COMPETITION_ALIASES),
        venue: first_text(row, VENUE_ALIASES),
        highlights: first_text(row, HIGHLIGHTS_ALIASES),
        training_type: first_text(row, TRAINING_TYPE_ALIASES),
        duration_min: first_number(row, DURATION_ALIASES),
        intensity: first_text(row, INTENSITY_ALIASES),
    }
}

/// Classifies a row by keyword containment. Result beats training beats news.
pub fn classify_kind(row: &RawRow) -> FeedKind {
    kind_from_label(&first_text(row, KIND_ALIASES).unwrap_or_default())
}

pub fn kind_from_label(label: &str) -> FeedKind {
    let label = label.to_lowercase();
    if label.contains("result") || label.contains("ergebnis") {
        FeedKind::Result
    } else if label.contains("training") || label.contains("workout") {
        FeedKind::Training
    } else if label.contains("news") || label.contains("nachricht") {
        FeedKind::News
    } else {
        FeedKind::Unknown
    }
}

pub fn first_text(row: &RawRow, aliases: &[&str]) -> Option<String> {
    aliases
        .iter()
        .find_map(|key| row.get(key).and_then(RawValue::to_clean_text))
}

pub fn first_number(row: &RawRow, aliases: &[&str]) -> Option<f64> {
    aliases
        .iter()
        .find_map(|key| row.get(key).and_then(RawValue::to_finite_number))
}

pub fn first_present<'a>(row: &'a RawRow, aliases: &[&str]) -> Option<&'a RawValue> {
    aliases
        .iter()
        .find_map(|key| row.get(key).filter(|value| !value.is_blank()))
}
