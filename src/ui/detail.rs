//! One-line description of the selected card for the status bar.

use chrono::NaiveDate;

use crate::core::render::DisplayFragment;

/// `"1999-03-31"` → `"31 Mar 1999"`; anything unparsable is shown verbatim.
pub fn format_release_date(raw: &str) -> String {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|d| d.format("%-d %b %Y").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

pub fn describe(card: &DisplayFragment, link: Option<&str>) -> String {
    let title: String = card.title.chars().filter(|c| !c.is_control()).collect();
    let mut parts = vec![title];
    if let Some(date) = card.release_date.as_deref().filter(|d| !d.is_empty()) {
        parts.push(format_release_date(date));
    }
    parts.push(format!("★ {}", card.rating));
    parts.push(link.unwrap_or(card.href.as_str()).to_string());
    parts.join(" · ")
}
