//! Listing item → display fragment.
//!
//! A fragment carries both the structural fields (for the terminal grid) and
//! the HTML card markup (for `--html` output).  Every untrusted string that
//! reaches the markup goes through [`escape_html`].

use serde::{Deserialize, Deserializer};

/// Poster CDN prefix; the item's `poster_path` is appended verbatim.
pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w300";

/// Rating text used when an item has no usable rating.
pub const RATING_PLACEHOLDER: &str = "N/A";

/// One movie as returned by the listing API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ListingItem {
    pub id: u64,
    /// `null` and a missing key both decode as an empty title.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Image slot of a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardImage {
    /// Lazy-loaded poster.
    Poster { src: String },
    /// Grey block with a film icon.
    Placeholder,
}

/// Rendered card, ready to append to the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayFragment {
    pub id: u64,
    /// Link target of the card (`/movie/<id>`).
    pub href: String,
    pub title: String,
    /// Four-digit year, or empty.
    pub year: String,
    /// One decimal place, or [`RATING_PLACEHOLDER`].
    pub rating: String,
    /// Full release date as supplied, for detail views.
    pub release_date: Option<String>,
    pub image: CardImage,
    /// Escaped HTML for the card.
    pub markup: String,
}

/// Escape the five HTML-significant characters.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// First four characters of the release date, or empty.
fn release_year(date: Option<&str>) -> String {
    date.map(|d| d.chars().take(4).collect())
        .unwrap_or_default()
}

/// A zero rating is indistinguishable from "unrated" upstream.
fn rating_text(vote: Option<f64>) -> String {
    match vote {
        Some(v) if v != 0.0 && v.is_finite() => one_decimal(v),
        _ => RATING_PLACEHOLDER.to_string(),
    }
}

/// One decimal place, exact ties rounded away from zero.
///
/// The only doubles sitting exactly on a `.x5` tie are the quarters
/// (`x.25`, `x.75`); `{:.1}` would send those to the even digit.
fn one_decimal(v: f64) -> String {
    let quarters = v * 4.0;
    if quarters.fract() == 0.0 && quarters % 2.0 != 0.0 {
        return format!("{:.1}", v + v.signum() * 0.01);
    }
    format!("{v:.1}")
}

/// Build the card for one item.
pub fn render_item(item: &ListingItem) -> DisplayFragment {
    let year = release_year(item.release_date.as_deref());
    let rating = rating_text(item.vote_average);
    let image = match item.poster_path.as_deref() {
        Some(path) if !path.is_empty() => CardImage::Poster {
            src: format!("{POSTER_BASE_URL}{path}"),
        },
        _ => CardImage::Placeholder,
    };
    let href = format!("/movie/{}", item.id);

    let title = escape_html(&item.title);
    let image_html = match &image {
        CardImage::Poster { src } => format!(
            r#"<img src="{}" class="card-img-top" alt="{title}" loading="lazy">"#,
            escape_html(src)
        ),
        CardImage::Placeholder => concat!(
            r#"<div class="card-img-top bg-secondary d-flex align-items-center justify-content-center" style="height:450px;">"#,
            r#"<i class="bi bi-film" style="font-size:3rem;color:#666;"></i>"#,
            "</div>"
        )
        .to_string(),
    };
    let markup = format!(
        concat!(
            r#"<div class="col-md-2 col-sm-4 col-6 mb-3">"#,
            r#"<a href="{href}" class="text-decoration-none">"#,
            r#"<div class="card movie-card h-100">{image}"#,
            r#"<div class="card-body p-2">"#,
            r#"<h6 class="card-title small mb-1">{title}</h6>"#,
            r#"<p class="card-text small text-muted mb-1">{year}</p>"#,
            r#"<span class="badge bg-warning text-dark"><i class="bi bi-star-fill"></i> {rating}</span>"#,
            "</div></div></a></div>"
        ),
        href = href,
        image = image_html,
        title = title,
        year = escape_html(&year),
        rating = rating,
    );

    DisplayFragment {
        id: item.id,
        href,
        title: item.title.clone(),
        year,
        rating,
        release_date: item.release_date.clone(),
        image,
        markup,
    }
}
