//! Next-page request construction.
//!
//! The filter context is a frozen snapshot of the listing page's query string.
//! It is read once when a page view starts and every subsequent request is
//! derived from it plus a page number.

use reqwest::Url;

/// Endpoint path of the paginated listing API.
pub const LISTING_PATH: &str = "/api/v1/movies";

/// Page size requested from the listing API.  Fixed.
pub const ITEMS_PER_PAGE: u32 = 20;

/// Sort key used when the listing page carries none.
pub const DEFAULT_SORT: &str = "popularity";

// ───────────────────────────────────────── filter context ────

/// Immutable snapshot of the listing filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterContext {
    pub sort: Option<String>,
    pub genre: Option<String>,
    pub year: Option<String>,
    pub min_rating: Option<String>,
}

impl FilterContext {
    /// Read the filters from a listing page URL.
    ///
    /// The listing page names the rating filter `rating_min`; the API calls
    /// it `min_rating`.  Empty values are treated as absent.
    pub fn from_url(url: &Url) -> Self {
        let mut ctx = Self::default();
        for (key, value) in url.query_pairs() {
            if value.is_empty() {
                continue;
            }
            let slot = match key.as_ref() {
                "sort" => &mut ctx.sort,
                "genre" => &mut ctx.genre,
                "year" => &mut ctx.year,
                "rating_min" => &mut ctx.min_rating,
                _ => continue,
            };
            // First occurrence wins, like `URLSearchParams::get`.
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        ctx
    }

    pub fn sort_key(&self) -> &str {
        self.sort.as_deref().unwrap_or(DEFAULT_SORT)
    }
}

/// The page number the listing page URL points at (`?page=N`), default 1.
pub fn initial_page(url: &Url) -> u32 {
    url.query_pairs()
        .find(|(k, _)| k == "page")
        .and_then(|(_, v)| v.parse::<u32>().ok())
        .unwrap_or(1)
        .max(1)
}

// ───────────────────────────────────────── request ───────────

/// Endpoint path + ordered query parameters for one listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub path: &'static str,
    pub params: Vec<(&'static str, String)>,
}

impl RequestDescriptor {
    /// The `page` parameter this descriptor asks for.
    pub fn page(&self) -> Option<u32> {
        self.param("page").and_then(|p| p.parse().ok())
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Resolve against the server origin, e.g. `http://localhost:5000`.
    pub fn to_url(&self, origin: &Url) -> Result<Url, String> {
        let mut url = origin.join(self.path).map_err(|e| e.to_string())?;
        url.query_pairs_mut()
            .clear()
            .extend_pairs(self.params.iter().map(|(k, v)| (*k, v.as_str())));
        Ok(url)
    }
}

/// Build the request for `page` under the given filters.
pub fn build_request(filters: &FilterContext, page: u32) -> RequestDescriptor {
    let mut params = vec![
        ("page", page.to_string()),
        ("per_page", ITEMS_PER_PAGE.to_string()),
        ("sort", filters.sort_key().to_string()),
    ];
    if let Some(genre) = &filters.genre {
        params.push(("genre", genre.clone()));
    }
    if let Some(year) = &filters.year {
        params.push(("year", year.clone()));
    }
    if let Some(min_rating) = &filters.min_rating {
        params.push(("min_rating", min_rating.clone()));
    }
    RequestDescriptor {
        path: LISTING_PATH,
        params,
    }
}
