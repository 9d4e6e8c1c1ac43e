use url::Url;

/// A single movie as supplied by the catalog.
///
/// Read-only input to question generation. The rating is kept as the
/// catalog's decimal text and parsed on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieRecord {
    title: String,
    rating: String,
    image_url: Url,
}

impl MovieRecord {
    #[must_use]
    pub fn new(title: impl Into<String>, rating: impl Into<String>, image_url: Url) -> Self {
        Self {
            title: title.into(),
            rating: rating.into(),
            image_url,
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn rating(&self) -> &str {
        &self.rating
    }

    #[must_use]
    pub fn image_url(&self) -> &Url {
        &self.image_url
    }

    /// Numeric rating; unparsable catalog text counts as 0.
    #[must_use]
    pub fn parsed_rating(&self) -> f64 {
        self.rating.trim().parse().unwrap_or(0.0)
    }

    /// Poster URL rewritten to the 600px-wide rendition.
    ///
    /// Catalog poster URLs carry a size suffix after a `._` marker; swapping
    /// it keeps downloads small. URLs without the marker are returned
    /// unchanged, as is any rewrite that fails to parse.
    #[must_use]
    pub fn resized_image_url(&self) -> Url {
        match self.image_url.as_str().split_once("._") {
            Some((prefix, _)) => Url::parse(&format!("{prefix}._V0_UX600_.jpg"))
                .unwrap_or_else(|_| self.image_url.clone()),
            None => self.image_url.clone(),
        }
    }
}
