//! Data models for Musicshelf
//!
//! A `Singer` is the single record type flowing through the cache and the
//! remote source. Singers are immutable once built; lists of them are always
//! replaced wholesale.

use serde::{Deserialize, Serialize};

/// Cover image URLs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Cover {
    /// Thumbnail used in the list
    #[serde(default)]
    pub small: String,
    /// Full-size image used in the detail view
    #[serde(default)]
    pub big: String,
}

/// A singer (artist) record
///
/// Two singers are equal when their ids are equal; display fields do not
/// take part in comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Singer {
    /// Identifier assigned by the remote source
    pub id: u64,
    /// Display name
    pub name: String,
    /// Genres, in the order the source lists them
    #[serde(default)]
    pub genres: Vec<String>,
    /// Number of tracks
    #[serde(default)]
    pub tracks: u32,
    /// Number of albums
    #[serde(default)]
    pub albums: u32,
    /// Homepage
    #[serde(default)]
    pub link: Option<String>,
    /// Free-form biography
    #[serde(default)]
    pub description: String,
    /// Cover images
    #[serde(default)]
    pub cover: Option<Cover>,
}

impl Singer {
    /// Create a singer with only an id and a name
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            genres: Vec::new(),
            tracks: 0,
            albums: 0,
            link: None,
            description: String::new(),
            cover: None,
        }
    }

    /// Builder-style genre list
    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = genres.into_iter().map(Into::into).collect();
        self
    }

    /// Builder-style track and album counts
    pub fn with_counts(mut self, tracks: u32, albums: u32) -> Self {
        self.tracks = tracks;
        self.albums = albums;
        self
    }

    /// Builder-style homepage
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Builder-style description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builder-style cover
    pub fn with_cover(mut self, small: impl Into<String>, big: impl Into<String>) -> Self {
        self.cover = Some(Cover {
            small: small.into(),
            big: big.into(),
        });
        self
    }

    /// Genres joined for display ("pop, dance")
    pub fn genres_label(&self) -> String {
        self.genres.join(", ")
    }

    /// One-line summary of track and album counts
    pub fn counts_label(&self) -> String {
        format!(
            "{} {}, {} {}",
            self.albums,
            plural(self.albums, "album", "albums"),
            self.tracks,
            plural(self.tracks, "track", "tracks"),
        )
    }
}

impl PartialEq for Singer {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Singer {}

fn plural<'a>(n: u32, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 {
        one
    } else {
        many
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_is_by_id() {
        let a = Singer::new(1, "Tove Lo").with_counts(81, 22);
        let b = Singer::new(1, "Tove Lo (renamed)");
        let c = Singer::new(2, "Tove Lo");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_deserialize_feed_entry() {
        let json = r#"{
            "id": 1080505,
            "name": "Tove Lo",
            "genres": ["pop", "dance", "electronics"],
            "tracks": 81,
            "albums": 22,
            "link": "http://www.tove-lo.com/",
            "description": "шведская певица и автор песен.",
            "cover": {
                "small": "http://avatars.yandex.net/get-music-content/dfc531f5.a.1080505-1/300x300",
                "big": "http://avatars.yandex.net/get-music-content/dfc531f5.a.1080505-1/1000x1000"
            }
        }"#;

        let singer: Singer = serde_json::from_str(json).unwrap();
        assert_eq!(singer.id, 1080505);
        assert_eq!(singer.genres_label(), "pop, dance, electronics");
        assert_eq!(singer.link.as_deref(), Some("http://www.tove-lo.com/"));
        assert!(singer.cover.unwrap().big.ends_with("1000x1000"));
    }

    #[test]
    fn test_deserialize_missing_optional_fields() {
        let json = r#"{"id": 7, "name": "Unknown"}"#;

        let singer: Singer = serde_json::from_str(json).unwrap();
        assert!(singer.genres.is_empty());
        assert!(singer.link.is_none());
        assert!(singer.cover.is_none());
        assert_eq!(singer.tracks, 0);
    }

    #[test]
    fn test_counts_label() {
        let one = Singer::new(1, "A").with_counts(1, 1);
        assert_eq!(one.counts_label(), "1 album, 1 track");

        let many = Singer::new(2, "B").with_counts(81, 22);
        assert_eq!(many.counts_label(), "22 albums, 81 tracks");
    }
}
