use super::collection::collection_kind;
use super::ids::PersonId;
use super::track::Track;

collection_kind!(
    /// Tracks released together by an artist
    Album,
    Track,
    "Album"
);

impl Album {
    /// The releasing artist
    pub fn artist_id(&self) -> &PersonId {
        self.creator_id()
    }
}
