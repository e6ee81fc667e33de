use super::collection::collection_kind;
use super::ids::PersonId;
use super::track::Track;

collection_kind!(
    /// Tracks gathered by a user
    Playlist,
    Track,
    "Playlist"
);

impl Playlist {
    /// The user who owns the playlist
    pub fn owner_id(&self) -> &PersonId {
        self.creator_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Serializable;
    use crate::types::content::ContentInfo;
    use crate::types::genre::TrackGenre;
    use crate::types::ids::{CollectionId, ContentId};
    use std::time::Duration;

    fn track(id: &str, genre: TrackGenre) -> Track {
        let info = ContentInfo::new(
            ContentId::new(id),
            id,
            Duration::from_secs(120),
            PersonId::new("artist_001"),
        )
        .unwrap();
        Track::new(info, vec![genre]).unwrap()
    }

    #[test]
    fn playlist_round_trip_keeps_order() {
        let playlist = Playlist::new(
            CollectionId::new("playlist_001"),
            "Road Trip",
            PersonId::new("user_001"),
            vec![
                track("b", TrackGenre::Pop),
                track("a", TrackGenre::Electronic),
            ],
        )
        .unwrap();

        let restored = Playlist::deserialize(&playlist.serialize()).unwrap();
        let ids: Vec<&str> = restored.contents().iter().map(|t| t.info().id().as_str()).collect();

        assert_eq!(ids, ["b", "a"]);
        assert_eq!(restored.owner_id().as_str(), "user_001");
        assert_eq!(restored.genres(), [TrackGenre::Pop, TrackGenre::Electronic]);
    }
}
