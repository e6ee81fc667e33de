use super::ids::{CollectionId, ContentId, PersonId};
use super::person::PersonInfo;
use crate::error::Result;
use crate::tree::{strings, Serializable, Tagged, Tree, TreeReader};
use crate::validate;

/// A listener
///
/// Playlists and favourites are stored as identifiers and resolved through a
/// [`Library`](crate::library::Library).
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    info: PersonInfo,
    subscribed: bool,
    playlists: Vec<CollectionId>,
    favourite_tracks: Vec<ContentId>,
    favourite_albums: Vec<CollectionId>,
    favourite_artists: Vec<PersonId>,
    favourite_audiobooks: Vec<CollectionId>,
}

fn checked<T: AsRef<str> + PartialEq>(field: &str, ids: Vec<T>) -> Result<Vec<T>> {
    validate::non_empty_all(field, &ids)?;
    Ok(validate::unique(ids))
}

fn add_checked<T: AsRef<str> + PartialEq>(field: &str, ids: &mut Vec<T>, id: T) -> Result<bool> {
    validate::non_empty(field, id.as_ref())?;
    Ok(validate::push_unique(ids, id))
}

fn remove<T: PartialEq>(ids: &mut Vec<T>, id: &T) -> bool {
    let before = ids.len();
    ids.retain(|existing| existing != id);
    ids.len() != before
}

impl User {
    pub fn new(info: PersonInfo, subscribed: bool) -> Self {
        Self {
            info,
            subscribed,
            playlists: Vec::new(),
            favourite_tracks: Vec::new(),
            favourite_albums: Vec::new(),
            favourite_artists: Vec::new(),
            favourite_audiobooks: Vec::new(),
        }
    }

    pub fn info(&self) -> &PersonInfo {
        &self.info
    }

    pub fn info_mut(&mut self) -> &mut PersonInfo {
        &mut self.info
    }

    pub fn id(&self) -> &PersonId {
        self.info.id()
    }

    pub fn subscribed(&self) -> bool {
        self.subscribed
    }

    pub fn set_subscribed(&mut self, subscribed: bool) {
        self.subscribed = subscribed;
    }

    pub fn playlists(&self) -> &[CollectionId] {
        &self.playlists
    }

    pub fn set_playlists(&mut self, playlists: Vec<CollectionId>) -> Result<()> {
        self.playlists = checked("playlists", playlists)?;
        Ok(())
    }

    pub fn add_playlist(&mut self, playlist: CollectionId) -> Result<bool> {
        add_checked("playlists", &mut self.playlists, playlist)
    }

    pub fn remove_playlist(&mut self, playlist: &CollectionId) -> bool {
        remove(&mut self.playlists, playlist)
    }

    pub fn favourite_tracks(&self) -> &[ContentId] {
        &self.favourite_tracks
    }

    pub fn set_favourite_tracks(&mut self, tracks: Vec<ContentId>) -> Result<()> {
        self.favourite_tracks = checked("favourite_tracks", tracks)?;
        Ok(())
    }

    pub fn add_favourite_track(&mut self, track: ContentId) -> Result<bool> {
        add_checked("favourite_tracks", &mut self.favourite_tracks, track)
    }

    pub fn remove_favourite_track(&mut self, track: &ContentId) -> bool {
        remove(&mut self.favourite_tracks, track)
    }

    pub fn favourite_albums(&self) -> &[CollectionId] {
        &self.favourite_albums
    }

    pub fn set_favourite_albums(&mut self, albums: Vec<CollectionId>) -> Result<()> {
        self.favourite_albums = checked("favourite_albums", albums)?;
        Ok(())
    }

    pub fn add_favourite_album(&mut self, album: CollectionId) -> Result<bool> {
        add_checked("favourite_albums", &mut self.favourite_albums, album)
    }

    pub fn remove_favourite_album(&mut self, album: &CollectionId) -> bool {
        remove(&mut self.favourite_albums, album)
    }

    pub fn favourite_artists(&self) -> &[PersonId] {
        &self.favourite_artists
    }

    pub fn set_favourite_artists(&mut self, artists: Vec<PersonId>) -> Result<()> {
        self.favourite_artists = checked("favourite_artists", artists)?;
        Ok(())
    }

    pub fn add_favourite_artist(&mut self, artist: PersonId) -> Result<bool> {
        add_checked("favourite_artists", &mut self.favourite_artists, artist)
    }

    pub fn remove_favourite_artist(&mut self, artist: &PersonId) -> bool {
        remove(&mut self.favourite_artists, artist)
    }

    pub fn favourite_audiobooks(&self) -> &[CollectionId] {
        &self.favourite_audiobooks
    }

    pub fn set_favourite_audiobooks(&mut self, audiobooks: Vec<CollectionId>) -> Result<()> {
        self.favourite_audiobooks = checked("favourite_audiobooks", audiobooks)?;
        Ok(())
    }

    pub fn add_favourite_audiobook(&mut self, audiobook: CollectionId) -> Result<bool> {
        add_checked("favourite_audiobooks", &mut self.favourite_audiobooks, audiobook)
    }

    pub fn remove_favourite_audiobook(&mut self, audiobook: &CollectionId) -> bool {
        remove(&mut self.favourite_audiobooks, audiobook)
    }
}

impl Serializable for User {
    fn serialize(&self) -> Tree {
        self.info
            .to_tree()
            .field("subscribed", self.subscribed)
            .field("playlists", strings(&self.playlists))
            .field("favourite_tracks", strings(&self.favourite_tracks))
            .field("favourite_albums", strings(&self.favourite_albums))
            .field("favourite_artists", strings(&self.favourite_artists))
            .field("favourite_audiobooks", strings(&self.favourite_audiobooks))
            .build()
    }

    fn deserialize(tree: &Tree) -> Result<Self> {
        let reader = TreeReader::new(Self::TYPE_TAG, tree)?;
        let ids = |key: &str| reader.str_list(key);

        let mut user = Self::new(
            PersonInfo::from_reader(&reader)?,
            reader.bool_or("subscribed", false)?,
        );
        user.set_playlists(ids("playlists")?.into_iter().map(CollectionId::new).collect())?;
        user.set_favourite_tracks(ids("favourite_tracks")?.into_iter().map(ContentId::new).collect())?;
        user.set_favourite_albums(ids("favourite_albums")?.into_iter().map(CollectionId::new).collect())?;
        user.set_favourite_artists(ids("favourite_artists")?.into_iter().map(PersonId::new).collect())?;
        user.set_favourite_audiobooks(
            ids("favourite_audiobooks")?.into_iter().map(CollectionId::new).collect(),
        )?;
        Ok(user)
    }
}

impl Tagged for User {
    const TYPE_TAG: &'static str = "User";
}
