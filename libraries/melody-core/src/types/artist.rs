use super::album::Album;
use super::audiobook::AudioBook;
use super::content::Content;
use super::ids::{CollectionId, PersonId};
use super::person::PersonInfo;
use crate::error::Result;
use crate::tagged::{records, resolve_union, Candidate, TaggedUnion};
use crate::tree::{Serializable, Tagged, Tree, TreeReader};

/// A published release: an album or an audiobook
#[derive(Debug, Clone, PartialEq)]
pub enum Release {
    Album(Album),
    AudioBook(AudioBook),
}

impl Release {
    pub fn id(&self) -> &CollectionId {
        match self {
            Release::Album(album) => album.id(),
            Release::AudioBook(book) => book.id(),
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Release::Album(album) => album.title(),
            Release::AudioBook(book) => book.title(),
        }
    }
}

impl From<Album> for Release {
    fn from(album: Album) -> Self {
        Release::Album(album)
    }
}

impl From<AudioBook> for Release {
    fn from(book: AudioBook) -> Self {
        Release::AudioBook(book)
    }
}

impl TaggedUnion for Release {
    fn candidates() -> Vec<Candidate<Self>> {
        vec![Candidate::of(Release::Album), Candidate::of(Release::AudioBook)]
    }

    fn type_tag(&self) -> &'static str {
        match self {
            Release::Album(_) => Album::TYPE_TAG,
            Release::AudioBook(_) => AudioBook::TYPE_TAG,
        }
    }

    fn data(&self) -> Tree {
        match self {
            Release::Album(album) => album.serialize(),
            Release::AudioBook(book) => book.serialize(),
        }
    }
}

/// A creator of tracks and releases
///
/// Work lists embed whole entities. Each element is written as a tagged
/// record so tracks and chapters (or albums and audiobooks) can share a list.
#[derive(Debug, Clone, PartialEq)]
pub struct Artist {
    info: PersonInfo,
    tracks: Vec<Content>,
    albums: Vec<Release>,
    collabed_tracks: Vec<Content>,
    collabed_albums: Vec<Release>,
    produced_tracks: Vec<Content>,
}

impl Artist {
    pub fn new(info: PersonInfo) -> Self {
        Self {
            info,
            tracks: Vec::new(),
            albums: Vec::new(),
            collabed_tracks: Vec::new(),
            collabed_albums: Vec::new(),
            produced_tracks: Vec::new(),
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

    pub fn tracks(&self) -> &[Content] {
        &self.tracks
    }

    pub fn set_tracks(&mut self, tracks: Vec<Content>) {
        self.tracks = tracks;
    }

    pub fn add_track(&mut self, track: impl Into<Content>) {
        self.tracks.push(track.into());
    }

    pub fn albums(&self) -> &[Release] {
        &self.albums
    }

    pub fn set_albums(&mut self, albums: Vec<Release>) {
        self.albums = albums;
    }

    pub fn add_album(&mut self, album: impl Into<Release>) {
        self.albums.push(album.into());
    }

    pub fn collabed_tracks(&self) -> &[Content] {
        &self.collabed_tracks
    }

    pub fn set_collabed_tracks(&mut self, tracks: Vec<Content>) {
        self.collabed_tracks = tracks;
    }

    pub fn add_collabed_track(&mut self, track: impl Into<Content>) {
        self.collabed_tracks.push(track.into());
    }

    pub fn collabed_albums(&self) -> &[Release] {
        &self.collabed_albums
    }

    pub fn set_collabed_albums(&mut self, albums: Vec<Release>) {
        self.collabed_albums = albums;
    }

    pub fn add_collabed_album(&mut self, album: impl Into<Release>) {
        self.collabed_albums.push(album.into());
    }

    pub fn produced_tracks(&self) -> &[Content] {
        &self.produced_tracks
    }

    pub fn set_produced_tracks(&mut self, tracks: Vec<Content>) {
        self.produced_tracks = tracks;
    }

    pub fn add_produced_track(&mut self, track: impl Into<Content>) {
        self.produced_tracks.push(track.into());
    }
}

impl Serializable for Artist {
    fn serialize(&self) -> Tree {
        self.info
            .to_tree()
            .field("tracks", records(&self.tracks))
            .field("albums", records(&self.albums))
            .field("collabed_tracks", records(&self.collabed_tracks))
            .field("collabed_albums", records(&self.collabed_albums))
            .field("produced_tracks", records(&self.produced_tracks))
            .build()
    }

    /// Unresolvable records in the work lists are dropped with a warning
    fn deserialize(tree: &Tree) -> Result<Self> {
        let reader = TreeReader::new(Self::TYPE_TAG, tree)?;

        Ok(Self {
            info: PersonInfo::from_reader(&reader)?,
            tracks: resolve_union(reader.list("tracks")?),
            albums: resolve_union(reader.list("albums")?),
            collabed_tracks: resolve_union(reader.list("collabed_tracks")?),
            collabed_albums: resolve_union(reader.list("collabed_albums")?),
            produced_tracks: resolve_union(reader.list("produced_tracks")?),
        })
    }
}

impl Tagged for Artist {
    const TYPE_TAG: &'static str = "Artist";
}
