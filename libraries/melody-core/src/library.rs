//! In-memory index of every entity, keyed by id
//!
//! Entities refer to each other by identifier. The library owns one copy of
//! each entity and turns those identifiers back into references on demand;
//! a dangling id is a [`MelodyError::MalformedReference`].

use crate::error::{MelodyError, Result};
use crate::tagged::{resolve_strict, resolve_union, Candidate, TaggedUnion};
use crate::tree::{Serializable, Tagged, Tree};
use crate::types::{
    Admin, Album, Artist, AudioBook, AudioBookChapter, CollectionId, Content, ContentId,
    ContentInfo, Person, PersonId, Playlist, Release, Track, User,
};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Any persisted entity, as stored in a library artifact
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    User(User),
    Artist(Artist),
    Admin(Admin),
    Track(Track),
    Chapter(AudioBookChapter),
    Album(Album),
    Playlist(Playlist),
    AudioBook(AudioBook),
}

impl Record {
    pub fn id(&self) -> &str {
        match self {
            Record::User(user) => user.id().as_str(),
            Record::Artist(artist) => artist.id().as_str(),
            Record::Admin(admin) => admin.id().as_str(),
            Record::Track(track) => track.info().id().as_str(),
            Record::Chapter(chapter) => chapter.info().id().as_str(),
            Record::Album(album) => album.id().as_str(),
            Record::Playlist(playlist) => playlist.id().as_str(),
            Record::AudioBook(book) => book.id().as_str(),
        }
    }
}

macro_rules! record_from {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Record {
                fn from(value: $ty) -> Self {
                    Record::$variant(value)
                }
            }
        )*
    };
}

record_from!(
    User(User),
    Artist(Artist),
    Admin(Admin),
    Track(Track),
    Chapter(AudioBookChapter),
    Album(Album),
    Playlist(Playlist),
    AudioBook(AudioBook),
);

impl From<Person> for Record {
    fn from(person: Person) -> Self {
        match person {
            Person::User(user) => Record::User(user),
            Person::Artist(artist) => Record::Artist(artist),
            Person::Admin(admin) => Record::Admin(admin),
        }
    }
}

impl From<Content> for Record {
    fn from(content: Content) -> Self {
        match content {
            Content::Track(track) => Record::Track(track),
            Content::Chapter(chapter) => Record::Chapter(chapter),
        }
    }
}

impl From<Release> for Record {
    fn from(release: Release) -> Self {
        match release {
            Release::Album(album) => Record::Album(album),
            Release::AudioBook(book) => Record::AudioBook(book),
        }
    }
}

impl TaggedUnion for Record {
    fn candidates() -> Vec<Candidate<Self>> {
        vec![
            Candidate::of(Record::User),
            Candidate::of(Record::Artist),
            Candidate::of(Record::Admin),
            Candidate::of(Record::Track),
            Candidate::of(Record::Chapter),
            Candidate::of(Record::Album),
            Candidate::of(Record::Playlist),
            Candidate::of(Record::AudioBook),
        ]
    }

    fn type_tag(&self) -> &'static str {
        match self {
            Record::User(_) => User::TYPE_TAG,
            Record::Artist(_) => Artist::TYPE_TAG,
            Record::Admin(_) => Admin::TYPE_TAG,
            Record::Track(_) => Track::TYPE_TAG,
            Record::Chapter(_) => AudioBookChapter::TYPE_TAG,
            Record::Album(_) => Album::TYPE_TAG,
            Record::Playlist(_) => Playlist::TYPE_TAG,
            Record::AudioBook(_) => AudioBook::TYPE_TAG,
        }
    }

    fn data(&self) -> Tree {
        match self {
            Record::User(user) => user.serialize(),
            Record::Artist(artist) => artist.serialize(),
            Record::Admin(admin) => admin.serialize(),
            Record::Track(track) => track.serialize(),
            Record::Chapter(chapter) => chapter.serialize(),
            Record::Album(album) => album.serialize(),
            Record::Playlist(playlist) => playlist.serialize(),
            Record::AudioBook(book) => book.serialize(),
        }
    }
}

/// Borrowed view of any collection kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollectionRef<'a> {
    Album(&'a Album),
    Playlist(&'a Playlist),
    AudioBook(&'a AudioBook),
}

impl CollectionRef<'_> {
    pub fn id(&self) -> &CollectionId {
        match self {
            CollectionRef::Album(album) => album.id(),
            CollectionRef::Playlist(playlist) => playlist.id(),
            CollectionRef::AudioBook(book) => book.id(),
        }
    }

    pub fn title(&self) -> &str {
        match self {
            CollectionRef::Album(album) => album.title(),
            CollectionRef::Playlist(playlist) => playlist.title(),
            CollectionRef::AudioBook(book) => book.title(),
        }
    }
}

fn lookup<'a, K, V>(map: &'a BTreeMap<K, V>, id: &K, kind: &str) -> Result<&'a V>
where
    K: Ord + fmt::Display,
{
    map.get(id)
        .ok_or_else(|| MelodyError::malformed_reference(format!("no {kind} with id \"{id}\"")))
}

fn lookup_all<'a, K, V>(map: &'a BTreeMap<K, V>, ids: &[K], kind: &str) -> Result<Vec<&'a V>>
where
    K: Ord + fmt::Display,
{
    ids.iter().map(|id| lookup(map, id, kind)).collect()
}

/// Id-keyed store of users, artists, admins, content and collections
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Library {
    users: BTreeMap<PersonId, User>,
    artists: BTreeMap<PersonId, Artist>,
    admins: BTreeMap<PersonId, Admin>,
    tracks: BTreeMap<ContentId, Track>,
    chapters: BTreeMap<ContentId, AudioBookChapter>,
    albums: BTreeMap<CollectionId, Album>,
    playlists: BTreeMap<CollectionId, Playlist>,
    audiobooks: BTreeMap<CollectionId, AudioBook>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an entity, replacing any entity of the same kind and id
    ///
    /// Returns `true` when an existing entity was replaced.
    pub fn insert(&mut self, record: impl Into<Record>) -> bool {
        let record = record.into();
        debug!(tag = record.type_tag(), id = record.id(), "Indexing entity");

        match record {
            Record::User(user) => self.users.insert(user.id().clone(), user).is_some(),
            Record::Artist(artist) => self.artists.insert(artist.id().clone(), artist).is_some(),
            Record::Admin(admin) => self.admins.insert(admin.id().clone(), admin).is_some(),
            Record::Track(track) => self
                .tracks
                .insert(track.info().id().clone(), track)
                .is_some(),
            Record::Chapter(chapter) => self
                .chapters
                .insert(chapter.info().id().clone(), chapter)
                .is_some(),
            Record::Album(album) => self.albums.insert(album.id().clone(), album).is_some(),
            Record::Playlist(playlist) => self
                .playlists
                .insert(playlist.id().clone(), playlist)
                .is_some(),
            Record::AudioBook(book) => self.audiobooks.insert(book.id().clone(), book).is_some(),
        }
    }

    pub fn len(&self) -> usize {
        self.users.len()
            + self.artists.len()
            + self.admins.len()
            + self.tracks.len()
            + self.chapters.len()
            + self.albums.len()
            + self.playlists.len()
            + self.audiobooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn user(&self, id: &PersonId) -> Option<&User> {
        self.users.get(id)
    }

    pub fn artist(&self, id: &PersonId) -> Option<&Artist> {
        self.artists.get(id)
    }

    pub fn admin(&self, id: &PersonId) -> Option<&Admin> {
        self.admins.get(id)
    }

    pub fn track(&self, id: &ContentId) -> Option<&Track> {
        self.tracks.get(id)
    }

    pub fn chapter(&self, id: &ContentId) -> Option<&AudioBookChapter> {
        self.chapters.get(id)
    }

    pub fn album(&self, id: &CollectionId) -> Option<&Album> {
        self.albums.get(id)
    }

    pub fn playlist(&self, id: &CollectionId) -> Option<&Playlist> {
        self.playlists.get(id)
    }

    pub fn audiobook(&self, id: &CollectionId) -> Option<&AudioBook> {
        self.audiobooks.get(id)
    }

    /// Any collection kind with this id
    pub fn collection(&self, id: &CollectionId) -> Option<CollectionRef<'_>> {
        self.albums
            .get(id)
            .map(CollectionRef::Album)
            .or_else(|| self.playlists.get(id).map(CollectionRef::Playlist))
            .or_else(|| self.audiobooks.get(id).map(CollectionRef::AudioBook))
    }

    pub fn playlists_of(&self, user: &User) -> Result<Vec<&Playlist>> {
        lookup_all(&self.playlists, user.playlists(), "playlist")
    }

    pub fn favourite_tracks_of(&self, user: &User) -> Result<Vec<&Track>> {
        lookup_all(&self.tracks, user.favourite_tracks(), "track")
    }

    pub fn favourite_albums_of(&self, user: &User) -> Result<Vec<&Album>> {
        lookup_all(&self.albums, user.favourite_albums(), "album")
    }

    pub fn favourite_artists_of(&self, user: &User) -> Result<Vec<&Artist>> {
        lookup_all(&self.artists, user.favourite_artists(), "artist")
    }

    pub fn favourite_audiobooks_of(&self, user: &User) -> Result<Vec<&AudioBook>> {
        lookup_all(&self.audiobooks, user.favourite_audiobooks(), "audiobook")
    }

    /// The artist credited as creator of a piece of content
    pub fn creator_of(&self, content: &ContentInfo) -> Result<&Artist> {
        lookup(&self.artists, content.creator_id(), "artist")
    }

    pub fn collaborators_of(&self, content: &ContentInfo) -> Result<Vec<&Artist>> {
        lookup_all(&self.artists, content.collaborator_ids(), "artist")
    }

    /// The collection a piece of content was published in, if it names one
    pub fn source_of(&self, content: &ContentInfo) -> Result<Option<CollectionRef<'_>>> {
        content
            .source_id()
            .map(|id| {
                self.collection(id).ok_or_else(|| {
                    MelodyError::malformed_reference(format!("no collection with id \"{id}\""))
                })
            })
            .transpose()
    }

    /// Every entity as a record, grouped by kind and ordered by id
    pub fn records(&self) -> Vec<Record> {
        let mut records = Vec::with_capacity(self.len());
        records.extend(self.users.values().cloned().map(Record::User));
        records.extend(self.artists.values().cloned().map(Record::Artist));
        records.extend(self.admins.values().cloned().map(Record::Admin));
        records.extend(self.tracks.values().cloned().map(Record::Track));
        records.extend(self.chapters.values().cloned().map(Record::Chapter));
        records.extend(self.albums.values().cloned().map(Record::Album));
        records.extend(self.playlists.values().cloned().map(Record::Playlist));
        records.extend(self.audiobooks.values().cloned().map(Record::AudioBook));
        records
    }

    /// Tagged `{type, data}` trees for every entity
    pub fn to_trees(&self) -> Vec<Tree> {
        self.records().iter().map(TaggedUnion::to_record).collect()
    }

    /// Rebuild from tagged trees, dropping records that cannot be resolved
    pub fn from_trees(trees: &[Tree]) -> Self {
        let mut library = Self::new();
        for record in resolve_union::<Record>(trees) {
            library.insert(record);
        }
        library
    }

    /// Rebuild from tagged trees, failing on the first unresolvable record
    pub fn try_from_trees(trees: &[Tree]) -> Result<Self> {
        let mut library = Self::new();
        for record in resolve_strict(trees, &Record::candidates())? {
            library.insert(record);
        }
        Ok(library)
    }
}

impl FromIterator<Record> for Library {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        let mut library = Self::new();
        for record in iter {
            library.insert(record);
        }
        library
    }
}
