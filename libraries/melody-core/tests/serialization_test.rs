//! Integration tests for the tree contract and polymorphic resolution
//!
//! Every entity kind is flattened and rebuilt, then mixed lists are resolved
//! from tagged records the way a loaded artifact would be.

use melody_core::tagged::{resolve, resolve_union};
use melody_core::{
    Admin, Album, Artist, AudioBook, AudioBookChapter, AudioBookGenre, Candidate, CollectionId,
    Content, ContentId, ContentInfo, Library, MelodyError, Permission, PersonId, PersonInfo,
    Playlist, Record, Serializable, TaggedUnion, Track, TrackGenre, User,
};
use serde_json::json;
use std::time::Duration;

// ===== Test Helpers =====

fn content_info(id: &str, collaborators: &[&str]) -> ContentInfo {
    ContentInfo::new(
        ContentId::new(id),
        format!("Title {id}"),
        Duration::from_secs(180),
        PersonId::new("artist_001"),
    )
    .unwrap()
    .with_collaborators(collaborators.iter().map(|c| PersonId::new(*c)).collect())
    .unwrap()
}

fn create_test_track(id: &str, collaborators: &[&str]) -> Track {
    Track::new(content_info(id, collaborators), vec![TrackGenre::Rock]).unwrap()
}

fn create_test_chapter(id: &str) -> AudioBookChapter {
    AudioBookChapter::new(content_info(id, &[])).with_genres(vec![AudioBookGenre::Novel])
}

fn person(id: &str) -> PersonInfo {
    PersonInfo::new(PersonId::new(id), format!("Name {id}"), format!("{id}@example.com")).unwrap()
}

fn assert_round_trip<E>(entity: &E)
where
    E: Serializable + PartialEq + std::fmt::Debug,
{
    let tree = entity.serialize();
    let restored = E::deserialize(&tree).unwrap();
    assert_eq!(&restored, entity);
    assert_eq!(restored.serialize(), tree, "serialize must be deterministic");
}

// ===== Round Trips =====

#[test]
fn test_every_entity_round_trips() {
    let track = create_test_track("track_001", &["artist_002"]);
    let chapter = create_test_chapter("chapter_001");

    let album = Album::new(
        CollectionId::new("album_001"),
        "Album",
        PersonId::new("artist_001"),
        vec![track.clone()],
    )
    .unwrap();
    let playlist = Playlist::new(
        CollectionId::new("playlist_001"),
        "Playlist",
        PersonId::new("user_001"),
        vec![track.clone()],
    )
    .unwrap();
    let book = AudioBook::new(
        CollectionId::new("book_001"),
        "Book",
        PersonId::new("artist_001"),
        vec![chapter.clone()],
    )
    .unwrap();

    let mut user = User::new(person("user_001"), true);
    user.add_playlist(playlist.id().clone()).unwrap();
    user.add_favourite_track(track.info().id().clone()).unwrap();

    let mut artist = Artist::new(person("artist_001"));
    artist.add_track(track.clone());
    artist.add_track(chapter.clone());
    artist.add_album(album.clone());
    artist.add_album(book.clone());

    let admin = Admin::new(person("admin_001"), vec![Permission::EditUsers]);

    assert_round_trip(&track);
    assert_round_trip(&chapter);
    assert_round_trip(&album);
    assert_round_trip(&playlist);
    assert_round_trip(&book);
    assert_round_trip(&user);
    assert_round_trip(&artist);
    assert_round_trip(&admin);
}

#[test]
fn test_unicode_text_survives() {
    let mut track = create_test_track("track_001", &[]);
    track.info_mut().set_title("Песня №1 ✓").unwrap();

    assert_round_trip(&track);
}

// ===== Polymorphic Resolution =====

#[test]
fn test_track_and_ghost_resolve_to_one_track() {
    let track = create_test_track("track_001", &[]);
    let records = vec![
        Content::from(track.clone()).to_record(),
        json!({ "type": "Ghost", "data": { "id": "boo" } }),
    ];

    let candidates = vec![
        Candidate::of(Content::Track),
        Candidate::of(Content::Chapter),
    ];
    let resolved = resolve(&records, &candidates);

    assert_eq!(resolved, vec![Content::Track(track)]);
}

#[test]
fn test_broken_record_does_not_lose_the_batch() {
    let records = vec![
        Content::from(create_test_track("t1", &[])).to_record(),
        json!({ "type": "Track", "data": { "title": "no id" } }),
        json!(["not", "a", "record"]),
        Content::from(create_test_chapter("c1")).to_record(),
    ];

    let resolved: Vec<Content> = resolve_union(&records);
    let ids: Vec<&str> = resolved.iter().map(|c| c.id().as_str()).collect();

    assert_eq!(ids, ["t1", "c1"]);
}

// ===== Collection Consistency =====

#[test]
fn test_collaborators_are_the_union_of_contents() {
    let album = Album::new(
        CollectionId::new("album_001"),
        "Album",
        PersonId::new("artist_001"),
        vec![
            create_test_track("t1", &["a"]),
            create_test_track("t2", &["a", "b"]),
        ],
    )
    .unwrap();

    assert_eq!(album.collaborator_ids(), [PersonId::new("a"), PersonId::new("b")]);
}

#[test]
fn test_update_is_idempotent_after_mutation() {
    let mut playlist = Playlist::new(
        CollectionId::new("playlist_001"),
        "Mix",
        PersonId::new("user_001"),
        vec![],
    )
    .unwrap();
    playlist.add_content(create_test_track("t1", &["x", "y"]));
    playlist.add_content(create_test_track("t2", &["y"]));

    let once = playlist.clone();
    playlist.update();
    assert_eq!(playlist, once);
}

#[test]
fn test_pop_on_empty_collection() {
    let mut book = AudioBook::new(
        CollectionId::new("book_001"),
        "Empty",
        PersonId::new("artist_001"),
        vec![],
    )
    .unwrap();

    assert!(book.pop_content(0).is_none());
    assert!(book.contents().is_empty());
    assert!(matches!(
        book.try_pop_content(0),
        Err(MelodyError::InvalidIndex { index: 0, len: 0 })
    ));
}

// ===== Library =====

#[test]
fn test_library_reloads_from_tagged_trees() {
    let track = create_test_track("track_001", &[]);
    let mut user = User::new(person("user_001"), false);
    user.add_favourite_track(track.info().id().clone()).unwrap();

    let library: Library = vec![Record::from(user), Record::from(track)]
        .into_iter()
        .collect();
    let reloaded = Library::from_trees(&library.to_trees());

    let user = reloaded.user(&PersonId::new("user_001")).unwrap();
    let favourites = reloaded.favourite_tracks_of(user).unwrap();
    assert_eq!(favourites.len(), 1);
    assert_eq!(favourites[0].info().id().as_str(), "track_001");
}
