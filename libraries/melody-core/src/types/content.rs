//! Content shared by tracks and audiobook chapters
//!
//! Content references its creator, collaborators and parent collection by
//! identifier only.

use super::chapter::AudioBookChapter;
use super::ids::{CollectionId, ContentId, PersonId};
use super::track::Track;
use crate::error::Result;
use crate::tagged::{Candidate, TaggedUnion};
use crate::tree::{self, Serializable, Tagged, Tree, TreeBuilder, TreeReader};
use crate::validate;
use std::time::Duration;
use tracing::warn;

/// Attributes common to every kind of content
#[derive(Debug, Clone, PartialEq)]
pub struct ContentInfo {
    id: ContentId,
    title: String,
    duration: Duration,
    creator_id: PersonId,
    collaborator_ids: Vec<PersonId>,
    source_id: Option<CollectionId>,
}

impl ContentInfo {
    /// Create content info, validating id, title and creator
    ///
    /// The duration is stored rounded to milliseconds (see
    /// [`tree::quantize_duration`]).
    pub fn new(
        id: ContentId,
        title: impl Into<String>,
        duration: Duration,
        creator_id: PersonId,
    ) -> Result<Self> {
        let title = title.into();
        validate::non_empty("id", id.as_str())?;
        validate::non_empty("title", &title)?;
        validate::non_empty("creator_id", creator_id.as_str())?;

        Ok(Self {
            id,
            title,
            duration: tree::quantize_duration(duration),
            creator_id,
            collaborator_ids: Vec::new(),
            source_id: None,
        })
    }

    /// Set collaborators at construction time
    pub fn with_collaborators(mut self, collaborator_ids: Vec<PersonId>) -> Result<Self> {
        self.set_collaborator_ids(collaborator_ids)?;
        Ok(self)
    }

    /// Set the parent collection at construction time
    #[must_use]
    pub fn with_source(mut self, source_id: CollectionId) -> Self {
        self.source_id = Some(source_id);
        self
    }

    pub fn id(&self) -> &ContentId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<()> {
        let title = title.into();
        validate::non_empty("title", &title)?;
        self.title = title;
        Ok(())
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Set the duration, rounded to milliseconds
    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = tree::quantize_duration(duration);
    }

    /// Set the duration from raw seconds
    ///
    /// Negative or non-finite input is refused: a warning is logged, the
    /// previous duration is kept, and the error is returned.
    pub fn set_duration_secs(&mut self, secs: f64) -> Result<()> {
        match tree::duration_from_secs("duration", secs) {
            Ok(duration) => {
                self.duration = duration;
                Ok(())
            }
            Err(err) => {
                warn!(content_id = %self.id, secs, "Refusing invalid duration, keeping {:?}", self.duration);
                Err(err)
            }
        }
    }

    pub fn creator_id(&self) -> &PersonId {
        &self.creator_id
    }

    pub fn collaborator_ids(&self) -> &[PersonId] {
        &self.collaborator_ids
    }

    /// Replace collaborators; duplicates are dropped
    pub fn set_collaborator_ids(&mut self, collaborator_ids: Vec<PersonId>) -> Result<()> {
        validate::non_empty_all("collaborator_ids", &collaborator_ids)?;
        self.collaborator_ids = validate::unique(collaborator_ids);
        Ok(())
    }

    /// Add one collaborator; returns `false` if already present
    pub fn add_collaborator_id(&mut self, collaborator_id: PersonId) -> Result<bool> {
        validate::non_empty("collaborator_ids", collaborator_id.as_str())?;
        Ok(validate::push_unique(
            &mut self.collaborator_ids,
            collaborator_id,
        ))
    }

    pub fn source_id(&self) -> Option<&CollectionId> {
        self.source_id.as_ref()
    }

    pub fn set_source_id(&mut self, source_id: Option<CollectionId>) {
        self.source_id = source_id;
    }

    /// Base tree shared by every content kind
    pub(crate) fn to_tree(&self) -> TreeBuilder {
        TreeBuilder::new()
            .field("id", self.id.as_str())
            .field("title", self.title.as_str())
            .field("duration", tree::duration(self.duration))
            .field("creator_id", self.creator_id.as_str())
            .field("collaborator_ids", tree::strings(&self.collaborator_ids))
            .field("source_id", tree::optional_string(self.source_id.as_ref()))
    }

    pub(crate) fn from_reader(reader: &TreeReader<'_>) -> Result<Self> {
        let info = Self::new(
            ContentId::new(reader.required_str("id")?),
            reader.required_str("title")?,
            reader.duration("duration")?,
            PersonId::new(reader.required_str("creator_id")?),
        )?;

        let collaborators = reader
            .str_list("collaborator_ids")?
            .into_iter()
            .map(PersonId::new)
            .collect();
        let mut info = info.with_collaborators(collaborators)?;
        info.source_id = reader.optional_str("source_id")?.map(CollectionId::new);
        Ok(info)
    }
}

/// Either kind of content, resolved from tagged records
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Track(Track),
    Chapter(AudioBookChapter),
}

impl Content {
    pub fn info(&self) -> &ContentInfo {
        match self {
            Content::Track(track) => track.info(),
            Content::Chapter(chapter) => chapter.info(),
        }
    }

    pub fn info_mut(&mut self) -> &mut ContentInfo {
        match self {
            Content::Track(track) => track.info_mut(),
            Content::Chapter(chapter) => chapter.info_mut(),
        }
    }

    pub fn id(&self) -> &ContentId {
        self.info().id()
    }

    pub fn as_track(&self) -> Option<&Track> {
        match self {
            Content::Track(track) => Some(track),
            Content::Chapter(_) => None,
        }
    }

    pub fn as_chapter(&self) -> Option<&AudioBookChapter> {
        match self {
            Content::Chapter(chapter) => Some(chapter),
            Content::Track(_) => None,
        }
    }
}

impl From<Track> for Content {
    fn from(track: Track) -> Self {
        Content::Track(track)
    }
}

impl From<AudioBookChapter> for Content {
    fn from(chapter: AudioBookChapter) -> Self {
        Content::Chapter(chapter)
    }
}

impl TaggedUnion for Content {
    fn candidates() -> Vec<Candidate<Self>> {
        vec![Candidate::of(Content::Track), Candidate::of(Content::Chapter)]
    }

    fn type_tag(&self) -> &'static str {
        match self {
            Content::Track(_) => Track::TYPE_TAG,
            Content::Chapter(_) => AudioBookChapter::TYPE_TAG,
        }
    }

    fn data(&self) -> Tree {
        match self {
            Content::Track(track) => track.serialize(),
            Content::Chapter(chapter) => chapter.serialize(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MelodyError;

    fn info() -> ContentInfo {
        ContentInfo::new(
            ContentId::new("track_001"),
            "Thunder Road",
            Duration::from_secs(75),
            PersonId::new("artist_001"),
        )
        .unwrap()
    }

    #[test]
    fn construction_validates_required_strings() {
        let result = ContentInfo::new(
            ContentId::new(" "),
            "Title",
            Duration::ZERO,
            PersonId::new("a"),
        );
        assert!(matches!(result, Err(MelodyError::EmptyValue { field }) if field == "id"));

        let result = ContentInfo::new(
            ContentId::new("c"),
            "",
            Duration::ZERO,
            PersonId::new("a"),
        );
        assert!(matches!(result, Err(MelodyError::EmptyValue { field }) if field == "title"));
    }

    #[test]
    fn negative_duration_is_refused_and_previous_value_kept() {
        let mut info = info();

        assert!(info.set_duration_secs(-5.0).is_err());
        assert_eq!(info.duration(), Duration::from_secs(75));

        assert!(info.set_duration_secs(f64::NAN).is_err());
        assert_eq!(info.duration(), Duration::from_secs(75));

        info.set_duration_secs(90.5).unwrap();
        assert_eq!(info.duration(), Duration::from_millis(90_500));
    }

    #[test]
    fn fractional_duration_round_trips_exactly() {
        let mut info = info();
        info.set_duration(Duration::new(31_536_000, 123_456_789));
        assert_eq!(info.duration(), Duration::new(31_536_000, 123_000_000));

        let tree = info.to_tree().build();
        let reader = TreeReader::new("Track", &tree).unwrap();
        assert_eq!(ContentInfo::from_reader(&reader).unwrap(), info);

        let info = ContentInfo::new(
            ContentId::new("c"),
            "Title",
            Duration::from_nanos(1_800_500_000_400),
            PersonId::new("a"),
        )
        .unwrap();
        assert_eq!(info.duration(), Duration::from_millis(1_800_500));
    }

    #[test]
    fn collaborators_are_deduplicated() {
        let mut info = info()
            .with_collaborators(vec![PersonId::new("a"), PersonId::new("a"), PersonId::new("b")])
            .unwrap();
        assert_eq!(info.collaborator_ids(), [PersonId::new("a"), PersonId::new("b")]);

        assert!(!info.add_collaborator_id(PersonId::new("b")).unwrap());
        assert!(info.add_collaborator_id(PersonId::new("c")).unwrap());
        assert_eq!(info.collaborator_ids().len(), 3);
    }

    #[test]
    fn base_tree_has_every_content_key() {
        let tree = info().with_source(CollectionId::new("album_001")).to_tree().build();
        let keys: Vec<&String> = tree.as_object().unwrap().keys().collect();

        assert_eq!(
            keys,
            ["id", "title", "duration", "creator_id", "collaborator_ids", "source_id"]
        );
        assert_eq!(tree["duration"], serde_json::json!(75));
        assert_eq!(tree["source_id"], serde_json::json!("album_001"));
    }
}
