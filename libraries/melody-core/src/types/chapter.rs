use super::content::ContentInfo;
use super::genre::AudioBookGenre;
use super::ids::PersonId;
use crate::error::Result;
use crate::tree::{strings, Serializable, Tagged, Tree, TreeReader};
use crate::validate;

/// One chapter of an audiobook
///
/// Narrators default to the chapter's creator when none are given.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBookChapter {
    info: ContentInfo,
    narrator_ids: Vec<PersonId>,
    genres: Vec<AudioBookGenre>,
}

impl AudioBookChapter {
    pub fn new(info: ContentInfo) -> Self {
        let narrator_ids = vec![info.creator_id().clone()];
        Self {
            info,
            narrator_ids,
            genres: Vec::new(),
        }
    }

    /// Set narrators at construction time; an empty list falls back to the creator
    pub fn with_narrators(mut self, narrator_ids: Vec<PersonId>) -> Result<Self> {
        self.set_narrator_ids(narrator_ids)?;
        Ok(self)
    }

    #[must_use]
    pub fn with_genres(mut self, genres: Vec<AudioBookGenre>) -> Self {
        self.set_genres(genres);
        self
    }

    pub fn info(&self) -> &ContentInfo {
        &self.info
    }

    pub fn info_mut(&mut self) -> &mut ContentInfo {
        &mut self.info
    }

    pub fn narrator_ids(&self) -> &[PersonId] {
        &self.narrator_ids
    }

    pub fn set_narrator_ids(&mut self, narrator_ids: Vec<PersonId>) -> Result<()> {
        validate::non_empty_all("narrator_ids", &narrator_ids)?;
        self.narrator_ids = if narrator_ids.is_empty() {
            vec![self.info.creator_id().clone()]
        } else {
            validate::unique(narrator_ids)
        };
        Ok(())
    }

    pub fn add_narrator_id(&mut self, narrator_id: PersonId) -> Result<bool> {
        validate::non_empty("narrator_ids", narrator_id.as_str())?;
        Ok(validate::push_unique(&mut self.narrator_ids, narrator_id))
    }

    pub fn genres(&self) -> &[AudioBookGenre] {
        &self.genres
    }

    pub fn set_genres(&mut self, genres: Vec<AudioBookGenre>) {
        self.genres = validate::unique(genres);
    }
}

impl Serializable for AudioBookChapter {
    fn serialize(&self) -> Tree {
        self.info
            .to_tree()
            .field("narrator_ids", strings(&self.narrator_ids))
            .field(
                "genres",
                strings(self.genres.iter().map(AudioBookGenre::as_str)),
            )
            .build()
    }

    fn deserialize(tree: &Tree) -> Result<Self> {
        let reader = TreeReader::new(Self::TYPE_TAG, tree)?;
        let info = ContentInfo::from_reader(&reader)?;
        let narrators = reader
            .str_list("narrator_ids")?
            .into_iter()
            .map(PersonId::new)
            .collect();
        let genres = reader.token_list("genres", AudioBookGenre::from_str)?;

        Ok(Self::new(info).with_narrators(narrators)?.with_genres(genres))
    }
}

impl Tagged for AudioBookChapter {
    const TYPE_TAG: &'static str = "AudioBookChapter";
}
