use super::content::ContentInfo;
use super::genre::TrackGenre;
use super::ids::PersonId;
use crate::error::{MelodyError, Result};
use crate::tree::{strings, Serializable, Tagged, Tree, TreeReader};
use crate::validate;

/// A music track
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    info: ContentInfo,
    genres: Vec<TrackGenre>,
    producer_ids: Vec<PersonId>,
}

impl Track {
    /// Create a track; at least one genre is required
    pub fn new(info: ContentInfo, genres: Vec<TrackGenre>) -> Result<Self> {
        let mut track = Self {
            info,
            genres: Vec::new(),
            producer_ids: Vec::new(),
        };
        track.set_genres(genres)?;
        Ok(track)
    }

    /// Set producers at construction time
    pub fn with_producers(mut self, producer_ids: Vec<PersonId>) -> Result<Self> {
        self.set_producer_ids(producer_ids)?;
        Ok(self)
    }

    pub fn info(&self) -> &ContentInfo {
        &self.info
    }

    pub fn info_mut(&mut self) -> &mut ContentInfo {
        &mut self.info
    }

    pub fn genres(&self) -> &[TrackGenre] {
        &self.genres
    }

    /// Replace genres; an empty list is refused and duplicates dropped
    pub fn set_genres(&mut self, genres: Vec<TrackGenre>) -> Result<()> {
        if genres.is_empty() {
            return Err(MelodyError::empty_value("genres"));
        }
        self.genres = validate::unique(genres);
        Ok(())
    }

    /// Add one genre; returns `false` if already present
    pub fn add_genre(&mut self, genre: TrackGenre) -> bool {
        validate::push_unique(&mut self.genres, genre)
    }

    pub fn producer_ids(&self) -> &[PersonId] {
        &self.producer_ids
    }

    pub fn set_producer_ids(&mut self, producer_ids: Vec<PersonId>) -> Result<()> {
        validate::non_empty_all("producer_ids", &producer_ids)?;
        self.producer_ids = validate::unique(producer_ids);
        Ok(())
    }

    pub fn add_producer_id(&mut self, producer_id: PersonId) -> Result<bool> {
        validate::non_empty("producer_ids", producer_id.as_str())?;
        Ok(validate::push_unique(&mut self.producer_ids, producer_id))
    }
}

impl Serializable for Track {
    fn serialize(&self) -> Tree {
        self.info
            .to_tree()
            .field(
                "genres",
                strings(self.genres.iter().map(TrackGenre::as_str)),
            )
            .field("producer_ids", strings(&self.producer_ids))
            .build()
    }

    fn deserialize(tree: &Tree) -> Result<Self> {
        let reader = TreeReader::new(Self::TYPE_TAG, tree)?;
        let info = ContentInfo::from_reader(&reader)?;
        let genres = reader.token_list("genres", TrackGenre::from_str)?;
        let producers = reader
            .str_list("producer_ids")?
            .into_iter()
            .map(PersonId::new)
            .collect();

        Self::new(info, genres)?.with_producers(producers)
    }
}

impl Tagged for Track {
    const TYPE_TAG: &'static str = "Track";
}
