use super::chapter::AudioBookChapter;
use super::collection::collection_kind;
use super::ids::PersonId;

collection_kind!(
    /// Chapters of a single book
    AudioBook,
    AudioBookChapter,
    "AudioBook"
);

impl AudioBook {
    pub fn author_id(&self) -> &PersonId {
        self.creator_id()
    }

    pub fn chapters(&self) -> &[AudioBookChapter] {
        self.contents()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Serializable;
    use crate::types::content::ContentInfo;
    use crate::types::genre::AudioBookGenre;
    use crate::types::ids::{CollectionId, ContentId};
    use std::time::Duration;

    fn chapter(id: &str, narrator: &str, genres: Vec<AudioBookGenre>) -> AudioBookChapter {
        let info = ContentInfo::new(
            ContentId::new(id),
            format!("Chapter {id}"),
            Duration::from_secs(900),
            PersonId::new("author_001"),
        )
        .unwrap()
        .with_collaborators(vec![PersonId::new(narrator)])
        .unwrap();
        AudioBookChapter::new(info).with_genres(genres)
    }

    #[test]
    fn genres_are_derived_from_chapters() {
        let mut book = AudioBook::new(
            CollectionId::new("book_001"),
            "The Long Night",
            PersonId::new("author_001"),
            vec![chapter("1", "n1", vec![AudioBookGenre::Thriller])],
        )
        .unwrap();
        book.add_content(chapter(
            "2",
            "n2",
            vec![AudioBookGenre::Horror, AudioBookGenre::Thriller],
        ));

        assert_eq!(book.genres(), [AudioBookGenre::Horror, AudioBookGenre::Thriller]);
        assert_eq!(book.chapters().len(), 2);

        let restored = AudioBook::deserialize(&book.serialize()).unwrap();
        assert_eq!(restored, book);
    }
}
