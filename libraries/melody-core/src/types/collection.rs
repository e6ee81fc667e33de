//! Collections of content and their derived aggregates
//!
//! A collection exclusively owns its contents. `collaborator_ids` and
//! `genres` are never stored independently: every structural change goes
//! through [`Collection::mutate_contents`], which recomputes both.

use super::chapter::AudioBookChapter;
use super::content::ContentInfo;
use super::genre::{AudioBookGenre, TrackGenre};
use super::ids::{CollectionId, PersonId};
use super::track::Track;
use crate::error::{MelodyError, Result};
use crate::tree::{entities, strings, Serializable, Tree, TreeBuilder, TreeReader};
use crate::validate;
use std::fmt;
use tracing::{debug, warn};

/// Content that can be held by a [`Collection`]
pub trait CollectionItem: Serializable + fmt::Debug + Clone + PartialEq {
    type Genre: Copy + Ord + fmt::Debug + fmt::Display;

    fn info(&self) -> &ContentInfo;

    fn genres(&self) -> &[Self::Genre];
}

impl CollectionItem for Track {
    type Genre = TrackGenre;

    fn info(&self) -> &ContentInfo {
        Track::info(self)
    }

    fn genres(&self) -> &[TrackGenre] {
        Track::genres(self)
    }
}

impl CollectionItem for AudioBookChapter {
    type Genre = AudioBookGenre;

    fn info(&self) -> &ContentInfo {
        AudioBookChapter::info(self)
    }

    fn genres(&self) -> &[AudioBookGenre] {
        AudioBookChapter::genres(self)
    }
}

/// Ordered, owned content plus aggregates derived from it
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<C: CollectionItem> {
    id: CollectionId,
    title: String,
    contents: Vec<C>,
    creator_id: PersonId,
    collaborator_ids: Vec<PersonId>,
    genres: Vec<C::Genre>,
}

impl<C: CollectionItem> Collection<C> {
    pub fn new(
        id: CollectionId,
        title: impl Into<String>,
        creator_id: PersonId,
        contents: Vec<C>,
    ) -> Result<Self> {
        let title = title.into();
        validate::non_empty("id", id.as_str())?;
        validate::non_empty("title", &title)?;
        validate::non_empty("creator_id", creator_id.as_str())?;

        let mut collection = Self {
            id,
            title,
            contents,
            creator_id,
            collaborator_ids: Vec::new(),
            genres: Vec::new(),
        };
        collection.update();
        Ok(collection)
    }

    pub fn id(&self) -> &CollectionId {
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

    pub fn creator_id(&self) -> &PersonId {
        &self.creator_id
    }

    pub fn contents(&self) -> &[C] {
        &self.contents
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Sorted union of every item's collaborators
    pub fn collaborator_ids(&self) -> &[PersonId] {
        &self.collaborator_ids
    }

    /// Sorted union of every item's genres
    pub fn genres(&self) -> &[C::Genre] {
        &self.genres
    }

    /// Replace the whole content list
    pub fn set_contents(&mut self, contents: Vec<C>) {
        self.mutate_contents(|items| *items = contents);
    }

    pub fn add_content(&mut self, item: C) {
        self.mutate_contents(|items| items.push(item));
    }

    /// Remove the first item equal to `item`; returns `false` if none matched
    pub fn remove_content(&mut self, item: &C) -> bool {
        let removed = self.mutate_contents(|items| {
            items
                .iter()
                .position(|candidate| candidate == item)
                .map(|index| items.remove(index))
        });

        if removed.is_none() {
            debug!(collection_id = %self.id, content_id = %item.info().id(), "Content not in collection");
        }
        removed.is_some()
    }

    /// Remove and return the item at `index`
    ///
    /// An out-of-range index is logged and yields `None`; the collection is
    /// left unchanged.
    pub fn pop_content(&mut self, index: usize) -> Option<C> {
        match self.try_pop_content(index) {
            Ok(item) => Some(item),
            Err(err) => {
                warn!(collection_id = %self.id, error = %err, "Cannot pop content");
                None
            }
        }
    }

    /// Like [`Collection::pop_content`], but reports the invalid index
    pub fn try_pop_content(&mut self, index: usize) -> Result<C> {
        let len = self.contents.len();
        if index >= len {
            return Err(MelodyError::InvalidIndex { index, len });
        }
        Ok(self.mutate_contents(|items| items.remove(index)))
    }

    /// Recompute derived aggregates from the current contents
    ///
    /// Idempotent: a second call without intervening changes is a no-op.
    pub fn update(&mut self) {
        let mut collaborator_ids: Vec<PersonId> = self
            .contents
            .iter()
            .flat_map(|item| item.info().collaborator_ids().iter().cloned())
            .collect();
        collaborator_ids.sort();
        collaborator_ids.dedup();

        let mut genres: Vec<C::Genre> = self
            .contents
            .iter()
            .flat_map(|item| item.genres().iter().copied())
            .collect();
        genres.sort();
        genres.dedup();

        self.collaborator_ids = collaborator_ids;
        self.genres = genres;
    }

    /// Run a structural change on the contents, then refresh aggregates
    fn mutate_contents<R>(&mut self, change: impl FnOnce(&mut Vec<C>) -> R) -> R {
        let result = change(&mut self.contents);
        self.update();
        result
    }

    pub(crate) fn to_tree(&self) -> Tree {
        TreeBuilder::new()
            .field("id", self.id.as_str())
            .field("title", self.title.as_str())
            .field("contents", entities(&self.contents))
            .field("creator_id", self.creator_id.as_str())
            .field("collaborator_ids", strings(&self.collaborator_ids))
            .field(
                "genres",
                strings(self.genres.iter().map(ToString::to_string)),
            )
            .build()
    }

    /// Rebuild from a tree; stored aggregates are ignored and recomputed
    pub(crate) fn from_tree(entity: &'static str, tree: &Tree) -> Result<Self> {
        let reader = TreeReader::new(entity, tree)?;

        Self::new(
            CollectionId::new(reader.required_str("id")?),
            reader.required_str("title")?,
            PersonId::new(reader.required_str("creator_id")?),
            reader.entity_list("contents")?,
        )
    }
}

/// Define a named collection kind over [`Collection`]
macro_rules! collection_kind {
    ($(#[$meta:meta])* $name:ident, $item:ty, $tag:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name($crate::types::collection::Collection<$item>);

        impl $name {
            pub fn new(
                id: $crate::types::ids::CollectionId,
                title: impl Into<String>,
                creator_id: $crate::types::ids::PersonId,
                contents: Vec<$item>,
            ) -> $crate::error::Result<Self> {
                $crate::types::collection::Collection::new(id, title, creator_id, contents)
                    .map(Self)
            }

            pub fn into_inner(self) -> $crate::types::collection::Collection<$item> {
                self.0
            }
        }

        impl std::ops::Deref for $name {
            type Target = $crate::types::collection::Collection<$item>;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl std::ops::DerefMut for $name {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.0
            }
        }

        impl $crate::tree::Serializable for $name {
            fn serialize(&self) -> $crate::tree::Tree {
                self.0.to_tree()
            }

            fn deserialize(tree: &$crate::tree::Tree) -> $crate::error::Result<Self> {
                $crate::types::collection::Collection::from_tree($tag, tree).map(Self)
            }
        }

        impl $crate::tree::Tagged for $name {
            const TYPE_TAG: &'static str = $tag;
        }
    };
}

pub(crate) use collection_kind;
