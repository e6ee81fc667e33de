use super::admin::Admin;
use super::artist::Artist;
use super::ids::PersonId;
use super::user::User;
use crate::error::Result;
use crate::tagged::{Candidate, TaggedUnion};
use crate::tree::{Serializable, Tagged, Tree, TreeBuilder, TreeReader};
use crate::validate;

/// Identity shared by users, artists and admins
///
/// The id is fixed at construction. Name and e-mail are re-validated on
/// every assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonInfo {
    id: PersonId,
    name: String,
    email: String,
}

impl PersonInfo {
    pub fn new(id: PersonId, name: impl Into<String>, email: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let email = email.into();
        validate::non_empty("id", id.as_str())?;
        validate::non_empty("name", &name)?;
        validate::email("email", &email)?;

        Ok(Self { id, name, email })
    }

    pub fn id(&self) -> &PersonId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        validate::non_empty("name", &name)?;
        self.name = name;
        Ok(())
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn set_email(&mut self, email: impl Into<String>) -> Result<()> {
        let email = email.into();
        validate::email("email", &email)?;
        self.email = email;
        Ok(())
    }

    pub(crate) fn to_tree(&self) -> TreeBuilder {
        TreeBuilder::new()
            .field("id", self.id.as_str())
            .field("name", self.name.as_str())
            .field("email", self.email.as_str())
    }

    pub(crate) fn from_reader(reader: &TreeReader<'_>) -> Result<Self> {
        Self::new(
            PersonId::new(reader.required_str("id")?),
            reader.required_str("name")?,
            reader.required_str("email")?,
        )
    }
}

/// Any kind of person
#[derive(Debug, Clone, PartialEq)]
pub enum Person {
    User(User),
    Artist(Artist),
    Admin(Admin),
}

impl Person {
    pub fn info(&self) -> &PersonInfo {
        match self {
            Person::User(user) => user.info(),
            Person::Artist(artist) => artist.info(),
            Person::Admin(admin) => admin.info(),
        }
    }

    pub fn info_mut(&mut self) -> &mut PersonInfo {
        match self {
            Person::User(user) => user.info_mut(),
            Person::Artist(artist) => artist.info_mut(),
            Person::Admin(admin) => admin.info_mut(),
        }
    }

    pub fn id(&self) -> &PersonId {
        self.info().id()
    }
}

impl From<User> for Person {
    fn from(user: User) -> Self {
        Person::User(user)
    }
}

impl From<Artist> for Person {
    fn from(artist: Artist) -> Self {
        Person::Artist(artist)
    }
}

impl From<Admin> for Person {
    fn from(admin: Admin) -> Self {
        Person::Admin(admin)
    }
}

impl TaggedUnion for Person {
    fn candidates() -> Vec<Candidate<Self>> {
        vec![
            Candidate::of(Person::User),
            Candidate::of(Person::Artist),
            Candidate::of(Person::Admin),
        ]
    }

    fn type_tag(&self) -> &'static str {
        match self {
            Person::User(_) => User::TYPE_TAG,
            Person::Artist(_) => Artist::TYPE_TAG,
            Person::Admin(_) => Admin::TYPE_TAG,
        }
    }

    fn data(&self) -> Tree {
        match self {
            Person::User(user) => user.serialize(),
            Person::Artist(artist) => artist.serialize(),
            Person::Admin(admin) => admin.serialize(),
        }
    }
}
