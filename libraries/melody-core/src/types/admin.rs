use super::genre::Permission;
use super::ids::PersonId;
use super::person::PersonInfo;
use crate::error::Result;
use crate::tree::{strings, Serializable, Tagged, Tree, TreeReader};
use crate::validate;

/// An administrator holding a set of privileges
#[derive(Debug, Clone, PartialEq)]
pub struct Admin {
    info: PersonInfo,
    permissions: Vec<Permission>,
}

impl Admin {
    pub fn new(info: PersonInfo, permissions: Vec<Permission>) -> Self {
        Self {
            info,
            permissions: validate::unique(permissions),
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

    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }

    pub fn set_permissions(&mut self, permissions: Vec<Permission>) {
        self.permissions = validate::unique(permissions);
    }

    /// Grant one privilege; returns `false` if already held
    pub fn grant(&mut self, permission: Permission) -> bool {
        validate::push_unique(&mut self.permissions, permission)
    }

    pub fn revoke(&mut self, permission: Permission) -> bool {
        let before = self.permissions.len();
        self.permissions.retain(|held| *held != permission);
        self.permissions.len() != before
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }
}

impl Serializable for Admin {
    fn serialize(&self) -> Tree {
        self.info
            .to_tree()
            .field(
                "permissions",
                strings(self.permissions.iter().map(Permission::as_str)),
            )
            .build()
    }

    fn deserialize(tree: &Tree) -> Result<Self> {
        let reader = TreeReader::new(Self::TYPE_TAG, tree)?;

        Ok(Self::new(
            PersonInfo::from_reader(&reader)?,
            reader.token_list("permissions", Permission::from_str)?,
        ))
    }
}

impl Tagged for Admin {
    const TYPE_TAG: &'static str = "Admin";
}
