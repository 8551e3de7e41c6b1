//! Authorization models.

use std::collections::{BTreeMap, BTreeSet};
use std::hash::{DefaultHasher, Hash, Hasher};

use serde::{Deserialize, Serialize};
use warden_security::{Permission, WILDCARD_TOKEN};

use crate::error::IndexingError;

/// A named bundle of permissions.
///
/// `permissions` starts out unset; a role without permissions grants
/// nothing. Two roles are equal when both name and permissions match, while
/// hashing only looks at the name.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SimpleRole {
    name: Option<String>,
    permissions: Option<BTreeSet<Permission>>,
}

impl SimpleRole {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            permissions: None,
        }
    }

    #[must_use]
    pub fn with_permissions(mut self, permissions: impl IntoIterator<Item = Permission>) -> Self {
        self.add_all(permissions);
        self
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn permissions(&self) -> Option<&BTreeSet<Permission>> {
        self.permissions.as_ref()
    }

    pub fn add(&mut self, permission: Permission) {
        self.permissions
            .get_or_insert_with(BTreeSet::new)
            .insert(permission);
    }

    pub fn add_all(&mut self, permissions: impl IntoIterator<Item = Permission>) {
        self.permissions
            .get_or_insert_with(BTreeSet::new)
            .extend(permissions);
    }

    /// Whether any permission of this role implies `permission`.
    #[must_use]
    pub fn is_permitted(&self, permission: &Permission) -> bool {
        self.permissions
            .as_ref()
            .is_some_and(|perms| perms.iter().any(|p| p.implies(permission)))
    }

    /// Hash of the role name, or `0` for an unnamed role.
    #[must_use]
    pub fn hash_code(&self) -> u64 {
        self.name.as_ref().map_or(0, |name| {
            let mut hasher = DefaultHasher::new();
            name.hash(&mut hasher);
            hasher.finish()
        })
    }
}

impl Hash for SimpleRole {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

/// Roles and permissions held by one subject, with permissions indexed by
/// the domain tokens of their first part.
///
/// A permission whose domain lists several tokens is stored under each of
/// them; wildcard-domain permissions live under `*`.
///
/// Deserialization re-indexes the stored permissions and rejects payloads
/// whose index disagrees with the rebuilt one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredAuthorizationInfo")]
pub struct IndexedAuthorizationInfo {
    roles: BTreeSet<SimpleRole>,
    permission_index: BTreeMap<String, BTreeSet<Permission>>,
}

/// Wire form of [`IndexedAuthorizationInfo`], validated on conversion.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct StoredAuthorizationInfo {
    roles: BTreeSet<SimpleRole>,
    permission_index: BTreeMap<String, BTreeSet<Permission>>,
}

impl TryFrom<StoredAuthorizationInfo> for IndexedAuthorizationInfo {
    type Error = IndexingError;

    fn try_from(stored: StoredAuthorizationInfo) -> Result<Self, Self::Error> {
        let permissions: BTreeSet<Permission> =
            stored.permission_index.values().flatten().cloned().collect();
        let info = Self::new(stored.roles, permissions)?;

        for (domain, bucket) in &stored.permission_index {
            for permission in bucket {
                if !permission.domain().contains(domain) {
                    return Err(IndexingError::MisplacedPermission {
                        permission: permission.clone(),
                        domain: domain.clone(),
                    });
                }
            }
        }
        Ok(info)
    }
}

impl IndexedAuthorizationInfo {
    /// Build from roles and directly assigned permissions.
    ///
    /// # Errors
    ///
    /// Returns [`IndexingError`] if indexing leaves a permission outside its bucket.
    pub fn new(
        roles: impl IntoIterator<Item = SimpleRole>,
        permissions: impl IntoIterator<Item = Permission>,
    ) -> Result<Self, IndexingError> {
        let mut info = Self {
            roles: roles.into_iter().collect(),
            permission_index: BTreeMap::new(),
        };
        info.index_permission(permissions)?;
        Ok(info)
    }

    #[must_use]
    pub fn roles(&self) -> &BTreeSet<SimpleRole> {
        &self.roles
    }

    /// Names of all named roles.
    #[must_use]
    pub fn roleids(&self) -> BTreeSet<String> {
        self.roles
            .iter()
            .filter_map(SimpleRole::name)
            .map(ToOwned::to_owned)
            .collect()
    }

    #[must_use]
    pub fn has_role(&self, roleid: &str) -> bool {
        self.roles.iter().any(|r| r.name() == Some(roleid))
    }

    pub fn add_role(&mut self, roles: impl IntoIterator<Item = SimpleRole>) {
        self.roles.extend(roles);
    }

    /// Every indexed permission.
    #[must_use]
    pub fn permissions(&self) -> BTreeSet<Permission> {
        self.permission_index.values().flatten().cloned().collect()
    }

    /// Replace all indexed permissions.
    ///
    /// # Errors
    ///
    /// See [`IndexedAuthorizationInfo::index_permission`].
    pub fn set_permissions(
        &mut self,
        permissions: impl IntoIterator<Item = Permission>,
    ) -> Result<(), IndexingError> {
        self.permission_index.clear();
        self.index_permission(permissions)
    }

    /// Add permissions on top of those already indexed.
    ///
    /// # Errors
    ///
    /// See [`IndexedAuthorizationInfo::index_permission`].
    pub fn add_permission(
        &mut self,
        permissions: impl IntoIterator<Item = Permission>,
    ) -> Result<(), IndexingError> {
        self.index_permission(permissions)
    }

    /// Store each permission under every token of its domain.
    ///
    /// # Errors
    ///
    /// Returns [`IndexingError::PermissionNotIndexed`] if a permission is
    /// missing from one of its buckets afterwards.
    pub fn index_permission(
        &mut self,
        permissions: impl IntoIterator<Item = Permission>,
    ) -> Result<(), IndexingError> {
        let permissions: Vec<Permission> = permissions.into_iter().collect();
        for permission in &permissions {
            for domain in permission.domain() {
                self.permission_index
                    .entry(domain.clone())
                    .or_default()
                    .insert(permission.clone());
            }
        }
        self.assert_permissions_indexed(&permissions)
    }

    /// Permissions indexed under exactly `domain`. Empty for unseen domains.
    #[must_use]
    pub fn get_permission(&self, domain: &str) -> BTreeSet<Permission> {
        self.permission_index
            .get(domain)
            .cloned()
            .unwrap_or_default()
    }

    /// Whether any role permission or indexed permission implies `permission`.
    ///
    /// Only the buckets for the requested domain tokens and `*` are searched,
    /// unless the request itself has a wildcard domain.
    #[must_use]
    pub fn implies(&self, permission: &Permission) -> bool {
        if self.roles.iter().any(|r| r.is_permitted(permission)) {
            return true;
        }

        if permission.has_wildcard_domain() {
            return self
                .permission_index
                .values()
                .flatten()
                .any(|p| p.implies(permission));
        }

        permission
            .domain()
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(WILDCARD_TOKEN))
            .filter_map(|domain| self.permission_index.get(domain))
            .flatten()
            .any(|p| p.implies(permission))
    }

    /// Number of roles plus number of distinct indexed permissions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.roles.len() + self.permissions().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty() && self.permission_index.is_empty()
    }

    fn assert_permissions_indexed(&self, permissions: &[Permission]) -> Result<(), IndexingError> {
        for permission in permissions {
            for domain in permission.domain() {
                let indexed = self
                    .permission_index
                    .get(domain)
                    .is_some_and(|bucket| bucket.contains(permission));
                if !indexed {
                    return Err(IndexingError::PermissionNotIndexed {
                        permission: permission.clone(),
                        domain: domain.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
