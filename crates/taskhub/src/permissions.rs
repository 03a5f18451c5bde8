//! Role-based access checks over the persisted permission matrix.

use crate::error::StoreError;
use crate::storage::LocalStore;
use serde_json::Value;
use taskhub_types::{PermissionAction, PermissionMatrix, Resource, User, ADMIN_ROLE};
use tokio::sync::broadcast;

/// Storage key of the persisted matrix.
pub const MATRIX_KEY: &str = "permission_matrix";

/// Answers "may role R perform action A on resource X".
///
/// Rules, in order:
/// 1. `Admin` is always allowed, whatever the matrix says.
/// 2. A role missing from the matrix is denied everything.
/// 3. `view` is allowed for every role present in the matrix.
/// 4. `edit` is allowed only when the matrix cell is `true`; a missing cell
///    counts as `false`.
pub struct PermissionGate;

impl PermissionGate {
    pub fn can(
        matrix: &PermissionMatrix,
        role: &str,
        resource: Resource,
        action: PermissionAction,
    ) -> bool {
        if role == ADMIN_ROLE {
            return true;
        }
        if !matrix.contains_role(role) {
            return false;
        }
        match action {
            PermissionAction::View => true,
            PermissionAction::Edit => matrix.get(role, resource).unwrap_or(false),
        }
    }

    /// Same as [`PermissionGate::can`]; nobody signed in means denied.
    pub fn for_user(
        matrix: &PermissionMatrix,
        user: Option<&User>,
        resource: Resource,
        action: PermissionAction,
    ) -> bool {
        match user {
            Some(user) => Self::can(matrix, &user.role, resource, action),
            None => false,
        }
    }
}

/// Loads and persists the matrix in the local store.
///
/// Saves are last-writer-wins and publish [`MATRIX_KEY`] to the store's
/// subscribers so other views re-read the matrix.
#[derive(Debug, Clone)]
pub struct MatrixStore {
    store: LocalStore,
}

impl MatrixStore {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    /// The persisted matrix, or the default one when nothing is stored or the
    /// stored value is not a JSON object.
    ///
    /// Cells with an unknown resource label or a non-boolean value are dropped
    /// one by one; the rest of the stored matrix is kept.
    pub fn load(&self) -> PermissionMatrix {
        let stored = match self.store.get_json::<Value>(MATRIX_KEY) {
            Ok(Some(value)) => value,
            Ok(None) => return PermissionMatrix::default(),
            Err(e) => {
                tracing::warn!("Stored permission matrix is unreadable, using defaults: {}", e);
                return PermissionMatrix::default();
            }
        };

        match matrix_from_value(&stored) {
            Some(matrix) => matrix,
            None => {
                tracing::warn!("Stored permission matrix is not an object, using defaults");
                PermissionMatrix::default()
            }
        }
    }

    pub fn save(&self, matrix: &PermissionMatrix) -> Result<(), StoreError> {
        self.store.set_json(MATRIX_KEY, matrix)?;
        tracing::info!("Saved permission matrix ({} roles)", matrix.0.len());
        Ok(())
    }

    /// Flip one cell and persist the result.
    pub fn toggle(&self, role: &str, resource: Resource) -> Result<PermissionMatrix, StoreError> {
        let mut matrix = self.load();
        let allowed = !matrix.get(role, resource).unwrap_or(false);
        matrix.set(role, resource, allowed);
        self.save(&matrix)?;
        Ok(matrix)
    }

    /// Persist the default matrix over whatever is stored.
    pub fn reset(&self) -> Result<PermissionMatrix, StoreError> {
        let matrix = PermissionMatrix::default();
        self.save(&matrix)?;
        Ok(matrix)
    }

    pub fn can(&self, role: &str, resource: Resource, action: PermissionAction) -> bool {
        PermissionGate::can(&self.load(), role, resource, action)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.store.subscribe()
    }
}

fn matrix_from_value(value: &Value) -> Option<PermissionMatrix> {
    let mut matrix = PermissionMatrix::empty();
    for (role, cells) in value.as_object()? {
        // A role listed with garbage is still a known role with no edit rights.
        let permissions = matrix.0.entry(role.clone()).or_default();
        let Some(cells) = cells.as_object() else {
            tracing::warn!("Ignoring permissions of role {:?}: not an object", role);
            continue;
        };
        for (label, allowed) in cells {
            match (Resource::from_str(label), allowed.as_bool()) {
                (Some(resource), Some(allowed)) => {
                    permissions.insert(resource, allowed);
                }
                _ => tracing::warn!("Ignoring permission cell {:?}.{:?} = {}", role, label, allowed),
            }
        }
    }
    Some(matrix)
}
