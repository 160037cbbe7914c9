use chrono::DateTime;
use chrono::Utc;

/// Soft-delete lifecycle shared by users and roles.
///
/// Stores persist this as a nullable `deleted_at` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeletionState {
    #[default]
    Active,
    SoftDeleted {
        at: DateTime<Utc>,
    },
}

impl DeletionState {
    pub fn from_deleted_at(deleted_at: Option<DateTime<Utc>>) -> Self {
        match deleted_at {
            Some(at) => Self::SoftDeleted { at },
            None => Self::Active,
        }
    }

    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Active => None,
            Self::SoftDeleted { at } => Some(*at),
        }
    }

    pub fn is_deleted(&self) -> bool {
        matches!(self, Self::SoftDeleted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_mapping() {
        let at = Utc::now();

        assert_eq!(DeletionState::from_deleted_at(None), DeletionState::Active);
        assert_eq!(
            DeletionState::from_deleted_at(Some(at)).deleted_at(),
            Some(at)
        );
        assert!(!DeletionState::Active.is_deleted());
        assert!(DeletionState::SoftDeleted { at }.is_deleted());
    }
}
