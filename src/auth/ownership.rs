use uuid::Uuid;

use crate::error::AppError;

/// Allows a mutation iff the caller is the recorded owner. Anonymous
/// content has no owner and is immutable after creation. Callers surface
/// 404 for a missing resource before invoking this check.
pub fn authorize_mutation(caller: Uuid, owner: Option<Uuid>) -> Result<(), AppError> {
    match owner {
        Some(owner) if owner == caller => Ok(()),
        Some(_) => Err(AppError::Forbidden("you do not own this resource".into())),
        None => Err(AppError::Forbidden(
            "anonymous content cannot be modified".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_is_allowed() {
        let id = Uuid::new_v4();
        assert!(authorize_mutation(id, Some(id)).is_ok());
    }

    #[test]
    fn non_owner_is_forbidden() {
        let err = authorize_mutation(Uuid::new_v4(), Some(Uuid::new_v4())).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn anonymous_resource_is_immutable() {
        let err = authorize_mutation(Uuid::new_v4(), None).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
