//! Upsert policy: decide what to do with a validated record given the
//! result of the natural-key lookup and the caller's overwrite flag.

/// Result of probing the store for an existing record by natural key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupResult<K> {
    NotFound,
    Found(K),
    /// The probe itself failed. Must never be conflated with `NotFound`:
    /// guessing `Create` risks duplicates, guessing `Skip` drops data.
    Failed(String),
}

/// Action resolved for one validated record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedAction<K> {
    Create,
    Overwrite(K),
    Skip(K),
}

/// Resolve the action for a record. A failed lookup is surfaced as an
/// error for the item rather than silently mapped to either action.
pub fn resolve<K>(
    lookup: LookupResult<K>,
    overwrite: bool,
) -> Result<ResolvedAction<K>, String> {
    match lookup {
        LookupResult::NotFound => Ok(ResolvedAction::Create),
        LookupResult::Found(key) if overwrite => Ok(ResolvedAction::Overwrite(key)),
        LookupResult::Found(key) => Ok(ResolvedAction::Skip(key)),
        LookupResult::Failed(message) => Err(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_always_creates() {
        assert_eq!(
            resolve::<i32>(LookupResult::NotFound, false),
            Ok(ResolvedAction::Create)
        );
        assert_eq!(
            resolve::<i32>(LookupResult::NotFound, true),
            Ok(ResolvedAction::Create)
        );
    }

    #[test]
    fn found_skips_unless_overwrite() {
        assert_eq!(
            resolve(LookupResult::Found(42), false),
            Ok(ResolvedAction::Skip(42))
        );
        assert_eq!(
            resolve(LookupResult::Found(42), true),
            Ok(ResolvedAction::Overwrite(42))
        );
    }

    #[test]
    fn failed_lookup_is_never_resolved() {
        assert_eq!(
            resolve::<i32>(LookupResult::Failed("connection reset".to_string()), true),
            Err("connection reset".to_string())
        );
        assert_eq!(
            resolve::<i32>(LookupResult::Failed("connection reset".to_string()), false),
            Err("connection reset".to_string())
        );
    }
}
