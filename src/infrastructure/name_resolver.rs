use crate::application::SubjectResolver;
use crate::domain::SubjectKey;

/// Resolves display names to name-based keys. Blank names do not resolve.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameResolver;

impl SubjectResolver<str> for NameResolver {
    fn resolve(&self, name: &str) -> Option<SubjectKey> {
        let name = name.trim();
        (!name.is_empty()).then(|| SubjectKey::from_name(name))
    }
}
