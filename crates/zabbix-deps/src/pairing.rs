//! Dependency edge planning.

use crate::types::{DownTrigger, TriggerRef};

/// A dependency edge to create: `dependent` stops alerting while `upstream` fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyPair<'a> {
    pub dependent: &'a str,
    pub upstream: &'a DownTrigger,
}

/// Every dependent/upstream combination, skipping pairs of the same trigger.
pub fn dependency_pairs<'a>(
    dependents: &'a [String],
    upstream: &'a [DownTrigger],
) -> Vec<DependencyPair<'a>> {
    dependents
        .iter()
        .flat_map(|d| {
            upstream
                .iter()
                .filter(move |u| u.triggerid != *d)
                .map(move |u| DependencyPair {
                    dependent: d.as_str(),
                    upstream: u,
                })
        })
        .collect()
}

/// Whether `parent` is already among `existing` dependencies.
pub fn has_dependency(existing: &[TriggerRef], parent: &str) -> bool {
    existing.iter().any(|d| d.triggerid == parent)
}

/// Existing dependencies with `parent` appended, unless already present.
pub fn with_dependency(existing: &[TriggerRef], parent: &str) -> Vec<TriggerRef> {
    let mut deps = existing.to_vec();
    if !has_dependency(existing, parent) {
        deps.push(TriggerRef::new(parent));
    }
    deps
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down(id: &str, host: &str) -> DownTrigger {
        DownTrigger {
            triggerid: id.to_string(),
            host_name: host.to_string(),
        }
    }

    #[test]
    fn test_pairs_cross_product() {
        let dependents = vec!["1".to_string(), "2".to_string()];
        let upstream = vec![down("10", "DAL-FW-01"), down("11", "DAL-FW-02")];
        let pairs = dependency_pairs(&dependents, &upstream);
        let flat: Vec<_> = pairs
            .iter()
            .map(|p| (p.dependent, p.upstream.triggerid.as_str()))
            .collect();
        assert_eq!(flat, vec![("1", "10"), ("1", "11"), ("2", "10"), ("2", "11")]);
    }

    #[test]
    fn test_pairs_exclude_self() {
        let dependents = vec!["10".to_string(), "2".to_string()];
        let upstream = vec![down("10", "DAL-FW-01")];
        let pairs = dependency_pairs(&dependents, &upstream);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].dependent, "2");
    }

    #[test]
    fn test_pairs_empty_sides() {
        assert!(dependency_pairs(&[], &[down("1", "x")]).is_empty());
        assert!(dependency_pairs(&["1".to_string()], &[]).is_empty());
    }

    #[test]
    fn test_with_dependency_appends_once() {
        let existing = vec![TriggerRef::new("5")];
        let deps = with_dependency(&existing, "9");
        assert_eq!(deps, vec![TriggerRef::new("5"), TriggerRef::new("9")]);
        assert!(has_dependency(&deps, "9"));
        assert_eq!(with_dependency(&deps, "9").len(), 2);
    }
}
