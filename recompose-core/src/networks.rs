//! Network classification: stack-managed versus external.

use crate::types::NetworkRecord;
use std::collections::HashMap;
use tracing::warn;

/// Classifier verdict for one referenced network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkClass {
    /// Name to emit in the document; empty when the reference is dangling
    pub display_name: String,

    /// Whether the stack under render owns this network
    pub managed: bool,
}

/// Decide how a referenced network appears in a stack's document.
///
/// A network is managed when its ownership label equals the stack under
/// render. Managed names optionally lose their `"<stack>_"` prefix (a no-op
/// when the prefix does not match); external names pass through untouched.
/// A dangling network id degrades to an empty display name so one bad
/// reference cannot abort the document.
pub fn classify(
    network_id: &str,
    stack: &str,
    networks: &HashMap<String, NetworkRecord>,
    strip_prefix: bool,
) -> NetworkClass {
    let Some(network) = networks.get(network_id) else {
        warn!(network_id, stack, "service references a network absent from the snapshot");
        return NetworkClass { display_name: String::new(), managed: false };
    };

    let managed = network.owner() == Some(stack);
    let display_name = if managed && strip_prefix {
        let prefix = format!("{}_", stack);
        network.name.strip_prefix(&prefix).unwrap_or(&network.name).to_string()
    } else {
        network.name.clone()
    };

    NetworkClass { display_name, managed }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::STACK_NAMESPACE_LABEL;
    use std::collections::BTreeMap;

    fn snapshot(name: &str, owner: Option<&str>) -> HashMap<String, NetworkRecord> {
        let mut labels = BTreeMap::new();
        if let Some(owner) = owner {
            labels.insert(STACK_NAMESPACE_LABEL.to_string(), owner.to_string());
        }
        HashMap::from([(
            "n1".to_string(),
            NetworkRecord {
                id: "n1".to_string(),
                name: name.to_string(),
                driver: "overlay".to_string(),
                options: BTreeMap::new(),
                labels,
            },
        )])
    }

    #[test]
    fn test_managed_when_owner_matches_stack() {
        let networks = snapshot("web_backend", Some("web"));
        let class = classify("n1", "web", &networks, false);
        assert!(class.managed);
        assert_eq!(class.display_name, "web_backend");
    }

    #[test]
    fn test_managed_strip_prefix() {
        let networks = snapshot("web_backend", Some("web"));
        let class = classify("n1", "web", &networks, true);
        assert_eq!(class.display_name, "backend");
    }

    #[test]
    fn test_strip_prefix_is_noop_on_mismatch() {
        let networks = snapshot("shared-backend", Some("web"));
        let class = classify("n1", "web", &networks, true);
        assert!(class.managed);
        assert_eq!(class.display_name, "shared-backend");
    }

    #[test]
    fn test_external_when_owned_by_other_stack() {
        let networks = snapshot("db_backend", Some("db"));
        let class = classify("n1", "web", &networks, true);
        assert!(!class.managed);
        assert_eq!(class.display_name, "db_backend");
    }

    #[test]
    fn test_external_when_unlabeled() {
        let networks = snapshot("ingress", None);
        let class = classify("n1", "web", &networks, true);
        assert!(!class.managed);
        assert_eq!(class.display_name, "ingress");
    }

    #[test]
    fn test_dangling_reference_degrades_to_empty_name() {
        let networks = snapshot("web_backend", Some("web"));
        let class = classify("missing", "web", &networks, false);
        assert!(!class.managed);
        assert!(class.display_name.is_empty());
    }
}
