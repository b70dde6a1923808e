//! Heuristics for low-level-discovery triggers.
//!
//! Nothing here is exact. Zabbix does not expose a reliable link from a
//! discovered trigger back to its prototype, so the matching works on
//! description fragments and item key prefixes.

use crate::types::Trigger;

/// Description fragments typical of triggers generated per interface.
pub const DISCOVERED_PATTERNS: &[&str] = &["Twe1/0/", "Te1/0/", "Gi1/0/", "Fa1/0/", "{#", "}("];

/// Whether a trigger is, or looks like, a discovered trigger.
pub fn looks_discovered(trigger: &Trigger) -> bool {
    trigger.is_discovered()
        || DISCOVERED_PATTERNS
            .iter()
            .any(|p| trigger.description.contains(p))
}

/// Split triggers into those to keep and those that look discovered.
pub fn partition_discovered(triggers: Vec<Trigger>) -> (Vec<Trigger>, Vec<Trigger>) {
    let (skipped, kept): (Vec<_>, Vec<_>) = triggers.into_iter().partition(looks_discovered);
    for t in &skipped {
        tracing::debug!(
            "Skipping discovered trigger (flags={}): {}",
            t.flags,
            t.description
        );
    }
    (kept, skipped)
}

/// Item key without its bracketed parameters.
pub fn base_item_key(key: &str) -> &str {
    match key.find('[') {
        Some(idx) => &key[..idx],
        None => key,
    }
}

fn first_item_key(trigger: &Trigger) -> Option<&str> {
    trigger
        .items
        .first()
        .map(|i| i.key_.as_str())
        .filter(|k| !k.is_empty())
}

/// First prototype whose first item shares the discovered trigger's base key.
pub fn match_prototype_by_item_key<'a>(
    discovered: &Trigger,
    prototypes: &'a [Trigger],
) -> Option<&'a Trigger> {
    let discovered_base = base_item_key(first_item_key(discovered)?);
    prototypes.iter().find(|p| {
        first_item_key(p)
            .map(|k| base_item_key(k) == discovered_base)
            .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Item, TriggerFlags};

    fn trigger(id: &str, desc: &str, flags: TriggerFlags) -> Trigger {
        Trigger {
            triggerid: id.to_string(),
            description: desc.to_string(),
            flags,
            ..Default::default()
        }
    }

    fn with_key(mut t: Trigger, key: &str) -> Trigger {
        t.items.push(Item {
            itemid: format!("i{}", t.triggerid),
            key_: key.to_string(),
            hostid: None,
        });
        t
    }

    #[test]
    fn test_flags_mark_discovered() {
        assert!(looks_discovered(&trigger("1", "Link down", TriggerFlags::Discovered)));
        assert!(!looks_discovered(&trigger("2", "Link down", TriggerFlags::Plain)));
    }

    #[test]
    fn test_description_patterns_mark_discovered() {
        assert!(looks_discovered(&trigger(
            "1",
            "Interface Gi1/0/12: Link down",
            TriggerFlags::Plain
        )));
        assert!(looks_discovered(&trigger(
            "2",
            "Interface {#IFNAME}: high errors",
            TriggerFlags::Plain
        )));
        assert!(looks_discovered(&trigger(
            "3",
            "Interface {#IFNAME}(uplink) down",
            TriggerFlags::Plain
        )));
        assert!(!looks_discovered(&trigger(
            "4",
            "{HOST.HOST} Down",
            TriggerFlags::Plain
        )));
    }

    #[test]
    fn test_partition_keeps_order() {
        let (kept, skipped) = partition_discovered(vec![
            trigger("1", "CPU high", TriggerFlags::Plain),
            trigger("2", "Te1/0/1 down", TriggerFlags::Plain),
            trigger("3", "Memory low", TriggerFlags::Plain),
            trigger("4", "Port down", TriggerFlags::Discovered),
        ]);
        let kept: Vec<_> = kept.iter().map(|t| t.triggerid.as_str()).collect();
        let skipped: Vec<_> = skipped.iter().map(|t| t.triggerid.as_str()).collect();
        assert_eq!(kept, vec!["1", "3"]);
        assert_eq!(skipped, vec!["2", "4"]);
    }

    #[test]
    fn test_base_item_key() {
        assert_eq!(base_item_key("ifOperStatus[GigabitEthernet1/0/1]"), "ifOperStatus");
        assert_eq!(base_item_key("icmpping"), "icmpping");
        assert_eq!(base_item_key("net.if.in[{#IFNAME}]"), "net.if.in");
    }

    #[test]
    fn test_match_prototype_by_item_key() {
        let discovered = with_key(
            trigger("100", "Gi1/0/1 down", TriggerFlags::Discovered),
            "ifOperStatus[Gi1/0/1]",
        );
        let prototypes = vec![
            with_key(trigger("200", "{#IFNAME} errors", TriggerFlags::Prototype), "ifInErrors[{#SNMPINDEX}]"),
            with_key(trigger("201", "{#IFNAME} down", TriggerFlags::Prototype), "ifOperStatus[{#SNMPINDEX}]"),
            with_key(trigger("202", "{#IFNAME} down again", TriggerFlags::Prototype), "ifOperStatus[{#IFNAME}]"),
        ];
        let found = match_prototype_by_item_key(&discovered, &prototypes).unwrap();
        assert_eq!(found.triggerid, "201");
    }

    #[test]
    fn test_match_requires_items_on_both_sides() {
        let bare = trigger("100", "down", TriggerFlags::Discovered);
        let prototypes = vec![with_key(trigger("200", "p", TriggerFlags::Prototype), "ifOperStatus[x]")];
        assert!(match_prototype_by_item_key(&bare, &prototypes).is_none());

        let discovered = with_key(trigger("101", "down", TriggerFlags::Discovered), "ifOperStatus[1]");
        let keyless = vec![trigger("201", "p", TriggerFlags::Prototype)];
        assert!(match_prototype_by_item_key(&discovered, &keyless).is_none());
    }
}
