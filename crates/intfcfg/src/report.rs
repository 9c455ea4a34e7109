//! Presentation of a reconciliation: predicted configuration and text diff.

use similar::TextDiff;
use tracing::warn;

use crate::types::{Command, InterfaceList, State};

/// Predicts the configuration after `commands` are applied to `before`.
///
/// `deleted` commands remove the interface; any other command overlays its
/// attributes, creating the interface when it is absent. The result is
/// sorted by name.
pub fn generate_config(commands: &[Command], before: &InterfaceList) -> InterfaceList {
    let mut config = before.clone();

    for command in commands {
        match command.state {
            State::Deleted => {
                config.remove(command.name());
            }
            _ => {
                let mut record = config
                    .get(command.name())
                    .cloned()
                    .unwrap_or_else(|| command.record.name_only());
                record.overlay(&command.record);
                config.upsert(record);
            }
        }
    }

    config.sort_by_name();
    config
}

/// Renders a unified diff of two configurations as pretty JSON, sorted by
/// name. Returns an empty string when they are equal.
pub fn config_diff(before: &InterfaceList, after: &InterfaceList) -> String {
    let mut before = before.clone();
    let mut after = after.clone();
    before.sort_by_name();
    after.sort_by_name();

    if before == after {
        return String::new();
    }

    let (old, new) = match (
        serde_json::to_string_pretty(&before),
        serde_json::to_string_pretty(&after),
    ) {
        (Ok(old), Ok(new)) => (old + "\n", new + "\n"),
        (Err(e), _) | (_, Err(e)) => {
            warn!("Failed to render configuration diff: {}", e);
            return String::new();
        }
    };

    TextDiff::from_lines(&old, &new)
        .unified_diff()
        .context_radius(3)
        .header("before", "after")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InterfaceRecord;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_generate_config() {
        let before = InterfaceList::new(vec![
            InterfaceRecord::new("Loopback0"),
            InterfaceRecord::new("Ethernet4").with_mtu(9100).with_enabled(true),
        ])
        .unwrap();
        let commands = vec![
            Command::new(InterfaceRecord::new("Loopback0"), State::Deleted),
            Command::new(
                InterfaceRecord::new("Ethernet4").with_enabled(false),
                State::Merged,
            ),
            Command::new(
                InterfaceRecord::new("Ethernet0").with_description("uplink"),
                State::Merged,
            ),
        ];

        let after = generate_config(&commands, &before);

        assert_eq!(
            after.into_vec(),
            vec![
                InterfaceRecord::new("Ethernet0").with_description("uplink"),
                InterfaceRecord::new("Ethernet4").with_mtu(9100).with_enabled(false),
            ]
        );
    }

    #[test]
    fn test_config_diff() {
        let before = InterfaceList::new(vec![InterfaceRecord::new("Ethernet0").with_mtu(9100)])
            .unwrap();
        let after = InterfaceList::new(vec![InterfaceRecord::new("Ethernet0").with_mtu(1500)])
            .unwrap();

        let diff = config_diff(&before, &after);

        assert!(diff.starts_with("--- before\n+++ after\n"));
        assert!(diff.contains("-    \"mtu\": 9100\n"));
        assert!(diff.contains("+    \"mtu\": 1500\n"));
        assert_eq!(config_diff(&before, &before), "");
    }
}
