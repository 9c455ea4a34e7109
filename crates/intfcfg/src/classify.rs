//! Removal versus reset classification.
//!
//! Loopbacks are removed outright. Every other interface must keep
//! existing and is reset to its defaults instead.

use crate::types::{Command, InterfaceRecord, State};

/// Splits deletion candidates into `(to_remove, to_reset)`.
pub fn classify_for_deletion(
    commands: Vec<InterfaceRecord>,
) -> (Vec<InterfaceRecord>, Vec<InterfaceRecord>) {
    commands
        .into_iter()
        .partition(|record| record.kind().is_loopback())
}

/// Outcome tag of a built deletion: removals are `deleted`, resets carry
/// the mode's own tag.
pub fn delete_outcome(record: &InterfaceRecord, tag: State) -> State {
    if record.kind().is_loopback() {
        State::Deleted
    } else {
        tag
    }
}

/// Tags a built deletion set, keeping its order.
pub fn classify_delete_outcome(commands: Vec<InterfaceRecord>, tag: State) -> Vec<Command> {
    commands
        .into_iter()
        .map(|record| {
            let state = delete_outcome(&record, tag);
            Command::new(record, state)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_for_deletion() {
        let (remove, reset) = classify_for_deletion(vec![
            InterfaceRecord::new("Ethernet0"),
            InterfaceRecord::new("Loopback1"),
            InterfaceRecord::new("PortChannel2"),
        ]);

        assert_eq!(remove.len(), 1);
        assert_eq!(remove[0].name, "Loopback1");
        assert_eq!(reset.len(), 2);
        assert_eq!(reset[1].name, "PortChannel2");
    }

    #[test]
    fn test_classify_delete_outcome() {
        let tagged = classify_delete_outcome(
            vec![
                InterfaceRecord::new("Ethernet0"),
                InterfaceRecord::new("Loopback1"),
            ],
            State::Overridden,
        );

        assert_eq!(tagged[0].state, State::Overridden);
        assert_eq!(tagged[1].state, State::Deleted);
    }
}
