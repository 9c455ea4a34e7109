//! Field-level comparison of desired and observed interface records.
//!
//! Only attributes legal for an interface's kind take part in any
//! comparison. Advertised speeds are compared as sets.

use tracing::{debug, instrument};

use crate::defaults::DefaultsResolver;
use crate::ethernet::{FecMode, Speed};
use crate::types::{Attribute, InterfaceList, InterfaceRecord};

/// Whether `record` sets `attr` to a value other than the one in `observed`.
///
/// An absent observed record differs from every set attribute.
pub fn attribute_differs(
    attr: Attribute,
    record: &InterfaceRecord,
    observed: Option<&InterfaceRecord>,
) -> bool {
    let Some(have) = observed else {
        return attr.is_set(record);
    };

    match attr {
        Attribute::Description => differs(&record.description, &have.description),
        Attribute::Enabled => differs(&record.enabled, &have.enabled),
        Attribute::Mtu => differs(&record.mtu, &have.mtu),
        Attribute::Fec => differs(&record.fec, &have.fec),
        Attribute::Speed => differs(&record.speed, &have.speed),
        Attribute::AutoNegotiate => differs(&record.auto_negotiate, &have.auto_negotiate),
        Attribute::AdvertisedSpeed => differs(&record.advertised_speed, &have.advertised_speed),
    }
}

fn differs<T: PartialEq>(want: &Option<T>, have: &Option<T>) -> bool {
    match want {
        Some(value) => have.as_ref() != Some(value),
        None => false,
    }
}

/// Kind-legal attributes that `record` sets differently from `observed`.
pub fn changed_attributes(
    record: &InterfaceRecord,
    observed: Option<&InterfaceRecord>,
) -> Vec<Attribute> {
    let kind = record.kind();
    Attribute::ALL
        .into_iter()
        .filter(|attr| attr.applies_to(kind))
        .filter(|attr| attribute_differs(*attr, record, observed))
        .collect()
}

/// True when `record` has no observed counterpart, or differs from it in
/// at least one kind-legal attribute.
pub fn is_change_required(record: &InterfaceRecord, observed: &InterfaceList) -> bool {
    match observed.get(&record.name) {
        None => true,
        Some(have) => !changed_attributes(record, Some(have)).is_empty(),
    }
}

/// Desired records that require a change, in desired order.
#[instrument(skip_all, fields(desired = desired.len(), observed = observed.len()))]
pub fn diff(desired: &InterfaceList, observed: &InterfaceList) -> Vec<InterfaceRecord> {
    desired
        .iter()
        .filter(|record| {
            let required = is_change_required(record, observed);
            if !required {
                debug!(interface = %record.name, "No change required");
            }
            required
        })
        .cloned()
        .collect()
}

/// Like [`is_change_required`], but a desired `SPEED_DEFAULT` matches the
/// observed speed when that speed is the port's resolved default.
///
/// The default is only queried when speed is the last attribute in doubt.
pub async fn is_change_required_with_defaults(
    record: &InterfaceRecord,
    observed: &InterfaceList,
    resolver: &DefaultsResolver<'_>,
) -> bool {
    let Some(have) = observed.get(&record.name) else {
        return true;
    };
    let changed = changed_attributes(record, Some(have));
    if record.speed != Some(Speed::Default) || !changed.contains(&Attribute::Speed) {
        return !changed.is_empty();
    }
    if changed.iter().any(|attr| *attr != Attribute::Speed) {
        return true;
    }

    let resolved = resolver.resolve_default_speed(record.name.as_str()).await;
    have.speed != Some(resolved)
}

/// Desired records that require a change, in desired order, with
/// `SPEED_DEFAULT` compared against the resolved default.
#[instrument(skip_all, fields(desired = desired.len(), observed = observed.len()))]
pub async fn diff_with_defaults(
    desired: &InterfaceList,
    observed: &InterfaceList,
    resolver: &DefaultsResolver<'_>,
) -> Vec<InterfaceRecord> {
    let mut changed = Vec::new();
    for record in desired {
        if is_change_required_with_defaults(record, observed, resolver).await {
            changed.push(record.clone());
        } else {
            debug!(interface = %record.name, "No change required");
        }
    }
    changed
}

/// Whether `record`'s value for `attr` is absent or equal to its kind default.
///
/// Speed has no static default: a present speed is never at its static
/// default, and callers compare it against the resolved default instead.
pub fn is_static_default(attr: Attribute, record: &InterfaceRecord) -> bool {
    let defaults = record.kind().defaults();
    match attr {
        Attribute::Description => record
            .description
            .as_deref()
            .map_or(true, |d| d == defaults.description),
        Attribute::Enabled => record.enabled.map_or(true, |e| e == defaults.enabled),
        Attribute::Mtu => record.mtu.map_or(true, |m| m == defaults.mtu),
        Attribute::Fec => record.fec.map_or(true, |f| f == FecMode::Disabled),
        Attribute::Speed => record.speed.is_none(),
        Attribute::AutoNegotiate => record.auto_negotiate.map_or(true, |a| !a),
        Attribute::AdvertisedSpeed => record
            .advertised_speed
            .as_ref()
            .map_or(true, |s| s.is_empty()),
    }
}

/// True when every kind-legal attribute of `observed` is at its default.
///
/// Loopbacks are never at defaults. The speed default is only queried when
/// every other attribute already is.
pub async fn is_at_defaults(observed: &InterfaceRecord, resolver: &DefaultsResolver<'_>) -> bool {
    let kind = observed.kind();
    if kind.is_loopback() {
        return false;
    }

    let static_ok = Attribute::ALL
        .into_iter()
        .filter(|attr| *attr != Attribute::Speed && attr.applies_to(kind))
        .all(|attr| is_static_default(attr, observed));
    if !static_ok {
        return false;
    }

    match observed.speed {
        Some(speed) if Attribute::Speed.applies_to(kind) => {
            speed == resolver.resolve_default_speed(observed.name.as_str()).await
        }
        _ => true,
    }
}

/// True when `record` is observed and is either a loopback or not at
/// defaults.
pub async fn is_this_delete_required(
    record: &InterfaceRecord,
    observed: &InterfaceList,
    resolver: &DefaultsResolver<'_>,
) -> bool {
    match observed.get(&record.name) {
        None => false,
        Some(have) => have.kind().is_loopback() || !is_at_defaults(have, resolver).await,
    }
}
