//! The decision core: snapshot normalization, change detection and the
//! notification policy that turns "what did we just scrape" plus "what did we
//! see last time" into suppress / notify-normal / notify-irregular.

use chrono::{DateTime, Utc};
use log::debug;
use strum_macros::Display;

use crate::model::{FlightInfo, Snapshot};

/// Canonical, order-significant form of a flight-info list, suitable for
/// equality comparison.
///
/// Each region's airports are stable-sorted by name, so airport order as it
/// appeared on the page never counts as a change. Region order is preserved
/// as-is: two lists with the same regions in a different order do NOT compare
/// equal. That asymmetry matches the observed behavior of the sources, which
/// emit regions in a fixed order.
pub fn normalize(flight_infos: &[FlightInfo]) -> String {
    let mut canonical = flight_infos.to_vec();
    for info in &mut canonical {
        info.airports.sort_by(|a, b| a.name.cmp(&b.name));
    }
    serde_json::to_string(&canonical).expect("flight infos always serialize")
}

/// Whether the freshly scraped list differs from the prior snapshot.
///
/// No prior snapshot (first run, or an unreadable state file) counts as
/// changed: there is nothing to compare against, so the caller should treat
/// the new list as news.
pub fn has_changed(prior: Option<&Snapshot>, new_flight_infos: &[FlightInfo]) -> bool {
    match prior {
        None => true,
        Some(prior) => normalize(&prior.flight_infos) != normalize(new_flight_infos),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Action {
    /// No outbound message this cycle.
    #[strum(to_string = "suppressed")]
    Suppress,
    /// "Back to normal" message, broadcast mention off.
    #[strum(to_string = "notified back-to-normal")]
    NotifyNormal,
    /// Irregularity details, broadcast mention on.
    #[strum(to_string = "notified irregularity")]
    NotifyIrregular,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub action: Action,
    pub with_mention: bool,
    /// Flight infos to render into the message. Empty for `NotifyNormal`.
    pub flight_infos: Vec<FlightInfo>,
    /// `None` means leave the prior state file untouched, preserving its
    /// `lastCheck` and content for the next comparison.
    pub state_to_persist: Option<Snapshot>,
}

/// The notification policy. Pure: each call depends only on its arguments,
/// never on earlier calls.
///
/// When no irregularity is published, a message goes out only on the first
/// clear observation after a period of irregularity, or under `force`; every
/// such cycle still persists an empty snapshot to record the check. When an
/// irregularity is published, a message goes out whenever its content changed
/// since the last persisted snapshot, or under `force`; an unchanged,
/// unforced cycle persists nothing at all.
pub fn decide(
    has_irregularity: bool,
    force: bool,
    prior: Option<&Snapshot>,
    new_flight_infos: &[FlightInfo],
    now: DateTime<Utc>,
) -> Decision {
    if !has_irregularity {
        let was_irregular = prior.is_some_and(|p| !p.is_clear());
        let action = if force || was_irregular {
            Action::NotifyNormal
        } else {
            Action::Suppress
        };
        return Decision {
            action,
            with_mention: false,
            flight_infos: Vec::new(),
            state_to_persist: Some(Snapshot::empty(now)),
        };
    }

    let changed = has_changed(prior, new_flight_infos);
    debug!("irregularity present, changed={changed}, force={force}");
    if !changed && !force {
        return Decision {
            action: Action::Suppress,
            with_mention: false,
            flight_infos: Vec::new(),
            state_to_persist: None,
        };
    }

    Decision {
        action: Action::NotifyIrregular,
        with_mention: true,
        flight_infos: new_flight_infos.to_vec(),
        state_to_persist: Some(Snapshot::new(now, new_flight_infos.to_vec())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AirportEntry;
    use chrono::TimeZone;

    fn ts(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, hour, 0, 0).unwrap()
    }

    fn kanto() -> FlightInfo {
        FlightInfo {
            region: "Kanto".into(),
            airports: vec![
                AirportEntry::new("Haneda").with_attribute("period", "Jan 15-16"),
                AirportEntry::new("Narita").with_attribute("period", "Jan 15"),
            ],
        }
    }

    fn hokkaido() -> FlightInfo {
        FlightInfo {
            region: "Hokkaido".into(),
            airports: vec![AirportEntry::new("New Chitose").with_attribute("period", "Jan 16")],
        }
    }

    fn shuffled(info: &FlightInfo) -> FlightInfo {
        let mut airports = info.airports.clone();
        airports.reverse();
        FlightInfo {
            region: info.region.clone(),
            airports,
        }
    }

    #[test]
    fn normalize_is_idempotent() {
        let infos = vec![kanto(), hokkaido()];
        let once = normalize(&infos);
        let parsed: Vec<FlightInfo> = serde_json::from_str(&once).unwrap();
        assert_eq!(normalize(&parsed), once);
    }

    #[test]
    fn normalize_ignores_airport_order_within_a_region() {
        let infos = vec![kanto()];
        let permuted = vec![shuffled(&kanto())];
        assert_eq!(normalize(&infos), normalize(&permuted));
    }

    #[test]
    fn normalize_is_sensitive_to_region_order() {
        // Pins the quirk: regions are compared in page order, only the
        // airports inside each region are order-free.
        let forward = vec![kanto(), hokkaido()];
        let backward = vec![hokkaido(), kanto()];
        assert_ne!(normalize(&forward), normalize(&backward));
    }

    #[test]
    fn no_prior_state_always_counts_as_changed() {
        assert!(has_changed(None, &[]));
        assert!(has_changed(None, &[kanto()]));
    }

    #[test]
    fn prior_state_compared_against_its_own_content_is_unchanged() {
        let snapshot = Snapshot::new(ts(3), vec![kanto(), hokkaido()]);
        assert!(!has_changed(Some(&snapshot), &snapshot.flight_infos));

        let reordered = vec![shuffled(&kanto()), hokkaido()];
        assert!(!has_changed(Some(&snapshot), &reordered));
    }

    // Decision table, row by row.

    #[test]
    fn clear_without_prior_state_suppresses_but_seeds_state() {
        let decision = decide(false, false, None, &[], ts(4));
        assert_eq!(decision.action, Action::Suppress);
        let persisted = decision.state_to_persist.expect("state must be persisted");
        assert!(persisted.is_clear());
        assert_eq!(persisted.last_check, ts(4));
    }

    #[test]
    fn clear_after_clear_suppresses() {
        let prior = Snapshot::empty(ts(3));
        let decision = decide(false, false, Some(&prior), &[], ts(4));
        assert_eq!(decision.action, Action::Suppress);
        assert!(decision.state_to_persist.unwrap().is_clear());
    }

    #[test]
    fn first_clear_after_irregularity_notifies_normal_without_mention() {
        let prior = Snapshot::new(ts(3), vec![kanto()]);
        let decision = decide(false, false, Some(&prior), &[], ts(4));
        assert_eq!(decision.action, Action::NotifyNormal);
        assert!(!decision.with_mention);
        assert!(decision.flight_infos.is_empty());
        assert!(decision.state_to_persist.unwrap().is_clear());
    }

    #[test]
    fn forced_clear_notifies_normal_even_without_prior_state() {
        let decision = decide(false, true, None, &[], ts(4));
        assert_eq!(decision.action, Action::NotifyNormal);
        assert!(!decision.with_mention);
        assert!(decision.state_to_persist.unwrap().is_clear());
    }

    #[test]
    fn unchanged_irregularity_suppresses_and_persists_nothing() {
        let prior = Snapshot::new(ts(3), vec![kanto()]);
        let reordered = vec![shuffled(&kanto())];
        let decision = decide(true, false, Some(&prior), &reordered, ts(4));
        assert_eq!(decision.action, Action::Suppress);
        assert_eq!(decision.state_to_persist, None);
    }

    #[test]
    fn changed_irregularity_notifies_with_mention_and_persists_new_snapshot() {
        let prior = Snapshot::new(ts(3), vec![kanto()]);
        let new_infos = vec![kanto(), hokkaido()];
        let decision = decide(true, false, Some(&prior), &new_infos, ts(4));
        assert_eq!(decision.action, Action::NotifyIrregular);
        assert!(decision.with_mention);
        assert_eq!(decision.flight_infos, new_infos);
        let persisted = decision.state_to_persist.unwrap();
        assert_eq!(persisted.flight_infos, new_infos);
        assert_eq!(persisted.last_check, ts(4));
    }

    #[test]
    fn force_overrides_the_unchanged_suppression() {
        let prior = Snapshot::new(ts(3), vec![kanto()]);
        let same = vec![kanto()];
        let decision = decide(true, true, Some(&prior), &same, ts(4));
        assert_eq!(decision.action, Action::NotifyIrregular);
        assert!(decision.with_mention);
        assert!(decision.state_to_persist.is_some());
    }

    #[test]
    fn irregularity_without_prior_state_notifies() {
        let decision = decide(true, false, None, &[kanto()], ts(4));
        assert_eq!(decision.action, Action::NotifyIrregular);
    }
}
