use chrono::{DateTime, Duration, Utc};
use media_prune_config::Rules;
use media_prune_models::Reason;

const SECONDS_PER_DAY: f64 = 86_400.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LowWatchRule {
    pub min_added_days: u32,
    pub max_hours: f64,
}

/// Thresholds the evaluator works against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionPolicy {
    pub watch_cutoff: Duration,
    pub never_watched_cutoff: Duration,
    /// Enabled only when both thresholds are positive
    pub low_watch: Option<LowWatchRule>,
    /// When set, nothing is flagged unless the low-watch rule fires
    pub low_watch_required: bool,
}

impl DecisionPolicy {
    pub fn from_rules(rules: &Rules) -> Self {
        let low_watch = rules.low_watch_enabled().then_some(LowWatchRule {
            min_added_days: rules.low_watch_min_added_days,
            max_hours: rules.low_watch_max_hours,
        });
        Self {
            watch_cutoff: Duration::days(i64::from(rules.inactivity_days_after_watch)),
            never_watched_cutoff: Duration::days(i64::from(rules.never_watched_days_since_added)),
            low_watch,
            low_watch_required: rules.low_watch_require,
        }
    }
}

/// Classify one entity. `None` means no action.
///
/// With known activity the entity is `watch_inactive` once the last play is
/// older than the watch cutoff; without any activity it is `never_watched`
/// once it has been in the library longer than the never-watched cutoff.
/// The low-watch rule fires when the entity is old enough and has fewer total
/// watch hours than the limit. A required low-watch rule gates everything,
/// but the base reason still wins when both fire.
pub fn evaluate(
    now: DateTime<Utc>,
    last_activity: Option<DateTime<Utc>>,
    added_at: Option<DateTime<Utc>>,
    total_watch_hours: f64,
    policy: &DecisionPolicy,
) -> Option<Reason> {
    let base = match (last_activity, added_at) {
        (Some(last), _) => (now - last >= policy.watch_cutoff).then_some(Reason::WatchInactive),
        (None, Some(added)) => {
            (now - added >= policy.never_watched_cutoff).then_some(Reason::NeverWatched)
        }
        (None, None) => None,
    };

    let low_watch = match (policy.low_watch, added_at) {
        (Some(rule), Some(added)) => {
            let added_days = (now - added).num_seconds() as f64 / SECONDS_PER_DAY;
            (added_days >= f64::from(rule.min_added_days) && total_watch_hours < rule.max_hours)
                .then_some(Reason::LowWatch)
        }
        _ => None,
    };

    if policy.low_watch_required {
        low_watch.map(|low| base.unwrap_or(low))
    } else {
        base.or(low_watch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn policy() -> DecisionPolicy {
        DecisionPolicy {
            watch_cutoff: Duration::days(30),
            never_watched_cutoff: Duration::days(180),
            low_watch: None,
            low_watch_required: false,
        }
    }

    fn low_watch_policy(required: bool) -> DecisionPolicy {
        DecisionPolicy {
            low_watch: Some(LowWatchRule { min_added_days: 30, max_hours: 2.0 }),
            low_watch_required: required,
            ..policy()
        }
    }

    #[test]
    fn test_watch_inactive() {
        let now = date(2024, 6, 1);
        let reason = evaluate(now, Some(date(2024, 1, 1)), None, 0.0, &policy());
        assert_eq!(reason, Some(Reason::WatchInactive));
    }

    #[test]
    fn test_recent_activity_is_kept() {
        let now = date(2024, 6, 1);
        let reason = evaluate(now, Some(date(2024, 5, 20)), Some(date(2020, 1, 1)), 0.0, &policy());
        assert_eq!(reason, None);
    }

    #[test]
    fn test_cutoff_is_inclusive() {
        let now = date(2024, 6, 1);
        let reason = evaluate(now, Some(now - Duration::days(30)), None, 0.0, &policy());
        assert_eq!(reason, Some(Reason::WatchInactive));
    }

    #[test]
    fn test_never_watched() {
        let now = date(2024, 6, 1);
        let reason = evaluate(now, None, Some(date(2023, 1, 1)), 0.0, &policy());
        assert_eq!(reason, Some(Reason::NeverWatched));

        assert_eq!(evaluate(now, None, Some(date(2024, 5, 1)), 0.0, &policy()), None);
        assert_eq!(evaluate(now, None, None, 0.0, &policy()), None);
    }

    #[test]
    fn test_missing_activity_switches_branch() {
        let now = date(2024, 6, 1);
        let added = Some(date(2023, 1, 1));
        let recent = Some(date(2024, 5, 25));

        assert_eq!(evaluate(now, recent, added, 0.0, &policy()), None);
        assert_eq!(evaluate(now, None, added, 0.0, &policy()), Some(Reason::NeverWatched));
    }

    #[test]
    fn test_low_watch() {
        let now = date(2024, 6, 1);
        let reason = evaluate(now, None, Some(date(2024, 5, 1)), 0.5, &low_watch_policy(false));
        assert_eq!(reason, Some(Reason::LowWatch));

        let reason = evaluate(now, None, Some(date(2024, 5, 1)), 2.0, &low_watch_policy(false));
        assert_eq!(reason, None);

        let reason = evaluate(now, None, Some(date(2024, 5, 15)), 0.5, &low_watch_policy(false));
        assert_eq!(reason, None);
    }

    #[test]
    fn test_low_watch_required_gates_base_reason() {
        let now = date(2024, 6, 1);
        let old_watch = Some(date(2024, 1, 1));
        let added = Some(date(2023, 1, 1));

        // base fires, low-watch does not: suppressed
        assert_eq!(evaluate(now, old_watch, added, 10.0, &low_watch_policy(true)), None);
        // both fire: base reason reported
        assert_eq!(
            evaluate(now, old_watch, added, 1.0, &low_watch_policy(true)),
            Some(Reason::WatchInactive)
        );
        // only low-watch fires
        let recent = Some(date(2024, 5, 30));
        assert_eq!(
            evaluate(now, recent, added, 1.0, &low_watch_policy(true)),
            Some(Reason::LowWatch)
        );
    }

    #[test]
    fn test_base_reason_wins_without_requirement() {
        let now = date(2024, 6, 1);
        let reason = evaluate(now, None, Some(date(2023, 1, 1)), 0.0, &low_watch_policy(false));
        assert_eq!(reason, Some(Reason::NeverWatched));
    }

    #[test]
    fn test_deterministic() {
        let now = date(2024, 6, 1);
        let policy = low_watch_policy(false);
        let first = evaluate(now, Some(date(2024, 2, 2)), Some(date(2023, 3, 3)), 1.5, &policy);
        for _ in 0..5 {
            assert_eq!(
                evaluate(now, Some(date(2024, 2, 2)), Some(date(2023, 3, 3)), 1.5, &policy),
                first
            );
        }
    }

    #[test]
    fn test_policy_from_rules() {
        let rules = Rules {
            activity_min_percent: 1,
            inactivity_days_after_watch: 45,
            never_watched_days_since_added: 90,
            low_watch_min_added_days: 0,
            low_watch_max_hours: 3.0,
            low_watch_require: true,
            series_ended_only: false,
        };
        let policy = DecisionPolicy::from_rules(&rules);
        assert_eq!(policy.watch_cutoff, Duration::days(45));
        assert_eq!(policy.never_watched_cutoff, Duration::days(90));
        assert!(policy.low_watch.is_none());
        assert!(policy.low_watch_required);
    }
}
