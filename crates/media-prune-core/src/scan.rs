use chrono::{DateTime, Utc};
use media_prune_config::Config;
use media_prune_models::{
    CatalogEntity, HistoryEvent, HistoryMediaKind, MediaKind, RawHistoryEntry, Reason, Report,
    ReportItem, UserWatch,
};
use tracing::{debug, info};

use crate::activity::ActivityIndex;
use crate::error::Result;
use crate::evaluate::{evaluate, DecisionPolicy};
use crate::exceptions::ExceptionIndex;
use crate::history::{extract_ids, parse_history_entry};
use crate::keyed::EntityKey;
use crate::normalize::{normalize_title, normalize_title_with_year};
use crate::ranking::{sort_report, SortKey, SortOrder};
use crate::watch::{UserSeconds, WatchIndex};

pub const DEFAULT_TOP_USERS: usize = 2;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Everything fetched from the collaborators for one run
#[derive(Debug, Clone, Default)]
pub struct ScanInput {
    pub movies: Vec<CatalogEntity>,
    pub series: Vec<CatalogEntity>,
    pub history: Vec<RawHistoryEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    pub sort_key: SortKey,
    pub sort_order: SortOrder,
    pub top_users: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            sort_key: SortKey::default(),
            sort_order: SortOrder::default(),
            top_users: DEFAULT_TOP_USERS,
        }
    }
}

impl ScanOptions {
    /// Parse user-supplied sort settings; unknown values are errors.
    pub fn parse(sort_by: &str, sort_order: &str, top_users: usize) -> Result<Self> {
        Ok(Self {
            sort_key: sort_by.parse()?,
            sort_order: sort_order.parse()?,
            top_users,
        })
    }
}

/// Fold history into activity and watch indexes.
///
/// Unparseable records are skipped. Events with a known completion below
/// `min_percent` are dropped from both indexes; an unknown (zero) percent is
/// always kept.
pub fn build_indexes(history: &[RawHistoryEntry], min_percent: u32) -> (ActivityIndex, WatchIndex) {
    let mut activity = ActivityIndex::new();
    let mut watch = WatchIndex::new();
    let mut skipped = 0usize;

    for raw in history {
        let Some(event) = parse_history_entry(raw) else {
            skipped += 1;
            continue;
        };
        if event.percent_complete > 0 && event.percent_complete < min_percent {
            continue;
        }
        let Some((kind, key)) = history_key(&event) else {
            continue;
        };
        activity.record(kind, &key, event.watched_at);
        watch.record(kind, &key, &event.user, event.watch_seconds);
    }

    if skipped > 0 {
        debug!(count = skipped, "Skipped history records without a timestamp");
    }
    (activity, watch)
}

/// Resolve which catalog kind and key a history event credits.
///
/// Episodes credit their series: the TVDB id comes from the grandparent,
/// parent or own GUID (first found), the IMDB id from the grandparent or own
/// GUID, and the title from the grandparent title.
fn history_key(event: &HistoryEvent) -> Option<(MediaKind, EntityKey)> {
    match event.media_kind {
        HistoryMediaKind::Movie => {
            let ids = extract_ids(&event.guid);
            let title_key = normalize_title_with_year(&event.title, event.year);
            Some((
                MediaKind::Movie,
                EntityKey::new(ids.tmdb_id, ids.imdb_id.as_deref(), &title_key),
            ))
        }
        HistoryMediaKind::Episode => {
            let own = extract_ids(&event.guid);
            let parent = extract_ids(&event.parent_guid);
            let grandparent = extract_ids(&event.grandparent_guid);
            let tvdb_id = grandparent.tvdb_id.or(parent.tvdb_id).or(own.tvdb_id);
            let imdb_id = grandparent.imdb_id.or(own.imdb_id);
            let title_key = normalize_title(&event.grandparent_title);
            Some((
                MediaKind::Series,
                EntityKey::new(tvdb_id, imdb_id.as_deref(), &title_key),
            ))
        }
        HistoryMediaKind::Show => {
            let ids = extract_ids(&event.guid);
            let title_key = normalize_title(&event.title);
            Some((
                MediaKind::Series,
                EntityKey::new(ids.tvdb_id, ids.imdb_id.as_deref(), &title_key),
            ))
        }
        HistoryMediaKind::Other(_) => None,
    }
}

/// Catalog-side lookup key: movies carry their year in the title key.
pub fn entity_key(entity: &CatalogEntity) -> EntityKey {
    let title_key = match entity.kind {
        MediaKind::Movie => normalize_title_with_year(&entity.title, entity.year),
        MediaKind::Series => normalize_title(&entity.title),
    };
    EntityKey::new(entity.external_id, entity.imdb_id.as_deref(), &title_key)
}

fn is_ended(status: Option<&str>) -> bool {
    status
        .map(|s| s.trim().eq_ignore_ascii_case("ended"))
        .unwrap_or(false)
}

struct Evaluator<'a> {
    activity: &'a ActivityIndex,
    watch: &'a WatchIndex,
    exceptions: &'a ExceptionIndex,
    policy: DecisionPolicy,
    top_users: usize,
    now: DateTime<Utc>,
}

impl Evaluator<'_> {
    fn evaluate(&self, entity: &CatalogEntity) -> Option<ReportItem> {
        if self.exceptions.is_entity_excluded(entity) {
            debug!(title = %entity.title, kind = %entity.kind, "Skipping due to exception");
            return None;
        }

        let key = entity_key(entity);
        let window = self.activity.window(entity.kind, &key);
        let total_watch_hours = self.watch.total_seconds(entity.kind, &key) as f64 / SECONDS_PER_HOUR;
        let last_activity = window.map(|w| w.last);

        let reason = evaluate(
            self.now,
            last_activity,
            entity.added_at,
            total_watch_hours,
            &self.policy,
        )?;

        let top = self.watch.top_users(entity.kind, &key, self.top_users);
        Some(report_item(
            entity,
            window.map(|w| w.first),
            last_activity,
            &top,
            total_watch_hours,
            reason,
        ))
    }
}

fn report_item(
    entity: &CatalogEntity,
    first_activity_at: Option<DateTime<Utc>>,
    last_activity_at: Option<DateTime<Utc>>,
    top: &[UserSeconds],
    total_watch_hours: f64,
    reason: Reason,
) -> ReportItem {
    let top_users: Vec<UserWatch> = top
        .iter()
        .map(|u| UserWatch {
            user: u.user.clone(),
            hours: u.seconds as f64 / SECONDS_PER_HOUR,
        })
        .collect();
    let top_users_total_hours: f64 = top_users.iter().map(|u| u.hours).sum();
    let (local, external) = (Some(entity.local_id), entity.external_id.filter(|id| *id > 0));
    let is_movie = entity.kind == MediaKind::Movie;

    ReportItem {
        kind: entity.kind,
        title: entity.display_title(),
        radarr_id: local.filter(|_| is_movie),
        sonarr_id: local.filter(|_| !is_movie),
        tmdb_id: external.filter(|_| is_movie),
        tvdb_id: external.filter(|_| !is_movie),
        imdb_id: entity.imdb_id.clone().filter(|id| !id.is_empty()),
        path: entity.path.clone(),
        size_bytes: entity.size_bytes,
        added_at: entity.added_at,
        first_activity_at,
        last_activity_at,
        top_users,
        top_users_total_hours,
        total_watch_hours,
        series_status: entity.status.clone().filter(|_| !is_movie),
        reason,
    }
}

/// Produce the review report for one run.
///
/// Pure: the same inputs and `now` always give the same report. `now` is
/// both the evaluation time and the report's `generated_at`.
pub fn run(input: &ScanInput, config: &Config, options: &ScanOptions, now: DateTime<Utc>) -> Report {
    let rules = &config.rules;
    let (activity, watch) = build_indexes(&input.history, rules.activity_min_percent);
    let exceptions = ExceptionIndex::new(&config.exceptions);
    let evaluator = Evaluator {
        activity: &activity,
        watch: &watch,
        exceptions: &exceptions,
        policy: DecisionPolicy::from_rules(rules),
        top_users: options.top_users,
        now,
    };

    let mut report = Report::new(now);

    for movie in input.movies.iter().filter(|m| m.is_eligible()) {
        if let Some(item) = evaluator.evaluate(movie) {
            report.items.push(item);
        }
    }
    info!(count = report.items.len(), "Movies flagged for review");

    for show in input.series.iter().filter(|s| s.is_eligible()) {
        if rules.series_ended_only && !is_ended(show.status.as_deref()) {
            debug!(
                title = %show.title,
                status = show.status.as_deref().unwrap_or(""),
                "Skipping series because status is not ended"
            );
            continue;
        }
        if let Some(item) = evaluator.evaluate(show) {
            report.items.push(item);
        }
    }
    info!(count = report.items.len(), "Total items flagged for review");

    sort_report(&mut report, options.sort_key, options.sort_order);
    report
}

#[cfg(test)]
mod tests;
