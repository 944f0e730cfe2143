use std::collections::HashSet;
use media_prune_config::Exceptions;
use media_prune_models::{CatalogEntity, MediaKind};
use crate::normalize::normalize_title;

/// Keep-rules for one media kind
#[derive(Debug, Clone, Default)]
pub struct ExceptionSet {
    local_ids: HashSet<i64>,
    external_ids: HashSet<u32>,
    imdb_ids: HashSet<String>,
    titles: HashSet<String>,
    path_prefixes: Vec<String>,
}

impl ExceptionSet {
    fn build(
        local_ids: &[i64],
        external_ids: &[u32],
        imdb_ids: &[String],
        titles: &[String],
        path_prefixes: &[String],
    ) -> Self {
        Self {
            local_ids: local_ids.iter().copied().collect(),
            external_ids: external_ids.iter().copied().collect(),
            imdb_ids: imdb_ids.iter().map(|id| id.to_lowercase()).collect(),
            titles: titles
                .iter()
                .map(|title| normalize_title(title))
                .filter(|key| !key.is_empty())
                .collect(),
            path_prefixes: path_prefixes
                .iter()
                .filter(|prefix| !prefix.is_empty())
                .map(|prefix| clean_path(prefix))
                .collect(),
        }
    }

    /// Checks run local id, external id, IMDB id, title, path; the first hit wins.
    pub fn matches(
        &self,
        local_id: i64,
        external_id: Option<u32>,
        imdb_id: Option<&str>,
        title: &str,
        path: &str,
    ) -> bool {
        if local_id > 0 && self.local_ids.contains(&local_id) {
            return true;
        }
        if let Some(id) = external_id.filter(|id| *id > 0) {
            if self.external_ids.contains(&id) {
                return true;
            }
        }
        if let Some(id) = imdb_id.filter(|id| !id.is_empty()) {
            if self.imdb_ids.contains(&id.to_lowercase()) {
                return true;
            }
        }
        if !title.is_empty() && self.titles.contains(&normalize_title(title)) {
            return true;
        }
        self.matches_path(path)
    }

    fn matches_path(&self, path: &str) -> bool {
        if path.is_empty() || self.path_prefixes.is_empty() {
            return false;
        }
        let cleaned = clean_path(path);
        self.path_prefixes
            .iter()
            .any(|prefix| cleaned.starts_with(prefix.as_str()))
    }
}

/// Exception sets for movies and series, built once per run from config.
#[derive(Debug, Clone, Default)]
pub struct ExceptionIndex {
    movies: ExceptionSet,
    series: ExceptionSet,
}

impl ExceptionIndex {
    pub fn new(exceptions: &Exceptions) -> Self {
        let movies = &exceptions.movies;
        let series = &exceptions.series;
        Self {
            movies: ExceptionSet::build(
                &movies.radarr_ids,
                &movies.tmdb_ids,
                &movies.imdb_ids,
                &movies.titles,
                &movies.path_prefixes,
            ),
            series: ExceptionSet::build(
                &series.sonarr_ids,
                &series.tvdb_ids,
                &series.imdb_ids,
                &series.titles,
                &series.path_prefixes,
            ),
        }
    }

    pub fn set(&self, kind: MediaKind) -> &ExceptionSet {
        match kind {
            MediaKind::Movie => &self.movies,
            MediaKind::Series => &self.series,
        }
    }

    pub fn is_excluded(
        &self,
        kind: MediaKind,
        local_id: i64,
        external_id: Option<u32>,
        imdb_id: Option<&str>,
        title: &str,
        path: &str,
    ) -> bool {
        self.set(kind).matches(local_id, external_id, imdb_id, title, path)
    }

    pub fn is_entity_excluded(&self, entity: &CatalogEntity) -> bool {
        self.is_excluded(
            entity.kind,
            entity.local_id,
            entity.external_id,
            entity.imdb_id.as_deref(),
            &entity.title,
            &entity.path,
        )
    }
}

/// Lexical path cleanup: repeated separators collapse, `.` segments drop,
/// `..` pops the previous segment and a trailing separator is removed.
/// Nothing touches the filesystem.
pub fn clean_path(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }
    let rooted = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(last) if *last != ".." => {
                    segments.pop();
                }
                _ if rooted => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{}", joined),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use media_prune_config::{MovieExceptions, SeriesExceptions};

    fn index() -> ExceptionIndex {
        ExceptionIndex::new(&Exceptions {
            movies: MovieExceptions {
                radarr_ids: vec![7],
                tmdb_ids: vec![603],
                imdb_ids: vec!["TT0113277".to_string()],
                titles: vec!["The Matrix: Reloaded".to_string()],
                path_prefixes: vec!["/data/movies/keep/".to_string()],
            },
            series: SeriesExceptions {
                sonarr_ids: vec![3],
                tvdb_ids: vec![81189],
                ..SeriesExceptions::default()
            },
        })
    }

    #[test]
    fn test_each_check_excludes_on_its_own() {
        let index = index();
        let movie = MediaKind::Movie;

        assert!(index.is_excluded(movie, 7, None, None, "", ""));
        assert!(index.is_excluded(movie, 99, Some(603), None, "", ""));
        assert!(index.is_excluded(movie, 99, None, Some("tt0113277"), "", ""));
        assert!(index.is_excluded(movie, 99, None, None, "the matrix reloaded", ""));
        assert!(index.is_excluded(movie, 99, None, None, "", "/data/movies/keep/Heat (1995)"));

        assert!(!index.is_excluded(movie, 99, Some(604), Some("tt1"), "Heat", "/data/movies/Heat"));
    }

    #[test]
    fn test_match_ignores_other_fields() {
        let index = index();
        assert!(index.is_excluded(
            MediaKind::Movie,
            7,
            Some(1),
            Some("tt999"),
            "Something Else",
            "/elsewhere"
        ));
    }

    #[test]
    fn test_kinds_do_not_share_rules() {
        let index = index();
        assert!(!index.is_excluded(MediaKind::Series, 7, None, None, "", ""));
        assert!(index.is_excluded(MediaKind::Series, 3, None, None, "", ""));
        assert!(index.is_excluded(MediaKind::Series, 0, Some(81189), None, "", ""));
        assert!(!index.is_excluded(MediaKind::Movie, 0, Some(81189), None, "", ""));
    }

    #[test]
    fn test_zero_ids_never_match() {
        let index = ExceptionIndex::new(&Exceptions {
            movies: MovieExceptions {
                radarr_ids: vec![0],
                tmdb_ids: vec![0],
                ..MovieExceptions::default()
            },
            ..Exceptions::default()
        });
        assert!(!index.is_excluded(MediaKind::Movie, 0, Some(0), None, "", ""));
    }

    #[test]
    fn test_entity_excluded_by_path() {
        let index = index();
        let entity = CatalogEntity::movie(50, "Heat", Some(1995))
            .with_path("/data//movies/./keep/Heat (1995)/")
            .with_size(10);
        assert!(index.is_entity_excluded(&entity));

        let entity = entity.with_path("/data/movies/Heat (1995)");
        assert!(!index.is_entity_excluded(&entity));

        // plain string prefix, not a segment match
        let entity = entity.with_path("/data/movies/keeper/Heat");
        assert!(index.is_entity_excluded(&entity));
    }

    #[test]
    fn test_clean_path() {
        assert_eq!(clean_path(""), ".");
        assert_eq!(clean_path("/"), "/");
        assert_eq!(clean_path("/data//movies/"), "/data/movies");
        assert_eq!(clean_path("/data/./movies/../tv"), "/data/tv");
        assert_eq!(clean_path("/../data"), "/data");
        assert_eq!(clean_path("a/../../b"), "../b");
        assert_eq!(clean_path("./"), ".");
    }
}
