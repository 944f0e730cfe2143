use std::collections::HashMap;
use media_prune_config::{add_unique_int, add_unique_string, Exceptions};
use media_prune_models::{CatalogEntity, MediaKind};
use tracing::debug;

/// Catalog lookup by local id, external id and lowercased IMDB id
struct CatalogLookup<'a> {
    by_local: HashMap<i64, &'a CatalogEntity>,
    by_external: HashMap<u32, &'a CatalogEntity>,
    by_imdb: HashMap<String, &'a CatalogEntity>,
}

impl<'a> CatalogLookup<'a> {
    fn new(entities: &'a [CatalogEntity]) -> Self {
        let mut lookup = Self {
            by_local: HashMap::new(),
            by_external: HashMap::new(),
            by_imdb: HashMap::new(),
        };
        for entity in entities {
            lookup.by_local.insert(entity.local_id, entity);
            if let Some(id) = entity.external_id.filter(|id| *id > 0) {
                lookup.by_external.insert(id, entity);
            }
            if let Some(imdb) = entity.imdb_id.as_deref().filter(|id| !id.is_empty()) {
                lookup.by_imdb.insert(imdb.to_lowercase(), entity);
            }
        }
        lookup
    }

    /// Entities referenced by the given id lists, in list order
    fn matches(&self, local_ids: &[i64], external_ids: &[u32], imdb_ids: &[String]) -> Vec<&'a CatalogEntity> {
        let by_local = local_ids.iter().filter_map(|id| self.by_local.get(id));
        let by_external = external_ids.iter().filter_map(|id| self.by_external.get(id));
        let by_imdb = imdb_ids
            .iter()
            .filter_map(|id| self.by_imdb.get(&id.to_lowercase()));
        by_local.chain(by_external).chain(by_imdb).copied().collect()
    }
}

/// Lists that enrichment appends to for one media kind
struct ExceptionLists<'a> {
    titles: &'a mut Vec<String>,
    path_prefixes: &'a mut Vec<String>,
    imdb_ids: &'a mut Vec<String>,
    external_ids: &'a mut Vec<u32>,
}

impl ExceptionLists<'_> {
    fn absorb(&mut self, entity: &CatalogEntity) -> bool {
        let mut changed = add_unique_string(self.titles, &entity.title);
        changed |= add_unique_string(self.path_prefixes, &entity.path);
        changed |= add_unique_string(self.imdb_ids, entity.imdb_id.as_deref().unwrap_or(""));
        changed |= add_unique_int(self.external_ids, entity.external_id.unwrap_or(0));
        changed
    }
}

/// Append the title, path, IMDB id and external id of every catalog entity
/// an exception already names by id.
///
/// Returns one line per entity that gained anything, e.g. `movie: Heat`.
pub fn enrich_exceptions(
    exceptions: &mut Exceptions,
    movies: &[CatalogEntity],
    series: &[CatalogEntity],
) -> Vec<String> {
    let mut changes = Vec::new();

    let movie_matches = CatalogLookup::new(movies).matches(
        &exceptions.movies.radarr_ids,
        &exceptions.movies.tmdb_ids,
        &exceptions.movies.imdb_ids,
    );
    let mut lists = ExceptionLists {
        titles: &mut exceptions.movies.titles,
        path_prefixes: &mut exceptions.movies.path_prefixes,
        imdb_ids: &mut exceptions.movies.imdb_ids,
        external_ids: &mut exceptions.movies.tmdb_ids,
    };
    apply(&mut lists, MediaKind::Movie, &movie_matches, &mut changes);

    let series_matches = CatalogLookup::new(series).matches(
        &exceptions.series.sonarr_ids,
        &exceptions.series.tvdb_ids,
        &exceptions.series.imdb_ids,
    );
    let mut lists = ExceptionLists {
        titles: &mut exceptions.series.titles,
        path_prefixes: &mut exceptions.series.path_prefixes,
        imdb_ids: &mut exceptions.series.imdb_ids,
        external_ids: &mut exceptions.series.tvdb_ids,
    };
    apply(&mut lists, MediaKind::Series, &series_matches, &mut changes);

    changes
}

fn apply(
    lists: &mut ExceptionLists<'_>,
    kind: MediaKind,
    matches: &[&CatalogEntity],
    changes: &mut Vec<String>,
) {
    for entity in matches {
        if lists.absorb(entity) {
            debug!(title = %entity.title, kind = %kind, "Enriched exception");
            changes.push(format!("{}: {}", kind, entity.title));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> (Vec<CatalogEntity>, Vec<CatalogEntity>) {
        let movies = vec![
            CatalogEntity::movie(4, "Heat", Some(1995))
                .with_external_id(949)
                .with_imdb_id("tt0113277")
                .with_path("/movies/Heat (1995)"),
            CatalogEntity::movie(5, "Ronin", Some(1998))
                .with_external_id(8195)
                .with_path("/movies/Ronin (1998)"),
        ];
        let series = vec![CatalogEntity::series(6, "Lost")
            .with_external_id(73739)
            .with_path("/tv/Lost")];
        (movies, series)
    }

    #[test]
    fn test_enrich_from_each_id_kind() {
        let (movies, series) = catalog();
        let mut exceptions = Exceptions::default();
        exceptions.movies.radarr_ids = vec![4];
        exceptions.movies.tmdb_ids = vec![8195];
        exceptions.series.sonarr_ids = vec![6];

        let changes = enrich_exceptions(&mut exceptions, &movies, &series);
        assert_eq!(changes, vec!["movie: Heat", "movie: Ronin", "series: Lost"]);

        assert_eq!(exceptions.movies.titles, vec!["Heat", "Ronin"]);
        assert_eq!(
            exceptions.movies.path_prefixes,
            vec!["/movies/Heat (1995)", "/movies/Ronin (1998)"]
        );
        assert_eq!(exceptions.movies.imdb_ids, vec!["tt0113277"]);
        assert_eq!(exceptions.movies.tmdb_ids, vec![8195, 949]);
        assert_eq!(exceptions.series.tvdb_ids, vec![73739]);
        assert_eq!(exceptions.series.titles, vec!["Lost"]);
    }

    #[test]
    fn test_enrich_by_imdb_is_case_insensitive() {
        let (movies, series) = catalog();
        let mut exceptions = Exceptions::default();
        exceptions.movies.imdb_ids = vec!["TT0113277".to_string()];

        let changes = enrich_exceptions(&mut exceptions, &movies, &series);
        assert_eq!(changes, vec!["movie: Heat"]);
        // the stored id differs in case, so the catalog form is appended
        assert_eq!(exceptions.movies.imdb_ids, vec!["TT0113277", "tt0113277"]);
        assert_eq!(exceptions.movies.tmdb_ids, vec![949]);
    }

    #[test]
    fn test_second_run_is_a_no_op() {
        let (movies, series) = catalog();
        let mut exceptions = Exceptions::default();
        exceptions.movies.radarr_ids = vec![4, 5];
        exceptions.series.tvdb_ids = vec![73739, 1];

        assert_eq!(enrich_exceptions(&mut exceptions, &movies, &series).len(), 3);
        let snapshot = exceptions.clone();
        assert!(enrich_exceptions(&mut exceptions, &movies, &series).is_empty());
        assert_eq!(exceptions, snapshot);
    }

    #[test]
    fn test_unknown_ids_change_nothing() {
        let (movies, series) = catalog();
        let mut exceptions = Exceptions::default();
        exceptions.movies.radarr_ids = vec![99];
        exceptions.series.sonarr_ids = vec![98];

        assert!(enrich_exceptions(&mut exceptions, &movies, &series).is_empty());
        assert!(exceptions.movies.titles.is_empty());
    }
}
