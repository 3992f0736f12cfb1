//! One-shot startup seeding of the sample catalog. Skipped whenever the
//! table already holds data, so restarts never duplicate rows.

use sea_orm::DbErr;

use crate::{
    models::{EntryKind, NewEntry},
    store::EntryStore,
};

fn entry(
    title: &str,
    kind: EntryKind,
    director: &str,
    budget: i64,
    location: &str,
    duration: &str,
    year: i32,
) -> NewEntry {
    NewEntry {
        title: title.to_string(),
        kind,
        director: director.to_string(),
        budget,
        location: location.to_string(),
        duration: duration.to_string(),
        year,
    }
}

pub fn sample_entries() -> Vec<NewEntry> {
    use EntryKind::{Movie, TvShow};
    vec![
        entry("The Dark Knight", Movie, "Christopher Nolan", 185_000_000, "Chicago, Illinois", "152 minutes", 2008),
        entry("Inception", Movie, "Christopher Nolan", 160_000_000, "Los Angeles, California", "148 minutes", 2010),
        entry("Interstellar", Movie, "Christopher Nolan", 165_000_000, "Alberta, Canada", "169 minutes", 2014),
        entry("The Matrix", Movie, "The Wachowskis", 63_000_000, "Sydney, Australia", "136 minutes", 1999),
        entry("Pulp Fiction", Movie, "Quentin Tarantino", 8_000_000, "Los Angeles, California", "154 minutes", 1994),
        entry("The Godfather", Movie, "Francis Ford Coppola", 6_000_000, "New York, New York", "175 minutes", 1972),
        entry("Avatar", Movie, "James Cameron", 237_000_000, "Los Angeles, California", "162 minutes", 2009),
        entry("Titanic", Movie, "James Cameron", 200_000_000, "Rosarito, Mexico", "194 minutes", 1997),
        entry("Breaking Bad", TvShow, "Vince Gilligan", 3_000_000, "Albuquerque, New Mexico", "5 seasons", 2008),
        entry("Game of Thrones", TvShow, "David Benioff & D.B. Weiss", 15_000_000, "Northern Ireland", "8 seasons", 2011),
        entry("The Office", TvShow, "Greg Daniels", 2_000_000, "Los Angeles, California", "9 seasons", 2005),
        entry("Stranger Things", TvShow, "The Duffer Brothers", 8_000_000, "Atlanta, Georgia", "4 seasons", 2016),
        entry("The Sopranos", TvShow, "David Chase", 4_000_000, "New Jersey, New York", "6 seasons", 1999),
        entry("The Wire", TvShow, "David Simon", 2_500_000, "Baltimore, Maryland", "5 seasons", 2002),
        entry("Friends", TvShow, "Marta Kauffman & David Crane", 1_000_000, "Los Angeles, California", "10 seasons", 1994),
        entry("The Crown", TvShow, "Peter Morgan", 13_000_000, "London, England", "6 seasons", 2016),
    ]
}

/// Returns the number of entries inserted (zero when seeding was skipped).
pub async fn auto_seed(store: &EntryStore) -> Result<u64, DbErr> {
    let existing = store.count_all().await?;
    if existing > 0 {
        tracing::info!(existing, "database already populated, skipping seed");
        return Ok(0);
    }

    let entries = sample_entries();
    let movies = entries.iter().filter(|e| e.kind == EntryKind::Movie).count();
    let tv_shows = entries.len() - movies;
    let inserted = store.insert_many(entries).await?;
    tracing::info!(inserted, movies, tv_shows, "seeded sample catalog");
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_catalog_is_balanced_and_unique() {
        let entries = sample_entries();
        assert_eq!(entries.len(), 16);
        assert_eq!(entries.iter().filter(|e| e.kind == EntryKind::Movie).count(), 8);

        let mut pairs: Vec<_> = entries.iter().map(|e| (e.title.as_str(), e.year)).collect();
        pairs.sort();
        pairs.dedup();
        assert_eq!(pairs.len(), 16, "seed entries must not collide on (title, year)");
    }
}
