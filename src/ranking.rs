use std::cmp::Reverse;

use tracing::debug;

use crate::{
    error::AppResult,
    store::{Movie, MovieStore},
};

/// Pairs each movie id with `len - position`. The input must already be in
/// ascending rating order, so the best-rated movie is ranked 1 and the
/// worst-rated one is ranked `len`.
pub fn assign_rankings(movies: &[Movie]) -> Vec<(i32, i32)> {
    let total = movies.len() as i32;
    movies.iter().enumerate().map(|(i, m)| (m.id, total - i as i32)).collect()
}

/// Recomputes and persists every ranking, then returns the movies ordered for
/// display: descending by ranking, counting down to number 1.
pub async fn recompute_rankings(store: &MovieStore, mut movies: Vec<Movie>) -> AppResult<Vec<Movie>> {
    let rankings = assign_rankings(&movies);
    store.apply_rankings(&rankings).await?;

    for (movie, (_, ranking)) in movies.iter_mut().zip(&rankings) {
        movie.ranking = Some(*ranking);
    }
    movies.sort_by_key(|m| Reverse(m.ranking));

    debug!(movies = movies.len(), "recomputed rankings");
    Ok(movies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::{memory_store, new_movie};

    fn movie(id: i32, rating: Option<f64>) -> Movie {
        Movie {
            id,
            title: format!("m{id}"),
            year: 2000,
            description: format!("d{id}"),
            rating,
            ranking: None,
            review: None,
            img_url: format!("i{id}"),
        }
    }

    #[test]
    fn rankings_count_down_from_len() {
        let movies = [movie(7, Some(1.0)), movie(3, Some(5.0)), movie(9, Some(8.0))];
        assert_eq!(assign_rankings(&movies), vec![(7, 3), (3, 2), (9, 1)]);
    }

    #[test]
    fn empty_list_has_no_rankings() {
        assert!(assign_rankings(&[]).is_empty());
    }

    #[tokio::test]
    async fn recompute_persists_and_orders_for_display() {
        let store = memory_store().await;
        let mut ids = Vec::new();
        for (title, rating) in [("A", 6.0), ("B", 9.5), ("C", 1.0), ("D", 7.25)] {
            let m = store.insert(new_movie(title)).await.unwrap();
            store.update_rating(m.id, rating, None).await.unwrap();
            ids.push(m.id);
        }

        let listed = store.list_all_by_rating_ascending().await.unwrap();
        let shown = recompute_rankings(&store, listed).await.unwrap();

        let titles: Vec<&str> = shown.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "A", "D", "B"]);

        let mut stored: Vec<i32> = Vec::new();
        for id in &ids {
            stored.push(store.get(*id).await.unwrap().ranking.unwrap());
        }
        assert_eq!(stored, vec![3, 1, 4, 2]);
    }

    #[tokio::test]
    async fn recompute_rewrites_stale_rankings() {
        let store = memory_store().await;
        let a = store.insert(new_movie("A")).await.unwrap();
        let b = store.insert(new_movie("B")).await.unwrap();
        store.update_ranking(a.id, 40).await.unwrap();
        store.update_rating(b.id, 3.0, None).await.unwrap();

        let listed = store.list_all_by_rating_ascending().await.unwrap();
        recompute_rankings(&store, listed).await.unwrap();

        assert_eq!(store.get(a.id).await.unwrap().ranking, Some(2));
        assert_eq!(store.get(b.id).await.unwrap().ranking, Some(1));
    }
}
