use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, Order,
    QueryFilter, QueryOrder, Set, TransactionTrait,
    sea_query::{Expr, NullOrdering},
};
use tracing::debug;

use crate::{
    entities::movie,
    error::{AppError, AppResult},
};

pub use movie::Model as Movie;

/// Fields supplied by the catalog when a movie is first added.
#[derive(Clone, Debug, PartialEq)]
pub struct NewMovie {
    pub title: String,
    pub year: i32,
    pub description: String,
    pub img_url: String,
}

#[derive(Clone)]
pub struct MovieStore {
    db: DatabaseConnection,
}

impl MovieStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Rating, review and ranking start out unset. Fails with
    /// `UniqueConstraintViolation` when title, description or poster URL is
    /// already taken.
    pub async fn insert(&self, new: NewMovie) -> AppResult<Movie> {
        let model = movie::ActiveModel {
            title: Set(new.title),
            year: Set(new.year),
            description: Set(new.description),
            img_url: Set(new.img_url),
            rating: Set(None),
            ranking: Set(None),
            review: Set(None),
            ..Default::default()
        };

        let movie = model.insert(&self.db).await?;
        debug!(movie_id = movie.id, title = %movie.title, "inserted movie");
        Ok(movie)
    }

    pub async fn get(&self, id: i32) -> AppResult<Movie> {
        movie::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::movie_not_found(id))
    }

    pub async fn find_by_title(&self, title: &str) -> AppResult<Movie> {
        movie::Entity::find()
            .filter(movie::Column::Title.eq(title))
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("movie titled {title:?}")))
    }

    /// Rating is stored as given; no range check.
    pub async fn update_rating(&self, id: i32, rating: f64, review: Option<String>) -> AppResult<()> {
        let res = movie::Entity::update_many()
            .col_expr(movie::Column::Rating, Expr::value(rating))
            .col_expr(movie::Column::Review, Expr::value(review))
            .filter(movie::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        if res.rows_affected == 0 {
            return Err(AppError::movie_not_found(id));
        }
        debug!(movie_id = id, rating, "updated rating");
        Ok(())
    }

    pub async fn update_ranking(&self, id: i32, ranking: i32) -> AppResult<()> {
        if write_ranking(&self.db, id, ranking).await? == 0 {
            return Err(AppError::movie_not_found(id));
        }
        Ok(())
    }

    /// Writes a whole batch of rankings in one transaction. Ids that no
    /// longer exist are skipped.
    pub async fn apply_rankings(&self, rankings: &[(i32, i32)]) -> AppResult<()> {
        let txn = self.db.begin().await?;
        for &(id, ranking) in rankings {
            write_ranking(&txn, id, ranking).await?;
        }
        txn.commit().await?;
        Ok(())
    }

    /// Returns whether a row was removed. Deleting an absent id is a no-op.
    pub async fn delete(&self, id: i32) -> AppResult<bool> {
        let res = movie::Entity::delete_by_id(id).exec(&self.db).await?;
        debug!(movie_id = id, removed = res.rows_affected, "deleted movie");
        Ok(res.rows_affected > 0)
    }

    /// Lowest rating first. Unrated movies come before every rated one, and
    /// equal ratings keep insertion order.
    pub async fn list_all_by_rating_ascending(&self) -> AppResult<Vec<Movie>> {
        let movies = movie::Entity::find()
            .order_by_with_nulls(movie::Column::Rating, Order::Asc, NullOrdering::First)
            .order_by_asc(movie::Column::Id)
            .all(&self.db)
            .await?;
        Ok(movies)
    }
}

async fn write_ranking<C: ConnectionTrait>(conn: &C, id: i32, ranking: i32) -> AppResult<u64> {
    let res = movie::Entity::update_many()
        .col_expr(movie::Column::Ranking, Expr::value(ranking))
        .filter(movie::Column::Id.eq(id))
        .exec(conn)
        .await?;
    Ok(res.rows_affected)
}
