use std::sync::Arc;

use axum::{
    extract::{Form, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::info;

use crate::{
    AppState,
    error::{AppError, AppResult},
    forms::{AddMovieForm, FieldErrors, RateMovieForm},
    ranking, templates,
};

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    id: i32,
}

#[derive(Debug, Deserialize)]
pub struct FindQuery {
    id: Option<String>,
}

pub async fn index(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    let movies = state.store.list_all_by_rating_ascending().await?;
    let movies = ranking::recompute_rankings(&state.store, movies).await?;
    Ok(Html(templates::index_page(&movies)))
}

pub async fn edit_form(
    State(state): State<Arc<AppState>>,
    Query(q): Query<IdQuery>,
) -> AppResult<Html<String>> {
    let movie = state.store.get(q.id).await?;
    let form = RateMovieForm {
        rating: movie.rating.map(|r| r.to_string()).unwrap_or_default(),
        review: movie.review.clone().unwrap_or_default(),
    };
    Ok(Html(templates::edit_page(&movie, &form, &FieldErrors::default())))
}

pub async fn edit_submit(
    State(state): State<Arc<AppState>>,
    Query(q): Query<IdQuery>,
    Form(form): Form<RateMovieForm>,
) -> AppResult<Response> {
    match form.validate() {
        Ok(update) => {
            state.store.update_rating(q.id, update.rating, update.review).await?;
            info!(movie_id = q.id, rating = update.rating, "rated movie");
            Ok(Redirect::to("/").into_response())
        }
        Err(errors) => {
            let movie = state.store.get(q.id).await?;
            let body = templates::edit_page(&movie, &form, &errors);
            Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(body)).into_response())
        }
    }
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Query(q): Query<IdQuery>,
) -> AppResult<Redirect> {
    if state.store.delete(q.id).await? {
        info!(movie_id = q.id, "deleted movie");
    }
    Ok(Redirect::to("/"))
}

pub async fn add_form() -> Html<String> {
    Html(templates::add_page(&AddMovieForm::default(), &FieldErrors::default()))
}

pub async fn add_search(
    State(state): State<Arc<AppState>>,
    Form(form): Form<AddMovieForm>,
) -> AppResult<Response> {
    let title = match form.validate() {
        Ok(title) => title,
        Err(errors) => {
            let body = templates::add_page(&form, &errors);
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(body)).into_response());
        }
    };

    let results = state.tmdb.search(&title).await?;
    Ok(Html(templates::select_page(&title, &results)).into_response())
}

pub async fn find(
    State(state): State<Arc<AppState>>,
    Query(q): Query<FindQuery>,
) -> AppResult<Redirect> {
    let api_id = q
        .id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::Validation("a catalog id is required".to_string()))?;

    if !api_id.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::Validation("catalog id must be numeric".to_string()));
    }

    let details = state.tmdb.fetch_details(api_id).await?;
    let new_movie = state.tmdb.new_movie(api_id, details)?;
    let title = new_movie.title.clone();

    state.store.insert(new_movie).await?;
    let movie = state.store.find_by_title(&title).await?;
    info!(movie_id = movie.id, api_id, title = %movie.title, "added movie");

    Ok(Redirect::to(&format!("/edit?id={}", movie.id)))
}
