use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::categories::{category_map, get_all_categories, get_category, CategoryMap},
        queries::questions::get_questions_for_category,
        Question,
    },
    server::{app::AppState, extractors::PathParam},
};

use super::ApiResponse;

#[derive(Serialize)]
struct Categories {
    categories: CategoryMap,
}

#[derive(Serialize)]
struct CategoryQuestions {
    questions: Vec<Question>,
    current_category: String,
    total_questions: usize,
}

async fn get_categories(State(pool): State<SqlitePool>) -> ApiResponse<Json<Categories>> {
    let categories = get_all_categories(&pool).await?;
    Ok(Json(Categories {
        categories: category_map(categories),
    }))
}

#[tracing::instrument(skip(pool))]
async fn category_questions(
    State(pool): State<SqlitePool>,
    PathParam(id): PathParam<i64>,
) -> ApiResponse<Json<CategoryQuestions>> {
    let category = get_category(&pool, id).await?;
    let questions = get_questions_for_category(&pool, category.id).await?;
    Ok(Json(CategoryQuestions {
        total_questions: questions.len(),
        questions,
        current_category: category.kind,
    }))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(category_questions))
        .with_state(state)
}
