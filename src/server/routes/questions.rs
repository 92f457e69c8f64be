use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{
            categories::{self, category_exists, category_map, CategoryMap},
            questions,
        },
        Category, Question,
    },
    server::{
        app::AppState,
        extractors::{JsonBody, PathParam, QueryParams},
    },
    telemetry::QUESTIONS_CNTR,
};

use super::{ApiError, ApiResponse};

const QUESTIONS_PER_PAGE: i64 = 10;

#[derive(Debug, Default, Deserialize)]
struct Pagination {
    page: Option<i64>,
}

impl Pagination {
    /// `(limit, offset)` of the requested 1-indexed page.
    fn window(&self) -> Result<(i64, i64), ApiError> {
        let page = self.page.unwrap_or(1);
        if page < 1 {
            return Err(ApiError::BadRequest(format!(
                "page should be 1 or greater, got {page}"
            )));
        }
        Ok((QUESTIONS_PER_PAGE, (page - 1).saturating_mul(QUESTIONS_PER_PAGE)))
    }
}

#[derive(Debug, Deserialize)]
struct NewQuestion {
    question: String,
    answer: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    category: i64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    difficulty: i64,
}

impl NewQuestion {
    fn validate(&self) -> Result<(), ApiError> {
        if self.question.trim().is_empty() {
            return Err(ApiError::BadRequest("question text is empty".to_owned()));
        }
        if self.answer.trim().is_empty() {
            return Err(ApiError::BadRequest("answer text is empty".to_owned()));
        }
        if self.difficulty < 1 {
            return Err(ApiError::Unprocessable(format!(
                "difficulty should be 1 or greater, got {}",
                self.difficulty
            )));
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct SearchRequest {
    #[serde(rename = "searchTerm")]
    search_term: String,
}

#[derive(Serialize)]
struct QuestionsPage {
    questions: Vec<Question>,
    total_questions: i64,
    categories: CategoryMap,
}

#[derive(Serialize)]
struct Created {
    success: bool,
    message: &'static str,
    code: u16,
    created: i64,
}

#[derive(Serialize)]
struct Deleted {
    success: bool,
    deleted: i64,
}

#[derive(Serialize)]
struct SearchResults {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    categories: Vec<Category>,
}

async fn get_questions(
    State(pool): State<SqlitePool>,
    QueryParams(pagination): QueryParams<Pagination>,
) -> ApiResponse<Json<QuestionsPage>> {
    let (limit, offset) = pagination.window()?;
    let questions = questions::get_questions_page(&pool, limit, offset).await?;
    let total_questions = questions::count_questions(&pool).await?;
    let categories = categories::get_all_categories(&pool).await?;
    Ok(Json(QuestionsPage {
        questions,
        total_questions,
        categories: category_map(categories),
    }))
}

#[tracing::instrument(skip(pool))]
async fn create_question(
    State(pool): State<SqlitePool>,
    JsonBody(new_question): JsonBody<NewQuestion>,
) -> ApiResponse<(StatusCode, Json<Created>)> {
    new_question.validate()?;
    if !category_exists(&pool, new_question.category).await? {
        return Err(ApiError::Unprocessable(format!(
            "category {} does not exist",
            new_question.category
        )));
    }

    let id = questions::create_question(
        &pool,
        new_question.question.trim(),
        new_question.answer.trim(),
        new_question.category,
        new_question.difficulty,
    )
    .await?;
    QUESTIONS_CNTR.with_label_values(&["created"]).inc();
    tracing::info!(id, "Question created");

    Ok((
        StatusCode::CREATED,
        Json(Created {
            success: true,
            message: "created",
            code: StatusCode::CREATED.as_u16(),
            created: id,
        }),
    ))
}

#[tracing::instrument(skip(pool))]
async fn delete_question(
    State(pool): State<SqlitePool>,
    PathParam(id): PathParam<i64>,
) -> ApiResponse<Json<Deleted>> {
    questions::delete_question(&pool, id).await?;
    QUESTIONS_CNTR.with_label_values(&["deleted"]).inc();
    tracing::info!("Question deleted");
    Ok(Json(Deleted {
        success: true,
        deleted: id,
    }))
}

async fn search_questions(
    State(pool): State<SqlitePool>,
    JsonBody(search): JsonBody<SearchRequest>,
) -> ApiResponse<Json<SearchResults>> {
    let questions = questions::search_questions(&pool, &search.search_term).await?;
    let categories = categories::get_all_categories(&pool).await?;
    Ok(Json(SearchResults {
        success: true,
        total_questions: questions.len(),
        questions,
        categories,
    }))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(get_questions).post(create_question))
        .route("/questions/search", post(search_questions))
        .route("/questions/{id}", delete(delete_question))
        .with_state(state)
}
