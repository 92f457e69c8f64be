use axum::{extract::State, routing::post, Json, Router};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories::get_category_by_type, questions::get_quiz_candidates},
        Question,
    },
    server::{app::AppState, deserializers::Id, extractors::JsonBody},
    settings::QuizSettings,
    telemetry::QUIZ_CNTR,
};

use super::ApiResponse;

#[derive(Debug, Deserialize)]
struct QuizRequest {
    /// Category name, not id.
    quiz_category: String,
    #[serde(default)]
    previous_questions: Vec<Id>,
}

#[derive(Serialize)]
struct NextQuestion {
    // null once every question of the category was shown
    question: Option<Question>,
}

fn pick_question(candidates: Vec<Question>, randomize: bool) -> Option<Question> {
    if randomize {
        candidates.choose(&mut rand::thread_rng()).cloned()
    } else {
        candidates.into_iter().next()
    }
}

#[tracing::instrument(skip(pool, quiz))]
async fn next_question(
    State(pool): State<SqlitePool>,
    State(quiz): State<QuizSettings>,
    JsonBody(request): JsonBody<QuizRequest>,
) -> ApiResponse<Json<NextQuestion>> {
    let category = get_category_by_type(&pool, &request.quiz_category).await?;
    let previous: Vec<i64> = request.previous_questions.iter().map(|id| id.0).collect();
    let candidates = get_quiz_candidates(&pool, category.id, &previous).await?;

    let question = pick_question(candidates, quiz.randomize);
    match &question {
        Some(q) => {
            QUIZ_CNTR.with_label_values(&[category.kind.as_str()]).inc();
            tracing::debug!(id = q.id, "Serving quiz question");
        }
        None => tracing::info!("No questions left, quiz is over"),
    }
    Ok(Json(NextQuestion { question }))
}

pub fn quizzes_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(next_question))
        .with_state(state)
}
