use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i64,
}

pub async fn get_question(pool: &SqlitePool, id: i64) -> sqlx::Result<Question> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .fetch_one(pool)
    .await
}

pub async fn get_all_questions(pool: &SqlitePool) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty FROM questions ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn get_questions_page(
    pool: &SqlitePool,
    limit: i64,
    offset: i64,
) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty FROM questions ORDER BY id LIMIT ?1 OFFSET ?2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn count_questions(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM questions")
        .fetch_one(pool)
        .await
}

/// Case-insensitive substring match on the question text. The term is taken
/// literally and an empty term matches everything. Case is folded in Rust
/// since SQLite's `lower()` only knows ASCII.
pub async fn search_questions(pool: &SqlitePool, term: &str) -> sqlx::Result<Vec<Question>> {
    let term = term.to_lowercase();
    let questions = get_all_questions(pool).await?;
    Ok(questions
        .into_iter()
        .filter(|q| q.question.to_lowercase().contains(&term))
        .collect())
}

pub async fn get_questions_for_category(
    pool: &SqlitePool,
    category_id: i64,
) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty FROM questions
        WHERE questions.category = ?1
        ORDER BY id
        "#,
    )
    .bind(category_id)
    .fetch_all(pool)
    .await
}

/// Questions of the category that are not in `previous`, lowest id first.
pub async fn get_quiz_candidates(
    pool: &SqlitePool,
    category_id: i64,
    previous: &[i64],
) -> sqlx::Result<Vec<Question>> {
    let seen: HashSet<i64> = previous.iter().copied().collect();
    let questions = get_questions_for_category(pool, category_id).await?;
    Ok(questions
        .into_iter()
        .filter(|q| !seen.contains(&q.id))
        .collect())
}

pub async fn create_question(
    pool: &SqlitePool,
    question: &str,
    answer: &str,
    category: i64,
    difficulty: i64,
) -> sqlx::Result<i64> {
    let id = sqlx::query(
        r#"
        INSERT INTO questions (question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(question)
    .bind(answer)
    .bind(category)
    .bind(difficulty)
    .execute(pool)
    .await?
    .last_insert_rowid();

    Ok(id)
}

/// Fails with `RowNotFound` when there is no question with this id.
pub async fn delete_question(pool: &SqlitePool, id: i64) -> sqlx::Result<()> {
    get_question(pool, id).await?;

    sqlx::query(
        r#"
        DELETE FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Inserts the given questions, overwriting the fields of any id that is
/// already present.
pub async fn import_questions(pool: &SqlitePool, questions: Vec<Question>) -> sqlx::Result<()> {
    for question in questions {
        sqlx::query(
            r#"
            INSERT INTO questions (id, question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                question = excluded.question,
                answer = excluded.answer,
                category = excluded.category,
                difficulty = excluded.difficulty
            "#,
        )
        .bind(question.id)
        .bind(&question.question)
        .bind(&question.answer)
        .bind(question.category)
        .bind(question.difficulty)
        .execute(pool)
        .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    async fn seed(pool: &SqlitePool) -> Vec<i64> {
        let rows = [
            ("Whose autobiography is entitled 'I Know Why the Caged Bird Sings'?", "Maya Angelou", 4, 2),
            ("What boxer's original name is Cassius Clay?", "Muhammad Ali", 4, 1),
            ("What movie earned Tom Hanks his third straight Oscar nomination, in 1996?", "Apollo 13", 5, 4),
            ("What was the TITLE of the 1990 fantasy directed by Tim Burton?", "Edward Scissorhands", 5, 3),
            ("Who invented Peanut Butter?", "George Washington Carver", 4, 2),
        ];
        let mut ids = vec![];
        for (question, answer, category, difficulty) in rows {
            ids.push(
                create_question(pool, question, answer, category, difficulty)
                    .await
                    .unwrap(),
            );
        }
        ids
    }

    #[tokio::test]
    async fn create_then_get() {
        let pool = test_pool().await;
        let id = create_question(&pool, "Who discovered penicillin?", "Alexander Fleming", 1, 3)
            .await
            .unwrap();
        let question = get_question(&pool, id).await.unwrap();
        assert_eq!(
            question,
            Question {
                id,
                question: "Who discovered penicillin?".to_owned(),
                answer: "Alexander Fleming".to_owned(),
                category: 1,
                difficulty: 3,
            }
        );
    }

    #[tokio::test]
    async fn unknown_category_violates_foreign_key() {
        let pool = test_pool().await;
        let res = create_question(&pool, "Orphan?", "Yes", 41, 1).await;
        assert!(matches!(res, Err(sqlx::Error::Database(_))));
    }

    #[tokio::test]
    async fn paging_windows() {
        let pool = test_pool().await;
        let ids = seed(&pool).await;

        let first = get_questions_page(&pool, 2, 0).await.unwrap();
        assert_eq!(first.iter().map(|q| q.id).collect::<Vec<_>>(), ids[..2]);

        let last = get_questions_page(&pool, 2, 4).await.unwrap();
        assert_eq!(last.iter().map(|q| q.id).collect::<Vec<_>>(), ids[4..]);

        assert!(get_questions_page(&pool, 2, 100).await.unwrap().is_empty());
        assert_eq!(count_questions(&pool).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn search_ignores_case() {
        let pool = test_pool().await;
        seed(&pool).await;

        let found = search_questions(&pool, "title").await.unwrap();
        assert_eq!(found.len(), 2);
        assert!(found
            .iter()
            .all(|q| q.question.to_lowercase().contains("title")));

        assert_eq!(search_questions(&pool, "").await.unwrap().len(), 5);
        assert!(search_questions(&pool, "%").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn search_folds_non_ascii_case() {
        let pool = test_pool().await;
        seed(&pool).await;
        let id = create_question(&pool, "Which ÉCOLE trained Monet?", "Le Havre", 2, 3)
            .await
            .unwrap();

        let found = search_questions(&pool, "école").await.unwrap();
        assert_eq!(found.iter().map(|q| q.id).collect::<Vec<_>>(), [id]);

        let found = search_questions(&pool, "ÉCOLE TRAINED").await.unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn quiz_candidates_skip_previous() {
        let pool = test_pool().await;
        let ids = seed(&pool).await;
        let history = [ids[0], ids[1], ids[4]];

        let all = get_quiz_candidates(&pool, 4, &[]).await.unwrap();
        assert_eq!(all.iter().map(|q| q.id).collect::<Vec<_>>(), history);

        let rest = get_quiz_candidates(&pool, 4, &[ids[0], ids[2]]).await.unwrap();
        assert_eq!(
            rest.iter().map(|q| q.id).collect::<Vec<_>>(),
            [ids[1], ids[4]]
        );

        assert!(get_quiz_candidates(&pool, 4, &history)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn delete_removes_row() {
        let pool = test_pool().await;
        let ids = seed(&pool).await;

        delete_question(&pool, ids[1]).await.unwrap();
        assert!(matches!(
            get_question(&pool, ids[1]).await,
            Err(sqlx::Error::RowNotFound)
        ));
        assert!(matches!(
            delete_question(&pool, ids[1]).await,
            Err(sqlx::Error::RowNotFound)
        ));
        assert_eq!(count_questions(&pool).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn deleted_ids_are_not_reused() {
        let pool = test_pool().await;
        let ids = seed(&pool).await;
        let last = *ids.last().unwrap();

        delete_question(&pool, last).await.unwrap();
        let id = create_question(&pool, "Again?", "Again", 1, 1).await.unwrap();
        assert!(id > last);
    }

    #[tokio::test]
    async fn import_upserts_by_id() {
        let pool = test_pool().await;
        let ids = seed(&pool).await;

        import_questions(
            &pool,
            vec![
                Question {
                    id: ids[0],
                    question: "Edited?".to_owned(),
                    answer: "Edited".to_owned(),
                    category: 1,
                    difficulty: 5,
                },
                Question {
                    id: 100,
                    question: "New?".to_owned(),
                    answer: "New".to_owned(),
                    category: 2,
                    difficulty: 1,
                },
            ],
        )
        .await
        .unwrap();

        assert_eq!(get_question(&pool, ids[0]).await.unwrap().answer, "Edited");
        assert_eq!(get_question(&pool, 100).await.unwrap().category, 2);
        assert_eq!(count_questions(&pool).await.unwrap(), 6);
    }
}
