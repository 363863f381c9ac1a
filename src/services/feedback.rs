use crate::{
    error::{AppError, AppResult},
    models::{feedback, Complaint, Feedback, FeedbackModel, User, UserModel},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};

/// Sentiment is derived from the star rating, not from the comment text.
pub fn sentiment_for_rating(rating: i16) -> &'static str {
    if rating >= 4 {
        "positive"
    } else if rating == 3 {
        "neutral"
    } else {
        "negative"
    }
}

#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
pub struct FeedbackSummary {
    pub average_rating: f64,
    pub critical_count: u64,
    pub issue_areas: Vec<String>,
}

pub struct FeedbackService {
    db: DatabaseConnection,
}

impl FeedbackService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        user_id: i32,
        rating: i16,
        comment: Option<String>,
        complaint_id: Option<i32>,
        issue_area: Option<String>,
    ) -> AppResult<FeedbackModel> {
        if !(1..=5).contains(&rating) {
            return Err(AppError::Validation(
                "Rating must be between 1 and 5".to_string(),
            ));
        }
        if let Some(cid) = complaint_id {
            Complaint::find_by_id(cid)
                .one(&self.db)
                .await?
                .ok_or(AppError::NotFound)?;
        }

        let new_feedback = feedback::ActiveModel {
            user_id: Set(user_id),
            complaint_id: Set(complaint_id),
            rating: Set(rating),
            comment: Set(comment),
            sentiment: Set(sentiment_for_rating(rating).to_string()),
            status: Set("Reviewed".to_string()),
            issue_area: Set(issue_area),
            created_at: Set(chrono::Utc::now().naive_utc()),
            ..Default::default()
        };
        Ok(new_feedback.insert(&self.db).await?)
    }

    /// Admin listing, newest first, with submitters.
    pub async fn list_with_users(&self) -> AppResult<Vec<(FeedbackModel, Option<UserModel>)>> {
        let rows = Feedback::find()
            .find_also_related(User)
            .order_by_desc(feedback::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    /// Average rating, count of critical entries (rating <= 2), and the
    /// distinct issue areas mentioned.
    pub async fn summary(&self) -> AppResult<FeedbackSummary> {
        let all = Feedback::find().all(&self.db).await?;
        let critical_count = all.iter().filter(|f| f.rating <= 2).count() as u64;
        let average_rating = if all.is_empty() {
            0.0
        } else {
            all.iter().map(|f| f.rating as f64).sum::<f64>() / all.len() as f64
        };
        let mut issue_areas: Vec<String> = all
            .iter()
            .filter_map(|f| f.issue_area.clone())
            .collect();
        issue_areas.sort();
        issue_areas.dedup();

        Ok(FeedbackSummary {
            average_rating,
            critical_count,
            issue_areas,
        })
    }

    /// Admin update; sentiment is re-derived whenever the rating changes.
    pub async fn update(
        &self,
        id: i32,
        comment: Option<String>,
        rating: Option<i16>,
        status: Option<String>,
    ) -> AppResult<FeedbackModel> {
        let existing = Feedback::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: feedback::ActiveModel = existing.into();
        if comment.is_some() {
            active.comment = Set(comment);
        }
        if let Some(rating) = rating {
            if !(1..=5).contains(&rating) {
                return Err(AppError::Validation(
                    "Rating must be between 1 and 5".to_string(),
                ));
            }
            active.rating = Set(rating);
            active.sentiment = Set(sentiment_for_rating(rating).to_string());
        }
        if let Some(status) = status {
            if !matches!(status.as_str(), "Reviewed" | "In Progress" | "Resolved") {
                return Err(AppError::Validation(format!("Invalid status: {}", status)));
            }
            active.status = Set(status);
        }
        Ok(active.update(&self.db).await?)
    }

    pub async fn mine(&self, user_id: i32) -> AppResult<Vec<FeedbackModel>> {
        let rows = Feedback::find()
            .filter(feedback::Column::UserId.eq(user_id))
            .order_by_desc(feedback::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_ratings_are_positive() {
        assert_eq!(sentiment_for_rating(4), "positive");
        assert_eq!(sentiment_for_rating(5), "positive");
    }

    #[test]
    fn three_is_neutral() {
        assert_eq!(sentiment_for_rating(3), "neutral");
    }

    #[test]
    fn low_ratings_are_negative() {
        assert_eq!(sentiment_for_rating(1), "negative");
        assert_eq!(sentiment_for_rating(2), "negative");
    }
}
