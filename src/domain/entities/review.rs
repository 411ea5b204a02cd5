//! Product reviews and rating statistics.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Review {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    /// Reviewer display name, joined from `users`.
    pub user_name: String,
    pub variant: String,
    pub review: String,
    pub rating: Decimal,
    pub color: String,
    pub size: String,
    pub quantity: String,
    pub likes: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewWithImages {
    #[serde(flatten)]
    pub review: Review,
    pub images: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ReviewInput {
    pub variant: String,
    pub review: String,
    pub rating: Decimal,
    pub color: String,
    pub size: String,
    pub quantity: String,
    pub images: Vec<String>,
}

/// Optional narrowing of a product's review list.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReviewFilter {
    /// Whole-star bucket: matches ratings in `[rating, rating + 1)`.
    pub rating: Option<i32>,
    pub has_images: Option<bool>,
}

text_enum! {
    ReviewSort {
        Newest => "newest",
        Oldest => "oldest",
        Highest => "highest",
        Lowest => "lowest",
    }
}

impl Default for ReviewSort {
    fn default() -> Self {
        Self::Newest
    }
}

/// Review count per whole star, plus the overall average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingStatistics {
    pub average: Decimal,
    pub total: i64,
    /// `per_star[0]` counts 1-star reviews, `per_star[4]` 5-star reviews.
    pub per_star: [i64; 5],
}

impl RatingStatistics {
    pub fn empty() -> Self {
        Self {
            average: Decimal::ZERO,
            total: 0,
            per_star: [0; 5],
        }
    }

    /// Builds statistics from `(star, count)` pairs; stars outside `1..=5` are ignored.
    pub fn from_counts(average: Decimal, counts: impl IntoIterator<Item = (i32, i64)>) -> Self {
        let mut per_star = [0; 5];
        for (star, count) in counts {
            if (1..=5).contains(&star) {
                per_star[(star - 1) as usize] += count;
            }
        }

        Self {
            average,
            total: per_star.iter().sum(),
            per_star,
        }
    }

    /// Share of reviews with `star` stars, in whole percent.
    pub fn percentage(&self, star: usize) -> i64 {
        if self.total == 0 || !(1..=5).contains(&star) {
            return 0;
        }
        self.per_star[star - 1] * 100 / self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_statistics_from_counts() {
        let stats =
            RatingStatistics::from_counts(Decimal::new(42, 1), [(5, 6), (4, 3), (1, 1), (9, 4)]);

        assert_eq!(stats.total, 10);
        assert_eq!(stats.per_star, [1, 0, 0, 3, 6]);
        assert_eq!(stats.percentage(5), 60);
        assert_eq!(stats.percentage(2), 0);
        assert_eq!(stats.percentage(6), 0);
    }

    #[test]
    fn test_empty_statistics() {
        let stats = RatingStatistics::empty();
        assert_eq!(stats.total, 0);
        assert_eq!(stats.percentage(3), 0);
    }

    #[test]
    fn test_review_sort_parse() {
        assert_eq!("lowest".parse::<ReviewSort>().unwrap(), ReviewSort::Lowest);
        assert_eq!(ReviewSort::default(), ReviewSort::Newest);
    }
}
