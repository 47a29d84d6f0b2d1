use crate::errors::StoreError;
use crate::models::{DashboardView, GlucosePoint, MealEntry, SessionIdentity, TrendSeries};
use crate::storage::DashboardStore;
use chrono::{Duration, Local, NaiveDate};

pub const TABLE_LIMIT: usize = 5;
pub const TREND_LIMIT: usize = 7;

pub struct DashboardAggregator<'a> {
    store: &'a dyn DashboardStore,
}

impl<'a> DashboardAggregator<'a> {
    pub fn new(store: &'a dyn DashboardStore) -> Self {
        Self { store }
    }

    pub async fn build(&self, identity: &SessionIdentity) -> Result<DashboardView, StoreError> {
        self.build_at(Local::now().date_naive(), identity).await
    }

    pub async fn build_at(
        &self,
        today: NaiveDate,
        identity: &SessionIdentity,
    ) -> Result<DashboardView, StoreError> {
        let username = identity.username.as_str();

        let mut recent_health = self.store.recent_health(username, TABLE_LIMIT as i64).await?;
        recent_health.truncate(TABLE_LIMIT);

        let history = self.store.glucose_history(username, TREND_LIMIT as i64).await?;
        let glucose_trend = glucose_trend(history);

        let recent_meals = self
            .store
            .recent_meals(TABLE_LIMIT as i64)
            .await?
            .into_iter()
            .take(TABLE_LIMIT)
            .map(|meal| MealEntry {
                meal_type: capitalize_first(&meal.meal_type),
                ..meal
            })
            .collect();

        let calories = self.store.recent_calories(TREND_LIMIT as i64).await?;
        let calorie_trend = calorie_trend(today, calories);

        let avg_glucose = self.store.average_glucose(username).await?;
        let total_calories = self.store.total_calories().await?;

        Ok(DashboardView {
            recent_health,
            recent_meals,
            glucose_trend,
            calorie_trend,
            avg_glucose,
            total_calories,
        })
    }
}

pub fn glucose_trend(mut newest_first: Vec<GlucosePoint>) -> TrendSeries {
    newest_first.truncate(TREND_LIMIT);
    newest_first.reverse();

    let (labels, values) = newest_first
        .into_iter()
        .map(|point| (day_label(point.day), point.blood_glucose_level))
        .unzip();
    TrendSeries { labels, values }
}

/// Turns newest-first meal calories into a chronological series.
///
/// Row `i` is labelled `today - i days` whatever day the meal was logged, so
/// this is one point per meal rather than a daily total.
pub fn calorie_trend(today: NaiveDate, newest_first: Vec<f64>) -> TrendSeries {
    let mut points: Vec<(String, f64)> = newest_first
        .into_iter()
        .take(TREND_LIMIT)
        .enumerate()
        .map(|(offset, calories)| (day_label(today - Duration::days(offset as i64)), calories))
        .collect();
    points.reverse();

    let (labels, values) = points.into_iter().unzip();
    TrendSeries { labels, values }
}

pub fn day_label(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

fn capitalize_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
