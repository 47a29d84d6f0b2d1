use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct HealthReading {
    pub id: i64,
    pub blood_glucose_level: f64,
    pub time_of_day: NaiveDateTime,
    pub activity_type: Option<String>,
    pub symptom_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct MealEntry {
    pub id: i64,
    pub meal_type: String,
    pub food_item: String,
    pub portion_size: String,
    pub calories: f64,
    pub carbs: f64,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct GlucosePoint {
    pub blood_glucose_level: f64,
    pub day: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl TrendSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub recent_health: Vec<HealthReading>,
    pub recent_meals: Vec<MealEntry>,
    pub glucose_trend: TrendSeries,
    pub calorie_trend: TrendSeries,
    pub avg_glucose: Option<f64>,
    pub total_calories: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SessionIdentity {
    pub username: String,
    #[sqlx(rename = "firstname")]
    pub first_name: Option<String>,
    #[sqlx(rename = "lastname")]
    pub last_name: Option<String>,
}

impl SessionIdentity {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            first_name: None,
            last_name: None,
        }
    }

    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = Some(first.into());
        self.last_name = Some(last.into());
        self
    }

    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            _ => self.username.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_prefers_full_name() {
        let identity = SessionIdentity::new("ada").with_name("Ada", "Lovelace");
        assert_eq!(identity.display_name(), "Ada Lovelace");
    }

    #[test]
    fn display_name_falls_back_to_username() {
        let mut identity = SessionIdentity::new("ada");
        identity.first_name = Some("Ada".into());
        assert_eq!(identity.display_name(), "ada");
    }
}
