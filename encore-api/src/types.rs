//! Resource DTOs for the courses, marketplace and schedule routers

use chrono::{DateTime, Utc};
use encore_core::Instrument;
use serde::{Deserialize, Serialize};

/// A course offered for one instrument
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub instrument_id: i64,
    pub level: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub instrument: Instrument,
}

/// Payload for creating a course
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCourse {
    pub title: String,
    pub description: Option<String>,
    pub instrument_id: i64,
    pub level: Option<String>,
    pub image_url: Option<String>,
}

/// A lesson within a course, with study material
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub song_name: Option<String>,
    pub song_history: Option<String>,
    pub chord_help: Option<String>,
    pub sheet_music_url: Option<String>,
    pub video_url: Option<String>,
    pub order: i32,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a lesson
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLesson {
    pub course_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub song_name: Option<String>,
    pub song_history: Option<String>,
    pub chord_help: Option<String>,
    pub sheet_music_url: Option<String>,
    pub video_url: Option<String>,
    pub order: i32,
}

/// A student's enrollment in a course
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub enrolled_at: DateTime<Utc>,
    pub progress: i32,
    pub course: Course,
}

/// A second-hand item listed for sale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketplaceItem {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub image_url: Option<String>,
    pub seller_id: i64,
    pub is_sold: bool,
    pub created_at: DateTime<Utc>,
}

/// Payload for listing an item for sale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMarketplaceItem {
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub image_url: Option<String>,
}

/// A planned event in a user's weekly schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleItem {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub course_id: Option<i64>,
    pub reminder_text: Option<String>,
    pub is_teacher_view: bool,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a schedule event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewScheduleItem {
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub course_id: Option<i64>,
    pub reminder_text: Option<String>,
}

/// One row of a teacher's student roster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentSummary {
    pub id: i64,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    pub course: String,
    pub progress: i32,
}
