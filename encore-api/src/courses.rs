//! Courses router client
//!
//! Course and lesson browsing, instrument catalog, and enrollments. The
//! public catalog endpoints need no token; personalized and write
//! endpoints take a bearer token.

use encore_core::{EncoreResult, Instrument, NewInstrument};
use log::debug;

use super::{
    bearer_headers, handle_response_error, parse_json, transport_error, ApiClientConfig,
};
use crate::types::{Course, Enrollment, Lesson, NewCourse, NewLesson};

/// Client for the `/courses` router
pub struct CoursesApi {
    client: reqwest::Client,
    config: ApiClientConfig,
}

#[derive(serde::Serialize)]
struct EnrollBody {
    course_id: i64,
}

impl CoursesApi {
    pub(crate) fn with_client(client: reqwest::Client, config: ApiClientConfig) -> Self {
        Self { client, config }
    }

    /// Full public course catalog
    pub async fn list(&self) -> EncoreResult<Vec<Course>> {
        let response = self
            .client
            .get(self.config.endpoint("courses/"))
            .send()
            .await
            .map_err(|e| transport_error(e, "list_courses"))?;

        if !response.status().is_success() {
            return Err(handle_response_error(response, "list_courses").await);
        }

        parse_json(response, "list_courses").await
    }

    /// Courses matching the current user's instruments
    pub async fn my_courses(&self, token: &str) -> EncoreResult<Vec<Course>> {
        let response = self
            .client
            .get(self.config.endpoint("courses/my-courses"))
            .headers(bearer_headers(token)?)
            .send()
            .await
            .map_err(|e| transport_error(e, "my_courses"))?;

        if !response.status().is_success() {
            return Err(handle_response_error(response, "my_courses").await);
        }

        parse_json(response, "my_courses").await
    }

    /// A single course by id
    pub async fn get(&self, course_id: i64) -> EncoreResult<Course> {
        let response = self
            .client
            .get(self.config.endpoint(&format!("courses/{}", course_id)))
            .send()
            .await
            .map_err(|e| transport_error(e, "get_course"))?;

        if !response.status().is_success() {
            return Err(handle_response_error(response, "get_course").await);
        }

        parse_json(response, "get_course").await
    }

    /// Create a course
    pub async fn create(&self, token: &str, course: &NewCourse) -> EncoreResult<Course> {
        let response = self
            .client
            .post(self.config.endpoint("courses/"))
            .headers(bearer_headers(token)?)
            .json(course)
            .send()
            .await
            .map_err(|e| transport_error(e, "create_course"))?;

        if !response.status().is_success() {
            return Err(handle_response_error(response, "create_course").await);
        }

        parse_json(response, "create_course").await
    }

    /// Lessons of a course, ordered
    pub async fn lessons(&self, token: &str, course_id: i64) -> EncoreResult<Vec<Lesson>> {
        debug!("Fetching lessons for course {}", course_id);

        let response = self
            .client
            .get(
                self.config
                    .endpoint(&format!("courses/{}/lessons", course_id)),
            )
            .headers(bearer_headers(token)?)
            .send()
            .await
            .map_err(|e| transport_error(e, "lessons"))?;

        if !response.status().is_success() {
            return Err(handle_response_error(response, "lessons").await);
        }

        parse_json(response, "lessons").await
    }

    /// A single lesson with its study material
    pub async fn lesson(&self, token: &str, lesson_id: i64) -> EncoreResult<Lesson> {
        let response = self
            .client
            .get(
                self.config
                    .endpoint(&format!("courses/lessons/{}", lesson_id)),
            )
            .headers(bearer_headers(token)?)
            .send()
            .await
            .map_err(|e| transport_error(e, "lesson"))?;

        if !response.status().is_success() {
            return Err(handle_response_error(response, "lesson").await);
        }

        parse_json(response, "lesson").await
    }

    /// Create a lesson
    pub async fn create_lesson(&self, token: &str, lesson: &NewLesson) -> EncoreResult<Lesson> {
        let response = self
            .client
            .post(self.config.endpoint("courses/lessons"))
            .headers(bearer_headers(token)?)
            .json(lesson)
            .send()
            .await
            .map_err(|e| transport_error(e, "create_lesson"))?;

        if !response.status().is_success() {
            return Err(handle_response_error(response, "create_lesson").await);
        }

        parse_json(response, "create_lesson").await
    }

    /// Public instrument catalog
    pub async fn instruments(&self) -> EncoreResult<Vec<Instrument>> {
        let response = self
            .client
            .get(self.config.endpoint("courses/instruments"))
            .send()
            .await
            .map_err(|e| transport_error(e, "instruments"))?;

        if !response.status().is_success() {
            return Err(handle_response_error(response, "instruments").await);
        }

        parse_json(response, "instruments").await
    }

    /// Create an instrument
    pub async fn create_instrument(
        &self,
        token: &str,
        instrument: &NewInstrument,
    ) -> EncoreResult<Instrument> {
        let response = self
            .client
            .post(self.config.endpoint("courses/instruments"))
            .headers(bearer_headers(token)?)
            .json(instrument)
            .send()
            .await
            .map_err(|e| transport_error(e, "create_instrument"))?;

        if !response.status().is_success() {
            return Err(handle_response_error(response, "create_instrument").await);
        }

        parse_json(response, "create_instrument").await
    }

    /// Enroll the current user in a course
    pub async fn enroll(&self, token: &str, course_id: i64) -> EncoreResult<Enrollment> {
        let response = self
            .client
            .post(self.config.endpoint("courses/enroll"))
            .headers(bearer_headers(token)?)
            .json(&EnrollBody { course_id })
            .send()
            .await
            .map_err(|e| transport_error(e, "enroll"))?;

        if !response.status().is_success() {
            return Err(handle_response_error(response, "enroll").await);
        }

        parse_json(response, "enroll").await
    }

    /// The current user's enrollments
    pub async fn my_enrollments(&self, token: &str) -> EncoreResult<Vec<Enrollment>> {
        let response = self
            .client
            .get(self.config.endpoint("courses/my-enrollments"))
            .headers(bearer_headers(token)?)
            .send()
            .await
            .map_err(|e| transport_error(e, "my_enrollments"))?;

        if !response.status().is_success() {
            return Err(handle_response_error(response, "my_enrollments").await);
        }

        parse_json(response, "my_enrollments").await
    }
}
