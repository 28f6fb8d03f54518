//! Student identity for one browser session.
//!
//! The identity travels in the page URL as `studentId` / `studentName`
//! query parameters. A URL without an id gets a generated one and a random
//! display name; the host writes [`StudentSession::to_query`] back into the
//! URL so a reload keeps the same identity.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use tracing::info;
use url::form_urlencoded;

use crate::ids;

pub const STUDENT_ID_PARAM: &str = "studentId";
pub const STUDENT_NAME_PARAM: &str = "studentName";

/// Display name used when the URL carries an id but no name.
pub const DEFAULT_STUDENT_NAME: &str = "사용자";

/// Pool for generated display names.
pub const NAME_POOL: [&str; 20] = [
    "홍길동", "김철수", "이영희", "박민수", "최지은", "정수진", "강민호", "윤서연", "임재현", "한지우",
    "오성민", "신예은", "조현우", "배수지", "남궁민", "서준호", "권나영", "양지훈", "송하늘", "안유진",
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StudentSession {
    pub id: String,
    pub name: String,
    /// `true` when the id was generated rather than read from the URL.
    pub generated: bool,
}

impl StudentSession {
    /// Resolve from a query string, with or without the leading `?`.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut id = None;
        let mut name = None;
        for (param, value) in form_urlencoded::parse(query.as_bytes()) {
            match &*param {
                STUDENT_ID_PARAM if !value.is_empty() => id = Some(value.into_owned()),
                STUDENT_NAME_PARAM if !value.is_empty() => name = Some(value.into_owned()),
                _ => {}
            }
        }

        match id {
            Some(id) => Self {
                id,
                name: name.unwrap_or_else(|| DEFAULT_STUDENT_NAME.to_owned()),
                generated: false,
            },
            None => Self::generate(),
        }
    }

    /// Fresh id plus a random pool name.
    #[must_use]
    pub fn generate() -> Self {
        let id = ids::student_id();
        let name = random_name().to_owned();
        info!(student_id = %id, student_name = %name, "generated student identity");
        Self { id, name, generated: true }
    }

    /// `studentId=..&studentName=..`, form-encoded.
    #[must_use]
    pub fn to_query(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair(STUDENT_ID_PARAM, &self.id)
            .append_pair(STUDENT_NAME_PARAM, &self.name)
            .finish()
    }
}

#[must_use]
pub fn random_name() -> &'static str {
    NAME_POOL[ids::random_index(NAME_POOL.len())]
}
