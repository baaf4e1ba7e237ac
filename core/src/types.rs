//! Typed records decoded from endpoint responses.
//!
//! # Design
//! Only two endpoints have a stable enough schema to deserve a struct;
//! the rest hand back raw `serde_json::Value`. Decoding navigates the
//! JSON explicitly and fails with `ApiError::Decode` — the API is loose
//! about types (`sexCode` and `schoolCalendar.id` arrive as either string
//! or number), so field access tolerates both.

use serde_json::Value;

use crate::error::ApiError;

/// Gender code from the student-info endpoint. Unrecognized codes map to
/// `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gender {
    #[default]
    Unknown,
    Male,
    Female,
    Undisclosed,
}

impl Gender {
    pub fn from_code(code: i64) -> Gender {
        match code {
            1 => Gender::Male,
            2 => Gender::Female,
            9 => Gender::Undisclosed,
            _ => Gender::Unknown,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Gender::Unknown => 0,
            Gender::Male => 1,
            Gender::Female => 2,
            Gender::Undisclosed => 9,
        }
    }
}

/// Basic student record from `/v1/dc/user/student_info`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StudentInfo {
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub gender: Gender,
    pub dept_name: Option<String>,
    pub second_dept_name: Option<String>,
    pub school_name: Option<String>,
    pub current_grade: Option<String>,
}

impl StudentInfo {
    /// Decode from the endpoint's `data` value: a one-element array whose
    /// first entry carries the record.
    pub fn from_data(data: &Value) -> Result<StudentInfo, ApiError> {
        let record = data
            .as_array()
            .and_then(|items| items.first())
            .ok_or_else(|| ApiError::Decode("student info: expected non-empty array".to_string()))?;

        Ok(StudentInfo {
            user_id: string_field(record, "userId"),
            name: string_field(record, "name"),
            gender: record
                .get("sexCode")
                .and_then(int_value)
                .map(Gender::from_code)
                .unwrap_or_default(),
            dept_name: string_field(record, "deptName"),
            second_dept_name: string_field(record, "secondDeptName"),
            school_name: string_field(record, "schoolName"),
            current_grade: string_field(record, "currentGrade"),
        })
    }
}

/// Current-term calendar from
/// `/v1/rt/onetongji/school_calendar_current_term_calendar`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SchoolCalendar {
    pub calendar_id: Option<String>,
    pub year: Option<String>,
    pub term: Option<String>,
    pub school_week: Option<String>,
    pub simple_name: Option<String>,
}

impl SchoolCalendar {
    /// Decode from the endpoint's `data` object. The calendar id lives in
    /// the nested `schoolCalendar` object; week and display name sit at
    /// the top level.
    pub fn from_data(data: &Value) -> Result<SchoolCalendar, ApiError> {
        let nested = data
            .get("schoolCalendar")
            .filter(|v| v.is_object())
            .ok_or_else(|| {
                ApiError::Decode("school calendar: missing schoolCalendar object".to_string())
            })?;

        Ok(SchoolCalendar {
            calendar_id: string_field(nested, "id"),
            year: string_field(nested, "year"),
            term: string_field(nested, "term"),
            school_week: string_field(data, "week"),
            simple_name: string_field(data, "simpleName"),
        })
    }
}

/// Read `object[key]` as a string, accepting JSON strings and numbers.
fn string_field(object: &Value, key: &str) -> Option<String> {
    match object.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// Read a value as an integer, accepting `1` and `"1"` alike.
fn int_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn gender_codes_map_and_default() {
        assert_eq!(Gender::from_code(0), Gender::Unknown);
        assert_eq!(Gender::from_code(1), Gender::Male);
        assert_eq!(Gender::from_code(2), Gender::Female);
        assert_eq!(Gender::from_code(9), Gender::Undisclosed);
        assert_eq!(Gender::from_code(7), Gender::Unknown);
        assert_eq!(Gender::Undisclosed.code(), 9);
    }

    #[test]
    fn student_info_maps_first_array_element() {
        let data = json!([{
            "userId": "1",
            "name": "A",
            "deptName": "D",
            "secondDeptName": "S",
            "currentGrade": "G",
            "sexCode": "1"
        }]);
        let info = StudentInfo::from_data(&data).unwrap();
        assert_eq!(info.user_id.as_deref(), Some("1"));
        assert_eq!(info.name.as_deref(), Some("A"));
        assert_eq!(info.gender, Gender::Male);
        assert_eq!(info.dept_name.as_deref(), Some("D"));
        assert_eq!(info.second_dept_name.as_deref(), Some("S"));
        assert_eq!(info.current_grade.as_deref(), Some("G"));
        assert!(info.school_name.is_none());
    }

    #[test]
    fn student_info_accepts_numeric_fields() {
        let data = json!([{"userId": 2254001, "sexCode": 2}]);
        let info = StudentInfo::from_data(&data).unwrap();
        assert_eq!(info.user_id.as_deref(), Some("2254001"));
        assert_eq!(info.gender, Gender::Female);
    }

    #[test]
    fn student_info_missing_sex_code_defaults_unknown() {
        let data = json!([{"name": "A"}]);
        let info = StudentInfo::from_data(&data).unwrap();
        assert_eq!(info.gender, Gender::Unknown);
    }

    #[test]
    fn student_info_rejects_empty_array() {
        let err = StudentInfo::from_data(&json!([])).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn student_info_rejects_non_array() {
        let err = StudentInfo::from_data(&json!({"userId": "1"})).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn school_calendar_maps_nested_id_and_top_level_fields() {
        let data = json!({
            "schoolCalendar": {"id": 119, "year": "2023-2024", "term": "2"},
            "simpleName": "2023-2024 term 2",
            "week": "12"
        });
        let calendar = SchoolCalendar::from_data(&data).unwrap();
        assert_eq!(calendar.calendar_id.as_deref(), Some("119"));
        assert_eq!(calendar.year.as_deref(), Some("2023-2024"));
        assert_eq!(calendar.term.as_deref(), Some("2"));
        assert_eq!(calendar.school_week.as_deref(), Some("12"));
        assert_eq!(calendar.simple_name.as_deref(), Some("2023-2024 term 2"));
    }

    #[test]
    fn school_calendar_rejects_missing_nested_object() {
        let err = SchoolCalendar::from_data(&json!({"week": "1"})).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
