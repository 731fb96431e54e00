use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: u64,
    pub name: String,
    pub major: String,
    pub year: u64,
    pub professor_id: u64,
}

/// Partial student update. Unset fields are sent as `""` / `0`, which the
/// contract treats as "keep the current value".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentUpdate {
    pub name: Option<String>,
    pub major: Option<String>,
    pub year: Option<u64>,
    pub professor_id: Option<u64>,
}

impl StudentUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.major.is_none()
            && self.year.is_none()
            && self.professor_id.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Professor {
    pub id: u64,
    pub name: String,
    pub department: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: u64,
    pub name: String,
    pub professor_id: u64,
}

/// One row of a student's enrollment listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub course_id: u64,
    pub course_name: String,
    pub professor: String,
    pub department: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentEvent {
    pub student_id: u64,
    pub course_id: u64,
    pub block_number: Option<u64>,
    pub observed_at: DateTime<Utc>,
}

/// Client-side window over an already fetched id list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub offset: usize,
    pub limit: Option<usize>,
}

impl Page {
    pub fn new(offset: usize, limit: usize) -> Self {
        Self {
            offset,
            limit: Some(limit),
        }
    }

    pub fn all() -> Self {
        Self::default()
    }

    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        let rest = items.into_iter().skip(self.offset);
        match self.limit {
            Some(limit) => rest.take(limit).collect(),
            None => rest.collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_slices_after_fetch() {
        assert_eq!(Page::new(1, 1).apply(vec![1, 2, 3]), vec![2]);
        assert_eq!(Page::new(0, 2).apply(vec![1, 2, 3]), vec![1, 2]);
        assert_eq!(Page::all().apply(vec![1, 2, 3]), vec![1, 2, 3]);
    }

    #[test]
    fn test_page_past_end_is_empty() {
        assert!(Page::new(5, 10).apply(vec![1, 2, 3]).is_empty());
        assert_eq!(
            Page { offset: 2, limit: None }.apply(vec![1, 2, 3]),
            vec![3]
        );
    }

    #[test]
    fn test_student_update_emptiness() {
        assert!(StudentUpdate::default().is_empty());
        let update = StudentUpdate {
            year: Some(3),
            ..StudentUpdate::default()
        };
        assert!(!update.is_empty());
    }
}
