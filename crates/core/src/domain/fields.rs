use std::fmt;

use url::Url;

use super::DomainError;

fn bounded(
    field: &'static str,
    value: String,
    max: usize,
    allow_empty: bool,
) -> Result<String, DomainError> {
    if !allow_empty && value.trim().is_empty() {
        return Err(DomainError::EmptyField { field });
    }

    let len = value.chars().count();
    if len > max {
        return Err(DomainError::FieldTooLong { field, len, max });
    }

    Ok(value)
}

macro_rules! bounded_text {
    ($(#[$meta:meta])* $name:ident, $field:literal, $max:expr, allow_empty = $allow_empty:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl $name {
            pub const MAX_LEN: usize = $max;

            pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
                bounded($field, value.into(), Self::MAX_LEN, $allow_empty).map(Self)
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

bounded_text!(Username, "username", 50, allow_empty = false);
bounded_text!(EmailAddress, "email", 255, allow_empty = false);
bounded_text!(CourseName, "course name", 30, allow_empty = false);
bounded_text!(CourseDescription, "course description", 1000, allow_empty = true);
bounded_text!(
    /// Key of a course image in the external asset store, e.g. `course_images/intro.png`.
    ImageRef,
    "course image",
    100,
    allow_empty = false
);
bounded_text!(LessonTitle, "lesson title", 200, allow_empty = false);

impl Default for CourseName {
    fn default() -> Self {
        Self("online course".to_string())
    }
}

impl Default for LessonTitle {
    fn default() -> Self {
        Self("title".to_string())
    }
}

/// Absolute http or https link to a learner's public profile.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SocialLink(String);

impl SocialLink {
    pub const MAX_LEN: usize = 200;

    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = bounded("social link", value.into(), Self::MAX_LEN, false)?;

        if value.trim() != value {
            return Err(DomainError::InvalidSocialLink(value));
        }

        match Url::parse(&value) {
            Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => Ok(Self(value)),
            _ => Err(DomainError::InvalidSocialLink(value)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for SocialLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validates a denormalised counter or submission tally.
pub fn non_negative(field: &'static str, value: i32) -> Result<i32, DomainError> {
    if value < 0 {
        Err(DomainError::NegativeCount { field, value })
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_is_kept_as_given() {
        let name = CourseName::new("  Intro to Rust  ").expect("name should be valid");
        assert_eq!(name.as_str(), "  Intro to Rust  ");

        let description =
            CourseDescription::new("  padded\n").expect("description should be valid");
        assert_eq!(description.as_str(), "  padded\n");
    }

    #[test]
    fn surrounding_whitespace_counts_toward_the_limit() {
        let err = CourseDescription::new(format!("{} ", "d".repeat(1000)))
            .expect_err("1001 chars should be rejected");
        assert_eq!(
            err,
            DomainError::FieldTooLong {
                field: "course description",
                len: 1001,
                max: 1000
            }
        );
    }

    #[test]
    fn blank_name_is_rejected() {
        let err = CourseName::new("   ").expect_err("blank name should be rejected");
        assert_eq!(err, DomainError::EmptyField { field: "course name" });
    }

    #[test]
    fn padded_social_link_is_rejected() {
        assert!(SocialLink::new(" https://example.com/me").is_err());
    }

    #[test]
    fn course_name_over_thirty_chars_is_rejected() {
        let err = CourseName::new("a".repeat(31)).expect_err("long name should be rejected");
        assert_eq!(
            err,
            DomainError::FieldTooLong {
                field: "course name",
                len: 31,
                max: 30
            }
        );
    }

    #[test]
    fn course_name_length_counts_chars_not_bytes() {
        assert!(CourseName::new("数据库".repeat(10)).is_ok());
    }

    #[test]
    fn course_description_allows_exactly_one_thousand_chars() {
        assert!(CourseDescription::new("d".repeat(1000)).is_ok());
        assert!(CourseDescription::new("d".repeat(1001)).is_err());
        assert!(CourseDescription::new("").is_ok());
    }

    #[test]
    fn empty_image_ref_is_rejected() {
        let err = ImageRef::new("   ").expect_err("blank image should be rejected");
        assert_eq!(err, DomainError::EmptyField { field: "course image" });
    }

    #[test]
    fn defaults_are_stable() {
        assert_eq!(CourseName::default().as_str(), "online course");
        assert_eq!(LessonTitle::default().as_str(), "title");
    }

    #[test]
    fn social_link_requires_http_url() {
        assert!(SocialLink::new("https://github.com/learner").is_ok());
        assert_eq!(
            SocialLink::new("ftp://example.com").expect_err("ftp is not a profile link"),
            DomainError::InvalidSocialLink("ftp://example.com".to_string())
        );
        assert!(SocialLink::new("github.com/learner").is_err());
    }

    #[test]
    fn negative_counter_is_rejected() {
        assert_eq!(non_negative("total_learners", 3), Ok(3));
        assert_eq!(
            non_negative("total_learners", -1),
            Err(DomainError::NegativeCount {
                field: "total_learners",
                value: -1
            })
        );
    }
}
