//! Domain types shared by the course data layer: identifiers, validated
//! field values, enumerations and submission scoring.

pub mod domain;
