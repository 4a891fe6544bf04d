#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Occupation {
    #[default]
    Student,
    Developer,
    DataScientist,
    DatabaseAdmin,
}
