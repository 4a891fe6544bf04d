#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EnrollmentMode {
    #[default]
    Audit,
    Honor,
    Beta,
}
