/// Closed-intake counts for a user inside the journal window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub taken: i64,
    pub skipped: i64,
}
