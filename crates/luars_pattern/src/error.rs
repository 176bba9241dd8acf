/// Errors raised while validating or running a pattern.
///
/// Messages match the ones the reference string library reports, so a host
/// can surface them unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("malformed pattern (ends with '%')")]
    EndsWithPercent,
    #[error("malformed pattern (missing ']')")]
    MissingBracket,
    #[error("malformed pattern (missing arguments to '%b')")]
    MissingBalanceArgs,
    #[error("missing '[' after '%f' in pattern")]
    MissingFrontierSet,
    #[error("unfinished capture")]
    UnfinishedCapture,
    #[error("invalid pattern capture")]
    InvalidPatternCapture,
    #[error("too many captures")]
    TooManyCaptures,
    #[error("invalid capture index %{0}")]
    InvalidCaptureIndex(usize),
    #[error("invalid capture index %{0} in replacement string")]
    InvalidReplacementIndex(usize),
    #[error("invalid use of '%' in replacement string")]
    InvalidReplacement,
    #[error("pattern too complex")]
    TooComplex,
}

pub type PatternResult<T> = Result<T, PatternError>;
