use thiserror::Error;

/// Errors raised while constructing or using an evaluation domain.
///
/// All of them are programming errors on the caller's side: a domain is only
/// handed out fully initialised, and transforms never silently pad or truncate.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Domains need at least two points.
    #[error("domain size {0} is too small, expected at least 2")]
    TooSmall(usize),

    #[error("domain size {0} is not a power of two")]
    NotPowerOfTwo(usize),

    /// The field has no multiplicative subgroup of the requested order.
    #[error("field has no root of unity of order {0}")]
    NoRootOfUnity(usize),

    /// A step domain of size `m` splits into `big_m + small_m`; `small_m` must be a power of two.
    #[error("step domain of size {size} needs a power-of-two small subdomain, got {small_m}")]
    SmallSubdomainNotPowerOfTwo { size: usize, small_m: usize },

    #[error("sequence domain generator must be non-zero")]
    ZeroGenerator,

    /// Two points of a sequence domain coincide.
    #[error("sequence domain points are not distinct at position {0}")]
    RepeatedPoint(usize),

    #[error("expected a vector of length {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("vanishing polynomial is zero on the coset at position {0}")]
    VanishesOnCoset(usize),

    #[error("no evaluation domain of size {0} can be constructed over this field")]
    Unsupported(usize),
}

/// Errors related to polynomial arithmetic.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PolynomialError {
    #[error("division by the zero polynomial")]
    DivisionByZero,

    #[error("interpolation needs as many values as points: {points} points, {values} values")]
    InterpolationLengthMismatch { points: usize, values: usize },

    #[error("interpolation points must be distinct, point {0} repeats")]
    DuplicatePoint(usize),

    #[error("polynomial of degree {degree} does not fit a domain of size {domain_size}")]
    DegreeTooLarge { degree: usize, domain_size: usize },

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Errors raised while setting up or running the FRI prover.
///
/// A proof that fails to verify is not an error: the verifier returns `false`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FriError {
    #[error("invalid FRI parameters: {0}")]
    InvalidParams(String),

    #[error("expected {expected} polynomials in the batch, got {actual}")]
    BatchSizeMismatch { expected: usize, actual: usize },

    #[error("polynomial of degree {degree} exceeds the declared bound {max_degree}")]
    DegreeBoundExceeded { degree: usize, max_degree: usize },

    #[error("committed tree has {actual} leaves, the first FRI round needs {expected}")]
    TreeShapeMismatch { expected: usize, actual: usize },

    /// Every index of the first domain is excluded by the quotient denominators.
    #[error("no admissible query index left in a domain of size {0}")]
    NoAdmissibleQuery(usize),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Polynomial(#[from] PolynomialError),
}

/// Errors raised by the list polynomial commitment prover.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LpcError {
    #[error("at least one evaluation point is required")]
    NoPoints,

    #[error("evaluation point {0} appears more than once")]
    DuplicatePoint(usize),

    /// `g - U` is not divisible by the vanishing polynomial of the points:
    /// the claimed evaluations do not hold.
    #[error("quotient division left a non-zero remainder")]
    NonZeroRemainder,

    #[error("invalid LPC parameters: {0}")]
    InvalidParams(String),

    #[error(transparent)]
    Fri(#[from] FriError),

    #[error(transparent)]
    Polynomial(#[from] PolynomialError),
}

/// Top-level error type of the crate.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("polynomial error: {0}")]
    Polynomial(#[from] PolynomialError),

    #[error("FRI error: {0}")]
    Fri(#[from] FriError),

    #[error("LPC error: {0}")]
    Lpc(#[from] LpcError),

    /// Field element bytes that are not the canonical encoding.
    #[error("invalid field element encoding: {0}")]
    InvalidFieldElement(String),
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
