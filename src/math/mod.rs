//! Mathematical building blocks: field encoding, polynomials, evaluation
//! domains and the FRI folding primitives.

pub mod domain;
pub mod field;
pub mod fri;
pub mod polynomial;
