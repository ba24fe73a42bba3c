use ark_ff::PrimeField;
use serde::{Deserialize, Serialize};

use crate::errors::FriError;
use crate::math::domain::Radix2Domain;

/// User-facing FRI configuration, typically deserialized from a config file.
///
/// Turned into [`FriParams`] with [`FriParams::from_config`], which validates it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FriConfig {
    /// Committed polynomials have degree at most `max_degree`.
    pub max_degree: usize,
    /// The first evaluation domain has `2^log_domain_size` points.
    pub log_domain_size: usize,
    /// Round `i` folds the domain by `2^step_list[i]`.
    pub step_list: Vec<usize>,
    /// Number of queries.
    pub lambda: usize,
}

impl Default for FriConfig {
    fn default() -> Self {
        Self {
            max_degree: 255,
            log_domain_size: 10,
            step_list: vec![2, 2, 2],
            lambda: 32,
        }
    }
}

/// Validated FRI parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FriParams<F> {
    pub max_degree: usize,
    pub step_list: Vec<usize>,
    /// `domains[0]` is the commitment domain and `domains[i + 1]` is
    /// `domains[i]` raised to the power `2^step_list[i]`; the last one hosts the
    /// final polynomial.
    pub domains: Vec<Radix2Domain<F>>,
    pub lambda: usize,
    pub two_inv: F,
}

impl<F: PrimeField> FriParams<F> {
    pub fn new(
        max_degree: usize,
        log_domain_size: usize,
        step_list: Vec<usize>,
        lambda: usize,
    ) -> Result<Self, FriError> {
        if step_list.is_empty() {
            return Err(FriError::InvalidParams("step list is empty".to_string()));
        }
        if step_list.contains(&0) {
            return Err(FriError::InvalidParams("every step must fold at least once".to_string()));
        }
        if lambda == 0 {
            return Err(FriError::InvalidParams("at least one query is required".to_string()));
        }
        if log_domain_size >= usize::BITS as usize {
            return Err(FriError::InvalidParams(format!(
                "domain of size 2^{log_domain_size} does not fit in memory"
            )));
        }
        let total_steps: usize = step_list.iter().sum();
        if total_steps >= log_domain_size {
            return Err(FriError::InvalidParams(format!(
                "folding by 2^{total_steps} leaves fewer than 2 points of a domain of size 2^{log_domain_size}"
            )));
        }
        let domain_size = 1usize << log_domain_size;
        if max_degree >= domain_size {
            return Err(FriError::InvalidParams(format!(
                "degree bound {max_degree} needs a domain larger than {domain_size}"
            )));
        }

        let mut domains = Vec::with_capacity(step_list.len() + 1);
        domains.push(Radix2Domain::new(domain_size)?);
        for (i, &steps) in step_list.iter().enumerate() {
            let next = domains[i].square(steps)?;
            domains.push(next);
        }

        let two_inv = F::from(2u64)
            .inverse()
            .ok_or_else(|| FriError::InvalidParams("field of characteristic 2".to_string()))?;

        Ok(Self {
            max_degree,
            step_list,
            domains,
            lambda,
            two_inv,
        })
    }

    pub fn from_config(config: &FriConfig) -> Result<Self, FriError> {
        Self::new(
            config.max_degree,
            config.log_domain_size,
            config.step_list.clone(),
            config.lambda,
        )
    }

    /// Number of folding rounds.
    pub fn rounds(&self) -> usize {
        self.step_list.len()
    }

    pub fn initial_domain(&self) -> &Radix2Domain<F> {
        &self.domains[0]
    }

    pub fn final_domain(&self) -> &Radix2Domain<F> {
        &self.domains[self.domains.len() - 1]
    }

    /// Number of Merkle leaves (cosets) in round `round`.
    pub fn leaf_count(&self, round: usize) -> usize {
        self.domains[round].size >> self.step_list[round]
    }

    /// Degree bound of the final polynomial: `ceil((max_degree + 1) / 2^Σs) - 1`.
    pub fn final_degree_bound(&self) -> usize {
        let total_steps: usize = self.step_list.iter().sum();
        (self.max_degree + 1).div_ceil(1 << total_steps) - 1
    }
}
