pub mod availability;
pub mod distance;
pub mod performance;
pub mod ranker;
pub mod scoring;
pub mod skill;
pub mod workload;

#[cfg(test)]
pub(crate) mod test_support;
