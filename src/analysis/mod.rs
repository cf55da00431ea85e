// Pure computations: experiment sizing and backend result canonicalization
mod normalizer;
mod size_estimator;

pub use normalizer::ResultNormalizer;
pub use size_estimator::SizeEstimator;
