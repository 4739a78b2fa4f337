pub mod aws_polly;
pub mod provider;
pub mod types;
