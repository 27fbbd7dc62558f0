pub mod churn;
pub mod micro;
