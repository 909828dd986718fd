pub(crate) mod dataset;
pub(crate) mod experiment;
