pub mod join_set;
pub mod paths;

pub const FILTER_SPEC: &str = "debug,h2=info,hyper=info,hyper_util=info,reqwest=info,rustls=info";
