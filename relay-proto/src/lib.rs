pub mod builder;
pub mod error;
pub mod query;

pub use builder::{build_a_record_response, build_nxdomain_in_place, build_servfail_in_place, rewrite_id};
pub use error::ParseError;
pub use query::QueryView;
