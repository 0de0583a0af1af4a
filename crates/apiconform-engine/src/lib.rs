//! apiconform-engine: OpenAPI response conformance engine
//!
//! Builds an immutable index from an OpenAPI 3.x document, matches concrete
//! requests against its path templates, resolves the declared response for a
//! (method, status, content-type) triple, and validates bodies against the
//! resolved schema.

mod error;
pub mod resolve;
pub mod route;
pub mod spec;
pub mod validate;
mod validator;

pub use error::SpecError;
pub use resolve::{BodyExpectation, MatchResult, ResolvedResponse, resolve};
pub use route::{RouteMatch, match_route};
pub use spec::{
    CompiledSchema, HttpMethod, IndexOptions, MediaTypeSpec, OperationSpec, PathItem,
    PathTemplate, ResponseSpec, SpecDocument, StatusKey, load_spec, parse_spec,
};
pub use validate::{ValidationOutcome, validate};
pub use validator::ResponseValidator;
