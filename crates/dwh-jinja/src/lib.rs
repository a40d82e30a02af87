//! dwh-jinja - Named-parameter templating for warehouse SQL
//!
//! Statements are written as Jinja templates that reference configuration
//! values by name (`{{ iam_role_arn }}`, `{{ log_data }}`, ...). Rendering is
//! strict: a template that mentions a parameter nobody supplied fails instead
//! of producing SQL with a hole in it.

pub mod environment;
pub mod error;

pub use environment::{TemplateEnvironment, TemplateParams};
pub use error::{JinjaError, JinjaResult};
