//! OpenAPI documentation definition.

use utoipa::OpenApi;

use crate::handlers::{HealthStatus, NamespaceEntry, NamespaceList};

#[derive(OpenApi)]
#[openapi(
    paths(crate::handlers::handle_health, crate::handlers::handle_namespaces),
    components(schemas(HealthStatus, NamespaceList, NamespaceEntry)),
    info(
        title = "kubemgr API",
        version = "1.0",
        description = "Namespaces generated under the output directory. Responses use the envelope {status, message, data}."
    )
)]
pub(crate) struct ApiDoc;
