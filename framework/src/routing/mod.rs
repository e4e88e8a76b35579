mod macros;
mod router;

pub use macros::{
    // Internal function used by the route macros (hidden from docs)
    __route_impl, validate_route_path, GroupDef, GroupRoute, RouteDefBuilder,
};
pub use router::{BoxedHandler, HttpMethod, RouteBuilder, RouteMatch, Router};
