use http::{
    HeaderValue,
    header::{
        ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
        ACCESS_CONTROL_ALLOW_ORIGIN,
    },
};
use tower::ServiceBuilder;
use tower::layer::util::{Identity, Stack};
use tower_http::{
    classify::ServerErrorsAsFailures, classify::SharedClassifier,
    set_header::SetResponseHeaderLayer, trace::TraceLayer,
};

type CorsHeader = SetResponseHeaderLayer<HeaderValue>;

pub type MiddlewareStack = ServiceBuilder<
    Stack<
        CorsHeader,
        Stack<
            CorsHeader,
            Stack<
                CorsHeader,
                Stack<
                    TraceLayer<SharedClassifier<ServerErrorsAsFailures>>,
                    Identity,
                >,
            >,
        >,
    >,
>;

/// Request tracing plus permissive CORS headers stamped on every response,
/// including 404s. `OPTIONS` is not answered here; it reaches the router
/// like any other method.
pub fn create_middleware_stack() -> MiddlewareStack {
    ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
}
