//! Resource registration: every documented endpoint becomes a route and a doc table entry.

use crate::config::AppConfig;
use crate::docs::{DocTable, Documented};
use crate::error::{AppError, DocError};
use crate::handlers;
use crate::resources::{self, Endpoint, Operation, Resource};
use crate::routes::common_routes;
use crate::service::Schema;
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, Path, State};
use axum::routing::{on, MethodFilter, MethodRouter};
use axum::{Json, Router};
use serde_json::Value;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;

/// Collects routes under `/<app>/api` together with the descriptor of each one.
pub struct ApiBuilder {
    prefix: String,
    router: Router<AppState>,
    docs: DocTable,
}

impl ApiBuilder {
    pub fn new(config: &AppConfig) -> Self {
        ApiBuilder {
            prefix: config.api_prefix(),
            router: Router::new(),
            docs: DocTable::new(),
        }
    }

    /// Register all endpoints of `resource`. Fails on a malformed descriptor or a
    /// `(method, path)` pair that is already taken.
    pub fn resource<R: Resource + ?Sized>(mut self, resource: &R) -> Result<Self, DocError> {
        let schema = Schema::new(resource.model());
        for endpoint in resource.endpoints()? {
            let doc = endpoint.resource_doc();
            if doc.method() != endpoint.operation.method() {
                return Err(DocError::MethodMismatch {
                    title: doc.title().to_string(),
                    method: doc.method().to_string(),
                    expected: endpoint.operation.method(),
                });
            }
            let method = doc.http_method()?;
            let filter = MethodFilter::try_from(method.clone())
                .map_err(|_| DocError::InvalidMethod(method.to_string()))?;
            let path = self.path_for(schema, &endpoint);
            self.docs.insert(method, path.clone(), endpoint.doc)?;
            self.router = self.router.route(&path, method_router(endpoint.operation, filter, schema));
            tracing::debug!(path = %path, operation = ?endpoint.operation, "route registered");
        }
        Ok(self)
    }

    fn path_for(&self, schema: Schema, endpoint: &Endpoint) -> String {
        let collection = format!("{}/{}", self.prefix, schema.model().path_segment);
        if endpoint.operation.is_item() {
            format!("{}/:id", collection)
        } else {
            collection
        }
    }

    pub fn finish(self) -> (Router<AppState>, DocTable) {
        (self.router, self.docs)
    }
}

fn method_router(operation: Operation, filter: MethodFilter, schema: Schema) -> MethodRouter<AppState> {
    match operation {
        Operation::List => on(filter, move |State(state): State<AppState>| async move {
            handlers::list(state, schema).await
        }),
        Operation::Create => on(
            filter,
            move |State(state): State<AppState>, body: Result<Json<Value>, JsonRejection>| async move {
                handlers::create(state, schema, json_body(body)?).await
            },
        ),
        Operation::Retrieve => on(
            filter,
            move |State(state): State<AppState>, Path(id): Path<String>| async move {
                handlers::read(state, schema, id).await
            },
        ),
        Operation::Update => on(
            filter,
            move |State(state): State<AppState>,
                  Path(id): Path<String>,
                  body: Result<Json<Value>, JsonRejection>| async move {
                handlers::update(state, schema, id, json_body(body)?).await
            },
        ),
        Operation::Delete => on(
            filter,
            move |State(state): State<AppState>, Path(id): Path<String>| async move {
                handlers::delete(state, schema, id).await
            },
        ),
    }
}

/// A body that is not JSON at all is a malformed request; shape problems are the contract's job.
fn json_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    body.map(|Json(v)| v).map_err(|e| AppError::BadRequest(e.body_text()))
}

/// The full application: common routes, every resource, body limit, state.
pub fn app(state: AppState) -> Result<(Router, DocTable), AppError> {
    let mut builder = ApiBuilder::new(&state.config);
    for resource in resources::all() {
        builder = builder.resource(resource.as_ref())?;
    }
    let (api, docs) = builder.finish();
    let router = Router::new()
        .merge(common_routes())
        .merge(api)
        .layer(
            ServiceBuilder::new()
                .layer(DefaultBodyLimit::disable())
                .layer(RequestBodyLimitLayer::new(state.config.body_limit)),
        )
        .with_state(state);
    tracing::info!(routes = docs.len(), "api routes registered");
    Ok((router, docs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{Units, UNIT};
    use axum::http::Method;

    struct Twice;

    impl Resource for Twice {
        fn model(&self) -> &'static crate::model::ModelDef {
            &UNIT
        }

        fn endpoints(&self) -> Result<Vec<Endpoint>, DocError> {
            let doc = Operation::List.doc("List", "/units").build()?;
            Ok(vec![
                Endpoint::new(Operation::List, doc.clone()),
                Endpoint::new(Operation::List, doc),
            ])
        }
    }

    struct Mislabelled;

    impl Resource for Mislabelled {
        fn model(&self) -> &'static crate::model::ModelDef {
            &UNIT
        }

        fn endpoints(&self) -> Result<Vec<Endpoint>, DocError> {
            let doc = Operation::Delete.doc("Delete unit", "/units/1").build()?;
            Ok(vec![Endpoint::new(Operation::Create, doc)])
        }
    }

    #[test]
    fn verb_must_match_the_handler() {
        let config = AppConfig::default();
        let err = ApiBuilder::new(&config).resource(&Mislabelled).err();
        assert!(matches!(
            err,
            Some(DocError::MethodMismatch { method, expected: "POST", .. }) if method == "DELETE"
        ));
    }

    #[test]
    fn endpoints_are_recorded_under_their_route() {
        let config = AppConfig::default();
        let (_, docs) = ApiBuilder::new(&config).resource(&Units).unwrap().finish();
        assert_eq!(docs.len(), 5);
        assert_eq!(
            docs.get(&Method::GET, "/stocktake/api/units").map(|d| d.title()),
            Some("List units")
        );
        assert!(docs.get(&Method::PUT, "/stocktake/api/units/:id").is_some());
        assert!(docs.get(&Method::PUT, "/stocktake/api/units").is_none());
    }

    #[test]
    fn duplicate_route_is_rejected() {
        let config = AppConfig::default();
        let err = ApiBuilder::new(&config).resource(&Twice).err();
        assert!(matches!(err, Some(DocError::DuplicateRoute { .. })));
    }
}
