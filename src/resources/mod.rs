//! Resources served by the API. Each one pairs a model with the documented endpoints
//! that expose it; the same endpoint list drives routing and documentation.

mod customers;
mod stocktaking_items;
mod units;

pub use customers::{Customers, CUSTOMER};
pub use stocktaking_items::{StocktakingItems, STOCKTAKING_ITEM};
pub use units::{Units, UNIT};

use crate::docs::{Documented, ResourceDoc, ResourceDocBuilder};
use crate::error::DocError;
use crate::model::ModelDef;

/// The generic handler an endpoint dispatches to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Create,
    Retrieve,
    Update,
    Delete,
}

impl Operation {
    pub fn method(&self) -> &'static str {
        match self {
            Operation::List | Operation::Retrieve => "GET",
            Operation::Create => "POST",
            Operation::Update => "PUT",
            Operation::Delete => "DELETE",
        }
    }

    /// Item operations address one record: `/<resource>/:id`.
    pub fn is_item(&self) -> bool {
        matches!(self, Operation::Retrieve | Operation::Update | Operation::Delete)
    }

    /// Codes every endpoint of this kind can answer with; descriptions are auto-filled.
    pub fn status_codes(&self) -> &'static [u16] {
        match self {
            Operation::List => &[200],
            Operation::Create => &[200, 422],
            Operation::Retrieve | Operation::Delete => &[200, 404],
            Operation::Update => &[200, 404, 422],
        }
    }

    /// Descriptor builder with this operation's verb and status codes filled in.
    pub fn doc(&self, title: &str, url_tail: &str) -> ResourceDocBuilder {
        self.status_codes()
            .iter()
            .fold(ResourceDoc::builder(title, self.method(), url_tail), |b, &code| {
                b.status_code(code, "")
            })
    }
}

/// One documented handler of a resource.
#[derive(Clone, Debug)]
pub struct Endpoint {
    pub operation: Operation,
    pub doc: ResourceDoc,
}

impl Endpoint {
    pub fn new(operation: Operation, doc: ResourceDoc) -> Self {
        Endpoint { operation, doc }
    }
}

impl Documented for Endpoint {
    fn resource_doc(&self) -> &ResourceDoc {
        &self.doc
    }
}

pub trait Resource: Send + Sync {
    fn model(&self) -> &'static ModelDef;

    /// Endpoints in documentation order. Fails only on a malformed descriptor.
    fn endpoints(&self) -> Result<Vec<Endpoint>, DocError>;
}

/// Every resource the service exposes, in documentation order.
pub fn all() -> Vec<Box<dyn Resource>> {
    vec![Box::new(Customers), Box::new(Units), Box::new(StocktakingItems)]
}

/// Models of every resource, for schema bootstrap.
pub fn models() -> Vec<&'static ModelDef> {
    all().iter().map(|r| r.model()).collect()
}
