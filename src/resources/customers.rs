//! Customers that stocktaking is done for.

use super::{Endpoint, Operation, Resource};
use crate::error::DocError;
use crate::model::{FieldDef, ModelDef};
use serde_json::{json, Value};

pub static CUSTOMER: ModelDef = ModelDef {
    name: "customer",
    table: "customers",
    path_segment: "customers",
    fields: &[
        FieldDef::text("name").required().unique().max_length(100),
        FieldDef::text("email").pattern(r"^[^@\s]+@[^@\s]+$"),
        FieldDef::text("phone"),
    ],
};

pub struct Customers;

fn customer(id: i64, name: &str) -> Value {
    json!({"id": id, "name": name, "email": format!("{}@example.com", name), "phone": null})
}

fn request(name: &str) -> Value {
    json!({"name": name, "email": format!("{}@example.com", name)})
}

impl Resource for Customers {
    fn model(&self) -> &'static ModelDef {
        &CUSTOMER
    }

    fn endpoints(&self) -> Result<Vec<Endpoint>, DocError> {
        Ok(vec![
            Endpoint::new(
                Operation::List,
                Operation::List
                    .doc("List customers", "/customers")
                    .response(json!([customer(1, "foo"), customer(2, "bar")]))
                    .build()?,
            ),
            Endpoint::new(
                Operation::Create,
                Operation::Create
                    .doc("Create customer", "/customers")
                    .request(request("foo"))
                    .response(customer(1, "foo"))
                    .status_code(422, "{{ original }} / customer already exists")
                    .build()?,
            ),
            Endpoint::new(
                Operation::Retrieve,
                Operation::Retrieve
                    .doc("Get customer", "/customers/1")
                    .item("customer")
                    .response(customer(1, "foo"))
                    .build()?,
            ),
            Endpoint::new(
                Operation::Update,
                Operation::Update
                    .doc("Update customer", "/customers/1")
                    .item("customer")
                    .request(request("new_foo"))
                    .response(customer(1, "new_foo"))
                    .status_code(422, "{{ original }} / customer already exists")
                    .build()?,
            ),
            Endpoint::new(
                Operation::Delete,
                Operation::Delete
                    .doc("Delete customer", "/customers/1")
                    .item("customer")
                    .build()?,
            ),
        ])
    }
}
