//! Units of measure (`kg`, `pcs`, ...). Stocktaking items refer to them by id.

use super::{Endpoint, Operation, Resource};
use crate::error::DocError;
use crate::model::{FieldDef, ModelDef};
use serde_json::json;

pub static UNIT: ModelDef = ModelDef {
    name: "unit",
    table: "units",
    path_segment: "units",
    fields: &[FieldDef::text("unit").required().unique().max_length(20)],
};

pub struct Units;

impl Resource for Units {
    fn model(&self) -> &'static ModelDef {
        &UNIT
    }

    fn endpoints(&self) -> Result<Vec<Endpoint>, DocError> {
        let unit1 = json!({"id": 1, "unit": "kg"});
        let unit2 = json!({"id": 2, "unit": "pcs"});
        Ok(vec![
            Endpoint::new(
                Operation::List,
                Operation::List
                    .doc("List units", "/units")
                    .response(json!([unit1, unit2]))
                    .build()?,
            ),
            Endpoint::new(
                Operation::Create,
                Operation::Create
                    .doc("Create unit", "/units")
                    .request(json!({"unit": "kg"}))
                    .response(&unit1)
                    .status_code(422, "{{ original }} / unit already exists")
                    .build()?,
            ),
            Endpoint::new(
                Operation::Retrieve,
                Operation::Retrieve
                    .doc("Get unit", "/units/1")
                    .item("unit")
                    .response(&unit1)
                    .build()?,
            ),
            Endpoint::new(
                Operation::Update,
                Operation::Update
                    .doc("Update unit", "/units/1")
                    .item("unit")
                    .request(json!({"unit": "g"}))
                    .response(json!({"id": 1, "unit": "g"}))
                    .status_code(422, "{{ original }} / unit already exists")
                    .build()?,
            ),
            Endpoint::new(
                Operation::Delete,
                Operation::Delete.doc("Delete unit", "/units/1").item("unit").build()?,
            ),
        ])
    }
}
