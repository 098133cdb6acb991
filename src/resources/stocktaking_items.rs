//! Stocktaking items: a counted quantity of something, measured in a unit.

use super::{Endpoint, Operation, Resource};
use crate::error::DocError;
use crate::model::{FieldDef, ModelDef};
use serde_json::json;

pub static STOCKTAKING_ITEM: ModelDef = ModelDef {
    name: "stocktaking item",
    table: "stocktaking_items",
    path_segment: "stocktaking-items",
    fields: &[
        FieldDef::text("name").required().unique().max_length(100),
        // id of a unit
        FieldDef::integer("unit").required(),
        FieldDef::number("quantity").required(),
        FieldDef::boolean("counted"),
    ],
};

pub struct StocktakingItems;

impl Resource for StocktakingItems {
    fn model(&self) -> &'static ModelDef {
        &STOCKTAKING_ITEM
    }

    fn endpoints(&self) -> Result<Vec<Endpoint>, DocError> {
        let item1 = json!({"id": 1, "name": "screw", "unit": 2, "quantity": 120, "counted": true});
        let item2 = json!({"id": 2, "name": "flour", "unit": 1, "quantity": 12.5, "counted": false});
        let set1 = json!({"name": "screw", "unit": 2, "quantity": 120, "counted": true});
        Ok(vec![
            Endpoint::new(
                Operation::List,
                Operation::List
                    .doc("List stocktaking items", "/stocktaking-items")
                    .response(json!([item1, item2]))
                    .build()?,
            ),
            Endpoint::new(
                Operation::Create,
                Operation::Create
                    .doc("Create stocktaking item", "/stocktaking-items")
                    .request(&set1)
                    .response(&item1)
                    .build()?,
            ),
            Endpoint::new(
                Operation::Retrieve,
                Operation::Retrieve
                    .doc("Get stocktaking item", "/stocktaking-items/1")
                    .param("id", "ID of selected stocktaking item")
                    .status_code(404, "there is no item")
                    .response(&item1)
                    .build()?,
            ),
            Endpoint::new(
                Operation::Update,
                Operation::Update
                    .doc("Update stocktaking item", "/stocktaking-items/1")
                    .param("id", "ID of selected stocktaking item for change")
                    .request(&set1)
                    .response(&item1)
                    .build()?,
            ),
            Endpoint::new(
                Operation::Delete,
                Operation::Delete
                    .doc("Delete stocktaking item", "/stocktaking-items/1")
                    .param("id", "ID of selected stocktaking item")
                    .build()?,
            ),
        ])
    }
}
