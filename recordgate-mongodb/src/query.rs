//! Filter translation from the recordgate filter tree to MongoDB query syntax.
//!
//! This module translates abstract [`Filter`] expressions into BSON query
//! documents for execution by the MongoDB query engine.

use bson::{Bson, Document, doc};

use recordgate_core::{
    error::GatewayError,
    filter::{FieldOp, Filter, FilterVisitor},
};

/// Translates recordgate filters into MongoDB query documents.
pub(crate) struct MongoFilterTranslator;

impl MongoFilterTranslator {
    pub(crate) fn translate(filter: &Filter) -> Result<Document, GatewayError> {
        MongoFilterTranslator.visit_filter(filter)
    }
}

impl FilterVisitor for MongoFilterTranslator {
    type Output = Document;
    type Error = GatewayError;

    fn visit_and(&mut self, filters: &[Filter]) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            "$and": filters
                .iter()
                .map(|filter| self.visit_filter(filter))
                .collect::<Result<Vec<_>, _>>()?,
        })
    }

    fn visit_or(&mut self, filters: &[Filter]) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            "$or": filters
                .iter()
                .map(|filter| self.visit_filter(filter))
                .collect::<Result<Vec<_>, _>>()?,
        })
    }

    fn visit_not(&mut self, filter: &Filter) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            "$nor": [self.visit_filter(filter)?],
        })
    }

    fn visit_exists(&mut self, field: &str, should_exist: bool) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            field: { "$exists": should_exist },
        })
    }

    fn visit_field(&mut self, field: &str, op: &FieldOp, value: &Bson) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            field: match op {
                FieldOp::Eq => doc! { "$eq": value },
                FieldOp::Ne => doc! { "$ne": value },
                FieldOp::Gt => doc! { "$gt": value },
                FieldOp::Gte => doc! { "$gte": value },
                FieldOp::Lt => doc! { "$lt": value },
                FieldOp::Lte => doc! { "$lte": value },
                FieldOp::Contains => match value {
                    Bson::String(s) => doc! { "$regex": format!(".*{}.*", s), "$options": "i" },
                    Bson::Array(arr) => doc! { "$all": arr },
                    other => doc! { "$elemMatch": { "$eq": other } },
                },
            }
        })
    }
}
