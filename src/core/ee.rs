//! Typed builders over Earth Engine algorithms.
//!
//! Each method only records a function invocation; nothing is computed
//! locally.

use crate::core::expression::{Expression, Node};
use crate::domain::model::VisParams;

/// Name Earth Engine's own clients give to the first `map` callback argument.
const MAPPING_VAR: &str = "_MAPPING_VAR_0_0";

#[derive(Debug, Clone, PartialEq)]
pub struct Image(Node);

#[derive(Debug, Clone, PartialEq)]
pub struct ImageCollection(Node);

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureCollection(Node);

#[derive(Debug, Clone, PartialEq)]
pub struct Filter(Node);

/// Operators accepted by `filter_metadata`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataOp {
    Equals,
    LessThan,
    Contains,
}

impl MetadataOp {
    fn function_name(self) -> &'static str {
        match self {
            MetadataOp::Equals => "Filter.equals",
            MetadataOp::LessThan => "Filter.lessThan",
            MetadataOp::Contains => "Filter.stringContains",
        }
    }
}

impl Filter {
    pub fn metadata(field: &str, op: MetadataOp, value: impl Into<serde_json::Value>) -> Self {
        Filter(Node::invoke(
            op.function_name(),
            [
                ("leftField", Node::constant(field)),
                ("rightValue", Node::constant(value)),
            ],
        ))
    }

    pub fn lt(field: &str, value: impl Into<serde_json::Value>) -> Self {
        Self::metadata(field, MetadataOp::LessThan, value)
    }

    /// Images whose acquisition time falls in `[start, end)`.
    pub fn date(start: &str, end: &str) -> Self {
        let range = Node::invoke(
            "DateRange",
            [("start", Node::constant(start)), ("end", Node::constant(end))],
        );
        Filter(Node::invoke(
            "Filter.dateRangeContains",
            [
                ("leftValue", range),
                ("rightField", Node::constant("system:time_start")),
            ],
        ))
    }

    /// Items intersecting the collection's merged geometry. The collection
    /// is promoted to a `Feature` first, as Earth Engine's clients do.
    pub fn bounds(geometry: &FeatureCollection) -> Self {
        let feature = Node::invoke(
            "Feature",
            [(
                "geometry",
                Node::invoke("Collection.geometry", [("collection", geometry.node().clone())]),
            )],
        );
        Filter(Node::invoke(
            "Filter.intersects",
            [("leftField", Node::constant(".all")), ("rightValue", feature)],
        ))
    }

    pub fn node(&self) -> &Node {
        &self.0
    }
}

impl FeatureCollection {
    pub fn load(table_id: &str) -> Self {
        FeatureCollection(Node::invoke(
            "Collection.loadTable",
            [("tableId", Node::constant(table_id))],
        ))
    }

    pub fn node(&self) -> &Node {
        &self.0
    }
}

impl ImageCollection {
    pub fn load(id: &str) -> Self {
        ImageCollection(Node::invoke(
            "ImageCollection.load",
            [("id", Node::constant(id))],
        ))
    }

    pub fn filter(self, filter: Filter) -> Self {
        ImageCollection(Node::invoke(
            "Collection.filter",
            [("collection", self.0), ("filter", filter.0)],
        ))
    }

    pub fn filter_date(self, start: &str, end: &str) -> Self {
        self.filter(Filter::date(start, end))
    }

    pub fn filter_metadata(
        self,
        field: &str,
        op: MetadataOp,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.filter(Filter::metadata(field, op, value))
    }

    pub fn filter_bounds(self, geometry: &FeatureCollection) -> Self {
        self.filter(Filter::bounds(geometry))
    }

    /// Apply `f` to every image on the server side.
    pub fn map<F>(self, f: F) -> Self
    where
        F: FnOnce(Image) -> Image,
    {
        let body = f(Image(Node::ArgumentReference(MAPPING_VAR.to_string())));
        ImageCollection(Node::invoke(
            "Collection.map",
            [
                ("collection", self.0),
                (
                    "baseAlgorithm",
                    Node::FunctionDefinition {
                        argument_names: vec![MAPPING_VAR.to_string()],
                        body: Box::new(body.0),
                    },
                ),
            ],
        ))
    }

    pub fn mosaic(self) -> Image {
        Image(Node::invoke(
            "ImageCollection.mosaic",
            [("collection", self.0)],
        ))
    }

    pub fn node(&self) -> &Node {
        &self.0
    }
}

impl Image {
    pub fn constant(value: impl Into<serde_json::Value>) -> Self {
        Image(Node::invoke("Image.constant", [("value", Node::constant(value))]))
    }

    pub fn select<S: AsRef<str>>(self, bands: &[S]) -> Self {
        Image(Node::invoke(
            "Image.select",
            [("input", self.0), ("bandSelectors", Node::strings(bands))],
        ))
    }

    pub fn gte(self, value: impl Into<serde_json::Value>) -> Self {
        self.binary("Image.gte", Image::constant(value))
    }

    pub fn lte(self, value: impl Into<serde_json::Value>) -> Self {
        self.binary("Image.lte", Image::constant(value))
    }

    pub fn and(self, other: Image) -> Self {
        self.binary("Image.and", other)
    }

    pub fn update_mask(self, mask: Image) -> Self {
        Image(Node::invoke(
            "Image.updateMask",
            [("image", self.0), ("mask", mask.0)],
        ))
    }

    pub fn clip(self, geometry: &FeatureCollection) -> Self {
        Image(Node::invoke(
            "Image.clip",
            [("input", self.0), ("geometry", geometry.node().clone())],
        ))
    }

    pub fn self_mask(self) -> Self {
        Image(Node::invoke("Image.selfMask", [("image", self.0)]))
    }

    /// Bake the visualization parameters into an RGB image. The output
    /// format is not part of the expression.
    pub fn visualize(self, vis: &VisParams) -> Self {
        let mut args = vec![("image", self.0)];
        if !vis.bands.is_empty() {
            args.push(("bands", Node::strings(vis.bands.as_slice())));
        }
        if let Some(min) = vis.min {
            args.push(("min", Node::constant(min)));
        }
        if let Some(max) = vis.max {
            args.push(("max", Node::constant(max)));
        }
        if let Some(opacity) = vis.opacity {
            args.push(("opacity", Node::constant(opacity)));
        }
        if !vis.palette.is_empty() {
            args.push(("palette", Node::strings(vis.palette.as_slice())));
        }
        Image(Node::invoke("Image.visualize", args))
    }

    pub fn expression(&self) -> Expression {
        Expression::encode(&self.0)
    }

    pub fn node(&self) -> &Node {
        &self.0
    }

    fn binary(self, function: &str, other: Image) -> Self {
        Image(Node::invoke(
            function,
            [("image1", self.0), ("image2", other.0)],
        ))
    }
}
