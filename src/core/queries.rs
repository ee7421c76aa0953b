//! The two fixed map queries served by the proxy.

use crate::core::ee::{FeatureCollection, Filter, Image, ImageCollection, MetadataOp};
use crate::domain::model::{ImageFormat, VisParams};

pub const SENTINEL2_COLLECTION: &str = "COPERNICUS/S2_SR";
pub const SENTINEL2_MAX_CLOUD_PERCENTAGE: i64 = 20;
pub const SENTINEL2_START_DATE: &str = "2019-01-01";
pub const SENTINEL2_END_DATE: &str = "2020-12-31";

pub const RADD_COLLECTION: &str = "projects/radar-wur/raddalert/v1";
pub const RADD_BOUNDARY_TABLE: &str = "users/adhityadhyaksa/PPRP_Boundary";
pub const RADD_GEOGRAPHY: &str = "asia";
/// Alert dates are encoded as YYDDD, so 24000..=24365 covers 2024.
pub const RADD_START_DAY: i64 = 24000;
pub const RADD_END_DAY: i64 = 24365;

#[derive(Debug, Clone, PartialEq)]
pub struct MapQuery {
    pub image: Image,
    pub vis: VisParams,
}

/// Cloud-filtered Sentinel-2 true-colour mosaic.
pub fn sentinel2_composite() -> MapQuery {
    let image = ImageCollection::load(SENTINEL2_COLLECTION)
        .filter(Filter::lt(
            "CLOUDY_PIXEL_PERCENTAGE",
            SENTINEL2_MAX_CLOUD_PERCENTAGE,
        ))
        .filter_date(SENTINEL2_START_DATE, SENTINEL2_END_DATE)
        .mosaic();

    let vis = VisParams {
        bands: vec!["B4".into(), "B3".into(), "B2".into()],
        min: Some(0.0),
        max: Some(2000.0),
        ..Default::default()
    };

    MapQuery { image, vis }
}

/// RADD forest-disturbance alerts inside the boundary, restricted to the
/// configured alert-date window.
pub fn radd_alerts() -> MapQuery {
    let boundary = FeatureCollection::load(RADD_BOUNDARY_TABLE);

    let image = ImageCollection::load(RADD_COLLECTION)
        .filter_metadata("geography", MetadataOp::Equals, RADD_GEOGRAPHY)
        .filter_metadata("layer", MetadataOp::Contains, "alert")
        .map(|alert| {
            let date = alert.clone().select(&["Date"]);
            let in_window = date
                .clone()
                .gte(RADD_START_DAY)
                .and(date.lte(RADD_END_DAY));
            alert.update_mask(in_window).clip(&boundary).self_mask()
        })
        .filter_bounds(&boundary)
        .mosaic();

    let vis = VisParams {
        bands: vec!["Alert".into()],
        min: Some(2.0),
        max: Some(3.0),
        opacity: Some(1.0),
        palette: vec!["00c5ff".into(), "ff1313".into()],
        format: Some(ImageFormat::Png),
    };

    MapQuery { image, vis }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::expression::Node;
    use crate::utils::validation::Validate;

    #[test]
    fn test_sentinel2_query_shape() {
        let query = sentinel2_composite();
        let root = query.image.node();
        assert_eq!(root.function_name(), Some("ImageCollection.mosaic"));

        // mosaic <- filter(date) <- filter(cloud) <- load
        let date_filtered = root.argument("collection").unwrap();
        let date_filter = date_filtered.argument("filter").unwrap();
        assert_eq!(date_filter.function_name(), Some("Filter.dateRangeContains"));

        let cloud_filtered = date_filtered.argument("collection").unwrap();
        let cloud_filter = cloud_filtered.argument("filter").unwrap();
        assert_eq!(cloud_filter.function_name(), Some("Filter.lessThan"));
        assert_eq!(cloud_filter.argument("rightValue"), Some(&Node::constant(20)));

        let load = cloud_filtered.argument("collection").unwrap();
        assert_eq!(load.argument("id"), Some(&Node::constant(SENTINEL2_COLLECTION)));

        assert!(query.vis.validate().is_ok());
        assert_eq!(query.vis.file_format(), ImageFormat::AutoJpegPng);
    }

    #[test]
    fn test_radd_query_shape() {
        let query = radd_alerts();
        let root = query.image.node();
        assert_eq!(root.function_name(), Some("ImageCollection.mosaic"));

        let bounded = root.argument("collection").unwrap();
        let bounds = bounded.argument("filter").unwrap();
        assert_eq!(bounds.function_name(), Some("Filter.intersects"));
        let feature = bounds.argument("rightValue").unwrap();
        assert_eq!(feature.function_name(), Some("Feature"));
        assert_eq!(
            feature
                .argument("geometry")
                .and_then(|g| g.argument("collection"))
                .and_then(|fc| fc.argument("tableId")),
            Some(&Node::constant(RADD_BOUNDARY_TABLE))
        );

        let mapped = bounded.argument("collection").unwrap();
        assert_eq!(mapped.function_name(), Some("Collection.map"));

        let by_layer = mapped.argument("collection").unwrap();
        assert_eq!(
            by_layer.argument("filter").and_then(|f| f.function_name()),
            Some("Filter.stringContains")
        );
        let by_geography = by_layer.argument("collection").unwrap();
        assert_eq!(
            by_geography.argument("filter").and_then(|f| f.function_name()),
            Some("Filter.equals")
        );

        assert!(query.vis.validate().is_ok());
        assert_eq!(query.vis.file_format(), ImageFormat::Png);
    }

    #[test]
    fn test_radd_map_body_masks_clips_and_self_masks() {
        let query = radd_alerts();
        let expr = query.image.expression();
        // 外層表達式 + map 的函式本體
        assert_eq!(expr.values.len(), 2);

        let body = &expr.values["1"]["functionInvocationValue"];
        assert_eq!(body["functionName"], "Image.selfMask");
        let clip = &body["arguments"]["image"]["functionInvocationValue"];
        assert_eq!(clip["functionName"], "Image.clip");
        let masked = &clip["arguments"]["input"]["functionInvocationValue"];
        assert_eq!(masked["functionName"], "Image.updateMask");
        assert_eq!(
            masked["arguments"]["mask"]["functionInvocationValue"]["functionName"],
            "Image.and"
        );
    }
}
