use crate::error::CoreError;
use crate::models::PlaceRef;

/// Default number of fractional degrees kept when keying a place by
/// coordinates. Five decimal places is roughly one metre of resolution,
/// enough to absorb GPS jitter between submissions for the same address.
pub const DEFAULT_COORD_PRECISION: u32 = 5;

/// Compute the stable identity key for a place reference.
///
/// An external provider id wins when present; otherwise the coordinate
/// pair is rounded into a grid cell so nearby readings collapse onto the
/// same key. References carrying neither are rejected before any write.
pub fn place_key(place_ref: &PlaceRef, precision: u32) -> Result<String, CoreError> {
    if let Some(external_id) = place_ref.external_id.as_deref() {
        let trimmed = external_id.trim();
        if !trimmed.is_empty() {
            return Ok(format!("ext:{trimmed}"));
        }
    }

    match (place_ref.lat, place_ref.lng) {
        (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => {
            let (lat_cell, lng_cell) = coordinate_cell(lat, lng, precision);
            Ok(format!("geo:{lat_cell}:{lng_cell}"))
        }
        _ => Err(CoreError::InvalidReference),
    }
}

/// Round a coordinate pair onto the fixed-precision grid.
///
/// Returns scaled integers so the key is exact (no float formatting
/// ambiguity across platforms or restarts).
pub fn coordinate_cell(lat: f64, lng: f64, precision: u32) -> (i64, i64) {
    let scale = 10_f64.powi(precision as i32);
    ((lat * scale).round() as i64, (lng * scale).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geo_ref(lat: f64, lng: f64) -> PlaceRef {
        PlaceRef {
            external_id: None,
            formatted_address: None,
            lat: Some(lat),
            lng: Some(lng),
        }
    }

    #[test]
    fn test_external_id_wins_over_coordinates() {
        let place_ref = PlaceRef {
            external_id: Some("ChIJgUbEo1".to_string()),
            formatted_address: Some("123 Main St".to_string()),
            lat: Some(40.7128),
            lng: Some(-74.0060),
        };

        let key = place_key(&place_ref, DEFAULT_COORD_PRECISION).unwrap();
        assert_eq!(key, "ext:ChIJgUbEo1");
    }

    #[test]
    fn test_same_external_id_same_key_regardless_of_address() {
        let a = PlaceRef {
            external_id: Some("prov-42".to_string()),
            formatted_address: Some("Old Street 1".to_string()),
            ..PlaceRef::default()
        };
        let b = PlaceRef {
            external_id: Some("prov-42".to_string()),
            formatted_address: Some("Old Street 1, Rear Building".to_string()),
            ..PlaceRef::default()
        };

        assert_eq!(
            place_key(&a, DEFAULT_COORD_PRECISION).unwrap(),
            place_key(&b, DEFAULT_COORD_PRECISION).unwrap()
        );
    }

    #[test]
    fn test_jitter_within_cell_shares_key() {
        // ~1e-6 degrees apart: inside the same 5-decimal cell
        let a = place_key(&geo_ref(52.520008, 13.404954), 5).unwrap();
        let b = place_key(&geo_ref(52.520011, 13.404950), 5).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_cells_get_different_keys() {
        let a = place_key(&geo_ref(52.52000, 13.40495), 5).unwrap();
        let b = place_key(&geo_ref(52.52100, 13.40495), 5).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_blank_external_id_falls_back_to_coordinates() {
        let place_ref = PlaceRef {
            external_id: Some("   ".to_string()),
            lat: Some(1.0),
            lng: Some(2.0),
            ..PlaceRef::default()
        };

        let key = place_key(&place_ref, 5).unwrap();
        assert!(key.starts_with("geo:"));
    }

    #[test]
    fn test_incomplete_reference_is_rejected() {
        let missing_lng = PlaceRef {
            lat: Some(52.52),
            ..PlaceRef::default()
        };
        assert!(matches!(
            place_key(&missing_lng, 5),
            Err(CoreError::InvalidReference)
        ));

        assert!(matches!(
            place_key(&PlaceRef::default(), 5),
            Err(CoreError::InvalidReference)
        ));
    }

    #[test]
    fn test_non_finite_coordinates_are_rejected() {
        let bad = geo_ref(f64::NAN, 13.4);
        assert!(matches!(place_key(&bad, 5), Err(CoreError::InvalidReference)));
    }

    #[test]
    fn test_cell_rounding_is_exact() {
        assert_eq!(coordinate_cell(52.520008, 13.404954, 5), (5252001, 1340495));
        assert_eq!(coordinate_cell(-0.000004, 0.000004, 5), (0, 0));
    }
}
