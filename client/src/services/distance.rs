//! Great-circle distance and service-radius checks.

use qtty::Kilometers;

use crate::api::Coordinates;

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points, rounded to 2 decimal places.
pub fn haversine_distance(a: &Coordinates, b: &Coordinates) -> Kilometers {
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);
    // Float error can push h past 1 for near-antipodal points.
    let central = 2.0 * h.min(1.0).sqrt().asin();

    Kilometers::new((EARTH_RADIUS_KM * central * 100.0).round() / 100.0)
}

/// Outcome of checking a service address against a provider's radius.
#[derive(Debug, Clone, PartialEq)]
pub enum RadiusCheck {
    /// The service declares no radius; anywhere goes.
    NoRadius,
    /// A radius is declared but one of the coordinate pairs is unknown.
    /// This is the only outcome that blocks progression.
    MissingCoordinates,
    Within {
        distance: Kilometers,
        radius: Kilometers,
    },
    Outside {
        distance: Kilometers,
        radius: Kilometers,
    },
}

impl RadiusCheck {
    /// Whether the wizard must refuse to advance.
    pub fn blocks_progress(&self) -> bool {
        matches!(self, Self::MissingCoordinates)
    }

    /// Non-blocking warning text, if any.
    pub fn warning(&self) -> Option<String> {
        match self {
            Self::Outside { distance, radius } => Some(format!(
                "This address is {:.2} km away, outside the provider's {:.0} km service area. \
                 The provider may decline the request.",
                distance.value(),
                radius.value()
            )),
            _ => None,
        }
    }
}

/// Classify a candidate address against the declared service radius.
///
/// A non-positive radius counts as undeclared, matching services that store
/// zero to mean "no limit".
pub fn check_service_radius(
    radius: Option<Kilometers>,
    provider: Option<&Coordinates>,
    address: Option<&Coordinates>,
) -> RadiusCheck {
    let radius = match radius {
        Some(r) if r.value() > 0.0 => r,
        _ => return RadiusCheck::NoRadius,
    };

    let (provider, address) = match (provider, address) {
        (Some(p), Some(a)) => (p, a),
        _ => return RadiusCheck::MissingCoordinates,
    };

    let distance = haversine_distance(provider, address);
    if distance.value() <= radius.value() {
        RadiusCheck::Within { distance, radius }
    } else {
        RadiusCheck::Outside { distance, radius }
    }
}
