//! Location registry for the air-quality service.
//!
//! Major cities the CLI can look up by name instead of raw coordinates.

/// A named point to fetch measurements around.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub name: &'static str,
    pub country: &'static str,
    pub continent: &'static str,
    /// WGS84 latitude.
    pub latitude: f64,
    /// WGS84 longitude.
    pub longitude: f64,
}

const fn city(
    name: &'static str,
    country: &'static str,
    continent: &'static str,
    latitude: f64,
    longitude: f64,
) -> Location {
    Location {
        name,
        country,
        continent,
        latitude,
        longitude,
    }
}

pub static LOCATION_REGISTRY: &[Location] = &[
    // Asia
    city("Tokyo", "Japan", "Asia", 35.6762, 139.6503),
    city("Beijing", "China", "Asia", 39.9042, 116.4074),
    city("Mumbai", "India", "Asia", 19.0760, 72.8777),
    city("New Delhi", "India", "Asia", 28.6139, 77.2090),
    city("Singapore", "Singapore", "Asia", 1.3521, 103.8198),
    city("Seoul", "South Korea", "Asia", 37.5665, 126.9780),
    city("Bangkok", "Thailand", "Asia", 13.7563, 100.5018),
    city("Jakarta", "Indonesia", "Asia", -6.2088, 106.8456),
    // Europe
    city("London", "UK", "Europe", 51.5074, -0.1278),
    city("Paris", "France", "Europe", 48.8566, 2.3522),
    city("Berlin", "Germany", "Europe", 52.5200, 13.4050),
    city("Madrid", "Spain", "Europe", 40.4168, -3.7038),
    city("Warsaw", "Poland", "Europe", 52.2297, 21.0122),
    city("Stockholm", "Sweden", "Europe", 59.3293, 18.0686),
    // North America
    city("New York", "USA", "North America", 40.7128, -74.0060),
    city("Los Angeles", "USA", "North America", 34.0522, -118.2437),
    city("Mexico City", "Mexico", "North America", 19.4326, -99.1332),
    city("Toronto", "Canada", "North America", 43.6532, -79.3832),
    city("Chicago", "USA", "North America", 41.8781, -87.6298),
    // South America
    city("São Paulo", "Brazil", "South America", -23.5505, -46.6333),
    city("Buenos Aires", "Argentina", "South America", -34.6037, -58.3816),
    city("Lima", "Peru", "South America", -12.0464, -77.0428),
    city("Santiago", "Chile", "South America", -33.4489, -70.6693),
    // Africa
    city("Cairo", "Egypt", "Africa", 30.0444, 31.2357),
    city("Lagos", "Nigeria", "Africa", 6.5244, 3.3792),
    city("Nairobi", "Kenya", "Africa", -1.2921, 36.8219),
    // Oceania
    city("Sydney", "Australia", "Oceania", -33.8688, 151.2093),
    city("Auckland", "New Zealand", "Oceania", -36.8485, 174.7633),
];

/// Looks up a location by name, case-insensitively. Returns `None` if not
/// found.
pub fn find_location(name: &str) -> Option<&'static Location> {
    let wanted = name.trim().to_lowercase();
    LOCATION_REGISTRY
        .iter()
        .find(|l| l.name.to_lowercase() == wanted)
}

pub fn locations_in_continent(continent: &str) -> Vec<&'static Location> {
    let wanted = continent.trim().to_lowercase();
    LOCATION_REGISTRY
        .iter()
        .filter(|l| l.continent.to_lowercase() == wanted)
        .collect()
}

pub fn all_location_names() -> Vec<&'static str> {
    LOCATION_REGISTRY.iter().map(|l| l.name).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
